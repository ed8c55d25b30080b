use std::sync::Arc;

use crate::adapters::{AppConfig, PathToolLocator, YtDlpAdapter};
use crate::app::download_interactor::DownloadInteractor;
use crate::domain::rules::FormatRegistry;
use crate::ports::{EnginePort, ToolLocator};

pub trait AppContainer {
    fn download_interactor(&self) -> Arc<DownloadInteractor>;
}

pub struct DefaultAppContainer {
    download_interactor: Arc<DownloadInteractor>,
}

impl DefaultAppContainer {
    /// Wire the production adapters from loaded configuration
    pub fn new(config: &AppConfig) -> Self {
        let engine = Arc::new(YtDlpAdapter::new(config.engine_binary.clone()));
        let locator = Arc::new(PathToolLocator::new());
        let registry = FormatRegistry::with_extra(
            config.extra_audio_formats.as_slice(),
            config.extra_video_formats.as_slice(),
        );

        let download_interactor = Arc::new(DownloadInteractor::new(
            engine as Arc<dyn EnginePort>,
            locator as Arc<dyn ToolLocator>,
            registry,
            config.transcoder_binary.clone(),
        ));

        Self {
            download_interactor,
        }
    }
}

impl AppContainer for DefaultAppContainer {
    fn download_interactor(&self) -> Arc<DownloadInteractor> {
        Arc::clone(&self.download_interactor)
    }
}
