// TOML config adapter - Configuration file and environment overrides

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, info};

use crate::adapters::exec_ytdlp::DEFAULT_ENGINE_BINARY;
use crate::domain::model::Quality;
use crate::error::{Ytmp3Error, Ytmp3Result};

/// Config file picked up from the working directory when none is named
pub const DEFAULT_CONFIG_FILE: &str = "ytmp3.toml";

/// Default transcoder binary name
pub const DEFAULT_TRANSCODER_BINARY: &str = "ffmpeg";

/// Settings read from the config file. Every key is optional.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub format: Option<String>,
    pub quality: Option<Quality>,
    pub output: Option<String>,
    pub engine_binary: String,
    pub transcoder_binary: String,
    pub extra_audio_formats: Vec<String>,
    pub extra_video_formats: Vec<String>,
    pub log_level: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            format: None,
            quality: None,
            output: None,
            engine_binary: DEFAULT_ENGINE_BINARY.to_string(),
            transcoder_binary: DEFAULT_TRANSCODER_BINARY.to_string(),
            extra_audio_formats: Vec::new(),
            extra_video_formats: Vec::new(),
            log_level: None,
        }
    }
}

/// TOML configuration adapter
pub struct TomlConfigAdapter;

impl TomlConfigAdapter {
    /// Load configuration.
    ///
    /// An explicitly named file must exist and parse. Without one, the
    /// default file is read when present and defaults are used otherwise.
    /// Environment overrides are applied last.
    pub fn load(explicit: Option<&Path>) -> Ytmp3Result<AppConfig> {
        let mut config = match explicit {
            Some(path) => Self::load_file(path)?,
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.is_file() {
                    Self::load_file(&default_path)?
                } else {
                    debug!("No config file found, using defaults");
                    AppConfig::default()
                }
            }
        };
        Self::apply_env_overrides(&mut config, |key| std::env::var(key).ok());
        Ok(config)
    }

    /// Read and parse one config file
    pub fn load_file(path: &Path) -> Ytmp3Result<AppConfig> {
        info!("Loading configuration from: {}", path.display());
        let content = std::fs::read_to_string(path).map_err(|e| Ytmp3Error::Config {
            message: format!("cannot read {}: {}", path.display(), e),
        })?;
        Self::parse(&content).map_err(|e| match e {
            Ytmp3Error::Config { message } => Ytmp3Error::Config {
                message: format!("{}: {}", path.display(), message),
            },
            other => other,
        })
    }

    /// Parse TOML config content
    pub fn parse(content: &str) -> Ytmp3Result<AppConfig> {
        toml::from_str(content).map_err(|e| Ytmp3Error::Config {
            message: e.message().to_string(),
        })
    }

    /// Override binaries from `YTMP3_ENGINE` and `YTMP3_TRANSCODER`.
    ///
    /// The request settings (format, quality, output) are read from the
    /// environment by the argument parser instead.
    pub fn apply_env_overrides<F>(config: &mut AppConfig, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let overrides: [(&str, &mut String); 2] = [
            ("YTMP3_ENGINE", &mut config.engine_binary),
            ("YTMP3_TRANSCODER", &mut config.transcoder_binary),
        ];
        for (env_var, slot) in overrides {
            if let Some(value) = lookup(env_var).filter(|v| !v.trim().is_empty()) {
                info!("Found environment override: {} = {}", env_var, value);
                *slot = value;
            }
        }
    }
}
