// Download interactor - Orchestrates the download use case

use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::domain::rules::*;
use crate::error::{Ytmp3Error, Ytmp3Result};
use crate::planner::PlanAssembler;
use crate::ports::*;

/// A request that passed validation, ready for planning
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedRequest {
    pub url: String,
    pub format: FormatToken,
    pub family: FormatFamily,
    pub quality: Quality,
    pub output_template: String,
    pub clip: ClipWindow,
    pub advisories: Vec<Advisory>,
}

/// Interactor for the download use case
pub struct DownloadInteractor {
    engine: Arc<dyn EnginePort>,
    locator: Arc<dyn ToolLocator>,
    registry: FormatRegistry,
    assembler: PlanAssembler,
    transcoder_binary: String,
}

impl DownloadInteractor {
    /// Create new download interactor with injected ports
    pub fn new(
        engine: Arc<dyn EnginePort>,
        locator: Arc<dyn ToolLocator>,
        registry: FormatRegistry,
        transcoder_binary: impl Into<String>,
    ) -> Self {
        debug!(
            "Known formats: audio {:?}, video {:?}",
            registry.audio_formats(),
            registry.video_formats()
        );
        Self {
            engine,
            locator,
            registry,
            assembler: PlanAssembler::new(),
            transcoder_binary: transcoder_binary.into(),
        }
    }

    /// Validate the request, resolve its clip window and classify its format.
    ///
    /// All validation happens here, before any dependency lookup or engine
    /// activity.
    pub fn prepare(&self, request: &DownloadRequest) -> Result<PreparedRequest, DomainError> {
        let url = request.validated_url()?.to_string();
        let clip = ClipResolver::resolve(request.start.as_deref(), request.end.as_deref())?;
        let family = self.registry.classify(request.format.as_str());
        let advisories = Advisory::for_request(&request.format, family, request.quality);

        for advisory in &advisories {
            info!("Advisory: {}", advisory);
        }
        info!(
            "Prepared request: format {} ({:?}), quality {}k, clip {:?}",
            request.format, family, request.quality, clip
        );

        Ok(PreparedRequest {
            url,
            format: request.format.clone(),
            family,
            quality: request.quality,
            output_template: request.output_template.clone(),
            clip,
            advisories,
        })
    }

    /// Plan for a prepared request without touching the filesystem
    pub fn preview(&self, prepared: &PreparedRequest) -> ExecutionPlan {
        PlanAssembler::build(
            &prepared.format,
            prepared.family,
            prepared.quality,
            &prepared.output_template,
            prepared.clip,
        )
    }

    /// Fail with `MissingDependency` unless the transcoder and engine are on PATH
    pub fn check_dependencies(&self) -> Ytmp3Result<()> {
        for binary in [self.transcoder_binary.as_str(), self.engine.binary()] {
            match self.locator.locate(binary) {
                Some(path) => info!("Found {} at {}", binary, path.display()),
                None => {
                    return Err(Ytmp3Error::MissingDependency {
                        binary: binary.to_string(),
                    })
                }
            }
        }
        Ok(())
    }

    /// Assemble the plan, creating the output directory
    pub fn assemble(&self, prepared: &PreparedRequest) -> Ytmp3Result<ExecutionPlan> {
        self.assembler.assemble(
            &prepared.format,
            prepared.family,
            prepared.quality,
            &prepared.output_template,
            prepared.clip,
        )
    }

    /// Hand an assembled plan to the engine, exactly once
    pub async fn launch(&self, plan: &ExecutionPlan, url: &str) -> Ytmp3Result<EngineReport> {
        self.engine.execute(plan, url).await
    }

    /// Check dependencies, assemble the plan and hand it to the engine once
    pub async fn run(&self, prepared: &PreparedRequest) -> Ytmp3Result<EngineReport> {
        self.check_dependencies()?;
        let plan = self.assemble(prepared)?;
        self.launch(&plan, &prepared.url).await
    }

    /// Prepare and run in one step
    pub async fn execute(&self, request: &DownloadRequest) -> Ytmp3Result<EngineReport> {
        let prepared = self.prepare(request)?;
        self.run(&prepared).await
    }
}
