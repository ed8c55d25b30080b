// Ports - Interface definitions (contracts)

use std::path::PathBuf;

use async_trait::async_trait;

use crate::domain::model::ExecutionPlan;
use crate::error::Ytmp3Result;

/// Port for the external download/transcode engine
#[async_trait]
pub trait EnginePort: Send + Sync {
    /// Run one plan against one URL to completion.
    ///
    /// Either the file materialises at the planned path or an error is
    /// returned; there is no partial result.
    async fn execute(&self, plan: &ExecutionPlan, url: &str) -> Ytmp3Result<EngineReport>;

    /// Binary name the engine needs on the search path
    fn binary(&self) -> &str;
}

/// Outcome of a successful engine run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineReport {
    pub output_template: String,
}

/// Port for locating external binaries
pub trait ToolLocator: Send + Sync {
    /// Resolve `binary` on the search path
    fn locate(&self, binary: &str) -> Option<PathBuf>;
}
