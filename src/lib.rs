//! ytmp3 CLI Library
//!
//! Compiles user download intent (URL, output format, bitrate, filename
//! template and an optional clip window) into a single execution plan for
//! the external yt-dlp engine, then drives the engine once and reports the
//! outcome.

pub mod adapters;
pub mod app;
pub mod cli;
pub mod domain;
pub mod error;
pub mod planner;
pub mod ports;
pub mod utils;

// Re-export commonly used types
pub use domain::errors::DomainError;
pub use domain::model::{ClipWindow, DownloadRequest, ExecutionPlan, FormatFamily, Quality};
pub use domain::rules::{Advisory, ClipResolver, FormatRegistry};
pub use error::{Ytmp3Error, Ytmp3Result};
pub use planner::PlanAssembler;
