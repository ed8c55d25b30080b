// Domain errors - Validation failures raised before the engine is invoked

use thiserror::Error;

/// Domain-specific error types
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Malformed time specification
    #[error("Invalid time format: '{input}'. Expected SS, MM:SS or HH:MM:SS ({reason})")]
    InvalidTimeFormat { input: String, reason: String },

    /// Structurally valid times that do not form a forward range
    #[error("Invalid clip range: end must be greater than start (start {start}s, end {end}s)")]
    InvalidClipRange { start: u64, end: u64 },

    /// URL was blank after trimming
    #[error("URL is empty")]
    EmptyInput,

    /// Bitrate outside the accepted set
    #[error("Invalid quality: '{0}'. Expected one of 128, 192, 256, 320")]
    InvalidQuality(String),
}

impl DomainError {
    pub(crate) fn time_format(input: &str, reason: impl Into<String>) -> Self {
        DomainError::InvalidTimeFormat {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}
