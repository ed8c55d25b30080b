//! Error handling module for ytmp3

use thiserror::Error;

use crate::domain::errors::DomainError;

/// Main error type for ytmp3 operations
#[derive(Error, Debug)]
pub enum Ytmp3Error {
    /// Request validation failed before any engine activity
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// A required external binary is not on the search path
    #[error("{binary} not found. Install it and ensure it is on your PATH.")]
    MissingDependency { binary: String },

    /// The engine could not retrieve the media
    #[error("Download failed: {message}")]
    DownloadFailure { message: String },

    /// The engine's transcode, remux or extract step failed
    #[error("Post-processing failed (is FFmpeg installed and on your PATH?): {message}")]
    PostProcessingFailure { message: String },

    /// Interrupted by the user while the engine was running
    #[error("Download cancelled by user.")]
    UserCancelled,

    /// Configuration file could not be read or parsed
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Anything not classified above
    #[error("Unexpected error: {message}")]
    Unexpected { message: String },
}

impl Ytmp3Error {
    /// Process exit status for this failure
    pub fn exit_code(&self) -> i32 {
        match self {
            Ytmp3Error::Domain(_) => 2,
            Ytmp3Error::MissingDependency { .. } => 3,
            Ytmp3Error::DownloadFailure { .. } => 4,
            Ytmp3Error::PostProcessingFailure { .. } => 5,
            Ytmp3Error::Config { .. } => 6,
            Ytmp3Error::UserCancelled => 130,
            Ytmp3Error::Io(_) | Ytmp3Error::Unexpected { .. } => 1,
        }
    }
}

/// Result type alias for ytmp3 operations
pub type Ytmp3Result<T> = std::result::Result<T, Ytmp3Error>;
