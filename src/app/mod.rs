// Application layer - Use case interactors

pub mod container;
pub mod download_interactor;

// Re-export interactors
pub use container::{AppContainer, DefaultAppContainer};
pub use download_interactor::{DownloadInteractor, PreparedRequest};
