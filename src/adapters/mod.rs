// Adapters - External system implementations

pub mod exec_ytdlp;
pub mod tool_locator;
pub mod toml_config;

// Re-export adapters
pub use exec_ytdlp::YtDlpAdapter;
pub use tool_locator::PathToolLocator;
pub use toml_config::{AppConfig, TomlConfigAdapter};
