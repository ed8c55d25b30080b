//! Command-line argument definitions

use std::path::PathBuf;

use clap::Args;

use crate::domain::model::Quality;

/// What to download and how to shape the output
#[derive(Args, Debug, Clone)]
pub struct DownloadArgs {
    /// Media URL
    pub url: String,

    /// Audio bitrate in kbps: 128, 192, 256 or 320 (default: 192; ignored for video)
    #[arg(long, env = "YTMP3_QUALITY", value_parser = parse_quality)]
    pub quality: Option<Quality>,

    /// Output filename template, engine placeholder syntax (default: %(title)s.%(ext)s)
    #[arg(long, env = "YTMP3_OUTPUT")]
    pub output: Option<String>,

    /// Output format/extension (default: mp3). For video use: mp4
    #[arg(long, env = "YTMP3_FORMAT")]
    pub format: Option<String>,

    /// Clip start (SS, MM:SS or HH:MM:SS)
    #[arg(long)]
    pub start: Option<String>,

    /// Clip end (SS, MM:SS or HH:MM:SS)
    #[arg(long)]
    pub end: Option<String>,
}

/// Settings that shape the run rather than the request
#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Configuration file (default: ./ytmp3.toml when present)
    #[arg(long, env = "YTMP3_CONFIG")]
    pub config: Option<PathBuf>,

    /// Logging level when RUST_LOG is unset (error, warn, info, debug, trace)
    #[arg(long, env = "YTMP3_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Emit logs as JSON
    #[arg(long)]
    pub log_json: bool,

    /// Print the execution plan as JSON and exit without downloading
    #[arg(long)]
    pub print_plan: bool,
}

fn parse_quality(raw: &str) -> Result<Quality, String> {
    raw.parse::<Quality>().map_err(|e| e.to_string())
}
