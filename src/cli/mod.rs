//! CLI module for ytmp3
//!
//! This module handles command-line argument parsing and command execution.

use clap::Parser;

pub mod args;
pub mod commands;

pub use args::{DownloadArgs, RunArgs};

/// ytmp3 - download audio (or video) through yt-dlp
///
/// Compiles the requested format, quality, output template and clip window
/// into a single yt-dlp invocation.
#[derive(Parser, Debug)]
#[command(name = "ytmp3")]
#[command(about = "Download YouTube audio and save as MP3 (or other audio formats)")]
#[command(version)]
#[command(long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub download: DownloadArgs,

    #[command(flatten)]
    pub run: RunArgs,
}
