//! ytmp3 CLI
//!
//! Download a media URL as audio (or remuxed video) through yt-dlp.
//!
//! # Usage
//!
//! ```bash
//! ytmp3 "https://youtu.be/..." --quality 256
//! ytmp3 "https://youtu.be/..." --format mp4 --start 1:00 --end 2:00
//! ytmp3 "https://youtu.be/..." --output "music/%(title)s.%(ext)s" --print-plan
//! ```

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};

use ytmp3_cli::adapters::TomlConfigAdapter;
use ytmp3_cli::cli::{commands, Cli};
use ytmp3_cli::utils::logging::LoggingSystem;
use ytmp3_cli::Ytmp3Error;

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let typed = err.downcast_ref::<Ytmp3Error>();
            match typed {
                Some(Ytmp3Error::UserCancelled) => eprintln!("\n{}", err),
                _ => {
                    error!("{:#}", err);
                    eprintln!("Error: {:#}", err);
                }
            }
            let code = typed.map(Ytmp3Error::exit_code).unwrap_or(1);
            ExitCode::from(u8::try_from(code).unwrap_or(1))
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = TomlConfigAdapter::load(cli.run.config.as_deref())?;

    let logging = LoggingSystem::new(commands::logging_config(&cli.run, &config)?);
    logging.initialize();
    logging.log_system_info();

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;

    runtime.block_on(commands::download(&cli, &config))?;

    info!("ytmp3 completed successfully");
    Ok(())
}
