//! Command implementations

use tracing::info;

use crate::adapters::{AppConfig, YtDlpAdapter};
use crate::app::{AppContainer, DefaultAppContainer};
use crate::cli::args::{DownloadArgs, RunArgs};
use crate::cli::Cli;
use crate::domain::model::*;
use crate::error::{Ytmp3Error, Ytmp3Result};
use crate::utils::logging::{LogFormat, LogLevel, LoggingConfig};
use crate::utils::time::describe_clip;

/// Merge CLI/env arguments over config-file values over built-in defaults
pub fn build_request(args: &DownloadArgs, config: &AppConfig) -> DownloadRequest {
    let format = args
        .format
        .as_deref()
        .or(config.format.as_deref())
        .unwrap_or(DEFAULT_FORMAT);
    let quality = args.quality.or(config.quality).unwrap_or_default();
    let output = args
        .output
        .clone()
        .or_else(|| config.output.clone())
        .unwrap_or_else(|| DEFAULT_OUTPUT_TEMPLATE.to_string());

    DownloadRequest::new(args.url.clone())
        .with_format(format)
        .with_quality(quality)
        .with_output(output)
        .with_clip(args.start.as_deref(), args.end.as_deref())
}

/// Resolve the logging setup from CLI/env and config file
pub fn logging_config(args: &RunArgs, config: &AppConfig) -> Ytmp3Result<LoggingConfig> {
    let mut logging = LoggingConfig::default();
    if let Some(level) = args.log_level.as_deref().or(config.log_level.as_deref()) {
        logging.level = level
            .parse::<LogLevel>()
            .map_err(|message| Ytmp3Error::Config { message })?;
    }
    if args.log_json {
        logging.format = LogFormat::Json;
    }
    Ok(logging)
}

/// Execute the download command
pub async fn download(cli: &Cli, config: &AppConfig) -> Ytmp3Result<()> {
    let container = DefaultAppContainer::new(config);
    let interactor = container.download_interactor();

    let request = build_request(&cli.download, config);
    let prepared = interactor.prepare(&request)?;

    for advisory in &prepared.advisories {
        eprintln!("{}", advisory);
    }
    info!("Clip window: {}", describe_clip(&prepared.clip));

    if cli.run.print_plan {
        let plan = interactor.preview(&prepared);
        let report = serde_json::json!({
            "url": prepared.url,
            "plan": plan,
            "engine_args": YtDlpAdapter::build_args(&plan, &prepared.url),
        });
        let json = serde_json::to_string_pretty(&report).map_err(|e| Ytmp3Error::Unexpected {
            message: format!("failed to serialize plan: {}", e),
        })?;
        println!("{}", json);
        return Ok(());
    }

    interactor.check_dependencies()?;
    let plan = interactor.assemble(&prepared)?;

    println!("Starting download…");
    let report = interactor.launch(&plan, &prepared.url).await?;
    println!(
        "Success: file saved (check the current directory or your --output path: {})",
        report.output_template
    );
    Ok(())
}
