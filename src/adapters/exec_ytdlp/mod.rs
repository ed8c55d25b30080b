//! yt-dlp execution adapter
//!
//! Runs the external engine as a child process. The plan is translated into
//! the engine's argument vector, progress on stdout is passed through, and
//! stderr is relayed while its `ERROR:` lines are kept for classification.

use std::process::{ExitStatus, Stdio};

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::{ChildStderr, Command};
use tracing::{debug, info, warn};

use crate::domain::model::*;
use crate::error::{Ytmp3Error, Ytmp3Result};
use crate::ports::*;

/// Default engine binary name
pub const DEFAULT_ENGINE_BINARY: &str = "yt-dlp";

/// Substrings (lowercase) marking an engine error as a postprocessing failure
const POSTPROCESSING_MARKERS: &[&str] = &["postprocessing", "ffmpeg", "ffprobe"];

const INTERRUPT_MARKER: &str = "interrupted by user";

/// yt-dlp based execution adapter
pub struct YtDlpAdapter {
    binary: String,
}

impl YtDlpAdapter {
    /// Create new adapter running `binary`
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Translate a plan into the engine's argument vector
    pub fn build_args(plan: &ExecutionPlan, url: &str) -> Vec<String> {
        let mut args: Vec<String> = vec!["-f".into(), plan.stream_selection.selector().into()];

        if let Some(container) = &plan.merge_output_format {
            args.push("--merge-output-format".into());
            args.push(container.clone());
        }

        for step in &plan.postprocessors {
            match step {
                Postprocessor::ExtractAudio {
                    codec,
                    bitrate_kbps,
                } => {
                    args.push("-x".into());
                    args.push("--audio-format".into());
                    args.push(codec.clone());
                    args.push("--audio-quality".into());
                    args.push(format!("{}K", bitrate_kbps));
                }
                Postprocessor::RemuxVideo { container } => {
                    args.push("--remux-video".into());
                    args.push(container.clone());
                }
            }
        }

        args.push("-o".into());
        args.push(plan.output_template.clone());

        if let Some(clip) = &plan.clip {
            args.push("--download-sections".into());
            args.push(clip.section());
            if clip.snap_to_keyframes {
                args.push("--force-keyframes-at-cuts".into());
            }
        }

        let safety = &plan.safety;
        if safety.no_playlist {
            args.push("--no-playlist".into());
        }
        if safety.restrict_filenames {
            args.push("--restrict-filenames".into());
        }
        if safety.quiet {
            args.push("--quiet".into());
        }
        if safety.no_warnings {
            args.push("--no-warnings".into());
        }

        // URL after `--` so a value starting with '-' is never read as a flag
        args.push("--".into());
        args.push(url.to_string());
        args
    }

    /// Map a failed run to the error taxonomy
    pub fn classify_failure(binary: &str, error_lines: &[String], exit_code: Option<i32>) -> Ytmp3Error {
        let Some(line) = error_lines.last() else {
            let message = match exit_code {
                Some(code) => format!("{} exited with status {}", binary, code),
                None => format!("{} was terminated by a signal", binary),
            };
            return Ytmp3Error::DownloadFailure { message };
        };

        let message = line.trim_start_matches("ERROR:").trim().to_string();
        let lower = message.to_lowercase();
        if lower.contains(INTERRUPT_MARKER) {
            Ytmp3Error::UserCancelled
        } else if POSTPROCESSING_MARKERS.iter().any(|marker| lower.contains(marker)) {
            Ytmp3Error::PostProcessingFailure { message }
        } else {
            Ytmp3Error::DownloadFailure { message }
        }
    }

    fn spawn_error(&self, error: std::io::Error) -> Ytmp3Error {
        match error.kind() {
            std::io::ErrorKind::NotFound => Ytmp3Error::MissingDependency {
                binary: self.binary.clone(),
            },
            _ => Ytmp3Error::Unexpected {
                message: format!("failed to start {}: {}", self.binary, error),
            },
        }
    }
}

impl Default for YtDlpAdapter {
    fn default() -> Self {
        Self::new(DEFAULT_ENGINE_BINARY)
    }
}

#[async_trait]
impl EnginePort for YtDlpAdapter {
    async fn execute(&self, plan: &ExecutionPlan, url: &str) -> Ytmp3Result<EngineReport> {
        let args = Self::build_args(plan, url);
        debug!("Running {} {:?}", self.binary, args);

        let mut child = Command::new(&self.binary)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| self.spawn_error(e))?;

        let stderr = child.stderr.take().ok_or_else(|| Ytmp3Error::Unexpected {
            message: "engine stderr was not captured".to_string(),
        })?;
        let relay = tokio::spawn(relay_stderr(stderr));

        let status = tokio::select! {
            status = child.wait() => match status {
                Ok(status) => status,
                Err(e) => {
                    relay.abort();
                    return Err(Ytmp3Error::Io(e));
                }
            },
            Ok(()) = tokio::signal::ctrl_c() => {
                warn!("Interrupt received, stopping {}", self.binary);
                let _ = child.kill().await;
                relay.abort();
                return Err(Ytmp3Error::UserCancelled);
            }
        };

        let error_lines = relay.await.map_err(|e| Ytmp3Error::Unexpected {
            message: format!("stderr relay failed: {}", e),
        })?;

        if status.success() {
            info!("{} finished successfully", self.binary);
            return Ok(EngineReport {
                output_template: plan.output_template.clone(),
            });
        }

        if interrupted(&status) {
            return Err(Ytmp3Error::UserCancelled);
        }

        warn!("{} failed with {}", self.binary, status);
        Err(Self::classify_failure(&self.binary, &error_lines, status.code()))
    }

    fn binary(&self) -> &str {
        &self.binary
    }
}

/// Echo engine stderr and return its `ERROR:` lines.
///
/// Lines are decoded lossily; titles in a non-UTF-8 locale must not end the
/// relay before the engine's final error is seen.
async fn relay_stderr(stderr: ChildStderr) -> Vec<String> {
    let mut reader = BufReader::new(stderr);
    let mut buf = Vec::new();
    let mut error_lines = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => break,
            Ok(_) => {
                let line = String::from_utf8_lossy(&buf);
                let line = line.trim_end_matches(['\r', '\n']);
                eprintln!("{}", line);
                if line.starts_with("ERROR:") {
                    error_lines.push(line.to_string());
                }
            }
            Err(e) => {
                warn!("Stopped reading engine stderr: {}", e);
                break;
            }
        }
    }
    error_lines
}

#[cfg(unix)]
fn interrupted(status: &ExitStatus) -> bool {
    use std::os::unix::process::ExitStatusExt;
    status.signal() == Some(2)
}

#[cfg(not(unix))]
fn interrupted(_status: &ExitStatus) -> bool {
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::PlanAssembler;
    use tempfile::TempDir;

    /// Write an executable shell script standing in for the engine
    #[cfg(unix)]
    fn fake_engine(dir: &TempDir, body: &str) -> String {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.path().join("fake-engine.sh");
        std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path.to_string_lossy().to_string()
    }

    fn plan(format: &str, family: FormatFamily, clip: ClipWindow) -> ExecutionPlan {
        PlanAssembler::build(
            &FormatToken::new(format),
            family,
            Quality::new(256).unwrap(),
            "music/%(title)s.%(ext)s",
            clip,
        )
    }

    #[test]
    fn test_audio_args() {
        let args = YtDlpAdapter::build_args(
            &plan("mp3", FormatFamily::Audio, ClipWindow::Unclipped),
            "https://youtu.be/abc",
        );
        assert_eq!(
            args,
            vec![
                "-f",
                "bestaudio/best",
                "-x",
                "--audio-format",
                "mp3",
                "--audio-quality",
                "256K",
                "-o",
                "music/%(title)s.%(ext)s",
                "--no-playlist",
                "--restrict-filenames",
                "--no-warnings",
                "--",
                "https://youtu.be/abc",
            ]
        );
    }

    #[test]
    fn test_video_clip_args() {
        let args = YtDlpAdapter::build_args(
            &plan(
                "mp4",
                FormatFamily::Video,
                ClipWindow::Range {
                    start: 60,
                    end: Some(120),
                },
            ),
            "https://youtu.be/abc",
        );
        assert_eq!(&args[..6], ["-f", "bv*+ba/b", "--merge-output-format", "mp4", "--remux-video", "mp4"]);
        assert!(!args.iter().any(|a| a == "-x" || a == "--audio-quality"));
        let sections = args.iter().position(|a| a == "--download-sections").unwrap();
        assert_eq!(args[sections + 1], "*60-120");
        assert_eq!(args[sections + 2], "--force-keyframes-at-cuts");
    }

    #[test]
    fn test_url_follows_separator() {
        let args = YtDlpAdapter::build_args(
            &plan("mp3", FormatFamily::Audio, ClipWindow::Unclipped),
            "-weird",
        );
        assert_eq!(&args[args.len() - 2..], ["--", "-weird"]);
    }

    #[test]
    fn test_classify_postprocessing_failure() {
        let lines = vec![
            "ERROR: [youtube] abc: something earlier".to_string(),
            "ERROR: Postprocessing: audio conversion failed: Unknown encoder".to_string(),
        ];
        match YtDlpAdapter::classify_failure("yt-dlp", &lines, Some(1)) {
            Ytmp3Error::PostProcessingFailure { message } => {
                assert_eq!(message, "Postprocessing: audio conversion failed: Unknown encoder")
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_classify_download_failure() {
        let lines = vec!["ERROR: [youtube] abc: Video unavailable".to_string()];
        assert!(matches!(
            YtDlpAdapter::classify_failure("yt-dlp", &lines, Some(1)),
            Ytmp3Error::DownloadFailure { message } if message.contains("Video unavailable")
        ));
    }

    #[test]
    fn test_classify_without_error_line() {
        match YtDlpAdapter::classify_failure("yt-dlp", &[], Some(2)) {
            Ytmp3Error::DownloadFailure { message } => {
                assert_eq!(message, "yt-dlp exited with status 2")
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_classify_interrupt() {
        let lines = vec!["ERROR: Interrupted by user".to_string()];
        assert!(matches!(
            YtDlpAdapter::classify_failure("yt-dlp", &lines, Some(1)),
            Ytmp3Error::UserCancelled
        ));
    }

    #[tokio::test]
    async fn test_missing_binary_is_missing_dependency() {
        let adapter = YtDlpAdapter::new("ytmp3-test-no-such-engine");
        let result = adapter
            .execute(&plan("mp3", FormatFamily::Audio, ClipWindow::Unclipped), "https://youtu.be/abc")
            .await;
        assert!(matches!(
            result,
            Err(Ytmp3Error::MissingDependency { binary }) if binary == "ytmp3-test-no-such-engine"
        ));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_non_utf8_stderr_keeps_postprocessing_error() {
        let dir = TempDir::new().unwrap();
        let engine = fake_engine(
            &dir,
            "printf 'WARNING: title \\377\\376 odd\\n' >&2\n\
             echo 'ERROR: Postprocessing: audio conversion failed: Unknown encoder' >&2\n\
             exit 1",
        );
        let adapter = YtDlpAdapter::new(engine);
        let result = adapter
            .execute(&plan("mp3", FormatFamily::Audio, ClipWindow::Unclipped), "https://youtu.be/abc")
            .await;
        match result {
            Err(Ytmp3Error::PostProcessingFailure { message }) => {
                assert_eq!(message, "Postprocessing: audio conversion failed: Unknown encoder")
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_engine_killed_by_interrupt_is_cancelled() {
        let dir = TempDir::new().unwrap();
        let engine = fake_engine(&dir, "kill -INT $$\nsleep 5");
        let adapter = YtDlpAdapter::new(engine);
        let result = adapter
            .execute(&plan("mp3", FormatFamily::Audio, ClipWindow::Unclipped), "https://youtu.be/abc")
            .await;
        assert!(matches!(result, Err(Ytmp3Error::UserCancelled)));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_successful_engine_reports_template() {
        let dir = TempDir::new().unwrap();
        let engine = fake_engine(&dir, "echo done\nexit 0");
        let report = YtDlpAdapter::new(engine)
            .execute(&plan("mp3", FormatFamily::Audio, ClipWindow::Unclipped), "https://youtu.be/abc")
            .await
            .unwrap();
        assert_eq!(report.output_template, "music/%(title)s.%(ext)s");
    }
}
