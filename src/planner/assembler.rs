//! Builds the engine execution plan from a classified request

use std::path::Path;

use tracing::{debug, info};

use crate::domain::model::*;
use crate::error::Ytmp3Result;

/// Assembles a single, internally consistent [`ExecutionPlan`]
pub struct PlanAssembler;

impl PlanAssembler {
    /// Create a new plan assembler
    pub fn new() -> Self {
        Self
    }

    /// Build the plan and make sure the output directory exists.
    ///
    /// Structurally equal inputs produce structurally equal plans.
    pub fn assemble(
        &self,
        format: &FormatToken,
        family: FormatFamily,
        quality: Quality,
        output_template: &str,
        clip: ClipWindow,
    ) -> Ytmp3Result<ExecutionPlan> {
        let plan = Self::build(format, family, quality, output_template, clip);
        Self::ensure_output_dir(output_template)?;
        info!(
            "Assembled {:?} plan: selector {}, clip {:?}",
            plan.family,
            plan.stream_selection.selector(),
            plan.clip.map(|c| c.section())
        );
        Ok(plan)
    }

    /// Pure plan construction, no filesystem access
    pub fn build(
        format: &FormatToken,
        family: FormatFamily,
        quality: Quality,
        output_template: &str,
        clip: ClipWindow,
    ) -> ExecutionPlan {
        let (stream_selection, merge_output_format, postprocessors) = match family {
            FormatFamily::Video => (
                StreamSelection::BestVideoAndAudio,
                Some(format.to_string()),
                vec![Postprocessor::RemuxVideo {
                    container: format.to_string(),
                }],
            ),
            FormatFamily::Audio | FormatFamily::Unrecognized => (
                StreamSelection::BestAudio,
                None,
                vec![Postprocessor::ExtractAudio {
                    codec: format.to_string(),
                    bitrate_kbps: quality.kbps(),
                }],
            ),
        };

        let clip = match clip {
            ClipWindow::Unclipped => None,
            ClipWindow::Range { start, end } => Some(ClipDirective {
                start,
                end,
                snap_to_keyframes: true,
            }),
        };

        ExecutionPlan {
            family,
            stream_selection,
            merge_output_format,
            postprocessors,
            output_template: output_template.to_string(),
            clip,
            safety: SafetyFlags::default(),
        }
    }

    /// Create the template's parent directory, recursively and idempotently
    fn ensure_output_dir(output_template: &str) -> Ytmp3Result<()> {
        if let Some(parent) = Path::new(output_template).parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                debug!("Creating output directory: {}", parent.display());
                std::fs::create_dir_all(parent)?;
            }
        }
        Ok(())
    }
}

impl Default for PlanAssembler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn mp3() -> FormatToken {
        FormatToken::new("mp3")
    }

    #[test]
    fn test_audio_plan() {
        let plan = PlanAssembler::build(
            &mp3(),
            FormatFamily::Audio,
            Quality::new(256).unwrap(),
            "%(title)s.%(ext)s",
            ClipWindow::Unclipped,
        );
        assert_eq!(plan.stream_selection, StreamSelection::BestAudio);
        assert_eq!(plan.merge_output_format, None);
        assert_eq!(
            plan.postprocessors,
            vec![Postprocessor::ExtractAudio {
                codec: "mp3".to_string(),
                bitrate_kbps: 256
            }]
        );
        assert_eq!(plan.clip, None);
        assert_eq!(plan.safety, SafetyFlags::default());
    }

    #[test]
    fn test_video_plan_ignores_quality() {
        let mp4 = FormatToken::new("mp4");
        let low = PlanAssembler::build(
            &mp4,
            FormatFamily::Video,
            Quality::new(128).unwrap(),
            "out.%(ext)s",
            ClipWindow::Unclipped,
        );
        let high = PlanAssembler::build(
            &mp4,
            FormatFamily::Video,
            Quality::new(320).unwrap(),
            "out.%(ext)s",
            ClipWindow::Unclipped,
        );
        assert_eq!(low, high);
        assert_eq!(low.stream_selection, StreamSelection::BestVideoAndAudio);
        assert_eq!(low.merge_output_format.as_deref(), Some("mp4"));
        assert_eq!(
            low.postprocessors,
            vec![Postprocessor::RemuxVideo {
                container: "mp4".to_string()
            }]
        );
    }

    #[test]
    fn test_unrecognized_uses_audio_pipeline() {
        let plan = PlanAssembler::build(
            &FormatToken::new("ogg"),
            FormatFamily::Unrecognized,
            Quality::default(),
            "x",
            ClipWindow::Unclipped,
        );
        assert_eq!(plan.stream_selection, StreamSelection::BestAudio);
        assert!(matches!(
            plan.postprocessors[0],
            Postprocessor::ExtractAudio { ref codec, bitrate_kbps: 192 } if codec == "ogg"
        ));
    }

    #[test]
    fn test_clip_directive_snaps_to_keyframes() {
        let plan = PlanAssembler::build(
            &mp3(),
            FormatFamily::Audio,
            Quality::default(),
            "x",
            ClipWindow::Range {
                start: 10,
                end: None,
            },
        );
        let clip = plan.clip.unwrap();
        assert_eq!(clip.start, 10);
        assert_eq!(clip.end, None);
        assert!(clip.snap_to_keyframes);
    }

    #[test]
    fn test_assemble_creates_output_dir() {
        let temp_dir = TempDir::new().unwrap();
        let template = temp_dir
            .path()
            .join("nested")
            .join("deeper")
            .join("%(title)s.%(ext)s");
        let template = template.to_string_lossy().to_string();

        let assembler = PlanAssembler::new();
        let first = assembler
            .assemble(&mp3(), FormatFamily::Audio, Quality::default(), &template, ClipWindow::Unclipped)
            .unwrap();
        assert!(temp_dir.path().join("nested").join("deeper").is_dir());

        let second = assembler
            .assemble(&mp3(), FormatFamily::Audio, Quality::default(), &template, ClipWindow::Unclipped)
            .unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_assemble_bare_template_needs_no_dir() {
        let plan = PlanAssembler::new()
            .assemble(&mp3(), FormatFamily::Audio, Quality::default(), "%(title)s.%(ext)s", ClipWindow::Unclipped)
            .unwrap();
        assert_eq!(plan.output_template, "%(title)s.%(ext)s");
    }
}
