// Domain rules - Clip resolution and format classification

use std::collections::HashSet;
use std::fmt;

use crate::domain::errors::*;
use crate::domain::model::*;

/// Formats handled by the audio-extraction pipeline
pub const AUDIO_FORMATS: &[&str] = &["mp3", "m4a", "opus", "flac", "wav", "aac"];

/// Formats handled by the video-remux pipeline
pub const VIDEO_FORMATS: &[&str] = &["mp4"];

/// Business rules for turning optional start/end strings into a clip window
pub struct ClipResolver;

impl ClipResolver {
    /// Resolve raw start/end values into a validated window
    pub fn resolve(start: Option<&str>, end: Option<&str>) -> Result<ClipWindow, DomainError> {
        if start.is_none() && end.is_none() {
            return Ok(ClipWindow::Unclipped);
        }

        let start = start.map(parse_seconds).transpose()?.unwrap_or(0);
        let end = end.map(parse_seconds).transpose()?;

        if let Some(end) = end {
            if end <= start {
                return Err(DomainError::InvalidClipRange { start, end });
            }
        }

        Ok(ClipWindow::Range { start, end })
    }
}

/// Immutable lookup of known audio and video formats.
///
/// Built once at startup and passed explicitly; the video set is open and may
/// be extended from configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatRegistry {
    audio: HashSet<String>,
    video: HashSet<String>,
}

impl FormatRegistry {
    /// Registry with the built-in format sets
    pub fn builtin() -> Self {
        Self::with_extra::<&str>(&[], &[])
    }

    /// Registry with the built-in sets extended by `extra_audio` and `extra_video`
    pub fn with_extra<S: AsRef<str>>(extra_audio: &[S], extra_video: &[S]) -> Self {
        let normalise = |s: &str| s.trim().to_lowercase();
        let audio = AUDIO_FORMATS
            .iter()
            .map(|s| normalise(s))
            .chain(extra_audio.iter().map(|s| normalise(s.as_ref())))
            .filter(|s| !s.is_empty())
            .collect();
        let video = VIDEO_FORMATS
            .iter()
            .map(|s| normalise(s))
            .chain(extra_video.iter().map(|s| normalise(s.as_ref())))
            .filter(|s| !s.is_empty())
            .collect();
        Self { audio, video }
    }

    /// Classify a format token. Total: every input maps to one family.
    ///
    /// A format present in both sets is treated as video, since the remux
    /// pipeline keeps the video stream the user asked for.
    pub fn classify(&self, format: &str) -> FormatFamily {
        let key = format.trim().to_lowercase();
        if self.video.contains(&key) {
            FormatFamily::Video
        } else if self.audio.contains(&key) {
            FormatFamily::Audio
        } else {
            FormatFamily::Unrecognized
        }
    }

    pub fn audio_formats(&self) -> Vec<&str> {
        let mut formats: Vec<&str> = self.audio.iter().map(String::as_str).collect();
        formats.sort_unstable();
        formats
    }

    pub fn video_formats(&self) -> Vec<&str> {
        let mut formats: Vec<&str> = self.video.iter().map(String::as_str).collect();
        formats.sort_unstable();
        formats
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Non-fatal notice surfaced to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advisory {
    /// Format is in neither known set; the transcoder decides
    UnrecognizedFormat(String),
    /// A non-default bitrate was requested for a video format
    QualityIgnored { format: String, quality: Quality },
}

impl Advisory {
    /// Collect the advisories for a classified request
    pub fn for_request(format: &FormatToken, family: FormatFamily, quality: Quality) -> Vec<Self> {
        let mut advisories = Vec::new();
        match family {
            FormatFamily::Unrecognized => {
                advisories.push(Advisory::UnrecognizedFormat(format.to_string()));
            }
            FormatFamily::Video if !quality.is_default() => {
                advisories.push(Advisory::QualityIgnored {
                    format: format.to_string(),
                    quality,
                });
            }
            FormatFamily::Audio | FormatFamily::Video => {}
        }
        advisories
    }
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Advisory::UnrecognizedFormat(format) => write!(
                f,
                "Warning: '{}' may not be supported; ensure FFmpeg has it.",
                format
            ),
            Advisory::QualityIgnored { format, quality } => write!(
                f,
                "Note: --quality {} is ignored for video ({}) downloads.",
                quality, format
            ),
        }
    }
}
