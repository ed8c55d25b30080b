// Domain models - Core types and data structures

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;

/// Canonical second offset decoded from a [`TimeSpec`]
pub type Seconds = u64;

/// Bitrates (kbps) accepted for audio extraction
pub const SUPPORTED_QUALITIES: [u16; 4] = [128, 192, 256, 320];

/// Bitrate used when none is requested
pub const DEFAULT_QUALITY_KBPS: u16 = 192;

/// Output format used when none is requested
pub const DEFAULT_FORMAT: &str = "mp3";

/// Output template used when none is requested
pub const DEFAULT_OUTPUT_TEMPLATE: &str = "%(title)s.%(ext)s";

/// User-entered duration in `SS`, `MM:SS` or `HH:MM:SS` form.
///
/// Components are unsigned base-10 integers. Minutes and seconds are bounded
/// by 60 whenever a more significant component exists; a lone seconds
/// component is unbounded, as are hours. Each component must fit in a `u32`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeSpec {
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
}

impl TimeSpec {
    /// Create a new TimeSpec from hours, minutes and seconds
    pub fn from_components(hours: u32, minutes: u32, seconds: u32) -> Self {
        Self {
            hours,
            minutes,
            seconds,
        }
    }

    /// Parse a raw time string
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let parts: Vec<&str> = raw.split(':').collect();
        if parts.len() > 3 {
            return Err(DomainError::time_format(raw, "too many components"));
        }

        let mut values = Vec::with_capacity(parts.len());
        for part in &parts {
            if part.is_empty() {
                return Err(DomainError::time_format(raw, "empty component"));
            }
            if !part.chars().all(|c| c.is_ascii_digit()) {
                return Err(DomainError::time_format(raw, "components must be digits"));
            }
            let value = part
                .parse::<u32>()
                .map_err(|_| DomainError::time_format(raw, "component out of range"))?;
            values.push(value);
        }

        let spec = match values.as_slice() {
            [s] => Self::from_components(0, 0, *s),
            [m, s] => Self::from_components(0, *m, *s),
            [h, m, s] => Self::from_components(*h, *m, *s),
            _ => return Err(DomainError::time_format(raw, "wrong number of components")),
        };

        if values.len() >= 2 {
            if spec.minutes >= 60 {
                return Err(DomainError::time_format(raw, "minutes must be less than 60"));
            }
            if spec.seconds >= 60 {
                return Err(DomainError::time_format(raw, "seconds must be less than 60"));
            }
        }

        Ok(spec)
    }

    /// Total offset in seconds
    pub fn as_seconds(&self) -> Seconds {
        self.hours as u64 * 3600 + self.minutes as u64 * 60 + self.seconds as u64
    }
}

impl FromStr for TimeSpec {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Parse a raw time string straight to its second offset
pub fn parse_seconds(raw: &str) -> Result<Seconds, DomainError> {
    TimeSpec::parse(raw).map(|spec| spec.as_seconds())
}

/// Requested clip window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum ClipWindow {
    /// Download the whole media item
    Unclipped,
    /// Download `[start, end)`; `end` absent means to the end of the media
    Range { start: Seconds, end: Option<Seconds> },
}

impl ClipWindow {
    pub fn is_clipped(&self) -> bool {
        matches!(self, ClipWindow::Range { .. })
    }

    pub fn start(&self) -> Option<Seconds> {
        match self {
            ClipWindow::Unclipped => None,
            ClipWindow::Range { start, .. } => Some(*start),
        }
    }

    pub fn end(&self) -> Option<Seconds> {
        match self {
            ClipWindow::Unclipped => None,
            ClipWindow::Range { end, .. } => *end,
        }
    }
}

/// Audio bitrate in kbps, restricted to [`SUPPORTED_QUALITIES`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct Quality(u16);

impl Quality {
    pub fn new(kbps: u16) -> Result<Self, DomainError> {
        if SUPPORTED_QUALITIES.contains(&kbps) {
            Ok(Self(kbps))
        } else {
            Err(DomainError::InvalidQuality(kbps.to_string()))
        }
    }

    pub fn kbps(&self) -> u16 {
        self.0
    }

    pub fn is_default(&self) -> bool {
        self.0 == DEFAULT_QUALITY_KBPS
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(DEFAULT_QUALITY_KBPS)
    }
}

impl FromStr for Quality {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let kbps = s
            .trim()
            .parse::<u16>()
            .map_err(|_| DomainError::InvalidQuality(s.to_string()))?;
        Self::new(kbps).map_err(|_| DomainError::InvalidQuality(s.to_string()))
    }
}

impl TryFrom<u16> for Quality {
    type Error = DomainError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Quality> for u16 {
    fn from(quality: Quality) -> Self {
        quality.0
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Output format identifier, normalised to lowercase
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormatToken(String);

impl FormatToken {
    pub fn new(raw: &str) -> Self {
        Self(raw.trim().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for FormatToken {
    fn default() -> Self {
        Self::new(DEFAULT_FORMAT)
    }
}

impl fmt::Display for FormatToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Processing family a format belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormatFamily {
    Audio,
    Video,
    Unrecognized,
}

/// User download intent as entered on the command line
#[derive(Debug, Clone, PartialEq)]
pub struct DownloadRequest {
    pub url: String,
    pub format: FormatToken,
    pub quality: Quality,
    pub output_template: String,
    pub start: Option<String>,
    pub end: Option<String>,
}

impl DownloadRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            format: FormatToken::default(),
            quality: Quality::default(),
            output_template: DEFAULT_OUTPUT_TEMPLATE.to_string(),
            start: None,
            end: None,
        }
    }

    pub fn with_format(mut self, format: &str) -> Self {
        self.format = FormatToken::new(format);
        self
    }

    pub fn with_quality(mut self, quality: Quality) -> Self {
        self.quality = quality;
        self
    }

    pub fn with_output(mut self, template: impl Into<String>) -> Self {
        self.output_template = template.into();
        self
    }

    pub fn with_clip(mut self, start: Option<&str>, end: Option<&str>) -> Self {
        self.start = start.map(str::to_string);
        self.end = end.map(str::to_string);
        self
    }

    /// URL with surrounding whitespace removed, or `EmptyInput`
    pub fn validated_url(&self) -> Result<&str, DomainError> {
        let url = self.url.trim();
        if url.is_empty() {
            return Err(DomainError::EmptyInput);
        }
        Ok(url)
    }
}

/// Source stream selection policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreamSelection {
    /// Best video plus best audio, falling back to the best combined stream
    BestVideoAndAudio,
    /// Best audio-only stream, falling back to the best overall
    BestAudio,
}

impl StreamSelection {
    /// Engine format selector expression
    pub fn selector(&self) -> &'static str {
        match self {
            StreamSelection::BestVideoAndAudio => "bv*+ba/b",
            StreamSelection::BestAudio => "bestaudio/best",
        }
    }
}

/// One postprocessing step applied by the engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "step")]
pub enum Postprocessor {
    ExtractAudio { codec: String, bitrate_kbps: u16 },
    RemuxVideo { container: String },
}

/// Trim directive attached when a clip window was requested
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClipDirective {
    pub start: Seconds,
    /// `None` means to the end of the media
    pub end: Option<Seconds>,
    pub snap_to_keyframes: bool,
}

impl ClipDirective {
    /// Section expression understood by the engine, e.g. `*60-120`
    pub fn section(&self) -> String {
        match self.end {
            Some(end) => format!("*{}-{}", self.start, end),
            None => format!("*{}-inf", self.start),
        }
    }
}

/// Flags set on every plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafetyFlags {
    pub no_playlist: bool,
    pub restrict_filenames: bool,
    pub quiet: bool,
    pub no_warnings: bool,
}

impl Default for SafetyFlags {
    fn default() -> Self {
        Self {
            no_playlist: true,
            restrict_filenames: true,
            quiet: false,
            no_warnings: true,
        }
    }
}

/// Complete configuration for one engine invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionPlan {
    pub family: FormatFamily,
    pub stream_selection: StreamSelection,
    /// Container for merged streams; video path only
    pub merge_output_format: Option<String>,
    pub postprocessors: Vec<Postprocessor>,
    pub output_template: String,
    pub clip: Option<ClipDirective>,
    pub safety: SafetyFlags,
}

#[cfg(test)]
mod tests;
