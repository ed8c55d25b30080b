//! Time formatting utilities

use crate::domain::model::{ClipWindow, Seconds};

/// Format seconds as `H:MM:SS`, or `MM:SS` below one hour
pub fn format_seconds(seconds: Seconds) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{:02}:{:02}", minutes, secs)
    }
}

/// Human-readable description of a clip window
pub fn describe_clip(clip: &ClipWindow) -> String {
    if !clip.is_clipped() {
        return "full length".to_string();
    }
    let start = format_seconds(clip.start().unwrap_or_default());
    match clip.end() {
        Some(end) => format!("{} - {}", start, format_seconds(end)),
        None => format!("{} - end", start),
    }
}
