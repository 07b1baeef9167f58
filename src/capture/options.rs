//! Capture options and the constraints handed to the platform.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Cursor-inclusion policy for the captured video.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CursorPolicy {
    Always,
    Motion,
    #[default]
    Never,
}

impl CursorPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            CursorPolicy::Always => "always",
            CursorPolicy::Motion => "motion",
            CursorPolicy::Never => "never",
        }
    }
}

impl fmt::Display for CursorPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CursorPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "always" => Ok(CursorPolicy::Always),
            "motion" => Ok(CursorPolicy::Motion),
            "never" => Ok(CursorPolicy::Never),
            other => Err(format!(
                "Unknown cursor policy '{}' (expected always, motion or never)",
                other
            )),
        }
    }
}

/// User-facing capture configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureOptions {
    /// Request system audio alongside the video.
    pub audio: bool,
    pub cursor: CursorPolicy,
}

impl CaptureOptions {
    /// Builds the constraint set passed to `CapturePlatform::get_display_media`.
    pub fn constraints(&self) -> DisplayMediaConstraints {
        DisplayMediaConstraints {
            audio: self.audio,
            video: VideoConstraints {
                cursor: self.cursor,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DisplayMediaConstraints {
    pub audio: bool,
    pub video: VideoConstraints,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VideoConstraints {
    pub cursor: CursorPolicy,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_disable_audio_and_cursor() {
        let opts = CaptureOptions::default();
        assert!(!opts.audio);
        assert_eq!(opts.cursor, CursorPolicy::Never);
    }

    #[test]
    fn constraints_nest_cursor_under_video() {
        let opts = CaptureOptions {
            audio: true,
            cursor: CursorPolicy::Motion,
        };
        let json = serde_json::to_value(opts.constraints()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "audio": true, "video": { "cursor": "motion" } })
        );
    }

    #[test]
    fn partial_options_fill_in_defaults() {
        let opts: CaptureOptions = serde_json::from_str(r#"{ "cursor": "always" }"#).unwrap();
        assert!(!opts.audio);
        assert_eq!(opts.cursor, CursorPolicy::Always);
    }

    #[test]
    fn cursor_policy_parses_case_insensitively() {
        assert_eq!(" Always ".parse::<CursorPolicy>(), Ok(CursorPolicy::Always));
        assert!("sometimes".parse::<CursorPolicy>().is_err());
    }
}
