//! App configuration — JSON file plus environment overrides.
//!
//! The file lives in the platform-appropriate config directory:
//!   macOS:   ~/Library/Application Support/web-screenshot/config.json
//!   Linux:   ~/.config/web-screenshot/config.json
//!   Windows: %APPDATA%/web-screenshot/config.json
//!
//! `WEB_SCREENSHOT_*` variables (optionally from a `.env` file) win over the file.

use crate::capture::{CaptureOptions, CursorPolicy, DEFAULT_FILE_NAME};
use crate::native::default_download_dir;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub capture: CaptureOptions,
    pub file_name: String,
    /// Where downloads land. Defaults to the user's downloads directory.
    pub output_dir: Option<PathBuf>,
    /// Case-insensitive monitor name fragment. Defaults to the primary monitor.
    pub monitor: Option<String>,
    /// Upper bound on the first-frame wait. Absent means wait indefinitely.
    pub frame_timeout_ms: Option<u64>,
    pub assume_consent: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            capture: CaptureOptions::default(),
            file_name: DEFAULT_FILE_NAME.to_string(),
            output_dir: None,
            monitor: None,
            frame_timeout_ms: None,
            assume_consent: false,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid value {value:?} for {name}: {reason}")]
    InvalidVar {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// Location of the config file.
pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("web-screenshot")
        .join("config.json")
}

impl AppConfig {
    /// Loads the config file (if any), then applies process environment overrides.
    ///
    /// Only an unreadable or malformed file is an error; invalid overrides
    /// are logged and ignored.
    pub fn load() -> Result<Self, ConfigError> {
        let path = config_path();
        let mut config = Self::from_file(&path)?;
        for e in config.apply_env(|name| std::env::var(name).ok()) {
            log::warn!("[CONFIG] Ignoring override: {}", e);
        }
        log::debug!("[CONFIG] Loaded {:?}", config);
        Ok(config)
    }

    /// Reads `path`. A missing file yields the defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            log::debug!("[CONFIG] No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Applies `WEB_SCREENSHOT_*` overrides looked up through `lookup`.
    ///
    /// Each variable is applied on its own: an invalid one is skipped,
    /// keeping the current value, and returned in the error list.
    pub fn apply_env<F>(&mut self, lookup: F) -> Vec<ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut rejected = Vec::new();
        let mut keep = |result: Result<(), ConfigError>| {
            if let Err(e) = result {
                rejected.push(e);
            }
        };

        if let Some(v) = lookup("WEB_SCREENSHOT_AUDIO") {
            keep(parse_bool("WEB_SCREENSHOT_AUDIO", &v).map(|b| self.capture.audio = b));
        }
        if let Some(v) = lookup("WEB_SCREENSHOT_CURSOR") {
            keep(
                v.parse::<CursorPolicy>()
                    .map(|c| self.capture.cursor = c)
                    .map_err(|reason| ConfigError::InvalidVar {
                        name: "WEB_SCREENSHOT_CURSOR",
                        value: v.clone(),
                        reason,
                    }),
            );
        }
        if let Some(v) = lookup("WEB_SCREENSHOT_FILE_NAME") {
            if v.trim().is_empty() {
                keep(Err(ConfigError::InvalidVar {
                    name: "WEB_SCREENSHOT_FILE_NAME",
                    value: v,
                    reason: "must not be empty".to_string(),
                }));
            } else {
                self.file_name = v;
            }
        }
        if let Some(v) = lookup("WEB_SCREENSHOT_OUTPUT_DIR") {
            self.output_dir = Some(PathBuf::from(v));
        }
        if let Some(v) = lookup("WEB_SCREENSHOT_MONITOR") {
            self.monitor = Some(v);
        }
        if let Some(v) = lookup("WEB_SCREENSHOT_FRAME_TIMEOUT_MS") {
            keep(
                v.trim()
                    .parse::<u64>()
                    .map(|ms| self.frame_timeout_ms = Some(ms))
                    .map_err(|e| ConfigError::InvalidVar {
                        name: "WEB_SCREENSHOT_FRAME_TIMEOUT_MS",
                        value: v.clone(),
                        reason: e.to_string(),
                    }),
            );
        }
        if let Some(v) = lookup("WEB_SCREENSHOT_ASSUME_CONSENT") {
            keep(parse_bool("WEB_SCREENSHOT_ASSUME_CONSENT", &v).map(|b| self.assume_consent = b));
        }

        rejected
    }

    pub fn output_dir(&self) -> PathBuf {
        self.output_dir.clone().unwrap_or_else(default_download_dir)
    }

    pub fn frame_timeout(&self) -> Option<Duration> {
        self.frame_timeout_ms.map(Duration::from_millis)
    }
}

fn parse_bool(name: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidVar {
            name,
            value: value.to_string(),
            reason: "expected true or false".to_string(),
        }),
    }
}
