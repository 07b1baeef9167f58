//! Failure taxonomy and the per-call result shown to the user.

use super::platform::PlatformError;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CaptureError {
    /// Display capture is missing from the host. Nothing was acquired.
    #[error("{host} does not support getDisplayMedia()")]
    CapabilityUnavailable { host: String },

    /// The user declined the consent prompt or the platform refused.
    #[error("{0}")]
    PermissionDenied(PlatformError),

    /// A granted stream never produced a renderable frame.
    #[error("{0}")]
    CaptureRejected(PlatformError),

    #[error("Failed to render screenshot: {0}")]
    RenderFailure(PlatformError),

    #[error("No video frame arrived within {0}ms")]
    FrameTimeout(u64),
}

impl CaptureError {
    pub fn kind(&self) -> &'static str {
        match self {
            CaptureError::CapabilityUnavailable { .. } => "CapabilityUnavailable",
            CaptureError::PermissionDenied(_) => "PermissionDenied",
            CaptureError::CaptureRejected(_) => "CaptureRejected",
            CaptureError::RenderFailure(_) => "RenderFailure",
            CaptureError::FrameTimeout(_) => "FrameTimeout",
        }
    }

    /// Diagnostic text beyond the short message, if the platform gave any.
    pub fn detail(&self) -> Option<String> {
        match self {
            CaptureError::PermissionDenied(e)
            | CaptureError::CaptureRejected(e)
            | CaptureError::RenderFailure(e) => e.detail.clone(),
            CaptureError::CapabilityUnavailable { .. } | CaptureError::FrameTimeout(_) => None,
        }
    }
}

/// Result of one `capture_screen` call. Exactly one side is populated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum CaptureOutcome {
    Success {
        file_name: String,
    },
    Failure {
        message: String,
        detail: Option<String>,
    },
}

impl CaptureOutcome {
    pub fn success(file_name: impl Into<String>) -> Self {
        CaptureOutcome::Success {
            file_name: file_name.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, CaptureOutcome::Success { .. })
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            CaptureOutcome::Failure { message, .. } => Some(message.as_str()),
            CaptureOutcome::Success { .. } => None,
        }
    }
}

impl From<CaptureError> for CaptureOutcome {
    fn from(err: CaptureError) -> Self {
        CaptureOutcome::Failure {
            message: err.to_string(),
            detail: err.detail(),
        }
    }
}
