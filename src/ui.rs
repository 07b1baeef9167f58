//! Presentation layer — the single-page screenshot view.
//!
//! The page holds no capture state of its own: each attempt clears the
//! error, and the `CaptureOutcome` returned by the controller is applied
//! to produce the next view.

use crate::capture::{CaptureController, CaptureOptions, CaptureOutcome, CapturePlatform, Downloader};

pub const TITLE: &str = "Web Screenshot";
pub const BUTTON_LABEL: &str = "Take screenshot";
const DESCRIPTION: &str =
    "Captures your screen and saves a single frame as a PNG image. \
     You will be asked which screen to share before anything is recorded.";

/// Inline error shown under the button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorView {
    pub message: String,
    pub detail: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ScreenshotPage {
    error: Option<ErrorView>,
}

impl ScreenshotPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(&self) -> Option<&ErrorView> {
        self.error.as_ref()
    }

    /// Clears any previous error before a new attempt.
    pub fn begin_attempt(&mut self) {
        self.error = None;
    }

    /// Success shows nothing beyond the download itself.
    pub fn apply(&mut self, outcome: &CaptureOutcome) {
        self.error = match outcome {
            CaptureOutcome::Success { .. } => None,
            CaptureOutcome::Failure { message, detail } => Some(ErrorView {
                message: message.clone(),
                detail: detail.clone(),
            }),
        };
    }

    /// The "Take screenshot" action.
    pub async fn take_screenshot<P, D>(
        &mut self,
        controller: &CaptureController<P, D>,
        options: &CaptureOptions,
        file_name: &str,
    ) -> CaptureOutcome
    where
        P: CapturePlatform,
        D: Downloader,
    {
        self.begin_attempt();
        let outcome = controller.capture_screen(options, file_name).await;
        self.apply(&outcome);
        outcome
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(TITLE);
        out.push('\n');
        out.push_str(&"=".repeat(TITLE.len()));
        out.push_str("\n\n");
        out.push_str(DESCRIPTION);
        out.push_str("\n\n");
        out.push_str(&format!("[ {} ]  (Enter to capture, q to quit)\n", BUTTON_LABEL));

        if let Some(error) = &self.error {
            out.push_str(&format!("\nError: {}\n", error.message));
            if let Some(detail) = &error.detail {
                for line in detail.lines() {
                    out.push_str("    ");
                    out.push_str(line);
                    out.push('\n');
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_page_has_button_and_no_error() {
        let page = ScreenshotPage::new();
        let view = page.render();
        assert!(view.starts_with("Web Screenshot\n"));
        assert!(view.contains("[ Take screenshot ]"));
        assert!(!view.contains("Error:"));
    }

    #[test]
    fn failure_shows_message_and_detail() {
        let mut page = ScreenshotPage::new();
        page.apply(&CaptureOutcome::Failure {
            message: "Permission denied".into(),
            detail: Some("at prompt\nat capture".into()),
        });
        let view = page.render();
        assert!(view.contains("Error: Permission denied"));
        assert!(view.contains("    at prompt\n    at capture\n"));
    }

    #[test]
    fn new_attempt_clears_previous_error() {
        let mut page = ScreenshotPage::new();
        page.apply(&CaptureOutcome::Failure {
            message: "boom".into(),
            detail: None,
        });
        assert!(page.error().is_some());
        page.begin_attempt();
        assert!(page.error().is_none());
    }

    #[test]
    fn success_displays_nothing_extra() {
        let mut page = ScreenshotPage::new();
        page.apply(&CaptureOutcome::success("screenshot.png"));
        assert_eq!(page.render(), ScreenshotPage::new().render());
    }
}
