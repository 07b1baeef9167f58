//! Web Screenshot — application entry point.
//!
//! This is the app shell that wires together:
//! - Capture pipeline (capture/)
//! - OS-backed collaborators (native/)
//! - Configuration (config.rs)
//! - The one-button page (ui.rs)

pub mod capture;
pub mod config;
pub mod native;
pub mod ui;

use capture::CaptureController;
use config::AppConfig;
use native::{Consent, FileDownloader, NativePlatform};
use std::process::ExitCode;
use ui::ScreenshotPage;

type NativeController = CaptureController<NativePlatform, FileDownloader>;

/// What the user asked for at the prompt.
enum Command {
    Capture,
    Quit,
}

/// Entry point — called by `main`.
pub fn run() -> ExitCode {
    // .env first so RUST_LOG and WEB_SCREENSHOT_* from it take effect.
    let _ = dotenvy::dotenv();
    env_logger::init();

    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            log::error!("[CONFIG] {} — falling back to defaults", e);
            AppConfig::default()
        }
    };

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            log::error!("Failed to start async runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let consent = if config.assume_consent {
        Consent::Granted
    } else {
        Consent::Prompt
    };
    let controller = CaptureController::new(
        NativePlatform::new(config.monitor.clone(), consent),
        FileDownloader::new(config.output_dir()),
    )
    .with_frame_timeout(config.frame_timeout());

    log::info!(
        "Web Screenshot starting up — saving to {}",
        controller.downloader().dir().display()
    );

    runtime.block_on(event_loop(&controller, &config))
}

async fn event_loop(controller: &NativeController, config: &AppConfig) -> ExitCode {
    let mut page = ScreenshotPage::new();

    loop {
        println!("{}", page.render());

        match read_command().await {
            Ok(Command::Capture) => {
                page.take_screenshot(controller, &config.capture, &config.file_name)
                    .await;
            }
            Ok(Command::Quit) => break,
            Err(e) => {
                log::error!("Failed to read from terminal: {}", e);
                return ExitCode::FAILURE;
            }
        }
    }

    log::info!("Web Screenshot shutting down");
    ExitCode::SUCCESS
}

async fn read_command() -> std::io::Result<Command> {
    let line = tokio::task::spawn_blocking(|| {
        let mut line = String::new();
        std::io::stdin().read_line(&mut line).map(|n| (n, line))
    })
    .await
    .map_err(std::io::Error::other)??;

    Ok(match line {
        (0, _) => Command::Quit,
        (_, text) if text.trim().eq_ignore_ascii_case("q") => Command::Quit,
        _ => Command::Capture,
    })
}
