fn main() -> std::process::ExitCode {
    web_screenshot_lib::run()
}
