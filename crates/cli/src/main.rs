use std::process::ExitCode;

use orgflow_core::config::{AppConfig, LoadOptions};

fn main() -> ExitCode {
    // Logging is best-effort here: commands report config problems
    // themselves with proper exit codes.
    let logging = AppConfig::load(LoadOptions::default())
        .map(|config| config.logging)
        .unwrap_or_else(|_| AppConfig::default().logging);
    orgflow_cli::logging::init(&logging);

    orgflow_cli::run()
}
