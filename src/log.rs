//! Logging utilities

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Environment variable holding tracing filter directives
const LOG_ENV: &str = "GAMIX_LOG";

pub(crate) fn parse_log_level() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        // .json()
        .init();
    info!("Initialised logger: welcome to gamix!");
}

/// Create an oops (a fatal crash) with an associated error message
pub(crate) fn oops<S: Into<String>>(msg: S, code: u16) -> ! {
    error!("{}", msg.into());
    std::process::exit(code.into());
}
