#![cfg(not(tarpaulin_include))]

use catalog_filler::app;
use catalog_filler::config::Config;
use std::env;

/// Main entry point for the web application
///
/// # Arguments
/// * Optional first argument: path to a JSON config file. Without it the
///   `FILLER_CONFIG` environment variable is consulted, then the defaults.
///
/// # Environment
/// * `RUST_LOG` - log filter, `info` when unset
/// * `FILLER_ADDR` - overrides the configured bind address
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().collect();
    let config = Config::from_env(args.get(1).map(String::as_str))?;
    config.validate()?;

    app::run(config).await
}
