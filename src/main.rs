mod analytics;
mod budget;
mod config;
mod error;
mod format;
mod models;
mod run;
mod store;

use anyhow::Result;

fn main() -> Result<()> {
    config::init_logging();

    let mut args: Vec<String> = std::env::args().collect();
    let config = config::Config::from_args(&mut args)?;
    tracing::debug!(data_dir = %config.data_dir.display(), "resolved configuration");

    run::as_cli(&args, &config)
}
