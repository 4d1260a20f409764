mod catalogue;
mod config;
mod reporters;
mod walkthrough;

use std::path::PathBuf;

use loadkit_logging::loadkit_info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(config::CONFIG_FILENAME));
    let config = config::load(&config_path)?;

    if !loadkit_logging::initialize(config.log_destination(), config.log_level()) {
        eprintln!("Warning: logging is disabled");
    }
    loadkit_info!("loaded configuration from {:?}", config_path);

    let dependencies = reporters::dependencies(&config);
    let summary = walkthrough::run(&config, &dependencies).await?;
    println!("{summary}");
    Ok(())
}
