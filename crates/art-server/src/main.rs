use std::path::PathBuf;

use anyhow::Context;
use art_core::Config;
use art_server::logging::init_logging;
use art_server::{run_server, AppState};
use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(name = "art-server")]
#[command(about = "Artwork lineage HTTP server")]
#[command(version)]
struct Cli {
    /// Enable debug mode
    #[arg(long, env = "DEBUG", default_value = "false")]
    debug: bool,

    /// Server port
    #[arg(long, env = "PORT", default_value = "8090")]
    port: u16,

    /// Bind address
    #[arg(long, env = "BIND_ADDRESS", default_value = "127.0.0.1")]
    bind: String,

    /// Data directory (collections and generated images)
    #[arg(long, env = "ARTISELF_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Config file (JSON or TOML); defaults to ~/.artiself/config.json or ./config.toml
    #[arg(long, env = "ARTISELF_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (overrides debug flag)
    #[arg(long, env = "RUST_LOG")]
    log_level: Option<String>,
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(cli.debug, cli.log_level.as_deref());

    let mut config = match &cli.config {
        Some(path) => {
            let mut config = Config::from_file(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?;
            config.apply_env(|key| std::env::var(key).ok());
            config
        }
        None => Config::load(),
    };
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = Some(data_dir);
    }

    let data_dir = config.data_dir();
    std::fs::create_dir_all(config.generated_images_dir())
        .with_context(|| format!("Failed to create data directory {}", data_dir.display()))?;

    log::info!("Starting art-server on {}:{}", cli.bind, cli.port);
    log::info!("  Data dir: {}", data_dir.display());
    log::info!("  Refinement model: {}", config.refinement.model);
    log::info!("  Generation model: {}", config.generation.model);
    log::debug!("  Fallback image: {}", config.fallback_image);

    let state = AppState::from_config(&config).context("Failed to initialize services")?;
    run_server(state, &cli.bind, cli.port).await?;
    Ok(())
}
