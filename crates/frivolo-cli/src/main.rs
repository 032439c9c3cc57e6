use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use frivolo_infrastructure::ConfigService;

mod backend;
mod command;
mod helper;
mod logging;
mod render;
mod repl;

#[derive(Parser)]
#[command(name = "frivolo")]
#[command(about = "Frivolo - how many hours of work does this really cost?", long_about = None)]
struct Cli {
    /// Path to config.toml (defaults to the platform config directory)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory for the identity and cached profile
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Keep everything in memory even when a backend is configured
    #[arg(long)]
    offline: bool,

    /// Emit logs as JSON lines on stderr
    #[arg(long)]
    log_json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_service = match &cli.config {
        Some(path) => ConfigService::with_path(path),
        None => ConfigService::new(),
    };
    let mut config = config_service.get_config()?;
    if let Some(dir) = cli.data_dir {
        config.storage.data_dir = Some(dir);
    }

    logging::init(&config.logging.level, cli.log_json)?;

    let (flow, mode) = backend::build_flow(&config, cli.offline)?;
    let mut repl = repl::Repl::new(flow, mode)?;
    repl.run().await
}
