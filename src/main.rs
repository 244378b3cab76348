//! Implexa Site Host
//!
//! Serves the built browser bundle with SPA fallback and health endpoints.

use clap::Parser;
use std::path::PathBuf;

use implexa::config::Config;

#[derive(Parser)]
#[command(name = "implexa")]
#[command(about = "Implexa website host", version)]
struct Args {
    /// Path to config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override server.port
    #[arg(short, long)]
    port: Option<u16>,

    /// Override server.static_dir
    #[arg(long)]
    static_dir: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(dir) = args.static_dir {
        config.server.static_dir = dir;
    }

    implexa::telemetry::init_tracing(&config.logging)?;

    tracing::info!("Implexa site host v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Serving bundle from {:?}", config.server.static_dir);

    implexa::server::serve(config).await?;
    Ok(())
}
