use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use engine_logging::{engine_info, engine_warn};
use tabmate_server::config::DEFAULT_CONFIG_PATH;
use tabmate_server::{cors_layer, router, AppConfig, AppState};

#[derive(Debug, Parser)]
#[command(name = "tabmate", about = "Categorize browser tabs and filter them by command")]
struct Args {
    /// Path to the YAML configuration file.
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,
    /// Overrides `server.bind`.
    #[arg(long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let dotenv_loaded = dotenv::dotenv().is_ok();
    let args = Args::parse();

    let mut config = AppConfig::load(&args.config)
        .with_context(|| format!("loading {}", args.config.display()))?;
    if let Some(bind) = args.bind {
        config.server.bind = bind;
    }
    engine_logging::initialize(&config.logging);
    if !dotenv_loaded {
        engine_warn!("No .env file found; using the process environment only");
    }

    let addr = config.server.socket_addr()?;
    let state = AppState::from_config(&config, tokio::runtime::Handle::current())?;
    let app = router(state, cors_layer(&config.server.allowed_origin)?);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    engine_info!("TabMate listening on {} (model {})", addr, config.llm.model);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    engine_info!("TabMate stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        engine_warn!("Failed to listen for shutdown signal: {}", err);
    }
}
