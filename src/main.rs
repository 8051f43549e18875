use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use datachat::cli::Cli;
use datachat::config::Config;
use datachat::server;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Cli::parse();

    let mut cfg = Config::load();
    if let Some(host) = args.host {
        cfg.set("HOST", host);
    }
    if let Some(port) = args.port {
        cfg.set("PORT", port.to_string());
    }
    if let Some(model) = args.model {
        cfg.set("DEFAULT_MODEL", model);
    }
    if let Some(dir) = args.plot_dir {
        cfg.set("PLOT_DIR", dir);
    }
    if let Some(dir) = args.upload_dir {
        cfg.set("UPLOAD_DIR", dir);
    }

    info!("datachat v{} starting", env!("CARGO_PKG_VERSION"));
    server::run(cfg).await
}
