//! ciliumd policy daemon
//!
//! - Strict YAML config (first argument, default `ciliumd.yaml`)
//! - Optional policy import at the tree root
//! - Runs until ctrl-c

use tracing_subscriber::{fmt, EnvFilter};

use ciliumd_core::error::{CiliumError, Result};
use ciliumd_daemon::{config, Daemon};

#[tokio::main]
async fn main() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let path = std::env::args().nth(1).unwrap_or_else(|| "ciliumd.yaml".into());
    if let Err(e) = run(&path).await {
        tracing::error!(error = %e, config = %path, "ciliumd failed");
        std::process::exit(1);
    }
}

async fn run(path: &str) -> Result<()> {
    let cfg = config::load_from_file(path)?;
    let daemon = Daemon::new(cfg)?;

    tracing::info!(
        root = %daemon.policy().prefix(),
        max_set_of_labels = daemon.cfg().labels.max_set_of_labels,
        "ciliumd starting"
    );

    tokio::signal::ctrl_c()
        .await
        .map_err(|e| CiliumError::Internal(format!("wait for shutdown signal failed: {e}")))?;

    tracing::info!("ciliumd shutting down");
    Ok(())
}
