//! ha_cluster_exporter — Prometheus exporter for Pacemaker and DRBD.
//!
//! # Usage
//!
//! ```text
//! ha_cluster_exporter --port 9664 --config /etc/ha_cluster_exporter.toml
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use hacluster_core::ExporterConfig;
use hacluster_exporter::{build_registry, build_router};
use tracing::info;

#[derive(Parser)]
#[command(name = "ha_cluster_exporter", version, about = "Prometheus exporter for HA clusters")]
struct Cli {
    /// Config file; defaults to /etc/ha_cluster_exporter.toml when present.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Address to listen on.
    #[arg(long)]
    address: Option<String>,

    /// Port to listen on.
    #[arg(long)]
    port: Option<u16>,

    /// One of error, warn, info, debug, trace.
    #[arg(long)]
    log_level: Option<String>,

    #[arg(long)]
    crm_mon_path: Option<PathBuf>,

    #[arg(long)]
    cibadmin_path: Option<PathBuf>,

    #[arg(long)]
    drbdsetup_path: Option<PathBuf>,

    /// Directory holding the DRBD split-brain marker files.
    #[arg(long)]
    drbd_split_brain_path: Option<PathBuf>,
}

impl Cli {
    fn apply(self, config: &mut ExporterConfig) {
        if let Some(address) = self.address {
            config.address = address;
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(log_level) = self.log_level {
            config.log_level = log_level;
        }
        if let Some(path) = self.crm_mon_path {
            config.crm_mon_path = path;
        }
        if let Some(path) = self.cibadmin_path {
            config.cibadmin_path = path;
        }
        if let Some(path) = self.drbdsetup_path {
            config.drbdsetup_path = path;
        }
        if let Some(path) = self.drbd_split_brain_path {
            config.drbd_split_brain_path = path;
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = ExporterConfig::load(cli.config.as_deref())?;
    cli.apply(&mut config);
    config.validate()?;

    let level = &config.log_level;
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new(format!(
                    "info,ha_cluster_exporter={level},hacluster={level}"
                ))
            }),
        )
        .init();

    info!(version = env!("CARGO_PKG_VERSION"), "HA cluster exporter starting");

    let registry = Arc::new(build_registry(&config)?);
    let router = build_router(registry);
    let addr = config.listen_addr()?;

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "serving metrics");

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "could not install the ctrl-c handler");
                std::future::pending::<()>().await;
            }
            info!("shutdown signal received");
        })
        .await?;

    info!("HA cluster exporter stopped");
    Ok(())
}
