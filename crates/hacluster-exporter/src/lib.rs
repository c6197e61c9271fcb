//! hacluster-exporter — HTTP surface of the HA cluster exporter.
//!
//! Wires the enabled collectors into a [`CollectorRegistry`] and serves it
//! over axum.
//!
//! # Routes
//!
//! | Method | Path | Description |
//! |---|---|---|
//! | GET | `/` | Landing page |
//! | GET | `/metrics` | Prometheus exposition, collected on demand |

pub mod handlers;

use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use axum::routing::get;
use hacluster_core::ExporterConfig;
use hacluster_drbd::DrbdCollector;
use hacluster_metrics::CollectorRegistry;
use hacluster_pacemaker::PacemakerCollector;
use tracing::info;

/// Build the exporter router.
pub fn build_router(registry: Arc<CollectorRegistry>) -> Router {
    Router::new()
        .route("/", get(handlers::landing_page))
        .route("/metrics", get(handlers::prometheus_metrics))
        .with_state(registry)
}

/// Construct every collector enabled in `config`.
///
/// A collector whose tools are missing is an error; disabled collectors
/// are skipped without looking at their tools.
pub fn build_registry(config: &ExporterConfig) -> anyhow::Result<CollectorRegistry> {
    let mut registry = CollectorRegistry::new();

    if config.collectors.pacemaker {
        let collector = PacemakerCollector::new(&config.crm_mon_path, &config.cibadmin_path)
            .context("could not initialize the pacemaker collector")?;
        registry.register(Box::new(collector));
    } else {
        info!("pacemaker collector disabled");
    }

    if config.collectors.drbd {
        let collector = DrbdCollector::new(&config.drbdsetup_path, &config.drbd_split_brain_path)
            .context("could not initialize the drbd collector")?;
        registry.register(Box::new(collector));
    } else {
        info!("drbd collector disabled");
    }

    Ok(registry)
}
