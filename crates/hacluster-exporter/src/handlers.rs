//! axum route handlers.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse};
use hacluster_metrics::CollectorRegistry;
use tracing::error;

pub const PROMETHEUS_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

const LANDING_PAGE: &str = r#"<html>
<head><title>HA Cluster Exporter</title></head>
<body>
<h1>HA Cluster Exporter</h1>
<p><a href="/metrics">Metrics</a></p>
</body>
</html>
"#;

/// GET /
pub async fn landing_page() -> Html<&'static str> {
    Html(LANDING_PAGE)
}

/// GET /metrics
///
/// Collection spawns the cluster tools, so it runs on the blocking pool.
pub async fn prometheus_metrics(State(registry): State<Arc<CollectorRegistry>>) -> impl IntoResponse {
    match tokio::task::spawn_blocking(move || registry.render()).await {
        Ok(body) => (
            StatusCode::OK,
            [("content-type", PROMETHEUS_CONTENT_TYPE)],
            body,
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "collection pass aborted");
            (StatusCode::INTERNAL_SERVER_ERROR, "collection failed").into_response()
        }
    }
}
