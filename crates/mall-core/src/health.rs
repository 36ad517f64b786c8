use std::future::Future;

use axum::extract::State;
use axum::http::StatusCode;

/// Dependency check backing `GET /readyz`.
pub trait ReadinessProbe: Clone + Send + Sync + 'static {
    /// Returns `true` when every backing store answers.
    fn ready(&self) -> impl Future<Output = bool> + Send;
}

/// Handler for `GET /healthz`: liveness check.
pub async fn healthz() -> StatusCode {
    StatusCode::OK
}

/// Handler for `GET /readyz`: 200 when the probe passes, 503 otherwise.
pub async fn readyz<P: ReadinessProbe>(State(probe): State<P>) -> StatusCode {
    if probe.ready().await {
        StatusCode::OK
    } else {
        tracing::warn!("readiness probe failed");
        StatusCode::SERVICE_UNAVAILABLE
    }
}
