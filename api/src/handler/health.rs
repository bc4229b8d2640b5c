use axum::{extract::State, http::StatusCode};
use registry::AppRegistry;

pub async fn health_check(State(registry): State<AppRegistry>) -> StatusCode {
    if registry.health_check_repository().check_db().await {
        StatusCode::OK
    } else {
        tracing::warn!("health check failed: storage is unreachable");
        StatusCode::SERVICE_UNAVAILABLE
    }
}
