//! Liveness endpoint

use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

/// Body served by `/health`
#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    /// Always "healthy" while the process accepts traffic
    pub status: &'static str,
    /// Crate version baked in at build time
    pub version: &'static str,
}

/// Liveness check. Touches no dependencies; a 200 only means the process
/// is up and serving.
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Process is up", body = HealthResponse)
    )
)]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn reports_healthy_with_crate_version() {
        let Json(body) = health_check().await;

        assert_eq!(body.status, "healthy");
        assert_eq!(body.version, env!("CARGO_PKG_VERSION"));
    }
}
