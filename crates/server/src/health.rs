use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use chrono::Utc;
use serde::Serialize;

#[derive(Clone, Copy)]
pub struct HealthState {
    pub providers: usize,
    pub vectors: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthCheck {
    pub status: &'static str,
    pub detail: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: HealthCheck,
    pub catalog: HealthCheck,
    pub providers: usize,
    pub checked_at: String,
}

pub fn router(state: HealthState) -> Router {
    Router::new().route("/health", get(health)).with_state(state)
}

pub async fn health(State(state): State<HealthState>) -> (StatusCode, Json<HealthResponse>) {
    let catalog = if state.vectors > 0 {
        HealthCheck {
            status: "ready",
            detail: format!("{} room vectors loaded", state.vectors),
        }
    } else {
        HealthCheck { status: "degraded", detail: "no room vectors loaded".to_string() }
    };
    let ready = catalog.status == "ready";

    let payload = HealthResponse {
        status: if ready { "ready" } else { "degraded" },
        service: HealthCheck {
            status: "ready",
            detail: "roomscout-server runtime initialized".to_string(),
        },
        catalog,
        providers: state.providers,
        checked_at: Utc::now().to_rfc3339(),
    };

    let status_code = if ready { StatusCode::OK } else { StatusCode::SERVICE_UNAVAILABLE };
    (status_code, Json(payload))
}

#[cfg(test)]
mod tests {
    use axum::{extract::State, http::StatusCode, Json};

    use super::{health, HealthState};

    #[tokio::test]
    async fn health_reports_ready_with_a_loaded_catalog() {
        let (status, Json(payload)) =
            health(State(HealthState { providers: 3, vectors: 12 })).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload.status, "ready");
        assert_eq!(payload.providers, 3);
        assert_eq!(payload.catalog.status, "ready");
    }

    #[tokio::test]
    async fn health_degrades_without_catalog_vectors() {
        let (status, Json(payload)) =
            health(State(HealthState { providers: 3, vectors: 0 })).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(payload.status, "degraded");
        assert_eq!(payload.service.status, "ready");
    }
}
