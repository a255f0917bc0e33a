//! Liveness endpoint.

use axum::{extract::State, Json};

use crate::http::server::AppState;
use crate::simulation::engine::now_rfc3339;
use crate::simulation::types::{HealthStatus, ServiceStatus};

const OPERATIONAL: &str = "operational";

pub async fn health_check(State(state): State<AppState>) -> Json<HealthStatus> {
    let config = state.config();
    Json(HealthStatus {
        status: "healthy".to_string(),
        timestamp: now_rfc3339(),
        uptime: state.started_at.elapsed().as_secs_f64(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        environment: config.simulation.environment.clone(),
        services: ServiceStatus {
            api: OPERATIONAL.to_string(),
            database: OPERATIONAL.to_string(),
            storage: OPERATIONAL.to_string(),
        },
    })
}
