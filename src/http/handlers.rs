//! Built-in request handlers.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::app::{AppSummary, Applications};
use crate::config::ServiceConfig;

/// State shared by the built-in handlers.
#[derive(Clone)]
pub struct HandlerState {
    pub core: Arc<ServiceConfig>,
    pub applications: Arc<Applications>,
}

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ServiceInfo {
    pub service_name: String,
    pub service_url: String,
    pub version: &'static str,
}

/// `200 ready` once applications are initialized, `503 starting` before.
pub async fn get_health(State(state): State<HandlerState>) -> (StatusCode, Json<HealthStatus>) {
    if state.applications.is_ready() {
        (StatusCode::OK, Json(HealthStatus { status: "ready" }))
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(HealthStatus { status: "starting" }),
        )
    }
}

pub async fn get_info(State(state): State<HandlerState>) -> Json<ServiceInfo> {
    Json(ServiceInfo {
        service_name: state.core.service_name.clone(),
        service_url: state.core.service_url.clone(),
        version: env!("CARGO_PKG_VERSION"),
    })
}

pub async fn get_apps(State(state): State<HandlerState>) -> Json<Vec<AppSummary>> {
    Json(state.applications.list())
}
