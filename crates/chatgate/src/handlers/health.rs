use axum::Json;
use axum::extract::State;
use serde::Serialize;

use crate::server::AppState;

const NONE: &str = "none";

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    provider: String,
    model: String,
}

#[derive(Serialize)]
pub struct ProviderResponse {
    name: String,
    model: String,
    configured: bool,
}

/// GET /api/health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let active = state.chat.registry().active();

    Json(HealthResponse {
        status: "ok",
        provider: active
            .as_ref()
            .map_or_else(|| NONE.to_string(), |d| d.provider.to_string()),
        model: active.map_or_else(|| NONE.to_string(), |d| d.model.clone()),
    })
}

/// GET /api/provider
pub async fn provider_info(State(state): State<AppState>) -> Json<ProviderResponse> {
    let Some(active) = state.chat.registry().active() else {
        return Json(ProviderResponse {
            name: NONE.to_string(),
            model: NONE.to_string(),
            configured: false,
        });
    };

    Json(ProviderResponse {
        name: active.provider.to_string(),
        model: active.model.clone(),
        configured: active.is_configured(),
    })
}
