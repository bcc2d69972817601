use axum::{
    extract::{Path, State},
    routing::{get, post, put},
    Json, Router,
};
use dashboard_core::ApiKeys;
use serde::Deserialize;

use crate::{ApiResponse, ApiResult, AppState};

#[derive(Deserialize)]
pub struct SetCredentialRequest {
    pub value: String,
}

pub fn settings_routes() -> Router<AppState> {
    Router::new()
        .route("/api/settings/credentials", get(get_credentials))
        .route("/api/settings/credentials/reset", post(reset_credentials))
        .route("/api/settings/credentials/:name", put(set_credential))
        .route("/api/settings/clear", post(clear_data))
}

/// Values are masked
async fn get_credentials(State(state): State<AppState>) -> ApiResult<ApiKeys> {
    Ok(Json(ApiResponse::success(state.context.credentials().await)))
}

async fn set_credential(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(req): Json<SetCredentialRequest>,
) -> ApiResult<ApiKeys> {
    state.context.set_credential_named(&name, req.value).await?;
    Ok(Json(ApiResponse::success(state.context.credentials().await)))
}

async fn reset_credentials(State(state): State<AppState>) -> ApiResult<ApiKeys> {
    state.context.reset_credentials().await?;
    Ok(Json(ApiResponse::success(state.context.credentials().await)))
}

async fn clear_data(State(state): State<AppState>) -> ApiResult<()> {
    state.context.clear_data().await?;
    Ok(Json(ApiResponse::success(())))
}
