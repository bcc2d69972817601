use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use dashboard_core::{Startup, Stock};
use dashboard_state::{DashboardStatus, Recommendations, RefreshReport};
use serde::{Deserialize, Serialize};

use crate::request_id::RequestId;
use crate::{ApiResponse, ApiResult, AppState};

#[derive(Deserialize)]
pub struct StockQuery {
    /// Case-insensitive match on symbol or name
    pub q: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

pub fn market_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/api/stocks", get(list_stocks))
        .route("/api/stocks/:symbol", get(get_stock))
        .route("/api/startups", get(list_startups))
        .route("/api/recommendations", get(get_recommendations))
        .route("/api/status", get(get_status))
        .route("/api/refresh", post(refresh))
}

async fn health(Extension(RequestId(request_id)): Extension<RequestId>) -> Json<ApiResponse<HealthResponse>> {
    Json(ApiResponse::success(HealthResponse {
        status: "ok",
        request_id,
        timestamp: Utc::now(),
    }))
}

async fn list_stocks(State(state): State<AppState>, Query(query): Query<StockQuery>) -> ApiResult<Vec<Stock>> {
    let stocks = match query.q {
        Some(q) => state.context.search_stocks(&q).await,
        None => state.context.stocks().await,
    };
    Ok(Json(ApiResponse::success(stocks)))
}

async fn get_stock(State(state): State<AppState>, Path(symbol): Path<String>) -> ApiResult<Stock> {
    let stock = state.context.stock(&symbol).await?;
    Ok(Json(ApiResponse::success(stock)))
}

async fn list_startups(State(state): State<AppState>) -> ApiResult<Vec<Startup>> {
    Ok(Json(ApiResponse::success(state.context.startups().await)))
}

async fn get_recommendations(State(state): State<AppState>) -> ApiResult<Recommendations> {
    Ok(Json(ApiResponse::success(state.context.recommendations().await)))
}

async fn get_status(State(state): State<AppState>) -> ApiResult<DashboardStatus> {
    Ok(Json(ApiResponse::success(state.context.status().await)))
}

async fn refresh(State(state): State<AppState>) -> ApiResult<RefreshReport> {
    let report = state.context.refresh().await?;
    Ok(Json(ApiResponse::success(report)))
}
