use axum::{
    extract::{Path, State},
    routing::{delete, get},
    Json, Router,
};
use portfolio_manager::{Holding, NewHolding, PortfolioSummary};
use serde::Serialize;

use crate::{ApiResponse, ApiResult, AppState};

#[derive(Serialize)]
pub struct RemoveHoldingResponse {
    pub symbol: String,
    pub removed: bool,
}

pub fn portfolio_routes() -> Router<AppState> {
    Router::new()
        .route("/api/portfolio", get(get_portfolio).post(add_holding))
        .route("/api/portfolio/:symbol", delete(remove_holding))
}

async fn get_portfolio(State(state): State<AppState>) -> ApiResult<PortfolioSummary> {
    Ok(Json(ApiResponse::success(state.context.portfolio_summary().await)))
}

async fn add_holding(State(state): State<AppState>, Json(input): Json<NewHolding>) -> ApiResult<Holding> {
    let holding = state.context.add_holding(input).await?;
    Ok(Json(ApiResponse::success(holding)))
}

async fn remove_holding(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> ApiResult<RemoveHoldingResponse> {
    let removed = state.context.remove_holding(&symbol).await?;
    Ok(Json(ApiResponse::success(RemoveHoldingResponse {
        symbol: symbol.trim().to_uppercase(),
        removed,
    })))
}
