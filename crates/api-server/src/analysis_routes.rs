use ai_analysis::{ModelAnalysis, NlpAnalysis, PredictionData};
use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::{ApiResponse, ApiResult, AppState};

#[derive(Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Serialize)]
pub struct ChatResponse {
    pub reply: String,
}

pub fn analysis_routes() -> Router<AppState> {
    Router::new()
        .route("/api/analysis/:symbol/prediction", get(get_prediction))
        .route("/api/analysis/:symbol/sentiment", get(get_sentiment))
        .route("/api/analysis/:symbol/models", get(get_models))
        .route("/api/chat", post(chat))
}

async fn get_prediction(State(state): State<AppState>, Path(symbol): Path<String>) -> ApiResult<PredictionData> {
    let prediction = state.context.prediction(&symbol).await?;
    Ok(Json(ApiResponse::success(prediction)))
}

async fn get_sentiment(State(state): State<AppState>, Path(symbol): Path<String>) -> ApiResult<NlpAnalysis> {
    let nlp = state.context.sentiment(&symbol).await?;
    Ok(Json(ApiResponse::success(nlp)))
}

async fn get_models(State(state): State<AppState>, Path(symbol): Path<String>) -> ApiResult<ModelAnalysis> {
    let analysis = state.context.model_analysis(&symbol).await?;
    Ok(Json(ApiResponse::success(analysis)))
}

async fn chat(State(state): State<AppState>, Json(req): Json<ChatRequest>) -> ApiResult<ChatResponse> {
    let reply = state.context.chat(&req.message).await?;
    Ok(Json(ApiResponse::success(ChatResponse { reply })))
}
