use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use notification_service::Notification;
use serde::Deserialize;

use crate::{ApiResponse, ApiResult, AppState};

#[derive(Deserialize)]
pub struct FeedQuery {
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    20
}

pub fn notification_routes() -> Router<AppState> {
    Router::new().route("/api/notifications", get(recent_notifications))
}

/// Newest first
async fn recent_notifications(
    State(state): State<AppState>,
    Query(query): Query<FeedQuery>,
) -> ApiResult<Vec<Notification>> {
    let feed = state.context.notifications().recent(query.limit).await;
    Ok(Json(ApiResponse::success(feed)))
}
