use anyhow::Context;
use axum::{
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    Json, Router,
};
use dashboard_core::DashboardError;
use dashboard_state::{build_context, DashboardConfig, DashboardContext, RefreshScheduler};
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

mod analysis_routes;
mod market_routes;
mod notification_routes;
mod portfolio_routes;
mod request_id;
mod settings_routes;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub context: Arc<DashboardContext>,
}

impl AppState {
    pub fn new(context: Arc<DashboardContext>) -> Self {
        Self { context }
    }
}

/// JSON envelope for every endpoint
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}

impl ApiResponse<()> {
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

pub type ApiResult<T> = Result<Json<ApiResponse<T>>, AppError>;

/// Handler error mapped onto an HTTP status
#[derive(Debug)]
pub enum AppError {
    Dashboard(DashboardError),
    Internal(anyhow::Error),
}

impl From<DashboardError> for AppError {
    fn from(e: DashboardError) -> Self {
        AppError::Dashboard(e)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(e: anyhow::Error) -> Self {
        AppError::Internal(e)
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Dashboard(DashboardError::NotFound(_)) => StatusCode::NOT_FOUND,
            AppError::Dashboard(DashboardError::Validation(_)) => StatusCode::BAD_REQUEST,
            AppError::Dashboard(DashboardError::RefreshFailure(_)) => StatusCode::BAD_GATEWAY,
            AppError::Dashboard(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            AppError::Dashboard(e) => e.to_string(),
            AppError::Internal(e) => format!("{:#}", e),
        };

        if status.is_server_error() {
            tracing::error!("Request failed ({}): {}", status, message);
        } else {
            tracing::debug!("Request rejected ({}): {}", status, message);
        }

        (status, Json(ApiResponse::failure(message))).into_response()
    }
}

/// Listen address
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let host = std::env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = match std::env::var("API_PORT") {
            Ok(raw) => raw
                .trim()
                .parse::<u16>()
                .with_context(|| format!("Invalid API_PORT value '{}'", raw))?,
            Err(_) => 3000,
        };
        Ok(Self { host, port })
    }

    pub fn addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("Invalid listen address {}:{}", self.host, self.port))
    }
}

/// Install the tracing subscriber. JSON output when `RUST_LOG_FORMAT=json`.
pub fn init_tracing() {
    let filter = || {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"))
    };

    let json_logging = std::env::var("RUST_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    if json_logging {
        tracing_subscriber::fmt().json().with_env_filter(filter()).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter()).init();
    }

    // Panic hook: log panic info before crashing
    std::panic::set_hook(Box::new(|info| {
        eprintln!("PANIC: {info}");
        tracing::error!("PANIC: {info}");
    }));
}

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(market_routes::market_routes())
        .merge(portfolio_routes::portfolio_routes())
        .merge(settings_routes::settings_routes())
        .merge(analysis_routes::analysis_routes())
        .merge(notification_routes::notification_routes())
        .layer(middleware::from_fn(request_id::request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("Shutdown signal received");
}

pub async fn run_server() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    tracing::info!("Starting market dashboard API");

    let config = DashboardConfig::from_env()?;
    let server = ServerConfig::from_env()?;
    tracing::info!("  Refresh interval: {}s", config.refresh_interval.as_secs());
    tracing::info!(
        "  Refresh retries: {} attempts, {}ms initial backoff",
        config.retry.max_attempts,
        config.retry.initial_backoff.as_millis()
    );
    tracing::info!("  Market data: {}", config.market_mode.as_str());

    let context = Arc::new(build_context(&config).await?);
    let scheduler = RefreshScheduler::start(context.clone(), config.refresh_interval);

    let app = build_router(AppState::new(context));
    let addr = server.addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    scheduler.shutdown().await;
    tracing::info!("Server stopped");
    Ok(())
}
