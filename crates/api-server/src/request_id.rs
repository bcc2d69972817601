use axum::{
    extract::Request,
    http::{HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Request ID carried in request extensions
#[derive(Clone, Debug)]
pub struct RequestId(pub String);

/// Reuse an incoming `X-Request-Id` or mint a UUID v4, and echo it on the response.
pub async fn request_id_middleware(headers: HeaderMap, mut request: Request, next: Next) -> Response {
    let id = headers
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    tracing::debug!(request_id = %id, method = %request.method(), path = %request.uri().path(), "request");
    request.extensions_mut().insert(RequestId(id.clone()));

    let mut response = next.run(request).await;
    if let Ok(val) = HeaderValue::from_str(&id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, val);
    }

    response
}
