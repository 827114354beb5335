//! Middleware for logging requests and responses.

use axum::{
    body::{Body, Bytes},
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};

/// The number of bytes of a request or response body shown at the `info` level.
pub const LOG_BODY_LENGTH_LIMIT: usize = 64;

/// Log the request and response for each request.
///
/// Both the request and response are logged at the `info` level.
/// If a body is longer than [LOG_BODY_LENGTH_LIMIT] bytes, it is
/// truncated and the full body is logged at the `debug` level.
/// Bodies that are not UTF-8 text, e.g. spreadsheet downloads, are logged
/// by size only and passed through untouched.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();
    let body_bytes = match axum::body::to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(error) => {
            tracing::error!("could not read request body: {error}");
            return StatusCode::BAD_REQUEST.into_response();
        }
    };

    log_request(&parts, &body_bytes);

    let request = Request::from_parts(parts, Body::from(body_bytes));
    let response = next.run(request).await;

    let (parts, body) = response.into_parts();
    let body_bytes = match axum::body::to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(error) => {
            tracing::error!("could not read response body: {error}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    log_response(&parts, &body_bytes);

    Response::from_parts(parts, Body::from(body_bytes))
}

fn log_request(parts: &axum::http::request::Parts, body: &Bytes) {
    match std::str::from_utf8(body) {
        Ok(text) if text.len() > LOG_BODY_LENGTH_LIMIT => {
            tracing::info!(
                "Received request: {parts:#?}\nbody: {}...",
                truncate(text, LOG_BODY_LENGTH_LIMIT)
            );
            tracing::debug!("Full request body: {text:?}");
        }
        Ok(text) => tracing::info!("Received request: {parts:#?}\nbody: {text:?}"),
        Err(_) => tracing::info!("Received request: {parts:#?}\nbody: <{} bytes>", body.len()),
    }
}

fn log_response(parts: &axum::http::response::Parts, body: &Bytes) {
    match std::str::from_utf8(body) {
        Ok(text) if text.len() > LOG_BODY_LENGTH_LIMIT => {
            tracing::info!(
                "Sending response: {parts:#?}\nbody: {}...",
                truncate(text, LOG_BODY_LENGTH_LIMIT)
            );
            tracing::debug!("Full response body: {text:?}");
        }
        Ok(text) => tracing::info!("Sending response: {parts:#?}\nbody: {text:?}"),
        Err(_) => tracing::info!("Sending response: {parts:#?}\nbody: <{} bytes>", body.len()),
    }
}

/// The longest prefix of `text` that is at most `limit` bytes and ends on a character boundary.
fn truncate(text: &str, limit: usize) -> &str {
    if text.len() <= limit {
        return text;
    }

    let mut end = limit;
    while !text.is_char_boundary(end) {
        end -= 1;
    }

    &text[..end]
}
