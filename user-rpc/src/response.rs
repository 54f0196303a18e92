// JSON response bodies
// Every response carries an explicit utf-8 JSON content type

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use tracing::error;
use user_service::messages;

pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// Literal fallback used when a body cannot be serialized
const INTERNAL_ERROR_JSON: &str =
    r#"{"message":"Internal server error","error":"internal_error"}"#;

#[derive(Debug, Serialize)]
pub struct MessageBody<'a> {
    pub message: &'a str,
}

#[derive(Debug, Serialize)]
pub struct CreatedBody<'a> {
    pub message: &'a str,
    pub id: u64,
}

/// Body of every 5xx response
#[derive(Debug, Serialize)]
pub struct InternalErrorBody {
    pub message: &'static str,
    pub error: &'static str,
}

impl Default for InternalErrorBody {
    fn default() -> Self {
        Self {
            message: messages::INTERNAL_ERROR,
            error: "internal_error",
        }
    }
}

pub fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Response {
    match serde_json::to_vec(body) {
        Ok(bytes) => (status, [(header::CONTENT_TYPE, JSON_CONTENT_TYPE)], bytes).into_response(),
        Err(err) => {
            error!(error = %err, "failed to serialize response body");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                [(header::CONTENT_TYPE, JSON_CONTENT_TYPE)],
                INTERNAL_ERROR_JSON,
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_response_headers() {
        let response = json_response(StatusCode::CREATED, &CreatedBody { message: "ok", id: 1 });
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/json; charset=utf-8"
        );
    }

    #[test]
    fn test_fallback_matches_internal_error_body() {
        let serialized = serde_json::to_string(&InternalErrorBody::default()).unwrap();
        assert_eq!(serialized, INTERNAL_ERROR_JSON);
    }
}
