use crate::response::{json_response, InternalErrorBody, MessageBody};

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use std::fmt;
use tracing::{debug, error};
use user_service::{messages, ServiceError};

pub type RpcResult<T> = Result<T, RpcError>;

#[derive(Debug)]
pub enum RpcError {
    ServiceError(ServiceError),
    /// Write request whose body is not declared as JSON; holds the received mimetype
    InvalidMimeType(String),
    /// Path segment that is not a user id
    InvalidUserId(String),
    UnknownRoute(String),
    /// Route exists but not for this HTTP method
    MethodNotAllowed(String),
    /// Body the framework refused to read, e.g. one over the size limit
    BodyRejected(StatusCode, String),
    InternalError(String),
}

impl RpcError {
    pub fn status(&self) -> StatusCode {
        match self {
            RpcError::ServiceError(ServiceError::NotFound(_))
            | RpcError::InvalidUserId(_)
            | RpcError::UnknownRoute(_) => StatusCode::NOT_FOUND,
            RpcError::ServiceError(ServiceError::Internal(_)) | RpcError::InternalError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            RpcError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            RpcError::BodyRejected(status, _) => *status,
            RpcError::ServiceError(_) | RpcError::InvalidMimeType(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Message safe to return to the client
    pub fn client_message(&self) -> String {
        match self {
            RpcError::ServiceError(ServiceError::Internal(_)) | RpcError::InternalError(_) => {
                messages::INTERNAL_ERROR.to_string()
            }
            RpcError::ServiceError(err) => err.to_string(),
            RpcError::InvalidMimeType(mimetype) => {
                format!("Invalid message mimetype: '{}'", mimetype)
            }
            RpcError::InvalidUserId(_) => messages::USER_NOT_FOUND.to_string(),
            RpcError::UnknownRoute(_) => "Resource not found".to_string(),
            RpcError::MethodNotAllowed(_) => "Method not allowed".to_string(),
            RpcError::BodyRejected(_, reason) => reason.clone(),
        }
    }
}

impl fmt::Display for RpcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RpcError::ServiceError(err) => write!(f, "Service error: {}", err),
            RpcError::InvalidMimeType(mimetype) => {
                write!(f, "Invalid request: mimetype '{}' is not JSON", mimetype)
            }
            RpcError::InvalidUserId(raw) => write!(f, "Invalid request: '{}' is not a user id", raw),
            RpcError::UnknownRoute(path) => write!(f, "Invalid request: no route for {}", path),
            RpcError::MethodNotAllowed(method) => {
                write!(f, "Invalid request: method {} not allowed", method)
            }
            RpcError::BodyRejected(status, reason) => {
                write!(f, "Invalid request: body rejected ({}): {}", status, reason)
            }
            RpcError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for RpcError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RpcError::ServiceError(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ServiceError> for RpcError {
    fn from(err: ServiceError) -> Self {
        RpcError::ServiceError(err)
    }
}

impl IntoResponse for RpcError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            // Details stay in the logs
            error!(error = %self, "request failed");
            return json_response(status, &InternalErrorBody::default());
        }

        debug!(status = status.as_u16(), error = %self, "request rejected");
        let message = self.client_message();
        json_response(status, &MessageBody { message: &message })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (RpcError::from(ServiceError::InvalidData), StatusCode::BAD_REQUEST),
            (RpcError::from(ServiceError::InvalidEmail), StatusCode::BAD_REQUEST),
            (RpcError::from(ServiceError::InvalidAge), StatusCode::BAD_REQUEST),
            (RpcError::from(ServiceError::AlreadyCreated), StatusCode::BAD_REQUEST),
            (RpcError::from(ServiceError::NotFound(1)), StatusCode::NOT_FOUND),
            (
                RpcError::from(ServiceError::Internal("x".to_string())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (RpcError::InvalidMimeType("text/plain".to_string()), StatusCode::BAD_REQUEST),
            (RpcError::InvalidUserId("abc".to_string()), StatusCode::NOT_FOUND),
            (RpcError::UnknownRoute("/nope".to_string()), StatusCode::NOT_FOUND),
            (RpcError::MethodNotAllowed("PATCH".to_string()), StatusCode::METHOD_NOT_ALLOWED),
            (
                RpcError::BodyRejected(StatusCode::PAYLOAD_TOO_LARGE, "too big".to_string()),
                StatusCode::PAYLOAD_TOO_LARGE,
            ),
            (RpcError::InternalError("x".to_string()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, expected) in cases {
            assert_eq!(err.status(), expected, "{}", err);
        }
    }

    #[test]
    fn test_client_message_hides_internal_details() {
        let err = RpcError::InternalError("user store lock poisoned".to_string());
        assert_eq!(err.client_message(), messages::INTERNAL_ERROR);

        let err = RpcError::from(ServiceError::Internal("id 2 in use".to_string()));
        assert_eq!(err.client_message(), messages::INTERNAL_ERROR);
    }

    #[test]
    fn test_client_message_for_mimetype() {
        let err = RpcError::InvalidMimeType("text/plain".to_string());
        assert_eq!(err.client_message(), "Invalid message mimetype: 'text/plain'");
    }

    #[test]
    fn test_into_response_status() {
        let response = RpcError::from(ServiceError::NotFound(9)).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = RpcError::InternalError("boom".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
