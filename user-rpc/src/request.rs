// Request parsing
// Transport-level checks that run before the store is consulted

use crate::error::{RpcError, RpcResult};

use axum::http::{header, HeaderMap};
use serde_json::Value;
use tracing::debug;
use user_service::{ServiceError, UserFields};

const JSON_MIMETYPE: &str = "application/json";

/// The `Content-Type` header without parameters, lowercased; empty when absent
pub fn mimetype(headers: &HeaderMap) -> String {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .map(|value| value.trim().to_ascii_lowercase())
        .unwrap_or_default()
}

pub fn require_json(headers: &HeaderMap) -> RpcResult<()> {
    let mimetype = mimetype(headers);
    if mimetype != JSON_MIMETYPE {
        return Err(RpcError::InvalidMimeType(mimetype));
    }
    Ok(())
}

/// Parse a request body into user fields.
///
/// Anything other than a JSON object with correctly typed fields is reported
/// as invalid data.
pub fn parse_fields(body: &[u8]) -> RpcResult<UserFields> {
    let value: Value = serde_json::from_slice(body).map_err(|err| {
        debug!(error = %err, "body is not valid JSON");
        ServiceError::InvalidData
    })?;

    if !value.is_object() {
        return Err(ServiceError::InvalidData.into());
    }

    serde_json::from_value(value).map_err(|err| {
        debug!(error = %err, "body has mistyped user fields");
        ServiceError::InvalidData.into()
    })
}

pub fn parse_user_id(raw: &str) -> RpcResult<u64> {
    raw.parse::<u64>()
        .map_err(|_| RpcError::InvalidUserId(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(content_type: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
        headers
    }

    #[test]
    fn test_mimetype_strips_parameters() {
        let headers = headers_with("Application/JSON; charset=utf-8");
        assert_eq!(mimetype(&headers), "application/json");
        assert!(require_json(&headers).is_ok());
    }

    #[test]
    fn test_require_json_rejects_other_types() {
        let headers = headers_with("text/plain");
        match require_json(&headers) {
            Err(RpcError::InvalidMimeType(mimetype)) => assert_eq!(mimetype, "text/plain"),
            other => panic!("expected InvalidMimeType, got {:?}", other),
        }
    }

    #[test]
    fn test_require_json_missing_header() {
        match require_json(&HeaderMap::new()) {
            Err(RpcError::InvalidMimeType(mimetype)) => assert!(mimetype.is_empty()),
            other => panic!("expected InvalidMimeType, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_fields() {
        let fields = parse_fields(br#"{"name": "Test", "email": "test@test.com", "age": 25}"#)
            .unwrap();
        assert_eq!(fields, UserFields::new("Test", "test@test.com", 25));

        let partial = parse_fields(br#"{"age": -3, "extra": true}"#).unwrap();
        assert_eq!(partial, UserFields::default().with_age(-3));
    }

    #[test]
    fn test_parse_fields_ages_outside_i64() {
        let fields = parse_fields(br#"{"age": 9223372036854775808}"#).unwrap();
        assert_eq!(fields.age, Some(9_223_372_036_854_775_808));

        // Left for validation to reject as InvalidAge, not InvalidData
        let fields = parse_fields(br#"{"age": -9223372036854775809}"#).unwrap();
        assert!(fields.age.unwrap() < 0);
    }

    #[test]
    fn test_parse_fields_rejects_bad_bodies() {
        let bodies: [&[u8]; 6] = [
            b"",
            b"not json",
            b"null",
            br#"["Test", "test@test.com", 25]"#,
            br#"{"name": "Test", "email": "test@test.com", "age": "25"}"#,
            br#"{"name": 7}"#,
        ];
        for body in bodies {
            assert!(
                matches!(
                    parse_fields(body),
                    Err(RpcError::ServiceError(ServiceError::InvalidData))
                ),
                "body {:?} should be invalid",
                String::from_utf8_lossy(body)
            );
        }
    }

    #[test]
    fn test_parse_user_id() {
        assert_eq!(parse_user_id("42").unwrap(), 42);
        assert!(matches!(parse_user_id("abc"), Err(RpcError::InvalidUserId(_))));
        assert!(matches!(parse_user_id("-1"), Err(RpcError::InvalidUserId(_))));
    }
}
