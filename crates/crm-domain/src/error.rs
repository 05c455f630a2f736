//! API Errors
//!
//! Classification of HTTP responses into the three failure kinds the console
//! distinguishes: unauthenticated, HTTP failure, and transport/decoding failure.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Common result type for API calls
pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// 401: the session is gone, the caller must send the user to login
    #[error("Not signed in")]
    Unauthorized,
    #[error("{message}")]
    Http { status: u16, message: String },
    #[error("Network error: {0}")]
    Network(String),
    #[error("Unexpected response: {0}")]
    Decode(String),
    /// Request body could not be serialized; nothing was sent
    #[error("Could not prepare request: {0}")]
    Encode(String),
}

impl ApiError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized)
    }

    /// Text shown in the snackbar
    pub fn user_message(&self) -> String {
        self.to_string()
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
    message: Option<String>,
}

fn fallback_message(status: u16) -> String {
    format!("Request failed with status {}", status)
}

/// Map a status and raw body to success or a typed error.
pub fn classify_response(status: u16, body: &str) -> ApiResult<()> {
    if (200..300).contains(&status) {
        return Ok(());
    }
    if status == 401 {
        return Err(ApiError::Unauthorized);
    }

    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error.or(b.message))
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| fallback_message(status));

    Err(ApiError::Http { status, message })
}

/// JSON request body
pub fn encode_body<B: Serialize + ?Sized>(body: &B) -> ApiResult<String> {
    serde_json::to_string(body).map_err(|e| ApiError::Encode(e.to_string()))
}

/// Classify, then decode a 2xx body as JSON.
pub fn decode_response<T: DeserializeOwned>(status: u16, body: &str) -> ApiResult<T> {
    classify_response(status, body)?;
    serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_statuses() {
        assert!(classify_response(200, "").is_ok());
        assert!(classify_response(204, "").is_ok());
    }

    #[test]
    fn test_unauthorized() {
        let err = classify_response(401, r#"{"error":"expired"}"#).unwrap_err();
        assert!(err.is_unauthorized());
    }

    #[test]
    fn test_error_field_is_surfaced() {
        let err = classify_response(400, r#"{"error":"Stage name already exists"}"#).unwrap_err();
        assert_eq!(
            err,
            ApiError::Http { status: 400, message: "Stage name already exists".to_string() }
        );
        assert_eq!(err.user_message(), "Stage name already exists");
    }

    #[test]
    fn test_message_field_and_fallback() {
        let err = classify_response(422, r#"{"message":"bad order"}"#).unwrap_err();
        assert_eq!(err.user_message(), "bad order");

        let err = classify_response(500, "<html>oops</html>").unwrap_err();
        assert_eq!(err.user_message(), "Request failed with status 500");

        let err = classify_response(404, r#"{"error":""}"#).unwrap_err();
        assert_eq!(err.user_message(), "Request failed with status 404");
    }

    #[test]
    fn test_mutation_replies_accept_any_body() {
        // Saves only look at the status; the list is refetched afterwards
        assert!(classify_response(204, "").is_ok());
        assert!(classify_response(201, r#"{"success":true,"data":{"name":"Won"}}"#).is_ok());
        assert!(classify_response(200, r#"{"id":"s1","companyId":"c1","name":"Won","order":3}"#).is_ok());
    }

    #[test]
    fn test_encode_failure_is_not_a_decode_error() {
        use std::collections::BTreeMap;

        let body: BTreeMap<(u8, u8), u8> = [((1, 2), 3)].into_iter().collect();
        let err = encode_body(&body).unwrap_err();
        assert!(matches!(err, ApiError::Encode(_)));
        assert!(err.user_message().starts_with("Could not prepare request"));

        assert_eq!(encode_body(&[1, 2]).unwrap(), "[1,2]");
    }

    #[test]
    fn test_decode_response() {
        let v: Vec<u32> = decode_response(200, "[1,2]").unwrap();
        assert_eq!(v, vec![1, 2]);

        let err = decode_response::<Vec<u32>>(200, "not json").unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }
}
