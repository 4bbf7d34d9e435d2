//! Error types for the product API client.
//!
//! # Design
//! Every failure is tagged when it is created, so callers and the retry
//! policy classify errors by matching on the variant:
//! - `Validation` never reaches the network.
//! - `Response` means the server answered with a non-2xx status.
//! - `Transport` means no usable answer arrived (timeout, connection failure,
//!   undecodable body).
//!
//! `TransportError` is the narrower type a `Transport` implementation
//! returns. `HttpClient` converts it into `ApiError::Transport` so callers
//! never see transport-specific errors.

use thiserror::Error;

use crate::http::HttpResponse;

/// Errors returned by `HttpClient` and `ProductApi`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server returned a status outside 2xx.
    #[error("{message}")]
    Response {
        status: u16,
        message: String,
        response: Option<HttpResponse>,
        data: Option<serde_json::Value>,
    },

    /// The request could not complete.
    #[error("{message}")]
    Transport { message: String },

    /// Input was rejected locally before any request was made.
    #[error("invalid product data: {message}")]
    Validation { message: String },
}

/// Failures reported by a `Transport` implementation.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,

    #[error("could not connect to the server: {0}")]
    Connect(String),

    #[error("{0}")]
    Other(String),
}

/// 400..500: caller-side fault, never retried.
pub fn is_client_error(status: u16) -> bool {
    (400..500).contains(&status)
}

/// 500..600: server-side fault, treated as transient.
pub fn is_server_error(status: u16) -> bool {
    (500..600).contains(&status)
}

impl ApiError {
    pub fn transport(message: impl Into<String>) -> Self {
        ApiError::Transport {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::Validation {
            message: message.into(),
        }
    }

    /// Build a `Response` error from a non-2xx response.
    ///
    /// The message is the body's `message` field for JSON bodies, else the
    /// raw body text, else `HTTP {status}: {reason}`.
    pub fn from_response(response: HttpResponse) -> Self {
        let status = response.status;
        let mut message = default_message(status);
        let mut data = None;

        if response.is_json() {
            if let Ok(value) = serde_json::from_str::<serde_json::Value>(&response.body) {
                if let Some(text) = value.get("message").and_then(|m| m.as_str()) {
                    message = text.to_string();
                }
                data = Some(value);
            }
        } else if !response.body.is_empty() {
            message = response.body.clone();
        }

        ApiError::Response {
            status,
            message,
            response: Some(response),
            data,
        }
    }

    /// HTTP status for `Response` errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Response { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_client_error(&self) -> bool {
        self.status().is_some_and(is_client_error)
    }

    pub fn is_server_error(&self) -> bool {
        self.status().is_some_and(is_server_error)
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Validation errors and 4xx responses are final; everything else may
    /// succeed on a later attempt.
    pub fn is_retryable(&self) -> bool {
        match self {
            ApiError::Validation { .. } => false,
            ApiError::Response { status, .. } => !is_client_error(*status),
            ApiError::Transport { .. } => true,
        }
    }
}

impl From<TransportError> for ApiError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Timeout => ApiError::transport("request timed out"),
            TransportError::Connect(_) => ApiError::transport("could not connect to the server"),
            TransportError::Other(msg) if msg.is_empty() => {
                ApiError::transport("unknown request failure")
            }
            TransportError::Other(msg) => ApiError::transport(msg),
        }
    }
}

fn default_message(status: u16) -> String {
    let reason = reqwest::StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .unwrap_or("Unknown Status");
    format!("HTTP {status}: {reason}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16, content_type: Option<&str>, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            headers: content_type
                .map(|ct| vec![("content-type".to_string(), ct.to_string())])
                .unwrap_or_default(),
            body: body.to_string(),
        }
    }

    #[test]
    fn json_message_field_wins() {
        let err = ApiError::from_response(response(
            404,
            Some("application/json"),
            r#"{"message":"Product not found"}"#,
        ));
        assert_eq!(err.to_string(), "Product not found");
        assert_eq!(err.status(), Some(404));
        assert!(err.is_not_found());
        match err {
            ApiError::Response { data, .. } => {
                assert_eq!(data.unwrap()["message"], "Product not found");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn json_without_message_uses_default() {
        let err = ApiError::from_response(response(500, Some("application/json"), r#"{"x":1}"#));
        assert_eq!(err.to_string(), "HTTP 500: Internal Server Error");
    }

    #[test]
    fn plain_text_body_becomes_message() {
        let err = ApiError::from_response(response(400, Some("text/plain"), "bad uuid"));
        assert_eq!(err.to_string(), "bad uuid");
    }

    #[test]
    fn empty_body_uses_status_text() {
        let err = ApiError::from_response(response(503, None, ""));
        assert_eq!(err.to_string(), "HTTP 503: Service Unavailable");
    }

    #[test]
    fn malformed_json_body_keeps_default_message() {
        let err = ApiError::from_response(response(502, Some("application/json"), "{oops"));
        assert_eq!(err.to_string(), "HTTP 502: Bad Gateway");
    }

    #[test]
    fn status_classification() {
        assert!(is_client_error(400));
        assert!(is_client_error(499));
        assert!(!is_client_error(500));
        assert!(is_server_error(500));
        assert!(is_server_error(599));
        assert!(!is_server_error(600));
        assert!(!is_server_error(404));
    }

    #[test]
    fn retryability_by_variant() {
        let not_found = ApiError::from_response(response(404, None, ""));
        let unavailable = ApiError::from_response(response(503, None, ""));
        assert!(!not_found.is_retryable());
        assert!(unavailable.is_retryable());
        assert!(ApiError::transport("boom").is_retryable());
        assert!(!ApiError::validation("price").is_retryable());
    }

    #[test]
    fn transport_errors_are_normalized() {
        let err: ApiError = TransportError::Timeout.into();
        assert!(matches!(&err, ApiError::Transport { message } if message == "request timed out"));

        let err: ApiError = TransportError::Connect("refused".into()).into();
        assert_eq!(err.to_string(), "could not connect to the server");

        let err: ApiError = TransportError::Other(String::new()).into();
        assert_eq!(err.to_string(), "unknown request failure");
    }
}
