//! Error types for catalog search

use thiserror::Error;

/// Errors raised by catalog search calls and response handling
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SearchError {
    /// Request did not complete in time
    #[error("Request timed out after {0}s")]
    Timeout(u64),

    /// Network-level failure
    #[error("Communication error: {0}")]
    Communication(String),

    /// Non-success HTTP status
    #[error("HTTP {status}: {body}")]
    Http {
        /// Status code
        status: u16,
        /// Response body, possibly truncated
        body: String,
    },

    /// JSON-RPC error object in the response
    #[error("JSON-RPC error {code}: {message}")]
    Rpc {
        /// Error code
        code: i64,
        /// Error message
        message: String,
    },

    /// Tool result flagged `isError`
    #[error("Tool error: {0}")]
    Tool(String),

    /// Response body has an unexpected shape
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Raw result could not be reduced
    #[error("Reduction failed: {0}")]
    Reduction(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl SearchError {
    /// Whether the transport should try the call again
    pub fn is_retryable(&self) -> bool {
        match self {
            SearchError::Timeout(_) | SearchError::Communication(_) => true,
            SearchError::Http { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

impl From<serde_json::Error> for SearchError {
    fn from(e: serde_json::Error) -> Self {
        SearchError::InvalidResponse(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classification() {
        assert!(SearchError::Timeout(30).is_retryable());
        assert!(SearchError::Communication("reset".into()).is_retryable());
        assert!(SearchError::Http { status: 503, body: String::new() }.is_retryable());
        assert!(SearchError::Http { status: 429, body: String::new() }.is_retryable());
        assert!(!SearchError::Http { status: 400, body: String::new() }.is_retryable());
        assert!(!SearchError::Rpc { code: -32602, message: "bad params".into() }.is_retryable());
        assert!(!SearchError::Tool("no such shop".into()).is_retryable());
    }

    #[test]
    fn test_messages() {
        assert_eq!(SearchError::Timeout(30).to_string(), "Request timed out after 30s");
        assert_eq!(
            SearchError::Rpc { code: -32000, message: "boom".into() }.to_string(),
            "JSON-RPC error -32000: boom"
        );
    }
}
