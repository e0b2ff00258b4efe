// src/error.rs
// =============================================================================
// One error type for the whole tool.
//
// Every failure a caller can see is a variant of ScribeError. Modules return
// Result<T, ScribeError> and propagate with `?`; only main.rs converts into
// anyhow::Error for printing.
//
// Rust concepts:
// - thiserror: derives Display and std::error::Error from attributes
// - #[from]: lets `?` convert library errors (rusqlite, serde_json) for us
// =============================================================================

use thiserror::Error;

/// Everything that can go wrong while generating, storing or reading a document.
#[derive(Debug, Error)]
pub enum ScribeError {
    /// The input is not a GitHub repository URL with an owner and a name
    #[error("invalid GitHub repository URL: {0}")]
    InvalidUrlFormat(String),

    #[error("repository not found: {0}")]
    RepositoryNotFound(String),

    /// Any non-2xx status that has no more specific variant
    #[error("GitHub API returned HTTP {status}: {message}")]
    UpstreamApiError { status: u16, message: String },

    #[error("GitHub API rate limit exceeded; set GITHUB_TOKEN or try again later")]
    RateLimitExceeded,

    #[error("access to the repository is forbidden")]
    AccessForbidden,

    #[error("the configured GitHub token was rejected")]
    InvalidCredential,

    /// No response at all: DNS, connect, TLS, or our own timeout
    #[error("network error: {0}")]
    NetworkError(String),

    /// A 2xx response whose body did not match the expected schema
    #[error("unexpected response from GitHub: {0}")]
    MalformedResponse(String),

    #[error("no document with id {id}")]
    NotFound { id: i64 },

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("failed to render markdown: {0}")]
    RenderingFailure(String),

    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Shorthand used across the crate
pub type Result<T> = std::result::Result<T, ScribeError>;

impl ScribeError {
    /// True for errors caused by the caller's input or by the remote side,
    /// as opposed to faults inside this program.
    pub fn is_user_facing(&self) -> bool {
        !matches!(
            self,
            ScribeError::Storage(_) | ScribeError::Serialization(_) | ScribeError::RenderingFailure(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_error_message_carries_status() {
        let err = ScribeError::UpstreamApiError {
            status: 502,
            message: "Bad Gateway".to_string(),
        };
        assert_eq!(err.to_string(), "GitHub API returned HTTP 502: Bad Gateway");
    }

    #[test]
    fn test_not_found_mentions_id() {
        let err = ScribeError::NotFound { id: 42 };
        assert_eq!(err.to_string(), "no document with id 42");
        assert!(err.is_user_facing());
    }

    #[test]
    fn test_serde_errors_convert_with_question_mark() {
        fn parse() -> Result<serde_json::Value> {
            Ok(serde_json::from_str("{not json")?)
        }
        let err = parse().unwrap_err();
        assert!(matches!(err, ScribeError::Serialization(_)));
        assert!(!err.is_user_facing());
    }
}
