//! Crate-wide error hierarchy for pr-reviewer.
//!
//! - Single root `Error` for all public functions.
//! - Provider-aware mapping (401→Unauthorized, 422→Unprocessable, 429→RateLimited, 5xx→Server).
//! - Upstream messages are kept so failures are visible in CI logs.

use thiserror::Error;

use ai_llm_service::AiLlmError;

use crate::review::validate::Rejection;

/// Convenient alias for crate-wide results.
pub type ReviewResult<T> = Result<T, Error>;

/// Root error type for the pr-reviewer crate.
#[derive(Debug, Error)]
pub enum Error {
    /// Hosting platform (GitHub) related failure.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// Text-generation backend failure (config or upstream).
    #[error(transparent)]
    Llm(#[from] AiLlmError),

    /// Configuration problems (missing token, bad repository, etc.).
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Candidate comment targets a line outside the diff.
    #[error(transparent)]
    Rejected(#[from] Rejection),
}

/// Detailed hosting-provider error. Status-derived variants carry the
/// upstream `message`.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// HTTP 401.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// HTTP 403 (also used by GitHub for secondary rate limits).
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// HTTP 404.
    #[error("not found: {0}")]
    NotFound(String),

    /// HTTP 422, e.g. a review comment line that GitHub cannot resolve.
    #[error("unprocessable entity: {0}")]
    Unprocessable(String),

    /// HTTP 429.
    #[error("rate limited: {message}")]
    RateLimited {
        retry_after_secs: Option<u64>,
        message: String,
    },

    /// HTTP 5xx.
    #[error("server error: status {status}: {message}")]
    Server { status: u16, message: String },

    /// Any other non-success status.
    #[error("http status {status}: {message}")]
    HttpStatus { status: u16, message: String },

    /// Timeout at transport level.
    #[error("timeout")]
    Timeout,

    /// Network/transport failure without status (DNS/connect/reset).
    #[error("network error: {0}")]
    Network(String),

    /// JSON deserialization error.
    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Unexpected/invalid shape of provider response.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl ProviderError {
    /// Classifies a non-success HTTP status.
    pub fn from_status(status: u16, retry_after_secs: Option<u64>, message: String) -> Self {
        match status {
            401 => Self::Unauthorized(message),
            403 => Self::Forbidden(message),
            404 => Self::NotFound(message),
            422 => Self::Unprocessable(message),
            429 => Self::RateLimited {
                retry_after_secs,
                message,
            },
            500..=599 => Self::Server { status, message },
            _ => Self::HttpStatus { status, message },
        }
    }
}

/// Configuration and setup errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("invalid repository `{0}`: expected `owner/repo`")]
    InvalidRepository(String),

    #[error("invalid number in {var}: `{value}`")]
    InvalidNumber { var: &'static str, value: String },

    #[error("invalid base api url: {0}")]
    InvalidBaseUrl(String),

    #[error("invalid token header value")]
    InvalidToken,
}

// ===== Conversions for `?` ergonomics =====

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Provider(ProviderError::from(e))
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            return ProviderError::Timeout;
        }
        if e.is_decode() {
            return ProviderError::InvalidResponse(e.to_string());
        }
        if let Some(status) = e.status() {
            return ProviderError::from_status(status.as_u16(), None, e.to_string());
        }
        ProviderError::Network(e.to_string())
    }
}
