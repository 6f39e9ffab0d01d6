/// Application errors
///
/// None of these ever surface as a non-2xx webhook response: the callback
/// endpoint always acknowledges with 200 and failures are only observable
/// through logs and per-event statuses in the event store.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Token exchange failed: {0}")]
    Auth(String),

    #[error("Record sink rejected request (HTTP {status}): {message}")]
    Sink { status: u16, message: String },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JWT assertion error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for pipeline and sink operations
pub type AppResult<T> = Result<T, AppError>;
