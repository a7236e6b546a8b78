//! Error types for Kikoeru Control.

/// Top-level error type for the control layer.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("Bridge error: {0}")]
    Bridge(#[from] BridgeError),
}

/// Job-management API errors.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Request failed: {0}")]
    Http(String),

    #[error("Server returned {status}: {}", detail.as_deref().unwrap_or("no detail"))]
    Status { status: u16, detail: Option<String> },

    #[error("Failed to decode response body: {0}")]
    Decode(String),
}

impl ApiError {
    /// Server-reported detail message when present, otherwise the
    /// error's own rendering. Used for user-facing notifications.
    pub fn user_detail(&self) -> String {
        match self {
            Self::Status {
                detail: Some(detail),
                ..
            } => detail.clone(),
            other => other.to_string(),
        }
    }
}

/// Resource-open bridge errors.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error("Host capability not available: {capability}")]
    CapabilityUnavailable { capability: String },

    #[error("Strategy {strategy} failed: {reason}")]
    StrategyFailed { strategy: String, reason: String },
}

/// Result type alias for the control layer.
pub type Result<T> = std::result::Result<T, Error>;
