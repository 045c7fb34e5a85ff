use thiserror::Error;

/// Failures surfaced by the backend collaborator or rejected before reaching it.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    #[error("request timed out")]
    Timeout,

    #[error("connection reset")]
    ConnectionReset,

    #[error("server unreachable: {0}")]
    Unreachable(String),

    /// The backend answered with `status: "error"`.
    #[error("backend error: {}", message.as_deref().unwrap_or("no message"))]
    Backend { message: Option<String> },

    #[error("record not found")]
    NotFound,

    /// A business rule failed before any request was made.
    #[error("rejected: {0}")]
    Rejected(String),
}

impl ApiError {
    /// Only timeouts and connection resets are worth retrying.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Timeout | Self::ConnectionReset)
    }

    /// Message suitable for showing to the user.
    pub fn user_message(&self) -> String {
        match self {
            Self::Timeout => "The request timed out. Please try again.".to_string(),
            Self::ConnectionReset | Self::Unreachable(_) => {
                "The server is unreachable. Check your connection and try again.".to_string()
            }
            Self::Backend { message: Some(message) } if !message.trim().is_empty() => {
                message.clone()
            }
            Self::Backend { .. } => "The server could not complete the request.".to_string(),
            Self::NotFound => "The record no longer exists.".to_string(),
            Self::Rejected(reason) => reason.clone(),
        }
    }
}
