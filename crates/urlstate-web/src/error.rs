use thiserror::Error;
use urlstate_core::ValidationError;

pub type Result<T> = std::result::Result<T, WebError>;

#[derive(Debug, Error)]
pub enum WebError {
    #[error("navigation to {href} rejected: {reason}")]
    NavigationRejected { href: String, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl WebError {
    #[must_use]
    pub fn rejected(href: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::NavigationRejected {
            href: href.into(),
            reason: reason.into(),
        }
    }
}
