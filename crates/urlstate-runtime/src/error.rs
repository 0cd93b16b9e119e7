use std::error::Error as StdError;

use thiserror::Error;

/// Opaque failure of a resource producer.
///
/// Producers may use any error type; this one is the default for callers
/// that only need a message and an optional cause.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ProducerError {
    message: String,
    #[source]
    source: Option<Box<dyn StdError + 'static>>,
}

impl ProducerError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Wrap an underlying error, keeping it reachable through `source()`.
    #[must_use]
    pub fn with_source(message: impl Into<String>, source: impl StdError + 'static) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<String> for ProducerError {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

impl From<&str> for ProducerError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}
