use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum ExchangeError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Malformed response: {message}")]
    MalformedResponse {
        message: String,
        raw: Option<String>,
    },

    #[error("Rejected by venue: {message}")]
    Rejected {
        message: String,
        raw: Option<String>,
    },

    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("Unsupported exchange: {0}")]
    UnsupportedExchange(String),

    #[error("Unsupported protocol: {0}")]
    UnsupportedProtocol(String),

    #[error("Not supported: {0}")]
    NotSupported(String),

    #[error("Authentication error: {0}")]
    AuthError(String),

    #[error("Configuration error: {0}")]
    ConfigError(#[from] crate::core::config::ConfigError),
}

/// Coarse classification of an [`ExchangeError`], stable across venues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Transport,
    MalformedResponse,
    Rejected,
    InvalidParameters,
    UnsupportedExchange,
    UnsupportedProtocol,
    NotSupported,
    Auth,
    Config,
}

impl ExchangeError {
    pub(crate) fn malformed(message: impl Into<String>, raw: impl Into<String>) -> Self {
        Self::MalformedResponse {
            message: message.into(),
            raw: Some(raw.into()),
        }
    }

    pub(crate) fn rejected(message: impl Into<String>, raw: impl Into<String>) -> Self {
        Self::Rejected {
            message: message.into(),
            raw: Some(raw.into()),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Transport(_) => ErrorKind::Transport,
            Self::MalformedResponse { .. } => ErrorKind::MalformedResponse,
            Self::Rejected { .. } => ErrorKind::Rejected,
            Self::InvalidParameters(_) => ErrorKind::InvalidParameters,
            Self::UnsupportedExchange(_) => ErrorKind::UnsupportedExchange,
            Self::UnsupportedProtocol(_) => ErrorKind::UnsupportedProtocol,
            Self::NotSupported(_) => ErrorKind::NotSupported,
            Self::AuthError(_) => ErrorKind::Auth,
            Self::ConfigError(_) => ErrorKind::Config,
        }
    }

    /// The venue body that produced this error, when one was received
    pub fn raw_response(&self) -> Option<&str> {
        match self {
            Self::MalformedResponse { raw, .. } | Self::Rejected { raw, .. } => raw.as_deref(),
            _ => None,
        }
    }

    /// Bare message without the variant prefix used by `Display`
    pub fn message(&self) -> String {
        match self {
            Self::MalformedResponse { message, .. } | Self::Rejected { message, .. } => {
                message.clone()
            }
            Self::Transport(m)
            | Self::InvalidParameters(m)
            | Self::UnsupportedExchange(m)
            | Self::UnsupportedProtocol(m)
            | Self::NotSupported(m)
            | Self::AuthError(m) => m.clone(),
            Self::ConfigError(e) => e.to_string(),
        }
    }
}

impl From<reqwest::Error> for ExchangeError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Transport(format!("request timed out: {}", err))
        } else if err.is_connect() {
            Self::Transport(format!("connection failed: {}", err))
        } else {
            Self::Transport(err.to_string())
        }
    }
}

/// Venue-independent error shape handed to callers and front ends
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorReport {
    pub kind: ErrorKind,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_venue_response: Option<String>,
}

impl From<&ExchangeError> for ErrorReport {
    fn from(err: &ExchangeError) -> Self {
        Self {
            kind: err.kind(),
            message: err.message(),
            raw_venue_response: err.raw_response().map(str::to_string),
        }
    }
}
