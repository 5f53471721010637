use crate::constants::{
    COMMUNICATION_ERROR, FILE_TOO_LARGE, SIZE_LIMIT_CODE, SIZE_LIMIT_PATTERN, SIZE_LIMIT_STATUS,
};
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

static SIZE_LIMIT_RE: Lazy<Option<Regex>> = Lazy::new(|| match Regex::new(SIZE_LIMIT_PATTERN) {
    Ok(re) => Some(re),
    Err(e) => {
        tracing::error!("Invalid size limit pattern: {}", e);
        None
    }
});

/// Failure of a request to the conversion service before a structured reply
/// could be read.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransportError {
    #[error("{message}")]
    Http {
        status: u16,
        message: String,
        code: Option<String>,
    },
    #[error("Network error: {0}")]
    Network(String),
    #[error("Invalid response body: {0}")]
    Decode(String),
    #[error("Could not read {path}: {message}")]
    Io { path: String, message: String },
}

impl TransportError {
    /// Whether the server rejected the payload for being too large.
    ///
    /// Prefers the status code and the structured `code`; the message pattern
    /// covers servers that only report it in prose.
    pub fn is_size_limit(&self) -> bool {
        match self {
            Self::Http {
                status,
                message,
                code,
            } => {
                *status == SIZE_LIMIT_STATUS
                    || code.as_deref() == Some(SIZE_LIMIT_CODE)
                    || matches_size_limit(message)
            }
            Self::Network(message) => matches_size_limit(message),
            Self::Decode(_) | Self::Io { .. } => false,
        }
    }
}

fn matches_size_limit(message: &str) -> bool {
    SIZE_LIMIT_RE
        .as_ref()
        .map(|re| re.is_match(message))
        .unwrap_or(false)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum WorkflowError {
    #[error("No file selected")]
    NoFileSelected,
    #[error("No file selected for processing")]
    NoActiveSession,
    #[error("An upload is already in progress")]
    UploadInFlight,
    #[error("A processing request is already in progress")]
    ProcessInFlight,
    #[error("{message}")]
    ServerError {
        message: String,
        details: Option<String>,
    },
    #[error("{message}")]
    ServerWarning {
        message: String,
        details: Option<String>,
    },
    #[error("{}", COMMUNICATION_ERROR)]
    Transport(#[from] TransportError),
    #[error("{}", FILE_TOO_LARGE)]
    SizeLimit { message: String },
}

impl WorkflowError {
    /// Reclassifies size-limit transport failures as warnings.
    pub fn from_transport(error: TransportError) -> Self {
        if error.is_size_limit() {
            tracing::warn!("Upload rejected by size limit: {}", error);
            Self::SizeLimit {
                message: error.to_string(),
            }
        } else {
            Self::Transport(error)
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            Self::ServerWarning { .. }
            | Self::SizeLimit { .. }
            | Self::UploadInFlight
            | Self::ProcessInFlight => Severity::Warning,
            Self::NoFileSelected
            | Self::NoActiveSession
            | Self::ServerError { .. }
            | Self::Transport(_) => Severity::Error,
        }
    }

    /// Secondary line shown under the banner message.
    pub fn details(&self) -> Option<String> {
        match self {
            Self::ServerError { details, .. } | Self::ServerWarning { details, .. } => {
                details.clone().filter(|d| !d.is_empty())
            }
            Self::Transport(error) => Some(error.to_string()),
            Self::SizeLimit { message } => Some(message.clone()),
            _ => None,
        }
    }
}

/// The summary cannot drive the action menu.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MenuError {
    #[error("Summary unavailable for {filename}: {reason}")]
    SummaryUnavailable { filename: String, reason: String },
}
