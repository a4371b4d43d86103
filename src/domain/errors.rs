use crate::domain::constants::{EXIT_ALERT, EXIT_INDETERMINATE};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("request to {url} failed: {message}")]
pub struct TransportError {
    pub url: String,
    pub message: String,
}

impl TransportError {
    pub fn new(url: &str, message: impl Into<String>) -> Self {
        Self {
            url: url.to_string(),
            message: message.into(),
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum CheckError {
    #[error("configuration error: {0}")]
    Config(String),
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("too many redirects from {url} ({hops} hops), suspected redirect loop")]
    RedirectLoop { url: String, hops: u32 },
    #[error("malformed response from {url}: {reason}")]
    MalformedResponse { url: String, reason: String },
    #[error("state store error at {path}: {reason}")]
    State { path: String, reason: String },
}

impl CheckError {
    /// Ambiguous failures never alert; a malformed payload is an operator-visible defect.
    pub fn exit_code(&self) -> u8 {
        match self {
            CheckError::MalformedResponse { .. } => EXIT_ALERT,
            CheckError::Config(_)
            | CheckError::Transport(_)
            | CheckError::RedirectLoop { .. }
            | CheckError::State { .. } => EXIT_INDETERMINATE,
        }
    }

    /// Failures that downgrade a single address to INDETERMINATE instead of aborting the run.
    pub fn is_indeterminate(&self) -> bool {
        matches!(
            self,
            CheckError::Transport(_) | CheckError::RedirectLoop { .. }
        )
    }
}
