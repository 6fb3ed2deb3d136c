use serde_json::Value;

#[derive(Debug, thiserror::Error)]
pub enum ScanerrError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid step update '{input}': expected step-<n>:<value> with n >= 1")]
    InvalidStepUpdate { input: String },

    #[error("{operation} failed with status {status}: {payload}")]
    Remote {
        operation: &'static str,
        status: u16,
        payload: Value,
    },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected response from {operation}: {reason}")]
    Decode {
        operation: &'static str,
        reason: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ScanerrError {
    pub fn decode(operation: &'static str, reason: impl Into<String>) -> Self {
        ScanerrError::Decode {
            operation,
            reason: reason.into(),
        }
    }

    pub fn is_config(&self) -> bool {
        matches!(self, ScanerrError::Config(_))
    }
}

pub type Result<T> = std::result::Result<T, ScanerrError>;
