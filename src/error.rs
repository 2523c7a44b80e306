//! Error types for the NOWPayments client

use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, NowPaymentsError>;

/// Main error type for client operations
#[derive(Error, Debug)]
pub enum NowPaymentsError {
    /// API key does not look like `XXXXXXX-XXXXXXX-XXXXXXX-XXXXXXX`
    #[error("Incorrect API key format")]
    InvalidKeyFormat,

    /// Operation name is not in the endpoint registry
    #[error("Unknown operation: {name}")]
    UnknownOperation { name: String },

    /// Positional arguments do not fill the endpoint template
    #[error("Endpoint {endpoint} takes {expected} argument(s), got {got}")]
    TemplateArguments {
        endpoint: &'static str,
        expected: usize,
        got: usize,
    },

    /// Endpoint called with the wrong HTTP method
    #[error("Endpoint {endpoint} is not called with {method}")]
    WrongMethod {
        endpoint: &'static str,
        method: &'static str,
    },

    /// Amount cannot be represented as a decimal
    #[error("Invalid amount: {message}")]
    InvalidAmount { message: String },

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Configuration error
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl NowPaymentsError {
    /// Create an unknown operation error
    pub fn unknown_operation(name: impl Into<String>) -> Self {
        Self::UnknownOperation { name: name.into() }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Whether this error points at a bug in the calling code rather than
    /// at the network or the remote API.
    pub fn is_programmer_error(&self) -> bool {
        matches!(
            self,
            Self::UnknownOperation { .. }
                | Self::TemplateArguments { .. }
                | Self::WrongMethod { .. }
        )
    }
}
