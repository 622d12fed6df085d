use thiserror::Error;

/// Errors that can occur while talking to the recipe API
#[derive(Error, Debug)]
pub enum PantryError {
    /// Transport failure (connection refused, timeout, TLS, ...)
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-2xx status
    #[error("{message}")]
    Status { status: u16, message: String },

    /// The response body was not the JSON we expected
    #[error("Malformed response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// Caller supplied something the API cannot act on
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Reading recipe text from disk or stdin failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PantryError {
    /// HTTP status carried by the error, if the server produced one
    pub fn status(&self) -> Option<u16> {
        match self {
            PantryError::Status { status, .. } => Some(*status),
            PantryError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
