use thiserror::Error;

/// Why a request was rejected. Both kinds are reported to the caller as a
/// 400 response, never propagated out of the handler.
#[derive(Error, Debug)]
pub enum GreeterError {
    #[error("Unable to unmarshal JSON")]
    MalformedInput { reason: String },

    #[error("Please provide a {field}")]
    MissingField { field: String },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration: {message}")]
    Invalid { message: String },

    #[error("Failed to load configuration from {origin}: {error}")]
    LoadFailed {
        origin: String,
        #[source]
        error: Box<dyn std::error::Error + Send + Sync>,
    },
}

pub type Result<T> = std::result::Result<T, GreeterError>;

impl From<serde_json::Error> for GreeterError {
    fn from(err: serde_json::Error) -> Self {
        GreeterError::MalformedInput {
            reason: err.to_string(),
        }
    }
}

impl GreeterError {
    pub fn missing(field: &str) -> Self {
        GreeterError::MissingField {
            field: field.to_string(),
        }
    }

    pub fn status_code(&self) -> u16 {
        match self {
            GreeterError::MalformedInput { .. } => 400,
            GreeterError::MissingField { .. } => 400,
        }
    }

    /// Detail for the logs; the caller only ever sees the `Display` text.
    pub fn reason(&self) -> String {
        match self {
            GreeterError::MalformedInput { reason } => reason.clone(),
            GreeterError::MissingField { field } => format!("field `{}` is empty or absent", field),
        }
    }
}
