use thiserror::Error;

pub const CONNECTION_MESSAGE: &str = "Could not connect to Allocation Calculator. Is it running?";
pub const TIMEOUT_MESSAGE: &str = "Allocation Calculator request timed out.";

#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("HTTP client error: {0}")]
    HttpClientError(#[from] reqwest::Error),

    #[error("TOML parsing error: {0}")]
    TomlParseError(#[from] toml::de::Error),

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Server error: {message}")]
    ServerError { message: String },
}

pub type Result<T> = std::result::Result<T, AppError>;

/// Every way a calculation request can end without a usable Calculator reply.
#[derive(Error, Debug)]
pub enum ForwardError {
    /// Preconditions on the submitted form, in the order they were checked.
    #[error("{}.", .0.join(". "))]
    Validation(Vec<String>),

    #[error("{}", CONNECTION_MESSAGE)]
    Connection(#[source] reqwest::Error),

    #[error("{}", TIMEOUT_MESSAGE)]
    Timeout(#[source] reqwest::Error),

    /// Non-2xx reply. The body is kept when it was valid JSON.
    #[error("API error: HTTP status {status}")]
    Status {
        status: reqwest::StatusCode,
        body: Option<serde_json::Value>,
    },

    #[error("API error: {0}")]
    Request(#[source] reqwest::Error),
}

impl ForwardError {
    /// Sorts a transport failure into connection, timeout or generic request error.
    pub fn from_transport(err: reqwest::Error) -> Self {
        if err.is_connect() {
            ForwardError::Connection(err)
        } else if err.is_timeout() {
            ForwardError::Timeout(err)
        } else {
            ForwardError::Request(err)
        }
    }

    /// True when a request left this process, whatever became of it.
    pub fn was_sent(&self) -> bool {
        !matches!(self, ForwardError::Validation(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message_joins_with_trailing_period() {
        let err = ForwardError::Validation(vec![
            "At least one agent is required".to_string(),
            "At least one chore is required".to_string(),
        ]);
        assert_eq!(
            err.to_string(),
            "At least one agent is required. At least one chore is required."
        );
        assert!(!err.was_sent());
    }

    #[test]
    fn test_status_error_message() {
        let err = ForwardError::Status {
            status: reqwest::StatusCode::BAD_GATEWAY,
            body: None,
        };
        assert_eq!(err.to_string(), "API error: HTTP status 502 Bad Gateway");
        assert!(err.was_sent());
    }

    #[test]
    fn test_config_error_display() {
        let err = AppError::InvalidConfigValueError {
            field: "calculator.url".to_string(),
            value: "ftp://x".to_string(),
            reason: "Unsupported URL scheme: ftp".to_string(),
        };
        assert!(err.to_string().contains("calculator.url"));
    }
}
