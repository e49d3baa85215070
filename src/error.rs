//! Error types and handling for the `WeatherWise` engine

use thiserror::Error;

/// Main error type for the `WeatherWise` library
#[derive(Error, Debug)]
pub enum WeatherWiseError {
    /// Network or HTTP failure talking to an external source
    #[error("Transport error: {message}")]
    Transport { message: String },

    /// External payload could not be decoded or lacked expected fields
    #[error("Malformed response: {message}")]
    MalformedResponse { message: String },

    /// Out-of-range coordinate, unparseable date and similar usage errors
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl WeatherWiseError {
    /// Create a new transport error
    pub fn transport<S: Into<String>>(message: S) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Create a new malformed-response error
    pub fn malformed<S: Into<String>>(message: S) -> Self {
        Self::MalformedResponse {
            message: message.into(),
        }
    }

    /// Create a new invalid-input error
    pub fn invalid_input<S: Into<String>>(message: S) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Whether this error stems from the environment (network, remote payload)
    /// rather than from the caller.
    #[must_use]
    pub fn is_environmental(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::MalformedResponse { .. })
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            WeatherWiseError::Transport { .. } => {
                "Unable to connect to external weather services. Please check your internet connection."
                    .to_string()
            }
            WeatherWiseError::MalformedResponse { .. } => {
                "An external weather service returned unexpected data.".to_string()
            }
            WeatherWiseError::InvalidInput { message } => {
                format!("Invalid input: {message}")
            }
            WeatherWiseError::Config { .. } => {
                "Configuration error. Please check your config file and API keys.".to_string()
            }
            WeatherWiseError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
        }
    }
}

impl From<reqwest::Error> for WeatherWiseError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::malformed(err.to_string())
        } else {
            Self::transport(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let transport_err = WeatherWiseError::transport("connection refused");
        assert!(matches!(transport_err, WeatherWiseError::Transport { .. }));

        let malformed_err = WeatherWiseError::malformed("missing daily block");
        assert!(matches!(
            malformed_err,
            WeatherWiseError::MalformedResponse { .. }
        ));

        let input_err = WeatherWiseError::invalid_input("latitude 91 out of range");
        assert!(matches!(input_err, WeatherWiseError::InvalidInput { .. }));
    }

    #[test]
    fn test_environmental_classification() {
        assert!(WeatherWiseError::transport("x").is_environmental());
        assert!(WeatherWiseError::malformed("x").is_environmental());
        assert!(!WeatherWiseError::invalid_input("x").is_environmental());
        assert!(!WeatherWiseError::config("x").is_environmental());
    }

    #[test]
    fn test_user_messages() {
        let transport_err = WeatherWiseError::transport("test");
        assert!(transport_err.user_message().contains("Unable to connect"));

        let input_err = WeatherWiseError::invalid_input("bad date");
        assert!(input_err.user_message().contains("bad date"));

        let config_err = WeatherWiseError::config("test");
        assert!(config_err.user_message().contains("Configuration error"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: WeatherWiseError = io_err.into();
        assert!(matches!(err, WeatherWiseError::Io { .. }));
    }
}
