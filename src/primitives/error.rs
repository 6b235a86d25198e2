// Error types for registry contract calls
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RegistryError>;

pub const ERR_UNAUTHORIZED: u8 = 1;
pub const ERR_ALREADY_REGISTERED: u8 = 2;
pub const ERR_NOT_FOUND: u8 = 3;
pub const ERR_INVALID_STATUS: u8 = 4;

/// Caller-facing contract failures. None of them are retryable with the same input.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Sender lacks the required role")]
    Unauthorized,

    #[error("Principal already has a record")]
    AlreadyRegistered,

    #[error("No record for the given id or principal")]
    NotFound,

    #[error("Unknown status code: {0}")]
    InvalidStatus(u8),
}

impl RegistryError {
    /// Numeric code exposed through the call interface
    pub fn code(&self) -> u8 {
        match self {
            RegistryError::Unauthorized => ERR_UNAUTHORIZED,
            RegistryError::AlreadyRegistered => ERR_ALREADY_REGISTERED,
            RegistryError::NotFound => ERR_NOT_FOUND,
            RegistryError::InvalidStatus(_) => ERR_INVALID_STATUS,
        }
    }
}

/// Failures outside contract semantics: loading configuration and call scripts
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(RegistryError::Unauthorized.code(), 1);
        assert_eq!(RegistryError::AlreadyRegistered.code(), 2);
        assert_eq!(RegistryError::NotFound.code(), 3);
        assert_eq!(RegistryError::InvalidStatus(9).code(), 4);
    }

    #[test]
    fn test_invalid_status_message_names_code() {
        assert_eq!(RegistryError::InvalidStatus(7).to_string(), "Unknown status code: 7");
    }
}
