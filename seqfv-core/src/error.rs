//! Error types for SeqFV core operations

use thiserror::Error;

/// Main error type for track assembly
#[derive(Error, Debug)]
pub enum FvError {
    #[error("Fetch error for {query_id}: {message}")]
    Fetch { query_id: String, message: String },

    #[error("No data available for {query_id}: {reason}")]
    NoData { query_id: String, reason: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Input/Output error: {message}")]
    Io { message: String },

    #[error("JSON error: {message}")]
    Json { message: String },
}

impl FvError {
    pub fn fetch<S: Into<String>>(query_id: S, message: S) -> Self {
        Self::Fetch {
            query_id: query_id.into(),
            message: message.into(),
        }
    }

    pub fn no_data<S: Into<String>>(query_id: S, reason: S) -> Self {
        Self::NoData {
            query_id: query_id.into(),
            reason: reason.into(),
        }
    }

    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config { message: message.into() }
    }

    pub fn io<S: Into<String>>(message: S) -> Self {
        Self::Io { message: message.into() }
    }

    /// Distinguishes an empty result from a failure so callers can show an empty-state message
    pub fn is_no_data(&self) -> bool {
        matches!(self, Self::NoData { .. })
    }
}

impl From<std::io::Error> for FvError {
    fn from(err: std::io::Error) -> Self {
        Self::io(err.to_string())
    }
}

impl From<serde_json::Error> for FvError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json { message: err.to_string() }
    }
}

/// Result type for core operations
pub type Result<T> = std::result::Result<T, FvError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = FvError::fetch("4HHB_1", "connection refused");
        assert!(matches!(err, FvError::Fetch { .. }));
        assert_eq!(err.to_string(), "Fetch error for 4HHB_1: connection refused");
        assert!(!err.is_no_data());
    }

    #[test]
    fn test_no_data_is_distinguishable() {
        let err = FvError::no_data("1ABC", "empty query sequence");
        assert!(err.is_no_data());
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: FvError = json_err.into();
        assert!(matches!(err, FvError::Json { .. }));
    }
}
