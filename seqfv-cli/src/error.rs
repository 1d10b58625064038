//! Error handling for SeqFV CLI

use seqfv_core::FvError;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for SeqFV CLI operations
#[derive(Error, Debug)]
pub enum CliError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Input/Output error: {message}")]
    Io { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Fixture error: {message}")]
    Fixture { message: String },

    #[error("Request failed for {query_id}: {message}")]
    Fetch { query_id: String, message: String },

    #[error("No sequence features are available for {query_id}")]
    NoData { query_id: String, reason: String },

    #[error("Output error: {message}")]
    Output { message: String },
}

impl CliError {
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config { message: message.into() }
    }

    pub fn io<S: Into<String>>(message: S) -> Self {
        Self::Io { message: message.into() }
    }

    pub fn file_not_found(path: PathBuf) -> Self {
        Self::FileNotFound { path }
    }

    pub fn fixture<S: Into<String>>(message: S) -> Self {
        Self::Fixture { message: message.into() }
    }

    pub fn output<S: Into<String>>(message: S) -> Self {
        Self::Output { message: message.into() }
    }

    /// Exit status: 2 for an empty view, 1 otherwise
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::NoData { .. } => 2,
            _ => 1,
        }
    }
}

impl From<FvError> for CliError {
    fn from(err: FvError) -> Self {
        match err {
            FvError::Fetch { query_id, message } => Self::Fetch { query_id, message },
            FvError::NoData { query_id, reason } => Self::NoData { query_id, reason },
            FvError::Config { message } => Self::config(message),
            FvError::Io { message } => Self::io(message),
            FvError::Json { message } => Self::fixture(message),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::io(err.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        Self::output(format!("JSON serialization error: {}", err))
    }
}

impl From<toml::ser::Error> for CliError {
    fn from(err: toml::ser::Error) -> Self {
        Self::config(format!("TOML serialization error: {}", err))
    }
}

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;

/// Provide helpful error messages and suggestions
pub fn format_error_with_suggestions(error: &CliError) -> String {
    let mut message = error.to_string();

    match error {
        CliError::FileNotFound { path } => {
            message.push_str(&format!(
                "\n\nSuggestions:\n\
                 • Check that the file path is correct: {}\n\
                 • Ensure you have read permissions for the file",
                path.display()
            ));
        }

        CliError::Fetch { .. } => {
            message.push_str(
                "\n\nSuggestions:\n\
                 • Check that the fixture bundle records this identifier\n\
                 • Verify the identifier type matches the subcommand (entity, instance, uniprot)",
            );
        }

        CliError::NoData { reason, .. } => {
            message.push_str(&format!("\n\nReason: {}", reason));
        }

        CliError::Config { .. } => {
            message.push_str(
                "\n\nSuggestions:\n\
                 • Check your seqfv.toml configuration file\n\
                 • Use 'seqfv config --example' to generate a sample configuration\n\
                 • Verify that the annotation map file is valid JSON",
            );
        }

        _ => {}
    }

    message
}

/// Print error with helpful suggestions and exit
pub fn print_error_and_exit(error: &CliError) -> ! {
    eprintln!("Error: {}", format_error_with_suggestions(error));
    std::process::exit(error.exit_code());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = CliError::config("test message");
        assert!(matches!(err, CliError::Config { .. }));
        assert_eq!(err.to_string(), "Configuration error: test message");
    }

    #[test]
    fn test_error_suggestions() {
        let err = CliError::file_not_found(PathBuf::from("fixtures.json"));
        let formatted = format_error_with_suggestions(&err);
        assert!(formatted.contains("Suggestions:"));
        assert!(formatted.contains("Check that the file path is correct"));
    }

    #[test]
    fn test_no_data_conversion() {
        let err: CliError = FvError::no_data("4HHB.Z", "instance maps to no entity").into();
        assert_eq!(err.to_string(), "No sequence features are available for 4HHB.Z");
        assert_eq!(err.exit_code(), 2);
        assert!(format_error_with_suggestions(&err).contains("instance maps to no entity"));
    }

    #[test]
    fn test_fetch_conversion() {
        let err: CliError = FvError::fetch("P69905", "no recorded alignment").into();
        assert!(matches!(err, CliError::Fetch { .. }));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let cli_err: CliError = io_err.into();
        assert!(matches!(cli_err, CliError::Io { .. }));
    }
}
