use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the cash-flow report.
#[derive(Error, Debug)]
pub enum CashFlowError {
    /// A statement file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The input stream cannot be decoded or split into fields at all.
    #[error("Unreadable input: {0}")]
    UnrecoverableInput(String),

    /// A computation that needs at least one transaction received none.
    #[error("Empty dataset: {0}")]
    EmptyDataset(String),

    /// A JSON document could not be produced.
    #[error("Failed to serialize JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// An error originating from the terminal / TUI layer.
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CashFlowError {
    /// The single message shown to the user when a run fails.
    pub fn user_message(&self) -> String {
        format!("Error processing the file: {self}")
    }

    /// Whether this error signals "no usable rows" rather than a broken run.
    pub fn is_empty_dataset(&self) -> bool {
        matches!(self, CashFlowError::EmptyDataset(_))
    }
}

/// Convenience alias used throughout the cash-flow crates.
pub type Result<T> = std::result::Result<T, CashFlowError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_file_read() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err = CashFlowError::FileRead {
            path: PathBuf::from("/some/movements.csv"),
            source: io_err,
        };
        let msg = err.to_string();
        assert!(msg.contains("Failed to read file"));
        assert!(msg.contains("/some/movements.csv"));
        assert!(msg.contains("no such file"));
    }

    #[test]
    fn test_error_display_unrecoverable_input() {
        let err = CashFlowError::UnrecoverableInput("file is empty".to_string());
        assert_eq!(err.to_string(), "Unreadable input: file is empty");
    }

    #[test]
    fn test_error_display_empty_dataset() {
        let err = CashFlowError::EmptyDataset("no transactions".to_string());
        assert_eq!(err.to_string(), "Empty dataset: no transactions");
        assert!(err.is_empty_dataset());
    }

    #[test]
    fn test_user_message_prefix() {
        let err = CashFlowError::UnrecoverableInput("no delimited lines".to_string());
        assert_eq!(
            err.user_message(),
            "Error processing the file: Unreadable input: no delimited lines"
        );
        assert!(!err.is_empty_dataset());
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: CashFlowError = io_err.into();
        assert!(err.to_string().contains("denied"));
    }

    #[test]
    fn test_error_from_serde_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{invalid}").unwrap_err();
        let err: CashFlowError = json_err.into();
        assert!(err.to_string().contains("Failed to serialize JSON"));
    }
}
