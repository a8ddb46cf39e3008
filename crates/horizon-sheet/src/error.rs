//! Error types for the spreadsheet core.
//!
//! Grid operations never fail: bounds violations resolve to no-ops. Errors
//! only come out of configuration loading, CSV export and direct clipboard
//! backend calls.

use std::path::PathBuf;

use crate::clipboard::ClipboardError;

/// Result type alias for spreadsheet operations.
pub type SheetResult<T> = std::result::Result<T, SheetError>;

/// Errors that can occur outside the grid state machine.
#[derive(Debug, thiserror::Error)]
pub enum SheetError {
    /// Clipboard access failed.
    #[error(transparent)]
    Clipboard(#[from] ClipboardError),

    /// Configuration could not be parsed.
    #[error("Invalid configuration: {message}")]
    Config { message: String },

    /// Configuration file could not be read.
    #[error("Failed to read configuration '{path}': {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// CSV serialization error.
    #[error("CSV export error: {0}")]
    Csv(#[from] csv::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SheetError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a configuration I/O error.
    pub fn config_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ConfigIo {
            path: path.into(),
            source,
        }
    }
}

impl From<toml::de::Error> for SheetError {
    fn from(err: toml::de::Error) -> Self {
        Self::config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = SheetError::config("bad separator");
        assert_eq!(err.to_string(), "Invalid configuration: bad separator");

        let err = SheetError::config_io(
            "sheet.toml",
            std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        );
        assert!(err.to_string().contains("sheet.toml"));
    }

    #[test]
    fn test_clipboard_is_transparent() {
        let err: SheetError = ClipboardError::PermissionDenied.into();
        assert_eq!(err.to_string(), ClipboardError::PermissionDenied.to_string());
    }
}
