//! Spreadsheet configuration.
//!
//! # Example
//!
//! ```
//! use horizon_sheet::SpreadsheetConfig;
//!
//! let config = SpreadsheetConfig::from_toml_str(r#"
//! formula_prefix = "="
//! csv_delimiter = ";"
//! "#).unwrap();
//!
//! assert_eq!(config.csv_delimiter, ';');
//! assert_eq!(config.column_separator, "\t");
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{SheetError, SheetResult};

/// Settings shared by every part of one spreadsheet instance.
///
/// Missing keys in a TOML source take their default values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpreadsheetConfig {
    /// Leading character that marks a cell value as a formula.
    pub formula_prefix: char,
    /// Separator between cells of a row in clipboard text.
    pub column_separator: String,
    /// Separator between rows in clipboard text.
    pub row_separator: String,
    /// Field delimiter used by CSV export. Must be ASCII.
    pub csv_delimiter: char,
    /// Height used for rows that have not been measured yet.
    pub default_row_height: f32,
    /// Width used for columns that have not been measured yet.
    pub default_column_width: f32,
}

impl Default for SpreadsheetConfig {
    fn default() -> Self {
        Self {
            formula_prefix: '=',
            column_separator: "\t".to_string(),
            row_separator: "\n".to_string(),
            csv_delimiter: ',',
            default_row_height: 24.0,
            default_column_width: 96.0,
        }
    }
}

impl SpreadsheetConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses and validates a TOML document.
    pub fn from_toml_str(source: &str) -> SheetResult<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> SheetResult<Self> {
        let path = path.as_ref();
        let source =
            std::fs::read_to_string(path).map_err(|err| SheetError::config_io(path, err))?;
        Self::from_toml_str(&source)
    }

    /// Serializes the configuration to TOML.
    pub fn to_toml_string(&self) -> SheetResult<String> {
        toml::to_string(self).map_err(|err| SheetError::config(err.to_string()))
    }

    /// Checks the invariants serde cannot express.
    pub fn validate(&self) -> SheetResult<()> {
        if self.column_separator.is_empty() || self.row_separator.is_empty() {
            return Err(SheetError::config("clipboard separators must not be empty"));
        }
        if self.column_separator == self.row_separator {
            return Err(SheetError::config(
                "column and row separators must differ",
            ));
        }
        if !self.csv_delimiter.is_ascii() {
            return Err(SheetError::config(format!(
                "CSV delimiter '{}' is not ASCII",
                self.csv_delimiter
            )));
        }
        if self.default_row_height <= 0.0 || self.default_column_width <= 0.0 {
            return Err(SheetError::config("default dimensions must be positive"));
        }
        Ok(())
    }

    /// The CSV delimiter as a byte, falling back to `,` for non-ASCII input.
    pub fn csv_delimiter_byte(&self) -> u8 {
        u8::try_from(self.csv_delimiter)
            .ok()
            .filter(u8::is_ascii)
            .unwrap_or(b',')
    }

    pub fn with_formula_prefix(mut self, prefix: char) -> Self {
        self.formula_prefix = prefix;
        self
    }

    pub fn with_separators(
        mut self,
        column_separator: impl Into<String>,
        row_separator: impl Into<String>,
    ) -> Self {
        self.column_separator = column_separator.into();
        self.row_separator = row_separator.into();
        self
    }

    pub fn with_csv_delimiter(mut self, delimiter: char) -> Self {
        self.csv_delimiter = delimiter;
        self
    }

    pub fn with_default_dimensions(mut self, row_height: f32, column_width: f32) -> Self {
        self.default_row_height = row_height;
        self.default_column_width = column_width;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SpreadsheetConfig::default();
        assert_eq!(config.formula_prefix, '=');
        assert_eq!(config.column_separator, "\t");
        assert_eq!(config.row_separator, "\n");
        assert_eq!(config.csv_delimiter_byte(), b',');
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = SpreadsheetConfig::from_toml_str("default_row_height = 30.0").unwrap();
        assert_eq!(config.default_row_height, 30.0);
        assert_eq!(config.default_column_width, 96.0);
        assert_eq!(config.formula_prefix, '=');
    }

    #[test]
    fn test_rejects_invalid() {
        assert!(matches!(
            SpreadsheetConfig::from_toml_str("column_separator = \"\""),
            Err(SheetError::Config { .. })
        ));
        assert!(SpreadsheetConfig::from_toml_str("csv_delimiter = \"é\"").is_err());
        assert!(SpreadsheetConfig::from_toml_str("formula_prefix = 3").is_err());
        let same = SpreadsheetConfig::new().with_separators("\n", "\n");
        assert!(same.validate().is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let config = SpreadsheetConfig::new()
            .with_formula_prefix('+')
            .with_csv_delimiter(';')
            .with_default_dimensions(20.0, 80.0);
        let text = config.to_toml_string().unwrap();
        assert_eq!(SpreadsheetConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_missing_file() {
        let err = SpreadsheetConfig::from_toml_file("/nonexistent/sheet.toml").unwrap_err();
        assert!(matches!(err, SheetError::ConfigIo { .. }));
    }
}
