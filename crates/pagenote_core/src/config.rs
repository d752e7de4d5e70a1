//! Table editor configuration.
//!
//! # Responsibility
//! - Hold sizing defaults and resize floors for table blocks.
//! - Select the merge overlap policy.
//!
//! # Invariants
//! - All sizes are positive.
//! - Default column width and row height are not below their floors, so new
//!   rows and columns never start smaller than a resize could make them.

use crate::model::table::{DEFAULT_COLS, DEFAULT_COL_WIDTH, DEFAULT_ROWS, DEFAULT_ROW_HEIGHT};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// How `merge` treats merged regions that touch the target rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergePolicy {
    /// Rejects a merge when any cell of the rectangle is hidden, already a
    /// spanning root, or covered by a region rooted outside the rectangle.
    #[default]
    Strict,
    /// Rejects a merge only when a cell of the rectangle is hidden.
    Permissive,
}

/// Tunables for table creation, growth and resize.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableEditorConfig {
    pub initial_rows: usize,
    pub initial_cols: usize,
    pub default_col_width: u32,
    pub default_row_height: u32,
    pub min_total_width: u32,
    pub min_total_height: u32,
    pub min_col_width: u32,
    pub min_row_height: u32,
    pub merge_policy: MergePolicy,
}

impl Default for TableEditorConfig {
    fn default() -> Self {
        Self {
            initial_rows: DEFAULT_ROWS,
            initial_cols: DEFAULT_COLS,
            default_col_width: DEFAULT_COL_WIDTH,
            default_row_height: DEFAULT_ROW_HEIGHT,
            min_total_width: 240,
            min_total_height: 120,
            min_col_width: 80,
            min_row_height: 34,
            merge_policy: MergePolicy::Strict,
        }
    }
}

impl TableEditorConfig {
    /// Parses a JSON override document; missing keys keep their defaults.
    ///
    /// # Errors
    /// - Malformed JSON or values rejected by [`TableEditorConfig::validate`].
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(raw).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads a JSON override file.
    ///
    /// # Errors
    /// - `Io` when the file cannot be read; otherwise as [`TableEditorConfig::from_json`].
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|err| ConfigError::Io {
            path: path.to_path_buf(),
            message: err.to_string(),
        })?;
        Self::from_json(&raw)
    }

    /// Checks that every size is positive and defaults respect the floors.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let checks: [(&'static str, u64); 8] = [
            ("initial_rows", self.initial_rows as u64),
            ("initial_cols", self.initial_cols as u64),
            ("default_col_width", u64::from(self.default_col_width)),
            ("default_row_height", u64::from(self.default_row_height)),
            ("min_total_width", u64::from(self.min_total_width)),
            ("min_total_height", u64::from(self.min_total_height)),
            ("min_col_width", u64::from(self.min_col_width)),
            ("min_row_height", u64::from(self.min_row_height)),
        ];
        for (field, value) in checks {
            if value == 0 {
                return Err(ConfigError::NonPositive(field));
            }
        }
        if self.default_col_width < self.min_col_width {
            return Err(ConfigError::BelowFloor {
                field: "default_col_width",
                value: self.default_col_width,
                floor: self.min_col_width,
            });
        }
        if self.default_row_height < self.min_row_height {
            return Err(ConfigError::BelowFloor {
                field: "default_row_height",
                value: self.default_row_height,
                floor: self.min_row_height,
            });
        }
        Ok(())
    }
}

/// Configuration load/validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Io { path: PathBuf, message: String },
    Parse(String),
    NonPositive(&'static str),
    BelowFloor {
        field: &'static str,
        value: u32,
        floor: u32,
    },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, message } => {
                write!(f, "cannot read table editor config `{}`: {message}", path.display())
            }
            Self::Parse(message) => write!(f, "invalid table editor config: {message}"),
            Self::NonPositive(field) => write!(f, "config field `{field}` must be positive"),
            Self::BelowFloor {
                field,
                value,
                floor,
            } => write!(f, "config field `{field}` is {value}, below its floor {floor}"),
        }
    }
}

impl Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::{ConfigError, MergePolicy, TableEditorConfig};

    #[test]
    fn from_json_keeps_defaults_for_missing_keys() {
        let config = TableEditorConfig::from_json(r#"{"min_col_width": 60}"#).unwrap();
        assert_eq!(config.min_col_width, 60);
        assert_eq!(config.default_col_width, 120);
        assert_eq!(config.merge_policy, MergePolicy::Strict);
    }

    #[test]
    fn from_json_parses_merge_policy() {
        let config = TableEditorConfig::from_json(r#"{"merge_policy": "permissive"}"#).unwrap();
        assert_eq!(config.merge_policy, MergePolicy::Permissive);
    }

    #[test]
    fn validate_rejects_zero_sizes() {
        let err = TableEditorConfig::from_json(r#"{"min_row_height": 0}"#).unwrap_err();
        assert_eq!(err, ConfigError::NonPositive("min_row_height"));
    }

    #[test]
    fn validate_rejects_defaults_below_floors() {
        let err = TableEditorConfig::from_json(r#"{"default_col_width": 60}"#).unwrap_err();
        assert_eq!(
            err,
            ConfigError::BelowFloor {
                field: "default_col_width",
                value: 60,
                floor: 80,
            }
        );

        let err =
            TableEditorConfig::from_json(r#"{"min_row_height": 50, "default_row_height": 42}"#)
                .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::BelowFloor {
                field: "default_row_height",
                ..
            }
        ));
    }

    #[test]
    fn from_file_reads_overrides_and_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("table_editor.json");
        std::fs::write(&path, r#"{"merge_policy": "permissive", "initial_rows": 2}"#).unwrap();

        let config = TableEditorConfig::from_file(&path).unwrap();
        assert_eq!(config.merge_policy, MergePolicy::Permissive);
        assert_eq!(config.initial_rows, 2);

        let missing = TableEditorConfig::from_file(dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(missing, ConfigError::Io { .. }));
    }
}
