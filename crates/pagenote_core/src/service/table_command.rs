//! Stateless table command dispatch.
//!
//! # Responsibility
//! - Apply one serialized editing command to a table snapshot.
//! - Validate table data arriving from outside the core before editing.
//!
//! # Invariants
//! - Input snapshots are never mutated; the outcome carries a new value.
//! - `copy` never changes the table.

use crate::config::TableEditorConfig;
use crate::model::table::{CellPos, CellRect, TableData, TableShapeError};
use crate::table::{clipboard, geometry, grid, span};
use log::debug;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// One editing command, tagged by `op` on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum TableCommand {
    AddRow,
    AddCol,
    RemoveRow,
    RemoveCol,
    Merge { rect: CellRect },
    Split { row: usize, col: usize },
    SetCell { row: usize, col: usize, value: String },
    Copy { rect: CellRect },
    Paste { row: usize, col: usize, text: String },
    MoveTo { x: f64, y: f64 },
    ResizeTo { width: f64, height: f64 },
}

impl TableCommand {
    /// Stable op label used in logs.
    pub fn label(&self) -> &'static str {
        match self {
            Self::AddRow => "add_row",
            Self::AddCol => "add_col",
            Self::RemoveRow => "remove_row",
            Self::RemoveCol => "remove_col",
            Self::Merge { .. } => "merge",
            Self::Split { .. } => "split",
            Self::SetCell { .. } => "set_cell",
            Self::Copy { .. } => "copy",
            Self::Paste { .. } => "paste",
            Self::MoveTo { .. } => "move_to",
            Self::ResizeTo { .. } => "resize_to",
        }
    }
}

/// Result of applying one command.
#[derive(Debug, Clone, PartialEq)]
pub struct TableCommandOutcome {
    pub table: TableData,
    /// Whether `table` differs from the input snapshot.
    pub changed: bool,
    /// TSV produced by `copy`.
    pub clipboard_text: Option<String>,
}

/// Command parse/validation errors.
#[derive(Debug)]
pub enum TableCommandError {
    InvalidTable(TableShapeError),
    Parse(serde_json::Error),
}

impl Display for TableCommandError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidTable(err) => write!(f, "invalid table: {err}"),
            Self::Parse(err) => write!(f, "invalid table payload: {err}"),
        }
    }
}

impl Error for TableCommandError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidTable(err) => Some(err),
            Self::Parse(err) => Some(err),
        }
    }
}

impl From<TableShapeError> for TableCommandError {
    fn from(value: TableShapeError) -> Self {
        Self::InvalidTable(value)
    }
}

impl From<serde_json::Error> for TableCommandError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

/// Applies `command` to a validated copy of `table`.
///
/// # Errors
/// - `InvalidTable` when `table` breaks the shape invariants.
pub fn apply_command(
    table: &TableData,
    command: &TableCommand,
    config: &TableEditorConfig,
) -> Result<TableCommandOutcome, TableCommandError> {
    table.validate()?;

    let mut clipboard_text = None;
    let next = match command {
        TableCommand::AddRow => grid::add_row(table, config),
        TableCommand::AddCol => grid::add_col(table, config),
        TableCommand::RemoveRow => grid::remove_row(table),
        TableCommand::RemoveCol => grid::remove_col(table),
        TableCommand::Merge { rect } => span::merge(table, *rect, config.merge_policy),
        TableCommand::Split { row, col } => span::split(table, CellPos::new(*row, *col)),
        TableCommand::SetCell { row, col, value } => {
            table.with_cell_value(CellPos::new(*row, *col), value.as_str())
        }
        TableCommand::Copy { rect } => {
            clipboard_text = Some(clipboard::copy_text(table, *rect));
            table.clone()
        }
        TableCommand::Paste { row, col, text } => {
            clipboard::paste_text(table, CellPos::new(*row, *col), text)
        }
        TableCommand::MoveTo { x, y } => geometry::move_to(table, *x, *y),
        TableCommand::ResizeTo { width, height } => {
            geometry::resize_to(table, *width, *height, config)
        }
    };

    let changed = next != *table;
    debug!(
        "event=table_command module=service status=ok op={} changed={}",
        command.label(),
        changed
    );
    Ok(TableCommandOutcome {
        table: next,
        changed,
        clipboard_text,
    })
}

/// Parses a table and a command from JSON and applies the command.
///
/// # Errors
/// - `Parse` for malformed JSON; `InvalidTable` for shape violations.
pub fn apply_command_json(
    table_json: &str,
    command_json: &str,
    config: &TableEditorConfig,
) -> Result<TableCommandOutcome, TableCommandError> {
    let table: TableData = serde_json::from_str(table_json)?;
    let command: TableCommand = serde_json::from_str(command_json)?;
    apply_command(&table, &command, config)
}

#[cfg(test)]
mod tests {
    use super::{apply_command, apply_command_json, TableCommand, TableCommandError};
    use crate::config::TableEditorConfig;
    use crate::model::table::{CellRect, TableData};

    #[test]
    fn command_wire_format_is_tagged_by_op() {
        let command: TableCommand = serde_json::from_str(
            r#"{"op":"merge","rect":{"startRow":1,"startCol":1,"endRow":0,"endCol":0}}"#,
        )
        .unwrap();
        assert_eq!(
            command,
            TableCommand::Merge {
                rect: CellRect::new(1, 1, 0, 0)
            }
        );
    }

    #[test]
    fn copy_returns_text_without_changing_table() {
        let table = TableData::from_values([["A", "B"]]);
        let outcome = apply_command(
            &table,
            &TableCommand::Copy {
                rect: CellRect::new(0, 0, 0, 1),
            },
            &TableEditorConfig::default(),
        )
        .unwrap();
        assert!(!outcome.changed);
        assert_eq!(outcome.clipboard_text.as_deref(), Some("A\tB"));
    }

    #[test]
    fn invalid_table_is_rejected_before_editing() {
        let mut table = TableData::new(0.0, 0.0);
        table.row_heights.pop();
        let err = apply_command(&table, &TableCommand::AddRow, &TableEditorConfig::default())
            .unwrap_err();
        assert!(matches!(err, TableCommandError::InvalidTable(_)));
    }

    #[test]
    fn json_entry_point_reports_parse_errors() {
        let err = apply_command_json("{}", r#"{"op":"add_row"}"#, &TableEditorConfig::default())
            .unwrap_err();
        assert!(matches!(err, TableCommandError::Parse(_)));
    }

    #[test]
    fn paste_past_addressable_range_is_a_noop() {
        let table = TableData::from_values([["a", "b"], ["c", "d"]]);
        let table_json = serde_json::to_string(&table).unwrap();
        let command_json = format!(
            r#"{{"op":"paste","row":{},"col":0,"text":"x\ny"}}"#,
            usize::MAX
        );

        let outcome =
            apply_command_json(&table_json, &command_json, &TableEditorConfig::default()).unwrap();
        assert!(!outcome.changed);
        assert_eq!(outcome.table, table);
    }
}
