//! Tab-separated clipboard interchange for table selections.
//!
//! # Responsibility
//! - Serialize a rectangle of visible values as TSV text.
//! - Write pasted TSV text into the grid, clipped to bounds.
//! - Abstract system clipboard access behind `ClipboardPort`.
//!
//! # Invariants
//! - Hidden cells always copy as empty text.
//! - Paste never grows the grid and never writes hidden cells.
//! - Clipboard failures are returned, never swallowed.

use crate::model::table::{CellPos, CellRect, TableData};
use log::debug;
use std::error::Error;
use std::fmt::{Display, Formatter};

const COLUMN_SEPARATOR: &str = "\t";
const ROW_SEPARATOR: &str = "\n";

/// Serializes the visible values of `rect` as TSV.
///
/// The rectangle is normalized and clipped to the grid. Returns an empty
/// string when it lies entirely outside.
pub fn copy_text(table: &TableData, rect: CellRect) -> String {
    let Some(rect) = rect.clip_to(table.row_count(), table.col_count()) else {
        return String::new();
    };

    let lines = (rect.start_row..=rect.end_row)
        .map(|row| {
            (rect.start_col..=rect.end_col)
                .map(|col| match table.cell(CellPos::new(row, col)) {
                    Some(cell) if !cell.hidden => cell.value.as_str(),
                    _ => "",
                })
                .collect::<Vec<_>>()
                .join(COLUMN_SEPARATOR)
        })
        .collect::<Vec<_>>();
    lines.join(ROW_SEPARATOR)
}

/// Splits TSV text into rows of values.
///
/// A trailing carriage return on each line is dropped so CRLF clipboards
/// paste the same values as LF clipboards.
pub fn parse_tsv(text: &str) -> Vec<Vec<&str>> {
    text.split(ROW_SEPARATOR)
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .map(|line| line.split(COLUMN_SEPARATOR).collect())
        .collect()
}

/// Writes TSV `text` into the grid starting at `anchor`.
///
/// Targets outside the grid or hidden are skipped; all other targets are
/// overwritten.
pub fn paste_text(table: &TableData, anchor: CellPos, text: &str) -> TableData {
    let mut next = table.clone();
    let mut written = 0usize;
    let mut skipped = 0usize;

    for (row_offset, values) in parse_tsv(text).into_iter().enumerate() {
        for (col_offset, value) in values.into_iter().enumerate() {
            let target = anchor
                .row
                .checked_add(row_offset)
                .zip(anchor.col.checked_add(col_offset))
                .and_then(|(row, col)| next.cells.get_mut(row)?.get_mut(col));
            match target {
                Some(cell) if !cell.hidden => {
                    cell.value = value.to_string();
                    written += 1;
                }
                _ => skipped += 1,
            }
        }
    }

    debug!(
        "event=table_paste module=table status=ok anchor={anchor} written={written} skipped={skipped}"
    );
    next
}

/// System clipboard failure classes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClipboardError {
    /// Clipboard backend could not be reached.
    Unavailable(String),
    /// Platform refused access.
    PermissionDenied(String),
    /// Clipboard holds no text.
    Empty,
}

impl Display for ClipboardError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unavailable(details) => write!(f, "clipboard unavailable: {details}"),
            Self::PermissionDenied(details) => write!(f, "clipboard access denied: {details}"),
            Self::Empty => write!(f, "clipboard has no text"),
        }
    }
}

impl Error for ClipboardError {}

/// Text clipboard seam used by the table controller.
pub trait ClipboardPort {
    fn read_text(&mut self) -> Result<String, ClipboardError>;
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// In-process clipboard for headless hosts and tests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryClipboard {
    text: Option<String>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
        }
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }
}

impl ClipboardPort for MemoryClipboard {
    fn read_text(&mut self) -> Result<String, ClipboardError> {
        self.text.clone().ok_or(ClipboardError::Empty)
    }

    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        self.text = Some(text.to_string());
        Ok(())
    }
}

impl<T: ClipboardPort + ?Sized> ClipboardPort for &mut T {
    fn read_text(&mut self) -> Result<String, ClipboardError> {
        (**self).read_text()
    }

    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        (**self).write_text(text)
    }
}

/// OS clipboard backed by `arboard`.
///
/// A backend handle is opened per call; handles are not `Send` on every
/// platform and opening one is cheap.
#[cfg(feature = "system-clipboard")]
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClipboard;

#[cfg(feature = "system-clipboard")]
impl SystemClipboard {
    fn open() -> Result<arboard::Clipboard, ClipboardError> {
        arboard::Clipboard::new().map_err(map_arboard_error)
    }
}

#[cfg(feature = "system-clipboard")]
impl ClipboardPort for SystemClipboard {
    fn read_text(&mut self) -> Result<String, ClipboardError> {
        let text = Self::open()?.get_text().map_err(map_arboard_error)?;
        if text.is_empty() {
            return Err(ClipboardError::Empty);
        }
        Ok(text)
    }

    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        Self::open()?
            .set_text(text.to_string())
            .map_err(map_arboard_error)
    }
}

#[cfg(feature = "system-clipboard")]
fn map_arboard_error(err: arboard::Error) -> ClipboardError {
    match err {
        arboard::Error::ContentNotAvailable => ClipboardError::Empty,
        arboard::Error::ClipboardNotSupported => {
            ClipboardError::Unavailable("platform clipboard not supported".to_string())
        }
        arboard::Error::ClipboardOccupied => {
            ClipboardError::PermissionDenied("clipboard occupied by another process".to_string())
        }
        other => ClipboardError::Unavailable(other.to_string()),
    }
}
