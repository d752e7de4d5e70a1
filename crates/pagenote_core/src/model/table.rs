//! Table block domain model.
//!
//! # Responsibility
//! - Define the persisted `TableData` value embedded in note documents.
//! - Provide coordinate/rectangle helpers shared by table editing modules.
//!
//! # Invariants
//! - Every row has exactly `col_widths.len()` cells.
//! - `cells.len() == row_heights.len()`.
//! - A table always has at least one row and one column.
//! - A visible cell with spans `(R, C)` at `(r, c)` owns the rectangle
//!   `[r, r+R) x [c, c+C)`; every other cell of that rectangle is hidden.
//!
//! # See also
//! - table::span for merge/split semantics.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier of one table block.
pub type TableId = Uuid;

/// Default column width for new columns and fresh tables.
pub const DEFAULT_COL_WIDTH: u32 = 120;
/// Default row height for new rows and fresh tables.
pub const DEFAULT_ROW_HEIGHT: u32 = 42;
/// Row count of a freshly added table.
pub const DEFAULT_ROWS: usize = 4;
/// Column count of a freshly added table.
pub const DEFAULT_COLS: usize = 4;

/// One grid cell.
///
/// Hidden cells keep their `value` but are excluded from rendering, copy and
/// direct edits until the owning region is split.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cell {
    pub value: String,
    pub row_span: u32,
    pub col_span: u32,
    pub hidden: bool,
}

impl Cell {
    /// Empty, visible, 1x1 cell.
    pub fn unit() -> Self {
        Self::with_value("")
    }

    /// Visible 1x1 cell holding `value`.
    pub fn with_value(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            row_span: 1,
            col_span: 1,
            hidden: false,
        }
    }

    /// Whether this cell is a visible 1x1 cell.
    pub fn is_unit(&self) -> bool {
        !self.hidden && self.row_span == 1 && self.col_span == 1
    }

    /// Whether this cell is the visible root of a multi-cell region.
    pub fn is_merged_root(&self) -> bool {
        !self.hidden && (self.row_span > 1 || self.col_span > 1)
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::unit()
    }
}

/// Persisted table block value.
///
/// Serialized with camelCase keys (`colWidths`, `rowHeights`, `rowSpan`,
/// `colSpan`) so the note document keeps one stable shape across readers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableData {
    pub id: TableId,
    pub x: f64,
    pub y: f64,
    pub col_widths: Vec<u32>,
    pub row_heights: Vec<u32>,
    pub cells: Vec<Vec<Cell>>,
}

impl TableData {
    /// Creates the default 4x4 table at the given page position.
    pub fn new(x: f64, y: f64) -> Self {
        Self::with_shape(
            x,
            y,
            DEFAULT_ROWS,
            DEFAULT_COLS,
            DEFAULT_COL_WIDTH,
            DEFAULT_ROW_HEIGHT,
        )
    }

    /// Creates an empty table of `rows x cols` unit cells.
    ///
    /// Zero dimensions are raised to 1 to keep the minimum-shape invariant.
    pub fn with_shape(
        x: f64,
        y: f64,
        rows: usize,
        cols: usize,
        col_width: u32,
        row_height: u32,
    ) -> Self {
        let rows = rows.max(1);
        let cols = cols.max(1);
        Self {
            id: Uuid::new_v4(),
            x: x.max(0.0),
            y: y.max(0.0),
            col_widths: vec![col_width.max(1); cols],
            row_heights: vec![row_height.max(1); rows],
            cells: vec![vec![Cell::unit(); cols]; rows],
        }
    }

    /// Builds a table of unit cells from row-major values.
    ///
    /// Short rows are padded with empty cells up to the widest row.
    pub fn from_values<R, V>(rows: R) -> Self
    where
        R: IntoIterator,
        R::Item: IntoIterator<Item = V>,
        V: Into<String>,
    {
        let mut cells: Vec<Vec<Cell>> = rows
            .into_iter()
            .map(|row| row.into_iter().map(Cell::with_value).collect())
            .collect();
        let cols = cells.iter().map(Vec::len).max().unwrap_or(0).max(1);
        if cells.is_empty() {
            cells.push(Vec::new());
        }
        for row in &mut cells {
            row.resize_with(cols, Cell::unit);
        }

        let mut table = Self::with_shape(
            0.0,
            0.0,
            cells.len(),
            cols,
            DEFAULT_COL_WIDTH,
            DEFAULT_ROW_HEIGHT,
        );
        table.cells = cells;
        table
    }

    pub fn row_count(&self) -> usize {
        self.row_heights.len()
    }

    pub fn col_count(&self) -> usize {
        self.col_widths.len()
    }

    /// Returns the cell at `pos`, or `None` when out of bounds.
    pub fn cell(&self, pos: CellPos) -> Option<&Cell> {
        self.cells.get(pos.row).and_then(|row| row.get(pos.col))
    }

    /// Returns whether `pos` lies inside the grid.
    pub fn contains(&self, pos: CellPos) -> bool {
        pos.row < self.row_count() && pos.col < self.col_count()
    }

    /// Sum of all column widths, saturating at `u32::MAX`.
    pub fn total_width(&self) -> u32 {
        saturating_total(&self.col_widths)
    }

    /// Sum of all row heights, saturating at `u32::MAX`.
    pub fn total_height(&self) -> u32 {
        saturating_total(&self.row_heights)
    }

    /// Returns a copy with `value` written at `pos`.
    ///
    /// Out-of-bounds and hidden targets leave the table unchanged.
    pub fn with_cell_value(&self, pos: CellPos, value: impl Into<String>) -> Self {
        let mut next = self.clone();
        if let Some(cell) = next
            .cells
            .get_mut(pos.row)
            .and_then(|row| row.get_mut(pos.col))
        {
            if !cell.hidden {
                cell.value = value.into();
            }
        }
        next
    }

    /// Checks the shape invariants of data arriving from outside the editor.
    ///
    /// # Errors
    /// - Empty grid, mismatched row/column counts, or zero spans/sizes.
    pub fn validate(&self) -> Result<(), TableShapeError> {
        if self.row_heights.is_empty() || self.col_widths.is_empty() {
            return Err(TableShapeError::Empty);
        }
        if self.cells.len() != self.row_heights.len() {
            return Err(TableShapeError::RowCountMismatch {
                cells: self.cells.len(),
                heights: self.row_heights.len(),
            });
        }
        for (row_index, row) in self.cells.iter().enumerate() {
            if row.len() != self.col_widths.len() {
                return Err(TableShapeError::RaggedRow {
                    row: row_index,
                    len: row.len(),
                    expected: self.col_widths.len(),
                });
            }
            for (col_index, cell) in row.iter().enumerate() {
                if cell.row_span == 0 || cell.col_span == 0 {
                    return Err(TableShapeError::ZeroSpan(CellPos::new(row_index, col_index)));
                }
            }
        }
        if self.col_widths.contains(&0) || self.row_heights.contains(&0) {
            return Err(TableShapeError::ZeroSize);
        }
        if !(self.x.is_finite() && self.y.is_finite()) || self.x < 0.0 || self.y < 0.0 {
            return Err(TableShapeError::InvalidPosition {
                x: self.x,
                y: self.y,
            });
        }
        Ok(())
    }
}

fn saturating_total(sizes: &[u32]) -> u32 {
    sizes.iter().fold(0u32, |total, size| total.saturating_add(*size))
}

/// Shape violations detected by `TableData::validate`.
#[derive(Debug, Clone, PartialEq)]
pub enum TableShapeError {
    Empty,
    RowCountMismatch {
        cells: usize,
        heights: usize,
    },
    RaggedRow {
        row: usize,
        len: usize,
        expected: usize,
    },
    ZeroSpan(CellPos),
    ZeroSize,
    InvalidPosition {
        x: f64,
        y: f64,
    },
}

impl Display for TableShapeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "table must have at least one row and one column"),
            Self::RowCountMismatch { cells, heights } => write!(
                f,
                "table has {cells} cell rows but {heights} row heights"
            ),
            Self::RaggedRow { row, len, expected } => write!(
                f,
                "table row {row} has {len} cells, expected {expected}"
            ),
            Self::ZeroSpan(pos) => write!(f, "cell {pos} has a zero span"),
            Self::ZeroSize => write!(f, "column widths and row heights must be positive"),
            Self::InvalidPosition { x, y } => {
                write!(f, "table position ({x}, {y}) must be finite and non-negative")
            }
        }
    }
}

impl Error for TableShapeError {}

/// Zero-based grid coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CellPos {
    pub row: usize,
    pub col: usize,
}

impl CellPos {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl Display for CellPos {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Selection rectangle between two corners, in any order.
///
/// Consumers call [`CellRect::normalized`] before iterating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellRect {
    pub start_row: usize,
    pub start_col: usize,
    pub end_row: usize,
    pub end_col: usize,
}

impl CellRect {
    pub const fn new(start_row: usize, start_col: usize, end_row: usize, end_col: usize) -> Self {
        Self {
            start_row,
            start_col,
            end_row,
            end_col,
        }
    }

    /// Rectangle spanning two corner coordinates.
    pub fn spanning(a: CellPos, b: CellPos) -> Self {
        Self::new(a.row, a.col, b.row, b.col)
    }

    /// Single-cell rectangle.
    pub fn single(pos: CellPos) -> Self {
        Self::spanning(pos, pos)
    }

    /// Returns the min/max normalized form; start is top-left.
    pub fn normalized(self) -> Self {
        Self {
            start_row: self.start_row.min(self.end_row),
            start_col: self.start_col.min(self.end_col),
            end_row: self.start_row.max(self.end_row),
            end_col: self.start_col.max(self.end_col),
        }
    }

    pub fn top_left(self) -> CellPos {
        let rect = self.normalized();
        CellPos::new(rect.start_row, rect.start_col)
    }

    pub fn height(self) -> usize {
        let rect = self.normalized();
        rect.end_row - rect.start_row + 1
    }

    pub fn width(self) -> usize {
        let rect = self.normalized();
        rect.end_col - rect.start_col + 1
    }

    pub fn is_single_cell(self) -> bool {
        self.height() == 1 && self.width() == 1
    }

    pub fn contains(self, pos: CellPos) -> bool {
        let rect = self.normalized();
        (rect.start_row..=rect.end_row).contains(&pos.row)
            && (rect.start_col..=rect.end_col).contains(&pos.col)
    }

    /// Clips the normalized rectangle to a `rows x cols` grid.
    ///
    /// Returns `None` when the rectangle lies entirely outside the grid.
    pub fn clip_to(self, rows: usize, cols: usize) -> Option<Self> {
        let rect = self.normalized();
        if rows == 0 || cols == 0 || rect.start_row >= rows || rect.start_col >= cols {
            return None;
        }
        Some(Self {
            start_row: rect.start_row,
            start_col: rect.start_col,
            end_row: rect.end_row.min(rows - 1),
            end_col: rect.end_col.min(cols - 1),
        })
    }

    /// Iterates the normalized rectangle in row-major order.
    pub fn positions(self) -> impl Iterator<Item = CellPos> {
        let rect = self.normalized();
        (rect.start_row..=rect.end_row)
            .flat_map(move |row| (rect.start_col..=rect.end_col).map(move |col| CellPos::new(row, col)))
    }
}

#[cfg(test)]
mod tests {
    use super::{Cell, CellPos, CellRect, TableData, TableShapeError};

    #[test]
    fn new_table_is_default_four_by_four() {
        let table = TableData::new(10.0, 20.0);
        assert_eq!(table.row_count(), 4);
        assert_eq!(table.col_count(), 4);
        assert_eq!(table.col_widths, vec![120; 4]);
        assert_eq!(table.row_heights, vec![42; 4]);
        assert!(table.cells.iter().flatten().all(Cell::is_unit));
        assert!(table.validate().is_ok());
    }

    #[test]
    fn normalized_orders_corners() {
        let rect = CellRect::new(3, 2, 1, 0).normalized();
        assert_eq!(rect, CellRect::new(1, 0, 3, 2));
        assert_eq!(rect.height(), 3);
        assert_eq!(rect.width(), 3);
    }

    #[test]
    fn clip_to_drops_outside_rectangles() {
        assert_eq!(CellRect::new(5, 5, 6, 6).clip_to(4, 4), None);
        assert_eq!(
            CellRect::new(2, 2, 9, 9).clip_to(4, 4),
            Some(CellRect::new(2, 2, 3, 3))
        );
    }

    #[test]
    fn validate_rejects_ragged_rows() {
        let mut table = TableData::new(0.0, 0.0);
        table.cells[2].pop();
        assert_eq!(
            table.validate().unwrap_err(),
            TableShapeError::RaggedRow {
                row: 2,
                len: 3,
                expected: 4,
            }
        );
    }

    #[test]
    fn with_cell_value_skips_hidden_targets() {
        let mut table = TableData::new(0.0, 0.0);
        table.cells[0][1].hidden = true;
        let next = table.with_cell_value(CellPos::new(0, 1), "x");
        assert_eq!(next, table);
        let next = table.with_cell_value(CellPos::new(0, 0), "x");
        assert_eq!(next.cells[0][0].value, "x");
    }

    #[test]
    fn totals_saturate_instead_of_overflowing() {
        let mut table = TableData::new(0.0, 0.0);
        table.col_widths = vec![u32::MAX / 2; 4];
        assert_eq!(table.total_width(), u32::MAX);
        assert_eq!(table.total_height(), 168);
    }

    #[test]
    fn serialization_uses_camel_case_keys() {
        let table = TableData::from_values([["a", "b"]]);
        let json = serde_json::to_value(&table).unwrap();
        assert!(json.get("colWidths").is_some());
        assert!(json.get("rowHeights").is_some());
        assert_eq!(json["cells"][0][1]["value"], "b");
        assert_eq!(json["cells"][0][1]["rowSpan"], 1);
        assert_eq!(json["cells"][0][1]["colSpan"], 1);
        assert_eq!(json["cells"][0][1]["hidden"], false);
    }
}
