//! Grid shape operations.
//!
//! # Responsibility
//! - Grow and shrink a table by whole rows/columns at the trailing edge.
//!
//! # Invariants
//! - Growth always succeeds and appends unit, visible, empty cells.
//! - Shrinking never goes below one row or one column.
//! - After shrinking, no root span reaches past the remaining grid.

use crate::config::TableEditorConfig;
use crate::model::table::{Cell, TableData};
use log::debug;

/// Appends one row of unit cells using the configured default height.
pub fn add_row(table: &TableData, config: &TableEditorConfig) -> TableData {
    let mut next = table.clone();
    next.cells.push(vec![Cell::unit(); next.col_count()]);
    next.row_heights.push(config.default_row_height);
    debug!(
        "event=table_add_row module=table status=ok rows={}",
        next.row_count()
    );
    next
}

/// Appends one unit cell to every row using the configured default width.
pub fn add_col(table: &TableData, config: &TableEditorConfig) -> TableData {
    let mut next = table.clone();
    for row in &mut next.cells {
        row.push(Cell::unit());
    }
    next.col_widths.push(config.default_col_width);
    debug!(
        "event=table_add_col module=table status=ok cols={}",
        next.col_count()
    );
    next
}

/// Drops the last row; no-op when only one row remains.
///
/// Roots whose region reached into the dropped row lose that row of span.
pub fn remove_row(table: &TableData) -> TableData {
    if table.row_count() <= 1 {
        debug!("event=table_remove_row module=table status=noop reason=min_rows");
        return table.clone();
    }

    let mut next = table.clone();
    next.cells.pop();
    next.row_heights.pop();
    let rows = next.row_count();
    for (row_index, row) in next.cells.iter_mut().enumerate() {
        for cell in row.iter_mut().filter(|cell| !cell.hidden) {
            let limit = (rows - row_index) as u32;
            if cell.row_span > limit {
                cell.row_span = limit;
            }
        }
    }
    debug!("event=table_remove_row module=table status=ok rows={rows}");
    next
}

/// Drops the last column; no-op when only one column remains.
///
/// Roots whose region reached into the dropped column lose that column of
/// span.
pub fn remove_col(table: &TableData) -> TableData {
    if table.col_count() <= 1 {
        debug!("event=table_remove_col module=table status=noop reason=min_cols");
        return table.clone();
    }

    let mut next = table.clone();
    for row in &mut next.cells {
        row.pop();
    }
    next.col_widths.pop();
    let cols = next.col_count();
    for row in &mut next.cells {
        for (col_index, cell) in row.iter_mut().enumerate() {
            if cell.hidden {
                continue;
            }
            let limit = (cols - col_index) as u32;
            if cell.col_span > limit {
                cell.col_span = limit;
            }
        }
    }
    debug!("event=table_remove_col module=table status=ok cols={cols}");
    next
}
