//! Merge/split of rectangular cell regions.
//!
//! # Responsibility
//! - Turn a selected rectangle into one spanning root cell.
//! - Restore a spanning root back into visible unit cells.
//! - Resolve which root owns any grid coordinate.
//!
//! # Invariants
//! - Merge and split never change cell values.
//! - A rejected request returns the input unchanged.
//! - Split from any covered coordinate acts on the owning root.

use crate::config::MergePolicy;
use crate::model::table::{CellPos, CellRect, TableData};
use log::debug;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Coordinate to owning-root lookup for one table snapshot.
///
/// Visible cells own themselves. A hidden cell is owned by the nearest root
/// preceding it in row-major order whose span covers it; hidden cells with no
/// covering root have no owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpanIndex {
    owners: Vec<Vec<Option<CellPos>>>,
}

impl SpanIndex {
    pub fn build(table: &TableData) -> Self {
        let rows = table.row_count();
        let cols = table.col_count();
        let mut owners = vec![vec![None; cols]; rows];

        for (row_index, row) in table.cells.iter().enumerate().take(rows) {
            for (col_index, cell) in row.iter().enumerate().take(cols) {
                if cell.hidden {
                    continue;
                }
                let root = CellPos::new(row_index, col_index);
                owners[row_index][col_index] = Some(root);

                let row_end = (row_index + cell.row_span.max(1) as usize).min(rows);
                let col_end = (col_index + cell.col_span.max(1) as usize).min(cols);
                for covered_row in row_index..row_end {
                    for covered_col in col_index..col_end {
                        let hidden = table
                            .cell(CellPos::new(covered_row, covered_col))
                            .is_some_and(|cell| cell.hidden);
                        if hidden {
                            owners[covered_row][covered_col] = Some(root);
                        }
                    }
                }
            }
        }

        Self { owners }
    }

    /// Returns the root owning `pos`, or `None` for out-of-bounds or
    /// orphaned hidden cells.
    pub fn owner(&self, pos: CellPos) -> Option<CellPos> {
        self.owners
            .get(pos.row)
            .and_then(|row| row.get(pos.col))
            .copied()
            .flatten()
    }
}

/// Why a merge request left the table unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeRejection {
    OutOfBounds,
    SingleCell,
    HiddenCell(CellPos),
    Overlap(CellPos),
}

impl Display for MergeRejection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OutOfBounds => write!(f, "merge rectangle lies outside the table"),
            Self::SingleCell => write!(f, "merge rectangle covers a single cell"),
            Self::HiddenCell(pos) => write!(f, "cell {pos} is already part of a merged region"),
            Self::Overlap(pos) => write!(f, "cell {pos} overlaps another merged region"),
        }
    }
}

impl Error for MergeRejection {}

/// Why a split request left the table unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitRejection {
    OutOfBounds,
    NoOwner(CellPos),
    NotMerged(CellPos),
}

impl Display for SplitRejection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OutOfBounds => write!(f, "split target lies outside the table"),
            Self::NoOwner(pos) => write!(f, "hidden cell {pos} has no owning merged region"),
            Self::NotMerged(pos) => write!(f, "cell {pos} is not a merged region"),
        }
    }
}

impl Error for SplitRejection {}

/// Merges `rect` into one spanning cell rooted at its top-left corner.
///
/// The rectangle is normalized and clipped to the grid first.
///
/// # Errors
/// - `OutOfBounds` when nothing of the rectangle lies in the grid.
/// - `SingleCell` when the clipped rectangle is one cell.
/// - `HiddenCell` when a cell of the rectangle is already hidden.
/// - `Overlap` (strict policy only) when the declared region of any merged
///   root, inside or outside the rectangle, intersects it.
pub fn try_merge(
    table: &TableData,
    rect: CellRect,
    policy: MergePolicy,
) -> Result<TableData, MergeRejection> {
    let rect = rect
        .clip_to(table.row_count(), table.col_count())
        .ok_or(MergeRejection::OutOfBounds)?;
    if rect.is_single_cell() {
        return Err(MergeRejection::SingleCell);
    }

    for pos in rect.positions() {
        if table.cells[pos.row][pos.col].hidden {
            return Err(MergeRejection::HiddenCell(pos));
        }
    }

    if policy == MergePolicy::Strict {
        if let Some(root) = intersecting_root(table, rect) {
            return Err(MergeRejection::Overlap(root));
        }
    }

    let root = rect.top_left();
    let mut next = table.clone();
    for pos in rect.positions() {
        let cell = &mut next.cells[pos.row][pos.col];
        if pos == root {
            cell.row_span = rect.height() as u32;
            cell.col_span = rect.width() as u32;
        } else {
            cell.hidden = true;
        }
    }
    Ok(next)
}

/// First merged root, in row-major order, whose declared region intersects
/// `rect`. Declared spans count even when the covered cells are not hidden.
fn intersecting_root(table: &TableData, rect: CellRect) -> Option<CellPos> {
    table.cells.iter().enumerate().find_map(|(row_index, row)| {
        row.iter().enumerate().find_map(|(col_index, cell)| {
            if !cell.is_merged_root() {
                return None;
            }
            let last_row = row_index + cell.row_span as usize - 1;
            let last_col = col_index + cell.col_span as usize - 1;
            let intersects = row_index <= rect.end_row
                && rect.start_row <= last_row
                && col_index <= rect.end_col
                && rect.start_col <= last_col;
            intersects.then_some(CellPos::new(row_index, col_index))
        })
    })
}

/// Merges `rect`, returning the input unchanged when the merge is rejected.
pub fn merge(table: &TableData, rect: CellRect, policy: MergePolicy) -> TableData {
    match try_merge(table, rect, policy) {
        Ok(next) => {
            let rect = rect.normalized();
            debug!(
                "event=table_merge module=table status=ok rows={}..={} cols={}..={}",
                rect.start_row, rect.end_row, rect.start_col, rect.end_col
            );
            next
        }
        Err(reason) => {
            debug!("event=table_merge module=table status=noop reason=\"{reason}\"");
            table.clone()
        }
    }
}

/// Splits the merged region owning `pos` back into visible unit cells.
///
/// # Errors
/// - `OutOfBounds` when `pos` is outside the grid.
/// - `NoOwner` when `pos` is a hidden cell no root covers.
/// - `NotMerged` when the owning root is already a unit cell.
pub fn try_split(table: &TableData, pos: CellPos) -> Result<TableData, SplitRejection> {
    if !table.contains(pos) {
        return Err(SplitRejection::OutOfBounds);
    }
    let root = SpanIndex::build(table)
        .owner(pos)
        .ok_or(SplitRejection::NoOwner(pos))?;
    let root_cell = &table.cells[root.row][root.col];
    if root_cell.row_span <= 1 && root_cell.col_span <= 1 {
        return Err(SplitRejection::NotMerged(root));
    }

    let region = CellRect::new(
        root.row,
        root.col,
        root.row + root_cell.row_span as usize - 1,
        root.col + root_cell.col_span as usize - 1,
    );
    let Some(region) = region.clip_to(table.row_count(), table.col_count()) else {
        return Err(SplitRejection::OutOfBounds);
    };

    let mut next = table.clone();
    for covered in region.positions() {
        let cell = &mut next.cells[covered.row][covered.col];
        cell.hidden = false;
        cell.row_span = 1;
        cell.col_span = 1;
    }
    Ok(next)
}

/// Splits at `pos`, returning the input unchanged when the split is rejected.
pub fn split(table: &TableData, pos: CellPos) -> TableData {
    match try_split(table, pos) {
        Ok(next) => {
            debug!("event=table_split module=table status=ok target={pos}");
            next
        }
        Err(reason) => {
            debug!("event=table_split module=table status=noop reason=\"{reason}\"");
            table.clone()
        }
    }
}
