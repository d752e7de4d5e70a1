//! Drag-move and proportional resize gestures.
//!
//! # Responsibility
//! - Convert pointer deltas into block position and column/row sizes.
//! - Own the single active gesture of one table block.
//!
//! # Invariants
//! - At most one gesture is active; release always returns to idle.
//! - Position never goes negative.
//! - Resize respects the configured total and per-column/per-row floors.
//! - Every move is computed from the gesture-start snapshot, so deltas never
//!   compound.

use crate::config::TableEditorConfig;
use crate::model::table::TableData;
use log::debug;

/// Pointer position in page coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerPoint {
    pub x: f64,
    pub y: f64,
}

impl PointerPoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// State captured when a drag-move starts.
#[derive(Debug, Clone, PartialEq)]
pub struct DragSnapshot {
    pub pointer: PointerPoint,
    pub block_x: f64,
    pub block_y: f64,
}

/// State captured when a resize starts.
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeSnapshot {
    pub pointer: PointerPoint,
    pub total_width: u32,
    pub total_height: u32,
    pub col_widths: Vec<u32>,
    pub row_heights: Vec<u32>,
}

/// Gesture lifecycle of one table block.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum GestureState {
    #[default]
    Idle,
    Dragging(DragSnapshot),
    Resizing(ResizeSnapshot),
}

/// Two-state gesture machine fed by pointer events.
#[derive(Debug, Clone, Default)]
pub struct GestureController {
    state: GestureState,
}

impl GestureController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &GestureState {
        &self.state
    }

    pub fn is_active(&self) -> bool {
        !matches!(self.state, GestureState::Idle)
    }

    /// Starts a drag-move, replacing any gesture still marked active.
    pub fn begin_drag(&mut self, pointer: PointerPoint, table: &TableData) {
        self.log_if_replacing("drag");
        self.state = GestureState::Dragging(DragSnapshot {
            pointer,
            block_x: table.x,
            block_y: table.y,
        });
    }

    /// Starts a resize, replacing any gesture still marked active.
    pub fn begin_resize(&mut self, pointer: PointerPoint, table: &TableData) {
        self.log_if_replacing("resize");
        self.state = GestureState::Resizing(ResizeSnapshot {
            pointer,
            total_width: table.total_width(),
            total_height: table.total_height(),
            col_widths: table.col_widths.clone(),
            row_heights: table.row_heights.clone(),
        });
    }

    /// Applies a pointer move to `table`.
    ///
    /// Returns `None` while idle.
    pub fn pointer_move(
        &self,
        pointer: PointerPoint,
        table: &TableData,
        config: &TableEditorConfig,
    ) -> Option<TableData> {
        match &self.state {
            GestureState::Idle => None,
            GestureState::Dragging(snapshot) => {
                let mut next = table.clone();
                next.x = (snapshot.block_x + pointer.x - snapshot.pointer.x).max(0.0);
                next.y = (snapshot.block_y + pointer.y - snapshot.pointer.y).max(0.0);
                Some(next)
            }
            GestureState::Resizing(snapshot) => {
                let requested_width =
                    f64::from(snapshot.total_width) + pointer.x - snapshot.pointer.x;
                let requested_height =
                    f64::from(snapshot.total_height) + pointer.y - snapshot.pointer.y;
                let (col_widths, row_heights) = scaled_sizes(
                    &snapshot.col_widths,
                    &snapshot.row_heights,
                    requested_width,
                    requested_height,
                    config,
                );
                let mut next = table.clone();
                next.col_widths = col_widths;
                next.row_heights = row_heights;
                Some(next)
            }
        }
    }

    /// Ends the active gesture. Returns whether one was active.
    pub fn release(&mut self) -> bool {
        let was_active = self.is_active();
        self.state = GestureState::Idle;
        was_active
    }

    fn log_if_replacing(&self, next: &str) {
        if self.is_active() {
            debug!(
                "event=table_gesture module=table status=replaced next={next} reason=missing_release"
            );
        }
    }
}

/// Moves `table` to `(x, y)`, clamped to the page origin.
pub fn move_to(table: &TableData, x: f64, y: f64) -> TableData {
    let mut next = table.clone();
    next.x = x.max(0.0);
    next.y = y.max(0.0);
    next
}

/// Resizes `table` towards the requested total size.
pub fn resize_to(
    table: &TableData,
    requested_width: f64,
    requested_height: f64,
    config: &TableEditorConfig,
) -> TableData {
    let (col_widths, row_heights) = scaled_sizes(
        &table.col_widths,
        &table.row_heights,
        requested_width,
        requested_height,
        config,
    );
    let mut next = table.clone();
    next.col_widths = col_widths;
    next.row_heights = row_heights;
    next
}

/// Rescales sizes proportionally towards the requested totals.
///
/// Totals are floored to the configured minimum first; each column/row is
/// then scaled, rounded and floored individually, so the realized total can
/// exceed the requested one.
pub fn scaled_sizes(
    col_widths: &[u32],
    row_heights: &[u32],
    requested_width: f64,
    requested_height: f64,
    config: &TableEditorConfig,
) -> (Vec<u32>, Vec<u32>) {
    let target_width = floor_total(requested_width, config.min_total_width);
    let target_height = floor_total(requested_height, config.min_total_height);
    (
        scale_axis(col_widths, target_width, config.min_col_width),
        scale_axis(row_heights, target_height, config.min_row_height),
    )
}

fn floor_total(requested: f64, minimum: u32) -> f64 {
    if requested.is_nan() {
        return f64::from(minimum);
    }
    requested.max(f64::from(minimum))
}

fn scale_axis(sizes: &[u32], target_total: f64, minimum: u32) -> Vec<u32> {
    // Keeps the axis total within u32.
    let ceiling = u32::try_from(sizes.len())
        .map_or(1, |count| u32::MAX / count.max(1))
        .max(minimum);
    let current_total: u64 = sizes.iter().map(|size| u64::from(*size)).sum();
    if current_total == 0 {
        return sizes.iter().map(|size| (*size).clamp(minimum, ceiling)).collect();
    }
    let scale = target_total / current_total as f64;
    sizes
        .iter()
        .map(|size| {
            let scaled = (f64::from(*size) * scale).round();
            // `as` saturates at the u32 bounds.
            (scaled as u32).clamp(minimum, ceiling)
        })
        .collect()
}
