//! Table block orchestration.
//!
//! # Responsibility
//! - Route pointer/keyboard/button input to selection, gesture and editing
//!   operations.
//! - Hand every patched `TableData` snapshot to the owning note page.
//!
//! # Invariants
//! - The owner only ever receives fresh values; the controller never hands out
//!   mutable access to its snapshot.
//! - `on_change` fires only when an operation actually changed the table.
//! - Clipboard failures are reported to the caller and recorded as status.

use crate::config::TableEditorConfig;
use crate::model::table::{CellPos, CellRect, TableData};
use crate::table::clipboard::{copy_text, paste_text, ClipboardError, ClipboardPort};
use crate::table::geometry::{GestureController, PointerPoint};
use crate::table::selection::{PointerButton, SelectionTracker};
use crate::table::{grid, span};
use log::{debug, warn};

/// Callbacks implemented by the component owning a table block.
pub trait TableBlockHost {
    /// Receives the next table value after a structural or content edit.
    fn on_change(&mut self, next: TableData);
    /// Pointer interaction began on the block.
    fn on_select(&mut self);
    /// User asked to remove the block.
    fn on_delete(&mut self);
}

impl<T: TableBlockHost + ?Sized> TableBlockHost for &mut T {
    fn on_change(&mut self, next: TableData) {
        (**self).on_change(next);
    }

    fn on_select(&mut self) {
        (**self).on_select();
    }

    fn on_delete(&mut self) {
        (**self).on_delete();
    }
}

/// Editor for one table block on a note page.
pub struct TableBlockController<H: TableBlockHost, C: ClipboardPort> {
    table: TableData,
    selected: bool,
    selection: SelectionTracker,
    gesture: GestureController,
    config: TableEditorConfig,
    host: H,
    clipboard: C,
    status: Option<String>,
}

impl<H: TableBlockHost, C: ClipboardPort> TableBlockController<H, C> {
    /// Creates a controller rendering `table` with default configuration.
    pub fn new(table: TableData, host: H, clipboard: C) -> Self {
        Self::with_config(table, host, clipboard, TableEditorConfig::default())
    }

    pub fn with_config(
        table: TableData,
        host: H,
        clipboard: C,
        config: TableEditorConfig,
    ) -> Self {
        Self {
            table,
            selected: false,
            selection: SelectionTracker::new(),
            gesture: GestureController::new(),
            config,
            host,
            clipboard,
            status: None,
        }
    }

    /// Accepts the owner's current render state.
    pub fn sync(&mut self, table: TableData, selected: bool) {
        if table.id != self.table.id {
            self.selection.clear();
            self.gesture.release();
        }
        self.table = table;
        self.selected = selected;
    }

    pub fn table(&self) -> &TableData {
        &self.table
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub fn selection(&self) -> &SelectionTracker {
        &self.selection
    }

    pub fn gesture(&self) -> &GestureController {
        &self.gesture
    }

    pub fn config(&self) -> &TableEditorConfig {
        &self.config
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn clipboard(&self) -> &C {
        &self.clipboard
    }

    /// Last non-fatal status message, e.g. a clipboard failure.
    pub fn status_message(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn clear_status(&mut self) {
        self.status = None;
    }

    /// Pointer pressed on a cell: focuses the block and anchors selection.
    pub fn pointer_down_cell(&mut self, row: usize, col: usize, button: PointerButton) {
        self.host.on_select();
        let pos = CellPos::new(row, col);
        if self.table.contains(pos) {
            self.selection.press(pos, button);
        }
    }

    /// Pointer entered a cell, possibly with the primary button held.
    pub fn pointer_enter_cell(&mut self, row: usize, col: usize, primary_held: bool) {
        let pos = CellPos::new(row, col);
        if self.table.contains(pos) {
            self.selection.enter(pos, primary_held);
        }
    }

    /// Pointer released anywhere: ends the gesture and selection extension.
    pub fn pointer_up(&mut self) {
        if self.gesture.release() {
            debug!("event=table_gesture module=table status=released");
        }
        self.selection.release();
    }

    /// Starts moving the block from the drag handle.
    pub fn begin_drag(&mut self, x: f64, y: f64) {
        self.host.on_select();
        self.gesture.begin_drag(PointerPoint::new(x, y), &self.table);
    }

    /// Starts resizing the block from the resize handle.
    pub fn begin_resize(&mut self, x: f64, y: f64) {
        self.host.on_select();
        self.gesture.begin_resize(PointerPoint::new(x, y), &self.table);
    }

    /// Feeds a pointer move to the active gesture, if any.
    pub fn pointer_move(&mut self, x: f64, y: f64) {
        let pointer = PointerPoint::new(x, y);
        if let Some(next) = self.gesture.pointer_move(pointer, &self.table, &self.config) {
            self.emit(next);
        }
    }

    /// Replaces the value of one visible cell.
    pub fn edit_cell(&mut self, row: usize, col: usize, value: impl Into<String>) {
        let next = self.table.with_cell_value(CellPos::new(row, col), value);
        self.emit(next);
    }

    pub fn add_row(&mut self) {
        let next = grid::add_row(&self.table, &self.config);
        self.emit(next);
    }

    pub fn add_col(&mut self) {
        let next = grid::add_col(&self.table, &self.config);
        self.emit(next);
    }

    pub fn remove_row(&mut self) {
        let next = grid::remove_row(&self.table);
        self.emit(next);
    }

    pub fn remove_col(&mut self) {
        let next = grid::remove_col(&self.table);
        self.emit(next);
    }

    /// Merges the current selection rectangle.
    pub fn merge_selection(&mut self) {
        let Some(rect) = self.selection.rect() else {
            debug!("event=table_merge module=table status=noop reason=no_selection");
            return;
        };
        let next = span::merge(&self.table, rect, self.config.merge_policy);
        self.emit(next);
    }

    /// Splits the merged region owning the selection anchor.
    pub fn split_selection(&mut self) {
        let Some(anchor) = self.selection.anchor() else {
            debug!("event=table_split module=table status=noop reason=no_selection");
            return;
        };
        self.split_at(anchor.row, anchor.col);
    }

    /// Splits the merged region owning `(row, col)`.
    pub fn split_at(&mut self, row: usize, col: usize) {
        let next = span::split(&self.table, CellPos::new(row, col));
        self.emit(next);
    }

    /// Copies the selection as TSV to the clipboard.
    ///
    /// Does nothing without a selection.
    ///
    /// # Errors
    /// - Returns the clipboard failure; the status message is set as well.
    pub fn copy_selection(&mut self) -> Result<(), ClipboardError> {
        let Some(rect) = self.selection.rect() else {
            return Ok(());
        };
        let text = copy_text(&self.table, rect);
        match self.clipboard.write_text(&text) {
            Ok(()) => {
                self.status = None;
                debug!(
                    "event=table_copy module=table status=ok rows={} cols={}",
                    rect.height(),
                    rect.width()
                );
                Ok(())
            }
            Err(err) => Err(self.report_clipboard_failure("copy", err)),
        }
    }

    /// Pastes clipboard TSV at the selection's top-left cell.
    ///
    /// Does nothing without a selection.
    ///
    /// # Errors
    /// - Returns the clipboard failure; the status message is set as well.
    pub fn paste_at_selection(&mut self) -> Result<(), ClipboardError> {
        let Some(rect) = self.selection.rect() else {
            return Ok(());
        };
        let text = match self.clipboard.read_text() {
            Ok(text) => text,
            Err(err) => return Err(self.report_clipboard_failure("paste", err)),
        };
        self.status = None;
        let next = paste_text(&self.table, rect.top_left(), &text);
        self.emit(next);
        Ok(())
    }

    /// Returns the current selection rectangle, if any.
    pub fn selection_rect(&self) -> Option<CellRect> {
        self.selection.rect()
    }

    /// Asks the owner to remove this block.
    pub fn request_delete(&mut self) {
        self.gesture.release();
        self.selection.clear();
        self.host.on_delete();
    }

    fn emit(&mut self, next: TableData) {
        if next == self.table {
            return;
        }
        self.table = next.clone();
        self.host.on_change(next);
    }

    fn report_clipboard_failure(&mut self, action: &str, err: ClipboardError) -> ClipboardError {
        warn!("event=table_{action} module=table status=error error={err}");
        self.status = Some(format!("Could not {action}: {err}"));
        err
    }
}

#[cfg(test)]
mod tests {
    use super::{TableBlockController, TableBlockHost};
    use crate::model::table::TableData;
    use crate::table::clipboard::MemoryClipboard;
    use crate::table::selection::PointerButton;

    #[derive(Default)]
    struct RecordingHost {
        changes: Vec<TableData>,
        selects: usize,
        deletes: usize,
    }

    impl TableBlockHost for RecordingHost {
        fn on_change(&mut self, next: TableData) {
            self.changes.push(next);
        }

        fn on_select(&mut self) {
            self.selects += 1;
        }

        fn on_delete(&mut self) {
            self.deletes += 1;
        }
    }

    #[test]
    fn sync_with_same_block_keeps_selection() {
        let table = TableData::new(0.0, 0.0);
        let mut controller = TableBlockController::new(
            table.clone(),
            RecordingHost::default(),
            MemoryClipboard::new(),
        );
        controller.pointer_down_cell(0, 0, PointerButton::Primary);

        let moved = TableData { x: 50.0, ..table };
        controller.sync(moved, true);
        assert!(controller.is_selected());
        assert_eq!(controller.table().x, 50.0);
        assert!(controller.selection_rect().is_some());
        assert!(controller.host().changes.is_empty());
    }

    #[test]
    fn sync_with_other_block_drops_interaction_state() {
        let mut controller = TableBlockController::new(
            TableData::new(0.0, 0.0),
            RecordingHost::default(),
            MemoryClipboard::new(),
        );
        controller.pointer_down_cell(0, 0, PointerButton::Primary);
        controller.begin_drag(0.0, 0.0);

        controller.sync(TableData::new(0.0, 0.0), false);
        assert!(!controller.is_selected());
        assert!(controller.selection_rect().is_none());
        assert!(!controller.gesture().is_active());
    }

    #[test]
    fn pointer_down_selects_block() {
        let mut controller = TableBlockController::new(
            TableData::new(0.0, 0.0),
            RecordingHost::default(),
            MemoryClipboard::new(),
        );
        controller.pointer_down_cell(1, 1, PointerButton::Primary);
        controller.begin_drag(0.0, 0.0);
        assert_eq!(controller.host().selects, 2);
    }

    #[test]
    fn request_delete_notifies_owner_and_ends_gesture() {
        let mut controller = TableBlockController::new(
            TableData::new(0.0, 0.0),
            RecordingHost::default(),
            MemoryClipboard::new(),
        );
        controller.begin_resize(10.0, 10.0);
        controller.request_delete();

        assert_eq!(controller.host().deletes, 1);
        assert!(!controller.gesture().is_active());
        assert!(controller.selection_rect().is_none());
    }
}
