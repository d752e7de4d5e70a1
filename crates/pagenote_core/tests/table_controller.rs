use pagenote_core::model::table::TableData;
use pagenote_core::{
    ClipboardError, ClipboardPort, MemoryClipboard, PointerButton, TableBlockController,
    TableBlockHost,
};

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

struct FailingClipboard;

impl ClipboardPort for FailingClipboard {
    fn read_text(&mut self) -> Result<String, ClipboardError> {
        Err(ClipboardError::PermissionDenied("sandboxed".to_string()))
    }

    fn write_text(&mut self, _text: &str) -> Result<(), ClipboardError> {
        Err(ClipboardError::Unavailable("no display".to_string()))
    }
}

fn select(
    controller: &mut TableBlockController<impl TableBlockHost, impl ClipboardPort>,
    from: (usize, usize),
    to: (usize, usize),
) {
    controller.pointer_down_cell(from.0, from.1, PointerButton::Primary);
    controller.pointer_enter_cell(to.0, to.1, true);
    controller.pointer_up();
}

#[test]
fn drag_select_merge_and_split_notify_owner() {
    let mut controller = TableBlockController::new(
        TableData::new(0.0, 0.0),
        RecordingHost::default(),
        MemoryClipboard::new(),
    );

    select(&mut controller, (0, 0), (1, 1));
    controller.merge_selection();
    assert_eq!(controller.table().cells[0][0].row_span, 2);
    assert_eq!(controller.host().changes.len(), 1);
    assert_eq!(controller.host().selects, 1);

    controller.pointer_down_cell(1, 1, PointerButton::Primary);
    controller.split_selection();
    assert!(controller.table().cells[1][1].is_unit());
    assert!(!controller.table().cells[1][1].hidden);
    assert_eq!(controller.host().changes.len(), 2);
}

#[test]
fn noop_operations_do_not_call_on_change() {
    let mut controller = TableBlockController::new(
        TableData::with_shape(0.0, 0.0, 1, 1, 120, 42),
        RecordingHost::default(),
        MemoryClipboard::new(),
    );

    controller.remove_row();
    controller.remove_col();
    controller.merge_selection();
    controller.split_at(0, 0);
    controller.pointer_move(40.0, 40.0);
    controller.edit_cell(3, 3, "out of range");

    assert!(controller.host().changes.is_empty());
}

#[test]
fn secondary_press_focuses_without_selecting() {
    let mut controller = TableBlockController::new(
        TableData::new(0.0, 0.0),
        RecordingHost::default(),
        MemoryClipboard::new(),
    );

    controller.pointer_down_cell(2, 2, PointerButton::Secondary);
    assert_eq!(controller.host().selects, 1);
    assert!(controller.selection_rect().is_none());
}

#[test]
fn copy_then_paste_through_memory_clipboard() {
    let table = TableData::from_values([["A", "B"], ["", ""]]);
    let mut controller =
        TableBlockController::new(table, RecordingHost::default(), MemoryClipboard::new());

    select(&mut controller, (0, 0), (0, 1));
    controller.copy_selection().unwrap();
    assert_eq!(controller.clipboard().text(), Some("A\tB"));

    controller.pointer_down_cell(1, 0, PointerButton::Primary);
    controller.paste_at_selection().unwrap();
    assert_eq!(controller.table().cells[1][0].value, "A");
    assert_eq!(controller.table().cells[1][1].value, "B");
    assert_eq!(controller.host().changes.len(), 1);
}

#[test]
fn clipboard_failures_surface_as_error_and_status() {
    let mut controller = TableBlockController::new(
        TableData::new(0.0, 0.0),
        RecordingHost::default(),
        FailingClipboard,
    );
    select(&mut controller, (0, 0), (1, 0));

    let copy_error = controller.copy_selection().unwrap_err();
    assert_eq!(copy_error, ClipboardError::Unavailable("no display".to_string()));
    assert_eq!(
        controller.status_message(),
        Some("Could not copy: clipboard unavailable: no display")
    );

    let paste_error = controller.paste_at_selection().unwrap_err();
    assert!(matches!(paste_error, ClipboardError::PermissionDenied(_)));
    assert!(controller
        .status_message()
        .is_some_and(|status| status.starts_with("Could not paste")));
    assert!(controller.host().changes.is_empty());

    controller.clear_status();
    assert!(controller.status_message().is_none());
}

#[test]
fn empty_memory_clipboard_reports_empty() {
    let mut controller = TableBlockController::new(
        TableData::new(0.0, 0.0),
        RecordingHost::default(),
        MemoryClipboard::new(),
    );
    controller.pointer_down_cell(0, 0, PointerButton::Primary);

    assert_eq!(controller.paste_at_selection(), Err(ClipboardError::Empty));
}

#[test]
fn resize_handle_streams_changes_until_release() {
    let mut controller = TableBlockController::new(
        TableData::new(10.0, 10.0),
        RecordingHost::default(),
        MemoryClipboard::new(),
    );

    controller.begin_resize(480.0, 168.0);
    controller.pointer_move(960.0, 168.0);
    controller.pointer_move(1440.0, 168.0);
    controller.pointer_up();
    controller.pointer_move(2000.0, 168.0);

    let changes = &controller.host().changes;
    assert_eq!(changes.len(), 2);
    assert_eq!(changes[1].col_widths, vec![360; 4]);
    assert_eq!(controller.table().col_widths, vec![360; 4]);
}

#[test]
fn request_delete_clears_interaction_state() {
    let mut controller = TableBlockController::new(
        TableData::new(0.0, 0.0),
        RecordingHost::default(),
        MemoryClipboard::new(),
    );
    controller.pointer_down_cell(0, 0, PointerButton::Primary);
    controller.begin_drag(5.0, 5.0);

    controller.request_delete();
    assert_eq!(controller.host().deletes, 1);
    assert!(controller.selection_rect().is_none());
    assert!(!controller.gesture().is_active());
}
