use pagenote_core::model::table::TableData;
use pagenote_core::table::geometry::{move_to, resize_to, scaled_sizes};
use pagenote_core::{GestureController, GestureState, PointerPoint, TableEditorConfig};

#[test]
fn tiny_resize_request_is_floored_per_axis() {
    let config = TableEditorConfig::default();
    let table = TableData::new(0.0, 0.0);
    assert_eq!((table.total_width(), table.total_height()), (480, 168));

    let mut gesture = GestureController::new();
    gesture.begin_resize(PointerPoint::new(500.0, 200.0), &table);
    // Requests a 10x10 total.
    let resized = gesture
        .pointer_move(PointerPoint::new(30.0, 42.0), &table, &config)
        .unwrap();

    assert_eq!(resized.col_widths, vec![80; 4]);
    assert_eq!(resized.row_heights, vec![34; 4]);
    assert!(resized.total_width() >= config.min_total_width);
    assert!(resized.total_height() >= config.min_total_height);
}

#[test]
fn resize_scales_proportionally_from_gesture_start() {
    let config = TableEditorConfig::default();
    let mut table = TableData::new(0.0, 0.0);
    table.col_widths = vec![100, 200, 100, 100];

    let mut gesture = GestureController::new();
    gesture.begin_resize(PointerPoint::new(0.0, 0.0), &table);
    let first = gesture
        .pointer_move(PointerPoint::new(500.0, 0.0), &table, &config)
        .unwrap();
    assert_eq!(first.col_widths, vec![200, 400, 200, 200]);

    let second = gesture
        .pointer_move(PointerPoint::new(500.0, 0.0), &first, &config)
        .unwrap();
    assert_eq!(second.col_widths, first.col_widths);
    assert_eq!(second.row_heights, table.row_heights);
}

#[test]
fn drag_never_leaves_page_origin() {
    let config = TableEditorConfig::default();
    let table = TableData::new(20.0, 20.0);
    let mut gesture = GestureController::new();
    gesture.begin_drag(PointerPoint::new(100.0, 100.0), &table);

    let moved = gesture
        .pointer_move(PointerPoint::new(0.0, 50.0), &table, &config)
        .unwrap();
    assert_eq!((moved.x, moved.y), (0.0, 0.0));
    assert_eq!(moved.cells, table.cells);
}

#[test]
fn release_returns_to_idle_and_ignores_later_moves() {
    let config = TableEditorConfig::default();
    let table = TableData::new(0.0, 0.0);
    let mut gesture = GestureController::new();
    gesture.begin_drag(PointerPoint::new(0.0, 0.0), &table);

    assert!(gesture.release());
    assert_eq!(gesture.state(), &GestureState::Idle);
    assert!(!gesture.release());
    assert!(gesture
        .pointer_move(PointerPoint::new(10.0, 10.0), &table, &config)
        .is_none());
}

#[test]
fn new_gesture_replaces_unreleased_one() {
    let table = TableData::new(0.0, 0.0);
    let mut gesture = GestureController::new();
    gesture.begin_drag(PointerPoint::new(0.0, 0.0), &table);
    gesture.begin_resize(PointerPoint::new(0.0, 0.0), &table);

    assert!(matches!(gesture.state(), GestureState::Resizing(_)));
}

#[test]
fn absolute_move_and_resize_helpers() {
    let config = TableEditorConfig::default();
    let table = TableData::new(0.0, 0.0);

    let moved = move_to(&table, -5.0, 64.0);
    assert_eq!((moved.x, moved.y), (0.0, 64.0));

    let resized = resize_to(&table, 960.0, 336.0, &config);
    assert_eq!(resized.col_widths, vec![240; 4]);
    assert_eq!(resized.row_heights, vec![84; 4]);

    let (cols, rows) = scaled_sizes(&[120, 120], &[42], f64::NAN, 0.0, &config);
    assert_eq!(cols, vec![120, 120]);
    assert_eq!(rows, vec![120]);
}

#[test]
fn huge_resize_stays_within_addressable_totals() {
    let config = TableEditorConfig::default();
    let table = TableData::new(0.0, 0.0);

    let resized = resize_to(&table, 1e10, f64::INFINITY, &config);
    assert!(resized.col_widths.iter().all(|width| *width == u32::MAX / 4));
    assert!(resized.row_heights.iter().all(|height| *height == u32::MAX / 4));
    let exact_width: u64 = resized.col_widths.iter().map(|width| u64::from(*width)).sum();
    assert_eq!(u64::from(resized.total_width()), exact_width);

    let mut gesture = GestureController::new();
    gesture.begin_resize(PointerPoint::new(0.0, 0.0), &resized);
    let shrunk = gesture
        .pointer_move(PointerPoint::new(-1e12, -1e12), &resized, &config)
        .unwrap();
    assert_eq!(shrunk.col_widths, vec![80; 4]);
    assert_eq!(shrunk.row_heights, vec![34; 4]);
}
