//! Pointer-driven rectangular cell selection.
//!
//! # Responsibility
//! - Track the anchor and current cell of a selection gesture.
//! - Hand a normalized rectangle to merge/copy/paste callers.
//!
//! # Invariants
//! - A primary press always resets the anchor and collapses the rectangle.
//! - The rectangle handed out is always normalized.

use crate::model::table::{CellPos, CellRect};

/// Pointer button reported with a press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

/// Selection gesture state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionState {
    /// No selection.
    #[default]
    Idle,
    /// Selection present, primary button not extending it.
    Anchored { anchor: CellPos, current: CellPos },
    /// Primary button held while the pointer moves over other cells.
    Extending { anchor: CellPos, current: CellPos },
}

/// Anchor-to-current selection tracker for one table block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionTracker {
    state: SelectionState,
}

impl SelectionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SelectionState {
        self.state
    }

    /// Handles a press on `cell`. Only the primary button selects.
    pub fn press(&mut self, cell: CellPos, button: PointerButton) {
        if button != PointerButton::Primary {
            return;
        }
        self.state = SelectionState::Anchored {
            anchor: cell,
            current: cell,
        };
    }

    /// Handles the pointer entering `cell`.
    ///
    /// Extends the rectangle only while the primary button is held. A
    /// released button observed here ends any extension.
    pub fn enter(&mut self, cell: CellPos, primary_held: bool) {
        match (self.state, primary_held) {
            (SelectionState::Idle, _) => {}
            (
                SelectionState::Anchored { anchor, current }
                | SelectionState::Extending { anchor, current },
                true,
            ) => {
                if cell != current {
                    self.state = SelectionState::Extending {
                        anchor,
                        current: cell,
                    };
                }
            }
            (SelectionState::Extending { anchor, current }, false) => {
                self.state = SelectionState::Anchored { anchor, current };
            }
            (SelectionState::Anchored { .. }, false) => {}
        }
    }

    /// Handles pointer release; the rectangle is kept.
    pub fn release(&mut self) {
        if let SelectionState::Extending { anchor, current } = self.state {
            self.state = SelectionState::Anchored { anchor, current };
        }
    }

    /// Drops the selection.
    pub fn clear(&mut self) {
        self.state = SelectionState::Idle;
    }

    pub fn anchor(&self) -> Option<CellPos> {
        match self.state {
            SelectionState::Idle => None,
            SelectionState::Anchored { anchor, .. } | SelectionState::Extending { anchor, .. } => {
                Some(anchor)
            }
        }
    }

    /// Normalized selection rectangle.
    pub fn rect(&self) -> Option<CellRect> {
        match self.state {
            SelectionState::Idle => None,
            SelectionState::Anchored { anchor, current }
            | SelectionState::Extending { anchor, current } => {
                Some(CellRect::spanning(anchor, current).normalized())
            }
        }
    }

    pub fn is_selected(&self, cell: CellPos) -> bool {
        self.rect().is_some_and(|rect| rect.contains(cell))
    }
}
