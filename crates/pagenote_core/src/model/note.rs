//! Note page aggregate.
//!
//! # Responsibility
//! - Carry the per-note document that owns table blocks.
//! - Keep drawing and rich-text payloads opaque to the table editor.
//!
//! # Invariants
//! - `id` is stable for the note lifetime.
//! - Table ids are unique within one note.

use crate::model::table::{TableData, TableId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier of one note.
pub type NoteId = Uuid;

/// One note page: rich text, an optional drawing blob and table blocks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteItem {
    pub id: NoteId,
    pub title: String,
    /// HTML-like document produced by the rich-text editor.
    pub content_html: String,
    /// Character count reported by the rich-text editor.
    pub char_count: u32,
    /// Serialized drawing surface, owned by the drawing collaborator.
    pub drawing: Option<String>,
    pub tables: Vec<TableData>,
    /// Unix epoch milliseconds of the last persisted change.
    pub updated_at: i64,
}

impl NoteItem {
    /// Creates an empty note with a generated id.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            content_html: String::new(),
            char_count: 0,
            drawing: None,
            tables: Vec::new(),
            updated_at: 0,
        }
    }

    /// Returns one table block by id.
    pub fn table(&self, table_id: TableId) -> Option<&TableData> {
        self.tables.iter().find(|table| table.id == table_id)
    }

    /// Returns a copy with the table of the same id replaced.
    ///
    /// Returns `None` when the note has no table with that id.
    pub fn with_table_replaced(&self, next: TableData) -> Option<Self> {
        let index = self.tables.iter().position(|table| table.id == next.id)?;
        let mut note = self.clone();
        note.tables[index] = next;
        Some(note)
    }

    /// Returns a copy without the given table block.
    ///
    /// Returns `None` when the note has no table with that id.
    pub fn without_table(&self, table_id: TableId) -> Option<Self> {
        let index = self.tables.iter().position(|table| table.id == table_id)?;
        let mut note = self.clone();
        note.tables.remove(index);
        Some(note)
    }
}
