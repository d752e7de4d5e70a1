//! Core domain logic for PageNote.
//! This crate is the single source of truth for table block invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod table;

pub use config::{ConfigError, MergePolicy, TableEditorConfig};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::note::{NoteId, NoteItem};
pub use model::table::{Cell, CellPos, CellRect, TableData, TableId, TableShapeError};
pub use repo::note_repo::{NoteRepository, RepoError, RepoResult, SqliteNoteRepository};
pub use service::note_table_service::{
    NoteTableHost, NoteTableResult, NoteTableService, NoteTableServiceError,
};
pub use service::table_command::{
    apply_command, apply_command_json, TableCommand, TableCommandError, TableCommandOutcome,
};
#[cfg(feature = "system-clipboard")]
pub use table::clipboard::SystemClipboard;
pub use table::clipboard::{ClipboardError, ClipboardPort, MemoryClipboard};
pub use table::controller::{TableBlockController, TableBlockHost};
pub use table::geometry::{GestureController, GestureState, PointerPoint};
pub use table::selection::{PointerButton, SelectionState, SelectionTracker};
pub use table::span::{MergeRejection, SpanIndex, SplitRejection};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
