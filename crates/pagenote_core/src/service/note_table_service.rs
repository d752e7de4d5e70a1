//! Note page table-block use-cases.
//!
//! # Responsibility
//! - Add, replace and remove table blocks on a stored note.
//! - Bridge a `TableBlockController` to storage through `NoteTableHost`.
//!
//! # Invariants
//! - A stored table is always replaced wholesale by the patched snapshot.
//! - Snapshots failing shape validation are never persisted.
//! - Every successful change bumps the note's `updated_at`.

use crate::config::TableEditorConfig;
use crate::model::note::{NoteId, NoteItem};
use crate::model::table::{TableData, TableId, TableShapeError};
use crate::repo::note_repo::{NoteRepository, RepoError};
use crate::table::controller::TableBlockHost;
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::{SystemTime, UNIX_EPOCH};

/// Service error for note table use-cases.
#[derive(Debug)]
pub enum NoteTableServiceError {
    /// Target note does not exist.
    NoteNotFound(NoteId),
    /// Target note has no table with this id.
    TableNotFound { note_id: NoteId, table_id: TableId },
    /// Patched table breaks shape invariants.
    InvalidTable(TableShapeError),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for NoteTableServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoteNotFound(id) => write!(f, "note not found: {id}"),
            Self::TableNotFound { note_id, table_id } => {
                write!(f, "table {table_id} not found in note {note_id}")
            }
            Self::InvalidTable(err) => write!(f, "invalid table: {err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for NoteTableServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidTable(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for NoteTableServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::NoteNotFound(id),
            other => Self::Repo(other),
        }
    }
}

impl From<TableShapeError> for NoteTableServiceError {
    fn from(value: TableShapeError) -> Self {
        Self::InvalidTable(value)
    }
}

pub type NoteTableResult<T> = Result<T, NoteTableServiceError>;

/// Note/table service facade over repository implementations.
pub struct NoteTableService<R: NoteRepository> {
    repo: R,
    config: TableEditorConfig,
}

impl<R: NoteRepository> NoteTableService<R> {
    pub fn new(repo: R) -> Self {
        Self::with_config(repo, TableEditorConfig::default())
    }

    pub fn with_config(repo: R, config: TableEditorConfig) -> Self {
        Self { repo, config }
    }

    pub fn config(&self) -> &TableEditorConfig {
        &self.config
    }

    /// Creates and stores an empty note.
    pub fn create_note(&self, title: impl Into<String>) -> NoteTableResult<NoteItem> {
        let mut note = NoteItem::new(title);
        note.updated_at = now_epoch_ms();
        self.repo.save_note(&note)?;
        info!("event=note_create module=service status=ok note_id={}", note.id);
        Ok(note)
    }

    /// Loads one note.
    pub fn get_note(&self, note_id: NoteId) -> NoteTableResult<NoteItem> {
        self.repo
            .get_note(note_id)?
            .ok_or(NoteTableServiceError::NoteNotFound(note_id))
    }

    /// Returns the table blocks of one note in page order.
    pub fn tables(&self, note_id: NoteId) -> NoteTableResult<Vec<TableData>> {
        Ok(self.get_note(note_id)?.tables)
    }

    /// Adds a fresh empty table at `(x, y)` and returns it.
    pub fn add_table(&self, note_id: NoteId, x: f64, y: f64) -> NoteTableResult<TableData> {
        let note = self.get_note(note_id)?;
        let table = TableData::with_shape(
            x,
            y,
            self.config.initial_rows,
            self.config.initial_cols,
            self.config.default_col_width,
            self.config.default_row_height,
        );

        let mut tables = note.tables;
        tables.push(table.clone());
        self.repo.replace_tables(note_id, &tables, now_epoch_ms())?;
        info!(
            "event=table_add module=service status=ok note_id={note_id} table_id={}",
            table.id
        );
        Ok(table)
    }

    /// Replaces the stored table with the same id by `next`.
    pub fn apply_table_change(
        &self,
        note_id: NoteId,
        next: TableData,
    ) -> NoteTableResult<NoteItem> {
        next.validate()?;
        let table_id = next.id;
        let note = self.get_note(note_id)?;
        let mut note = note
            .with_table_replaced(next)
            .ok_or(NoteTableServiceError::TableNotFound { note_id, table_id })?;
        note.updated_at = now_epoch_ms();
        self.repo.replace_tables(note_id, &note.tables, note.updated_at)?;
        Ok(note)
    }

    /// Removes one table block from a note.
    pub fn delete_table(&self, note_id: NoteId, table_id: TableId) -> NoteTableResult<NoteItem> {
        let note = self.get_note(note_id)?;
        let mut note = note
            .without_table(table_id)
            .ok_or(NoteTableServiceError::TableNotFound { note_id, table_id })?;
        note.updated_at = now_epoch_ms();
        self.repo.replace_tables(note_id, &note.tables, note.updated_at)?;
        info!("event=table_delete module=service status=ok note_id={note_id} table_id={table_id}");
        Ok(note)
    }
}

/// Owner adapter persisting a controller's output into one note.
///
/// Persistence failures are logged and kept in `last_error`; the editor keeps
/// working on its in-memory snapshot.
pub struct NoteTableHost<'s, R: NoteRepository> {
    service: &'s NoteTableService<R>,
    note_id: NoteId,
    table_id: TableId,
    focused: bool,
    deleted: bool,
    last_error: Option<NoteTableServiceError>,
}

impl<'s, R: NoteRepository> NoteTableHost<'s, R> {
    pub fn new(service: &'s NoteTableService<R>, note_id: NoteId, table_id: TableId) -> Self {
        Self {
            service,
            note_id,
            table_id,
            focused: false,
            deleted: false,
            last_error: None,
        }
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted
    }

    pub fn last_error(&self) -> Option<&NoteTableServiceError> {
        self.last_error.as_ref()
    }

    fn record(&mut self, action: &str, result: NoteTableResult<NoteItem>) -> bool {
        match result {
            Ok(_) => {
                self.last_error = None;
                true
            }
            Err(err) => {
                error!(
                    "event=table_{action} module=service status=error note_id={} table_id={} error={}",
                    self.note_id, self.table_id, err
                );
                self.last_error = Some(err);
                false
            }
        }
    }
}

impl<R: NoteRepository> TableBlockHost for NoteTableHost<'_, R> {
    fn on_change(&mut self, next: TableData) {
        let result = self.service.apply_table_change(self.note_id, next);
        self.record("persist", result);
    }

    fn on_select(&mut self) {
        self.focused = true;
    }

    fn on_delete(&mut self) {
        let result = self.service.delete_table(self.note_id, self.table_id);
        self.deleted = self.record("delete", result);
        self.focused = false;
    }
}

fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}
