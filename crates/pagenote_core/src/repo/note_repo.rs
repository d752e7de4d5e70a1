//! Note page repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist and restore whole `NoteItem` aggregates.
//! - Replace the table blocks of one note without touching its other fields.
//!
//! # Invariants
//! - Table blocks are stored verbatim as JSON and restored losslessly.
//! - Note list order is `updated_at DESC, uuid ASC`.
//! - Read paths reject unparsable persisted data instead of masking it.

use crate::db::DbError;
use crate::model::note::{NoteId, NoteItem};
use crate::model::table::TableData;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const NOTE_SELECT_SQL: &str = "SELECT
    uuid,
    title,
    content_html,
    char_count,
    drawing,
    tables_json,
    updated_at
FROM notes";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for note persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    NotFound(NoteId),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "note not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted note data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::NotFound(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for note page storage.
pub trait NoteRepository {
    /// Inserts or fully replaces one note.
    fn save_note(&self, note: &NoteItem) -> RepoResult<()>;
    /// Gets one note by id.
    fn get_note(&self, id: NoteId) -> RepoResult<Option<NoteItem>>;
    /// Lists all notes, most recently updated first.
    fn list_notes(&self) -> RepoResult<Vec<NoteItem>>;
    /// Deletes one note and its table blocks.
    fn delete_note(&self, id: NoteId) -> RepoResult<()>;
    /// Replaces the table blocks of one note.
    fn replace_tables(&self, id: NoteId, tables: &[TableData], updated_at: i64)
        -> RepoResult<()>;
}

/// SQLite-backed note repository.
pub struct SqliteNoteRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteNoteRepository<'conn> {
    /// Constructs a repository from a connection opened via `db::open_db*`.
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl NoteRepository for SqliteNoteRepository<'_> {
    fn save_note(&self, note: &NoteItem) -> RepoResult<()> {
        let tables_json = encode_tables(&note.tables)?;
        self.conn.execute(
            "INSERT INTO notes (
                uuid,
                title,
                content_html,
                char_count,
                drawing,
                tables_json,
                updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            ON CONFLICT(uuid) DO UPDATE SET
                title = excluded.title,
                content_html = excluded.content_html,
                char_count = excluded.char_count,
                drawing = excluded.drawing,
                tables_json = excluded.tables_json,
                updated_at = excluded.updated_at;",
            params![
                note.id.to_string(),
                note.title.as_str(),
                note.content_html.as_str(),
                note.char_count,
                note.drawing.as_deref(),
                tables_json,
                note.updated_at,
            ],
        )?;
        Ok(())
    }

    fn get_note(&self, id: NoteId) -> RepoResult<Option<NoteItem>> {
        let sql = format!("{NOTE_SELECT_SQL} WHERE uuid = ?1;");
        let raw = self
            .conn
            .query_row(&sql, [id.to_string()], read_raw_note)
            .optional()?;
        raw.map(RawNote::into_note).transpose()
    }

    fn list_notes(&self) -> RepoResult<Vec<NoteItem>> {
        let sql = format!("{NOTE_SELECT_SQL} ORDER BY updated_at DESC, uuid ASC;");
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([], read_raw_note)?;

        let mut notes = Vec::new();
        for raw in rows {
            notes.push(raw?.into_note()?);
        }
        Ok(notes)
    }

    fn delete_note(&self, id: NoteId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM notes WHERE uuid = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        Ok(())
    }

    fn replace_tables(
        &self,
        id: NoteId,
        tables: &[TableData],
        updated_at: i64,
    ) -> RepoResult<()> {
        let tables_json = encode_tables(tables)?;
        let changed = self.conn.execute(
            "UPDATE notes SET tables_json = ?2, updated_at = ?3 WHERE uuid = ?1;",
            params![id.to_string(), tables_json, updated_at],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        Ok(())
    }
}

struct RawNote {
    uuid: String,
    title: String,
    content_html: String,
    char_count: i64,
    drawing: Option<String>,
    tables_json: String,
    updated_at: i64,
}

impl RawNote {
    fn into_note(self) -> RepoResult<NoteItem> {
        let id = Uuid::parse_str(&self.uuid)
            .map_err(|err| RepoError::InvalidData(format!("uuid `{}`: {err}", self.uuid)))?;
        let char_count = u32::try_from(self.char_count).map_err(|_| {
            RepoError::InvalidData(format!("char_count {} out of range", self.char_count))
        })?;
        let tables: Vec<TableData> = serde_json::from_str(&self.tables_json)
            .map_err(|err| RepoError::InvalidData(format!("tables_json of {id}: {err}")))?;

        Ok(NoteItem {
            id,
            title: self.title,
            content_html: self.content_html,
            char_count,
            drawing: self.drawing,
            tables,
            updated_at: self.updated_at,
        })
    }
}

fn read_raw_note(row: &Row<'_>) -> rusqlite::Result<RawNote> {
    Ok(RawNote {
        uuid: row.get(0)?,
        title: row.get(1)?,
        content_html: row.get(2)?,
        char_count: row.get(3)?,
        drawing: row.get(4)?,
        tables_json: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

fn encode_tables(tables: &[TableData]) -> RepoResult<String> {
    serde_json::to_string(tables)
        .map_err(|err| RepoError::InvalidData(format!("cannot encode tables: {err}")))
}
