//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose table editing and note table storage to Dart via FRB.
//! - Exchange tables as JSON strings in the note document shape.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Every failure is returned as an envelope with `ok=false` and a message.

use pagenote_core::db::open_db;
use pagenote_core::{
    apply_command_json, core_version as core_version_inner, init_logging as init_logging_inner,
    ping as ping_inner, NoteId, NoteTableService, SqliteNoteRepository, TableData,
    TableEditorConfig, TableId,
};
use log::warn;
use std::path::PathBuf;
use std::sync::OnceLock;
use uuid::Uuid;

const PAGE_DB_FILE_NAME: &str = "pagenote.sqlite3";
static PAGE_DB_PATH: OnceLock<PathBuf> = OnceLock::new();
static TABLE_CONFIG: OnceLock<Result<TableEditorConfig, String>> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// # FFI contract
/// - Same `level + log_dir` is idempotent.
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Envelope for calls returning one table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableActionResponse {
    pub ok: bool,
    /// Table JSON after the operation.
    pub table_json: Option<String>,
    /// Whether the table differs from the input.
    pub changed: bool,
    /// TSV text for the caller to place on the system clipboard.
    pub clipboard_text: Option<String>,
    pub message: String,
}

impl TableActionResponse {
    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            table_json: None,
            changed: false,
            clipboard_text: None,
            message: message.into(),
        }
    }

    fn with_table(table: &TableData, changed: bool, message: impl Into<String>) -> Self {
        match serde_json::to_string(table) {
            Ok(json) => Self {
                ok: true,
                table_json: Some(json),
                changed,
                clipboard_text: None,
                message: message.into(),
            },
            Err(err) => Self::failure(format!("table encode failed: {err}")),
        }
    }
}

/// Envelope for note-level calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteActionResponse {
    pub ok: bool,
    pub note_id: Option<String>,
    /// JSON array of the note's tables after the operation.
    pub tables_json: Option<String>,
    pub message: String,
}

impl NoteActionResponse {
    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            note_id: None,
            tables_json: None,
            message: message.into(),
        }
    }

    fn with_tables(note_id: NoteId, tables: &[TableData], message: impl Into<String>) -> Self {
        match serde_json::to_string(tables) {
            Ok(json) => Self {
                ok: true,
                note_id: Some(note_id.to_string()),
                tables_json: Some(json),
                message: message.into(),
            },
            Err(err) => Self::failure(format!("tables encode failed: {err}")),
        }
    }
}

/// Creates a default 4x4 table at `(x, y)` without storing it.
#[flutter_rust_bridge::frb(sync)]
pub fn table_new(x: f64, y: f64) -> TableActionResponse {
    TableActionResponse::with_table(&TableData::new(x, y), true, "Table created.")
}

/// Applies one JSON command to a JSON table.
///
/// # FFI contract
/// - Pure call: nothing is persisted.
/// - Commands use `{"op": "...", ...}`, e.g. `{"op":"merge","rect":{...}}`.
/// - Editor settings come from `PAGENOTE_TABLE_CONFIG` when set.
#[flutter_rust_bridge::frb(sync)]
pub fn table_apply(table_json: String, command_json: String) -> TableActionResponse {
    let config = match resolve_table_config() {
        Ok(config) => config,
        Err(err) => return TableActionResponse::failure(format!("table_apply failed: {err}")),
    };
    match apply_command_json(&table_json, &command_json, &config) {
        Ok(outcome) => {
            let message = if outcome.changed {
                "Table updated."
            } else {
                "No change."
            };
            let mut response =
                TableActionResponse::with_table(&outcome.table, outcome.changed, message);
            response.clipboard_text = outcome.clipboard_text;
            response
        }
        Err(err) => TableActionResponse::failure(format!("table_apply failed: {err}")),
    }
}

/// Creates an empty stored note.
#[flutter_rust_bridge::frb(sync)]
pub fn note_create(title: String) -> NoteActionResponse {
    match with_service(|service| Ok(service.create_note(title.trim().to_string()).map_err(|err| err.to_string())?)) {
        Ok(note) => NoteActionResponse::with_tables(note.id, &note.tables, "Note created."),
        Err(err) => NoteActionResponse::failure(format!("note_create failed: {err}")),
    }
}

/// Adds a default table to a stored note.
#[flutter_rust_bridge::frb(sync)]
pub fn note_add_table(note_id: String, x: f64, y: f64) -> TableActionResponse {
    let result = with_service(|service| {
        let note_id = parse_id(&note_id, "note_id")?;
        Ok(service.add_table(note_id, x, y).map_err(|err| err.to_string())?)
    });
    match result {
        Ok(table) => TableActionResponse::with_table(&table, true, "Table added."),
        Err(err) => TableActionResponse::failure(format!("note_add_table failed: {err}")),
    }
}

/// Persists a patched table snapshot into its note.
#[flutter_rust_bridge::frb(sync)]
pub fn note_update_table(note_id: String, table_json: String) -> TableActionResponse {
    let result = with_service(|service| {
        let note_id = parse_id(&note_id, "note_id")?;
        let table: TableData = serde_json::from_str(&table_json)
            .map_err(|err| format!("invalid table_json: {err}"))?;
        service.apply_table_change(note_id, table.clone()).map_err(|err| err.to_string())?;
        Ok(table)
    });
    match result {
        Ok(table) => TableActionResponse::with_table(&table, true, "Table saved."),
        Err(err) => TableActionResponse::failure(format!("note_update_table failed: {err}")),
    }
}

/// Removes one table block from a stored note.
#[flutter_rust_bridge::frb(sync)]
pub fn note_delete_table(note_id: String, table_id: String) -> NoteActionResponse {
    let result = with_service(|service| {
        let note_id = parse_id(&note_id, "note_id")?;
        let table_id: TableId = parse_id(&table_id, "table_id")?;
        Ok(service.delete_table(note_id, table_id).map_err(|err| err.to_string())?)
    });
    match result {
        Ok(note) => NoteActionResponse::with_tables(note.id, &note.tables, "Table deleted."),
        Err(err) => NoteActionResponse::failure(format!("note_delete_table failed: {err}")),
    }
}

/// Lists the table blocks of a stored note.
#[flutter_rust_bridge::frb(sync)]
pub fn note_tables(note_id: String) -> NoteActionResponse {
    let result = with_service(|service| {
        let note_id = parse_id(&note_id, "note_id")?;
        Ok((note_id, service.tables(note_id).map_err(|err| err.to_string())?))
    });
    match result {
        Ok((note_id, tables)) => {
            let message = format!("Found {} table(s).", tables.len());
            NoteActionResponse::with_tables(note_id, &tables, message)
        }
        Err(err) => NoteActionResponse::failure(format!("note_tables failed: {err}")),
    }
}

fn parse_id(raw: &str, field: &str) -> Result<Uuid, String> {
    Uuid::parse_str(raw.trim()).map_err(|err| format!("invalid {field}: {err}"))
}

fn resolve_page_db_path() -> PathBuf {
    PAGE_DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var("PAGENOTE_DB_PATH") {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(PAGE_DB_FILE_NAME)
        })
        .clone()
}

fn resolve_table_config() -> Result<TableEditorConfig, String> {
    TABLE_CONFIG
        .get_or_init(|| load_table_config(std::env::var("PAGENOTE_TABLE_CONFIG").ok().as_deref()))
        .clone()
}

fn load_table_config(path: Option<&str>) -> Result<TableEditorConfig, String> {
    let Some(path) = path.map(str::trim).filter(|path| !path.is_empty()) else {
        return Ok(TableEditorConfig::default());
    };
    TableEditorConfig::from_file(path).map_err(|err| {
        warn!("event=ffi_config_load module=ffi status=error path={path} error={err}");
        err.to_string()
    })
}

fn with_service<T>(
    f: impl FnOnce(&NoteTableService<SqliteNoteRepository<'_>>) -> Result<T, String>,
) -> Result<T, String> {
    let path = resolve_page_db_path();
    let conn = open_db(&path).map_err(|err| {
        warn!(
            "event=ffi_db_open module=ffi status=error path={} error={err}",
            path.display()
        );
        format!("page DB open failed: {err}")
    })?;
    let config = resolve_table_config()?;
    let service = NoteTableService::with_config(SqliteNoteRepository::new(&conn), config);
    f(&service)
}

#[cfg(test)]
mod tests {
    use super::{
        load_table_config, note_add_table, note_create, note_delete_table, note_tables,
        note_update_table, ping, table_apply, table_new,
    };
    use pagenote_core::{MergePolicy, TableData, TableEditorConfig};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn table_apply_merges_and_reports_change() {
        let created = table_new(0.0, 0.0);
        let table_json = created.table_json.expect("table_new returns json");

        let response = table_apply(
            table_json,
            r#"{"op":"merge","rect":{"startRow":0,"startCol":0,"endRow":1,"endCol":1}}"#
                .to_string(),
        );
        assert!(response.ok, "{}", response.message);
        assert!(response.changed);
        let table: TableData =
            serde_json::from_str(response.table_json.as_deref().unwrap()).unwrap();
        assert_eq!(table.cells[0][0].row_span, 2);
        assert!(table.cells[1][1].hidden);
    }

    #[test]
    fn table_apply_rejects_malformed_command() {
        let created = table_new(0.0, 0.0);
        let response = table_apply(created.table_json.unwrap(), r#"{"op":"explode"}"#.to_string());
        assert!(!response.ok);
        assert!(response.message.contains("table_apply failed"));
    }

    #[test]
    fn note_table_flow_persists_add_update_delete() {
        let note = note_create("ffi page".to_string());
        assert!(note.ok, "{}", note.message);
        let note_id = note.note_id.expect("note id");

        let added = note_add_table(note_id.clone(), 12.0, 24.0);
        assert!(added.ok, "{}", added.message);
        let mut table: TableData =
            serde_json::from_str(added.table_json.as_deref().unwrap()).unwrap();
        table.cells[0][0].value = "saved".to_string();

        let updated = note_update_table(note_id.clone(), serde_json::to_string(&table).unwrap());
        assert!(updated.ok, "{}", updated.message);

        let listed = note_tables(note_id.clone());
        assert!(listed.ok, "{}", listed.message);
        let tables: Vec<TableData> =
            serde_json::from_str(listed.tables_json.as_deref().unwrap()).unwrap();
        assert_eq!(tables, vec![table.clone()]);

        let deleted = note_delete_table(note_id, table.id.to_string());
        assert!(deleted.ok, "{}", deleted.message);
        assert_eq!(deleted.tables_json.as_deref(), Some("[]"));
    }

    #[test]
    fn note_calls_reject_invalid_ids() {
        let response = note_tables("not-a-uuid".to_string());
        assert!(!response.ok);
        assert!(response.message.contains("invalid note_id"));
    }

    #[test]
    fn table_config_defaults_without_path_and_loads_overrides() {
        assert_eq!(load_table_config(None), Ok(TableEditorConfig::default()));
        assert_eq!(load_table_config(Some("  ")), Ok(TableEditorConfig::default()));

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("table_editor.json");
        std::fs::write(&path, r#"{"merge_policy":"permissive"}"#).unwrap();
        let config = load_table_config(path.to_str()).unwrap();
        assert_eq!(config.merge_policy, MergePolicy::Permissive);

        let missing = dir.path().join("missing.json");
        let err = load_table_config(missing.to_str()).unwrap_err();
        assert!(err.contains("cannot read table editor config"));
    }
}
