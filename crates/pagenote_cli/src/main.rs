//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `pagenote_core` linkage without the UI shell.
//! - Exercise one merge/copy round through the table command path.

use pagenote_core::{apply_command, CellRect, TableCommand, TableData, TableEditorConfig};
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("pagenote_core ping={}", pagenote_core::ping());
    println!("pagenote_core version={}", pagenote_core::core_version());

    match sample_merge_copy() {
        Ok(tsv) => {
            println!("sample merged copy:");
            println!("{tsv}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("sample table failed: {err}");
            ExitCode::FAILURE
        }
    }
}

fn sample_merge_copy() -> Result<String, pagenote_core::TableCommandError> {
    let config = TableEditorConfig::default();
    let table = TableData::from_values([["Q1", "Q2", "Q3"], ["10", "20", "30"]]);
    let merged = apply_command(
        &table,
        &TableCommand::Merge {
            rect: CellRect::new(0, 0, 0, 1),
        },
        &config,
    )?;
    let copied = apply_command(
        &merged.table,
        &TableCommand::Copy {
            rect: CellRect::new(0, 0, 1, 2),
        },
        &config,
    )?;
    Ok(copied.clipboard_text.unwrap_or_default())
}
