//! Table block editor.
//!
//! # Responsibility
//! - Structural edits (`grid`), merge/split (`span`), selection
//!   (`selection`), TSV clipboard (`clipboard`) and drag/resize (`geometry`).
//! - Orchestrate them for one block through `controller`.
//!
//! # Invariants
//! - Every operation takes `&TableData` and returns a new value.
//! - Invalid requests degrade to a no-op; they never corrupt the grid.

pub mod clipboard;
pub mod controller;
pub mod geometry;
pub mod grid;
pub mod selection;
pub mod span;
