//! Domain model for note pages and their table blocks.
//!
//! # Responsibility
//! - Define the persisted data shapes exchanged with UI and storage.
//! - Keep table values immutable from the owner's point of view.
//!
//! # Invariants
//! - Every note and table block is identified by a stable UUID.
//! - Table edits produce new values; stored values are replaced wholesale.

pub mod note;
pub mod table;
