//! Flutter bridge surface for the note page core.

pub mod api;
