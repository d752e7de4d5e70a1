//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate table editing and note storage into use-case level APIs.
//! - Keep UI/FFI layers decoupled from storage details.

pub mod note_table_service;
pub mod table_command;
