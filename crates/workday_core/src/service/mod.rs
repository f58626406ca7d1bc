//! Core use-case services.
//!
//! # Responsibility
//! - Own in-memory state for tasks and processes.
//! - Write state through to a storage backend after every change.

pub mod process_service;
pub mod todo_service;
