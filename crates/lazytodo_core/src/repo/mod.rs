//! Repository layer over the key-value store.
//!
//! # Responsibility
//! - Define the load/save contract injected into the task store.
//! - Keep the persisted key layout and JSON encoding out of service code.
//!
//! # Invariants
//! - Loaded tasks always satisfy `Task::validate()` and have unique ids.
//! - Repository APIs distinguish "nothing stored" (`Ok` empty/`None`) from
//!   malformed stored data (`Err(InvalidData)`).

pub mod task_repo;
