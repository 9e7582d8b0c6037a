//! Domain model for the to-do list.
//!
//! # Responsibility
//! - Define the canonical `Task` record and its wire encoding.
//! - Define the two filter selectors persisted next to the task list.
//!
//! # Invariants
//! - Every task is identified by a unique, immutable `TaskId`.
//! - Scheduled time is always stored at minute precision.

pub mod filter;
pub mod task;
