//! Core use-case services.
//!
//! # Responsibility
//! - Own in-memory task state and mirror it through the repository.
//! - Compute the visible list and drive the create/edit form.
//! - Stay independent of any rendering layer.

pub mod filter;
pub mod form;
pub mod task_store;
