//! Core domain logic for LazyTodo.
//! This crate is the single source of truth for task invariants.

pub mod app;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod storage;

pub use app::{AppError, Change, ChangeListener, FormView, Intent, TodoApp, ViewModel};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::filter::{DateFilter, FilterParseError, Filters, TypeFilter};
pub use model::task::{
    format_date_time, parse_date_time, Task, TaskDraft, TaskId, TaskType, TaskValidationError,
    DATE_TIME_FORMAT,
};
pub use repo::task_repo::{KvTaskRepository, RepoError, RepoResult, TaskRepository};
pub use service::filter::{local_now, visible, visible_now};
pub use service::form::{
    FieldErrors, FormController, FormError, FormField, FormFields, FormState, RawFields,
};
pub use service::task_store::{TaskStore, TaskStoreError, TaskStoreResult};
pub use storage::{KeyValueStore, MemoryStore, SqliteStore, StorageError, StorageResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
