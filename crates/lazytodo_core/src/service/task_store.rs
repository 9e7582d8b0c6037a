//! In-memory task store mirrored to a `TaskRepository`.
//!
//! # Responsibility
//! - Load tasks and filter selectors once at startup.
//! - Apply add/update/remove and re-persist the full list after each one.
//!
//! # Invariants
//! - Task ids are unique and strictly positive.
//! - Insertion order is preserved; updates replace in place.
//! - Persistence is best-effort: write failures are logged, never returned.

use crate::model::filter::{DateFilter, Filters, TypeFilter};
use crate::model::task::{Task, TaskDraft, TaskId, TaskValidationError};
use crate::repo::task_repo::TaskRepository;
use chrono::Utc;
use log::{debug, error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type TaskStoreResult<T> = Result<T, TaskStoreError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskStoreError {
    NotFound(TaskId),
    /// The largest stored id leaves no room for a fresh one.
    IdExhausted,
    Validation(TaskValidationError),
}

impl Display for TaskStoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "task not found: {id}"),
            Self::IdExhausted => write!(f, "no task id left to assign"),
            Self::Validation(err) => write!(f, "{err}"),
        }
    }
}

impl Error for TaskStoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::NotFound(_) | Self::IdExhausted => None,
            Self::Validation(err) => Some(err),
        }
    }
}

impl From<TaskValidationError> for TaskStoreError {
    fn from(value: TaskValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Session-lifetime task list plus the two persisted filter selectors.
pub struct TaskStore<R: TaskRepository> {
    repo: R,
    tasks: Vec<Task>,
    filters: Filters,
}

impl<R: TaskRepository> TaskStore<R> {
    /// Loads persisted state, falling back to defaults on any failure.
    ///
    /// Never fails: unreadable or malformed data is logged and treated as
    /// "nothing stored" (empty list, `all`/`all` selectors).
    pub fn load(repo: R) -> Self {
        let tasks = repo.load_tasks().unwrap_or_else(|err| {
            warn!(
                "event=store_load module=store status=fallback target=tasks error={}",
                err
            );
            Vec::new()
        });
        let type_filter = repo
            .load_type_filter()
            .unwrap_or_else(|err| {
                warn!(
                    "event=store_load module=store status=fallback target=filter_type error={}",
                    err
                );
                None
            })
            .unwrap_or_default();
        let date_filter = repo
            .load_date_filter()
            .unwrap_or_else(|err| {
                warn!(
                    "event=store_load module=store status=fallback target=filter_date error={}",
                    err
                );
                None
            })
            .unwrap_or_default();

        info!(
            "event=store_load module=store status=ok task_count={} filter_type={} filter_date={}",
            tasks.len(),
            type_filter,
            date_filter
        );

        Self {
            repo,
            tasks,
            filters: Filters {
                type_filter,
                date_filter,
            },
        }
    }

    /// All tasks in insertion order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Appends a task built from `draft` under a fresh id and persists.
    ///
    /// # Errors
    /// - `IdExhausted` when a stored id is already `TaskId::MAX`.
    pub fn add(&mut self, draft: TaskDraft) -> TaskStoreResult<Task> {
        let Some(id) = self.next_id() else {
            warn!("event=task_add module=store status=id_exhausted");
            return Err(TaskStoreError::IdExhausted);
        };
        let task = Task::from_draft(id, draft)?;
        self.tasks.push(task.clone());
        info!(
            "event=task_add module=store status=ok id={} task_count={}",
            task.id,
            self.tasks.len()
        );
        self.persist_tasks();
        Ok(task)
    }

    /// Replaces every field except `id` of an existing task and persists.
    ///
    /// # Errors
    /// - `NotFound` when no task has `id`; nothing is changed or written.
    pub fn update(&mut self, id: TaskId, draft: TaskDraft) -> TaskStoreResult<Task> {
        let Some(slot) = self.tasks.iter_mut().find(|task| task.id == id) else {
            warn!("event=task_update module=store status=not_found id={id}");
            return Err(TaskStoreError::NotFound(id));
        };
        let task = Task::from_draft(id, draft)?;
        *slot = task.clone();
        info!("event=task_update module=store status=ok id={id}");
        self.persist_tasks();
        Ok(task)
    }

    /// Removes the task with `id`. Returns whether anything was removed.
    ///
    /// Removing an unknown id is a no-op and does not write.
    pub fn remove(&mut self, id: TaskId) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|task| task.id != id);
        if self.tasks.len() == before {
            debug!("event=task_remove module=store status=noop id={id}");
            return false;
        }
        info!(
            "event=task_remove module=store status=ok id={} task_count={}",
            id,
            self.tasks.len()
        );
        self.persist_tasks();
        true
    }

    pub fn filters(&self) -> Filters {
        self.filters
    }

    pub fn type_filter(&self) -> TypeFilter {
        self.filters.type_filter
    }

    pub fn date_filter(&self) -> DateFilter {
        self.filters.date_filter
    }

    pub fn set_type_filter(&mut self, value: TypeFilter) {
        self.filters.type_filter = value;
        self.persist_filters();
    }

    pub fn set_date_filter(&mut self, value: DateFilter) {
        self.filters.date_filter = value;
        self.persist_filters();
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    pub fn into_repository(self) -> R {
        self.repo
    }

    /// Creation timestamp in ms, bumped past the largest existing id.
    fn next_id(&self) -> Option<TaskId> {
        let now_ms = Utc::now().timestamp_millis();
        let floor = match self.tasks.iter().map(|task| task.id).max() {
            Some(max) => max.checked_add(1)?,
            None => 1,
        };
        Some(now_ms.max(floor))
    }

    fn persist_tasks(&mut self) {
        match self.repo.save_tasks(&self.tasks) {
            Ok(()) => debug!(
                "event=tasks_save module=store status=ok task_count={}",
                self.tasks.len()
            ),
            Err(err) => error!(
                "event=tasks_save module=store status=error task_count={} error={}",
                self.tasks.len(),
                err
            ),
        }
    }

    fn persist_filters(&mut self) {
        match self.repo.save_filters(self.filters) {
            Ok(()) => debug!(
                "event=filters_save module=store status=ok filter_type={} filter_date={}",
                self.filters.type_filter, self.filters.date_filter
            ),
            Err(err) => error!(
                "event=filters_save module=store status=error error={}",
                err
            ),
        }
    }
}
