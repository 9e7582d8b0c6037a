//! Task repository contracts and key-value implementation.
//!
//! # Responsibility
//! - Encode the task list as a JSON array under `tasks`.
//! - Encode filter selectors as raw strings under `filterType`/`filterDate`.
//!
//! # Invariants
//! - `save_tasks` always writes, including an empty list (`[]`).
//! - Records failing validation or repeating an earlier id are dropped on
//!   load, each with a `warn` event; the rest of the list survives.

use crate::model::filter::{DateFilter, Filters, TypeFilter};
use crate::model::task::{Task, TaskId};
use crate::storage::{KeyValueStore, StorageError};
use log::warn;
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const TASKS_KEY: &str = "tasks";
pub const FILTER_TYPE_KEY: &str = "filterType";
pub const FILTER_DATE_KEY: &str = "filterDate";

pub type RepoResult<T> = Result<T, RepoError>;

#[derive(Debug)]
pub enum RepoError {
    Storage(StorageError),
    Encode(serde_json::Error),
    InvalidData { key: &'static str, message: String },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Storage(err) => write!(f, "{err}"),
            Self::Encode(err) => write!(f, "failed to encode tasks: {err}"),
            Self::InvalidData { key, message } => {
                write!(f, "invalid persisted data under `{key}`: {message}")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Storage(err) => Some(err),
            Self::Encode(err) => Some(err),
            Self::InvalidData { .. } => None,
        }
    }
}

impl From<StorageError> for RepoError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value)
    }
}

/// Load/save contract for the task list and filter selectors.
pub trait TaskRepository {
    fn load_tasks(&self) -> RepoResult<Vec<Task>>;
    fn save_tasks(&mut self, tasks: &[Task]) -> RepoResult<()>;
    fn load_type_filter(&self) -> RepoResult<Option<TypeFilter>>;
    fn load_date_filter(&self) -> RepoResult<Option<DateFilter>>;
    fn save_filters(&mut self, filters: Filters) -> RepoResult<()>;
}

/// Repository storing tasks and filters in any `KeyValueStore`.
pub struct KvTaskRepository<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> KvTaskRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }
}

impl<S: KeyValueStore> TaskRepository for KvTaskRepository<S> {
    fn load_tasks(&self) -> RepoResult<Vec<Task>> {
        match self.store.get(TASKS_KEY)? {
            Some(raw) => decode_tasks(&raw),
            None => Ok(Vec::new()),
        }
    }

    fn save_tasks(&mut self, tasks: &[Task]) -> RepoResult<()> {
        let encoded = serde_json::to_string(tasks).map_err(RepoError::Encode)?;
        self.store.set(TASKS_KEY, &encoded)?;
        Ok(())
    }

    fn load_type_filter(&self) -> RepoResult<Option<TypeFilter>> {
        load_selector(&self.store, FILTER_TYPE_KEY)
    }

    fn load_date_filter(&self) -> RepoResult<Option<DateFilter>> {
        load_selector(&self.store, FILTER_DATE_KEY)
    }

    fn save_filters(&mut self, filters: Filters) -> RepoResult<()> {
        self.store
            .set(FILTER_TYPE_KEY, filters.type_filter.as_str())?;
        self.store
            .set(FILTER_DATE_KEY, filters.date_filter.as_str())?;
        Ok(())
    }
}

fn load_selector<S, T>(store: &S, key: &'static str) -> RepoResult<Option<T>>
where
    S: KeyValueStore,
    T: std::str::FromStr,
    T::Err: Display,
{
    match store.get(key)? {
        // An empty string reads as "not set", mirroring `value || "all"`.
        Some(raw) if raw.is_empty() => Ok(None),
        Some(raw) => raw
            .parse::<T>()
            .map(Some)
            .map_err(|err| RepoError::InvalidData {
                key,
                message: err.to_string(),
            }),
        None => Ok(None),
    }
}

/// Decodes the stored `tasks` value.
///
/// `null` decodes as an empty list. Anything that is not a JSON array is
/// `InvalidData`; individual bad elements are skipped.
fn decode_tasks(raw: &str) -> RepoResult<Vec<Task>> {
    let value: serde_json::Value =
        serde_json::from_str(raw).map_err(|err| RepoError::InvalidData {
            key: TASKS_KEY,
            message: err.to_string(),
        })?;

    let items = match value {
        serde_json::Value::Null => return Ok(Vec::new()),
        serde_json::Value::Array(items) => items,
        other => {
            return Err(RepoError::InvalidData {
                key: TASKS_KEY,
                message: format!("expected array, found {}", json_kind(&other)),
            });
        }
    };

    let mut seen: HashSet<TaskId> = HashSet::with_capacity(items.len());
    let mut tasks = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        let task = match serde_json::from_value::<Task>(item) {
            Ok(task) => task,
            Err(err) => {
                warn!(
                    "event=tasks_load module=repo status=skipped index={} reason=invalid_record error={}",
                    index, err
                );
                continue;
            }
        };
        if !seen.insert(task.id) {
            warn!(
                "event=tasks_load module=repo status=skipped index={} reason=duplicate_id id={}",
                index, task.id
            );
            continue;
        }
        tasks.push(task);
    }

    Ok(tasks)
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::{decode_tasks, RepoError};

    #[test]
    fn decode_null_is_empty() {
        assert!(decode_tasks("null").unwrap().is_empty());
    }

    #[test]
    fn decode_object_is_invalid() {
        let err = decode_tasks("{\"id\":1}").unwrap_err();
        assert!(matches!(err, RepoError::InvalidData { key: "tasks", .. }));
        assert!(err.to_string().contains("expected array, found object"));
    }

    #[test]
    fn decode_skips_bad_records_and_duplicate_ids() {
        let raw = r#"[
            {"id": 1, "topic": "a", "description": "b", "dateTime": "2030-01-01 10:00", "type": "Task"},
            {"id": 2, "topic": "", "description": "b", "dateTime": "2030-01-01 10:00", "type": "Task"},
            {"id": 3, "topic": "c", "description": "d", "dateTime": "soon", "type": "Task"},
            {"id": 1, "topic": "dup", "description": "d", "dateTime": "2030-01-01 10:00", "type": "Event"},
            {"id": 4, "topic": "e", "description": "f", "dateTime": "2030-01-02 11:30", "type": "Meeting"}
        ]"#;

        let tasks = decode_tasks(raw).unwrap();
        let ids: Vec<i64> = tasks.iter().map(|task| task.id).collect();
        assert_eq!(ids, vec![1, 4]);
        assert_eq!(tasks[0].topic, "a");
    }
}
