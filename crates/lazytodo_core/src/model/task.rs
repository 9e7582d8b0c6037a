//! Task domain model.
//!
//! # Responsibility
//! - Define the canonical task record and its category enum.
//! - Own the `"YYYY-MM-DD HH:mm"` date/time wire format.
//! - Validate records on construction and on deserialization.
//!
//! # Invariants
//! - `topic` and `description` are never blank.
//! - `date_time` never carries seconds or sub-second precision.
//! - `id` is positive and never changes after creation.

use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Stable identifier for one task.
///
/// Millisecond creation timestamp, serialized as a JSON number.
pub type TaskId = i64;

/// Storage/display format for scheduled time.
pub const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Extra input formats accepted by [`parse_date_time`].
const DATE_TIME_INPUT_FORMATS: &[&str] = &[
    DATE_TIME_FORMAT,
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%dT%H:%M:%S",
];

/// Task category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskType {
    Meeting,
    Task,
    Event,
}

impl TaskType {
    pub const ALL: [TaskType; 3] = [TaskType::Meeting, TaskType::Task, TaskType::Event];

    /// Returns the wire/display name (`Meeting|Task|Event`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Meeting => "Meeting",
            Self::Task => "Task",
            Self::Event => "Event",
        }
    }
}

impl Display for TaskType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskType {
    type Err = TaskValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "Meeting" => Ok(Self::Meeting),
            "Task" => Ok(Self::Task),
            "Event" => Ok(Self::Event),
            other => Err(TaskValidationError::UnknownType(other.to_string())),
        }
    }
}

/// Validation errors for task records and drafts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    EmptyTopic,
    EmptyDescription,
    InvalidId(TaskId),
    InvalidDateTime(String),
    UnknownType(String),
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTopic => write!(f, "topic must not be empty"),
            Self::EmptyDescription => write!(f, "description must not be empty"),
            Self::InvalidId(id) => write!(f, "task id must be positive, got {id}"),
            Self::InvalidDateTime(value) => {
                write!(f, "invalid date/time `{value}`; expected YYYY-MM-DD HH:mm")
            }
            Self::UnknownType(value) => {
                write!(f, "unknown task type `{value}`; expected Meeting|Task|Event")
            }
        }
    }
}

impl Error for TaskValidationError {}

/// Validated field values for a task that does not have an id yet.
///
/// Produced by the form controller, consumed by the task store on add/update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    pub topic: String,
    pub description: String,
    pub date_time: NaiveDateTime,
    pub kind: TaskType,
}

impl TaskDraft {
    /// Builds a draft, truncating `date_time` to the minute.
    ///
    /// # Errors
    /// - `EmptyTopic` / `EmptyDescription` for blank text fields.
    pub fn new(
        topic: impl Into<String>,
        description: impl Into<String>,
        date_time: NaiveDateTime,
        kind: TaskType,
    ) -> Result<Self, TaskValidationError> {
        let draft = Self {
            topic: topic.into(),
            description: description.into(),
            date_time: truncate_to_minute(date_time),
            kind,
        };
        draft.validate()?;
        Ok(draft)
    }

    pub fn validate(&self) -> Result<(), TaskValidationError> {
        if self.topic.trim().is_empty() {
            return Err(TaskValidationError::EmptyTopic);
        }
        if self.description.trim().is_empty() {
            return Err(TaskValidationError::EmptyDescription);
        }
        Ok(())
    }
}

/// Canonical task record.
///
/// Serialized field names match the persisted layout:
/// `{id, topic, description, dateTime, type}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TaskRecord")]
pub struct Task {
    pub id: TaskId,
    pub topic: String,
    pub description: String,
    #[serde(rename = "dateTime", with = "date_time_format")]
    pub date_time: NaiveDateTime,
    /// Serialized as `type` to match the stored schema.
    #[serde(rename = "type")]
    pub kind: TaskType,
}

impl Task {
    /// Creates a task from a draft with the given id.
    ///
    /// # Errors
    /// - `InvalidId` when `id` is not positive.
    /// - Draft validation errors.
    pub fn from_draft(id: TaskId, draft: TaskDraft) -> Result<Self, TaskValidationError> {
        let task = Self {
            id,
            topic: draft.topic,
            description: draft.description,
            date_time: truncate_to_minute(draft.date_time),
            kind: draft.kind,
        };
        task.validate()?;
        Ok(task)
    }

    /// Returns a draft carrying this task's current field values.
    pub fn to_draft(&self) -> TaskDraft {
        TaskDraft {
            topic: self.topic.clone(),
            description: self.description.clone(),
            date_time: self.date_time,
            kind: self.kind,
        }
    }

    pub fn validate(&self) -> Result<(), TaskValidationError> {
        if self.id <= 0 {
            return Err(TaskValidationError::InvalidId(self.id));
        }
        if self.topic.trim().is_empty() {
            return Err(TaskValidationError::EmptyTopic);
        }
        if self.description.trim().is_empty() {
            return Err(TaskValidationError::EmptyDescription);
        }
        Ok(())
    }

    /// Returns `date_time` in the stored string form.
    pub fn date_time_string(&self) -> String {
        format_date_time(self.date_time)
    }
}

/// Unvalidated mirror of `Task` used as the deserialization source.
#[derive(Deserialize)]
struct TaskRecord {
    id: TaskId,
    topic: String,
    description: String,
    #[serde(rename = "dateTime", with = "date_time_format")]
    date_time: NaiveDateTime,
    #[serde(rename = "type")]
    kind: TaskType,
}

impl TryFrom<TaskRecord> for Task {
    type Error = TaskValidationError;

    fn try_from(record: TaskRecord) -> Result<Self, Self::Error> {
        let task = Self {
            id: record.id,
            topic: record.topic,
            description: record.description,
            date_time: record.date_time,
            kind: record.kind,
        };
        task.validate()?;
        Ok(task)
    }
}

/// Formats a date/time in the stored `"YYYY-MM-DD HH:mm"` form.
pub fn format_date_time(value: NaiveDateTime) -> String {
    value.format(DATE_TIME_FORMAT).to_string()
}

/// Parses user or stored date/time text, truncated to the minute.
///
/// Accepts `YYYY-MM-DD HH:mm`, optionally with `:ss` and/or a `T` separator.
pub fn parse_date_time(value: &str) -> Result<NaiveDateTime, TaskValidationError> {
    let trimmed = value.trim();
    DATE_TIME_INPUT_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
        .map(truncate_to_minute)
        .ok_or_else(|| TaskValidationError::InvalidDateTime(trimmed.to_string()))
}

/// Drops seconds and sub-second precision.
pub fn truncate_to_minute(value: NaiveDateTime) -> NaiveDateTime {
    value
        .with_second(0)
        .and_then(|value| value.with_nanosecond(0))
        .unwrap_or(value)
}

mod date_time_format {
    use super::DATE_TIME_FORMAT;
    use chrono::NaiveDateTime;
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.format(DATE_TIME_FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&text, DATE_TIME_FORMAT).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_date_time, truncate_to_minute, Task, TaskDraft, TaskType};
    use chrono::NaiveDate;

    #[test]
    fn parse_date_time_accepts_seconds_and_truncates() {
        let parsed = parse_date_time("2030-05-01 10:15:42").unwrap();
        let expected = NaiveDate::from_ymd_opt(2030, 5, 1)
            .unwrap()
            .and_hms_opt(10, 15, 0)
            .unwrap();
        assert_eq!(parsed, expected);
    }

    #[test]
    fn parse_date_time_rejects_garbage() {
        assert!(parse_date_time("tomorrow").is_err());
        assert!(parse_date_time("").is_err());
    }

    #[test]
    fn draft_truncates_seconds() {
        let at = NaiveDate::from_ymd_opt(2030, 1, 1)
            .unwrap()
            .and_hms_milli_opt(8, 30, 59, 500)
            .unwrap();
        let draft = TaskDraft::new("topic", "desc", at, TaskType::Event).unwrap();
        assert_eq!(draft.date_time, truncate_to_minute(at));
        assert_eq!(
            Task::from_draft(1, draft).unwrap().date_time_string(),
            "2030-01-01 08:30"
        );
    }

    #[test]
    fn task_type_round_trips_through_str() {
        for kind in TaskType::ALL {
            assert_eq!(kind.as_str().parse::<TaskType>().unwrap(), kind);
        }
        assert!("meeting".parse::<TaskType>().is_err());
    }
}
