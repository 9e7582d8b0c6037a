//! Create/edit form state machine.
//!
//! # Responsibility
//! - Track whether the form is closed, creating, or editing a task.
//! - Hold in-progress field values and per-field validation messages.
//! - Turn a valid submission into a store `add`/`update`.
//!
//! # Invariants
//! - Field mutation and submission are only accepted while open.
//! - A failed validation never touches the store and keeps the form open.
//! - `cancel` discards fields without touching the store.

use crate::model::task::{
    parse_date_time, truncate_to_minute, Task, TaskDraft, TaskType, TaskValidationError,
};
use crate::repo::task_repo::TaskRepository;
use crate::service::task_store::{TaskStore, TaskStoreError};
use chrono::NaiveDateTime;
use log::{debug, info, warn};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const TOPIC_REQUIRED: &str = "Topic is required";
pub const DESCRIPTION_REQUIRED: &str = "Description is required";
pub const DATE_TIME_REQUIRED: &str = "Select date & time";
pub const TASK_TYPE_REQUIRED: &str = "Select task type";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FormField {
    Topic,
    Description,
    DateTime,
    TaskType,
}

impl FormField {
    pub fn label(self) -> &'static str {
        match self {
            Self::Topic => "Topic",
            Self::Description => "Description",
            Self::DateTime => "Date & Time",
            Self::TaskType => "Type",
        }
    }
}

/// Per-field validation messages, ordered by field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<FormField, String>);

impl FieldErrors {
    pub fn get(&self, field: FormField) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FormField, &str)> {
        self.0.iter().map(|(field, message)| (*field, message.as_str()))
    }

    fn insert(&mut self, field: FormField, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    fn remove(&mut self, field: FormField) {
        self.0.remove(&field);
    }
}

impl Display for FieldErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (field, message) in self.iter() {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", field.label(), message)?;
            first = false;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    /// The form is closed; open it first.
    Closed,
    Invalid(FieldErrors),
    Store(TaskStoreError),
}

impl Display for FormError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Closed => write!(f, "form is not open"),
            Self::Invalid(errors) => write!(f, "invalid form input: {errors}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for FormError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            Self::Closed | Self::Invalid(_) => None,
        }
    }
}

/// Structured in-progress field values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFields {
    pub topic: String,
    pub description: String,
    pub date_time: Option<NaiveDateTime>,
    pub task_type: Option<TaskType>,
}

impl FormFields {
    fn from_task(task: &Task) -> Self {
        Self {
            topic: task.topic.clone(),
            description: task.description.clone(),
            date_time: Some(task.date_time),
            task_type: Some(task.kind),
        }
    }
}

/// Unparsed field values as captured by a view. Empty strings mean "unset".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawFields {
    pub topic: String,
    pub description: String,
    pub date_time: String,
    pub task_type: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FormState {
    #[default]
    Closed,
    /// `editing == None` means the form creates a new task.
    Open { editing: Option<Task> },
}

#[derive(Debug, Default)]
pub struct FormController {
    state: FormState,
    fields: FormFields,
    /// Messages from the last failed submit.
    errors: FieldErrors,
    /// Parse failures from text setters, reported on submit.
    input_errors: FieldErrors,
}

impl FormController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, FormState::Open { .. })
    }

    /// Task being edited, if the form is open in edit mode.
    pub fn editing(&self) -> Option<&Task> {
        match &self.state {
            FormState::Open { editing } => editing.as_ref(),
            FormState::Closed => None,
        }
    }

    pub fn fields(&self) -> &FormFields {
        &self.fields
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// Dialog title, `None` while closed.
    pub fn title(&self) -> Option<&'static str> {
        match &self.state {
            FormState::Closed => None,
            FormState::Open { editing: None } => Some("Add Task"),
            FormState::Open { editing: Some(_) } => Some("Edit Task"),
        }
    }

    /// Opens an empty form for a new task.
    pub fn open_create(&mut self) {
        self.reset(FormState::Open { editing: None }, FormFields::default());
        debug!("event=form_open module=form mode=create");
    }

    /// Opens the form pre-filled from `task`.
    pub fn open_edit(&mut self, task: &Task) {
        self.reset(
            FormState::Open {
                editing: Some(task.clone()),
            },
            FormFields::from_task(task),
        );
        debug!("event=form_open module=form mode=edit id={}", task.id);
    }

    /// Closes the form, discarding any in-progress values.
    pub fn cancel(&mut self) {
        if self.is_open() {
            debug!("event=form_cancel module=form");
        }
        self.close();
    }

    pub fn set_topic(&mut self, value: impl Into<String>) -> Result<(), FormError> {
        self.ensure_open()?;
        self.fields.topic = value.into();
        Ok(())
    }

    pub fn set_description(&mut self, value: impl Into<String>) -> Result<(), FormError> {
        self.ensure_open()?;
        self.fields.description = value.into();
        Ok(())
    }

    pub fn set_date_time(&mut self, value: Option<NaiveDateTime>) -> Result<(), FormError> {
        self.ensure_open()?;
        self.fields.date_time = value;
        self.input_errors.remove(FormField::DateTime);
        Ok(())
    }

    pub fn set_task_type(&mut self, value: Option<TaskType>) -> Result<(), FormError> {
        self.ensure_open()?;
        self.fields.task_type = value;
        self.input_errors.remove(FormField::TaskType);
        Ok(())
    }

    /// Parses and sets the date/time; blank text clears it.
    ///
    /// Unparseable text clears the value and is reported on submit.
    pub fn set_date_time_text(&mut self, text: &str) -> Result<(), FormError> {
        if text.trim().is_empty() {
            return self.set_date_time(None);
        }
        match parse_date_time(text) {
            Ok(value) => self.set_date_time(Some(value)),
            Err(err) => {
                self.set_date_time(None)?;
                self.input_errors.insert(FormField::DateTime, err.to_string());
                Ok(())
            }
        }
    }

    /// Parses and sets the task type; blank text clears it.
    pub fn set_task_type_text(&mut self, text: &str) -> Result<(), FormError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return self.set_task_type(None);
        }
        match trimmed.parse::<TaskType>() {
            Ok(kind) => self.set_task_type(Some(kind)),
            Err(err) => {
                self.set_task_type(None)?;
                self.input_errors.insert(FormField::TaskType, err.to_string());
                Ok(())
            }
        }
    }

    /// Replaces all four fields from raw view input.
    pub fn apply_raw(&mut self, raw: &RawFields) -> Result<(), FormError> {
        self.set_topic(raw.topic.as_str())?;
        self.set_description(raw.description.as_str())?;
        self.set_date_time_text(&raw.date_time)?;
        self.set_task_type_text(&raw.task_type)
    }

    /// Checks required fields and builds a draft without submitting.
    pub fn validate(&self) -> Result<TaskDraft, FieldErrors> {
        let mut errors = self.input_errors.clone();
        if self.fields.topic.trim().is_empty() {
            errors.insert(FormField::Topic, TOPIC_REQUIRED);
        }
        if self.fields.description.trim().is_empty() {
            errors.insert(FormField::Description, DESCRIPTION_REQUIRED);
        }
        if self.fields.date_time.is_none() && errors.get(FormField::DateTime).is_none() {
            errors.insert(FormField::DateTime, DATE_TIME_REQUIRED);
        }
        if self.fields.task_type.is_none() && errors.get(FormField::TaskType).is_none() {
            errors.insert(FormField::TaskType, TASK_TYPE_REQUIRED);
        }

        match (self.fields.date_time, self.fields.task_type) {
            (Some(date_time), Some(kind)) if errors.is_empty() => Ok(TaskDraft {
                topic: self.fields.topic.clone(),
                description: self.fields.description.clone(),
                date_time: truncate_to_minute(date_time),
                kind,
            }),
            _ => Err(errors),
        }
    }

    /// Validates and writes the form into `store`, then closes.
    ///
    /// # Errors
    /// - `Closed` when no form is open.
    /// - `Invalid` with per-field messages; the form stays open.
    /// - `Store(NotFound)` when the edited task no longer exists; the form
    ///   closes since there is nothing left to edit.
    /// - `Store` for any other store rejection (`IdExhausted`, a record the
    ///   store refuses); the form stays open with its fields intact.
    pub fn submit<R: TaskRepository>(
        &mut self,
        store: &mut TaskStore<R>,
    ) -> Result<Task, FormError> {
        let editing_id = match &self.state {
            FormState::Closed => return Err(FormError::Closed),
            FormState::Open { editing } => editing.as_ref().map(|task| task.id),
        };

        let draft = match self.validate() {
            Ok(draft) => draft,
            Err(errors) => {
                debug!(
                    "event=form_submit module=form status=invalid error_count={}",
                    errors.len()
                );
                self.errors = errors.clone();
                return Err(FormError::Invalid(errors));
            }
        };

        let result = match editing_id {
            None => store.add(draft),
            Some(id) => store.update(id, draft),
        };

        match result {
            Ok(task) => {
                info!(
                    "event=form_submit module=form status=ok mode={} id={}",
                    if editing_id.is_some() { "edit" } else { "create" },
                    task.id
                );
                self.close();
                Ok(task)
            }
            Err(err @ TaskStoreError::NotFound(_)) => {
                self.close();
                Err(FormError::Store(err))
            }
            Err(TaskStoreError::Validation(err)) => match field_errors_for(&err) {
                Some(errors) => {
                    self.errors = errors.clone();
                    Err(FormError::Invalid(errors))
                }
                None => Err(FormError::Store(TaskStoreError::Validation(err))),
            },
            Err(err) => {
                warn!(
                    "event=form_submit module=form status=store_error error={}",
                    err
                );
                Err(FormError::Store(err))
            }
        }
    }

    fn ensure_open(&self) -> Result<(), FormError> {
        if self.is_open() {
            Ok(())
        } else {
            Err(FormError::Closed)
        }
    }

    fn close(&mut self) {
        self.reset(FormState::Closed, FormFields::default());
    }

    fn reset(&mut self, state: FormState, fields: FormFields) {
        self.state = state;
        self.fields = fields;
        self.errors = FieldErrors::default();
        self.input_errors = FieldErrors::default();
    }
}

/// Field-level messages for the validation errors a user can fix in the form.
fn field_errors_for(err: &TaskValidationError) -> Option<FieldErrors> {
    let (field, message) = match err {
        TaskValidationError::EmptyTopic => (FormField::Topic, TOPIC_REQUIRED),
        TaskValidationError::EmptyDescription => (FormField::Description, DESCRIPTION_REQUIRED),
        _ => return None,
    };
    let mut errors = FieldErrors::default();
    errors.insert(field, message);
    Some(errors)
}

#[cfg(test)]
mod tests {
    use super::{FormController, FormError, FormField, FormState, DATE_TIME_REQUIRED};

    #[test]
    fn closed_form_rejects_field_changes() {
        let mut form = FormController::new();
        assert_eq!(form.set_topic("x"), Err(FormError::Closed));
        assert_eq!(form.title(), None);
    }

    #[test]
    fn bad_date_text_reports_parse_error_instead_of_required() {
        let mut form = FormController::new();
        form.open_create();
        form.set_date_time_text("next tuesday").unwrap();

        let errors = form.validate().unwrap_err();
        let message = errors.get(FormField::DateTime).unwrap();
        assert_ne!(message, DATE_TIME_REQUIRED);
        assert!(message.contains("next tuesday"));

        form.set_date_time_text("").unwrap();
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.get(FormField::DateTime), Some(DATE_TIME_REQUIRED));
    }

    #[test]
    fn cancel_returns_to_closed_and_clears_fields() {
        let mut form = FormController::new();
        form.open_create();
        form.set_topic("half typed").unwrap();
        form.cancel();

        assert_eq!(form.state(), &FormState::Closed);
        assert!(form.fields().topic.is_empty());
    }
}
