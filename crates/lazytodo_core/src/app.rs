//! Application coordinator at the view boundary.
//!
//! # Responsibility
//! - Accept user intents from a view and route them to the form or store.
//! - Produce render-ready snapshots of the current state.
//! - Notify subscribed listeners after every state change.
//!
//! # Invariants
//! - Listeners are notified only after the change has been applied.
//! - No-op intents (deleting an unknown id, failed validation) do not notify
//!   `TasksChanged`.

use crate::model::filter::{DateFilter, TypeFilter};
use crate::model::task::{Task, TaskId};
use crate::repo::task_repo::TaskRepository;
use crate::service::filter::{local_now, visible};
use crate::service::form::{FieldErrors, FormController, FormError, FormFields, RawFields};
use crate::service::task_store::TaskStore;
use chrono::NaiveDateTime;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// A user action emitted by a view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    SelectTypeFilter(TypeFilter),
    SelectDateFilter(DateFilter),
    OpenCreate,
    OpenEdit(TaskId),
    DeleteTask(TaskId),
    CancelForm,
    SubmitForm(RawFields),
}

/// What changed, sent to listeners after an intent is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    TasksChanged,
    FiltersChanged,
    FormChanged,
}

/// Receives state-change notifications; typically triggers a re-render.
pub trait ChangeListener {
    fn on_change(&mut self, change: Change);
}

impl<F: FnMut(Change)> ChangeListener for F {
    fn on_change(&mut self, change: Change) {
        self(change)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    UnknownTask(TaskId),
    Form(FormError),
}

impl Display for AppError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownTask(id) => write!(f, "task not found: {id}"),
            Self::Form(err) => write!(f, "{err}"),
        }
    }
}

impl Error for AppError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::UnknownTask(_) => None,
            Self::Form(err) => Some(err),
        }
    }
}

impl From<FormError> for AppError {
    fn from(value: FormError) -> Self {
        Self::Form(value)
    }
}

/// Form section of a [`ViewModel`], present only while the form is open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormView {
    pub title: &'static str,
    pub editing_id: Option<TaskId>,
    pub fields: FormFields,
    pub errors: FieldErrors,
}

/// Everything a view needs to draw one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewModel {
    pub tasks: Vec<Task>,
    pub type_filter: TypeFilter,
    pub date_filter: DateFilter,
    pub form: Option<FormView>,
}

/// Store + form + listeners behind a single intent entry point.
pub struct TodoApp<R: TaskRepository> {
    store: TaskStore<R>,
    form: FormController,
    listeners: Vec<Box<dyn ChangeListener>>,
}

impl<R: TaskRepository> TodoApp<R> {
    /// Loads persisted state through `repo`; never fails.
    pub fn load(repo: R) -> Self {
        Self {
            store: TaskStore::load(repo),
            form: FormController::new(),
            listeners: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, listener: impl ChangeListener + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn store(&self) -> &TaskStore<R> {
        &self.store
    }

    pub fn form(&self) -> &FormController {
        &self.form
    }

    /// Applies one intent and notifies listeners of what changed.
    ///
    /// Returns the created/updated task for a successful `SubmitForm`.
    pub fn dispatch(&mut self, intent: Intent) -> Result<Option<Task>, AppError> {
        match intent {
            Intent::SelectTypeFilter(value) => {
                self.store.set_type_filter(value);
                self.notify(Change::FiltersChanged);
                Ok(None)
            }
            Intent::SelectDateFilter(value) => {
                self.store.set_date_filter(value);
                self.notify(Change::FiltersChanged);
                Ok(None)
            }
            Intent::OpenCreate => {
                self.form.open_create();
                self.notify(Change::FormChanged);
                Ok(None)
            }
            Intent::OpenEdit(id) => {
                let task = self.store.get(id).ok_or(AppError::UnknownTask(id))?;
                self.form.open_edit(task);
                self.notify(Change::FormChanged);
                Ok(None)
            }
            Intent::DeleteTask(id) => {
                if self.store.remove(id) {
                    self.notify(Change::TasksChanged);
                }
                Ok(None)
            }
            Intent::CancelForm => {
                self.form.cancel();
                self.notify(Change::FormChanged);
                Ok(None)
            }
            Intent::SubmitForm(raw) => self.submit(&raw).map(Some),
        }
    }

    /// Snapshot for rendering, filtered against `now`.
    pub fn view(&self, now: NaiveDateTime) -> ViewModel {
        let filters = self.store.filters();
        ViewModel {
            tasks: visible(
                self.store.tasks(),
                filters.type_filter,
                filters.date_filter,
                now,
            )
            .into_iter()
            .cloned()
            .collect(),
            type_filter: filters.type_filter,
            date_filter: filters.date_filter,
            form: self.form.title().map(|title| FormView {
                title,
                editing_id: self.form.editing().map(|task| task.id),
                fields: self.form.fields().clone(),
                errors: self.form.errors().clone(),
            }),
        }
    }

    /// Snapshot for rendering, filtered against the local wall clock.
    pub fn view_now(&self) -> ViewModel {
        self.view(local_now())
    }

    fn submit(&mut self, raw: &RawFields) -> Result<Task, AppError> {
        self.form.apply_raw(raw)?;
        let result = self.form.submit(&mut self.store);
        if result.is_ok() {
            self.notify(Change::TasksChanged);
        }
        self.notify(Change::FormChanged);
        result.map_err(AppError::from)
    }

    fn notify(&mut self, change: Change) {
        for listener in &mut self.listeners {
            listener.on_change(change);
        }
    }
}
