use lazytodo_core::{
    parse_date_time, FormController, FormError, FormField, FormState, KvTaskRepository,
    MemoryStore, TaskDraft, TaskStore, TaskStoreError, TaskType,
};

fn empty_store() -> TaskStore<KvTaskRepository<MemoryStore>> {
    TaskStore::load(KvTaskRepository::new(MemoryStore::new()))
}

#[test]
fn open_create_starts_with_blank_fields() {
    let mut form = FormController::new();
    form.open_create();
    form.set_topic("leftover").unwrap();
    form.open_create();

    assert_eq!(form.state(), &FormState::Open { editing: None });
    assert_eq!(form.title(), Some("Add Task"));
    assert!(form.fields().topic.is_empty());
    assert_eq!(form.fields().date_time, None);
    assert_eq!(form.fields().task_type, None);
}

#[test]
fn submit_with_missing_fields_stays_open_and_reports_each_field() {
    let mut store = empty_store();
    let mut form = FormController::new();
    form.open_create();

    let err = form.submit(&mut store).unwrap_err();

    let errors = match err {
        FormError::Invalid(errors) => errors,
        other => panic!("expected validation error, got {other:?}"),
    };
    assert_eq!(errors.get(FormField::Topic), Some("Topic is required"));
    assert_eq!(
        errors.get(FormField::Description),
        Some("Description is required")
    );
    assert_eq!(errors.get(FormField::DateTime), Some("Select date & time"));
    assert_eq!(errors.get(FormField::TaskType), Some("Select task type"));
    assert!(form.is_open());
    assert_eq!(form.errors(), &errors);
    assert!(store.is_empty());
}

#[test]
fn whitespace_only_topic_is_rejected() {
    let mut store = empty_store();
    let mut form = FormController::new();
    form.open_create();
    form.set_topic("   ").unwrap();
    form.set_description("desc").unwrap();
    form.set_date_time_text("2099-01-01 09:00").unwrap();
    form.set_task_type(Some(TaskType::Task)).unwrap();

    let err = form.submit(&mut store).unwrap_err();

    match err {
        FormError::Invalid(errors) => {
            assert_eq!(errors.len(), 1);
            assert!(errors.get(FormField::Topic).is_some());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn submit_create_adds_task_and_closes() {
    let mut store = empty_store();
    let mut form = FormController::new();
    form.open_create();
    form.set_topic("Standup").unwrap();
    form.set_description("daily").unwrap();
    form.set_date_time_text("2099-01-01 09:00:37").unwrap();
    form.set_task_type_text("Meeting").unwrap();

    let task = form.submit(&mut store).unwrap();

    assert_eq!(form.state(), &FormState::Closed);
    assert_eq!(store.tasks(), &[task.clone()][..]);
    assert_eq!(task.date_time_string(), "2099-01-01 09:00");
    assert_eq!(task.kind, TaskType::Meeting);
}

#[test]
fn open_edit_prefills_and_submit_updates_in_place() {
    let mut store = empty_store();
    let original = store
        .add(
            TaskDraft::new(
                "Review",
                "PR queue",
                parse_date_time("2030-03-03 15:00").unwrap(),
                TaskType::Task,
            )
            .unwrap(),
        )
        .unwrap();

    let mut form = FormController::new();
    form.open_edit(&original);
    assert_eq!(form.title(), Some("Edit Task"));
    assert_eq!(form.editing(), Some(&original));
    assert_eq!(form.fields().topic, "Review");
    assert_eq!(form.fields().date_time, Some(original.date_time));
    assert_eq!(form.fields().task_type, Some(TaskType::Task));

    form.set_description("PR queue + backlog").unwrap();
    let updated = form.submit(&mut store).unwrap();

    assert_eq!(updated.id, original.id);
    assert_eq!(store.len(), 1);
    assert_eq!(store.get(original.id).unwrap().description, "PR queue + backlog");
    assert!(!form.is_open());
}

#[test]
fn cancel_discards_edits() {
    let mut store = empty_store();
    let original = store
        .add(
            TaskDraft::new(
                "Keep me",
                "as is",
                parse_date_time("2030-03-03 15:00").unwrap(),
                TaskType::Event,
            )
            .unwrap(),
        )
        .unwrap();

    let mut form = FormController::new();
    form.open_edit(&original);
    form.set_topic("Changed").unwrap();
    form.cancel();

    assert_eq!(form.state(), &FormState::Closed);
    assert_eq!(store.get(original.id), Some(&original));
    assert_eq!(form.submit(&mut store), Err(FormError::Closed));
}

#[test]
fn editing_a_deleted_task_closes_with_not_found() {
    let mut store = empty_store();
    let original = store
        .add(
            TaskDraft::new(
                "Doomed",
                "soon removed",
                parse_date_time("2030-03-03 15:00").unwrap(),
                TaskType::Event,
            )
            .unwrap(),
        )
        .unwrap();

    let mut form = FormController::new();
    form.open_edit(&original);
    store.remove(original.id);

    let err = form.submit(&mut store).unwrap_err();

    assert_eq!(err, FormError::Store(TaskStoreError::NotFound(original.id)));
    assert!(!form.is_open());
    assert!(store.is_empty());
}

#[test]
fn store_rejection_is_reported_as_store_error_and_keeps_form_open() {
    let raw = r#"[{"id":9223372036854775807,"topic":"Last","description":"at the limit","dateTime":"2099-01-01 09:00","type":"Task"}]"#;
    let mut store = TaskStore::load(KvTaskRepository::new(MemoryStore::with_entries([(
        "tasks", raw,
    )])));
    let mut form = FormController::new();
    form.open_create();
    form.set_topic("One more").unwrap();
    form.set_description("no id left").unwrap();
    form.set_date_time_text("2099-01-02 10:00").unwrap();
    form.set_task_type(Some(TaskType::Meeting)).unwrap();

    let err = form.submit(&mut store).unwrap_err();

    assert_eq!(err, FormError::Store(TaskStoreError::IdExhausted));
    assert!(form.is_open());
    assert!(form.errors().is_empty());
    assert_eq!(form.fields().topic, "One more");
    assert_eq!(store.len(), 1);
}
