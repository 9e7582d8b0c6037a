//! Visible-list computation.
//!
//! Pure functions over a task slice; callers pass the instant to compare
//! against so results are reproducible in tests.

use crate::model::filter::{DateFilter, TypeFilter};
use crate::model::task::Task;
use chrono::{Local, NaiveDateTime};

/// Returns the tasks passing both selectors, in input order.
///
/// `Upcoming` keeps tasks strictly after `now`, `Expired` strictly before;
/// a task scheduled exactly at `now` passes neither.
pub fn visible<'a>(
    tasks: &'a [Task],
    type_filter: TypeFilter,
    date_filter: DateFilter,
    now: NaiveDateTime,
) -> Vec<&'a Task> {
    tasks
        .iter()
        .filter(|task| is_visible(task, type_filter, date_filter, now))
        .collect()
}

/// Same as [`visible`], evaluated against the local wall clock.
pub fn visible_now(
    tasks: &[Task],
    type_filter: TypeFilter,
    date_filter: DateFilter,
) -> Vec<&Task> {
    visible(tasks, type_filter, date_filter, local_now())
}

pub fn is_visible(
    task: &Task,
    type_filter: TypeFilter,
    date_filter: DateFilter,
    now: NaiveDateTime,
) -> bool {
    type_filter.matches(task.kind) && date_matches(task, date_filter, now)
}

/// Current local wall-clock time, the reference for stored date/times.
pub fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

fn date_matches(task: &Task, date_filter: DateFilter, now: NaiveDateTime) -> bool {
    match date_filter {
        DateFilter::All => true,
        DateFilter::Upcoming => task.date_time > now,
        DateFilter::Expired => task.date_time < now,
    }
}

#[cfg(test)]
mod tests {
    use super::visible;
    use crate::model::filter::{DateFilter, TypeFilter};
    use crate::model::task::{parse_date_time, Task, TaskType};

    fn task(id: i64, at: &str, kind: TaskType) -> Task {
        Task {
            id,
            topic: format!("topic {id}"),
            description: "desc".to_string(),
            date_time: parse_date_time(at).unwrap(),
            kind,
        }
    }

    #[test]
    fn task_at_exactly_now_is_neither_upcoming_nor_expired() {
        let tasks = vec![task(1, "2030-01-01 12:00", TaskType::Task)];
        let now = parse_date_time("2030-01-01 12:00").unwrap();

        assert!(visible(&tasks, TypeFilter::All, DateFilter::Upcoming, now).is_empty());
        assert!(visible(&tasks, TypeFilter::All, DateFilter::Expired, now).is_empty());
        assert_eq!(visible(&tasks, TypeFilter::All, DateFilter::All, now).len(), 1);
    }

    #[test]
    fn preserves_insertion_order() {
        let tasks = vec![
            task(3, "2031-01-01 00:00", TaskType::Event),
            task(1, "2030-01-01 00:00", TaskType::Event),
            task(2, "2032-01-01 00:00", TaskType::Event),
        ];
        let now = parse_date_time("2020-01-01 00:00").unwrap();

        let ids: Vec<i64> = visible(&tasks, TypeFilter::All, DateFilter::Upcoming, now)
            .into_iter()
            .map(|task| task.id)
            .collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }
}
