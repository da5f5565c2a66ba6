// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use tasktrack_common::{Task, TaskMetrics};

/// Computes productivity metrics over a task collection.
///
/// The caller decides which collection to feed in; the HTTP surface passes the
/// owner's non-archived list, so tasks that were auto-archived on completion
/// no longer count here. That interaction is intentional and mirrors the
/// behavior the client was built against.
///
/// On-time completion is judged at calendar-date precision: a task completed
/// any time on its planned day still counts as on time.
pub fn compute_task_metrics(tasks: &[Task]) -> TaskMetrics {
    let total_tasks = tasks.len();
    let completed_tasks = tasks.iter().filter(|t| t.is_completed).count();
    let pending_tasks = total_tasks - completed_tasks;

    let with_planned_date = tasks.iter().filter(|t| t.planned_date.is_some()).count();
    let completed_on_time = tasks
        .iter()
        .filter(|t| {
            t.is_completed
                && match (t.completion_date, t.planned_date) {
                    (Some(done), Some(planned)) => done.date_naive() <= planned,
                    _ => false,
                }
        })
        .count();

    let completion_rate = if total_tasks > 0 {
        completed_tasks as f64 / total_tasks as f64 * 100.0
    } else {
        0.0
    };

    let on_time_rate = if with_planned_date > 0 {
        completed_on_time as f64 / with_planned_date as f64 * 100.0
    } else {
        0.0
    };

    TaskMetrics {
        total_tasks,
        completed_tasks,
        pending_tasks,
        completion_rate: round_two_decimals(completion_rate),
        completed_on_time,
        on_time_rate: round_two_decimals(on_time_rate),
    }
}

fn round_two_decimals(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, NaiveDate, TimeZone, Utc};

    fn task(
        is_completed: bool,
        planned_date: Option<NaiveDate>,
        completion_date: Option<DateTime<Utc>>,
    ) -> Task {
        let now = Utc::now();
        Task {
            id: "task".to_string(),
            title: "A task".to_string(),
            description: None,
            is_completed,
            is_archived: false,
            planned_date,
            completion_date,
            user_id: "user".to_string(),
            category_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn instant(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    #[test]
    fn test_empty_set_yields_zero_rates() {
        let metrics = compute_task_metrics(&[]);

        assert_eq!(metrics.total_tasks, 0);
        assert_eq!(metrics.completed_tasks, 0);
        assert_eq!(metrics.pending_tasks, 0);
        assert_eq!(metrics.completion_rate, 0.0);
        assert_eq!(metrics.completed_on_time, 0);
        assert_eq!(metrics.on_time_rate, 0.0);
    }

    #[test]
    fn test_completed_without_planned_date_skips_on_time_denominator() {
        // A single completed task with no planned date: full completion rate,
        // but the on-time ratio has nothing to measure.
        let tasks = vec![task(true, None, Some(Utc::now()))];

        let metrics = compute_task_metrics(&tasks);

        assert_eq!(metrics.total_tasks, 1);
        assert_eq!(metrics.completed_tasks, 1);
        assert_eq!(metrics.pending_tasks, 0);
        assert_eq!(metrics.completion_rate, 100.0);
        assert_eq!(metrics.completed_on_time, 0);
        assert_eq!(metrics.on_time_rate, 0.0);
    }

    #[test]
    fn test_on_time_and_late_completions() {
        let tasks = vec![
            // Completed the day before the deadline: on time.
            task(
                true,
                Some(date(2025, 1, 10)),
                Some(instant(2025, 1, 9, 15)),
            ),
            // Completed the day after the deadline: late.
            task(
                true,
                Some(date(2025, 1, 5)),
                Some(instant(2025, 1, 6, 9)),
            ),
        ];

        let metrics = compute_task_metrics(&tasks);

        assert_eq!(metrics.completed_on_time, 1);
        assert_eq!(metrics.on_time_rate, 50.0);
        assert_eq!(metrics.completion_rate, 100.0);
    }

    #[test]
    fn test_completion_on_planned_day_counts_as_on_time() {
        // Late in the evening of the planned day is still the planned day.
        let tasks = vec![task(
            true,
            Some(date(2025, 1, 10)),
            Some(instant(2025, 1, 10, 23)),
        )];

        let metrics = compute_task_metrics(&tasks);

        assert_eq!(metrics.completed_on_time, 1);
        assert_eq!(metrics.on_time_rate, 100.0);
    }

    #[test]
    fn test_pending_planned_task_counts_against_on_time_rate() {
        let tasks = vec![
            task(
                true,
                Some(date(2025, 1, 10)),
                Some(instant(2025, 1, 9, 8)),
            ),
            // Planned but not completed yet: in the denominator, not the
            // numerator.
            task(false, Some(date(2025, 2, 1)), None),
            task(false, None, None),
        ];

        let metrics = compute_task_metrics(&tasks);

        assert_eq!(metrics.total_tasks, 3);
        assert_eq!(metrics.completed_tasks, 1);
        assert_eq!(metrics.pending_tasks, 2);
        assert_eq!(metrics.completed_on_time, 1);
        assert_eq!(metrics.on_time_rate, 50.0);
    }

    #[test]
    fn test_rates_round_to_two_decimals() {
        // 1 of 3 completed: 33.333...% must come back as 33.33.
        let tasks = vec![
            task(true, None, Some(Utc::now())),
            task(false, None, None),
            task(false, None, None),
        ];

        let metrics = compute_task_metrics(&tasks);

        assert_eq!(metrics.completion_rate, 33.33);
    }
}
