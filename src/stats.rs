use crate::date_key::DateKey;
use crate::log::CompletionLog;
use crate::models::{AggregateStats, Task, TaskStats, TaskWithStats};
use std::collections::BTreeSet;

/// Streaks and completion figures for one task as of `today`.
pub fn compute_stats(task: &Task, log: &CompletionLog, today: DateKey) -> TaskStats {
    let done: BTreeSet<DateKey> = log.done_dates(&task.id).collect();
    let total_completions = done.len() as u64;
    let days = days_since_creation(task, today);

    TaskStats {
        current_streak: current_streak(&done, today),
        longest_streak: longest_streak(&done),
        total_completions: total_completions as u32,
        completion_rate: rounded_percent(total_completions, days).min(100),
        last_completed_date: done.last().copied(),
    }
}

/// Inclusive count of days from the task's creation through `today`, never
/// less than one.
pub fn days_since_creation(task: &Task, today: DateKey) -> u64 {
    (today.days_since(task.created_on()) + 1).max(1) as u64
}

/// Run of done days ending today, or ending yesterday while today is still open.
fn current_streak(done: &BTreeSet<DateKey>, today: DateKey) -> u32 {
    let today_done = done.contains(&today);
    let yesterday = today.pred();
    if !today_done && !done.contains(&yesterday) {
        return 0;
    }

    let mut streak = 0u32;
    let mut day = yesterday;
    while done.contains(&day) {
        streak += 1;
        day = day.pred();
    }
    streak + u32::from(today_done)
}

fn longest_streak(done: &BTreeSet<DateKey>) -> u32 {
    let mut longest = 0u32;
    let mut run = 0u32;
    let mut previous: Option<DateKey> = None;

    for &date in done {
        run = match previous {
            Some(prev) if date.days_since(prev) == 1 => run + 1,
            _ => 1,
        };
        longest = longest.max(run);
        previous = Some(date);
    }
    longest
}

/// Roll-up of every task's completions against the days it has existed.
pub fn aggregate(tasks: &[Task], log: &CompletionLog, today: DateKey) -> AggregateStats {
    let mut total_possible = 0u64;
    let mut total_completed = 0u64;

    for task in tasks {
        total_possible += days_since_creation(task, today);
        total_completed += log.done_dates(&task.id).count() as u64;
    }

    AggregateStats {
        total_possible,
        total_completed,
        total_failed: total_possible.saturating_sub(total_completed),
        completion_rate: rounded_percent(total_completed, total_possible),
        logged_days: log.len(),
        active_tasks: tasks.iter().filter(|task| !task.archived).count(),
    }
}

/// Non-archived tasks with their stats, those still open today first.
pub fn dashboard(tasks: &[Task], log: &CompletionLog, today: DateKey) -> Vec<TaskWithStats> {
    let mut rows: Vec<TaskWithStats> = tasks
        .iter()
        .filter(|task| !task.archived)
        .map(|task| TaskWithStats {
            stats: compute_stats(task, log, today),
            done_today: log.is_done(today, &task.id),
            task: task.clone(),
        })
        .collect();
    rows.sort_by_key(|row| row.done_today);
    rows
}

/// `round(part / whole * 100)`, zero for an empty whole.
fn rounded_percent(part: u64, whole: u64) -> u32 {
    if whole == 0 {
        return 0;
    }
    let percent = (part * 200 + whole) / (whole * 2);
    u32::try_from(percent).unwrap_or(u32::MAX)
}
