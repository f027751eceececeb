use crate::date_key::DateKey;
use crate::log::CompletionLog;
use crate::models::{DaySummary, Task};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

pub const HEATMAP_DAYS: i64 = 365;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayStatus {
    /// No task was active on the day.
    Empty,
    Perfect,
    Partial,
    Failed,
}

/// Completed versus active task counts for `date`, with the derived status.
pub fn summarize_day(date: DateKey, tasks: &[Task], log: &CompletionLog) -> DaySummary {
    let completed = log.completed_on(date);
    let mut total_tasks = 0;
    let mut completed_tasks = 0;
    for task in tasks.iter().filter(|task| task.is_active_on(date)) {
        total_tasks += 1;
        if completed.is_some_and(|ids| ids.contains(&task.id)) {
            completed_tasks += 1;
        }
    }

    let status = if total_tasks == 0 {
        DayStatus::Empty
    } else if completed_tasks == total_tasks {
        DayStatus::Perfect
    } else if completed_tasks == 0 {
        DayStatus::Failed
    } else {
        DayStatus::Partial
    };

    DaySummary {
        date,
        total_tasks,
        completed_tasks,
        status,
    }
}

pub fn classify_day(date: DateKey, tasks: &[Task], log: &CompletionLog) -> DayStatus {
    summarize_day(date, tasks, log).status
}

impl DaySummary {
    /// Heatmap shade from 0 (nothing done) to 4 (everything done).
    pub fn intensity(&self) -> u8 {
        if self.total_tasks == 0 || self.completed_tasks == 0 {
            return 0;
        }
        if self.completed_tasks == self.total_tasks {
            return 4;
        }
        // Integer form of ratio >= 0.75 / >= 0.5.
        let done = self.completed_tasks * 4;
        if done >= self.total_tasks * 3 {
            3
        } else if done >= self.total_tasks * 2 {
            2
        } else {
            1
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarDay {
    #[serde(flatten)]
    pub summary: DaySummary,
    pub is_future: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarMonth {
    pub year: i32,
    pub month: u32,
    /// Blank cells before the 1st in a Sunday-first week.
    pub leading_blanks: u32,
    pub days: Vec<CalendarDay>,
}

pub fn month_grid(
    year: i32,
    month: u32,
    tasks: &[Task],
    log: &CompletionLog,
    today: DateKey,
) -> Option<CalendarMonth> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let days = first
        .iter_days()
        .take_while(|date| date.month() == month)
        .map(|date| {
            let key = DateKey::from_date(date);
            CalendarDay {
                summary: summarize_day(key, tasks, log),
                is_future: key > today,
            }
        })
        .collect();

    Some(CalendarMonth {
        year,
        month,
        leading_blanks: first.weekday().num_days_from_sunday(),
        days,
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayDetailEntry {
    pub task_id: String,
    pub title: String,
    pub done: bool,
}

/// Per-task breakdown for the tasks that counted on `date`.
pub fn day_detail(date: DateKey, tasks: &[Task], log: &CompletionLog) -> Vec<DayDetailEntry> {
    tasks
        .iter()
        .filter(|task| task.is_active_on(date))
        .map(|task| DayDetailEntry {
            task_id: task.id.clone(),
            title: task.title.clone(),
            done: log.is_done(date, &task.id),
        })
        .collect()
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayView {
    #[serde(flatten)]
    pub summary: DaySummary,
    pub tasks: Vec<DayDetailEntry>,
}

pub fn day_view(date: DateKey, tasks: &[Task], log: &CompletionLog) -> DayView {
    DayView {
        summary: summarize_day(date, tasks, log),
        tasks: day_detail(date, tasks, log),
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatmapCell {
    pub date: DateKey,
    pub intensity: u8,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Heatmap {
    pub leading_blanks: u32,
    pub cells: Vec<HeatmapCell>,
}

/// The last year of days ending `today`, oldest first.
pub fn heatmap(tasks: &[Task], log: &CompletionLog, today: DateKey) -> Heatmap {
    let start = today.minus_days(HEATMAP_DAYS - 1);
    let cells = (0..HEATMAP_DAYS)
        .map(|offset| {
            let date = start.plus_days(offset);
            HeatmapCell {
                date,
                intensity: summarize_day(date, tasks, log).intensity(),
            }
        })
        .collect();

    Heatmap {
        leading_blanks: start.date().weekday().num_days_from_sunday(),
        cells,
    }
}
