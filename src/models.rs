use crate::calendar::DayStatus;
use crate::date_key::DateKey;
use crate::log::CompletionLog;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    /// Unix epoch milliseconds.
    pub created_at: i64,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub archived: bool,
}

impl Task {
    /// Builds a fresh task, or `None` when the title is blank.
    pub fn create(title: &str, created_at: i64) -> Option<Self> {
        let title = title.trim();
        if title.is_empty() {
            return None;
        }
        Some(Self {
            id: uuid::Uuid::new_v4().to_string(),
            title: title.to_string(),
            created_at,
            archived: false,
        })
    }

    /// First calendar day the task counts toward.
    pub fn created_on(&self) -> DateKey {
        DateKey::from_timestamp_millis(self.created_at)
    }

    pub fn is_active_on(&self, date: DateKey) -> bool {
        !self.archived && self.created_on() <= date
    }
}

/// Everything persisted for one identity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackerData {
    pub tasks: Vec<Task>,
    pub log: CompletionLog,
}

impl TrackerData {
    pub fn task(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn task_mut(&mut self, id: &str) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|task| task.id == id)
    }

    /// Drops the task from the roster; its completion history stays in the log.
    pub fn remove_task(&mut self, id: &str) -> Option<Task> {
        let index = self.tasks.iter().position(|task| task.id == id)?;
        Some(self.tasks.remove(index))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct TaskStats {
    pub current_streak: u32,
    pub longest_streak: u32,
    pub total_completions: u32,
    pub completion_rate: u32,
    pub last_completed_date: Option<DateKey>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct AggregateStats {
    pub total_possible: u64,
    pub total_completed: u64,
    pub total_failed: u64,
    pub completion_rate: u32,
    pub logged_days: usize,
    pub active_tasks: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DaySummary {
    pub date: DateKey,
    pub total_tasks: usize,
    pub completed_tasks: usize,
    pub status: DayStatus,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskWithStats {
    pub task: Task,
    pub stats: TaskStats,
    pub done_today: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TodayResponse {
    pub date: DateKey,
    pub tasks: Vec<TaskWithStats>,
}

#[derive(Debug, Deserialize)]
pub struct CreateTaskRequest {
    pub title: String,
}

#[derive(Debug, Deserialize)]
pub struct ArchiveRequest {
    pub archived: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleRequest {
    pub task_id: String,
    #[serde(default)]
    pub date: Option<DateKey>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleResponse {
    pub date: DateKey,
    pub task_id: String,
    pub done: bool,
    pub stats: TaskStats,
}

#[derive(Debug, Deserialize)]
pub struct MonthQuery {
    pub year: Option<i32>,
    pub month: Option<u32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportResponse {
    pub imported: bool,
    pub tasks: usize,
    pub logged_days: usize,
}
