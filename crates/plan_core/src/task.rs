use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::habit::{Habit, Priority};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Inbox,
    Scheduled,
    Completed,
    Deleted,
}

impl TaskStatus {
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }

    /// Deleted is terminal: no transition leads back out of it.
    pub fn is_deleted(&self) -> bool {
        matches!(self, Self::Deleted)
    }
}

/// One dated instance dispatched from a habit. `name`, `priority` and
/// `duration_minutes` are copied at dispatch time; editing the habit later
/// leaves existing instances untouched.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub habit_id: String,
    pub name: String,
    pub priority: Priority,
    pub status: TaskStatus,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    pub duration_minutes: u32,
}

impl Task {
    /// Snapshot a habit into a fresh inbox instance for `date`.
    pub fn from_habit(habit: &Habit, date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            habit_id: habit.id.clone(),
            name: habit.name.clone(),
            priority: habit.priority,
            status: TaskStatus::Inbox,
            date,
            start_time: None,
            duration_minutes: habit.default_duration_minutes,
        }
    }

    /// Pin the task to an "HH:00" slot and move it out of the inbox.
    pub fn schedule(&mut self, slot: impl Into<String>) {
        self.start_time = Some(slot.into());
        self.status = TaskStatus::Scheduled;
    }

    pub fn complete(&mut self) {
        self.status = TaskStatus::Completed;
    }

    /// Soft delete: the instance stays in its day's record so dispatch keeps
    /// counting it against the habit's quota.
    pub fn soft_delete(&mut self) {
        self.status = TaskStatus::Deleted;
    }
}
