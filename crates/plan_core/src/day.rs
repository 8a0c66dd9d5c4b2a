use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::task::Task;

/// The ordered task list for one calendar day. Created lazily on first
/// access; one record per date.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DailyData {
    pub date: NaiveDate,
    pub tasks: Vec<Task>,
}

impl DailyData {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            tasks: Vec::new(),
        }
    }

    /// Instances already dispatched for `habit_id`, in any status. Deleted
    /// instances count too, which is what blocks re-dispatch of a slot the
    /// user removed.
    pub fn instances_of(&self, habit_id: &str) -> usize {
        self.tasks
            .iter()
            .filter(|task| task.habit_id == habit_id)
            .count()
    }

    pub fn task_mut(&mut self, task_id: &str) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|task| task.id == task_id)
    }

    pub fn completed_minutes(&self) -> u32 {
        self.tasks
            .iter()
            .filter(|task| task.status.is_completed())
            .map(|task| task.duration_minutes)
            .sum()
    }
}
