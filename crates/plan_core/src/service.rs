use std::collections::BTreeMap;

use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::backup;
use crate::clock::{Clock, SystemClock};
use crate::day::DailyData;
use crate::dispatch;
use crate::error::ImportError;
use crate::habit::{Habit, HabitDraft};
use crate::stats;
use crate::store::StateStore;
use crate::task::{Task, TaskStatus};

/// Front door of the planner: habit CRUD, daily dispatch, task lifecycle,
/// stats and backup, all over an injected store.
pub struct PlannerService {
    store: Box<dyn StateStore>,
    clock: Box<dyn Clock>,
}

pub struct PlannerServiceBuilder {
    store: Option<Box<dyn StateStore>>,
    clock: Box<dyn Clock>,
}

impl PlannerServiceBuilder {
    pub fn new() -> Self {
        Self {
            store: None,
            clock: Box::new(SystemClock),
        }
    }

    pub fn with_store(mut self, store: Box<dyn StateStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn with_clock(mut self, clock: Box<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn build(self) -> Result<PlannerService> {
        let store = self
            .store
            .ok_or_else(|| anyhow!("a state store is required"))?;
        Ok(PlannerService {
            store,
            clock: self.clock,
        })
    }
}

impl Default for PlannerServiceBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PlannerService {
    pub fn builder() -> PlannerServiceBuilder {
        PlannerServiceBuilder::new()
    }

    pub fn add_habit(&self, draft: HabitDraft) -> Result<Habit> {
        let mut habits = self.store.load_habits();
        let habit = Habit::from_draft(draft);
        habits.push(habit.clone());
        self.store.save_habits(&habits)?;
        debug!(habit = %habit.id, name = %habit.name, "habit added");
        Ok(habit)
    }

    pub fn habits(&self) -> Vec<Habit> {
        self.store.load_habits()
    }

    /// Remove the habit, then sweep every stored day: instances still in the
    /// inbox disappear with it, while scheduled and completed instances stay
    /// as history.
    pub fn delete_habit(&self, id: &str) -> Result<()> {
        let mut habits = self.store.load_habits();
        habits.retain(|habit| habit.id != id);
        self.store.save_habits(&habits)?;

        let mut logs = self.store.load_daily_logs();
        let mut updated = false;
        for day in logs.values_mut() {
            let before = day.tasks.len();
            day.tasks
                .retain(|task| !(task.habit_id == id && task.status == TaskStatus::Inbox));
            updated |= day.tasks.len() != before;
        }
        if updated {
            self.store.save_daily_logs(&logs)?;
        }
        debug!(habit = id, "habit deleted");
        Ok(())
    }

    /// Fetch (or lazily create) the record for `date` and top eligible
    /// habits up to their quotas. Days strictly before today are returned as
    /// stored; history is never rewritten. Repeating the call with an
    /// unchanged habit set returns identical data.
    pub fn initialize_day(&self, date: NaiveDate) -> Result<DailyData> {
        let mut logs = self.store.load_daily_logs();
        let mut day = logs
            .get(&date)
            .cloned()
            .unwrap_or_else(|| DailyData::new(date));

        let habits = self.store.load_habits();
        if dispatch::fill_quotas(&mut day, &habits, self.clock.today()) {
            logs.insert(date, day.clone());
            self.store.save_daily_logs(&logs)?;
            debug!(%date, tasks = day.tasks.len(), "dispatched task instances");
        }
        Ok(day)
    }

    /// Full-record replace by id within the task's own date. Unknown dates
    /// and ids are ignored.
    pub fn update_task(&self, task: Task) -> Result<()> {
        let mut logs = self.store.load_daily_logs();
        let Some(day) = logs.get_mut(&task.date) else {
            debug!(task = %task.id, date = %task.date, "no record for date, ignoring update");
            return Ok(());
        };
        let Some(slot) = day.task_mut(&task.id) else {
            debug!(task = %task.id, "task not present on its date, ignoring update");
            return Ok(());
        };
        *slot = task;
        self.store.save_daily_logs(&logs)
    }

    /// Soft delete: the instance keeps its place in the day's record so the
    /// slot is not re-dispatched.
    pub fn delete_task_from_day(&self, task_id: &str, date: NaiveDate) -> Result<()> {
        let mut logs = self.store.load_daily_logs();
        let Some(day) = logs.get_mut(&date) else {
            debug!(task = task_id, %date, "no record for date, ignoring delete");
            return Ok(());
        };
        let Some(task) = day.task_mut(task_id) else {
            debug!(task = task_id, %date, "task not found, ignoring delete");
            return Ok(());
        };
        task.soft_delete();
        self.store.save_daily_logs(&logs)?;
        debug!(task = task_id, %date, "task soft-deleted");
        Ok(())
    }

    /// Give back one of the habit's daily slots. Taking the last slot
    /// deletes the habit outright; a zero-quota habit is not representable.
    pub fn reduce_habit_quota(&self, habit_id: &str) -> Result<()> {
        let mut habits = self.store.load_habits();
        let Some(habit) = habits.iter_mut().find(|habit| habit.id == habit_id) else {
            warn!(habit = habit_id, "quota reduction for unknown habit");
            return Ok(());
        };
        if habit.daily_quota > 1 {
            habit.daily_quota -= 1;
            debug!(habit = habit_id, quota = habit.daily_quota, "quota reduced");
            self.store.save_habits(&habits)
        } else {
            debug!(habit = habit_id, "last slot removed, deleting habit");
            self.delete_habit(habit_id)
        }
    }

    pub fn yearly_stats(&self) -> BTreeMap<NaiveDate, u32> {
        stats::yearly_stats(&self.store.load_daily_logs())
    }

    pub fn export_json(&self) -> Result<String> {
        backup::export(self.store.as_ref())
    }

    pub fn import_json(&self, json: &str) -> Result<(), ImportError> {
        backup::import(self.store.as_ref(), json)
    }
}
