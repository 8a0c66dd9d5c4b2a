use chrono::NaiveDate;

use crate::day::DailyData;
use crate::habit::Habit;
use crate::task::Task;

/// Top each eligible habit up to its daily quota with fresh inbox instances.
/// Returns whether anything was appended, so callers only persist on change.
///
/// Existing instances count in every status, deleted included; a slot the
/// user already removed is never re-dispatched. Days strictly before `today`
/// are left untouched, whatever the current quotas say.
pub fn fill_quotas(day: &mut DailyData, habits: &[Habit], today: NaiveDate) -> bool {
    if day.date < today {
        return false;
    }

    let mut appended = false;
    for habit in habits {
        if !habit.is_active_on(day.date) {
            continue;
        }
        let existing = day.instances_of(&habit.id);
        for _ in existing..habit.daily_quota as usize {
            day.tasks.push(Task::from_habit(habit, day.date));
            appended = true;
        }
    }
    appended
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::habit::{EffectiveType, HabitDraft, Priority};
    use crate::task::TaskStatus;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn habit(quota: u32) -> Habit {
        Habit::from_draft(HabitDraft {
            name: "Stretch".to_string(),
            priority: Priority::P2,
            daily_quota: quota,
            duration_minutes: 25,
            effective_type: EffectiveType::Permanent,
            start_date: None,
            end_date: None,
        })
    }

    #[test]
    fn fills_exactly_quota_inbox_instances_on_an_empty_day() {
        let today = date(2024, 3, 1);
        let habit = habit(3);
        let mut day = DailyData::new(today);

        assert!(fill_quotas(&mut day, &[habit.clone()], today));
        assert_eq!(day.tasks.len(), 3);
        assert!(day
            .tasks
            .iter()
            .all(|t| t.habit_id == habit.id && t.status == TaskStatus::Inbox));
    }

    #[test]
    fn is_idempotent_for_an_unchanged_habit_set() {
        let today = date(2024, 3, 1);
        let habits = vec![habit(3), habit(1)];
        let mut day = DailyData::new(today);

        assert!(fill_quotas(&mut day, &habits, today));
        let first_pass = day.clone();
        assert!(!fill_quotas(&mut day, &habits, today));
        assert_eq!(day, first_pass);
    }

    #[test]
    fn deleted_instances_still_count_against_the_quota() {
        let today = date(2024, 3, 1);
        let habit = habit(2);
        let mut day = DailyData::new(today);
        fill_quotas(&mut day, std::slice::from_ref(&habit), today);

        day.tasks[0].soft_delete();
        assert!(!fill_quotas(&mut day, std::slice::from_ref(&habit), today));
        assert_eq!(day.tasks.len(), 2);
    }

    #[test]
    fn tops_up_after_a_quota_increase() {
        let today = date(2024, 3, 1);
        let mut habit = habit(1);
        let mut day = DailyData::new(today);
        fill_quotas(&mut day, std::slice::from_ref(&habit), today);
        assert_eq!(day.tasks.len(), 1);

        habit.daily_quota = 3;
        assert!(fill_quotas(&mut day, std::slice::from_ref(&habit), today));
        assert_eq!(day.tasks.len(), 3);
    }

    #[test]
    fn never_rewrites_days_before_today() {
        let today = date(2024, 3, 2);
        let mut day = DailyData::new(date(2024, 3, 1));
        assert!(!fill_quotas(&mut day, &[habit(5)], today));
        assert!(day.tasks.is_empty());
    }

    #[test]
    fn future_days_are_dispatched_like_today() {
        let today = date(2024, 3, 1);
        let mut day = DailyData::new(date(2024, 3, 8));
        assert!(fill_quotas(&mut day, &[habit(2)], today));
        assert_eq!(day.tasks.len(), 2);
    }

    #[test]
    fn range_habits_only_dispatch_inside_their_window() {
        let habit = Habit::from_draft(HabitDraft {
            name: "Course".to_string(),
            priority: Priority::P1,
            daily_quota: 2,
            duration_minutes: 45,
            effective_type: EffectiveType::Range,
            start_date: Some(date(2024, 6, 1)),
            end_date: Some(date(2024, 6, 30)),
        });
        let today = date(2024, 5, 1);

        let mut before = DailyData::new(date(2024, 5, 31));
        assert!(!fill_quotas(&mut before, std::slice::from_ref(&habit), today));
        assert!(before.tasks.is_empty());

        let mut inside = DailyData::new(date(2024, 6, 15));
        assert!(fill_quotas(&mut inside, std::slice::from_ref(&habit), today));
        assert_eq!(inside.tasks.len(), 2);

        let mut after = DailyData::new(date(2024, 7, 1));
        assert!(!fill_quotas(&mut after, std::slice::from_ref(&habit), today));
        assert!(after.tasks.is_empty());
    }
}
