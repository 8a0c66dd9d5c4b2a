use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Importance class of a habit. Ordinal: P1 outranks P2 outranks P3.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub enum Priority {
    P1,
    P2,
    P3,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EffectiveType {
    Permanent,
    Range,
}

/// A recurring task template. Edits never propagate into already-dispatched
/// task instances; those carry value snapshots.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    pub id: String,
    pub name: String,
    pub priority: Priority,
    pub daily_quota: u32,
    pub default_duration_minutes: u32,
    pub effective_type: EffectiveType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
}

/// Caller-supplied fields for a new habit. Quota and duration are taken as
/// given; keeping them >= 1 is the caller's responsibility.
#[derive(Debug, Clone)]
pub struct HabitDraft {
    pub name: String,
    pub priority: Priority,
    pub daily_quota: u32,
    pub duration_minutes: u32,
    pub effective_type: EffectiveType,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl Habit {
    pub fn from_draft(draft: HabitDraft) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: draft.name,
            priority: draft.priority,
            daily_quota: draft.daily_quota,
            default_duration_minutes: draft.duration_minutes,
            effective_type: draft.effective_type,
            start_date: draft.start_date,
            end_date: draft.end_date,
        }
    }

    /// Whether this habit should dispatch instances on `date`. Permanent
    /// habits are always eligible; range habits only inside their inclusive
    /// bounds, with a missing bound meaning unbounded on that side.
    pub fn is_active_on(&self, date: NaiveDate) -> bool {
        match self.effective_type {
            EffectiveType::Permanent => true,
            EffectiveType::Range => {
                if let Some(start) = self.start_date {
                    if date < start {
                        return false;
                    }
                }
                if let Some(end) = self.end_date {
                    if date > end {
                        return false;
                    }
                }
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn range_habit(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Habit {
        Habit::from_draft(HabitDraft {
            name: "Stretch".to_string(),
            priority: Priority::P2,
            daily_quota: 1,
            duration_minutes: 25,
            effective_type: EffectiveType::Range,
            start_date: start,
            end_date: end,
        })
    }

    #[test]
    fn permanent_habits_are_always_active() {
        let habit = Habit::from_draft(HabitDraft {
            name: "Read".to_string(),
            priority: Priority::P1,
            daily_quota: 2,
            duration_minutes: 30,
            effective_type: EffectiveType::Permanent,
            start_date: None,
            end_date: None,
        });
        assert!(habit.is_active_on(date(1999, 1, 1)));
        assert!(habit.is_active_on(date(2150, 12, 31)));
    }

    #[test]
    fn range_habits_respect_inclusive_bounds() {
        let habit = range_habit(Some(date(2024, 6, 1)), Some(date(2024, 6, 30)));
        assert!(!habit.is_active_on(date(2024, 5, 31)));
        assert!(habit.is_active_on(date(2024, 6, 1)));
        assert!(habit.is_active_on(date(2024, 6, 15)));
        assert!(habit.is_active_on(date(2024, 6, 30)));
        assert!(!habit.is_active_on(date(2024, 7, 1)));
    }

    #[test]
    fn range_habits_with_open_bounds_are_half_infinite() {
        let open_start = range_habit(None, Some(date(2024, 6, 30)));
        assert!(open_start.is_active_on(date(2000, 1, 1)));
        assert!(!open_start.is_active_on(date(2024, 7, 1)));

        let open_end = range_habit(Some(date(2024, 6, 1)), None);
        assert!(!open_end.is_active_on(date(2024, 5, 31)));
        assert!(open_end.is_active_on(date(2099, 1, 1)));
    }

    #[test]
    fn serializes_with_original_field_spelling() {
        let mut habit = range_habit(Some(date(2024, 6, 1)), None);
        habit.id = "h1".to_string();
        let json = serde_json::to_value(&habit).unwrap();
        assert_eq!(json["priority"], "P2");
        assert_eq!(json["dailyQuota"], 1);
        assert_eq!(json["defaultDurationMinutes"], 25);
        assert_eq!(json["effectiveType"], "range");
        assert_eq!(json["startDate"], "2024-06-01");
        assert!(json.get("endDate").is_none(), "absent bound must be omitted");
    }
}
