use std::collections::BTreeMap;

use chrono::{Datelike, Duration, NaiveDate};

use crate::store::DailyLogs;

/// Completed minutes per date. Dates with nothing completed are absent
/// rather than present with zero.
pub fn yearly_stats(logs: &DailyLogs) -> BTreeMap<NaiveDate, u32> {
    let mut stats = BTreeMap::new();
    for (date, day) in logs {
        let minutes = day.completed_minutes();
        if minutes > 0 {
            stats.insert(*date, minutes);
        }
    }
    stats
}

/// Bucket completed minutes into the six activity levels of the yearly
/// heat-map. Boundaries sit at 2h, 5h, 8h and 11h.
pub fn heat_level(minutes: u32) -> u8 {
    if minutes == 0 {
        0
    } else if minutes <= 120 {
        1
    } else if minutes <= 300 {
        2
    } else if minutes <= 480 {
        3
    } else if minutes <= 660 {
        4
    } else {
        5
    }
}

pub const GRID_WEEKS: usize = 53;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayCell {
    pub date: NaiveDate,
    pub minutes: u32,
    pub level: u8,
    pub is_future: bool,
}

/// The 53-week x 7-day activity grid ending at the current week: 52 weeks
/// back from `today`, aligned to the Sunday of that week. Future cells are
/// forced empty regardless of anything stored for those dates.
pub fn contribution_grid(
    stats: &BTreeMap<NaiveDate, u32>,
    today: NaiveDate,
) -> Vec<Vec<DayCell>> {
    let mut start = today - Duration::days(52 * 7);
    start -= Duration::days(i64::from(start.weekday().num_days_from_sunday()));

    let mut weeks = Vec::with_capacity(GRID_WEEKS);
    let mut cursor = start;
    for _ in 0..GRID_WEEKS {
        let mut week = Vec::with_capacity(7);
        for _ in 0..7 {
            let is_future = cursor > today;
            let minutes = if is_future {
                0
            } else {
                stats.get(&cursor).copied().unwrap_or(0)
            };
            week.push(DayCell {
                date: cursor,
                minutes,
                level: heat_level(minutes),
                is_future,
            });
            cursor += Duration::days(1);
        }
        weeks.push(week);
    }
    weeks
}

pub fn total_minutes(grid: &[Vec<DayCell>]) -> u32 {
    grid.iter().flatten().map(|cell| cell.minutes).sum()
}
