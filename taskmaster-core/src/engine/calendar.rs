//! Due-date bucketing for the calendar views.
//!
//! Weeks are Sunday-start throughout: a week runs from the Sunday on or
//! before a date through the following Saturday.

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::models::Task;

/// One day cell in a month grid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarCell {
    pub date: NaiveDate,
    /// False for leading/trailing filler days from adjacent months.
    pub in_month: bool,
    pub is_today: bool,
    /// Full unsorted list of tasks due on this day. Truncation ("+N more")
    /// is a presentation decision, not made here.
    pub tasks: Vec<Task>,
}

pub fn start_of_week(date: NaiveDate) -> NaiveDate {
    let back = date.weekday().num_days_from_sunday() as u64;
    date.checked_sub_days(Days::new(back)).unwrap_or(date)
}

pub fn end_of_week(date: NaiveDate) -> NaiveDate {
    let forward = 6 - date.weekday().num_days_from_sunday() as u64;
    date.checked_add_days(Days::new(forward)).unwrap_or(date)
}

/// Full grid for one month: from the Sunday on/before the 1st through the
/// Saturday on/after the last day, so the result is always whole 7-day
/// rows. An invalid year/month yields an empty grid.
pub fn month_grid(year: i32, month: u32, tasks: &[Task], today: NaiveDate) -> Vec<CalendarCell> {
    let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
        return Vec::new();
    };
    let Some(last) = last_day_of_month(year, month) else {
        return Vec::new();
    };

    let grid_start = start_of_week(first);
    let grid_end = end_of_week(last);

    grid_start
        .iter_days()
        .take_while(|d| *d <= grid_end)
        .map(|date| CalendarCell {
            date,
            in_month: date.month() == month && date.year() == year,
            is_today: date == today,
            tasks: tasks
                .iter()
                .filter(|t| t.due_date == Some(date))
                .cloned()
                .collect(),
        })
        .collect()
}

/// Tasks due within the week containing `anchor`, inclusive on both ends.
/// Undated tasks are excluded.
pub fn week_slice(anchor: NaiveDate, tasks: &[Task]) -> Vec<Task> {
    let start = start_of_week(anchor);
    let end = end_of_week(anchor);
    tasks
        .iter()
        .filter(|t| t.due_date.is_some_and(|due| due >= start && due <= end))
        .cloned()
        .collect()
}

fn last_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    let first_of_next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    first_of_next.and_then(|d| d.pred_opt())
}
