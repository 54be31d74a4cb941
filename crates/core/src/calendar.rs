//! Calendar day-grid math for the month view.
//!
//! The grid is always 42 cells (6 weeks of 7 days) with weeks starting on
//! Sunday. Leading and trailing cells borrow days from the adjacent months
//! so the first of the focused month lands in its weekday column.

use chrono::{Datelike, Duration, NaiveDate, NaiveTime};

use crate::dates::due_day;
use crate::task::Task;
use crate::types::Timestamp;

/// Number of cells in the month grid: six full weeks.
pub const GRID_CELLS: usize = 42;

/// One cell of the month grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayCell {
    pub date: NaiveDate,
    /// False for the leading/trailing days borrowed from adjacent months.
    pub in_focus_month: bool,
}

// ---------------------------------------------------------------------------
// Grid construction
// ---------------------------------------------------------------------------

/// Build the 42-cell grid for a month (`month` is 1-12).
///
/// Returns `None` when the year/month pair is outside chrono's range.
pub fn month_grid(year: i32, month: u32) -> Option<Vec<DayCell>> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let lead = i64::from(first.weekday().num_days_from_sunday());
    let start = first - Duration::days(lead);

    Some(
        (0..GRID_CELLS as i64)
            .map(|offset| {
                let date = start + Duration::days(offset);
                DayCell {
                    date,
                    in_focus_month: date.month() == month && date.year() == year,
                }
            })
            .collect(),
    )
}

/// Half-open UTC bounds of a month: the first instant of day 1 up to the
/// first instant of the following month.
pub fn month_bounds(year: i32, month: u32) -> Option<(Timestamp, Timestamp)> {
    let start = NaiveDate::from_ymd_opt(year, month, 1)?;
    let (next_y, next_m) = next_month(year, month);
    let end = NaiveDate::from_ymd_opt(next_y, next_m, 1)?;
    Some((
        start.and_time(NaiveTime::MIN).and_utc(),
        end.and_time(NaiveTime::MIN).and_utc(),
    ))
}

/// The month after `(year, month)`.
pub fn next_month(year: i32, month: u32) -> (i32, u32) {
    if month >= 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    }
}

/// The month before `(year, month)`.
pub fn prev_month(year: i32, month: u32) -> (i32, u32) {
    if month <= 1 {
        (year - 1, 12)
    } else {
        (year, month - 1)
    }
}

// ---------------------------------------------------------------------------
// Day bucketing
// ---------------------------------------------------------------------------

/// All tasks due on `date` in the configured timezone, input order kept.
///
/// Tasks with unparseable due dates fall in no bucket.
pub fn tasks_on_day<'a>(
    tasks: &'a [Task],
    date: NaiveDate,
    utc_offset_minutes: i32,
) -> Vec<&'a Task> {
    tasks
        .iter()
        .filter(|task| due_day(&task.due_date, utc_offset_minutes) == Some(date))
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
