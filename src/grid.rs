//! Calendar-to-grid mapping for one year.
//!
//! Weeks are columns and weekdays are rows, Monday first. Jan 1 sits in
//! column 0 at the row of its weekday, so the first column is usually only
//! partly filled and the cells before Jan 1 stay [`Cell::OutsideYear`].

use crate::error::{Result, YearmapError};
use crate::model::{ActivitySet, Cell, CommitDate};
use chrono::{Datelike, Duration, NaiveDate};

/// Rows in the grid, Monday = 0 .. Sunday = 6.
pub const DAYS_PER_WEEK: usize = 7;

/// Columns in the grid.
///
/// A leap year that starts on a Sunday needs a 54th column for Dec 31
/// (1984, 2012, 2040, 2068, 2096, ...). Those years are rejected with
/// [`YearmapError::UnsupportedYear`].
pub const WEEKS: usize = 53;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CellCounts {
    pub outside_year: usize,
    pub no_activity: usize,
    pub has_activity: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearHeatmap {
    year: i32,
    cells: [[Cell; WEEKS]; DAYS_PER_WEEK],
    active_days: usize,
}

impl YearHeatmap {
    /// Classify every day of `year`.
    ///
    /// `today`, when given, counts as active even if it is missing from
    /// `activity`; it only shows up if it falls inside `year`.
    pub fn build(year: i32, activity: &ActivitySet, today: Option<CommitDate>) -> Result<Self> {
        let (start, end) = year_bounds(year)?;
        if needs_extra_week(year) {
            return Err(YearmapError::UnsupportedYear { year });
        }

        let is_active = |day: &CommitDate| activity.contains(day) || today.as_ref() == Some(day);

        let mut cells = [[Cell::OutsideYear; WEEKS]; DAYS_PER_WEEK];
        let mut active_days = 0;

        for day in start.iter_days().take_while(|d| *d <= end) {
            let (week, weekday) = grid_position(start, day);
            cells[weekday][week] = if is_active(&day) {
                active_days += 1;
                Cell::HasActivity
            } else {
                Cell::NoActivity
            };
        }

        Ok(Self {
            year,
            cells,
            active_days,
        })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// Distinct active days inside the year.
    pub fn active_days(&self) -> usize {
        self.active_days
    }

    pub fn cell(&self, week: usize, weekday: usize) -> Cell {
        self.cells[weekday][week]
    }

    /// Rows of the grid, Monday first; each row holds one cell per week.
    pub fn rows(&self) -> &[[Cell; WEEKS]; DAYS_PER_WEEK] {
        &self.cells
    }

    /// `(week, weekday)` of `day`, or `None` if it is outside the year.
    pub fn position_of(&self, day: CommitDate) -> Option<(usize, usize)> {
        if day.year() != self.year {
            return None;
        }
        let start = NaiveDate::from_ymd_opt(self.year, 1, 1)?;
        Some(grid_position(start, day))
    }

    pub fn counts(&self) -> CellCounts {
        let mut counts = CellCounts::default();
        for cell in self.cells.iter().flatten() {
            match cell {
                Cell::OutsideYear => counts.outside_year += 1,
                Cell::NoActivity => counts.no_activity += 1,
                Cell::HasActivity => counts.has_activity += 1,
            }
        }
        counts
    }

    pub fn title(&self) -> String {
        format!("{} committed days in {}", self.active_days, self.year)
    }
}

fn grid_position(start: NaiveDate, day: NaiveDate) -> (usize, usize) {
    let offset = start.weekday().num_days_from_monday() as i64;
    let elapsed = (day - start).num_days();
    let week = ((elapsed + offset) / 7) as usize;
    let weekday = day.weekday().num_days_from_monday() as usize;
    (week, weekday)
}

fn year_bounds(year: i32) -> Result<(NaiveDate, NaiveDate)> {
    let start = NaiveDate::from_ymd_opt(year, 1, 1);
    let end = NaiveDate::from_ymd_opt(year, 12, 31);
    start
        .zip(end)
        .ok_or_else(|| YearmapError::Parse(format!("Year out of range: {year}")))
}

pub fn is_leap_year(year: i32) -> bool {
    NaiveDate::from_ymd_opt(year, 2, 29).is_some()
}

pub fn days_in_year(year: i32) -> usize {
    if is_leap_year(year) {
        366
    } else {
        365
    }
}

/// True when Dec 31 of `year` would land in a 54th column.
pub fn needs_extra_week(year: i32) -> bool {
    match NaiveDate::from_ymd_opt(year, 1, 1) {
        Some(start) => {
            let offset = start.weekday().num_days_from_monday() as usize;
            (days_in_year(year) - 1 + offset) / 7 >= WEEKS
        }
        None => false,
    }
}

/// The Sunday that closes column `week` of `year`'s grid.
pub fn week_ending_sunday(year: i32, week: usize) -> Option<NaiveDate> {
    let start = NaiveDate::from_ymd_opt(year, 1, 1)?;
    let monday = start - Duration::days(start.weekday().num_days_from_monday() as i64);
    monday.checked_add_signed(Duration::days(7 * week as i64 + 6))
}
