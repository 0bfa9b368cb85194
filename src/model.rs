use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

pub const SCHEMA_VERSION: u32 = 1;

/// A commit timestamp truncated to the calendar day in its own offset.
pub type CommitDate = NaiveDate;

/// Distinct days with at least one commit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivitySet {
    days: HashSet<CommitDate>,
}

impl ActivitySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_timestamps<'a, I>(timestamps: I) -> Self
    where
        I: IntoIterator<Item = &'a DateTime<FixedOffset>>,
    {
        timestamps.into_iter().map(|ts| ts.date_naive()).collect()
    }

    pub fn insert(&mut self, day: CommitDate) -> bool {
        self.days.insert(day)
    }

    pub fn contains(&self, day: &CommitDate) -> bool {
        self.days.contains(day)
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Years that contain at least one active day, ascending.
    pub fn years(&self) -> Vec<i32> {
        self.days
            .iter()
            .map(|d| d.year())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn count_in(&self, year: i32) -> usize {
        self.days.iter().filter(|d| d.year() == year).count()
    }
}

impl FromIterator<CommitDate> for ActivitySet {
    fn from_iter<T: IntoIterator<Item = CommitDate>>(iter: T) -> Self {
        Self {
            days: iter.into_iter().collect(),
        }
    }
}

impl Extend<CommitDate> for ActivitySet {
    fn extend<T: IntoIterator<Item = CommitDate>>(&mut self, iter: T) {
        self.days.extend(iter);
    }
}

/// Classification of one (week, weekday) slot of a year grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cell {
    #[default]
    OutsideYear,
    NoActivity,
    HasActivity,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YearReport {
    pub year: i32,
    pub active_days: usize,
    pub image_path: String,
    pub staged: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub version: u32,
    pub generated_at: DateTime<Utc>,
    pub repository_path: String,
    pub output_dir: String,
    pub output_dir_created: bool,
    pub years: Vec<YearReport>,
    /// Years with commits that need 54 week columns and were not rendered.
    pub skipped_years: Vec<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> CommitDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn same_day_timestamps_collapse() {
        let stamps = [
            DateTime::parse_from_rfc3339("2025-03-04T08:00:00+01:00").unwrap(),
            DateTime::parse_from_rfc3339("2025-03-04T23:30:00+01:00").unwrap(),
            DateTime::parse_from_rfc3339("2025-03-05T00:10:00+01:00").unwrap(),
        ];
        let set = ActivitySet::from_timestamps(&stamps);
        assert_eq!(set.len(), 2);
        assert!(set.contains(&day(2025, 3, 4)));
        assert!(set.contains(&day(2025, 3, 5)));
    }

    #[test]
    fn date_uses_the_timestamp_offset() {
        // 23:30 at -05:00 is already the next day in UTC
        let stamp = DateTime::parse_from_rfc3339("2024-12-31T23:30:00-05:00").unwrap();
        let set = ActivitySet::from_timestamps([&stamp]);
        assert!(set.contains(&day(2024, 12, 31)));
    }

    #[test]
    fn years_are_sorted_and_distinct() {
        let set: ActivitySet = [day(2025, 1, 2), day(2023, 5, 1), day(2025, 7, 9)]
            .into_iter()
            .collect();
        assert_eq!(set.years(), vec![2023, 2025]);
        assert_eq!(set.count_in(2025), 2);
        assert_eq!(set.count_in(2023), 1);
        assert_eq!(set.count_in(2024), 0);
    }
}
