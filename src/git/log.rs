use crate::error::{Result, YearmapError};
use chrono::{DateTime, FixedOffset};

/// git's default date format, e.g. `Thu Oct 16 09:12:44 2025 +0200`.
pub const GIT_DATE_FORMAT: &str = "%a %b %d %H:%M:%S %Y %z";

/// Parse the output of `git log --pretty=format:%cd`, one timestamp per line.
pub fn parse_log_output(output: &str) -> Result<Vec<DateTime<FixedOffset>>> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(parse_git_date)
        .collect()
}

pub fn parse_git_date(line: &str) -> Result<DateTime<FixedOffset>> {
    DateTime::parse_from_str(line, GIT_DATE_FORMAT)
        .map_err(|e| YearmapError::Parse(format!("Invalid commit date '{line}': {e}")))
}
