use std::collections::HashSet;
use std::error::Error;
use std::fmt;

use chrono::{Days, Local, NaiveDate};
use serde::Serialize;

/// Inclusive range of calendar days used to search merged pull requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateWindow {
    pub since: NaiveDate,
    pub until: NaiveDate,
}

impl DateWindow {
    pub fn new(since: NaiveDate, until: NaiveDate) -> Result<Self, Box<dyn Error>> {
        if since > until {
            return Err(format!("--since ({since}) is after --until ({until})").into());
        }
        Ok(Self { since, until })
    }

    /// Parse `--since`/`--until` values relative to the local date.
    pub fn parse(since: &str, until: Option<&str>) -> Result<Self, Box<dyn Error>> {
        Self::parse_at(since, until, Local::now().date_naive())
    }

    pub fn parse_at(
        since: &str,
        until: Option<&str>,
        today: NaiveDate,
    ) -> Result<Self, Box<dyn Error>> {
        let since = parse_date(since, today)?;
        let until = match until {
            Some(u) => parse_date(u, today)?,
            None => today,
        };
        Self::new(since, until)
    }
}

impl fmt::Display for DateWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.since, self.until)
    }
}

/// Parse either an ISO date (`2024-03-01`) or a span back from `today`
/// like `30d`, `6m`, `1y`.
///
/// Approximations: 1 month = 30 days, 1 year = 365 days.
pub fn parse_date(s: &str, today: NaiveDate) -> Result<NaiveDate, Box<dyn Error>> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty date value".into());
    }

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(date);
    }

    let unit_len = s.chars().last().map_or(0, char::len_utf8);
    let (num_str, unit) = s.split_at(s.len() - unit_len);
    let n: u64 = num_str.parse().map_err(|_| {
        format!("invalid date: {s:?} (expected YYYY-MM-DD or e.g. 30d, 6m, 1y)")
    })?;

    let days = match unit {
        "d" => Some(n),
        "m" => n.checked_mul(30),
        "y" => n.checked_mul(365),
        _ => return Err(format!("unknown unit in date: {s:?} (use d, m, or y)").into()),
    }
    .ok_or("date span too large")?;

    today
        .checked_sub_days(Days::new(days))
        .ok_or_else(|| format!("date span too large: {s:?}").into())
}

/// Most pull request numbers a single `A-B` range may expand to.
pub const MAX_PR_RANGE: u64 = 1000;

/// Parse a pull request list like `12,15,20-24` into numbers, keeping the
/// given order and dropping repeats.
pub fn parse_pr_numbers(s: &str) -> Result<Vec<u64>, Box<dyn Error>> {
    let mut numbers = Vec::new();
    let mut seen = HashSet::new();

    for part in s.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let (start, end) = match part.split_once('-') {
            Some((a, b)) => (parse_pr_number(a)?, parse_pr_number(b)?),
            None => {
                let n = parse_pr_number(part)?;
                (n, n)
            }
        };
        if start > end {
            return Err(format!("invalid pull request range: {part:?}").into());
        }
        if end - start >= MAX_PR_RANGE {
            return Err(format!(
                "pull request range too large: {part:?} (at most {MAX_PR_RANGE} numbers)"
            )
            .into());
        }
        for n in start..=end {
            if seen.insert(n) {
                numbers.push(n);
            }
        }
    }

    if numbers.is_empty() {
        return Err("no pull request numbers given".into());
    }
    Ok(numbers)
}

fn parse_pr_number(s: &str) -> Result<u64, Box<dyn Error>> {
    let s = s.trim().trim_start_matches('#');
    match s.parse::<u64>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(format!("invalid pull request number: {s:?}").into()),
    }
}

#[cfg(test)]
#[path = "util_test.rs"]
mod tests;
