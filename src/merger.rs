//! Folding early next-day matches into the requested day.

use chrono::NaiveDate;

use crate::config::MINUTES_PER_DAY;
use crate::error::{AppError, Result};
use crate::types::{format_date, MatchRecord};

/// Minutes past midnight for `"HH:MM"`, also accepting a trailing live-minute
/// marker (`"08:05'"`). An empty minute part counts as zero. Returns `None` when
/// there is no colon or either side is not a number.
pub fn parse_time_minutes(raw: &str) -> Option<u32> {
    let (hours, rest) = raw.split_once(':')?;
    let hour: u32 = hours.trim().parse().ok()?;

    let minutes = rest.split(':').next().unwrap_or("");
    let minutes = minutes.split('\'').next().unwrap_or("").trim();
    let minute: u32 = if minutes.is_empty() { 0 } else { minutes.parse().ok()? };

    hour.checked_mul(60)?.checked_add(minute)
}

/// Calendar successor, rolling over months and years.
pub fn next_day(date: NaiveDate) -> Result<NaiveDate> {
    date.succ_opt()
        .ok_or_else(|| AppError::DateFormat(format!("{} has no following day", format_date(date))))
}

/// Next-day records known to start at or before `cutoff_minutes`.
/// Unparsable times are dropped rather than treated as midnight.
pub fn early_next_day(records: Vec<MatchRecord>, cutoff_minutes: u32) -> Vec<MatchRecord> {
    records
        .into_iter()
        .filter(|r| parse_time_minutes(&r.time).is_some_and(|m| m <= cutoff_minutes))
        .collect()
}

/// Single-sport window: the requested day as scraped, then the early slice of the next.
pub fn merge_window(day: Vec<MatchRecord>, next: Vec<MatchRecord>, cutoff_minutes: u32) -> Vec<MatchRecord> {
    let mut merged = day;
    merged.extend(early_next_day(next, cutoff_minutes));
    merged
}

/// Stable sort by (match date, start time); unknown times go to the end of their day.
pub fn sort_chronologically(records: &mut [MatchRecord]) {
    records.sort_by_key(|r| {
        (
            r.match_date,
            parse_time_minutes(&r.time).unwrap_or(MINUTES_PER_DAY),
        )
    });
}

/// Multi-sport window: every sport's requested day, then the pooled early
/// next-day slice, sorted chronologically.
pub fn merge_combined(
    days: Vec<Vec<MatchRecord>>,
    nexts: Vec<Vec<MatchRecord>>,
    cutoff_minutes: u32,
) -> Vec<MatchRecord> {
    let mut merged: Vec<MatchRecord> = days.into_iter().flatten().collect();
    let pooled_next: Vec<MatchRecord> = nexts.into_iter().flatten().collect();
    merged.extend(early_next_day(pooled_next, cutoff_minutes));
    sort_chronologically(&mut merged);
    merged
}
