// src/summary.rs

use chrono::{Datelike, NaiveDate, Weekday};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

use crate::model::{MonthData, StatusTag, WeeklyPenaltyEntry};
use crate::rules::{EngineError, RuleConfig};

/// Aggregated month view: unique-day counts per status category, recorded
/// and working-day tallies, and the monetary penalty total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub year: i32,
    pub month: u32,
    pub present_days: usize,
    pub late_days: usize,
    pub very_late_days: usize,
    pub half_day_morning_days: usize,
    pub half_day_afternoon_days: usize,
    pub early_leave_days: usize,
    /// Explicitly tagged absences plus inferred ones for unrecorded
    /// working weekdays up to `today`.
    pub absent_days: usize,
    /// Distinct dates in the month with any recorded punch.
    pub recorded_days: usize,
    /// Monday-Friday dates of the month, up to and including `today`.
    pub working_weekdays_to_date: usize,
    pub late_fine_total: Decimal,
    pub weekly_fine_total: Decimal,
    pub total_fine: Decimal,
}

/// Computes the month summary. Day counts are backed by a `(date, tag)`
/// set, so a day is counted once per category no matter how many entries
/// carry the same tag, while one day can appear in several categories.
pub fn summarize(
    year: i32,
    month: u32,
    today: NaiveDate,
    data: &MonthData,
    penalties: &[WeeklyPenaltyEntry],
    rules: &RuleConfig,
) -> Result<Summary, EngineError> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or(EngineError::InvalidMonth { year, month })?;

    let mut tagged: HashSet<(NaiveDate, StatusTag)> = HashSet::new();
    for entry in data.entries() {
        if entry.date.year() == year && entry.date.month() == month {
            tagged.insert((entry.date, entry.tag));
        }
    }

    // Absence inference: every working weekday up to today with no
    // classified entry at all joins the absent set before counting.
    let mut working_weekdays_to_date = 0usize;
    for date in first.iter_days().take_while(|d| d.month() == month) {
        if date > today || is_weekend(date) {
            continue;
        }
        working_weekdays_to_date += 1;
        if data.entries_for(date).is_empty() {
            tagged.insert((date, StatusTag::Absent));
        }
    }

    let count = |tag: StatusTag| tagged.iter().filter(|(_, t)| *t == tag).count();
    let late_days = count(StatusTag::Late);
    let very_late_days = count(StatusTag::VeryLate);

    let recorded_days = data
        .recorded_dates()
        .filter(|d| d.year() == year && d.month() == month)
        .count();

    let late_fine_total = Decimal::from(late_days as u64) * rules.late_fine
        + Decimal::from(very_late_days as u64) * rules.very_late_fine;
    let weekly_fine_total: Decimal = penalties.iter().map(|p| p.amount).sum();
    let total_fine = late_fine_total + weekly_fine_total;

    debug!(
        "Summary {}-{:02}: {} recorded day(s), {} working weekday(s) to date, total fine {}",
        year, month, recorded_days, working_weekdays_to_date, total_fine
    );

    Ok(Summary {
        year,
        month,
        present_days: count(StatusTag::Present),
        late_days,
        very_late_days,
        half_day_morning_days: count(StatusTag::HalfDayMorning),
        half_day_afternoon_days: count(StatusTag::HalfDayAfternoon),
        early_leave_days: count(StatusTag::EarlyLeave),
        absent_days: count(StatusTag::Absent),
        recorded_days,
        working_weekdays_to_date,
        late_fine_total,
        weekly_fine_total,
        total_fine,
    })
}

fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}
