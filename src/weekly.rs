// src/weekly.rs

use chrono::{Datelike, NaiveDate, Weekday};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info, warn};

use crate::model::{ClassifiedEntry, WeeklyPenaltyEntry};
use crate::rules::RuleConfig;

/// Groups late and very-late days by ISO week and emits one flat penalty
/// for each week whose unique-day count exceeds the configured limit.
///
/// The week key is `(iso_year, iso_week)` (Monday start, week 1 contains
/// the year's first Thursday), so a week spanning a year boundary resolves
/// to a single key rather than splitting on the raw calendar year. The
/// penalty is dated on the week's Sunday and carries the same amount
/// whether the limit is exceeded by one day or four.
pub fn aggregate(entries: &[ClassifiedEntry], rules: &RuleConfig) -> Vec<WeeklyPenaltyEntry> {
    // Unique days per week: two late entries on one date count once.
    let mut late_days_per_week: BTreeMap<(i32, u32), BTreeSet<NaiveDate>> = BTreeMap::new();
    for entry in entries {
        if entry.tag.counts_as_late() {
            let week = entry.date.iso_week();
            late_days_per_week
                .entry((week.year(), week.week()))
                .or_default()
                .insert(entry.date);
        }
    }

    let mut penalties = Vec::new();
    for ((iso_year, iso_week), days) in late_days_per_week {
        let count = days.len() as u32;
        debug!(
            "Week {}-W{:02}: {} late day(s), limit {}",
            iso_year, iso_week, count, rules.weekly_late_limit
        );
        if count <= rules.weekly_late_limit {
            continue;
        }

        // The key came from iso_week() of a real date, so the Sunday of
        // that week always exists.
        let Some(sunday) = NaiveDate::from_isoywd_opt(iso_year, iso_week, Weekday::Sun) else {
            warn!(
                "Skipping penalty for unconstructible week {}-W{:02}",
                iso_year, iso_week
            );
            continue;
        };

        info!(
            "Weekly late limit exceeded in {}-W{:02} ({} > {}); fining {} on {}",
            iso_year, iso_week, count, rules.weekly_late_limit, rules.weekly_late_fine, sunday
        );
        penalties.push(WeeklyPenaltyEntry {
            date: sunday,
            iso_year,
            iso_week,
            amount: rules.weekly_late_fine,
        });
    }
    penalties
}
