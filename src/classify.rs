// src/classify.rs

use chrono::NaiveTime;
use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::model::{ClassifiedEntry, RawPunch, StatusTag};
use crate::rules::RuleConfig;

/// Derives the ordered status tags for one day's punches. Pure: the same
/// punch always yields the same tag sequence, in detection order.
///
/// A day with no recorded times at all is `[Absent]`. A check-out without
/// a check-in is inconsistent raw data and also classifies as `[Absent]`
/// only; the lone check-out is not credited.
pub fn classify(punch: &RawPunch, rules: &RuleConfig) -> Vec<StatusTag> {
    let mut tags = Vec::new();

    let check_in = match (punch.check_in, punch.check_out) {
        (None, None) => {
            debug!("No punches on {}: absent", punch.date);
            return vec![StatusTag::Absent];
        }
        (None, Some(out)) => {
            warn!(
                "Check-out {} without check-in on {}: treating as absent",
                out.format("%H:%M"),
                punch.date
            );
            return vec![StatusTag::Absent];
        }
        (Some(check_in), _) => check_in,
    };

    // Lateness band for the check-in. Arriving in the afternoon is a
    // morning half-day and suppresses the lateness tags entirely.
    if check_in >= rules.afternoon_start {
        tags.push(StatusTag::HalfDayMorning);
    } else if check_in >= rules.very_late_threshold {
        tags.push(StatusTag::VeryLate);
    } else if check_in >= rules.late_threshold {
        tags.push(StatusTag::Late);
    }

    if let Some(check_out) = punch.check_out {
        if check_out < rules.afternoon_start {
            tags.push(StatusTag::HalfDayAfternoon);
        }

        let worked = worked_hours(check_in, check_out, rules);
        let half_day = tags
            .iter()
            .any(|t| matches!(t, StatusTag::HalfDayMorning | StatusTag::HalfDayAfternoon));
        if worked < rules.required_work_hours && !half_day {
            tags.push(StatusTag::EarlyLeave);
        }

        if tags.is_empty() {
            tags.push(StatusTag::Present);
        }
    }

    debug!("Classified {} as {:?}", punch.date, tags);
    tags
}

/// Net worked hours for a punch pair. The lunch break is subtracted only
/// when the interval spans `afternoon_start` on both sides.
fn worked_hours(check_in: NaiveTime, check_out: NaiveTime, rules: &RuleConfig) -> Decimal {
    let minutes = (check_out - check_in).num_minutes();
    let mut hours = Decimal::from(minutes) / Decimal::from(60);
    if check_in < rules.afternoon_start && check_out > rules.afternoon_start {
        hours -= rules.lunch_break_hours;
    }
    hours
}

/// Classifies a batch of punches into the (date, tag) entry collection the
/// aggregators consume. Order: input order, then detection order per day.
pub fn classify_punches(punches: &[RawPunch], rules: &RuleConfig) -> Vec<ClassifiedEntry> {
    let mut entries = Vec::new();
    for punch in punches {
        for tag in classify(punch, rules) {
            entries.push(ClassifiedEntry {
                date: punch.date,
                tag,
                check_in: punch.check_in,
                check_out: punch.check_out,
            });
        }
    }
    entries
}
