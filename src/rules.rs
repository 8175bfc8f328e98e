// src/rules.rs

use chrono::NaiveTime;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// --- Error Types ---

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Rule thresholds out of order: late ({late}) must precede very-late ({very_late}) which must precede afternoon start ({afternoon_start})")]
    ThresholdOrder {
        late: NaiveTime,
        very_late: NaiveTime,
        afternoon_start: NaiveTime,
    },

    #[error("Negative amount configured for {field}: {value}")]
    NegativeAmount { field: &'static str, value: Decimal },

    #[error("Invalid calendar month: {year}-{month:02}")]
    InvalidMonth { year: i32, month: u32 },

    #[error("Stale navigation: ticket generation {ticket} superseded by generation {current}")]
    StaleNavigation { ticket: u64, current: u64 },

    #[error("No month has been installed yet")]
    NoActiveMonth,
}

// --- Rule Configuration ---

/// Immutable rule constants for the whole engine. Times are local
/// times-of-day; hour quantities and amounts are decimals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleConfig {
    /// Check-in at or after this time counts as late.
    pub late_threshold: NaiveTime,
    /// Check-in at or after this time counts as very late.
    pub very_late_threshold: NaiveTime,
    /// Check-in at or after this time is a morning half-day; a check-out
    /// before it is an afternoon half-day.
    pub afternoon_start: NaiveTime,
    /// Required net worked hours per day (after any lunch subtraction).
    pub required_work_hours: Decimal,
    /// Hours subtracted when the punch interval spans `afternoon_start`.
    pub lunch_break_hours: Decimal,
    pub late_fine: Decimal,
    pub very_late_fine: Decimal,
    /// Late + very-late days allowed per ISO week before the weekly fine.
    pub weekly_late_limit: u32,
    /// Flat fine per offending week, independent of overshoot.
    pub weekly_late_fine: Decimal,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            late_threshold: hm(8, 10),
            very_late_threshold: hm(8, 30),
            afternoon_start: hm(14, 0),
            required_work_hours: dec!(7),
            lunch_break_hours: dec!(1),
            late_fine: dec!(10),
            very_late_fine: dec!(20),
            weekly_late_limit: 3,
            weekly_late_fine: dec!(100),
        }
    }
}

impl RuleConfig {
    /// Checks the threshold ordering invariant and amount signs.
    pub fn validate(&self) -> Result<(), EngineError> {
        if !(self.late_threshold < self.very_late_threshold
            && self.very_late_threshold < self.afternoon_start)
        {
            return Err(EngineError::ThresholdOrder {
                late: self.late_threshold,
                very_late: self.very_late_threshold,
                afternoon_start: self.afternoon_start,
            });
        }
        for (field, value) in [
            ("required_work_hours", self.required_work_hours),
            ("lunch_break_hours", self.lunch_break_hours),
            ("late_fine", self.late_fine),
            ("very_late_fine", self.very_late_fine),
            ("weekly_late_fine", self.weekly_late_fine),
        ] {
            if value < dec!(0) {
                return Err(EngineError::NegativeAmount { field, value });
            }
        }
        Ok(())
    }
}

// NaiveTime::from_hms_opt only fails out of range; all call sites here
// use literal in-range values.
fn hm(hour: u32, min: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, min, 0).unwrap_or(NaiveTime::MIN)
}
