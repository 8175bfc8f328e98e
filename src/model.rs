// src/model.rs

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::warn;

// --- Provider Payload ---

/// One raw attendance record as delivered by the data provider: a calendar
/// date plus an optional check-in and check-out time-of-day. The provider
/// contract is one record per employee per date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPunch {
    pub date: NaiveDate,
    #[serde(rename = "checkInTime", with = "hhmm", default)]
    pub check_in: Option<NaiveTime>,
    #[serde(rename = "checkOutTime", with = "hhmm", default)]
    pub check_out: Option<NaiveTime>,
}

impl RawPunch {
    pub fn new(date: NaiveDate, check_in: Option<NaiveTime>, check_out: Option<NaiveTime>) -> Self {
        Self {
            date,
            check_in,
            check_out,
        }
    }
}

/// Wire format for times-of-day: "HH:MM" (the provider also sends seconds
/// on some endpoints), with null or the empty string meaning absent.
pub(crate) mod hhmm {
    use chrono::NaiveTime;
    use serde::{de::Error as _, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<NaiveTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(t) => serializer.serialize_str(&t.format("%H:%M").to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw.as_deref() {
            None | Some("") => Ok(None),
            Some(s) => NaiveTime::parse_from_str(s, "%H:%M")
                .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
                .map(Some)
                .map_err(|e| D::Error::custom(format!("invalid time-of-day {:?}: {}", s, e))),
        }
    }
}

// --- Status Tags ---

/// Semantic classification applied to a day. A day carries zero, one, or
/// several tags; `(date, tag)` pairs are unique.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatusTag {
    Present,
    Late,
    VeryLate,
    HalfDayMorning,
    HalfDayAfternoon,
    EarlyLeave,
    Absent,
}

impl StatusTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusTag::Present => "PRESENT",
            StatusTag::Late => "LATE",
            StatusTag::VeryLate => "VERY_LATE",
            StatusTag::HalfDayMorning => "HALF_DAY_MORNING",
            StatusTag::HalfDayAfternoon => "HALF_DAY_AFTERNOON",
            StatusTag::EarlyLeave => "EARLY_LEAVE",
            StatusTag::Absent => "ABSENT",
        }
    }

    /// Tags that count toward the weekly late total.
    pub fn counts_as_late(&self) -> bool {
        matches!(self, StatusTag::Late | StatusTag::VeryLate)
    }
}

// --- Classified Entries ---

/// One (date, tag) pair produced by classification, carrying the punch
/// times it was derived from. The whole collection for a month is replaced
/// wholesale on every navigation; entries are never mutated in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifiedEntry {
    pub date: NaiveDate,
    pub tag: StatusTag,
    #[serde(rename = "checkInTime", with = "hhmm", default)]
    pub check_in: Option<NaiveTime>,
    #[serde(rename = "checkOutTime", with = "hhmm", default)]
    pub check_out: Option<NaiveTime>,
}

/// Synthetic penalty record for a week whose late/very-late day count
/// exceeded the configured limit. Dated on the week's Sunday; the amount
/// is flat regardless of how far the limit was exceeded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyPenaltyEntry {
    pub date: NaiveDate,
    pub iso_year: i32,
    pub iso_week: u32,
    pub amount: Decimal,
}

// --- Month Data ---

/// The per-month working set consumed by the grid builder and the summary
/// aggregator: raw punches and classified entries, both indexed by date.
/// Punches are kept alongside entries because a punched day can classify
/// to zero tags (e.g. an on-time check-in with no check-out) and the
/// calendar still needs its times.
#[derive(Debug, Clone, Default)]
pub struct MonthData {
    punches: HashMap<NaiveDate, RawPunch>,
    entries: Vec<ClassifiedEntry>,
    by_date: HashMap<NaiveDate, Vec<ClassifiedEntry>>,
}

impl MonthData {
    /// Indexes punches and entries by date. A later punch for an already
    /// seen date replaces the earlier one; the provider contract is one
    /// record per date, so this is logged.
    pub fn from_parts(punches: Vec<RawPunch>, entries: Vec<ClassifiedEntry>) -> Self {
        let mut punch_map: HashMap<NaiveDate, RawPunch> = HashMap::new();
        for punch in punches {
            if let Some(previous) = punch_map.insert(punch.date, punch) {
                warn!(
                    "Duplicate punch record for {}; keeping the later record",
                    previous.date
                );
            }
        }

        let mut by_date: HashMap<NaiveDate, Vec<ClassifiedEntry>> = HashMap::new();
        for entry in &entries {
            by_date.entry(entry.date).or_default().push(entry.clone());
        }

        Self {
            punches: punch_map,
            entries,
            by_date,
        }
    }

    pub fn punch_for(&self, date: NaiveDate) -> Option<&RawPunch> {
        self.punches.get(&date)
    }

    /// All classified entries for one date, in detection order. Empty for
    /// dates with no entries (including punched days that earned no tag).
    pub fn entries_for(&self, date: NaiveDate) -> &[ClassifiedEntry] {
        self.by_date.get(&date).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Distinct tags for one date, deduplicated, in detection order.
    pub fn tags_for(&self, date: NaiveDate) -> Vec<StatusTag> {
        let mut tags = Vec::new();
        for entry in self.entries_for(date) {
            if !tags.contains(&entry.tag) {
                tags.push(entry.tag);
            }
        }
        tags
    }

    pub fn entries(&self) -> &[ClassifiedEntry] {
        &self.entries
    }

    /// Dates carrying at least one recorded time. A record with both
    /// times absent holds no punch and does not count.
    pub fn recorded_dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.punches
            .values()
            .filter(|p| p.check_in.is_some() || p.check_out.is_some())
            .map(|p| p.date)
    }
}
