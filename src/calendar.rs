// src/calendar.rs

use chrono::{Datelike, NaiveDate, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::model::{MonthData, StatusTag};
use crate::rules::EngineError;

// --- Calendar Cells ---

/// Background category a day cell resolves to. Blank cells (filler, and
/// future weekdays) carry no category at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DisplayStatus {
    Present,
    Late,
    VeryLate,
    HalfDayMorning,
    HalfDayAfternoon,
    EarlyLeave,
    Absent,
    Weekend,
}

/// One cell of the month grid, ready for the rendering layer. Filler cells
/// borrowed from adjacent months carry a day number but no date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarCell {
    pub day_number: u32,
    pub date: Option<NaiveDate>,
    pub in_displayed_month: bool,
    pub display: Option<DisplayStatus>,
    /// Distinct tags present that day, detection order, for dot indicators.
    pub dot_tags: Vec<StatusTag>,
    pub check_in: String,
    pub check_out: String,
}

impl CalendarCell {
    fn filler(day_number: u32) -> Self {
        Self {
            day_number,
            date: None,
            in_displayed_month: false,
            display: None,
            dot_tags: Vec::new(),
            check_in: String::new(),
            check_out: String::new(),
        }
    }
}

// --- Display Priority ---

/// Descending precedence for resolving one background category when a day
/// carries several tags. An explicit table, not a branch cascade, so the
/// precedence is testable and reorderable on its own.
pub const DISPLAY_PRIORITY: [StatusTag; 7] = [
    StatusTag::HalfDayMorning,
    StatusTag::HalfDayAfternoon,
    StatusTag::Absent,
    StatusTag::VeryLate,
    StatusTag::Late,
    StatusTag::EarlyLeave,
    StatusTag::Present,
];

fn display_for(tag: StatusTag) -> DisplayStatus {
    match tag {
        StatusTag::Present => DisplayStatus::Present,
        StatusTag::Late => DisplayStatus::Late,
        StatusTag::VeryLate => DisplayStatus::VeryLate,
        StatusTag::HalfDayMorning => DisplayStatus::HalfDayMorning,
        StatusTag::HalfDayAfternoon => DisplayStatus::HalfDayAfternoon,
        StatusTag::EarlyLeave => DisplayStatus::EarlyLeave,
        StatusTag::Absent => DisplayStatus::Absent,
    }
}

/// Picks the highest-priority tag present on the day.
pub fn resolve_display(tags: &[StatusTag]) -> Option<DisplayStatus> {
    DISPLAY_PRIORITY
        .iter()
        .find(|p| tags.contains(p))
        .map(|t| display_for(*t))
}

// --- Grid Construction ---

/// Builds the ordered cell list for one month: leading filler from the
/// previous month, one cell per day, trailing filler from the next month.
///
/// Weeks start on Monday. The leading filler count is the Monday-indexed
/// weekday of the 1st; the trailing filler count is six minus the
/// Sunday-indexed weekday of the last day. The two counts are indexed
/// differently on purpose, so the grid is not always a whole number of
/// weeks.
pub fn build_month(
    year: i32,
    month: u32,
    today: NaiveDate,
    data: &MonthData,
) -> Result<Vec<CalendarCell>, EngineError> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or(EngineError::InvalidMonth { year, month })?;
    let last = last_day_of_month(year, month).ok_or(EngineError::InvalidMonth { year, month })?;

    let leading = first.weekday().num_days_from_monday();
    let trailing = 6 - last.weekday().num_days_from_sunday();
    debug!(
        "Building grid for {}-{:02}: {} leading, {} body, {} trailing cells",
        year,
        month,
        leading,
        last.day(),
        trailing
    );

    let mut cells = Vec::with_capacity((leading + last.day() + trailing) as usize);

    // Previous month's trailing day numbers.
    if let Some(prev_last) = first.pred_opt() {
        for day in (prev_last.day() - leading + 1)..=prev_last.day() {
            cells.push(CalendarCell::filler(day));
        }
    }

    for day in 1..=last.day() {
        // Every day 1..=last_day of a valid month is a valid date.
        let Some(date) = NaiveDate::from_ymd_opt(year, month, day) else {
            continue;
        };
        cells.push(day_cell(date, today, data));
    }

    for day in 1..=trailing {
        cells.push(CalendarCell::filler(day));
    }

    Ok(cells)
}

fn day_cell(date: NaiveDate, today: NaiveDate, data: &MonthData) -> CalendarCell {
    let weekend = matches!(date.weekday(), Weekday::Sat | Weekday::Sun);
    let tags = data.tags_for(date);
    let is_today = date == today;

    let mut cell = CalendarCell {
        day_number: date.day(),
        date: Some(date),
        in_displayed_month: true,
        display: None,
        dot_tags: Vec::new(),
        check_in: String::new(),
        check_out: String::new(),
    };

    if date > today {
        // Future days carry no data; weekends still render as weekend.
        if weekend {
            cell.display = Some(DisplayStatus::Weekend);
        }
        return cell;
    }

    if tags.is_empty() {
        if weekend {
            cell.display = Some(DisplayStatus::Weekend);
        } else if is_today && data.punch_for(date).is_some() {
            // An incomplete punch pair today shows placeholders instead of
            // being written off as an absence.
            fill_times(&mut cell, date, today, data);
        } else {
            cell.display = Some(DisplayStatus::Absent);
            cell.dot_tags.push(StatusTag::Absent);
        }
        return cell;
    }

    cell.display = resolve_display(&tags);
    cell.dot_tags = tags;
    fill_times(&mut cell, date, today, data);
    cell
}

fn fill_times(cell: &mut CalendarCell, date: NaiveDate, today: NaiveDate, data: &MonthData) {
    if let Some(punch) = data.punch_for(date) {
        let placeholder = date == today;
        cell.check_in = format_time(punch.check_in, placeholder);
        cell.check_out = format_time(punch.check_out, placeholder);
    }
}

fn format_time(time: Option<NaiveTime>, placeholder: bool) -> String {
    match time {
        Some(t) => t.format("%H:%M").to_string(),
        None if placeholder => "--:--".to_string(),
        None => String::new(),
    }
}

fn last_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)?.pred_opt()
}
