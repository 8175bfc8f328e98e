// src/engine.rs

use chrono::NaiveDate;
use tracing::info;

use crate::calendar::{self, CalendarCell};
use crate::classify::classify_punches;
use crate::model::{ClassifiedEntry, MonthData, RawPunch, WeeklyPenaltyEntry};
use crate::rules::{EngineError, RuleConfig};
use crate::summary::{self, Summary};
use crate::weekly;

/// Handle for one navigation. Issued by `begin_navigation`, consumed by
/// `install`; a ticket whose generation has been superseded can no longer
/// install, so a slow fetch never overwrites a newer month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigationTicket {
    generation: u64,
    year: i32,
    month: u32,
}

impl NavigationTicket {
    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }
}

/// The classified working set for the currently displayed month. Replaced
/// wholesale on every install; never mutated in place.
#[derive(Debug, Clone)]
pub struct MonthView {
    year: i32,
    month: u32,
    data: MonthData,
    penalties: Vec<WeeklyPenaltyEntry>,
}

impl MonthView {
    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// Day-selection feed: the classified entries for one date, for the
    /// detail view.
    pub fn entries_for(&self, date: NaiveDate) -> &[ClassifiedEntry] {
        self.data.entries_for(date)
    }

    pub fn entries(&self) -> &[ClassifiedEntry] {
        self.data.entries()
    }

    pub fn penalties(&self) -> &[WeeklyPenaltyEntry] {
        &self.penalties
    }

    pub fn data(&self) -> &MonthData {
        &self.data
    }
}

/// The engine's single piece of mutable state: the rule set, the latest
/// navigation generation, and the current month view. Owned by the caller
/// and passed explicitly; there are no module-level globals.
#[derive(Debug)]
pub struct AttendanceEngine {
    rules: RuleConfig,
    generation: u64,
    current: Option<MonthView>,
}

impl AttendanceEngine {
    pub fn new(rules: RuleConfig) -> Result<Self, EngineError> {
        rules.validate()?;
        Ok(Self {
            rules,
            generation: 0,
            current: None,
        })
    }

    pub fn rules(&self) -> &RuleConfig {
        &self.rules
    }

    /// Starts a navigation to `(year, month)`. Any ticket issued earlier
    /// becomes stale immediately; the caller fetches the month's punches
    /// and hands them to `install` together with this ticket. Re-issuing
    /// for the current month is how a forced refresh works.
    pub fn begin_navigation(
        &mut self,
        year: i32,
        month: u32,
    ) -> Result<NavigationTicket, EngineError> {
        if NaiveDate::from_ymd_opt(year, month, 1).is_none() {
            return Err(EngineError::InvalidMonth { year, month });
        }
        self.generation += 1;
        info!(
            "Navigation {} started for {}-{:02}",
            self.generation, year, month
        );
        Ok(NavigationTicket {
            generation: self.generation,
            year,
            month,
        })
    }

    /// Classifies the fetched punches and replaces the current view
    /// wholesale. Rejects tickets from superseded navigations.
    pub fn install(
        &mut self,
        ticket: NavigationTicket,
        punches: Vec<RawPunch>,
    ) -> Result<&MonthView, EngineError> {
        if ticket.generation != self.generation {
            return Err(EngineError::StaleNavigation {
                ticket: ticket.generation,
                current: self.generation,
            });
        }

        let entries = classify_punches(&punches, &self.rules);
        let penalties = weekly::aggregate(&entries, &self.rules);
        info!(
            "Installing {}-{:02}: {} punch records, {} classified entries, {} weekly penalties",
            ticket.year,
            ticket.month,
            punches.len(),
            entries.len(),
            penalties.len()
        );

        Ok(self.current.insert(MonthView {
            year: ticket.year,
            month: ticket.month,
            data: MonthData::from_parts(punches, entries),
            penalties,
        }))
    }

    pub fn current(&self) -> Option<&MonthView> {
        self.current.as_ref()
    }

    /// The cell sequence for the active month, for the rendering layer.
    pub fn cells(&self, today: NaiveDate) -> Result<Vec<CalendarCell>, EngineError> {
        let view = self.current.as_ref().ok_or(EngineError::NoActiveMonth)?;
        calendar::build_month(view.year, view.month, today, &view.data)
    }

    /// The aggregated summary for the active month.
    pub fn summary(&self, today: NaiveDate) -> Result<Summary, EngineError> {
        let view = self.current.as_ref().ok_or(EngineError::NoActiveMonth)?;
        summary::summarize(
            view.year,
            view.month,
            today,
            &view.data,
            &view.penalties,
            &self.rules,
        )
    }
}
