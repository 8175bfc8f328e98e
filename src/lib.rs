// src/lib.rs

//! Attendance classification and aggregation engine.
//!
//! Given one employee's raw per-day check-in/check-out punches for a
//! calendar month, the engine derives semantic status tags per day,
//! detects weekly late-limit violations and their fines, builds the
//! month's calendar grid, and aggregates the period summary. The engine
//! is pure and synchronous: fetching punches, rendering, and everything
//! else around it belongs to the calling application.

mod calendar;
mod classify;
mod engine;
mod model;
mod rules;
mod summary;
mod weekly;

mod engine_tests;

pub use calendar::{build_month, resolve_display, CalendarCell, DisplayStatus, DISPLAY_PRIORITY};
pub use classify::{classify, classify_punches};
pub use engine::{AttendanceEngine, MonthView, NavigationTicket};
pub use model::{ClassifiedEntry, MonthData, RawPunch, StatusTag, WeeklyPenaltyEntry};
pub use rules::{EngineError, RuleConfig};
pub use summary::{summarize, Summary};
pub use weekly::aggregate as aggregate_weekly_penalties;
