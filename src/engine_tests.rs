// src/engine_tests.rs

#[cfg(test)]
mod tests {
    use crate::{
        AttendanceEngine, DisplayStatus, EngineError, RawPunch, RuleConfig, StatusTag,
    };
    use chrono::{NaiveDate, NaiveTime};
    use rust_decimal_macros::dec;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("valid test date")
    }

    fn t(s: &str) -> NaiveTime {
        NaiveTime::parse_from_str(s, "%H:%M").expect("valid test time")
    }

    fn init_logging() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .try_init();
    }

    fn engine() -> AttendanceEngine {
        init_logging();
        AttendanceEngine::new(RuleConfig::default()).expect("default rules are valid")
    }

    /// A realistic June 2025 feed: mixed lateness, a half day, an absence,
    /// and an open punch pair on the 10th.
    fn june_punches() -> Vec<RawPunch> {
        vec![
            RawPunch::new(d("2025-06-02"), Some(t("08:05")), Some(t("17:30"))),
            RawPunch::new(d("2025-06-03"), Some(t("08:15")), Some(t("17:30"))),
            RawPunch::new(d("2025-06-04"), Some(t("08:35")), Some(t("17:30"))),
            RawPunch::new(d("2025-06-05"), Some(t("08:20")), Some(t("17:30"))),
            RawPunch::new(d("2025-06-06"), Some(t("14:05")), Some(t("17:30"))),
            RawPunch::new(d("2025-06-09"), None, None),
            RawPunch::new(d("2025-06-10"), Some(t("08:00")), None),
        ]
    }

    #[test]
    fn install_classifies_and_exposes_the_month() {
        let mut engine = engine();
        let ticket = engine.begin_navigation(2025, 6).expect("month is valid");
        let view = engine.install(ticket, june_punches()).expect("installs");

        assert_eq!((view.year(), view.month()), (2025, 6));
        assert_eq!(view.entries_for(d("2025-06-03"))[0].tag, StatusTag::Late);
        assert_eq!(
            view.entries_for(d("2025-06-06"))[0].tag,
            StatusTag::HalfDayMorning
        );
        assert_eq!(view.entries_for(d("2025-06-09"))[0].tag, StatusTag::Absent);
        // The open pair on the 10th earned no tags.
        assert!(view.entries_for(d("2025-06-10")).is_empty());
    }

    #[test]
    fn weekly_penalty_appears_for_the_offending_week() {
        let mut engine = engine();
        let ticket = engine.begin_navigation(2025, 6).expect("month is valid");
        // Three lates (03, 04, 05) are within the limit; add a fourth.
        let mut punches = june_punches();
        punches.push(RawPunch::new(
            d("2025-06-11"),
            Some(t("08:12")),
            Some(t("17:30")),
        ));
        punches.push(RawPunch::new(
            d("2025-06-12"),
            Some(t("08:12")),
            Some(t("17:30")),
        ));
        let view = engine.install(ticket, punches).expect("installs");

        // Week of June 2: lates on 03/04/05 only. Week of June 9: two
        // lates. Neither week exceeds the limit of three.
        assert!(view.penalties().is_empty());

        // Now a week with four late days.
        let ticket = engine.begin_navigation(2025, 6).expect("month is valid");
        let late_week: Vec<_> = ["2025-06-16", "2025-06-17", "2025-06-18", "2025-06-19"]
            .iter()
            .map(|s| RawPunch::new(d(s), Some(t("08:15")), Some(t("17:30"))))
            .collect();
        let view = engine.install(ticket, late_week).expect("installs");
        assert_eq!(view.penalties().len(), 1);
        assert_eq!(view.penalties()[0].date, d("2025-06-22"));
        assert_eq!(view.penalties()[0].amount, dec!(100));
    }

    #[test]
    fn stale_ticket_cannot_install() {
        let mut engine = engine();
        let june = engine.begin_navigation(2025, 6).expect("month is valid");
        let july = engine.begin_navigation(2025, 7).expect("month is valid");

        // The June fetch finishes late; its ticket was superseded.
        let result = engine.install(june, june_punches());
        assert_eq!(
            result.err(),
            Some(EngineError::StaleNavigation {
                ticket: 1,
                current: 2,
            })
        );

        // The July install still works and wins.
        let view = engine.install(july, Vec::new()).expect("installs");
        assert_eq!((view.year(), view.month()), (2025, 7));
    }

    #[test]
    fn renavigation_replaces_the_view_wholesale() {
        let mut engine = engine();
        let ticket = engine.begin_navigation(2025, 6).expect("month is valid");
        engine.install(ticket, june_punches()).expect("installs");
        assert!(!engine
            .current()
            .expect("view installed")
            .entries()
            .is_empty());

        let ticket = engine.begin_navigation(2025, 7).expect("month is valid");
        engine.install(ticket, Vec::new()).expect("installs");
        let view = engine.current().expect("view installed");
        assert_eq!(view.month(), 7);
        assert!(view.entries().is_empty());
        assert!(view.entries_for(d("2025-06-03")).is_empty());
    }

    #[test]
    fn refresh_reissues_a_ticket_for_the_same_month() {
        let mut engine = engine();
        let ticket = engine.begin_navigation(2025, 6).expect("month is valid");
        engine.install(ticket, Vec::new()).expect("installs");

        let refresh = engine.begin_navigation(2025, 6).expect("month is valid");
        let view = engine.install(refresh, june_punches()).expect("installs");
        assert_eq!(view.entries_for(d("2025-06-03"))[0].tag, StatusTag::Late);
    }

    #[test]
    fn cells_and_summary_require_an_installed_month() {
        let engine = engine();
        assert_eq!(engine.cells(d("2025-06-10")).err(), Some(EngineError::NoActiveMonth));
        assert_eq!(
            engine.summary(d("2025-06-10")).err(),
            Some(EngineError::NoActiveMonth)
        );
    }

    #[test]
    fn grid_and_summary_agree_with_the_feed() {
        let mut engine = engine();
        let ticket = engine.begin_navigation(2025, 6).expect("month is valid");
        engine.install(ticket, june_punches()).expect("installs");
        let today = d("2025-06-10");

        let cells = engine.cells(today).expect("grid builds");
        let tenth = cells
            .iter()
            .find(|c| c.date == Some(today))
            .expect("cell for today");
        assert_eq!(tenth.check_in, "08:00");
        assert_eq!(tenth.check_out, "--:--");
        assert_eq!(tenth.display, None);

        let ninth = cells
            .iter()
            .find(|c| c.date == Some(d("2025-06-09")))
            .expect("cell for the 9th");
        assert_eq!(ninth.display, Some(DisplayStatus::Absent));

        let summary = engine.summary(today).expect("summary builds");
        assert_eq!(summary.present_days, 1);
        assert_eq!(summary.late_days, 2); // 03 and 05
        assert_eq!(summary.very_late_days, 1); // 04
        assert_eq!(summary.half_day_morning_days, 1); // 06
        // Explicit absence on the 9th plus the tagless open pair on the
        // 10th, inferred.
        assert_eq!(summary.absent_days, 2);
        // The 9th's record carries no times, so it is not a recorded day.
        assert_eq!(summary.recorded_days, 6);
        assert_eq!(summary.working_weekdays_to_date, 7);
        assert_eq!(summary.late_fine_total, dec!(40)); // 2x10 + 1x20
        assert_eq!(summary.weekly_fine_total, dec!(0));
        assert_eq!(summary.total_fine, dec!(40));
    }

    #[test]
    fn invalid_month_navigation_is_rejected() {
        let mut engine = engine();
        assert_eq!(
            engine.begin_navigation(2025, 13).err(),
            Some(EngineError::InvalidMonth {
                year: 2025,
                month: 13,
            })
        );
        assert_eq!(
            engine.begin_navigation(2025, 0).err(),
            Some(EngineError::InvalidMonth {
                year: 2025,
                month: 0,
            })
        );
    }

    #[test]
    fn engine_rejects_invalid_rule_config() {
        init_logging();
        let bad = RuleConfig {
            late_threshold: t("15:00"),
            ..RuleConfig::default()
        };
        assert!(matches!(
            AttendanceEngine::new(bad),
            Err(EngineError::ThresholdOrder { .. })
        ));
    }

    #[test]
    fn provider_payload_round_trips_through_the_engine() {
        let mut engine = engine();
        let json = r#"[
            {"date": "2025-06-02", "checkInTime": "08:15", "checkOutTime": "17:30"},
            {"date": "2025-06-03", "checkInTime": null, "checkOutTime": null}
        ]"#;
        let punches: Vec<RawPunch> = serde_json::from_str(json).expect("payload parses");
        let ticket = engine.begin_navigation(2025, 6).expect("month is valid");
        let view = engine.install(ticket, punches).expect("installs");

        assert_eq!(view.entries_for(d("2025-06-02"))[0].tag, StatusTag::Late);
        assert_eq!(view.entries_for(d("2025-06-03"))[0].tag, StatusTag::Absent);
    }
}
