use chrono::NaiveDate;
use std::fs;
use tempfile::NamedTempFile;
use timesheet_scheduler::{
    DeficitPolicy, Locale, PersistenceError, ReportConfig, ScheduleError,
};

#[test]
fn defaults_are_valid() {
    let config = ReportConfig::default();
    config.validate().unwrap();
    assert_eq!(config.country, "CO");
    assert_eq!(config.target_daily_hours, 8.0);
    assert_eq!(config.max_tasks_per_day, 5);
    assert_eq!(config.locale, Locale::Es);
    assert_eq!(config.deficit_policy, DeficitPolicy::Rescale);
    assert_eq!(config.filler_catalog(), Locale::Es.default_catalog());
}

#[test]
fn partial_toml_keeps_remaining_defaults() {
    let config = ReportConfig::from_toml_str(
        r#"
country = "US"
target_daily_hours = 7.5
locale = "en"
deficit_policy = "fill"
"#,
    )
    .unwrap();

    assert_eq!(config.country, "US");
    assert_eq!(config.target_daily_hours, 7.5);
    assert_eq!(config.locale, Locale::En);
    assert_eq!(config.deficit_policy, DeficitPolicy::Fill);
    assert_eq!(config.year, 2026);
    assert_eq!(config.chunk_cap, 2.0);
    assert_eq!(config.default_project, "Internal");
}

#[test]
fn catalog_override_and_extra_holidays_are_read() {
    let config = ReportConfig::from_toml_str(
        r#"
[filler_catalogs]
es = ["Soporte", "Pendientes"]

[[extra_holidays]]
date = "2026-12-24"

[[extra_holidays]]
date = "2026-12-31"
name = "Cierre de año"
"#,
    )
    .unwrap();

    assert_eq!(config.filler_catalog().entries(), ["Soporte", "Pendientes"]);
    assert_eq!(config.extra_holidays.len(), 2);
    assert_eq!(
        config.extra_holidays[0].date,
        NaiveDate::from_ymd_opt(2026, 12, 24).unwrap()
    );
    assert_eq!(config.extra_holidays[0].name, "Company holiday");
    assert_eq!(config.extra_holidays[1].name, "Cierre de año");
}

#[test]
fn invalid_values_surface_as_configuration_errors() {
    for text in [
        "target_daily_hours = 0.0",
        "target_daily_hours = -8.0",
        "target_daily_hours = 8.333",
        "chunk_cap = 0.0",
        "min_chunk = 3.0",
        "country = \"\"",
    ] {
        let err = ReportConfig::from_toml_str(text).unwrap_err();
        assert!(
            matches!(err, PersistenceError::Schedule(ScheduleError::Configuration(_))),
            "{text}: {err}"
        );
    }
}

#[test]
fn empty_or_unknown_catalogs_are_rejected() {
    let err = ReportConfig::from_toml_str("[filler_catalogs]\nes = []\n").unwrap_err();
    assert!(matches!(
        err,
        PersistenceError::Schedule(ScheduleError::Configuration(_))
    ));

    let err = ReportConfig::from_toml_str("[filler_catalogs]\nfr = [\"Revue\"]\n").unwrap_err();
    assert!(matches!(
        err,
        PersistenceError::Schedule(ScheduleError::Configuration(_))
    ));
}

#[test]
fn malformed_toml_is_a_parse_error() {
    assert!(matches!(
        ReportConfig::from_toml_str("target_daily_hours = \"eight\""),
        Err(PersistenceError::Toml(_))
    ));
}

#[test]
fn load_reads_from_disk() {
    let tmp = NamedTempFile::new().unwrap();
    fs::write(tmp.path(), "year = 2027\nmax_tasks_per_day = 3\n").unwrap();
    let config = ReportConfig::load(tmp.path()).unwrap();
    assert_eq!(config.year, 2027);
    assert_eq!(config.max_tasks_per_day, 3);

    assert!(matches!(
        ReportConfig::load("/nonexistent/timesheet.toml"),
        Err(PersistenceError::Io(_))
    ));
}
