//! Report settings, loaded from TOML.
//!
//! Every field has a default, so an empty file is a valid configuration:
//!
//! ```toml
//! country = "CO"
//! year = 2026
//! target_daily_hours = 8.0
//! locale = "es"
//! deficit_policy = "fill"
//!
//! [filler_catalogs]
//! es = ["Soporte a usuarios", "Revisión de pendientes"]
//!
//! [[extra_holidays]]
//! date = "2026-12-24"
//! name = "Company holiday"
//! ```

use crate::calculations::DeficitPolicy;
use crate::error::ScheduleError;
use crate::filler::{FillerCatalog, Locale};
use crate::persistence::PersistenceResult;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub country: String,
    pub year: i32,
    pub target_daily_hours: f64,
    /// Soft limit; exceeding it is reported, never enforced.
    pub max_tasks_per_day: usize,
    pub default_project: String,
    pub locale: Locale,
    pub chunk_cap: f64,
    pub min_chunk: f64,
    pub deficit_policy: DeficitPolicy,
    /// Catalog overrides keyed by locale code (`en`, `es`).
    pub filler_catalogs: BTreeMap<String, FillerCatalog>,
    pub extra_holidays: Vec<ExtraHoliday>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtraHoliday {
    pub date: NaiveDate,
    #[serde(default = "ExtraHoliday::default_name")]
    pub name: String,
}

impl ExtraHoliday {
    fn default_name() -> String {
        "Company holiday".to_string()
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            country: "CO".to_string(),
            year: 2026,
            target_daily_hours: 8.0,
            max_tasks_per_day: 5,
            default_project: "Internal".to_string(),
            locale: Locale::default(),
            chunk_cap: 2.0,
            min_chunk: 0.5,
            deficit_policy: DeficitPolicy::default(),
            filler_catalogs: BTreeMap::new(),
            extra_holidays: Vec::new(),
        }
    }
}

impl ReportConfig {
    pub fn from_toml_str(text: &str) -> PersistenceResult<Self> {
        let config: ReportConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> PersistenceResult<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Filler catalog for the configured locale, honoring overrides.
    pub fn filler_catalog(&self) -> FillerCatalog {
        self.filler_catalogs
            .get(self.locale.as_str())
            .cloned()
            .unwrap_or_else(|| self.locale.default_catalog())
    }

    pub fn validate(&self) -> Result<(), ScheduleError> {
        if self.country.trim().is_empty() {
            return Err(ScheduleError::config("country code must not be empty"));
        }
        validate_hours(self.target_daily_hours, self.chunk_cap, self.min_chunk)?;
        for key in self.filler_catalogs.keys() {
            key.parse::<Locale>().map_err(ScheduleError::Configuration)?;
        }
        if self.filler_catalog().is_empty() {
            return Err(ScheduleError::config(format!(
                "filler catalog for locale '{}' is empty",
                self.locale
            )));
        }
        Ok(())
    }
}

/// Shared checks for target and chunk sizing.
pub(crate) fn validate_hours(
    target_daily_hours: f64,
    chunk_cap: f64,
    min_chunk: f64,
) -> Result<(), ScheduleError> {
    if !target_daily_hours.is_finite() || target_daily_hours <= 0.0 {
        return Err(ScheduleError::config(format!(
            "target_daily_hours must be positive (got {target_daily_hours})"
        )));
    }
    let hundredths = target_daily_hours * 100.0;
    if (hundredths - hundredths.round()).abs() > 1e-6 {
        return Err(ScheduleError::config(format!(
            "target_daily_hours must be a multiple of 0.01 (got {target_daily_hours})"
        )));
    }
    if !chunk_cap.is_finite() || chunk_cap <= 0.0 {
        return Err(ScheduleError::config(format!(
            "chunk_cap must be positive (got {chunk_cap})"
        )));
    }
    if !min_chunk.is_finite() || min_chunk <= 0.0 {
        return Err(ScheduleError::config(format!(
            "min_chunk must be positive (got {min_chunk})"
        )));
    }
    if min_chunk > chunk_cap {
        return Err(ScheduleError::config(format!(
            "min_chunk {min_chunk} exceeds chunk_cap {chunk_cap}"
        )));
    }
    Ok(())
}
