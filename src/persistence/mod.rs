use crate::Schedule;
use crate::error::ScheduleError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("config parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error(transparent)]
    Schedule(#[from] ScheduleError),
    #[error("invalid data: {0}")]
    InvalidData(String),
}

pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// Tolerance for a day's total against the target.
const SUM_TOLERANCE: f64 = 1e-6;

/// Check that every day sums to the target and every task has positive hours.
pub fn validate_schedule(schedule: &Schedule) -> PersistenceResult<()> {
    let target = schedule.target_daily_hours();
    if !target.is_finite() || target <= 0.0 {
        return Err(PersistenceError::InvalidData(format!(
            "target_daily_hours must be positive (got {target})"
        )));
    }

    for (date, bucket) in schedule.days() {
        if bucket.date != *date {
            return Err(PersistenceError::InvalidData(format!(
                "bucket dated {} stored under {date}",
                bucket.date
            )));
        }
        if let Some(task) = bucket.tasks.iter().find(|t| !t.hours.is_finite() || t.hours <= 0.0) {
            return Err(PersistenceError::InvalidData(format!(
                "{date}: task '{}' has non-positive hours {}",
                task.name, task.hours
            )));
        }
        let total = bucket.task_hours();
        if (total - target).abs() >= SUM_TOLERANCE {
            return Err(PersistenceError::InvalidData(format!(
                "{date}: hours sum to {total}, expected {target}"
            )));
        }
    }
    Ok(())
}

pub mod file;

pub use file::{
    extract_json_payload, load_candidates_from_json, load_schedule_from_csv,
    load_schedule_from_json, parse_candidates_json, report_file_name, save_schedule_to_csv,
    save_schedule_to_json,
};
