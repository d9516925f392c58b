use chrono::NaiveDate;
use thiserror::Error;

/// Fatal failures of the scheduling core.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScheduleError {
    /// Invalid settings, detected before any bucket is touched.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Work was supplied but the calendar has nowhere to put it.
    #[error("no business days available to place {candidates} task(s)")]
    EmptyCalendar { candidates: usize },

    /// More tasks on one day than hundredths of an hour in the target.
    #[error("{day} holds {tasks} task(s); {target}h cannot give each a positive hundredth")]
    OverfullDay {
        day: NaiveDate,
        tasks: usize,
        target: f64,
    },
}

impl ScheduleError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }
}

/// A candidate whose hours could not be used as given.
///
/// Never fatal: the candidate is kept with `substituted` hours and this record is
/// returned next to the schedule so callers can surface it.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("task #{index} '{name}': {reason}; using {substituted}h")]
pub struct MalformedTask {
    pub index: usize,
    pub name: String,
    pub reason: String,
    pub substituted: f64,
}
