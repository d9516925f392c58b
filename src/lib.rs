//! Monthly timesheet scheduling.
//!
//! Takes a list of estimated work items and lays them out over the business days of a
//! month so that every day adds up to exactly the configured number of hours:
//! [`WorkCalendar`] decides which days count, [`TaskAllocator`] places work on the
//! least-loaded day, and [`HourNormalizer`] pads and rescales each day to the target.

pub mod calculations;
pub mod calendar;
pub mod config;
pub mod error;
pub mod filler;
pub mod holidays;
pub mod persistence;
pub mod schedule;
pub mod task;

pub use calculations::{DeficitPolicy, HourNormalizer, NormalizerSettings, TaskAllocator};
pub use calendar::WorkCalendar;
pub use config::{ExtraHoliday, ReportConfig};
pub use error::{MalformedTask, ScheduleError};
pub use filler::{FillerCatalog, Locale};
pub use holidays::{BuiltinHolidays, HolidayProvider, HolidaySet, StaticHolidays};
pub use persistence::{
    PersistenceError, load_candidates_from_json, load_schedule_from_csv, load_schedule_from_json,
    parse_candidates_json, report_file_name, save_schedule_to_csv, save_schedule_to_json,
    validate_schedule,
};
pub use schedule::{MonthlyPlanner, PlanOutcome, Schedule, ScheduleSummary};
pub use task::{DayBucket, FinalizedTask, Intake, RawTaskCandidate, TaskCandidate, TaskOrigin};
