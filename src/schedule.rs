use crate::calculations::{Buckets, HourNormalizer, NormalizerSettings, TaskAllocator};
use crate::calendar::WorkCalendar;
use crate::config::ReportConfig;
use crate::error::{MalformedTask, ScheduleError};
use crate::task::{DayBucket, RawTaskCandidate, TaskCandidate, intake};
use chrono::{Datelike, NaiveDate};

/// Finalized day-by-day plan: one bucket per business day, each summing to the target.
#[derive(Debug, Clone, PartialEq)]
pub struct Schedule {
    target_daily_hours: f64,
    days: Buckets,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleSummary {
    pub day_count: usize,
    pub task_count: usize,
    pub filler_count: usize,
    pub total_hours: f64,
    pub first_day: Option<NaiveDate>,
    pub last_day: Option<NaiveDate>,
}

impl ScheduleSummary {
    pub fn to_cli_summary(&self) -> String {
        let mut parts = Vec::new();
        parts.push(format!("days={}", self.day_count));
        parts.push(format!("tasks={}", self.task_count));
        if self.filler_count > 0 {
            parts.push(format!("fillers={}", self.filler_count));
        }
        parts.push(format!("hours={:.2}", self.total_hours));
        if let (Some(first), Some(last)) = (self.first_day, self.last_day) {
            parts.push(format!("range={first}..{last}"));
        }
        parts.join(", ")
    }
}

impl Schedule {
    pub fn new(target_daily_hours: f64, days: Buckets) -> Self {
        Self {
            target_daily_hours,
            days,
        }
    }

    pub fn empty(target_daily_hours: f64) -> Self {
        Self::new(target_daily_hours, Buckets::new())
    }

    pub fn target_daily_hours(&self) -> f64 {
        self.target_daily_hours
    }

    pub fn days(&self) -> &Buckets {
        &self.days
    }

    pub fn into_days(self) -> Buckets {
        self.days
    }

    /// Buckets in calendar order.
    pub fn iter(&self) -> impl Iterator<Item = &DayBucket> {
        self.days.values()
    }

    pub fn get(&self, date: NaiveDate) -> Option<&DayBucket> {
        self.days.get(&date)
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn total_hours(&self) -> f64 {
        self.iter().map(DayBucket::task_hours).sum()
    }

    pub fn summary(&self) -> ScheduleSummary {
        ScheduleSummary {
            day_count: self.days.len(),
            task_count: self.iter().map(|b| b.tasks.len()).sum(),
            filler_count: self.iter().map(DayBucket::filler_count).sum(),
            total_hours: self.total_hours(),
            first_day: self.days.keys().next().copied(),
            last_day: self.days.keys().next_back().copied(),
        }
    }
}

/// Result of planning raw generator output.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanOutcome {
    pub year: i32,
    pub month: u32,
    pub schedule: Schedule,
    /// Candidates whose hours were replaced by the default.
    pub issues: Vec<MalformedTask>,
    /// Days holding more candidate tasks than the configured soft limit.
    pub crowded_days: Vec<NaiveDate>,
}

/// Runs calendar, allocation and normalization for one month.
#[derive(Debug, Clone)]
pub struct MonthlyPlanner {
    calendar: WorkCalendar,
    allocator: TaskAllocator,
    normalizer: HourNormalizer,
    default_project: String,
    max_tasks_per_day: usize,
}

impl MonthlyPlanner {
    /// Planner with the built-in holiday rules plus the configured extra holidays.
    pub fn from_config(config: &ReportConfig) -> Result<Self, ScheduleError> {
        config.validate()?;
        let mut calendar = WorkCalendar::builtin(config.country.as_str())?;
        calendar.add_holidays(
            config
                .extra_holidays
                .iter()
                .map(|h| (h.date, h.name.clone())),
        );
        Self::with_calendar(config, calendar)
    }

    /// Planner over a caller-supplied calendar, used as-is.
    pub fn with_calendar(
        config: &ReportConfig,
        calendar: WorkCalendar,
    ) -> Result<Self, ScheduleError> {
        config.validate()?;
        let normalizer = HourNormalizer::new(NormalizerSettings::from_config(config))?;
        Ok(Self {
            calendar,
            allocator: TaskAllocator::new(),
            normalizer,
            default_project: config.default_project.clone(),
            max_tasks_per_day: config.max_tasks_per_day,
        })
    }

    pub fn calendar(&self) -> &WorkCalendar {
        &self.calendar
    }

    pub fn normalizer(&self) -> &HourNormalizer {
        &self.normalizer
    }

    pub fn business_days(&self, year: i32, month: u32) -> Result<Vec<NaiveDate>, ScheduleError> {
        self.calendar.business_days_in_month(year, month)
    }

    pub fn plan(
        &self,
        year: i32,
        month: u32,
        candidates: &[TaskCandidate],
    ) -> Result<Schedule, ScheduleError> {
        let (first, _) = WorkCalendar::month_bounds(year, month)?;
        self.calendar.prefetch([first.year()]);

        let days = self.calendar.business_days_in_month(year, month)?;
        tracing::debug!(year, month, business_days = days.len(), "calendar ready");

        let buckets = self.allocator.allocate(candidates, &days)?;
        let schedule = self.normalizer.normalize(buckets)?;
        tracing::info!(year, month, "{}", schedule.summary().to_cli_summary());
        Ok(schedule)
    }

    pub fn plan_raw(
        &self,
        year: i32,
        month: u32,
        raw: Vec<RawTaskCandidate>,
    ) -> Result<PlanOutcome, ScheduleError> {
        let intake = intake(raw, &self.default_project);
        let schedule = self.plan(year, month, &intake.candidates)?;

        let crowded_days: Vec<NaiveDate> = schedule
            .iter()
            .filter(|b| b.candidate_count() > self.max_tasks_per_day)
            .map(|b| b.date)
            .collect();
        for day in &crowded_days {
            tracing::warn!(
                %day,
                limit = self.max_tasks_per_day,
                "day holds more tasks than the configured limit"
            );
        }

        Ok(PlanOutcome {
            year,
            month,
            schedule,
            issues: intake.issues,
            crowded_days,
        })
    }
}
