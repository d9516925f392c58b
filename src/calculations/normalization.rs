use crate::calculations::allocation::Buckets;
use crate::config::{ReportConfig, validate_hours};
use crate::error::ScheduleError;
use crate::filler::{FillerCatalog, Locale};
use crate::schedule::Schedule;
use crate::task::{DayBucket, FinalizedTask};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Replacement for hours that come out at or below zero.
pub const HOURS_FLOOR: f64 = 0.1;

/// [`HOURS_FLOOR`] in hundredths.
const FLOOR_CENTS: i64 = 10;

/// Deficits below this are left for the rescale step.
const DEFICIT_EPSILON: f64 = 0.01;

/// Totals this close to the target are treated as equal.
const TOTAL_EPSILON: f64 = 1e-9;

/// What to do with a non-empty day whose hours fall short of the target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeficitPolicy {
    /// Stretch the day's own tasks up to the target.
    #[default]
    Rescale,
    /// Pad with filler tasks first, then rescale whatever drift remains.
    Fill,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NormalizerSettings {
    pub target_daily_hours: f64,
    pub chunk_cap: f64,
    pub min_chunk: f64,
    pub locale: Locale,
    pub catalog: FillerCatalog,
    pub filler_project: String,
    pub deficit_policy: DeficitPolicy,
}

impl NormalizerSettings {
    pub fn new(target_daily_hours: f64, locale: Locale) -> Self {
        Self {
            target_daily_hours,
            chunk_cap: 2.0,
            min_chunk: 0.5,
            locale,
            catalog: locale.default_catalog(),
            filler_project: "Internal".to_string(),
            deficit_policy: DeficitPolicy::default(),
        }
    }

    pub fn from_config(config: &ReportConfig) -> Self {
        Self {
            target_daily_hours: config.target_daily_hours,
            chunk_cap: config.chunk_cap,
            min_chunk: config.min_chunk,
            locale: config.locale,
            catalog: config.filler_catalog(),
            filler_project: config.default_project.clone(),
            deficit_policy: config.deficit_policy,
        }
    }

    pub fn with_chunks(mut self, chunk_cap: f64, min_chunk: f64) -> Self {
        self.chunk_cap = chunk_cap;
        self.min_chunk = min_chunk;
        self
    }

    pub fn with_catalog(mut self, catalog: FillerCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn with_filler_project(mut self, project: impl Into<String>) -> Self {
        self.filler_project = project.into();
        self
    }

    pub fn with_deficit_policy(mut self, policy: DeficitPolicy) -> Self {
        self.deficit_policy = policy;
        self
    }
}

/// Brings every day to exactly the target: fill, then rescale with the last task
/// absorbing the rounding remainder.
#[derive(Debug, Clone)]
pub struct HourNormalizer {
    settings: NormalizerSettings,
}

impl HourNormalizer {
    pub fn new(settings: NormalizerSettings) -> Result<Self, ScheduleError> {
        validate_hours(
            settings.target_daily_hours,
            settings.chunk_cap,
            settings.min_chunk,
        )?;
        if settings.catalog.is_empty() {
            return Err(ScheduleError::config(format!(
                "filler catalog for locale '{}' is empty",
                settings.locale
            )));
        }
        Ok(Self { settings })
    }

    pub fn settings(&self) -> &NormalizerSettings {
        &self.settings
    }

    pub fn target(&self) -> f64 {
        self.settings.target_daily_hours
    }

    /// Normalize every bucket. Days are independent and processed in parallel.
    ///
    /// Fails with [`ScheduleError::OverfullDay`] when a day holds more tasks than there are
    /// hundredths in the target, since no positive split exists.
    pub fn normalize(&self, buckets: Buckets) -> Result<Schedule, ScheduleError> {
        let capacity = to_cents(self.target());
        if let Some(bucket) = buckets
            .values()
            .find(|b| b.tasks.len() as i64 > capacity)
        {
            return Err(ScheduleError::OverfullDay {
                day: bucket.date,
                tasks: bucket.tasks.len(),
                target: self.target(),
            });
        }

        let days: Buckets = buckets
            .into_par_iter()
            .map(|(date, bucket)| (date, self.normalize_bucket(bucket)))
            .collect();
        Ok(Schedule::new(self.target(), days))
    }

    pub fn normalize_bucket(&self, mut bucket: DayBucket) -> DayBucket {
        Self::prepare(&mut bucket);
        if bucket.is_empty() {
            self.fill_empty(&mut bucket);
        } else if self.settings.deficit_policy == DeficitPolicy::Fill {
            self.fill_deficit(&mut bucket);
        }
        self.rescale(&mut bucket);
        tracing::debug!(
            day = %bucket.date,
            tasks = bucket.tasks.len(),
            fillers = bucket.filler_count(),
            hours = bucket.hours,
            "normalized"
        );
        bucket
    }

    /// Round every task to hundredths, lifting non-positive or non-finite hours to
    /// [`HOURS_FLOOR`].
    pub fn prepare(bucket: &mut DayBucket) {
        for task in bucket.tasks.iter_mut() {
            let rounded = round_hours(task.hours);
            if !rounded.is_finite() || rounded <= 0.0 {
                tracing::warn!(
                    day = %bucket.date,
                    task = %task.name,
                    hours = task.hours,
                    "clamping hours to floor"
                );
                task.hours = HOURS_FLOOR;
            } else {
                task.hours = rounded;
            }
        }
        bucket.hours = bucket.task_hours();
    }

    /// Pad an empty day with catalog entries of `chunk_cap` hours; the last chunk takes
    /// the exact remainder.
    pub fn fill_empty(&self, bucket: &mut DayBucket) {
        let mut names = self.settings.catalog.cursor();
        let mut remaining = round_hours(self.target() - bucket.task_hours());

        while remaining >= DEFICIT_EPSILON {
            let Some(name) = names.next() else { break };
            let chunk = round_hours(self.settings.chunk_cap.min(remaining)).max(DEFICIT_EPSILON);
            bucket.push(FinalizedTask::filler(
                name,
                self.settings.filler_project.as_str(),
                chunk,
            ));
            remaining = round_hours(remaining - chunk);
        }
    }

    /// Close a shortfall with filler chunks between `min_chunk` and `chunk_cap`. A
    /// remainder smaller than `min_chunk` is still appended as-is.
    pub fn fill_deficit(&self, bucket: &mut DayBucket) {
        let mut names = self.settings.catalog.cursor();
        let mut deficit = round_hours(self.target() - bucket.task_hours());

        while deficit >= DEFICIT_EPSILON {
            let Some(name) = names.next() else { break };
            let chunk = if deficit < self.settings.min_chunk {
                deficit
            } else {
                deficit
                    .min(self.settings.chunk_cap)
                    .max(self.settings.min_chunk)
            };
            let chunk = round_hours(chunk).max(DEFICIT_EPSILON);
            bucket.push(FinalizedTask::filler(
                name,
                self.settings.filler_project.as_str(),
                chunk,
            ));
            deficit = round_hours(deficit - chunk);
        }
    }

    /// Scale every task so the day sums to the target. All but the last task are scaled
    /// and rounded to hundredths; the last takes whatever is left.
    ///
    /// When the rounded tasks leave less than [`HOURS_FLOOR`] for the last one, it gets the
    /// floor and the excess is taken back from the largest earlier tasks a hundredth at a
    /// time. A day already at the target is left as it is.
    pub fn rescale(&self, bucket: &mut DayBucket) {
        let Some(last) = bucket.tasks.len().checked_sub(1) else {
            return;
        };

        let target = to_cents(self.target());
        let mut cents: Vec<i64> = bucket
            .tasks
            .iter()
            .map(|t| {
                if t.hours.is_finite() && t.hours > 0.0 {
                    to_cents(t.hours).max(1)
                } else {
                    FLOOR_CENTS
                }
            })
            .collect();

        let total: i64 = cents.iter().sum();
        if total != target {
            let scale = target as f64 / total as f64;
            for c in &mut cents[..last] {
                let scaled = (*c as f64 * scale).round() as i64;
                *c = if scaled > 0 { scaled } else { FLOOR_CENTS };
            }

            let remainder = target - cents[..last].iter().sum::<i64>();
            cents[last] = if remainder >= FLOOR_CENTS {
                remainder
            } else {
                tracing::warn!(
                    day = %bucket.date,
                    remainder = remainder as f64 / 100.0,
                    "last task below floor; trimming earlier tasks"
                );
                FLOOR_CENTS.min(target - last as i64).max(1)
            };

            let mut excess = cents.iter().sum::<i64>() - target;
            while excess > 0 {
                let Some(idx) = largest_trimmable(&cents[..last]) else {
                    break;
                };
                cents[idx] -= 1;
                excess -= 1;
            }
        }

        for (task, c) in bucket.tasks.iter_mut().zip(cents) {
            task.hours = c as f64 / 100.0;
        }
        bucket.hours = bucket.task_hours();
    }
}

/// Index of the largest value above one hundredth; the earliest wins ties.
fn largest_trimmable(cents: &[i64]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (idx, c) in cents.iter().enumerate() {
        if *c > 1 && best.is_none_or(|b| *c > cents[b]) {
            best = Some(idx);
        }
    }
    best
}

fn to_cents(hours: f64) -> i64 {
    (hours * 100.0).round() as i64
}

/// Round to hundredths of an hour.
pub fn round_hours(hours: f64) -> f64 {
    (hours * 100.0).round() / 100.0
}
