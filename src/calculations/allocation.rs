use crate::error::ScheduleError;
use crate::task::{DayBucket, FinalizedTask, TaskCandidate};
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Unnormalized buckets keyed by business day.
pub type Buckets = BTreeMap<NaiveDate, DayBucket>;

/// Greedy least-loaded placement of candidates onto business days.
///
/// Candidates are taken strictly in input order; each goes to the day with the lowest
/// running total, the earliest date winning ties. Not an optimal partition: the
/// normalizer takes care of exact daily totals.
#[derive(Debug, Clone, Copy, Default)]
pub struct TaskAllocator;

impl TaskAllocator {
    pub fn new() -> Self {
        Self
    }

    pub fn allocate(
        &self,
        candidates: &[TaskCandidate],
        days: &[NaiveDate],
    ) -> Result<Buckets, ScheduleError> {
        let mut ordered: Vec<NaiveDate> = days.to_vec();
        ordered.sort();
        ordered.dedup();

        if ordered.is_empty() {
            if candidates.is_empty() {
                return Ok(Buckets::new());
            }
            return Err(ScheduleError::EmptyCalendar {
                candidates: candidates.len(),
            });
        }

        let mut slots: Vec<DayBucket> = ordered.iter().copied().map(DayBucket::new).collect();

        for candidate in candidates {
            let idx = Self::least_loaded(&slots);
            let mut task = FinalizedTask::from(candidate);
            if !task.hours.is_finite() {
                tracing::warn!(task = %task.name, "non-finite hours counted as zero load");
                task.hours = 0.0;
            }
            tracing::debug!(
                day = %slots[idx].date,
                task = %task.name,
                hours = task.hours,
                "assigned"
            );
            slots[idx].push(task);
        }

        Ok(slots.into_iter().map(|bucket| (bucket.date, bucket)).collect())
    }

    /// Index of the bucket with the smallest total; the first one wins ties.
    fn least_loaded(slots: &[DayBucket]) -> usize {
        let mut best = 0;
        for (idx, bucket) in slots.iter().enumerate().skip(1) {
            if bucket.hours < slots[best].hours {
                best = idx;
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn least_loaded_prefers_earliest_on_ties() {
        let slots = vec![
            DayBucket::new(d(2026, 1, 2)),
            DayBucket::new(d(2026, 1, 5)),
        ];
        assert_eq!(TaskAllocator::least_loaded(&slots), 0);
    }

    #[test]
    fn unsorted_days_are_ordered_before_allocation() {
        let candidates = vec![TaskCandidate::new("A", "P", 3.0)];
        let buckets = TaskAllocator::new()
            .allocate(&candidates, &[d(2026, 1, 6), d(2026, 1, 5), d(2026, 1, 5)])
            .unwrap();
        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[&d(2026, 1, 5)].tasks.len(), 1);
        assert!(buckets[&d(2026, 1, 6)].is_empty());
    }
}
