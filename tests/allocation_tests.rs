use chrono::NaiveDate;
use timesheet_scheduler::{ScheduleError, TaskAllocator, TaskCandidate};

fn d(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn candidates(hours: &[f64]) -> Vec<TaskCandidate> {
    hours
        .iter()
        .enumerate()
        .map(|(i, h)| TaskCandidate::new(format!("task {}", i + 1), "Acme", *h))
        .collect()
}

fn names(tasks: &[timesheet_scheduler::FinalizedTask]) -> Vec<&str> {
    tasks.iter().map(|t| t.name.as_str()).collect()
}

#[test]
fn first_candidate_goes_to_earliest_day_on_tie() {
    let days = [d(2026, 2, 2), d(2026, 2, 3)];
    let buckets = TaskAllocator::new()
        .allocate(&candidates(&[5.0, 1.0, 1.0]), &days)
        .unwrap();

    let first = &buckets[&days[0]];
    let second = &buckets[&days[1]];
    assert_eq!(names(&first.tasks), vec!["task 1"]);
    assert_eq!(first.hours, 5.0);
    assert_eq!(names(&second.tasks), vec!["task 2", "task 3"]);
    assert_eq!(second.hours, 2.0);
}

#[test]
fn each_candidate_goes_to_least_loaded_day() {
    let days = [d(2026, 2, 2), d(2026, 2, 3), d(2026, 2, 4)];
    let buckets = TaskAllocator::new()
        .allocate(&candidates(&[3.0, 2.0, 1.0, 1.0, 0.5]), &days)
        .unwrap();

    assert_eq!(names(&buckets[&days[0]].tasks), vec!["task 1"]);
    assert_eq!(names(&buckets[&days[1]].tasks), vec!["task 2", "task 5"]);
    assert_eq!(names(&buckets[&days[2]].tasks), vec!["task 3", "task 4"]);
}

#[test]
fn no_candidates_yields_one_empty_bucket_per_day() {
    let days = [d(2026, 2, 2), d(2026, 2, 3), d(2026, 2, 4)];
    let buckets = TaskAllocator::new().allocate(&[], &days).unwrap();
    assert_eq!(buckets.len(), 3);
    assert!(buckets.values().all(|b| b.tasks.is_empty() && b.hours == 0.0));
    let keys: Vec<NaiveDate> = buckets.keys().copied().collect();
    assert_eq!(keys, days.to_vec());
}

#[test]
fn work_without_days_is_an_empty_calendar_error() {
    let err = TaskAllocator::new()
        .allocate(&candidates(&[1.0, 2.0, 3.0]), &[])
        .unwrap_err();
    assert_eq!(err, ScheduleError::EmptyCalendar { candidates: 3 });
}

#[test]
fn nothing_to_place_and_nowhere_to_place_it_is_fine() {
    let buckets = TaskAllocator::new().allocate(&[], &[]).unwrap();
    assert!(buckets.is_empty());
}

#[test]
fn allocation_is_deterministic() {
    let days: Vec<NaiveDate> = (2..=6).map(|day| d(2026, 2, day)).collect();
    let input = candidates(&[1.5, 2.0, 0.5, 4.0, 1.0, 1.0, 3.25, 2.0, 0.75]);
    let allocator = TaskAllocator::new();
    let first = allocator.allocate(&input, &days).unwrap();
    let second = allocator.allocate(&input, &days).unwrap();
    assert_eq!(first, second);
}
