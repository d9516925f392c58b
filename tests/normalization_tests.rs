use chrono::{Duration, NaiveDate};
use proptest::prelude::*;
use timesheet_scheduler::calculations::Buckets;
use timesheet_scheduler::{
    DayBucket, DeficitPolicy, FillerCatalog, HourNormalizer, Locale, NormalizerSettings,
    ScheduleError, TaskAllocator, TaskCandidate, TaskOrigin,
};

fn d(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn catalog() -> FillerCatalog {
    FillerCatalog::new(["Review", "Docs", "Planning"])
}

fn normalizer(target: f64, policy: DeficitPolicy) -> HourNormalizer {
    HourNormalizer::new(
        NormalizerSettings::new(target, Locale::En)
            .with_catalog(catalog())
            .with_filler_project("Internal")
            .with_deficit_policy(policy),
    )
    .unwrap()
}

fn allocate(hours: &[f64], days: &[NaiveDate]) -> Buckets {
    let candidates: Vec<TaskCandidate> = hours
        .iter()
        .enumerate()
        .map(|(i, h)| TaskCandidate::new(format!("task {}", i + 1), "Acme", *h))
        .collect();
    TaskAllocator::new().allocate(&candidates, days).unwrap()
}

fn hours_of(bucket: &DayBucket) -> Vec<f64> {
    bucket.tasks.iter().map(|t| t.hours).collect()
}

#[test]
fn two_day_scenario_rescales_each_day_to_target() {
    let days = [d(2026, 2, 2), d(2026, 2, 3)];
    let schedule = normalizer(8.0, DeficitPolicy::Rescale)
        .normalize(allocate(&[5.0, 1.0, 1.0], &days))
        .unwrap();

    assert_eq!(hours_of(schedule.get(days[0]).unwrap()), vec![8.0]);
    assert_eq!(hours_of(schedule.get(days[1]).unwrap()), vec![4.0, 4.0]);
    assert!(schedule.iter().all(|b| b.filler_count() == 0));
}

#[test]
fn empty_day_is_filled_with_catalog_chunks() {
    let day = d(2026, 2, 2);
    let schedule = normalizer(8.0, DeficitPolicy::Rescale)
        .normalize(allocate(&[], &[day]))
        .unwrap();
    let bucket = schedule.get(day).unwrap();

    assert_eq!(hours_of(bucket), vec![2.0, 2.0, 2.0, 2.0]);
    let names: Vec<&str> = bucket.tasks.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["Review", "Docs", "Planning", "Review"]);
    assert!(bucket.tasks.iter().all(|t| t.origin == TaskOrigin::Filler));
    assert!(bucket.tasks.iter().all(|t| t.project == "Internal"));
    assert_eq!(bucket.task_hours(), 8.0);
}

#[test]
fn last_empty_chunk_takes_exact_remainder() {
    let day = d(2026, 2, 2);
    let schedule = normalizer(7.5, DeficitPolicy::Rescale)
        .normalize(allocate(&[], &[day]))
        .unwrap();
    assert_eq!(hours_of(schedule.get(day).unwrap()), vec![2.0, 2.0, 2.0, 1.5]);
}

#[test]
fn every_empty_day_starts_its_own_catalog_rotation() {
    let days = [d(2026, 2, 2), d(2026, 2, 3)];
    let schedule = normalizer(3.0, DeficitPolicy::Rescale).normalize(allocate(&[], &days)).unwrap();
    for bucket in schedule.iter() {
        let names: Vec<&str> = bucket.tasks.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Review", "Docs"]);
        assert_eq!(hours_of(bucket), vec![2.0, 1.0]);
    }
}

#[test]
fn fill_policy_pads_short_days_with_filler() {
    let days = [d(2026, 2, 2), d(2026, 2, 3)];
    let schedule = normalizer(8.0, DeficitPolicy::Fill)
        .normalize(allocate(&[5.0, 1.0, 1.0], &days))
        .unwrap();

    let first = schedule.get(days[0]).unwrap();
    assert_eq!(hours_of(first), vec![5.0, 2.0, 1.0]);
    assert_eq!(first.filler_count(), 2);

    let second = schedule.get(days[1]).unwrap();
    assert_eq!(hours_of(second), vec![1.0, 1.0, 2.0, 2.0, 2.0]);
    assert_eq!(second.tasks[2].name, "Review");
}

#[test]
fn overfull_day_is_scaled_down() {
    let day = d(2026, 2, 2);
    let mut buckets = Buckets::new();
    let mut bucket = DayBucket::new(day);
    for candidate in [
        TaskCandidate::new("a", "P", 6.0),
        TaskCandidate::new("b", "P", 6.0),
    ] {
        bucket.push((&candidate).into());
    }
    buckets.insert(day, bucket);

    let schedule = normalizer(8.0, DeficitPolicy::Fill).normalize(buckets).unwrap();
    assert_eq!(hours_of(schedule.get(day).unwrap()), vec![4.0, 4.0]);
}

#[test]
fn rescaling_a_normalized_day_changes_nothing() {
    let days = [d(2026, 2, 2), d(2026, 2, 3), d(2026, 2, 4)];
    let n = normalizer(8.0, DeficitPolicy::Rescale);
    let schedule = n.normalize(allocate(&[1.3, 2.7, 0.9, 3.3, 1.1, 2.2, 0.4], &days)).unwrap();

    for bucket in schedule.iter() {
        let mut again = bucket.clone();
        n.rescale(&mut again);
        assert_eq!(&again, bucket);
    }
}

#[test]
fn rounding_remainder_lands_on_last_task() {
    let day = d(2026, 2, 2);
    let schedule = normalizer(8.0, DeficitPolicy::Rescale)
        .normalize(allocate(&[1.0, 1.0, 1.0], &[day]))
        .unwrap();
    assert_eq!(hours_of(schedule.get(day).unwrap()), vec![2.67, 2.67, 2.66]);
}

#[test]
fn tiny_scaled_tasks_do_not_push_the_day_over_target() {
    let day = d(2026, 2, 2);
    let n = normalizer(8.0, DeficitPolicy::Rescale);

    let schedule = n
        .normalize(allocate(&[8.02, 5.76, 11.23, 1.42, 10.84, 0.74, 0.06], &[day]))
        .unwrap();
    let bucket = schedule.get(day).unwrap();
    assert_eq!(hours_of(bucket), vec![1.69, 1.21, 2.27, 0.3, 2.27, 0.16, 0.1]);
    assert!((bucket.task_hours() - 8.0).abs() < 1e-6);

    let schedule = n.normalize(allocate(&[100.0, 0.02, 0.02, 1.0], &[day])).unwrap();
    let bucket = schedule.get(day).unwrap();
    assert_eq!(hours_of(bucket), vec![7.7, 0.1, 0.1, 0.1]);
    assert!((bucket.task_hours() - 8.0).abs() < 1e-6);
}

#[test]
fn day_with_one_hundredth_per_task_still_balances() {
    let day = d(2026, 2, 2);
    let hours = vec![1.0; 800];
    let schedule = normalizer(8.0, DeficitPolicy::Rescale)
        .normalize(allocate(&hours, &[day]))
        .unwrap();
    let bucket = schedule.get(day).unwrap();

    assert!(bucket.tasks.iter().all(|t| t.hours == 0.01));
    assert!((bucket.task_hours() - 8.0).abs() < 1e-6);
}

#[test]
fn day_with_more_tasks_than_hundredths_is_rejected() {
    let day = d(2026, 2, 2);
    let hours = vec![1.0; 801];
    let err = normalizer(8.0, DeficitPolicy::Rescale)
        .normalize(allocate(&hours, &[day]))
        .unwrap_err();

    assert_eq!(
        err,
        ScheduleError::OverfullDay {
            day,
            tasks: 801,
            target: 8.0,
        }
    );
}

#[test]
fn invalid_settings_fail_fast() {
    for target in [0.0, -8.0, f64::NAN, f64::INFINITY, 7.333] {
        let err = HourNormalizer::new(NormalizerSettings::new(target, Locale::En)).unwrap_err();
        assert!(matches!(err, ScheduleError::Configuration(_)), "target {target}");
    }

    let err = HourNormalizer::new(NormalizerSettings::new(8.0, Locale::En).with_chunks(0.0, 0.5))
        .unwrap_err();
    assert!(matches!(err, ScheduleError::Configuration(_)));

    let err = HourNormalizer::new(NormalizerSettings::new(8.0, Locale::En).with_chunks(1.0, 1.5))
        .unwrap_err();
    assert!(matches!(err, ScheduleError::Configuration(_)));
}

#[test]
fn locale_selects_builtin_catalog() {
    let day = d(2026, 2, 2);
    let es = HourNormalizer::new(NormalizerSettings::new(2.0, Locale::Es)).unwrap();
    let en = HourNormalizer::new(NormalizerSettings::new(2.0, Locale::En)).unwrap();

    let es_schedule = es.normalize(allocate(&[], &[day])).unwrap();
    let en_schedule = en.normalize(allocate(&[], &[day])).unwrap();
    let es_name = es_schedule.get(day).unwrap().tasks[0].name.clone();
    let en_name = en_schedule.get(day).unwrap().tasks[0].name.clone();
    assert_eq!(es_name, Locale::Es.default_catalog().entries()[0]);
    assert_eq!(en_name, Locale::En.default_catalog().entries()[0]);
    assert_ne!(es_name, en_name);
}

fn policy() -> impl Strategy<Value = DeficitPolicy> {
    prop_oneof![Just(DeficitPolicy::Rescale), Just(DeficitPolicy::Fill)]
}

proptest! {
    #[test]
    fn every_day_sums_to_target_with_positive_hours(
        day_count in 1usize..=5,
        hours in prop::collection::vec(0.01f64..12.0, 0..40),
        target_hundredths in 400u32..=1000,
        policy in policy(),
    ) {
        let hours: Vec<f64> = hours.into_iter().take(day_count * 8).collect();
        let target = f64::from(target_hundredths) / 100.0;
        let days: Vec<NaiveDate> = (0..day_count)
            .map(|i| d(2026, 3, 2) + Duration::days(i as i64))
            .collect();

        let n = normalizer(target, policy);
        let schedule = n.normalize(allocate(&hours, &days)).unwrap();

        prop_assert_eq!(schedule.len(), day_count);
        for bucket in schedule.iter() {
            prop_assert!((bucket.task_hours() - target).abs() < 1e-6);
            prop_assert!(bucket.tasks.iter().all(|t| t.hours > 0.0));
        }

        let again = n.normalize(allocate(&hours, &days)).unwrap();
        prop_assert_eq!(schedule, again);
    }
}
