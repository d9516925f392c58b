use super::{PersistenceError, PersistenceResult};
use crate::Schedule;
use crate::calculations::Buckets;
use crate::error::ScheduleError;
use crate::task::{DayBucket, FinalizedTask, RawTaskCandidate, TaskOrigin};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::path::Path;

const MONTH_NAMES: [&str; 12] = [
    "ENERO",
    "FEBRERO",
    "MARZO",
    "ABRIL",
    "MAYO",
    "JUNIO",
    "JULIO",
    "AGOSTO",
    "SEPTIEMBRE",
    "OCTUBRE",
    "NOVIEMBRE",
    "DICIEMBRE",
];

/// `Reporte_<year>_<MES>.<ext>`, the name the timesheet files are filed under.
pub fn report_file_name(year: i32, month: u32, ext: &str) -> Result<String, ScheduleError> {
    let name = month
        .checked_sub(1)
        .and_then(|idx| MONTH_NAMES.get(idx as usize))
        .ok_or_else(|| ScheduleError::config(format!("invalid month {month}")))?;
    Ok(format!("Reporte_{year}_{name}.{ext}"))
}

/// Strip a Markdown code fence around a JSON payload, if there is one.
pub fn extract_json_payload(text: &str) -> &str {
    let inner = if let Some((_, rest)) = text.split_once("```json") {
        rest.split("```").next().unwrap_or(rest)
    } else if let Some((_, rest)) = text.split_once("```") {
        rest.split("```").next().unwrap_or(rest)
    } else {
        text
    };
    inner.trim()
}

pub fn parse_candidates_json(text: &str) -> PersistenceResult<Vec<RawTaskCandidate>> {
    let payload = extract_json_payload(text);
    let raw: Vec<RawTaskCandidate> = serde_json::from_str(payload)?;
    Ok(raw)
}

pub fn load_candidates_from_json<P: AsRef<Path>>(
    path: P,
) -> PersistenceResult<Vec<RawTaskCandidate>> {
    let text = fs::read_to_string(path)?;
    parse_candidates_json(&text)
}

#[derive(Serialize, Deserialize)]
struct ScheduleSnapshot {
    target_daily_hours: f64,
    days: Vec<DayBucket>,
}

impl ScheduleSnapshot {
    fn from_schedule(schedule: &Schedule) -> PersistenceResult<Self> {
        super::validate_schedule(schedule)?;
        Ok(Self {
            target_daily_hours: schedule.target_daily_hours(),
            days: schedule.iter().cloned().collect(),
        })
    }

    fn into_schedule(self) -> PersistenceResult<Schedule> {
        let mut days = Buckets::new();
        for bucket in self.days {
            let date = bucket.date;
            if days.insert(date, bucket).is_some() {
                return Err(PersistenceError::InvalidData(format!(
                    "day {date} appears more than once"
                )));
            }
        }
        let schedule = Schedule::new(self.target_daily_hours, days);
        super::validate_schedule(&schedule)?;
        Ok(schedule)
    }
}

pub fn save_schedule_to_json<P: AsRef<Path>>(
    schedule: &Schedule,
    path: P,
) -> PersistenceResult<()> {
    let snapshot = ScheduleSnapshot::from_schedule(schedule)?;
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, &snapshot)?;
    Ok(())
}

pub fn load_schedule_from_json<P: AsRef<Path>>(path: P) -> PersistenceResult<Schedule> {
    let file = File::open(path)?;
    let snapshot: ScheduleSnapshot = serde_json::from_reader(file)?;
    snapshot.into_schedule()
}

/// One timesheet row: a task on a day.
#[derive(Debug, Serialize, Deserialize)]
struct TimesheetCsvRecord {
    date: String,
    day: u32,
    task_name: String,
    client_project: String,
    hours: String,
    origin: String,
}

impl TimesheetCsvRecord {
    fn new(date: NaiveDate, task: &FinalizedTask) -> Self {
        Self {
            date: date.format("%Y-%m-%d").to_string(),
            day: date.day(),
            task_name: task.name.clone(),
            client_project: task.project.clone(),
            hours: format!("{:.2}", task.hours),
            origin: task.origin.as_str().to_string(),
        }
    }

    fn into_parts(self) -> PersistenceResult<(NaiveDate, FinalizedTask)> {
        let date = NaiveDate::parse_from_str(self.date.trim(), "%Y-%m-%d").map_err(|e| {
            PersistenceError::InvalidData(format!("invalid date '{}': {e}", self.date))
        })?;
        let hours = self.hours.trim().parse::<f64>().map_err(|e| {
            PersistenceError::InvalidData(format!("invalid hours '{}': {e}", self.hours))
        })?;
        let origin = match self.origin.trim() {
            "candidate" => TaskOrigin::Candidate,
            "filler" => TaskOrigin::Filler,
            other => {
                return Err(PersistenceError::InvalidData(format!(
                    "unknown origin '{other}'"
                )));
            }
        };
        Ok((
            date,
            FinalizedTask {
                name: self.task_name,
                project: self.client_project,
                hours,
                origin,
            },
        ))
    }
}

/// Write one row per task, days in calendar order and tasks in bucket order.
pub fn save_schedule_to_csv<P: AsRef<Path>>(
    schedule: &Schedule,
    path: P,
) -> PersistenceResult<()> {
    super::validate_schedule(schedule)?;
    let mut writer = csv::Writer::from_path(path)?;
    for bucket in schedule.iter() {
        for task in &bucket.tasks {
            writer.serialize(TimesheetCsvRecord::new(bucket.date, task))?;
        }
    }
    writer.flush()?;
    Ok(())
}

pub fn load_schedule_from_csv<P: AsRef<Path>>(
    path: P,
    target_daily_hours: f64,
) -> PersistenceResult<Schedule> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut days = Buckets::new();
    for record in reader.deserialize::<TimesheetCsvRecord>() {
        let (date, task) = record?.into_parts()?;
        days.entry(date)
            .or_insert_with(|| DayBucket::new(date))
            .push(task);
    }

    if days.is_empty() {
        return Err(PersistenceError::InvalidData(
            "CSV file contained no tasks".into(),
        ));
    }

    let schedule = Schedule::new(target_daily_hours, days);
    super::validate_schedule(&schedule)?;
    Ok(schedule)
}
