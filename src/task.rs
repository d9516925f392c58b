use crate::error::MalformedTask;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Hours given to a candidate whose estimate is missing or unusable.
pub const DEFAULT_TASK_HOURS: f64 = 1.0;

/// A unit of work to be placed on the calendar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskCandidate {
    pub name: String,
    pub project: String,
    pub hours: f64,
}

impl TaskCandidate {
    pub fn new(name: impl Into<String>, project: impl Into<String>, hours: f64) -> Self {
        Self {
            name: name.into(),
            project: project.into(),
            hours,
        }
    }
}

/// Candidate as emitted by the task generator, before hours are validated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawTaskCandidate {
    #[serde(alias = "name")]
    pub task_name: String,
    #[serde(default, alias = "project", skip_serializing_if = "Option::is_none")]
    pub client_project: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hours: Option<Value>,
}

impl RawTaskCandidate {
    pub fn new(task_name: impl Into<String>, hours: f64) -> Self {
        Self {
            task_name: task_name.into(),
            client_project: None,
            hours: serde_json::Number::from_f64(hours).map(Value::Number),
        }
    }
}

/// Validated candidates plus the records of every substitution made.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Intake {
    pub candidates: Vec<TaskCandidate>,
    pub issues: Vec<MalformedTask>,
}

/// Turn generator output into candidates, coercing bad hours to [`DEFAULT_TASK_HOURS`].
pub fn intake(raw: Vec<RawTaskCandidate>, default_project: &str) -> Intake {
    let mut out = Intake {
        candidates: Vec::with_capacity(raw.len()),
        issues: Vec::new(),
    };

    for (index, item) in raw.into_iter().enumerate() {
        let hours = match parse_hours(item.hours.as_ref()) {
            Ok(hours) => hours,
            Err(reason) => {
                let issue = MalformedTask {
                    index,
                    name: item.task_name.clone(),
                    reason,
                    substituted: DEFAULT_TASK_HOURS,
                };
                tracing::warn!("{issue}");
                out.issues.push(issue);
                DEFAULT_TASK_HOURS
            }
        };

        let project = item
            .client_project
            .filter(|p| !p.trim().is_empty())
            .unwrap_or_else(|| default_project.to_string());
        out.candidates
            .push(TaskCandidate::new(item.task_name, project, hours));
    }
    out
}

fn parse_hours(value: Option<&Value>) -> Result<f64, String> {
    let hours = match value {
        None | Some(Value::Null) => return Err("missing hours".to_string()),
        Some(Value::Number(n)) => n
            .as_f64()
            .ok_or_else(|| format!("hours {n} is not representable"))?,
        Some(Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| format!("hours '{s}' is not a number"))?,
        Some(other) => return Err(format!("hours {other} is not a number")),
    };

    if !hours.is_finite() {
        return Err(format!("hours {hours} is not finite"));
    }
    if hours <= 0.0 {
        return Err(format!("hours {hours} is not positive"));
    }
    Ok(hours)
}

/// Where a scheduled task came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskOrigin {
    Candidate,
    Filler,
}

impl TaskOrigin {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskOrigin::Candidate => "candidate",
            TaskOrigin::Filler => "filler",
        }
    }
}

/// A task placed on a day. Hours are final once normalization has run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalizedTask {
    pub name: String,
    pub project: String,
    pub hours: f64,
    pub origin: TaskOrigin,
}

impl FinalizedTask {
    pub fn filler(name: impl Into<String>, project: impl Into<String>, hours: f64) -> Self {
        Self {
            name: name.into(),
            project: project.into(),
            hours,
            origin: TaskOrigin::Filler,
        }
    }
}

impl From<&TaskCandidate> for FinalizedTask {
    fn from(candidate: &TaskCandidate) -> Self {
        Self {
            name: candidate.name.clone(),
            project: candidate.project.clone(),
            hours: candidate.hours,
            origin: TaskOrigin::Candidate,
        }
    }
}

/// Per-day accumulator of tasks and hours.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayBucket {
    pub date: NaiveDate,
    pub tasks: Vec<FinalizedTask>,
    /// Running total kept by the allocator; recomputed after normalization.
    pub hours: f64,
}

impl DayBucket {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            tasks: Vec::new(),
            hours: 0.0,
        }
    }

    pub fn push(&mut self, task: FinalizedTask) {
        self.hours += task.hours;
        self.tasks.push(task);
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn task_hours(&self) -> f64 {
        self.tasks.iter().map(|t| t.hours).sum()
    }

    pub fn candidate_count(&self) -> usize {
        self.tasks
            .iter()
            .filter(|t| t.origin == TaskOrigin::Candidate)
            .count()
    }

    pub fn filler_count(&self) -> usize {
        self.tasks.len() - self.candidate_count()
    }
}
