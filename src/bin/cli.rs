use chrono::{Datelike, Local};
use serde_json::Value;
use std::io::{self, Write};
use timesheet_scheduler::{
    MonthlyPlanner, PlanOutcome, RawTaskCandidate, ReportConfig, load_candidates_from_json,
    report_file_name, save_schedule_to_csv, save_schedule_to_json,
};

struct Session {
    config: ReportConfig,
    planner: MonthlyPlanner,
    year: i32,
    month: u32,
    tasks: Vec<RawTaskCandidate>,
    outcome: Option<PlanOutcome>,
}

impl Session {
    fn new(config: ReportConfig) -> Result<Self, String> {
        let planner = MonthlyPlanner::from_config(&config).map_err(|e| e.to_string())?;
        Ok(Self {
            year: config.year,
            month: Local::now().month(),
            config,
            planner,
            tasks: Vec::new(),
            outcome: None,
        })
    }

    fn set_config(&mut self, config: ReportConfig) -> Result<(), String> {
        self.planner = MonthlyPlanner::from_config(&config).map_err(|e| e.to_string())?;
        self.year = config.year;
        self.config = config;
        self.outcome = None;
        Ok(())
    }
}

fn render_row<'a>(widths: &[usize], cells: impl Iterator<Item = &'a str>) -> String {
    let mut line = String::from("|");
    for (ci, cell) in cells.enumerate() {
        line.push(' ');
        line.push_str(cell);
        let pad = widths[ci].saturating_sub(cell.chars().count());
        if pad > 0 {
            line.push_str(&" ".repeat(pad));
        }
        line.push_str(" |");
    }
    line
}

fn render_text_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (ci, cell) in row.iter().enumerate() {
            let len = cell.chars().count();
            if len > widths[ci] {
                widths[ci] = len;
            }
        }
    }

    let mut sep = String::new();
    sep.push('+');
    for w in &widths {
        sep.push_str(&"-".repeat(*w + 2));
        sep.push('+');
    }

    let mut out = String::new();
    out.push_str(&sep);
    out.push('\n');
    out.push_str(&render_row(&widths, headers.iter().copied()));
    out.push('\n');
    out.push_str(&sep);
    out.push('\n');
    for row in rows {
        out.push_str(&render_row(&widths, row.iter().map(String::as_str)));
        out.push('\n');
    }
    out.push_str(&sep);
    out.push('\n');
    out
}

fn render_outcome(outcome: &PlanOutcome) -> String {
    let mut rows = Vec::new();
    for bucket in outcome.schedule.iter() {
        for task in &bucket.tasks {
            rows.push(vec![
                bucket.date.to_string(),
                task.name.clone(),
                task.project.clone(),
                format!("{:.2}", task.hours),
                task.origin.as_str().to_string(),
            ]);
        }
    }
    let mut out = render_text_table(&["date", "task", "project", "hours", "origin"], &rows);
    for bucket in outcome.schedule.iter() {
        out.push_str(&format!(
            "[{}]: {} tasks, {:.2} hours\n",
            bucket.date,
            bucket.tasks.len(),
            bucket.task_hours()
        ));
    }
    out
}

fn render_tasks(tasks: &[RawTaskCandidate]) -> String {
    let rows: Vec<Vec<String>> = tasks
        .iter()
        .enumerate()
        .map(|(i, t)| {
            vec![
                (i + 1).to_string(),
                t.task_name.clone(),
                t.client_project.clone().unwrap_or_default(),
                t.hours.as_ref().map(ToString::to_string).unwrap_or_default(),
            ]
        })
        .collect();
    render_text_table(&["#", "task", "project", "hours"], &rows)
}

fn print_help() {
    println!(
        "Commands:\n  help                               Show this help\n  config <path.toml>                 Load report settings\n  month <year> <month>               Select the month to plan\n  holidays [year]                    List holidays for the configured country\n  days                               List business days of the selected month\n  add <hours> <project|-> <name...>  Add a task candidate\n  load <path.json>                   Append task candidates from a JSON file\n  tasks                              List task candidates\n  clear                              Remove all task candidates\n  compute                            Build the schedule for the selected month\n  show                               Show the last computed schedule\n  save json|csv [path]               Save the last computed schedule\n  quit|exit                          Exit"
    );
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => match ReportConfig::load(&path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error loading config {path}: {e}");
                std::process::exit(1);
            }
        },
        None => ReportConfig::default(),
    };
    let mut session = match Session::new(config) {
        Ok(session) => session,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    println!("Timesheet Scheduler (CLI) - type 'help' for commands\n");

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        let _ = io::stdout().flush();
        line.clear();
        match stdin.read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        let mut parts = input.split_whitespace();
        let cmd = parts.next().unwrap_or("");

        match cmd {
            "help" => print_help(),
            "quit" | "exit" => break,
            "config" => match parts.next() {
                Some(path) => match ReportConfig::load(path) {
                    Ok(config) => match session.set_config(config) {
                        Ok(()) => println!("Config loaded from {path}."),
                        Err(e) => println!("Error: {e}"),
                    },
                    Err(e) => println!("Error: {e}"),
                },
                None => println!("Usage: config <path.toml>"),
            },
            "month" => {
                let year_s = parts.next();
                let month_s = parts.next();
                match (year_s, month_s) {
                    (Some(year_s), Some(month_s)) => {
                        let year: i32 = match year_s.parse() { Ok(v) => v, Err(_) => { println!("Invalid year"); continue; } };
                        let month: u32 = match month_s.parse() { Ok(v) => v, Err(_) => { println!("Invalid month"); continue; } };
                        match session.planner.business_days(year, month) {
                            Ok(days) => {
                                session.year = year;
                                session.month = month;
                                session.outcome = None;
                                println!("Business days in {year}-{month:02}: {}", days.len());
                            }
                            Err(e) => println!("Error: {e}"),
                        }
                    }
                    _ => println!("Usage: month <year> <month>"),
                }
            }
            "holidays" => {
                let year: i32 = match parts.next() {
                    Some(s) => match s.parse() { Ok(v) => v, Err(_) => { println!("Invalid year"); continue; } },
                    None => session.year,
                };
                let holidays = session.planner.calendar().holidays(year);
                println!("Holidays {} {year}: {}", session.planner.calendar().country(), holidays.len());
                for (date, name) in holidays.iter() {
                    println!("  {date} ({}) {name}", date.weekday());
                }
            }
            "days" => match session.planner.business_days(session.year, session.month) {
                Ok(days) => {
                    println!("Business days in {}-{:02}: {}", session.year, session.month, days.len());
                    for day in days {
                        println!("  {day} ({})", day.weekday());
                    }
                }
                Err(e) => println!("Error: {e}"),
            },
            "add" => {
                let hours_s = parts.next();
                let project_s = parts.next();
                let name: Vec<&str> = parts.collect();
                match (hours_s, project_s, !name.is_empty()) {
                    (Some(hours_s), Some(project_s), true) => {
                        let hours = match hours_s.parse::<f64>().ok().and_then(serde_json::Number::from_f64) {
                            Some(n) => Value::Number(n),
                            None => Value::String(hours_s.to_string()),
                        };
                        session.tasks.push(RawTaskCandidate {
                            task_name: name.join(" "),
                            client_project: (project_s != "-").then(|| project_s.to_string()),
                            hours: Some(hours),
                        });
                        println!("Task added ({} total).", session.tasks.len());
                    }
                    _ => println!("Usage: add <hours> <project|-> <name...>"),
                }
            }
            "load" => match parts.next() {
                Some(path) => match load_candidates_from_json(path) {
                    Ok(tasks) => {
                        let count = tasks.len();
                        session.tasks.extend(tasks);
                        println!("Loaded {count} task(s) from {path}.");
                    }
                    Err(e) => println!("Error: {e}"),
                },
                None => println!("Usage: load <path.json>"),
            },
            "tasks" => println!("{}", render_tasks(&session.tasks)),
            "clear" => {
                session.tasks.clear();
                session.outcome = None;
                println!("Tasks cleared.");
            }
            "compute" => {
                match session.planner.plan_raw(session.year, session.month, session.tasks.clone()) {
                    Ok(outcome) => {
                        for issue in &outcome.issues {
                            println!("Warning: {issue}");
                        }
                        for day in &outcome.crowded_days {
                            println!(
                                "Warning: {day} holds more than {} tasks",
                                session.config.max_tasks_per_day
                            );
                        }
                        println!(
                            "Computed ({})\n{}",
                            outcome.schedule.summary().to_cli_summary(),
                            render_outcome(&outcome)
                        );
                        session.outcome = Some(outcome);
                    }
                    Err(e) => println!("Compute error: {e}"),
                }
            }
            "show" => match &session.outcome {
                Some(outcome) => println!("{}", render_outcome(outcome)),
                None => println!("No schedule computed yet. Run 'compute'."),
            },
            "save" => {
                let format = parts.next();
                let path = parts.next();
                let Some(outcome) = &session.outcome else {
                    println!("No schedule computed yet. Run 'compute'.");
                    continue;
                };
                match format {
                    Some(fmt @ ("json" | "csv")) => {
                        let path = match path {
                            Some(p) => p.to_string(),
                            None => match report_file_name(outcome.year, outcome.month, fmt) {
                                Ok(name) => name,
                                Err(e) => { println!("Error: {e}"); continue; }
                            },
                        };
                        let res = if fmt == "json" {
                            save_schedule_to_json(&outcome.schedule, &path)
                        } else {
                            save_schedule_to_csv(&outcome.schedule, &path)
                        };
                        match res {
                            Ok(()) => println!("Schedule saved to {path}."),
                            Err(e) => println!("Error: {e}"),
                        }
                    }
                    _ => println!("Usage: save json|csv [path]"),
                }
            }
            _ => {
                println!("Unknown command. Type 'help'.");
            }
        }
    }
}
