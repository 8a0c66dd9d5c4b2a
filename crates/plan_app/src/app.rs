use std::fs;
use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use chrono::{Local, NaiveDate};
use plan_core::habit::{EffectiveType, HabitDraft, Priority};
use plan_core::stats;
use plan_core::store::JsonFileStore;
use plan_core::task::Task;
use plan_core::PlannerService;
use tracing::info;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub data_dir: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        if let Ok(dir) = std::env::var("PLANNER_DATA_DIR") {
            return Ok(Self {
                data_dir: PathBuf::from(dir),
            });
        }
        let base = dirs::data_dir()
            .ok_or_else(|| anyhow!("no platform data directory; set PLANNER_DATA_DIR"))?;
        Ok(Self {
            data_dir: base.join("planner"),
        })
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(".planner"),
        }
    }
}

pub fn run(config: AppConfig) -> Result<()> {
    info!(data_dir = %config.data_dir.display(), "opening planner store");
    let store = JsonFileStore::open(&config.data_dir)?;
    let service = PlannerService::builder()
        .with_store(Box::new(store))
        .build()?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some((command, rest)) = args.split_first() else {
        print_usage();
        return Ok(());
    };

    match command.as_str() {
        "today" => show_day(&service, Local::now().date_naive()),
        "day" => show_day(&service, parse_date(rest.first())?),
        "habits" => list_habits(&service),
        "add-habit" => add_habit(&service, rest),
        "delete-habit" => {
            let id = required(rest.first(), "habit id")?;
            service.delete_habit(id)?;
            println!("habit {id} deleted");
            Ok(())
        }
        "schedule" => {
            let (date, mut task) = lookup_task(&service, rest)?;
            let slot = required(rest.get(2), "time slot (HH:00)")?;
            task.schedule(slot.clone());
            service.update_task(task)?;
            show_day(&service, date)
        }
        "complete" => {
            let (date, mut task) = lookup_task(&service, rest)?;
            task.complete();
            service.update_task(task)?;
            show_day(&service, date)
        }
        "drop" => {
            let (date, task) = lookup_task(&service, rest)?;
            service.delete_task_from_day(&task.id, date)?;
            println!("task {} dropped for {date}", task.id);
            Ok(())
        }
        "drop-rule" => {
            // Permanently give the slot back: shrink the habit's quota first,
            // then soft-delete today's instance, the order the UI uses.
            let (date, task) = lookup_task(&service, rest)?;
            service.reduce_habit_quota(&task.habit_id)?;
            service.delete_task_from_day(&task.id, date)?;
            println!("task {} dropped and habit quota reduced", task.id);
            Ok(())
        }
        "stats" => show_stats(&service),
        "export" => {
            let snapshot = service.export_json()?;
            match rest.first() {
                Some(path) => {
                    fs::write(path, snapshot).with_context(|| format!("writing {path}"))?;
                    println!("exported to {path}");
                }
                None => println!("{snapshot}"),
            }
            Ok(())
        }
        "import" => {
            let path = required(rest.first(), "backup file")?;
            let json =
                fs::read_to_string(path).with_context(|| format!("reading {path}"))?;
            service
                .import_json(&json)
                .map_err(|err| anyhow!("import failed: {err}"))?;
            println!("backup restored from {path}");
            Ok(())
        }
        other => {
            print_usage();
            bail!("unknown command `{other}`")
        }
    }
}

fn show_day(service: &PlannerService, date: NaiveDate) -> Result<()> {
    let day = service.initialize_day(date)?;
    println!("{date}  ({} tasks)", day.tasks.len());
    for task in &day.tasks {
        let slot = task.start_time.as_deref().unwrap_or("--:--");
        println!(
            "  {}  {:?} {:>9}  {:>3}m  {}  [{}]",
            slot,
            task.priority,
            format!("{:?}", task.status).to_lowercase(),
            task.duration_minutes,
            task.name,
            task.id
        );
    }
    Ok(())
}

fn list_habits(service: &PlannerService) -> Result<()> {
    for habit in service.habits() {
        let window = match (habit.start_date, habit.end_date) {
            (None, None) => String::from("permanent"),
            (start, end) => format!(
                "{} .. {}",
                start.map_or_else(|| "open".to_string(), |d| d.to_string()),
                end.map_or_else(|| "open".to_string(), |d| d.to_string())
            ),
        };
        println!(
            "  {:?} x{}  {:>3}m  {}  {}  [{}]",
            habit.priority,
            habit.daily_quota,
            habit.default_duration_minutes,
            habit.name,
            window,
            habit.id
        );
    }
    Ok(())
}

fn add_habit(service: &PlannerService, args: &[String]) -> Result<()> {
    let name = required(args.first(), "habit name")?.clone();
    let priority = parse_priority(required(args.get(1), "priority (P1|P2|P3)")?)?;
    let quota: u32 = required(args.get(2), "daily quota")?
        .parse()
        .context("daily quota must be a number")?;
    let minutes: u32 = required(args.get(3), "duration minutes")?
        .parse()
        .context("duration must be a number")?;
    let start_date = args.get(4).map(|s| parse_date(Some(s))).transpose()?;
    let end_date = args.get(5).map(|s| parse_date(Some(s))).transpose()?;
    let effective_type = if start_date.is_some() || end_date.is_some() {
        EffectiveType::Range
    } else {
        EffectiveType::Permanent
    };

    let habit = service.add_habit(HabitDraft {
        name,
        priority,
        daily_quota: quota.max(1),
        duration_minutes: minutes.max(1),
        effective_type,
        start_date,
        end_date,
    })?;
    println!("added habit {} [{}]", habit.name, habit.id);
    Ok(())
}

fn show_stats(service: &PlannerService) -> Result<()> {
    let stats_map = service.yearly_stats();
    for (date, minutes) in &stats_map {
        println!(
            "  {date}  {:>4}m  level {}",
            minutes,
            stats::heat_level(*minutes)
        );
    }
    let grid = stats::contribution_grid(&stats_map, Local::now().date_naive());
    let total = stats::total_minutes(&grid);
    println!("last year: {:.1}h focused", f64::from(total) / 60.0);
    Ok(())
}

fn lookup_task(service: &PlannerService, args: &[String]) -> Result<(NaiveDate, Task)> {
    let date = parse_date(args.first())?;
    let id = required(args.get(1), "task id")?;
    let day = service.initialize_day(date)?;
    let task = day
        .tasks
        .into_iter()
        .find(|task| &task.id == id)
        .ok_or_else(|| anyhow!("no task {id} on {date}"))?;
    Ok((date, task))
}

fn parse_date(arg: Option<&String>) -> Result<NaiveDate> {
    let raw = required(arg, "date (YYYY-MM-DD)")?;
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").with_context(|| format!("invalid date `{raw}`"))
}

fn parse_priority(raw: &str) -> Result<Priority> {
    match raw {
        "P1" | "p1" => Ok(Priority::P1),
        "P2" | "p2" => Ok(Priority::P2),
        "P3" | "p3" => Ok(Priority::P3),
        other => bail!("invalid priority `{other}` (expected P1, P2 or P3)"),
    }
}

fn required<'a>(arg: Option<&'a String>, what: &str) -> Result<&'a String> {
    arg.ok_or_else(|| anyhow!("missing argument: {what}"))
}

fn print_usage() {
    println!("planner <command>");
    println!();
    println!("  today                                     dispatch and show today's tasks");
    println!("  day <date>                                dispatch and show one day");
    println!("  habits                                    list habit rules");
    println!("  add-habit <name> <P1|P2|P3> <quota> <min> [start] [end]");
    println!("  delete-habit <id>                         remove a rule and its inbox tasks");
    println!("  schedule <date> <task-id> <HH:00>         pin a task to a slot");
    println!("  complete <date> <task-id>                 mark a task done");
    println!("  drop <date> <task-id>                     remove a task for that day only");
    println!("  drop-rule <date> <task-id>                remove the slot from the rule too");
    println!("  stats                                     completed minutes per day");
    println!("  export [file]                             dump a backup document");
    println!("  import <file>                             restore a backup document");
}
