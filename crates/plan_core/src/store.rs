use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use parking_lot::RwLock;
use serde::{de::DeserializeOwned, Serialize};
use tracing::warn;

use crate::day::DailyData;
use crate::habit::Habit;

/// All per-day records, keyed by date.
pub type DailyLogs = BTreeMap<NaiveDate, DailyData>;

/// Durable home of the two top-level collections. Loads never fail: a
/// missing or unreadable collection yields its empty default so a corrupt
/// store can not take the whole planner down.
pub trait StateStore: Send + Sync {
    fn load_habits(&self) -> Vec<Habit>;
    fn save_habits(&self, habits: &[Habit]) -> Result<()>;
    fn load_daily_logs(&self) -> DailyLogs;
    fn save_daily_logs(&self, logs: &DailyLogs) -> Result<()>;
}

const HABITS_FILE: &str = "habits.json";
const DAILY_LOGS_FILE: &str = "daily_logs.json";

/// File-backed store: one JSON document per collection under a data
/// directory. Single-writer by design; writes replace the whole collection.
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)
            .with_context(|| format!("creating data directory {}", dir.display()))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn read_or_default<T: DeserializeOwned + Default>(&self, file: &str) -> T {
        let path = self.dir.join(file);
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return T::default(),
            Err(err) => {
                warn!(file, %err, "unable to read stored collection, falling back to empty");
                return T::default();
            }
        };
        match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(err) => {
                warn!(file, %err, "stored collection is malformed, falling back to empty");
                T::default()
            }
        }
    }

    fn write<T: Serialize>(&self, file: &str, value: &T) -> Result<()> {
        let path = self.dir.join(file);
        let json = serde_json::to_string_pretty(value)?;
        fs::write(&path, json).with_context(|| format!("writing {}", path.display()))
    }
}

impl StateStore for JsonFileStore {
    fn load_habits(&self) -> Vec<Habit> {
        self.read_or_default(HABITS_FILE)
    }

    fn save_habits(&self, habits: &[Habit]) -> Result<()> {
        self.write(HABITS_FILE, &habits)
    }

    fn load_daily_logs(&self) -> DailyLogs {
        self.read_or_default(DAILY_LOGS_FILE)
    }

    fn save_daily_logs(&self, logs: &DailyLogs) -> Result<()> {
        self.write(DAILY_LOGS_FILE, logs)
    }
}

/// In-memory store, primarily a test double.
#[derive(Default)]
pub struct MemoryStore {
    habits: RwLock<Vec<Habit>>,
    logs: RwLock<DailyLogs>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateStore for MemoryStore {
    fn load_habits(&self) -> Vec<Habit> {
        self.habits.read().clone()
    }

    fn save_habits(&self, habits: &[Habit]) -> Result<()> {
        *self.habits.write() = habits.to_vec();
        Ok(())
    }

    fn load_daily_logs(&self) -> DailyLogs {
        self.logs.read().clone()
    }

    fn save_daily_logs(&self, logs: &DailyLogs) -> Result<()> {
        *self.logs.write() = logs.clone();
        Ok(())
    }
}
