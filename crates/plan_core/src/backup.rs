use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ImportError;
use crate::habit::Habit;
use crate::store::{DailyLogs, StateStore};

/// The portable snapshot: both collections plus the moment of export.
/// Older exports without a timestamp still restore.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupDocument {
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
    pub habits: Vec<Habit>,
    pub daily_logs: DailyLogs,
}

pub fn export(store: &dyn StateStore) -> anyhow::Result<String> {
    let doc = BackupDocument {
        timestamp: Utc::now(),
        habits: store.load_habits(),
        daily_logs: store.load_daily_logs(),
    };
    Ok(serde_json::to_string_pretty(&doc)?)
}

/// Replace both collections with the contents of `json`. The document is
/// validated in full before anything is written, so a rejected restore
/// leaves the store exactly as it was.
pub fn import(store: &dyn StateStore, json: &str) -> Result<(), ImportError> {
    let doc: BackupDocument = serde_json::from_str(json)?;
    store.save_habits(&doc.habits)?;
    store.save_daily_logs(&doc.daily_logs)?;
    Ok(())
}
