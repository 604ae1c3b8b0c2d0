//! JSON file storage for unit state, temperature history and the command log
//!
//! Layout of the data directory:
//! - `ac_state.json`: array of unit rows, rewritten atomically on every command
//! - `temperature_history.jsonl`: one reading per line, appended by external tooling
//! - `command_log.jsonl`: one applied command per line

use serde::Serialize;
use serde_json::{json, Map, Value};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

pub const STATE_FILE: &str = "ac_state.json";
pub const HISTORY_FILE: &str = "temperature_history.jsonl";
pub const COMMAND_LOG_FILE: &str = "command_log.jsonl";

/// One unit row as stored; unknown columns are kept as-is
pub type Row = Map<String, Value>;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Missing file: {0}")]
    Missing(&'static str),
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid JSON in {file}: {source}")]
    Json {
        file: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// A line of the command log
#[derive(Debug, Clone, Serialize)]
pub struct CommandLogEntry {
    pub timestamp: String,
    pub user: String,
    pub command: String,
    pub ac_id: String,
    pub old_value: Value,
    pub new_value: Value,
    pub status: &'static str,
}

fn io_error(path: PathBuf) -> impl FnOnce(std::io::Error) -> StoreError {
    move |source| StoreError::Io { path, source }
}

/// Local timestamp in the format every file and response uses
pub fn now_string() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Row id as text, empty if absent
pub fn row_id(row: &Row) -> &str {
    row.get("ac_id").and_then(Value::as_str).unwrap_or("")
}

#[derive(Debug, Clone)]
pub struct StateStore {
    dir: PathBuf,
}

impl StateStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, file: &str) -> PathBuf {
        self.dir.join(file)
    }

    async fn read_existing(&self, file: &'static str) -> Result<String, StoreError> {
        let path = self.path(file);
        match tokio::fs::read_to_string(&path).await {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(StoreError::Missing(file)),
            Err(source) => Err(StoreError::Io { path, source }),
        }
    }

    /// All unit rows in file order
    pub async fn read_state(&self) -> Result<Vec<Row>, StoreError> {
        let content = self.read_existing(STATE_FILE).await?;
        serde_json::from_str(&content).map_err(|source| StoreError::Json {
            file: STATE_FILE,
            source,
        })
    }

    /// Replace the state file through a temp file and rename
    pub async fn write_state(&self, rows: &[Row]) -> Result<(), StoreError> {
        let path = self.path(STATE_FILE);
        let tmp = self.path(&format!("{}.tmp", STATE_FILE));
        let content = serde_json::to_vec_pretty(rows).map_err(|source| StoreError::Json {
            file: STATE_FILE,
            source,
        })?;

        tokio::fs::write(&tmp, content)
            .await
            .map_err(io_error(tmp.clone()))?;
        tokio::fs::rename(&tmp, &path)
            .await
            .map_err(io_error(path))?;
        debug!(rows = rows.len(), "Wrote unit state");
        Ok(())
    }

    /// The last `limit` history entries for one unit, oldest first. Zero means all.
    pub async fn read_history(&self, ac_id: &str, limit: usize) -> Result<Vec<Row>, StoreError> {
        let content = self.read_existing(HISTORY_FILE).await?;
        let mut entries: Vec<Row> = Vec::new();
        for (n, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<Row>(line) {
                Ok(row) if row_id(&row) == ac_id => entries.push(row),
                Ok(_) => {}
                Err(e) => warn!(line = n + 1, error = %e, "Skipping malformed history line"),
            }
        }
        if limit > 0 && entries.len() > limit {
            entries.drain(..entries.len() - limit);
        }
        Ok(entries)
    }

    /// Append one line to the command log, creating the file if needed
    pub async fn append_command_log(&self, entry: &CommandLogEntry) -> Result<(), StoreError> {
        let path = self.path(COMMAND_LOG_FILE);
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(io_error(self.dir.clone()))?;
        let mut line = serde_json::to_vec(entry).map_err(|source| StoreError::Json {
            file: COMMAND_LOG_FILE,
            source,
        })?;
        line.push(b'\n');

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .map_err(io_error(path.clone()))?;
        file.write_all(&line).await.map_err(io_error(path))?;
        Ok(())
    }

    /// Write demo state and history for three floors with two units each.
    ///
    /// Existing files are left untouched. Returns whether anything was written.
    pub async fn init_demo(&self) -> Result<bool, StoreError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(io_error(self.dir.clone()))?;

        let now = now_string();
        let mut wrote = false;

        if !self.path(STATE_FILE).exists() {
            self.write_state(&demo_rows(&now)).await?;
            info!(path = %self.path(STATE_FILE).display(), "Wrote demo unit state");
            wrote = true;
        }

        let history_path = self.path(HISTORY_FILE);
        if !history_path.exists() {
            let mut content = String::new();
            for row in demo_rows(&now) {
                let base = row.get("current_temp").and_then(Value::as_f64).unwrap_or(24.0);
                for step in 0..12 {
                    let reading = json!({
                        "timestamp": now,
                        "ac_id": row_id(&row),
                        "current_temp": ((base + (step as f64 * 0.7).sin() * 0.8) * 10.0).round() / 10.0,
                    });
                    content.push_str(&reading.to_string());
                    content.push('\n');
                }
            }
            tokio::fs::write(&history_path, content)
                .await
                .map_err(io_error(history_path.clone()))?;
            info!(path = %history_path.display(), "Wrote demo temperature history");
            wrote = true;
        }

        Ok(wrote)
    }
}

fn demo_rows(timestamp: &str) -> Vec<Row> {
    let units = [
        (1, "AC1", "Lobby", "ON", 24.5, 22.0, "Cooling", "Good"),
        (1, "AC2", "Reception", "OFF", 26.0, 24.0, "Fan", "Good"),
        (2, "AC1", "Open Office", "ON", 23.5, 22.0, "Cooling", "Needs filter"),
        (2, "AC2", "Meeting Room", "ON", 21.0, 21.0, "Heating", "Good"),
        (3, "AC1", "Board Room", "ON", 22.5, 21.0, "Cooling", "Good"),
        (3, "AC2", "Server Room", "ON", 19.5, 18.0, "Cooling", "Check compressor"),
    ];

    units
        .iter()
        .map(|(floor, unit, room, status, current, set, mode, health)| {
            let value = json!({
                "ac_id": format!("F{}-{}", floor, unit),
                "floor": floor,
                "room": room,
                "status": status,
                "current_temp": current,
                "set_temp": set,
                "mode": mode,
                "health": health,
                "last_service": "2024-01-15",
                "timestamp": timestamp,
            });
            match value {
                Value::Object(map) => map,
                _ => Row::new(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_state_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = StateStore::new(dir.path());
        let err = store.read_state().await.unwrap_err();
        assert_eq!(err.to_string(), "Missing file: ac_state.json");
    }

    #[tokio::test]
    async fn test_write_then_read_state_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = StateStore::new(dir.path());
        let rows = demo_rows("2024-03-01 10:00:00");
        store.write_state(&rows).await.unwrap();

        assert_eq!(store.read_state().await.unwrap(), rows);
        assert!(!dir.path().join("ac_state.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_history_filters_and_limits() {
        let dir = tempfile::tempdir().unwrap();
        let store = StateStore::new(dir.path());
        let mut content = String::new();
        for i in 0..5 {
            content.push_str(&json!({"ac_id": "F1-AC1", "current_temp": i}).to_string());
            content.push('\n');
            content.push_str(&json!({"ac_id": "F2-AC1", "current_temp": i}).to_string());
            content.push('\n');
        }
        content.push_str("not json\n");
        std::fs::write(dir.path().join(HISTORY_FILE), content).unwrap();

        let entries = store.read_history("F1-AC1", 2).await.unwrap();
        let temps: Vec<i64> = entries
            .iter()
            .map(|r| r["current_temp"].as_i64().unwrap())
            .collect();
        assert_eq!(temps, vec![3, 4]);
        assert_eq!(store.read_history("F1-AC1", 0).await.unwrap().len(), 5);
        assert!(store.read_history("F9-AC9", 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_command_log_appends_lines() {
        let dir = tempfile::tempdir().unwrap();
        let store = StateStore::new(dir.path().join("nested"));
        for value in ["OFF", "ON"] {
            store
                .append_command_log(&CommandLogEntry {
                    timestamp: now_string(),
                    user: "Admin".to_string(),
                    command: format!("turn {} F1-AC2", value),
                    ac_id: "F1-AC2".to_string(),
                    old_value: json!("ON"),
                    new_value: json!(value),
                    status: "Applied",
                })
                .await
                .unwrap();
        }

        let log = std::fs::read_to_string(dir.path().join("nested").join(COMMAND_LOG_FILE)).unwrap();
        let lines: Vec<Value> = log.lines().map(|l| serde_json::from_str(l).unwrap()).collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1]["new_value"], "ON");
        assert_eq!(lines[0]["status"], "Applied");
    }

    #[tokio::test]
    async fn test_init_demo_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = StateStore::new(dir.path());
        assert!(store.init_demo().await.unwrap());
        assert!(!store.init_demo().await.unwrap());

        let rows = store.read_state().await.unwrap();
        let ids: Vec<&str> = rows.iter().map(row_id).collect();
        assert_eq!(ids, vec!["F1-AC1", "F1-AC2", "F2-AC1", "F2-AC2", "F3-AC1", "F3-AC2"]);
        assert_eq!(store.read_history("F2-AC2", 720).await.unwrap().len(), 12);
    }
}
