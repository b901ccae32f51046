//! SQLite store holding the result of the last successful poll cycle

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension};
use thiserror::Error;
use tracing::{debug, info};

use crate::monitor::cycle::PollResult;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(i64),

    #[error("Database lock poisoned")]
    LockPoisoned,
}

/// Last stored result and when it was produced
#[derive(Debug, Clone, PartialEq)]
pub struct StoredResult {
    pub result: PollResult,
    pub updated_at: DateTime<Utc>,
}

pub struct ResultStore {
    conn: Mutex<Connection>,
}

impl ResultStore {
    pub fn open(db_path: &Path) -> Result<Self, StoreError> {
        info!("Opening result store at {:?}", db_path);

        let conn = Connection::open(db_path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;

        let store = Self {
            conn: Mutex::new(conn),
        };
        store.create_schema()?;

        Ok(store)
    }

    fn lock_conn(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn.lock().map_err(|_| StoreError::LockPoisoned)
    }

    fn create_schema(&self) -> Result<(), StoreError> {
        debug!("Creating result store schema");

        let conn = self.lock_conn()?;

        // Single row, replaced on every save
        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS last_result (
                id INTEGER PRIMARY KEY CHECK (id = 1),
                payload TEXT NOT NULL,
                updated_at INTEGER NOT NULL
            )
            "#,
            [],
        )?;

        Ok(())
    }

    /// Replace the stored result
    pub fn save(&self, result: &PollResult, updated_at: DateTime<Utc>) -> Result<(), StoreError> {
        let payload = serde_json::to_string(result)?;
        let conn = self.lock_conn()?;

        conn.execute(
            "INSERT OR REPLACE INTO last_result (id, payload, updated_at) VALUES (1, ?1, ?2)",
            (payload, updated_at.timestamp_millis()),
        )?;

        debug!(
            "Stored result with {} changes over {} releases",
            result.changes.len(),
            result.versions.len()
        );
        Ok(())
    }

    /// Load the stored result, or None if nothing was saved yet
    pub fn load(&self) -> Result<Option<StoredResult>, StoreError> {
        let conn = self.lock_conn()?;

        let row = conn
            .query_row(
                "SELECT payload, updated_at FROM last_result WHERE id = 1",
                [],
                |row| Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?)),
            )
            .optional()?;

        let Some((payload, updated_at_ms)) = row else {
            return Ok(None);
        };

        let result = serde_json::from_str(&payload)?;
        let updated_at = DateTime::from_timestamp_millis(updated_at_ms)
            .ok_or(StoreError::InvalidTimestamp(updated_at_ms))?;

        Ok(Some(StoredResult { result, updated_at }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::version::types::ChangeRecord;
    use chrono::TimeZone;
    use std::collections::BTreeSet;
    use tempfile::TempDir;

    fn create_test_store() -> (TempDir, ResultStore) {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test.db");
        let store = ResultStore::open(&db_path).unwrap();
        (temp_dir, store)
    }

    fn result_for(versions: &[&str], integration: &str) -> PollResult {
        PollResult {
            changes: vec![ChangeRecord {
                title: Some(format!("{} change", integration)),
                integration: integration.to_string(),
                description: Some("details".to_string()),
            }],
            versions: versions.iter().map(|v| v.to_string()).collect(),
            covered: versions.iter().map(|v| v.to_string()).collect::<BTreeSet<_>>(),
        }
    }

    #[test]
    fn load_returns_none_when_nothing_saved() {
        let (_temp_dir, store) = create_test_store();

        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn save_then_load_returns_result() {
        let (_temp_dir, store) = create_test_store();
        let updated_at = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let result = result_for(&["2024.5", "2024.6"], "hue");

        store.save(&result, updated_at).unwrap();

        assert_eq!(
            store.load().unwrap(),
            Some(StoredResult {
                result,
                updated_at
            })
        );
    }

    #[test]
    fn save_replaces_previous_result() {
        let (_temp_dir, store) = create_test_store();
        let first = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let second = Utc.with_ymd_and_hms(2024, 6, 1, 12, 5, 0).unwrap();

        store.save(&result_for(&["2024.5"], "hue"), first).unwrap();
        store
            .save(&result_for(&["2024.6", "2024.7"], "mqtt"), second)
            .unwrap();

        let stored = store.load().unwrap().unwrap();
        assert_eq!(stored.result, result_for(&["2024.6", "2024.7"], "mqtt"));
        assert_eq!(stored.updated_at, second);
    }

    #[test]
    fn reopened_store_keeps_result() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test.db");
        let updated_at = Utc.with_ymd_and_hms(2025, 1, 10, 8, 30, 0).unwrap();

        {
            let store = ResultStore::open(&db_path).unwrap();
            store
                .save(&result_for(&["2025.1"], "zha"), updated_at)
                .unwrap();
        }

        let store = ResultStore::open(&db_path).unwrap();
        let stored = store.load().unwrap().unwrap();
        assert_eq!(stored.result.versions, vec!["2025.1"]);
    }
}
