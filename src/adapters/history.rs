//! History log storage.
//!
//! `SqliteHistory` keeps one row per sent message in a `history` table:
//!
//! - `id`: INTEGER PRIMARY KEY AUTOINCREMENT
//! - `tel`: VARCHAR(30) NOT NULL
//! - `last_message`: TIMESTAMP NOT NULL (RFC 3339, UTC, microseconds)
//!
//! Rows written as naive ISO-8601 local time (no offset) are read as local time.
//! Rows whose timestamp cannot be read at all are skipped with a warning.

use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, Local, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use rusqlite::{params, Connection};
use tracing::{debug, info, warn};

use crate::domain::model::HistoryEntry;
use crate::domain::ports::HistoryLog;
use crate::utils::error::{ModemError, Result};

pub struct SqliteHistory {
    conn: Connection,
}

impl SqliteHistory {
    /// Opens (or creates) the database file and the `history` table.
    pub fn open<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let db_path = db_path.as_ref();
        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let existed = db_path.exists();
        let conn = Connection::open(db_path)?;
        if !existed {
            info!("🗄️ Creating history database: {}", db_path.display());
        }

        Self::with_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        let history = Self { conn };
        history.init_schema()?;
        Ok(history)
    }

    fn init_schema(&self) -> Result<()> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS history (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                tel VARCHAR(30) NOT NULL,
                last_message TIMESTAMP NOT NULL
            );
            "#,
        )?;

        debug!("History table ready");
        Ok(())
    }
}

impl HistoryLog for SqliteHistory {
    fn append(&self, telephone_number: &str, timestamp: DateTime<Utc>) -> Result<()> {
        self.conn.execute(
            "INSERT INTO history (tel, last_message) VALUES (?1, ?2)",
            params![telephone_number, format_timestamp(timestamp)],
        )?;

        debug!("Recorded history entry for {}", telephone_number);
        Ok(())
    }

    fn query_all(&self) -> Result<Vec<HistoryEntry>> {
        let mut stmt = self
            .conn
            .prepare("SELECT tel, last_message FROM history ORDER BY id DESC")?;

        let rows = stmt
            .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut entries = Vec::with_capacity(rows.len());
        for (telephone_number, raw) in rows {
            match parse_timestamp(&raw) {
                Ok(last_message_time) => entries.push(HistoryEntry {
                    telephone_number,
                    last_message_time,
                }),
                Err(e) => warn!("⚠️ Skipping history row for {}: {}", telephone_number, e),
            }
        }

        // Stable: rows with equal times keep newest-insert-first order.
        entries.sort_by(|a, b| b.last_message_time.cmp(&a.last_message_time));
        Ok(entries)
    }
}

pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(parsed.with_timezone(&Utc));
    }

    let naive = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
        .map_err(|e| ModemError::ResponseParse {
            message: format!("invalid history timestamp '{}': {}", raw, e),
        })?;

    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|local| local.with_timezone(&Utc))
        .ok_or_else(|| ModemError::ResponseParse {
            message: format!("history timestamp '{}' does not exist in local time", raw),
        })
}

/// In-process history for callers that do not persist it.
#[derive(Debug, Default)]
pub struct MemoryHistory {
    entries: Mutex<Vec<HistoryEntry>>,
}

impl MemoryHistory {
    pub fn new() -> Self {
        Self::default()
    }
}

impl HistoryLog for MemoryHistory {
    fn append(&self, telephone_number: &str, timestamp: DateTime<Utc>) -> Result<()> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.push(HistoryEntry {
            telephone_number: telephone_number.to_string(),
            last_message_time: timestamp,
        });
        Ok(())
    }

    fn query_all(&self) -> Result<Vec<HistoryEntry>> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        let mut sorted: Vec<HistoryEntry> = entries.iter().rev().cloned().collect();
        sorted.sort_by(|a, b| b.last_message_time.cmp(&a.last_message_time));
        Ok(sorted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_sqlite_history_orders_by_time_descending() {
        let history = SqliteHistory::open_in_memory().unwrap();
        let now = Utc::now();

        history.append("+48111", now - Duration::hours(2)).unwrap();
        history.append("+48222", now).unwrap();
        history.append("+48111", now - Duration::hours(1)).unwrap();

        let entries = history.query_all().unwrap();
        let numbers: Vec<&str> = entries.iter().map(|e| e.telephone_number.as_str()).collect();
        assert_eq!(numbers, vec!["+48222", "+48111", "+48111"]);
        assert!(entries[0].last_message_time >= entries[1].last_message_time);
    }

    #[test]
    fn test_timestamp_round_trip_keeps_microseconds() {
        let ts = Utc.with_ymd_and_hms(2025, 6, 1, 12, 30, 0).unwrap() + Duration::microseconds(123_456);
        assert_eq!(format_timestamp(ts), "2025-06-01T12:30:00.123456Z");
        assert_eq!(parse_timestamp(&format_timestamp(ts)).unwrap(), ts);
    }

    #[test]
    fn test_parse_naive_local_timestamp() {
        let parsed = parse_timestamp("2025-06-01T12:30:00.500000").unwrap();
        let expected = Local
            .with_ymd_and_hms(2025, 6, 1, 12, 30, 0)
            .earliest()
            .unwrap()
            .with_timezone(&Utc)
            + Duration::milliseconds(500);
        assert_eq!(parsed, expected);
        assert!(parse_timestamp("yesterday").is_err());
    }

    #[test]
    fn test_memory_history_newest_first() {
        let history = MemoryHistory::new();
        let now = Utc::now();
        history.append("+1", now - Duration::seconds(5)).unwrap();
        history.append("+2", now).unwrap();

        let entries = history.query_all().unwrap();
        assert_eq!(entries[0].telephone_number, "+2");
        assert_eq!(entries.len(), 2);
    }
}
