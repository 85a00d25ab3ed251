//! The bounded, durable alert history log.

use crate::error::{HistoryError, Result};
use crate::query::{filter_entries, HistoryFilter};
use chrono::{DateTime, Utc};
use crowsnest_common::types::{Alert, AlertCategory, HistoryAlert, Severity};
use rusqlite::{params, Connection};
use std::collections::VecDeque;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// Capacity bound for persisted history entries. Once exceeded, the oldest
/// inserted entries are dropped (FIFO, not LRU).
pub const MAX_HISTORY: usize = 500;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS history_alerts (
    history_id TEXT PRIMARY KEY,
    session_id TEXT NOT NULL,
    alert_id TEXT NOT NULL,
    severity TEXT NOT NULL,
    category TEXT NOT NULL,
    title TEXT NOT NULL,
    description TEXT NOT NULL,
    value TEXT NOT NULL,
    threshold TEXT NOT NULL,
    timestamp TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_history_session ON history_alerts(session_id);
";

/// Scope of a [`HistoryStore::clear`] operation.
#[derive(Debug, Clone, Copy)]
pub enum ClearScope<'a> {
    All,
    Session(&'a str),
}

/// Append-only, capacity-bounded log of persisted alerts, newest first.
///
/// The in-memory deque is the operational source of truth; every mutation is
/// mirrored to a SQLite database when one is available. Mirror failures are
/// logged and the store carries on in memory, so the evaluation loop never
/// sees a persistence error. All access is serialized through one lock,
/// which also satisfies the single-writer requirement for the durable log.
pub struct HistoryStore {
    inner: Mutex<Inner>,
}

struct Inner {
    entries: VecDeque<HistoryAlert>,
    conn: Option<Connection>,
}

impl HistoryStore {
    /// Opens the history database at `path`, creating it (and its parent
    /// directory) as needed, and loads the persisted entries.
    ///
    /// An unreadable or corrupt database is logged and swallowed: the store
    /// comes up empty and in-memory rather than failing the caller.
    pub fn open(path: &Path) -> Self {
        match Self::open_durable(path) {
            Ok(store) => store,
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "History database unavailable, continuing in memory only"
                );
                Self::in_memory()
            }
        }
    }

    /// A store with no durable mirror. Used when the database cannot be
    /// opened, and by tests.
    pub fn in_memory() -> Self {
        Self {
            inner: Mutex::new(Inner {
                entries: VecDeque::new(),
                conn: None,
            }),
        }
    }

    fn open_durable(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| HistoryError::Other(format!("create {parent:?}: {e}")))?;
            }
        }
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        conn.execute_batch(SCHEMA)?;
        let entries = load_entries(&conn)?;
        Ok(Self {
            inner: Mutex::new(Inner {
                entries,
                conn: Some(conn),
            }),
        })
    }

    /// Inserts `entry` at the head of the log, evicting beyond
    /// [`MAX_HISTORY`] from the tail, and mirrors the change durably.
    pub fn append(&self, entry: HistoryAlert) {
        let mut inner = self.lock_inner();
        inner.entries.push_front(entry.clone());
        inner.entries.truncate(MAX_HISTORY);

        if let Some(conn) = inner.conn.as_mut() {
            if let Err(e) = persist_append(conn, &entry) {
                tracing::warn!(
                    history_id = %entry.history_id,
                    error = %e,
                    "Failed to persist history entry, keeping it in memory"
                );
            }
        }
    }

    /// All retained entries, newest first, optionally scoped to one session.
    pub fn load_all(&self, session_id: Option<&str>) -> Vec<HistoryAlert> {
        let inner = self.lock_inner();
        inner
            .entries
            .iter()
            .filter(|entry| session_id.map_or(true, |id| entry.session_id == id))
            .cloned()
            .collect()
    }

    /// Entries matching `filter`, newest first. The date window is evaluated
    /// against the current time.
    pub fn filter(&self, filter: &HistoryFilter) -> Vec<HistoryAlert> {
        let inner = self.lock_inner();
        filter_entries(inner.entries.iter(), filter, Utc::now())
    }

    /// Removes entries in `scope` from memory and the durable mirror.
    /// Returns the number of entries removed.
    pub fn clear(&self, scope: ClearScope<'_>) -> usize {
        let mut inner = self.lock_inner();
        let before = inner.entries.len();
        match scope {
            ClearScope::All => inner.entries.clear(),
            ClearScope::Session(id) => inner.entries.retain(|entry| entry.session_id != id),
        }
        let removed = before - inner.entries.len();

        if let Some(conn) = inner.conn.as_ref() {
            let result = match scope {
                ClearScope::All => conn.execute("DELETE FROM history_alerts", []),
                ClearScope::Session(id) => conn.execute(
                    "DELETE FROM history_alerts WHERE session_id = ?1",
                    params![id],
                ),
            };
            if let Err(e) = result {
                tracing::warn!(error = %e, "Failed to clear durable history");
            }
        }

        removed
    }

    pub fn len(&self) -> usize {
        self.lock_inner().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock_inner().entries.is_empty()
    }

    /// Serializes the retained entries (newest first) as pretty-printed
    /// JSON with RFC 3339 timestamps.
    pub fn export_json(&self) -> Result<String> {
        let inner = self.lock_inner();
        let entries: Vec<&HistoryAlert> = inner.entries.iter().collect();
        Ok(serde_json::to_string_pretty(&entries)?)
    }

    fn lock_inner(&self) -> MutexGuard<'_, Inner> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn persist_append(conn: &mut Connection, entry: &HistoryAlert) -> Result<()> {
    let tx = conn.transaction()?;
    tx.prepare_cached(
        "INSERT OR REPLACE INTO history_alerts
         (history_id, session_id, alert_id, severity, category, title, description, value, threshold, timestamp)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
    )?
    .execute(params![
        &entry.history_id,
        &entry.session_id,
        &entry.alert.id,
        entry.alert.severity.to_string(),
        entry.alert.category.to_string(),
        &entry.alert.title,
        &entry.alert.description,
        &entry.alert.value,
        &entry.alert.threshold,
        entry.alert.timestamp.to_rfc3339(),
    ])?;
    // Insertion order is rowid order; everything past the newest MAX_HISTORY
    // rows is the tail.
    tx.prepare_cached(
        "DELETE FROM history_alerts WHERE rowid NOT IN
         (SELECT rowid FROM history_alerts ORDER BY rowid DESC LIMIT ?1)",
    )?
    .execute(params![MAX_HISTORY as i64])?;
    tx.commit()?;
    Ok(())
}

fn load_entries(conn: &Connection) -> Result<VecDeque<HistoryAlert>> {
    let mut stmt = conn.prepare(
        "SELECT history_id, session_id, alert_id, severity, category, title, description, value, threshold, timestamp
         FROM history_alerts ORDER BY rowid DESC LIMIT ?1",
    )?;
    let rows = stmt.query_map(params![MAX_HISTORY as i64], |row| {
        let severity_str: String = row.get(3)?;
        let category_str: String = row.get(4)?;
        let timestamp_str: String = row.get(9)?;
        Ok(HistoryAlert {
            history_id: row.get(0)?,
            session_id: row.get(1)?,
            alert: Alert {
                id: row.get(2)?,
                severity: severity_str.parse().unwrap_or(Severity::Info),
                category: category_str.parse().unwrap_or(AlertCategory::System),
                title: row.get(5)?,
                description: row.get(6)?,
                value: row.get(7)?,
                threshold: row.get(8)?,
                timestamp: DateTime::parse_from_rfc3339(&timestamp_str)
                    .map(|t| t.with_timezone(&Utc))
                    .unwrap_or_default(),
            },
        })
    })?;

    let mut entries = VecDeque::new();
    for row in rows {
        entries.push_back(row?);
    }
    Ok(entries)
}
