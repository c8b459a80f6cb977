//! Local event log in DuckDB
//!
//! `logs.duckdb` in the data directory records what the client did against
//! the bank: commands run and failed, expired sessions, and the outcome of
//! every money movement with the stage it stopped at. A partial failure
//! keeps the transaction id, so a transaction that was recorded without its
//! balance update can be found again with `LogQuery::kind`.
//!
//! Amounts, balances, account numbers, tokens and passwords are never
//! written here.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

use anyhow::{anyhow, Context, Result};
use chrono::{Duration, Utc};
use duckdb::{Connection, Row};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::result::Error;
use crate::log_migrations::LOG_MIGRATIONS;

use super::operations::{OperationOutcome, OperationStage};

pub const LOG_DB_FILE: &str = "logs.duckdb";

/// Entity recorded for deposit, withdrawal, transfer and payment events
pub const TRANSACTION_ENTITY: &str = "transaction";

static SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Unix ms in the upper bits, a per-process sequence in the low 16
fn next_id(timestamp_ms: i64) -> u64 {
    ((timestamp_ms as u64) << 16) | (SEQUENCE.fetch_add(1, Ordering::Relaxed) & 0xFFFF)
}

/// Which front end wrote the entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryPoint {
    Cli,
    Library,
}

impl EntryPoint {
    fn as_str(&self) -> &'static str {
        match self {
            EntryPoint::Cli => "cli",
            EntryPoint::Library => "library",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    CommandRun,
    CommandFailed,
    /// The backend rejected the token and the session was dropped
    SessionExpired,
    OperationCompleted,
    /// Transaction recorded, balance not updated
    OperationPartialFailure,
    /// Rejected locally or while creating the transaction
    OperationFailed,
}

impl EventKind {
    pub const ALL: [EventKind; 6] = [
        EventKind::CommandRun,
        EventKind::CommandFailed,
        EventKind::SessionExpired,
        EventKind::OperationCompleted,
        EventKind::OperationPartialFailure,
        EventKind::OperationFailed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::CommandRun => "command_run",
            EventKind::CommandFailed => "command_failed",
            EventKind::SessionExpired => "session_expired",
            EventKind::OperationCompleted => "operation_completed",
            EventKind::OperationPartialFailure => "operation_partial_failure",
            EventKind::OperationFailed => "operation_failed",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == wanted)
            .ok_or_else(|| {
                anyhow!(
                    "Unknown event '{}'. Known events: {}",
                    s,
                    Self::ALL.map(|k| k.as_str()).join(", ")
                )
            })
    }
}

/// One event to record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogEvent {
    pub kind: EventKind,
    /// CLI command, e.g. "accounts" or "deposit"
    pub command: String,
    /// Kind of record involved, e.g. "account" or "transaction"
    pub entity: Option<String>,
    pub stage: Option<OperationStage>,
    /// Transaction id for operation events
    pub reference: Option<String>,
    pub error: Option<String>,
}

impl LogEvent {
    fn new(kind: EventKind, command: &str) -> Self {
        Self {
            kind,
            command: command.to_string(),
            entity: None,
            stage: None,
            reference: None,
            error: None,
        }
    }

    pub fn command_run(command: &str) -> Self {
        Self::new(EventKind::CommandRun, command)
    }

    pub fn command_failed(command: &str, message: impl Into<String>) -> Self {
        let mut event = Self::new(EventKind::CommandFailed, command);
        event.error = Some(message.into());
        event
    }

    pub fn session_expired(command: &str, message: impl Into<String>) -> Self {
        let mut event = Self::new(EventKind::SessionExpired, command);
        event.error = Some(message.into());
        event
    }

    /// Completed or partially failed operation
    pub fn operation(command: &str, outcome: &OperationOutcome) -> Self {
        let kind = if outcome.is_completed() {
            EventKind::OperationCompleted
        } else {
            EventKind::OperationPartialFailure
        };
        let mut event = Self::new(kind, command).with_entity(TRANSACTION_ENTITY);
        event.stage = Some(outcome.stage());
        event.reference = Some(outcome.transaction().id.clone());
        event.error = outcome.balance_error().map(|e| e.user_message());
        event
    }

    /// Operation that never produced a transaction
    pub fn operation_failed(command: &str, error: &Error) -> Self {
        let mut event = Self::new(EventKind::OperationFailed, command).with_entity(TRANSACTION_ENTITY);
        event.stage = Some(OperationStage::of_failure(error));
        event.error = Some(error.user_message());
        event
    }

    pub fn with_entity(mut self, entity: impl Into<String>) -> Self {
        self.entity = Some(entity.into());
        self
    }
}

/// A stored event
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogEntry {
    pub id: u64,
    /// Unix ms
    pub timestamp: i64,
    pub entry_point: String,
    pub app_version: String,
    pub event: String,
    pub command: String,
    pub entity: Option<String>,
    pub stage: Option<String>,
    pub reference: Option<String>,
    pub error: Option<String>,
}

impl LogEntry {
    fn from_row(row: &Row<'_>) -> duckdb::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            timestamp: row.get(1)?,
            entry_point: row.get(2)?,
            app_version: row.get(3)?,
            event: row.get(4)?,
            command: row.get(5)?,
            entity: row.get(6)?,
            stage: row.get(7)?,
            reference: row.get(8)?,
            error: row.get(9)?,
        })
    }
}

/// Newest-first selection over the log; all set conditions must hold
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogQuery {
    pub kind: Option<EventKind>,
    pub entity: Option<String>,
    /// Only entries that carry an error
    pub failures_only: bool,
    pub limit: usize,
}

impl Default for LogQuery {
    fn default() -> Self {
        Self {
            kind: None,
            entity: None,
            failures_only: false,
            limit: 50,
        }
    }
}

impl LogQuery {
    pub fn recent(limit: usize) -> Self {
        Self {
            limit,
            ..Default::default()
        }
    }

    pub fn kind(mut self, kind: EventKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn entity(mut self, entity: impl Into<String>) -> Self {
        self.entity = Some(entity.into());
        self
    }

    pub fn failures_only(mut self) -> Self {
        self.failures_only = true;
        self
    }

    fn to_sql(&self) -> (String, Vec<Box<dyn duckdb::ToSql>>) {
        let mut conditions: Vec<&str> = Vec::new();
        let mut params: Vec<Box<dyn duckdb::ToSql>> = Vec::new();

        if let Some(kind) = self.kind {
            conditions.push("event = ?");
            params.push(Box::new(kind.as_str().to_string()));
        }
        if let Some(entity) = self.entity.as_deref().map(str::trim).filter(|e| !e.is_empty()) {
            conditions.push("entity = ?");
            params.push(Box::new(entity.to_string()));
        }
        if self.failures_only {
            conditions.push("error IS NOT NULL");
        }

        let mut sql = String::from(
            "SELECT id, timestamp, entry_point, app_version, event, command, entity, stage, \
             reference, error FROM sys_logs",
        );
        if !conditions.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&conditions.join(" AND "));
        }
        sql.push_str(" ORDER BY id DESC LIMIT ?");
        params.push(Box::new(self.limit as i64));
        (sql, params)
    }
}

/// Writer and reader for `logs.duckdb`
pub struct LoggingService {
    conn: Mutex<Connection>,
    db_path: PathBuf,
    entry_point: EntryPoint,
    app_version: String,
}

impl LoggingService {
    /// Open or create the log in `data_dir`
    pub fn new(data_dir: &Path, entry_point: EntryPoint, app_version: impl Into<String>) -> Result<Self> {
        std::fs::create_dir_all(data_dir)?;
        let db_path = data_dir.join(LOG_DB_FILE);
        let conn = Connection::open(&db_path)
            .with_context(|| format!("Failed to open {}", db_path.display()))?;
        migrate(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
            db_path,
            entry_point,
            app_version: app_version.into(),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|e| anyhow!("Lock poisoned: {}", e))
    }

    /// Store `event`, returning its id
    pub fn record(&self, event: &LogEvent) -> Result<u64> {
        let timestamp = Utc::now().timestamp_millis();
        let id = next_id(timestamp);
        self.conn()?.execute(
            "INSERT INTO sys_logs (id, timestamp, entry_point, app_version, event, command, \
             entity, stage, reference, error) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            duckdb::params![
                id,
                timestamp,
                self.entry_point.as_str(),
                &self.app_version,
                event.kind.as_str(),
                &event.command,
                &event.entity,
                event.stage.map(|s| s.as_str()),
                &event.reference,
                &event.error,
            ],
        )?;
        debug!(event = %event.kind, command = %event.command, "event recorded");
        Ok(id)
    }

    pub fn query(&self, query: &LogQuery) -> Result<Vec<LogEntry>> {
        let (sql, params) = query.to_sql();
        let param_refs: Vec<&dyn duckdb::ToSql> = params.iter().map(|p| p.as_ref()).collect();

        let conn = self.conn()?;
        let mut stmt = conn.prepare(&sql)?;
        let entries = stmt
            .query_map(param_refs.as_slice(), LogEntry::from_row)?
            .collect::<duckdb::Result<Vec<_>>>()?;
        Ok(entries)
    }

    /// Number of entries per event name, most frequent first
    pub fn counts_by_event(&self) -> Result<Vec<(String, u64)>> {
        let conn = self.conn()?;
        let mut stmt =
            conn.prepare("SELECT event, COUNT(*) FROM sys_logs GROUP BY event ORDER BY 2 DESC, 1")?;
        let counts = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<duckdb::Result<Vec<_>>>()?;
        Ok(counts)
    }

    /// Delete entries older than `age`, returning how many went
    pub fn prune(&self, age: Duration) -> Result<usize> {
        let cutoff = (Utc::now() - age).timestamp_millis();
        let deleted = self
            .conn()?
            .execute("DELETE FROM sys_logs WHERE timestamp < ?", [cutoff])?;
        Ok(deleted)
    }

    /// Write the entries selected by `query` to `path` as a JSON array
    pub fn export_json(&self, query: &LogQuery, path: &Path) -> Result<usize> {
        let entries = self.query(query)?;
        let content = serde_json::to_string_pretty(&entries)?;
        std::fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(entries.len())
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }
}

/// Apply every embedded migration not yet listed in `sys_migrations`.
/// The first migration creates that table and is safe to re-run.
fn migrate(conn: &Connection) -> Result<()> {
    for (index, (name, sql)) in LOG_MIGRATIONS.iter().enumerate() {
        if index > 0 {
            let applied: bool = conn.query_row(
                "SELECT COUNT(*) > 0 FROM sys_migrations WHERE migration_name = ?",
                [name],
                |row| row.get(0),
            )?;
            if applied {
                continue;
            }
        }
        conn.execute_batch(sql)
            .with_context(|| format!("Log migration {} failed", name))?;
        conn.execute(
            "INSERT OR IGNORE INTO sys_migrations (migration_name) VALUES (?)",
            [name],
        )?;
    }
    Ok(())
}
