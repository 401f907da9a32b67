//! Database management console.
//!
//! Backups are simulated: a new backup is recorded as running and the
//! caller completes it after its own delay.

use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{seed_date, WorkspaceError};
use crate::utils::contains_ignore_case;

/// How long the console pretends a backup takes.
pub const SIMULATED_BACKUP_SECS: u64 = 3;

/// Size reported for a backup once the simulated run completes.
const COMPLETED_BACKUP_SIZE: &str = "15.2 MB";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TableStatus {
    Active,
    Maintenance,
    Error,
}

impl TableStatus {
    pub fn label(&self) -> &'static str {
        match self {
            TableStatus::Active => "ACTIVE",
            TableStatus::Maintenance => "MAINTENANCE",
            TableStatus::Error => "ERROR",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DbTable {
    pub id: u64,
    pub name: String,
    pub kind: String,
    pub record_count: u64,
    pub size: String,
    pub last_updated: NaiveDateTime,
    pub status: TableStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BackupKind {
    Full,
    Incremental,
    Schema,
}

impl BackupKind {
    pub fn label(&self) -> &'static str {
        match self {
            BackupKind::Full => "FULL",
            BackupKind::Incremental => "INCREMENTAL",
            BackupKind::Schema => "SCHEMA",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            BackupKind::Full => BackupKind::Incremental,
            BackupKind::Incremental => BackupKind::Schema,
            BackupKind::Schema => BackupKind::Full,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BackupStatus {
    Completed,
    Running,
    Failed,
}

impl BackupStatus {
    pub fn label(&self) -> &'static str {
        match self {
            BackupStatus::Completed => "COMPLETED",
            BackupStatus::Running => "RUNNING",
            BackupStatus::Failed => "FAILED",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Backup {
    pub id: u64,
    pub name: String,
    pub kind: BackupKind,
    pub size: String,
    pub created: NaiveDateTime,
    pub status: BackupStatus,
}

#[derive(Debug, Clone)]
pub struct NewBackup {
    pub name: String,
    pub kind: BackupKind,
}

impl Default for NewBackup {
    fn default() -> Self {
        Self {
            name: String::new(),
            kind: BackupKind::Full,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricStatus {
    Good,
    Warning,
    Critical,
}

impl MetricStatus {
    pub fn label(&self) -> &'static str {
        match self {
            MetricStatus::Good => "GOOD",
            MetricStatus::Warning => "WARNING",
            MetricStatus::Critical => "CRITICAL",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemMetric {
    pub label: &'static str,
    pub value: &'static str,
    pub percentage: u16,
    pub status: MetricStatus,
}

#[derive(Debug, Clone)]
pub struct DatabaseConsole {
    tables: Vec<DbTable>,
    backups: Vec<Backup>,
    metrics: Vec<SystemMetric>,
    next_backup_id: u64,
}

impl DatabaseConsole {
    pub fn sample() -> Self {
        let at = |date, hour, minute| seed_date(date).and_hms_opt(hour, minute, 0).unwrap_or_default();

        let table = |id, name: &str, kind: &str, record_count, size: &str, updated, status| DbTable {
            id,
            name: name.to_string(),
            kind: kind.to_string(),
            record_count,
            size: size.to_string(),
            last_updated: updated,
            status,
        };

        let tables = vec![
            table(1, "users", "users", 1234, "2.3 MB", at((2024, 1, 20), 10, 30), TableStatus::Active),
            table(2, "websites", "websites", 56, "1.1 MB", at((2024, 1, 20), 9, 45), TableStatus::Active),
            table(3, "domains", "domains", 23, "0.5 MB", at((2024, 1, 20), 8, 15), TableStatus::Active),
            table(4, "content_blocks", "content", 5678, "45.2 MB", at((2024, 1, 20), 11, 0), TableStatus::Active),
            table(5, "analytics_data", "analytics", 98765, "156.7 MB", at((2024, 1, 20), 11, 30), TableStatus::Active),
            table(6, "system_logs", "logs", 45321, "78.9 MB", at((2024, 1, 20), 11, 45), TableStatus::Maintenance),
        ];

        let backup = |id, name: &str, kind, size: &str, created| Backup {
            id,
            name: name.to_string(),
            kind,
            size: size.to_string(),
            created,
            status: BackupStatus::Completed,
        };

        let backups = vec![
            backup(1, "full_backup_2024_01_20", BackupKind::Full, "284.7 MB", at((2024, 1, 20), 2, 0)),
            backup(2, "incremental_backup_2024_01_19", BackupKind::Incremental, "12.3 MB", at((2024, 1, 19), 2, 0)),
            backup(3, "schema_backup_2024_01_18", BackupKind::Schema, "0.8 MB", at((2024, 1, 18), 2, 0)),
        ];

        let metrics = vec![
            SystemMetric { label: "Storage Used", value: "284.7 MB / 1 GB", percentage: 28, status: MetricStatus::Good },
            SystemMetric { label: "CPU Usage", value: "12%", percentage: 12, status: MetricStatus::Good },
            SystemMetric { label: "Memory Usage", value: "456 MB / 2 GB", percentage: 23, status: MetricStatus::Good },
            SystemMetric { label: "Active Connections", value: "8 / 100", percentage: 8, status: MetricStatus::Good },
        ];

        Self {
            tables,
            backups,
            metrics,
            next_backup_id: 4,
        }
    }

    pub fn tables(&self) -> &[DbTable] {
        &self.tables
    }

    pub fn backups(&self) -> &[Backup] {
        &self.backups
    }

    pub fn metrics(&self) -> &[SystemMetric] {
        &self.metrics
    }

    pub fn search_tables(&self, term: &str) -> Vec<&DbTable> {
        self.tables.iter().filter(|t| contains_ignore_case(&t.name, term)).collect()
    }

    pub fn total_records(&self) -> u64 {
        self.tables.iter().map(|t| t.record_count).sum()
    }

    /// Record a new running backup at the top of the list.
    pub fn start_backup(&mut self, request: NewBackup) -> &Backup {
        let now = Utc::now();
        let name = match request.name.trim() {
            "" => format!("backup_{}", now.timestamp()),
            name => name.to_string(),
        };

        let id = self.next_backup_id;
        self.next_backup_id += 1;
        debug!(id, %name, kind = request.kind.label(), "Backup started");

        self.backups.insert(
            0,
            Backup {
                id,
                name,
                kind: request.kind,
                size: "0 MB".to_string(),
                created: now.naive_utc(),
                status: BackupStatus::Running,
            },
        );
        &self.backups[0]
    }

    /// Mark a running backup completed. Backups that are no longer running
    /// (or were deleted) are left alone.
    pub fn complete_backup(&mut self, id: u64) -> Option<&Backup> {
        let backup = self
            .backups
            .iter_mut()
            .find(|b| b.id == id && b.status == BackupStatus::Running)?;
        backup.status = BackupStatus::Completed;
        backup.size = COMPLETED_BACKUP_SIZE.to_string();
        Some(backup)
    }

    pub fn remove_backup(&mut self, id: u64) -> Result<Backup, WorkspaceError> {
        let index = self
            .backups
            .iter()
            .position(|b| b.id == id)
            .ok_or(WorkspaceError::NotFound { kind: "backup", id })?;
        if self.backups[index].status == BackupStatus::Running {
            return Err(WorkspaceError::BackupRunning(id));
        }
        Ok(self.backups.remove(index))
    }

    /// Pretend to execute a SQL statement.
    pub fn run_query(&self, sql: &str) -> Result<String, WorkspaceError> {
        if sql.trim().is_empty() {
            return Err(WorkspaceError::Required("Query"));
        }
        debug!(len = sql.len(), "Simulated query executed");
        Ok("Query executed successfully!".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_contents() {
        let db = DatabaseConsole::sample();
        assert_eq!(db.tables().len(), 6);
        assert_eq!(db.backups().len(), 3);
        assert_eq!(db.metrics().len(), 4);
        assert_eq!(db.total_records(), 1234 + 56 + 23 + 5678 + 98765 + 45321);
        assert_eq!(db.search_tables("DATA").len(), 1);
        assert_eq!(db.search_tables("s").len(), 6);
    }

    #[test]
    fn test_backup_lifecycle() {
        let mut db = DatabaseConsole::sample();
        let id = db
            .start_backup(NewBackup {
                name: "nightly".to_string(),
                kind: BackupKind::Incremental,
            })
            .id;

        let first = &db.backups()[0];
        assert_eq!(first.id, id);
        assert_eq!(first.status, BackupStatus::Running);
        assert_eq!(first.size, "0 MB");

        assert_eq!(db.remove_backup(id).unwrap_err(), WorkspaceError::BackupRunning(id));

        let done = db.complete_backup(id).unwrap();
        assert_eq!(done.status, BackupStatus::Completed);
        assert_eq!(done.size, "15.2 MB");

        // Second completion is a no-op
        assert!(db.complete_backup(id).is_none());

        db.remove_backup(id).unwrap();
        assert_eq!(db.backups().len(), 3);
    }

    #[test]
    fn test_backup_default_name() {
        let mut db = DatabaseConsole::sample();
        let backup = db.start_backup(NewBackup::default());
        assert!(backup.name.starts_with("backup_"));
        assert_eq!(backup.kind, BackupKind::Full);
    }

    #[test]
    fn test_completing_deleted_backup_is_ignored() {
        let mut db = DatabaseConsole::sample();
        assert!(db.complete_backup(1).is_none());
        assert!(db.complete_backup(99).is_none());
    }

    #[test]
    fn test_run_query() {
        let db = DatabaseConsole::sample();
        assert!(db.run_query("SELECT * FROM users").is_ok());
        assert_eq!(db.run_query("   ").unwrap_err(), WorkspaceError::Required("Query"));
    }
}
