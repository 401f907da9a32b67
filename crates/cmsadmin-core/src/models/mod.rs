//! Admin workspace models.
//!
//! In-memory collections seeded with sample data, one per admin page:
//!
//! - `UserDirectory`: platform user accounts
//! - `WebsiteCatalog`: hosted websites and the templates they start from
//! - `DomainRegistry`: custom domains and their DNS records
//! - `DatabaseConsole`: tables, backups and system metrics
//! - `DashboardSummary`: overview cards and recent activity
//!
//! Nothing here is persisted. Domain verification and backups are simulated.

pub mod dashboard;
pub mod database;
pub mod domain;
pub mod user;
pub mod website;

use chrono::NaiveDate;
use thiserror::Error;

pub use dashboard::{Activity, DashboardSummary, QuickAction, StatCard, Trend};
pub use database::{
    Backup, BackupKind, BackupStatus, DatabaseConsole, DbTable, MetricStatus, NewBackup,
    SystemMetric, TableStatus, SIMULATED_BACKUP_SECS,
};
pub use domain::{
    DnsRecord, Domain, DomainKind, DomainRegistry, DomainStats, DomainStatus, NewDomain, SslStatus,
};
pub use user::{Invitation, NewUser, User, UserDirectory, UserRole, UserStats, UserStatus};
pub use website::{NewWebsite, Template, Website, WebsiteCatalog, WebsiteStats, WebsiteStatus, TEMPLATES};

/// Rejected admin actions. Shown to the operator in the status bar.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum WorkspaceError {
    #[error("{0} is required")]
    Required(&'static str),

    #[error("Invalid email address: {0}")]
    InvalidEmail(String),

    #[error("Invalid subdomain: {0} (use lowercase letters, digits and hyphens)")]
    InvalidSubdomain(String),

    #[error("Invalid domain name: {0}")]
    InvalidHostname(String),

    #[error("Already exists: {0}")]
    Duplicate(String),

    #[error("Unknown template: {0}")]
    UnknownTemplate(String),

    #[error("No {kind} with id {id}")]
    NotFound { kind: &'static str, id: u64 },

    #[error("Backup {0} is still running")]
    BackupRunning(u64),
}

/// Calendar date for seed data. Out-of-range input falls back to the epoch.
pub(crate) fn seed_date((year, month, day): (i32, u32, u32)) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}
