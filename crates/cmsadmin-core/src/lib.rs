//! Core library for the CMS admin console.
//!
//! - `auth`: session store, authenticator and logout
//! - `routes`: routing table, route guard and navigation history
//! - `models`: in-memory admin workspace (users, websites, domains, database)
//! - `config`: persisted settings and environment overrides

pub mod auth;
pub mod config;
pub mod models;
pub mod routes;
pub mod utils;

pub use auth::{
    logout, AdminAccount, AuthError, Authenticator, Credential, FileSessionStore,
    MemorySessionStore, PendingLogin, Role, Session, SessionStore,
};
pub use config::{Config, ConfigError, StorageKeys};
pub use routes::{Access, GuardState, History, HistoryMode, Navigator, Route, RouteGuard};
