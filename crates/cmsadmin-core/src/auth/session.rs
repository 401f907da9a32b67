use std::fmt;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::StorageKeys;

/// Session file name in the cache directory
pub const SESSION_FILE: &str = "session.json";

/// Role granted to the signed-in operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    #[default]
    None,
}

impl Role {
    /// Value written to the persisted role entry.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::None => "none",
        }
    }

    /// Parse a persisted role entry. Anything unrecognized is malformed.
    pub fn parse(s: &str) -> Result<Self, SessionReadError> {
        match s {
            "admin" => Ok(Role::Admin),
            "none" => Ok(Role::None),
            other => Err(SessionReadError::InvalidRole(other.to_string())),
        }
    }

    /// Whether this role may enter a route that requires `required`.
    pub fn satisfies(&self, required: Role) -> bool {
        matches!((self, required), (Role::Admin, Role::Admin))
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Session {
    pub authenticated: bool,
    pub role: Role,
}

impl Session {
    /// The state every reader falls back to.
    pub const fn signed_out() -> Self {
        Self {
            authenticated: false,
            role: Role::None,
        }
    }

    pub const fn admin() -> Self {
        Self {
            authenticated: true,
            role: Role::Admin,
        }
    }

    /// Check if this session may enter a route requiring `required`.
    pub fn grants(&self, required: Role) -> bool {
        self.authenticated && self.role.satisfies(required)
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Persisted session state that could not be trusted.
///
/// Readers never surface this to the operator; it is logged and the
/// session is treated as signed out.
#[derive(Error, Debug)]
pub enum SessionReadError {
    #[error("Failed to read session file: {0}")]
    Io(#[from] io::Error),

    #[error("Session file is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Session entry missing: {0}")]
    MissingEntry(String),

    #[error("Session entry {0} is not a boolean")]
    InvalidFlag(String),

    #[error("Unknown role: {0:?}")]
    InvalidRole(String),
}

#[derive(Error, Debug)]
pub enum SessionWriteError {
    #[error("Failed to write session file: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to serialize session: {0}")]
    Serialize(#[from] serde_json::Error),
}

// ============================================================================
// Store
// ============================================================================

/// Single source of truth for "who is signed in, and with what role".
///
/// Constructed once at startup and handed to the authenticator and the
/// route guard as `Arc<dyn SessionStore>`.
pub trait SessionStore: Send + Sync {
    /// Current session; signed out when nothing valid is persisted.
    fn get(&self) -> Session;

    /// Persist `session`, replacing any prior value.
    fn set(&self, session: Session) -> Result<(), SessionWriteError>;

    /// Remove the persisted session. Clearing an empty store is a no-op.
    fn clear(&self) -> Result<(), SessionWriteError>;
}

/// Session store backed by a JSON file with two scalar entries.
pub struct FileSessionStore {
    path: PathBuf,
    keys: StorageKeys,
    // Serializes read-modify-write of the file within this process
    io_lock: Mutex<()>,
    // Last read failure already logged at warn
    last_failure: Mutex<Option<String>>,
}

impl FileSessionStore {
    pub fn new(cache_dir: PathBuf, keys: StorageKeys) -> Self {
        Self {
            path: cache_dir.join(SESSION_FILE),
            keys,
            io_lock: Mutex::new(()),
            last_failure: Mutex::new(None),
        }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Load and validate the persisted session.
    ///
    /// Returns `Ok(None)` when no session file exists.
    pub fn load(&self) -> Result<Option<Session>, SessionReadError> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let entries: Map<String, Value> = serde_json::from_str(&contents)?;

        let authenticated = match entries.get(&self.keys.authenticated) {
            Some(Value::Bool(flag)) => *flag,
            Some(_) => return Err(SessionReadError::InvalidFlag(self.keys.authenticated.clone())),
            None => return Err(SessionReadError::MissingEntry(self.keys.authenticated.clone())),
        };

        let role = match entries.get(&self.keys.role) {
            Some(Value::String(role)) => Role::parse(role)?,
            Some(other) => return Err(SessionReadError::InvalidRole(other.to_string())),
            None => return Err(SessionReadError::MissingEntry(self.keys.role.clone())),
        };

        Ok(Some(Session {
            authenticated,
            role,
        }))
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ()> {
        self.io_lock.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Remember `failure`, returning true when it differs from the last one.
    fn note_failure(&self, failure: Option<String>) -> bool {
        let mut last = self.last_failure.lock().unwrap_or_else(|e| e.into_inner());
        let changed = *last != failure;
        *last = failure;
        changed
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self) -> Session {
        let _guard = self.lock();
        match self.load() {
            Ok(Some(session)) => {
                self.note_failure(None);
                session
            }
            Ok(None) => {
                self.note_failure(None);
                debug!(path = ?self.path, "No persisted session");
                Session::signed_out()
            }
            Err(e) => {
                if self.note_failure(Some(e.to_string())) {
                    warn!(error = %e, path = ?self.path, "Ignoring unreadable session");
                } else {
                    debug!(error = %e, "Session still unreadable");
                }
                Session::signed_out()
            }
        }
    }

    fn set(&self, session: Session) -> Result<(), SessionWriteError> {
        let _guard = self.lock();

        let mut entries = Map::new();
        entries.insert(
            self.keys.authenticated.clone(),
            Value::Bool(session.authenticated),
        );
        entries.insert(
            self.keys.role.clone(),
            Value::String(session.role.as_str().to_string()),
        );

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(&entries)?;
        std::fs::write(&self.path, contents)?;
        debug!(path = ?self.path, role = %session.role, "Session saved");
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionWriteError> {
        let _guard = self.lock();
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                debug!(path = ?self.path, "Session cleared");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Process-local session store; nothing survives a restart.
#[derive(Default)]
pub struct MemorySessionStore {
    session: Mutex<Option<Session>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self) -> Session {
        self.session
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .unwrap_or_default()
    }

    fn set(&self, session: Session) -> Result<(), SessionWriteError> {
        *self.session.lock().unwrap_or_else(|e| e.into_inner()) = Some(session);
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionWriteError> {
        *self.session.lock().unwrap_or_else(|e| e.into_inner()) = None;
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn file_store(dir: &tempfile::TempDir) -> FileSessionStore {
        FileSessionStore::new(dir.path().to_path_buf(), StorageKeys::default())
    }

    #[test]
    fn test_role_parse() {
        assert_eq!(Role::parse("admin").unwrap(), Role::Admin);
        assert_eq!(Role::parse("none").unwrap(), Role::None);
        assert!(Role::parse("ADMIN").is_err());
        assert!(Role::parse("owner").is_err());
        assert!(Role::parse("").is_err());
    }

    #[test]
    fn test_role_satisfies() {
        assert!(Role::Admin.satisfies(Role::Admin));
        assert!(!Role::None.satisfies(Role::Admin));
        assert!(!Role::None.satisfies(Role::None));
    }

    #[test]
    fn test_session_grants() {
        assert!(Session::admin().grants(Role::Admin));
        assert!(!Session::signed_out().grants(Role::Admin));
        let unauthenticated_admin = Session {
            authenticated: false,
            role: Role::Admin,
        };
        assert!(!unauthenticated_admin.grants(Role::Admin));
    }

    #[test]
    fn test_empty_file_store_is_signed_out() {
        let dir = tempfile::tempdir().unwrap();
        let store = file_store(&dir);
        assert_eq!(store.get(), Session::signed_out());
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_file_store_get_returns_what_was_set() {
        let dir = tempfile::tempdir().unwrap();
        let store = file_store(&dir);

        for session in [
            Session::admin(),
            Session::signed_out(),
            Session {
                authenticated: false,
                role: Role::Admin,
            },
            Session {
                authenticated: true,
                role: Role::None,
            },
        ] {
            store.set(session).unwrap();
            assert_eq!(store.get(), session);
        }
    }

    #[test]
    fn test_file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        file_store(&dir).set(Session::admin()).unwrap();

        let reopened = file_store(&dir);
        assert_eq!(reopened.get(), Session::admin());
    }

    #[test]
    fn test_file_store_layout_uses_configured_keys() {
        let dir = tempfile::tempdir().unwrap();
        let keys = StorageKeys {
            authenticated: "signedIn".to_string(),
            role: "accessRole".to_string(),
        };
        let store = FileSessionStore::new(dir.path().to_path_buf(), keys);
        store.set(Session::admin()).unwrap();

        let raw = std::fs::read_to_string(store.path()).unwrap();
        let value: Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["signedIn"], Value::Bool(true));
        assert_eq!(value["accessRole"], Value::String("admin".to_string()));
        assert_eq!(value.as_object().unwrap().len(), 2);
    }

    #[test]
    fn test_file_store_malformed_data_is_signed_out() {
        let dir = tempfile::tempdir().unwrap();
        let store = file_store(&dir);

        let cases = [
            "not json",
            r#"{"isAuthenticated": true, "userRole": "superuser"}"#,
            r#"{"isAuthenticated": "true", "userRole": "admin"}"#,
            r#"{"isAuthenticated": true}"#,
            r#"{"userRole": "admin"}"#,
            r#"{"isAuthenticated": true, "userRole": 1}"#,
            r#"[true, "admin"]"#,
        ];

        for raw in cases {
            std::fs::write(store.path(), raw).unwrap();
            assert_eq!(store.get(), Session::signed_out(), "input: {}", raw);
            assert!(store.load().is_err(), "input: {}", raw);
        }
    }

    #[test]
    fn test_file_store_repeated_failure_is_noted_once() {
        let dir = tempfile::tempdir().unwrap();
        let store = file_store(&dir);
        std::fs::write(store.path(), "not json").unwrap();

        store.get();
        let first = store.last_failure.lock().unwrap().clone();
        assert!(first.is_some());
        for _ in 0..5 {
            store.get();
        }
        assert!(!store.note_failure(first.clone()), "repeated failure should not warn again");

        // A different failure is reported again
        std::fs::write(store.path(), r#"{"isAuthenticated": true}"#).unwrap();
        store.get();
        assert_ne!(*store.last_failure.lock().unwrap(), first);

        // A good read resets, so the next corruption warns again
        store.set(Session::admin()).unwrap();
        assert_eq!(store.get(), Session::admin());
        assert!(store.last_failure.lock().unwrap().is_none());
    }

    #[test]
    fn test_file_store_invalid_role_error_kind() {
        let dir = tempfile::tempdir().unwrap();
        let store = file_store(&dir);
        std::fs::write(
            store.path(),
            r#"{"isAuthenticated": true, "userRole": "root"}"#,
        )
        .unwrap();

        match store.load() {
            Err(SessionReadError::InvalidRole(role)) => assert_eq!(role, "root"),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_file_store_clear_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = file_store(&dir);
        store.set(Session::admin()).unwrap();

        store.clear().unwrap();
        let once = store.get();
        store.clear().unwrap();
        let twice = store.get();

        assert_eq!(once, Session::signed_out());
        assert_eq!(once, twice);
        assert!(!store.path().exists());
    }

    #[test]
    fn test_file_store_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let store = FileSessionStore::new(nested, StorageKeys::default());
        store.set(Session::admin()).unwrap();
        assert_eq!(store.get(), Session::admin());
    }

    #[test]
    fn test_memory_store_roundtrip_and_clear() {
        let store = MemorySessionStore::new();
        assert_eq!(store.get(), Session::signed_out());

        store.set(Session::admin()).unwrap();
        assert_eq!(store.get(), Session::admin());

        store.clear().unwrap();
        store.clear().unwrap();
        assert_eq!(store.get(), Session::signed_out());
    }
}
