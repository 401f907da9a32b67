//! Authentication module for the admin console.
//!
//! This module provides:
//! - `SessionStore`: the persisted signed-in flag and role
//! - `AdminAccount`: the single administrator credential, held as an Argon2 hash
//! - `Authenticator`: cancellable login attempts that write the session on success
//! - `logout`: session teardown
//!
//! Sessions are persisted to `session.json` in the cache directory.

pub mod authenticator;
pub mod credentials;
pub mod session;
pub mod teardown;

pub use authenticator::{AuthError, Authenticator, DiscardGate, PendingLogin};
pub use credentials::{AdminAccount, Credential, CredentialError, HashCost};
pub use session::{
    FileSessionStore, MemorySessionStore, Role, Session, SessionReadError, SessionStore,
    SessionWriteError,
};
pub use teardown::logout;
