//! Login attempts against the admin account.
//!
//! [`Authenticator::authenticate`] is the plain async form. The TUI uses
//! [`Authenticator::begin`], which runs the attempt on the runtime and hands
//! back a [`PendingLogin`]. Discarding (or dropping) a pending login
//! guarantees the session store is never written by that attempt afterward.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures::future::{AbortHandle, Abortable};
use thiserror::Error;
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

use super::credentials::{AdminAccount, Credential};
use super::session::{Session, SessionStore, SessionWriteError};

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Failed to save session: {0}")]
    SessionWrite(#[from] SessionWriteError),

    #[error("Login attempt ended before completing")]
    Interrupted,
}

/// Serializes "was this attempt discarded?" with the session write.
///
/// The mutex is held across the check and `SessionStore::set`, so once
/// `discard` returns no write can follow.
#[derive(Clone, Default)]
pub struct DiscardGate {
    discarded: Arc<Mutex<bool>>,
}

impl DiscardGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn discard(&self) {
        *self.discarded.lock().unwrap_or_else(|e| e.into_inner()) = true;
    }

    /// Run `commit` unless the gate was discarded. Returns `None` if discarded.
    pub fn commit<T>(&self, commit: impl FnOnce() -> T) -> Option<T> {
        let discarded = self.discarded.lock().unwrap_or_else(|e| e.into_inner());
        if *discarded {
            None
        } else {
            Some(commit())
        }
    }
}

/// Decides whether a credential pair grants admin access.
#[derive(Clone)]
pub struct Authenticator {
    account: Arc<AdminAccount>,
    store: Arc<dyn SessionStore>,
    delay: Duration,
}

impl Authenticator {
    pub fn new(account: AdminAccount, store: Arc<dyn SessionStore>) -> Self {
        Self {
            account: Arc::new(account),
            store,
            delay: Duration::ZERO,
        }
    }

    /// Artificial latency applied before every verdict.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Verify the pair and, on success, record an admin session.
    ///
    /// Dropping the returned future before it resolves leaves the store
    /// untouched.
    pub async fn authenticate(&self, identifier: &str, secret: &str) -> Result<Session, AuthError> {
        let credential = Credential::new(identifier, secret);
        self.attempt(credential, DiscardGate::new()).await
    }

    /// Start an attempt on the runtime and return a handle to it.
    pub fn begin(&self, credential: Credential) -> PendingLogin {
        let gate = DiscardGate::new();
        let (tx, rx) = oneshot::channel();
        let (abort, registration) = AbortHandle::new_pair();

        let this = self.clone();
        let task_gate = gate.clone();
        tokio::spawn(async move {
            let attempt = Abortable::new(this.attempt(credential, task_gate), registration);
            if let Ok(outcome) = attempt.await {
                // Receiver is gone when the login view was torn down
                let _ = tx.send(outcome);
            }
        });

        PendingLogin {
            gate,
            abort,
            rx: Some(rx),
        }
    }

    async fn attempt(&self, credential: Credential, gate: DiscardGate) -> Result<Session, AuthError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let account = Arc::clone(&self.account);
        let verified = tokio::task::spawn_blocking(move || account.verify(&credential))
            .await
            .map_err(|e| {
                warn!(error = %e, "Credential verification task failed");
                AuthError::Interrupted
            })?;

        if !verified {
            debug!("Login rejected");
            return Err(AuthError::InvalidCredentials);
        }

        let session = Session::admin();
        match gate.commit(|| self.store.set(session)) {
            Some(Ok(())) => {
                info!(identifier = %self.account.identifier(), "Login successful");
                Ok(session)
            }
            Some(Err(e)) => Err(e.into()),
            None => {
                debug!("Login succeeded after being discarded; session left untouched");
                Err(AuthError::Interrupted)
            }
        }
    }
}

/// Handle to an in-flight login attempt.
///
/// Dropping it discards the attempt.
pub struct PendingLogin {
    gate: DiscardGate,
    abort: AbortHandle,
    rx: Option<oneshot::Receiver<Result<Session, AuthError>>>,
}

impl PendingLogin {
    /// Non-blocking check for the verdict. Returns `None` while pending.
    pub fn poll_outcome(&mut self) -> Option<Result<Session, AuthError>> {
        let rx = self.rx.as_mut()?;
        let outcome = match rx.try_recv() {
            Ok(outcome) => outcome,
            Err(oneshot::error::TryRecvError::Empty) => return None,
            Err(oneshot::error::TryRecvError::Closed) => Err(AuthError::Interrupted),
        };
        self.rx = None;
        Some(outcome)
    }

    /// Wait for the verdict.
    pub async fn outcome(mut self) -> Result<Session, AuthError> {
        match self.rx.take() {
            Some(rx) => rx.await.unwrap_or(Err(AuthError::Interrupted)),
            None => Err(AuthError::Interrupted),
        }
    }

    /// Abandon the attempt. No session write happens after this returns.
    pub fn discard(self) {
        drop(self);
    }
}

impl Drop for PendingLogin {
    fn drop(&mut self) {
        self.gate.discard();
        self.abort.abort();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::auth::credentials::HashCost;
    use crate::auth::session::MemorySessionStore;

    /// Memory store that counts writes.
    #[derive(Default)]
    struct CountingStore {
        inner: MemorySessionStore,
        sets: AtomicUsize,
    }

    impl CountingStore {
        fn sets(&self) -> usize {
            self.sets.load(Ordering::SeqCst)
        }
    }

    impl SessionStore for CountingStore {
        fn get(&self) -> Session {
            self.inner.get()
        }

        fn set(&self, session: Session) -> Result<(), SessionWriteError> {
            self.sets.fetch_add(1, Ordering::SeqCst);
            self.inner.set(session)
        }

        fn clear(&self) -> Result<(), SessionWriteError> {
            self.inner.clear()
        }
    }

    struct FailingStore;

    impl SessionStore for FailingStore {
        fn get(&self) -> Session {
            Session::signed_out()
        }

        fn set(&self, _session: Session) -> Result<(), SessionWriteError> {
            Err(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only").into())
        }

        fn clear(&self) -> Result<(), SessionWriteError> {
            Ok(())
        }
    }

    fn setup(delay: Duration) -> (Authenticator, Arc<CountingStore>) {
        let store = Arc::new(CountingStore::default());
        let account = AdminAccount::new("admin@cms.com", "admin123", HashCost::MIN).unwrap();
        let auth = Authenticator::new(account, store.clone()).with_delay(delay);
        (auth, store)
    }

    #[tokio::test]
    async fn test_valid_pair_signs_in_as_admin() {
        let (auth, store) = setup(Duration::ZERO);

        let session = auth.authenticate("admin@cms.com", "admin123").await.unwrap();

        assert_eq!(session, Session::admin());
        assert_eq!(store.get(), Session::admin());
        assert_eq!(store.sets(), 1);
    }

    #[tokio::test]
    async fn test_invalid_pairs_leave_store_unchanged() {
        let (auth, store) = setup(Duration::ZERO);

        let pairs = [
            ("admin@cms.com", "wrong"),
            ("admin@cms.com", ""),
            ("nobody@cms.com", "admin123"),
            ("nobody@cms.com", "wrong"),
            ("", ""),
            ("Admin@cms.com", "admin123"),
            ("admin@cms.com", "ADMIN123"),
        ];

        for (identifier, secret) in pairs {
            let result = auth.authenticate(identifier, secret).await;
            assert!(
                matches!(result, Err(AuthError::InvalidCredentials)),
                "{} / {}",
                identifier,
                secret
            );
        }

        assert_eq!(store.sets(), 0);
        assert_eq!(store.get(), Session::signed_out());
    }

    #[tokio::test]
    async fn test_failed_login_keeps_existing_session() {
        let (auth, store) = setup(Duration::ZERO);
        store.inner.set(Session::admin()).unwrap();

        let result = auth.authenticate("admin@cms.com", "nope").await;

        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
        assert_eq!(store.get(), Session::admin());
        assert_eq!(store.sets(), 0);
    }

    #[tokio::test]
    async fn test_store_failure_surfaces_as_session_write() {
        let account = AdminAccount::new("admin@cms.com", "admin123", HashCost::MIN).unwrap();
        let auth = Authenticator::new(account, Arc::new(FailingStore));

        let result = auth.authenticate("admin@cms.com", "admin123").await;
        assert!(matches!(result, Err(AuthError::SessionWrite(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_delay_is_applied_before_verdict() {
        let (auth, store) = setup(Duration::from_secs(1));
        let started = tokio::time::Instant::now();

        auth.authenticate("admin@cms.com", "admin123").await.unwrap();

        assert!(started.elapsed() >= Duration::from_secs(1));
        assert_eq!(store.sets(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_pending_login_resolves() {
        let (auth, store) = setup(Duration::from_millis(500));

        let pending = auth.begin(Credential::new("admin@cms.com", "admin123"));
        let session = pending.outcome().await.unwrap();

        assert_eq!(session, Session::admin());
        assert_eq!(store.sets(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_outcome_is_none_while_pending() {
        let (auth, _store) = setup(Duration::from_secs(1));

        let mut pending = auth.begin(Credential::new("admin@cms.com", "wrong"));
        assert!(pending.poll_outcome().is_none());

        let outcome = loop {
            tokio::time::sleep(Duration::from_millis(100)).await;
            if let Some(outcome) = pending.poll_outcome() {
                break outcome;
            }
        };
        assert!(matches!(outcome, Err(AuthError::InvalidCredentials)));
        // Already taken
        assert!(pending.poll_outcome().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_discard_before_resolution_never_sets() {
        let (auth, store) = setup(Duration::from_secs(1));

        let pending = auth.begin(Credential::new("admin@cms.com", "admin123"));
        tokio::time::sleep(Duration::from_millis(200)).await;
        pending.discard();

        // Well past the point where the delayed success would have fired
        tokio::time::sleep(Duration::from_secs(5)).await;
        tokio::task::yield_now().await;

        assert_eq!(store.sets(), 0);
        assert_eq!(store.get(), Session::signed_out());
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_pending_login_discards() {
        let (auth, store) = setup(Duration::from_secs(1));

        {
            let _pending = auth.begin(Credential::new("admin@cms.com", "admin123"));
        }

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(store.sets(), 0);
    }

    #[test]
    fn test_gate_blocks_commit_after_discard() {
        let gate = DiscardGate::new();
        assert_eq!(gate.commit(|| 1), Some(1));

        gate.clone().discard();
        assert_eq!(gate.commit(|| 2), None);
    }

    #[tokio::test]
    async fn test_late_success_through_discarded_gate_is_dropped() {
        let (auth, store) = setup(Duration::ZERO);
        let gate = DiscardGate::new();
        gate.discard();

        let result = auth
            .attempt(Credential::new("admin@cms.com", "admin123"), gate)
            .await;

        assert!(matches!(result, Err(AuthError::Interrupted)));
        assert_eq!(store.sets(), 0);
    }
}
