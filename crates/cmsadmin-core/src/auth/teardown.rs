use tracing::{info, warn};

use super::session::{SessionStore, SessionWriteError};
use crate::routes::{HistoryMode, Navigator, Route};

/// Revoke access and return to the login route.
///
/// Navigation happens even if clearing the store fails; the failure is
/// still returned so the caller can report it.
pub fn logout(store: &dyn SessionStore, navigator: &mut impl Navigator) -> Result<(), SessionWriteError> {
    let result = store.clear();
    match result {
        Ok(()) => info!("Logged out"),
        Err(ref e) => warn!(error = %e, "Failed to clear session on logout"),
    }
    navigator.redirect(Route::Login, HistoryMode::Replace);
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{MemorySessionStore, Role, Session};

    #[derive(Default)]
    struct RecordingNavigator {
        redirects: Vec<(Route, HistoryMode)>,
    }

    impl Navigator for RecordingNavigator {
        fn redirect(&mut self, route: Route, mode: HistoryMode) {
            self.redirects.push((route, mode));
        }

        fn render_children(&mut self, _route: Route) {}
    }

    struct StuckStore;

    impl SessionStore for StuckStore {
        fn get(&self) -> Session {
            Session::admin()
        }

        fn set(&self, _session: Session) -> Result<(), SessionWriteError> {
            Ok(())
        }

        fn clear(&self) -> Result<(), SessionWriteError> {
            Err(std::io::Error::other("disk gone").into())
        }
    }

    #[test]
    fn test_logout_signs_out_from_any_state() {
        for prior in [
            None,
            Some(Session::admin()),
            Some(Session {
                authenticated: true,
                role: Role::None,
            }),
        ] {
            let store = MemorySessionStore::new();
            if let Some(session) = prior {
                store.set(session).unwrap();
            }
            let mut nav = RecordingNavigator::default();

            logout(&store, &mut nav).unwrap();

            assert_eq!(store.get(), Session::signed_out());
            assert_eq!(nav.redirects, vec![(Route::Login, HistoryMode::Replace)]);
        }
    }

    #[test]
    fn test_logout_twice_still_navigates() {
        let store = MemorySessionStore::new();
        let mut nav = RecordingNavigator::default();

        logout(&store, &mut nav).unwrap();
        logout(&store, &mut nav).unwrap();

        assert_eq!(store.get(), Session::signed_out());
        assert_eq!(nav.redirects.len(), 2);
    }

    #[test]
    fn test_logout_navigates_even_when_clear_fails() {
        let mut nav = RecordingNavigator::default();
        assert!(logout(&StuckStore, &mut nav).is_err());
        assert_eq!(nav.redirects, vec![(Route::Login, HistoryMode::Replace)]);
    }
}
