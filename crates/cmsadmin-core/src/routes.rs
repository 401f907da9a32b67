//! Routing table and the route guard.
//!
//! Every route is classified as public or protected at compile time. The
//! guard re-reads the session store on each navigation and either lets the
//! page render or redirects to the login route, replacing the history
//! entry so back-navigation cannot return to the protected page.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, info};

use crate::auth::{Role, SessionStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Landing,
    Login,
    Dashboard,
    Users,
    CreateWebsite,
    Domains,
    Database,
    NotFound,
}

/// Who may enter a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    Protected { required_role: Role },
}

impl Route {
    pub const ALL: [Route; 8] = [
        Route::Landing,
        Route::Login,
        Route::Dashboard,
        Route::Users,
        Route::CreateWebsite,
        Route::Domains,
        Route::Database,
        Route::NotFound,
    ];

    /// Admin pages in sidebar order.
    pub const ADMIN_PAGES: [Route; 5] = [
        Route::Dashboard,
        Route::Users,
        Route::CreateWebsite,
        Route::Domains,
        Route::Database,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            Route::Landing => "/",
            Route::Login => "/login",
            Route::Dashboard => "/admin",
            Route::Users => "/admin/users",
            Route::CreateWebsite => "/admin/create-website",
            Route::Domains => "/admin/domains",
            Route::Database => "/admin/database",
            Route::NotFound => "*",
        }
    }

    /// Resolve a path. Unknown paths resolve to `NotFound`.
    pub fn from_path(path: &str) -> Self {
        let path = path.trim();
        let path = if path.len() > 1 {
            path.strip_suffix('/').unwrap_or(path)
        } else {
            path
        };

        match path {
            "/" => Route::Landing,
            "/login" => Route::Login,
            "/admin" => Route::Dashboard,
            "/admin/users" => Route::Users,
            "/admin/create-website" => Route::CreateWebsite,
            "/admin/domains" => Route::Domains,
            "/admin/database" => Route::Database,
            _ => Route::NotFound,
        }
    }

    pub fn access(&self) -> Access {
        match self {
            Route::Landing | Route::Login | Route::NotFound => Access::Public,
            Route::Dashboard
            | Route::Users
            | Route::CreateWebsite
            | Route::Domains
            | Route::Database => Access::Protected {
                required_role: Role::Admin,
            },
        }
    }

    pub fn is_protected(&self) -> bool {
        matches!(self.access(), Access::Protected { .. })
    }

    /// Sidebar / title text.
    pub fn title(&self) -> &'static str {
        match self {
            Route::Landing => "Home",
            Route::Login => "Sign In",
            Route::Dashboard => "Dashboard",
            Route::Users => "User Management",
            Route::CreateWebsite => "Create Website",
            Route::Domains => "Domain Mapping",
            Route::Database => "Database",
            Route::NotFound => "Not Found",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Route::Dashboard => "Overview and analytics",
            Route::Users => "Manage user accounts",
            Route::CreateWebsite => "Add new websites",
            Route::Domains => "Configure custom domains",
            Route::Database => "Manage data and settings",
            Route::Landing | Route::Login | Route::NotFound => "",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// How a redirect affects navigation history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryMode {
    Push,
    Replace,
}

/// The application shell, as seen by the guard and by logout.
pub trait Navigator {
    fn redirect(&mut self, route: Route, mode: HistoryMode);
    fn render_children(&mut self, route: Route);
}

/// Outcome of one navigation through the guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardState {
    Unknown,
    Allowed,
    Denied,
}

/// Gates rendering of protected routes.
#[derive(Clone)]
pub struct RouteGuard {
    store: Arc<dyn SessionStore>,
}

impl RouteGuard {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    /// Decide whether `route` may render right now.
    pub fn evaluate(&self, route: Route) -> GuardState {
        match route.access() {
            Access::Public => GuardState::Allowed,
            Access::Protected { required_role } => {
                if self.store.get().grants(required_role) {
                    GuardState::Allowed
                } else {
                    GuardState::Denied
                }
            }
        }
    }

    /// Run one navigation: render the route, or redirect to login.
    pub fn enter(&self, route: Route, navigator: &mut impl Navigator) -> GuardState {
        debug!(%route, state = ?GuardState::Unknown, "Evaluating navigation");

        let state = self.evaluate(route);
        match state {
            GuardState::Allowed => navigator.render_children(route),
            GuardState::Denied => {
                info!(%route, "Navigation denied, redirecting to login");
                navigator.redirect(Route::Login, HistoryMode::Replace);
            }
            GuardState::Unknown => {}
        }
        state
    }
}

/// Navigation history as a stack of routes.
///
/// The stack is never empty and holds each route at most once, so its
/// depth is bounded by the number of routes.
#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<Route>,
}

impl Default for History {
    fn default() -> Self {
        Self::new(Route::Landing)
    }
}

impl History {
    pub fn new(start: Route) -> Self {
        Self {
            entries: vec![start],
        }
    }

    pub fn current(&self) -> Route {
        self.entries.last().copied().unwrap_or(Route::Landing)
    }

    /// Put `route` on top, dropping any earlier visit to it.
    pub fn push(&mut self, route: Route) {
        self.entries.retain(|&entry| entry != route);
        self.entries.push(route);
    }

    /// Swap the top entry for `route`, dropping any earlier visit to it.
    pub fn replace(&mut self, route: Route) {
        self.entries.pop();
        self.push(route);
    }

    /// Step back one entry. Returns the route now on top, or `None` at the start.
    pub fn back(&mut self) -> Option<Route> {
        if self.entries.len() > 1 {
            self.entries.pop();
            Some(self.current())
        } else {
            None
        }
    }

    pub fn depth(&self) -> usize {
        self.entries.len()
    }

    pub fn contains(&self, route: Route) -> bool {
        self.entries.contains(&route)
    }

    pub fn apply(&mut self, route: Route, mode: HistoryMode) {
        match mode {
            HistoryMode::Push => self.push(route),
            HistoryMode::Replace => self.replace(route),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{MemorySessionStore, Session};

    /// Records what the guard asked the shell to do.
    #[derive(Default)]
    struct RecordingNavigator {
        rendered: Vec<Route>,
        redirects: Vec<(Route, HistoryMode)>,
    }

    impl Navigator for RecordingNavigator {
        fn redirect(&mut self, route: Route, mode: HistoryMode) {
            self.redirects.push((route, mode));
        }

        fn render_children(&mut self, route: Route) {
            self.rendered.push(route);
        }
    }

    fn guard_with(session: Option<Session>) -> (RouteGuard, Arc<MemorySessionStore>) {
        let store = Arc::new(MemorySessionStore::new());
        if let Some(session) = session {
            store.set(session).unwrap();
        }
        (RouteGuard::new(store.clone()), store)
    }

    #[test]
    fn test_paths_roundtrip() {
        for route in Route::ALL {
            if route != Route::NotFound {
                assert_eq!(Route::from_path(route.path()), route);
            }
        }
    }

    #[test]
    fn test_from_path_normalizes() {
        assert_eq!(Route::from_path("/admin/"), Route::Dashboard);
        assert_eq!(Route::from_path(" /admin/users "), Route::Users);
        assert_eq!(Route::from_path("/admin/settings"), Route::NotFound);
        assert_eq!(Route::from_path(""), Route::NotFound);
        assert_eq!(Route::from_path("/"), Route::Landing);
    }

    #[test]
    fn test_every_protected_route_requires_admin() {
        for route in Route::ALL {
            match route.access() {
                Access::Protected { required_role } => assert_eq!(required_role, Role::Admin),
                Access::Public => assert!(matches!(
                    route,
                    Route::Landing | Route::Login | Route::NotFound
                )),
            }
        }
        for route in Route::ADMIN_PAGES {
            assert!(route.is_protected());
        }
    }

    #[test]
    fn test_empty_store_redirects_every_protected_route() {
        let (guard, _store) = guard_with(None);

        for route in Route::ALL.into_iter().filter(Route::is_protected) {
            let mut nav = RecordingNavigator::default();
            assert_eq!(guard.enter(route, &mut nav), GuardState::Denied);
            assert!(nav.rendered.is_empty(), "{} rendered", route);
            assert_eq!(nav.redirects, vec![(Route::Login, HistoryMode::Replace)]);
        }
    }

    #[test]
    fn test_admin_session_renders_protected_route() {
        let (guard, _store) = guard_with(Some(Session::admin()));
        let mut nav = RecordingNavigator::default();

        assert_eq!(guard.enter(Route::Users, &mut nav), GuardState::Allowed);
        assert_eq!(nav.rendered, vec![Route::Users]);
        assert!(nav.redirects.is_empty());
    }

    #[test]
    fn test_wrong_role_or_flag_is_denied() {
        for session in [
            Session {
                authenticated: true,
                role: Role::None,
            },
            Session {
                authenticated: false,
                role: Role::Admin,
            },
        ] {
            let (guard, _store) = guard_with(Some(session));
            assert_eq!(guard.evaluate(Route::Database), GuardState::Denied);
        }
    }

    #[test]
    fn test_public_routes_always_render() {
        let (guard, _store) = guard_with(None);
        for route in [Route::Landing, Route::Login, Route::NotFound] {
            let mut nav = RecordingNavigator::default();
            assert_eq!(guard.enter(route, &mut nav), GuardState::Allowed);
            assert_eq!(nav.rendered, vec![route]);
        }
    }

    #[test]
    fn test_guard_rereads_store_each_navigation() {
        let (guard, store) = guard_with(Some(Session::admin()));
        assert_eq!(guard.evaluate(Route::Dashboard), GuardState::Allowed);

        store.clear().unwrap();
        assert_eq!(guard.evaluate(Route::Dashboard), GuardState::Denied);

        store.set(Session::admin()).unwrap();
        assert_eq!(guard.evaluate(Route::Dashboard), GuardState::Allowed);
    }

    #[test]
    fn test_history_replace_hides_denied_route() {
        let mut history = History::default();
        history.push(Route::Dashboard);
        history.apply(Route::Login, HistoryMode::Replace);

        assert_eq!(history.current(), Route::Login);
        assert!(!history.contains(Route::Dashboard));
        assert_eq!(history.back(), Some(Route::Landing));
        assert_eq!(history.back(), None);
        assert_eq!(history.depth(), 1);
    }

    #[test]
    fn test_history_push_skips_duplicate_top() {
        let mut history = History::new(Route::Dashboard);
        history.push(Route::Dashboard);
        history.push(Route::Users);
        assert_eq!(history.depth(), 2);
        assert_eq!(history.current(), Route::Users);
    }

    #[test]
    fn test_history_cycling_pages_stays_bounded() {
        let mut history = History::new(Route::Landing);
        for route in Route::ADMIN_PAGES.iter().cycle().take(50) {
            history.push(*route);
        }

        assert_eq!(history.depth(), Route::ADMIN_PAGES.len() + 1);
        assert_eq!(history.current(), Route::Database);
        assert_eq!(history.back(), Some(Route::Domains));
    }

    #[test]
    fn test_history_denied_push_from_login_leaves_one_login() {
        let mut history = History::new(Route::Landing);
        history.push(Route::Login);
        history.push(Route::Dashboard);
        history.apply(Route::Login, HistoryMode::Replace);

        assert_eq!(history.current(), Route::Login);
        assert_eq!(history.depth(), 2);
        assert_eq!(history.back(), Some(Route::Landing));
    }

    #[test]
    fn test_history_push_moves_earlier_visit_to_top() {
        let mut history = History::new(Route::Landing);
        history.push(Route::Users);
        history.push(Route::Domains);
        history.push(Route::Users);

        assert_eq!(history.depth(), 3);
        assert_eq!(history.back(), Some(Route::Domains));
        assert_eq!(history.back(), Some(Route::Landing));
    }
}
