//! Application state management for the admin console.
//!
//! This module contains the core `App` struct that owns the navigation
//! history, the login form, the admin workspace and background task
//! coordination. `App` is the shell's `Navigator`: every page change goes
//! through the route guard.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use cmsadmin_core::auth::{
    logout, AdminAccount, AuthError, Authenticator, Credential, PendingLogin, Role, Session,
    SessionStore,
};
use cmsadmin_core::config::Config;
use cmsadmin_core::models::{
    Backup, DashboardSummary, DatabaseConsole, DbTable, Domain, DomainRegistry, User,
    UserDirectory, Website, WebsiteCatalog, SIMULATED_BACKUP_SECS,
};
use cmsadmin_core::routes::{GuardState, History, HistoryMode, Navigator, Route, RouteGuard};

use crate::forms::{Form, FormKind};

// ============================================================================
// Constants
// ============================================================================

/// Buffer size for the background task message channel.
const CHANNEL_BUFFER_SIZE: usize = 32;

/// Maximum length for the identifier (email) input.
const MAX_IDENTIFIER_LENGTH: usize = 50;

/// Maximum length for the secret input.
const MAX_SECRET_LENGTH: usize = 128;

/// Shown on the login form when the pair is rejected.
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid credentials. Use admin@cms.com / admin123";

// ============================================================================
// UI State Types
// ============================================================================

/// Overall application state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Normal,
    Searching,
    ShowingHelp,
    EditingForm,
    ConfirmingDelete,
    ConfirmingQuit,
    Quitting,
}

/// Login form focus state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginFocus {
    Identifier,
    Secret,
    Button,
}

/// Record awaiting delete confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteTarget {
    pub route: Route,
    pub id: u64,
    pub label: String,
}

// ============================================================================
// Background Task Results
// ============================================================================

/// Messages from spawned timer tasks back to the event loop.
#[derive(Debug)]
pub enum BackgroundResult {
    /// A simulated backup finished running
    BackupFinished(u64),
}

// ============================================================================
// Main Application Struct
// ============================================================================

pub struct App {
    // Core services
    pub config: Config,
    config_path: Option<PathBuf>,
    store: Arc<dyn SessionStore>,
    guard: RouteGuard,
    authenticator: Authenticator,
    // Store contents as of the last page change; frames read this
    session: Session,

    // Navigation
    pub history: History,
    pub route: Route,
    pub state: AppState,

    // Login form state
    pub login_identifier: String,
    pub login_secret: String,
    pub login_focus: LoginFocus,
    pub login_error: Option<String>,
    pub reveal_secret: bool,
    pending_login: Option<PendingLogin>,

    // Page state
    pub search_query: String,
    pub selection: usize,
    pub form: Option<Form>,
    pub delete_target: Option<DeleteTarget>,
    pub status_message: Option<String>,

    // Admin workspace
    pub dashboard: DashboardSummary,
    pub users: UserDirectory,
    pub websites: WebsiteCatalog,
    pub domains: DomainRegistry,
    pub database: DatabaseConsole,
    rng: StdRng,

    // Background task channel
    background_tx: mpsc::Sender<BackgroundResult>,
    background_rx: mpsc::Receiver<BackgroundResult>,
}

impl App {
    /// Create the app with the admin account described by `config`.
    pub fn new(config: Config, config_path: Option<PathBuf>, store: Arc<dyn SessionStore>) -> Result<Self> {
        let account = AdminAccount::from_config(&config).context("Failed to prepare admin account")?;
        Ok(Self::with_account(config, config_path, store, account))
    }

    pub fn with_account(
        config: Config,
        config_path: Option<PathBuf>,
        store: Arc<dyn SessionStore>,
        account: AdminAccount,
    ) -> Self {
        debug!(delay_ms = config.login_delay_ms, "App::with_account() starting");

        let authenticator = Authenticator::new(account, Arc::clone(&store)).with_delay(config.login_delay());
        let guard = RouteGuard::new(Arc::clone(&store));
        let session = store.get();
        let (background_tx, background_rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);

        // Pre-fill from env vars or the last successful identifier
        let login_identifier = std::env::var("CMSADMIN_IDENTIFIER")
            .ok()
            .or_else(|| config.last_identifier.clone())
            .unwrap_or_default();
        let login_secret = std::env::var("CMSADMIN_SECRET").unwrap_or_default();

        Self {
            config,
            config_path,
            store,
            guard,
            authenticator,
            session,

            history: History::default(),
            route: Route::Landing,
            state: AppState::Normal,

            login_identifier,
            login_secret,
            login_focus: LoginFocus::Identifier,
            login_error: None,
            reveal_secret: false,
            pending_login: None,

            search_query: String::new(),
            selection: 0,
            form: None,
            delete_target: None,
            status_message: None,

            dashboard: DashboardSummary::sample(),
            users: UserDirectory::sample(),
            websites: WebsiteCatalog::sample(),
            domains: DomainRegistry::sample(),
            database: DatabaseConsole::sample(),
            rng: StdRng::from_entropy(),

            background_tx,
            background_rx,
        }
    }

    /// Whether the session seen at the last page change grants admin access.
    pub fn is_authenticated(&self) -> bool {
        self.session.grants(Role::Admin)
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    /// Request a page. The guard decides whether it renders.
    pub fn navigate(&mut self, route: Route, mode: HistoryMode) -> GuardState {
        self.history.apply(route, mode);
        let guard = self.guard.clone();
        guard.enter(route, self)
    }

    /// Step back through history, re-checking access to the page revealed.
    pub fn go_back(&mut self) {
        match self.history.back() {
            Some(route) => {
                let guard = self.guard.clone();
                guard.enter(route, self);
            }
            None => self.status_message = Some("Already at the first page".to_string()),
        }
    }

    /// Cycle through the admin pages in sidebar order.
    pub fn next_page(&mut self, forward: bool) {
        let pages = Route::ADMIN_PAGES;
        let Some(index) = pages.iter().position(|r| *r == self.route) else {
            return;
        };
        let next = if forward {
            (index + 1) % pages.len()
        } else {
            (index + pages.len() - 1) % pages.len()
        };
        self.navigate(pages[next], HistoryMode::Push);
    }

    fn show(&mut self, route: Route) {
        if route != Route::Login {
            self.cancel_login();
        }
        if route != self.route {
            self.selection = 0;
            self.search_query.clear();
            self.form = None;
            self.delete_target = None;
            if self.state != AppState::Quitting {
                self.state = AppState::Normal;
            }
        }
        if route == Route::Login {
            self.reset_login_form();
        }
        debug!(%route, "Showing page");
        self.session = self.store.get();
        self.route = route;
    }

    // =========================================================================
    // Authentication
    // =========================================================================

    fn reset_login_form(&mut self) {
        self.login_focus = if self.login_identifier.is_empty() {
            LoginFocus::Identifier
        } else {
            LoginFocus::Secret
        };
        self.login_error = None;
        self.reveal_secret = false;
    }

    pub fn is_signing_in(&self) -> bool {
        self.pending_login.is_some()
    }

    /// Start a login attempt with the form contents.
    pub fn submit_login(&mut self) {
        if self.pending_login.is_some() {
            return;
        }

        let identifier = self.login_identifier.trim();
        if identifier.is_empty() || self.login_secret.is_empty() {
            self.login_error = Some("Email and password are required".to_string());
            return;
        }

        self.login_error = None;
        let credential = Credential::new(identifier, self.login_secret.clone());
        self.pending_login = Some(self.authenticator.begin(credential));
        debug!("Login attempt started");
    }

    /// Abandon an in-flight attempt, if any. It can no longer sign anyone in.
    pub fn cancel_login(&mut self) {
        if let Some(pending) = self.pending_login.take() {
            pending.discard();
            debug!("Pending login discarded");
        }
    }

    fn check_pending_login(&mut self) {
        let Some(pending) = self.pending_login.as_mut() else {
            return;
        };
        let Some(outcome) = pending.poll_outcome() else {
            return;
        };
        self.pending_login = None;

        match outcome {
            Ok(session) => {
                self.session = session;
                self.login_secret.clear();
                self.config.last_identifier = Some(self.login_identifier.trim().to_string());
                self.save_config();
                self.navigate(Route::Dashboard, HistoryMode::Push);
                self.status_message = Some("Welcome back, Admin!".to_string());
            }
            Err(AuthError::InvalidCredentials) => {
                self.login_error = Some(INVALID_CREDENTIALS_MESSAGE.to_string());
            }
            Err(e) => {
                warn!(error = %e, "Login failed");
                self.login_error = Some(format!("Login failed: {}", e));
            }
        }
    }

    fn save_config(&self) {
        if let Some(ref path) = self.config_path {
            if let Err(e) = self.config.save_to(path) {
                warn!(error = %e, "Failed to save config");
            }
        }
    }

    /// End the session and return to the login page.
    pub fn sign_out(&mut self) {
        self.cancel_login();
        let store = Arc::clone(&self.store);
        match logout(store.as_ref(), self) {
            Ok(()) => self.status_message = Some("Signed out".to_string()),
            Err(e) => {
                warn!(error = %e, "Failed to clear session");
                self.status_message = Some(format!("Signed out, but the session could not be cleared: {}", e));
            }
        }
    }

    pub fn request_quit(&mut self) {
        self.state = AppState::ConfirmingQuit;
    }

    pub fn quit(&mut self) {
        self.cancel_login();
        self.state = AppState::Quitting;
        info!("Quit requested");
    }

    // =========================================================================
    // Background Tasks
    // =========================================================================

    /// Drain finished background work and poll the pending login.
    pub fn check_background_tasks(&mut self) {
        let mut results = Vec::new();
        while let Ok(result) = self.background_rx.try_recv() {
            results.push(result);
        }

        for result in results {
            self.process_background_result(result);
        }

        self.check_pending_login();
    }

    fn process_background_result(&mut self, result: BackgroundResult) {
        match result {
            BackgroundResult::BackupFinished(id) => match self.database.complete_backup(id) {
                Some(backup) => {
                    info!(id, name = %backup.name, "Backup completed");
                    self.status_message = Some(format!("Backup {} completed ({})", backup.name, backup.size));
                }
                None => debug!(id, "Finished backup no longer running"),
            },
        }
    }

    fn schedule_backup_completion(&self, id: u64) {
        let tx = self.background_tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(SIMULATED_BACKUP_SECS)).await;
            // Receiver is gone once the app shuts down
            let _ = tx.send(BackgroundResult::BackupFinished(id)).await;
        });
    }

    // =========================================================================
    // Page Data
    // =========================================================================

    pub fn visible_users(&self) -> Vec<&User> {
        self.users.search(&self.search_query)
    }

    pub fn visible_websites(&self) -> Vec<&Website> {
        self.websites.search(&self.search_query)
    }

    pub fn visible_domains(&self) -> Vec<&Domain> {
        self.domains.search(&self.search_query)
    }

    pub fn visible_tables(&self) -> Vec<&DbTable> {
        self.database.search_tables(&self.search_query)
    }

    pub fn visible_backups(&self) -> &[Backup] {
        self.database.backups()
    }

    /// Number of selectable rows on the current page.
    pub fn row_count(&self) -> usize {
        match self.route {
            Route::Dashboard => self.dashboard.quick_actions.len(),
            Route::Users => self.visible_users().len(),
            Route::CreateWebsite => self.visible_websites().len(),
            Route::Domains => self.visible_domains().len(),
            Route::Database => self.visible_backups().len(),
            _ => 0,
        }
    }

    pub fn select_next(&mut self) {
        let max = self.row_count().saturating_sub(1);
        self.selection = (self.selection + 1).min(max);
    }

    pub fn select_prev(&mut self) {
        self.selection = self.selection.saturating_sub(1);
    }

    fn clamp_selection(&mut self) {
        self.selection = self.selection.min(self.row_count().saturating_sub(1));
    }

    /// Id and display label of the selected row.
    fn selected(&self) -> Option<(u64, String)> {
        match self.route {
            Route::Users => self
                .visible_users()
                .get(self.selection)
                .map(|u| (u.id, u.name.clone())),
            Route::CreateWebsite => self
                .visible_websites()
                .get(self.selection)
                .map(|w| (w.id, w.name.clone())),
            Route::Domains => self
                .visible_domains()
                .get(self.selection)
                .map(|d| (d.id, d.domain.clone())),
            Route::Database => self
                .visible_backups()
                .get(self.selection)
                .map(|b| (b.id, b.name.clone())),
            _ => None,
        }
    }

    // =========================================================================
    // Page Actions
    // =========================================================================

    pub fn start_search(&mut self) {
        self.state = AppState::Searching;
        self.search_query.clear();
        self.selection = 0;
    }

    /// Follow the selected dashboard shortcut.
    pub fn open_quick_action(&mut self) {
        let Some(action) = self.dashboard.quick_actions.get(self.selection).copied() else {
            return;
        };
        match action.target {
            Some(route) => {
                self.navigate(route, HistoryMode::Push);
            }
            None => self.status_message = Some(format!("{} is not available yet", action.title)),
        }
    }

    /// Open the add/create form for the current page.
    pub fn open_form(&mut self) {
        let form = match self.route {
            Route::Users => Form::add_user(),
            Route::CreateWebsite => Form::create_website(),
            Route::Domains => Form::add_domain(&self.websites),
            Route::Database => Form::start_backup(),
            _ => return,
        };
        self.form = Some(form);
        self.state = AppState::EditingForm;
    }

    pub fn open_query_console(&mut self) {
        if self.route == Route::Database {
            self.form = Some(Form::run_query());
            self.state = AppState::EditingForm;
        }
    }

    pub fn close_form(&mut self) {
        self.form = None;
        self.state = AppState::Normal;
    }

    /// Submit the open form. Validation errors keep the form open.
    pub fn submit_form(&mut self) {
        let Some(form) = self.form.take() else {
            return;
        };

        let result = match form.kind {
            FormKind::AddUser => self.users.add(form.new_user()).map(|(user, invitation)| {
                info!(id = user.id, "User added");
                match invitation {
                    Some(invitation) => invitation.message(),
                    None => format!("User {} added", user.name),
                }
            }),
            FormKind::CreateWebsite => self.websites.create(form.new_website()).map(|(website, message)| {
                info!(id = website.id, subdomain = %website.subdomain, "Website created");
                message
            }),
            FormKind::AddDomain => self
                .domains
                .add(form.new_domain(), &self.websites)
                .map(|domain| format!("Domain {} added; verification pending", domain.domain)),
            FormKind::StartBackup => {
                let backup = self.database.start_backup(form.new_backup());
                let (id, message) = (backup.id, format!("Backup {} started", backup.name));
                self.schedule_backup_completion(id);
                Ok(message)
            }
            FormKind::RunQuery => self.database.run_query(&form.query()),
        };

        match result {
            Ok(message) => {
                self.status_message = Some(message);
                self.state = AppState::Normal;
            }
            Err(e) => {
                debug!(error = %e, form = ?form.kind, "Form rejected");
                let mut form = form;
                form.error = Some(e.to_string());
                self.form = Some(form);
            }
        }
    }

    pub fn toggle_selected(&mut self) {
        let Some((id, label)) = self.selected() else {
            return;
        };
        let result = match self.route {
            Route::Users => self.users.toggle_status(id).map(|s| s.label()),
            Route::CreateWebsite => self.websites.toggle_status(id).map(|s| s.label()),
            _ => return,
        };
        self.status_message = Some(match result {
            Ok(status) => format!("{} is now {}", label, status),
            Err(e) => e.to_string(),
        });
    }

    pub fn refresh_selected_domain(&mut self) {
        if self.route != Route::Domains {
            return;
        }
        let Some((id, label)) = self.selected() else {
            return;
        };
        self.status_message = Some(match self.domains.refresh(id, &mut self.rng) {
            Ok(status) => format!("{} checked: {}", label, status.label()),
            Err(e) => e.to_string(),
        });
    }

    pub fn request_delete(&mut self) {
        if let Some((id, label)) = self.selected() {
            self.delete_target = Some(DeleteTarget {
                route: self.route,
                id,
                label,
            });
            self.state = AppState::ConfirmingDelete;
        }
    }

    pub fn confirm_delete(&mut self) {
        self.state = AppState::Normal;
        let Some(target) = self.delete_target.take() else {
            return;
        };

        let result = match target.route {
            Route::Users => self.users.remove(target.id).map(|_| ()),
            Route::CreateWebsite => self.websites.remove(target.id).map(|_| ()),
            Route::Domains => self.domains.remove(target.id).map(|_| ()),
            Route::Database => self.database.remove_backup(target.id).map(|_| ()),
            _ => return,
        };

        self.status_message = Some(match result {
            Ok(()) => {
                info!(route = %target.route, id = target.id, "Record deleted");
                format!("Deleted {}", target.label)
            }
            Err(e) => e.to_string(),
        });
        self.clamp_selection();
    }

    pub fn cancel_delete(&mut self) {
        self.delete_target = None;
        self.state = AppState::Normal;
    }
}

impl Navigator for App {
    fn redirect(&mut self, route: Route, mode: HistoryMode) {
        self.navigate(route, mode);
    }

    fn render_children(&mut self, route: Route) {
        self.show(route);
    }
}

// ============================================================================
// Input validation helpers (exported for use in input.rs)
// ============================================================================

/// Check if a character is valid for input (no control characters)
pub fn is_valid_input_char(c: char) -> bool {
    !c.is_control()
}

/// Check if an identifier character should be accepted
pub fn can_add_identifier_char(current_len: usize, c: char) -> bool {
    current_len < MAX_IDENTIFIER_LENGTH && is_valid_input_char(c)
}

/// Check if a secret character should be accepted
pub fn can_add_secret_char(current_len: usize, c: char) -> bool {
    current_len < MAX_SECRET_LENGTH && is_valid_input_char(c)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
pub(crate) mod tests {
    use cmsadmin_core::auth::{HashCost, MemorySessionStore, Session};
    use cmsadmin_core::models::BackupStatus;

    use super::*;

    /// App over an in-memory store with a cheap hash and no login delay.
    pub(crate) fn test_app(session: Session) -> (App, Arc<MemorySessionStore>) {
        let store = Arc::new(MemorySessionStore::new());
        if session.authenticated {
            store.set(session).unwrap();
        }
        let config = Config {
            login_delay_ms: 0,
            ..Config::default()
        };
        let account = AdminAccount::new("admin@cms.com", "admin123", HashCost::MIN).unwrap();
        let mut app = App::with_account(config, None, store.clone(), account);
        app.login_identifier.clear();
        app.login_secret.clear();
        (app, store)
    }

    /// Poll until the pending login resolves.
    pub(crate) async fn settle_login(app: &mut App) {
        for _ in 0..400 {
            app.check_background_tasks();
            if !app.is_signing_in() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("login attempt never resolved");
    }

    fn fill_login(app: &mut App, identifier: &str, secret: &str) {
        app.login_identifier = identifier.to_string();
        app.login_secret = secret.to_string();
    }

    // -------------------------------------------------------------------------
    // Navigation
    // -------------------------------------------------------------------------

    #[test]
    fn test_protected_page_redirects_when_signed_out() {
        let (mut app, _) = test_app(Session::signed_out());

        for route in Route::ADMIN_PAGES {
            let state = app.navigate(route, HistoryMode::Push);
            assert_eq!(state, GuardState::Denied);
            assert_eq!(app.route, Route::Login);
            assert!(!app.history.contains(route), "{} left in history", route);
        }
    }

    #[test]
    fn test_admin_pages_render_when_signed_in() {
        let (mut app, _) = test_app(Session::admin());
        assert_eq!(app.navigate(Route::Users, HistoryMode::Push), GuardState::Allowed);
        assert_eq!(app.route, Route::Users);

        app.next_page(true);
        assert_eq!(app.route, Route::CreateWebsite);
        app.next_page(false);
        app.next_page(false);
        assert_eq!(app.route, Route::Dashboard);
    }

    #[test]
    fn test_back_rechecks_access() {
        let (mut app, store) = test_app(Session::admin());
        app.navigate(Route::Dashboard, HistoryMode::Push);
        app.navigate(Route::Users, HistoryMode::Push);

        store.clear().unwrap();
        app.go_back();
        assert_eq!(app.route, Route::Login);
    }

    #[test]
    fn test_denied_page_from_login_keeps_one_login_entry() {
        let (mut app, _) = test_app(Session::signed_out());
        app.navigate(Route::Login, HistoryMode::Push);
        for _ in 0..3 {
            assert_eq!(app.navigate(Route::Dashboard, HistoryMode::Push), GuardState::Denied);
        }

        assert_eq!(app.route, Route::Login);
        assert_eq!(app.history.depth(), 2);
        app.go_back();
        assert_eq!(app.route, Route::Landing);
    }

    #[test]
    fn test_cycling_pages_keeps_history_bounded() {
        let (mut app, _) = test_app(Session::admin());
        app.navigate(Route::Dashboard, HistoryMode::Push);
        for _ in 0..40 {
            app.next_page(true);
        }
        assert!(app.history.depth() <= Route::ADMIN_PAGES.len() + 1);
    }

    #[test]
    fn test_back_at_start_keeps_page() {
        let (mut app, _) = test_app(Session::signed_out());
        app.go_back();
        assert_eq!(app.route, Route::Landing);
        assert!(app.status_message.is_some());
    }

    #[test]
    fn test_page_change_resets_page_state() {
        let (mut app, _) = test_app(Session::admin());
        app.navigate(Route::Users, HistoryMode::Push);
        app.search_query = "jane".to_string();
        app.selection = 2;

        app.navigate(Route::Domains, HistoryMode::Push);
        assert!(app.search_query.is_empty());
        assert_eq!(app.selection, 0);
    }

    // -------------------------------------------------------------------------
    // Login / Logout
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_login_success_opens_dashboard() {
        let (mut app, store) = test_app(Session::signed_out());
        app.navigate(Route::Login, HistoryMode::Push);
        fill_login(&mut app, "admin@cms.com", "admin123");

        app.submit_login();
        assert!(app.is_signing_in());
        settle_login(&mut app).await;

        assert_eq!(store.get(), Session::admin());
        assert_eq!(app.route, Route::Dashboard);
        assert!(app.login_secret.is_empty());
        assert_eq!(app.config.last_identifier.as_deref(), Some("admin@cms.com"));
    }

    #[tokio::test]
    async fn test_login_success_saves_last_identifier() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let store = Arc::new(MemorySessionStore::new());
        let config = Config {
            login_delay_ms: 0,
            ..Config::default()
        };
        let account = AdminAccount::new("admin@cms.com", "admin123", HashCost::MIN).unwrap();
        let mut app = App::with_account(config, Some(path.clone()), store, account);
        app.navigate(Route::Login, HistoryMode::Push);
        fill_login(&mut app, "admin@cms.com", "admin123");

        app.submit_login();
        settle_login(&mut app).await;

        let saved = Config::load_from(&path).unwrap();
        assert_eq!(saved.last_identifier.as_deref(), Some("admin@cms.com"));
    }

    #[tokio::test]
    async fn test_login_failure_stays_on_form() {
        let (mut app, store) = test_app(Session::signed_out());
        app.navigate(Route::Login, HistoryMode::Push);
        fill_login(&mut app, "admin@cms.com", "wrong");

        app.submit_login();
        settle_login(&mut app).await;

        assert_eq!(app.route, Route::Login);
        assert_eq!(app.login_error.as_deref(), Some(INVALID_CREDENTIALS_MESSAGE));
        assert_eq!(store.get(), Session::signed_out());
    }

    #[test]
    fn test_login_requires_both_fields() {
        let (mut app, _) = test_app(Session::signed_out());
        fill_login(&mut app, "  ", "admin123");
        app.submit_login();
        assert!(!app.is_signing_in());
        assert!(app.login_error.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_leaving_login_discards_attempt() {
        let (mut app, store) = test_app(Session::signed_out());
        app.authenticator = app.authenticator.clone().with_delay(Duration::from_secs(1));
        app.navigate(Route::Login, HistoryMode::Push);
        fill_login(&mut app, "admin@cms.com", "admin123");

        app.submit_login();
        app.go_back();
        assert_eq!(app.route, Route::Landing);
        assert!(!app.is_signing_in());

        tokio::time::sleep(Duration::from_secs(5)).await;
        app.check_background_tasks();
        assert_eq!(store.get(), Session::signed_out());
        assert_eq!(app.route, Route::Landing);
    }

    #[test]
    fn test_sign_out_from_admin_page() {
        let (mut app, store) = test_app(Session::admin());
        app.navigate(Route::Dashboard, HistoryMode::Push);
        app.navigate(Route::Domains, HistoryMode::Push);

        app.sign_out();
        assert_eq!(store.get(), Session::signed_out());
        assert_eq!(app.route, Route::Login);
        assert!(!app.history.contains(Route::Domains));

        // Back lands on a protected page and bounces to login again
        app.go_back();
        assert_eq!(app.route, Route::Login);
    }

    // -------------------------------------------------------------------------
    // Page Actions
    // -------------------------------------------------------------------------

    #[test]
    fn test_form_error_keeps_form_open() {
        let (mut app, _) = test_app(Session::admin());
        app.navigate(Route::Users, HistoryMode::Push);
        app.open_form();
        assert_eq!(app.state, AppState::EditingForm);

        app.submit_form();
        let form = app.form.as_ref().unwrap();
        assert_eq!(form.error.as_deref(), Some("Name is required"));
        assert_eq!(app.state, AppState::EditingForm);
    }

    #[test]
    fn test_delete_requires_confirmation() {
        let (mut app, _) = test_app(Session::admin());
        app.navigate(Route::Users, HistoryMode::Push);
        app.selection = 1;

        app.request_delete();
        assert_eq!(app.state, AppState::ConfirmingDelete);
        assert_eq!(app.delete_target.as_ref().unwrap().label, "John Doe");

        app.cancel_delete();
        assert_eq!(app.users.all().len(), 4);

        app.request_delete();
        app.confirm_delete();
        assert_eq!(app.users.all().len(), 3);
        assert!(app.users.get(2).is_none());
    }

    #[test]
    fn test_selection_is_clamped_after_delete() {
        let (mut app, _) = test_app(Session::admin());
        app.navigate(Route::Domains, HistoryMode::Push);
        app.selection = 2;
        app.request_delete();
        app.confirm_delete();
        assert_eq!(app.selection, 1);
    }

    #[test]
    fn test_toggle_and_refresh() {
        let (mut app, _) = test_app(Session::admin());
        app.navigate(Route::Users, HistoryMode::Push);
        app.toggle_selected();
        assert_eq!(app.status_message.as_deref(), Some("Admin User is now SUSPENDED"));

        app.navigate(Route::Domains, HistoryMode::Push);
        app.selection = 1;
        app.refresh_selected_domain();
        let message = app.status_message.clone().unwrap();
        assert!(message.starts_with("mybusiness.org checked:"));
    }

    #[test]
    fn test_quick_action_without_page() {
        let (mut app, _) = test_app(Session::admin());
        app.navigate(Route::Dashboard, HistoryMode::Push);
        app.selection = 3;
        app.open_quick_action();
        assert_eq!(app.route, Route::Dashboard);

        app.selection = 1;
        app.open_quick_action();
        assert_eq!(app.route, Route::CreateWebsite);
    }

    #[tokio::test(start_paused = true)]
    async fn test_backup_completes_after_delay() {
        let (mut app, _) = test_app(Session::admin());
        app.navigate(Route::Database, HistoryMode::Push);
        app.open_form();
        app.submit_form();

        let id = app.database.backups()[0].id;
        assert_eq!(app.database.backups()[0].status, BackupStatus::Running);

        // A running backup cannot be deleted
        app.selection = 0;
        app.request_delete();
        app.confirm_delete();
        assert_eq!(app.database.backups()[0].id, id);

        tokio::time::sleep(Duration::from_secs(SIMULATED_BACKUP_SECS + 1)).await;
        app.check_background_tasks();

        let backup = &app.database.backups()[0];
        assert_eq!(backup.status, BackupStatus::Completed);
        assert_eq!(backup.size, "15.2 MB");
    }

    // -------------------------------------------------------------------------
    // Input Validation Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_can_add_identifier_char() {
        assert!(can_add_identifier_char(0, 'a'));
        assert!(can_add_identifier_char(49, '@'));
        assert!(!can_add_identifier_char(50, 'a'));
        assert!(!can_add_identifier_char(0, '\x00'));
        assert!(!can_add_identifier_char(0, '\n'));
    }

    #[test]
    fn test_can_add_secret_char() {
        assert!(can_add_secret_char(0, 'a'));
        assert!(can_add_secret_char(127, '!'));
        assert!(!can_add_secret_char(128, 'a'));
        assert!(!can_add_secret_char(0, '\r'));
    }
}
