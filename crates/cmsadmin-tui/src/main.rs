//! CMS Admin - a terminal admin console for a multi-tenant CMS.
//!
//! Every admin page sits behind a route guard that reads the persisted
//! session. Run without arguments for the TUI, or with a subcommand for
//! scripted session management.

mod app;
mod forms;
mod ui;

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use serde::Serialize;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cmsadmin_core::auth::{
    logout, AdminAccount, AuthError, Authenticator, FileSessionStore, MemorySessionStore,
    SessionStore,
};
use cmsadmin_core::config::Config;
use cmsadmin_core::routes::{GuardState, HistoryMode, Navigator, Route, RouteGuard};

use app::{App, AppState};
use ui::input::handle_input;
use ui::render::render;

// ============================================================================
// Constants
// ============================================================================

/// Timeout for polling terminal events (in milliseconds)
const EVENT_POLL_TIMEOUT_MS: u64 = 100;

const LOG_FILE: &str = "cmsadmin.log";

const USAGE: &str = "\
Usage: cmsadmin [--ephemeral] [COMMAND]

Commands:
  status [--json]   Show the current session
  login             Sign in from the terminal
  logout            Clear the session
  route <path>      Show what the route guard does for <path>

Without a command, the interactive console starts.";

// ============================================================================
// Logging
// ============================================================================

/// Log to a file in the cache directory. The TUI owns stderr.
fn init_file_tracing(log_dir: Option<&PathBuf>) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let dir = log_dir?;
    if let Err(e) = std::fs::create_dir_all(dir) {
        eprintln!("Warning: cannot create log directory {}: {}", dir.display(), e);
        return None;
    }

    let appender = tracing_appender::rolling::never(dir, LOG_FILE);
    let (non_blocking, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(fmt::layer().with_ansi(false).with_writer(non_blocking))
        .with(filter)
        .init();

    Some(guard)
}

/// Log to stderr for one-shot commands.
fn init_stderr_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

// ============================================================================
// Startup
// ============================================================================

struct Options {
    ephemeral: bool,
    command: Vec<String>,
}

fn parse_args() -> Options {
    let mut ephemeral = false;
    let mut command = Vec::new();
    for arg in std::env::args().skip(1) {
        if arg == "--ephemeral" {
            ephemeral = true;
        } else {
            command.push(arg);
        }
    }
    Options { ephemeral, command }
}

/// Load config, falling back to defaults when the file is unreadable.
fn load_config() -> (Config, Option<PathBuf>) {
    let path = match Config::config_path() {
        Ok(path) => Some(path),
        Err(e) => {
            warn!(error = %e, "No config directory; settings will not be saved");
            None
        }
    };

    let mut config = match path.as_deref().map(Config::load_from) {
        Some(Ok(config)) => config,
        Some(Err(e)) => {
            warn!(error = %e, "Failed to load config, using defaults");
            Config::default()
        }
        None => Config::default(),
    };
    config.apply_env();
    (config, path)
}

fn open_store(config: &Config, ephemeral: bool) -> Result<Arc<dyn SessionStore>> {
    if ephemeral {
        return Ok(Arc::new(MemorySessionStore::new()));
    }
    let cache_dir = config.cache_dir().context("Failed to locate cache directory")?;
    Ok(Arc::new(FileSessionStore::new(cache_dir, config.storage_keys.clone())))
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let options = parse_args();

    if !options.command.is_empty() {
        init_stderr_tracing();
        let (config, _) = load_config();
        let store = open_store(&config, options.ephemeral)?;
        return run_command(&options, config, store).await;
    }

    let log_dir = Config::default().cache_dir().ok();
    let _log_guard = init_file_tracing(log_dir.as_ref());
    let (config, config_path) = load_config();
    info!(ephemeral = options.ephemeral, "CMS Admin starting");

    let store = open_store(&config, options.ephemeral)?;
    let config_path = if options.ephemeral { None } else { config_path };
    let mut app = App::new(config, config_path, store)?;

    // Returning operators land on the dashboard
    if app.is_authenticated() {
        app.navigate(Route::Dashboard, HistoryMode::Replace);
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Main loop
    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
    }

    info!("CMS Admin shutting down");
    Ok(())
}

async fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| render(f, app))?;

        // Poll for events with timeout so background results land promptly
        if event::poll(Duration::from_millis(EVENT_POLL_TIMEOUT_MS))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }

                // Ctrl+C always exits
                if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
                    app.quit();
                    return Ok(());
                }

                if handle_input(app, key) {
                    return Ok(());
                }
            }
        }

        app.check_background_tasks();

        if app.state == AppState::Quitting {
            return Ok(());
        }

        // Let spawned timers and the login task make progress
        tokio::task::yield_now().await;
    }
}

// ============================================================================
// CLI Commands
// ============================================================================

/// Navigator for one-shot commands: records where the guard sent us.
#[derive(Default)]
struct CliNavigator {
    rendered: Option<Route>,
    redirected: Option<Route>,
}

impl Navigator for CliNavigator {
    fn redirect(&mut self, route: Route, _mode: HistoryMode) {
        self.redirected = Some(route);
    }

    fn render_children(&mut self, route: Route) {
        self.rendered = Some(route);
    }
}

#[derive(Serialize)]
struct StatusReport {
    authenticated: bool,
    role: &'static str,
    ephemeral: bool,
}

async fn run_command(options: &Options, config: Config, store: Arc<dyn SessionStore>) -> Result<()> {
    let (name, args) = match options.command.split_first() {
        Some((name, args)) => (name.as_str(), args),
        None => ("help", &[][..]),
    };

    match name {
        "status" => {
            let session = store.get();
            if args.iter().any(|a| a == "--json") {
                let report = StatusReport {
                    authenticated: session.authenticated,
                    role: session.role.as_str(),
                    ephemeral: options.ephemeral,
                };
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else if session.authenticated {
                println!("Signed in (role: {})", session.role);
            } else {
                println!("Signed out");
            }
            Ok(())
        }
        "login" => cli_login(config, store).await,
        "logout" => {
            let mut navigator = CliNavigator::default();
            logout(store.as_ref(), &mut navigator).context("Failed to clear session")?;
            println!("Signed out");
            Ok(())
        }
        "route" => {
            let Some(path) = args.first() else {
                bail!("route needs a path\n\n{}", USAGE);
            };
            let route = Route::from_path(path);
            let mut navigator = CliNavigator::default();
            let state = RouteGuard::new(store).enter(route, &mut navigator);
            match (state, navigator.rendered, navigator.redirected) {
                (GuardState::Allowed, Some(page), _) => println!("{} -> render {}", path, page.title()),
                (GuardState::Denied, _, Some(target)) => {
                    println!("{} -> redirect to {} (sign in required)", path, target.path())
                }
                _ => println!("{} -> undecided", path),
            }
            Ok(())
        }
        "help" | "--help" | "-h" => {
            println!("{}", USAGE);
            Ok(())
        }
        other => bail!("Unknown command: {}\n\n{}", other, USAGE),
    }
}

async fn cli_login(config: Config, store: Arc<dyn SessionStore>) -> Result<()> {
    let identifier = match std::env::var("CMSADMIN_IDENTIFIER") {
        Ok(identifier) => identifier,
        Err(_) => {
            eprint!("Email: ");
            io::stderr().flush()?;
            let mut line = String::new();
            io::stdin().lock().read_line(&mut line)?;
            line.trim().to_string()
        }
    };
    let secret = match std::env::var("CMSADMIN_SECRET") {
        Ok(secret) => secret,
        Err(_) => rpassword::prompt_password("Password: ").context("Failed to read password")?,
    };

    let account = AdminAccount::from_config(&config).context("Failed to prepare admin account")?;
    let authenticator = Authenticator::new(account, store).with_delay(config.login_delay());

    match authenticator.authenticate(&identifier, &secret).await {
        Ok(session) => {
            println!("Signed in (role: {})", session.role);
            Ok(())
        }
        Err(AuthError::InvalidCredentials) => bail!("{}", app::INVALID_CREDENTIALS_MESSAGE),
        Err(e) => Err(e).context("Login failed"),
    }
}
