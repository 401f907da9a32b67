//! Keyboard input handling for the TUI.
//!
//! Overlays take input first, then the login form, then page keys. Every
//! page change goes through `App::navigate`, so the route guard sees it.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use cmsadmin_core::routes::{HistoryMode, Route};

use crate::app::{can_add_identifier_char, can_add_secret_char, App, AppState, LoginFocus};

/// Handle keyboard input. Returns true if the app should quit.
pub fn handle_input(app: &mut App, key: KeyEvent) -> bool {
    match app.state {
        AppState::ShowingHelp => {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
                app.state = AppState::Normal;
            }
            return false;
        }
        AppState::ConfirmingQuit => {
            match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                    app.quit();
                    return true;
                }
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                    app.state = AppState::Normal;
                }
                _ => {}
            }
            return false;
        }
        AppState::ConfirmingDelete => {
            match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') => app.confirm_delete(),
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => app.cancel_delete(),
                _ => {}
            }
            return false;
        }
        AppState::EditingForm => {
            handle_form_input(app, key);
            return false;
        }
        AppState::Searching => {
            handle_search_input(app, key);
            return false;
        }
        AppState::Normal | AppState::Quitting => {}
    }

    match app.route {
        Route::Login => handle_login_input(app, key),
        Route::Landing | Route::NotFound => handle_public_input(app, key),
        _ => handle_admin_input(app, key),
    }

    false
}

fn handle_search_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.state = AppState::Normal;
            app.search_query.clear();
            app.selection = 0;
        }
        KeyCode::Enter => {
            // Keep search query active
            app.state = AppState::Normal;
        }
        KeyCode::Backspace => {
            app.search_query.pop();
            app.selection = 0;
        }
        KeyCode::Char(c) => {
            app.search_query.push(c);
            app.selection = 0;
        }
        _ => {}
    }
}

fn handle_form_input(app: &mut App, key: KeyEvent) {
    let Some(form) = app.form.as_mut() else {
        app.state = AppState::Normal;
        return;
    };

    match key.code {
        KeyCode::Esc => app.close_form(),
        KeyCode::Tab | KeyCode::Down => form.focus_next(),
        KeyCode::BackTab | KeyCode::Up => form.focus_prev(),
        KeyCode::Left => form.cycle(false),
        KeyCode::Right => form.cycle(true),
        KeyCode::Enter => {
            if form.on_submit_button() {
                app.submit_form();
            } else {
                form.focus_next();
            }
        }
        KeyCode::Backspace => form.backspace(),
        KeyCode::Char(c) => form.insert_char(c),
        _ => {}
    }
}

fn handle_login_input(app: &mut App, key: KeyEvent) {
    // Only leaving is allowed while an attempt is in flight
    if app.is_signing_in() {
        if key.code == KeyCode::Esc {
            leave_login(app);
        }
        return;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        if key.code == KeyCode::Char('r') {
            app.reveal_secret = !app.reveal_secret;
        }
        return;
    }

    match key.code {
        KeyCode::Esc => leave_login(app),
        KeyCode::Down | KeyCode::Tab => {
            app.login_focus = match app.login_focus {
                LoginFocus::Identifier => LoginFocus::Secret,
                LoginFocus::Secret => LoginFocus::Button,
                LoginFocus::Button => LoginFocus::Identifier,
            };
        }
        KeyCode::Up | KeyCode::BackTab => {
            app.login_focus = match app.login_focus {
                LoginFocus::Identifier => LoginFocus::Button,
                LoginFocus::Secret => LoginFocus::Identifier,
                LoginFocus::Button => LoginFocus::Secret,
            };
        }
        KeyCode::Enter => match app.login_focus {
            LoginFocus::Identifier => app.login_focus = LoginFocus::Secret,
            LoginFocus::Secret | LoginFocus::Button => app.submit_login(),
        },
        KeyCode::Backspace => match app.login_focus {
            LoginFocus::Identifier => {
                app.login_identifier.pop();
            }
            LoginFocus::Secret => {
                app.login_secret.pop();
            }
            LoginFocus::Button => {}
        },
        KeyCode::Char(c) => match app.login_focus {
            LoginFocus::Identifier => {
                if can_add_identifier_char(app.login_identifier.chars().count(), c) {
                    app.login_identifier.push(c);
                }
            }
            LoginFocus::Secret => {
                if can_add_secret_char(app.login_secret.chars().count(), c) {
                    app.login_secret.push(c);
                }
            }
            LoginFocus::Button => {}
        },
        _ => {}
    }
}

/// Back out of the login view. Leaving discards any attempt in flight.
fn leave_login(app: &mut App) {
    if app.history.depth() > 1 {
        app.go_back();
    } else {
        app.navigate(Route::Landing, HistoryMode::Replace);
    }
}

fn handle_public_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('l') | KeyCode::Enter => {
            let target = if app.is_authenticated() {
                Route::Dashboard
            } else {
                Route::Login
            };
            app.navigate(target, HistoryMode::Push);
        }
        KeyCode::Char('h') => {
            app.navigate(Route::Landing, HistoryMode::Push);
        }
        KeyCode::Backspace => app.go_back(),
        KeyCode::Char('?') => app.state = AppState::ShowingHelp,
        KeyCode::Char('q') | KeyCode::Esc => app.request_quit(),
        _ => {}
    }
}

fn handle_admin_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.request_quit(),
        KeyCode::Char('?') => app.state = AppState::ShowingHelp,
        KeyCode::Char(c @ '1'..='5') => {
            let index = c as usize - '1' as usize;
            if let Some(route) = Route::ADMIN_PAGES.get(index) {
                app.navigate(*route, HistoryMode::Push);
            }
        }
        KeyCode::Tab | KeyCode::Right => app.next_page(true),
        KeyCode::BackTab | KeyCode::Left => app.next_page(false),
        KeyCode::Backspace => app.go_back(),
        KeyCode::Char('L') => app.sign_out(),
        KeyCode::Up | KeyCode::Char('k') => app.select_prev(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::Char('/') => {
            if app.route != Route::Dashboard {
                app.start_search();
            }
        }
        KeyCode::Esc => {
            app.search_query.clear();
            app.status_message = None;
            app.selection = 0;
        }
        KeyCode::Enter => {
            if app.route == Route::Dashboard {
                app.open_quick_action();
            }
        }
        KeyCode::Char('a') => {
            if app.route != Route::Database {
                app.open_form();
            }
        }
        KeyCode::Char('b') => {
            if app.route == Route::Database {
                app.open_form();
            }
        }
        KeyCode::Char('x') => app.open_query_console(),
        KeyCode::Char('d') => app.request_delete(),
        KeyCode::Char('t') => app.toggle_selected(),
        KeyCode::Char('r') => app.refresh_selected_domain(),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use cmsadmin_core::auth::{Session, SessionStore};

    use super::*;
    use crate::app::tests::{settle_login, test_app};

    fn press(app: &mut App, code: KeyCode) -> bool {
        handle_input(app, KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    #[test]
    fn test_number_keys_switch_pages() {
        let (mut app, _) = test_app(Session::admin());
        app.navigate(Route::Dashboard, HistoryMode::Push);

        press(&mut app, KeyCode::Char('4'));
        assert_eq!(app.route, Route::Domains);
        press(&mut app, KeyCode::Char('2'));
        assert_eq!(app.route, Route::Users);
        press(&mut app, KeyCode::Backspace);
        assert_eq!(app.route, Route::Domains);
    }

    #[test]
    fn test_login_key_opens_form_when_signed_out() {
        let (mut app, _) = test_app(Session::signed_out());
        assert_eq!(app.route, Route::Landing);

        press(&mut app, KeyCode::Char('l'));
        assert_eq!(app.route, Route::Login);
        assert_eq!(app.login_focus, LoginFocus::Identifier);
    }

    #[test]
    fn test_signed_in_landing_opens_dashboard() {
        let (mut app, _) = test_app(Session::admin());
        press(&mut app, KeyCode::Char('l'));
        assert_eq!(app.route, Route::Dashboard);
    }

    #[tokio::test]
    async fn test_login_form_flow() {
        let (mut app, store) = test_app(Session::signed_out());
        app.navigate(Route::Login, HistoryMode::Push);

        type_text(&mut app, "admin@cms.com");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.login_focus, LoginFocus::Secret);
        type_text(&mut app, "admin123");
        press(&mut app, KeyCode::Enter);
        assert!(app.is_signing_in());

        // Typing is ignored while signing in
        press(&mut app, KeyCode::Char('z'));
        assert_eq!(app.login_secret, "admin123");

        settle_login(&mut app).await;
        assert_eq!(app.route, Route::Dashboard);
        assert!(store.get().authenticated);
    }

    #[test]
    fn test_ctrl_r_reveals_secret() {
        let (mut app, _) = test_app(Session::signed_out());
        app.navigate(Route::Login, HistoryMode::Push);

        handle_input(&mut app, KeyEvent::new(KeyCode::Char('r'), KeyModifiers::CONTROL));
        assert!(app.reveal_secret);
        assert!(app.login_identifier.is_empty());
    }

    #[test]
    fn test_esc_leaves_login() {
        let (mut app, _) = test_app(Session::signed_out());
        app.navigate(Route::Login, HistoryMode::Push);
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.route, Route::Landing);
    }

    #[test]
    fn test_search_filters_and_escapes() {
        let (mut app, _) = test_app(Session::admin());
        app.navigate(Route::Users, HistoryMode::Push);

        press(&mut app, KeyCode::Char('/'));
        assert_eq!(app.state, AppState::Searching);
        type_text(&mut app, "jane");
        assert_eq!(app.visible_users().len(), 1);

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.state, AppState::Normal);
        assert_eq!(app.search_query, "jane");

        press(&mut app, KeyCode::Esc);
        assert!(app.search_query.is_empty());
    }

    #[test]
    fn test_form_keys() {
        let (mut app, _) = test_app(Session::admin());
        app.navigate(Route::Users, HistoryMode::Push);
        let before = app.users.all().len();

        press(&mut app, KeyCode::Char('a'));
        assert_eq!(app.state, AppState::EditingForm);
        type_text(&mut app, "Sam Lee");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "sam@example.com");
        // Role, invitation flag, then the submit button
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.state, AppState::Normal);
        assert_eq!(app.users.all().len(), before + 1);
    }

    #[test]
    fn test_delete_confirmation_keys() {
        let (mut app, _) = test_app(Session::admin());
        app.navigate(Route::Domains, HistoryMode::Push);
        let before = app.domains.all().len();

        press(&mut app, KeyCode::Char('d'));
        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.domains.all().len(), before);

        press(&mut app, KeyCode::Char('d'));
        press(&mut app, KeyCode::Char('y'));
        assert_eq!(app.domains.all().len(), before - 1);
    }

    #[test]
    fn test_sign_out_key() {
        let (mut app, store) = test_app(Session::admin());
        app.navigate(Route::Database, HistoryMode::Push);

        press(&mut app, KeyCode::Char('L'));
        assert_eq!(app.route, Route::Login);
        assert!(!store.get().authenticated);
    }

    #[test]
    fn test_quit_confirmation() {
        let (mut app, _) = test_app(Session::admin());
        app.navigate(Route::Dashboard, HistoryMode::Push);

        assert!(!press(&mut app, KeyCode::Char('q')));
        assert_eq!(app.state, AppState::ConfirmingQuit);
        assert!(!press(&mut app, KeyCode::Char('n')));
        assert_eq!(app.state, AppState::Normal);

        press(&mut app, KeyCode::Char('q'));
        assert!(press(&mut app, KeyCode::Char('y')));
        assert_eq!(app.state, AppState::Quitting);
    }
}
