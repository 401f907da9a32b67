use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use cmsadmin_core::models::TEMPLATES;
use cmsadmin_core::routes::Route;

use crate::app::{App, AppState, LoginFocus};
use crate::forms::{FieldValue, Form, FormKind};

use super::pages::{dashboard, database, domains, landing, users, websites};
use super::styles;

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Length(3), // Navigation
            Constraint::Min(10),   // Main content
            Constraint::Length(2), // Status bar
        ])
        .split(frame.area());

    render_title_bar(frame, app, chunks[0]);
    render_navigation(frame, app, chunks[1]);
    render_main_content(frame, app, chunks[2]);
    render_status_bar(frame, app, chunks[3]);

    // Render overlays
    if app.route == Route::Login {
        render_login_overlay(frame, app);
    }

    match app.state {
        AppState::ShowingHelp => render_help_overlay(frame),
        AppState::EditingForm => {
            if let Some(ref form) = app.form {
                render_form_overlay(frame, form);
            }
        }
        AppState::ConfirmingDelete => render_delete_overlay(frame, app),
        AppState::ConfirmingQuit => render_quit_overlay(frame),
        _ => {}
    }
}

fn render_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let title = "  Advanced CMS · SaaS Platform";
    let right = if app.is_authenticated() {
        format!("Signed in as Admin · {} · [?] Help", chrono::Local::now().format("%H:%M"))
    } else {
        "Not signed in · [?] Help".to_string()
    };

    let title_line = Line::from(vec![
        Span::styled(title, styles::title_style()),
        Span::raw(" ".repeat(
            (area.width as usize).saturating_sub(title.chars().count() + right.chars().count() + 2),
        )),
        Span::styled(right, styles::muted_style()),
    ]);

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    let paragraph = Paragraph::new(title_line).block(block);
    frame.render_widget(paragraph, area);
}

fn render_navigation(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![Span::raw(" ")];

    if app.route.is_protected() {
        for (i, route) in Route::ADMIN_PAGES.iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled(" | ", styles::muted_style()));
            }
            let label = format!("[{}] {}", i + 1, route.title());
            if *route == app.route {
                spans.push(Span::styled(label, styles::tab_style(true)));
            } else {
                spans.push(Span::styled(label, styles::muted_style()));
            }
        }
    } else {
        let links = [("[h] Home", Route::Landing), ("[l] Admin Login", Route::Login)];
        for (i, (label, route)) in links.iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled(" | ", styles::muted_style()));
            }
            spans.push(Span::styled(*label, styles::tab_style(*route == app.route)));
        }
    }

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    let paragraph = Paragraph::new(Line::from(spans)).block(block);
    frame.render_widget(paragraph, area);
}

fn render_main_content(frame: &mut Frame, app: &App, area: Rect) {
    match app.route {
        Route::Landing | Route::Login => landing::render(frame, app, area),
        Route::NotFound => landing::render_not_found(frame, area),
        Route::Dashboard => dashboard::render(frame, app, area),
        Route::Users => users::render(frame, app, area),
        Route::CreateWebsite => websites::render(frame, app, area),
        Route::Domains => domains::render(frame, app, area),
        Route::Database => database::render(frame, app, area),
    }
}

fn shortcuts(route: Route) -> &'static str {
    match route {
        Route::Landing | Route::NotFound => "[l]ogin | [q]uit",
        Route::Login => "[Enter] sign in | [Esc] back",
        Route::Dashboard => "[Enter] open | [L]ogout | [q]uit",
        Route::Users => "[a]dd | [t]oggle | [d]elete | [/] search | [L]ogout",
        Route::CreateWebsite => "[a] create | [t]oggle | [d]elete | [/] search | [L]ogout",
        Route::Domains => "[a]dd | [r]efresh | [d]elete | [/] search | [L]ogout",
        Route::Database => "[b]ackup | [x] query | [d]elete | [/] search | [L]ogout",
    }
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let right_text = format!(" {} ", shortcuts(app.route));

    let (left_text, left_style) = if app.state == AppState::Searching {
        (format!(" Search: {}▌ ", app.search_query), styles::highlight_style())
    } else if let Some(ref msg) = app.status_message {
        (format!(" {} ", msg), styles::highlight_style())
    } else if !app.search_query.is_empty() {
        (format!(" Filter: {} ", app.search_query), styles::highlight_style())
    } else if app.route.description().is_empty() {
        (format!(" {} ", app.route.path()), styles::muted_style())
    } else {
        (format!(" {} · {} ", app.route.path(), app.route.description()), styles::muted_style())
    };

    let padding_len = (area.width as usize)
        .saturating_sub(left_text.chars().count())
        .saturating_sub(right_text.chars().count());
    let status_line = Line::from(vec![
        Span::styled(left_text, left_style),
        Span::raw(" ".repeat(padding_len)),
        Span::styled(right_text, styles::muted_style()),
    ]);
    let paragraph = Paragraph::new(status_line).style(styles::status_bar_style());
    frame.render_widget(paragraph, area);
}

fn help_line(key: &'static str, desc: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {:<10}", key), styles::help_key_style()),
        Span::styled(desc, styles::list_item_style()),
    ])
}

fn render_help_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(56, 26, frame.area());

    frame.render_widget(Clear, area);

    let version = env!("CARGO_PKG_VERSION");

    let help_text = vec![
        Line::from(Span::styled("  CMS Admin Console", styles::title_style())),
        Line::from(Span::styled(format!("  version {}", version), styles::muted_style())),
        Line::from(""),
        Line::from(Span::styled(" Navigation", styles::highlight_style())),
        help_line("1-5", "Switch admin page"),
        help_line("Tab", "Next / previous page (Shift+Tab)"),
        help_line("↑/↓", "Navigate list"),
        help_line("Backspace", "Go back"),
        help_line("l / h", "Login / home (public pages)"),
        Line::from(""),
        Line::from(Span::styled(" Actions", styles::highlight_style())),
        help_line("/", "Search"),
        help_line("a", "Add user, website or domain"),
        help_line("d", "Delete selected"),
        help_line("t", "Toggle status"),
        help_line("r", "Re-check domain verification"),
        help_line("b / x", "Start backup / run query"),
        help_line("L", "Log out"),
        help_line("q", "Quit"),
        Line::from(""),
        Line::from(vec![
            Span::styled("       Press ", styles::muted_style()),
            Span::styled("?", styles::help_key_style()),
            Span::styled(" or ", styles::muted_style()),
            Span::styled("Esc", styles::help_key_style()),
            Span::styled(" to close", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(help_text).block(block), area);
}

/// Field box padded to a fixed width, with a cursor when focused.
fn field_spans(label: &str, value: &str, focused: bool, width: usize) -> Vec<Span<'static>> {
    let style = if focused {
        styles::selected_style()
    } else {
        styles::list_item_style()
    };
    let visible: String = {
        let count = value.chars().count();
        value.chars().skip(count.saturating_sub(width)).collect()
    };
    let cursor = if focused { "▌" } else { " " };
    vec![
        Span::styled(format!("  {:<16}[", label), styles::muted_style()),
        Span::styled(format!("{:<width$}{}", visible, cursor, width = width), style),
        Span::styled("]", styles::muted_style()),
    ]
}

fn button_line(label: &str, focused: bool) -> Line<'static> {
    let style = if focused {
        styles::selected_style()
    } else {
        styles::list_item_style()
    };
    let text = if focused {
        format!(" ▶ {} ◀ ", label)
    } else {
        format!("   {}   ", label)
    };
    Line::from(vec![
        Span::raw("                  ["),
        Span::styled(text, style),
        Span::raw("]"),
    ])
}

fn render_login_overlay(frame: &mut Frame, app: &App) {
    let height = if app.login_error.is_some() { 15 } else { 13 };
    let area = centered_rect_fixed(54, height, frame.area());

    frame.render_widget(Clear, area);

    let mut lines = vec![
        Line::from(Span::styled("                Welcome Back", styles::title_style())),
        Line::from(Span::styled(
            "   Sign in to your admin account to continue",
            styles::muted_style(),
        )),
        Line::from(""),
    ];

    let signing_in = app.is_signing_in();

    lines.push(Line::from(field_spans(
        "Email:",
        &app.login_identifier,
        app.login_focus == LoginFocus::Identifier && !signing_in,
        24,
    )));

    let secret_display = if app.reveal_secret {
        app.login_secret.clone()
    } else {
        "*".repeat(app.login_secret.chars().count())
    };
    lines.push(Line::from(field_spans(
        "Password:",
        &secret_display,
        app.login_focus == LoginFocus::Secret && !signing_in,
        24,
    )));

    lines.push(Line::from(""));
    if signing_in {
        lines.push(Line::from(Span::styled(
            "                 Signing in...",
            styles::warning_style(),
        )));
    } else {
        lines.push(button_line("Sign In", app.login_focus == LoginFocus::Button));
    }

    if let Some(ref error) = app.login_error {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(format!(" {}", error), styles::error_style())));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled(" Ctrl+R", styles::help_key_style()),
        Span::styled(" show password  ", styles::muted_style()),
        Span::styled("Esc", styles::help_key_style()),
        Span::styled(" back", styles::muted_style()),
    ]));

    let block = Block::default()
        .title(" CMS Admin ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_form_overlay(frame: &mut Frame, form: &Form) {
    let extra = if form.kind == FormKind::CreateWebsite { 3 } else { 0 };
    let error = if form.error.is_some() { 2 } else { 0 };
    let height = form.fields.len() as u16 + 7 + extra + error;
    let area = centered_rect_fixed(64, height, frame.area());

    frame.render_widget(Clear, area);

    let mut lines = vec![Line::from("")];

    for (i, field) in form.fields.iter().enumerate() {
        lines.push(Line::from(field_spans(field.label, &field.display(), i == form.focus, 40)));
    }

    if form.kind == FormKind::CreateWebsite {
        let template = form.fields.iter().find_map(|f| match &f.value {
            FieldValue::Choice { selected, .. } if f.label == "Template" => TEMPLATES.get(*selected),
            _ => None,
        });
        if let Some(template) = template {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                format!("  {}", template.description),
                styles::muted_style(),
            )));
            lines.push(Line::from(Span::styled(
                format!("  {}", template.features.join(" · ")),
                styles::highlight_style(),
            )));
        }
    }

    lines.push(Line::from(""));
    lines.push(button_line(form.kind.submit_label(), form.on_submit_button()));

    if let Some(ref error) = form.error {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(format!("  {}", error), styles::error_style())));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "  Tab next · ←/→ change · Space toggle · Esc cancel",
        styles::muted_style(),
    )));

    let block = Block::default()
        .title(format!(" {} ", form.kind.title()))
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_delete_overlay(frame: &mut Frame, app: &App) {
    let area = centered_rect_fixed(54, 9, frame.area());

    frame.render_widget(Clear, area);

    let label = app
        .delete_target
        .as_ref()
        .map(|t| t.label.as_str())
        .unwrap_or_default();

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(format!("   Delete {}?", label), styles::highlight_style())),
        Line::from(Span::styled("   This action cannot be undone.", styles::muted_style())),
        Line::from(""),
        Line::from(vec![
            Span::styled("   Press ", styles::muted_style()),
            Span::styled("[Y]", styles::help_key_style()),
            Span::styled(" to delete, ", styles::muted_style()),
            Span::styled("[N]", styles::help_key_style()),
            Span::styled(" to cancel", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(lines).block(block).wrap(Wrap { trim: false }), area);
}

/// Create a centered rectangle with fixed dimensions
pub(crate) fn centered_rect_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(r.width), height.min(r.height))
}

fn render_quit_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(46, 8, frame.area());

    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "   Are you sure you want to quit?",
            styles::highlight_style(),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("   Press ", styles::muted_style()),
            Span::styled("[Y]", styles::help_key_style()),
            Span::styled(" to quit, ", styles::muted_style()),
            Span::styled("[N]", styles::help_key_style()),
            Span::styled(" to cancel", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
