use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use cmsadmin_core::config::DEFAULT_ADMIN_SECRET;

use crate::app::App;
use crate::ui::styles;

const FEATURES: [(&str, &str); 4] = [
    ("User Management", "Complete user account management with role-based permissions"),
    ("Website Creation", "Easily create and manage multiple websites from one dashboard"),
    ("Custom Domains", "Map custom domains to any website with DNS configuration"),
    ("Secure Access", "Enterprise-grade security with role-based access control"),
];

const BENEFITS: [&str; 6] = [
    "Multi-tenant architecture",
    "Real-time analytics",
    "Custom domain mapping",
    "Role-based permissions",
    "24/7 uptime monitoring",
    "Automated backups",
];

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    render_hero(frame, app, chunks[0]);
    render_features(frame, chunks[1]);
}

fn render_hero(frame: &mut Frame, app: &App, area: Rect) {
    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled("Next-Gen CMS", styles::title_style())),
        Line::from(Span::styled("SaaS Platform", styles::highlight_style())),
        Line::from(""),
        Line::from(
            "Build, manage, and scale multiple websites with our powerful multi-tenant \
             content management system. Perfect for agencies, enterprises, and developers.",
        ),
        Line::from(""),
    ];

    if app.is_authenticated() {
        lines.push(Line::from(vec![
            Span::styled("Press ", styles::muted_style()),
            Span::styled("[l]", styles::help_key_style()),
            Span::styled(" to open the admin dashboard", styles::muted_style()),
        ]));
    } else {
        lines.push(Line::from(vec![
            Span::styled("Press ", styles::muted_style()),
            Span::styled("[l]", styles::help_key_style()),
            Span::styled(" to start managing content", styles::muted_style()),
        ]));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("Demo Access", styles::highlight_style())));
    lines.push(Line::from(vec![
        Span::styled("  Email:    ", styles::muted_style()),
        Span::raw(app.config.admin_identifier.clone()),
    ]));
    // A configured hash hides the demo password.
    if app.config.admin_secret_hash.is_none() {
        lines.push(Line::from(vec![
            Span::styled("  Password: ", styles::muted_style()),
            Span::raw(DEFAULT_ADMIN_SECRET),
        ]));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

fn render_features(frame: &mut Frame, area: Rect) {
    let mut lines = vec![Line::from(Span::styled("Powerful Features", styles::highlight_style()))];
    for (title, description) in FEATURES {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(title, styles::title_style())));
        lines.push(Line::from(Span::styled(description, styles::muted_style())));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("Enterprise Ready", styles::highlight_style())));
    for benefit in BENEFITS {
        lines.push(Line::from(vec![
            Span::styled("  ✓ ", styles::success_style()),
            Span::raw(benefit),
        ]));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

pub fn render_not_found(frame: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from(""),
        Line::from(""),
        Line::from(Span::styled("404", styles::title_style())),
        Line::from(""),
        Line::from("Oops! Page not found"),
        Line::from(""),
        Line::from(vec![
            Span::styled("Press ", styles::muted_style()),
            Span::styled("[h]", styles::help_key_style()),
            Span::styled(" to return home", styles::muted_style()),
        ]),
    ];

    let paragraph = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}
