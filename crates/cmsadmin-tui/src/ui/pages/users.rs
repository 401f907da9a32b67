use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use cmsadmin_core::utils::format::format_count;

use crate::app::App;
use crate::ui::styles;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(5)])
        .split(area);

    let stats = app.users.stats();
    let summary = Line::from(vec![
        Span::styled(" Users: ", styles::muted_style()),
        Span::styled(format_count(stats.total as u64), styles::highlight_style()),
        Span::styled("   Active: ", styles::muted_style()),
        Span::styled(format_count(stats.active as u64), styles::success_style()),
        Span::styled("   Admins: ", styles::muted_style()),
        Span::styled(format_count(stats.admins as u64), styles::highlight_style()),
    ]);
    frame.render_widget(Paragraph::new(summary), chunks[0]);

    let users = app.visible_users();

    let header = Row::new([
        Cell::from("Name"),
        Cell::from("Email"),
        Cell::from("Role"),
        Cell::from("Status"),
        Cell::from("Sites"),
        Cell::from("Last Login"),
        Cell::from("Created"),
    ])
    .style(styles::title_style())
    .height(1);

    let rows: Vec<Row> = users
        .iter()
        .map(|user| {
            Row::new(vec![
                Cell::from(user.name.clone()),
                Cell::from(user.email.clone()),
                Cell::from(user.role.label()),
                Cell::from(Span::styled(user.status.label(), styles::status_style(user.status.label()))),
                Cell::from(user.websites.to_string()),
                Cell::from(user.last_login.clone()),
                Cell::from(user.created_at.format("%Y-%m-%d").to_string()),
            ])
            .style(styles::list_item_style())
        })
        .collect();

    let widths = [
        Constraint::Fill(2),
        Constraint::Fill(3),
        Constraint::Length(12),
        Constraint::Length(10),
        Constraint::Length(6),
        Constraint::Fill(1),
        Constraint::Length(11),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(format!(" User Management ({}) ", users.len()))
                .title_style(styles::title_style())
                .borders(Borders::ALL)
                .border_style(styles::border_style(true)),
        )
        .row_highlight_style(styles::selected_style());

    let mut state = TableState::default();
    if !users.is_empty() {
        state.select(Some(app.selection));
    }

    frame.render_stateful_widget(table, chunks[1], &mut state);
}
