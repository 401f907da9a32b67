use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState, Wrap},
    Frame,
};

use cmsadmin_core::models::Domain;
use cmsadmin_core::utils::format::truncate;

use crate::app::App;
use crate::ui::styles;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    let domains = app.visible_domains();
    render_domain_list(frame, app, &domains, chunks[0]);
    render_domain_detail(frame, domains.get(app.selection).copied(), chunks[1]);
}

fn render_domain_list(frame: &mut Frame, app: &App, domains: &[&Domain], area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(5)])
        .split(area);

    let stats = app.domains.stats();
    let summary = Line::from(vec![
        Span::styled(" Domains: ", styles::muted_style()),
        Span::styled(stats.total.to_string(), styles::highlight_style()),
        Span::styled("   Verified: ", styles::muted_style()),
        Span::styled(stats.verified.to_string(), styles::success_style()),
        Span::styled("   Pending: ", styles::muted_style()),
        Span::styled(stats.pending.to_string(), styles::warning_style()),
        Span::styled("   SSL: ", styles::muted_style()),
        Span::styled(stats.ssl_active.to_string(), styles::success_style()),
    ]);
    frame.render_widget(Paragraph::new(summary), chunks[0]);

    let header = Row::new([
        Cell::from("Domain"),
        Cell::from("Website"),
        Cell::from("Type"),
        Cell::from("Status"),
        Cell::from("SSL"),
    ])
    .style(styles::title_style())
    .height(1);

    let rows: Vec<Row> = domains
        .iter()
        .map(|domain| {
            Row::new(vec![
                Cell::from(domain.domain.clone()),
                Cell::from(domain.website_name.clone()),
                Cell::from(domain.kind.label()),
                Cell::from(Span::styled(domain.status.label(), styles::status_style(domain.status.label()))),
                Cell::from(Span::styled(domain.ssl_status.label(), styles::status_style(domain.ssl_status.label()))),
            ])
            .style(styles::list_item_style())
        })
        .collect();

    let widths = [
        Constraint::Fill(3),
        Constraint::Fill(2),
        Constraint::Length(10),
        Constraint::Length(9),
        Constraint::Length(8),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(format!(" Domain Mapping ({}) ", domains.len()))
                .title_style(styles::title_style())
                .borders(Borders::ALL)
                .border_style(styles::border_style(true)),
        )
        .row_highlight_style(styles::selected_style());

    let mut state = TableState::default();
    if !domains.is_empty() {
        state.select(Some(app.selection));
    }

    frame.render_stateful_widget(table, chunks[1], &mut state);
}

fn render_domain_detail(frame: &mut Frame, selected: Option<&Domain>, area: Rect) {
    let lines = match selected {
        Some(domain) => {
            let mut lines = vec![
                Line::from(Span::styled(domain.domain.clone(), styles::title_style())),
                Line::from(vec![
                    Span::styled("Website:      ", styles::muted_style()),
                    Span::raw(domain.website_name.clone()),
                ]),
                Line::from(vec![
                    Span::styled("Added:        ", styles::muted_style()),
                    Span::raw(domain.created.format("%Y-%m-%d").to_string()),
                ]),
                Line::from(vec![
                    Span::styled("Last checked: ", styles::muted_style()),
                    Span::raw(domain.last_checked.format("%Y-%m-%d").to_string()),
                ]),
                Line::from(""),
                Line::from(Span::styled("DNS Records", styles::highlight_style())),
            ];

            for record in &domain.dns_records {
                lines.push(Line::from(vec![
                    Span::styled(format!("{:<6}", record.record_type), styles::help_key_style()),
                    Span::raw(format!("{:<6}", record.name)),
                    Span::raw(truncate(&record.value, 28)),
                    Span::raw(" "),
                    Span::styled(record.status.label(), styles::status_style(record.status.label())),
                ]));
            }

            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "[r] re-check verification",
                styles::muted_style(),
            )));
            lines
        }
        None => vec![Line::from(Span::styled("No domain selected", styles::muted_style()))],
    };

    let block = Block::default()
        .title(" Details ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}
