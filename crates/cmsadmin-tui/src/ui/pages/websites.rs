use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use cmsadmin_core::models::{Template, TEMPLATES};
use cmsadmin_core::utils::format::format_count;

use crate::app::App;
use crate::ui::styles;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(area);

    render_website_list(frame, app, chunks[0]);
    render_templates(frame, app, chunks[1]);
}

fn render_website_list(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(5)])
        .split(area);

    let stats = app.websites.stats();
    let summary = Line::from(vec![
        Span::styled(" Websites: ", styles::muted_style()),
        Span::styled(format_count(stats.total as u64), styles::highlight_style()),
        Span::styled("   Active: ", styles::muted_style()),
        Span::styled(format_count(stats.active as u64), styles::success_style()),
        Span::styled("   Building: ", styles::muted_style()),
        Span::styled(format_count(stats.building as u64), styles::warning_style()),
        Span::styled("   Visitors: ", styles::muted_style()),
        Span::styled(format_count(stats.visitors), styles::highlight_style()),
    ]);
    frame.render_widget(Paragraph::new(summary), chunks[0]);

    let websites = app.visible_websites();

    let header = Row::new([
        Cell::from("Name"),
        Cell::from("Address"),
        Cell::from("Template"),
        Cell::from("Status"),
        Cell::from("Owner"),
        Cell::from("Visitors"),
    ])
    .style(styles::title_style())
    .height(1);

    let rows: Vec<Row> = websites
        .iter()
        .map(|site| {
            let address = site.domain.clone().unwrap_or_else(|| site.platform_host());
            let template = Template::find(&site.template).map_or(site.template.as_str(), |t| t.name);
            Row::new(vec![
                Cell::from(site.name.clone()),
                Cell::from(address),
                Cell::from(template),
                Cell::from(Span::styled(site.status.label(), styles::status_style(site.status.label()))),
                Cell::from(site.owner.clone()),
                Cell::from(format_count(site.visitors)),
            ])
            .style(styles::list_item_style())
        })
        .collect();

    let widths = [
        Constraint::Fill(2),
        Constraint::Fill(2),
        Constraint::Fill(2),
        Constraint::Length(10),
        Constraint::Fill(1),
        Constraint::Length(9),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(format!(" Websites ({}) ", websites.len()))
                .title_style(styles::title_style())
                .borders(Borders::ALL)
                .border_style(styles::border_style(true)),
        )
        .row_highlight_style(styles::selected_style());

    let mut state = TableState::default();
    if !websites.is_empty() {
        state.select(Some(app.selection));
    }

    frame.render_stateful_widget(table, chunks[1], &mut state);
}

fn render_templates(frame: &mut Frame, app: &App, area: Rect) {
    let in_use = |t: &Template| app.websites.all().iter().filter(|w| w.template == t.id).count();

    let mut lines = Vec::new();
    for template in TEMPLATES.iter() {
        lines.push(Line::from(vec![
            Span::styled(template.name, styles::title_style()),
            Span::styled(format!("  ({} in use)", in_use(template)), styles::muted_style()),
        ]));
        lines.push(Line::from(Span::styled(template.description, styles::muted_style())));
        lines.push(Line::from(Span::styled(
            format!("  {}", template.features.join(" · ")),
            styles::highlight_style(),
        )));
        lines.push(Line::from(""));
    }

    let block = Block::default()
        .title(" Templates ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
