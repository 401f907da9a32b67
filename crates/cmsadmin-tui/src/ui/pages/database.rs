use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use cmsadmin_core::models::SystemMetric;
use cmsadmin_core::utils::format::format_count;

use crate::app::App;
use crate::ui::styles;

const BAR_WIDTH: usize = 20;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(6), Constraint::Min(6)])
        .split(area);

    render_metrics(frame, app.database.metrics(), chunks[0]);

    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(chunks[1]);

    render_tables(frame, app, bottom[0]);
    render_backups(frame, app, bottom[1]);
}

fn usage_bar(percentage: u16) -> String {
    let filled = (percentage.min(100) as usize * BAR_WIDTH) / 100;
    format!("{}{}", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled))
}

fn render_metrics(frame: &mut Frame, metrics: &[SystemMetric], area: Rect) {
    let lines: Vec<Line> = metrics
        .iter()
        .map(|m| {
            let style = styles::status_style(m.status.label());
            Line::from(vec![
                Span::styled(format!(" {:<16}", m.label), styles::muted_style()),
                Span::styled(usage_bar(m.percentage), style),
                Span::raw(format!(" {:>4}%  ", m.percentage)),
                Span::styled(m.value, styles::highlight_style()),
            ])
        })
        .collect();

    let block = Block::default()
        .title(" System Metrics ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_tables(frame: &mut Frame, app: &App, area: Rect) {
    let tables = app.visible_tables();

    let header = Row::new([
        Cell::from("Table"),
        Cell::from("Type"),
        Cell::from("Records"),
        Cell::from("Size"),
        Cell::from("Status"),
    ])
    .style(styles::title_style())
    .height(1);

    let rows: Vec<Row> = tables
        .iter()
        .map(|table| {
            Row::new(vec![
                Cell::from(table.name.clone()),
                Cell::from(table.kind.clone()),
                Cell::from(format_count(table.record_count)),
                Cell::from(table.size.clone()),
                Cell::from(Span::styled(table.status.label(), styles::status_style(table.status.label()))),
            ])
            .style(styles::list_item_style())
        })
        .collect();

    let widths = [
        Constraint::Fill(2),
        Constraint::Fill(1),
        Constraint::Length(9),
        Constraint::Length(9),
        Constraint::Length(12),
    ];

    let table = Table::new(rows, widths).header(header).block(
        Block::default()
            .title(format!(
                " Tables ({}) · {} records ",
                tables.len(),
                format_count(app.database.total_records())
            ))
            .title_style(styles::title_style())
            .borders(Borders::ALL)
            .border_style(styles::border_style(false)),
    );

    frame.render_widget(table, area);
}

fn render_backups(frame: &mut Frame, app: &App, area: Rect) {
    let backups = app.visible_backups();

    let header = Row::new([
        Cell::from("Backup"),
        Cell::from("Type"),
        Cell::from("Size"),
        Cell::from("Status"),
    ])
    .style(styles::title_style())
    .height(1);

    let rows: Vec<Row> = backups
        .iter()
        .map(|backup| {
            Row::new(vec![
                Cell::from(backup.name.clone()),
                Cell::from(backup.kind.label()),
                Cell::from(backup.size.clone()),
                Cell::from(Span::styled(backup.status.label(), styles::status_style(backup.status.label()))),
            ])
            .style(styles::list_item_style())
        })
        .collect();

    let widths = [
        Constraint::Fill(2),
        Constraint::Length(12),
        Constraint::Length(9),
        Constraint::Length(10),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(format!(" Backups ({}) ", backups.len()))
                .title_style(styles::title_style())
                .borders(Borders::ALL)
                .border_style(styles::border_style(true)),
        )
        .row_highlight_style(styles::selected_style());

    let mut state = TableState::default();
    if !backups.is_empty() {
        state.select(Some(app.selection));
    }

    frame.render_stateful_widget(table, area, &mut state);
}
