use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use cmsadmin_core::models::{StatCard, Trend};

use crate::app::App;
use crate::ui::styles;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Welcome
            Constraint::Length(6), // Stat cards
            Constraint::Min(6),    // Actions and activity
        ])
        .split(area);

    let welcome = Paragraph::new(vec![
        Line::from(Span::styled(" Welcome back, Admin!", styles::title_style())),
        Line::from(Span::styled(
            " Here's what's happening with your CMS platform today.",
            styles::muted_style(),
        )),
    ]);
    frame.render_widget(welcome, chunks[0]);

    render_stats(frame, &app.dashboard.stats, chunks[1]);

    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(chunks[2]);

    render_quick_actions(frame, app, bottom[0]);
    render_activity(frame, app, bottom[1]);
}

fn render_stats(frame: &mut Frame, stats: &[StatCard], area: Rect) {
    let constraints: Vec<Constraint> = stats.iter().map(|_| Constraint::Fill(1)).collect();
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(area);

    for (card, rect) in stats.iter().zip(cards.iter()) {
        let change_style = match card.trend {
            Trend::Positive => styles::success_style(),
            Trend::Neutral => styles::muted_style(),
        };
        let lines = vec![
            Line::from(Span::styled(card.value, styles::highlight_style())),
            Line::from(Span::styled(card.change, change_style)),
            Line::from(Span::styled(card.description, styles::muted_style())),
        ];
        let block = Block::default()
            .title(format!(" {} ", card.title))
            .title_style(styles::title_style())
            .borders(Borders::ALL)
            .border_style(styles::border_style(false));
        frame.render_widget(Paragraph::new(lines).block(block), *rect);
    }
}

fn render_quick_actions(frame: &mut Frame, app: &App, area: Rect) {
    let items: Vec<ListItem> = app
        .dashboard
        .quick_actions
        .iter()
        .map(|action| {
            let title_style = if action.target.is_some() {
                styles::list_item_style()
            } else {
                styles::muted_style()
            };
            ListItem::new(vec![
                Line::from(Span::styled(action.title, title_style)),
                Line::from(Span::styled(format!("  {}", action.description), styles::muted_style())),
            ])
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .title(" Quick Actions (Enter to open) ")
                .title_style(styles::title_style())
                .borders(Borders::ALL)
                .border_style(styles::border_style(true)),
        )
        .highlight_style(styles::selected_style())
        .highlight_symbol("> ");

    let mut state = ListState::default();
    state.select(Some(app.selection));

    frame.render_stateful_widget(list, area, &mut state);
}

fn render_activity(frame: &mut Frame, app: &App, area: Rect) {
    let mut lines = Vec::new();
    for activity in &app.dashboard.recent_activity {
        lines.push(Line::from(vec![
            Span::styled(activity.user, styles::highlight_style()),
            Span::raw(format!(" {} ", activity.action)),
            Span::styled(activity.target, styles::title_style()),
        ]));
        lines.push(Line::from(Span::styled(format!("  {}", activity.time), styles::muted_style())));
    }

    let block = Block::default()
        .title(" Recent Activity ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
