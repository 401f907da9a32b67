use ratatui::style::{Color, Modifier, Style};

// Console palette
const BRAND: Color = Color::Rgb(128, 96, 208);
const OK: Color = Color::Rgb(96, 160, 96);
const INFO: Color = Color::Rgb(64, 176, 208);
const CAUTION: Color = Color::Rgb(208, 160, 64);
const DANGER: Color = Color::Rgb(192, 64, 64);
const DIM: Color = Color::Rgb(128, 128, 128);
const ROW_BG: Color = Color::Rgb(48, 48, 64);
const BAR_BG: Color = Color::Rgb(32, 32, 40);

fn fg(color: Color) -> Style {
    Style::default().fg(color)
}

pub fn title_style() -> Style {
    fg(BRAND).add_modifier(Modifier::BOLD)
}

/// Selected table row or list entry.
pub fn selected_style() -> Style {
    Style::default().bg(ROW_BG).add_modifier(Modifier::BOLD)
}

pub fn list_item_style() -> Style {
    fg(Color::White)
}

pub fn muted_style() -> Style {
    fg(DIM)
}

/// Status messages and search input.
pub fn highlight_style() -> Style {
    fg(INFO)
}

pub fn success_style() -> Style {
    fg(OK)
}

pub fn warning_style() -> Style {
    fg(CAUTION)
}

pub fn error_style() -> Style {
    fg(DANGER)
}

pub fn tab_style(selected: bool) -> Style {
    if selected {
        title_style().add_modifier(Modifier::UNDERLINED)
    } else {
        list_item_style()
    }
}

pub fn border_style(focused: bool) -> Style {
    fg(if focused { BRAND } else { DIM })
}

pub fn status_bar_style() -> Style {
    Style::default().bg(BAR_BG).fg(Color::White)
}

pub fn help_key_style() -> Style {
    highlight_style().add_modifier(Modifier::BOLD)
}

/// Style for a status label such as `ACTIVE` or `FAILED`.
pub fn status_style(label: &str) -> Style {
    match label {
        "ACTIVE" | "VERIFIED" | "COMPLETED" | "GOOD" => success_style(),
        "PENDING" | "BUILDING" | "RUNNING" | "MAINTENANCE" | "WARNING" => warning_style(),
        "SUSPENDED" | "FAILED" | "EXPIRED" | "ERROR" | "CRITICAL" => error_style(),
        _ => list_item_style(),
    }
}
