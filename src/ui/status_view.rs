use ratatui::layout::{Alignment, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use super::{theme, util};
use crate::app::App;

pub fn draw_loading(f: &mut Frame, area: Rect, app: &App) {
    let popup = util::centered(area, 40, 5);
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("{} Connecting to {}", app.spinner(), app.config.api_url()),
            theme::LOADING,
        )),
    ];
    let p = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).border_style(theme::BORDER_INACTIVE));
    f.render_widget(Clear, popup);
    f.render_widget(p, popup);
}

pub fn draw_maintenance(f: &mut Frame, area: Rect, app: &App) {
    let popup = util::centered(area, 64, 11);

    let checked = app
        .health_checked_at
        .map(|t| t.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "never".to_string());

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled("System under maintenance", theme::MAINTENANCE_TITLE)),
        Line::from(""),
        Line::from("The service is temporarily unavailable."),
        Line::from(format!(
            "Checking again every {}s (last check {}).",
            app.config.health_interval().as_secs(),
            checked
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("r", theme::HELP_KEY),
            Span::raw(" check now   "),
            Span::styled("q", theme::HELP_KEY),
            Span::raw(" quit"),
        ]),
    ];

    let block = Block::default()
        .title(" Maintenance ")
        .borders(Borders::ALL)
        .border_style(theme::MAINTENANCE_BORDER);
    let p = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(block);
    f.render_widget(Clear, popup);
    f.render_widget(p, popup);
}
