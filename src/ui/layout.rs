use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use super::{help_overlay, sidebar_view, theme, thread_view};
use crate::app::{App, Pane};
use crate::router::Route;

pub fn draw_layout(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Header
            Constraint::Min(3),    // Content
            Constraint::Length(1), // Status bar
        ])
        .split(f.area());

    draw_header(f, chunks[0], app);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(chunks[1]);

    sidebar_view::draw_sidebar(f, body[0], app);
    thread_view::draw_content(f, body[1], app);

    draw_status_bar(f, chunks[2], app);

    // Help overlay (on top of everything)
    if app.show_help {
        let area = f.area();
        help_overlay::draw_help(f, area);
    }
}

fn draw_header(f: &mut Frame, area: Rect, app: &App) {
    let location = match app.dispatcher.router.current() {
        Route::Dashboard => "Dashboard".to_string(),
        Route::Thread { .. } => match app.routed_thread() {
            Some(t) => format!("{} / {}", t.project_name, t.thread_id),
            None => "Thread".to_string(),
        },
    };

    let mut spans = vec![
        Span::styled(" Threadboard ", theme::HEADER),
        Span::raw(" "),
        Span::styled(format!(" {} ", location), theme::STATUS_BAR),
    ];

    let badge = format!(" API {} ", app.health.label());
    let version = format!(" v{}", env!("CARGO_PKG_VERSION"));
    let used: usize = spans.iter().map(|s| s.width()).sum::<usize>() + badge.len() + version.len();
    let pad = (area.width as usize).saturating_sub(used);
    spans.push(Span::raw(" ".repeat(pad)));
    spans.push(Span::styled(badge, theme::HEADER_HEALTHY));
    spans.push(Span::styled(version, theme::STATUS_BAR));

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn hint_text(app: &App) -> Vec<(&'static str, &'static str)> {
    let mut hints: Vec<(&str, &str)> = if app.search_mode {
        vec![("Enter", "keep"), ("Esc", "clear")]
    } else {
        match app.pane {
            Pane::Sidebar => vec![
                ("j/k", "nav"),
                ("Enter", "open"),
                ("/", "filter"),
                ("o", "browser"),
                ("r", "refresh"),
            ],
            Pane::Content => vec![("j/k", "scroll"), ("h", "threads"), ("Esc", "back")],
        }
    };
    hints.push(("^H", "help"));
    hints
}

fn draw_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let mut left_spans: Vec<Span> = Vec::new();

    if let Some(ref err) = app.last_error {
        left_spans.push(Span::styled(format!(" ERR: {} ", err), theme::STATUS_ERROR));
    }

    if app.search_mode {
        left_spans.push(Span::styled(" SEARCH ", theme::SEARCH_BADGE));
    }

    if let Some(built) = app.index_built_at {
        left_spans.push(Span::styled(
            format!(" updated {} ", built.format("%H:%M:%S")),
            theme::STATUS_BAR,
        ));
    }

    let hints = hint_text(app);
    let mut hint_spans: Vec<Span> = Vec::new();
    for (i, (key, desc)) in hints.iter().enumerate() {
        if i > 0 {
            hint_spans.push(Span::styled("  ", theme::STATUS_BAR));
        }
        hint_spans.push(Span::styled(*key, theme::HINT_KEY));
        hint_spans.push(Span::styled(":", theme::HINT_DESC));
        hint_spans.push(Span::styled(*desc, theme::HINT_DESC));
    }
    hint_spans.push(Span::styled(" ", theme::STATUS_BAR));

    let left_width: usize = left_spans.iter().map(|s| s.width()).sum();
    let hint_width: usize = hint_spans.iter().map(|s| s.width()).sum();
    let gap = (area.width as usize).saturating_sub(left_width + hint_width);

    let mut spans = left_spans;
    spans.push(Span::styled(" ".repeat(gap), theme::STATUS_BAR));
    spans.extend(hint_spans);

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}
