use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use super::theme;
use crate::app::{App, Pane};
use crate::model::thread::DisplayThread;
use crate::router::Route;

pub fn draw_content(f: &mut Frame, area: Rect, app: &App) {
    let border_style = if app.pane == Pane::Content {
        theme::BORDER_ACTIVE
    } else {
        theme::BORDER_INACTIVE
    };

    let (title, lines) = match app.dispatcher.router.current() {
        Route::Dashboard => (" Dashboard ".to_string(), dashboard_lines(app)),
        Route::Thread { thread_id, .. } => match app.routed_thread() {
            Some(t) => (format!(" {} ", t.project_name), thread_lines(app, t)),
            None => (
                " Thread ".to_string(),
                vec![Line::from(Span::styled(
                    format!("Thread {} is no longer in the index", thread_id),
                    theme::EMPTY_STATE,
                ))],
            ),
        },
    };

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style);
    let inner = block.inner(area);
    f.render_widget(block, area);

    // Apply scroll offset
    let inner_height = inner.height as usize;
    let total = lines.len();
    let scroll_offset = app.content_scroll.min(total.saturating_sub(inner_height));
    let visible_end = (scroll_offset + inner_height).min(total);

    let visible: Vec<Line> = lines[scroll_offset..visible_end].to_vec();
    f.render_widget(Paragraph::new(visible).wrap(Wrap { trim: false }), inner);
}

fn dashboard_lines(app: &App) -> Vec<Line<'static>> {
    let mut projects: Vec<(&str, usize)> = Vec::new();
    for t in &app.all_threads {
        match projects.iter_mut().find(|(name, _)| *name == t.project_name) {
            Some((_, count)) => *count += 1,
            None => projects.push((t.project_name.as_str(), 1)),
        }
    }

    let mut lines = vec![
        Line::from(Span::styled("Overview", theme::SECTION)),
        Line::from(""),
        Line::from(vec![
            Span::styled("API: ", theme::LABEL),
            Span::raw(app.config.api_url().to_string()),
        ]),
        Line::from(vec![
            Span::styled("Threads: ", theme::LABEL),
            Span::raw(app.all_threads.len().to_string()),
        ]),
        Line::from(vec![
            Span::styled("Projects with threads: ", theme::LABEL),
            Span::raw(projects.len().to_string()),
        ]),
    ];

    if !app.failed_projects.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled("Failed to load", theme::SECTION)));
        for (id, err) in &app.failed_projects {
            lines.push(Line::from(vec![
                Span::styled(format!("  {} ", id), theme::LABEL),
                Span::styled(err.clone(), theme::STATUS_ERROR),
            ]));
        }
    }

    if !projects.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled("Recent projects", theme::SECTION)));
        for (name, count) in projects {
            lines.push(Line::from(vec![
                Span::styled(format!("  {}", name), theme::PROJECT_NAME),
                Span::styled(format!("  {} threads", count), theme::THREAD_AGE),
            ]));
        }
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Select a thread and press Enter to open it.",
        theme::EMPTY_STATE,
    )));
    lines
}

fn thread_lines(app: &App, t: &DisplayThread) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(vec![
            Span::styled("Project: ", theme::LABEL),
            Span::styled(t.project_name.clone(), theme::PROJECT_NAME),
        ]),
        Line::from(vec![
            Span::styled("Project ID: ", theme::LABEL),
            Span::raw(t.project_id.clone()),
        ]),
        Line::from(vec![
            Span::styled("Thread ID: ", theme::LABEL),
            Span::raw(t.thread_id.clone()),
        ]),
        Line::from(vec![
            Span::styled("Updated: ", theme::LABEL),
            Span::raw(
                t.updated_at
                    .with_timezone(&chrono::Local)
                    .format("%Y-%m-%d %H:%M:%S")
                    .to_string(),
            ),
        ]),
        Line::from(vec![
            Span::styled("Path: ", theme::LABEL),
            Span::raw(t.url.clone()),
        ]),
    ];

    if let Some(link) = app.web_link(t) {
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled("URL: ", theme::LABEL),
            Span::raw(link),
        ]));
    }
    lines
}
