use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Frame;
use unicode_width::UnicodeWidthStr;

use super::{theme, util};
use crate::app::{App, Pane};

pub fn draw_sidebar(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(3)])
        .split(area);

    draw_search_box(f, chunks[0], app);
    draw_thread_list(f, chunks[1], app);
}

fn draw_search_box(f: &mut Frame, area: Rect, app: &App) {
    let border_style = if app.search_mode {
        theme::BORDER_SEARCH
    } else {
        theme::BORDER_INACTIVE
    };
    let block = Block::default()
        .title(" Search ")
        .borders(Borders::ALL)
        .border_style(border_style);
    let inner = block.inner(area);
    f.render_widget(block, area);
    f.render_widget(&app.search_editor, inner);
}

fn draw_thread_list(f: &mut Frame, area: Rect, app: &App) {
    let border_style = if app.pane == Pane::Sidebar && !app.search_mode {
        theme::BORDER_ACTIVE
    } else {
        theme::BORDER_INACTIVE
    };

    let title = if app.filtered_threads.len() == app.all_threads.len() {
        format!(" Threads [{}] ", app.all_threads.len())
    } else {
        format!(
            " Threads [{}/{}] ",
            app.filtered_threads.len(),
            app.all_threads.len()
        )
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style);

    // Partial results are never shown while a build is running.
    if app.threads_loading && app.all_threads.is_empty() {
        let p = Paragraph::new(format!("{} Loading threads...", app.spinner()))
            .style(theme::EMPTY_STATE)
            .block(block);
        f.render_widget(p, area);
        return;
    }

    if app.filtered_threads.is_empty() {
        let query = app.search_query();
        let msg = if app.all_threads.is_empty() {
            "No threads yet.".to_string()
        } else {
            format!("No projects match \"{}\"", query.trim())
        };
        let p = Paragraph::new(msg)
            .style(theme::EMPTY_STATE)
            .block(block)
            .wrap(Wrap { trim: false });
        f.render_widget(p, area);
        return;
    }

    let inner_width = area.width.saturating_sub(4) as usize;
    let current = app.dispatcher.router.current().thread_id();

    let items: Vec<ListItem> = app
        .filtered_threads
        .iter()
        .map(|t| {
            let marker = if app.dispatcher.is_navigating(&t.thread_id) {
                Span::styled(format!("{} ", app.spinner()), theme::NAVIGATING)
            } else if current == Some(t.thread_id.as_str()) {
                Span::styled("● ", theme::CURRENT_THREAD)
            } else {
                Span::raw("  ")
            };

            let age = t.age_label();
            let name_width = inner_width.saturating_sub(age.width() + 3);
            let name = util::fit_width(&t.project_name, name_width);
            let gap = inner_width.saturating_sub(2 + name.width() + age.width());

            let title = Line::from(vec![
                marker,
                Span::styled(name, theme::PROJECT_NAME),
                Span::raw(" ".repeat(gap)),
                Span::styled(age, theme::THREAD_AGE),
            ]);
            let sub = Line::from(Span::styled(
                format!("  {}", util::truncate_chars(&t.thread_id, 36)),
                theme::THREAD_AGE,
            ));
            ListItem::new(vec![title, sub])
        })
        .collect();

    let mut state = ListState::default();
    state.select(Some(app.thread_index));

    let list = List::new(items)
        .block(block)
        .highlight_style(theme::LIST_SELECTED);

    f.render_stateful_widget(list, area, &mut state);
}
