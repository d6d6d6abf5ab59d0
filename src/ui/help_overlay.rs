use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use super::{theme, util};

pub fn draw_help(f: &mut Frame, area: Rect) {
    let bindings = [
        ("j/k or Up/Down", "Navigate threads / scroll"),
        ("h/l or Left/Right", "Switch panes"),
        ("Enter", "Open thread"),
        ("Esc / Backspace", "Back to dashboard"),
        ("g / G", "Jump to top / bottom"),
        ("/", "Filter by project name"),
        ("Enter / Esc", "Keep / clear filter (while typing)"),
        ("o", "Open thread in browser"),
        ("r", "Refresh threads"),
        ("? / Ctrl-H", "Toggle this help"),
        ("q / Ctrl+C", "Quit"),
    ];

    let height = bindings.len() as u16 + 4;
    let popup_area = util::centered(area, 56, height);

    f.render_widget(Clear, popup_area);

    let mut lines = vec![
        Line::from(Span::styled(" Keybindings", theme::HELP_TITLE)),
        Line::from(""),
    ];

    for (key, desc) in &bindings {
        lines.push(Line::from(vec![
            Span::styled(format!("  {:20}", key), theme::HELP_KEY),
            Span::styled(*desc, theme::HELP_DESC),
        ]));
    }

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_style(theme::BORDER_ACTIVE);

    let paragraph = Paragraph::new(lines).block(block);
    f.render_widget(paragraph, popup_area);
}
