use ratatui::layout::{Constraint, Direction, Layout, Rect};
use unicode_width::UnicodeWidthStr;

/// Truncate a string to at most `max_chars` Unicode scalar values.
/// Returns a borrowed slice if possible; no allocation when not truncated.
pub fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Fit `s` into `width` terminal columns, ending with `…` when cut.
pub fn fit_width(s: &str, width: usize) -> String {
    if s.width() <= width {
        return s.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = unicode_width::UnicodeWidthChar::width(c).unwrap_or(0);
        if used + w > width - 1 {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

/// Rect of `width` x `height` centered in `area`, clamped to fit.
pub fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);

    let vert = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length((area.height - height) / 2),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .split(area);

    let horiz = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length((area.width - width) / 2),
            Constraint::Length(width),
            Constraint::Min(0),
        ])
        .split(vert[1]);

    horiz[1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("hi", 5), "hi");
    }

    #[test]
    fn test_fit_width() {
        assert_eq!(fit_width("Project Alpha", 20), "Project Alpha");
        assert_eq!(fit_width("Project Alpha", 8), "Project…");
        assert_eq!(fit_width("Project", 0), "");
        assert_eq!(fit_width("日本語", 4), "日…");
    }

    #[test]
    fn test_centered_fits_area() {
        let area = Rect::new(0, 0, 20, 10);
        let r = centered(area, 50, 4);
        assert_eq!(r.width, 20);
        assert_eq!(r.height, 4);
        assert_eq!(r.y, 3);
    }
}
