use ratatui::style::{Color, Modifier, Style};

// Header bar
pub const HEADER: Style = Style::new().fg(Color::Black).bg(Color::Cyan);
pub const HEADER_HEALTHY: Style = Style::new()
    .fg(Color::Black)
    .bg(Color::Green)
    .add_modifier(Modifier::BOLD);

// Status bar
pub const STATUS_BAR: Style = Style::new().fg(Color::White).bg(Color::DarkGray);
pub const STATUS_ERROR: Style = Style::new().fg(Color::Red).bg(Color::DarkGray);
pub const SEARCH_BADGE: Style = Style::new()
    .fg(Color::Black)
    .bg(Color::Yellow)
    .add_modifier(Modifier::BOLD);

// List items
pub const LIST_SELECTED: Style = Style::new()
    .fg(Color::White)
    .bg(Color::DarkGray)
    .add_modifier(Modifier::BOLD);
pub const PROJECT_NAME: Style = Style::new().fg(Color::Cyan);
pub const THREAD_AGE: Style = Style::new().fg(Color::DarkGray);
pub const NAVIGATING: Style = Style::new().fg(Color::Yellow).add_modifier(Modifier::BOLD);
pub const CURRENT_THREAD: Style = Style::new().fg(Color::Green).add_modifier(Modifier::BOLD);

// Borders
pub const BORDER_ACTIVE: Style = Style::new().fg(Color::Cyan);
pub const BORDER_INACTIVE: Style = Style::new().fg(Color::DarkGray);
pub const BORDER_SEARCH: Style = Style::new().fg(Color::Yellow);

// Help overlay
pub const HELP_TITLE: Style = Style::new().fg(Color::Cyan).add_modifier(Modifier::BOLD);
pub const HELP_KEY: Style = Style::new().fg(Color::Yellow).add_modifier(Modifier::BOLD);
pub const HELP_DESC: Style = Style::new().fg(Color::White);

// Footer hints
pub const HINT_KEY: Style = Style::new().fg(Color::Yellow).bg(Color::DarkGray);
pub const HINT_DESC: Style = Style::new().fg(Color::Gray).bg(Color::DarkGray);

// Empty state
pub const EMPTY_STATE: Style = Style::new().fg(Color::DarkGray);

// Detail labels
pub const LABEL: Style = Style::new().fg(Color::White).add_modifier(Modifier::BOLD);
pub const SECTION: Style = Style::new().fg(Color::Cyan).add_modifier(Modifier::BOLD);

// Full-screen states
pub const LOADING: Style = Style::new().fg(Color::Cyan).add_modifier(Modifier::BOLD);
pub const MAINTENANCE_TITLE: Style = Style::new().fg(Color::Yellow).add_modifier(Modifier::BOLD);
pub const MAINTENANCE_BORDER: Style = Style::new().fg(Color::Yellow);
