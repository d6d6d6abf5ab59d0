pub mod help_overlay;
pub mod layout;
pub mod sidebar_view;
pub mod status_view;
pub mod theme;
pub mod thread_view;
pub mod util;

use ratatui::Frame;

use crate::app::App;
use crate::model::health::ViewState;

/// Main draw dispatcher.
pub fn draw(f: &mut Frame, app: &App) {
    let area = f.area();
    match app.view_state() {
        ViewState::Loading => status_view::draw_loading(f, area, app),
        ViewState::Maintenance => status_view::draw_maintenance(f, area, app),
        ViewState::Normal => layout::draw_layout(f, app),
    }
}
