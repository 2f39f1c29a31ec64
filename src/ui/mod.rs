mod commit_list;
mod diff_view;
mod file_list;
mod file_view;
mod help;
pub mod highlight;
mod layout;
mod preview;
mod status_bar;
mod styles;
mod utils;
mod window;

pub use window::{Window, Windows};

use crate::app::{App, WindowId};
use highlight::Highlighter;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::Frame;

/// Render the entire UI from the post-turn state
pub fn draw(f: &mut Frame, app: &App, hl: &Highlighter) {
    let state = &app.state;
    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),    // windows
            Constraint::Length(1), // status bar
        ])
        .split(f.area());

    for (id, rect) in layout::regions(outer[0], &state.layout, &app.windows, app.left_ratio()) {
        let window = app.windows.get(id);
        let focused = state.active_modal.is_none() && state.focused_window == window.id();
        window.render(f, rect, state, focused, hl);
    }

    status_bar::render(f, outer[1], state);

    if state.active_modal.is_some() {
        app.windows.get(WindowId::Help).render(f, f.area(), state, true, hl);
    }
}
