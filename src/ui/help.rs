use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Clear, Paragraph},
    Frame,
};

use crate::app::{keys, Msg, State, WindowId};

use super::highlight::Highlighter;
use super::styles;
use super::window::Window;

/// Key binding overlay
#[derive(Default)]
pub struct Help {
    scroll: usize,
}

impl Help {
    pub fn reset(&mut self) {
        self.scroll = 0;
    }
}

impl Window for Help {
    fn id(&self) -> WindowId {
        WindowId::Help
    }

    fn handle_key(&mut self, key: KeyEvent, _state: &State) -> Option<Msg> {
        let last = keys::HELP.len().saturating_sub(1);
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.scroll = (self.scroll + 1).min(last),
            KeyCode::Char('k') | KeyCode::Up => self.scroll = self.scroll.saturating_sub(1),
            _ => {}
        }
        None
    }

    fn render(&self, f: &mut Frame, area: Rect, _state: &State, _focused: bool, _hl: &Highlighter) {
        let height = (keys::HELP.len() as u16 + 2).min(area.height.saturating_sub(2));
        let width = 56u16.min(area.width.saturating_sub(4));
        let popup = centered_rect(width, height, area);
        f.render_widget(Clear, popup);

        let lines: Vec<Line> = keys::HELP
            .iter()
            .skip(self.scroll)
            .map(|(binding, desc)| {
                if desc.is_empty() {
                    Line::from(Span::styled(
                        format!(" {}", binding),
                        Style::default().fg(styles::CYAN),
                    ))
                } else {
                    Line::from(vec![
                        Span::styled(format!("  {:<18}", binding), styles::key_hint_style()),
                        Span::styled(*desc, Style::default().fg(styles::TEXT)),
                    ])
                }
            })
            .collect();

        let block = styles::panel_block(" HELP  ? / Esc to close ".to_string(), true)
            .style(Style::default().bg(styles::PANEL));
        f.render_widget(Paragraph::new(lines).block(block), popup);
    }

    fn min_size(&self) -> (u16, u16) {
        (40, 8)
    }
}

/// A `width` x `height` rectangle centred in `r`
pub fn centered_rect(width: u16, height: u16, r: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(r.height.saturating_sub(height) / 2),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(r.width.saturating_sub(width) / 2),
            Constraint::Length(width),
            Constraint::Min(0),
        ])
        .split(vertical[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::Mode;
    use crossterm::event::KeyModifiers;

    #[test]
    fn scroll_is_bounded() {
        let state = State::new(Mode::default(), 120, 40, 80);
        let mut help = Help::default();
        help.handle_key(KeyEvent::new(KeyCode::Char('k'), KeyModifiers::NONE), &state);
        assert_eq!(help.scroll, 0);
        for _ in 0..100 {
            help.handle_key(KeyEvent::new(KeyCode::Char('j'), KeyModifiers::NONE), &state);
        }
        assert_eq!(help.scroll, keys::HELP.len() - 1);
    }

    #[test]
    fn centered_rect_is_centred() {
        let r = centered_rect(10, 4, Rect::new(0, 0, 30, 12));
        assert_eq!(r, Rect::new(10, 4, 10, 4));
    }
}
