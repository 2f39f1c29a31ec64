use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{layout::Rect, Frame};

use crate::app::{Mode, Msg, State, WindowId};

use super::commit_list::CommitList;
use super::diff_view::DiffView;
use super::file_list::FileList;
use super::file_view::FileView;
use super::help::Help;
use super::highlight::Highlighter;

/// A panel that owns its own cursor and scroll position.
///
/// Windows never mutate `State`; anything they want changed is returned
/// as a message for the dispatcher.
pub trait Window {
    fn id(&self) -> WindowId;

    fn handle_key(&mut self, key: KeyEvent, state: &State) -> Option<Msg>;

    fn render(&self, f: &mut Frame, area: Rect, state: &State, focused: bool, hl: &Highlighter);

    /// (columns, rows) below which the window is unusable
    fn min_size(&self) -> (u16, u16);
}

/// Every window the dashboard can show
pub struct Windows {
    pub file_list: FileList,
    pub commit_list: CommitList,
    pub diff_view: DiffView,
    pub file_view: FileView,
    pub help: Help,
}

impl Windows {
    pub fn new(mode: Mode) -> Self {
        Windows {
            file_list: FileList::new(mode),
            commit_list: CommitList::default(),
            diff_view: DiffView::default(),
            file_view: FileView::default(),
            help: Help::default(),
        }
    }

    pub fn get(&self, id: WindowId) -> &dyn Window {
        match id {
            WindowId::FileList => &self.file_list,
            WindowId::CommitList => &self.commit_list,
            WindowId::DiffView => &self.diff_view,
            WindowId::FileView => &self.file_view,
            WindowId::Help => &self.help,
        }
    }

    pub fn get_mut(&mut self, id: WindowId) -> &mut dyn Window {
        match id {
            WindowId::FileList => &mut self.file_list,
            WindowId::CommitList => &mut self.commit_list,
            WindowId::DiffView => &mut self.diff_view,
            WindowId::FileView => &mut self.file_view,
            WindowId::Help => &mut self.help,
        }
    }

    pub fn min_size(&self, id: WindowId) -> (u16, u16) {
        self.get(id).min_size()
    }

    /// Preview cursors go back to the top when the selection changes
    pub fn reset_preview(&mut self) {
        self.diff_view.cursor.reset();
        self.file_view.cursor.reset();
    }
}

/// Row cursor shared by every scrollable window
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    pub pos: usize,
}

impl Cursor {
    pub fn reset(&mut self) {
        self.pos = 0;
    }

    pub fn clamp(&mut self, len: usize) {
        self.pos = self.pos.min(len.saturating_sub(1));
    }

    /// Apply a navigation key over `len` rows with the given half-page size.
    /// `None` if the key is not a navigation key, else whether the row changed.
    pub fn navigate(&mut self, key: &KeyEvent, len: usize, half_page: usize) -> Option<bool> {
        let last = len.saturating_sub(1);
        let before = self.pos;
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        self.pos = match key.code {
            KeyCode::Char('d') if ctrl => (self.pos + half_page.max(1)).min(last),
            KeyCode::Char('u') if ctrl => self.pos.saturating_sub(half_page.max(1)),
            _ if ctrl => return None,
            KeyCode::Char('j') | KeyCode::Down => (self.pos + 1).min(last),
            KeyCode::Char('k') | KeyCode::Up => self.pos.saturating_sub(1),
            KeyCode::Char('J') => (self.pos + 5).min(last),
            KeyCode::Char('K') => self.pos.saturating_sub(5),
            KeyCode::Char('g') | KeyCode::Home => 0,
            KeyCode::Char('G') | KeyCode::End => last,
            _ => return None,
        };
        Some(self.pos != before)
    }
}

/// Rows moved by Ctrl-d / Ctrl-u, roughly half a panel
pub fn half_page(state: &State) -> usize {
    (state.height as usize / 4).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn cursor_stays_in_bounds() {
        let mut c = Cursor::default();
        assert_eq!(c.navigate(&key(KeyCode::Char('k')), 3, 1), Some(false));
        assert_eq!(c.navigate(&key(KeyCode::Char('G')), 3, 1), Some(true));
        assert_eq!(c.pos, 2);
        assert_eq!(c.navigate(&key(KeyCode::Char('j')), 3, 1), Some(false));
        assert_eq!(c.navigate(&key(KeyCode::Char('K')), 3, 1), Some(true));
        assert_eq!(c.pos, 0);
    }

    #[test]
    fn cursor_half_page() {
        let mut c = Cursor::default();
        let down = KeyEvent::new(KeyCode::Char('d'), KeyModifiers::CONTROL);
        c.navigate(&down, 100, 10);
        assert_eq!(c.pos, 10);
        let up = KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL);
        c.navigate(&up, 100, 10);
        assert_eq!(c.pos, 0);
    }

    #[test]
    fn cursor_ignores_other_keys() {
        let mut c = Cursor::default();
        assert_eq!(c.navigate(&key(KeyCode::Char('x')), 3, 1), None);
    }

    #[test]
    fn empty_list_keeps_cursor_at_zero() {
        let mut c = Cursor::default();
        c.navigate(&key(KeyCode::Char('G')), 0, 1);
        assert_eq!(c.pos, 0);
    }

    #[test]
    fn registry_resolves_every_id() {
        let w = Windows::new(Mode::default());
        for id in [
            WindowId::FileList,
            WindowId::CommitList,
            WindowId::DiffView,
            WindowId::FileView,
            WindowId::Help,
        ] {
            assert_eq!(w.get(id).id(), id);
        }
    }
}
