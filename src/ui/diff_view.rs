use crossterm::event::KeyEvent;
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    Frame,
};

use crate::app::{Msg, Preview, State, WindowId};
use crate::git::location_at;

use super::highlight::Highlighter;
use super::preview;
use super::styles;
use super::window::{half_page, Cursor, Window};

/// Unified diff preview for the change modes
#[derive(Default)]
pub struct DiffView {
    pub cursor: Cursor,
}

impl DiffView {
    /// File and new-side line under the cursor
    pub fn location(&self, state: &State) -> Option<(String, Option<usize>)> {
        match state.preview() {
            Preview::Diff { title, text } => {
                let (path, line) = location_at(text, self.cursor.pos);
                Some((path.unwrap_or_else(|| title.to_string()), line))
            }
            _ => None,
        }
    }
}

/// Style one line of unified diff text
fn diff_line(line: &str) -> Line<'_> {
    let style = if line.starts_with("diff --git") {
        styles::file_header_style()
    } else if line.starts_with("+++") || line.starts_with("---") || line.starts_with("index ") {
        Style::default().fg(styles::DIM)
    } else if line.starts_with("@@") {
        styles::hunk_header_style()
    } else if line.starts_with('+') {
        styles::add_style()
    } else if line.starts_with('-') {
        styles::del_style()
    } else {
        Style::default().fg(styles::TEXT)
    };
    Line::from(Span::styled(line, style))
}

impl Window for DiffView {
    fn id(&self) -> WindowId {
        WindowId::DiffView
    }

    fn handle_key(&mut self, key: KeyEvent, state: &State) -> Option<Msg> {
        let len = state.preview().line_count();
        self.cursor.navigate(&key, len, half_page(state));
        None
    }

    fn render(&self, f: &mut Frame, area: Rect, state: &State, focused: bool, _hl: &Highlighter) {
        let preview = state.preview();
        let (title, lines) = match &preview {
            Preview::Diff { title, text } if text.is_empty() => {
                (title.to_string(), preview::empty_lines("No changes"))
            }
            Preview::Diff { title, text } => (title.to_string(), text.lines().map(diff_line).collect()),
            Preview::Commit(summary) => ("commit".to_string(), preview::commit_lines(summary)),
            _ => (
                WindowId::DiffView.title().to_string(),
                preview::empty_lines("Select a file to see its diff"),
            ),
        };
        let block = styles::panel_block(format!(" {} ", title), focused);
        preview::render_scrolled(f, area, block, lines, self.cursor.pos, focused);
    }

    fn min_size(&self) -> (u16, u16) {
        (30, 5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::{Mode, Selection};
    use crossterm::event::{KeyCode, KeyModifiers};

    const DIFF: &str = "\
diff --git a/a.rs b/a.rs
--- a/a.rs
+++ b/a.rs
@@ -3,2 +3,3 @@
 keep
+added
 tail
";

    fn state() -> State {
        let mut s = State::new(Mode::BranchChanges, 120, 40, 80);
        s.select(Selection::File("a.rs".into()));
        s.diff_content = DIFF.into();
        s
    }

    #[test]
    fn location_follows_cursor() {
        let s = state();
        let mut view = DiffView::default();
        for _ in 0..5 {
            view.handle_key(KeyEvent::new(KeyCode::Char('j'), KeyModifiers::NONE), &s);
        }
        assert_eq!(view.location(&s), Some(("a.rs".to_string(), Some(4))));
    }

    #[test]
    fn location_before_hunk_has_no_line() {
        let s = state();
        let view = DiffView::default();
        assert_eq!(view.location(&s), Some(("a.rs".to_string(), None)));
    }

    #[test]
    fn no_location_without_diff() {
        let s = State::new(Mode::BranchChanges, 120, 40, 80);
        assert_eq!(DiffView::default().location(&s), None);
    }

    #[test]
    fn cursor_clamped_to_content() {
        let s = state();
        let mut view = DiffView::default();
        view.handle_key(KeyEvent::new(KeyCode::Char('G'), KeyModifiers::NONE), &s);
        assert_eq!(view.cursor.pos, DIFF.lines().count() - 1);
    }
}
