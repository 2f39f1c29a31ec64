use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{List, ListItem},
    Frame,
};

use crate::app::{Msg, State, WindowId};
use crate::git::Commit;

use super::highlight::Highlighter;
use super::styles;
use super::utils::{truncate, viewport_start};
use super::window::{half_page, Cursor, Window};

#[derive(Default)]
pub struct CommitList {
    cursor: Cursor,
}

impl CommitList {
    /// Commit under the cursor
    pub fn highlighted<'a>(&self, state: &'a State) -> Option<&'a Commit> {
        state.commits.get(self.cursor.pos)
    }

    pub fn sync(&mut self, commits: &[Commit]) {
        self.cursor.clamp(commits.len());
    }
}

impl Window for CommitList {
    fn id(&self) -> WindowId {
        WindowId::CommitList
    }

    fn handle_key(&mut self, key: KeyEvent, state: &State) -> Option<Msg> {
        let moved = match key.code {
            KeyCode::Enter => true,
            _ => self.cursor.navigate(&key, state.commits.len(), half_page(state)) == Some(true),
        };
        if !moved {
            return None;
        }
        self.highlighted(state).cloned().map(Msg::SelectCommit)
    }

    fn render(&self, f: &mut Frame, area: Rect, state: &State, focused: bool, _hl: &Highlighter) {
        let title = format!(" {} ({}) ", WindowId::CommitList.title(), state.commits.len());
        let block = styles::panel_block(title, focused);

        let viewport = area.height.saturating_sub(2) as usize;
        let start = viewport_start(self.cursor.pos, state.commits.len(), viewport);
        let end = (start + viewport).min(state.commits.len());
        let subject_width = (area.width as usize).saturating_sub(12);

        let items: Vec<ListItem> = state.commits[start..end]
            .iter()
            .enumerate()
            .map(|(offset, commit)| {
                let is_cursor = start + offset == self.cursor.pos;
                let line_style = if is_cursor && focused {
                    styles::selected_style()
                } else {
                    styles::surface_style()
                };
                ListItem::new(Line::from(vec![
                    Span::styled(
                        format!("{} ", commit.short_hash),
                        Style::default().fg(styles::YELLOW),
                    ),
                    Span::styled(truncate(&commit.subject, subject_width), line_style),
                ]))
                .style(line_style)
            })
            .collect();

        f.render_widget(List::new(items).block(block), area);
    }

    fn min_size(&self) -> (u16, u16) {
        (20, 3)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::Mode;
    use crossterm::event::KeyModifiers;

    fn commit(n: usize) -> Commit {
        Commit {
            hash: format!("{:040}", n),
            short_hash: format!("{:07}", n),
            author: "dev".into(),
            date: "now".into(),
            subject: format!("commit {}", n),
        }
    }

    #[test]
    fn moving_selects_commit_under_cursor() {
        let mut state = State::new(Mode::default(), 120, 40, 80);
        state.commits = vec![commit(1), commit(2)];
        let mut list = CommitList::default();
        let msg = list.handle_key(KeyEvent::new(KeyCode::Char('j'), KeyModifiers::NONE), &state);
        assert_eq!(msg, Some(Msg::SelectCommit(commit(2))));
    }

    #[test]
    fn empty_list_selects_nothing() {
        let state = State::new(Mode::default(), 120, 40, 80);
        let mut list = CommitList::default();
        let msg = list.handle_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE), &state);
        assert_eq!(msg, None);
        assert!(list.highlighted(&state).is_none());
    }

    #[test]
    fn sync_clamps_cursor() {
        let mut state = State::new(Mode::default(), 120, 40, 80);
        state.commits = (0..5).map(commit).collect();
        let mut list = CommitList::default();
        list.handle_key(KeyEvent::new(KeyCode::Char('G'), KeyModifiers::NONE), &state);
        state.commits.truncate(2);
        list.sync(&state.commits);
        assert_eq!(list.highlighted(&state), Some(&commit(1)));
    }
}
