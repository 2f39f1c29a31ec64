use crossterm::event::KeyEvent;
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    Frame,
};

use crate::app::{Msg, Preview, Selection, State, WindowId};

use super::highlight::Highlighter;
use super::preview;
use super::styles;
use super::utils::viewport_start;
use super::window::{half_page, Cursor, Window};

/// Raw, syntax-highlighted file content for the browse modes
#[derive(Default)]
pub struct FileView {
    pub cursor: Cursor,
}

impl FileView {
    /// Selected file and the line under the cursor. Folder previews
    /// concatenate several files, so they only report the folder.
    pub fn location(&self, state: &State) -> Option<(String, Option<usize>)> {
        match (state.preview(), &state.selection) {
            (Preview::Raw { path, text }, Selection::File(_)) => {
                let line = (!text.is_empty()).then_some(self.cursor.pos + 1);
                Some((path.to_string(), line))
            }
            (Preview::Raw { path, .. }, _) => Some((path.to_string(), None)),
            _ => None,
        }
    }
}

impl Window for FileView {
    fn id(&self) -> WindowId {
        WindowId::FileView
    }

    fn handle_key(&mut self, key: KeyEvent, state: &State) -> Option<Msg> {
        let len = state.preview().line_count();
        self.cursor.navigate(&key, len, half_page(state));
        None
    }

    fn render(&self, f: &mut Frame, area: Rect, state: &State, focused: bool, hl: &Highlighter) {
        let preview = state.preview();
        match &preview {
            Preview::Raw { path, text } if !text.is_empty() => {
                let all: Vec<&str> = text.lines().collect();
                let viewport = area.height.saturating_sub(2) as usize;
                let start = viewport_start(self.cursor.pos, all.len(), viewport);
                let end = (start + viewport).min(all.len());
                let gutter = all.len().to_string().len();

                let lines: Vec<Line> = hl
                    .highlight_lines(&all[start..end], path, Style::default())
                    .into_iter()
                    .enumerate()
                    .map(|(offset, mut spans)| {
                        spans.insert(
                            0,
                            Span::styled(
                                format!("{:>width$} ", start + offset + 1, width = gutter),
                                styles::dim_style(),
                            ),
                        );
                        Line::from(spans)
                    })
                    .collect();

                let block = styles::panel_block(format!(" {} ", path), focused);
                let cursor = self.cursor.pos.saturating_sub(start);
                preview::render_scrolled(f, area, block, lines, cursor, focused);
            }
            Preview::Raw { path, .. } => {
                let block = styles::panel_block(format!(" {} ", path), focused);
                preview::render_scrolled(f, area, block, preview::empty_lines("Empty file"), 0, false);
            }
            Preview::Commit(summary) => {
                let block = styles::panel_block(" commit ".to_string(), focused);
                let lines = preview::commit_lines(summary);
                preview::render_scrolled(f, area, block, lines, self.cursor.pos, focused);
            }
            _ => {
                let block = styles::panel_block(format!(" {} ", WindowId::FileView.title()), focused);
                let lines = preview::empty_lines("Select a file to view it");
                preview::render_scrolled(f, area, block, lines, 0, false);
            }
        }
    }

    fn min_size(&self) -> (u16, u16) {
        (30, 5)
    }
}
