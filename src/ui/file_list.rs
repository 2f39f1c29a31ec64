use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{List, ListItem},
    Frame,
};
use std::collections::HashSet;

use crate::app::{Mode, Msg, State, WindowId};
use crate::git::{FileEntry, FileStatus};

use super::highlight::Highlighter;
use super::styles;
use super::utils::{truncate, viewport_start};
use super::window::{half_page, Cursor, Window};

/// One row of the file tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeRow {
    pub path: String,
    pub name: String,
    pub depth: usize,
    pub is_dir: bool,
    pub status: Option<FileStatus>,
}

/// Build a directory tree from a flat listing. Each directory row comes
/// right before its contents.
pub fn build_tree(files: &[FileEntry]) -> Vec<TreeRow> {
    let mut sorted: Vec<&FileEntry> = files.iter().collect();
    sorted.sort_by(|a, b| a.path.cmp(&b.path));

    let mut rows = Vec::new();
    let mut emitted: HashSet<String> = HashSet::new();
    for entry in sorted {
        let parts: Vec<&str> = entry.path.split('/').collect();
        let file_depth = parts.len() - 1;
        for depth in 0..file_depth {
            let dir = parts[..=depth].join("/");
            if emitted.insert(dir.clone()) {
                rows.push(TreeRow {
                    path: dir,
                    name: parts[depth].to_string(),
                    depth,
                    is_dir: true,
                    status: None,
                });
            }
        }
        rows.push(TreeRow {
            path: entry.path.clone(),
            name: parts[file_depth].to_string(),
            depth: file_depth,
            is_dir: false,
            status: Some(entry.status.clone()),
        });
    }
    rows
}

/// Files under `dir`, in listing order
pub fn descendants(files: &[FileEntry], dir: &str) -> Vec<String> {
    let prefix = format!("{}/", dir);
    files
        .iter()
        .filter(|f| f.path.starts_with(&prefix))
        .map(|f| f.path.clone())
        .collect()
}

fn parent_dir(path: &str) -> Option<&str> {
    path.rsplit_once('/').map(|(dir, _)| dir)
}

pub struct FileList {
    cursor: Cursor,
    /// Tree of the last synced listing
    tree: Vec<TreeRow>,
    collapsed: HashSet<String>,
    known_dirs: HashSet<String>,
    collapse_nested: bool,
}

impl FileList {
    pub fn new(mode: Mode) -> Self {
        FileList {
            cursor: Cursor::default(),
            tree: Vec::new(),
            collapsed: HashSet::new(),
            known_dirs: HashSet::new(),
            collapse_nested: mode.is_browse(),
        }
    }

    /// Back to the top with the mode's default folding
    pub fn reset(&mut self, mode: Mode) {
        *self = FileList::new(mode);
    }

    /// Pick up a new listing: fold newly seen nested folders in browse modes
    pub fn sync(&mut self, files: &[FileEntry]) {
        self.tree = build_tree(files);
        for row in self.tree.iter().filter(|r| r.is_dir) {
            if self.known_dirs.insert(row.path.clone()) && self.collapse_nested && row.depth >= 1 {
                self.collapsed.insert(row.path.clone());
            }
        }
        let len = self.visible().count();
        self.cursor.clamp(len);
    }

    pub fn is_collapsed(&self, dir: &str) -> bool {
        self.collapsed.contains(dir)
    }

    /// True when some ancestor folder of `path` is folded
    fn is_hidden(&self, path: &str) -> bool {
        path.match_indices('/')
            .any(|(i, _)| self.collapsed.contains(&path[..i]))
    }

    fn visible(&self) -> impl Iterator<Item = &TreeRow> + '_ {
        self.tree.iter().filter(|row| !self.is_hidden(&row.path))
    }

    pub fn visible_rows(&self) -> Vec<&TreeRow> {
        self.visible().collect()
    }

    fn row_at(&self, pos: usize) -> Option<&TreeRow> {
        self.visible().nth(pos)
    }

    fn selected(&self, files: &[FileEntry]) -> Option<Msg> {
        self.row_at(self.cursor.pos)
            .map(|row| Self::selection_for(row, files))
    }

    fn selection_for(row: &TreeRow, files: &[FileEntry]) -> Msg {
        if row.is_dir {
            Msg::SelectFolder {
                path: row.path.clone(),
                children: descendants(files, &row.path),
            }
        } else {
            Msg::SelectFile(row.path.clone())
        }
    }

    fn collapse(&mut self, files: &[FileEntry]) -> Option<Msg> {
        let (path, is_dir) = self
            .row_at(self.cursor.pos)
            .map(|row| (row.path.clone(), row.is_dir))?;
        if is_dir && !self.collapsed.contains(&path) {
            self.collapsed.insert(path);
            return None;
        }
        // On a file or folded folder: fold the parent and move onto it
        let parent = parent_dir(&path)?.to_string();
        self.collapsed.insert(parent.clone());
        let idx = self.visible().position(|r| r.path == parent)?;
        self.cursor.pos = idx;
        self.selected(files)
    }

    fn expand(&mut self) {
        let dir = match self.row_at(self.cursor.pos) {
            Some(row) if row.is_dir => row.path.clone(),
            _ => return,
        };
        self.collapsed.remove(&dir);
    }
}

impl Window for FileList {
    fn id(&self) -> WindowId {
        WindowId::FileList
    }

    fn handle_key(&mut self, key: KeyEvent, state: &State) -> Option<Msg> {
        match key.code {
            KeyCode::Enter => self.selected(&state.files),
            KeyCode::Char('h') | KeyCode::Left => self.collapse(&state.files),
            KeyCode::Char('l') | KeyCode::Right => {
                self.expand();
                None
            }
            _ => {
                let len = self.visible().count();
                match self.cursor.navigate(&key, len, half_page(state)) {
                    Some(true) => self.selected(&state.files),
                    _ => None,
                }
            }
        }
    }

    fn render(&self, f: &mut Frame, area: Rect, state: &State, focused: bool, _hl: &Highlighter) {
        let rows = self.visible_rows();
        let title = format!(" {} ({}) ", WindowId::FileList.title(), state.files.len());
        let block = styles::panel_block(title, focused);

        let viewport = area.height.saturating_sub(2) as usize;
        let start = viewport_start(self.cursor.pos, rows.len(), viewport);
        let end = (start + viewport).min(rows.len());
        let name_width = (area.width as usize).saturating_sub(6);

        let items: Vec<ListItem> = rows[start..end]
            .iter()
            .enumerate()
            .map(|(offset, row)| {
                let indent = "  ".repeat(row.depth);
                let (marker, marker_style) = match &row.status {
                    _ if row.is_dir => {
                        let icon = if self.is_collapsed(&row.path) { "▸" } else { "▾" };
                        (icon, ratatui::style::Style::default().fg(styles::BLUE))
                    }
                    Some(status) => (status.symbol(), styles::status_style(status)),
                    None => (" ", styles::dim_style()),
                };
                let name = if row.is_dir {
                    format!("{}/", row.name)
                } else {
                    row.name.clone()
                };
                let name = truncate(&name, name_width.saturating_sub(indent.len()));

                let is_cursor = start + offset == self.cursor.pos;
                let line_style = if is_cursor && focused {
                    styles::selected_style()
                } else {
                    styles::surface_style()
                };
                ListItem::new(Line::from(vec![
                    Span::raw(indent),
                    Span::styled(format!("{} ", marker), marker_style),
                    Span::styled(name, line_style),
                ]))
                .style(line_style)
            })
            .collect();

        if items.is_empty() {
            let empty = if state.mode.is_browse() {
                "  No files"
            } else {
                "  No files changed"
            };
            let list = List::new(vec![ListItem::new(Span::styled(empty, styles::dim_style()))])
                .block(block);
            f.render_widget(list, area);
            return;
        }

        f.render_widget(List::new(items).block(block), area);
    }

    fn min_size(&self) -> (u16, u16) {
        (20, 4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn entries(paths: &[&str]) -> Vec<FileEntry> {
        paths
            .iter()
            .map(|p| FileEntry::new(*p, FileStatus::Modified))
            .collect()
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn state_with(mode: Mode, paths: &[&str]) -> State {
        let mut s = State::new(mode, 120, 40, 80);
        s.files = entries(paths);
        s
    }

    #[test]
    fn tree_puts_directories_before_contents() {
        let rows = build_tree(&entries(&["src/app/mod.rs", "Cargo.toml", "src/main.rs"]));
        let paths: Vec<&str> = rows.iter().map(|r| r.path.as_str()).collect();
        assert_eq!(
            paths,
            vec!["Cargo.toml", "src", "src/app", "src/app/mod.rs", "src/main.rs"]
        );
        assert!(rows[1].is_dir);
        assert_eq!(rows[2].depth, 1);
        assert_eq!(rows[3].name, "mod.rs");
    }

    #[test]
    fn descendants_keep_listing_order() {
        let files = entries(&["src/z.rs", "docs/a.md", "src/a/b.rs"]);
        assert_eq!(descendants(&files, "src"), vec!["src/z.rs", "src/a/b.rs"]);
        assert!(descendants(&files, "sr").is_empty());
    }

    #[test]
    fn browse_mode_folds_nested_folders() {
        let files = entries(&["src/app/mod.rs", "src/main.rs"]);
        let mut list = FileList::new(Mode::BrowseAll);
        list.sync(&files);
        assert!(list.is_collapsed("src/app"));
        assert!(!list.is_collapsed("src"));
        let rows = list.visible_rows();
        assert!(rows.iter().all(|r| r.path != "src/app/mod.rs"));
    }

    #[test]
    fn change_modes_start_expanded() {
        let files = entries(&["src/app/mod.rs"]);
        let mut list = FileList::new(Mode::BranchChanges);
        list.sync(&files);
        assert_eq!(list.visible_rows().len(), 3);
    }

    #[test]
    fn moving_onto_a_file_selects_it() {
        let state = state_with(Mode::BranchChanges, &["a.rs", "b.rs"]);
        let mut list = FileList::new(state.mode);
        list.sync(&state.files);
        let msg = list.handle_key(key(KeyCode::Char('j')), &state);
        assert_eq!(msg, Some(Msg::SelectFile("b.rs".into())));
    }

    #[test]
    fn moving_onto_a_folder_snapshots_children() {
        let state = state_with(Mode::BranchChanges, &["a.rs", "lib/x.rs", "lib/y.rs"]);
        let mut list = FileList::new(state.mode);
        list.sync(&state.files);
        let msg = list.handle_key(key(KeyCode::Char('j')), &state);
        assert_eq!(
            msg,
            Some(Msg::SelectFolder {
                path: "lib".into(),
                children: vec!["lib/x.rs".into(), "lib/y.rs".into()],
            })
        );
    }

    #[test]
    fn no_message_when_cursor_does_not_move() {
        let state = state_with(Mode::BranchChanges, &["a.rs"]);
        let mut list = FileList::new(state.mode);
        list.sync(&state.files);
        assert_eq!(list.handle_key(key(KeyCode::Char('k')), &state), None);
        assert_eq!(
            list.handle_key(key(KeyCode::Enter), &state),
            Some(Msg::SelectFile("a.rs".into()))
        );
    }

    #[test]
    fn h_folds_parent_and_l_unfolds() {
        let state = state_with(Mode::BranchChanges, &["lib/x.rs", "lib/y.rs"]);
        let mut list = FileList::new(state.mode);
        list.sync(&state.files);
        list.handle_key(key(KeyCode::Char('j')), &state);
        let msg = list.handle_key(key(KeyCode::Char('h')), &state);
        assert!(matches!(msg, Some(Msg::SelectFolder { ref path, .. }) if path == "lib"));
        assert_eq!(list.cursor.pos, 0);
        assert_eq!(list.visible_rows().len(), 1);

        list.handle_key(key(KeyCode::Char('l')), &state);
        assert_eq!(list.visible_rows().len(), 3);
    }

    #[test]
    fn large_browse_listing_stays_fast() {
        let paths: Vec<String> = (0..2000)
            .flat_map(|d| (0..10).map(move |f| format!("pkg{:04}/src/f{}.rs", d, f)))
            .collect();
        let files: Vec<FileEntry> = paths
            .iter()
            .map(|p| FileEntry::new(p.as_str(), FileStatus::Unchanged))
            .collect();
        let mut state = State::new(Mode::BrowseAll, 120, 40, 80);
        state.files = files.clone();

        let started = std::time::Instant::now();
        let mut list = FileList::new(Mode::BrowseAll);
        list.sync(&files);
        for _ in 0..20 {
            assert_eq!(list.visible_rows().len(), 4000);
            list.handle_key(key(KeyCode::Char('j')), &state);
        }
        assert!(list.is_collapsed("pkg0000/src"));
        assert!(
            started.elapsed() < std::time::Duration::from_secs(2),
            "took {:?}",
            started.elapsed()
        );
    }
}
