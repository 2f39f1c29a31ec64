use crate::git::{Commit, FileEntry};
use crate::github::PrInfo;

use super::layout::{LayoutAssignment, WindowId};
use super::mode::{Mode, Selection};

/// Ticks a transient status message stays visible
const STATUS_TICKS: u32 = 20;

/// Overlay that captures all input while open
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modal {
    Help,
}

/// The canonical application model. Only the dispatcher mutates it.
#[derive(Debug, Clone)]
pub struct State {
    pub mode: Mode,
    pub selection: Selection,
    pub files: Vec<FileEntry>,
    /// Content for the current file or folder selection
    pub diff_content: String,
    pub commits: Vec<Commit>,

    pub branch: String,
    pub base_branch: String,
    pub diff_added: usize,
    pub diff_removed: usize,
    pub pr: Option<PrInfo>,

    pub focused_window: WindowId,
    pub active_modal: Option<Modal>,
    pub layout: LayoutAssignment,
    pub width: u16,
    pub height: u16,

    /// Last surfaced failure, informational only
    pub error: Option<String>,
    pub status_message: Option<String>,
    pub status_ticks: u32,
    pub watching: bool,
    pub should_quit: bool,
}

impl State {
    pub fn new(mode: Mode, width: u16, height: u16, breakpoint: u16) -> Self {
        State {
            mode,
            selection: Selection::None,
            files: Vec::new(),
            diff_content: String::new(),
            commits: Vec::new(),
            branch: String::new(),
            base_branch: String::new(),
            diff_added: 0,
            diff_removed: 0,
            pr: None,
            focused_window: WindowId::FileList,
            active_modal: None,
            layout: LayoutAssignment::compute(width, breakpoint, mode),
            width,
            height,
            error: None,
            status_message: None,
            status_ticks: 0,
            watching: false,
            should_quit: false,
        }
    }

    pub fn relayout(&mut self, breakpoint: u16) {
        self.layout = LayoutAssignment::compute(self.width, breakpoint, self.mode);
        if !self.layout.contains(self.focused_window) {
            self.focused_window = WindowId::FileList;
        }
    }

    pub fn focus_cycle(&self) -> [WindowId; 3] {
        self.layout.focus_cycle()
    }

    /// Replace the selection and drop content that belonged to the old one
    pub fn select(&mut self, selection: Selection) {
        self.selection = selection;
        self.diff_content.clear();
    }

    pub fn notify(&mut self, msg: &str) {
        self.status_message = Some(msg.to_string());
        self.status_ticks = 0;
    }

    /// Called once per loop iteration; expires the transient status message
    pub fn tick(&mut self) {
        if self.status_message.is_some() {
            self.status_ticks += 1;
            if self.status_ticks > STATUS_TICKS {
                self.status_message = None;
                self.status_ticks = 0;
            }
        }
    }

    /// What the preview window shows, derived from selection and mode
    pub fn preview(&self) -> Preview<'_> {
        match &self.selection {
            Selection::None => Preview::Empty,
            Selection::File(path) => self.content_preview(path),
            Selection::Folder { path, .. } => self.content_preview(path),
            Selection::Commit(commit) => Preview::Commit(commit_summary(commit, self.pr.as_ref())),
        }
    }

    fn content_preview<'a>(&'a self, title: &'a str) -> Preview<'a> {
        if self.mode.is_browse() {
            Preview::Raw {
                path: title,
                text: &self.diff_content,
            }
        } else {
            Preview::Diff {
                title,
                text: &self.diff_content,
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Preview<'a> {
    Empty,
    Diff { title: &'a str, text: &'a str },
    Raw { path: &'a str, text: &'a str },
    Commit(Vec<String>),
}

impl Preview<'_> {
    pub fn line_count(&self) -> usize {
        match self {
            Preview::Empty => 0,
            Preview::Diff { text, .. } | Preview::Raw { text, .. } => text.lines().count(),
            Preview::Commit(lines) => lines.len(),
        }
    }
}

/// Commit header followed by the branch's pull request, if any
pub fn commit_summary(commit: &Commit, pr: Option<&PrInfo>) -> Vec<String> {
    let mut lines = vec![
        format!("commit {}", commit.hash),
        format!("Author: {}", commit.author),
        format!("Date:   {}", commit.date),
        String::new(),
        format!("    {}", commit.subject),
        String::new(),
    ];

    match pr {
        Some(pr) => {
            lines.push(format!("Pull request #{}: {}", pr.number, pr.title));
            if !pr.state.is_empty() {
                lines.push(format!(
                    "State:  {}  ({} <- {})",
                    pr.state, pr.base_ref_name, pr.head_ref_name
                ));
            }
            if !pr.author.login.is_empty() {
                lines.push(format!("Author: {}", pr.author.login));
            }
            let reviewers = pr.reviewer_states();
            if !reviewers.is_empty() {
                let joined: Vec<String> = reviewers
                    .iter()
                    .map(|(login, state)| format!("{} {}", login, state))
                    .collect();
                lines.push(format!("Reviews: {}", joined.join(", ")));
            }
            lines.push(format!("Comments: {}", pr.comment_count()));
            if !pr.url.is_empty() {
                lines.push(pr.url.clone());
            }
            if !pr.body.trim().is_empty() {
                lines.push(String::new());
                lines.extend(pr.body.lines().map(|l| l.to_string()));
            }
        }
        None => lines.push("No pull request for this branch".to_string()),
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::parse_pr_json;

    fn commit() -> Commit {
        Commit {
            hash: "abc123def".into(),
            short_hash: "abc123d".into(),
            author: "Ada".into(),
            date: "2 days ago".into(),
            subject: "Fix the thing".into(),
        }
    }

    #[test]
    fn new_state_has_defaults() {
        let s = State::new(Mode::default(), 120, 40, 80);
        assert_eq!(s.mode, Mode::BranchChanges);
        assert_eq!(s.focused_window, WindowId::FileList);
        assert!(s.selection.is_none());
        assert!(s.active_modal.is_none());
        assert!(s.layout.contains(s.focused_window));
    }

    #[test]
    fn status_message_expires_after_twenty_ticks() {
        let mut s = State::new(Mode::default(), 120, 40, 80);
        s.notify("Copied");
        for _ in 0..STATUS_TICKS {
            s.tick();
        }
        assert_eq!(s.status_message.as_deref(), Some("Copied"));
        s.tick();
        assert!(s.status_message.is_none());
    }

    #[test]
    fn preview_follows_selection_and_mode() {
        let mut s = State::new(Mode::BranchChanges, 120, 40, 80);
        assert_eq!(s.preview(), Preview::Empty);

        s.select(Selection::File("a.rs".into()));
        s.diff_content = "+x".into();
        assert_eq!(
            s.preview(),
            Preview::Diff {
                title: "a.rs",
                text: "+x"
            }
        );

        s.mode = Mode::BrowseAll;
        assert!(matches!(s.preview(), Preview::Raw { path: "a.rs", .. }));
    }

    #[test]
    fn select_drops_stale_content() {
        let mut s = State::new(Mode::default(), 120, 40, 80);
        s.diff_content = "old".into();
        s.select(Selection::Commit(commit()));
        assert!(s.diff_content.is_empty());
    }

    #[test]
    fn commit_summary_without_pr() {
        let lines = commit_summary(&commit(), None);
        assert_eq!(lines[0], "commit abc123def");
        assert!(lines.contains(&"    Fix the thing".to_string()));
        assert_eq!(lines.last().map(String::as_str), Some("No pull request for this branch"));
    }

    #[test]
    fn commit_summary_with_pr() {
        let pr = parse_pr_json(
            r#"{"number": 7, "title": "Feature", "state": "OPEN",
                "baseRefName": "main", "headRefName": "feat",
                "comments": [{"author": {"login": "x"}, "body": "hi"}]}"#,
        )
        .unwrap();
        let lines = commit_summary(&commit(), Some(&pr));
        assert!(lines.contains(&"Pull request #7: Feature".to_string()));
        assert!(lines.contains(&"State:  OPEN  (main <- feat)".to_string()));
        assert!(lines.contains(&"Comments: 1".to_string()));
    }

    #[test]
    fn relayout_keeps_focus_valid() {
        let mut s = State::new(Mode::BranchChanges, 120, 40, 80);
        s.focused_window = WindowId::DiffView;
        s.mode = Mode::BrowseAll;
        s.relayout(80);
        assert_eq!(s.focused_window, WindowId::FileList);
    }
}
