use crossterm::event::KeyEvent;
use std::time::Duration;

use crate::git::{Commit, DiffMode, FileEntry, Listing};
use crate::github::PrInfo;

use super::mode::Mode;

/// Everything that can enter the dispatcher. One message per turn.
#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    Resize(u16, u16),
    Key(KeyEvent),

    SelectFile(String),
    SelectFolder { path: String, children: Vec<String> },
    SelectCommit(Commit),

    FilesLoaded(Vec<FileEntry>),
    ContentLoaded(String),
    CommitsLoaded(Vec<Commit>),
    BranchInfo { branch: String, base: String },
    DiffStats { added: usize, removed: usize },
    PrLoaded(Option<PrInfo>),

    Error(String),
    FilesystemChanged,
    /// Whether live reload is active
    Watching(bool),
    PollTick,

    /// A foreground editor exited and gave the terminal back
    EditorClosed,
    /// Transient status line text from a worker
    Notice(String),
    /// UI clock, once per loop iteration
    Tick,
}

/// Work requested by a dispatch turn. Each variant carries a snapshot of
/// the inputs it needs; workers never look at State.
#[derive(Debug, Clone, PartialEq)]
pub enum Task {
    LoadBranchInfo,
    LoadFiles(Listing),
    LoadCommits,
    LoadContent { mode: Mode, target: ContentTarget },
    LoadDiffStats(DiffMode),
    LoadPr,
    /// Emit `PollTick` after the interval
    SchedulePoll(Duration),
    CopyToClipboard(String),
    /// Launch a GUI editor and move on
    OpenEditor { path: String, line: Option<usize> },
    /// Hand the terminal to a terminal editor until it exits. The main loop
    /// runs this one itself.
    EditInTerminal { path: String, line: Option<usize> },
    /// Feed a message back into the loop on its next turn
    Deliver(Msg),
}

/// What a content load covers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentTarget {
    File(String),
    /// Children of a folder in listing order; failed or empty children are skipped
    Folder(Vec<String>),
}

impl Task {
    pub fn name(&self) -> &'static str {
        match self {
            Task::LoadBranchInfo => "branch-info",
            Task::LoadFiles(_) => "files",
            Task::LoadCommits => "commits",
            Task::LoadContent { .. } => "content",
            Task::LoadDiffStats(_) => "diff-stats",
            Task::LoadPr => "pr",
            Task::SchedulePoll(_) => "poll",
            Task::CopyToClipboard(_) => "clipboard",
            Task::OpenEditor { .. } | Task::EditInTerminal { .. } => "editor",
            Task::Deliver(_) => "deliver",
        }
    }
}
