use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::config::BlocksConfig;
use crate::tasks::is_gui_editor;
use crate::ui::{Window, Windows};

use super::keys::{self, Action};
use super::layout::{cycle_step, WindowId};
use super::message::{Msg, Task};
use super::mode::{Mode, Selection};
use super::state::{Modal, State};

/// The single owner of `State`. Every mutation happens inside `update`.
pub struct App {
    pub state: State,
    pub windows: Windows,
    config: BlocksConfig,
}

impl App {
    pub fn new(config: BlocksConfig, mode: Mode, width: u16, height: u16) -> Self {
        App {
            state: State::new(mode, width, height, config.layout.breakpoint),
            windows: Windows::new(mode),
            config,
        }
    }

    pub fn left_ratio(&self) -> u16 {
        self.config.layout.left_ratio
    }

    /// Tasks issued once at startup; the last one starts the PR poll chain
    pub fn init(&self) -> Vec<Task> {
        let mode = self.state.mode;
        vec![
            Task::LoadBranchInfo,
            Task::LoadFiles(mode.listing()),
            Task::LoadCommits,
            Task::LoadDiffStats(mode.diff_mode()),
            Task::LoadPr,
            Task::SchedulePoll(self.config.timing.pr_poll_interval()),
        ]
    }

    /// Apply one message and return the work it asks for. Never blocks.
    pub fn update(&mut self, msg: Msg) -> Vec<Task> {
        match msg {
            Msg::Resize(width, height) => {
                self.state.width = width;
                self.state.height = height;
                self.state.relayout(self.config.layout.breakpoint);
                Vec::new()
            }
            Msg::Key(key) => self.handle_key(key),

            Msg::SelectFile(path) => self.select(Selection::File(path)),
            Msg::SelectFolder { path, children } => self.select(Selection::Folder { path, children }),
            Msg::SelectCommit(commit) => self.select(Selection::Commit(commit)),

            Msg::FilesLoaded(files) => {
                tracing::debug!(count = files.len(), "files loaded");
                self.state.files = files;
                self.windows.file_list.sync(&self.state.files);
                Vec::new()
            }
            Msg::ContentLoaded(text) => {
                self.state.diff_content = text;
                Vec::new()
            }
            Msg::CommitsLoaded(commits) => {
                self.state.commits = commits;
                self.windows.commit_list.sync(&self.state.commits);
                Vec::new()
            }
            Msg::BranchInfo { branch, base } => {
                self.state.branch = branch;
                self.state.base_branch = base;
                Vec::new()
            }
            Msg::DiffStats { added, removed } => {
                self.state.diff_added = added;
                self.state.diff_removed = removed;
                Vec::new()
            }
            Msg::PrLoaded(pr) => {
                self.state.pr = pr;
                Vec::new()
            }

            Msg::Error(text) => {
                self.state.error = Some(text);
                Vec::new()
            }
            Msg::FilesystemChanged => {
                tracing::debug!("repository changed on disk, reloading");
                self.reload_all()
            }
            Msg::Watching(active) => {
                self.state.watching = active;
                Vec::new()
            }
            Msg::PollTick => vec![
                Task::LoadPr,
                Task::SchedulePoll(self.config.timing.pr_poll_interval()),
            ],

            Msg::EditorClosed => self.refresh_tasks(),
            Msg::Notice(text) => {
                self.state.notify(&text);
                Vec::new()
            }
            Msg::Tick => {
                self.state.tick();
                Vec::new()
            }
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Vec<Task> {
        if self.state.active_modal.is_some() {
            match key.code {
                KeyCode::Char('q') => self.state.should_quit = true,
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    self.state.should_quit = true
                }
                KeyCode::Char('?') | KeyCode::Esc => self.state.active_modal = None,
                _ => {
                    self.windows.help.handle_key(key, &self.state);
                }
            }
            return Vec::new();
        }

        if let Some(action) = keys::global_action(&key) {
            return self.apply(action);
        }

        let focused = self.state.focused_window;
        self.windows
            .get_mut(focused)
            .handle_key(key, &self.state)
            .map(Task::Deliver)
            .into_iter()
            .collect()
    }

    fn apply(&mut self, action: Action) -> Vec<Task> {
        match action {
            Action::Quit => {
                self.state.should_quit = true;
                Vec::new()
            }
            Action::ToggleHelp => {
                self.windows.help.reset();
                self.state.active_modal = Some(Modal::Help);
                Vec::new()
            }
            Action::Refresh => {
                self.state.notify("Refreshing");
                self.refresh_tasks()
            }
            Action::CycleMode => self.switch_mode(self.state.mode.next()),
            Action::SelectMode(mode) => self.switch_mode(mode),
            Action::FocusNext | Action::FocusPrev => {
                let forward = action == Action::FocusNext;
                let target = cycle_step(&self.state.focus_cycle(), self.state.focused_window, forward);
                self.focus(target);
                Vec::new()
            }
            Action::CopyLocation => match self.location() {
                Some((path, line)) => vec![Task::CopyToClipboard(format_location(&path, line))],
                None => {
                    self.state.notify("Nothing to copy");
                    Vec::new()
                }
            },
            Action::OpenEditor => match self.location() {
                Some((path, line)) if is_gui_editor(&self.config.editor.resolve()) => {
                    vec![Task::OpenEditor { path, line }]
                }
                Some((path, line)) => vec![Task::EditInTerminal { path, line }],
                None => {
                    self.state.notify("Nothing to open");
                    Vec::new()
                }
            },
            Action::Escape => {
                self.state.error = None;
                self.focus(WindowId::FileList);
                Vec::new()
            }
        }
    }

    fn select(&mut self, selection: Selection) -> Vec<Task> {
        self.state.select(selection);
        self.windows.reset_preview();
        self.content_task().into_iter().collect()
    }

    fn content_task(&self) -> Option<Task> {
        self.state.selection.content_target().map(|target| Task::LoadContent {
            mode: self.state.mode,
            target,
        })
    }

    /// Move focus, applying the commit list's enter and leave rules
    fn focus(&mut self, target: WindowId) {
        let from = self.state.focused_window;
        if from == target {
            return;
        }
        if from == WindowId::CommitList {
            self.state.select(Selection::None);
            self.windows.reset_preview();
        }
        self.state.focused_window = target;
        if target == WindowId::CommitList {
            if let Some(commit) = self.windows.commit_list.highlighted(&self.state).cloned() {
                self.state.select(Selection::Commit(commit));
                self.windows.reset_preview();
            }
        }
    }

    fn switch_mode(&mut self, mode: Mode) -> Vec<Task> {
        self.focus(WindowId::FileList);
        self.state.mode = mode;
        self.state.select(Selection::None);
        self.windows.file_list.reset(mode);
        self.windows.reset_preview();
        self.state.relayout(self.config.layout.breakpoint);
        tracing::info!(mode = mode.label(), "mode switched");
        vec![
            Task::LoadFiles(mode.listing()),
            Task::LoadDiffStats(mode.diff_mode()),
        ]
    }

    /// Listing, selection content, and stats for the current mode
    fn refresh_tasks(&self) -> Vec<Task> {
        let mode = self.state.mode;
        let mut tasks = vec![Task::LoadFiles(mode.listing())];
        tasks.extend(self.content_task());
        tasks.push(Task::LoadDiffStats(mode.diff_mode()));
        tasks
    }

    fn reload_all(&self) -> Vec<Task> {
        let mode = self.state.mode;
        let mut tasks = vec![
            Task::LoadBranchInfo,
            Task::LoadFiles(mode.listing()),
            Task::LoadCommits,
        ];
        tasks.extend(self.content_task());
        tasks.push(Task::LoadDiffStats(mode.diff_mode()));
        tasks.push(Task::LoadPr);
        tasks
    }

    /// Path and line under the preview cursor when the preview has focus,
    /// else the selected file alone
    pub fn location(&self) -> Option<(String, Option<usize>)> {
        let selected = || {
            self.state
                .selection
                .file()
                .map(|path| (path.to_string(), None))
        };
        match self.state.focused_window {
            WindowId::FileView => self.windows.file_view.location(&self.state).or_else(selected),
            WindowId::DiffView => self.windows.diff_view.location(&self.state).or_else(selected),
            _ => selected(),
        }
    }
}

fn format_location(path: &str, line: Option<usize>) -> String {
    match line {
        Some(line) => format!("{}:{}", path, line),
        None => path.to_string(),
    }
}
