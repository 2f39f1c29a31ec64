//! One-shot workers for the dispatcher's tasks.
//!
//! Every task runs on its own thread and reports back with exactly one
//! message over the loop's channel. Nothing here touches `State`.

mod external;
#[cfg(test)]
pub(crate) mod fakes;

pub use external::is_gui_editor;

use anyhow::Result;
use std::sync::mpsc::Sender;
use std::sync::{Arc, Condvar, Mutex};
use std::time::Duration;

use crate::app::{ContentTarget, Mode, Msg, Task};
use crate::git::Repository;
use crate::github::PullRequests;

/// Commits shown in the commit list
pub const COMMIT_DISPLAY_LIMIT: usize = 8;

/// Inputs that stay fixed for the process lifetime
#[derive(Debug, Clone)]
pub struct Settings {
    pub repo_root: String,
    pub recent_commits: usize,
    pub editor: String,
}

/// Stop flag the poll chain waits on, so shutdown does not have to sit
/// out a full poll interval.
#[derive(Default)]
struct Shutdown {
    stopped: Mutex<bool>,
    cv: Condvar,
}

impl Shutdown {
    fn trigger(&self) {
        if let Ok(mut stopped) = self.stopped.lock() {
            *stopped = true;
        }
        self.cv.notify_all();
    }

    /// Sleep for `timeout` or until shutdown. True if shut down.
    fn wait(&self, timeout: Duration) -> bool {
        let Ok(guard) = self.stopped.lock() else {
            return true;
        };
        match self.cv.wait_timeout_while(guard, timeout, |stopped| !*stopped) {
            Ok((stopped, _)) => *stopped,
            Err(_) => true,
        }
    }

    fn is_stopped(&self) -> bool {
        self.stopped.lock().map(|s| *s).unwrap_or(true)
    }
}

pub struct Scheduler {
    repo: Arc<dyn Repository>,
    prs: Arc<dyn PullRequests>,
    tx: Sender<Msg>,
    settings: Arc<Settings>,
    shutdown: Arc<Shutdown>,
}

impl Scheduler {
    pub fn new(
        repo: Arc<dyn Repository>,
        prs: Arc<dyn PullRequests>,
        tx: Sender<Msg>,
        settings: Settings,
    ) -> Self {
        Scheduler {
            repo,
            prs,
            tx,
            settings: Arc::new(settings),
            shutdown: Arc::new(Shutdown::default()),
        }
    }

    pub fn spawn_all(&self, tasks: Vec<Task>) {
        for task in tasks {
            self.spawn(task);
        }
    }

    /// Start `task` on its own worker. Never blocks.
    pub fn spawn(&self, task: Task) {
        if self.shutdown.is_stopped() {
            return;
        }
        if let Task::Deliver(msg) = task {
            let _ = self.tx.send(msg);
            return;
        }
        if let Task::EditInTerminal { path, .. } = &task {
            tracing::warn!(path = %path, "terminal editor must run on the main loop");
            return;
        }

        tracing::debug!(task = task.name(), "issuing task");
        let name = format!("task-{}", task.name());
        let tx = self.tx.clone();
        let repo = Arc::clone(&self.repo);
        let prs = Arc::clone(&self.prs);
        let settings = Arc::clone(&self.settings);
        let shutdown = Arc::clone(&self.shutdown);

        let spawned = std::thread::Builder::new().name(name).spawn(move || {
            let msg = match task {
                Task::SchedulePoll(interval) => {
                    if shutdown.wait(interval) {
                        return;
                    }
                    Some(Msg::PollTick)
                }
                Task::CopyToClipboard(text) => Some(match external::copy_to_clipboard(&text) {
                    Ok(()) => Msg::Notice(format!("Copied {}", text)),
                    Err(e) => Msg::Error(format!("Copy failed: {:#}", e)),
                }),
                Task::OpenEditor { path, line } => {
                    external::open_in_editor(&settings.editor, &settings.repo_root, &path, line)
                        .err()
                        .map(|e| Msg::Error(format!("{:#}", e)))
                }
                other => fetch(&other, repo.as_ref(), prs.as_ref(), settings.recent_commits),
            };
            if let Some(msg) = msg {
                let _ = tx.send(msg);
            }
        });

        if let Err(e) = spawned {
            tracing::warn!(error = %e, "failed to spawn worker");
        }
    }

    /// Run the configured editor in the foreground and report how it went.
    /// Blocks until the editor exits.
    pub fn edit_in_terminal(&self, path: &str, line: Option<usize>) -> Msg {
        let settings = &self.settings;
        tracing::info!(editor = %settings.editor, path, "handing terminal to editor");
        match external::edit_in_terminal(&settings.editor, &settings.repo_root, path, line) {
            Ok(()) => Msg::EditorClosed,
            Err(e) => {
                tracing::warn!(error = %format!("{:#}", e), "editor failed");
                Msg::Error(format!("{:#}", e))
            }
        }
    }

    /// Stop the poll chain. In-flight fetches still finish; their results
    /// go to a channel nobody reads.
    pub fn shutdown(&self) {
        self.shutdown.trigger();
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Run one collaborator fetch and turn the outcome into its result message.
/// `None` for tasks that are not fetches.
pub fn fetch(
    task: &Task,
    repo: &dyn Repository,
    prs: &dyn PullRequests,
    recent_commits: usize,
) -> Option<Msg> {
    let msg = match task {
        Task::LoadBranchInfo => {
            let branch = repo.current_branch().unwrap_or_else(|e| {
                tracing::debug!(error = %e, "current branch unavailable");
                String::new()
            });
            let base = repo.base_branch().unwrap_or_else(|e| {
                tracing::debug!(error = %e, "base branch unavailable");
                String::new()
            });
            Msg::BranchInfo { branch, base }
        }
        Task::LoadFiles(listing) => match repo.list_files(*listing) {
            Ok(files) => Msg::FilesLoaded(files),
            Err(e) => {
                tracing::warn!(error = %e, "file listing failed");
                Msg::Error(format!("Failed to list files: {:#}", e))
            }
        },
        Task::LoadCommits => {
            let mut commits = repo.log(recent_commits).unwrap_or_else(|e| {
                tracing::debug!(error = %e, "commit log unavailable");
                Vec::new()
            });
            commits.truncate(COMMIT_DISPLAY_LIMIT);
            Msg::CommitsLoaded(commits)
        }
        Task::LoadContent { mode, target } => match load_content(repo, *mode, target) {
            Ok(text) => Msg::ContentLoaded(text),
            Err(e) => {
                tracing::warn!(error = %e, "content load failed");
                Msg::Error(format!("Failed to load content: {:#}", e))
            }
        },
        Task::LoadDiffStats(diff_mode) => {
            let (added, removed) = repo.diff_stats(*diff_mode).unwrap_or_else(|e| {
                tracing::debug!(error = %e, "diff stats unavailable");
                (0, 0)
            });
            Msg::DiffStats { added, removed }
        }
        Task::LoadPr => match prs.pr_for_branch() {
            Ok(pr) => Msg::PrLoaded(pr),
            Err(e) => {
                tracing::debug!(error = %e, "no pull request");
                Msg::PrLoaded(None)
            }
        },
        _ => return None,
    };
    Some(msg)
}

fn content_for(repo: &dyn Repository, mode: Mode, path: &str) -> Result<String> {
    if mode.is_browse() {
        repo.read_file(path)
    } else {
        repo.diff(path, mode.diff_mode())
    }
}

/// A file's diff or raw text; for a folder, each child's content joined by
/// newlines, skipping children that fail or come back empty. Raw children
/// get a header line with their path since, unlike diffs, they carry none.
pub fn load_content(repo: &dyn Repository, mode: Mode, target: &ContentTarget) -> Result<String> {
    match target {
        ContentTarget::File(path) => content_for(repo, mode, path),
        ContentTarget::Folder(children) => {
            let parts: Vec<String> = children
                .iter()
                .filter_map(|child| match content_for(repo, mode, child) {
                    Ok(text) if text.is_empty() => None,
                    Ok(text) if mode.is_browse() => Some(format!("{}\n{}", file_header(child), text)),
                    Ok(text) => Some(text),
                    Err(e) => {
                        tracing::debug!(path = %child, error = %e, "skipping folder child");
                        None
                    }
                })
                .collect();
            Ok(parts.join("\n"))
        }
    }
}

/// Separator line naming a file inside a folder preview
fn file_header(path: &str) -> String {
    format!("── {} ──", path)
}
