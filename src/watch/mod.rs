use anyhow::{Context, Result};
use notify::event::ModifyKind;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::time::Duration;

use crate::app::Msg;

enum Signal {
    /// A relevant raw filesystem event
    Event,
    Stop,
}

/// Watches the repository and sends one `FilesystemChanged` per burst of
/// activity. Dropping the handle stops it.
pub struct ChangeDetector {
    signals: Sender<Signal>,
}

impl ChangeDetector {
    /// Start in the background. Watch setup, including the working-tree
    /// walk, happens on the detector's own thread. If it fails, live reload
    /// stays off and `Watching(false)` is sent.
    pub fn start(
        repo_root: PathBuf,
        git_dir: PathBuf,
        exclude: &[String],
        debounce: Duration,
        tx: Sender<Msg>,
    ) -> Result<Self> {
        let (signals, rx) = mpsc::channel();
        let events = signals.clone();
        let excludes = compile_excludes(exclude);

        std::thread::Builder::new()
            .name("watcher".into())
            .spawn(move || {
                let _watcher = match watch_repository(&repo_root, &git_dir, &excludes, events) {
                    Ok(w) => w,
                    Err(e) => {
                        tracing::warn!(error = %format!("{:#}", e), "live reload unavailable");
                        let _ = tx.send(Msg::Watching(false));
                        return;
                    }
                };
                let _ = tx.send(Msg::Watching(true));
                debounce_loop(&rx, debounce, || tx.send(Msg::FilesystemChanged).is_ok());
                tracing::debug!("watcher stopped");
            })
            .context("Failed to start watcher thread")?;

        Ok(ChangeDetector { signals })
    }
}

impl Drop for ChangeDetector {
    fn drop(&mut self) {
        let _ = self.signals.send(Signal::Stop);
    }
}

/// Wait for an event, then keep restarting a `window`-long timer on every
/// further event; emit once the timer runs out undisturbed. Returns on
/// `Stop`, when the sender side is gone, or when `emit` reports the
/// receiver gone.
fn debounce_loop(rx: &Receiver<Signal>, window: Duration, mut emit: impl FnMut() -> bool) {
    loop {
        match rx.recv() {
            Ok(Signal::Event) => {}
            Ok(Signal::Stop) | Err(_) => return,
        }
        loop {
            match rx.recv_timeout(window) {
                Ok(Signal::Event) => continue,
                Err(RecvTimeoutError::Timeout) => break,
                Ok(Signal::Stop) | Err(RecvTimeoutError::Disconnected) => return,
            }
        }
        tracing::debug!("filesystem settled, notifying");
        if !emit() {
            return;
        }
    }
}

fn compile_excludes(patterns: &[String]) -> Vec<glob::Pattern> {
    patterns
        .iter()
        .filter_map(|p| match glob::Pattern::new(p) {
            Ok(pattern) => Some(pattern),
            Err(e) => {
                tracing::warn!(pattern = %p, error = %e, "ignoring bad watcher exclude");
                None
            }
        })
        .collect()
}

fn watch_repository(
    repo_root: &Path,
    git_dir: &Path,
    excludes: &[glob::Pattern],
    signals: Sender<Signal>,
) -> Result<RecommendedWatcher> {
    let filter_dir = git_dir.to_path_buf();
    let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| match res {
        Ok(event) if is_relevant(&event.kind, &event.paths, &filter_dir) => {
            let _ = signals.send(Signal::Event);
        }
        Ok(_) => {}
        Err(e) => tracing::warn!(error = %e, "watch error"),
    })
    .context("Failed to create filesystem watcher")?;

    // index and HEAD are replaced by rename, so watch their directory
    watcher
        .watch(git_dir, RecursiveMode::NonRecursive)
        .with_context(|| format!("Failed to watch {}", git_dir.display()))?;
    let heads = git_dir.join("refs").join("heads");
    if heads.is_dir() {
        watcher
            .watch(&heads, RecursiveMode::Recursive)
            .with_context(|| format!("Failed to watch {}", heads.display()))?;
    }

    let dirs = walk_tree(repo_root, excludes);
    let mut watched = 0usize;
    for dir in &dirs {
        match watcher.watch(dir, RecursiveMode::NonRecursive) {
            Ok(()) => watched += 1,
            Err(e) => tracing::debug!(dir = %dir.display(), error = %e, "skipping directory"),
        }
    }
    tracing::info!(directories = watched, "watching working tree");

    Ok(watcher)
}

/// Pure permission or access events never count. Inside the control
/// directory only the index, HEAD, and branch refs count.
fn is_relevant(kind: &EventKind, paths: &[PathBuf], git_dir: &Path) -> bool {
    match kind {
        EventKind::Access(_) => return false,
        EventKind::Modify(ModifyKind::Metadata(_)) => return false,
        _ => {}
    }
    let heads = git_dir.join("refs").join("heads");
    paths.is_empty()
        || paths.iter().any(|p| {
            if !p.starts_with(git_dir) {
                return true;
            }
            p == &git_dir.join("index") || p == &git_dir.join("HEAD") || p.starts_with(&heads)
        })
}

/// Every directory of the working tree, skipping the control directory,
/// hidden directories, and directories whose name matches an exclude.
fn walk_tree(root: &Path, excludes: &[glob::Pattern]) -> Vec<PathBuf> {
    let mut out = Vec::new();
    let mut stack = vec![root.to_path_buf()];
    while let Some(dir) = stack.pop() {
        let Ok(entries) = std::fs::read_dir(&dir) else {
            continue;
        };
        out.push(dir);
        for entry in entries.flatten() {
            let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
            if !is_dir {
                continue;
            }
            let name = entry.file_name().to_string_lossy().to_string();
            if name.starts_with('.') || excludes.iter().any(|p| p.matches(&name)) {
                continue;
            }
            stack.push(entry.path());
        }
    }
    out
}
