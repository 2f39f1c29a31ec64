mod diff;
mod status;

use anyhow::Result;

pub use diff::location_at;
pub use status::{get_repo_root_in, git_dir_in, Commit, FileEntry, FileStatus, GitCli};

/// Which side of history a diff is taken against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffMode {
    /// HEAD → working tree (staged and unstaged together)
    Working,
    /// base branch → working tree
    Branch,
}

/// Which file set a listing covers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Listing {
    /// Files with changes under the given diff mode
    Changed(DiffMode),
    /// Every tracked or untracked-but-not-ignored file
    All,
    /// Documentation files only
    Docs,
}

/// Everything the dashboard needs from the local repository.
///
/// Implementations are called from worker threads, never from the dispatcher.
pub trait Repository: Send + Sync {
    fn current_branch(&self) -> Result<String>;

    fn base_branch(&self) -> Result<String>;

    fn list_files(&self, listing: Listing) -> Result<Vec<FileEntry>>;

    /// Unified diff text for one path
    fn diff(&self, path: &str, mode: DiffMode) -> Result<String>;

    fn read_file(&self, path: &str) -> Result<String>;

    /// Most recent commits, newest first, at most `limit`
    fn log(&self, limit: usize) -> Result<Vec<Commit>>;

    /// (added, removed) line counts
    fn diff_stats(&self, mode: DiffMode) -> Result<(usize, usize)>;
}
