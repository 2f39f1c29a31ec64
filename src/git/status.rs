use super::{DiffMode, Listing, Repository};
use anyhow::{Context, Result};
use std::path::Path;
use std::process::Command;

/// File change status in git
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileStatus {
    Added,
    Modified,
    Deleted,
    Renamed(String), // old path
    Copied(String),
    Untracked,
    /// Listed by a browse mode, no pending change
    Unchanged,
}

impl FileStatus {
    pub fn symbol(&self) -> &'static str {
        match self {
            FileStatus::Added => "+",
            FileStatus::Modified => "~",
            FileStatus::Deleted => "-",
            FileStatus::Renamed(_) => "R",
            FileStatus::Copied(_) => "C",
            FileStatus::Untracked => "?",
            FileStatus::Unchanged => " ",
        }
    }
}

/// One row of a file listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub path: String,
    pub status: FileStatus,
}

impl FileEntry {
    pub fn new(path: impl Into<String>, status: FileStatus) -> Self {
        FileEntry {
            path: path.into(),
            status,
        }
    }
}

/// A single commit from `git log`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    pub hash: String,
    pub short_hash: String,
    pub author: String,
    /// Relative date as git prints it ("3 hours ago")
    pub date: String,
    pub subject: String,
}

const DOC_EXTENSIONS: &[&str] = &["md", "mdx", "markdown", "rst", "txt", "adoc"];

// ── Repo Info ──

/// Get the repository root directory for a specific path
pub fn get_repo_root_in(dir: &str) -> Result<String> {
    let output = Command::new("git")
        .args(["rev-parse", "--show-toplevel"])
        .current_dir(dir)
        .output()
        .context(format!("Failed to run git in '{}'", dir))?;

    if !output.status.success() {
        anyhow::bail!("Not a git repository: {}", dir);
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Absolute path of the control directory (handles worktrees, where `.git` is a file)
pub fn git_dir_in(repo_root: &str) -> Result<String> {
    let output = Command::new("git")
        .args(["rev-parse", "--absolute-git-dir"])
        .current_dir(repo_root)
        .output()
        .context("Failed to locate git directory")?;

    if !output.status.success() {
        anyhow::bail!("Failed to locate git directory for {}", repo_root);
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Get current branch for a specific repo root
pub fn get_current_branch_in(repo_root: &str) -> Result<String> {
    let output = Command::new("git")
        .args(["rev-parse", "--abbrev-ref", "HEAD"])
        .current_dir(repo_root)
        .output()
        .context("Failed to get current branch")?;

    if !output.status.success() {
        anyhow::bail!("Failed to determine current branch");
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Auto-detect the base branch by checking upstream tracking, then falling
/// back to the configured candidate names.
pub fn detect_base_branch_in(repo_root: &str, candidates: &[String]) -> Result<String> {
    let run = |args: &[&str]| -> Option<String> {
        let out = Command::new("git")
            .args(args)
            .current_dir(repo_root)
            .output()
            .ok()?;
        if out.status.success() {
            Some(String::from_utf8_lossy(&out.stdout).trim().to_string())
        } else {
            None
        }
    };

    let current = run(&["rev-parse", "--abbrev-ref", "HEAD"]).unwrap_or_default();

    // Try upstream tracking branch
    if let Some(upstream) = run(&["rev-parse", "--abbrev-ref", "@{upstream}"]) {
        if let Some(branch) = upstream.split('/').last() {
            if branch != current && !branch.is_empty() {
                if run(&["rev-parse", "--verify", branch]).is_some() {
                    return Ok(branch.to_string());
                }
                if run(&["rev-parse", "--verify", &upstream]).is_some() {
                    return Ok(upstream);
                }
            }
        }
    }

    for candidate in candidates {
        if *candidate != current && run(&["rev-parse", "--verify", candidate]).is_some() {
            return Ok(candidate.clone());
        }
    }

    // Remote-tracking branches as last resort
    for candidate in candidates {
        let remote = format!("origin/{}", candidate);
        if run(&["rev-parse", "--verify", &remote]).is_some() {
            return Ok(remote);
        }
    }

    Ok(candidates
        .first()
        .cloned()
        .unwrap_or_else(|| "main".to_string()))
}

// ── Parsers ──

/// Parse `git diff --name-status` output
pub fn parse_name_status(raw: &str) -> Vec<FileEntry> {
    raw.lines()
        .filter_map(|line| {
            let mut parts = line.split('\t');
            let code = parts.next()?.trim();
            let first = parts.next()?;
            let second = parts.next();
            let status = match code.chars().next()? {
                'A' => FileStatus::Added,
                'D' => FileStatus::Deleted,
                'R' => FileStatus::Renamed(first.to_string()),
                'C' => FileStatus::Copied(first.to_string()),
                _ => FileStatus::Modified,
            };
            let path = match (&status, second) {
                (FileStatus::Renamed(_) | FileStatus::Copied(_), Some(new_path)) => new_path,
                _ => first,
            };
            Some(FileEntry::new(path, status))
        })
        .collect()
}

/// Sum `git diff --numstat` output into (added, removed). Binary files ("-") count as zero.
pub fn parse_numstat(raw: &str) -> (usize, usize) {
    raw.lines().fold((0, 0), |(added, removed), line| {
        let mut parts = line.split('\t');
        let a = parts.next().and_then(|s| s.parse::<usize>().ok()).unwrap_or(0);
        let r = parts.next().and_then(|s| s.parse::<usize>().ok()).unwrap_or(0);
        (added + a, removed + r)
    })
}

/// Parse `git log --format=%H%x1f%h%x1f%an%x1f%ar%x1f%s` output
pub fn parse_log(raw: &str) -> Vec<Commit> {
    raw.lines()
        .filter_map(|line| {
            let fields: Vec<&str> = line.split('\x1f').collect();
            if fields.len() < 5 {
                return None;
            }
            Some(Commit {
                hash: fields[0].to_string(),
                short_hash: fields[1].to_string(),
                author: fields[2].to_string(),
                date: fields[3].to_string(),
                subject: fields[4..].join("\x1f"),
            })
        })
        .collect()
}

/// Whether a path belongs in the docs listing
pub fn is_doc_path(path: &str) -> bool {
    if path.starts_with("docs/") || path.contains("/docs/") {
        return true;
    }
    Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .map(|ext| DOC_EXTENSIONS.iter().any(|d| d.eq_ignore_ascii_case(ext)))
        .unwrap_or(false)
}

// ── Git CLI client ──

/// `Repository` backed by the `git` binary
pub struct GitCli {
    repo_root: String,
    default_branches: Vec<String>,
}

impl GitCli {
    pub fn new(repo_root: impl Into<String>, default_branches: Vec<String>) -> Self {
        GitCli {
            repo_root: repo_root.into(),
            default_branches,
        }
    }

    /// Run git and return stdout, failing on a non-zero exit
    fn git(&self, args: &[&str]) -> Result<String> {
        let output = Command::new("git")
            .args(args)
            .current_dir(&self.repo_root)
            .output()
            .with_context(|| format!("Failed to run git {}", args.first().unwrap_or(&"")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("git {} failed: {}", args.join(" "), stderr.trim());
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }

    fn diff_base(&self, mode: DiffMode) -> Result<String> {
        match mode {
            DiffMode::Working => Ok("HEAD".to_string()),
            DiffMode::Branch => self.base_branch(),
        }
    }

    fn untracked(&self) -> Result<Vec<String>> {
        let raw = self.git(&["ls-files", "--others", "--exclude-standard"])?;
        Ok(raw.lines().map(|l| l.to_string()).collect())
    }

    fn all_files(&self) -> Result<Vec<FileEntry>> {
        let raw = self.git(&["ls-files", "--cached", "--others", "--exclude-standard"])?;
        let mut seen = std::collections::HashSet::new();
        Ok(raw
            .lines()
            .filter(|l| seen.insert(l.to_string()))
            .map(|l| FileEntry::new(l, FileStatus::Unchanged))
            .collect())
    }

    /// Diff of an untracked file against an empty one
    fn diff_untracked(&self, path: &str) -> Result<String> {
        // --no-index exits 1 when the files differ, so read stdout regardless
        let output = Command::new("git")
            .args(["diff", "--no-color", "--no-index", "--", "/dev/null", path])
            .current_dir(&self.repo_root)
            .output()
            .context("Failed to run git diff --no-index")?;
        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

impl Repository for GitCli {
    fn current_branch(&self) -> Result<String> {
        get_current_branch_in(&self.repo_root)
    }

    fn base_branch(&self) -> Result<String> {
        detect_base_branch_in(&self.repo_root, &self.default_branches)
    }

    fn list_files(&self, listing: Listing) -> Result<Vec<FileEntry>> {
        match listing {
            Listing::Changed(mode) => {
                let base = self.diff_base(mode)?;
                let raw = self.git(&["diff", "--name-status", "-M", "--no-color", &base])?;
                let mut files = parse_name_status(&raw);
                if mode == DiffMode::Working {
                    files.extend(
                        self.untracked()?
                            .into_iter()
                            .map(|p| FileEntry::new(p, FileStatus::Untracked)),
                    );
                }
                Ok(files)
            }
            Listing::All => self.all_files(),
            Listing::Docs => Ok(self
                .all_files()?
                .into_iter()
                .filter(|f| is_doc_path(&f.path))
                .collect()),
        }
    }

    fn diff(&self, path: &str, mode: DiffMode) -> Result<String> {
        let base = self.diff_base(mode)?;
        let diff = self.git(&[
            "diff",
            "--unified=3",
            "--no-color",
            "--no-ext-diff",
            &base,
            "--",
            path,
        ])?;
        if diff.is_empty() && self.untracked()?.iter().any(|p| p == path) {
            return self.diff_untracked(path);
        }
        Ok(diff)
    }

    fn read_file(&self, path: &str) -> Result<String> {
        let full = Path::new(&self.repo_root).join(path);
        let bytes = std::fs::read(&full)
            .with_context(|| format!("Failed to read {}", full.display()))?;
        String::from_utf8(bytes).map_err(|_| anyhow::anyhow!("{} is not a text file", path))
    }

    fn log(&self, limit: usize) -> Result<Vec<Commit>> {
        let count = format!("-n{}", limit);
        let raw = self.git(&[
            "log",
            &count,
            "--no-color",
            "--format=%H%x1f%h%x1f%an%x1f%ar%x1f%s",
        ])?;
        Ok(parse_log(&raw))
    }

    fn diff_stats(&self, mode: DiffMode) -> Result<(usize, usize)> {
        let base = self.diff_base(mode)?;
        let raw = self.git(&["diff", "--numstat", "--no-color", &base])?;
        Ok(parse_numstat(&raw))
    }
}
