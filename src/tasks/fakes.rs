//! In-process collaborators for tests.

use anyhow::{bail, Result};

use crate::git::{Commit, DiffMode, FileEntry, FileStatus, Listing, Repository};
use crate::github::{PrInfo, PullRequests};

pub fn commits(n: usize) -> Vec<Commit> {
    (0..n)
        .map(|i| Commit {
            hash: format!("{:040x}", i),
            short_hash: format!("{:07x}", i),
            author: "dev".into(),
            date: format!("{} hours ago", i),
            subject: format!("change {}", i),
        })
        .collect()
}

/// Answers from fixed data. `missing.rs` always fails and `empty.rs` is empty.
#[derive(Default)]
pub struct FakeRepo {
    pub files: Vec<FileEntry>,
    pub commits: Vec<Commit>,
    pub fail: bool,
}

impl FakeRepo {
    pub fn with_files(paths: &[&str]) -> Self {
        FakeRepo {
            files: paths
                .iter()
                .map(|p| FileEntry::new(*p, FileStatus::Modified))
                .collect(),
            ..FakeRepo::default()
        }
    }

    pub fn failing() -> Self {
        FakeRepo {
            fail: true,
            ..FakeRepo::default()
        }
    }

    fn check(&self, path: &str) -> Result<()> {
        if self.fail || path == "missing.rs" {
            bail!("cannot read {}", path);
        }
        Ok(())
    }
}

impl Repository for FakeRepo {
    fn current_branch(&self) -> Result<String> {
        self.check("HEAD")?;
        Ok("feature".into())
    }

    fn base_branch(&self) -> Result<String> {
        self.check("HEAD")?;
        Ok("main".into())
    }

    fn list_files(&self, _listing: Listing) -> Result<Vec<FileEntry>> {
        self.check("index")?;
        Ok(self.files.clone())
    }

    fn diff(&self, path: &str, mode: DiffMode) -> Result<String> {
        self.check(path)?;
        if path == "empty.rs" {
            return Ok(String::new());
        }
        let side = match mode {
            DiffMode::Working => "working",
            DiffMode::Branch => "branch",
        };
        Ok(format!("diff {} {}", side, path))
    }

    fn read_file(&self, path: &str) -> Result<String> {
        self.check(path)?;
        if path == "empty.rs" {
            return Ok(String::new());
        }
        Ok(format!("raw {}", path))
    }

    fn log(&self, limit: usize) -> Result<Vec<Commit>> {
        self.check("log")?;
        Ok(self.commits.iter().take(limit).cloned().collect())
    }

    fn diff_stats(&self, _mode: DiffMode) -> Result<(usize, usize)> {
        self.check("stats")?;
        Ok((5, 2))
    }
}

pub struct FakePrs {
    pr: Option<PrInfo>,
    fail: bool,
}

impl FakePrs {
    pub fn absent() -> Self {
        FakePrs {
            pr: None,
            fail: false,
        }
    }

    pub fn failing() -> Self {
        FakePrs {
            pr: None,
            fail: true,
        }
    }
}

impl PullRequests for FakePrs {
    fn pr_for_branch(&self) -> Result<Option<PrInfo>> {
        if self.fail {
            bail!("gh: not authenticated");
        }
        Ok(self.pr.clone())
    }
}
