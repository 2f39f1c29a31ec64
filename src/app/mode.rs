use crate::git::{Commit, DiffMode, Listing};

use super::layout::WindowId;
use super::message::ContentTarget;

/// Top-level view configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// HEAD vs working tree, untracked files included
    WorkingChanges,
    /// Base branch vs working tree
    #[default]
    BranchChanges,
    /// Every file in the repository, shown raw
    BrowseAll,
    /// Documentation files only, shown raw
    BrowseDocs,
}

impl Mode {
    pub const ALL: [Mode; 4] = [
        Mode::WorkingChanges,
        Mode::BranchChanges,
        Mode::BrowseAll,
        Mode::BrowseDocs,
    ];

    /// Next mode in cycle order, wrapping
    pub fn next(self) -> Mode {
        let idx = Mode::ALL.iter().position(|m| *m == self).unwrap_or(0);
        Mode::ALL[(idx + 1) % Mode::ALL.len()]
    }

    pub fn listing(self) -> Listing {
        match self {
            Mode::WorkingChanges => Listing::Changed(DiffMode::Working),
            Mode::BranchChanges => Listing::Changed(DiffMode::Branch),
            Mode::BrowseAll => Listing::All,
            Mode::BrowseDocs => Listing::Docs,
        }
    }

    /// Diff semantics for summary stats. Browse modes report branch stats.
    pub fn diff_mode(self) -> DiffMode {
        match self {
            Mode::WorkingChanges => DiffMode::Working,
            _ => DiffMode::Branch,
        }
    }

    /// Browse modes read raw file content instead of diffing
    pub fn is_browse(self) -> bool {
        matches!(self, Mode::BrowseAll | Mode::BrowseDocs)
    }

    pub fn preview_window(self) -> WindowId {
        if self.is_browse() {
            WindowId::FileView
        } else {
            WindowId::DiffView
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Mode::WorkingChanges => "working",
            Mode::BranchChanges => "branch",
            Mode::BrowseAll => "browse",
            Mode::BrowseDocs => "docs",
        }
    }
}

/// The single item driving the preview. Variants are exclusive by construction.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    None,
    File(String),
    /// Folder with the descendant file paths captured at selection time
    Folder { path: String, children: Vec<String> },
    Commit(Commit),
}

impl Selection {
    #[cfg(test)]
    pub fn is_none(&self) -> bool {
        matches!(self, Selection::None)
    }

    pub fn file(&self) -> Option<&str> {
        match self {
            Selection::File(p) => Some(p),
            _ => None,
        }
    }

    #[cfg(test)]
    pub fn folder(&self) -> Option<(&str, &[String])> {
        match self {
            Selection::Folder { path, children } => Some((path.as_str(), children.as_slice())),
            _ => None,
        }
    }

    #[cfg(test)]
    pub fn commit(&self) -> Option<&Commit> {
        match self {
            Selection::Commit(c) => Some(c),
            _ => None,
        }
    }

    /// Content to load for the preview. Commits need none.
    pub fn content_target(&self) -> Option<ContentTarget> {
        match self {
            Selection::File(p) => Some(ContentTarget::File(p.clone())),
            Selection::Folder { children, .. } => Some(ContentTarget::Folder(children.clone())),
            _ => None,
        }
    }
}
