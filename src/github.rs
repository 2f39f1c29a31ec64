use anyhow::{Context, Result};
use serde::Deserialize;
use std::process::Command;

/// Pull request attached to the current branch
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrInfo {
    pub number: u64,
    pub title: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub author: PrAuthor,
    #[serde(default)]
    pub base_ref_name: String,
    #[serde(default)]
    pub head_ref_name: String,
    #[serde(default)]
    pub comments: Vec<PrComment>,
    #[serde(default)]
    pub reviews: Vec<PrReview>,
}

impl PrInfo {
    /// Conversation comments plus submitted reviews that carry a body
    pub fn comment_count(&self) -> usize {
        self.comments.len() + self.reviews.iter().filter(|r| !r.body.is_empty()).count()
    }

    /// Latest review state per reviewer, in first-seen order
    pub fn reviewer_states(&self) -> Vec<(String, String)> {
        let mut out: Vec<(String, String)> = Vec::new();
        for review in &self.reviews {
            match out.iter_mut().find(|(login, _)| *login == review.author.login) {
                Some(entry) => entry.1 = review.state.clone(),
                None => out.push((review.author.login.clone(), review.state.clone())),
            }
        }
        out
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PrAuthor {
    #[serde(default)]
    pub login: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PrComment {
    #[serde(default)]
    pub author: PrAuthor,
    #[serde(default)]
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PrReview {
    #[serde(default)]
    pub author: PrAuthor,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub body: String,
}

/// Remote pull-request metadata source.
///
/// `Ok(None)` means the branch has no PR; callers treat errors the same way.
pub trait PullRequests: Send + Sync {
    fn pr_for_branch(&self) -> Result<Option<PrInfo>>;
}

const PR_FIELDS: &str = "number,title,state,url,body,author,baseRefName,headRefName,comments,reviews";

/// `PullRequests` backed by the GitHub CLI
pub struct GhCli {
    repo_root: String,
}

impl GhCli {
    pub fn new(repo_root: impl Into<String>) -> Self {
        GhCli {
            repo_root: repo_root.into(),
        }
    }
}

impl PullRequests for GhCli {
    fn pr_for_branch(&self) -> Result<Option<PrInfo>> {
        let output = Command::new("gh")
            .args(["pr", "view", "--json", PR_FIELDS])
            .current_dir(&self.repo_root)
            .output()
            .context("Failed to run gh pr view")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            if stderr.contains("no pull requests found") {
                return Ok(None);
            }
            anyhow::bail!("gh pr view failed: {}", stderr.trim());
        }

        parse_pr_json(&String::from_utf8_lossy(&output.stdout)).map(Some)
    }
}

/// Parse the JSON printed by `gh pr view --json ...`
pub fn parse_pr_json(json: &str) -> Result<PrInfo> {
    serde_json::from_str(json).context("Failed to parse PR JSON")
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = r#"{
        "number": 123,
        "title": "Add feature X",
        "state": "OPEN",
        "url": "https://github.com/acme/widgets/pull/123",
        "body": "This PR adds feature X",
        "author": {"login": "developer"},
        "baseRefName": "main",
        "headRefName": "feature/x",
        "comments": [
            {"author": {"login": "reviewer1"}, "body": "Looks good"}
        ],
        "reviews": [
            {"author": {"login": "reviewer1"}, "state": "COMMENTED", "body": "nit"},
            {"author": {"login": "reviewer2"}, "state": "CHANGES_REQUESTED", "body": ""},
            {"author": {"login": "reviewer1"}, "state": "APPROVED", "body": ""}
        ]
    }"#;

    #[test]
    fn pr_parsed_from_gh_json() {
        let pr = parse_pr_json(FULL).unwrap();
        assert_eq!(pr.number, 123);
        assert_eq!(pr.title, "Add feature X");
        assert_eq!(pr.state, "OPEN");
        assert_eq!(pr.author.login, "developer");
        assert_eq!(pr.base_ref_name, "main");
        assert_eq!(pr.head_ref_name, "feature/x");
        assert_eq!(pr.comments.len(), 1);
        assert_eq!(pr.reviews.len(), 3);
    }

    #[test]
    fn pr_handles_missing_optional_fields() {
        let pr = parse_pr_json(r#"{"number": 1, "title": "T"}"#).unwrap();
        assert_eq!(pr.number, 1);
        assert_eq!(pr.author.login, "");
        assert!(pr.comments.is_empty());
        assert!(pr.reviews.is_empty());
    }

    #[test]
    fn pr_rejects_invalid_json() {
        assert!(parse_pr_json("not json").is_err());
        assert!(parse_pr_json(r#"{"title": "no number"}"#).is_err());
    }

    #[test]
    fn comment_count_includes_review_bodies_only() {
        let pr = parse_pr_json(FULL).unwrap();
        assert_eq!(pr.comment_count(), 2);
    }

    #[test]
    fn reviewer_states_keep_latest_per_login() {
        let pr = parse_pr_json(FULL).unwrap();
        assert_eq!(
            pr.reviewer_states(),
            vec![
                ("reviewer1".to_string(), "APPROVED".to_string()),
                ("reviewer2".to_string(), "CHANGES_REQUESTED".to_string()),
            ]
        );
    }
}
