use std::path::Path;

use git2::{ErrorCode, Repository};

use crate::error::{Error, Result};
use crate::issue;

/// How many commits back from HEAD are searched for an issue key
const COMMIT_SCAN_LIMIT: usize = 50;

/// Where a detected issue key was found
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeySource {
    Branch(String),
    Commit(String),
}

/// Find the issue key the current work belongs to
///
/// Looks at the checked-out branch name first, then at commit messages
/// reachable from HEAD, newest first.
pub fn detect_issue_key(path: &Path) -> Result<Option<(String, KeySource)>> {
    let repo = Repository::discover(path).map_err(|err| match err.code() {
        ErrorCode::NotFound => Error::NotInGitRepo,
        _ => Error::Git(err),
    })?;

    let head = match repo.head() {
        Ok(head) => head,
        // Fresh repository without commits
        Err(err) if err.code() == ErrorCode::UnbornBranch => return Ok(None),
        Err(err) => return Err(err.into()),
    };

    if let Some(branch) = head.shorthand() {
        if let Some(key) = issue::extract_from_str(branch) {
            return Ok(Some((key, KeySource::Branch(branch.to_string()))));
        }
    }

    let messages = recent_commit_messages(&repo, COMMIT_SCAN_LIMIT)?;
    for message in messages {
        let summary = message.lines().next().unwrap_or_default();
        if let Some(key) = issue::extract_from_commit(summary) {
            return Ok(Some((key, KeySource::Commit(summary.to_string()))));
        }
    }

    Ok(None)
}

fn recent_commit_messages(repo: &Repository, limit: usize) -> Result<Vec<String>> {
    let mut revwalk = repo.revwalk()?;
    revwalk.push_head()?;

    let mut messages = Vec::new();
    for oid in revwalk.take(limit) {
        let commit = repo.find_commit(oid?)?;
        if let Some(message) = commit.message() {
            messages.push(message.to_string());
        }
    }
    Ok(messages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use git2::Signature;
    use tempfile::TempDir;

    fn commit(repo: &Repository, message: &str) {
        let sig = Signature::now("Tester", "tester@example.com").unwrap();
        let tree_id = repo.index().unwrap().write_tree().unwrap();
        let tree = repo.find_tree(tree_id).unwrap();
        let parents = match repo.head() {
            Ok(head) => vec![head.peel_to_commit().unwrap()],
            Err(_) => vec![],
        };
        let parents: Vec<&git2::Commit<'_>> = parents.iter().collect();
        repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
            .unwrap();
    }

    fn checkout_new_branch(repo: &Repository, name: &str) {
        let head = repo.head().unwrap().peel_to_commit().unwrap();
        repo.branch(name, &head, false).unwrap();
        repo.set_head(&format!("refs/heads/{}", name)).unwrap();
    }

    #[test]
    fn test_not_a_repository() {
        let dir = TempDir::new().unwrap();
        // Guard against a repository in a parent of the temp dir
        if Repository::discover(dir.path()).is_ok() {
            return;
        }
        assert!(matches!(
            detect_issue_key(dir.path()),
            Err(Error::NotInGitRepo)
        ));
    }

    #[test]
    fn test_empty_repository() {
        let dir = TempDir::new().unwrap();
        Repository::init(dir.path()).unwrap();
        assert_eq!(detect_issue_key(dir.path()).unwrap(), None);
    }

    #[test]
    fn test_key_from_branch_name() {
        let dir = TempDir::new().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        commit(&repo, "Initial commit");
        checkout_new_branch(&repo, "feature/PROJ-42-comments");

        let (key, source) = detect_issue_key(dir.path()).unwrap().unwrap();
        assert_eq!(key, "PROJ-42");
        assert_eq!(
            source,
            KeySource::Branch("feature/PROJ-42-comments".to_string())
        );
    }

    #[test]
    fn test_key_from_latest_commit_message() {
        let dir = TempDir::new().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        commit(&repo, "Initial commit");
        commit(&repo, "[OPS-3]: Rotate keys\n\nLonger body");
        commit(&repo, "OPS-4 tidy up");
        checkout_new_branch(&repo, "cleanup");

        let (key, source) = detect_issue_key(dir.path()).unwrap().unwrap();
        assert_eq!(key, "OPS-4");
        assert_eq!(source, KeySource::Commit("OPS-4 tidy up".to_string()));
    }

    #[test]
    fn test_standard_names_in_commits_are_skipped() {
        let dir = TempDir::new().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        commit(&repo, "PROJ-12: Add decoder");
        commit(&repo, "Fix UTF-8 decoding");
        commit(&repo, "Use SHA-256 digests for PROJ-99");
        checkout_new_branch(&repo, "cleanup");

        let (key, source) = detect_issue_key(dir.path()).unwrap().unwrap();
        assert_eq!(key, "PROJ-12");
        assert_eq!(source, KeySource::Commit("PROJ-12: Add decoder".to_string()));
    }

    #[test]
    fn test_no_key_anywhere() {
        let dir = TempDir::new().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        commit(&repo, "Initial commit");
        checkout_new_branch(&repo, "cleanup");

        assert_eq!(detect_issue_key(dir.path()).unwrap(), None);
    }
}
