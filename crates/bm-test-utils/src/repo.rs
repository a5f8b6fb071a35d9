//! [`TestRepo`] builder: a working clone wired to a bare `origin`.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::git::{bare_repo, git, git_ok, real_git_repo_with_commit, repository_state};

/// A temporary working repository with a bare `origin` remote next to it.
///
/// # Example
///
/// ```rust,no_run
/// use bm_test_utils::repo::TestRepo;
///
/// let repo = TestRepo::with_origin();
/// repo.create_branch("feat/x");
/// repo.commit_file("feature.txt", "hello", "add feature");
/// repo.assert_clean();
/// ```
pub struct TestRepo {
    temp_dir: TempDir,
    has_origin: bool,
}

impl TestRepo {
    /// A repository with one commit on `main` and no remote.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("TestRepo::new: failed to create temp dir");
        let repo = Self {
            temp_dir,
            has_origin: false,
        };
        fs::create_dir_all(repo.root()).expect("TestRepo::new: failed to create work dir");
        real_git_repo_with_commit(repo.root());
        repo
    }

    /// A repository whose `main` is pushed to a bare `origin`.
    pub fn with_origin() -> Self {
        let mut repo = Self::new();
        bare_repo(&repo.origin());
        let origin = repo.origin();
        let origin_str = origin.to_string_lossy();
        git(repo.root(), &["remote", "add", "origin", &origin_str]);
        git(repo.root(), &["push", "-u", "origin", "main"]);
        repo.has_origin = true;
        repo
    }

    /// Root of the working repository.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Path of the bare remote (outside the working tree).
    pub fn origin(&self) -> PathBuf {
        self.temp_dir
            .path()
            .parent()
            .expect("temp dir has a parent")
            .join(format!(
                "{}-origin.git",
                self.temp_dir
                    .path()
                    .file_name()
                    .expect("temp dir has a name")
                    .to_string_lossy()
            ))
    }

    pub fn git(&self, args: &[&str]) -> String {
        git(self.root(), args)
    }

    pub fn current_branch(&self) -> String {
        self.git(&["rev-parse", "--abbrev-ref", "HEAD"])
    }

    pub fn checkout(&self, branch: &str) {
        self.git(&["checkout", branch]);
    }

    /// Create `name` from the current HEAD and switch to it.
    pub fn create_branch(&self, name: &str) {
        self.git(&["checkout", "-b", name]);
    }

    /// Write `file` and commit it on the current branch.
    pub fn commit_file(&self, file: &str, content: &str, message: &str) {
        let path = self.root().join(file);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("commit_file: failed to create parent");
        }
        fs::write(&path, content).expect("commit_file: failed to write file");
        self.git(&["add", file]);
        self.git(&["commit", "-m", message]);
    }

    /// Leave an uncommitted modification in the working tree.
    pub fn make_dirty(&self) {
        fs::write(self.root().join("README.md"), "# Dirty").expect("make_dirty: write failed");
    }

    /// Create `name` on the remote only (pushed, then deleted locally).
    pub fn create_remote_branch(&self, name: &str) {
        let current = self.current_branch();
        self.git(&["checkout", "-b", name]);
        self.commit_file(&format!("{}.txt", name.replace('/', "_")), name, "remote branch");
        self.git(&["push", "origin", name]);
        self.git(&["checkout", &current]);
        self.git(&["branch", "-D", name]);
        self.git(&["branch", "-dr", &format!("origin/{name}")]);
    }

    /// Make `feature` and `target` both change `file` differently.
    ///
    /// Leaves the repository on `feature`. `target` is pushed so a pull
    /// before merging is a no-op.
    pub fn conflicting_branches(&self, feature: &str, target: &str, file: &str) {
        if !self.has_local_branch(target) {
            self.git(&["branch", target]);
        }
        let base = self.rev(target);

        self.checkout(target);
        self.commit_file(file, "target side\n", "target change");
        if self.has_origin {
            self.git(&["push", "origin", target]);
        }

        self.git(&["checkout", "-b", feature, &base]);
        self.commit_file(file, "feature side\n", "feature change");
    }

    /// Head commit id of `reference` in the working repository.
    pub fn rev(&self, reference: &str) -> String {
        self.git(&["rev-parse", reference])
    }

    /// Head commit id of `branch` in the bare remote.
    pub fn origin_rev(&self, branch: &str) -> String {
        git(&self.origin(), &["rev-parse", &format!("refs/heads/{branch}")])
    }

    pub fn has_local_branch(&self, branch: &str) -> bool {
        git_ok(self.root(), &["rev-parse", "--verify", &format!("refs/heads/{branch}")])
    }

    pub fn has_origin_branch(&self, branch: &str) -> bool {
        git_ok(&self.origin(), &["rev-parse", "--verify", &format!("refs/heads/{branch}")])
    }

    /// Assert no merge is in progress and nothing is uncommitted.
    ///
    /// # Panics
    /// Panics with the porcelain status when the tree is not clean.
    pub fn assert_clean(&self) {
        assert_eq!(
            repository_state(self.root()),
            git2::RepositoryState::Clean,
            "expected no merge/rebase in progress"
        );
        let status = self.git(&["status", "--porcelain"]);
        assert!(status.is_empty(), "expected a clean working tree, got:\n{status}");
    }
}

impl Default for TestRepo {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TestRepo {
    fn drop(&mut self) {
        if self.has_origin {
            let _ = fs::remove_dir_all(self.origin());
        }
    }
}
