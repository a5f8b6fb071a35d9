//! [`Vcs`] implementation backed by the `git` executable

use std::collections::BTreeSet;
use std::path::PathBuf;

use crate::runner::{ProcessOutput, ProcessRunner, SystemRunner};
use crate::vcs::{DETACHED_HEAD, REMOTE, Vcs};
use crate::{Error, RepositoryIdentity, Result, status};

const GIT: &str = "git";

/// Git adapter that shells out through a [`ProcessRunner`].
#[derive(Debug, Clone, Default)]
pub struct GitCli<R = SystemRunner> {
    runner: R,
}

impl GitCli<SystemRunner> {
    /// Adapter operating on the repository at (or above) `dir`.
    pub fn open(dir: impl Into<PathBuf>) -> Self {
        Self::with_runner(SystemRunner::in_dir(dir))
    }
}

impl<R: ProcessRunner> GitCli<R> {
    pub fn with_runner(runner: R) -> Self {
        Self { runner }
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Run git and return the raw output regardless of exit code.
    fn git_raw(&self, args: &[&str]) -> Result<ProcessOutput> {
        self.runner.run(GIT, args)
    }

    /// Run git, mapping a non-zero exit to `VcsOperationFailed`.
    fn git(&self, operation: &str, args: &[&str]) -> Result<ProcessOutput> {
        let output = self.git_raw(args)?;
        if output.success() {
            Ok(output)
        } else {
            tracing::debug!(operation, stderr = %output.stderr.trim(), "git command failed");
            Err(Error::failed(operation, failure_text(&output)))
        }
    }

    /// Like [`Self::git`] but reports `NotARepository` when that is the cause.
    fn git_in_repo(&self, operation: &str, args: &[&str]) -> Result<ProcessOutput> {
        self.git(operation, args).map_err(|err| match err {
            Error::VcsOperationFailed { .. } if !self.is_repository() => Error::NotARepository,
            other => other,
        })
    }

    fn porcelain_status(&self) -> Result<String> {
        Ok(self.git_in_repo("status", &["status", "--porcelain"])?.stdout)
    }

    fn refs_under(&self, operation: &str, prefix: &str) -> Result<BTreeSet<String>> {
        let output = self.git_in_repo(
            operation,
            &["for-each-ref", "--format=%(refname)", prefix],
        )?;

        Ok(output
            .stdout
            .lines()
            .filter_map(|line| line.trim().strip_prefix(prefix))
            .filter(|name| !name.is_empty() && *name != "HEAD")
            .map(str::to_string)
            .collect())
    }
}

/// Git reports some failures on stdout (merge conflicts, nothing to commit).
fn failure_text(output: &ProcessOutput) -> &str {
    if output.stderr.trim().is_empty() {
        &output.stdout
    } else {
        &output.stderr
    }
}

impl<R: ProcessRunner> Vcs for GitCli<R> {
    fn is_repository(&self) -> bool {
        match self.git_raw(&["rev-parse", "--git-dir"]) {
            Ok(output) => output.success(),
            Err(err) => {
                tracing::warn!(error = %err, "could not run git");
                false
            }
        }
    }

    fn current_branch(&self) -> Result<String> {
        let output = self.git_raw(&["symbolic-ref", "--short", "-q", "HEAD"])?;
        if output.success() {
            return Ok(output.stdout.trim().to_string());
        }
        if !self.is_repository() {
            return Err(Error::NotARepository);
        }
        // `symbolic-ref -q` exits 1 without output when HEAD is detached.
        if output.exit_code == 1 {
            return Ok(DETACHED_HEAD.to_string());
        }
        Err(Error::failed("symbolic-ref", failure_text(&output)))
    }

    fn repository_identity(&self) -> Result<RepositoryIdentity> {
        let output = self.git_raw(&["remote", "get-url", REMOTE])?;
        if output.success() {
            return Ok(RepositoryIdentity::from_remote_url(&output.stdout));
        }
        if !self.is_repository() {
            Err(Error::NotARepository)
        } else {
            Err(Error::NoRemoteConfigured)
        }
    }

    fn has_uncommitted_changes(&self) -> Result<bool> {
        Ok(status::is_dirty(&self.porcelain_status()?))
    }

    fn local_branches(&self) -> Result<BTreeSet<String>> {
        self.refs_under("for-each-ref", "refs/heads/")
    }

    fn remote_branches(&self) -> Result<BTreeSet<String>> {
        self.refs_under("for-each-ref", &format!("refs/remotes/{REMOTE}/"))
    }

    fn check_branch_name(&self, name: &str) -> Result<()> {
        let invalid = || Error::InvalidBranchName {
            name: name.to_string(),
        };
        if name.trim().is_empty() || name.starts_with('-') || name == DETACHED_HEAD {
            return Err(invalid());
        }
        let output = self.git_raw(&["check-ref-format", "--branch", name])?;
        if output.success() {
            Ok(())
        } else {
            Err(invalid())
        }
    }

    fn checkout(&self, branch: &str) -> Result<()> {
        self.git_in_repo(&format!("checkout {branch}"), &["checkout", branch, "--"])?;
        Ok(())
    }

    fn create_and_checkout(&self, new_branch: &str, from: &str) -> Result<()> {
        self.git_in_repo(
            &format!("checkout -b {new_branch} {from}"),
            &["checkout", "-b", new_branch, from, "--"],
        )?;
        Ok(())
    }

    fn fetch(&self) -> Result<()> {
        self.git_in_repo("fetch", &["fetch", REMOTE])?;
        Ok(())
    }

    fn pull(&self, branch: &str) -> Result<()> {
        self.git_in_repo(
            &format!("pull {REMOTE} {branch}"),
            &["pull", "--no-rebase", "--no-edit", REMOTE, branch],
        )?;
        Ok(())
    }

    fn merge(&self, branch: &str) -> Result<()> {
        self.git_in_repo(&format!("merge {branch}"), &["merge", "--no-edit", branch])?;
        Ok(())
    }

    fn push(&self, branch: Option<&str>) -> Result<()> {
        match branch {
            Some(branch) => {
                self.git_in_repo(&format!("push {REMOTE} {branch}"), &["push", REMOTE, branch])?
            }
            None => self.git_in_repo("push", &["push"])?,
        };
        Ok(())
    }

    fn abort_merge(&self) -> Result<()> {
        self.git_in_repo("merge --abort", &["merge", "--abort"])?;
        Ok(())
    }

    fn continue_merge(&self) -> Result<()> {
        self.git_in_repo("commit --no-edit", &["commit", "--no-edit"])?;
        Ok(())
    }

    fn has_merge_conflicts(&self) -> Result<bool> {
        Ok(status::has_conflicts(&self.porcelain_status()?))
    }

    fn is_merge_in_progress(&self) -> Result<bool> {
        let output = self.git_raw(&["rev-parse", "-q", "--verify", "MERGE_HEAD"])?;
        if output.success() {
            Ok(true)
        } else if self.is_repository() {
            Ok(false)
        } else {
            Err(Error::NotARepository)
        }
    }

    fn delete_branch(&self, name: &str) -> Result<()> {
        self.git_in_repo(&format!("branch -D {name}"), &["branch", "-D", "--", name])?;
        Ok(())
    }

    fn commit_all(&self, message: &str) -> Result<()> {
        self.git_in_repo("add -A", &["add", "-A"])?;
        self.git_in_repo("commit", &["commit", "-m", message])?;
        Ok(())
    }
}
