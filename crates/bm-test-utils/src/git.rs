//! Git repository fixtures.

use std::fs;
use std::path::Path;
use std::process::Command;

/// Run `git` in `path` and return trimmed stdout.
///
/// # Panics
/// Panics if git cannot be started or exits non-zero.
pub fn git(path: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(path)
        .output()
        .unwrap_or_else(|e| panic!("failed to run `git {args:?}`: {e}"));
    if !output.status.success() {
        panic!(
            "`git {args:?}` failed in {}:\n{}{}",
            path.display(),
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
    }
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

/// Run `git` in `path` and report only whether it succeeded.
pub fn git_ok(path: &Path, args: &[&str]) -> bool {
    Command::new("git")
        .args(args)
        .current_dir(path)
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// Configure a throwaway identity so commits work on CI machines.
pub fn configure_identity(path: &Path) {
    git(path, &["config", "user.email", "test@test.com"]);
    git(path, &["config", "user.name", "Test User"]);
    git(path, &["config", "commit.gpgsign", "false"]);
}

/// Initialises a real git repository with an initial commit on `main`.
///
/// Specifically:
/// - Runs `git init`
/// - Configures `user.email`, `user.name`, and `commit.gpgsign = false`
/// - Creates `README.md` and makes an initial commit
/// - Renames the default branch to `main`
///
/// # Panics
/// Panics if any git operation fails.
pub fn real_git_repo_with_commit(path: &Path) {
    git(path, &["init"]);
    configure_identity(path);

    fs::write(path.join("README.md"), "# Test")
        .unwrap_or_else(|e| panic!("real_git_repo_with_commit: failed to write README.md: {e}"));

    git(path, &["add", "."]);
    git(path, &["commit", "-m", "Initial commit"]);
    git(path, &["branch", "-M", "main"]);
}

/// Initialises a bare repository whose HEAD points at `main`.
pub fn bare_repo(path: &Path) {
    fs::create_dir_all(path).unwrap_or_else(|e| panic!("bare_repo: {e}"));
    git(path, &["init", "--bare"]);
    git(path, &["symbolic-ref", "HEAD", "refs/heads/main"]);
}

/// State of the repository as git2 sees it (merge in progress, clean, ...).
pub fn repository_state(path: &Path) -> git2::RepositoryState {
    git2::Repository::open(path)
        .unwrap_or_else(|e| panic!("repository_state: cannot open {}: {e}", path.display()))
        .state()
}
