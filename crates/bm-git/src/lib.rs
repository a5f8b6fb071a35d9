//! Git access for the branch manager
//!
//! Every git effect goes through a [`ProcessRunner`] with a discrete argument
//! vector; [`GitCli`] translates exit codes into typed results behind the
//! [`Vcs`] trait so the release logic can run against a fake in tests.

pub mod error;
pub mod git;
pub mod identity;
pub mod runner;
pub mod status;
pub mod vcs;

pub use error::{Error, Result};
pub use git::GitCli;
pub use identity::RepositoryIdentity;
pub use runner::{ProcessOutput, ProcessRunner, SystemRunner};
pub use vcs::{DETACHED_HEAD, REMOTE, Vcs};
