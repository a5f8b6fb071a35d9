//! Core of the branch manager
//!
//! Tracks feature branches per repository, keeps each repository's
//! environment configuration, and drives the release of a feature branch
//! into an environment branch. Git access goes through [`bm_git::Vcs`] and
//! every operator decision through [`Interaction`], so all flows here can run
//! against fakes.

pub mod error;
pub mod interaction;
pub mod model;
pub mod ops;
pub mod release;
pub mod session;
pub mod store;

pub use error::{Error, Result};
pub use interaction::{AddMode, ConflictAction, DirtyPolicy, Interaction, Notice, SelectPurpose};
pub use model::{DeployRecord, DeployTarget, Env, EnvTable, Feature, FeatureStatus, FeatureUpdate, RepoConfig};
pub use release::{
    Bookkeeping, Cancellation, DeployOutcome, DeployReport, DeployRequest, ReleaseState,
    ReturnOutcome, deploy,
};
pub use session::Session;
pub use store::{MemoryBackend, RegistryStore};
