//! Data model: environments, feature lifecycle and repository configuration

mod config;
mod env;
mod feature;

pub use config::{DeployTarget, EnvTable, RepoConfig, validate_url};
pub use env::{Env, FeatureStatus};
pub use feature::{DeployRecord, Feature, FeatureUpdate, now};
