//! `bm set`

use bm_core::ops::{ConfigureOutcome, ConfigureRequest, configure};
use bm_core::{Env, RepoConfig};
use colored::Colorize;

use super::with_session;
use crate::cli::SetArgs;
use crate::context::AppContext;
use crate::error::Result;
use crate::render;

/// A configuration built from flags, or `None` when no flag was given.
fn config_from_args(args: &SetArgs) -> Option<RepoConfig> {
    let values = [
        (Env::Prod, &args.prod_branch, &args.prod_url),
        (Env::Test, &args.test_branch, &args.test_url),
        (Env::Pre, &args.pre_branch, &args.pre_url),
    ];
    if values
        .iter()
        .all(|(_, branch, url)| branch.is_none() && url.is_none())
    {
        return None;
    }
    let mut config = RepoConfig::default();
    for (env, branch, url) in values {
        config.branches.set(env, branch.clone());
        config.deploy_urls.set(env, url.clone());
    }
    Some(config)
}

pub fn run_set(ctx: &AppContext, args: &SetArgs) -> Result<()> {
    let request = ConfigureRequest {
        config: config_from_args(args),
        assume_yes: args.yes,
    };
    match with_session(ctx, |session| configure(session, request))? {
        ConfigureOutcome::Saved(config) => {
            render::ok("Configuration saved");
            render::config(&config);
        }
        ConfigureOutcome::Cancelled => {
            render::cancelled("Configuration unchanged");
            println!("  Pass {} to replace it without asking.", "--yes".cyan());
        }
    }
    Ok(())
}
