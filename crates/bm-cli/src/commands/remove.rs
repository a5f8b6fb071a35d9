//! `bm remove`

use bm_core::ops::{GitBranchRemoval, RemoveOutcome, RemoveRequest, remove};
use colored::Colorize;

use super::with_session;
use crate::context::AppContext;
use crate::error::Result;
use crate::render;

pub fn run_remove(
    ctx: &AppContext,
    branch: Option<String>,
    delete_git_branch: Option<bool>,
    assume_yes: bool,
) -> Result<()> {
    let request = RemoveRequest {
        branch,
        delete_git_branch,
        assume_yes,
    };

    match with_session(ctx, |session| remove(session, request))? {
        RemoveOutcome::Removed {
            feature,
            git_branch,
        } => {
            render::ok(format!("No longer tracking {}", feature.branch.cyan()));
            if git_branch == GitBranchRemoval::Missing {
                println!("  {}", "There was no local branch to delete.".dimmed());
            }
        }
        RemoveOutcome::Cancelled => render::cancelled("Nothing removed"),
    }
    Ok(())
}
