//! `bm prune`

use bm_core::ops::{PruneOutcome, prune};
use colored::Colorize;

use super::with_session;
use crate::context::AppContext;
use crate::error::Result;
use crate::render;

pub fn run_prune(ctx: &AppContext, assume_yes: bool) -> Result<()> {
    match with_session(ctx, |session| prune(session, assume_yes))? {
        PruneOutcome::Pruned(branches) => {
            render::ok(format!("Dropped {} stale record(s)", branches.len()));
            for branch in branches {
                println!("  {} {}", "-".red(), branch);
            }
        }
        PruneOutcome::NothingToPrune => println!("Every tracked branch still exists."),
        PruneOutcome::Cancelled => render::cancelled("Nothing pruned"),
    }
    Ok(())
}
