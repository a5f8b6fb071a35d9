//! `bm deploy`

use bm_core::{Bookkeeping, Cancellation, DeployOutcome, DeployRequest, Env, deploy};
use colored::Colorize;

use super::with_session;
use crate::context::AppContext;
use crate::error::Result;
use crate::render;

pub fn run_deploy(ctx: &AppContext, env: Option<Env>, return_to_source: Option<bool>) -> Result<()> {
    let request = DeployRequest {
        env,
        return_to_source,
    };

    match with_session(ctx, |session| deploy(session, &request))? {
        DeployOutcome::Cancelled(reason) => render::cancelled(match reason {
            Cancellation::UntrackedBranch => "Deploy cancelled: branch is not tracked",
            Cancellation::ProductionNotConfirmed => "Production deploy cancelled",
            Cancellation::PromotionDeclined => "Production deploy cancelled: not on staging yet",
        }),
        DeployOutcome::MergeAborted { source, target } => render::warn(format!(
            "{} was not deployed; {} is unchanged",
            source.cyan(),
            target.branch.cyan()
        )),
        DeployOutcome::Unconfirmed { source, target } => {
            render::warn(format!(
                "deploy to {} not confirmed; the status of {} is unchanged",
                target.env.label(),
                source.cyan()
            ));
            println!("  You are on {}.", target.branch.cyan());
        }
        DeployOutcome::Completed(report) => {
            render::ok(format!(
                "Deployed {} to {} ({})",
                report.source.cyan(),
                report.target.env.label().bold(),
                report.target.branch
            ));
            if report.bookkeeping == Bookkeeping::Untracked {
                println!("  {}", "Branch is not tracked; no status recorded.".dimmed());
            }
        }
    }
    Ok(())
}
