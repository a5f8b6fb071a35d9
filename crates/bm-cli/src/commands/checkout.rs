//! `bm checkout`

use bm_core::DirtyPolicy;
use bm_core::ops::{CheckoutOutcome, CheckoutRequest, checkout};
use colored::Colorize;

use super::with_session;
use crate::context::AppContext;
use crate::error::Result;
use crate::render;

pub fn run_checkout(
    ctx: &AppContext,
    branch: Option<String>,
    dirty_policy: Option<DirtyPolicy>,
) -> Result<()> {
    let request = CheckoutRequest {
        branch,
        dirty_policy,
    };

    match with_session(ctx, |session| checkout(session, request))? {
        CheckoutOutcome::Switched { branch, .. } => {
            render::ok(format!("Switched to {}", branch.cyan()))
        }
        CheckoutOutcome::NoTargets => println!(
            "No other tracked branches. Use {} to track one.",
            "bm add".cyan()
        ),
        CheckoutOutcome::CommitRequired => render::warn(format!(
            "commit your changes, then run {} again",
            "bm checkout".cyan()
        )),
        CheckoutOutcome::Cancelled => render::cancelled("Checkout cancelled"),
    }
    Ok(())
}
