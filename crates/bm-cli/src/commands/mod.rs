//! Command implementations for bm-cli

pub mod add;
pub mod checkout;
pub mod deploy;
pub mod edit;
pub mod info;
pub mod prune;
pub mod remove;
pub mod set;

pub use add::run_add;
pub use checkout::run_checkout;
pub use deploy::run_deploy;
pub use edit::run_edit;
pub use info::{run_info, run_list};
pub use prune::run_prune;
pub use remove::run_remove;
pub use set::run_set;

use bm_core::Session;

use crate::context::AppContext;
use crate::error::Result;
use crate::interactive::TerminalInteraction;

/// Run `f` against the store, the repository in the working directory and
/// the terminal.
fn with_session<T>(
    ctx: &AppContext,
    f: impl FnOnce(&mut Session<'_>) -> bm_core::Result<T>,
) -> Result<T> {
    let mut store = ctx.open_store()?;
    let vcs = ctx.vcs();
    let mut ui = TerminalInteraction::new();
    let mut session = Session::new(&mut store, &vcs, &mut ui);
    Ok(f(&mut session)?)
}
