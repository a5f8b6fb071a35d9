//! `bm add`

use bm_core::AddMode;
use bm_core::ops::{AddOutcome, AddRequest, add};
use colored::Colorize;

use super::with_session;
use crate::context::AppContext;
use crate::error::Result;
use crate::render;

pub fn run_add(
    ctx: &AppContext,
    branch: Option<String>,
    doc: Option<String>,
    existing: bool,
    create: bool,
) -> Result<()> {
    let mode = if existing {
        Some(AddMode::Existing)
    } else if create || branch.is_some() {
        Some(AddMode::Create)
    } else {
        None
    };
    let request = AddRequest { mode, branch, doc };

    match with_session(ctx, |session| add(session, request))? {
        AddOutcome::Created(feature) => render::ok(format!(
            "Created {} from {} and switched to it",
            feature.branch.cyan(),
            feature.base_branch.yellow()
        )),
        AddOutcome::Attached(feature) => {
            render::ok(format!("Tracking {}", feature.branch.cyan()))
        }
        AddOutcome::Cancelled => render::cancelled("Existing record kept"),
    }
    Ok(())
}
