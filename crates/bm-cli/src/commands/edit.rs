//! `bm edit`

use bm_core::FeatureStatus;
use bm_core::FeatureUpdate;
use bm_core::ops::{EditOutcome, EditRequest, edit};
use colored::Colorize;

use super::with_session;
use crate::context::AppContext;
use crate::error::Result;
use crate::render;

pub fn run_edit(
    ctx: &AppContext,
    branch: Option<String>,
    doc: Option<String>,
    status: Option<FeatureStatus>,
) -> Result<()> {
    let request = EditRequest {
        branch,
        update: FeatureUpdate {
            doc,
            base_branch: None,
            status,
        },
    };

    match with_session(ctx, |session| edit(session, request))? {
        EditOutcome::Updated(feature) => {
            render::ok(format!("Updated {}", feature.branch.cyan()));
            render::feature(&feature, false, None);
        }
        EditOutcome::Unchanged(feature) => {
            render::cancelled(format!("{} unchanged", feature.branch))
        }
    }
    Ok(())
}
