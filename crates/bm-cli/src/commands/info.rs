//! `bm info` and `bm list`

use bm_core::FeatureStatus;
use bm_core::ops::{RepositoryReport, info, list_all};
use bm_git::Vcs;
use colored::Colorize;

use super::with_session;
use crate::context::AppContext;
use crate::error::Result;
use crate::render;

fn print_features(report: &RepositoryReport, filter: Option<FeatureStatus>) {
    if report.features.is_empty() {
        match filter {
            Some(status) => println!("  {} with status {}", "None".dimmed(), render::status(status)),
            None => println!("  {} (use {} to add)", "None".dimmed(), "bm add".cyan()),
        }
        return;
    }
    for view in &report.features {
        render::feature(&view.feature, view.is_current, Some(view.presence));
    }
}

pub fn run_info(ctx: &AppContext, filter: Option<FeatureStatus>) -> Result<()> {
    let report = with_session(ctx, |session| info(session, filter))?;

    println!("{}", "Repository".bold());
    println!("  {}: {}", "Identity".dimmed(), report.repository.cyan());
    println!("  {}: {}", "Branch".dimmed(), report.current_branch.cyan());
    println!();

    println!("{}", "Environments".bold());
    match &report.config {
        Some(config) => render::config(config),
        None => println!("  {} (run {})", "Not configured".yellow(), "bm set".cyan()),
    }
    println!();

    let total: usize = report.tally.values().sum();
    println!("{} ({})", "Tracked branches".bold(), total);
    render::tally(&report.tally);
    print_features(&report, filter);

    if !report.untracked.is_empty() {
        println!();
        println!("{}", "Untracked local branches".bold());
        for branch in &report.untracked {
            println!("  {} {}", "?".yellow(), branch);
        }
    }
    Ok(())
}

pub fn run_list(ctx: &AppContext, filter: Option<FeatureStatus>, all: bool) -> Result<()> {
    if !all && ctx.vcs().is_repository() {
        let report = with_session(ctx, |session| info(session, filter))?;
        println!("{}", report.repository.bold());
        render::tally(&report.tally);
        print_features(&report, filter);
        return Ok(());
    }

    let store = ctx.open_store()?;
    let repositories = list_all(&store, filter);
    if repositories.is_empty() {
        println!("{}", "No tracked branches.".dimmed());
        return Ok(());
    }
    for (i, (repository, features, tally)) in repositories.iter().enumerate() {
        if i > 0 {
            println!();
        }
        println!("{}", repository.bold());
        render::tally(tally);
        for feature in features {
            render::feature(feature, false, None);
        }
    }
    Ok(())
}
