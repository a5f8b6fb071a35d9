//! Console rendering shared by the commands

use bm_core::ops::{BranchPresence, StatusTally};
use bm_core::{Env, Feature, FeatureStatus, RepoConfig};
use chrono::{DateTime, Local, Utc};
use colored::{ColoredString, Colorize};

pub fn status(status: FeatureStatus) -> ColoredString {
    let label = status.label();
    match status {
        FeatureStatus::Developing => label.yellow(),
        FeatureStatus::DeployedTest => label.cyan(),
        FeatureStatus::DeployedStaging => label.blue(),
        FeatureStatus::DeployedProduction => label.green(),
        FeatureStatus::Done => label.dimmed(),
    }
}

pub fn timestamp(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}

fn presence_label(presence: BranchPresence) -> Option<ColoredString> {
    match presence {
        BranchPresence::Local => None,
        BranchPresence::RemoteOnly => Some("remote only".yellow()),
        BranchPresence::Missing => Some("branch missing".red()),
    }
}

/// One tracked feature, several lines, indented by two spaces.
pub fn feature(feature: &Feature, is_current: bool, presence: Option<BranchPresence>) {
    let marker = if is_current { "*".green().bold() } else { " ".normal() };
    let mut headline = format!(
        "{} {}  [{}]",
        marker,
        feature.branch.cyan().bold(),
        status(feature.status)
    );
    if let Some(tag) = presence.and_then(presence_label) {
        headline.push_str(&format!("  ({tag})"));
    }
    println!("{headline}");

    if !feature.doc.is_empty() {
        println!("    {}: {}", "Doc".dimmed(), feature.doc);
    }
    println!("    {}: {}", "Base".dimmed(), feature.base_branch);
    println!(
        "    {}: {}   {}: {}",
        "Created".dimmed(),
        timestamp(feature.created_at),
        "Updated".dimmed(),
        timestamp(feature.updated_at)
    );
    if let Some(last) = feature.last_deploy() {
        println!(
            "    {}: {} at {}",
            "Last deploy".dimmed(),
            last.env.label(),
            timestamp(last.at)
        );
    }
}

pub fn tally(tally: &StatusTally) {
    let parts: Vec<String> = FeatureStatus::ALL
        .iter()
        .filter_map(|s| tally.get(s).map(|n| format!("{}: {}", status(*s), n)))
        .collect();
    if !parts.is_empty() {
        println!("  {}", parts.join("  "));
    }
}

pub fn config(config: &RepoConfig) {
    for env in Env::ALL {
        match (config.branches.get(env), config.deploy_urls.get(env)) {
            (Some(branch), Some(url)) => println!(
                "  {:<11} {} -> {}",
                env.label(),
                branch.cyan(),
                url.dimmed()
            ),
            (Some(branch), None) => println!(
                "  {:<11} {} {}",
                env.label(),
                branch.cyan(),
                "(no deploy URL)".yellow()
            ),
            _ => println!("  {:<11} {}", env.label(), "(not configured)".dimmed()),
        }
    }
}

pub fn step(message: impl std::fmt::Display) {
    println!("{} {}", "=>".blue().bold(), message);
}

pub fn ok(message: impl std::fmt::Display) {
    println!("{} {}", "OK".green().bold(), message);
}

pub fn warn(message: impl std::fmt::Display) {
    println!("{} {}", "!!".yellow().bold(), message);
}

pub fn cancelled(message: impl std::fmt::Display) {
    println!("{}", message.to_string().dimmed());
}
