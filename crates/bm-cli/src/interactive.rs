//! Terminal implementation of the interaction port
//!
//! Uses dialoguer for prompts and colored for progress lines.

use bm_core::model::validate_url;
use bm_core::{
    AddMode, ConflictAction, DeployTarget, DirtyPolicy, Env, Feature, FeatureStatus,
    FeatureUpdate, Interaction, Notice, RepoConfig, SelectPurpose,
};
use colored::Colorize;
use dialoguer::{Confirm, Input, Select};

use crate::render;

fn prompt<T>(result: dialoguer::Result<T>) -> bm_core::Result<T> {
    result.map_err(|e| bm_core::Error::Interaction(e.to_string()))
}

fn confirm(message: impl Into<String>, default: bool) -> bm_core::Result<bool> {
    prompt(
        Confirm::new()
            .with_prompt(message)
            .default(default)
            .interact(),
    )
}

fn select<S: ToString>(message: &str, items: &[S], default: usize) -> bm_core::Result<usize> {
    prompt(
        Select::new()
            .with_prompt(message)
            .items(items)
            .default(default)
            .interact(),
    )
}

fn feature_item(feature: &Feature) -> String {
    if feature.doc.is_empty() {
        format!("{}  [{}]", feature.branch, feature.status.label())
    } else {
        format!(
            "{}  [{}]  {}",
            feature.branch,
            feature.status.label(),
            feature.doc
        )
    }
}

/// Ask for an optional value; blank means "not set".
fn optional_input(message: &str, current: Option<&str>) -> bm_core::Result<Option<String>> {
    let value: String = prompt(
        Input::new()
            .with_prompt(message)
            .with_initial_text(current.unwrap_or_default())
            .allow_empty(true)
            .interact_text(),
    )?;
    let value = value.trim().to_string();
    Ok((!value.is_empty()).then_some(value))
}

fn url_input(message: &str, current: Option<&str>) -> bm_core::Result<String> {
    prompt(
        Input::<String>::new()
            .with_prompt(message)
            .with_initial_text(current.unwrap_or_default())
            .validate_with(|value: &String| validate_url(value.trim()))
            .interact_text(),
    )
    .map(|url| url.trim().to_string())
}

/// dialoguer prompts on stderr, progress on stdout.
#[derive(Debug, Default)]
pub struct TerminalInteraction;

impl TerminalInteraction {
    pub fn new() -> Self {
        Self
    }
}

impl Interaction for TerminalInteraction {
    fn confirm_untracked_deploy(&mut self, branch: &str) -> bm_core::Result<bool> {
        render::warn(format!("'{}' is not tracked by bm", branch.cyan()));
        confirm("Deploy it anyway?", false)
    }

    fn select_environment(&mut self, targets: &[DeployTarget]) -> bm_core::Result<DeployTarget> {
        let items: Vec<String> = targets
            .iter()
            .map(|t| format!("{:<11} -> {}", t.env.label(), t.branch))
            .collect();
        let idx = select("Deploy to", &items, 0)?;
        targets
            .get(idx)
            .cloned()
            .ok_or_else(|| bm_core::Error::Interaction("no environment selected".into()))
    }

    fn confirm_production(&mut self, source: &str, target: &DeployTarget) -> bm_core::Result<bool> {
        println!();
        println!(
            "{} about to merge {} into the {} branch {}",
            "PRODUCTION".red().bold(),
            source.cyan(),
            "production".red(),
            target.branch.cyan().bold()
        );
        confirm("Continue?", false)
    }

    fn confirm_out_of_order_promotion(&mut self, feature: &Feature) -> bm_core::Result<bool> {
        confirm(
            format!(
                "'{}' is {}, not deployed to staging. Deploy to production anyway?",
                feature.branch,
                feature.status.label().to_lowercase()
            ),
            false,
        )
    }

    fn choose_conflict_action(&mut self, source: &str, target: &str) -> bm_core::Result<ConflictAction> {
        println!(
            "{} merging {} into {} stopped on conflicts",
            "!!".yellow().bold(),
            source.cyan(),
            target.cyan()
        );
        let choice = select(
            "How do you want to proceed?",
            &["Resolve the conflicts by hand", "Abort the merge"],
            0,
        )?;
        Ok(if choice == 0 {
            ConflictAction::Resolve
        } else {
            ConflictAction::Abort
        })
    }

    fn wait_for_conflict_resolution(&mut self, target: &str) -> bm_core::Result<()> {
        println!(
            "  Resolve the conflicts on {}, stage them with {}, then come back here.",
            target.cyan(),
            "git add".cyan()
        );
        let _: String = prompt(
            Input::new()
                .with_prompt("Press Enter when done")
                .allow_empty(true)
                .interact_text(),
        )?;
        Ok(())
    }

    fn open_deploy_page(&mut self, url: &str) -> bm_core::Result<()> {
        open::that(url).map_err(|e| bm_core::Error::Interaction(e.to_string()))
    }

    fn confirm_deploy_finished(&mut self, target: &DeployTarget) -> bm_core::Result<bool> {
        confirm(
            format!("Has the {} deploy finished?", target.env.label()),
            true,
        )
    }

    fn confirm_return_to_branch(&mut self, branch: &str) -> bm_core::Result<bool> {
        confirm(format!("Switch back to {branch}?"), true)
    }

    fn choose_add_mode(&mut self) -> bm_core::Result<AddMode> {
        let choice = select(
            "Add a branch",
            &[
                "Create a new branch from the production branch",
                "Track an existing local branch",
            ],
            0,
        )?;
        Ok(if choice == 0 {
            AddMode::Create
        } else {
            AddMode::Existing
        })
    }

    fn input_branch_name(&mut self) -> bm_core::Result<String> {
        prompt(
            Input::<String>::new()
                .with_prompt("Branch name (e.g. feat/login)")
                .validate_with(|value: &String| {
                    let value = value.trim();
                    if value.is_empty() {
                        Err("branch name is required")
                    } else if value.contains(char::is_whitespace) {
                        Err("branch names cannot contain spaces")
                    } else {
                        Ok(())
                    }
                })
                .interact_text(),
        )
        .map(|name| name.trim().to_string())
    }

    fn input_doc(&mut self) -> bm_core::Result<String> {
        Ok(optional_input("Description or design doc link (optional)", None)?.unwrap_or_default())
    }

    fn select_existing_branch(&mut self, candidates: &[String]) -> bm_core::Result<String> {
        let idx = select("Branch to track", candidates, 0)?;
        Ok(candidates[idx].clone())
    }

    fn confirm_overwrite(&mut self, existing: &Feature) -> bm_core::Result<bool> {
        confirm(
            format!(
                "'{}' is already tracked ({}). Replace its record?",
                existing.branch,
                existing.status.label().to_lowercase()
            ),
            false,
        )
    }

    fn select_feature(&mut self, purpose: SelectPurpose, features: &[Feature]) -> bm_core::Result<String> {
        let message = match purpose {
            SelectPurpose::Remove => "Branch to remove",
            SelectPurpose::Edit => "Branch to edit",
        };
        let items: Vec<String> = features.iter().map(feature_item).collect();
        let idx = select(message, &items, 0)?;
        Ok(features[idx].branch.clone())
    }

    fn confirm_remove(&mut self, feature: &Feature) -> bm_core::Result<bool> {
        confirm(format!("Stop tracking '{}'?", feature.branch), false)
    }

    fn confirm_delete_git_branch(&mut self, branch: &str) -> bm_core::Result<bool> {
        confirm(format!("Also delete the local git branch '{branch}'?"), false)
    }

    fn select_checkout_target(&mut self, candidates: &[Feature], current: &str) -> bm_core::Result<String> {
        println!("{}: {}", "Current branch".dimmed(), current.cyan());
        let items: Vec<String> = candidates.iter().map(feature_item).collect();
        let idx = select("Switch to", &items, 0)?;
        Ok(candidates[idx].branch.clone())
    }

    fn choose_dirty_policy(&mut self) -> bm_core::Result<DirtyPolicy> {
        render::warn("the working tree has uncommitted changes");
        let choice = select(
            "What should happen to them?",
            &[
                "Commit them with a temporary message",
                "Stop, I will commit them myself",
                "Cancel",
            ],
            0,
        )?;
        Ok(match choice {
            0 => DirtyPolicy::AutoCommit,
            1 => DirtyPolicy::Manual,
            _ => DirtyPolicy::Cancel,
        })
    }

    fn confirm_replace_config(&mut self, existing: &RepoConfig) -> bm_core::Result<bool> {
        println!("{}", "Current configuration".bold());
        render::config(existing);
        confirm("Replace it?", false)
    }

    fn edit_config(&mut self, existing: Option<&RepoConfig>) -> bm_core::Result<RepoConfig> {
        let current = existing.cloned().unwrap_or_default();
        let mut config = RepoConfig::default();

        let prod_branch: String = prompt(
            Input::new()
                .with_prompt("Production branch")
                .default(
                    current
                        .branches
                        .get(Env::Prod)
                        .unwrap_or("master")
                        .to_string(),
                )
                .interact_text(),
        )?;
        let prod_url = url_input("Production deploy URL", current.deploy_urls.get(Env::Prod))?;
        config.branches.set(Env::Prod, Some(prod_branch));
        config.deploy_urls.set(Env::Prod, Some(prod_url));

        for env in [Env::Test, Env::Pre] {
            let wanted = confirm(
                format!("Configure the {} environment?", env.label()),
                current.branches.get(env).is_some(),
            )?;
            if !wanted {
                continue;
            }
            let branch = optional_input(
                &format!("{} branch", env.label()),
                current.branches.get(env),
            )?;
            if branch.is_none() {
                continue;
            }
            let url = url_input(
                &format!("{} deploy URL", env.label()),
                current.deploy_urls.get(env),
            )?;
            config.branches.set(env, branch);
            config.deploy_urls.set(env, Some(url));
        }
        Ok(config)
    }

    fn edit_feature(&mut self, feature: &Feature) -> bm_core::Result<FeatureUpdate> {
        let doc: String = prompt(
            Input::new()
                .with_prompt("Description")
                .with_initial_text(feature.doc.clone())
                .allow_empty(true)
                .interact_text(),
        )?;
        let labels: Vec<&str> = FeatureStatus::ALL.iter().map(|s| s.label()).collect();
        let current = FeatureStatus::ALL
            .iter()
            .position(|s| *s == feature.status)
            .unwrap_or_default();
        let status = FeatureStatus::ALL[select("Status", &labels, current)?];

        let doc = doc.trim().to_string();
        Ok(FeatureUpdate {
            doc: (doc != feature.doc).then_some(doc),
            base_branch: None,
            status: (status != feature.status).then_some(status),
        })
    }

    fn confirm_prune(&mut self, stale: &[Feature]) -> bm_core::Result<bool> {
        println!("{}", "Branches gone locally and on the remote:".bold());
        for feature in stale {
            println!("  {} {}", "-".red(), feature.branch.cyan());
        }
        confirm(format!("Drop {} record(s)?", stale.len()), false)
    }

    fn notify(&mut self, notice: Notice) {
        match notice {
            Notice::Syncing { branch } => {
                render::step(format!("Syncing {} with origin...", branch.cyan()))
            }
            Notice::TrackingRemoteBranch { branch } => render::step(format!(
                "Created local {} tracking origin/{}",
                branch.cyan(),
                branch
            )),
            Notice::PullSkipped { branch, reason } => {
                render::warn(format!("could not pull {}: {}", branch.cyan(), reason))
            }
            Notice::CreatingBranch { branch, base } => render::step(format!(
                "Creating {} from {}...",
                branch.cyan(),
                base.yellow()
            )),
            Notice::Merging { source, target } => render::step(format!(
                "Merging {} into {}...",
                source.cyan(),
                target.cyan()
            )),
            Notice::MergeConflict { .. } => {}
            Notice::Merged { source, target } => {
                render::ok(format!("Merged {} into {}", source.cyan(), target.cyan()))
            }
            Notice::MergeAborted { target } => {
                render::warn(format!("merge aborted, {} is unchanged", target.cyan()))
            }
            Notice::Pushing { branch } => {
                render::step(format!("Pushing {}...", branch.cyan()))
            }
            Notice::Pushed { branch } => render::ok(format!("Pushed {}", branch.cyan())),
            Notice::OpeningDeployPage { url } => {
                render::step(format!("Opening deploy page {}", url.dimmed()))
            }
            Notice::DeployPageUnavailable { url, reason } => render::warn(format!(
                "could not open a browser ({reason}); open {url} yourself"
            )),
            Notice::OutOfOrderPromotion { branch, status } => render::warn(format!(
                "{} has not been deployed to staging (status: {})",
                branch.cyan(),
                render::status(status)
            )),
            Notice::StatusRecorded { branch, status } => render::ok(format!(
                "{} is now {}",
                branch.cyan(),
                render::status(status)
            )),
            Notice::BookkeepingFailed { branch, reason } => render::warn(format!(
                "deployed, but the record of {} was not updated: {}",
                branch.cyan(),
                reason
            )),
            Notice::ReturnedToBranch { branch } => {
                render::ok(format!("Back on {}", branch.cyan()))
            }
            Notice::ReturnFailed { branch, reason } => render::warn(format!(
                "could not switch back to {}: {}",
                branch.cyan(),
                reason
            )),
            Notice::AutoSaved { message } => {
                render::ok(format!("Committed local changes: {}", message.dimmed()))
            }
            Notice::GitBranchDeleted { branch } => {
                render::ok(format!("Deleted local branch {}", branch.cyan()))
            }
            Notice::GitBranchDeleteFailed { branch, reason } => render::warn(format!(
                "could not delete local branch {}: {}",
                branch.cyan(),
                reason
            )),
        }
    }
}
