//! bm - feature branch manager
//!
//! Tracks feature branches per repository and promotes them through
//! environment branches (test, staging, production).

mod cli;
mod commands;
mod context;
mod error;
mod interactive;
mod logging;
mod render;

use clap::Parser;
use colored::Colorize;

use cli::{Cli, Commands};
use context::AppContext;
use error::Result;

fn main() {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.verbose) {
        eprintln!("{}: could not set up logging: {}", "warning".yellow(), e);
    }

    if let Err(e) = run(cli) {
        eprintln!("{}: {}", "error".red().bold(), e);
        if let Some(hint) = e.hint() {
            eprintln!("  {}: {}", "hint".yellow(), hint);
        }
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let Some(command) = cli.command else {
        println!("{} feature branch manager", "bm".green().bold());
        println!();
        println!("Run {} for available commands.", "bm --help".cyan());
        return Ok(());
    };

    let ctx = AppContext::resolve(cli.directory, cli.home)?;
    tracing::debug!(?command, "running");
    execute_command(&ctx, command)
}

fn execute_command(ctx: &AppContext, cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Set(args) => commands::run_set(ctx, &args),
        Commands::Add {
            branch,
            doc,
            existing,
            create,
        } => commands::run_add(ctx, branch, doc, existing, create),
        Commands::Deploy {
            env,
            return_to_source,
            stay,
        } => {
            let return_to_source = match (return_to_source, stay) {
                (true, _) => Some(true),
                (_, true) => Some(false),
                _ => None,
            };
            commands::run_deploy(ctx, env, return_to_source)
        }
        Commands::Checkout { branch, on_dirty } => {
            commands::run_checkout(ctx, branch, on_dirty.map(Into::into))
        }
        Commands::Remove {
            branch,
            delete_branch,
            keep_branch,
            yes,
        } => {
            let delete = match (delete_branch, keep_branch) {
                (true, _) => Some(true),
                (_, true) => Some(false),
                _ => None,
            };
            commands::run_remove(ctx, branch, delete, yes)
        }
        Commands::Info { status } => commands::run_info(ctx, status),
        Commands::List { status, all } => commands::run_list(ctx, status, all),
        Commands::Edit {
            branch,
            doc,
            status,
        } => commands::run_edit(ctx, branch, doc, status),
        Commands::Prune { yes } => commands::run_prune(ctx, yes),
    }
}
