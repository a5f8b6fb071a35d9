//! CLI argument parsing using clap derive

use std::path::PathBuf;

use bm_core::{Env, FeatureStatus};
use clap::{Args, Parser, Subcommand, ValueEnum};

/// bm - track feature branches and promote them through environment branches
#[derive(Parser, Debug)]
#[command(name = "bm")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Run as if bm was started in this directory
    #[arg(short = 'C', value_name = "DIR", global = true)]
    pub directory: Option<PathBuf>,

    /// Directory holding config.json and state.json
    #[arg(long, env = "BM_HOME", value_name = "DIR", global = true)]
    pub home: Option<PathBuf>,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Configure environment branches and deploy URLs for this repository
    ///
    /// Without flags every value is asked for interactively.
    ///
    /// Examples:
    ///   bm set
    ///   bm set --prod-branch master --prod-url https://ci.example/prod
    Set(SetArgs),

    /// Start tracking a feature branch
    ///
    /// Creates the branch from the production branch, or tracks an existing
    /// local branch with --existing.
    ///
    /// Examples:
    ///   bm add feat/login -m "Login page"
    ///   bm add --existing feat/legacy
    Add {
        /// Branch name (asked for when omitted)
        branch: Option<String>,

        /// Short description or design doc link
        #[arg(short = 'm', long = "message")]
        doc: Option<String>,

        /// Track an existing local branch instead of creating one
        #[arg(long, conflicts_with = "create")]
        existing: bool,

        /// Create a new branch (skips the mode question)
        #[arg(long)]
        create: bool,
    },

    /// Merge the current branch into an environment branch and deploy it
    ///
    /// Examples:
    ///   bm deploy
    ///   bm deploy --env test --stay
    Deploy {
        /// Target environment: test, pre (staging) or prod (production)
        #[arg(short, long)]
        env: Option<Env>,

        /// Switch back to the feature branch afterwards without asking
        #[arg(long = "return", conflicts_with = "stay")]
        return_to_source: bool,

        /// Stay on the environment branch afterwards without asking
        #[arg(long)]
        stay: bool,
    },

    /// Switch to another tracked branch
    Checkout {
        /// Branch to switch to (asked for when omitted)
        branch: Option<String>,

        /// What to do with uncommitted changes
        #[arg(long, value_enum)]
        on_dirty: Option<DirtyChoice>,
    },

    /// Stop tracking a branch
    Remove {
        /// Branch to remove (asked for when omitted)
        branch: Option<String>,

        /// Also force-delete the local git branch
        #[arg(long, conflicts_with = "keep_branch")]
        delete_branch: bool,

        /// Keep the local git branch without asking
        #[arg(long)]
        keep_branch: bool,

        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },

    /// Show this repository's configuration and tracked branches
    Info {
        /// Only show branches with this status
        #[arg(short, long)]
        status: Option<FeatureStatus>,
    },

    /// List tracked branches (every repository when outside one)
    List {
        /// Only show branches with this status
        #[arg(short, long)]
        status: Option<FeatureStatus>,

        /// List every repository even inside a git work tree
        #[arg(short, long)]
        all: bool,
    },

    /// Change a tracked branch's description or status
    ///
    /// Examples:
    ///   bm edit --status done
    ///   bm edit feat/login -m "https://docs.example/login"
    Edit {
        /// Branch to edit (defaults to the current branch)
        branch: Option<String>,

        /// New description
        #[arg(short = 'm', long = "message")]
        doc: Option<String>,

        /// New status
        #[arg(short, long)]
        status: Option<FeatureStatus>,
    },

    /// Drop records whose branch no longer exists locally or on the remote
    Prune {
        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },
}

/// Flags for `bm set`. Optional environments need both a branch and a URL.
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct SetArgs {
    #[arg(long, value_name = "BRANCH")]
    pub prod_branch: Option<String>,

    #[arg(long, value_name = "URL", requires = "prod_branch")]
    pub prod_url: Option<String>,

    #[arg(long, value_name = "BRANCH", requires = "test_url")]
    pub test_branch: Option<String>,

    #[arg(long, value_name = "URL", requires = "test_branch")]
    pub test_url: Option<String>,

    #[arg(long, value_name = "BRANCH", requires = "pre_url")]
    pub pre_branch: Option<String>,

    #[arg(long, value_name = "URL", requires = "pre_branch")]
    pub pre_url: Option<String>,

    /// Replace an existing configuration without asking
    #[arg(short, long)]
    pub yes: bool,
}

/// `--on-dirty` values for `bm checkout`
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirtyChoice {
    /// Commit everything with a temporary message
    Commit,
    /// Stop so the changes can be committed by hand
    Manual,
    /// Do nothing
    Cancel,
}

impl From<DirtyChoice> for bm_core::DirtyPolicy {
    fn from(choice: DirtyChoice) -> Self {
        match choice {
            DirtyChoice::Commit => Self::AutoCommit,
            DirtyChoice::Manual => Self::Manual,
            DirtyChoice::Cancel => Self::Cancel,
        }
    }
}
