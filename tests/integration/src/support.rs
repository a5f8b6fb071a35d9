//! Scenario fixture: a real clone with a bare origin, the git CLI adapter,
//! an in-memory registry and a scripted operator.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::path::PathBuf;

use bm_core::{
    AddMode, ConflictAction, DeployTarget, DirtyPolicy, Env, Feature, FeatureStatus,
    FeatureUpdate, Interaction, MemoryBackend, Notice, RegistryStore, RepoConfig, SelectPurpose,
    Session,
};
use bm_git::{GitCli, Vcs};
use bm_test_utils::TestRepo;
use bm_test_utils::git::git;

pub const FEATURE: &str = "feat/login";
pub const TEST_URL: &str = "https://deploy.example/test";
pub const PROD_URL: &str = "https://deploy.example/prod";

/// One scripted reply.
#[derive(Debug, Clone)]
pub enum Reply {
    Yes,
    No,
    Env(Env),
    Conflict(ConflictAction),
    Mode(AddMode),
    Dirty(DirtyPolicy),
    Text(String),
}

/// Operator double that answers from a queue.
///
/// When asked to wait for a conflict resolution it writes `resolution`
/// into the conflicted file and stages it, the way a person would.
#[derive(Default)]
pub struct Operator {
    replies: VecDeque<Reply>,
    pub asked: Vec<&'static str>,
    pub notices: Vec<Notice>,
    pub opened: Vec<String>,
    pub resolution: Option<(PathBuf, String, String)>,
}

impl Operator {
    fn next(&mut self, prompt: &'static str) -> Reply {
        self.asked.push(prompt);
        self.replies
            .pop_front()
            .unwrap_or_else(|| panic!("unexpected prompt: {prompt}"))
    }

    fn yes_no(&mut self, prompt: &'static str) -> bool {
        match self.next(prompt) {
            Reply::Yes => true,
            Reply::No => false,
            other => panic!("{prompt} expects yes/no, got {other:?}"),
        }
    }

    fn text(&mut self, prompt: &'static str) -> String {
        match self.next(prompt) {
            Reply::Text(text) => text,
            other => panic!("{prompt} expects text, got {other:?}"),
        }
    }
}

impl Interaction for Operator {
    fn confirm_untracked_deploy(&mut self, _branch: &str) -> bm_core::Result<bool> {
        Ok(self.yes_no("untracked"))
    }

    fn select_environment(&mut self, targets: &[DeployTarget]) -> bm_core::Result<DeployTarget> {
        match self.next("environment") {
            Reply::Env(env) => Ok(targets
                .iter()
                .find(|t| t.env == env)
                .cloned()
                .unwrap_or_else(|| panic!("{env} is not offered"))),
            other => panic!("environment expects an env, got {other:?}"),
        }
    }

    fn confirm_production(&mut self, _source: &str, _target: &DeployTarget) -> bm_core::Result<bool> {
        Ok(self.yes_no("production"))
    }

    fn confirm_out_of_order_promotion(&mut self, _feature: &Feature) -> bm_core::Result<bool> {
        Ok(self.yes_no("promotion"))
    }

    fn choose_conflict_action(
        &mut self,
        _source: &str,
        _target: &str,
    ) -> bm_core::Result<ConflictAction> {
        match self.next("conflict") {
            Reply::Conflict(action) => Ok(action),
            other => panic!("conflict expects an action, got {other:?}"),
        }
    }

    fn wait_for_conflict_resolution(&mut self, _target: &str) -> bm_core::Result<()> {
        self.asked.push("resolved");
        let (root, file, content) = self
            .resolution
            .clone()
            .expect("no resolution scripted");
        std::fs::write(root.join(&file), content).expect("write resolution");
        git(&root, &["add", &file]);
        Ok(())
    }

    fn open_deploy_page(&mut self, url: &str) -> bm_core::Result<()> {
        self.opened.push(url.to_string());
        Ok(())
    }

    fn confirm_deploy_finished(&mut self, _target: &DeployTarget) -> bm_core::Result<bool> {
        Ok(self.yes_no("deployed"))
    }

    fn confirm_return_to_branch(&mut self, _branch: &str) -> bm_core::Result<bool> {
        Ok(self.yes_no("return"))
    }

    fn choose_add_mode(&mut self) -> bm_core::Result<AddMode> {
        match self.next("mode") {
            Reply::Mode(mode) => Ok(mode),
            other => panic!("mode expects a mode, got {other:?}"),
        }
    }

    fn input_branch_name(&mut self) -> bm_core::Result<String> {
        Ok(self.text("branch"))
    }

    fn input_doc(&mut self) -> bm_core::Result<String> {
        Ok(self.text("doc"))
    }

    fn select_existing_branch(&mut self, _candidates: &[String]) -> bm_core::Result<String> {
        Ok(self.text("existing"))
    }

    fn confirm_overwrite(&mut self, _existing: &Feature) -> bm_core::Result<bool> {
        Ok(self.yes_no("overwrite"))
    }

    fn select_feature(
        &mut self,
        _purpose: SelectPurpose,
        _features: &[Feature],
    ) -> bm_core::Result<String> {
        Ok(self.text("feature"))
    }

    fn confirm_remove(&mut self, _feature: &Feature) -> bm_core::Result<bool> {
        Ok(self.yes_no("remove"))
    }

    fn confirm_delete_git_branch(&mut self, _branch: &str) -> bm_core::Result<bool> {
        Ok(self.yes_no("delete"))
    }

    fn select_checkout_target(
        &mut self,
        _candidates: &[Feature],
        _current: &str,
    ) -> bm_core::Result<String> {
        Ok(self.text("target"))
    }

    fn choose_dirty_policy(&mut self) -> bm_core::Result<DirtyPolicy> {
        match self.next("dirty") {
            Reply::Dirty(policy) => Ok(policy),
            other => panic!("dirty expects a policy, got {other:?}"),
        }
    }

    fn confirm_replace_config(&mut self, _existing: &RepoConfig) -> bm_core::Result<bool> {
        Ok(self.yes_no("replace"))
    }

    fn edit_config(&mut self, _existing: Option<&RepoConfig>) -> bm_core::Result<RepoConfig> {
        panic!("unexpected prompt: config")
    }

    fn edit_feature(&mut self, _feature: &Feature) -> bm_core::Result<FeatureUpdate> {
        panic!("unexpected prompt: edit")
    }

    fn confirm_prune(&mut self, _stale: &[Feature]) -> bm_core::Result<bool> {
        Ok(self.yes_no("prune"))
    }

    fn notify(&mut self, notice: Notice) {
        self.notices.push(notice);
    }
}

/// A clone of a bare origin with `main` and `test` pushed, configured for
/// both, and checked out on `main`.
pub struct Scenario {
    pub repo: TestRepo,
    pub store: RegistryStore,
    pub backend: MemoryBackend,
    pub vcs: GitCli,
    pub ui: Operator,
    pub identity: String,
}

impl Scenario {
    pub fn new() -> Self {
        let repo = TestRepo::with_origin();
        repo.create_branch("test");
        repo.git(&["push", "origin", "test"]);
        repo.checkout("main");

        let vcs = GitCli::open(repo.root());
        let identity = vcs
            .repository_identity()
            .expect("origin is configured")
            .as_str()
            .to_string();

        let backend = MemoryBackend::new();
        let mut store = RegistryStore::open(backend.clone()).expect("memory store");
        store
            .set_config(
                &identity,
                RepoConfig::new("main", PROD_URL).with_env(Env::Test, "test", TEST_URL),
            )
            .expect("set config");

        Self {
            repo,
            store,
            backend,
            vcs,
            ui: Operator::default(),
            identity,
        }
    }

    /// Cut `branch` from `main`, commit one file on it and track it.
    pub fn feature_branch(&mut self, branch: &str, file: &str) {
        self.repo.checkout("main");
        self.repo.create_branch(branch);
        self.repo.commit_file(file, &format!("{branch}\n"), "feature work");
        self.track(branch);
    }

    /// Record `branch` as a developing feature based on `main`.
    pub fn track(&mut self, branch: &str) {
        let feature = Feature::new(branch, format!("{branch} work"), "main", bm_core::model::now());
        self.store
            .upsert_feature(&self.identity, feature)
            .expect("track feature");
    }

    pub fn reply(&mut self, replies: impl IntoIterator<Item = Reply>) -> &mut Self {
        self.ui.replies.extend(replies);
        self
    }

    pub fn session(&mut self) -> Session<'_> {
        Session::new(&mut self.store, &self.vcs, &mut self.ui)
    }

    pub fn feature(&self, branch: &str) -> Option<Feature> {
        self.store.get_feature(&self.identity, branch).cloned()
    }

    pub fn status(&self, branch: &str) -> Option<FeatureStatus> {
        self.feature(branch).map(|f| f.status)
    }
}
