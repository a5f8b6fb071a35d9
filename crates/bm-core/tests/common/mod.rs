#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::{BTreeSet, HashMap, VecDeque};

use chrono::{DateTime, Utc};
use bm_core::{
    AddMode, ConflictAction, DeployTarget, DirtyPolicy, Env, Feature, FeatureStatus,
    FeatureUpdate, Interaction, MemoryBackend, Notice, RegistryStore, RepoConfig, SelectPurpose,
    Session,
};
use bm_git::{RepositoryIdentity, Vcs};

pub const REPO: &str = "github.com/acme/shop";
pub const FEATURE: &str = "feat/login";

/// When harness features were created: far enough back that any later stamp
/// is strictly newer.
pub fn tracked_at() -> DateTime<Utc> {
    DateTime::from_timestamp_millis(1_700_000_000_000).expect("valid timestamp")
}

pub fn config() -> RepoConfig {
    RepoConfig::new("master", "https://deploy.example/prod")
        .with_env(Env::Test, "test", "https://deploy.example/test")
        .with_env(Env::Pre, "release", "https://deploy.example/pre")
}

#[derive(Debug, Clone)]
pub struct FakeRepo {
    pub is_repository: bool,
    pub current: String,
    pub identity: Option<String>,
    pub dirty: bool,
    pub local: BTreeSet<String>,
    pub remote: BTreeSet<String>,
    pub conflicts: bool,
    pub merging: bool,
}

/// In-memory git double. Records every command and can be told to fail any
/// operation by name.
#[derive(Debug)]
pub struct FakeVcs {
    pub repo: RefCell<FakeRepo>,
    calls: RefCell<Vec<String>>,
    failures: RefCell<HashMap<&'static str, String>>,
    conflict_on_merge: RefCell<bool>,
}

impl FakeVcs {
    pub fn new(current: &str, branches: &[&str]) -> Self {
        let set: BTreeSet<String> = branches.iter().map(|b| b.to_string()).collect();
        Self {
            repo: RefCell::new(FakeRepo {
                is_repository: true,
                current: current.to_string(),
                identity: Some(REPO.to_string()),
                dirty: false,
                local: set.clone(),
                remote: set,
                conflicts: false,
                merging: false,
            }),
            calls: RefCell::new(Vec::new()),
            failures: RefCell::new(HashMap::new()),
            conflict_on_merge: RefCell::new(false),
        }
    }

    pub fn fail(&self, operation: &'static str, stderr: &str) {
        self.failures
            .borrow_mut()
            .insert(operation, stderr.to_string());
    }

    pub fn conflict_on_merge(&self) {
        *self.conflict_on_merge.borrow_mut() = true;
    }

    pub fn set_dirty(&self, dirty: bool) {
        self.repo.borrow_mut().dirty = dirty;
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub fn current(&self) -> String {
        self.repo.borrow().current.clone()
    }

    fn record(&self, call: String) {
        self.calls.borrow_mut().push(call);
    }

    fn check(&self, operation: &'static str) -> bm_git::Result<()> {
        match self.failures.borrow().get(operation) {
            Some(stderr) => Err(bm_git::Error::VcsOperationFailed {
                operation: operation.to_string(),
                stderr: stderr.clone(),
            }),
            None => Ok(()),
        }
    }
}

impl Vcs for FakeVcs {
    fn is_repository(&self) -> bool {
        self.repo.borrow().is_repository
    }

    fn current_branch(&self) -> bm_git::Result<String> {
        Ok(self.repo.borrow().current.clone())
    }

    fn repository_identity(&self) -> bm_git::Result<RepositoryIdentity> {
        self.repo
            .borrow()
            .identity
            .clone()
            .map(RepositoryIdentity::new)
            .ok_or(bm_git::Error::NoRemoteConfigured)
    }

    fn has_uncommitted_changes(&self) -> bm_git::Result<bool> {
        Ok(self.repo.borrow().dirty)
    }

    fn local_branches(&self) -> bm_git::Result<BTreeSet<String>> {
        Ok(self.repo.borrow().local.clone())
    }

    fn remote_branches(&self) -> bm_git::Result<BTreeSet<String>> {
        Ok(self.repo.borrow().remote.clone())
    }

    fn check_branch_name(&self, name: &str) -> bm_git::Result<()> {
        if name.is_empty() || name.contains(' ') || name.contains("..") {
            return Err(bm_git::Error::InvalidBranchName {
                name: name.to_string(),
            });
        }
        Ok(())
    }

    fn checkout(&self, branch: &str) -> bm_git::Result<()> {
        self.record(format!("checkout {branch}"));
        self.check("checkout")?;
        let mut repo = self.repo.borrow_mut();
        if !repo.local.contains(branch) {
            return Err(bm_git::Error::VcsOperationFailed {
                operation: "checkout".into(),
                stderr: format!("pathspec '{branch}' did not match"),
            });
        }
        repo.current = branch.to_string();
        Ok(())
    }

    fn create_and_checkout(&self, new_branch: &str, from: &str) -> bm_git::Result<()> {
        self.record(format!("create {new_branch} from {from}"));
        self.check("create")?;
        let mut repo = self.repo.borrow_mut();
        repo.local.insert(new_branch.to_string());
        repo.current = new_branch.to_string();
        Ok(())
    }

    fn fetch(&self) -> bm_git::Result<()> {
        self.record("fetch".into());
        self.check("fetch")
    }

    fn pull(&self, branch: &str) -> bm_git::Result<()> {
        self.record(format!("pull {branch}"));
        self.check("pull")
    }

    fn merge(&self, branch: &str) -> bm_git::Result<()> {
        self.record(format!("merge {branch}"));
        if *self.conflict_on_merge.borrow() {
            let mut repo = self.repo.borrow_mut();
            repo.conflicts = true;
            repo.merging = true;
            return Err(bm_git::Error::VcsOperationFailed {
                operation: "merge".into(),
                stderr: "CONFLICT (content): Merge conflict in app.txt".into(),
            });
        }
        self.check("merge")
    }

    fn push(&self, branch: Option<&str>) -> bm_git::Result<()> {
        self.record(format!("push {}", branch.unwrap_or("HEAD")));
        self.check("push")
    }

    fn abort_merge(&self) -> bm_git::Result<()> {
        self.record("abort".into());
        self.check("abort")?;
        let mut repo = self.repo.borrow_mut();
        repo.conflicts = false;
        repo.merging = false;
        Ok(())
    }

    fn continue_merge(&self) -> bm_git::Result<()> {
        self.record("continue".into());
        self.check("continue")?;
        let mut repo = self.repo.borrow_mut();
        repo.conflicts = false;
        repo.merging = false;
        Ok(())
    }

    fn has_merge_conflicts(&self) -> bm_git::Result<bool> {
        Ok(self.repo.borrow().conflicts)
    }

    fn is_merge_in_progress(&self) -> bm_git::Result<bool> {
        Ok(self.repo.borrow().merging)
    }

    fn delete_branch(&self, name: &str) -> bm_git::Result<()> {
        self.record(format!("delete {name}"));
        self.check("delete")?;
        self.repo.borrow_mut().local.remove(name);
        Ok(())
    }

    fn commit_all(&self, message: &str) -> bm_git::Result<()> {
        self.record(format!("commit {message}"));
        self.check("commit")?;
        self.repo.borrow_mut().dirty = false;
        Ok(())
    }
}

/// One scripted reply to a prompt.
#[derive(Debug, Clone)]
pub enum Answer {
    Yes,
    No,
    Env(Env),
    Conflict(ConflictAction),
    Mode(AddMode),
    Dirty(DirtyPolicy),
    Text(String),
    Config(RepoConfig),
    Update(FeatureUpdate),
    /// The prompt is interrupted.
    Interrupt,
}

/// Answers prompts from a queue and records what was asked.
#[derive(Debug, Default)]
pub struct ScriptedUi {
    answers: VecDeque<Answer>,
    pub asked: Vec<&'static str>,
    pub notices: Vec<Notice>,
    pub opened: Vec<String>,
    pub open_fails: bool,
}

impl ScriptedUi {
    pub fn answer(&mut self, answers: impl IntoIterator<Item = Answer>) {
        self.answers.extend(answers);
    }

    pub fn remaining(&self) -> usize {
        self.answers.len()
    }

    fn next(&mut self, prompt: &'static str) -> bm_core::Result<Answer> {
        self.asked.push(prompt);
        match self.answers.pop_front() {
            Some(Answer::Interrupt) => Err(bm_core::Error::Interaction("interrupted".into())),
            Some(answer) => Ok(answer),
            None => panic!("unexpected prompt: {prompt}"),
        }
    }

    fn yes_no(&mut self, prompt: &'static str) -> bm_core::Result<bool> {
        match self.next(prompt)? {
            Answer::Yes => Ok(true),
            Answer::No => Ok(false),
            other => panic!("{prompt} expects yes/no, got {other:?}"),
        }
    }

    fn text(&mut self, prompt: &'static str) -> bm_core::Result<String> {
        match self.next(prompt)? {
            Answer::Text(text) => Ok(text),
            other => panic!("{prompt} expects text, got {other:?}"),
        }
    }
}

impl Interaction for ScriptedUi {
    fn confirm_untracked_deploy(&mut self, _branch: &str) -> bm_core::Result<bool> {
        self.yes_no("untracked")
    }

    fn select_environment(&mut self, targets: &[DeployTarget]) -> bm_core::Result<DeployTarget> {
        match self.next("environment")? {
            Answer::Env(env) => Ok(targets
                .iter()
                .find(|t| t.env == env)
                .cloned()
                .unwrap_or_else(|| panic!("{env} is not offered"))),
            other => panic!("environment expects an env, got {other:?}"),
        }
    }

    fn confirm_production(&mut self, _source: &str, _target: &DeployTarget) -> bm_core::Result<bool> {
        self.yes_no("production")
    }

    fn confirm_out_of_order_promotion(&mut self, _feature: &Feature) -> bm_core::Result<bool> {
        self.yes_no("promotion")
    }

    fn choose_conflict_action(
        &mut self,
        _source: &str,
        _target: &str,
    ) -> bm_core::Result<ConflictAction> {
        match self.next("conflict")? {
            Answer::Conflict(action) => Ok(action),
            other => panic!("conflict expects an action, got {other:?}"),
        }
    }

    fn wait_for_conflict_resolution(&mut self, _target: &str) -> bm_core::Result<()> {
        match self.next("resolved")? {
            Answer::Yes => Ok(()),
            other => panic!("resolved expects yes, got {other:?}"),
        }
    }

    fn open_deploy_page(&mut self, url: &str) -> bm_core::Result<()> {
        self.opened.push(url.to_string());
        if self.open_fails {
            return Err(bm_core::Error::Interaction("no browser".into()));
        }
        Ok(())
    }

    fn confirm_deploy_finished(&mut self, _target: &DeployTarget) -> bm_core::Result<bool> {
        self.yes_no("deployed")
    }

    fn confirm_return_to_branch(&mut self, _branch: &str) -> bm_core::Result<bool> {
        self.yes_no("return")
    }

    fn choose_add_mode(&mut self) -> bm_core::Result<AddMode> {
        match self.next("mode")? {
            Answer::Mode(mode) => Ok(mode),
            other => panic!("mode expects a mode, got {other:?}"),
        }
    }

    fn input_branch_name(&mut self) -> bm_core::Result<String> {
        self.text("branch")
    }

    fn input_doc(&mut self) -> bm_core::Result<String> {
        self.text("doc")
    }

    fn select_existing_branch(&mut self, _candidates: &[String]) -> bm_core::Result<String> {
        self.text("existing")
    }

    fn confirm_overwrite(&mut self, _existing: &Feature) -> bm_core::Result<bool> {
        self.yes_no("overwrite")
    }

    fn select_feature(
        &mut self,
        _purpose: SelectPurpose,
        _features: &[Feature],
    ) -> bm_core::Result<String> {
        self.text("feature")
    }

    fn confirm_remove(&mut self, _feature: &Feature) -> bm_core::Result<bool> {
        self.yes_no("remove")
    }

    fn confirm_delete_git_branch(&mut self, _branch: &str) -> bm_core::Result<bool> {
        self.yes_no("delete")
    }

    fn select_checkout_target(
        &mut self,
        _candidates: &[Feature],
        _current: &str,
    ) -> bm_core::Result<String> {
        self.text("target")
    }

    fn choose_dirty_policy(&mut self) -> bm_core::Result<DirtyPolicy> {
        match self.next("dirty")? {
            Answer::Dirty(policy) => Ok(policy),
            other => panic!("dirty expects a policy, got {other:?}"),
        }
    }

    fn confirm_replace_config(&mut self, _existing: &RepoConfig) -> bm_core::Result<bool> {
        self.yes_no("replace")
    }

    fn edit_config(&mut self, _existing: Option<&RepoConfig>) -> bm_core::Result<RepoConfig> {
        match self.next("config")? {
            Answer::Config(config) => Ok(config),
            other => panic!("config expects a config, got {other:?}"),
        }
    }

    fn edit_feature(&mut self, _feature: &Feature) -> bm_core::Result<FeatureUpdate> {
        match self.next("edit")? {
            Answer::Update(update) => Ok(update),
            other => panic!("edit expects an update, got {other:?}"),
        }
    }

    fn confirm_prune(&mut self, _stale: &[Feature]) -> bm_core::Result<bool> {
        self.yes_no("prune")
    }

    fn notify(&mut self, notice: Notice) {
        self.notices.push(notice);
    }
}

/// A configured repository checked out on [`FEATURE`], which is tracked.
pub struct Harness {
    pub store: RegistryStore,
    pub backend: MemoryBackend,
    pub vcs: FakeVcs,
    pub ui: ScriptedUi,
}

impl Harness {
    pub fn new() -> Self {
        let backend = MemoryBackend::new();
        let mut store = RegistryStore::open(backend.clone()).expect("memory store");
        store.set_config(REPO, config()).expect("set config");
        let mut harness = Self {
            store,
            backend,
            vcs: FakeVcs::new(FEATURE, &["master", "test", "release", FEATURE]),
            ui: ScriptedUi::default(),
        };
        harness.track(FEATURE, FeatureStatus::Developing);
        harness
    }

    /// Same as [`Harness::new`] but without any configuration.
    pub fn unconfigured() -> Self {
        let backend = MemoryBackend::new();
        let store = RegistryStore::open(backend.clone()).expect("memory store");
        Self {
            store,
            backend,
            vcs: FakeVcs::new(FEATURE, &["master", FEATURE]),
            ui: ScriptedUi::default(),
        }
    }

    pub fn track(&mut self, branch: &str, status: FeatureStatus) {
        let mut feature = Feature::new(branch, format!("{branch} work"), "master", tracked_at());
        feature.status = status;
        self.store.upsert_feature(REPO, feature).expect("track");
    }

    pub fn session(&mut self) -> Session<'_> {
        Session::new(&mut self.store, &self.vcs, &mut self.ui)
    }

    pub fn feature(&self, branch: &str) -> Option<Feature> {
        self.store.get_feature(REPO, branch).cloned()
    }

    pub fn answer(&mut self, answers: impl IntoIterator<Item = Answer>) -> &mut Self {
        self.ui.answer(answers);
        self
    }
}
