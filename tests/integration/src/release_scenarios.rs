//! Release scenarios against real repositories
//!
//! Each scenario drives `bm_core::deploy` through the git CLI adapter on a
//! throwaway clone and checks what landed locally and on `origin`.

mod support;

use bm_core::{
    Bookkeeping, Cancellation, ConflictAction, DeployOutcome, DeployRequest, Env, Error,
    FeatureStatus, Notice, ReturnOutcome, deploy,
};
use support::{FEATURE, Reply, Scenario, TEST_URL};

fn to_test(return_to_source: Option<bool>) -> DeployRequest {
    DeployRequest {
        env: Some(Env::Test),
        return_to_source,
    }
}

fn run(s: &mut Scenario, request: DeployRequest) -> bm_core::Result<DeployOutcome> {
    deploy(&mut s.session(), &request)
}

// =============================================================================
// Happy path
// =============================================================================

mod completed {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_feature_reaches_origin_and_is_recorded() {
        let mut s = Scenario::new();
        s.feature_branch(FEATURE, "login.txt");
        s.reply([Reply::Yes]);

        let outcome = run(&mut s, to_test(Some(true))).unwrap();

        let report = match outcome {
            DeployOutcome::Completed(report) => report,
            other => panic!("expected a completed deploy, got {other:?}"),
        };
        assert_eq!(report.bookkeeping, Bookkeeping::Recorded(FeatureStatus::DeployedTest));
        assert_eq!(report.returned, ReturnOutcome::Returned);

        assert_eq!(s.repo.current_branch(), FEATURE);
        assert_eq!(s.repo.origin_rev("test"), s.repo.rev(FEATURE));
        assert_eq!(s.ui.opened, vec![TEST_URL]);
        s.repo.assert_clean();

        let feature = s.feature(FEATURE).unwrap();
        assert_eq!(feature.status, FeatureStatus::DeployedTest);
        assert_eq!(feature.deploy_history.len(), 1);
        assert_eq!(feature.deploy_history[0].env, Env::Test);
    }

    #[test]
    fn test_operator_can_stay_on_target() {
        let mut s = Scenario::new();
        s.feature_branch(FEATURE, "login.txt");
        s.reply([Reply::Yes, Reply::No]);

        let outcome = run(&mut s, to_test(None)).unwrap();

        assert!(matches!(
            outcome,
            DeployOutcome::Completed(ref r) if r.returned == ReturnOutcome::Stayed
        ));
        assert_eq!(s.repo.current_branch(), "test");
        assert_eq!(s.ui.asked, vec!["deployed", "return"]);
    }

    #[test]
    fn test_target_only_on_origin_is_tracked_locally() {
        let mut s = Scenario::new();
        s.repo.git(&["branch", "-D", "test"]);
        s.feature_branch(FEATURE, "login.txt");
        s.reply([Reply::Yes]);

        run(&mut s, to_test(Some(true))).unwrap();

        assert!(s.repo.has_local_branch("test"));
        assert!(s.ui.notices.contains(&Notice::TrackingRemoteBranch {
            branch: "test".into()
        }));
        assert_eq!(s.repo.origin_rev("test"), s.repo.rev(FEATURE));
    }

    #[test]
    fn test_unconfirmed_deploy_leaves_status_alone() {
        let mut s = Scenario::new();
        s.feature_branch(FEATURE, "login.txt");
        s.reply([Reply::No]);

        let outcome = run(&mut s, to_test(Some(true))).unwrap();

        assert!(matches!(outcome, DeployOutcome::Unconfirmed { .. }));
        assert_eq!(s.status(FEATURE), Some(FeatureStatus::Developing));
        // The merge is already on origin; only the bookkeeping is skipped.
        assert_eq!(s.repo.origin_rev("test"), s.repo.rev(FEATURE));
        assert_eq!(s.repo.current_branch(), "test");
    }
}

// =============================================================================
// Conflicts
// =============================================================================

mod conflicts {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_abort_restores_target_and_skips_push() {
        let mut s = Scenario::new();
        s.repo.conflicting_branches(FEATURE, "test", "app.txt");
        s.track(FEATURE);
        let before = s.repo.rev("test");
        s.reply([Reply::Conflict(ConflictAction::Abort)]);

        let outcome = run(&mut s, to_test(Some(true))).unwrap();

        assert!(matches!(outcome, DeployOutcome::MergeAborted { .. }));
        s.repo.assert_clean();
        assert_eq!(s.repo.rev("test"), before);
        assert_eq!(s.repo.origin_rev("test"), before);
        assert_eq!(s.status(FEATURE), Some(FeatureStatus::Developing));
        assert!(s.ui.opened.is_empty());
    }

    #[test]
    fn test_resolved_conflict_is_committed_and_pushed() {
        let mut s = Scenario::new();
        s.repo.conflicting_branches(FEATURE, "test", "app.txt");
        s.track(FEATURE);
        s.ui.resolution = Some((
            s.repo.root().to_path_buf(),
            "app.txt".into(),
            "both sides\n".into(),
        ));
        s.reply([Reply::Conflict(ConflictAction::Resolve), Reply::Yes]);

        let outcome = run(&mut s, to_test(Some(true))).unwrap();

        assert!(matches!(outcome, DeployOutcome::Completed(_)));
        s.repo.assert_clean();
        assert_eq!(s.repo.current_branch(), FEATURE);

        let merged = s.repo.git(&["show", "test:app.txt"]);
        assert_eq!(merged, "both sides");
        assert_eq!(s.repo.origin_rev("test"), s.repo.rev("test"));
        assert_eq!(s.status(FEATURE), Some(FeatureStatus::DeployedTest));
    }
}

// =============================================================================
// Preconditions and gates
// =============================================================================

mod preconditions {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_dirty_tree_is_refused_before_anything_runs() {
        let mut s = Scenario::new();
        s.feature_branch(FEATURE, "login.txt");
        s.repo.make_dirty();

        let err = run(&mut s, to_test(Some(true))).unwrap_err();

        assert!(matches!(err, Error::DirtyWorkingTree));
        assert_eq!(s.repo.current_branch(), FEATURE);
        assert!(s.ui.asked.is_empty());
    }

    #[test]
    fn test_environment_branch_cannot_be_deployed() {
        let mut s = Scenario::new();
        s.repo.checkout("test");

        let err = run(&mut s, to_test(Some(true))).unwrap_err();

        assert!(matches!(err, Error::CannotDeployEnvironmentBranch { ref branch } if branch == "test"));
    }

    #[test]
    fn test_unconfigured_staging_is_rejected() {
        let mut s = Scenario::new();
        s.feature_branch(FEATURE, "login.txt");

        let err = run(
            &mut s,
            DeployRequest {
                env: Some(Env::Pre),
                return_to_source: None,
            },
        )
        .unwrap_err();

        assert!(matches!(err, Error::IncompleteEnvironment { env: Env::Pre }));
    }

    #[test]
    fn test_production_without_staging_can_be_declined() {
        let mut s = Scenario::new();
        s.feature_branch(FEATURE, "login.txt");
        let main_before = s.repo.origin_rev("main");
        s.reply([Reply::Yes, Reply::No]);

        let outcome = run(
            &mut s,
            DeployRequest {
                env: Some(Env::Prod),
                return_to_source: None,
            },
        )
        .unwrap();

        assert_eq!(outcome, DeployOutcome::Cancelled(Cancellation::PromotionDeclined));
        assert_eq!(s.ui.asked, vec!["production", "promotion"]);
        assert_eq!(s.repo.current_branch(), FEATURE);
        assert_eq!(s.repo.origin_rev("main"), main_before);
    }

    #[test]
    fn test_untracked_branch_deploys_without_bookkeeping() {
        let mut s = Scenario::new();
        s.repo.create_branch("spike");
        s.repo.commit_file("spike.txt", "spike\n", "spike");
        s.reply([Reply::Yes, Reply::Yes]);

        let outcome = run(&mut s, to_test(Some(true))).unwrap();

        assert!(matches!(
            outcome,
            DeployOutcome::Completed(ref r) if r.bookkeeping == Bookkeeping::Untracked
        ));
        assert!(s.feature("spike").is_none());
        assert_eq!(s.repo.origin_rev("test"), s.repo.rev("spike"));
    }
}
