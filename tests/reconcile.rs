// tests/reconcile.rs

//! Reconciliation tests: state queries, batch planning and execution order.

mod common;

use choco_reconcile::{Action, Error, InvocationSettings, PackageRequest};
use common::{is_execution_error, reconciler, reconciler_with, request, ScriptedRunner};

#[test]
fn test_installed_lookup_is_case_insensitive() {
    let runner = ScriptedRunner::new("git|2.40.0\n", "");
    let mut rec = reconciler(PackageRequest::new(vec!["Git".into()]), &runner);

    assert_eq!(
        rec.load_current_state(&["Git"]).unwrap(),
        vec![Some("2.40.0".to_string())]
    );
}

#[test]
fn test_subset_selection_is_case_insensitive() {
    let runner = ScriptedRunner::new("", "git|2.40.0\n");
    let mut rec = reconciler(PackageRequest::new(vec!["Git".into()]), &runner);

    assert_eq!(rec.install(&["git"]).unwrap(), 1);
    assert_eq!(runner.mutations(), vec!["choco install -y Git"]);
}

#[test]
fn test_same_package_in_two_cases_is_one_invocation() {
    let runner = ScriptedRunner::new("", "git|2.40.0\n");
    let mut rec = reconciler(
        request(&[("Git", Some("2.40.0")), ("git", Some("2.39.0"))]),
        &runner,
    );

    assert_eq!(rec.install(&["Git", "git"]).unwrap(), 1);
    assert_eq!(runner.mutations(), vec!["choco install -y -version 2.39.0 Git"]);
}

#[test]
fn test_installed_list_is_queried_once_per_run() {
    let runner = ScriptedRunner::new("a|1.0\nb|2.0\n", "");
    let mut rec = reconciler(
        PackageRequest::new(vec!["a".into(), "b".into(), "c".into()]),
        &runner,
    );

    rec.load_current_state(&["a", "b"]).unwrap();
    rec.load_current_state(&["c", "a"]).unwrap();

    assert_eq!(runner.count_matching("choco list "), 1);
}

#[test]
fn test_unknown_names_are_none_in_position() {
    let runner = ScriptedRunner::new("b|2.0\n", "a|1.5\nb|2.1\n");
    let mut rec = reconciler(
        PackageRequest::new(vec!["a".into(), "b".into(), "nope".into()]),
        &runner,
    );

    assert_eq!(
        rec.load_current_state(&["a", "b", "nope"]).unwrap(),
        vec![None, Some("2.0".to_string()), None]
    );
    assert_eq!(
        rec.resolve_candidate_state(&["a", "b", "nope"]).unwrap(),
        vec![Some("1.5".to_string()), Some("2.1".to_string()), None]
    );
}

#[test]
fn test_available_query_uses_source() {
    let runner = ScriptedRunner::new("", "a|1.0\n");
    let settings = InvocationSettings {
        source: Some("internal".to_string()),
        ..Default::default()
    };
    let mut rec = reconciler_with(PackageRequest::new(vec!["a".into()]), settings, &runner);

    rec.resolve_candidate_state(&["a"]).unwrap();
    assert_eq!(runner.commands(), vec!["choco search --limit-output -source internal"]);
}

#[test]
fn test_install_splits_pinned_and_unpinned() {
    let runner = ScriptedRunner::new("", "a|1.0\nb|3.0\nc|2.0\n");
    let mut rec = reconciler(
        request(&[("A", Some("1.0")), ("B", None), ("C", Some("2.0"))]),
        &runner,
    );

    assert_eq!(rec.install(&["A", "B", "C"]).unwrap(), 3);
    assert_eq!(
        runner.mutations(),
        vec![
            "choco install -y -version 1.0 A",
            "choco install -y -version 2.0 C",
            "choco install -y B",
        ]
    );
}

#[test]
fn test_options_and_source_placement() {
    let runner = ScriptedRunner::new("", "a|1.0\nb|1.0\n");
    let settings = InvocationSettings {
        source: Some("repo".to_string()),
        options: Some("--no-progress".to_string()),
        ..Default::default()
    };
    let mut rec = reconciler_with(request(&[("a", Some("1.0")), ("b", None)]), settings, &runner);

    rec.upgrade(&["a", "b"]).unwrap();
    assert_eq!(
        runner.mutations(),
        vec![
            "choco upgrade -y -version 1.0 --no-progress -source repo a",
            "choco upgrade -y --no-progress -source repo b",
        ]
    );
}

#[test]
fn test_remove_is_a_single_batch() {
    let runner = ScriptedRunner::new("a|1.0\nb|1.0\nc|1.0\n", "");
    let mut rec = reconciler(
        request(&[("a", Some("1.0")), ("b", None), ("c", Some("2.0"))]),
        &runner,
    );

    assert_eq!(rec.remove(&["a", "b", "c"]).unwrap(), 1);
    assert_eq!(runner.commands(), vec!["choco uninstall -y a b c"]);
}

#[test]
fn test_purge_matches_remove() {
    let runner = ScriptedRunner::new("", "");
    let rec = reconciler(request(&[("a", Some("1.0")), ("b", None)]), &runner);

    assert_eq!(
        rec.plan(Action::Purge, &["a", "b"]).unwrap(),
        rec.plan(Action::Remove, &["a", "b"]).unwrap()
    );
}

#[test]
fn test_uninstall_alias_behaves_like_remove() {
    let runner = ScriptedRunner::new("", "");
    let mut rec = reconciler(request(&[("x", Some("1.0")), ("y", None)]), &runner);

    assert_eq!(
        rec.plan(Action::Uninstall, &["x", "y"]).unwrap(),
        rec.plan(Action::Remove, &["x", "y"]).unwrap()
    );
    rec.uninstall(&["x", "y"]).unwrap();
    assert_eq!(runner.commands(), vec!["choco uninstall -y x y"]);
}

#[test]
fn test_empty_subset_runs_nothing() {
    let runner = ScriptedRunner::new("", "");
    let mut rec = reconciler(PackageRequest::new(vec!["a".into()]), &runner);

    let none: [&str; 0] = [];
    assert_eq!(rec.install(&none).unwrap(), 0);
    assert_eq!(rec.remove(&none).unwrap(), 0);
    assert!(runner.commands().is_empty());
}

#[test]
fn test_unresolvable_candidate_fails_before_any_install() {
    let runner = ScriptedRunner::new("", "a|1.0\n");
    let mut rec = reconciler(PackageRequest::new(vec!["a".into(), "ghost".into()]), &runner);

    let err = rec.install(&["a", "ghost"]).unwrap_err();
    assert!(matches!(err, Error::UnresolvableCandidate(ref names) if names == &["ghost"]));
    assert!(runner.mutations().is_empty());
}

#[test]
fn test_removal_does_not_need_candidates() {
    let runner = ScriptedRunner::new("ghost|0.1\n", "");
    let mut rec = reconciler(PackageRequest::new(vec!["ghost".into()]), &runner);

    assert_eq!(rec.remove(&["ghost"]).unwrap(), 1);
}

#[test]
fn test_first_failure_aborts_remaining() {
    let runner = ScriptedRunner::new("", "a|1.0\nb|1.0\nc|1.0\n").failing_on("-version 1.0 a");
    let mut rec = reconciler(
        request(&[("a", Some("1.0")), ("b", Some("1.0")), ("c", None)]),
        &runner,
    );

    let err = rec.install(&["a", "b", "c"]).unwrap_err();
    assert!(is_execution_error(&err));
    assert_eq!(runner.mutations(), vec!["choco install -y -version 1.0 a"]);
}

#[test]
fn test_failed_query_is_an_error() {
    let runner = ScriptedRunner::new("a|1.0\n", "").failing_on("choco list ");
    let mut rec = reconciler(PackageRequest::new(vec!["a".into()]), &runner);

    let err = rec.load_current_state(&["a"]).unwrap_err();
    assert!(is_execution_error(&err));
}

#[test]
fn test_malformed_list_output_is_parse_error() {
    let runner = ScriptedRunner::new("git 2.40.0\n", "");
    let mut rec = reconciler(PackageRequest::new(vec!["git".into()]), &runner);

    assert!(matches!(
        rec.load_current_state(&["git"]),
        Err(Error::ParseError { .. })
    ));
}

#[test]
fn test_mismatched_versions_rejected() {
    let runner = ScriptedRunner::new("", "");
    let rec = reconciler(
        PackageRequest::with_versions(vec!["a".into(), "b".into()], vec![Some("1.0".into())]),
        &runner,
    );

    assert!(matches!(rec.desired(), Err(Error::InvalidRequest(_))));
}

#[test]
fn test_converge_installs_then_upgrades() {
    let runner = ScriptedRunner::new("b|1.0\nc|3.0\n", "a|1.0\nb|2.0\nc|3.0\n");
    let mut rec = reconciler(
        request(&[("a", None), ("b", Some("2.0")), ("c", Some("3.0"))]),
        &runner,
    );

    let diff = rec.converge().unwrap();
    assert_eq!(diff.packages_to_install(), vec!["a"]);
    assert_eq!(diff.packages_to_upgrade(), vec!["b"]);
    assert_eq!(diff.satisfied, vec!["c"]);
    assert_eq!(
        runner.mutations(),
        vec![
            "choco install -y a",
            "choco upgrade -y --allow-downgrade -version 2.0 b",
        ]
    );
}

#[test]
fn test_converge_moves_newer_install_back_to_pin() {
    let runner = ScriptedRunner::new("git|2.41.0\n", "git|2.41.0\n");
    let mut rec = reconciler(request(&[("git", Some("2.40.0"))]), &runner);

    let plan: Vec<String> = rec.converge_plan().unwrap().iter().map(|l| l.render()).collect();
    assert_eq!(plan, vec!["choco upgrade -y --allow-downgrade -version 2.40.0 git"]);

    rec.converge().unwrap();
    assert_eq!(
        runner.mutations(),
        vec!["choco upgrade -y --allow-downgrade -version 2.40.0 git"]
    );
}

#[test]
fn test_explicit_upgrade_has_no_downgrade_flag() {
    let runner = ScriptedRunner::new("", "git|2.41.0\n");
    let mut rec = reconciler(request(&[("git", Some("2.40.0"))]), &runner);

    rec.upgrade(&["git"]).unwrap();
    assert_eq!(runner.mutations(), vec!["choco upgrade -y -version 2.40.0 git"]);
}

#[test]
fn test_converge_noop_when_satisfied() {
    let runner = ScriptedRunner::new("a|9.9\n", "");
    let mut rec = reconciler(PackageRequest::new(vec!["a".into()]), &runner);

    assert!(rec.converge().unwrap().is_empty());
    assert!(runner.mutations().is_empty());
}

#[test]
fn test_status_reports_every_declared_package() {
    let runner = ScriptedRunner::new("a|1.0\n", "a|1.1\nb|2.0\n");
    let mut rec = reconciler(
        request(&[("a", Some("1.0")), ("b", None), ("ghost", None)]),
        &runner,
    );

    let rows = rec.status().unwrap();
    assert_eq!(rows.len(), 3);
    assert!(rows[0].is_satisfied());
    assert!(!rows[1].is_installed() && rows[1].is_resolvable());
    assert!(!rows[2].is_resolvable());
}

#[test]
fn test_snapshot_pins_installed_versions() {
    let runner = ScriptedRunner::new("Zip|1.0\ngit|2.40.0\n", "");
    let mut rec = reconciler(PackageRequest::new(Vec::new()), &runner);

    let model = rec.snapshot().unwrap();
    assert_eq!(model.names(), vec!["git", "zip"]);
    assert_eq!(model.packages[0].version.as_deref(), Some("2.40.0"));
}
