// tests/router_dedup.rs

mod common;
use crate::common::{init_tracing, router_with_recorder};

use procpool::engine::{CommandId, Submission};
use procpool::events::{EventKind, ServerEvent};
use procpool::types::ProcessOutcome;

#[test]
fn first_submission_starts_process() {
    init_tracing();
    let (mut router, recorder) = router_with_recorder();

    let submission = router.submit("echo a".to_string());

    let request = submission.launch().expect("expected a launch request");
    assert_eq!(request.cmd, "echo a");
    assert_eq!(request.id, CommandId::of("echo a"));
    assert!(router.is_running("echo a"));
    assert_eq!(
        recorder.events(),
        vec![ServerEvent::ProcessStarted {
            cmd: "echo a".to_string()
        }]
    );
}

#[test]
fn successful_exit_counts_and_clears_running_set() {
    init_tracing();
    let (mut router, recorder) = router_with_recorder();

    let submission = router.submit("echo a".to_string());
    let request = submission.launch().cloned().expect("started");

    let restart = router.handle_exit(&request.id, &request.cmd, ProcessOutcome::Exited(0));

    assert!(restart.is_none());
    assert_eq!(router.succeeded(), 1);
    assert_eq!(router.failed(), 0);
    assert_eq!(router.running_len(), 0);
    assert_eq!(
        recorder.events().last(),
        Some(&ServerEvent::ProcessTerminated {
            cmd: "echo a".to_string(),
            exit_code: 0
        })
    );
}

#[test]
fn duplicate_submissions_while_running_keep_single_queued_entry() {
    init_tracing();
    let (mut router, recorder) = router_with_recorder();

    assert!(matches!(router.submit("sleep 5".to_string()), Submission::Started(_)));
    assert_eq!(router.submit("sleep 5".to_string()), Submission::Queued);
    assert_eq!(router.queued_len(), 1);

    for _ in 0..5 {
        assert_eq!(router.submit("sleep 5".to_string()), Submission::AlreadyQueued);
    }

    assert_eq!(router.queued_len(), 1);
    assert_eq!(router.running_len(), 1);
    assert_eq!(recorder.count(EventKind::ProcessStarted), 1);
    assert_eq!(recorder.count(EventKind::ProcessAlreadyRunning), 1);
    assert_eq!(recorder.count(EventKind::ProcessAlreadyQueued), 5);
}

#[test]
fn whitespace_variants_are_distinct_commands() {
    init_tracing();
    let (mut router, _recorder) = router_with_recorder();

    assert!(matches!(router.submit("echo a".to_string()), Submission::Started(_)));
    assert!(matches!(router.submit("echo  a".to_string()), Submission::Started(_)));
    assert!(matches!(router.submit("echo a ".to_string()), Submission::Started(_)));

    assert_eq!(router.running_len(), 3);
    assert_eq!(router.queued_len(), 0);
    assert_ne!(CommandId::of("echo a"), CommandId::of("echo  a"));
}

#[test]
fn exit_promotes_queued_rerun_exactly_once() {
    init_tracing();
    let (mut router, recorder) = router_with_recorder();

    let first = router.submit("make".to_string()).launch().cloned().expect("started");
    router.submit("make".to_string());
    router.submit("make".to_string());
    recorder.clear();

    let restart = router
        .handle_exit(&first.id, &first.cmd, ProcessOutcome::Exited(0))
        .expect("queued re-run should be promoted");

    assert_eq!(restart, first);
    assert_eq!(router.queued_len(), 0);
    assert!(router.is_running("make"));
    assert!(!router.is_queued("make"));
    assert_eq!(
        recorder.kinds(),
        vec![EventKind::ProcessTerminated, EventKind::ProcessStarted]
    );

    // The re-run finishing with nothing queued ends the chain.
    assert!(
        router
            .handle_exit(&restart.id, &restart.cmd, ProcessOutcome::Exited(0))
            .is_none()
    );
    assert_eq!(router.running_len(), 0);
    assert_eq!(router.succeeded(), 2);
}

#[test]
fn non_zero_exit_is_counted_as_failure() {
    init_tracing();
    let (mut router, recorder) = router_with_recorder();

    let request = router.submit("exit 2".to_string()).launch().cloned().expect("started");
    router.handle_exit(&request.id, &request.cmd, ProcessOutcome::Exited(2));

    assert_eq!(router.failed(), 1);
    assert_eq!(router.succeeded(), 0);
    assert_eq!(recorder.count(EventKind::ProcessTerminated), 0);

    let errors = recorder.errors();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("exit code 2"), "got {:?}", errors[0]);
}

#[test]
fn failed_run_still_promotes_queued_rerun() {
    init_tracing();
    let (mut router, _recorder) = router_with_recorder();

    let request = router.submit("flaky".to_string()).launch().cloned().expect("started");
    router.submit("flaky".to_string());

    let restart = router.handle_exit(&request.id, &request.cmd, ProcessOutcome::Exited(1));

    assert!(restart.is_some());
    assert_eq!(router.failed(), 1);
    assert!(router.is_running("flaky"));
}

#[test]
fn spawn_failure_is_a_distinct_failed_outcome() {
    init_tracing();
    let (mut router, recorder) = router_with_recorder();

    let request = router.submit("nope".to_string()).launch().cloned().expect("started");
    router.handle_exit(
        &request.id,
        &request.cmd,
        ProcessOutcome::SpawnFailed("No such file or directory".to_string()),
    );

    assert_eq!(router.failed(), 1);
    assert_eq!(router.running_len(), 0);
    let errors = recorder.errors();
    assert!(errors[0].contains("failed to start command"));
    assert!(errors[0].contains("No such file or directory"));
}

#[test]
fn status_reflects_sets_and_counters() {
    init_tracing();
    let (mut router, _recorder) = router_with_recorder();

    let status = router.status();
    assert!(status.uptime >= 0);
    assert_eq!(
        (status.running, status.queued, status.failed, status.succeeded),
        (0, 0, 0, 0)
    );

    let a = router.submit("a".to_string()).launch().cloned().expect("started");
    router.submit("a".to_string());
    router.submit("b".to_string());
    router.handle_exit(&a.id, &a.cmd, ProcessOutcome::Exited(3));

    let status = router.status();
    assert_eq!(status.running, 2);
    assert_eq!(status.queued, 0);
    assert_eq!(status.failed, 1);
    assert_eq!(status.succeeded, 0);
}

#[test]
fn only_exit_zero_counts_as_success() {
    init_tracing();
    let (mut router, recorder) = router_with_recorder();

    for (cmd, outcome) in [
        ("ok", ProcessOutcome::Exited(0)),
        ("killed", ProcessOutcome::Exited(-1)),
        ("missing", ProcessOutcome::SpawnFailed("not found".to_string())),
    ] {
        assert_eq!(outcome.is_success(), cmd == "ok");
        let request = router.submit(cmd.to_string()).launch().cloned().expect("started");
        router.handle_exit(&request.id, &request.cmd, outcome);
    }

    assert_eq!((router.succeeded(), router.failed()), (1, 2));
    assert_eq!(recorder.count(EventKind::ProcessTerminated), 1);
    assert_eq!(recorder.errors().len(), 2);
}
