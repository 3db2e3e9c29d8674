//! End-to-end fault handling scenarios driving the full orchestration
//! sequence with recording collaborators.

#[path = "../common/mod.rs"]
mod common;

use common::{directory_with_entry_point, Scenario};
use faultline::handler::mock::CloseTrackingHandle;
use faultline::{
    CapabilityTag, Fault, FaultOutcome, HandlerConfig, StaticDirectory, SurfaceId,
    FAULT_EXIT_STATUS, MAX_TRANSPORT_BYTES, TRUNCATION_DISCLAIMER,
};

/// Scenario A: clean fault, persistence on, default surface, default entry
/// point as relaunch target.
#[test]
fn test_clean_fault_persists_launches_and_terminates() {
    let scenario = Scenario::new(
        HandlerConfig::default().with_persist_to_storage(true),
        directory_with_entry_point("myapp.main"),
    );

    let outcome = scenario.handler.handle_fault(Fault::new("boom"));

    let report = match outcome {
        FaultOutcome::Terminated(report) => report,
        FaultOutcome::Rethrow => panic!("clean fault must not rethrow"),
    };
    assert_eq!(report.exit_status, FAULT_EXIT_STATUS);
    assert_eq!(scenario.terminator.statuses(), vec![FAULT_EXIT_STATUS]);

    // Persisted under the configured folder
    let files = scenario.persisted_files();
    assert_eq!(files.len(), 1);
    assert_eq!(report.persisted_as.as_deref(), Some(files[0].as_str()));
    let contents =
        std::fs::read_to_string(scenario.crash_dir.path().join(&files[0])).unwrap();
    assert_eq!(contents, "boom\n");

    // Launched with the full (untruncated) record and the default entry
    // point as relaunch target
    let launches = scenario.launches.lock();
    assert_eq!(launches.len(), 1);
    assert_eq!(launches[0].diagnostic.text(), "boom\n");
    assert_eq!(launches[0].relaunch_target, Some(SurfaceId::new("myapp.main")));
}

/// Scenario B: the configured recovery surface itself crashed.
#[test]
fn test_fault_inside_recovery_surface_rethrows() {
    let directory = StaticDirectory::new()
        .with_handler(CapabilityTag::Error, SurfaceId::new("RecoverySurfaceImpl"));
    let scenario = Scenario::new(
        HandlerConfig::default().with_persist_to_storage(true),
        directory,
    );

    let fault = Fault::new("surface crashed").with_frame("RecoverySurfaceImpl", "onCreate");
    assert_eq!(scenario.handler.handle_fault(fault), FaultOutcome::Rethrow);

    // Nothing persisted, nothing launched, process not terminated by us
    assert!(scenario.persisted_files().is_empty());
    assert!(scenario.launches.lock().is_empty());
    assert!(scenario.terminator.statuses().is_empty());
}

/// Scenario C: oversized record is truncated for hand-off but persisted in
/// full.
#[test]
fn test_oversized_record_is_truncated_for_handoff_only() {
    let scenario = Scenario::new(
        HandlerConfig::default().with_persist_to_storage(true),
        directory_with_entry_point("myapp.main"),
    );

    let description = "x".repeat(200_000);
    scenario.handler.handle_fault(Fault::new(description.clone()));

    let launches = scenario.launches.lock();
    assert_eq!(launches.len(), 1);
    let diagnostic = &launches[0].diagnostic;
    assert_eq!(diagnostic.len(), MAX_TRANSPORT_BYTES);
    assert!(diagnostic.text().ends_with(TRUNCATION_DISCLAIMER));

    // The persisted file holds the full record
    let files = scenario.persisted_files();
    let contents =
        std::fs::read_to_string(scenario.crash_dir.path().join(&files[0])).unwrap();
    assert_eq!(contents.len(), description.len() + 1);
}

/// Scenario D: storage failure is swallowed and handling proceeds.
#[cfg(unix)]
#[test]
fn test_storage_failure_does_not_stop_handling() {
    use std::os::unix::fs::PermissionsExt;

    let scenario = Scenario::new(
        HandlerConfig::default().with_persist_to_storage(true),
        directory_with_entry_point("myapp.main"),
    );
    std::fs::set_permissions(
        scenario.crash_dir.path(),
        std::fs::Permissions::from_mode(0o555),
    )
    .unwrap();

    let outcome = scenario.handler.handle_fault(Fault::new("boom"));

    let report = match outcome {
        FaultOutcome::Terminated(report) => report,
        FaultOutcome::Rethrow => panic!("unexpected rethrow"),
    };
    assert!(report.persisted_as.is_none());
    // Handling was unaffected: surface launched, process terminated
    assert_eq!(scenario.launches.lock().len(), 1);
    assert_eq!(scenario.terminator.statuses(), vec![FAULT_EXIT_STATUS]);

    // Restore so TempDir can clean up
    std::fs::set_permissions(
        scenario.crash_dir.path(),
        std::fs::Permissions::from_mode(0o755),
    )
    .unwrap();
}

/// With relaunch disabled the surface never sees a relaunch target, no
/// matter what the directory offers.
#[test]
fn test_relaunch_disabled_hands_no_target() {
    let directory = StaticDirectory::new()
        .with_handler(CapabilityTag::Restart, SurfaceId::new("myapp.restart"))
        .with_default_entry_point(SurfaceId::new("myapp.main"));
    let scenario = Scenario::new(
        HandlerConfig::default().with_allow_process_relaunch(false),
        directory,
    );

    // Leave a stale cached target behind to prove it gets cleared
    scenario
        .handler
        .context()
        .set_relaunch_target(Some(SurfaceId::new("stale")));

    scenario.handler.handle_fault(Fault::new("boom"));

    let launches = scenario.launches.lock();
    assert_eq!(launches.len(), 1);
    assert_eq!(launches[0].relaunch_target, None);
    assert!(scenario.handler.context().relaunch_target().is_none());
}

/// Backgrounded process with background recovery disallowed: no launch,
/// but persistence and termination still happen.
#[test]
fn test_backgrounded_process_suppresses_launch() {
    let scenario = Scenario::new(
        HandlerConfig::default()
            .with_persist_to_storage(true)
            .with_allow_recovery_when_backgrounded(false),
        directory_with_entry_point("myapp.main"),
    );
    scenario.handler.context().note_backgrounded(true);

    let outcome = scenario.handler.handle_fault(Fault::new("boom"));

    assert!(scenario.launches.lock().is_empty());
    assert_eq!(scenario.persisted_files().len(), 1);
    match outcome {
        FaultOutcome::Terminated(report) => assert!(report.launched_surface.is_none()),
        FaultOutcome::Rethrow => panic!("unexpected rethrow"),
    }
}

/// Backgrounded process with the default config still launches.
#[test]
fn test_backgrounded_launch_allowed_by_default() {
    let scenario = Scenario::new(
        HandlerConfig::default(),
        directory_with_entry_point("myapp.main"),
    );
    scenario.handler.context().note_backgrounded(true);

    scenario.handler.handle_fault(Fault::new("boom"));
    assert_eq!(scenario.launches.lock().len(), 1);
}

/// The stale foreground surface is asked to close before termination.
#[test]
fn test_foreground_surface_closed_before_termination() {
    let scenario = Scenario::new(
        HandlerConfig::default(),
        directory_with_entry_point("myapp.main"),
    );
    let handle = CloseTrackingHandle::new();
    scenario.handler.context().note_surface_created(&handle);

    scenario.handler.handle_fault(Fault::new("boom"));

    assert!(handle.close_requested());
    assert_eq!(scenario.terminator.statuses(), vec![FAULT_EXIT_STATUS]);
}

/// Two handled faults in one process run persist under distinct names.
#[test]
fn test_successive_faults_persist_distinct_files() {
    let scenario = Scenario::new(
        HandlerConfig::default()
            .with_persist_to_storage(true)
            .with_launch_recovery_surface(false),
        StaticDirectory::new(),
    );

    scenario.handler.handle_fault(Fault::new("first"));
    std::thread::sleep(std::time::Duration::from_millis(5));
    scenario.handler.handle_fault(Fault::new("second"));

    let files = scenario.persisted_files();
    assert_eq!(files.len(), 2);
    assert_ne!(files[0], files[1]);
}
