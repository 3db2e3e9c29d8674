//! Shared fixtures for integration tests

use std::sync::Arc;

use parking_lot::Mutex;
use tempfile::TempDir;

use faultline::handler::mock::{recording_registry, MockTerminator};
use faultline::registry::LaunchRequest;
use faultline::{
    CapabilityTag, FaultHandler, HandlerConfig, StaticDirectory, SurfaceId,
    DEFAULT_RECOVERY_SURFACE,
};

/// A fully wired handler with recording collaborators and a scratch crash
/// directory.
pub struct Scenario {
    pub handler: FaultHandler,
    pub terminator: MockTerminator,
    pub launches: Arc<Mutex<Vec<LaunchRequest>>>,
    pub crash_dir: TempDir,
}

impl Scenario {
    /// Build a scenario around a directory service, recording launches of
    /// whichever recovery surface that directory resolves to.
    pub fn new(config: HandlerConfig, directory: StaticDirectory) -> Self {
        let recovery_id = directory
            .first_error_handler()
            .unwrap_or_else(|| SurfaceId::new(DEFAULT_RECOVERY_SURFACE));
        let (registry, launches) = recording_registry(recovery_id);
        let terminator = MockTerminator::new();
        let crash_dir = tempfile::tempdir().expect("scratch crash dir");

        let config = config.with_storage_target_folder(crash_dir.path().to_path_buf());
        let handler = FaultHandler::new(config, Box::new(directory))
            .with_surfaces(registry)
            .with_terminator(Box::new(terminator.clone()));

        Self {
            handler,
            terminator,
            launches,
            crash_dir,
        }
    }

    /// Crash log file names currently in the scratch directory
    pub fn persisted_files(&self) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(self.crash_dir.path())
            .map(|entries| {
                entries
                    .filter_map(|entry| entry.ok())
                    .filter_map(|entry| entry.file_name().into_string().ok())
                    .collect()
            })
            .unwrap_or_default();
        names.sort();
        names
    }
}

/// Directory with a default entry point only (no registered handlers)
pub fn directory_with_entry_point(entry: &str) -> StaticDirectory {
    StaticDirectory::new().with_default_entry_point(SurfaceId::new(entry))
}

trait DirectoryExt {
    fn first_error_handler(&self) -> Option<SurfaceId>;
}

impl DirectoryExt for StaticDirectory {
    fn first_error_handler(&self) -> Option<SurfaceId> {
        use faultline::DirectoryService;
        self.query_handlers(CapabilityTag::Error).into_iter().next()
    }
}
