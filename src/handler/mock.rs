//! Mock collaborators for deterministic testing
//!
//! Implement the orchestrator's seams without touching the real process:
//! the terminator records exit statuses instead of exiting, surfaces record
//! the launch requests they receive, and foreground handles record close
//! requests. Use these for unit and integration tests that drive the full
//! handling sequence.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::handler::context::ForegroundHandle;
use crate::handler::orchestrator::ProcessTerminator;
use crate::registry::surfaces::{LaunchRequest, RecoverySurface, SurfaceId, SurfaceRegistry};

/// Terminator that records requested exit statuses instead of exiting.
#[derive(Debug, Clone, Default)]
pub struct MockTerminator {
    statuses: Arc<Mutex<Vec<i32>>>,
}

impl MockTerminator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Statuses passed to `terminate`, in call order
    pub fn statuses(&self) -> Vec<i32> {
        self.statuses.lock().clone()
    }
}

impl ProcessTerminator for MockTerminator {
    fn terminate(&self, status: i32) {
        self.statuses.lock().push(status);
    }
}

/// Recovery surface that records every launch request it receives.
pub struct RecordingSurface {
    requests: Arc<Mutex<Vec<LaunchRequest>>>,
}

impl RecordingSurface {
    pub fn new(requests: Arc<Mutex<Vec<LaunchRequest>>>) -> Self {
        Self { requests }
    }
}

impl RecoverySurface for RecordingSurface {
    fn launch(&mut self, request: LaunchRequest) -> anyhow::Result<()> {
        self.requests.lock().push(request);
        Ok(())
    }
}

/// Recovery surface whose launch always fails.
pub struct FailingSurface;

impl RecoverySurface for FailingSurface {
    fn launch(&mut self, _request: LaunchRequest) -> anyhow::Result<()> {
        anyhow::bail!("surface refused to launch")
    }
}

/// Registry with a single recording surface under `id`, plus the shared
/// request log to assert against.
pub fn recording_registry(id: SurfaceId) -> (SurfaceRegistry, Arc<Mutex<Vec<LaunchRequest>>>) {
    let requests: Arc<Mutex<Vec<LaunchRequest>>> = Arc::default();
    let log = Arc::clone(&requests);
    let mut registry = SurfaceRegistry::new();
    registry.register(id, move || Box::new(RecordingSurface::new(Arc::clone(&log))));
    (registry, requests)
}

/// Foreground handle that records whether closure was requested.
#[derive(Debug, Default)]
pub struct CloseTrackingHandle {
    closed: Mutex<bool>,
}

impl CloseTrackingHandle {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn close_requested(&self) -> bool {
        *self.closed.lock()
    }
}

impl ForegroundHandle for CloseTrackingHandle {
    fn request_close(&self) {
        *self.closed.lock() = true;
    }
}
