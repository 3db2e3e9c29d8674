//! Process-wide fault handling context
//!
//! One instance lives for the whole process, from handler installation to
//! exit. External lifecycle notifications write the background flag and the
//! most-recent foreground surface; the orchestrator reads them and manages
//! the resolved-target caches. All state sits behind one mutex so the
//! registration hook can stay `Send + Sync`.

use std::sync::{Arc, Weak};

use parking_lot::Mutex;

use crate::registry::surfaces::SurfaceId;

/// A live foreground surface the handler may ask to close before the
/// process terminates.
///
/// Held weakly: the handler can request closure but never keeps the
/// surface alive.
pub trait ForegroundHandle: Send + Sync {
    /// Ask the surface to close itself. Best-effort.
    fn request_close(&self);
}

#[derive(Default)]
struct ContextState {
    is_backgrounded: bool,
    most_recent_surface: Option<Weak<dyn ForegroundHandle>>,
    recovery_surface: Option<SurfaceId>,
    relaunch_target: Option<SurfaceId>,
    handling_fault: bool,
}

/// Shared mutable state of the fault handler.
#[derive(Default)]
pub struct ProcessFaultContext {
    state: Mutex<ContextState>,
}

impl ProcessFaultContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lifecycle notification: the process moved to or from the background
    pub fn note_backgrounded(&self, backgrounded: bool) {
        self.state.lock().is_backgrounded = backgrounded;
    }

    pub fn is_backgrounded(&self) -> bool {
        self.state.lock().is_backgrounded
    }

    /// Lifecycle notification: a new foreground surface was created.
    /// Only a weak reference is retained.
    pub fn note_surface_created<H>(&self, surface: &Arc<H>)
    where
        H: ForegroundHandle + 'static,
    {
        let surface: Arc<dyn ForegroundHandle> = surface.clone();
        let weak: Weak<dyn ForegroundHandle> = Arc::downgrade(&surface);
        self.state.lock().most_recent_surface = Some(weak);
    }

    /// Recovery surface id resolved earlier in this process, if any
    pub fn cached_recovery_surface(&self) -> Option<SurfaceId> {
        self.state.lock().recovery_surface.clone()
    }

    /// Cache the recovery surface id for the remainder of process lifetime
    pub fn cache_recovery_surface(&self, id: SurfaceId) {
        self.state.lock().recovery_surface = Some(id);
    }

    /// Store the relaunch target resolved for the current fault
    pub fn set_relaunch_target(&self, target: Option<SurfaceId>) {
        self.state.lock().relaunch_target = target;
    }

    /// Drop any relaunch target left over from an earlier decision
    pub fn clear_relaunch_target(&self) {
        self.state.lock().relaunch_target = None;
    }

    pub fn relaunch_target(&self) -> Option<SurfaceId> {
        self.state.lock().relaunch_target.clone()
    }

    /// Mark a fault as in flight. Returns false if one already is — the
    /// caller must route that second fault to the native path.
    pub fn begin_handling(&self) -> bool {
        let mut state = self.state.lock();
        if state.handling_fault {
            return false;
        }
        state.handling_fault = true;
        true
    }

    pub fn end_handling(&self) {
        self.state.lock().handling_fault = false;
    }

    /// Request closure of the most-recent foreground surface if it is still
    /// live, then clear the reference. A dead or missing handle is not an
    /// error.
    pub fn close_most_recent_surface(&self) {
        let handle = self.state.lock().most_recent_surface.take();
        if let Some(surface) = handle.and_then(|weak| weak.upgrade()) {
            surface.request_close();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::mock::CloseTrackingHandle;

    #[test]
    fn test_background_flag_round_trips() {
        let context = ProcessFaultContext::new();
        assert!(!context.is_backgrounded());
        context.note_backgrounded(true);
        assert!(context.is_backgrounded());
        context.note_backgrounded(false);
        assert!(!context.is_backgrounded());
    }

    #[test]
    fn test_close_requests_live_surface_and_clears_reference() {
        let context = ProcessFaultContext::new();
        let handle = CloseTrackingHandle::new();
        context.note_surface_created(&handle);

        context.close_most_recent_surface();
        assert!(handle.close_requested());

        // Reference was cleared; a second close is a no-op
        context.close_most_recent_surface();
    }

    #[test]
    fn test_close_tolerates_dropped_surface() {
        let context = ProcessFaultContext::new();
        {
            let handle = CloseTrackingHandle::new();
            context.note_surface_created(&handle);
        }
        // Surface was reclaimed; the weak reference must not revive it
        context.close_most_recent_surface();
    }

    #[test]
    fn test_handling_flag_rejects_reentry() {
        let context = ProcessFaultContext::new();
        assert!(context.begin_handling());
        assert!(!context.begin_handling());
        context.end_handling();
        assert!(context.begin_handling());
    }

    #[test]
    fn test_recovery_surface_cache() {
        let context = ProcessFaultContext::new();
        assert!(context.cached_recovery_surface().is_none());
        context.cache_recovery_surface(SurfaceId::new("myapp.recovery"));
        assert_eq!(
            context.cached_recovery_surface(),
            Some(SurfaceId::new("myapp.recovery"))
        );
    }

    #[test]
    fn test_relaunch_target_clears() {
        let context = ProcessFaultContext::new();
        context.set_relaunch_target(Some(SurfaceId::new("myapp.main")));
        assert_eq!(context.relaunch_target(), Some(SurfaceId::new("myapp.main")));
        context.clear_relaunch_target();
        assert!(context.relaunch_target().is_none());
    }
}
