//! Recovery target resolution with documented fallbacks

use crate::registry::directory::{CapabilityTag, DirectoryService};
use crate::registry::surfaces::{SurfaceId, DEFAULT_RECOVERY_SURFACE};

/// Determine which recovery surface to hand faults to.
///
/// The first surface registered under the `error` capability wins; with
/// none registered, the built-in default surface id is used. Side-effect
/// free on repeat calls — caching the result for process lifetime is the
/// caller's job.
pub fn resolve_recovery_surface(directory: &dyn DirectoryService) -> SurfaceId {
    match directory.query_handlers(CapabilityTag::Error).into_iter().next() {
        Some(id) => id,
        None => {
            tracing::debug!(
                fallback = DEFAULT_RECOVERY_SURFACE,
                "No surface registered under the error capability, using built-in default"
            );
            SurfaceId::new(DEFAULT_RECOVERY_SURFACE)
        }
    }
}

/// Determine which entry point the recovery surface may relaunch.
///
/// The first surface under the `restart` capability wins, falling back to
/// the directory's default entry point, then to none. Deliberately resolved
/// fresh on every fault rather than cached across invocations.
pub fn resolve_relaunch_target(directory: &dyn DirectoryService) -> Option<SurfaceId> {
    directory
        .query_handlers(CapabilityTag::Restart)
        .into_iter()
        .next()
        .or_else(|| directory.query_default_entry_point())
}
