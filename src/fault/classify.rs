//! Conflict classification for incoming faults
//!
//! A fault that originated inside process bootstrap or inside the recovery
//! surface itself must not trigger recovery: launching the surface again
//! would recurse or loop forever. Such faults are routed back to the native
//! fault-reporting path instead.

use crate::fault::record::Fault;
use crate::registry::surfaces::SurfaceId;

/// Well-known symbolic unit of the process bootstrap entry point.
pub const BOOTSTRAP_UNIT: &str = "process_bootstrap";

/// Well-known operation of the process bootstrap entry point.
pub const BOOTSTRAP_OPERATION: &str = "bind_application";

/// Whether recovery must not be attempted for this fault.
///
/// Walks the causal chain in order (the fault, then each underlying cause)
/// and returns true if any element's frames contain the bootstrap entry
/// point, or a frame whose unit equals the resolved recovery surface id.
/// Must run before any hand-off decision.
pub fn is_conflictive(fault: &Fault, recovery_surface: &SurfaceId) -> bool {
    fault.chain().any(|element| {
        element.frames().iter().any(|frame| {
            (frame.unit == BOOTSTRAP_UNIT && frame.operation == BOOTSTRAP_OPERATION)
                || frame.unit == recovery_surface.as_str()
        })
    })
}
