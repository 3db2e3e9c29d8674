//! Directory service: capability-tag lookup of registered surfaces
//!
//! The directory is an external collaborator — any mechanism that can map a
//! capability tag to an ordered list of surface ids (manifest scan, static
//! config, service registry) satisfies the trait. [`StaticDirectory`] is the
//! in-crate, config-driven implementation.

use std::collections::HashMap;

use crate::registry::surfaces::SurfaceId;

/// Well-known capability tags surfaces register under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CapabilityTag {
    /// Handles a fault: shows diagnostics after a crash
    Error,
    /// Restarts the application after a fault
    Restart,
}

impl CapabilityTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            CapabilityTag::Error => "error",
            CapabilityTag::Restart => "restart",
        }
    }
}

impl std::fmt::Display for CapabilityTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lookup of registered handler surfaces by capability.
///
/// Implementations are assumed static within one process lifetime, but the
/// contract tolerates being queried fresh on every fault.
pub trait DirectoryService {
    /// Surfaces registered under a capability tag, in registration order
    fn query_handlers(&self, tag: CapabilityTag) -> Vec<SurfaceId>;

    /// The default entry point for this application, if one is declared
    fn query_default_entry_point(&self) -> Option<SurfaceId>;
}

/// Static, in-memory directory built from configuration.
#[derive(Debug, Clone, Default)]
pub struct StaticDirectory {
    handlers: HashMap<CapabilityTag, Vec<SurfaceId>>,
    default_entry_point: Option<SurfaceId>,
}

impl StaticDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a surface under a capability tag
    pub fn with_handler(mut self, tag: CapabilityTag, id: SurfaceId) -> Self {
        self.handlers.entry(tag).or_default().push(id);
        self
    }

    /// Declare the application's default entry point
    pub fn with_default_entry_point(mut self, id: SurfaceId) -> Self {
        self.default_entry_point = Some(id);
        self
    }
}

impl DirectoryService for StaticDirectory {
    fn query_handlers(&self, tag: CapabilityTag) -> Vec<SurfaceId> {
        self.handlers.get(&tag).cloned().unwrap_or_default()
    }

    fn query_default_entry_point(&self) -> Option<SurfaceId> {
        self.default_entry_point.clone()
    }
}
