//! Typed recovery-surface registry
//!
//! Maps stable surface ids to constructor functions, populated at startup.
//! This replaces resolving a surface implementation from a string at fault
//! time: a lookup miss is a typed [`RegistryError::ResolutionMiss`], never a
//! runtime reflection fault.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::fault::record::DiagnosticRecord;

/// Surface id the crate registers its built-in recovery surface under.
pub const DEFAULT_RECOVERY_SURFACE: &str = "faultline.log_recovery";

/// Stable identifier of a registered surface.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SurfaceId(String);

impl SurfaceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SurfaceId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Error type for surface registry operations.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// No factory registered under the requested id.
    #[error("no surface registered under id '{0}'")]
    ResolutionMiss(SurfaceId),
}

/// Message handed to a recovery surface at launch.
///
/// Delivered via a fresh top-level launch that replaces any existing task
/// stack for the application. The diagnostic is already bounded to the
/// transport limit.
#[derive(Debug, Clone)]
pub struct LaunchRequest {
    /// Diagnostic record, truncated to the transport bound
    pub diagnostic: DiagnosticRecord,
    /// Entry point the surface may use to relaunch the application
    pub relaunch_target: Option<SurfaceId>,
}

/// A recovery surface the orchestrator can hand a fault to.
///
/// The concrete presentation is external to this crate; implementations
/// receive the launch request and own everything from there.
pub trait RecoverySurface: Send {
    fn launch(&mut self, request: LaunchRequest) -> anyhow::Result<()>;
}

type SurfaceFactory = Box<dyn Fn() -> Box<dyn RecoverySurface> + Send + Sync>;

/// Registry mapping surface ids to constructor functions.
pub struct SurfaceRegistry {
    factories: HashMap<SurfaceId, SurfaceFactory>,
}

impl SurfaceRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Registry with the built-in surface under [`DEFAULT_RECOVERY_SURFACE`]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(SurfaceId::new(DEFAULT_RECOVERY_SURFACE), || {
            Box::new(LogRecoverySurface)
        });
        registry
    }

    /// Register a surface constructor under a stable id
    pub fn register<F>(&mut self, id: SurfaceId, factory: F)
    where
        F: Fn() -> Box<dyn RecoverySurface> + Send + Sync + 'static,
    {
        self.factories.insert(id, Box::new(factory));
    }

    /// Construct the surface registered under `id`
    pub fn create(&self, id: &SurfaceId) -> Result<Box<dyn RecoverySurface>, RegistryError> {
        self.factories
            .get(id)
            .map(|factory| factory())
            .ok_or_else(|| RegistryError::ResolutionMiss(id.clone()))
    }

    pub fn contains(&self, id: &SurfaceId) -> bool {
        self.factories.contains_key(id)
    }
}

impl Default for SurfaceRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl fmt::Debug for SurfaceRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SurfaceRegistry")
            .field("surfaces", &self.factories.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Built-in recovery surface that renders the diagnostic through the log.
///
/// The fallback when no embedder-provided surface is registered: the
/// diagnostic still reaches the operator even without a presentation layer.
pub struct LogRecoverySurface;

impl RecoverySurface for LogRecoverySurface {
    fn launch(&mut self, request: LaunchRequest) -> anyhow::Result<()> {
        tracing::error!(
            relaunch_target = request.relaunch_target.as_ref().map(|t| t.as_str()),
            "Unrecoverable fault:\n{}",
            request.diagnostic.text()
        );
        Ok(())
    }
}
