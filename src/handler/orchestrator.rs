//! Fault handler orchestration
//!
//! The top-level state machine sequencing classification, persistence,
//! recovery hand-off, foreground cleanup, and process termination. Every
//! step after classification is best-effort and swallows its own errors:
//! the one unconditional guarantee is that a non-conflictive fault reaches
//! Terminated.

use std::sync::Arc;

use crate::config::HandlerConfig;
use crate::fault::classify::is_conflictive;
use crate::fault::record::{DiagnosticRecord, Fault};
use crate::handler::context::ProcessFaultContext;
use crate::registry::directory::DirectoryService;
use crate::registry::resolve::{resolve_recovery_surface, resolve_relaunch_target};
use crate::registry::surfaces::{LaunchRequest, SurfaceId, SurfaceRegistry};
use crate::storage::sink::persist;

/// Exit status used on every path that reaches Terminated.
pub const FAULT_EXIT_STATUS: i32 = 10;

/// Seam through which the orchestrator ends the process.
pub trait ProcessTerminator: Send + Sync {
    fn terminate(&self, status: i32);
}

/// Terminator that ends the process via `std::process::exit`.
#[derive(Debug, Default)]
pub struct ExitTerminator;

impl ProcessTerminator for ExitTerminator {
    fn terminate(&self, status: i32) {
        std::process::exit(status);
    }
}

/// Handler phases, in transition order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Classifying,
    Rethrow,
    Handling,
    Terminated,
}

/// What handling a fault amounted to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FaultOutcome {
    /// Conflictive fault: recovery was not attempted and the fault must
    /// surface through the native fault-reporting path.
    Rethrow,
    /// The full handling sequence ran and termination was requested.
    Terminated(TerminationReport),
}

/// Record of what the handling sequence did before termination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerminationReport {
    /// Crash log file name, when persistence was configured and succeeded
    pub persisted_as: Option<String>,
    /// Surface the diagnostic was handed to, when a launch happened
    pub launched_surface: Option<SurfaceId>,
    /// Relaunch target offered to the surface
    pub relaunch_target: Option<SurfaceId>,
    /// Status passed to the terminator
    pub exit_status: i32,
}

/// The process's uncaught-fault handler.
pub struct FaultHandler {
    config: HandlerConfig,
    context: Arc<ProcessFaultContext>,
    directory: Box<dyn DirectoryService + Send + Sync>,
    surfaces: SurfaceRegistry,
    terminator: Box<dyn ProcessTerminator>,
}

impl FaultHandler {
    /// Handler with the built-in surface registry and real process exit
    pub fn new(config: HandlerConfig, directory: Box<dyn DirectoryService + Send + Sync>) -> Self {
        Self {
            config,
            context: Arc::new(ProcessFaultContext::new()),
            directory,
            surfaces: SurfaceRegistry::with_defaults(),
            terminator: Box::new(ExitTerminator),
        }
    }

    /// Replace the surface registry
    pub fn with_surfaces(mut self, surfaces: SurfaceRegistry) -> Self {
        self.surfaces = surfaces;
        self
    }

    /// Replace the terminator (tests use a recording mock)
    pub fn with_terminator(mut self, terminator: Box<dyn ProcessTerminator>) -> Self {
        self.terminator = terminator;
        self
    }

    /// Share a context created elsewhere (lifecycle notifications)
    pub fn with_context(mut self, context: Arc<ProcessFaultContext>) -> Self {
        self.context = context;
        self
    }

    /// The context lifecycle notifications should write to
    pub fn context(&self) -> Arc<ProcessFaultContext> {
        Arc::clone(&self.context)
    }

    /// Handle an uncaught fault.
    ///
    /// Synchronous and blocking; expected to complete in bounded time on
    /// the execution context that raised the fault. Termination is the
    /// implicit deadline.
    pub fn handle_fault(&self, fault: Fault) -> FaultOutcome {
        if !self.context.begin_handling() {
            // A second fault while one is in flight means the recovery
            // path itself is failing
            tracing::error!(
                fault = %fault,
                "Fault raised while another fault was being handled, rethrowing"
            );
            return FaultOutcome::Rethrow;
        }
        let outcome = self.run(fault);
        self.context.end_handling();
        outcome
    }

    fn run(&self, fault: Fault) -> FaultOutcome {
        let mut phase = Phase::Classifying;
        tracing::debug!(?phase, fault = %fault, "Fault arrived");

        let surface_id = match self.context.cached_recovery_surface() {
            Some(id) => id,
            None => {
                let id = resolve_recovery_surface(self.directory.as_ref());
                self.context.cache_recovery_surface(id.clone());
                id
            }
        };

        if is_conflictive(&fault, &surface_id) {
            phase = Phase::Rethrow;
            tracing::error!(
                ?phase,
                surface = %surface_id,
                "The bootstrap path or the recovery surface itself crashed, \
                 recovery will not be attempted"
            );
            return FaultOutcome::Rethrow;
        }

        phase = Phase::Handling;
        tracing::debug!(?phase, surface = %surface_id, "Fault is recoverable");

        let record = DiagnosticRecord::from_fault(&fault);

        let persisted_as = if self.config.persist_to_storage {
            persist(&record, &self.config)
        } else {
            None
        };

        let mut launched_surface = None;
        let mut relaunch_target = None;
        let launch_permitted = self.config.allow_recovery_when_backgrounded
            || !self.context.is_backgrounded();

        if self.config.launch_recovery_surface && launch_permitted {
            let diagnostic = record.truncated_for_transport();

            if self.config.allow_process_relaunch {
                relaunch_target = resolve_relaunch_target(self.directory.as_ref());
                self.context.set_relaunch_target(relaunch_target.clone());
            } else {
                // In case someone registered a target and then decided not
                // to relaunch
                self.context.clear_relaunch_target();
            }

            match self.surfaces.create(&surface_id) {
                Ok(mut surface) => {
                    let request = LaunchRequest {
                        diagnostic,
                        relaunch_target: relaunch_target.clone(),
                    };
                    match surface.launch(request) {
                        Ok(()) => launched_surface = Some(surface_id.clone()),
                        Err(e) => {
                            tracing::warn!(surface = %surface_id, error = %e, "Recovery surface launch failed");
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!(surface = %surface_id, error = %e, "Recovery surface could not be constructed");
                }
            }
        } else if self.config.launch_recovery_surface {
            tracing::debug!("Process is backgrounded, recovery surface suppressed");
        }

        phase = Phase::Terminated;
        tracing::debug!(?phase, exit_status = FAULT_EXIT_STATUS, "Terminating process");

        // Closing the stale foreground surface resolves a recursive-relaunch
        // defect where the dying surface re-triggers the handler
        self.context.close_most_recent_surface();
        self.terminator.terminate(FAULT_EXIT_STATUS);

        FaultOutcome::Terminated(TerminationReport {
            persisted_as,
            launched_surface,
            relaunch_target,
            exit_status: FAULT_EXIT_STATUS,
        })
    }
}
