pub mod config;
pub mod fault;
pub mod handler;
pub mod registry;
pub mod storage;
pub mod util;

pub use config::HandlerConfig;
pub use fault::{
    is_conflictive, DiagnosticRecord, Fault, Frame, FrameSequence, BOOTSTRAP_OPERATION,
    BOOTSTRAP_UNIT, MAX_TRANSPORT_BYTES, TRUNCATION_DISCLAIMER,
};
pub use handler::{
    install, install_default, installed, report_fault, ExitTerminator, FaultHandler,
    FaultOutcome, ForegroundHandle, ProcessFaultContext, ProcessTerminator,
    TerminationReport, FAULT_EXIT_STATUS,
};
pub use registry::{
    resolve_recovery_surface, resolve_relaunch_target, CapabilityTag, DirectoryService,
    LaunchRequest, LogRecoverySurface, RecoverySurface, RegistryError, StaticDirectory,
    SurfaceId, SurfaceRegistry, DEFAULT_RECOVERY_SURFACE,
};
pub use storage::{crash_file_name, is_crash_log_name, persist};
