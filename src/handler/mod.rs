pub mod context;
pub mod hook;
pub mod mock;
pub mod orchestrator;

pub use context::{ForegroundHandle, ProcessFaultContext};
pub use hook::{install, install_default, installed, report_fault};
pub use orchestrator::{
    ExitTerminator, FaultHandler, FaultOutcome, ProcessTerminator, TerminationReport,
    FAULT_EXIT_STATUS,
};
