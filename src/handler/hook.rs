//! Process-wide handler registration
//!
//! Installs a [`FaultHandler`] as the process's default fault handler and
//! chains it into the std panic hook. Installed once at process start; the
//! registration persists until process exit.

use std::sync::OnceLock;

use crate::config::HandlerConfig;
use crate::fault::record::Fault;
use crate::handler::orchestrator::{FaultHandler, FaultOutcome};
use crate::util::paths::config_path;

static HANDLER: OnceLock<FaultHandler> = OnceLock::new();

/// Install `handler` as the process's fault handler.
///
/// Must be called before any fault can be expected to reach it. The
/// previous panic hook is kept and invoked whenever the handler decides a
/// fault must surface through the native path. A second install is logged
/// and ignored.
pub fn install(handler: FaultHandler) {
    if HANDLER.set(handler).is_err() {
        tracing::debug!("Fault handler already installed");
        return;
    }

    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let Some(handler) = HANDLER.get() else {
            previous(info);
            return;
        };
        match handler.handle_fault(Fault::from_panic(info)) {
            // Conflictive: let the native panic reporting run
            FaultOutcome::Rethrow => previous(info),
            // Unreachable with the real terminator; the process is gone
            FaultOutcome::Terminated(_) => {}
        }
    }));
}

/// One-call default installation: configuration and directory entries read
/// from the config file, built-in surface registry, real process exit.
pub fn install_default() {
    let config = HandlerConfig::load();
    let directory = HandlerConfig::load_directory_from(&config_path());
    install(FaultHandler::new(config, Box::new(directory)));
}

/// The installed handler, if any
pub fn installed() -> Option<&'static FaultHandler> {
    HANDLER.get()
}

/// Entry point for embedders that raise structured faults directly instead
/// of going through the panic hook. Returns `None` when no handler is
/// installed.
pub fn report_fault(fault: Fault) -> Option<FaultOutcome> {
    match HANDLER.get() {
        Some(handler) => Some(handler.handle_fault(fault)),
        None => {
            tracing::warn!(fault = %fault, "No fault handler installed, dropping fault");
            None
        }
    }
}
