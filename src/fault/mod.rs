pub mod classify;
pub mod record;

pub use classify::{is_conflictive, BOOTSTRAP_OPERATION, BOOTSTRAP_UNIT};
pub use record::{
    DiagnosticRecord, Fault, Frame, FrameSequence, MAX_TRANSPORT_BYTES, TRUNCATION_DISCLAIMER,
};
