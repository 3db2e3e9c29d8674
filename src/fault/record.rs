//! Fault data model and diagnostic record rendering

use std::fmt;

/// Maximum diagnostic record size handed to a recovery surface (128 KiB - 1).
///
/// The surface launch transport has a hard message size limit; records are
/// truncated to this bound before hand-off. File persistence is not bounded.
pub const MAX_TRANSPORT_BYTES: usize = 128 * 1024 - 1;

/// Suffix appended when a record is truncated for transport.
pub const TRUNCATION_DISCLAIMER: &str = " [stack trace too large]";

/// A single call-path frame: the symbolic unit and the operation within it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Symbolic unit name (module, type, or component)
    pub unit: String,
    /// Operation name within the unit
    pub operation: String,
}

impl Frame {
    pub fn new(unit: impl Into<String>, operation: impl Into<String>) -> Self {
        Self {
            unit: unit.into(),
            operation: operation.into(),
        }
    }
}

/// Ordered call-path trace at the point a fault originated. Read-only once built.
pub type FrameSequence = Vec<Frame>;

/// An unhandled error with its causal chain.
///
/// A fault owns its description, the frame sequence at its origin, and
/// optionally the underlying cause that led to it. Immutable once raised.
#[derive(Debug, Clone)]
pub struct Fault {
    description: String,
    frames: FrameSequence,
    cause: Option<Box<Fault>>,
}

impl Fault {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            frames: Vec::new(),
            cause: None,
        }
    }

    /// Append a single origin frame
    pub fn with_frame(mut self, unit: impl Into<String>, operation: impl Into<String>) -> Self {
        self.frames.push(Frame::new(unit, operation));
        self
    }

    /// Replace the origin frame sequence
    pub fn with_frames(mut self, frames: FrameSequence) -> Self {
        self.frames = frames;
        self
    }

    /// Attach the underlying cause
    pub fn caused_by(mut self, cause: Fault) -> Self {
        self.cause = Some(Box::new(cause));
        self
    }

    /// Adapt a std panic into a fault.
    ///
    /// Panics carry no symbolic frames, so the source location is folded
    /// into the description and the frame sequence is left empty.
    pub fn from_panic(info: &std::panic::PanicHookInfo<'_>) -> Self {
        let message = if let Some(s) = info.payload().downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "unknown panic payload".to_string()
        };

        let description = match info.location() {
            Some(loc) => format!("panic at {}:{}:{}: {message}", loc.file(), loc.line(), loc.column()),
            None => format!("panic: {message}"),
        };

        Fault::new(description)
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// Iterate the causal chain: this fault first, then each cause in order
    pub fn chain(&self) -> Chain<'_> {
        Chain { next: Some(self) }
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.description)
    }
}

impl std::error::Error for Fault {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.cause
            .as_deref()
            .map(|cause| cause as &(dyn std::error::Error + 'static))
    }
}

/// Iterator over a fault's causal chain
pub struct Chain<'a> {
    next: Option<&'a Fault>,
}

impl<'a> Iterator for Chain<'a> {
    type Item = &'a Fault;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.cause.as_deref();
        Some(current)
    }
}

/// Serialized textual representation of a fault and its full causal chain.
///
/// Created once per fault, never mutated after creation. Truncation for
/// transport produces a new record and is the orchestrator's call to make.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticRecord {
    text: String,
}

impl DiagnosticRecord {
    /// Render a fault and each underlying cause, in order, as the error
    /// description followed by its `at unit.operation` lines.
    pub fn from_fault(fault: &Fault) -> Self {
        let mut text = String::new();
        for (index, element) in fault.chain().enumerate() {
            if index > 0 {
                text.push_str("Caused by: ");
            }
            text.push_str(element.description());
            text.push('\n');
            for frame in element.frames() {
                text.push_str("    at ");
                text.push_str(&frame.unit);
                text.push('.');
                text.push_str(&frame.operation);
                text.push('\n');
            }
        }
        Self { text }
    }

    /// Wrap an already-rendered record
    pub fn from_text(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Bound the record to [`MAX_TRANSPORT_BYTES`] for surface hand-off.
    ///
    /// Records at or under the bound come back unchanged, so the operation
    /// is idempotent. Longer records are cut (never inside a code point)
    /// and the disclaimer suffix is appended; the result never exceeds the
    /// bound and hits it exactly for single-byte content.
    pub fn truncated_for_transport(&self) -> DiagnosticRecord {
        if self.text.len() <= MAX_TRANSPORT_BYTES {
            return self.clone();
        }

        let mut cut = MAX_TRANSPORT_BYTES - TRUNCATION_DISCLAIMER.len();
        while !self.text.is_char_boundary(cut) {
            cut -= 1;
        }

        let mut text = String::with_capacity(cut + TRUNCATION_DISCLAIMER.len());
        text.push_str(&self.text[..cut]);
        text.push_str(TRUNCATION_DISCLAIMER);
        DiagnosticRecord { text }
    }
}
