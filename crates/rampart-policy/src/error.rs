// error.rs — Error taxonomy for the policy engine.
//
// Startup errors (unknown tag, invalid spec, and their Compile wrapper)
// are fatal for the process. Verify/Produce errors are raised at request
// time and are terminal for that request only.

use thiserror::Error;

/// Which registry a unit belongs to. Used in error text so an unknown tag
/// names the registry it was missing from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitKind {
    Probe,
    Producer,
}

impl std::fmt::Display for UnitKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnitKind::Probe => write!(f, "probe"),
            UnitKind::Producer => write!(f, "producer"),
        }
    }
}

/// Errors raised by policy compilation and harvest dispatch.
#[derive(Debug, Error)]
pub enum PolicyError {
    /// A unit description names a type tag no constructor is registered for.
    #[error("unknown {kind} type '{tag}'")]
    UnknownUnitType { kind: UnitKind, tag: String },

    /// A unit constructor rejected its options (missing field, invalid
    /// value, malformed pattern).
    #[error("invalid spec for unit type '{tag}': {reason}")]
    InvalidUnitSpec { tag: String, reason: String },

    /// Wraps the first construction failure with the policy it occurred in.
    /// Compilation aborts on this error; nothing after it is compiled.
    #[error("policy '{policy}': {source}")]
    Compile {
        policy: String,
        #[source]
        source: Box<PolicyError>,
    },

    /// A probe could not evaluate the identity at request time. Distinct
    /// from a probe returning "did not match".
    #[error("probe '{tag}' failed: {reason}")]
    Verify { tag: String, reason: String },

    /// A producer failed while generating output at request time.
    #[error("producer '{tag}' failed: {reason}")]
    Produce { tag: String, reason: String },
}
