//! # rampart-policy
//!
//! The policy compilation and harvest dispatch engine.
//!
//! At startup, raw policy descriptions from `rampart-config` are compiled
//! once: every listed unit is resolved through a [`Registry`] into a live
//! [`Probe`] or [`Producer`]. Compilation is fail-fast and atomic — the
//! server either starts with a fully compiled policy set or not at all.
//!
//! At request time, [`harvest`] runs one identity through the compiled
//! policies: probes gate each policy, producers of passing policies emit
//! tasks and products in declared order, and the first failure anywhere
//! aborts the request with an error instead of a partial response.
//!
//! ## Key invariants
//!
//! - **Immutable after compile**: the compiled `Vec<Policy>` is shared
//!   read-only across all concurrent requests for the process lifetime.
//!   Reconfiguration means a restart.
//! - **No partial responses**: a caller sees either the full aggregate or
//!   an error, never output from a prefix of the producers.
//! - **Lock-free dispatch**: the dispatcher takes no locks; every unit
//!   implementation must be safe for concurrent invocation (stateless or
//!   internally synchronized).

pub mod compiler;
pub mod dispatch;
pub mod error;
pub mod probes;
pub mod producers;
pub mod registry;

pub use compiler::{compile, Policy};
pub use dispatch::harvest;
pub use error::{PolicyError, UnitKind};
pub use probes::{builtin_probes, Probe};
pub use producers::{builtin_producers, Emitted, Producer};
pub use registry::Registry;
