//! # rampart-api
//!
//! Wire types for the Rampart harvest protocol, plus the per-request
//! [`Environment`] that probes and producers are evaluated against.
//!
//! A harvest request asserts an identity (machine + user). The server runs
//! that identity through its compiled policies and replies with the
//! aggregate of everything the policies produced: an ordered list of
//! [`Task`]s for the caller to perform and [`Product`]s for it to install.
//!
//! ## Key invariants
//!
//! - **Opaque artifacts**: the internal shape of a task or product is owned
//!   by the producer that emitted it. Nothing in this crate (or in the
//!   dispatch core) inspects them.
//! - **Per-request environment**: an [`Environment`] is built fresh from
//!   each request and never shared or mutated across requests.

pub mod env;
pub mod wire;

pub use env::{Environment, ExpandError};
pub use wire::{ErrorBody, MachineIdentity, Product, Request, Response, Task, UserIdentity};
