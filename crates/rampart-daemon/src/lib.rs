//! # rampart-daemon
//!
//! The Rampart harvest server: loads a declarative policy configuration,
//! compiles it once (fail-fast), and serves `POST /v1/harvest` until the
//! process is stopped. Reconfiguration is a restart.

pub mod http;

pub use http::router;
