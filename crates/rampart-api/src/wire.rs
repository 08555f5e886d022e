// wire.rs — Request and response bodies for /v1/harvest.

use serde::{Deserialize, Serialize};

/// The machine half of an asserted identity.
///
/// The caller asserts these fields; the transport does not authenticate
/// them. Probes decide how much to trust the assertion.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MachineIdentity {
    /// Machine name (e.g., "web-03.fra").
    pub name: String,

    /// Network addresses the machine claims to hold.
    #[serde(default)]
    pub addresses: Vec<String>,
}

/// The user half of an asserted identity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserIdentity {
    /// User name (e.g., "deploy").
    pub name: String,
}

/// A harvest request: the identity to evaluate policies against.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Request {
    pub machine: MachineIdentity,
    pub user: UserIdentity,
}

/// A work item a producer asks the caller to perform (e.g., "generate a
/// keypair"). Shape is owned by the emitting producer; transparent JSON
/// on the wire.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct Task(pub serde_json::Value);

/// An artifact a producer hands to the caller (e.g., a rendered config
/// file). Same opacity contract as [`Task`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct Product(pub serde_json::Value);

/// The aggregate output of a successful harvest.
///
/// Ordering is significant: tasks and products appear in policy-then-
/// producer declared order, exactly as the policies emitted them.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Response {
    pub tasks: Vec<Task>,
    pub products: Vec<Product>,
}

/// The failure payload. A request either gets a full [`Response`] or this;
/// never a partially filled response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    pub error: String,
}
