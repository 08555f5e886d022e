// compiler.rs — Raw policy descriptions → compiled execution plan.
//
// Runs once at startup. The first construction failure anywhere aborts
// the whole compilation and surfaces that single error, wrapped with the
// policy it occurred in: the server either starts with a fully compiled,
// self-consistent policy set or does not start at all.

use rampart_config::RawPolicy;

use crate::error::PolicyError;
use crate::probes::Probe;
use crate::producers::Producer;
use crate::registry::Registry;

/// A compiled policy: live units in declared order. Immutable once
/// constructed; shared read-only across all requests for the process
/// lifetime.
pub struct Policy {
    pub name: String,
    pub verify: Vec<Box<dyn Probe>>,
    pub produce: Vec<Box<dyn Producer>>,
}

/// Units are trait objects, so Debug shows the policy shape rather than
/// unit internals.
impl std::fmt::Debug for Policy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Policy")
            .field("name", &self.name)
            .field("verify", &self.verify.len())
            .field("produce", &self.produce.len())
            .finish()
    }
}

/// Compile raw policies against the unit registries, preserving policy
/// and unit order. Empty `verify` or `produce` lists are legal.
pub fn compile(
    raw_policies: &[RawPolicy],
    probes: &Registry<Box<dyn Probe>>,
    producers: &Registry<Box<dyn Producer>>,
) -> Result<Vec<Policy>, PolicyError> {
    let mut policies = Vec::with_capacity(raw_policies.len());
    for raw in raw_policies {
        let wrap = |source: PolicyError| PolicyError::Compile {
            policy: raw.name.clone(),
            source: Box::new(source),
        };

        let mut policy = Policy {
            name: raw.name.clone(),
            verify: Vec::with_capacity(raw.verify.len()),
            produce: Vec::with_capacity(raw.produce.len()),
        };
        for spec in &raw.verify {
            policy.verify.push(probes.construct(spec).map_err(wrap)?);
        }
        for spec in &raw.produce {
            policy.produce.push(producers.construct(spec).map_err(wrap)?);
        }

        tracing::debug!(
            policy = %policy.name,
            probes = policy.verify.len(),
            producers = policy.produce.len(),
            "compiled policy"
        );
        policies.push(policy);
    }
    Ok(policies)
}
