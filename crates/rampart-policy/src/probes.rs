// probes.rs — Built-in verification units.
//
// A probe decides whether an asserted identity satisfies some condition.
// Ok(false) means "did not match" and is not an error; Err means the
// identity could not be evaluated at all.
//
// Contract for implementers: a probe is constructed once at startup and
// invoked concurrently by every in-flight request. It must be stateless
// or internally synchronized — the dispatcher takes no locks on its
// behalf. All option validation belongs in the constructor, not in
// verify().

use glob::Pattern;
use serde::Deserialize;

use rampart_api::Environment;
use rampart_config::RawUnitSpec;

use crate::error::{PolicyError, UnitKind};
use crate::registry::{typed_options, Registry};

/// A verification unit.
pub trait Probe: Send + Sync {
    /// Decide whether the identity passes this check.
    fn verify(&self, env: &Environment) -> Result<bool, PolicyError>;
}

/// The registry of built-in probe types.
pub fn builtin_probes() -> Registry<Box<dyn Probe>> {
    let mut registry = Registry::new(UnitKind::Probe);
    registry.register("machine-name", MachineNameProbe::construct);
    registry.register("user-name", UserNameProbe::construct);
    registry.register("machine-address", MachineAddressProbe::construct);
    registry
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct NameMatchOptions {
    /// Glob pattern the name must match (e.g., "web-*").
    #[serde(rename = "match")]
    pattern: String,
}

fn parse_pattern(tag: &str, raw: &str) -> Result<Pattern, PolicyError> {
    Pattern::new(raw).map_err(|err| PolicyError::InvalidUnitSpec {
        tag: tag.to_string(),
        reason: format!("invalid pattern '{}': {}", raw, err),
    })
}

/// `machine-name` — passes when the asserted machine name matches a glob.
struct MachineNameProbe {
    pattern: Pattern,
}

impl MachineNameProbe {
    fn construct(spec: &RawUnitSpec) -> Result<Box<dyn Probe>, PolicyError> {
        let options: NameMatchOptions = typed_options(spec)?;
        Ok(Box::new(Self {
            pattern: parse_pattern(&spec.type_tag, &options.pattern)?,
        }))
    }
}

impl Probe for MachineNameProbe {
    fn verify(&self, env: &Environment) -> Result<bool, PolicyError> {
        Ok(self.pattern.matches(&env.machine.name))
    }
}

/// `user-name` — passes when the asserted user name matches a glob.
struct UserNameProbe {
    pattern: Pattern,
}

impl UserNameProbe {
    fn construct(spec: &RawUnitSpec) -> Result<Box<dyn Probe>, PolicyError> {
        let options: NameMatchOptions = typed_options(spec)?;
        Ok(Box::new(Self {
            pattern: parse_pattern(&spec.type_tag, &options.pattern)?,
        }))
    }
}

impl Probe for UserNameProbe {
    fn verify(&self, env: &Environment) -> Result<bool, PolicyError> {
        Ok(self.pattern.matches(&env.user.name))
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct MachineAddressOptions {
    /// Address prefix at least one asserted address must carry
    /// (e.g., "10.1." or "10.1").
    network: String,
}

/// `machine-address` — passes when any asserted address starts with the
/// configured prefix. The match stops at a component boundary: "10.1"
/// covers "10.1.2.3" but not "10.10.2.3".
struct MachineAddressProbe {
    network: String,
}

impl MachineAddressProbe {
    fn construct(spec: &RawUnitSpec) -> Result<Box<dyn Probe>, PolicyError> {
        let options: MachineAddressOptions = typed_options(spec)?;
        if options.network.is_empty() {
            return Err(PolicyError::InvalidUnitSpec {
                tag: spec.type_tag.clone(),
                reason: "network prefix must be non-empty".to_string(),
            });
        }
        Ok(Box::new(Self {
            network: options.network,
        }))
    }
}

impl Probe for MachineAddressProbe {
    fn verify(&self, env: &Environment) -> Result<bool, PolicyError> {
        Ok(env
            .machine
            .addresses
            .iter()
            .any(|addr| address_in_network(addr, &self.network)))
    }
}

/// Prefix match that ends on a component boundary, so "10.1" does not
/// leak into "10.10.0.0/16".
fn address_in_network(addr: &str, network: &str) -> bool {
    match addr.strip_prefix(network) {
        Some(rest) => {
            rest.is_empty()
                || network.ends_with('.')
                || network.ends_with(':')
                || rest.starts_with('.')
                || rest.starts_with(':')
        }
        None => false,
    }
}
