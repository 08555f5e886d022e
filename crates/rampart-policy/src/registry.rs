// registry.rs — Type-tag to constructor mapping for pluggable units.
//
// One registry exists per unit kind (probes, producers), populated once at
// process initialization. Construction is deterministic and performs no
// I/O; all validation of a unit's options happens here, at startup, so a
// bad config can never reach request time.

use std::collections::HashMap;

use serde::de::DeserializeOwned;

use rampart_config::RawUnitSpec;

use crate::error::{PolicyError, UnitKind};

/// A unit constructor: turns a raw spec into a live unit or explains why
/// the spec is invalid.
pub type Constructor<U> = fn(&RawUnitSpec) -> Result<U, PolicyError>;

/// A fixed mapping from unit type tag to constructor.
pub struct Registry<U> {
    kind: UnitKind,
    constructors: HashMap<&'static str, Constructor<U>>,
}

impl<U> Registry<U> {
    /// Create an empty registry for the given unit kind.
    pub fn new(kind: UnitKind) -> Self {
        Self {
            kind,
            constructors: HashMap::new(),
        }
    }

    /// Register a constructor under a type tag. Last registration wins,
    /// which lets embedders shadow a built-in.
    pub fn register(&mut self, tag: &'static str, constructor: Constructor<U>) {
        self.constructors.insert(tag, constructor);
    }

    /// Resolve a raw spec through the registry.
    pub fn construct(&self, spec: &RawUnitSpec) -> Result<U, PolicyError> {
        match self.constructors.get(spec.type_tag.as_str()) {
            Some(constructor) => constructor(spec),
            None => Err(PolicyError::UnknownUnitType {
                kind: self.kind,
                tag: spec.type_tag.clone(),
            }),
        }
    }
}

/// Deserialize a spec's option fields into a unit's typed option struct.
///
/// Option structs carry `deny_unknown_fields`, so a misspelled field in
/// the config surfaces here as an `InvalidUnitSpec` at startup.
pub(crate) fn typed_options<T: DeserializeOwned>(spec: &RawUnitSpec) -> Result<T, PolicyError> {
    let mapping: serde_yaml::Mapping = spec
        .options
        .iter()
        .map(|(key, value)| (serde_yaml::Value::String(key.clone()), value.clone()))
        .collect();
    serde_yaml::from_value(serde_yaml::Value::Mapping(mapping)).map_err(|err| {
        PolicyError::InvalidUnitSpec {
            tag: spec.type_tag.clone(),
            reason: err.to_string(),
        }
    })
}
