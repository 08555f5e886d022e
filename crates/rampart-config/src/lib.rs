//! # rampart-config
//!
//! Declarative server configuration: a YAML document describing which
//! policies exist, which verification and production units each policy
//! lists, and where the server listens.
//!
//! The schema is strict — an unrecognized field anywhere in the document
//! is a load-time error, never silently ignored. A typo in a policy file
//! must fail the process before it starts serving, not change behavior.
//!
//! The raw policy descriptions here are deliberately untyped beyond their
//! `type` tag: what `machine-name` or `template` means is decided by the
//! unit registries at compile time, not by this crate.
//!
//! ```yaml
//! listen: 0.0.0.0:2326
//! policies:
//!   - name: frontends
//!     verify:
//!       - type: machine-name
//!         match: "web-*"
//!     produce:
//!       - type: template
//!         products:
//!           - name: "${machine.name}.conf"
//!             data: "server_name ${machine.name};"
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("can't read config file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The document is not valid YAML or violates the schema.
    #[error("can't parse config: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Top-level server configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Address the HTTP server binds to.
    #[serde(default = "default_listen")]
    pub listen: String,

    /// Ordered policy list. Order is significant: harvest output is
    /// aggregated in this order.
    #[serde(default)]
    pub policies: Vec<RawPolicy>,
}

/// A declarative policy: a name plus ordered unit descriptions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct RawPolicy {
    pub name: String,

    /// Verification units, in evaluation order.
    #[serde(default)]
    pub verify: Vec<RawUnitSpec>,

    /// Production units, in emission order.
    #[serde(default)]
    pub produce: Vec<RawUnitSpec>,
}

/// One unit description: a `type` tag plus whatever fields that unit type
/// defines. The extra fields stay opaque here; each unit constructor
/// deserializes them into its own option struct (strictly, so unknown
/// fields still fail at startup — just one layer later).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RawUnitSpec {
    #[serde(rename = "type")]
    pub type_tag: String,

    #[serde(flatten)]
    pub options: BTreeMap<String, serde_yaml::Value>,
}

fn default_listen() -> String {
    "0.0.0.0:2326".to_string()
}

impl Config {
    /// Parse a configuration document.
    pub fn from_yaml(document: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(document)?)
    }

    /// Read and parse a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let document = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&document)
    }
}
