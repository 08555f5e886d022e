// env.rs — The identity context a request is evaluated against.
//
// An Environment is built once per request from the asserted identity and
// handed by shared reference to every probe and producer that runs for
// that request. It is never mutated and never outlives the request.
//
// Producers that render artifacts from configured strings use `expand()`
// to substitute identity fields, so one policy can serve many machines
// ("${machine.name}.conf" and the like).

use thiserror::Error;

use crate::wire::{MachineIdentity, Request, UserIdentity};

/// A template placeholder that does not name a known identity field.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown placeholder '${{{key}}}'")]
pub struct ExpandError {
    pub key: String,
}

/// The identity context (machine + user) for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Environment {
    pub machine: MachineIdentity,
    pub user: UserIdentity,
}

impl From<Request> for Environment {
    fn from(req: Request) -> Self {
        Self {
            machine: req.machine,
            user: req.user,
        }
    }
}

impl Environment {
    /// Resolve a dotted identity key to its value.
    ///
    /// Known keys: `machine.name`, `machine.address` (first asserted
    /// address), `user.name`.
    pub fn lookup(&self, key: &str) -> Option<&str> {
        match key {
            "machine.name" => Some(&self.machine.name),
            "machine.address" => self.machine.addresses.first().map(String::as_str),
            "user.name" => Some(&self.user.name),
            _ => None,
        }
    }

    /// Expand `${key}` placeholders in a template against this environment.
    ///
    /// Text outside placeholders passes through untouched. An unknown key
    /// is an error, not an empty substitution — a half-rendered artifact
    /// must never reach the caller.
    pub fn expand(&self, template: &str) -> Result<String, ExpandError> {
        let mut out = String::with_capacity(template.len());
        let mut rest = template;
        while let Some(start) = rest.find("${") {
            out.push_str(&rest[..start]);
            let after = &rest[start + 2..];
            match after.find('}') {
                Some(end) => {
                    let key = &after[..end];
                    match self.lookup(key) {
                        Some(value) => out.push_str(value),
                        None => {
                            return Err(ExpandError {
                                key: key.to_string(),
                            })
                        }
                    }
                    rest = &after[end + 1..];
                }
                None => {
                    // Unterminated placeholder: treat the remainder as text.
                    out.push_str(&rest[start..]);
                    rest = "";
                }
            }
        }
        out.push_str(rest);
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env() -> Environment {
        Environment {
            machine: MachineIdentity {
                name: "web-03".to_string(),
                addresses: vec!["10.1.2.3".to_string(), "fe80::1".to_string()],
            },
            user: UserIdentity {
                name: "deploy".to_string(),
            },
        }
    }

    #[test]
    fn lookup_known_keys() {
        let env = env();
        assert_eq!(env.lookup("machine.name"), Some("web-03"));
        assert_eq!(env.lookup("machine.address"), Some("10.1.2.3"));
        assert_eq!(env.lookup("user.name"), Some("deploy"));
        assert_eq!(env.lookup("machine.rack"), None);
    }

    #[test]
    fn expand_substitutes_placeholders() {
        let rendered = env().expand("host ${machine.name} user ${user.name}").unwrap();
        assert_eq!(rendered, "host web-03 user deploy");
    }

    #[test]
    fn expand_passes_plain_text_through() {
        assert_eq!(env().expand("no placeholders").unwrap(), "no placeholders");
    }

    #[test]
    fn expand_rejects_unknown_key() {
        let err = env().expand("${machine.rack}").unwrap_err();
        assert_eq!(err.key, "machine.rack");
    }

    #[test]
    fn expand_leaves_unterminated_placeholder_as_text() {
        assert_eq!(env().expand("tail ${machine.name").unwrap(), "tail ${machine.name");
    }

    #[test]
    fn lookup_machine_address_without_addresses() {
        let mut env = env();
        env.machine.addresses.clear();
        assert_eq!(env.lookup("machine.address"), None);
    }
}
