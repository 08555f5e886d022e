// producers.rs — Built-in production units.
//
// A producer turns an identity into artifacts: tasks the caller should
// perform and products it should install. The dispatcher never looks
// inside either.
//
// Same concurrency contract as probes: constructed once, invoked by many
// requests at once, no per-call mutable state without internal
// synchronization. A producer must not mutate the environment.

use serde::Deserialize;

use rampart_api::{Environment, Product, Task};
use rampart_config::RawUnitSpec;

use crate::error::{PolicyError, UnitKind};
use crate::registry::{typed_options, Registry};

/// What one producer invocation emitted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Emitted {
    pub tasks: Vec<Task>,
    pub products: Vec<Product>,
}

/// A production unit.
pub trait Producer: Send + Sync {
    /// Generate output for the identity.
    fn produce(&self, env: &Environment) -> Result<Emitted, PolicyError>;
}

/// The registry of built-in producer types.
pub fn builtin_producers() -> Registry<Box<dyn Producer>> {
    let mut registry = Registry::new(UnitKind::Producer);
    registry.register("static", StaticProducer::construct);
    registry.register("template", TemplateProducer::construct);
    registry
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct StaticOptions {
    #[serde(default)]
    tasks: Vec<serde_json::Value>,
    #[serde(default)]
    products: Vec<serde_json::Value>,
}

/// `static` — emits configured tasks and products verbatim, identity
/// independent.
struct StaticProducer {
    tasks: Vec<Task>,
    products: Vec<Product>,
}

impl StaticProducer {
    fn construct(spec: &RawUnitSpec) -> Result<Box<dyn Producer>, PolicyError> {
        let options: StaticOptions = typed_options(spec)?;
        Ok(Box::new(Self {
            tasks: options.tasks.into_iter().map(Task).collect(),
            products: options.products.into_iter().map(Product).collect(),
        }))
    }
}

impl Producer for StaticProducer {
    fn produce(&self, _env: &Environment) -> Result<Emitted, PolicyError> {
        Ok(Emitted {
            tasks: self.tasks.clone(),
            products: self.products.clone(),
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TemplateOptions {
    products: Vec<TemplateProduct>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TemplateProduct {
    /// Product name; may contain `${...}` placeholders.
    name: String,
    /// Product payload; may contain `${...}` placeholders.
    data: String,
}

/// `template` — renders configured products against the identity,
/// expanding `${machine.name}`-style placeholders in name and data.
struct TemplateProducer {
    products: Vec<TemplateProduct>,
}

impl TemplateProducer {
    fn construct(spec: &RawUnitSpec) -> Result<Box<dyn Producer>, PolicyError> {
        let options: TemplateOptions = typed_options(spec)?;
        Ok(Box::new(Self {
            products: options.products,
        }))
    }

    fn render(&self, env: &Environment, template: &str) -> Result<String, PolicyError> {
        env.expand(template).map_err(|err| PolicyError::Produce {
            tag: "template".to_string(),
            reason: err.to_string(),
        })
    }
}

impl Producer for TemplateProducer {
    fn produce(&self, env: &Environment) -> Result<Emitted, PolicyError> {
        let mut products = Vec::with_capacity(self.products.len());
        for product in &self.products {
            products.push(Product(serde_json::json!({
                "name": self.render(env, &product.name)?,
                "data": self.render(env, &product.data)?,
            })));
        }
        Ok(Emitted {
            tasks: Vec::new(),
            products,
        })
    }
}
