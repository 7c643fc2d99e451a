//! Tool registry: maps a tool name to its generator.
//!
//! Parameters arrive as untyped JSON. Each caller field is merged over the
//! generator's defaults on its own and kept only if the result still
//! deserialises, so one bad field never discards the others.

use std::sync::OnceLock;

use log::{debug, info, trace, warn};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};

use protractor_core::scene::Scene;

use crate::generate::{
    Generator,
    cartesian::CartesianGenerator,
    cuboid::CuboidGenerator,
    number_line::NumberLineGenerator,
    quadrilateral::{QuadrilateralGenerator, QuadrilateralKind},
    scatter::ScatterGenerator,
};

static GLOBAL: OnceLock<Registry> = OnceLock::new();

/// A generator with its parameter type erased.
trait Tool: Send + Sync {
    fn defaults(&self) -> Value;

    fn render(&self, name: &str, params: &Value) -> Scene;
}

impl<G: Generator> Tool for G {
    fn defaults(&self) -> Value {
        serde_json::to_value(self.default_params()).unwrap_or_else(|_| Value::Object(Map::new()))
    }

    fn render(&self, name: &str, params: &Value) -> Scene {
        let params = merge_params(name, self.default_params(), params);
        self.generate(&params)
    }
}

/// Merges caller fields over `defaults` one field at a time.
///
/// Non-object parameters count as `{}`. A field whose value does not fit the
/// parameter type is dropped and its default kept.
fn merge_params<P>(tool: &str, defaults: P, params: &Value) -> P
where
    P: Serialize + DeserializeOwned,
{
    let fields = match params {
        Value::Object(fields) => fields,
        Value::Null => return defaults,
        other => {
            warn!(tool = tool, kind = json_kind(other); "Parameters are not an object, using defaults");
            return defaults;
        }
    };

    let mut merged = match serde_json::to_value(&defaults) {
        Ok(Value::Object(merged)) => merged,
        _ => {
            warn!(tool = tool; "Defaults do not serialize to an object, ignoring parameters");
            return defaults;
        }
    };

    let mut current = defaults;
    for (key, value) in fields {
        let mut candidate = merged.clone();
        candidate.insert(key.clone(), value.clone());
        match serde_json::from_value::<P>(Value::Object(candidate.clone())) {
            Ok(parsed) => {
                trace!(tool = tool, field = key.as_str(); "Accepted parameter field");
                merged = candidate;
                current = parsed;
            }
            Err(err) => {
                warn!(
                    tool = tool,
                    field = key.as_str(),
                    err:% = err;
                    "Ignoring parameter field with the wrong type"
                );
            }
        }
    }
    current
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Named diagram tools.
pub struct Registry {
    tools: Vec<(&'static str, Box<dyn Tool>)>,
}

impl Registry {
    /// An empty registry.
    pub fn empty() -> Self {
        Self { tools: Vec::new() }
    }

    /// A registry holding every built-in tool.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register(
            "parallelogramAngles",
            QuadrilateralGenerator::new(QuadrilateralKind::Parallelogram),
        );
        registry.register(
            "rhombusAngles",
            QuadrilateralGenerator::new(QuadrilateralKind::Rhombus),
        );
        registry.register(
            "trapeziumAngles",
            QuadrilateralGenerator::new(QuadrilateralKind::Trapezium),
        );
        registry.register("numberLine", NumberLineGenerator);
        registry.register("cartesianPlane", CartesianGenerator);
        registry.register("scatterPlot", ScatterGenerator);
        registry.register("cuboid", CuboidGenerator::new());
        registry.register("tank", CuboidGenerator::tank());
        registry
    }

    /// The shared registry of built-in tools.
    pub fn global() -> &'static Registry {
        GLOBAL.get_or_init(Registry::new)
    }

    /// Adds a tool, replacing any tool registered under the same name.
    pub fn register<G: Generator + 'static>(&mut self, name: &'static str, generator: G) {
        let tool: Box<dyn Tool> = Box::new(generator);
        match self.tools.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => {
                debug!(tool = name; "Replacing registered tool");
                entry.1 = tool;
            }
            None => self.tools.push((name, tool)),
        }
    }

    pub fn tool_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.tools.iter().map(|(name, _)| *name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    /// Default parameter object of a tool.
    pub fn defaults(&self, name: &str) -> Option<Value> {
        self.find(name).map(|tool| tool.defaults())
    }

    /// Renders `name` with `params`.
    ///
    /// Unknown tools produce [`Scene::empty`].
    pub fn render(&self, name: &str, params: &Value) -> Scene {
        let Some(tool) = self.find(name) else {
            warn!(tool_name = name; "Unknown tool, returning an empty scene");
            return Scene::empty();
        };
        info!(tool_name = name; "Rendering diagram");
        let scene = tool.render(name, params);
        debug!(tool_name = name, items = scene.items().len(); "Diagram rendered");
        trace!(scene:? = scene; "Scene");
        scene
    }

    fn find(&self, name: &str) -> Option<&dyn Tool> {
        self.tools
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, tool)| tool.as_ref())
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

/// Renders `name` with the shared registry.
pub fn render(name: &str, params: &Value) -> Scene {
    Registry::global().render(name, params)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::generate::quadrilateral::QuadrilateralParams;

    #[test]
    fn test_tool_names() {
        let names: Vec<&str> = Registry::new().tool_names().collect();
        assert_eq!(
            names,
            vec![
                "parallelogramAngles",
                "rhombusAngles",
                "trapeziumAngles",
                "numberLine",
                "cartesianPlane",
                "scatterPlot",
                "cuboid",
                "tank",
            ]
        );
    }

    #[test]
    fn test_unknown_tool_is_empty() {
        let scene = Registry::new().render("hexagonAngles", &json!({}));
        assert!(scene.is_empty());
    }

    #[test]
    fn test_merge_keeps_valid_fields() {
        let params = json!({ "skewAngle": 45, "angles": "not a list" });
        let merged = merge_params("test", QuadrilateralParams::default(), &params);
        assert_eq!(merged.skew_angle, 45.0);
        assert_eq!(merged.angles, QuadrilateralParams::default().angles);
    }

    #[test]
    fn test_merge_non_object_uses_defaults() {
        for params in [json!(null), json!(3), json!([1, 2]), json!("x")] {
            let merged = merge_params("test", QuadrilateralParams::default(), &params);
            assert_eq!(merged, QuadrilateralParams::default());
        }
    }

    #[test]
    fn test_merge_null_for_required_field_keeps_default() {
        let merged = merge_params(
            "test",
            QuadrilateralParams::default(),
            &json!({ "skewAngle": null }),
        );
        assert_eq!(merged.skew_angle, QuadrilateralParams::default().skew_angle);
    }

    #[test]
    fn test_defaults() {
        let registry = Registry::new();
        let tank = registry.defaults("tank").unwrap();
        let level = tank["fillLevel"].as_f64().unwrap();
        assert!((level - 0.6).abs() < 1e-6);
        let cuboid = registry.defaults("cuboid").unwrap();
        assert_eq!(cuboid["fillLevel"], Value::Null);
        assert!(registry.defaults("missing").is_none());
    }

    #[test]
    fn test_register_replaces() {
        let mut registry = Registry::empty();
        registry.register("box", CuboidGenerator::new());
        registry.register("box", CuboidGenerator::tank());
        assert_eq!(registry.tool_names().count(), 1);
        assert!(registry.defaults("box").unwrap()["fillLevel"].is_number());
    }

    #[test]
    fn test_global_is_shared() {
        assert!(std::ptr::eq(Registry::global(), Registry::global()));
        assert!(Registry::global().contains("numberLine"));
    }
}
