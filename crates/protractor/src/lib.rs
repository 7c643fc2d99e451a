//! Protractor - parametric geometry diagrams for lesson figures.
//!
//! A diagram request names a tool and carries a JSON parameter object. The
//! registry looks up the tool's generator, merges the parameters over its
//! defaults and produces a renderer-agnostic [`scene::Scene`]. Rendering a
//! scene to SVG is a separate, optional step.
//!
//! Generating a scene never fails: bad input is clamped, defaulted or left
//! out, and an unknown tool yields an empty scene.

pub mod config;
pub mod export;
pub mod generate;
pub mod registry;

mod error;

pub use protractor_core::{color, geometry, scene, stroke};

pub use error::ProtractorError;
pub use registry::{Registry, render};

use log::{debug, info, trace};
use serde::Deserialize;
use serde_json::Value;

use config::AppConfig;
use export::{Exporter, svg::SvgExporter};
use scene::Scene;

/// A diagram request document: `{ "toolName": ..., "parameters": {...} }`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagramRequest {
    tool_name: String,
    #[serde(default)]
    parameters: Value,
}

impl DiagramRequest {
    pub fn new(tool_name: impl Into<String>, parameters: Value) -> Self {
        Self {
            tool_name: tool_name.into(),
            parameters,
        }
    }

    pub fn tool_name(&self) -> &str {
        &self.tool_name
    }

    pub fn parameters(&self) -> &Value {
        &self.parameters
    }
}

/// Builder for rendering Protractor diagrams.
///
/// # Examples
///
/// ```rust
/// use protractor::{DiagramBuilder, config::AppConfig};
/// use serde_json::json;
///
/// let builder = DiagramBuilder::new(AppConfig::default());
///
/// let scene = builder.render(
///     "parallelogramAngles",
///     &json!({ "angles": ["60°", null, null, null] }),
/// );
/// assert_eq!(scene.arcs().count(), 1);
///
/// let svg = builder.render_svg(&scene).expect("Failed to render");
/// assert!(svg.contains("<path"));
/// ```
#[derive(Default)]
pub struct DiagramBuilder {
    config: AppConfig,
}

impl DiagramBuilder {
    /// Create a new diagram builder with the given configuration.
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Renders `tool` with `params` through the shared registry.
    ///
    /// Never fails; see [`Registry::render`].
    pub fn render(&self, tool: &str, params: &Value) -> Scene {
        Registry::global().render(tool, params)
    }

    /// Parses a request document and renders it.
    ///
    /// # Errors
    ///
    /// Returns [`ProtractorError::Request`] if `source` is not a request
    /// document. Parameter problems inside a valid document never error.
    pub fn render_request(&self, source: &str) -> Result<Scene, ProtractorError> {
        info!("Parsing diagram request");
        let request: DiagramRequest = serde_json::from_str(source)
            .map_err(|err| ProtractorError::new_request_error(err, source))?;
        debug!(tool_name = request.tool_name(); "Request parsed");
        trace!(request:?; "Parsed request");

        Ok(self.render(request.tool_name(), request.parameters()))
    }

    /// Renders a scene to an SVG string.
    ///
    /// # Errors
    ///
    /// Returns [`ProtractorError::Config`] for invalid style colors.
    pub fn render_svg(&self, scene: &Scene) -> Result<String, ProtractorError> {
        let exporter = SvgExporter::new(self.config.style(), self.config.export());
        exporter.export_scene(scene)
    }
}
