//! Export of finished scenes.
//!
//! Scenes are renderer-agnostic. This module holds the reference renderer
//! used by the CLI and by [`crate::DiagramBuilder::render_svg`].
//!
//! # Available Backends
//!
//! - [`svg`]: SVG text via [`svg::SvgExporter`]
//!
//! Label text is written verbatim; math typesetting is left to whatever
//! displays the output.

pub mod svg;

use protractor_core::scene::Scene;

use crate::error::ProtractorError;

/// Abstraction for scene export backends.
pub trait Exporter {
    /// Renders a scene to the backend's text format.
    ///
    /// # Errors
    ///
    /// Returns [`ProtractorError::Config`] when the style table holds an
    /// invalid color.
    fn export_scene(&self, scene: &Scene) -> Result<String, ProtractorError>;
}
