//! Configuration types for exporting protractor diagrams.
//!
//! Geometry is fixed by each generator; configuration only controls how a
//! finished scene is painted. All types implement [`serde::Deserialize`] so
//! they can be loaded from TOML or any other serde format.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining style and export settings.
//! - [`StyleConfig`] - Colors used by the SVG exporter.
//! - [`ExportConfig`] - Output scale and caption handling.
//!
//! # Example
//!
//! ```
//! # use protractor::config::AppConfig;
//! let config = AppConfig::default();
//! assert!(config.style().stroke_color().is_ok());
//! assert_eq!(config.export().scale(), 1.0);
//! ```

use serde::Deserialize;

use protractor_core::color::Color;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Style configuration section.
    #[serde(default)]
    style: StyleConfig,

    /// Export configuration section.
    #[serde(default)]
    export: ExportConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] from its sections.
    pub fn new(style: StyleConfig, export: ExportConfig) -> Self {
        Self { style, export }
    }

    /// Returns the style configuration.
    pub fn style(&self) -> &StyleConfig {
        &self.style
    }

    /// Returns the export configuration.
    pub fn export(&self) -> &ExportConfig {
        &self.export
    }
}

fn default_stroke_color() -> String {
    "#1f2937".to_string()
}

fn default_highlight_color() -> String {
    "#dc2626".to_string()
}

fn default_angle_color() -> String {
    "#2563eb".to_string()
}

fn default_label_color() -> String {
    "#111827".to_string()
}

fn default_fill_color() -> String {
    "#eff6ff".to_string()
}

/// Colors used when painting a scene.
///
/// Every field is a CSS color string; parsing happens when the exporter asks
/// for the color, so a bad value is reported against the field it came from.
#[derive(Debug, Clone, Deserialize)]
pub struct StyleConfig {
    #[serde(default = "default_stroke_color")]
    stroke_color: String,

    #[serde(default = "default_highlight_color")]
    highlight_color: String,

    #[serde(default = "default_angle_color")]
    angle_color: String,

    #[serde(default = "default_label_color")]
    label_color: String,

    #[serde(default = "default_fill_color")]
    fill_color: String,

    /// Optional backdrop; transparent when unset.
    #[serde(default)]
    background_color: Option<String>,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            stroke_color: default_stroke_color(),
            highlight_color: default_highlight_color(),
            angle_color: default_angle_color(),
            label_color: default_label_color(),
            fill_color: default_fill_color(),
            background_color: None,
        }
    }
}

fn parse_color(field: &str, value: &str) -> Result<Color, String> {
    Color::new(value).map_err(|err| format!("Invalid {field} in config: {err}"))
}

impl StyleConfig {
    /// Color of outlines, axes and grid lines.
    pub fn stroke_color(&self) -> Result<Color, String> {
        parse_color("stroke_color", &self.stroke_color)
    }

    /// Color of highlighted angles, vertices and points.
    pub fn highlight_color(&self) -> Result<Color, String> {
        parse_color("highlight_color", &self.highlight_color)
    }

    /// Color of angle arcs and angle labels.
    pub fn angle_color(&self) -> Result<Color, String> {
        parse_color("angle_color", &self.angle_color)
    }

    /// Color of label text.
    pub fn label_color(&self) -> Result<Color, String> {
        parse_color("label_color", &self.label_color)
    }

    /// Face color of filled figures.
    pub fn fill_color(&self) -> Result<Color, String> {
        parse_color("fill_color", &self.fill_color)
    }

    /// Returns the parsed background [`Color`], or `None` if no color is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured color string cannot be parsed
    /// into a valid [`Color`].
    pub fn background_color(&self) -> Result<Option<Color>, String> {
        self.background_color
            .as_deref()
            .map(|color| parse_color("background_color", color))
            .transpose()
    }
}

fn default_scale() -> f32 {
    1.0
}

fn default_include_caption() -> bool {
    true
}

/// Output settings for exported documents.
#[derive(Debug, Clone, Deserialize)]
pub struct ExportConfig {
    /// Pixels per logical unit.
    #[serde(default = "default_scale")]
    scale: f32,

    /// Whether the scene caption is drawn below the figure.
    #[serde(default = "default_include_caption")]
    include_caption: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            scale: default_scale(),
            include_caption: default_include_caption(),
        }
    }
}

impl ExportConfig {
    /// Creates a new [`ExportConfig`].
    pub fn new(scale: f32, include_caption: bool) -> Self {
        Self {
            scale,
            include_caption,
        }
    }

    /// Pixels per logical unit. Non-positive or non-finite values read as 1.0.
    pub fn scale(&self) -> f32 {
        if self.scale.is_finite() && self.scale > 0.0 {
            self.scale
        } else {
            default_scale()
        }
    }

    pub fn include_caption(&self) -> bool {
        self.include_caption
    }
}
