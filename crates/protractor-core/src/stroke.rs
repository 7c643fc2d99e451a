//! Line styles for scene primitives.
//!
//! Scenes only distinguish solid from dashed lines; widths and colors are a
//! matter for the renderer. Dashed lines mark hidden edges of box diagrams
//! and dashed graph lines on coordinate planes.

use serde::{Deserialize, Serialize};

/// Defines the visual pattern of a line.
///
/// # SVG Mapping
///
/// - `Solid`: No dasharray attribute
/// - `Dashed`: "6,4"
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrokeStyle {
    /// Solid continuous line (default)
    #[default]
    Solid,
    /// Dashed line
    Dashed,
}

impl StrokeStyle {
    /// Returns the SVG dasharray value for this style, or None for solid lines
    pub fn to_svg_value(self) -> Option<&'static str> {
        match self {
            Self::Solid => None,
            Self::Dashed => Some("6,4"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stroke_style_deserializes_lowercase() {
        let style: StrokeStyle = serde_json::from_str("\"dashed\"").unwrap();
        assert_eq!(style, StrokeStyle::Dashed);
        assert!(serde_json::from_str::<StrokeStyle>("\"dotted\"").is_err());
    }

    #[test]
    fn test_stroke_style_svg_value() {
        assert_eq!(StrokeStyle::Solid.to_svg_value(), None);
        assert_eq!(StrokeStyle::Dashed.to_svg_value(), Some("6,4"));
    }

    #[test]
    fn test_stroke_style_default_is_solid() {
        assert_eq!(StrokeStyle::default(), StrokeStyle::Solid);
    }
}
