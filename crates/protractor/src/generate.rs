//! Shape generators.
//!
//! Each generator turns one typed parameter object into a [`Scene`]. They are
//! pure: no I/O, no shared state, and identical parameters always produce an
//! identical scene.
//!
//! # Overview
//!
//! - [`quadrilateral`]: parallelogram, rhombus and trapezium with angle arcs
//!   and side markers
//! - [`number_line`]: intervals and points on a number line
//! - [`cartesian`]: points, lines, curves and regions on a coordinate plane
//! - [`scatter`]: bivariate data with an optional trend line
//! - [`cuboid`]: parallel-projection box and tank diagrams
//!
//! Bad input never fails a generator. Out-of-range numbers are clamped, NaN
//! falls back to the default and elements that cannot be placed are left out.

pub mod cartesian;
pub mod cuboid;
pub mod number_line;
pub mod quadrilateral;
pub mod scatter;

mod plot;

use serde::{Deserialize, Serialize, de::DeserializeOwned};

use protractor_core::scene::Scene;

/// A diagram family: typed parameters in, scene out.
pub trait Generator: Send + Sync {
    /// Parameters accepted by the generator.
    ///
    /// They must serialize back into an object so callers' fields can be
    /// merged over the defaults one at a time.
    type Params: Serialize + DeserializeOwned;

    /// Parameters used for every field the caller leaves out.
    fn default_params(&self) -> Self::Params;

    /// Builds the scene.
    fn generate(&self, params: &Self::Params) -> Scene;
}

/// How a plotted point is drawn.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointStyle {
    /// Hollow circle, for excluded values
    Open,
    /// Filled circle
    #[default]
    Closed,
    /// No circle; only the label is drawn
    #[serde(rename = "none")]
    Hidden,
}

/// Returns `value` unless it is NaN, in which case `default`.
///
/// Infinities are kept so that a later clamp maps them to the nearest bound.
pub(crate) fn number_or(value: f32, default: f32) -> f32 {
    if value.is_nan() { default } else { value }
}

/// Trims a user-supplied label, treating blank text as absent.
pub(crate) fn non_blank(text: Option<&str>) -> Option<&str> {
    text.filter(|t| !t.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_or() {
        assert_eq!(number_or(2.5, 1.0), 2.5);
        assert_eq!(number_or(f32::NAN, 1.0), 1.0);
        assert_eq!(number_or(f32::NEG_INFINITY, 1.0), f32::NEG_INFINITY);
    }

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank(Some("A")), Some("A"));
        assert_eq!(non_blank(Some("  ")), None);
        assert_eq!(non_blank(None), None);
    }
}
