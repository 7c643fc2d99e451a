use std::f32::consts::PI;

use serde::Serialize;

use super::Emphasis;
use crate::geometry::{Point, Sweep, point_on_circle};

/// An arc marking the interior angle at a polygon vertex.
///
/// The arc runs from `start` to `end` by increasing angle. Built from a
/// normalized [`Sweep`], that direction always covers the interior angle,
/// so the arc never lands outside the shape.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AngleArc {
    vertex: usize,
    center: Point,
    radius: f32,
    start_angle: f32,
    end_angle: f32,
    swept: f32,
    label_anchor: Point,
    emphasis: Emphasis,
}

impl AngleArc {
    /// Creates an arc of `radius` around `center`, with its label anchor at
    /// `label_radius` on the mid-sweep direction.
    pub fn new(vertex: usize, center: Point, radius: f32, sweep: Sweep, label_radius: f32) -> Self {
        Self {
            vertex,
            center,
            radius,
            start_angle: sweep.start(),
            end_angle: sweep.end(),
            swept: sweep.swept(),
            label_anchor: point_on_circle(center, label_radius, sweep.mid_angle()),
            emphasis: Emphasis::Normal,
        }
    }

    pub fn with_emphasis(mut self, emphasis: Emphasis) -> Self {
        self.emphasis = emphasis;
        self
    }

    /// Index of the vertex the arc belongs to.
    pub fn vertex(&self) -> usize {
        self.vertex
    }

    pub fn center(&self) -> Point {
        self.center
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn start_angle(&self) -> f32 {
        self.start_angle
    }

    pub fn end_angle(&self) -> f32 {
        self.end_angle
    }

    /// Angular span in radians.
    pub fn swept(&self) -> f32 {
        self.swept
    }

    /// Where the angle's label goes: just outside the arc, inside the shape.
    pub fn label_anchor(&self) -> Point {
        self.label_anchor
    }

    pub fn emphasis(&self) -> Emphasis {
        self.emphasis
    }

    pub fn start_point(&self) -> Point {
        point_on_circle(self.center, self.radius, self.start_angle)
    }

    pub fn end_point(&self) -> Point {
        point_on_circle(self.center, self.radius, self.end_angle)
    }

    /// SVG `large-arc-flag`.
    pub fn large_arc(&self) -> bool {
        self.swept > PI
    }

    /// SVG `sweep-flag`.
    ///
    /// The arc always runs towards increasing angle, which in y-down space is
    /// SVG's positive direction.
    pub fn sweep_flag(&self) -> bool {
        true
    }

    /// SVG path data (`M … A …`) drawing the arc.
    ///
    /// # Examples
    ///
    /// ```
    /// # use protractor_core::geometry::{Point, normalize_sweep};
    /// # use protractor_core::scene::AngleArc;
    /// use std::f32::consts::FRAC_PI_2;
    ///
    /// let arc = AngleArc::new(0, Point::new(0.0, 0.0), 10.0, normalize_sweep(0.0, FRAC_PI_2), 20.0);
    /// assert_eq!(arc.path_data(), "M 10.00 0.00 A 10.00 10.00 0 0 1 0.00 10.00");
    /// ```
    pub fn path_data(&self) -> String {
        let start = self.start_point();
        let end = self.end_point();
        format!(
            "M {} {} A {} {} 0 {} {} {} {}",
            coord(start.x()),
            coord(start.y()),
            coord(self.radius),
            coord(self.radius),
            u8::from(self.large_arc()),
            u8::from(self.sweep_flag()),
            coord(end.x()),
            coord(end.y()),
        )
    }
}

/// Two-decimal coordinate text without a negative zero.
fn coord(value: f32) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    format!("{rounded:.2}")
}
