//! Directions and interior sweeps at a polygon vertex.
//!
//! Arc placement is the most error-prone step of diagram generation: if the
//! start and end directions are taken in the wrong order the arc ends up on
//! the outside of the shape. [`normalize_sweep`] fixes the order so the swept
//! region is always the smaller (interior) angle.

use std::f32::consts::{PI, TAU};

use log::trace;

use super::Point;

/// Sweeps narrower than this (radians) are treated as "no arc".
pub const SWEEP_EPSILON: f32 = 1e-3;

/// Direction from `from` to `to` in radians, in the range (−π, π].
///
/// # Examples
///
/// ```
/// # use protractor_core::geometry::{Point, angle_to};
/// let a = angle_to(Point::new(0.0, 0.0), Point::new(0.0, 10.0));
/// assert!((a - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
/// ```
pub fn angle_to(from: Point, to: Point) -> f32 {
    let delta = to.sub_point(from);
    let angle = delta.y().atan2(delta.x());
    // atan2 yields −π for (−x, −0.0); fold it onto the closed end of the range.
    if angle <= -PI { PI } else { angle }
}

/// `center + radius·(cos angle, sin angle)`.
pub fn point_on_circle(center: Point, radius: f32, angle: f32) -> Point {
    let (sin, cos) = angle.sin_cos();
    center.add_point(Point::new(radius * cos, radius * sin))
}

/// Ordered pair of directions whose increasing-angle sweep covers the
/// interior angle at a vertex.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sweep {
    start: f32,
    end: f32,
    swept: f32,
    swapped: bool,
}

impl Sweep {
    /// Direction the arc starts at.
    pub fn start(self) -> f32 {
        self.start
    }

    /// Direction the arc ends at.
    pub fn end(self) -> f32 {
        self.end
    }

    /// Angular span in radians, always within `[0, π]`.
    pub fn swept(self) -> f32 {
        self.swept
    }

    /// True if the input directions were exchanged to reach the interior side.
    pub fn swapped(self) -> bool {
        self.swapped
    }

    /// Direction halfway through the sweep.
    pub fn mid_angle(self) -> f32 {
        self.start + self.swept / 2.0
    }

    /// True if the sweep is too narrow to draw.
    pub fn is_degenerate(self) -> bool {
        self.swept < SWEEP_EPSILON
    }
}

/// Orders two directions from a shared vertex so that sweeping from
/// `start` by increasing angle covers at most π radians.
///
/// Non-finite input yields a zero, degenerate sweep.
///
/// # Examples
///
/// ```
/// # use protractor_core::geometry::normalize_sweep;
/// use std::f32::consts::PI;
///
/// // A quarter turn given "backwards" is flipped around.
/// let sweep = normalize_sweep(PI / 2.0, 0.0);
/// assert!(sweep.swapped());
/// assert!((sweep.swept() - PI / 2.0).abs() < 1e-6);
/// assert_eq!(sweep.start(), 0.0);
/// ```
pub fn normalize_sweep(start: f32, end: f32) -> Sweep {
    let sweep = (end - start).rem_euclid(TAU);
    if !sweep.is_finite() {
        trace!(start = start, end = end; "Non-finite sweep directions");
        return Sweep {
            start: if start.is_finite() { start } else { 0.0 },
            end: if start.is_finite() { start } else { 0.0 },
            swept: 0.0,
            swapped: false,
        };
    }

    // rem_euclid may round up to exactly TAU for tiny negative inputs.
    let sweep = if sweep >= TAU { 0.0 } else { sweep };

    if sweep > PI {
        Sweep {
            start: end,
            end: start,
            swept: TAU - sweep,
            swapped: true,
        }
    } else {
        Sweep {
            start,
            end,
            swept: sweep,
            swapped: false,
        }
    }
}
