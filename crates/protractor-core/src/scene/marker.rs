use serde::Serialize;

use super::Emphasis;
use crate::geometry::Point;

/// Length of an arrowhead along the side.
const ARROW_LENGTH: f32 = 8.0;
/// Half the width of an arrowhead across the side.
const ARROW_HALF_WIDTH: f32 = 4.5;
/// Distance between consecutive arrowheads of one marker.
const ARROW_SPACING: f32 = 7.0;
/// Half the length of a tick across the side.
const TICK_HALF_LENGTH: f32 = 6.0;
/// Distance between consecutive ticks of one marker.
const TICK_SPACING: f32 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerKind {
    /// Parallel-side arrowheads
    Arrow,
    /// Equal-side ticks
    Tick,
}

/// A side annotation: one or more arrowheads or ticks centred on a side.
///
/// Multiplicity distinguishes one parallel (or equal) pair of sides from the
/// other. Marks are spread evenly along `direction` around `anchor`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Marker {
    kind: MarkerKind,
    side: usize,
    anchor: Point,
    direction: Point,
    multiplicity: u8,
    emphasis: Emphasis,
}

impl Marker {
    /// Creates parallel-side arrows on `side`, pointing along `direction`.
    pub fn arrow(side: usize, anchor: Point, direction: Point, multiplicity: u8) -> Self {
        Self::new(MarkerKind::Arrow, side, anchor, direction, multiplicity)
    }

    /// Creates equal-side ticks on `side`; `direction` runs along the side.
    pub fn tick(side: usize, anchor: Point, direction: Point, multiplicity: u8) -> Self {
        Self::new(MarkerKind::Tick, side, anchor, direction, multiplicity)
    }

    fn new(kind: MarkerKind, side: usize, anchor: Point, direction: Point, multiplicity: u8) -> Self {
        Self {
            kind,
            side,
            anchor,
            direction: direction.unit(),
            multiplicity: multiplicity.clamp(1, 3),
            emphasis: Emphasis::Normal,
        }
    }

    pub fn with_emphasis(mut self, emphasis: Emphasis) -> Self {
        self.emphasis = emphasis;
        self
    }

    pub fn kind(&self) -> MarkerKind {
        self.kind
    }

    /// Index of the side (`i` joins vertex `i` and `i + 1`).
    pub fn side(&self) -> usize {
        self.side
    }

    pub fn anchor(&self) -> Point {
        self.anchor
    }

    /// Unit vector along the side.
    pub fn direction(&self) -> Point {
        self.direction
    }

    pub fn multiplicity(&self) -> u8 {
        self.multiplicity
    }

    pub fn emphasis(&self) -> Emphasis {
        self.emphasis
    }

    /// Centres of the individual marks along the side.
    fn centers(&self, spacing: f32) -> impl Iterator<Item = Point> + '_ {
        let n = self.multiplicity;
        let first = -(f32::from(n) - 1.0) / 2.0;
        (0..n).map(move |i| {
            let offset = (first + f32::from(i)) * spacing;
            self.anchor.add_point(self.direction.scale(offset))
        })
    }

    /// Arrowhead triangles as `[wing, tip, wing]`. Empty for tick markers.
    pub fn arrowheads(&self) -> Vec<[Point; 3]> {
        if self.kind != MarkerKind::Arrow {
            return Vec::new();
        }
        let along = self.direction.scale(ARROW_LENGTH / 2.0);
        let across = self.direction.perpendicular().scale(ARROW_HALF_WIDTH);
        self.centers(ARROW_SPACING)
            .map(|center| {
                let tip = center.add_point(along);
                let base = center.sub_point(along);
                [base.add_point(across), tip, base.sub_point(across)]
            })
            .collect()
    }

    /// Tick segments across the side. Empty for arrow markers.
    pub fn ticks(&self) -> Vec<(Point, Point)> {
        if self.kind != MarkerKind::Tick {
            return Vec::new();
        }
        let across = self.direction.perpendicular().scale(TICK_HALF_LENGTH);
        self.centers(TICK_SPACING)
            .map(|center| (center.sub_point(across), center.add_point(across)))
            .collect()
    }
}
