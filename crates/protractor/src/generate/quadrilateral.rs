//! Quadrilateral-with-angles diagrams.
//!
//! Parallelograms, rhombuses and trapeziums share one skeleton: a base of
//! fixed width with a top side lifted by a fixed height and shifted by a
//! skew. Each vertex can carry an interior-angle arc with a label, and sides
//! can carry parallel arrows or equal-side ticks in textbook notation.
//!
//! Vertices are numbered from the bottom-left corner:
//!
//! ```text
//!        3 ──────── 2
//!       /          /
//!      /          /
//!     0 ──────── 1
//! ```
//!
//! Side `i` joins vertex `i` to vertex `(i + 1) % 4`, so side 0 is the base,
//! side 2 the top and sides 1 and 3 the legs.
//!
//! A diamond rhombus stands on a corner instead, numbered top, right, bottom,
//! left:
//!
//! ```text
//!         0
//!        / \
//!     3 <   > 1
//!        \ /
//!         2
//! ```

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use protractor_core::{
    geometry::{Bounds, Point, Size, angle_to, normalize_sweep},
    scene::{
        AngleArc, Circle, Emphasis, Fill, Label, LabelRole, Marker, Polygon, Primitive, Scene,
        SceneBuilder, SceneLayer, TextAnchor,
    },
};

use super::{Generator, non_blank, number_or};

/// Logical viewport of every quadrilateral diagram.
pub const VIEWPORT: Size = Size::new(600.0, 360.0);
/// Base width of the skeleton.
pub const BASE_WIDTH: f32 = 180.0;
/// Height of the skeleton.
pub const BASE_HEIGHT: f32 = 100.0;
/// Radius of angle arcs.
pub const ARC_RADIUS: f32 = 30.0;
/// Extra radius at which angle labels sit beyond their arc.
pub const LABEL_OFFSET: f32 = 16.0;
/// Distance of vertex labels from their vertex, away from the centroid.
pub const VERTEX_LABEL_OFFSET: f32 = 22.0;

/// y coordinate of the base.
const BASE_Y: f32 = 230.0;
/// Clear margin kept between the figure and the viewport edge.
const FIT_PADDING: f32 = 40.0;
const VERTEX_DOT_RADIUS: f32 = 3.0;
const MIN_SKEW_DEGREES: f32 = 15.0;
const MAX_SKEW_DEGREES: f32 = 75.0;
const DEFAULT_SKEW_DEGREES: f32 = 30.0;
const DEFAULT_TOP_RATIO: f32 = 0.6;
const MIN_TOP_RATIO: f32 = 0.05;
const MAX_TOP_RATIO: f32 = 0.95;
/// Side length of the diamond rhombus.
const DIAMOND_SIDE: f32 = 135.0;
/// Share of the base overhang that a non-isosceles trapezium puts on its
/// left; the rest goes to the right.
const SCALENE_LEFT_SHARE: f32 = 0.2;
/// Distance of an angle-sum note from the middle of its leg.
const ANGLE_SUM_OFFSET: f32 = 18.0;
/// Arrows move off the midpoint to this fraction of the side when the side
/// also carries ticks.
const SHARED_ARROW_POSITION: f32 = 0.7;

/// The quadrilateral family member being drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuadrilateralKind {
    Parallelogram,
    Rhombus,
    Trapezium,
}

impl QuadrilateralKind {
    /// Side pairs that carry parallel arrows, with their arrow count.
    fn parallel_pairs(self) -> &'static [(usize, usize, u8)] {
        match self {
            Self::Parallelogram | Self::Rhombus => &[(0, 2, 1), (1, 3, 2)],
            Self::Trapezium => &[(0, 2, 1)],
        }
    }

    /// Tick count per side, zero for unmarked sides.
    fn tick_counts(self) -> [u8; 4] {
        match self {
            Self::Parallelogram => [1, 2, 1, 2],
            Self::Rhombus => [1, 1, 1, 1],
            Self::Trapezium => [0, 1, 0, 1],
        }
    }
}

/// Legs of a trapezium as (side, top vertex, bottom vertex).
const TRAPEZIUM_LEGS: [(usize, usize, usize); 2] = [(3, 3, 0), (1, 2, 1)];

/// How a rhombus sits on the page.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// The skewed skeleton as-is
    #[default]
    Tilted,
    /// Standing on a corner with axis-aligned diagonals
    Diamond,
}

/// Parameters of a quadrilateral diagram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct QuadrilateralParams {
    /// Labels of vertices 0 to 3.
    pub vertex_labels: Vec<String>,
    /// Angle label per vertex; `None` draws no arc at that vertex.
    pub angles: Vec<Option<String>>,
    /// Vertices whose angle is emphasised. Indices outside 0..=3 are ignored.
    pub highlight_angles: Vec<i64>,
    pub show_parallel_markers: bool,
    pub show_equal_side_markers: bool,
    /// Skew of the legs in degrees, clamped to 15..=75.
    pub skew_angle: f32,
    pub orientation: Orientation,
    /// Length of the top side relative to the base, trapezium only.
    pub top_side_ratio: f32,
    /// Equal legs with the top side centred, trapezium only.
    pub is_isosceles: bool,
    /// Notes that the angles along each leg add up to 180°, trapezium only.
    pub show_angle_sum_annotation: bool,
    pub caption: Option<String>,
}

impl Default for QuadrilateralParams {
    fn default() -> Self {
        Self {
            vertex_labels: ["A", "B", "C", "D"].map(String::from).to_vec(),
            angles: vec![None; 4],
            highlight_angles: Vec::new(),
            show_parallel_markers: true,
            show_equal_side_markers: false,
            skew_angle: DEFAULT_SKEW_DEGREES,
            orientation: Orientation::Tilted,
            top_side_ratio: DEFAULT_TOP_RATIO,
            is_isosceles: false,
            show_angle_sum_annotation: false,
            caption: None,
        }
    }
}

/// A placed vertex.
#[derive(Debug, Clone, PartialEq)]
pub struct Vertex {
    pub index: usize,
    pub position: Point,
    pub label: Option<String>,
}

/// Generator for the parallelogram, rhombus and trapezium tools.
#[derive(Debug, Clone, Copy)]
pub struct QuadrilateralGenerator {
    kind: QuadrilateralKind,
}

impl QuadrilateralGenerator {
    pub fn new(kind: QuadrilateralKind) -> Self {
        Self { kind }
    }

    pub fn kind(&self) -> QuadrilateralKind {
        self.kind
    }

    /// Final on-screen positions of vertices 0 to 3.
    pub fn vertex_positions(&self, params: &QuadrilateralParams) -> [Point; 4] {
        let skeleton = match (self.kind, params.orientation) {
            (QuadrilateralKind::Trapezium, _) => {
                let ratio = number_or(params.top_side_ratio, DEFAULT_TOP_RATIO)
                    .clamp(MIN_TOP_RATIO, MAX_TOP_RATIO);
                trapezium_skeleton(ratio, params.is_isosceles)
            }
            (QuadrilateralKind::Rhombus, Orientation::Diamond) => {
                diamond_skeleton(clamped_skew(params))
            }
            _ => parallelogram_skeleton(clamped_skew(params)),
        };
        fit_to_viewport(skeleton)
    }

    /// Tick count per side for these parameters.
    fn tick_counts(&self, params: &QuadrilateralParams) -> [u8; 4] {
        if !params.show_equal_side_markers {
            return [0; 4];
        }
        if self.kind == QuadrilateralKind::Trapezium && !params.is_isosceles {
            debug!("Trapezium is not isosceles, no equal sides to mark");
            return [0; 4];
        }
        self.kind.tick_counts()
    }

    /// Notes `top + bottom = 180°` beside each trapezium leg.
    fn push_angle_sums(
        &self,
        builder: &mut SceneBuilder,
        positions: &[Point; 4],
        params: &QuadrilateralParams,
    ) {
        let center = centroid(positions);
        let angle = |i: usize| params.angles.get(i).and_then(|a| non_blank(a.as_deref()));
        for (side, top, bottom) in TRAPEZIUM_LEGS {
            let (from, to) = (positions[side], positions[(side + 1) % 4]);
            let midpoint = from.midpoint(to);
            let mut normal = to.sub_point(from).unit().perpendicular();
            if normal.dot(midpoint.sub_point(center)) < 0.0 {
                normal = normal.scale(-1.0);
            }
            let text = match (angle(top), angle(bottom)) {
                (Some(a), Some(b)) => format!("{a} + {b} = 180°"),
                _ => "180°".to_string(),
            };
            let anchor = if normal.x() < 0.0 {
                TextAnchor::End
            } else {
                TextAnchor::Start
            };
            builder.push(
                SceneLayer::Label,
                Primitive::Label(
                    Label::new(midpoint.add_point(normal.scale(ANGLE_SUM_OFFSET)), text)
                        .with_anchor(anchor)
                        .with_emphasis(Emphasis::Highlighted),
                ),
            );
        }
    }

    /// Vertices with their labels; missing labels are blank, extras dropped.
    pub fn vertices(&self, params: &QuadrilateralParams) -> [Vertex; 4] {
        let positions = self.vertex_positions(params);
        std::array::from_fn(|index| Vertex {
            index,
            position: positions[index],
            label: non_blank(params.vertex_labels.get(index).map(String::as_str))
                .map(str::to_string),
        })
    }

    fn push_angles(
        &self,
        builder: &mut SceneBuilder,
        positions: &[Point; 4],
        params: &QuadrilateralParams,
    ) {
        for (i, &vertex) in positions.iter().enumerate() {
            let Some(Some(text)) = params.angles.get(i) else {
                continue;
            };
            let prev = positions[(i + 3) % 4];
            let next = positions[(i + 1) % 4];
            let sweep = normalize_sweep(angle_to(vertex, prev), angle_to(vertex, next));
            if sweep.is_degenerate() {
                debug!(vertex = i; "Skipping degenerate angle arc");
                continue;
            }

            let emphasis = Emphasis::from_flag(is_highlighted(params, i));
            let arc = AngleArc::new(i, vertex, ARC_RADIUS, sweep, ARC_RADIUS + LABEL_OFFSET)
                .with_emphasis(emphasis);
            builder.push(SceneLayer::Annotation, Primitive::Arc(arc));

            if let Some(text) = non_blank(Some(text.as_str())) {
                builder.push(
                    SceneLayer::Label,
                    Primitive::Label(
                        Label::new(arc.label_anchor(), text)
                            .with_role(LabelRole::Angle)
                            .with_emphasis(emphasis),
                    ),
                );
            }
        }
    }

    fn push_markers(
        &self,
        builder: &mut SceneBuilder,
        positions: &[Point; 4],
        params: &QuadrilateralParams,
    ) {
        let side = |i: usize| (positions[i], positions[(i + 1) % 4]);
        let ticks = self.tick_counts(params);

        if params.show_parallel_markers {
            for &(first, second, multiplicity) in self.kind.parallel_pairs() {
                let (a, b) = side(first);
                let reference = b.sub_point(a).unit();
                for index in [first, second] {
                    let (from, to) = side(index);
                    let mut direction = to.sub_point(from).unit();
                    if direction.dot(reference) < 0.0 {
                        direction = direction.scale(-1.0);
                    }
                    let position = if ticks[index] > 0 {
                        SHARED_ARROW_POSITION
                    } else {
                        0.5
                    };
                    // Arrow position is measured along the shared direction.
                    let anchor = if to.sub_point(from).dot(direction) >= 0.0 {
                        from.lerp(to, position)
                    } else {
                        to.lerp(from, position)
                    };
                    builder.push(
                        SceneLayer::Marker,
                        Primitive::Marker(Marker::arrow(index, anchor, direction, multiplicity)),
                    );
                }
            }
        }

        for (index, &count) in ticks.iter().enumerate() {
            if count == 0 {
                continue;
            }
            let (from, to) = side(index);
            builder.push(
                SceneLayer::Marker,
                Primitive::Marker(Marker::tick(index, from.midpoint(to), to.sub_point(from), count)),
            );
        }
    }
}

impl Generator for QuadrilateralGenerator {
    type Params = QuadrilateralParams;

    fn default_params(&self) -> QuadrilateralParams {
        QuadrilateralParams {
            show_equal_side_markers: self.kind == QuadrilateralKind::Rhombus,
            ..QuadrilateralParams::default()
        }
    }

    fn generate(&self, params: &QuadrilateralParams) -> Scene {
        let vertices = self.vertices(params);
        let positions = vertices.clone().map(|v| v.position);
        trace!(kind:? = self.kind, positions:? = positions; "Quadrilateral laid out");

        let mut builder = SceneBuilder::new(VIEWPORT);
        builder.set_caption(params.caption.clone());

        builder.push(
            SceneLayer::Shape,
            Primitive::Polygon(Polygon::new(positions.to_vec()).with_fill(Fill::Face)),
        );

        self.push_angles(&mut builder, &positions, params);
        self.push_markers(&mut builder, &positions, params);
        if self.kind == QuadrilateralKind::Trapezium && params.show_angle_sum_annotation {
            self.push_angle_sums(&mut builder, &positions, params);
        }

        let center = centroid(&positions);
        for vertex in vertices {
            let emphasis = Emphasis::from_flag(is_highlighted(params, vertex.index));
            builder.push(
                SceneLayer::Point,
                Primitive::Circle(
                    Circle::new(vertex.position, VERTEX_DOT_RADIUS, true).with_emphasis(emphasis),
                ),
            );

            let Some(text) = vertex.label else {
                continue;
            };
            let outward = vertex.position.sub_point(center).unit();
            builder.push(
                SceneLayer::Label,
                Primitive::Label(
                    Label::new(
                        vertex.position.add_point(outward.scale(VERTEX_LABEL_OFFSET)),
                        text,
                    )
                    .with_role(LabelRole::Vertex),
                ),
            );
        }

        builder.build()
    }
}

fn is_highlighted(params: &QuadrilateralParams, index: usize) -> bool {
    params
        .highlight_angles
        .iter()
        .any(|&i| usize::try_from(i).is_ok_and(|i| i == index))
}

/// Requested skew clamped to the legal range, in radians.
fn clamped_skew(params: &QuadrilateralParams) -> f32 {
    let skew = number_or(params.skew_angle, DEFAULT_SKEW_DEGREES)
        .clamp(MIN_SKEW_DEGREES, MAX_SKEW_DEGREES);
    if skew != params.skew_angle {
        debug!(requested = params.skew_angle, used = skew; "Skew angle clamped");
    }
    skew.to_radians()
}

/// Parallelogram skeleton for a skew in radians, centred horizontally.
fn parallelogram_skeleton(skew: f32) -> [Point; 4] {
    let shift = BASE_HEIGHT * skew.tan();
    let x0 = (VIEWPORT.width() - BASE_WIDTH - shift) / 2.0;
    [
        Point::new(x0, BASE_Y),
        Point::new(x0 + BASE_WIDTH, BASE_Y),
        Point::new(x0 + BASE_WIDTH + shift, BASE_Y - BASE_HEIGHT),
        Point::new(x0 + shift, BASE_Y - BASE_HEIGHT),
    ]
}

/// Trapezium skeleton with a top side `ratio` times the base.
///
/// An isosceles top is centred over the base; otherwise most of the overhang
/// goes to the right, giving legs of different slopes.
fn trapezium_skeleton(ratio: f32, isosceles: bool) -> [Point; 4] {
    let x0 = (VIEWPORT.width() - BASE_WIDTH) / 2.0;
    let overhang = BASE_WIDTH * (1.0 - ratio);
    let left = if isosceles {
        overhang / 2.0
    } else {
        overhang * SCALENE_LEFT_SHARE
    };
    let right = overhang - left;
    [
        Point::new(x0, BASE_Y),
        Point::new(x0 + BASE_WIDTH, BASE_Y),
        Point::new(x0 + BASE_WIDTH - right, BASE_Y - BASE_HEIGHT),
        Point::new(x0 + left, BASE_Y - BASE_HEIGHT),
    ]
}

/// Rhombus standing on a corner, vertices top, right, bottom, left.
///
/// All four sides are `DIAMOND_SIDE` long, so the diagonals are perpendicular
/// and lie along the axes. The top and bottom angles equal the acute angle of
/// the tilted skeleton for the same skew.
fn diamond_skeleton(skew: f32) -> [Point; 4] {
    let half_apex = (std::f32::consts::FRAC_PI_2 - skew) / 2.0;
    let half_width = DIAMOND_SIDE * half_apex.sin();
    let half_height = DIAMOND_SIDE * half_apex.cos();
    let center = Point::new(VIEWPORT.width() / 2.0, BASE_Y - BASE_HEIGHT / 2.0);
    [
        Point::new(center.x(), center.y() - half_height),
        Point::new(center.x() + half_width, center.y()),
        Point::new(center.x(), center.y() + half_height),
        Point::new(center.x() - half_width, center.y()),
    ]
}

fn centroid(points: &[Point; 4]) -> Point {
    points
        .iter()
        .fold(Point::default(), |acc, p| acc.add_point(*p))
        .scale(0.25)
}

/// Shrinks the figure about the viewport centre if it overflows the padded
/// viewport; a figure that fits is left untouched.
fn fit_to_viewport(points: [Point; 4]) -> [Point; 4] {
    let Some(bounds) = Bounds::from_points(points) else {
        return points;
    };
    let available_width = VIEWPORT.width() - 2.0 * FIT_PADDING;
    let available_height = VIEWPORT.height() - 2.0 * FIT_PADDING;
    if bounds.width() <= available_width && bounds.height() <= available_height {
        return points;
    }

    let factor = (available_width / bounds.width()).min(available_height / bounds.height());
    let figure_center = bounds.center();
    let viewport_center = Point::new(VIEWPORT.width() / 2.0, VIEWPORT.height() / 2.0);
    debug!(factor = factor; "Scaling quadrilateral to fit viewport");
    points.map(|p| viewport_center.add_point(p.sub_point(figure_center).scale(factor)))
}


#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use super::*;

    // ===================
    // Strategies
    // ===================

    fn kind_strategy() -> impl Strategy<Value = QuadrilateralKind> {
        prop_oneof![
            Just(QuadrilateralKind::Parallelogram),
            Just(QuadrilateralKind::Rhombus),
            Just(QuadrilateralKind::Trapezium),
        ]
    }

    fn params_strategy() -> impl Strategy<Value = QuadrilateralParams> {
        (
            -90.0f32..180.0,
            -1.0f32..2.0,
            prop_oneof![Just(Orientation::Tilted), Just(Orientation::Diamond)],
            prop::collection::vec(prop::option::of("[a-z]{0,3}"), 0..6),
            any::<bool>(),
        )
            .prop_map(
                |(skew_angle, top_side_ratio, orientation, angles, is_isosceles)| {
                    QuadrilateralParams {
                        skew_angle,
                        top_side_ratio,
                        orientation,
                        angles,
                        is_isosceles,
                        ..QuadrilateralParams::default()
                    }
                },
            )
    }

    // ===================
    // Property Test Functions
    // ===================

    fn segments_cross(a: Point, b: Point, c: Point, d: Point) -> bool {
        let ab = b.sub_point(a);
        let cd = d.sub_point(c);
        let d1 = ab.perpendicular().dot(c.sub_point(a));
        let d2 = ab.perpendicular().dot(d.sub_point(a));
        let d3 = cd.perpendicular().dot(a.sub_point(c));
        let d4 = cd.perpendicular().dot(b.sub_point(c));
        d1 * d2 < 0.0 && d3 * d4 < 0.0
    }

    /// Opposite sides never cross, so the outline is a simple quadrilateral.
    fn check_outline_is_simple(
        kind: QuadrilateralKind,
        params: QuadrilateralParams,
    ) -> Result<(), TestCaseError> {
        let p = QuadrilateralGenerator::new(kind).vertex_positions(&params);
        prop_assert!(p.iter().all(|v| v.is_finite()));
        prop_assert!(!segments_cross(p[0], p[1], p[2], p[3]));
        prop_assert!(!segments_cross(p[1], p[2], p[3], p[0]));
        Ok(())
    }

    /// Every arc's mid-direction points into the polygon.
    fn check_arcs_point_inside(
        kind: QuadrilateralKind,
        params: QuadrilateralParams,
    ) -> Result<(), TestCaseError> {
        let generator = QuadrilateralGenerator::new(kind);
        let p = generator.vertex_positions(&params);
        let center = centroid(&p);
        let scene = generator.generate(&params);
        for arc in scene.arcs() {
            prop_assert!(arc.swept() > 0.0 && arc.swept() <= std::f32::consts::PI);
            let inward = center.sub_point(arc.center());
            let bisector = arc.label_anchor().sub_point(arc.center());
            prop_assert!(inward.dot(bisector) > 0.0);
        }
        Ok(())
    }

    /// Generation is a pure function of its parameters.
    fn check_generation_is_deterministic(
        kind: QuadrilateralKind,
        params: QuadrilateralParams,
    ) -> Result<(), TestCaseError> {
        let generator = QuadrilateralGenerator::new(kind);
        prop_assert_eq!(generator.generate(&params), generator.generate(&params));
        Ok(())
    }

    /// A diamond rhombus has four equal sides for any skew.
    fn check_diamond_sides_are_equal(skew_angle: f32) -> Result<(), TestCaseError> {
        let p = QuadrilateralGenerator::new(QuadrilateralKind::Rhombus).vertex_positions(
            &QuadrilateralParams {
                orientation: Orientation::Diamond,
                skew_angle,
                ..QuadrilateralParams::default()
            },
        );
        let side = p[0].distance(p[1]);
        for i in 1..4 {
            prop_assert!((p[i].distance(p[(i + 1) % 4]) - side).abs() < 1e-3);
        }
        Ok(())
    }

    /// Dropping one angle removes only that vertex's arc.
    fn check_null_angle_only_affects_its_vertex(
        kind: QuadrilateralKind,
        params: QuadrilateralParams,
        dropped: usize,
    ) -> Result<(), TestCaseError> {
        let generator = QuadrilateralGenerator::new(kind);
        let full = QuadrilateralParams {
            angles: vec![Some("a".to_string()); 4],
            ..params
        };
        let mut partial = full.clone();
        partial.angles[dropped] = None;

        let with_all: Vec<AngleArc> = generator.generate(&full).arcs().copied().collect();
        let without: Vec<AngleArc> = generator.generate(&partial).arcs().copied().collect();
        let expected: Vec<AngleArc> = with_all
            .into_iter()
            .filter(|arc| arc.vertex() != dropped)
            .collect();
        prop_assert_eq!(without, expected);
        Ok(())
    }

    // ===================
    // Proptest Wrappers
    // ===================

    proptest! {
        #[test]
        fn outline_is_simple(kind in kind_strategy(), params in params_strategy()) {
            check_outline_is_simple(kind, params)?;
        }

        #[test]
        fn arcs_point_inside(kind in kind_strategy(), params in params_strategy()) {
            check_arcs_point_inside(kind, params)?;
        }

        #[test]
        fn generation_is_deterministic(kind in kind_strategy(), params in params_strategy()) {
            check_generation_is_deterministic(kind, params)?;
        }

        #[test]
        fn diamond_sides_are_equal(skew_angle in -90.0f32..180.0) {
            check_diamond_sides_are_equal(skew_angle)?;
        }

        #[test]
        fn null_angle_only_affects_its_vertex(
            kind in kind_strategy(),
            params in params_strategy(),
            dropped in 0usize..4,
        ) {
            check_null_angle_only_affects_its_vertex(kind, params, dropped)?;
        }
    }
}
