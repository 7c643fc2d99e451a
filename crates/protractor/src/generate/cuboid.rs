//! Cuboids and tanks in parallel projection.
//!
//! The front face is a fixed rectangle. The back face is the front shifted by
//! a depth vector of half the depth to the right and a quarter of it up, so
//! the right side and the top are visible and the back-bottom-left vertex is
//! hidden.
//!
//! Vertices are named `A`–`D` around the front face (bottom-left,
//! bottom-right, top-right, top-left) and `E`–`H` around the back face in the
//! same order.

use log::debug;
use serde::{Deserialize, Serialize};

use protractor_core::{
    geometry::{Point, Size},
    scene::{
        Circle, Emphasis, Fill, Label, Polygon, Primitive, Scene, SceneBuilder, SceneLayer,
        Segment, TextAnchor,
    },
    stroke::StrokeStyle,
};

use super::{Generator, non_blank};

pub const VIEWPORT: Size = Size::new(500.0, 400.0);

/// Depth of the box along the receding axis.
pub const LENGTH: f32 = 160.0;
pub const WIDTH: f32 = 200.0;
pub const HEIGHT: f32 = 180.0;

const FRONT_BOTTOM_LEFT: Point = Point::new(100.0, 300.0);
const EDGE_LABEL_OFFSET: f32 = 18.0;
const VERTEX_LABEL_OFFSET: f32 = 16.0;
const VERTEX_DOT_RADIUS: f32 = 2.5;
const DEFAULT_TANK_FILL: f32 = 0.6;

const A: usize = 0;
const B: usize = 1;
const C: usize = 2;
const D: usize = 3;
const E: usize = 4;
const F: usize = 5;
const G: usize = 6;
const H: usize = 7;

const VERTEX_NAMES: [&str; 8] = ["A", "B", "C", "D", "E", "F", "G", "H"];

/// Visible faces, drawn back to front.
const FACES: [[usize; 4]; 3] = [[B, F, G, C], [D, C, G, H], [A, B, C, D]];

/// Edges meeting at the hidden vertex `E`.
const HIDDEN_EDGES: [(usize, usize); 3] = [(A, E), (E, F), (E, H)];

/// The face a face diagonal is drawn on.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagonalFace {
    #[default]
    Bottom,
    Front,
    Side,
    Top,
}

impl DiagonalFace {
    /// Endpoints of the diagonal and whether it runs behind a visible face.
    fn endpoints(self) -> (usize, usize, bool) {
        match self {
            Self::Bottom => (A, F, true),
            Self::Front => (A, C, false),
            Self::Side => (B, G, false),
            Self::Top => (D, G, false),
        }
    }
}

/// The element drawn in the highlight color.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Element {
    Length,
    Width,
    Height,
    FaceDiagonal,
    SpaceDiagonal,
    #[default]
    None,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CuboidParams {
    /// Label on the receding edge `BF`.
    pub length: String,
    /// Label on the front bottom edge `AB`.
    pub width: String,
    /// Label on the front left edge `AD`.
    pub height: String,
    pub face_diagonal: Option<String>,
    pub space_diagonal: Option<String>,
    pub show_face_diagonal: bool,
    pub show_space_diagonal: bool,
    pub diagonal_face: DiagonalFace,
    pub highlight_element: Element,
    pub show_vertex_labels: bool,
    /// Water level as a fraction of the height.
    pub fill_level: Option<f32>,
    pub caption: Option<String>,
}

impl Default for CuboidParams {
    fn default() -> Self {
        Self {
            length: String::new(),
            width: String::new(),
            height: String::new(),
            face_diagonal: None,
            space_diagonal: None,
            show_face_diagonal: false,
            show_space_diagonal: false,
            diagonal_face: DiagonalFace::default(),
            highlight_element: Element::default(),
            show_vertex_labels: false,
            fill_level: None,
            caption: None,
        }
    }
}

/// Box generator; the tank variant starts out partly filled.
#[derive(Debug, Default, Clone, Copy)]
pub struct CuboidGenerator {
    tank: bool,
}

impl CuboidGenerator {
    pub fn new() -> Self {
        Self { tank: false }
    }

    pub fn tank() -> Self {
        Self { tank: true }
    }

    /// Screen positions of `A`–`H`.
    pub fn vertices(&self) -> [Point; 8] {
        let depth = depth_offset();
        let front = [
            FRONT_BOTTOM_LEFT,
            FRONT_BOTTOM_LEFT.add_point(Point::new(WIDTH, 0.0)),
            FRONT_BOTTOM_LEFT.add_point(Point::new(WIDTH, -HEIGHT)),
            FRONT_BOTTOM_LEFT.add_point(Point::new(0.0, -HEIGHT)),
        ];
        let mut all = [Point::default(); 8];
        for (i, p) in front.iter().enumerate() {
            all[i] = *p;
            all[i + 4] = p.add_point(depth);
        }
        all
    }

    fn push_edge_label(
        &self,
        builder: &mut SceneBuilder,
        text: &str,
        position: Point,
        anchor: TextAnchor,
        highlighted: bool,
    ) {
        if let Some(text) = non_blank(Some(text)) {
            builder.push(
                SceneLayer::Label,
                Primitive::Label(
                    Label::new(position, text)
                        .with_anchor(anchor)
                        .with_emphasis(Emphasis::from_flag(highlighted)),
                ),
            );
        }
    }

    fn push_water(&self, builder: &mut SceneBuilder, v: &[Point; 8], level: f32) {
        if level <= 0.0 {
            return;
        }
        let rise = Point::new(0.0, -HEIGHT * level);
        let surface = [A, B, F, E].map(|i| v[i].add_point(rise));
        let faces = [
            vec![v[B], v[F], surface[2], surface[1]],
            vec![v[A], v[B], surface[1], surface[0]],
            surface.to_vec(),
        ];
        for face in faces {
            builder.push(
                SceneLayer::Region,
                Primitive::Polygon(Polygon::new(face).with_fill(Fill::Tint)),
            );
        }
    }

    fn push_diagonals(&self, builder: &mut SceneBuilder, v: &[Point; 8], params: &CuboidParams) {
        let highlight = params.highlight_element;
        if params.show_face_diagonal {
            let (from, to, behind) = params.diagonal_face.endpoints();
            let highlighted = highlight == Element::FaceDiagonal;
            let stroke = if behind { StrokeStyle::Dashed } else { StrokeStyle::Solid };
            builder.push(
                SceneLayer::Annotation,
                Primitive::Segment(
                    Segment::new(v[from], v[to])
                        .with_stroke(stroke)
                        .with_emphasis(Emphasis::from_flag(highlighted)),
                ),
            );
            if let Some(text) = params.face_diagonal.as_deref() {
                let mid = v[from].midpoint(v[to]);
                self.push_edge_label(
                    builder,
                    text,
                    mid.add_point(Point::new(0.0, -8.0)),
                    TextAnchor::Middle,
                    highlighted,
                );
            }
        }
        if params.show_space_diagonal {
            let highlighted = highlight == Element::SpaceDiagonal;
            builder.push(
                SceneLayer::Annotation,
                Primitive::Segment(
                    Segment::new(v[A], v[G])
                        .with_stroke(StrokeStyle::Dashed)
                        .with_emphasis(Emphasis::from_flag(highlighted)),
                ),
            );
            if let Some(text) = params.space_diagonal.as_deref() {
                let mid = v[A].midpoint(v[G]);
                self.push_edge_label(
                    builder,
                    text,
                    mid.add_point(Point::new(8.0, 14.0)),
                    TextAnchor::Start,
                    highlighted,
                );
            }
        }
    }
}

/// Receding axis: half the depth to the right, a quarter up.
fn depth_offset() -> Point {
    Point::new(LENGTH * 0.5, -LENGTH * 0.25)
}

impl Generator for CuboidGenerator {
    type Params = CuboidParams;

    fn default_params(&self) -> CuboidParams {
        CuboidParams {
            fill_level: self.tank.then_some(DEFAULT_TANK_FILL),
            ..CuboidParams::default()
        }
    }

    fn generate(&self, params: &CuboidParams) -> Scene {
        let v = self.vertices();
        let mut builder = SceneBuilder::new(VIEWPORT);
        builder.set_caption(params.caption.clone());

        let level = params
            .fill_level
            .filter(|l| l.is_finite())
            .map(|l| l.clamp(0.0, 1.0));
        if let Some(level) = level {
            debug!(level = level; "Drawing water level");
            self.push_water(&mut builder, &v, level);
        }

        // A filled tank shows its water through clear faces.
        let face_fill = if level.is_some() { Fill::None } else { Fill::Face };
        for face in FACES {
            builder.push(
                SceneLayer::Shape,
                Primitive::Polygon(Polygon::new(face.map(|i| v[i]).to_vec()).with_fill(face_fill)),
            );
        }
        for (from, to) in HIDDEN_EDGES {
            builder.push(
                SceneLayer::Shape,
                Primitive::Segment(Segment::new(v[from], v[to]).with_stroke(StrokeStyle::Dashed)),
            );
        }

        let highlight = params.highlight_element;
        let edges = [
            (
                Element::Width,
                (A, B),
                &params.width,
                Point::new(0.0, EDGE_LABEL_OFFSET + 4.0),
                TextAnchor::Middle,
            ),
            (
                Element::Height,
                (A, D),
                &params.height,
                Point::new(-EDGE_LABEL_OFFSET, 4.0),
                TextAnchor::End,
            ),
            (
                Element::Length,
                (B, F),
                &params.length,
                Point::new(EDGE_LABEL_OFFSET * 0.5, EDGE_LABEL_OFFSET),
                TextAnchor::Start,
            ),
        ];
        for (element, (from, to), text, offset, anchor) in edges {
            let highlighted = highlight == element;
            if highlighted {
                builder.push(
                    SceneLayer::Annotation,
                    Primitive::Segment(
                        Segment::new(v[from], v[to]).with_emphasis(Emphasis::Highlighted),
                    ),
                );
            }
            let mid = v[from].midpoint(v[to]);
            self.push_edge_label(&mut builder, text, mid.add_point(offset), anchor, highlighted);
        }

        self.push_diagonals(&mut builder, &v, params);

        if params.show_vertex_labels {
            let center = v[A].midpoint(v[G]);
            for (position, name) in v.iter().zip(VERTEX_NAMES) {
                builder.push(
                    SceneLayer::Point,
                    Primitive::Circle(Circle::new(*position, VERTEX_DOT_RADIUS, true)),
                );
                let outward = position.sub_point(center).unit().scale(VERTEX_LABEL_OFFSET);
                let at = position.add_point(outward).add_point(Point::new(0.0, 4.0));
                builder.push(SceneLayer::Label, Primitive::Label(Label::new(at, name)));
            }
        }

        builder.build()
    }
}
