//! The diagram scene: an ordered, renderer-agnostic list of draw instructions.
//!
//! Generators never touch SVG or any other output format. They describe what
//! to draw as [`Primitive`]s tagged with a [`SceneLayer`], and a renderer
//! paints the resulting [`Scene`] from the bottom layer up.
//!
//! # Overview
//!
//! - [`Scene`]: The immutable result of a generation call
//! - [`SceneBuilder`]: Collects items in any order and sorts them by layer
//! - [`SceneLayer`]: Z-order of scene items, bottom to top
//! - [`Primitive`]: One draw instruction
//! - [`AngleArc`]: An interior-angle arc at a polygon vertex
//! - [`Marker`]: Parallel-side arrows or equal-side ticks on a side
//!
//! # Example
//!
//! ```
//! # use protractor_core::geometry::{Point, Size};
//! # use protractor_core::scene::{Circle, Label, Primitive, SceneBuilder, SceneLayer};
//! let mut builder = SceneBuilder::new(Size::new(100.0, 100.0));
//!
//! // Emitted first, but labels sit above points.
//! builder.push(SceneLayer::Label, Primitive::Label(Label::new(Point::new(10.0, 0.0), "A")));
//! builder.push(SceneLayer::Point, Primitive::Circle(Circle::new(Point::new(10.0, 10.0), 3.0, true)));
//!
//! let scene = builder.build();
//! assert_eq!(scene.items()[0].layer(), SceneLayer::Point);
//! assert_eq!(scene.items()[1].layer(), SceneLayer::Label);
//! ```

mod arc;
mod marker;

pub use arc::AngleArc;
pub use marker::{Marker, MarkerKind};

use log::trace;
use serde::Serialize;

use crate::{
    geometry::{Point, Size},
    stroke::StrokeStyle,
};

/// Z-order layers of a scene.
///
/// Items render from bottom to top in declaration order; the `Ord` derive
/// relies on that order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SceneLayer {
    /// Shaded regions and intervals
    Region,
    /// Grid lines
    Grid,
    /// Axes and their tick marks
    Axis,
    /// The figure itself: polygons, graph lines, box edges
    Shape,
    /// Angle arcs
    Annotation,
    /// Parallel arrows and equal-side ticks
    Marker,
    /// Vertex dots and plotted points
    Point,
    /// Text anchors
    Label,
}

impl SceneLayer {
    /// Returns a human-readable name for this layer.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Region => "region",
            Self::Grid => "grid",
            Self::Axis => "axis",
            Self::Shape => "shape",
            Self::Annotation => "annotation",
            Self::Marker => "marker",
            Self::Point => "point",
            Self::Label => "label",
        }
    }
}

/// Visual weight of a primitive.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Emphasis {
    #[default]
    Normal,
    Highlighted,
}

impl Emphasis {
    pub fn from_flag(highlighted: bool) -> Self {
        if highlighted {
            Self::Highlighted
        } else {
            Self::Normal
        }
    }

    pub fn is_highlighted(self) -> bool {
        self == Self::Highlighted
    }
}

/// How the inside of a closed shape is painted.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Fill {
    /// Outline only
    #[default]
    None,
    /// The figure's own face color
    Face,
    /// The outline color, for arrowheads and solid marks
    Solid,
    /// A translucent highlight tint
    Tint,
}

/// Horizontal alignment of a label relative to its anchor point.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAnchor {
    Start,
    #[default]
    Middle,
    End,
}

impl TextAnchor {
    pub fn to_svg_value(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Middle => "middle",
            Self::End => "end",
        }
    }
}

/// What a label annotates; renderers pick color and size from it.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelRole {
    #[default]
    Plain,
    Vertex,
    Angle,
    Tick,
}

/// A closed polygon.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Polygon {
    points: Vec<Point>,
    stroke: StrokeStyle,
    fill: Fill,
    emphasis: Emphasis,
}

impl Polygon {
    pub fn new(points: Vec<Point>) -> Self {
        Self {
            points,
            stroke: StrokeStyle::Solid,
            fill: Fill::None,
            emphasis: Emphasis::Normal,
        }
    }

    pub fn with_stroke(mut self, stroke: StrokeStyle) -> Self {
        self.stroke = stroke;
        self
    }

    pub fn with_fill(mut self, fill: Fill) -> Self {
        self.fill = fill;
        self
    }

    pub fn with_emphasis(mut self, emphasis: Emphasis) -> Self {
        self.emphasis = emphasis;
        self
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn stroke(&self) -> StrokeStyle {
        self.stroke
    }

    pub fn fill(&self) -> Fill {
        self.fill
    }

    pub fn emphasis(&self) -> Emphasis {
        self.emphasis
    }
}

/// An open chain of line segments.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Polyline {
    points: Vec<Point>,
    stroke: StrokeStyle,
    emphasis: Emphasis,
}

impl Polyline {
    pub fn new(points: Vec<Point>) -> Self {
        Self {
            points,
            stroke: StrokeStyle::Solid,
            emphasis: Emphasis::Normal,
        }
    }

    pub fn with_stroke(mut self, stroke: StrokeStyle) -> Self {
        self.stroke = stroke;
        self
    }

    pub fn with_emphasis(mut self, emphasis: Emphasis) -> Self {
        self.emphasis = emphasis;
        self
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn stroke(&self) -> StrokeStyle {
        self.stroke
    }

    pub fn emphasis(&self) -> Emphasis {
        self.emphasis
    }
}

/// A straight line between two points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Segment {
    from: Point,
    to: Point,
    stroke: StrokeStyle,
    emphasis: Emphasis,
}

impl Segment {
    pub fn new(from: Point, to: Point) -> Self {
        Self {
            from,
            to,
            stroke: StrokeStyle::Solid,
            emphasis: Emphasis::Normal,
        }
    }

    pub fn with_stroke(mut self, stroke: StrokeStyle) -> Self {
        self.stroke = stroke;
        self
    }

    pub fn with_emphasis(mut self, emphasis: Emphasis) -> Self {
        self.emphasis = emphasis;
        self
    }

    pub fn start(&self) -> Point {
        self.from
    }

    pub fn end(&self) -> Point {
        self.to
    }

    pub fn stroke(&self) -> StrokeStyle {
        self.stroke
    }

    pub fn emphasis(&self) -> Emphasis {
        self.emphasis
    }
}

/// A dot. Open (unfilled) circles mark excluded interval endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Circle {
    center: Point,
    radius: f32,
    filled: bool,
    emphasis: Emphasis,
}

impl Circle {
    pub fn new(center: Point, radius: f32, filled: bool) -> Self {
        Self {
            center,
            radius,
            filled,
            emphasis: Emphasis::Normal,
        }
    }

    pub fn with_emphasis(mut self, emphasis: Emphasis) -> Self {
        self.emphasis = emphasis;
        self
    }

    pub fn center(&self) -> Point {
        self.center
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn filled(&self) -> bool {
        self.filled
    }

    pub fn emphasis(&self) -> Emphasis {
        self.emphasis
    }
}

/// Text at an anchor point.
///
/// The text is opaque: it is handed to the renderer untouched, math notation
/// and all.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Label {
    position: Point,
    text: String,
    anchor: TextAnchor,
    role: LabelRole,
    emphasis: Emphasis,
}

impl Label {
    pub fn new(position: Point, text: impl Into<String>) -> Self {
        Self {
            position,
            text: text.into(),
            anchor: TextAnchor::Middle,
            role: LabelRole::Plain,
            emphasis: Emphasis::Normal,
        }
    }

    pub fn with_anchor(mut self, anchor: TextAnchor) -> Self {
        self.anchor = anchor;
        self
    }

    pub fn with_role(mut self, role: LabelRole) -> Self {
        self.role = role;
        self
    }

    pub fn with_emphasis(mut self, emphasis: Emphasis) -> Self {
        self.emphasis = emphasis;
        self
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn anchor(&self) -> TextAnchor {
        self.anchor
    }

    pub fn role(&self) -> LabelRole {
        self.role
    }

    pub fn emphasis(&self) -> Emphasis {
        self.emphasis
    }
}

/// One draw instruction.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Primitive {
    Polygon(Polygon),
    Polyline(Polyline),
    Segment(Segment),
    Arc(AngleArc),
    Marker(Marker),
    Circle(Circle),
    Label(Label),
}

/// A primitive together with the layer it is painted on.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneItem {
    layer: SceneLayer,
    #[serde(flatten)]
    primitive: Primitive,
}

impl SceneItem {
    pub fn layer(&self) -> SceneLayer {
        self.layer
    }

    pub fn primitive(&self) -> &Primitive {
        &self.primitive
    }
}

/// The output of a generator: everything needed to draw one diagram.
///
/// All coordinates are logical units inside `viewport`, which starts at the
/// origin. An empty scene (see [`Scene::empty`]) draws nothing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scene {
    viewport: Size,
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    caption: Option<String>,
    items: Vec<SceneItem>,
}

impl Scene {
    /// The scene returned for requests that cannot be drawn at all.
    pub fn empty() -> Self {
        Self {
            viewport: Size::default(),
            title: None,
            caption: None,
            items: Vec::new(),
        }
    }

    /// Returns true if the scene contains nothing to draw.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty() && self.viewport.is_zero()
    }

    pub fn viewport(&self) -> Size {
        self.viewport
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn caption(&self) -> Option<&str> {
        self.caption.as_deref()
    }

    /// Items in paint order, bottom to top.
    pub fn items(&self) -> &[SceneItem] {
        &self.items
    }

    pub fn primitives(&self) -> impl Iterator<Item = &Primitive> {
        self.items.iter().map(|item| &item.primitive)
    }

    pub fn polygons(&self) -> impl Iterator<Item = &Polygon> {
        self.primitives().filter_map(|p| match p {
            Primitive::Polygon(polygon) => Some(polygon),
            _ => None,
        })
    }

    pub fn segments(&self) -> impl Iterator<Item = &Segment> {
        self.primitives().filter_map(|p| match p {
            Primitive::Segment(segment) => Some(segment),
            _ => None,
        })
    }

    pub fn arcs(&self) -> impl Iterator<Item = &AngleArc> {
        self.primitives().filter_map(|p| match p {
            Primitive::Arc(arc) => Some(arc),
            _ => None,
        })
    }

    pub fn markers(&self) -> impl Iterator<Item = &Marker> {
        self.primitives().filter_map(|p| match p {
            Primitive::Marker(marker) => Some(marker),
            _ => None,
        })
    }

    pub fn circles(&self) -> impl Iterator<Item = &Circle> {
        self.primitives().filter_map(|p| match p {
            Primitive::Circle(circle) => Some(circle),
            _ => None,
        })
    }

    pub fn labels(&self) -> impl Iterator<Item = &Label> {
        self.primitives().filter_map(|p| match p {
            Primitive::Label(label) => Some(label),
            _ => None,
        })
    }
}

/// Collects scene items and orders them by layer.
///
/// Items on the same layer keep their insertion order, so a generator that
/// emits deterministically yields a deterministic scene.
#[derive(Debug)]
pub struct SceneBuilder {
    viewport: Size,
    title: Option<String>,
    caption: Option<String>,
    items: Vec<SceneItem>,
}

impl SceneBuilder {
    pub fn new(viewport: Size) -> Self {
        Self {
            viewport,
            title: None,
            caption: None,
            items: Vec::new(),
        }
    }

    /// Sets the scene title. Blank titles are dropped.
    pub fn set_title(&mut self, title: Option<String>) {
        self.title = title.filter(|t| !t.trim().is_empty());
    }

    /// Sets the scene caption. Blank captions are dropped.
    pub fn set_caption(&mut self, caption: Option<String>) {
        self.caption = caption.filter(|c| !c.trim().is_empty());
    }

    pub fn push(&mut self, layer: SceneLayer, primitive: Primitive) {
        self.items.push(SceneItem { layer, primitive });
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Finishes the scene, sorting items bottom to top.
    pub fn build(mut self) -> Scene {
        self.items.sort_by_key(|item| item.layer);
        trace!(items = self.items.len(); "Scene built");
        Scene {
            viewport: self.viewport,
            title: self.title,
            caption: self.caption,
            items: self.items,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dot(x: f32) -> Primitive {
        Primitive::Circle(Circle::new(Point::new(x, 0.0), 2.0, true))
    }

    #[test]
    fn test_layer_ordering() {
        assert!(SceneLayer::Region < SceneLayer::Grid);
        assert!(SceneLayer::Shape < SceneLayer::Annotation);
        assert!(SceneLayer::Point < SceneLayer::Label);
    }

    #[test]
    fn test_builder_sorts_by_layer() {
        let mut builder = SceneBuilder::new(Size::new(10.0, 10.0));
        builder.push(SceneLayer::Label, Primitive::Label(Label::new(Point::default(), "x")));
        builder.push(SceneLayer::Grid, dot(1.0));
        builder.push(SceneLayer::Shape, dot(2.0));

        let scene = builder.build();
        let layers: Vec<_> = scene.items().iter().map(SceneItem::layer).collect();
        assert_eq!(
            layers,
            vec![SceneLayer::Grid, SceneLayer::Shape, SceneLayer::Label]
        );
    }

    #[test]
    fn test_builder_sort_is_stable() {
        let mut builder = SceneBuilder::new(Size::new(10.0, 10.0));
        for x in 0..5 {
            builder.push(SceneLayer::Point, dot(x as f32));
            builder.push(SceneLayer::Grid, dot(-(x as f32)));
        }
        let scene = builder.build();

        let xs: Vec<f32> = scene.circles().map(|c| c.center().x()).collect();
        assert_eq!(xs, vec![0.0, -1.0, -2.0, -3.0, -4.0, 0.0, 1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_empty_scene() {
        let scene = Scene::empty();
        assert!(scene.is_empty());
        assert_eq!(scene.items().len(), 0);
        assert_eq!(scene.caption(), None);

        let mut builder = SceneBuilder::new(Size::new(10.0, 10.0));
        builder.push(SceneLayer::Point, dot(0.0));
        assert!(!builder.build().is_empty());
    }

    #[test]
    fn test_blank_caption_is_dropped() {
        let mut builder = SceneBuilder::new(Size::new(10.0, 10.0));
        builder.set_caption(Some("   ".to_string()));
        builder.set_title(Some("Angles".to_string()));
        let scene = builder.build();
        assert_eq!(scene.caption(), None);
        assert_eq!(scene.title(), Some("Angles"));
    }

    #[test]
    fn test_emphasis_from_flag() {
        assert_eq!(Emphasis::from_flag(true), Emphasis::Highlighted);
        assert!(!Emphasis::from_flag(false).is_highlighted());
    }

    #[test]
    fn test_label_defaults() {
        let label = Label::new(Point::new(1.0, 2.0), "120°");
        assert_eq!(label.text(), "120°");
        assert_eq!(label.anchor(), TextAnchor::Middle);
        assert_eq!(label.role(), LabelRole::Plain);
        assert_eq!(label.emphasis(), Emphasis::Normal);
    }
}
