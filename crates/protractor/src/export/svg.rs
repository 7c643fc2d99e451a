//! SVG rendering of scenes.
//!
//! Each scene item becomes one SVG element: polygons, polylines, lines,
//! arc paths, circles and text. Colors come from the [`StyleConfig`]
//! and are resolved once per export. The document is laid out top to bottom
//! as an optional title band, the scene viewport and an optional caption
//! band.

use log::{debug, info};
use svg::{Document, Node, node::element as svg_element};

use protractor_core::{
    color::Color,
    geometry::Point,
    scene::{
        AngleArc, Circle, Emphasis, Fill, Label, LabelRole, Marker, Polygon, Polyline, Primitive,
        Scene, SceneItem, SceneLayer, Segment,
    },
    stroke::StrokeStyle,
};

use super::Exporter;
use crate::{
    config::{ExportConfig, StyleConfig},
    error::ProtractorError,
};

const TITLE_BAND: f32 = 32.0;
const CAPTION_BAND: f32 = 32.0;
const FONT_FAMILY: &str = "sans-serif";
const TINT_ALPHA: f32 = 0.18;
const GRID_OPACITY: f32 = 0.25;

/// Colors resolved from a [`StyleConfig`].
#[derive(Debug, Clone, Copy)]
struct Palette {
    stroke: Color,
    highlight: Color,
    angle: Color,
    label: Color,
    fill: Color,
    background: Option<Color>,
}

impl Palette {
    fn from_style(style: &StyleConfig) -> Result<Self, ProtractorError> {
        Ok(Self {
            stroke: style.stroke_color().map_err(ProtractorError::Config)?,
            highlight: style.highlight_color().map_err(ProtractorError::Config)?,
            angle: style.angle_color().map_err(ProtractorError::Config)?,
            label: style.label_color().map_err(ProtractorError::Config)?,
            fill: style.fill_color().map_err(ProtractorError::Config)?,
            background: style.background_color().map_err(ProtractorError::Config)?,
        })
    }

    fn outline(&self, emphasis: Emphasis) -> Color {
        if emphasis.is_highlighted() {
            self.highlight
        } else {
            self.stroke
        }
    }
}

/// Renders scenes into SVG documents.
#[derive(Debug, Clone)]
pub struct SvgExporter<'a> {
    style: &'a StyleConfig,
    export: &'a ExportConfig,
}

impl<'a> SvgExporter<'a> {
    pub fn new(style: &'a StyleConfig, export: &'a ExportConfig) -> Self {
        Self { style, export }
    }

    /// Builds the SVG document for `scene`.
    ///
    /// # Errors
    ///
    /// Returns [`ProtractorError::Config`] if a style color does not parse.
    pub fn render_document(&self, scene: &Scene) -> Result<Document, ProtractorError> {
        let palette = Palette::from_style(self.style)?;
        let viewport = scene.viewport();
        let title_band = if scene.title().is_some() { TITLE_BAND } else { 0.0 };
        let caption = scene.caption().filter(|_| self.export.include_caption());
        let caption_band = if caption.is_some() { CAPTION_BAND } else { 0.0 };

        let width = viewport.width();
        let height = title_band + viewport.height() + caption_band;
        let scale = self.export.scale();
        debug!(width = width, height = height, scale = scale; "SVG dimensions");

        let mut doc = Document::new()
            .set("viewBox", format!("0 0 {width} {height}"))
            .set("width", width * scale)
            .set("height", height * scale);

        if let Some(background) = palette.background {
            doc = doc.add(
                svg_element::Rectangle::new()
                    .set("x", 0)
                    .set("y", 0)
                    .set("width", width)
                    .set("height", height)
                    .set("fill", background.to_string()),
            );
        }

        if let Some(title) = scene.title() {
            doc = doc.add(
                text_element(Point::new(width / 2.0, TITLE_BAND * 0.65), title, "middle")
                    .set("font-size", 16)
                    .set("font-weight", "bold")
                    .set("fill", palette.label.to_string()),
            );
        }

        let mut group =
            svg_element::Group::new().set("transform", format!("translate(0, {title_band})"));
        for item in scene.items() {
            group.append(self.render_item(item, &palette));
        }
        doc = doc.add(group);

        if let Some(caption) = caption {
            let y = title_band + viewport.height() + CAPTION_BAND * 0.65;
            doc = doc.add(
                text_element(Point::new(width / 2.0, y), caption, "middle")
                    .set("font-size", 13)
                    .set("font-style", "italic")
                    .set("fill", palette.label.to_string()),
            );
        }

        Ok(doc)
    }

    fn render_item(&self, item: &SceneItem, palette: &Palette) -> svg_element::Group {
        let layer = item.layer();
        let group = svg_element::Group::new().set("class", layer.name());
        match item.primitive() {
            Primitive::Polygon(polygon) => group.add(self.render_polygon(polygon, layer, palette)),
            Primitive::Polyline(polyline) => group.add(self.render_polyline(polyline, palette)),
            Primitive::Segment(segment) => group.add(self.render_segment(segment, layer, palette)),
            Primitive::Arc(arc) => group.add(self.render_arc(arc, palette)),
            Primitive::Marker(marker) => self.render_marker(group, marker, palette),
            Primitive::Circle(circle) => group.add(self.render_circle(circle, palette)),
            Primitive::Label(label) => group.add(self.render_label(label, palette)),
        }
    }

    fn render_polygon(
        &self,
        polygon: &Polygon,
        layer: SceneLayer,
        palette: &Palette,
    ) -> svg_element::Polygon {
        let outline = palette.outline(polygon.emphasis());
        let fill = match polygon.fill() {
            Fill::None => "none".to_string(),
            Fill::Face => palette.fill.to_string(),
            Fill::Solid => outline.to_string(),
            Fill::Tint => palette.highlight.with_alpha(TINT_ALPHA).to_string(),
        };
        let element = svg_element::Polygon::new()
            .set("points", points_attr(polygon.points()))
            .set("fill", fill);
        // Shaded regions have no outline of their own.
        if layer == SceneLayer::Region && polygon.fill() == Fill::Tint {
            return element.set("stroke", "none");
        }
        stroked(element, outline, stroke_width(layer), polygon.stroke())
    }

    fn render_polyline(&self, polyline: &Polyline, palette: &Palette) -> svg_element::Polyline {
        let element = svg_element::Polyline::new()
            .set("points", points_attr(polyline.points()))
            .set("fill", "none");
        stroked(
            element,
            palette.outline(polyline.emphasis()),
            2.0,
            polyline.stroke(),
        )
    }

    fn render_segment(
        &self,
        segment: &Segment,
        layer: SceneLayer,
        palette: &Palette,
    ) -> svg_element::Line {
        let element = svg_element::Line::new()
            .set("x1", segment.start().x())
            .set("y1", segment.start().y())
            .set("x2", segment.end().x())
            .set("y2", segment.end().y());
        let element = stroked(
            element,
            palette.outline(segment.emphasis()),
            stroke_width(layer),
            segment.stroke(),
        );
        if layer == SceneLayer::Grid {
            element.set("stroke-opacity", GRID_OPACITY)
        } else {
            element
        }
    }

    fn render_arc(&self, arc: &AngleArc, palette: &Palette) -> svg_element::Path {
        let color = if arc.emphasis().is_highlighted() {
            palette.highlight
        } else {
            palette.angle
        };
        svg_element::Path::new()
            .set("d", arc.path_data())
            .set("fill", "none")
            .set("stroke", color.to_string())
            .set("stroke-width", 1.5)
    }

    fn render_marker(
        &self,
        mut group: svg_element::Group,
        marker: &Marker,
        palette: &Palette,
    ) -> svg_element::Group {
        let color = palette.outline(marker.emphasis());
        for [wing, tip, other] in marker.arrowheads() {
            let chevron = svg_element::Polyline::new()
                .set("points", points_attr(&[wing, tip, other]))
                .set("fill", "none");
            group.append(stroked(chevron, color, 1.5, StrokeStyle::Solid));
        }
        for (from, to) in marker.ticks() {
            let tick = svg_element::Line::new()
                .set("x1", from.x())
                .set("y1", from.y())
                .set("x2", to.x())
                .set("y2", to.y());
            group.append(stroked(tick, color, 1.5, StrokeStyle::Solid));
        }
        group
    }

    fn render_circle(&self, circle: &Circle, palette: &Palette) -> svg_element::Circle {
        let color = palette.outline(circle.emphasis());
        let fill = if circle.filled() {
            color.to_string()
        } else {
            palette
                .background
                .map_or_else(|| "white".to_string(), |c| c.to_string())
        };
        svg_element::Circle::new()
            .set("cx", circle.center().x())
            .set("cy", circle.center().y())
            .set("r", circle.radius())
            .set("fill", fill)
            .set("stroke", color.to_string())
            .set("stroke-width", 1.5)
    }

    fn render_label(&self, label: &Label, palette: &Palette) -> svg_element::Text {
        let color = if label.emphasis().is_highlighted() {
            palette.highlight
        } else if label.role() == LabelRole::Angle {
            palette.angle
        } else {
            palette.label
        };
        let size = match label.role() {
            LabelRole::Tick => 11,
            LabelRole::Angle => 13,
            LabelRole::Plain | LabelRole::Vertex => 14,
        };
        let element = text_element(label.position(), label.text(), label.anchor().to_svg_value())
            .set("font-size", size)
            .set("fill", color.to_string());
        if label.role() == LabelRole::Vertex {
            element.set("font-style", "italic")
        } else {
            element
        }
    }
}

impl Exporter for SvgExporter<'_> {
    fn export_scene(&self, scene: &Scene) -> Result<String, ProtractorError> {
        let doc = self.render_document(scene)?;
        let text = doc.to_string();
        info!(bytes = text.len(); "SVG document rendered");
        Ok(text)
    }
}

fn stroke_width(layer: SceneLayer) -> f32 {
    match layer {
        SceneLayer::Grid => 1.0,
        SceneLayer::Axis => 1.5,
        _ => 2.0,
    }
}

/// Applies stroke color, width and dash pattern.
fn stroked<T: Node>(element: T, color: Color, width: f32, style: StrokeStyle) -> T {
    let mut element = element;
    element.assign("stroke", color.to_string());
    element.assign("stroke-width", width);
    if let Some(dash) = style.to_svg_value() {
        element.assign("stroke-dasharray", dash);
    }
    element
}

fn text_element(position: Point, text: &str, anchor: &str) -> svg_element::Text {
    svg_element::Text::new(text)
        .set("x", position.x())
        .set("y", position.y())
        .set("text-anchor", anchor)
        .set("font-family", FONT_FAMILY)
}

fn points_attr(points: &[Point]) -> String {
    points
        .iter()
        .map(|p| format!("{},{}", p.x(), p.y()))
        .collect::<Vec<_>>()
        .join(" ")
}
