//! Coordinate planes with points, lines, curves and shaded regions.

use log::debug;
use serde::{Deserialize, Serialize};

use protractor_core::{
    geometry::{Bounds, Point, Size},
    scene::{
        Circle, Emphasis, Fill, Label, Polygon, Polyline, Primitive, Scene, SceneBuilder,
        SceneLayer, Segment, TextAnchor,
    },
    stroke::StrokeStyle,
};

use super::{
    Generator, PointStyle, non_blank,
    plot::{PlotArea, axis_position, push_axes, push_grid, sanitize_range, tick_step, tick_values},
};

pub const VIEWPORT: Size = Size::new(500.0, 500.0);

const PLOT_PADDING: f32 = 40.0;
const MAX_GRID_INTERVALS: usize = 20;
const POINT_RADIUS: f32 = 4.0;
const POINT_LABEL_OFFSET: Point = Point::new(8.0, -8.0);
const AXIS_LABEL_GAP: f32 = 14.0;

/// A point in data coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    pub x: f32,
    pub y: f32,
}

impl DataPoint {
    fn to_point(self) -> Point {
        Point::new(self.x, self.y)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanePoint {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub style: PointStyle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineKind {
    /// `y = slope·x + yIntercept`
    Linear,
    /// `x = xValue`
    Vertical,
    /// `y = yValue`
    Horizontal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaneLine {
    #[serde(rename = "type")]
    pub kind: LineKind,
    #[serde(default)]
    pub slope: Option<f32>,
    #[serde(default)]
    pub y_intercept: Option<f32>,
    #[serde(default)]
    pub x_value: Option<f32>,
    #[serde(default)]
    pub y_value: Option<f32>,
    #[serde(default)]
    pub equation: Option<String>,
    #[serde(default)]
    pub style: StrokeStyle,
}

/// A curve through precomputed points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Curve {
    pub points: Vec<DataPoint>,
    #[serde(default)]
    pub equation: Option<String>,
    #[serde(default)]
    pub style: StrokeStyle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegionKind {
    /// A strip between two x values
    Vertical,
    /// A strip between two y values
    Horizontal,
    Rectangle,
}

/// A shaded part of the plane. Missing bounds extend to the window edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Region {
    #[serde(rename = "type")]
    pub kind: RegionKind,
    #[serde(default)]
    pub x_min: Option<f32>,
    #[serde(default)]
    pub x_max: Option<f32>,
    #[serde(default)]
    pub y_min: Option<f32>,
    #[serde(default)]
    pub y_max: Option<f32>,
    #[serde(default)]
    pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CartesianParams {
    pub x_min: f32,
    pub x_max: f32,
    pub y_min: f32,
    pub y_max: f32,
    pub show_grid: bool,
    pub points: Vec<PlanePoint>,
    pub lines: Vec<PlaneLine>,
    pub curves: Vec<Curve>,
    pub highlight_region: Option<Region>,
    pub x_label: String,
    pub y_label: String,
    pub title: Option<String>,
    pub caption: Option<String>,
}

impl Default for CartesianParams {
    fn default() -> Self {
        Self {
            x_min: -10.0,
            x_max: 10.0,
            y_min: -10.0,
            y_max: 10.0,
            show_grid: true,
            points: Vec::new(),
            lines: Vec::new(),
            curves: Vec::new(),
            highlight_region: None,
            x_label: "x".to_string(),
            y_label: "y".to_string(),
            title: None,
            caption: None,
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct CartesianGenerator;

impl CartesianGenerator {
    fn push_region(&self, builder: &mut SceneBuilder, area: &PlotArea, region: &Region) {
        let (x, y) = (area.x(), area.y());
        let clamp_x = |v: Option<f32>, edge: f32| v.filter(|v| v.is_finite()).map_or(edge, |v| x.clamp(v));
        let clamp_y = |v: Option<f32>, edge: f32| v.filter(|v| v.is_finite()).map_or(edge, |v| y.clamp(v));

        let (x0, x1) = match region.kind {
            RegionKind::Horizontal => (x.min(), x.max()),
            RegionKind::Vertical | RegionKind::Rectangle => {
                (clamp_x(region.x_min, x.min()), clamp_x(region.x_max, x.max()))
            }
        };
        let (y0, y1) = match region.kind {
            RegionKind::Vertical => (y.min(), y.max()),
            RegionKind::Horizontal | RegionKind::Rectangle => {
                (clamp_y(region.y_min, y.min()), clamp_y(region.y_max, y.max()))
            }
        };
        let (x0, x1) = (x0.min(x1), x0.max(x1));
        let (y0, y1) = (y0.min(y1), y0.max(y1));
        if x1 - x0 <= 0.0 || y1 - y0 <= 0.0 {
            debug!(kind:? = region.kind; "Highlight region outside window");
            return;
        }

        let corners = [
            Point::new(x0, y0),
            Point::new(x1, y0),
            Point::new(x1, y1),
            Point::new(x0, y1),
        ]
        .map(|p| area.to_screen(p));
        builder.push(
            SceneLayer::Region,
            Primitive::Polygon(
                Polygon::new(corners.to_vec())
                    .with_fill(Fill::Tint)
                    .with_emphasis(Emphasis::Highlighted),
            ),
        );

        if let Some(text) = non_blank(region.label.as_deref()) {
            let center = Bounds::from_points(corners).map_or(corners[0], Bounds::center);
            builder.push(
                SceneLayer::Label,
                Primitive::Label(Label::new(center, text).with_emphasis(Emphasis::Highlighted)),
            );
        }
    }

    fn line_segment(&self, area: &PlotArea, line: &PlaneLine) -> Option<(Point, Point)> {
        let finite = |v: Option<f32>| v.filter(|v| v.is_finite());
        match line.kind {
            LineKind::Linear => {
                let slope = finite(line.slope)?;
                area.clip_linear(slope, finite(line.y_intercept).unwrap_or(0.0))
            }
            LineKind::Vertical => {
                let x = finite(line.x_value)?;
                area.clip(Point::new(x, area.y().min()), Point::new(x, area.y().max()))
            }
            LineKind::Horizontal => {
                let y = finite(line.y_value)?;
                area.clip(Point::new(area.x().min(), y), Point::new(area.x().max(), y))
            }
        }
    }

    fn push_line(&self, builder: &mut SceneBuilder, area: &PlotArea, line: &PlaneLine) {
        let Some((a, b)) = self.line_segment(area, line) else {
            debug!(kind:? = line.kind; "Line does not cross the window");
            return;
        };
        let (from, to) = (area.to_screen(a), area.to_screen(b));
        builder.push(
            SceneLayer::Shape,
            Primitive::Segment(Segment::new(from, to).with_stroke(line.style)),
        );
        if let Some(text) = non_blank(line.equation.as_deref()) {
            push_end_label(builder, from, to, text);
        }
    }

    fn push_curve(&self, builder: &mut SceneBuilder, area: &PlotArea, curve: &Curve) {
        let mut runs: Vec<Vec<Point>> = vec![Vec::new()];
        for point in &curve.points {
            let data = point.to_point();
            if data.is_finite() && area.contains(data) {
                if let Some(run) = runs.last_mut() {
                    run.push(area.to_screen(data));
                }
            } else if runs.last().is_some_and(|run| !run.is_empty()) {
                runs.push(Vec::new());
            }
        }
        runs.retain(|run| run.len() >= 2);

        let last_end = runs
            .last()
            .and_then(|run| Some((run[run.len() - 2], *run.last()?)));
        for run in runs {
            builder.push(
                SceneLayer::Shape,
                Primitive::Polyline(Polyline::new(run).with_stroke(curve.style)),
            );
        }
        if let (Some(text), Some((from, to))) = (non_blank(curve.equation.as_deref()), last_end) {
            push_end_label(builder, from, to, text);
        }
    }

    fn push_point(&self, builder: &mut SceneBuilder, area: &PlotArea, point: &PlanePoint) {
        let data = Point::new(point.x, point.y);
        if !data.is_finite() || !area.contains(data) {
            debug!(x = point.x, y = point.y; "Point outside window");
            return;
        }
        let at = area.to_screen(data);
        if point.style != PointStyle::Hidden {
            builder.push(
                SceneLayer::Point,
                Primitive::Circle(Circle::new(at, POINT_RADIUS, point.style == PointStyle::Closed)),
            );
        }
        if let Some(text) = non_blank(point.label.as_deref()) {
            builder.push(
                SceneLayer::Label,
                Primitive::Label(
                    Label::new(at.add_point(POINT_LABEL_OFFSET), text).with_anchor(TextAnchor::Start),
                ),
            );
        }
    }
}

/// Labels a line just short of its end point.
fn push_end_label(builder: &mut SceneBuilder, from: Point, to: Point, text: &str) {
    let back = from.sub_point(to).unit().scale(24.0);
    let position = to.add_point(back).add_point(Point::new(6.0, -8.0));
    builder.push(
        SceneLayer::Label,
        Primitive::Label(Label::new(position, text).with_anchor(TextAnchor::Start)),
    );
}

impl Generator for CartesianGenerator {
    type Params = CartesianParams;

    fn default_params(&self) -> CartesianParams {
        CartesianParams::default()
    }

    fn generate(&self, params: &CartesianParams) -> Scene {
        let defaults = CartesianParams::default();
        let x_range = sanitize_range(params.x_min, params.x_max, (defaults.x_min, defaults.x_max));
        let y_range = sanitize_range(params.y_min, params.y_max, (defaults.y_min, defaults.y_max));
        let screen = Bounds::new_from_top_left(
            Point::new(PLOT_PADDING, PLOT_PADDING),
            Size::new(
                VIEWPORT.width() - 2.0 * PLOT_PADDING,
                VIEWPORT.height() - 2.0 * PLOT_PADDING,
            ),
        );
        let area = PlotArea::new(x_range, y_range, screen);

        let mut builder = SceneBuilder::new(VIEWPORT);
        builder.set_title(params.title.clone());
        builder.set_caption(params.caption.clone());

        let xs = tick_values(
            x_range.0,
            x_range.1,
            tick_step(x_range.1 - x_range.0, None, MAX_GRID_INTERVALS),
        );
        let ys = tick_values(
            y_range.0,
            y_range.1,
            tick_step(y_range.1 - y_range.0, None, MAX_GRID_INTERVALS),
        );
        if params.show_grid {
            push_grid(&mut builder, &area, &xs, &ys);
        }

        let origin = Point::new(axis_position(area.x()), axis_position(area.y()));
        push_axes(&mut builder, &area, origin, &xs, &ys);

        let x_end = area.to_screen(Point::new(area.x().max(), origin.y()));
        if let Some(text) = non_blank(Some(params.x_label.as_str())) {
            builder.push(
                SceneLayer::Label,
                Primitive::Label(
                    Label::new(x_end.add_point(Point::new(AXIS_LABEL_GAP, 4.0)), text)
                        .with_anchor(TextAnchor::Start),
                ),
            );
        }
        let y_end = area.to_screen(Point::new(origin.x(), area.y().max()));
        if let Some(text) = non_blank(Some(params.y_label.as_str())) {
            builder.push(
                SceneLayer::Label,
                Primitive::Label(Label::new(y_end.add_point(Point::new(0.0, -AXIS_LABEL_GAP)), text)),
            );
        }

        if let Some(region) = &params.highlight_region {
            self.push_region(&mut builder, &area, region);
        }
        for line in &params.lines {
            self.push_line(&mut builder, &area, line);
        }
        for curve in &params.curves {
            self.push_curve(&mut builder, &area, curve);
        }
        for point in &params.points {
            self.push_point(&mut builder, &area, point);
        }

        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    fn generate(params: CartesianParams) -> Scene {
        CartesianGenerator.generate(&params)
    }

    fn shape_segments(scene: &Scene) -> Vec<Segment> {
        scene
            .items()
            .iter()
            .filter(|item| item.layer() == SceneLayer::Shape)
            .filter_map(|item| match item.primitive() {
                Primitive::Segment(segment) => Some(*segment),
                _ => None,
            })
            .collect()
    }

    fn linear(slope: f32, y_intercept: f32) -> PlaneLine {
        PlaneLine {
            kind: LineKind::Linear,
            slope: Some(slope),
            y_intercept: Some(y_intercept),
            x_value: None,
            y_value: None,
            equation: None,
            style: StrokeStyle::Solid,
        }
    }

    #[test]
    fn test_default_grid() {
        let scene = generate(CartesianParams::default());
        let grid = scene
            .items()
            .iter()
            .filter(|item| item.layer() == SceneLayer::Grid)
            .count();
        assert_eq!(grid, 42);
    }

    #[test]
    fn test_grid_is_limited() {
        let scene = generate(CartesianParams {
            x_min: -1000.0,
            x_max: 1000.0,
            ..CartesianParams::default()
        });
        let grid = scene
            .items()
            .iter()
            .filter(|item| item.layer() == SceneLayer::Grid)
            .count();
        assert!(grid <= 2 * (MAX_GRID_INTERVALS + 1));
    }

    #[test]
    fn test_linear_line_is_clipped() {
        let mut line = linear(2.0, 1.0);
        line.equation = Some("y = 2x + 1".to_string());
        let scene = generate(CartesianParams {
            lines: vec![line],
            ..CartesianParams::default()
        });
        let segments = shape_segments(&scene);
        assert_eq!(segments.len(), 1);
        // Window is 20 units over 420 px; y = -10 at x = -5.5, y = 10 at x = 4.5.
        assert_approx_eq!(f32, segments[0].start().x(), 40.0 + 4.5 * 21.0, epsilon = 1e-3);
        assert_approx_eq!(f32, segments[0].start().y(), 460.0, epsilon = 1e-3);
        assert_approx_eq!(f32, segments[0].end().x(), 40.0 + 14.5 * 21.0, epsilon = 1e-3);
        assert_approx_eq!(f32, segments[0].end().y(), 40.0, epsilon = 1e-3);
        assert!(scene.labels().any(|l| l.text() == "y = 2x + 1"));
    }

    #[test]
    fn test_line_outside_window_is_omitted() {
        let scene = generate(CartesianParams {
            lines: vec![linear(0.0, 50.0)],
            ..CartesianParams::default()
        });
        assert!(shape_segments(&scene).is_empty());
    }

    #[test]
    fn test_vertical_line_keeps_style() {
        let line = PlaneLine {
            kind: LineKind::Vertical,
            x_value: Some(3.0),
            style: StrokeStyle::Dashed,
            ..linear(0.0, 0.0)
        };
        let scene = generate(CartesianParams {
            lines: vec![line],
            ..CartesianParams::default()
        });
        let segments = shape_segments(&scene);
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].stroke(), StrokeStyle::Dashed);
        assert_eq!(segments[0].start().x(), segments[0].end().x());
    }

    #[test]
    fn test_axes_move_to_edge_when_zero_hidden() {
        let scene = generate(CartesianParams {
            x_min: 2.0,
            x_max: 8.0,
            y_min: 1.0,
            y_max: 5.0,
            show_grid: false,
            ..CartesianParams::default()
        });
        let axis: Vec<Segment> = scene.segments().copied().take(2).collect();
        // x axis along the bottom edge, y axis along the left edge.
        assert_eq!(axis[0].start().y(), 460.0);
        assert_eq!(axis[1].start().x(), 40.0);
    }

    #[test]
    fn test_points_outside_window_are_dropped() {
        let scene = generate(CartesianParams {
            points: vec![
                PlanePoint { x: 1.0, y: 2.0, label: Some("(1,2)".to_string()), style: PointStyle::Closed },
                PlanePoint { x: 30.0, y: 2.0, label: Some("far".to_string()), style: PointStyle::Open },
            ],
            ..CartesianParams::default()
        });
        assert_eq!(scene.circles().count(), 1);
        assert!(scene.labels().any(|l| l.text() == "(1,2)"));
        assert!(!scene.labels().any(|l| l.text() == "far"));
    }

    #[test]
    fn test_curve_splits_at_window_edge() {
        let points = [(-12.0, 0.0), (-8.0, 1.0), (-6.0, 2.0), (0.0, 20.0), (2.0, 1.0), (4.0, 0.0)]
            .map(|(x, y)| DataPoint { x, y })
            .to_vec();
        let scene = generate(CartesianParams {
            curves: vec![Curve { points, equation: None, style: StrokeStyle::Solid }],
            ..CartesianParams::default()
        });
        let runs: Vec<usize> = scene
            .primitives()
            .filter_map(|p| match p {
                Primitive::Polyline(line) => Some(line.points().len()),
                _ => None,
            })
            .collect();
        assert_eq!(runs, vec![2, 2]);
    }

    #[test]
    fn test_vertical_region() {
        let scene = generate(CartesianParams {
            highlight_region: Some(Region {
                kind: RegionKind::Vertical,
                x_min: Some(-2.0),
                x_max: Some(30.0),
                y_min: None,
                y_max: None,
                label: Some("domain".to_string()),
            }),
            ..CartesianParams::default()
        });
        let region = scene.polygons().find(|p| p.fill() == Fill::Tint).unwrap();
        let expected = [208.0, 460.0, 460.0, 208.0];
        for (point, x) in region.points().iter().zip(expected) {
            assert_approx_eq!(f32, point.x(), x, epsilon = 1e-3);
        }
        assert!(scene.labels().any(|l| l.text() == "domain"));
    }

    #[test]
    fn test_region_outside_window_is_omitted() {
        let scene = generate(CartesianParams {
            highlight_region: Some(Region {
                kind: RegionKind::Horizontal,
                x_min: None,
                x_max: None,
                y_min: Some(20.0),
                y_max: Some(30.0),
                label: None,
            }),
            ..CartesianParams::default()
        });
        assert_eq!(scene.polygons().count(), 0);
    }
}
