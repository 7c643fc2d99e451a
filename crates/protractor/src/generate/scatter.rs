//! Scatter plots of bivariate data.

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use protractor_core::{
    geometry::{Bounds, Point, Size},
    scene::{
        Circle, Emphasis, Label, Primitive, Scene, SceneBuilder, SceneLayer, Segment, TextAnchor,
    },
    stroke::StrokeStyle,
};

use super::{
    Generator, non_blank,
    plot::{PlotArea, push_axes, push_grid, sanitize_range, tick_step, tick_values},
};

pub const VIEWPORT: Size = Size::new(500.0, 400.0);

const PLOT_LEFT: f32 = 60.0;
const PLOT_TOP: f32 = 40.0;
const PLOT_SIZE: Size = Size::new(410.0, 300.0);
const MAX_GRID_INTERVALS: usize = 10;
const AUTO_PADDING: f32 = 0.1;
const EMPTY_RANGE: (f32, f32) = (0.0, 10.0);
const POINT_RADIUS: f32 = 4.0;
const HIGHLIGHT_RADIUS: f32 = 6.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterPoint {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScatterParams {
    pub points: Vec<ScatterPoint>,
    pub x_label: Option<String>,
    pub y_label: Option<String>,
    pub title: Option<String>,
    pub show_trend_line: bool,
    pub show_grid: bool,
    /// `[min, max]`; derived from the data when absent.
    pub x_range: Option<[f32; 2]>,
    pub y_range: Option<[f32; 2]>,
    /// Index of the point to emphasise, `-1` for none.
    pub highlight_point: i64,
    pub caption: Option<String>,
}

impl Default for ScatterParams {
    fn default() -> Self {
        Self {
            points: Vec::new(),
            x_label: None,
            y_label: None,
            title: None,
            show_trend_line: false,
            show_grid: true,
            x_range: None,
            y_range: None,
            highlight_point: -1,
            caption: None,
        }
    }
}

/// Least-squares `(slope, intercept)` through the finite points.
///
/// Returns `None` for fewer than two points or when every point shares one x.
pub fn least_squares(points: &[Point]) -> Option<(f32, f32)> {
    let finite: Vec<Point> = points.iter().copied().filter(|p| p.is_finite()).collect();
    if finite.len() < 2 {
        return None;
    }
    let n = finite.len() as f64;
    let mean_x = finite.iter().map(|p| f64::from(p.x())).sum::<f64>() / n;
    let mean_y = finite.iter().map(|p| f64::from(p.y())).sum::<f64>() / n;
    let (mut sxx, mut sxy) = (0.0f64, 0.0f64);
    for p in &finite {
        let dx = f64::from(p.x()) - mean_x;
        sxx += dx * dx;
        sxy += dx * (f64::from(p.y()) - mean_y);
    }
    if sxx <= f64::EPSILON * n {
        return None;
    }
    let slope = sxy / sxx;
    Some((slope as f32, (mean_y - slope * mean_x) as f32))
}

/// Data extent padded by a tenth of its span on each side.
fn auto_range(values: impl Iterator<Item = f32>) -> (f32, f32) {
    let (lo, hi) = values
        .filter(|v| v.is_finite())
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if lo > hi {
        return EMPTY_RANGE;
    }
    let span = hi - lo;
    if span <= f32::EPSILON {
        return sanitize_range(lo - 1.0, hi + 1.0, EMPTY_RANGE);
    }
    sanitize_range(lo - span * AUTO_PADDING, hi + span * AUTO_PADDING, EMPTY_RANGE)
}

fn resolve_range(explicit: Option<[f32; 2]>, values: impl Iterator<Item = f32>) -> (f32, f32) {
    let auto = auto_range(values);
    match explicit {
        Some([min, max]) => sanitize_range(min, max, auto),
        None => auto,
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ScatterGenerator;

impl ScatterGenerator {
    fn push_trend_line(&self, builder: &mut SceneBuilder, area: &PlotArea, points: &[ScatterPoint]) {
        let data: Vec<Point> = points.iter().map(|p| Point::new(p.x, p.y)).collect();
        let Some((slope, intercept)) = least_squares(&data) else {
            debug!(points = points.len(); "No trend line for this data");
            return;
        };
        trace!(slope = slope, intercept = intercept; "Trend line");
        let Some((a, b)) = area.clip_linear(slope, intercept) else {
            debug!("Trend line misses the window");
            return;
        };
        builder.push(
            SceneLayer::Shape,
            Primitive::Segment(
                Segment::new(area.to_screen(a), area.to_screen(b))
                    .with_stroke(StrokeStyle::Dashed)
                    .with_emphasis(Emphasis::Highlighted),
            ),
        );
    }
}

impl Generator for ScatterGenerator {
    type Params = ScatterParams;

    fn default_params(&self) -> ScatterParams {
        ScatterParams::default()
    }

    fn generate(&self, params: &ScatterParams) -> Scene {
        let x_range = resolve_range(params.x_range, params.points.iter().map(|p| p.x));
        let y_range = resolve_range(params.y_range, params.points.iter().map(|p| p.y));
        let screen = Bounds::new_from_top_left(Point::new(PLOT_LEFT, PLOT_TOP), PLOT_SIZE);
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
        // Axes frame the bottom and left edges regardless of where zero is.
        push_axes(
            &mut builder,
            &area,
            Point::new(area.x().min(), area.y().min()),
            &xs,
            &ys,
        );

        if let Some(text) = non_blank(params.x_label.as_deref()) {
            builder.push(
                SceneLayer::Label,
                Primitive::Label(Label::new(
                    Point::new(screen.center().x(), screen.max_y() + 38.0),
                    text,
                )),
            );
        }
        if let Some(text) = non_blank(params.y_label.as_deref()) {
            builder.push(
                SceneLayer::Label,
                Primitive::Label(
                    Label::new(Point::new(screen.min_x(), screen.min_y() - 14.0), text)
                        .with_anchor(TextAnchor::Start),
                ),
            );
        }

        if params.show_trend_line {
            self.push_trend_line(&mut builder, &area, &params.points);
        }

        for (index, point) in params.points.iter().enumerate() {
            let data = Point::new(point.x, point.y);
            if !data.is_finite() || !area.contains(data) {
                debug!(index = index; "Scatter point outside window");
                continue;
            }
            let highlighted = usize::try_from(params.highlight_point) == Ok(index);
            let emphasis = Emphasis::from_flag(highlighted);
            let at = area.to_screen(data);
            let radius = if highlighted { HIGHLIGHT_RADIUS } else { POINT_RADIUS };
            builder.push(
                SceneLayer::Point,
                Primitive::Circle(Circle::new(at, radius, true).with_emphasis(emphasis)),
            );
            if let Some(text) = non_blank(point.label.as_deref()) {
                builder.push(
                    SceneLayer::Label,
                    Primitive::Label(
                        Label::new(at.add_point(Point::new(8.0, -8.0)), text)
                            .with_anchor(TextAnchor::Start)
                            .with_emphasis(emphasis),
                    ),
                );
            }
        }

        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    fn point(x: f32, y: f32) -> ScatterPoint {
        ScatterPoint { x, y, label: None }
    }

    fn trend_segments(scene: &Scene) -> Vec<Segment> {
        scene
            .segments()
            .filter(|s| s.stroke() == StrokeStyle::Dashed)
            .copied()
            .collect()
    }

    #[test]
    fn test_least_squares_exact_line() {
        let points = [(0.0, 1.0), (1.0, 3.0), (2.0, 5.0)].map(|(x, y)| Point::new(x, y));
        let (slope, intercept) = least_squares(&points).unwrap();
        assert_approx_eq!(f32, slope, 2.0, epsilon = 1e-5);
        assert_approx_eq!(f32, intercept, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_least_squares_degenerate() {
        assert!(least_squares(&[Point::new(1.0, 1.0)]).is_none());
        assert!(least_squares(&[Point::new(2.0, 1.0), Point::new(2.0, 5.0)]).is_none());
    }

    #[test]
    fn test_auto_range_pads_data() {
        let (lo, hi) = auto_range([0.0, 10.0].into_iter());
        assert_approx_eq!(f32, lo, -1.0);
        assert_approx_eq!(f32, hi, 11.0);
        assert_eq!(auto_range(std::iter::empty()), EMPTY_RANGE);
        assert_eq!(auto_range([3.0].into_iter()), (2.0, 4.0));
    }

    #[test]
    fn test_auto_range_extreme_data() {
        assert_eq!(auto_range([-3e38, 3e38].into_iter()), EMPTY_RANGE);
        let (lo, hi) = auto_range([1e9, 1e9].into_iter());
        assert!(hi > lo);

        let params = ScatterParams {
            points: vec![point(-3e38, 1.0), point(3e38, 2.0)],
            ..ScatterParams::default()
        };
        let scene = ScatterGenerator.generate(&params);
        assert!(scene.segments().all(|s| s.start().is_finite() && s.end().is_finite()));
    }

    #[test]
    fn test_explicit_range_wins() {
        assert_eq!(resolve_range(Some([5.0, 0.0]), [1.0, 2.0].into_iter()), (0.0, 5.0));
    }

    #[test]
    fn test_trend_line_drawn_when_requested() {
        let params = ScatterParams {
            points: vec![point(1.0, 2.0), point(2.0, 4.1), point(3.0, 5.9), point(4.0, 8.0)],
            show_trend_line: true,
            ..ScatterParams::default()
        };
        let scene = ScatterGenerator.generate(&params);
        assert_eq!(trend_segments(&scene).len(), 1);
        assert_eq!(scene.circles().count(), 4);
    }

    #[test]
    fn test_no_trend_line_for_single_point() {
        let params = ScatterParams {
            points: vec![point(1.0, 2.0)],
            show_trend_line: true,
            ..ScatterParams::default()
        };
        let scene = ScatterGenerator.generate(&params);
        assert!(trend_segments(&scene).is_empty());
    }

    #[test]
    fn test_highlight_point() {
        let params = ScatterParams {
            points: vec![point(1.0, 2.0), point(2.0, 3.0)],
            highlight_point: 1,
            ..ScatterParams::default()
        };
        let scene = ScatterGenerator.generate(&params);
        let emphases: Vec<bool> = scene.circles().map(|c| c.emphasis().is_highlighted()).collect();
        assert_eq!(emphases, vec![false, true]);
    }

    #[test]
    fn test_out_of_range_highlight_is_ignored() {
        let params = ScatterParams {
            points: vec![point(1.0, 2.0)],
            highlight_point: 7,
            ..ScatterParams::default()
        };
        let scene = ScatterGenerator.generate(&params);
        assert!(scene.circles().all(|c| !c.emphasis().is_highlighted()));
    }

    #[test]
    fn test_points_outside_explicit_range_are_dropped() {
        let params = ScatterParams {
            points: vec![point(1.0, 2.0), point(50.0, 2.0)],
            x_range: Some([0.0, 10.0]),
            y_range: Some([0.0, 10.0]),
            ..ScatterParams::default()
        };
        let scene = ScatterGenerator.generate(&params);
        assert_eq!(scene.circles().count(), 1);
    }

    #[test]
    fn test_grid_toggle() {
        let with_grid = ScatterGenerator.generate(&ScatterParams::default());
        let without = ScatterGenerator.generate(&ScatterParams {
            show_grid: false,
            ..ScatterParams::default()
        });
        let grid = |scene: &Scene| {
            scene
                .items()
                .iter()
                .filter(|item| item.layer() == SceneLayer::Grid)
                .count()
        };
        assert!(grid(&with_grid) > 0);
        assert_eq!(grid(&without), 0);
    }
}
