//! Number lines with shaded intervals and marked points.
//!
//! Bounded interval ends get a closed circle when included and an open one
//! when excluded; an end given as `null` is unbounded and runs out to the
//! arrow tip. Interval ends beyond the visible range are cut at the edge.

use log::debug;
use serde::{Deserialize, Serialize};

use protractor_core::{
    geometry::{Point, Size},
    scene::{
        Circle, Emphasis, Fill, Label, LabelRole, Polygon, Primitive, Scene, SceneBuilder,
        SceneLayer, Segment,
    },
};

use super::{
    Generator, PointStyle, non_blank,
    plot::{LinearScale, format_value, sanitize_range, tick_step, tick_values},
};

pub const VIEWPORT: Size = Size::new(600.0, 140.0);

const AXIS_Y: f32 = 80.0;
const LINE_START: f32 = 50.0;
const LINE_END: f32 = 550.0;
/// How far arrows reach beyond the first and last tick.
const ARROW_OVERHANG: f32 = 20.0;
const ARROW_LENGTH: f32 = 10.0;
const ARROW_HALF_WIDTH: f32 = 5.0;
const TICK_HALF: f32 = 6.0;
const INTEGER_TICK_HALF: f32 = 9.0;
const TICK_LABEL_Y: f32 = AXIS_Y + 24.0;
const BAND_HALF: f32 = 5.0;
const ENDPOINT_RADIUS: f32 = 5.0;
const INTERVAL_LABEL_Y: f32 = AXIS_Y - 22.0;
const POINT_LABEL_Y: f32 = AXIS_Y - 16.0;
const MAX_TICK_INTERVALS: usize = 100;

/// A stretch of the line to shade. `None` ends are unbounded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Interval {
    pub start: Option<f32>,
    pub end: Option<f32>,
    pub start_inclusive: bool,
    pub end_inclusive: bool,
    pub label: Option<String>,
}

impl Default for Interval {
    fn default() -> Self {
        Self {
            start: None,
            end: None,
            start_inclusive: true,
            end_inclusive: true,
            label: None,
        }
    }
}

/// A single marked value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NumberPoint {
    pub value: f32,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub style: PointStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NumberLineParams {
    pub min: f32,
    pub max: f32,
    pub step: f32,
    pub intervals: Vec<Interval>,
    pub points: Vec<NumberPoint>,
    pub show_tick_marks: bool,
    pub show_tick_labels: bool,
    pub show_arrows: bool,
    /// Draws integer ticks longer and emphasised.
    pub highlight_integers: bool,
    pub title: Option<String>,
    pub caption: Option<String>,
}

impl Default for NumberLineParams {
    fn default() -> Self {
        Self {
            min: -5.0,
            max: 5.0,
            step: 1.0,
            intervals: Vec::new(),
            points: Vec::new(),
            show_tick_marks: true,
            show_tick_labels: true,
            show_arrows: true,
            highlight_integers: false,
            title: None,
            caption: None,
        }
    }
}

/// One visible end of an interval on screen.
struct IntervalEnd {
    x: f32,
    /// `Some(inclusive)` when the end is a real endpoint inside the range.
    endpoint: Option<bool>,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NumberLineGenerator;

impl NumberLineGenerator {
    fn push_axis(&self, builder: &mut SceneBuilder, show_arrows: bool) {
        let (left, right) = line_extent(show_arrows);
        builder.push(
            SceneLayer::Axis,
            Primitive::Segment(Segment::new(Point::new(left, AXIS_Y), Point::new(right, AXIS_Y))),
        );
        if !show_arrows {
            return;
        }
        for (tip, inward) in [(left, 1.0), (right, -1.0)] {
            let base = tip + inward * ARROW_LENGTH;
            let head = Polygon::new(vec![
                Point::new(base, AXIS_Y - ARROW_HALF_WIDTH),
                Point::new(tip, AXIS_Y),
                Point::new(base, AXIS_Y + ARROW_HALF_WIDTH),
            ])
            .with_fill(Fill::Solid);
            builder.push(SceneLayer::Axis, Primitive::Polygon(head));
        }
    }

    fn push_ticks(
        &self,
        builder: &mut SceneBuilder,
        scale: &LinearScale,
        params: &NumberLineParams,
    ) {
        let step = tick_step(scale.span(), Some(params.step), MAX_TICK_INTERVALS);
        if step != params.step {
            debug!(requested = params.step, used = step; "Number line step adjusted");
        }

        for value in tick_values(scale.min(), scale.max(), step) {
            let x = scale.map(value);
            let integer = (value - value.round()).abs() < 1e-4;
            let emphasis = Emphasis::from_flag(params.highlight_integers && integer);
            let half = if emphasis.is_highlighted() {
                INTEGER_TICK_HALF
            } else {
                TICK_HALF
            };

            if params.show_tick_marks {
                builder.push(
                    SceneLayer::Axis,
                    Primitive::Segment(
                        Segment::new(Point::new(x, AXIS_Y - half), Point::new(x, AXIS_Y + half))
                            .with_emphasis(emphasis),
                    ),
                );
            }
            if params.show_tick_labels {
                builder.push(
                    SceneLayer::Label,
                    Primitive::Label(
                        Label::new(Point::new(x, TICK_LABEL_Y), format_value(value))
                            .with_role(LabelRole::Tick)
                            .with_emphasis(emphasis),
                    ),
                );
            }
        }
    }

    fn push_interval(
        &self,
        builder: &mut SceneBuilder,
        scale: &LinearScale,
        interval: &Interval,
        show_arrows: bool,
    ) {
        let lo = interval.start.filter(|v| v.is_finite());
        let hi = interval.end.filter(|v| v.is_finite());
        let (mut lo, mut hi, mut lo_inclusive, mut hi_inclusive) =
            (lo, hi, interval.start_inclusive, interval.end_inclusive);
        if let (Some(a), Some(b)) = (lo, hi) {
            if a > b {
                std::mem::swap(&mut lo, &mut hi);
                std::mem::swap(&mut lo_inclusive, &mut hi_inclusive);
            }
        }

        let below = hi.is_some_and(|b| b < scale.min());
        let above = lo.is_some_and(|a| a > scale.max());
        if below || above {
            debug!(start:? = interval.start, end:? = interval.end; "Interval outside number line");
            return;
        }

        let (left_edge, right_edge) = line_extent(show_arrows);
        let start = match lo {
            None => IntervalEnd { x: left_edge, endpoint: None },
            Some(a) if a < scale.min() => IntervalEnd { x: LINE_START, endpoint: None },
            Some(a) => IntervalEnd { x: scale.map(a), endpoint: Some(lo_inclusive) },
        };
        let end = match hi {
            None => IntervalEnd { x: right_edge, endpoint: None },
            Some(b) if b > scale.max() => IntervalEnd { x: LINE_END, endpoint: None },
            Some(b) => IntervalEnd { x: scale.map(b), endpoint: Some(hi_inclusive) },
        };

        let band = Polygon::new(vec![
            Point::new(start.x, AXIS_Y - BAND_HALF),
            Point::new(end.x, AXIS_Y - BAND_HALF),
            Point::new(end.x, AXIS_Y + BAND_HALF),
            Point::new(start.x, AXIS_Y + BAND_HALF),
        ])
        .with_fill(Fill::Tint)
        .with_emphasis(Emphasis::Highlighted);
        builder.push(SceneLayer::Region, Primitive::Polygon(band));
        builder.push(
            SceneLayer::Shape,
            Primitive::Segment(
                Segment::new(Point::new(start.x, AXIS_Y), Point::new(end.x, AXIS_Y))
                    .with_emphasis(Emphasis::Highlighted),
            ),
        );

        for side in [&start, &end] {
            if let Some(inclusive) = side.endpoint {
                builder.push(
                    SceneLayer::Point,
                    Primitive::Circle(
                        Circle::new(Point::new(side.x, AXIS_Y), ENDPOINT_RADIUS, inclusive)
                            .with_emphasis(Emphasis::Highlighted),
                    ),
                );
            }
        }

        if let Some(text) = non_blank(interval.label.as_deref()) {
            builder.push(
                SceneLayer::Label,
                Primitive::Label(
                    Label::new(Point::new((start.x + end.x) / 2.0, INTERVAL_LABEL_Y), text)
                        .with_emphasis(Emphasis::Highlighted),
                ),
            );
        }
    }

    fn push_point(&self, builder: &mut SceneBuilder, scale: &LinearScale, point: &NumberPoint) {
        if !point.value.is_finite() || !scale.contains(point.value) {
            debug!(value = point.value; "Point outside number line");
            return;
        }
        let x = scale.map(point.value);
        if point.style != PointStyle::Hidden {
            builder.push(
                SceneLayer::Point,
                Primitive::Circle(Circle::new(
                    Point::new(x, AXIS_Y),
                    ENDPOINT_RADIUS,
                    point.style == PointStyle::Closed,
                )),
            );
        }
        if let Some(text) = non_blank(point.label.as_deref()) {
            builder.push(
                SceneLayer::Label,
                Primitive::Label(Label::new(Point::new(x, POINT_LABEL_Y), text)),
            );
        }
    }
}

impl Generator for NumberLineGenerator {
    type Params = NumberLineParams;

    fn default_params(&self) -> NumberLineParams {
        NumberLineParams::default()
    }

    fn generate(&self, params: &NumberLineParams) -> Scene {
        let defaults = NumberLineParams::default();
        let range = sanitize_range(params.min, params.max, (defaults.min, defaults.max));
        let scale = LinearScale::new(range, (LINE_START, LINE_END));

        let mut builder = SceneBuilder::new(VIEWPORT);
        builder.set_title(params.title.clone());
        builder.set_caption(params.caption.clone());

        self.push_axis(&mut builder, params.show_arrows);
        self.push_ticks(&mut builder, &scale, params);
        for interval in &params.intervals {
            self.push_interval(&mut builder, &scale, interval, params.show_arrows);
        }
        for point in &params.points {
            self.push_point(&mut builder, &scale, point);
        }

        builder.build()
    }
}

/// Screen x of the two ends of the drawn line.
fn line_extent(show_arrows: bool) -> (f32, f32) {
    if show_arrows {
        (LINE_START - ARROW_OVERHANG, LINE_END + ARROW_OVERHANG)
    } else {
        (LINE_START, LINE_END)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn closed_interval(start: Option<f32>, end: Option<f32>) -> Interval {
        Interval {
            start,
            end,
            ..Interval::default()
        }
    }

    fn generate(params: NumberLineParams) -> Scene {
        NumberLineGenerator.generate(&params)
    }

    fn endpoint_fills(scene: &Scene) -> Vec<bool> {
        scene.circles().map(|c| c.filled()).collect()
    }

    #[test]
    fn test_default_ticks() {
        let scene = generate(NumberLineParams::default());
        let labels: Vec<&str> = scene.labels().map(Label::text).collect();
        assert_eq!(labels, vec!["-5", "-4", "-3", "-2", "-1", "0", "1", "2", "3", "4", "5"]);
        assert_eq!(scene.title(), None);
    }

    #[test]
    fn test_closed_interval_has_two_closed_ends() {
        let scene = generate(NumberLineParams {
            min: 0.0,
            max: 7.0,
            intervals: vec![closed_interval(Some(2.0), Some(5.0))],
            ..NumberLineParams::default()
        });
        assert_eq!(endpoint_fills(&scene), vec![true, true]);
        let band = scene.polygons().find(|p| p.fill() == Fill::Tint).unwrap();
        assert_eq!(band.points()[0].x(), LINE_START + 2.0 / 7.0 * 500.0);
    }

    #[test]
    fn test_half_open_interval() {
        let scene = generate(NumberLineParams {
            min: 0.0,
            max: 6.0,
            intervals: vec![Interval {
                start: Some(1.0),
                end: Some(4.0),
                start_inclusive: false,
                label: Some("(1, 4]".to_string()),
                ..Interval::default()
            }],
            ..NumberLineParams::default()
        });
        assert_eq!(endpoint_fills(&scene), vec![false, true]);
        assert!(scene.labels().any(|l| l.text() == "(1, 4]"));
    }

    #[test]
    fn test_unbounded_interval_runs_to_arrow() {
        let scene = generate(NumberLineParams {
            intervals: vec![closed_interval(None, Some(2.0))],
            ..NumberLineParams::default()
        });
        assert_eq!(endpoint_fills(&scene), vec![true]);
        let band = scene.polygons().find(|p| p.fill() == Fill::Tint).unwrap();
        assert_eq!(band.points()[0].x(), LINE_START - ARROW_OVERHANG);
    }

    #[test]
    fn test_interval_clamped_to_range() {
        let scene = generate(NumberLineParams {
            intervals: vec![closed_interval(Some(-20.0), Some(0.0))],
            ..NumberLineParams::default()
        });
        assert_eq!(endpoint_fills(&scene), vec![true]);
        let band = scene.polygons().find(|p| p.fill() == Fill::Tint).unwrap();
        assert_eq!(band.points()[0].x(), LINE_START);
    }

    #[test]
    fn test_interval_outside_range_is_omitted() {
        let scene = generate(NumberLineParams {
            intervals: vec![closed_interval(Some(8.0), Some(9.0))],
            ..NumberLineParams::default()
        });
        assert_eq!(scene.circles().count(), 0);
        assert!(scene.polygons().all(|p| p.fill() != Fill::Tint));
    }

    #[test]
    fn test_reversed_interval_is_swapped() {
        let reversed = generate(NumberLineParams {
            intervals: vec![closed_interval(Some(3.0), Some(1.0))],
            ..NumberLineParams::default()
        });
        let ordered = generate(NumberLineParams {
            intervals: vec![closed_interval(Some(1.0), Some(3.0))],
            ..NumberLineParams::default()
        });
        assert_eq!(reversed, ordered);
    }

    #[test]
    fn test_reversed_range_is_swapped() {
        let reversed = generate(NumberLineParams {
            min: 5.0,
            max: -5.0,
            ..NumberLineParams::default()
        });
        assert_eq!(reversed, generate(NumberLineParams::default()));
    }

    #[test]
    fn test_tiny_step_is_limited() {
        let scene = generate(NumberLineParams {
            step: 0.001,
            show_tick_labels: false,
            ..NumberLineParams::default()
        });
        let ticks = scene.segments().count() - 1;
        assert!(ticks <= MAX_TICK_INTERVALS + 1, "{ticks} ticks");
        assert!(ticks > 10);
    }

    #[test]
    fn test_points() {
        let scene = generate(NumberLineParams {
            show_tick_labels: false,
            points: vec![
                NumberPoint { value: 1.0, label: Some("a".to_string()), style: PointStyle::Open },
                NumberPoint { value: 2.0, label: Some("b".to_string()), style: PointStyle::Hidden },
                NumberPoint { value: 42.0, label: Some("c".to_string()), style: PointStyle::Closed },
            ],
            ..NumberLineParams::default()
        });
        assert_eq!(endpoint_fills(&scene), vec![false]);
        let labels: Vec<&str> = scene.labels().map(Label::text).collect();
        assert_eq!(labels, vec!["a", "b"]);
    }

    #[test]
    fn test_highlight_integers() {
        let scene = generate(NumberLineParams {
            min: 0.0,
            max: 2.0,
            step: 0.5,
            highlight_integers: true,
            ..NumberLineParams::default()
        });
        let highlighted: Vec<&str> = scene
            .labels()
            .filter(|l| l.emphasis().is_highlighted())
            .map(Label::text)
            .collect();
        assert_eq!(highlighted, vec!["0", "1", "2"]);
    }

    #[test]
    fn test_no_arrows() {
        let scene = generate(NumberLineParams {
            show_arrows: false,
            ..NumberLineParams::default()
        });
        assert_eq!(scene.polygons().count(), 0);
    }
}
