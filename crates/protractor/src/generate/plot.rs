//! Affine data-to-viewport mapping shared by the chart-like generators.
//!
//! Number lines, coordinate planes and scatter plots have no angular
//! geometry. They map a data window onto a screen rectangle, pick readable
//! tick spacings and clip lines to the window.

use protractor_core::{
    geometry::{Bounds, Point},
    scene::{Label, LabelRole, Primitive, SceneBuilder, SceneLayer, Segment, TextAnchor},
};

/// Upper bound on the ticks one axis can produce.
const MAX_TICK_VALUES: i64 = 1_000;

/// One-dimensional affine map from a data interval onto a screen interval.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct LinearScale {
    domain: (f32, f32),
    range: (f32, f32),
}

impl LinearScale {
    /// The domain must be non-empty; see [`sanitize_range`].
    pub(crate) fn new(domain: (f32, f32), range: (f32, f32)) -> Self {
        Self { domain, range }
    }

    pub(crate) fn min(&self) -> f32 {
        self.domain.0
    }

    pub(crate) fn max(&self) -> f32 {
        self.domain.1
    }

    pub(crate) fn span(&self) -> f32 {
        self.domain.1 - self.domain.0
    }

    pub(crate) fn map(&self, value: f32) -> f32 {
        let t = (value - self.domain.0) / self.span();
        self.range.0 + t * (self.range.1 - self.range.0)
    }

    pub(crate) fn contains(&self, value: f32) -> bool {
        value >= self.domain.0 && value <= self.domain.1
    }

    pub(crate) fn clamp(&self, value: f32) -> f32 {
        value.clamp(self.domain.0, self.domain.1)
    }
}

/// Orders a `(min, max)` pair into a usable, non-empty data range.
///
/// Non-finite bounds, or bounds whose span overflows, fall back to `default`.
/// Reversed bounds are swapped and an empty range is widened by one unit, or
/// by a thousandth of its magnitude when one unit would round away.
pub(crate) fn sanitize_range(min: f32, max: f32, default: (f32, f32)) -> (f32, f32) {
    if !min.is_finite() || !max.is_finite() || !(max - min).is_finite() {
        return default;
    }
    let (lo, hi) = if max < min { (max, min) } else { (min, max) };
    if hi - lo > f32::EPSILON * lo.abs().max(1.0) {
        return (lo, hi);
    }
    let widened = lo + (lo.abs() * 1e-3).max(1.0);
    if widened.is_finite() && widened > lo {
        (lo, widened)
    } else {
        default
    }
}

/// Smallest 1, 2 or 5 times a power of ten that is at least `raw`.
pub(crate) fn nice_step(raw: f32) -> f32 {
    if !raw.is_finite() || raw <= 0.0 {
        return 1.0;
    }
    let magnitude = 10f32.powf(raw.log10().floor());
    [1.0, 2.0, 5.0, 10.0]
        .into_iter()
        .map(|m| m * magnitude)
        .find(|step| *step >= raw * (1.0 - 1e-5))
        .unwrap_or(10.0 * magnitude)
}

/// Tick spacing for a range of `span`: the requested step if it yields at
/// most `max_intervals` intervals, otherwise a nice step that does.
pub(crate) fn tick_step(span: f32, requested: Option<f32>, max_intervals: usize) -> f32 {
    let limit = max_intervals.max(1) as f32;
    match requested {
        Some(step) if step.is_finite() && step > 0.0 && span / step <= limit => step,
        _ => nice_step(span / limit),
    }
}

/// Multiples of `step` that fall inside `[min, max]`, at most
/// `MAX_TICK_VALUES + 1` of them.
pub(crate) fn tick_values(min: f32, max: f32, step: f32) -> Vec<f32> {
    let first = (min / step - 1e-4).ceil() as i64;
    let last = (max / step + 1e-4).floor() as i64;
    let last = last.min(first.saturating_add(MAX_TICK_VALUES));
    (first..=last)
        .map(|i| {
            let value = i as f32 * step;
            if value.abs() < step * 1e-6 { 0.0 } else { value }
        })
        .collect()
}

/// Short text for a tick value: integers without a decimal point, anything
/// else with at most two decimals.
pub(crate) fn format_value(value: f32) -> String {
    if (value - value.round()).abs() < 1e-4 {
        let rounded = value.round();
        let rounded = if rounded == 0.0 { 0.0 } else { rounded };
        return format!("{rounded:.0}");
    }
    let text = format!("{value:.2}");
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}

/// Two-dimensional data window mapped onto a screen rectangle, y up.
#[derive(Debug, Clone, Copy)]
pub(crate) struct PlotArea {
    x: LinearScale,
    y: LinearScale,
}

impl PlotArea {
    pub(crate) fn new(x_range: (f32, f32), y_range: (f32, f32), screen: Bounds) -> Self {
        Self {
            x: LinearScale::new(x_range, (screen.min_x(), screen.max_x())),
            y: LinearScale::new(y_range, (screen.max_y(), screen.min_y())),
        }
    }

    pub(crate) fn x(&self) -> &LinearScale {
        &self.x
    }

    pub(crate) fn y(&self) -> &LinearScale {
        &self.y
    }

    /// Screen position of a data point.
    pub(crate) fn to_screen(&self, data: Point) -> Point {
        Point::new(self.x.map(data.x()), self.y.map(data.y()))
    }

    pub(crate) fn contains(&self, data: Point) -> bool {
        self.x.contains(data.x()) && self.y.contains(data.y())
    }

    /// Clips a data-space segment to the window (Liang-Barsky).
    pub(crate) fn clip(&self, a: Point, b: Point) -> Option<(Point, Point)> {
        let d = b.sub_point(a);
        let mut t0 = 0.0f32;
        let mut t1 = 1.0f32;
        let edges = [
            (-d.x(), a.x() - self.x.min()),
            (d.x(), self.x.max() - a.x()),
            (-d.y(), a.y() - self.y.min()),
            (d.y(), self.y.max() - a.y()),
        ];
        for (p, q) in edges {
            if p == 0.0 {
                if q < 0.0 {
                    return None;
                }
                continue;
            }
            let r = q / p;
            if p < 0.0 {
                if r > t1 {
                    return None;
                }
                t0 = t0.max(r);
            } else {
                if r < t0 {
                    return None;
                }
                t1 = t1.min(r);
            }
        }
        if t1 - t0 <= f32::EPSILON {
            return None;
        }
        Some((a.lerp(b, t0), a.lerp(b, t1)))
    }

    /// Clips the line `y = slope·x + intercept` to the window.
    pub(crate) fn clip_linear(&self, slope: f32, intercept: f32) -> Option<(Point, Point)> {
        let a = Point::new(self.x.min(), slope * self.x.min() + intercept);
        let b = Point::new(self.x.max(), slope * self.x.max() + intercept);
        if !a.is_finite() || !b.is_finite() {
            return None;
        }
        self.clip(a, b)
    }
}

/// Where an axis crosses a range: at zero when zero is visible, otherwise
/// on the nearest edge.
pub(crate) fn axis_position(scale: &LinearScale) -> f32 {
    scale.clamp(0.0)
}

/// Grid lines at the given data coordinates.
pub(crate) fn push_grid(builder: &mut SceneBuilder, area: &PlotArea, xs: &[f32], ys: &[f32]) {
    for &x in xs {
        let from = area.to_screen(Point::new(x, area.y().min()));
        let to = area.to_screen(Point::new(x, area.y().max()));
        builder.push(SceneLayer::Grid, Primitive::Segment(Segment::new(from, to)));
    }
    for &y in ys {
        let from = area.to_screen(Point::new(area.x().min(), y));
        let to = area.to_screen(Point::new(area.x().max(), y));
        builder.push(SceneLayer::Grid, Primitive::Segment(Segment::new(from, to)));
    }
}

/// Half-length of a tick mark across its axis.
const TICK_HALF: f32 = 4.0;
/// Distance from an axis to its tick labels.
const TICK_LABEL_GAP: f32 = 16.0;

/// Axes crossing at `origin` (data space) with tick marks and labels.
///
/// The tick label at the crossing point is written once, on the x axis.
pub(crate) fn push_axes(
    builder: &mut SceneBuilder,
    area: &PlotArea,
    origin: Point,
    xs: &[f32],
    ys: &[f32],
) {
    let x_from = area.to_screen(Point::new(area.x().min(), origin.y()));
    let x_to = area.to_screen(Point::new(area.x().max(), origin.y()));
    builder.push(SceneLayer::Axis, Primitive::Segment(Segment::new(x_from, x_to)));

    let y_from = area.to_screen(Point::new(origin.x(), area.y().min()));
    let y_to = area.to_screen(Point::new(origin.x(), area.y().max()));
    builder.push(SceneLayer::Axis, Primitive::Segment(Segment::new(y_from, y_to)));

    for &x in xs {
        let at = area.to_screen(Point::new(x, origin.y()));
        builder.push(
            SceneLayer::Axis,
            Primitive::Segment(Segment::new(
                at.add_point(Point::new(0.0, -TICK_HALF)),
                at.add_point(Point::new(0.0, TICK_HALF)),
            )),
        );
        builder.push(
            SceneLayer::Label,
            Primitive::Label(
                Label::new(at.add_point(Point::new(0.0, TICK_LABEL_GAP)), format_value(x))
                    .with_role(LabelRole::Tick),
            ),
        );
    }

    for &y in ys {
        let at = area.to_screen(Point::new(origin.x(), y));
        builder.push(
            SceneLayer::Axis,
            Primitive::Segment(Segment::new(
                at.add_point(Point::new(-TICK_HALF, 0.0)),
                at.add_point(Point::new(TICK_HALF, 0.0)),
            )),
        );
        if y == origin.y() && xs.contains(&origin.x()) {
            continue;
        }
        builder.push(
            SceneLayer::Label,
            Primitive::Label(
                Label::new(at.add_point(Point::new(-TICK_HALF - 4.0, 4.0)), format_value(y))
                    .with_anchor(TextAnchor::End)
                    .with_role(LabelRole::Tick),
            ),
        );
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;
    use protractor_core::geometry::Size;

    use super::*;

    fn unit_area() -> PlotArea {
        PlotArea::new(
            (-10.0, 10.0),
            (-10.0, 10.0),
            Bounds::new_from_top_left(Point::new(0.0, 0.0), Size::new(200.0, 200.0)),
        )
    }

    #[test]
    fn test_linear_scale_maps_endpoints() {
        let scale = LinearScale::new((-5.0, 5.0), (50.0, 550.0));
        assert_eq!(scale.map(-5.0), 50.0);
        assert_eq!(scale.map(5.0), 550.0);
        assert_eq!(scale.map(0.0), 300.0);
    }

    #[test]
    fn test_sanitize_range() {
        assert_eq!(sanitize_range(1.0, 4.0, (0.0, 1.0)), (1.0, 4.0));
        assert_eq!(sanitize_range(4.0, 1.0, (0.0, 1.0)), (1.0, 4.0));
        assert_eq!(sanitize_range(3.0, 3.0, (0.0, 1.0)), (3.0, 4.0));
        assert_eq!(sanitize_range(f32::NAN, 3.0, (-5.0, 5.0)), (-5.0, 5.0));
    }

    #[test]
    fn test_sanitize_range_overflowing_span() {
        assert_eq!(sanitize_range(-3e38, 3e38, (-5.0, 5.0)), (-5.0, 5.0));
        assert_eq!(sanitize_range(3e38, -3e38, (-5.0, 5.0)), (-5.0, 5.0));
        assert_eq!(sanitize_range(-1e38, 1e38, (-5.0, 5.0)), (-1e38, 1e38));
    }

    #[test]
    fn test_sanitize_range_widens_large_values() {
        let (lo, hi) = sanitize_range(1e9, 1e9, (0.0, 1.0));
        assert_eq!(lo, 1e9);
        assert!(hi > lo);
        assert_approx_eq!(f32, hi - lo, 1e6, epsilon = 1.0);

        let scale = LinearScale::new((lo, hi), (50.0, 550.0));
        assert!(scale.map(1e9).is_finite());

        // Widening past f32::MAX is not possible.
        assert_eq!(sanitize_range(f32::MAX, f32::MAX, (0.0, 1.0)), (0.0, 1.0));
    }

    #[test]
    fn test_nice_step() {
        assert_approx_eq!(f32, nice_step(0.7), 1.0);
        assert_approx_eq!(f32, nice_step(1.0), 1.0);
        assert_approx_eq!(f32, nice_step(1.3), 2.0);
        assert_approx_eq!(f32, nice_step(3.0), 5.0);
        assert_approx_eq!(f32, nice_step(7.0), 10.0);
        assert_approx_eq!(f32, nice_step(0.03), 0.05, epsilon = 1e-6);
        assert_eq!(nice_step(0.0), 1.0);
    }

    #[test]
    fn test_tick_step_respects_limit() {
        assert_eq!(tick_step(10.0, Some(1.0), 100), 1.0);
        assert_approx_eq!(f32, tick_step(1000.0, Some(1.0), 100), 10.0, epsilon = 1e-5);
        assert_approx_eq!(f32, tick_step(10.0, Some(-1.0), 100), 0.1, epsilon = 1e-6);
        assert_approx_eq!(f32, tick_step(20.0, None, 20), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_tick_values() {
        assert_eq!(tick_values(-2.0, 2.0, 1.0), vec![-2.0, -1.0, 0.0, 1.0, 2.0]);
        assert_eq!(tick_values(0.5, 3.5, 1.0), vec![1.0, 2.0, 3.0]);
        assert_eq!(tick_values(-1.0, 1.0, 2.0), vec![0.0]);
    }

    #[test]
    fn test_tick_values_bounded() {
        let ticks = tick_values(-3e38, 3e38, 1.0);
        assert_eq!(ticks.len(), MAX_TICK_VALUES as usize + 1);
        assert!(tick_values(5.0, 1.0, 1.0).is_empty());
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(3.0), "3");
        assert_eq!(format_value(-0.0), "0");
        assert_eq!(format_value(-2.0), "-2");
        assert_eq!(format_value(0.5), "0.5");
        assert_eq!(format_value(1.25), "1.25");
    }

    #[test]
    fn test_plot_area_flips_y() {
        let area = unit_area();
        assert_eq!(area.to_screen(Point::new(-10.0, 10.0)), Point::new(0.0, 0.0));
        assert_eq!(area.to_screen(Point::new(10.0, -10.0)), Point::new(200.0, 200.0));
    }

    #[test]
    fn test_clip_linear() {
        let area = unit_area();
        let (a, b) = area.clip_linear(2.0, 0.0).expect("line crosses window");
        assert_approx_eq!(f32, a.x(), -5.0, epsilon = 1e-4);
        assert_approx_eq!(f32, a.y(), -10.0, epsilon = 1e-4);
        assert_approx_eq!(f32, b.x(), 5.0, epsilon = 1e-4);
        assert_approx_eq!(f32, b.y(), 10.0, epsilon = 1e-4);
    }

    #[test]
    fn test_clip_misses_window() {
        let area = unit_area();
        assert!(area.clip_linear(0.0, 20.0).is_none());
        assert!(area.clip(Point::new(11.0, 0.0), Point::new(12.0, 5.0)).is_none());
    }

    #[test]
    fn test_axis_position() {
        assert_eq!(axis_position(&LinearScale::new((-3.0, 3.0), (0.0, 1.0))), 0.0);
        assert_eq!(axis_position(&LinearScale::new((2.0, 8.0), (0.0, 1.0))), 2.0);
        assert_eq!(axis_position(&LinearScale::new((-8.0, -2.0), (0.0, 1.0))), -2.0);
    }
}
