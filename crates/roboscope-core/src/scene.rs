//! Turning the resident buffer and the visible window into a drawable scene.
//!
//! This is a pure function: no terminal, no framework. The host hands the
//! plot rectangle in whatever pixel-like units its canvas uses and draws the
//! grid marks, labels, and polylines the scene contains. A buffer with no
//! data for the window still yields grid and axis labels — the engine always
//! has something sensible to draw.

use crate::buffer::SeriesBuffer;
use crate::sample::Point;

/// Overscan applied to visible-point filtering, as a fraction of the window
/// width, so lines are not visibly clipped exactly at the window edge.
pub const OVERSCAN: f64 = 0.02;

/// Number of equal subdivisions for the background grid (both axes).
pub const GRID_DIVS: usize = 4;

/// Size of the fixed color palette the scene cycles through.
pub const PALETTE_LEN: usize = 8;

/// Plot rectangle in host canvas units. `y` grows downward (screen
/// convention): `y` is the top edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl PlotRect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
}

/// Vertical value range of everything visible.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueBounds {
    pub min: f64,
    pub max: f64,
}

impl ValueBounds {
    pub fn span(&self) -> f64 {
        self.max - self.min
    }
}

/// One grid line with its axis label. `pos` is the canvas coordinate of the
/// line (x for time marks, y for value marks); `label` is preformatted.
#[derive(Debug, Clone, PartialEq)]
pub struct GridMark {
    pub pos: f64,
    pub label: String,
}

/// One polyline: a single scalar dimension of a single topic, in canvas
/// coordinates, clipped to the plot rectangle.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesLine {
    pub topic: String,
    pub dim: usize,
    /// Index into the host's fixed palette, assigned round-robin in
    /// iteration order over the flattened (topic, dimension) sequence.
    pub color: usize,
    pub points: Vec<(f64, f64)>,
}

/// Complete drawable frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub rect: PlotRect,
    pub window: (f64, f64),
    pub bounds: ValueBounds,
    /// Vertical grid lines with time labels (one decimal, seconds).
    pub time_marks: Vec<GridMark>,
    /// Horizontal grid lines with value labels (two decimals).
    pub value_marks: Vec<GridMark>,
    pub lines: Vec<SeriesLine>,
}

/// Slice of `points` (sorted by `t`) inside the overscanned window.
pub fn visible_slice(points: &[Point], vis_start: f64, vis_end: f64) -> &[Point] {
    let margin = (vis_end - vis_start) * OVERSCAN;
    let lo = vis_start - margin;
    let hi = vis_end + margin;
    let from = points.partition_point(|p| p.t < lo);
    let to = points.partition_point(|p| p.t <= hi);
    &points[from..to]
}

/// `[min, max]` across every finite value of every dimension of the given
/// visible slices. No finite values anywhere defaults to `[-1, 1]`; an
/// all-identical value set pads to `[v-1, v+1]`. The result is always
/// strictly ordered, so it is safe as a scale denominator.
pub fn value_bounds<'a, I>(visible: I) -> ValueBounds
where
    I: IntoIterator<Item = &'a [Point]>,
{
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for slice in visible {
        for point in slice {
            for &v in &point.vals {
                if v.is_finite() {
                    min = min.min(v);
                    max = max.max(v);
                }
            }
        }
    }
    if min > max {
        return ValueBounds { min: -1.0, max: 1.0 };
    }
    if min == max {
        return ValueBounds {
            min: min - 1.0,
            max: max + 1.0,
        };
    }
    ValueBounds { min, max }
}

/// Build the scene for one frame.
pub fn build_scene(buffer: &SeriesBuffer, vis_start: f64, vis_end: f64, rect: PlotRect) -> Scene {
    let visible: Vec<(&String, &[Point])> = buffer
        .series
        .iter()
        .map(|(topic, points)| (topic, visible_slice(points, vis_start, vis_end)))
        .filter(|(_, slice)| !slice.is_empty())
        .collect();

    let bounds = value_bounds(visible.iter().map(|(_, slice)| *slice));

    let window = vis_end - vis_start;
    let scale_x = |t: f64| rect.x + (t - vis_start) / window * rect.width;
    let scale_y = |v: f64| rect.y + (bounds.max - v) / bounds.span() * rect.height;

    let mut time_marks = Vec::with_capacity(GRID_DIVS + 1);
    let mut value_marks = Vec::with_capacity(GRID_DIVS + 1);
    for i in 0..=GRID_DIVS {
        let frac = i as f64 / GRID_DIVS as f64;
        let t = vis_start + frac * window;
        time_marks.push(GridMark {
            pos: rect.x + frac * rect.width,
            label: format!("{t:.1}"),
        });
        let v = bounds.max - frac * bounds.span();
        value_marks.push(GridMark {
            pos: rect.y + frac * rect.height,
            label: format!("{v:.2}"),
        });
    }

    let mut lines = Vec::new();
    let mut color_seq = 0usize;
    for (topic, slice) in &visible {
        let dims = slice.iter().map(|p| p.vals.len()).max().unwrap_or(0);
        for dim in 0..dims {
            let color = color_seq % PALETTE_LEN;
            color_seq += 1;

            let raw: Vec<(f64, f64)> = slice
                .iter()
                .filter_map(|p| p.vals.get(dim).map(|&v| (scale_x(p.t), scale_y(v))))
                .collect();
            if raw.len() < 2 {
                continue;
            }
            let clipped = clip_to_rect_x(&raw, rect.x, rect.right());
            if clipped.len() < 2 {
                continue;
            }
            lines.push(SeriesLine {
                topic: (*topic).clone(),
                dim,
                color,
                points: clipped,
            });
        }
    }

    Scene {
        rect,
        window: (vis_start, vis_end),
        bounds,
        time_marks,
        value_marks,
        lines,
    }
}

/// Clip a polyline against the vertical edges of the plot rectangle.
///
/// Overscan admits points slightly outside the window, so a line's first or
/// last segment can cross the rect edge; the crossing segment is cut at the
/// boundary. Only x needs clipping: the bounds come from the same visible
/// set, so values never exceed the rect vertically.
fn clip_to_rect_x(points: &[(f64, f64)], x_min: f64, x_max: f64) -> Vec<(f64, f64)> {
    let mut out: Vec<(f64, f64)> = Vec::with_capacity(points.len());
    let inside = |p: (f64, f64)| p.0 >= x_min && p.0 <= x_max;
    let push = |out: &mut Vec<(f64, f64)>, p: (f64, f64)| {
        if out.last() != Some(&p) {
            out.push(p);
        }
    };

    for pair in points.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        let cut = |at: f64| {
            // Segment is not vertical here: a.0 != b.0 when a boundary
            // strictly separates the endpoints.
            let s = (at - a.0) / (b.0 - a.0);
            (at, a.1 + s * (b.1 - a.1))
        };
        match (inside(a), inside(b)) {
            (true, true) => {
                push(&mut out, a);
                push(&mut out, b);
            }
            (true, false) => {
                push(&mut out, a);
                push(&mut out, cut(if b.0 < x_min { x_min } else { x_max }));
            }
            (false, true) => {
                push(&mut out, cut(if a.0 < x_min { x_min } else { x_max }));
                push(&mut out, b);
            }
            (false, false) => {
                // Both outside on the same side: nothing. Opposite sides:
                // the segment spans the whole rect.
                if (a.0 < x_min) != (b.0 < x_min) {
                    push(&mut out, cut(x_min));
                    push(&mut out, cut(x_max));
                }
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn pt(t: f64, vals: &[f64]) -> Point {
        Point::new(t, vals.to_vec())
    }

    fn buffer_with(series: Vec<(&str, Vec<Point>)>) -> SeriesBuffer {
        let mut map = BTreeMap::new();
        let (mut lo, mut hi) = (f64::INFINITY, f64::NEG_INFINITY);
        for (topic, points) in series {
            for p in &points {
                lo = lo.min(p.t);
                hi = hi.max(p.t);
            }
            map.insert(topic.to_string(), points);
        }
        SeriesBuffer {
            start: lo.min(0.0),
            end: hi.max(1.0),
            series: map,
        }
    }

    const RECT: PlotRect = PlotRect {
        x: 0.0,
        y: 0.0,
        width: 100.0,
        height: 50.0,
    };

    #[test]
    fn filtering_respects_the_overscan_margin() {
        // Window [10, 20], margin 0.2.
        let points = vec![
            pt(9.7, &[1.0]),
            pt(9.85, &[1.0]),
            pt(15.0, &[1.0]),
            pt(20.15, &[1.0]),
            pt(20.3, &[1.0]),
        ];
        let slice = visible_slice(&points, 10.0, 20.0);
        let times: Vec<f64> = slice.iter().map(|p| p.t).collect();
        assert_eq!(times, vec![9.85, 15.0, 20.15]);
        for p in slice {
            assert!(p.t >= 10.0 - 0.2 && p.t <= 20.0 + 0.2);
        }
    }

    #[test]
    fn bounds_cover_every_visible_value_strictly_ordered() {
        let slices = [
            vec![pt(0.0, &[1.0, -3.0]), pt(1.0, &[2.5])],
            vec![pt(0.5, &[7.0])],
        ];
        let bounds = value_bounds(slices.iter().map(Vec::as_slice));
        assert_eq!(bounds.min, -3.0);
        assert_eq!(bounds.max, 7.0);
        assert!(bounds.max > bounds.min);
    }

    #[test]
    fn no_finite_values_defaults_bounds() {
        let empty: [&[Point]; 0] = [];
        assert_eq!(value_bounds(empty), ValueBounds { min: -1.0, max: 1.0 });

        let nan_only = [vec![pt(0.0, &[f64::NAN, f64::INFINITY])]];
        assert_eq!(
            value_bounds(nan_only.iter().map(Vec::as_slice)),
            ValueBounds { min: -1.0, max: 1.0 }
        );
    }

    #[test]
    fn identical_values_pad_the_bounds() {
        let slices = [vec![pt(0.0, &[2.0]), pt(1.0, &[2.0])]];
        let bounds = value_bounds(slices.iter().map(Vec::as_slice));
        assert_eq!(bounds, ValueBounds { min: 1.0, max: 3.0 });
    }

    #[test]
    fn empty_buffer_still_renders_grid_and_labels() {
        let scene = build_scene(&SeriesBuffer::empty(), 0.0, 10.0, RECT);
        assert!(scene.lines.is_empty());
        assert_eq!(scene.time_marks.len(), GRID_DIVS + 1);
        assert_eq!(scene.value_marks.len(), GRID_DIVS + 1);
        assert_eq!(scene.bounds, ValueBounds { min: -1.0, max: 1.0 });
    }

    #[test]
    fn label_formats() {
        let buf = buffer_with(vec![("/a", vec![pt(1.0, &[0.13]), pt(2.0, &[0.87])])]);
        let scene = build_scene(&buf, 0.0, 10.0, RECT);
        assert_eq!(scene.time_marks[0].label, "0.0");
        assert_eq!(scene.time_marks[GRID_DIVS].label, "10.0");
        // Value labels run top (max) to bottom (min), two decimals.
        assert_eq!(scene.value_marks[0].label, "0.87");
        assert_eq!(scene.value_marks[GRID_DIVS].label, "0.13");
    }

    #[test]
    fn larger_values_sit_higher_on_screen() {
        let buf = buffer_with(vec![("/a", vec![pt(2.0, &[0.0]), pt(8.0, &[10.0])])]);
        let scene = build_scene(&buf, 0.0, 10.0, RECT);
        let line = &scene.lines[0];
        let (_, y_low_value) = line.points[0];
        let (_, y_high_value) = line.points[1];
        // Screen y grows downward, so the larger value has the smaller y.
        assert!(y_high_value < y_low_value);
        assert_eq!(y_high_value, RECT.y);
        assert_eq!(y_low_value, RECT.bottom());
    }

    #[test]
    fn one_polyline_per_topic_dimension_with_round_robin_colors() {
        let buf = buffer_with(vec![
            ("/a", vec![pt(1.0, &[0.0, 1.0]), pt(2.0, &[0.5, 1.5])]),
            ("/b", vec![pt(1.0, &[5.0]), pt(2.0, &[6.0])]),
        ]);
        let scene = build_scene(&buf, 0.0, 10.0, RECT);
        assert_eq!(scene.lines.len(), 3);
        let colors: Vec<usize> = scene.lines.iter().map(|l| l.color).collect();
        assert_eq!(colors, vec![0, 1, 2]);
        assert_eq!(scene.lines[0].topic, "/a");
        assert_eq!(scene.lines[0].dim, 0);
        assert_eq!(scene.lines[2].topic, "/b");
    }

    #[test]
    fn palette_wraps_after_its_length() {
        let points = vec![
            pt(1.0, &vec![0.0; PALETTE_LEN + 2]),
            pt(2.0, &vec![1.0; PALETTE_LEN + 2]),
        ];
        let buf = buffer_with(vec![("/wide", points)]);
        let scene = build_scene(&buf, 0.0, 10.0, RECT);
        assert_eq!(scene.lines.len(), PALETTE_LEN + 2);
        assert_eq!(scene.lines[PALETTE_LEN].color, 0);
        assert_eq!(scene.lines[PALETTE_LEN + 1].color, 1);
    }

    #[test]
    fn single_visible_point_draws_nothing() {
        let buf = buffer_with(vec![("/a", vec![pt(5.0, &[1.0])])]);
        let scene = build_scene(&buf, 0.0, 10.0, RECT);
        assert!(scene.lines.is_empty());
    }

    #[test]
    fn topic_outside_window_does_not_contribute() {
        let buf = buffer_with(vec![
            ("/in", vec![pt(5.0, &[1.0]), pt(6.0, &[2.0])]),
            ("/out", vec![pt(50.0, &[100.0]), pt(51.0, &[200.0])]),
        ]);
        let scene = build_scene(&buf, 0.0, 10.0, RECT);
        assert_eq!(scene.lines.len(), 1);
        assert_eq!(scene.lines[0].topic, "/in");
        // /out's values must not widen the bounds.
        assert_eq!(scene.bounds, ValueBounds { min: 0.0, max: 3.0 });
    }

    #[test]
    fn overscanned_points_are_clipped_to_the_rect() {
        // Points at 9.9 and 20.1 survive filtering for window [10, 20] but
        // map outside the rect; the polyline must be cut at the edges.
        let buf = buffer_with(vec![(
            "/a",
            vec![pt(9.9, &[0.0]), pt(15.0, &[1.0]), pt(20.1, &[2.0])],
        )]);
        let scene = build_scene(&buf, 10.0, 20.0, RECT);
        let line = &scene.lines[0];
        for &(x, y) in &line.points {
            assert!(x >= RECT.x - 1e-9 && x <= RECT.right() + 1e-9, "x={x}");
            assert!(y >= RECT.y - 1e-9 && y <= RECT.bottom() + 1e-9, "y={y}");
        }
        assert_eq!(line.points.first().unwrap().0, RECT.x);
        assert_eq!(line.points.last().unwrap().0, RECT.right());
    }

    #[test]
    fn clip_interpolates_on_the_boundary() {
        let segment = vec![(-10.0, 0.0), (10.0, 10.0)];
        let clipped = clip_to_rect_x(&segment, 0.0, 100.0);
        assert_eq!(clipped.len(), 2);
        assert_eq!(clipped[0], (0.0, 5.0));
        assert_eq!(clipped[1], (10.0, 10.0));
    }

    #[test]
    fn clip_drops_fully_outside_segments() {
        let outside = vec![(-20.0, 0.0), (-10.0, 5.0)];
        assert!(clip_to_rect_x(&outside, 0.0, 100.0).is_empty());
    }

    #[test]
    fn clip_spanning_segment_keeps_the_crossing() {
        let spanning = vec![(-50.0, 0.0), (150.0, 20.0)];
        let clipped = clip_to_rect_x(&spanning, 0.0, 100.0);
        assert_eq!(clipped.len(), 2);
        assert_eq!(clipped[0].0, 0.0);
        assert_eq!(clipped[1].0, 100.0);
    }

    #[test]
    fn points_with_missing_dimensions_are_skipped_per_line() {
        // Second point only has one dimension; dim 1's polyline has a
        // single vertex and draws nothing, dim 0 still draws.
        let buf = buffer_with(vec![(
            "/ragged",
            vec![pt(1.0, &[0.0, 9.0]), pt(2.0, &[1.0])],
        )]);
        let scene = build_scene(&buf, 0.0, 10.0, RECT);
        assert_eq!(scene.lines.len(), 1);
        assert_eq!(scene.lines[0].dim, 0);
        assert_eq!(scene.lines[0].color, 0);
    }
}
