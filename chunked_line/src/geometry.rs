// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pure geometry helpers: line paths, clip rectangles, visible areas and markers.
//!
//! Everything here works in output (pixel) coordinates and has no knowledge of the scene.

use chunked_core::PointKey;
use kurbo::{BezPath, PathEl, Point, Rect};

use crate::curve::Curve;

/// A horizontal interval `[start, end]`.
pub type Span = [f64; 2];

/// The range of a set of finite values.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Extent {
    /// Smallest value.
    pub min: f64,
    /// Largest value.
    pub max: f64,
}

impl Extent {
    /// Computes the extent of `values`, ignoring non-finite ones.
    ///
    /// Returns `None` if no finite value is present.
    pub fn of(values: impl IntoIterator<Item = f64>) -> Option<Self> {
        values
            .into_iter()
            .filter(|v| v.is_finite())
            .fold(None, |acc, v| match acc {
                None => Some(Self { min: v, max: v }),
                Some(e) => Some(Self {
                    min: e.min.min(v),
                    max: e.max.max(v),
                }),
            })
    }
}

/// The path a line is drawn with, plus where it starts from on first paint.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LinePlan {
    /// The final path.
    pub line: BezPath,
    /// The path shown before animating to [`LinePlan::line`] on the first render.
    pub initial: BezPath,
}

/// Plans the path through `points`.
///
/// With `flatten_to`, the initial path runs through the same x coordinates at that constant y,
/// so the line appears to rise into place.
pub fn plan_line(points: &[Point], curve: &dyn Curve, flatten_to: Option<f64>) -> LinePlan {
    let line = curve.path(points);
    let initial = match flatten_to {
        Some(y) => {
            let flat: Vec<Point> = points.iter().map(|p| Point::new(p.x, y)).collect();
            curve.path(&flat)
        }
        None => line.clone(),
    };
    LinePlan { line, initial }
}

/// `path` with every point moved to height `y`, keeping its elements.
///
/// A series leaving the scene sinks into this shape, the reverse of its initial rise.
pub fn flatten_path(path: &BezPath, y: f64) -> BezPath {
    let at = |p: Point| Point::new(p.x, y);
    path.elements()
        .iter()
        .map(|el| match *el {
            PathEl::MoveTo(p) => PathEl::MoveTo(at(p)),
            PathEl::LineTo(p) => PathEl::LineTo(at(p)),
            PathEl::QuadTo(a, b) => PathEl::QuadTo(at(a), at(b)),
            PathEl::CurveTo(a, b, c) => PathEl::CurveTo(at(a), at(b), at(c)),
            PathEl::ClosePath => PathEl::ClosePath,
        })
        .collect()
}

/// Adds synthetic end points at `ends[0]` and `ends[1]`, at the y of the first and last point.
///
/// Returns `points` unchanged when `ends` is `None` or `points` is empty.
pub fn extend_ends(points: &[Point], ends: Option<[f64; 2]>) -> Vec<Point> {
    let (Some([x_min, x_max]), Some(first), Some(last)) = (ends, points.first(), points.last())
    else {
        return points.to_vec();
    };
    let mut out = Vec::with_capacity(points.len() + 2);
    out.push(Point::new(x_min, first.y));
    out.extend_from_slice(points);
    out.push(Point::new(x_max, last.y));
    out
}

/// The x interval covered by a run, from its first to its last point.
pub fn run_span(points: &[Point]) -> Option<Span> {
    Some([points.first()?.x, points.last()?.x])
}

/// The vertical band every clip rectangle of a chunk covers.
pub fn clip_band(y: Extent, stroke_width: f64) -> (f64, f64) {
    (y.min - stroke_width, y.max + stroke_width)
}

/// The clip rectangle revealing one run.
///
/// Runs touching the global x extent are widened by the stroke width on that side so line caps
/// are not cut off. Vertically the rectangle spans the whole y extent, padded by the stroke width.
pub fn clip_rect(span: Span, x: Extent, y: Extent, stroke_width: f64) -> Rect {
    let [start, end] = span;
    let x0 = if start == x.min {
        start - stroke_width
    } else {
        start
    };
    let x1 = if end == x.max { end + stroke_width } else { end };
    let (y0, y1) = clip_band(y, stroke_width);
    Rect::new(x0, y0, x1, y1)
}

/// The part of `span` that should be visible given the currently `visible` intervals.
///
/// Finds the visible interval containing the midpoint of `span` and clamps `span` to it. If no
/// interval contains the midpoint, collapses to the midpoint.
pub fn visible_start_end(span: Span, visible: &[Span]) -> Span {
    let [start, end] = span;
    let mid = start + (end - start) / 2.0;
    match visible.iter().find(|a| a[0] <= mid && mid <= a[1]) {
        Some(area) => [area[0].max(start), end.min(area[1])],
        None => [mid, mid],
    }
}

/// What is currently revealed: the x intervals of the existing clip rectangles, or the whole x
/// extent if there are none yet.
pub fn previous_visible_area(existing: &[Rect], x: Option<Extent>) -> Vec<Span> {
    if existing.is_empty() {
        return x.map(|e| vec![[e.min, e.max]]).unwrap_or_default();
    }
    existing.iter().map(|r| [r.x0, r.x1]).collect()
}

/// What will be revealed after the update: the spans of the new runs, or a collapsed interval at
/// `0` when there are none.
pub fn next_visible_area(spans: &[Span]) -> Vec<Span> {
    if spans.is_empty() {
        return vec![[0.0, 0.0]];
    }
    spans.to_vec()
}

/// A marker for a run with a single point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Marker {
    /// Identity across renders.
    pub key: PointKey,
    /// Where the marker is drawn.
    pub center: Point,
}
