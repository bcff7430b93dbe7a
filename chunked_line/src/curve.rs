// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Curves that turn a list of points into a path.

use std::fmt;

use kurbo::{BezPath, Point};

/// Builds the path through a run of points.
///
/// Implementations must pass through every input point in order. Empty input yields an empty
/// path and a single point yields a lone `MoveTo`.
pub trait Curve: fmt::Debug {
    /// Returns the path through `points`.
    fn path(&self, points: &[Point]) -> BezPath;
}

/// Straight segments between consecutive points.
#[derive(Clone, Copy, Debug, Default)]
pub struct Linear;

impl Curve for Linear {
    fn path(&self, points: &[Point]) -> BezPath {
        let mut path = BezPath::new();
        for (i, &p) in points.iter().enumerate() {
            if i == 0 {
                path.move_to(p);
            } else {
                path.line_to(p);
            }
        }
        path
    }
}

/// Piecewise-constant steps.
///
/// `position` is where along each interval the vertical step happens: `0` steps at the start
/// (step-before), `1` at the end (step-after), `0.5` halfway.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Step {
    position: f64,
}

impl Default for Step {
    fn default() -> Self {
        Self::MIDDLE
    }
}

impl Step {
    /// Steps halfway between points.
    pub const MIDDLE: Self = Self { position: 0.5 };
    /// Steps at the start of each interval.
    pub const BEFORE: Self = Self { position: 0.0 };
    /// Steps at the end of each interval.
    pub const AFTER: Self = Self { position: 1.0 };

    /// Returns the step position in `[0, 1]`.
    pub fn position(self) -> f64 {
        self.position
    }
}

impl Curve for Step {
    fn path(&self, points: &[Point]) -> BezPath {
        let mut path = BezPath::new();
        let Some((&first, rest)) = points.split_first() else {
            return path;
        };
        path.move_to(first);
        let t = self.position;
        let mut prev = first;
        for &p in rest {
            if t <= 0.0 {
                path.line_to((prev.x, p.y));
                path.line_to(p);
            } else {
                let x = prev.x * (1.0 - t) + p.x * t;
                path.line_to((x, prev.y));
                path.line_to((x, p.y));
            }
            prev = p;
        }
        if t > 0.0 && t < 1.0 && !rest.is_empty() {
            path.line_to(prev);
        }
        path
    }
}

/// Cubic Hermite spline that preserves monotonicity in y, assuming points are sorted by x.
#[derive(Clone, Copy, Debug, Default)]
pub struct MonotoneX;

impl Curve for MonotoneX {
    fn path(&self, points: &[Point]) -> BezPath {
        let mut path = BezPath::new();
        // Consecutive duplicates carry no tangent information.
        let mut pts: Vec<Point> = Vec::with_capacity(points.len());
        for &p in points {
            if pts.last() != Some(&p) {
                pts.push(p);
            }
        }

        match pts.as_slice() {
            [] => return path,
            [p] => {
                path.move_to(*p);
                return path;
            }
            [a, b] => {
                path.move_to(*a);
                path.line_to(*b);
                return path;
            }
            _ => {}
        }

        let n = pts.len();
        let mut tangents = vec![0.0; n];
        for i in 1..n - 1 {
            tangents[i] = slope3(pts[i - 1], pts[i], pts[i + 1]);
        }
        tangents[0] = slope2(pts[0], pts[1], tangents[1]);
        tangents[n - 1] = slope2(pts[n - 2], pts[n - 1], tangents[n - 2]);

        path.move_to(pts[0]);
        for i in 1..n {
            hermite(&mut path, pts[i - 1], pts[i], tangents[i - 1], tangents[i]);
        }
        path
    }
}

fn sign(v: f64) -> f64 {
    if v < 0.0 { -1.0 } else { 1.0 }
}

/// Tangent at `b`, limited so the spline cannot overshoot either neighbouring interval.
fn slope3(a: Point, b: Point, c: Point) -> f64 {
    let h0 = b.x - a.x;
    let h1 = c.x - b.x;
    let s0 = (b.y - a.y) / if h0 != 0.0 { h0 } else if h1 < 0.0 { -0.0 } else { 0.0 };
    let s1 = (c.y - b.y) / if h1 != 0.0 { h1 } else if h0 < 0.0 { -0.0 } else { 0.0 };
    let p = (s0 * h1 + s1 * h0) / (h0 + h1);
    let v = (sign(s0) + sign(s1)) * s0.abs().min(s1.abs()).min(0.5 * p.abs());
    if v.is_finite() { v } else { 0.0 }
}

/// One-sided tangent at an end point, given the tangent at the other end of the interval.
fn slope2(a: Point, b: Point, t: f64) -> f64 {
    let h = b.x - a.x;
    if h != 0.0 { (3.0 * (b.y - a.y) / h - t) / 2.0 } else { t }
}

fn hermite(path: &mut BezPath, a: Point, b: Point, t0: f64, t1: f64) {
    let dx = (b.x - a.x) / 3.0;
    path.curve_to(
        Point::new(a.x + dx, a.y + dx * t0),
        Point::new(b.x - dx, b.y - dx * t1),
        b,
    );
}
