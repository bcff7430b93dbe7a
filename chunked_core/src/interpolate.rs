// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Geometry interpolation.

use alloc::vec::Vec;
use core::fmt;

use kurbo::{BezPath, Circle, PathEl, Point, Rect};

use crate::element::Geometry;

/// Morphs one path into another.
///
/// Implementations must produce a visually continuous result even when the two paths have a
/// different number of vertices, and must return `to` exactly at `t = 1`.
pub trait PathInterpolator: fmt::Debug {
    /// Returns the path at progress `t` in `[0, 1]`.
    fn interpolate(&self, from: &BezPath, to: &BezPath, t: f64) -> BezPath;
}

/// Vertex-wise linear path morphing.
///
/// The shorter vertex list is padded by repeating its last vertex, then vertices are lerped
/// pairwise. Intermediate frames are polylines; curve segments reappear at `t = 1`.
#[derive(Clone, Copy, Debug, Default)]
pub struct VertexLerp;

impl PathInterpolator for VertexLerp {
    fn interpolate(&self, from: &BezPath, to: &BezPath, t: f64) -> BezPath {
        if t >= 1.0 {
            return to.clone();
        }
        if t <= 0.0 {
            return from.clone();
        }
        let a = vertices(from);
        let b = vertices(to);
        let (Some(&a_last), Some(&b_last)) = (a.last(), b.last()) else {
            return to.clone();
        };

        let n = a.len().max(b.len());
        let mut out = BezPath::new();
        for i in 0..n {
            let pa = a.get(i).copied().unwrap_or(a_last);
            let pb = b.get(i).copied().unwrap_or(b_last);
            let p = pa.lerp(pb, t);
            if i == 0 {
                out.move_to(p);
            } else {
                out.line_to(p);
            }
        }
        out
    }
}

fn vertices(path: &BezPath) -> Vec<Point> {
    path.elements()
        .iter()
        .filter_map(|el| match *el {
            PathEl::MoveTo(p) | PathEl::LineTo(p) => Some(p),
            PathEl::QuadTo(_, p) => Some(p),
            PathEl::CurveTo(_, _, p) => Some(p),
            PathEl::ClosePath => None,
        })
        .collect()
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

fn lerp_rect(a: Rect, b: Rect, t: f64) -> Rect {
    Rect::new(
        lerp(a.x0, b.x0, t),
        lerp(a.y0, b.y0, t),
        lerp(a.x1, b.x1, t),
        lerp(a.y1, b.y1, t),
    )
}

fn lerp_circle(a: Circle, b: Circle, t: f64) -> Circle {
    Circle::new(a.center.lerp(b.center, t), lerp(a.radius, b.radius, t))
}

/// Interpolates between two geometries of the same kind.
///
/// Mismatched kinds and clip-path containers do not animate: the target is returned as-is.
pub fn interpolate_geometry(
    from: &Geometry,
    to: &Geometry,
    t: f64,
    paths: &dyn PathInterpolator,
) -> Geometry {
    if t >= 1.0 {
        return to.clone();
    }
    match (from, to) {
        (Geometry::Path(a), Geometry::Path(b)) => Geometry::Path(paths.interpolate(a, b, t)),
        (Geometry::Rect(a), Geometry::Rect(b)) => Geometry::Rect(lerp_rect(*a, *b, t)),
        (Geometry::Circle(a), Geometry::Circle(b)) => Geometry::Circle(lerp_circle(*a, *b, t)),
        _ => to.clone(),
    }
}
