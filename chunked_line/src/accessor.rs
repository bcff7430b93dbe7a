// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-point option values.

use core::fmt;
use std::sync::Arc;

/// A per-point option: either a constant or a function of the point.
pub enum Accessor<D, T> {
    /// The same value for every point.
    Fixed(T),
    /// A value computed from each point.
    Computed(Arc<dyn Fn(&D) -> T>),
}

impl<D, T: Clone> Accessor<D, T> {
    /// Wraps a function.
    pub fn computed(f: impl Fn(&D) -> T + 'static) -> Self {
        Self::Computed(Arc::new(f))
    }

    /// Evaluates the option for `d`.
    pub fn eval(&self, d: &D) -> T {
        match self {
            Self::Fixed(v) => v.clone(),
            Self::Computed(f) => f(d),
        }
    }
}

impl<D, T: Clone> Clone for Accessor<D, T> {
    fn clone(&self) -> Self {
        match self {
            Self::Fixed(v) => Self::Fixed(v.clone()),
            Self::Computed(f) => Self::Computed(f.clone()),
        }
    }
}

impl<D, T: fmt::Debug> fmt::Debug for Accessor<D, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(v) => f.debug_tuple("Fixed").field(v).finish(),
            Self::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

/// Whether one point directly follows another.
pub enum Adjacency<D> {
    /// The same answer for every pair.
    Fixed(bool),
    /// Computed from `(previous, current)`.
    Computed(Arc<dyn Fn(&D, &D) -> bool>),
}

impl<D> Adjacency<D> {
    /// Evaluates the predicate for `(prev, curr)`.
    pub fn eval(&self, prev: &D, curr: &D) -> bool {
        match self {
            Self::Fixed(v) => *v,
            Self::Computed(f) => f(prev, curr),
        }
    }
}

impl<D> Clone for Adjacency<D> {
    fn clone(&self) -> Self {
        match self {
            Self::Fixed(v) => Self::Fixed(*v),
            Self::Computed(f) => Self::Computed(f.clone()),
        }
    }
}

impl<D> fmt::Debug for Adjacency<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(v) => f.debug_tuple("Fixed").field(v).finish(),
            Self::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

/// Points that carry their own pixel-space coordinates.
///
/// Used for the default `x`/`y` accessors. A missing or non-finite coordinate makes the point
/// undefined.
pub trait XyDatum {
    /// The x coordinate.
    fn x(&self) -> f64;
    /// The y coordinate.
    fn y(&self) -> f64;
}

impl XyDatum for (f64, f64) {
    fn x(&self) -> f64 {
        self.0
    }

    fn y(&self) -> f64 {
        self.1
    }
}

impl XyDatum for [f64; 2] {
    fn x(&self) -> f64 {
        self[0]
    }

    fn y(&self) -> f64 {
        self[1]
    }
}

impl XyDatum for (f64, Option<f64>) {
    fn x(&self) -> f64 {
        self.0
    }

    fn y(&self) -> f64 {
        self.1.unwrap_or(f64::NAN)
    }
}

impl XyDatum for kurbo::Point {
    fn x(&self) -> f64 {
        self.x
    }

    fn y(&self) -> f64 {
        self.y
    }
}
