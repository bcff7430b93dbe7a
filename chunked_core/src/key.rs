// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stable element identity.

use alloc::string::String;

/// Identity of a point marker within one chunk of one series.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PointKey {
    /// Keyed by the marker's x coordinate (stored as raw bits).
    X(u64),
    /// Keyed by the point's position in the series.
    Index(u32),
}

impl PointKey {
    /// Keys a marker by its x coordinate. `-0.0` and `0.0` map to the same key.
    pub fn from_x(x: f64) -> Self {
        let x = if x == 0.0 { 0.0 } else { x };
        Self::X(x.to_bits())
    }

    /// Returns the x coordinate for [`PointKey::X`] keys.
    pub fn x(self) -> Option<f64> {
        match self {
            Self::X(bits) => Some(f64::from_bits(bits)),
            Self::Index(_) => None,
        }
    }
}

/// What an element is for, within its `(series, chunk)` group.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Role {
    /// The chunk's line path.
    Path,
    /// The clip-path container referenced by the chunk's path.
    ClipPath,
    /// The `i`-th clip rectangle of the chunk.
    ClipRect(u32),
    /// The `i`-th debug overlay rectangle of the chunk.
    DebugRect(u32),
    /// A marker for a single-point run.
    Point(PointKey),
}

/// Stable identity of a rendered element: `(series, chunk name, role)`.
///
/// Repeated renders look elements up by key so they are updated rather than recreated, which is
/// what lets transitions start from the currently displayed state.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ElementKey {
    /// Index of the series (bound datum) this element belongs to.
    pub series: u32,
    /// Chunk name (`"line"`, `"gap"`, or a user chunk).
    pub chunk: String,
    /// Role of the element within the chunk.
    pub role: Role,
}

impl ElementKey {
    /// Creates a key.
    pub fn new(series: u32, chunk: impl Into<String>, role: Role) -> Self {
        Self {
            series,
            chunk: chunk.into(),
            role,
        }
    }

    /// Key of the path drawn for `chunk`.
    pub fn path(series: u32, chunk: impl Into<String>) -> Self {
        Self::new(series, chunk, Role::Path)
    }

    /// Key of the clip-path container for `chunk`.
    pub fn clip_path(series: u32, chunk: impl Into<String>) -> Self {
        Self::new(series, chunk, Role::ClipPath)
    }

    /// Key of the `index`-th clip rectangle for `chunk`.
    pub fn clip_rect(series: u32, chunk: impl Into<String>, index: u32) -> Self {
        Self::new(series, chunk, Role::ClipRect(index))
    }

    /// Key of the `index`-th debug rectangle for `chunk`.
    pub fn debug_rect(series: u32, chunk: impl Into<String>, index: u32) -> Self {
        Self::new(series, chunk, Role::DebugRect(index))
    }

    /// Key of a point marker for `chunk`.
    pub fn point(series: u32, chunk: impl Into<String>, point: PointKey) -> Self {
        Self::new(series, chunk, Role::Point(point))
    }

    /// Returns `true` if this key belongs to `series` and `chunk`.
    pub fn is_in(&self, series: u32, chunk: &str) -> bool {
        self.series == series && self.chunk == chunk
    }

    /// Returns `true` for point markers.
    pub fn is_point(&self) -> bool {
        matches!(self.role, Role::Point(_))
    }
}
