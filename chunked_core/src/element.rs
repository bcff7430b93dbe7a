// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Element payloads.

use alloc::string::String;

use kurbo::{BezPath, Circle, Rect};
use smallvec::SmallVec;

use crate::value::StyleMap;

/// The kind of a rendered element.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ElementKind {
    /// A stroked path.
    Path,
    /// A circle (point marker).
    Circle,
    /// An axis-aligned rectangle (clip or debug rectangle).
    Rect,
    /// A clip-path container.
    ClipPath,
}

/// The animatable shape of an element.
#[derive(Clone, Debug, PartialEq)]
pub enum Geometry {
    /// Path geometry (`d`).
    Path(BezPath),
    /// Circle geometry (`cx`, `cy`, `r`).
    Circle(Circle),
    /// Rectangle geometry (`x`, `y`, `width`, `height`).
    Rect(Rect),
    /// A clip-path container with its document id.
    ClipPath {
        /// Id referenced by `clip-path: url(#id)`.
        id: String,
    },
}

impl Geometry {
    /// Returns the element kind this geometry describes.
    pub fn kind(&self) -> ElementKind {
        match self {
            Self::Path(_) => ElementKind::Path,
            Self::Circle(_) => ElementKind::Circle,
            Self::Rect(_) => ElementKind::Rect,
            Self::ClipPath { .. } => ElementKind::ClipPath,
        }
    }

    /// Returns the path, if this is path geometry.
    pub fn as_path(&self) -> Option<&BezPath> {
        match self {
            Self::Path(p) => Some(p),
            _ => None,
        }
    }

    /// Returns the rectangle, if this is rect geometry.
    pub fn as_rect(&self) -> Option<Rect> {
        match self {
            Self::Rect(r) => Some(*r),
            _ => None,
        }
    }

    /// Returns the circle, if this is circle geometry.
    pub fn as_circle(&self) -> Option<Circle> {
        match self {
            Self::Circle(c) => Some(*c),
            _ => None,
        }
    }
}

/// Non-animated presentation of an element.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Presentation {
    /// Markup attributes.
    pub attrs: StyleMap,
    /// Inline styles.
    pub styles: StyleMap,
    /// Class names.
    pub classes: SmallVec<[String; 2]>,
    /// Id of the clip-path container applied to this element.
    pub clip_path: Option<String>,
    /// The `[start, end]` x interval of the data bound to this element, when it differs from the
    /// drawn extent. Clip rectangles keep their run here so exits collapse around the data.
    pub bound_span: Option<[f64; 2]>,
}

/// A rendered element as seen by the renderer.
#[derive(Clone, Debug, PartialEq)]
pub struct Element {
    /// The displayed geometry.
    pub geometry: Geometry,
    /// Attributes, styles and classes.
    pub presentation: Presentation,
}

impl Element {
    /// Creates an element with empty presentation.
    pub fn new(geometry: Geometry) -> Self {
        Self {
            geometry,
            presentation: Presentation::default(),
        }
    }

    /// Sets the presentation.
    #[must_use]
    pub fn with_presentation(mut self, presentation: Presentation) -> Self {
        self.presentation = presentation;
        self
    }

    /// Returns the element kind.
    pub fn kind(&self) -> ElementKind {
        self.geometry.kind()
    }
}
