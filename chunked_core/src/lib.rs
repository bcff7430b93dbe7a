// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Retained scene binding for chunked line rendering.
//!
//! A chunked line is drawn as a handful of long-lived elements (paths, clip rectangles, point
//! markers) that are updated in place on every render so that transitions can interpolate from
//! whatever is currently on screen. This crate provides the vocabulary shared between the line
//! renderer and a host scene graph:
//! - **Keys** ([`ElementKey`]) give every element a stable identity of
//!   `(series, chunk name, role)`.
//! - **Elements** carry a [`Geometry`] plus a [`Presentation`] (attributes, styles, classes).
//! - **Transitions** ([`Transition`]) describe timing; the host decides how to run them.
//! - [`SceneGraph`] is the binding contract the renderer talks to, and [`Scene`] is a small
//!   retained implementation with a caller-driven clock, suitable for tests and offline output.
//!
//! Path morphing between two shapes is delegated to a [`PathInterpolator`]; [`VertexLerp`] is a
//! minimal default.

#![no_std]

extern crate alloc;

mod element;
mod graph;
mod ids;
mod interpolate;
mod key;
mod scene;
mod transition;
mod value;

pub use element::{Element, ElementKind, Geometry, Presentation};
pub use graph::SceneGraph;
pub use ids::{ClipIdGenerator, CounterClipIds};
pub use interpolate::{PathInterpolator, VertexLerp, interpolate_geometry};
pub use key::{ElementKey, PointKey, Role};
pub use scene::Scene;
pub use transition::{Easing, Transition};
pub use value::{StyleMap, Value, parse_leading_number};
