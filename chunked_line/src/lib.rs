// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Line rendering for series with gaps and named chunks.
//!
//! A series is drawn as:
//! - one unclipped **gap** path through every defined point, styled as "missing data",
//! - one path per **chunk** (the default `"line"` chunk plus any user chunks), drawn over the same
//!   points but clipped to the x-ranges of the runs belonging to that chunk, and
//! - a marker per single-point run, since such runs have no visible stroke.
//!
//! The pipeline is a chain of small pure steps:
//! - [`compute_segments`] splits a series into contiguous runs using `defined` and `is_next`,
//! - [`compute_chunk_runs`] re-partitions runs per chunk name, sharing boundary points,
//! - [`StyleLayers::evaluate`] layers line/gap/chunk styles for one chunk,
//! - the [`geometry`] helpers turn runs into paths, clip rectangles and markers, and
//! - [`LineChunked::render`] reconciles the result against a [`chunked_core::SceneGraph`],
//!   keyed so that updates animate from what is currently on screen.
//!
//! Options can be set through the typed builder on [`LineChunked`] or loaded from JSON with
//! [`LineChunkedOptions`].

mod accessor;
mod chunk;
mod config;
mod curve;
pub mod geometry;
mod options;
mod render;
#[cfg(test)]
mod render_tests;
mod segment;
mod style;

pub use accessor::{Accessor, Adjacency, XyDatum};
pub use chunk::{
    ChunkLineResolver, ChunkOrder, GAP_CHUNK, LINE_CHUNK, compute_chunk_runs,
    default_chunk_line_resolver,
};
pub use config::{AccessData, LineChunked, PointIdentity};
pub use curve::{Curve, Linear, MonotoneX, Step};
pub use options::{ChunkDefinitionOptions, LineChunkedOptions, OptionsError, StyleObject};
pub use render::{RenderTarget, Selection, Transitioning};
pub use segment::{Run, compute_segments};
pub use style::{
    ChunkDefinition, ChunkDefinitions, EvaluatedDefinition, MisnamedKey, StyleLayers, StyleSpec,
    StyleValue,
};
