// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The chunked line configuration builder.

use std::fmt;
use std::sync::Arc;

use chunked_core::{ClipIdGenerator, CounterClipIds};
use serde::Deserialize;

use crate::accessor::{Accessor, Adjacency, XyDatum};
use crate::chunk::{ChunkLineResolver, ChunkOrder, LINE_CHUNK, default_chunk_line_resolver};
use crate::curve::{Curve, Linear};
use crate::style::{ChunkDefinitions, StyleLayers, StyleSpec};

/// Projects a series datum onto its points.
pub type AccessData<D, R> = Arc<dyn for<'a> Fn(&'a R) -> &'a [D]>;

/// How markers keep their identity across renders.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointIdentity {
    /// By x coordinate, so a marker follows its point when the series is shifted.
    #[default]
    X,
    /// By position in the series.
    Index,
}

/// A chunked line renderer for series of type `R` with points of type `D`.
///
/// Built with chained setters, then drawn with [`LineChunked::render`]. Options that may vary per
/// point have a `*_const` and a `*_compute` setter.
///
/// ```
/// use chunked_line::{ChunkDefinition, ChunkDefinitions, LineChunked, StyleSpec};
///
/// let chunked = LineChunked::<(f64, Option<f64>)>::new()
///     .chunk_compute(|d| if d.1.unwrap_or(0.0) > 10.0 { "high".into() } else { "line".into() })
///     .with_chunk_definitions(ChunkDefinitions::new().with(
///         "high",
///         ChunkDefinition::new().with_styles(StyleSpec::new().with("stroke", "red")),
///     ));
/// assert_eq!(chunked.chunk_definitions().len(), 1);
/// ```
pub struct LineChunked<D, R = Vec<D>> {
    pub(crate) x: Accessor<D, f64>,
    pub(crate) y: Accessor<D, f64>,
    pub(crate) defined: Accessor<D, bool>,
    pub(crate) is_next: Adjacency<D>,
    pub(crate) chunk: Accessor<D, String>,
    pub(crate) chunk_line_resolver: ChunkLineResolver,
    pub(crate) curve: Arc<dyn Curve>,
    pub(crate) styles: StyleLayers<R>,
    pub(crate) transition_initial: bool,
    pub(crate) extend_ends: Option<[f64; 2]>,
    pub(crate) access_data: AccessData<D, R>,
    pub(crate) debug: bool,
    pub(crate) point_identity: PointIdentity,
    pub(crate) clip_ids: Arc<dyn ClipIdGenerator>,
}

fn as_slice<D, R: AsRef<[D]>>(series: &R) -> &[D] {
    series.as_ref()
}

impl<D: XyDatum + 'static, R: AsRef<[D]> + 'static> LineChunked<D, R> {
    /// Creates a renderer reading coordinates through [`XyDatum`] and points through
    /// [`AsRef<[D]>`].
    pub fn new() -> Self {
        Self::from_parts(
            Accessor::computed(D::x),
            Accessor::computed(D::y),
            as_slice::<D, R>,
        )
    }
}

impl<D: XyDatum + 'static, R: AsRef<[D]> + 'static> Default for LineChunked<D, R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: 'static, R: 'static> LineChunked<D, R> {
    /// Creates a renderer from explicit coordinate accessors and series projection.
    ///
    /// Every other option starts at its default.
    pub fn from_parts(
        x: Accessor<D, f64>,
        y: Accessor<D, f64>,
        access_data: impl for<'a> Fn(&'a R) -> &'a [D] + 'static,
    ) -> Self {
        Self {
            x,
            y,
            defined: Accessor::Fixed(true),
            is_next: Adjacency::Fixed(true),
            chunk: Accessor::Fixed(LINE_CHUNK.to_owned()),
            chunk_line_resolver: Arc::new(default_chunk_line_resolver),
            curve: Arc::new(Linear),
            styles: StyleLayers::default(),
            transition_initial: true,
            extend_ends: None,
            access_data: Arc::new(access_data),
            debug: false,
            point_identity: PointIdentity::X,
            clip_ids: Arc::new(CounterClipIds::new()),
        }
    }

    /// Sets the x coordinate to a constant.
    #[must_use]
    pub fn x_const(mut self, x: f64) -> Self {
        self.x = Accessor::Fixed(x);
        self
    }

    /// Computes the x coordinate per point.
    #[must_use]
    pub fn x_compute(mut self, f: impl Fn(&D) -> f64 + 'static) -> Self {
        self.x = Accessor::computed(f);
        self
    }

    /// Sets the y coordinate to a constant.
    #[must_use]
    pub fn y_const(mut self, y: f64) -> Self {
        self.y = Accessor::Fixed(y);
        self
    }

    /// Computes the y coordinate per point.
    #[must_use]
    pub fn y_compute(mut self, f: impl Fn(&D) -> f64 + 'static) -> Self {
        self.y = Accessor::computed(f);
        self
    }

    /// Marks every point as defined or undefined.
    #[must_use]
    pub fn defined_const(mut self, defined: bool) -> Self {
        self.defined = Accessor::Fixed(defined);
        self
    }

    /// Decides per point whether it is defined.
    ///
    /// Points with a non-finite coordinate are undefined regardless.
    #[must_use]
    pub fn defined_compute(mut self, f: impl Fn(&D) -> bool + 'static) -> Self {
        self.defined = Accessor::computed(f);
        self
    }

    /// Sets adjacency for every pair of points.
    #[must_use]
    pub fn is_next_const(mut self, is_next: bool) -> Self {
        self.is_next = Adjacency::Fixed(is_next);
        self
    }

    /// Decides whether `current` directly follows `previous`; a `false` starts a new run.
    #[must_use]
    pub fn is_next_compute(mut self, f: impl Fn(&D, &D) -> bool + 'static) -> Self {
        self.is_next = Adjacency::Computed(Arc::new(f));
        self
    }

    /// Puts every point in the same chunk.
    #[must_use]
    pub fn chunk_const(mut self, chunk: impl Into<String>) -> Self {
        self.chunk = Accessor::Fixed(chunk.into());
        self
    }

    /// Names the chunk of each point.
    #[must_use]
    pub fn chunk_compute(mut self, f: impl Fn(&D) -> String + 'static) -> Self {
        self.chunk = Accessor::computed(f);
        self
    }

    /// Sets the resolver that picks which chunk owns the segment between two chunks.
    #[must_use]
    pub fn with_chunk_line_resolver(
        mut self,
        f: impl for<'a> Fn(&'a str, &'a str, &ChunkOrder) -> &'a str + 'static,
    ) -> Self {
        self.chunk_line_resolver = Arc::new(f);
        self
    }

    /// Sets the per-chunk style overrides.
    #[must_use]
    pub fn with_chunk_definitions(mut self, definitions: ChunkDefinitions<R>) -> Self {
        self.styles.chunk_definitions = definitions;
        self
    }

    /// Sets the curve every path is drawn with.
    #[must_use]
    pub fn with_curve(mut self, curve: impl Curve + 'static) -> Self {
        self.curve = Arc::new(curve);
        self
    }

    /// Sets the styles applied to every path.
    #[must_use]
    pub fn with_line_styles(mut self, spec: StyleSpec<R>) -> Self {
        self.styles.line_styles = spec;
        self
    }

    /// Sets the attributes applied to every path.
    #[must_use]
    pub fn with_line_attrs(mut self, spec: StyleSpec<R>) -> Self {
        self.styles.line_attrs = spec;
        self
    }

    /// Sets the styles layered onto the gap path.
    #[must_use]
    pub fn with_gap_styles(mut self, spec: StyleSpec<R>) -> Self {
        self.styles.gap_styles = spec;
        self
    }

    /// Sets the attributes layered onto the gap path.
    #[must_use]
    pub fn with_gap_attrs(mut self, spec: StyleSpec<R>) -> Self {
        self.styles.gap_attrs = spec;
        self
    }

    /// Sets the styles applied to every marker.
    #[must_use]
    pub fn with_point_styles(mut self, spec: StyleSpec<R>) -> Self {
        self.styles.point_styles = spec;
        self
    }

    /// Sets the attributes applied to every marker.
    #[must_use]
    pub fn with_point_attrs(mut self, spec: StyleSpec<R>) -> Self {
        self.styles.point_attrs = spec;
        self
    }

    /// Whether the first render rises from the bottom of the y extent.
    #[must_use]
    pub fn with_transition_initial(mut self, transition_initial: bool) -> Self {
        self.transition_initial = transition_initial;
        self
    }

    /// Extends the gap path horizontally to `[x_min, x_max]`.
    #[must_use]
    pub fn with_extend_ends(mut self, extend_ends: Option<[f64; 2]>) -> Self {
        self.extend_ends = extend_ends;
        self
    }

    /// Sets how points are read from a series datum.
    #[must_use]
    pub fn with_access_data(mut self, f: impl for<'a> Fn(&'a R) -> &'a [D] + 'static) -> Self {
        self.access_data = Arc::new(f);
        self
    }

    /// Draws the clip rectangles as visible overlays.
    #[must_use]
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Sets how markers are matched across renders.
    #[must_use]
    pub fn with_point_identity(mut self, point_identity: PointIdentity) -> Self {
        self.point_identity = point_identity;
        self
    }

    /// Sets the generator for clip-path ids.
    ///
    /// Ids must be unique within the document the scene is shown in. Share one generator
    /// between renderers drawing into the same document.
    #[must_use]
    pub fn with_clip_ids(mut self, clip_ids: Arc<dyn ClipIdGenerator>) -> Self {
        self.clip_ids = clip_ids;
        self
    }
}

impl<D, R> LineChunked<D, R> {
    /// The x accessor.
    pub fn x(&self) -> &Accessor<D, f64> {
        &self.x
    }

    /// The y accessor.
    pub fn y(&self) -> &Accessor<D, f64> {
        &self.y
    }

    /// The defined accessor.
    pub fn defined(&self) -> &Accessor<D, bool> {
        &self.defined
    }

    /// The adjacency predicate.
    pub fn is_next(&self) -> &Adjacency<D> {
        &self.is_next
    }

    /// The chunk accessor.
    pub fn chunk(&self) -> &Accessor<D, String> {
        &self.chunk
    }

    /// The chunk resolver.
    pub fn chunk_line_resolver(&self) -> &ChunkLineResolver {
        &self.chunk_line_resolver
    }

    /// The chunk definitions.
    pub fn chunk_definitions(&self) -> &ChunkDefinitions<R> {
        &self.styles.chunk_definitions
    }

    /// The curve.
    pub fn curve(&self) -> &dyn Curve {
        &*self.curve
    }

    /// Styles applied to every path.
    pub fn line_styles(&self) -> &StyleSpec<R> {
        &self.styles.line_styles
    }

    /// Attributes applied to every path.
    pub fn line_attrs(&self) -> &StyleSpec<R> {
        &self.styles.line_attrs
    }

    /// Styles layered onto the gap path.
    pub fn gap_styles(&self) -> &StyleSpec<R> {
        &self.styles.gap_styles
    }

    /// Attributes layered onto the gap path.
    pub fn gap_attrs(&self) -> &StyleSpec<R> {
        &self.styles.gap_attrs
    }

    /// Styles applied to every marker.
    pub fn point_styles(&self) -> &StyleSpec<R> {
        &self.styles.point_styles
    }

    /// Attributes applied to every marker.
    pub fn point_attrs(&self) -> &StyleSpec<R> {
        &self.styles.point_attrs
    }

    /// All style layers.
    pub fn style_layers(&self) -> &StyleLayers<R> {
        &self.styles
    }

    /// Whether the first render is animated.
    pub fn transition_initial(&self) -> bool {
        self.transition_initial
    }

    /// Horizontal extent of the gap path, if extended.
    pub fn extend_ends(&self) -> Option<[f64; 2]> {
        self.extend_ends
    }

    /// The series projection.
    pub fn access_data(&self) -> &AccessData<D, R> {
        &self.access_data
    }

    /// Whether clip rectangles are drawn as overlays.
    pub fn debug(&self) -> bool {
        self.debug
    }

    /// How markers are matched across renders.
    pub fn point_identity(&self) -> PointIdentity {
        self.point_identity
    }

    /// The clip-path id generator.
    pub fn clip_ids(&self) -> &Arc<dyn ClipIdGenerator> {
        &self.clip_ids
    }
}

impl<D, R> Clone for LineChunked<D, R> {
    fn clone(&self) -> Self {
        Self {
            x: self.x.clone(),
            y: self.y.clone(),
            defined: self.defined.clone(),
            is_next: self.is_next.clone(),
            chunk: self.chunk.clone(),
            chunk_line_resolver: self.chunk_line_resolver.clone(),
            curve: self.curve.clone(),
            styles: self.styles.clone(),
            transition_initial: self.transition_initial,
            extend_ends: self.extend_ends,
            access_data: self.access_data.clone(),
            debug: self.debug,
            point_identity: self.point_identity,
            clip_ids: self.clip_ids.clone(),
        }
    }
}

impl<D, R> fmt::Debug for LineChunked<D, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LineChunked")
            .field("x", &self.x)
            .field("y", &self.y)
            .field("defined", &self.defined)
            .field("is_next", &self.is_next)
            .field("chunk", &self.chunk)
            .field("curve", &self.curve)
            .field("styles", &self.styles)
            .field("transition_initial", &self.transition_initial)
            .field("extend_ends", &self.extend_ends)
            .field("debug", &self.debug)
            .field("point_identity", &self.point_identity)
            .field("clip_ids", &self.clip_ids)
            .finish_non_exhaustive()
    }
}
