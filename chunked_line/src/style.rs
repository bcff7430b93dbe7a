// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layered styles for lines, gaps, chunks and point markers.

use std::fmt;
use std::sync::Arc;

use chunked_core::{StyleMap, Value};
use indexmap::IndexMap;

use crate::chunk::{ChunkOrder, GAP_CHUNK, LINE_CHUNK};

/// A style or attribute value: a constant, or a function of `(series datum, series index)`.
pub enum StyleValue<R> {
    /// The same value for every series.
    Fixed(Value),
    /// Recomputed on every render.
    Computed(Arc<dyn Fn(&R, usize) -> Value>),
}

impl<R> StyleValue<R> {
    /// Evaluates the value for one series.
    pub fn eval(&self, datum: &R, index: usize) -> Value {
        match self {
            Self::Fixed(v) => v.clone(),
            Self::Computed(f) => f(datum, index),
        }
    }
}

impl<R> Clone for StyleValue<R> {
    fn clone(&self) -> Self {
        match self {
            Self::Fixed(v) => Self::Fixed(v.clone()),
            Self::Computed(f) => Self::Computed(f.clone()),
        }
    }
}

impl<R> fmt::Debug for StyleValue<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(v) => f.debug_tuple("Fixed").field(v).finish(),
            Self::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

/// An ordered set of style or attribute declarations.
pub struct StyleSpec<R> {
    entries: IndexMap<String, StyleValue<R>>,
}

impl<R> Default for StyleSpec<R> {
    fn default() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }
}

impl<R> Clone for StyleSpec<R> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
        }
    }
}

impl<R> fmt::Debug for StyleSpec<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.entries.iter()).finish()
    }
}

impl<R> StyleSpec<R> {
    /// Creates an empty spec.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `key` to a constant.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, StyleValue::Fixed(value.into()));
        self
    }

    /// Sets `key` to a function of `(series datum, series index)`.
    #[must_use]
    pub fn with_compute<V: Into<Value>>(
        mut self,
        key: impl Into<String>,
        f: impl Fn(&R, usize) -> V + 'static,
    ) -> Self {
        self.insert(
            key,
            StyleValue::Computed(Arc::new(move |d: &R, i: usize| f(d, i).into())),
        );
        self
    }

    /// Inserts or replaces `key`, keeping its original position.
    pub fn insert(&mut self, key: impl Into<String>, value: StyleValue<R>) {
        self.entries.insert(key.into(), value);
    }

    /// Returns the declaration for `key`.
    pub fn get(&self, key: &str) -> Option<&StyleValue<R>> {
        self.entries.get(key)
    }

    /// Returns `true` if `key` is declared.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Declared keys, in order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Number of declarations.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is declared.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Overlays `other` onto `self`.
    pub fn merge(&mut self, other: &Self) {
        for (k, v) in &other.entries {
            self.entries.insert(k.clone(), v.clone());
        }
    }

    /// Evaluates every declaration for one series.
    pub fn evaluate(&self, datum: &R, index: usize) -> StyleMap {
        self.entries
            .iter()
            .map(|(k, v)| (k.as_str(), v.eval(datum, index)))
            .collect()
    }
}

impl<R> From<StyleMap> for StyleSpec<R> {
    fn from(map: StyleMap) -> Self {
        Self {
            entries: map
                .iter()
                .map(|(k, v)| (k.to_owned(), StyleValue::Fixed(v.clone())))
                .collect(),
        }
    }
}

/// Styling overrides for one named chunk.
pub struct ChunkDefinition<R> {
    /// Inline styles for the chunk's path.
    pub styles: StyleSpec<R>,
    /// Attributes for the chunk's path.
    pub attrs: StyleSpec<R>,
    /// Inline styles for the chunk's markers.
    pub point_styles: StyleSpec<R>,
    /// Attributes for the chunk's markers.
    pub point_attrs: StyleSpec<R>,
}

impl<R> Default for ChunkDefinition<R> {
    fn default() -> Self {
        Self {
            styles: StyleSpec::new(),
            attrs: StyleSpec::new(),
            point_styles: StyleSpec::new(),
            point_attrs: StyleSpec::new(),
        }
    }
}

impl<R> Clone for ChunkDefinition<R> {
    fn clone(&self) -> Self {
        Self {
            styles: self.styles.clone(),
            attrs: self.attrs.clone(),
            point_styles: self.point_styles.clone(),
            point_attrs: self.point_attrs.clone(),
        }
    }
}

impl<R> fmt::Debug for ChunkDefinition<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChunkDefinition")
            .field("styles", &self.styles)
            .field("attrs", &self.attrs)
            .field("point_styles", &self.point_styles)
            .field("point_attrs", &self.point_attrs)
            .finish()
    }
}

impl<R> ChunkDefinition<R> {
    /// Creates an empty definition.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the path styles.
    #[must_use]
    pub fn with_styles(mut self, styles: StyleSpec<R>) -> Self {
        self.styles = styles;
        self
    }

    /// Sets the path attributes.
    #[must_use]
    pub fn with_attrs(mut self, attrs: StyleSpec<R>) -> Self {
        self.attrs = attrs;
        self
    }

    /// Sets the marker styles.
    #[must_use]
    pub fn with_point_styles(mut self, point_styles: StyleSpec<R>) -> Self {
        self.point_styles = point_styles;
        self
    }

    /// Sets the marker attributes.
    #[must_use]
    pub fn with_point_attrs(mut self, point_attrs: StyleSpec<R>) -> Self {
        self.point_attrs = point_attrs;
        self
    }
}

/// A chunk definition key that looks like a misspelling of a real one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MisnamedKey {
    /// The chunk the key was found on.
    pub chunk: String,
    /// The key as written.
    pub found: String,
    /// The key that was probably meant.
    pub expected: &'static str,
}

impl MisnamedKey {
    /// Returns the intended key if `key` is a known singular misspelling.
    pub(crate) fn expected_for(key: &str) -> Option<&'static str> {
        match key {
            "style" => Some("styles"),
            "attr" => Some("attrs"),
            "pointStyle" => Some("pointStyles"),
            "pointAttr" => Some("pointAttrs"),
            _ => None,
        }
    }
}

/// Chunk definitions keyed by chunk name, in declaration order.
pub struct ChunkDefinitions<R> {
    entries: IndexMap<String, ChunkDefinition<R>>,
    misnamed: Vec<MisnamedKey>,
}

impl<R> Default for ChunkDefinitions<R> {
    fn default() -> Self {
        Self {
            entries: IndexMap::new(),
            misnamed: Vec::new(),
        }
    }
}

impl<R> Clone for ChunkDefinitions<R> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
            misnamed: self.misnamed.clone(),
        }
    }
}

impl<R> fmt::Debug for ChunkDefinitions<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChunkDefinitions")
            .field("entries", &self.entries)
            .field("misnamed", &self.misnamed)
            .finish()
    }
}

impl<R> ChunkDefinitions<R> {
    /// Creates an empty set of definitions.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces the definition for `name`.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, definition: ChunkDefinition<R>) -> Self {
        self.insert(name, definition);
        self
    }

    /// Adds or replaces the definition for `name`, keeping its original position.
    pub fn insert(&mut self, name: impl Into<String>, definition: ChunkDefinition<R>) {
        self.entries.insert(name.into(), definition);
    }

    /// Returns the definition for `name`.
    pub fn get(&self, name: &str) -> Option<&ChunkDefinition<R>> {
        self.entries.get(name)
    }

    /// Defined chunk names, in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Number of definitions.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there are no definitions.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys that were ignored because they look like misspellings.
    pub fn misnamed_keys(&self) -> &[MisnamedKey] {
        &self.misnamed
    }

    pub(crate) fn note_misnamed(&mut self, key: MisnamedKey) {
        self.misnamed.push(key);
    }

    /// Emits one warning per misnamed key.
    pub(crate) fn warn_misnamed(&self) {
        for key in &self.misnamed {
            tracing::warn!(
                chunk = %key.chunk,
                found = %key.found,
                expected = key.expected,
                "chunk definition key `{}` is ignored; use `{}`",
                key.found,
                key.expected,
            );
        }
    }
}

/// Fully evaluated presentation for one chunk of one series.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EvaluatedDefinition {
    /// Path styles.
    pub styles: StyleMap,
    /// Path attributes.
    pub attrs: StyleMap,
    /// Marker styles.
    pub point_styles: StyleMap,
    /// Marker attributes. `r` is always numeric when present.
    pub point_attrs: StyleMap,
}

impl EvaluatedDefinition {
    /// The path's stroke width: the style wins over the attribute, and `0` if neither is set.
    pub fn stroke_width(&self) -> f64 {
        self.styles
            .get("stroke-width")
            .or_else(|| self.attrs.get("stroke-width"))
            .and_then(Value::as_number)
            .unwrap_or(0.0)
    }

    /// The marker radius, if any.
    pub fn point_radius(&self) -> Option<f64> {
        self.point_attrs.get("r").and_then(Value::as_number)
    }
}

/// Every style layer a chunked line is drawn with.
pub struct StyleLayers<R> {
    /// Styles for every path.
    pub line_styles: StyleSpec<R>,
    /// Attributes for every path.
    pub line_attrs: StyleSpec<R>,
    /// Styles added for the gap path.
    pub gap_styles: StyleSpec<R>,
    /// Attributes added for the gap path.
    pub gap_attrs: StyleSpec<R>,
    /// Styles for every marker.
    pub point_styles: StyleSpec<R>,
    /// Attributes for every marker.
    pub point_attrs: StyleSpec<R>,
    /// Per-chunk overrides.
    pub chunk_definitions: ChunkDefinitions<R>,
}

impl<R> Default for StyleLayers<R> {
    fn default() -> Self {
        Self {
            line_styles: StyleSpec::new(),
            line_attrs: StyleSpec::new()
                .with("fill", "none")
                .with("stroke", "#222")
                .with("stroke-width", 1.5)
                .with("stroke-opacity", 1.0),
            gap_styles: StyleSpec::new(),
            gap_attrs: StyleSpec::new()
                .with("stroke-dasharray", "2 2")
                .with("stroke-opacity", 0.35),
            point_styles: StyleSpec::new(),
            point_attrs: StyleSpec::new(),
            chunk_definitions: ChunkDefinitions::new(),
        }
    }
}

impl<R> Clone for StyleLayers<R> {
    fn clone(&self) -> Self {
        Self {
            line_styles: self.line_styles.clone(),
            line_attrs: self.line_attrs.clone(),
            gap_styles: self.gap_styles.clone(),
            gap_attrs: self.gap_attrs.clone(),
            point_styles: self.point_styles.clone(),
            point_attrs: self.point_attrs.clone(),
            chunk_definitions: self.chunk_definitions.clone(),
        }
    }
}

impl<R> fmt::Debug for StyleLayers<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StyleLayers")
            .field("line_styles", &self.line_styles)
            .field("line_attrs", &self.line_attrs)
            .field("gap_styles", &self.gap_styles)
            .field("gap_attrs", &self.gap_attrs)
            .field("point_styles", &self.point_styles)
            .field("point_attrs", &self.point_attrs)
            .field("chunk_definitions", &self.chunk_definitions)
            .finish()
    }
}

impl<R> StyleLayers<R> {
    /// Evaluates the presentation of `chunk` for one series.
    ///
    /// Layers, lowest first:
    /// - path: line spec, `"line"` definition, gap spec (gap only), the chunk's own definition;
    /// - marker attributes: `fill` and `r` derived from the path, point spec, `"line"`
    ///   definition, the chunk's own definition;
    /// - marker styles: `fill` derived from the path stroke, then the same layers.
    pub fn evaluate(&self, chunk: &str, datum: &R, index: usize) -> EvaluatedDefinition {
        let defs = &self.chunk_definitions;
        let line_def = defs.get(LINE_CHUNK);
        let chunk_def = defs.get(chunk);
        let eval = |spec: &StyleSpec<R>| spec.evaluate(datum, index);

        let mut styles = eval(&self.line_styles);
        let mut attrs = eval(&self.line_attrs);
        if let Some(def) = line_def {
            styles.merge(&eval(&def.styles));
            attrs.merge(&eval(&def.attrs));
        }
        if chunk == GAP_CHUNK {
            styles.merge(&eval(&self.gap_styles));
            attrs.merge(&eval(&self.gap_attrs));
        }
        if let Some(def) = chunk_def {
            styles.merge(&eval(&def.styles));
            attrs.merge(&eval(&def.attrs));
        }

        let mut point_attrs = StyleMap::new();
        if let Some(stroke) = attrs.get("stroke") {
            point_attrs.insert("fill", stroke.clone());
        }
        if let Some(width) = attrs.get("stroke-width").and_then(Value::as_number) {
            point_attrs.insert("r", width + 1.0);
        }
        point_attrs.merge(&eval(&self.point_attrs));
        if let Some(def) = line_def {
            point_attrs.merge(&eval(&def.point_attrs));
        }
        if let Some(def) = chunk_def {
            point_attrs.merge(&eval(&def.point_attrs));
        }
        let radius = point_attrs.get("r").map(Value::as_number);
        match radius {
            Some(Some(r)) => point_attrs.insert("r", r),
            Some(None) => {
                point_attrs.remove("r");
            }
            None => {}
        }

        let mut point_styles = StyleMap::new();
        let chunk_sets_fill = chunk_def.is_some_and(|def| def.point_attrs.contains_key("fill"));
        if let Some(stroke) = styles.get("stroke").filter(|_| !chunk_sets_fill) {
            point_styles.insert("fill", stroke.clone());
        }
        point_styles.merge(&eval(&self.point_styles));
        if let Some(def) = line_def {
            point_styles.merge(&eval(&def.point_styles));
        }
        if let Some(def) = chunk_def {
            point_styles.merge(&eval(&def.point_styles));
        }

        EvaluatedDefinition {
            styles,
            attrs,
            point_styles,
            point_attrs,
        }
    }

    /// Evaluates every chunk in `order` for one series.
    pub fn evaluate_all(
        &self,
        order: &ChunkOrder,
        datum: &R,
        index: usize,
    ) -> Vec<(String, EvaluatedDefinition)> {
        order
            .iter()
            .map(|chunk| (chunk.to_owned(), self.evaluate(chunk, datum, index)))
            .collect()
    }
}
