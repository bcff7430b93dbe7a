// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Declarative options loaded from JSON.

use std::path::{Path, PathBuf};

use chunked_core::{StyleMap, Value};
use indexmap::IndexMap;
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer};

use crate::config::{LineChunked, PointIdentity};
use crate::style::{ChunkDefinition, ChunkDefinitions, MisnamedKey, StyleSpec};

/// Errors raised while loading [`LineChunkedOptions`].
#[derive(Debug, thiserror::Error)]
pub enum OptionsError {
    /// The options file could not be read.
    #[error("failed to read options from `{}`", path.display())]
    Io {
        /// The file that failed.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },
    /// The options are not valid JSON or have the wrong shape or value types.
    #[error("invalid chunked line options: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(f64),
    String(String),
}

impl From<NumberOrString> for Value {
    fn from(value: NumberOrString) -> Self {
        match value {
            NumberOrString::Number(n) => Self::Number(n),
            NumberOrString::String(s) => Self::Text(s),
        }
    }
}

/// A JSON object of style or attribute values, in document order.
///
/// Values must be numbers or strings.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StyleObject(StyleMap);

impl StyleObject {
    /// The parsed values.
    pub fn as_map(&self) -> &StyleMap {
        &self.0
    }

    fn into_spec<R>(self) -> StyleSpec<R> {
        StyleSpec::from(self.0)
    }
}

impl<'de> Deserialize<'de> for StyleObject {
    fn deserialize<De: Deserializer<'de>>(deserializer: De) -> Result<Self, De::Error> {
        let entries = IndexMap::<String, NumberOrString>::deserialize(deserializer)?;
        Ok(Self(entries.into_iter().collect()))
    }
}

/// Options for one chunk.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChunkDefinitionOptions {
    /// Path styles.
    #[serde(default)]
    pub styles: StyleObject,
    /// Path attributes.
    #[serde(default)]
    pub attrs: StyleObject,
    /// Marker styles.
    #[serde(default)]
    pub point_styles: StyleObject,
    /// Marker attributes.
    #[serde(default)]
    pub point_attrs: StyleObject,
    #[serde(default)]
    style: Option<IgnoredAny>,
    #[serde(default)]
    attr: Option<IgnoredAny>,
    #[serde(default)]
    point_style: Option<IgnoredAny>,
    #[serde(default)]
    point_attr: Option<IgnoredAny>,
}

impl ChunkDefinitionOptions {
    /// Singular keys present in the JSON, as written.
    pub fn misnamed_keys(&self) -> impl Iterator<Item = &'static str> {
        [
            ("style", self.style.is_some()),
            ("attr", self.attr.is_some()),
            ("pointStyle", self.point_style.is_some()),
            ("pointAttr", self.point_attr.is_some()),
        ]
        .into_iter()
        .filter_map(|(key, present)| present.then_some(key))
    }
}

/// Chunked line options in their JSON form.
///
/// Keys are camelCase; every key is optional and unknown keys are rejected.
///
/// ```
/// use chunked_line::LineChunkedOptions;
///
/// let options = LineChunkedOptions::from_json_str(
///     r#"{ "lineAttrs": { "stroke": "steelblue", "stroke-width": 2 }, "extendEnds": [0, 100] }"#,
/// )
/// .unwrap();
/// assert_eq!(options.extend_ends, Some([0.0, 100.0]));
/// ```
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LineChunkedOptions {
    /// Styles for every path.
    pub line_styles: Option<StyleObject>,
    /// Attributes for every path.
    pub line_attrs: Option<StyleObject>,
    /// Styles layered onto the gap path.
    pub gap_styles: Option<StyleObject>,
    /// Attributes layered onto the gap path.
    pub gap_attrs: Option<StyleObject>,
    /// Styles for every marker.
    pub point_styles: Option<StyleObject>,
    /// Attributes for every marker.
    pub point_attrs: Option<StyleObject>,
    /// Per-chunk overrides, in document order.
    pub chunk_definitions: Option<IndexMap<String, ChunkDefinitionOptions>>,
    /// Whether the first render is animated.
    pub transition_initial: Option<bool>,
    /// Horizontal extent of the gap path.
    pub extend_ends: Option<[f64; 2]>,
    /// Whether clip rectangles are drawn as overlays.
    pub debug: Option<bool>,
    /// How markers are matched across renders: `"x"` or `"index"`.
    pub point_identity: Option<PointIdentity>,
}

impl LineChunkedOptions {
    /// Parses options from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self, OptionsError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads options from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, OptionsError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| OptionsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&contents)
    }
}

impl<D: 'static, R: 'static> LineChunked<D, R> {
    /// Applies every option present in `options`, leaving the others untouched.
    ///
    /// Style objects and chunk definitions replace the current ones as a whole.
    #[must_use]
    pub fn apply_options(mut self, options: LineChunkedOptions) -> Self {
        if let Some(v) = options.line_styles {
            self = self.with_line_styles(v.into_spec());
        }
        if let Some(v) = options.line_attrs {
            self = self.with_line_attrs(v.into_spec());
        }
        if let Some(v) = options.gap_styles {
            self = self.with_gap_styles(v.into_spec());
        }
        if let Some(v) = options.gap_attrs {
            self = self.with_gap_attrs(v.into_spec());
        }
        if let Some(v) = options.point_styles {
            self = self.with_point_styles(v.into_spec());
        }
        if let Some(v) = options.point_attrs {
            self = self.with_point_attrs(v.into_spec());
        }
        if let Some(entries) = options.chunk_definitions {
            let mut definitions = ChunkDefinitions::new();
            for (name, def) in entries {
                for found in def.misnamed_keys() {
                    definitions.note_misnamed(MisnamedKey {
                        chunk: name.clone(),
                        found: found.to_owned(),
                        expected: MisnamedKey::expected_for(found).unwrap_or(found),
                    });
                }
                definitions.insert(
                    name,
                    ChunkDefinition::new()
                        .with_styles(def.styles.into_spec())
                        .with_attrs(def.attrs.into_spec())
                        .with_point_styles(def.point_styles.into_spec())
                        .with_point_attrs(def.point_attrs.into_spec()),
                );
            }
            self = self.with_chunk_definitions(definitions);
        }
        if let Some(v) = options.transition_initial {
            self = self.with_transition_initial(v);
        }
        if options.extend_ends.is_some() {
            self = self.with_extend_ends(options.extend_ends);
        }
        if let Some(v) = options.debug {
            self = self.with_debug(v);
        }
        if let Some(v) = options.point_identity {
            self = self.with_point_identity(v);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Datum = (f64, Option<f64>);

    #[test]
    fn parses_every_option() {
        let options = LineChunkedOptions::from_json_str(
            r##"{
                "lineStyles": { "stroke": "orange" },
                "lineAttrs": { "stroke-width": 4, "stroke": "#00f" },
                "gapStyles": { "stroke": "magenta" },
                "gapAttrs": { "stroke-dasharray": "4 2" },
                "pointStyles": { "fill": "maroon" },
                "pointAttrs": { "r": "6px" },
                "chunkDefinitions": {
                    "z": { "styles": { "stroke": "red" } },
                    "a": { "pointAttrs": { "r": 3 } }
                },
                "transitionInitial": false,
                "extendEnds": [0, 10],
                "debug": true,
                "pointIdentity": "index"
            }"##,
        )
        .unwrap();

        let line_attrs = options.line_attrs.as_ref().unwrap().as_map();
        assert_eq!(
            line_attrs.iter().map(|(k, _)| k).collect::<Vec<_>>(),
            ["stroke-width", "stroke"],
            "document order is kept"
        );
        assert_eq!(line_attrs.get("stroke-width"), Some(&Value::Number(4.0)));

        let chunked = LineChunked::<Datum>::new().apply_options(options);
        assert_eq!(
            chunked.chunk_definitions().names().collect::<Vec<_>>(),
            ["z", "a"]
        );
        assert!(!chunked.transition_initial());
        assert_eq!(chunked.extend_ends(), Some([0.0, 10.0]));
        assert!(chunked.debug());
        assert_eq!(chunked.point_identity(), PointIdentity::Index);
        assert_eq!(
            chunked
                .gap_attrs()
                .evaluate(&Vec::new(), 0)
                .get("stroke-dasharray")
                .and_then(Value::as_text),
            Some("4 2")
        );
    }

    #[test]
    fn repeated_keys_keep_their_first_position() {
        let options = LineChunkedOptions::from_json_str(
            r#"{ "lineStyles": { "stroke": "red", "fill": "none", "stroke": "blue" } }"#,
        )
        .unwrap();
        let styles = options.line_styles.as_ref().unwrap().as_map();
        assert_eq!(
            styles.iter().map(|(k, _)| k).collect::<Vec<_>>(),
            ["stroke", "fill"]
        );
        assert_eq!(styles.get("stroke").and_then(Value::as_text), Some("blue"));
    }

    #[test]
    fn absent_options_keep_builder_values() {
        let chunked = LineChunked::<Datum>::new()
            .with_debug(true)
            .apply_options(LineChunkedOptions::from_json_str("{}").unwrap());
        assert!(chunked.debug());
        assert_eq!(chunked.line_attrs().len(), 4);
    }

    #[test]
    fn type_mismatches_are_errors() {
        for bad in [
            r#"{ "lineStyles": { "stroke": true } }"#,
            r#"{ "lineStyles": ["stroke"] }"#,
            r#"{ "debug": "yes" }"#,
            r#"{ "extendEnds": [0] }"#,
            r#"{ "pointIdentity": "y" }"#,
            r#"{ "lineStyle": {} }"#,
        ] {
            let err = LineChunkedOptions::from_json_str(bad).unwrap_err();
            assert!(matches!(err, OptionsError::Json(_)), "{bad}: {err}");
        }
    }

    #[test]
    fn singular_chunk_keys_are_recorded() {
        let options = LineChunkedOptions::from_json_str(
            r#"{ "chunkDefinitions": { "high": { "style": { "stroke": "red" }, "pointAttr": {} } } }"#,
        )
        .unwrap();
        let chunked = LineChunked::<Datum>::new().apply_options(options);
        let misnamed = chunked.chunk_definitions().misnamed_keys();
        assert_eq!(misnamed.len(), 2);
        assert_eq!(misnamed[0].chunk, "high");
        assert_eq!(misnamed[0].found, "style");
        assert_eq!(misnamed[0].expected, "styles");
        assert_eq!(misnamed[1].expected, "pointAttrs");
        // The misspelled styles are not applied.
        let high = chunked.chunk_definitions().get("high").unwrap();
        assert!(high.styles.is_empty());
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = LineChunkedOptions::from_path("/nonexistent/options.json").unwrap_err();
        assert!(matches!(err, OptionsError::Io { .. }));
    }
}
