// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Presentation values (attributes and styles).

use alloc::string::{String, ToString};
use core::fmt;

use hashbrown::DefaultHashBuilder;
use indexmap::IndexMap;
use peniko::Color;

/// A resolved attribute or style value.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// A plain number (`stroke-width: 1.5`).
    Number(f64),
    /// Free-form text (`stroke-dasharray: "2 2"`, `fill: "none"`, `"1.5px"`).
    Text(String),
    /// A color, written out in CSS syntax.
    Color(Color),
}

impl Value {
    /// Reads this value as a number.
    ///
    /// Text is parsed leniently: the longest numeric prefix wins, so `"1.5px"` reads as `1.5`.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => parse_leading_number(s),
            Self::Color(_) => None,
        }
    }

    /// Returns the text if this is a [`Value::Text`].
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
            Self::Color(c) => {
                let rgba = c.to_rgba8();
                if rgba.a == 255 {
                    write!(f, "#{:02x}{:02x}{:02x}", rgba.r, rgba.g, rgba.b)
                } else {
                    write!(
                        f,
                        "rgba({}, {}, {}, {})",
                        rgba.r,
                        rgba.g,
                        rgba.b,
                        f64::from(rgba.a) / 255.0
                    )
                }
            }
        }
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Color> for Value {
    fn from(value: Color) -> Self {
        Self::Color(value)
    }
}

/// Parses the longest leading decimal number in `s`, ignoring leading whitespace.
///
/// Mirrors how CSS lengths are usually read back from markup: `"10px"` is `10`, `"2 2"` is `2`,
/// and strings without a numeric prefix are `None`.
pub fn parse_leading_number(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let end = s
        .char_indices()
        .find(|(_, c)| !(c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E')))
        .map_or(s.len(), |(i, _)| i);
    // Only ASCII characters were accepted, so every prefix is a char boundary.
    let mut candidate = &s[..end];
    while !candidate.is_empty() {
        if let Ok(v) = candidate.parse::<f64>() {
            return Some(v);
        }
        candidate = &candidate[..candidate.len() - 1];
    }
    None
}

/// An insertion-ordered map of presentation properties.
///
/// Re-inserting an existing key replaces its value in place, so merged maps keep the order in
/// which properties were first declared.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StyleMap {
    entries: IndexMap<String, Value, DefaultHashBuilder>,
}

impl StyleMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces `key`.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Builder-style [`StyleMap::insert`].
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Returns the value for `key`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Returns `true` if `key` is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Removes `key`, returning its value. Later entries keep their relative order.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.entries.shift_remove(key)
    }

    /// Overlays every entry of `other` onto `self` (shallow merge, `other` wins).
    pub fn merge(&mut self, other: &Self) {
        for (k, v) in &other.entries {
            self.entries.insert(k.clone(), v.clone());
        }
    }

    /// Iterates entries in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for StyleMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}
