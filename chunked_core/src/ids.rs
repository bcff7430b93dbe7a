// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Clip-path id generation.

use alloc::format;
use alloc::string::String;
use core::cell::Cell;
use core::fmt;

/// Produces document ids for clip-path containers.
///
/// Ids must be unique among all clip paths that can end up in one document, so a generator is
/// typically shared by every renderer that draws into the same output.
pub trait ClipIdGenerator: fmt::Debug {
    /// Returns a fresh id for a clip path belonging to `chunk`.
    fn next_id(&self, chunk: &str) -> String;
}

/// Sequential ids of the form `{prefix}-{chunk}-{n}`.
#[derive(Debug)]
pub struct CounterClipIds {
    prefix: String,
    next: Cell<u64>,
}

impl CounterClipIds {
    /// Creates a generator with the `line-chunked-clip` prefix.
    pub fn new() -> Self {
        Self::with_prefix("line-chunked-clip")
    }

    /// Creates a generator with a custom prefix.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: Cell::new(0),
        }
    }
}

impl Default for CounterClipIds {
    fn default() -> Self {
        Self::new()
    }
}

impl ClipIdGenerator for CounterClipIds {
    fn next_id(&self, chunk: &str) -> String {
        let n = self.next.get();
        self.next.set(n + 1);
        format!("{}-{chunk}-{n}", self.prefix)
    }
}
