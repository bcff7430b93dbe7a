// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Subdividing runs into named chunks.

use std::sync::Arc;

use crate::segment::Run;

/// The chunk every point belongs to unless `chunk` says otherwise.
pub const LINE_CHUNK: &str = "line";

/// The background path drawn through every defined point. Never classified.
pub const GAP_CHUNK: &str = "gap";

/// Picks which of two adjacent chunks owns the segment between them.
///
/// Called as `resolver(left, right, order)` and must return one of `left` or `right`.
pub type ChunkLineResolver = Arc<dyn for<'a> Fn(&'a str, &'a str, &ChunkOrder) -> &'a str>;

/// An ordered list of chunk names.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChunkOrder {
    names: Vec<String>,
}

impl ChunkOrder {
    /// The order handed to the chunk resolver: definition order, with `"line"` and `"gap"`
    /// prepended when they are not defined.
    pub fn resolution<'a>(defined: impl IntoIterator<Item = &'a str>) -> Self {
        let defined: Vec<&str> = defined.into_iter().collect();
        let mut names = Vec::with_capacity(defined.len() + 2);
        for reserved in [LINE_CHUNK, GAP_CHUNK] {
            if !defined.contains(&reserved) {
                names.push(reserved.to_owned());
            }
        }
        names.extend(defined.into_iter().map(str::to_owned));
        Self { names }
    }

    /// The order chunks are drawn in: `"line"`, `"gap"`, then the remaining definitions.
    pub fn render<'a>(defined: impl IntoIterator<Item = &'a str>) -> Self {
        let mut names = vec![LINE_CHUNK.to_owned(), GAP_CHUNK.to_owned()];
        for name in defined {
            if !names.iter().any(|n| n == name) {
                names.push(name.to_owned());
            }
        }
        Self { names }
    }

    /// Position of `name`, if present.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    /// Returns `true` if `name` is present.
    pub fn contains(&self, name: &str) -> bool {
        self.index_of(name).is_some()
    }

    /// The names, in order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Number of names.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns `true` if there are no names.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Default resolver: the chunk later in `order` wins.
///
/// Names missing from `order` rank below every known name. On a tie the right-hand chunk wins.
pub fn default_chunk_line_resolver<'a>(left: &'a str, right: &'a str, order: &ChunkOrder) -> &'a str {
    // `None` orders below every `Some`.
    if order.index_of(left) > order.index_of(right) {
        left
    } else {
        right
    }
}

/// Extracts the sub-runs of `runs` that belong to `chunk_name`.
///
/// A point whose own chunk is `chunk_name` always belongs. At a boundary between two chunks, the
/// segment between the points goes to whichever chunk `resolver` picks, and both end points of
/// that segment are included in the winning chunk's sub-run. Boundary points are therefore
/// shared between the sub-runs of neighbouring chunks.
pub fn compute_chunk_runs<'a, D>(
    chunk_name: &str,
    runs: &[Run<'a, D>],
    chunk: impl Fn(&D) -> String,
    resolver: &dyn for<'r> Fn(&'r str, &'r str, &ChunkOrder) -> &'r str,
    order: &ChunkOrder,
) -> Vec<Run<'a, D>> {
    runs.iter()
        .flat_map(|run| {
            let names: Vec<String> = run.iter().map(|d| chunk(d)).collect();
            split_run(chunk_name, run, &names, resolver, order)
        })
        .collect()
}

fn split_run<'a, D>(
    target: &str,
    run: &[&'a D],
    names: &[String],
    resolver: &dyn for<'r> Fn(&'r str, &'r str, &ChunkOrder) -> &'r str,
    order: &ChunkOrder,
) -> Vec<Run<'a, D>> {
    let mut out: Vec<Run<'a, D>> = Vec::new();
    let mut start_new = true;

    for (i, &d) in run.iter().enumerate() {
        let name = names[i].as_str();
        if name == target {
            push(&mut out, &mut start_new, d);
            continue;
        }

        // The segment arriving at this point belongs to the target chunk.
        if i > 0 && resolver(&names[i - 1], name, order) == target {
            push(&mut out, &mut start_new, d);
            continue;
        }

        // The segment leaving this point belongs to the target chunk.
        match names.get(i + 1) {
            Some(next) if resolver(name, next, order) == target => {
                out.push(vec![d]);
                start_new = false;
            }
            _ => start_new = true,
        }
    }

    out
}

fn push<'a, D>(out: &mut Vec<Run<'a, D>>, start_new: &mut bool, d: &'a D) {
    match out.last_mut() {
        Some(last) if !*start_new => last.push(d),
        _ => out.push(vec![d]),
    }
    *start_new = false;
}
