// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Splitting a series into contiguous defined runs.

/// A maximal run of contiguous defined points, borrowed from the series.
pub type Run<'a, D> = Vec<&'a D>;

/// Splits `series` into runs of defined points.
///
/// Undefined points are dropped and break the current run. A defined point extends the current
/// run when `is_next(last_point_of_run, point)` holds, and starts a new run otherwise. The runs
/// partition the defined points and preserve their order.
pub fn compute_segments<'a, D>(
    series: &'a [D],
    mut defined: impl FnMut(&D) -> bool,
    mut is_next: impl FnMut(&D, &D) -> bool,
) -> Vec<Run<'a, D>> {
    let mut runs: Vec<Run<'a, D>> = Vec::new();
    let mut start_new = true;

    for d in series {
        if !defined(d) {
            start_new = true;
            continue;
        }
        match runs.last_mut() {
            Some(run) if !start_new && run.last().is_some_and(|&prev| is_next(prev, d)) => {
                run.push(d);
            }
            _ => runs.push(vec![d]),
        }
        start_new = false;
    }

    runs
}
