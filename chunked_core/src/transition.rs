// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Transition timing.

use core::time::Duration;

/// Easing applied to normalized transition progress.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Easing {
    /// No easing.
    Linear,
    /// Symmetric cubic ease-in-out.
    #[default]
    CubicInOut,
}

impl Easing {
    /// Maps linear progress `t` in `[0, 1]` to eased progress.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::CubicInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    let u = -2.0 * t + 2.0;
                    1.0 - u * u * u / 2.0
                }
            }
        }
    }
}

/// Timing for an animated attribute change.
///
/// A transition starts when it is scheduled, waits for `delay`, then runs for `duration`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transition {
    /// Wait before the change starts.
    pub delay: Duration,
    /// Length of the change.
    pub duration: Duration,
    /// Easing curve.
    pub easing: Easing,
}

impl Default for Transition {
    fn default() -> Self {
        Self::new(Duration::from_millis(250))
    }
}

impl Transition {
    /// Creates a transition with no delay and the default easing.
    pub fn new(duration: Duration) -> Self {
        Self {
            delay: Duration::ZERO,
            duration,
            easing: Easing::default(),
        }
    }

    /// Sets the delay.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Sets the duration.
    #[must_use]
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Sets the easing.
    #[must_use]
    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Time from scheduling until the change completes.
    pub fn end(&self) -> Duration {
        self.delay + self.duration
    }

    /// Eased progress `elapsed` after scheduling.
    pub fn progress(&self, elapsed: Duration) -> f64 {
        if elapsed < self.delay {
            return 0.0;
        }
        if self.duration.is_zero() {
            return 1.0;
        }
        let t = (elapsed - self.delay).as_secs_f64() / self.duration.as_secs_f64();
        self.easing.apply(t)
    }
}
