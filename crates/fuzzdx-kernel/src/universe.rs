//! Discretized numeric domains.
//!
//! A universe is the grid over which output curves are sampled and the
//! range every crisp input is clamped into. Grid points are computed as
//! `min + i * step` rather than by repeated addition, so the last point of
//! `[0, 100]` with step 1 is exactly `100.0`.

use serde::Serialize;

/// Tolerance used when counting grid points, so that `(max - min) / step`
/// landing a hair under an integer still includes `max`.
const POINT_COUNT_SLACK: f64 = 1e-9;

/// Upper bound on grid points per universe. Output curves are sampled on
/// every point of every term when an engine is built.
pub const MAX_UNIVERSE_POINTS: usize = 1_000_000;

/// An immutable discretized domain `{min, max, step}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Universe {
    min: f64,
    max: f64,
    step: f64,
    #[serde(skip)]
    len: usize,
}

impl Universe {
    /// Build a universe, rejecting non-finite bounds, `min >= max`,
    /// non-positive steps, and grids over [`MAX_UNIVERSE_POINTS`]. The error string is folded into a
    /// [`ConfigError`](crate::ConfigError) by the caller, which knows the
    /// variable name.
    pub fn new(min: f64, max: f64, step: f64) -> Result<Self, String> {
        if !min.is_finite() || !max.is_finite() || !step.is_finite() {
            return Err(format!(
                "bounds and step must be finite (min={min}, max={max}, step={step})"
            ));
        }
        if min >= max {
            return Err(format!("min ({min}) must be below max ({max})"));
        }
        if step <= 0.0 {
            return Err(format!("step ({step}) must be positive"));
        }
        let intervals = ((max - min) / step + POINT_COUNT_SLACK).floor();
        if !intervals.is_finite() || intervals >= MAX_UNIVERSE_POINTS as f64 {
            return Err(format!(
                "grid of ({max} - {min}) / {step} has more than {MAX_UNIVERSE_POINTS} points"
            ));
        }
        Ok(Self {
            min,
            max,
            step,
            len: intervals as usize + 1,
        })
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    /// Number of grid points, `min` and (when reachable) `max` included.
    pub fn len(&self) -> usize {
        self.len
    }

    /// A universe always has at least one point.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// The `i`-th grid point. Indices past the end saturate at `max`.
    pub fn point(&self, i: usize) -> f64 {
        (self.min + i as f64 * self.step).min(self.max)
    }

    /// Iterate the grid in ascending order.
    pub fn points(&self) -> impl Iterator<Item = f64> + '_ {
        (0..self.len()).map(move |i| self.point(i))
    }

    /// Clamp a crisp value into `[min, max]`.
    ///
    /// This is the single clamp policy for every crisp input. NaN is not
    /// handled here; the engine rejects it before clamping.
    pub fn clamp(&self, x: f64) -> f64 {
        x.clamp(self.min, self.max)
    }
}
