use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

/// Sentinel used by the range computations: larger than any sample value
/// the simulation can produce.
pub const MAX_VALUE: f64 = 1e100;

/// A single (x, y) sample. Immutable once appended to a series.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub x: f64,
    pub y: f64,
}

impl Sample {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Ordered, append-only sample storage.
///
/// Insertion order is significant: rendering and the XY-correlated lookup
/// both walk samples in the order they were appended, which for simulation
/// output is chronological. Bounds are maintained incrementally on append
/// and recomputed wholesale after removals; on the wire a series is just
/// its sample list and bounds are rebuilt on load.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(from = "Vec<Sample>", into = "Vec<Sample>")]
pub struct DataSeries {
    samples: Vec<Sample>,
    bounds: Bounds,
}

impl From<Vec<Sample>> for DataSeries {
    fn from(samples: Vec<Sample>) -> Self {
        let mut s = DataSeries {
            samples,
            bounds: Bounds::default(),
        };
        s.recompute_bounds();
        s
    }
}

impl From<DataSeries> for Vec<Sample> {
    fn from(s: DataSeries) -> Self {
        s.samples
    }
}

#[derive(Clone, Copy, Debug)]
struct Bounds {
    min_x: f64,
    max_x: f64,
    min_y: f64,
    max_y: f64,
}

impl Default for Bounds {
    fn default() -> Self {
        Bounds {
            min_x: MAX_VALUE,
            max_x: -MAX_VALUE,
            min_y: MAX_VALUE,
            max_y: -MAX_VALUE,
        }
    }
}

impl DataSeries {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn iter(&self) -> impl Iterator<Item = &Sample> {
        self.samples.iter()
    }

    pub fn first(&self) -> Option<&Sample> {
        self.samples.first()
    }

    pub fn last(&self) -> Option<&Sample> {
        self.samples.last()
    }

    pub fn get(&self, idx: usize) -> Option<&Sample> {
        self.samples.get(idx)
    }

    /// Append one sample, keeping the cached bounds current.
    pub fn push(&mut self, x: f64, y: f64) {
        self.samples.push(Sample::new(x, y));
        if x < self.bounds.min_x {
            self.bounds.min_x = x;
        }
        if x > self.bounds.max_x {
            self.bounds.max_x = x;
        }
        if y < self.bounds.min_y {
            self.bounds.min_y = y;
        }
        if y > self.bounds.max_y {
            self.bounds.max_y = y;
        }
    }

    /// Replace the whole content.
    pub fn set_data(&mut self, samples: impl IntoIterator<Item = (f64, f64)>) {
        self.reset();
        for (x, y) in samples {
            self.push(x, y);
        }
    }

    /// Drop everything (simulation restart).
    pub fn reset(&mut self) {
        self.samples.clear();
        self.bounds = Bounds::default();
    }

    /// Remove samples older than `max_x - limit` (with a small slack so the
    /// visible curve never empties abruptly). Returns the number removed.
    pub fn trim_before(&mut self, limit: f64) -> usize {
        const SLACK: f64 = 3000.0;
        if self.samples.is_empty() {
            return 0;
        }
        let cutoff = self.bounds.max_x - limit - SLACK;
        match self.samples.iter().position(|s| s.x > cutoff) {
            Some(0) => 0,
            Some(n) => {
                self.samples.drain(..n);
                self.recompute_bounds();
                n
            }
            None => {
                let n = self.samples.len();
                self.reset();
                n
            }
        }
    }

    fn recompute_bounds(&mut self) {
        self.bounds = Bounds::default();
        for s in &self.samples {
            if s.x < self.bounds.min_x {
                self.bounds.min_x = s.x;
            }
            if s.x > self.bounds.max_x {
                self.bounds.max_x = s.x;
            }
            if s.y < self.bounds.min_y {
                self.bounds.min_y = s.y;
            }
            if s.y > self.bounds.max_y {
                self.bounds.max_y = s.y;
            }
        }
    }

    /// Minimum y value, `MAX_VALUE` when empty.
    pub fn min_y(&self) -> f64 {
        self.bounds.min_y
    }

    /// Maximum y value, `-MAX_VALUE` when empty.
    pub fn max_y(&self) -> f64 {
        self.bounds.max_y
    }

    pub fn min_x(&self) -> f64 {
        self.bounds.min_x
    }

    pub fn max_x(&self) -> f64 {
        self.bounds.max_x
    }

    /// Smallest strictly positive y, `MAX_VALUE` when none. Used by the
    /// log-scale range substitution.
    pub fn positive_min_y(&self) -> f64 {
        let mut mi = MAX_VALUE;
        for s in &self.samples {
            if s.y > 0.0 && s.y < mi {
                mi = s.y;
            }
        }
        mi
    }

    /// Smallest strictly positive x, `MAX_VALUE` when none.
    pub fn positive_min_x(&self) -> f64 {
        let mut mi = MAX_VALUE;
        for s in &self.samples {
            if s.x > 0.0 && s.x < mi {
                mi = s.x;
            }
        }
        mi
    }

    /// First sample (in insertion order) with a positive x, `MAX_VALUE`
    /// when none. Time-annotated series are chronological, so this is the
    /// earliest visible instant on a log time axis.
    pub fn first_positive_x(&self) -> f64 {
        self.samples
            .iter()
            .find(|s| s.x > 0.0)
            .map(|s| s.x)
            .unwrap_or(MAX_VALUE)
    }

    /// Minimum absolute gap between consecutive x values, `MAX_VALUE` with
    /// fewer than two samples. Feeds bar-width auto-sizing.
    pub fn min_x_gap(&self) -> f64 {
        let mut mi = MAX_VALUE;
        for w in self.samples.windows(2) {
            let diff = (w[1].x - w[0].x).abs();
            if diff < mi {
                mi = diff;
            }
        }
        mi
    }

    /// Minimum absolute gap between consecutive y values. The XY-correlated
    /// bar sizing scans the X-source view, whose y values are the shared
    /// abscissas.
    pub fn min_y_gap(&self) -> f64 {
        let mut mi = MAX_VALUE;
        for w in self.samples.windows(2) {
            let diff = (w[1].y - w[0].y).abs();
            if diff < mi {
                mi = diff;
            }
        }
        mi
    }
}

/// Handle for a series fed from another thread (simulation worker). The
/// axis engine itself never locks; the chart takes the read guard for the
/// duration of one autoscale/paint pass.
pub type SharedSeries = Arc<RwLock<DataSeries>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_follow_appends() {
        let mut s = DataSeries::new();
        s.push(1.0, -3.0);
        s.push(2.0, 7.0);
        assert_eq!(s.min_y(), -3.0);
        assert_eq!(s.max_y(), 7.0);
        assert_eq!(s.max_x(), 2.0);
    }

    #[test]
    fn reset_restores_sentinels() {
        let mut s = DataSeries::new();
        s.push(1.0, 1.0);
        s.reset();
        assert!(s.is_empty());
        assert_eq!(s.min_y(), MAX_VALUE);
        assert_eq!(s.max_y(), -MAX_VALUE);
    }
}
