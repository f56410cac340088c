use serde::{Deserialize, Serialize};

use crate::models::temperature::x10_to_celsius;

/// Running statistics for one station.
///
/// Mean and variance use Welford's single-pass update; min/max stay in
/// fixed-point tenths so the hot path never compares floats.
#[derive(Debug, Clone, PartialEq)]
pub struct StationStats {
    pub count: u64,
    pub mean: f64,
    pub m2: f64,
    pub min_x10: i32,
    pub max_x10: i32,
}

impl Default for StationStats {
    fn default() -> Self {
        Self::new()
    }
}

impl StationStats {
    pub fn new() -> Self {
        Self {
            count: 0,
            mean: 0.0,
            m2: 0.0,
            min_x10: i32::MAX,
            max_x10: i32::MIN,
        }
    }

    #[inline(always)]
    pub fn update(&mut self, value_x10: i32) {
        self.count += 1;

        let value = x10_to_celsius(value_x10);
        let delta = value - self.mean;
        self.mean += delta / self.count as f64;
        let delta2 = value - self.mean;
        self.m2 += delta * delta2;

        self.min_x10 = self.min_x10.min(value_x10);
        self.max_x10 = self.max_x10.max(value_x10);
    }

    /// Population variance. Only meaningful once `count > 0`.
    pub fn variance(&self) -> f64 {
        self.m2 / self.count as f64
    }

    pub fn stddev(&self) -> f64 {
        self.variance().sqrt()
    }

    pub fn min(&self) -> f64 {
        x10_to_celsius(self.min_x10)
    }

    pub fn max(&self) -> f64 {
        x10_to_celsius(self.max_x10)
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

/// One element of the exported `cities` array. Field order is the JSON order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationSummary {
    pub name: String,
    pub avg: f64,
    pub std: f64,
    pub min: f64,
    pub max: f64,
}

impl StationSummary {
    pub fn new(name: String, stats: &StationStats) -> Self {
        Self {
            name,
            avg: stats.mean,
            std: stats.stddev(),
            min: stats.min(),
            max: stats.max(),
        }
    }
}
