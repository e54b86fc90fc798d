//! Plain 1-D time series
//!
//! The unit of work for the zero-crossing detector and the oscillation index
//! extractor, and the record persisted between runs for the comparison plots.

use serde::{Deserialize, Serialize};

/// A gridded field collapsed to the single time dimension
///
/// The time index is strictly increasing and regularly spaced (monthly, per
/// the input contract), so crossing-index spacings are directly periods in
/// months.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeries {
    /// Physical quantity name
    pub name: String,
    /// Units of the values
    pub units: String,
    /// Time coordinate per sample
    pub times: Vec<f64>,
    /// Units of the time coordinate
    pub time_units: String,
    /// Calendar month label (1-12) per sample, when attached by the loader
    pub month_number: Option<Vec<u32>>,
    /// Sample values
    pub values: Vec<f64>,
}

impl TimeSeries {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Arithmetic mean of the sample values
    ///
    /// # Panics
    ///
    /// Panics on an empty series; pipeline selections guarantee at least one
    /// sample before a series is built.
    pub fn mean(&self) -> f64 {
        assert!(!self.is_empty(), "mean of empty series");
        self.values.iter().sum::<f64>() / self.values.len() as f64
    }

    /// Largest sample value
    pub fn max(&self) -> f64 {
        self.values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    /// Smallest sample value
    pub fn min(&self) -> f64 {
        self.values.iter().copied().fold(f64::INFINITY, f64::min)
    }

    /// Shift every time coordinate by a constant offset
    ///
    /// The oscillation indices depend only on sample order, never on the
    /// epoch, so this leaves every derived metric unchanged.
    pub fn shifted(mut self, offset: f64) -> Self {
        for t in &mut self.times {
            *t += offset;
        }
        self
    }
}
