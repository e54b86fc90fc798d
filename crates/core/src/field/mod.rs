//! Labeled gridded fields
//!
//! A [`GriddedField`] is a named physical quantity sampled over a subset of
//! {time, pressure, latitude, longitude}, with units and one coordinate
//! [`Axis`] per array dimension. Fields are immutable once loaded: every
//! reduction in [`crate::analysis::reduce`] returns a new, smaller field.

pub mod series;

use std::fmt;

use ndarray::ArrayD;

use crate::error::{Error, Result};

pub use series::TimeSeries;

/// Named dimensions a field can be sampled over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dim {
    Time,
    Pressure,
    Latitude,
    Longitude,
}

impl Dim {
    /// Coordinate name as it appears in labels and error messages
    pub fn name(self) -> &'static str {
        match self {
            Dim::Time => "time",
            Dim::Pressure => "air_pressure",
            Dim::Latitude => "latitude",
            Dim::Longitude => "longitude",
        }
    }
}

impl fmt::Display for Dim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Climatological season, derived from the calendar month
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Season {
    Djf,
    Mam,
    Jja,
    Son,
}

impl Season {
    /// Season a calendar month (1-12) belongs to
    pub fn from_month(month: u32) -> Self {
        debug_assert!((1..=12).contains(&month), "month out of range: {month}");
        match month {
            12 | 1 | 2 => Season::Djf,
            3..=5 => Season::Mam,
            6..=8 => Season::Jja,
            _ => Season::Son,
        }
    }

    /// Lower-case season label used in plot titles
    pub fn label(self) -> &'static str {
        match self {
            Season::Djf => "djf",
            Season::Mam => "mam",
            Season::Jja => "jja",
            Season::Son => "son",
        }
    }
}

/// One coordinate axis of a gridded field
#[derive(Debug, Clone, PartialEq)]
pub struct Axis {
    /// Which named dimension this axis spans
    pub dim: Dim,
    /// Coordinate value per sample, strictly monotone
    pub values: Vec<f64>,
    /// Physical units of the coordinate values
    pub units: String,
}

impl Axis {
    /// Create an axis over a named dimension
    pub fn new(dim: Dim, values: Vec<f64>, units: impl Into<String>) -> Self {
        Self {
            dim,
            values,
            units: units.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// A named physical quantity on a labeled grid
///
/// Axis order matches array dimension order; the loader contract puts time
/// first when present. Calendar month labels (1-12) along the time axis are
/// attached by the input collaborator for fields that get grouped by month
/// or season.
#[derive(Debug, Clone)]
pub struct GriddedField {
    pub(crate) name: String,
    pub(crate) units: String,
    pub(crate) data: ArrayD<f64>,
    pub(crate) axes: Vec<Axis>,
    pub(crate) month_number: Option<Vec<u32>>,
}

impl GriddedField {
    /// Create a field from data and matching axes
    ///
    /// # Panics
    ///
    /// Panics if the axis lengths do not match the array shape.
    pub fn new(
        name: impl Into<String>,
        units: impl Into<String>,
        data: ArrayD<f64>,
        axes: Vec<Axis>,
    ) -> Self {
        assert_eq!(
            data.ndim(),
            axes.len(),
            "one axis required per array dimension"
        );
        for (i, axis) in axes.iter().enumerate() {
            assert_eq!(
                data.shape()[i],
                axis.len(),
                "axis '{}' length does not match array dimension {i}",
                axis.dim
            );
        }
        Self {
            name: name.into(),
            units: units.into(),
            data,
            axes,
            month_number: None,
        }
    }

    /// Attach calendar month labels (1-12) along the time axis
    ///
    /// # Panics
    ///
    /// Panics if the label count does not match the time axis length.
    pub fn with_month_numbers(mut self, months: Vec<u32>) -> Self {
        let time_len = self
            .axis(Dim::Time)
            .map(Axis::len)
            .expect("month labels require a time axis");
        assert_eq!(months.len(), time_len, "one month label per time sample");
        self.month_number = Some(months);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn units(&self) -> &str {
        &self.units
    }

    pub fn data(&self) -> &ArrayD<f64> {
        &self.data
    }

    pub fn axes(&self) -> &[Axis] {
        &self.axes
    }

    /// Month label per time sample, if the loader attached them
    pub fn month_numbers(&self) -> Option<&[u32]> {
        self.month_number.as_deref()
    }

    /// Position of a named dimension among the array axes
    pub fn axis_index(&self, dim: Dim) -> Option<usize> {
        self.axes.iter().position(|a| a.dim == dim)
    }

    /// Axis for a named dimension
    pub fn axis(&self, dim: Dim) -> Option<&Axis> {
        self.axis_index(dim).map(|i| &self.axes[i])
    }

    pub(crate) fn require_axis(&self, dim: Dim) -> Result<usize> {
        self.axis_index(dim).ok_or_else(|| Error::MissingDimension {
            field: self.name.clone(),
            dim,
        })
    }

    pub(crate) fn require_month_numbers(&self) -> Result<&[u32]> {
        self.month_number
            .as_deref()
            .ok_or_else(|| Error::MissingMonthLabels {
                field: self.name.clone(),
            })
    }

    /// Collapse a 1-D field over time into a plain series
    pub fn into_series(self) -> Result<TimeSeries> {
        if self.data.ndim() != 1 {
            return Err(Error::NotSeries {
                field: self.name,
                ndim: self.data.ndim(),
            });
        }
        let time = self.require_axis(Dim::Time)?;
        let axis = &self.axes[time];
        Ok(TimeSeries {
            name: self.name.clone(),
            units: self.units.clone(),
            times: axis.values.clone(),
            time_units: axis.units.clone(),
            month_number: self.month_number.clone(),
            values: self.data.iter().copied().collect(),
        })
    }
}

/// Cyclic month labels (1-12) for a monthly record starting at `start_month`
pub fn month_sequence(start_month: u32, len: usize) -> Vec<u32> {
    assert!(
        (1..=12).contains(&start_month),
        "start month out of range: {start_month}"
    );
    (0..len).map(|i| (start_month - 1 + i as u32) % 12 + 1).collect()
}
