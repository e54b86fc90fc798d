//! Weighted spatial reduction and sub-domain extraction
//!
//! Every metric is derived through these collapses: area-weighted latitude
//! means, inclusive coordinate-range selection, single-level extraction and
//! month/season grouping. Each operation returns a new, smaller field and
//! never mutates its input.

use ndarray::{stack, ArrayD, Axis as NdAxis, IxDyn};

use crate::error::{Error, Result};
use crate::field::{Axis, Dim, GriddedField, Season};

/// Tolerance for matching a requested pressure level against the axis
const LEVEL_MATCH_TOLERANCE: f64 = 1.0e-6;

/// Area-proportional weights for a latitude axis
///
/// Grid cells shrink towards the poles; weighting by the cosine of latitude
/// keeps each cell's contribution proportional to the surface area it
/// represents.
pub fn area_weights(latitude: &Axis) -> Vec<f64> {
    debug_assert_eq!(latitude.dim, Dim::Latitude);
    latitude.values.iter().map(|&l| l.to_radians().cos()).collect()
}

/// Area-weighted latitudinal average
pub fn weight_lat_ave(field: &GriddedField) -> Result<GriddedField> {
    let i = field.require_axis(Dim::Latitude)?;
    let weights = area_weights(&field.axes()[i]);
    field.weighted_mean_over(Dim::Latitude, &weights)
}

impl GriddedField {
    /// Collapse one dimension by its unweighted mean
    pub fn mean_over(&self, dim: Dim) -> Result<GriddedField> {
        let i = self.require_axis(dim)?;
        let data = self
            .data
            .mean_axis(NdAxis(i))
            .ok_or_else(|| self.empty_domain(dim))?;
        Ok(self.collapsed(i, data))
    }

    /// Collapse one dimension by a weighted mean
    ///
    /// Uniform weights reduce to the unweighted mean.
    ///
    /// # Panics
    ///
    /// Panics if the weight count does not match the axis length.
    pub fn weighted_mean_over(&self, dim: Dim, weights: &[f64]) -> Result<GriddedField> {
        let i = self.require_axis(dim)?;
        assert_eq!(
            weights.len(),
            self.axes[i].len(),
            "one weight per coordinate value"
        );
        if weights.is_empty() {
            return Err(self.empty_domain(dim));
        }
        let total: f64 = weights.iter().sum();
        let shape: Vec<usize> = self
            .data
            .shape()
            .iter()
            .enumerate()
            .filter(|&(j, _)| j != i)
            .map(|(_, &n)| n)
            .collect();
        let mut acc = ArrayD::<f64>::zeros(IxDyn(&shape));
        for (sub, &w) in self.data.axis_iter(NdAxis(i)).zip(weights) {
            acc.zip_mut_with(&sub, |a, &b| *a += w * b);
        }
        acc.mapv_inplace(|v| v / total);
        Ok(self.collapsed(i, acc))
    }

    /// Keep only the coordinate values a predicate accepts
    pub fn select_where<F>(&self, dim: Dim, keep: F) -> Result<GriddedField>
    where
        F: Fn(f64) -> bool,
    {
        let i = self.require_axis(dim)?;
        let picked: Vec<usize> = self.axes[i]
            .values
            .iter()
            .enumerate()
            .filter(|&(_, &v)| keep(v))
            .map(|(j, _)| j)
            .collect();
        if picked.is_empty() {
            return Err(self.empty_domain(dim));
        }
        Ok(self.selected(i, &picked))
    }

    /// Rectangular sub-selection by inclusive numeric bounds
    pub fn select_range(&self, dim: Dim, lo: f64, hi: f64) -> Result<GriddedField> {
        self.select_where(dim, |v| (lo..=hi).contains(&v))
    }

    /// Extract a single pressure level, removing the pressure axis
    ///
    /// The level must be present on the axis; nothing is interpolated.
    pub fn select_level(&self, pressure: f64) -> Result<GriddedField> {
        let i = self.require_axis(Dim::Pressure)?;
        let j = self.axes[i]
            .values
            .iter()
            .position(|&p| (p - pressure).abs() < LEVEL_MATCH_TOLERANCE)
            .ok_or(Error::LevelNotFound { pressure })?;
        let data = self.data.index_axis(NdAxis(i), j).to_owned();
        let mut axes = self.axes.clone();
        axes.remove(i);
        Ok(GriddedField {
            name: self.name.clone(),
            units: self.units.clone(),
            data,
            axes,
            month_number: self.month_number.clone(),
        })
    }

    /// Keep only the time samples of one calendar month
    pub fn select_month(&self, month: u32) -> Result<GriddedField> {
        let i = self.require_axis(Dim::Time)?;
        let labels = self.require_month_numbers()?;
        let picked: Vec<usize> = labels
            .iter()
            .enumerate()
            .filter(|&(_, &m)| m == month)
            .map(|(j, _)| j)
            .collect();
        if picked.is_empty() {
            return Err(self.empty_domain(Dim::Time));
        }
        Ok(self.selected(i, &picked))
    }

    /// Time-mean over the samples of one climatological season
    pub fn seasonal_mean(&self, season: Season) -> Result<GriddedField> {
        let i = self.require_axis(Dim::Time)?;
        let labels = self.require_month_numbers()?;
        let picked: Vec<usize> = labels
            .iter()
            .enumerate()
            .filter(|&(_, &m)| Season::from_month(m) == season)
            .map(|(j, _)| j)
            .collect();
        if picked.is_empty() {
            return Err(self.empty_domain(Dim::Time));
        }
        self.selected(i, &picked).mean_over(Dim::Time)
    }

    /// Multi-annual monthly climatology
    ///
    /// Groups time samples by calendar month and takes the mean within each
    /// group. The result's time axis holds the month numbers (calendar
    /// order, months absent from the record skipped) and carries matching
    /// month labels.
    ///
    /// # Panics
    ///
    /// Panics if time is not the leading axis; the loader contract puts it
    /// first.
    pub fn monthly_climatology(&self) -> Result<GriddedField> {
        let i = self.require_axis(Dim::Time)?;
        assert_eq!(i, 0, "time must be the leading axis");
        let labels = self.require_month_numbers()?;

        let mut months = Vec::new();
        let mut groups = Vec::new();
        for month in 1..=12u32 {
            let picked: Vec<usize> = labels
                .iter()
                .enumerate()
                .filter(|&(_, &m)| m == month)
                .map(|(j, _)| j)
                .collect();
            if picked.is_empty() {
                continue;
            }
            let group = self
                .data
                .select(NdAxis(0), &picked)
                .mean_axis(NdAxis(0))
                .ok_or_else(|| self.empty_domain(Dim::Time))?;
            months.push(month);
            groups.push(group);
        }
        if groups.is_empty() {
            return Err(self.empty_domain(Dim::Time));
        }

        let views: Vec<_> = groups.iter().map(ndarray::ArrayBase::view).collect();
        let data = stack(NdAxis(0), &views).expect("climatology group shapes agree");
        let mut axes = self.axes.clone();
        axes[0] = Axis::new(
            Dim::Time,
            months.iter().map(|&m| f64::from(m)).collect(),
            "month",
        );
        Ok(GriddedField {
            name: self.name.clone(),
            units: self.units.clone(),
            data,
            axes,
            month_number: Some(months),
        })
    }

    /// Largest value over all remaining dimensions
    pub fn max_value(&self) -> Result<f64> {
        self.fold_all(f64::NEG_INFINITY, f64::max)
    }

    /// Smallest value over all remaining dimensions
    pub fn min_value(&self) -> Result<f64> {
        self.fold_all(f64::INFINITY, f64::min)
    }

    /// The single value of a fully collapsed field
    ///
    /// # Panics
    ///
    /// Panics if more than one value remains.
    pub fn scalar(&self) -> Result<f64> {
        if self.data.is_empty() {
            return Err(Error::EmptyDomain {
                what: format!("scalar of '{}'", self.name),
            });
        }
        assert_eq!(self.data.len(), 1, "field '{}' is not fully collapsed", self.name);
        Ok(self.data.iter().copied().next().expect("one value present"))
    }

    fn fold_all(&self, init: f64, f: fn(f64, f64) -> f64) -> Result<f64> {
        if self.data.is_empty() {
            return Err(Error::EmptyDomain {
                what: format!("extremum of '{}'", self.name),
            });
        }
        Ok(self.data.iter().copied().fold(init, f))
    }

    fn empty_domain(&self, dim: Dim) -> Error {
        Error::EmptyDomain {
            what: format!("{dim} selection on '{}'", self.name),
        }
    }

    /// New field with axis `i` collapsed away
    fn collapsed(&self, i: usize, data: ArrayD<f64>) -> GriddedField {
        let mut axes = self.axes.clone();
        let removed = axes.remove(i);
        let month_number = if removed.dim == Dim::Time {
            None
        } else {
            self.month_number.clone()
        };
        GriddedField {
            name: self.name.clone(),
            units: self.units.clone(),
            data,
            axes,
            month_number,
        }
    }

    /// New field keeping only `picked` positions along axis `i`
    fn selected(&self, i: usize, picked: &[usize]) -> GriddedField {
        let data = self.data.select(NdAxis(i), picked);
        let mut axes = self.axes.clone();
        axes[i].values = picked.iter().map(|&j| self.axes[i].values[j]).collect();
        let month_number = if axes[i].dim == Dim::Time {
            self.month_number
                .as_ref()
                .map(|m| picked.iter().map(|&j| m[j]).collect())
        } else {
            self.month_number.clone()
        };
        GriddedField {
            name: self.name.clone(),
            units: self.units.clone(),
            data,
            axes,
            month_number,
        }
    }
}
