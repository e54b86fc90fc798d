//! Equatorial and tropical 100 hPa temperature metrics
//!
//! Narrow (2S-2N) and wide (10S-10N) latitude bands at 100 hPa, reduced to
//! a multi-annual monthly climatology and an area-weighted latitude mean.
//! Each band yields the cycle mean (offset applied) and half the range
//! between the extreme months. Both reduced series are persisted for the
//! comparison plots.

use std::path::Path;

use crate::analysis::reduce::weight_lat_ave;
use crate::error::Result;
use crate::field::{Dim, GriddedField, TimeSeries};
use crate::io;
use crate::metrics::{
    Metric, T100_TROPICS_CYCLE, T100_TROPICS_MEAN, TEMPERATURE_CALIBRATION_OFFSET_K, TEQ100_CYCLE,
    TEQ100_MEAN,
};
use crate::run::RunDescriptor;

/// Equatorial band half-width (degrees)
pub const EQUATOR_BAND_DEG: f64 = 2.0;

/// Tropical band half-width (degrees)
pub const TROPICS_BAND_DEG: f64 = 10.0;

/// Pressure level (hPa) for the temperature seasonal-cycle metrics
pub const CYCLE_PRESSURE_HPA: f64 = 100.0;

/// Mean and strength of a monthly temperature climatology
///
/// Strength is half the range between the extreme months; the mean carries
/// the fixed calibration offset.
pub fn mean_and_strength(series: &TimeSeries) -> (f64, f64) {
    let mean = series.mean() - TEMPERATURE_CALIBRATION_OFFSET_K;
    let strength = (series.max() - series.min()) / 2.0;
    (mean, strength)
}

/// Monthly climatology of a latitude band at the cycle pressure level
fn band_climatology(t: &GriddedField, half_width: f64) -> Result<TimeSeries> {
    let band = t.select_range(Dim::Latitude, -half_width, half_width)?;
    let at_level = band.select_level(CYCLE_PRESSURE_HPA)?;
    let months = at_level.monthly_climatology()?;
    weight_lat_ave(&months)?.into_series()
}

/// Equatorial (2S-2N) temperature metrics; persists the reduced series
pub fn teq_metrics(
    run: &RunDescriptor,
    t: &GriddedField,
    out_dir: &Path,
) -> Result<Vec<Metric>> {
    let series = band_climatology(t, EQUATOR_BAND_DEG)?;
    io::save_series(
        &series,
        &io::series_path(out_dir, &run.runid, io::FAMILY_TEQ100, &run.period),
    )?;

    let (mean, strength) = mean_and_strength(&series);
    Ok(vec![(TEQ100_MEAN, mean), (TEQ100_CYCLE, strength)])
}

/// Tropical (10S-10N) temperature metrics; persists the reduced series
pub fn tropical_t_metrics(
    run: &RunDescriptor,
    t: &GriddedField,
    out_dir: &Path,
) -> Result<Vec<Metric>> {
    let series = band_climatology(t, TROPICS_BAND_DEG)?;
    io::save_series(
        &series,
        &io::series_path(out_dir, &run.runid, io::FAMILY_T100, &run.period),
    )?;

    let (mean, strength) = mean_and_strength(&series);
    Ok(vec![(T100_TROPICS_MEAN, mean), (T100_TROPICS_CYCLE, strength)])
}
