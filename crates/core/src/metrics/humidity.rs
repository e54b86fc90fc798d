//! Tropical 70 hPa water vapour metric
//!
//! 10S-10N specific humidity at 70 hPa, monthly climatology, area-weighted
//! latitude mean, converted from a mass mixing ratio to a volume mixing
//! ratio (ppmv) by the fixed molar-mass ratio.

use std::path::Path;

use crate::analysis::reduce::weight_lat_ave;
use crate::error::Result;
use crate::field::{Dim, GriddedField, TimeSeries};
use crate::io;
use crate::metrics::{Metric, Q70_TROPICS_MEAN};
use crate::metrics::teq::TROPICS_BAND_DEG;
use crate::run::RunDescriptor;

/// Mean molar mass of dry air (g/mol)
pub const MOLAR_MASS_DRY_AIR: f64 = 29.0;

/// Molar mass of water (g/mol)
pub const MOLAR_MASS_WATER: f64 = 18.0;

/// kg/kg mass mixing ratio to ppmv volume mixing ratio
pub const KG_PER_KG_TO_PPMV: f64 = 1.0e6 * MOLAR_MASS_DRY_AIR / MOLAR_MASS_WATER;

/// Pressure level (hPa) for the water vapour metric
pub const WATER_VAPOUR_PRESSURE_HPA: f64 = 70.0;

/// Mean water vapour of a kg/kg series, in ppmv
pub fn q_mean(series: &TimeSeries) -> f64 {
    series.mean() * KG_PER_KG_TO_PPMV
}

/// Compute the tropical water vapour metric; persists the reduced series
pub fn q_metrics(
    run: &RunDescriptor,
    q: &GriddedField,
    out_dir: &Path,
) -> Result<Vec<Metric>> {
    let band = q.select_range(Dim::Latitude, -TROPICS_BAND_DEG, TROPICS_BAND_DEG)?;
    let at_level = band.select_level(WATER_VAPOUR_PRESSURE_HPA)?;
    let months = at_level.monthly_climatology()?;
    let series = weight_lat_ave(&months)?.into_series()?;

    io::save_series(
        &series,
        &io::series_path(out_dir, &run.runid, io::FAMILY_Q70, &run.period),
    )?;

    Ok(vec![(Q70_TROPICS_MEAN, q_mean(&series))])
}
