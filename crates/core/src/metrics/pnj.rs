//! Polar night jet and easterly jet strength
//!
//! For January and July, time-average the zonal-mean zonal wind, split the
//! stratosphere (pressures below the tropopause proxy) into hemispheres and
//! take the winter-hemisphere maximum and negated summer-hemisphere minimum
//! as the jet strengths. January is northern winter; July the reverse.

use std::path::Path;

use tracing::debug;

use crate::error::Result;
use crate::field::{Dim, GriddedField};
use crate::metrics::{
    Metric, EASTERLY_JET_NH_JUL, EASTERLY_JET_SH_JAN, POLAR_NIGHT_JET_NH_JAN,
    POLAR_NIGHT_JET_SH_JUL,
};
use crate::plot;
use crate::run::RunDescriptor;

/// Pressures at or above this (hPa) are treated as tropospheric and excluded
pub const TROPOPAUSE_PRESSURE_HPA: f64 = 80.0;

/// Jet strengths from a time-averaged zonal-mean wind field
///
/// Returns `(jet_max, jet_neg_min)`: the winter-hemisphere maximum and the
/// negated summer-hemisphere minimum over the extratropical stratosphere.
pub fn pnj_strength(field: &GriddedField, winter: bool) -> Result<(f64, f64)> {
    let notrop = field.select_where(Dim::Pressure, |p| p < TROPOPAUSE_PRESSURE_HPA)?;
    let nh = notrop.select_where(Dim::Latitude, |l| l > 0.0)?;
    let sh = notrop.select_where(Dim::Latitude, |l| l < 0.0)?;

    if winter {
        Ok((nh.max_value()?, -sh.min_value()?))
    } else {
        Ok((sh.max_value()?, -nh.min_value()?))
    }
}

/// Compute the four jet-strength metrics and render the wind plots
pub fn pnj_metrics(
    run: &RunDescriptor,
    u: &GriddedField,
    out_dir: &Path,
) -> Result<Vec<Metric>> {
    // Multi-annual January and July means
    let jan = u.select_month(1)?.mean_over(Dim::Time)?;
    let jul = u.select_month(7)?.mean_over(Dim::Time)?;

    let (jan_pnj, jan_enj) = pnj_strength(&jan, true)?;
    let (jul_pnj, jul_enj) = pnj_strength(&jul, false)?;
    debug!(
        runid = %run.runid,
        jan_pnj, jul_pnj, jan_enj, jul_enj,
        "jet strengths computed"
    );

    let levels = plot::level_range(-120.0, 120.0, 10.0);
    plot::plot_zonal_mean(
        &jan,
        &levels,
        "Zonal mean zonal wind (January)",
        &out_dir.join(format!("{}_u_jan.svg", run.runid)),
    )?;
    plot::plot_zonal_mean(
        &jul,
        &levels,
        "Zonal mean zonal wind (July)",
        &out_dir.join(format!("{}_u_jul.svg", run.runid)),
    )?;

    Ok(vec![
        (POLAR_NIGHT_JET_NH_JAN, jan_pnj),
        (POLAR_NIGHT_JET_SH_JUL, jul_pnj),
        (EASTERLY_JET_SH_JAN, jan_enj),
        (EASTERLY_JET_NH_JUL, jul_enj),
    ])
}
