//! Polar 50 hPa temperature metrics
//!
//! Seasonal-mean the zonal-mean temperature, area-average each polar cap at
//! 50 hPa and subtract the fixed calibration offset. Northern winter/spring
//! (DJF, MAM) pair with the southern seasons (JJA, SON).

use std::path::Path;

use crate::error::Result;
use crate::field::{Dim, GriddedField, Season};
use crate::metrics::{
    Metric, T50_NH_DJF, T50_NH_MAM, T50_SH_JJA, T50_SH_SON, TEMPERATURE_CALIBRATION_OFFSET_K,
};
use crate::plot;
use crate::run::RunDescriptor;
use crate::weight_lat_ave;

/// Polar cap boundary (degrees latitude, inclusive)
pub const POLAR_CAP_LATITUDE_DEG: f64 = 60.0;

/// Pressure level (hPa) for the polar temperature metrics
pub const POLAR_TEMPERATURE_PRESSURE_HPA: f64 = 50.0;

/// Area-averaged polar cap temperature for one season, offset applied
fn polar_cap_average(seasonal: &GriddedField, northern: bool) -> Result<f64> {
    let at_level = seasonal.select_level(POLAR_TEMPERATURE_PRESSURE_HPA)?;
    let cap = if northern {
        at_level.select_where(Dim::Latitude, |l| l >= POLAR_CAP_LATITUDE_DEG)?
    } else {
        at_level.select_where(Dim::Latitude, |l| l <= -POLAR_CAP_LATITUDE_DEG)?
    };
    Ok(weight_lat_ave(&cap)?.scalar()? - TEMPERATURE_CALIBRATION_OFFSET_K)
}

/// Compute the four polar temperature metrics and render the seasonal plots
pub fn tpole_metrics(
    run: &RunDescriptor,
    t: &GriddedField,
    out_dir: &Path,
) -> Result<Vec<Metric>> {
    let t_djf = t.seasonal_mean(Season::Djf)?;
    let t_mam = t.seasonal_mean(Season::Mam)?;
    let t_jja = t.seasonal_mean(Season::Jja)?;
    let t_son = t.seasonal_mean(Season::Son)?;

    let djf = polar_cap_average(&t_djf, true)?;
    let mam = polar_cap_average(&t_mam, true)?;
    let jja = polar_cap_average(&t_jja, false)?;
    let son = polar_cap_average(&t_son, false)?;

    let levels = plot::level_range(160.0, 320.0, 10.0);
    plot::plot_zonal_mean(
        &t_djf,
        &levels,
        "Temperature (DJF)",
        &out_dir.join(format!("{}_t_djf.svg", run.runid)),
    )?;
    plot::plot_zonal_mean(
        &t_jja,
        &levels,
        "Temperature (JJA)",
        &out_dir.join(format!("{}_t_jja.svg", run.runid)),
    )?;

    Ok(vec![
        (T50_NH_DJF, djf),
        (T50_NH_MAM, mam),
        (T50_SH_JJA, jja),
        (T50_SH_SON, son),
    ])
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use ndarray::{ArrayD, IxDyn};

    use super::*;
    use crate::field::{month_sequence, Axis};

    // (time, pressure, latitude): 210 K at the NH cap, 200 K at the SH cap,
    // 250 K in between, one year of months
    fn temperature_field() -> GriddedField {
        let lats = [-75.0, 0.0, 75.0];
        let mut values = Vec::new();
        for _t in 0..12 {
            for _p in 0..2 {
                values.extend_from_slice(&[200.0, 250.0, 210.0]);
            }
        }
        let data = ArrayD::from_shape_vec(IxDyn(&[12, 2, 3]), values).unwrap();
        GriddedField::new(
            "air_temperature",
            "K",
            data,
            vec![
                Axis::new(Dim::Time, (0..12).map(|i| i as f64).collect(), "months since 2000-01"),
                Axis::new(Dim::Pressure, vec![50.0, 100.0], "hPa"),
                Axis::new(Dim::Latitude, lats.to_vec(), "degrees_north"),
            ],
        )
        .with_month_numbers(month_sequence(1, 12))
    }

    #[test]
    fn offset_and_caps_are_applied() {
        let dir = std::env::temp_dir().join(format!("strat-tpole-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let run = RunDescriptor::new("tp", "control", "1980_2000");

        let metrics = tpole_metrics(&run, &temperature_field(), &dir).unwrap();
        let lookup = |name: &str| {
            metrics
                .iter()
                .find(|&&(n, _)| n == name)
                .map(|&(_, v)| v)
                .unwrap()
        };

        // NH cap is a single 210 K band: 210 - 180 = 30; SH cap 200 - 180 = 20
        assert_relative_eq!(lookup(T50_NH_DJF), 30.0);
        assert_relative_eq!(lookup(T50_NH_MAM), 30.0);
        assert_relative_eq!(lookup(T50_SH_JJA), 20.0);
        assert_relative_eq!(lookup(T50_SH_SON), 20.0);

        assert!(dir.join("tp_t_djf.svg").exists());
        assert!(dir.join("tp_t_jja.svg").exists());
    }
}
