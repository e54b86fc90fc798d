//! QBO metrics
//!
//! Restrict the zonal-mean wind to a narrow equatorial band, area-weight
//! the latitude average, pull out the 30 hPa level and run the oscillation
//! index extractor on the resulting series. The reduced series is persisted
//! for the cross-run comparison plot.

use std::path::Path;

use tracing::debug;

use crate::analysis::oscillation::qbo_index;
use crate::analysis::reduce::weight_lat_ave;
use crate::error::Result;
use crate::field::{Dim, GriddedField};
use crate::io;
use crate::metrics::{
    Metric, QBO_AMPLITUDE_30HPA_EAST, QBO_AMPLITUDE_30HPA_WEST, QBO_PERIOD_30HPA,
};
use crate::plot;
use crate::run::RunDescriptor;

/// Equatorial band half-width (degrees) for the QBO wind average
pub const QBO_LATITUDE_BAND_DEG: f64 = 5.0;

/// Pressure level (hPa) the oscillation index is taken at
pub const QBO_PRESSURE_HPA: f64 = 30.0;

/// Compute the three QBO metrics, persist the 30 hPa series, render the plot
pub fn qbo_metrics(
    run: &RunDescriptor,
    u: &GriddedField,
    out_dir: &Path,
) -> Result<Vec<Metric>> {
    let tropics = u.select_range(Dim::Latitude, -QBO_LATITUDE_BAND_DEG, QBO_LATITUDE_BAND_DEG)?;
    let qbo = weight_lat_ave(&tropics)?;
    let qbo30 = qbo.select_level(QBO_PRESSURE_HPA)?.into_series()?;

    io::save_series(
        &qbo30,
        &io::series_path(out_dir, &run.runid, io::FAMILY_QBO30, &run.period),
    )?;

    let index = qbo_index(&qbo30.values)?;
    debug!(
        runid = %run.runid,
        period = index.period_months,
        east = index.amplitude_eastward,
        west = index.amplitude_westward,
        "qbo index computed"
    );

    let levels = plot::level_range(-80.0, 80.0, 10.0);
    plot::plot_time_height(
        &qbo,
        &levels,
        "QBO",
        &out_dir.join(format!("{}_qbo.svg", run.runid)),
    )?;

    Ok(vec![
        (QBO_PERIOD_30HPA, index.period_months),
        (QBO_AMPLITUDE_30HPA_WEST, index.amplitude_westward),
        (QBO_AMPLITUDE_30HPA_EAST, index.amplitude_eastward),
    ])
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use ndarray::{ArrayD, IxDyn};

    use super::*;
    use crate::field::{month_sequence, Axis};

    // (time, pressure, latitude) wind oscillating at 30 hPa with a 28-month
    // period, flat at 50 hPa
    fn oscillating_wind(months: usize) -> GriddedField {
        let lats = [-4.0, 0.0, 4.0];
        let mut values = Vec::with_capacity(months * 2 * lats.len());
        for t in 0..months {
            let phase = 2.0 * std::f64::consts::PI * t as f64 / 28.0;
            for p in 0..2 {
                for _ in &lats {
                    let v = if p == 0 { 25.0 * phase.sin() } else { 5.0 };
                    values.push(v);
                }
            }
        }
        let data = ArrayD::from_shape_vec(IxDyn(&[months, 2, 3]), values).unwrap();
        GriddedField::new(
            "eastward_wind",
            "m s-1",
            data,
            vec![
                Axis::new(Dim::Time, (0..months).map(|i| i as f64).collect(), "months since 1980-01"),
                Axis::new(Dim::Pressure, vec![30.0, 50.0], "hPa"),
                Axis::new(Dim::Latitude, lats.to_vec(), "degrees_north"),
            ],
        )
        .with_month_numbers(month_sequence(1, months))
    }

    #[test]
    fn recovers_the_oscillation_period() {
        let dir = std::env::temp_dir().join(format!("strat-qbo-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let run = RunDescriptor::new("qborun", "control", "1980_2000");

        let metrics = qbo_metrics(&run, &oscillating_wind(140), &dir).unwrap();
        let lookup = |name: &str| {
            metrics
                .iter()
                .find(|&&(n, _)| n == name)
                .map(|&(_, v)| v)
                .unwrap()
        };

        let period = lookup(QBO_PERIOD_30HPA);
        assert!(
            (period - 28.0).abs() <= 1.0,
            "expected ~28 month period, got {period}"
        );
        // +25 m/s peaks qualify eastward, -25 m/s troughs qualify westward
        assert!(lookup(QBO_AMPLITUDE_30HPA_EAST) > 20.0);
        assert!(lookup(QBO_AMPLITUDE_30HPA_WEST) > 20.0);

        // Side artifacts: persisted series and plot
        assert!(io::series_path(&dir, "qborun", io::FAMILY_QBO30, "1980_2000").exists());
        assert!(dir.join("qborun_qbo.svg").exists());
    }

    #[test]
    fn persisted_series_round_trips() {
        let dir = std::env::temp_dir().join(format!("strat-qbo-rt-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let run = RunDescriptor::new("rt", "control", "1980_2000");

        qbo_metrics(&run, &oscillating_wind(60), &dir).unwrap();
        let series =
            io::load_series(&io::series_path(&dir, "rt", io::FAMILY_QBO30, "1980_2000")).unwrap();
        assert_eq!(series.len(), 60);
        // Area weighting over a symmetric band with uniform values is the value
        assert_relative_eq!(series.values[0], 0.0, epsilon = 1e-12);
        assert_relative_eq!(
            series.values[7],
            25.0 * (2.0 * std::f64::consts::PI * 7.0 / 28.0).sin(),
            epsilon = 1e-9
        );
    }
}
