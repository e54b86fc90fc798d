//! Multi-run comparison plots
//!
//! Each entry point re-runs the per-run assessment for every run (runs are
//! independent, so they are assessed in parallel), then overlays the
//! persisted intermediate series on one plot. The first run is the control;
//! the rest are experiments. A missing persisted series is not fatal: the
//! run is skipped with a log message, and a missing control skips the whole
//! plot.

use std::path::{Path, PathBuf};

use rayon::prelude::*;
use rustc_hash::FxHashMap;
use tracing::warn;

use crate::error::{Error, Result};
use crate::field::TimeSeries;
use crate::io;
use crate::metrics::humidity::q_mean;
use crate::metrics::teq::mean_and_strength;
use crate::plot;
use crate::run::{assess_run, DataSource, RunDescriptor};

/// Reference tropical climatology the scatter comparison is drawn against
///
/// The original assessment subtracts reanalysis means loaded from
/// site-local archives; those are external data, so the caller supplies
/// the two reference values instead.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferenceClimatology {
    /// Mean tropical 100 hPa temperature (K)
    pub t100_k: f64,
    /// Mean tropical 70 hPa water vapour (ppmv)
    pub q70_ppmv: f64,
}

impl ReferenceClimatology {
    /// Build a reference from raw temperature (K) and humidity (kg/kg) series
    pub fn from_series(t100: &TimeSeries, q70: &TimeSeries) -> Self {
        Self {
            t100_k: t100.mean(),
            q70_ppmv: q_mean(q70),
        }
    }
}

/// Assess every run and overlay the 30 hPa QBO series on one plot
pub fn multi_qbo_plot<S: DataSource + Sync>(
    source: &S,
    runs: &[RunDescriptor],
    out_dir: &Path,
) -> Result<()> {
    reassess_all(source, runs, out_dir)?;
    qbo_overlay_plot(runs, out_dir)
}

/// Overlay previously persisted 30 hPa QBO series
pub fn qbo_overlay_plot(runs: &[RunDescriptor], out_dir: &Path) -> Result<()> {
    let Some((cntl, expts)) = split_runs(runs) else {
        return Ok(());
    };

    let cntl_path = io::series_path(out_dir, &cntl.runid, io::FAMILY_QBO30, &cntl.period);
    let Some(cntl_series) = load_or_skip(&cntl_path, &cntl.runid)? else {
        warn!("30 hPa QBO for control absent, skipping comparison plot");
        return Ok(());
    };

    let expt_files = expt_paths(expts, out_dir, io::FAMILY_QBO30);
    let mut lines = vec![(cntl.runid.clone(), cntl_series)];
    for run in expts {
        if let Some(series) = load_or_skip(&expt_files[&run.runid], &run.runid)? {
            lines.push((run.runid.clone(), series));
        }
    }

    plot::plot_series_overlay(
        &lines,
        "QBO at 30hPa",
        "Time",
        "U (m/s)",
        &out_dir.join("qbo_30hpa.svg"),
    )
}

/// Assess every run and overlay the equatorial temperature climatologies
pub fn multi_teq_plot<S: DataSource + Sync>(
    source: &S,
    runs: &[RunDescriptor],
    out_dir: &Path,
) -> Result<()> {
    reassess_all(source, runs, out_dir)?;
    teq_overlay_plot(runs, out_dir)
}

/// Overlay previously persisted 100 hPa equatorial temperature climatologies
pub fn teq_overlay_plot(runs: &[RunDescriptor], out_dir: &Path) -> Result<()> {
    let Some((cntl, expts)) = split_runs(runs) else {
        return Ok(());
    };

    let cntl_path = io::series_path(out_dir, &cntl.runid, io::FAMILY_TEQ100, &cntl.period);
    let Some(cntl_series) = load_or_skip(&cntl_path, &cntl.runid)? else {
        warn!("100 hPa Teq for control absent, skipping comparison plot");
        return Ok(());
    };

    let expt_files = expt_paths(expts, out_dir, io::FAMILY_TEQ100);
    let mut lines = vec![(cycle_label(&cntl.runid, &cntl_series), cntl_series)];
    for run in expts {
        if let Some(series) = load_or_skip(&expt_files[&run.runid], &run.runid)? {
            lines.push((cycle_label(&run.runid, &series), series));
        }
    }

    plot::plot_series_overlay(
        &lines,
        "Equatorial 100hPa temperature, multi-annual monthly means",
        "Month",
        "T (K)",
        &out_dir.join("teq_100hpa.svg"),
    )
}

/// Assess every run and scatter mean T(100 hPa) against mean q(70 hPa)
/// biases relative to the reference climatology
pub fn multi_t100_vs_q70_plot<S: DataSource + Sync>(
    source: &S,
    runs: &[RunDescriptor],
    reference: &ReferenceClimatology,
    out_dir: &Path,
) -> Result<()> {
    reassess_all(source, runs, out_dir)?;
    t100_vs_q70_plot(runs, reference, out_dir)
}

/// Scatter previously persisted temperature/humidity means against the
/// reference climatology
pub fn t100_vs_q70_plot(
    runs: &[RunDescriptor],
    reference: &ReferenceClimatology,
    out_dir: &Path,
) -> Result<()> {
    let Some((cntl, expts)) = split_runs(runs) else {
        return Ok(());
    };

    let Some(cntl_point) = bias_point(cntl, reference, out_dir)? else {
        warn!("tropical T/q series for control absent, skipping comparison plot");
        return Ok(());
    };

    let mut points = vec![cntl_point];
    for run in expts {
        if let Some(point) = bias_point(run, reference, out_dir)? {
            points.push(point);
        }
    }

    plot::plot_scatter(
        &points,
        "Tropical 100hPa temperature vs 70hPa water vapour",
        "T(10S-10N, 100hPa) bias (K)",
        "q(10S-10N, 70hPa) bias (ppmv)",
        &out_dir.join("t100_vs_q70.svg"),
    )
}

/// Re-run the full per-run assessment for every run
///
/// Runs only couple through run-id-qualified files, so they are assessed
/// in parallel.
fn reassess_all<S: DataSource + Sync>(
    source: &S,
    runs: &[RunDescriptor],
    out_dir: &Path,
) -> Result<()> {
    runs.par_iter()
        .map(|run| assess_run(source, run, out_dir).map(|_| ()))
        .collect()
}

fn split_runs(runs: &[RunDescriptor]) -> Option<(&RunDescriptor, &[RunDescriptor])> {
    match runs.split_first() {
        Some(split) => Some(split),
        None => {
            warn!("no runs supplied, nothing to compare");
            None
        }
    }
}

fn expt_paths(
    expts: &[RunDescriptor],
    out_dir: &Path,
    family: &str,
) -> FxHashMap<String, PathBuf> {
    expts
        .iter()
        .map(|run| {
            (
                run.runid.clone(),
                io::series_path(out_dir, &run.runid, family, &run.period),
            )
        })
        .collect()
}

/// Load a persisted series, degrading a missing file into a skip
fn load_or_skip(path: &Path, runid: &str) -> Result<Option<TimeSeries>> {
    match io::load_series(path) {
        Ok(series) => Ok(Some(series)),
        Err(Error::SeriesNotFound { path }) => {
            warn!(runid, path = %path.display(), "persisted series absent, skipping run");
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

/// Legend label carrying the cycle mean and strength
fn cycle_label(runid: &str, series: &TimeSeries) -> String {
    let (mean, cycle) = mean_and_strength(series);
    format!("{runid}, mean={mean:5.2}, cycle={cycle:5.2}")
}

/// Temperature/humidity bias of one run against the reference, if both
/// persisted series exist
fn bias_point(
    run: &RunDescriptor,
    reference: &ReferenceClimatology,
    out_dir: &Path,
) -> Result<Option<(String, f64, f64)>> {
    let t_path = io::series_path(out_dir, &run.runid, io::FAMILY_T100, &run.period);
    let q_path = io::series_path(out_dir, &run.runid, io::FAMILY_Q70, &run.period);
    let (Some(t), Some(q)) = (
        load_or_skip(&t_path, &run.runid)?,
        load_or_skip(&q_path, &run.runid)?,
    ) else {
        return Ok(None);
    };
    let label = format!("{} ({})", run.title, run.runid);
    Ok(Some((
        label,
        t.mean() - reference.t100_k,
        q_mean(&q) - reference.q70_ppmv,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_out(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("strat-cmp-{tag}-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn saved(dir: &Path, runid: &str, family: &str, values: Vec<f64>) {
        let series = TimeSeries {
            name: "x".into(),
            units: "1".into(),
            times: (0..values.len()).map(|i| i as f64).collect(),
            time_units: "months since 1980-01".into(),
            month_number: None,
            values,
        };
        io::save_series(&series, &io::series_path(dir, runid, family, "1980_2000")).unwrap();
    }

    #[test]
    fn missing_control_skips_the_whole_plot() {
        let dir = temp_out("noctl");
        let runs = vec![
            RunDescriptor::new("ctl", "control", "1980_2000"),
            RunDescriptor::new("exp", "experiment", "1980_2000"),
        ];
        qbo_overlay_plot(&runs, &dir).unwrap();
        assert!(!dir.join("qbo_30hpa.svg").exists());
    }

    #[test]
    fn missing_experiment_is_skipped_not_fatal() {
        let dir = temp_out("noexp");
        let runs = vec![
            RunDescriptor::new("ctl", "control", "1980_2000"),
            RunDescriptor::new("exp", "experiment", "1980_2000"),
        ];
        saved(&dir, "ctl", io::FAMILY_QBO30, vec![5.0, -5.0, 5.0, -5.0]);

        qbo_overlay_plot(&runs, &dir).unwrap();
        assert!(dir.join("qbo_30hpa.svg").exists());
    }

    #[test]
    fn no_runs_is_a_quiet_no_op() {
        let dir = temp_out("empty");
        qbo_overlay_plot(&[], &dir).unwrap();
        teq_overlay_plot(&[], &dir).unwrap();
    }

    #[test]
    fn bias_point_needs_both_series() {
        let dir = temp_out("bias");
        let run = RunDescriptor::new("ctl", "control", "1980_2000");
        let reference = ReferenceClimatology {
            t100_k: 195.0,
            q70_ppmv: 4.5,
        };
        saved(&dir, "ctl", io::FAMILY_T100, vec![196.0, 196.0]);
        assert!(bias_point(&run, &reference, &dir).unwrap().is_none());

        saved(&dir, "ctl", io::FAMILY_Q70, vec![3.0e-6, 3.0e-6]);
        let (label, t_bias, q_bias) = bias_point(&run, &reference, &dir).unwrap().unwrap();
        assert_eq!(label, "control (ctl)");
        assert!((t_bias - 1.0).abs() < 1e-9);
        // 3e-6 kg/kg is ~4.83 ppmv, bias ~0.33
        assert!((q_bias - (3.0e-6 * 1.0e6 * 29.0 / 18.0 - 4.5)).abs() < 1e-9);
    }
}
