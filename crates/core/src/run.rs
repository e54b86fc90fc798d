//! Per-run assessment driver
//!
//! Loads the three physical fields through the data-access collaborator,
//! runs every metric extractor, merges their named results into one table
//! and finalizes it with the summary index. Extractors are pure; the only
//! ordering constraint is that the summary runs last.

use std::path::Path;

use tracing::info;

use crate::error::Result;
use crate::field::{Dim, GriddedField};
use crate::metrics::summary::summary_metric;
use crate::metrics::{humidity, pnj, qbo, teq, tpole, MetricsTable, SUMMARY};

/// Physical quantities the driver loads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quantity {
    EastwardWind,
    AirTemperature,
    SpecificHumidity,
}

impl Quantity {
    /// CF-style standard name used by the loader
    pub fn standard_name(self) -> &'static str {
        match self {
            Quantity::EastwardWind => "eastward_wind",
            Quantity::AirTemperature => "air_temperature",
            Quantity::SpecificHumidity => "specific_humidity",
        }
    }
}

/// External identity of one model run
///
/// Threaded through the pipeline purely for file naming and labeling; it
/// plays no computational role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunDescriptor {
    /// Run id, the output-file prefix
    pub runid: String,
    /// Human-readable experiment title for plot legends
    pub title: String,
    /// Period label (the time-window bounds) used in filenames
    pub period: String,
}

impl RunDescriptor {
    pub fn new(
        runid: impl Into<String>,
        title: impl Into<String>,
        period: impl Into<String>,
    ) -> Self {
        Self {
            runid: runid.into(),
            title: title.into(),
            period: period.into(),
        }
    }
}

/// The input collaborator: gridded model output with labeled coordinates
///
/// Implementations return one monthly-mean field per quantity with
/// correctly labeled axes (time leading) and units, restricted to the
/// run's time window, with calendar month labels attached.
pub trait DataSource {
    fn load(&self, run: &RunDescriptor, quantity: Quantity) -> Result<GriddedField>;
}

/// Run the full assessment for one model run
///
/// Every extractor contributes its named scalars; the summary aggregator
/// appends the final `"Summary"` entry. All values are validated finite on
/// insertion. Side artifacts (persisted series, plots) land in `out_dir`
/// under run-id-qualified names, so independent runs never collide.
pub fn assess_run<S: DataSource>(
    source: &S,
    run: &RunDescriptor,
    out_dir: &Path,
) -> Result<MetricsTable> {
    info!(runid = %run.runid, period = %run.period, "starting stratospheric assessment");

    let u = zonal_mean(source.load(run, Quantity::EastwardWind)?)?;
    let t = zonal_mean(source.load(run, Quantity::AirTemperature)?)?;
    let q = zonal_mean(source.load(run, Quantity::SpecificHumidity)?)?;

    let mut table = MetricsTable::new();
    table.insert_all(pnj::pnj_metrics(run, &u, out_dir)?)?;
    table.insert_all(qbo::qbo_metrics(run, &u, out_dir)?)?;
    table.insert_all(tpole::tpole_metrics(run, &t, out_dir)?)?;
    table.insert_all(teq::teq_metrics(run, &t, out_dir)?)?;
    table.insert_all(teq::tropical_t_metrics(run, &t, out_dir)?)?;
    table.insert_all(humidity::q_metrics(run, &q, out_dir)?)?;

    let summary = summary_metric(&table)?;
    table.insert(SUMMARY, summary)?;

    info!(runid = %run.runid, metrics = table.len(), summary, "assessment complete");
    Ok(table)
}

/// Collapse any residual longitude axis by its mean
///
/// Input is nominally a zonal mean already, but some sources keep a
/// degenerate longitude coordinate; collapsing makes the field genuinely
/// zonal either way.
fn zonal_mean(field: GriddedField) -> Result<GriddedField> {
    if field.axis_index(Dim::Longitude).is_some() {
        field.mean_over(Dim::Longitude)
    } else {
        Ok(field)
    }
}
