//! Metric extractors and aggregation
//!
//! One extractor module per physical quantity. Each extractor is a pure
//! function: fields in, named scalars out, plus the persisted series and
//! diagnostic plots as external side artifacts. No extractor reads another
//! extractor's output; only the summary aggregator does, through the fully
//! populated [`MetricsTable`].

pub mod humidity;
pub mod pnj;
pub mod qbo;
pub mod summary;
pub mod table;
pub mod teq;
pub mod tpole;

pub use table::MetricsTable;

/// Named scalar produced by an extractor
pub type Metric = (&'static str, f64);

/// Fixed empirical calibration offset subtracted from stratospheric
/// temperature metrics (K). Not re-derived; reproduced as-is.
pub const TEMPERATURE_CALIBRATION_OFFSET_K: f64 = 180.0;

// The fixed, pre-known metric names. The summary aggregator reads them back
// by name, so they are the single source of truth for table keys.

pub const POLAR_NIGHT_JET_NH_JAN: &str = "Polar night jet: northern hem (January)";
pub const POLAR_NIGHT_JET_SH_JUL: &str = "Polar night jet: southern hem (July)";
pub const EASTERLY_JET_SH_JAN: &str = "Easterly jet: southern hem (January)";
pub const EASTERLY_JET_NH_JUL: &str = "Easterly jet: northern hem (July)";

pub const QBO_PERIOD_30HPA: &str = "QBO period at 30 hPa";
pub const QBO_AMPLITUDE_30HPA_WEST: &str = "QBO amplitude at 30 hPa (westward)";
pub const QBO_AMPLITUDE_30HPA_EAST: &str = "QBO amplitude at 30 hPa (eastward)";

pub const T50_NH_DJF: &str = "50 hPa temperature: 60N-90N (DJF)";
pub const T50_NH_MAM: &str = "50 hPa temperature: 60N-90N (MAM)";
pub const T50_SH_JJA: &str = "50 hPa temperature: 90S-60S (JJA)";
pub const T50_SH_SON: &str = "50 hPa temperature: 90S-60S (SON)";

pub const TEQ100_MEAN: &str = "100 hPa equatorial temp (annual mean)";
pub const TEQ100_CYCLE: &str = "100 hPa equatorial temp (annual cycle strength)";

pub const T100_TROPICS_MEAN: &str = "100 hPa 10Sto10N temp (annual mean)";
pub const T100_TROPICS_CYCLE: &str = "100 hPa 10Sto10N temp (annual cycle strength)";

pub const Q70_TROPICS_MEAN: &str = "70 hPa 10Sto10N wv (annual mean)";

pub const SUMMARY: &str = "Summary";
