//! Persisted intermediate series
//!
//! One self-describing file per (run id, metric family, period), written
//! after the QBO/temperature/humidity extractions and read back by the
//! cross-run comparison routines. The filename pattern
//! `{runid}_{family}_{period}.json` is the only inter-run contract; runs
//! writing distinct run ids never collide.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Error, Result};
use crate::field::TimeSeries;

/// 30 hPa equatorial zonal wind series
pub const FAMILY_QBO30: &str = "qbo30";

/// 100 hPa equatorial (2S-2N) temperature climatology
pub const FAMILY_TEQ100: &str = "teq100";

/// 100 hPa tropical (10S-10N) temperature climatology
pub const FAMILY_T100: &str = "t100";

/// 70 hPa tropical water vapour climatology
pub const FAMILY_Q70: &str = "q70";

/// Path of one persisted series
pub fn series_path(dir: &Path, runid: &str, family: &str, period: &str) -> PathBuf {
    dir.join(format!("{runid}_{family}_{period}.json"))
}

/// Write a reduced series with its coordinate and unit metadata
pub fn save_series(series: &TimeSeries, path: &Path) -> Result<()> {
    let payload = serde_json::to_string_pretty(series)?;
    fs::write(path, payload)?;
    debug!(path = %path.display(), samples = series.len(), "series persisted");
    Ok(())
}

/// Read a persisted series back
///
/// # Errors
///
/// [`Error::SeriesNotFound`] when the file is absent; comparison routines
/// treat that as "skip this run", everything else is fatal.
pub fn load_series(path: &Path) -> Result<TimeSeries> {
    if !path.exists() {
        return Err(Error::SeriesNotFound {
            path: path.to_owned(),
        });
    }
    let payload = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&payload)?)
}
