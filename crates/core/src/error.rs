//! Error taxonomy for the assessment pipeline
//!
//! Everything here is fatal for the current run except [`Error::SeriesNotFound`],
//! which the multi-run comparison routines recover from by skipping the run
//! whose persisted series is missing.

use std::path::PathBuf;

use thiserror::Error;

use crate::field::Dim;

/// Errors raised by the diagnostic pipeline
#[derive(Debug, Error)]
pub enum Error {
    /// A series fed to the oscillation extractor never changes sign in one
    /// or both directions, so no period or amplitude is defined.
    #[error("series has no zero crossings of the required kind")]
    NoZeroCrossings,

    /// A spatial or temporal selection matched nothing.
    #[error("selection produced an empty domain: {what}")]
    EmptyDomain { what: String },

    /// The requested pressure level is not on the pressure axis.
    #[error("pressure level {pressure} hPa not found on the pressure axis")]
    LevelNotFound { pressure: f64 },

    /// A reduction was asked for along a dimension the field does not have.
    #[error("field '{field}' has no {dim} axis")]
    MissingDimension { field: String, dim: Dim },

    /// Month/season grouping requires calendar labels from the loader.
    #[error("field '{field}' carries no month labels")]
    MissingMonthLabels { field: String },

    /// A field was used as a time series without being collapsed to 1-D.
    #[error("field '{field}' is not a 1-D time series ({ndim} dimensions)")]
    NotSeries { field: String, ndim: usize },

    /// An extractor produced a non-finite value.
    #[error("metric '{name}' is not finite: {value}")]
    NonFiniteMetric { name: String, value: f64 },

    /// The summary aggregator read a metric no extractor has written.
    #[error("metric '{name}' has not been computed")]
    MissingMetric { name: String },

    /// A persisted intermediate series is absent. Recoverable in the
    /// comparison routines only.
    #[error("saved series not found: {path}")]
    SeriesNotFound { path: PathBuf },

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("plot rendering failed: {0}")]
    Plot(String),
}

/// Pipeline result alias
pub type Result<T> = std::result::Result<T, Error>;
