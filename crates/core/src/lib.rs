//! Stratospheric Assessment Core Library
//!
//! Computes the fixed battery of stratospheric climate diagnostics from
//! multi-year monthly model output: polar night / easterly jet strengths,
//! QBO period and amplitudes, polar and equatorial temperature indices,
//! tropical water vapour, and the weighted summary index combining them.
//!
//! The pipeline is built from small, pure reductions:
//! - labeled gridded fields ([`GriddedField`]) with area-weighted collapses
//!   and latitude/pressure/season sub-selection
//! - a zero-crossing detector and oscillation index extractor for the
//!   equatorial wind reversal
//! - per-quantity metric extractors that return named scalars, merged by the
//!   per-run driver into one [`MetricsTable`]
//!
//! Multi-run comparison entry points re-run the per-run assessment and
//! overlay the persisted intermediate series on shared plots.

// Labeled gridded data and time series
pub mod field;

// Numerical reductions: crossings, oscillation indices, spatial collapses
pub mod analysis;

// Named metric extractors and the summary aggregation
pub mod metrics;

// Persisted intermediate series
pub mod io;

// Diagnostic plot renderers
pub mod plot;

// Per-run driver and multi-run comparisons
pub mod compare;
pub mod run;

pub mod error;

// Re-export core types
pub use error::{Error, Result};
pub use field::{Axis, Dim, GriddedField, Season, TimeSeries};

// Re-export analysis primitives
pub use analysis::crossings::{find_zero_crossings, ZeroCrossings};
pub use analysis::oscillation::{qbo_index, QboIndex};
pub use analysis::reduce::{area_weights, weight_lat_ave};

// Re-export the assessment surface
pub use compare::{multi_qbo_plot, multi_t100_vs_q70_plot, multi_teq_plot, ReferenceClimatology};
pub use metrics::MetricsTable;
pub use run::{assess_run, DataSource, Quantity, RunDescriptor};
