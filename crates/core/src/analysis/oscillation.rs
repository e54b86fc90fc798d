//! Oscillation period and amplitude extraction
//!
//! Consumes the crossing indices of the equatorial zonal wind series and
//! derives the QBO period together with its eastward and westward
//! amplitudes. The thresholds are empirically tuned physical constants and
//! deliberately asymmetric.

use crate::analysis::crossings::find_zero_crossings;
use crate::error::{Error, Result};

/// Half-cycle maxima must exceed this (m/s, strict) to count eastward
pub const EASTWARD_AMPLITUDE_THRESHOLD: f64 = 10.0;

/// Half-cycle minima must fall below this (m/s, strict) to count westward
pub const WESTWARD_AMPLITUDE_THRESHOLD: f64 = -20.0;

/// QBO indices derived from one wind series
///
/// The period is in months because the input contract fixes monthly,
/// regularly spaced sampling; crossing-index spacings are then months by
/// construction. Both amplitudes are positive magnitudes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QboIndex {
    /// Dominant oscillation period in months
    pub period_months: f64,
    /// Mean magnitude of qualifying westward (negative) extrema
    pub amplitude_westward: f64,
    /// Mean magnitude of qualifying eastward (positive) extrema
    pub amplitude_eastward: f64,
}

/// Derive QBO period and amplitudes from a wind series
///
/// The record may open on either an upward or a downward half-cycle; the
/// first-crossing comparison decides which list leads when pairing
/// half-cycle windows. Period is the larger of the mean downward-crossing
/// spacing and the mean upward-crossing spacing, each needing at least two
/// crossings of its kind to be defined (zero otherwise). Picking the larger
/// spacing is a deliberate bias towards the longer-appearing half-cycle
/// structure.
///
/// # Errors
///
/// [`Error::NoZeroCrossings`] if the series never crosses zero in one or
/// both directions.
pub fn qbo_index(values: &[f64]) -> Result<QboIndex> {
    let crossings = find_zero_crossings(values);
    let down = &crossings.last_pos;
    let up = &crossings.last_neg;
    if down.is_empty() || up.is_empty() {
        return Err(Error::NoZeroCrossings);
    }

    // Did the record start on an upwards or downwards half-cycle?
    let (kup, kdown) = if down[0] < up[0] { (0, 1) } else { (1, 0) };
    let n_minima = up.len() - kup;
    let n_maxima = down.len() - kdown;

    let mut minima = Vec::with_capacity(n_minima);
    for i in 0..n_minima {
        let window = &values[down[i]..up[i + kup]];
        minima.push(window.iter().copied().fold(f64::INFINITY, f64::min));
    }
    let mut maxima = Vec::with_capacity(n_maxima);
    for i in 0..n_maxima {
        let window = &values[up[i]..down[i + kdown]];
        maxima.push(window.iter().copied().fold(f64::NEG_INFINITY, f64::max));
    }

    let amplitude_eastward = threshold_mean(
        maxima.iter().copied().filter(|&v| v > EASTWARD_AMPLITUDE_THRESHOLD),
    );
    let amplitude_westward = -threshold_mean(
        minima.iter().copied().filter(|&v| v < WESTWARD_AMPLITUDE_THRESHOLD),
    );

    let period_down = mean_spacing(down);
    let period_up = mean_spacing(up);
    Ok(QboIndex {
        period_months: period_down.max(period_up),
        amplitude_westward,
        amplitude_eastward,
    })
}

/// Mean of the qualifying extrema, zero when none qualify
fn threshold_mean(values: impl Iterator<Item = f64>) -> f64 {
    let mut total = 0.0;
    let mut count = 0usize;
    for v in values {
        total += v;
        count += 1;
    }
    if count == 0 {
        0.0
    } else {
        total / count as f64
    }
}

/// Mean spacing between consecutive crossings, zero below two crossings
fn mean_spacing(indices: &[usize]) -> f64 {
    if indices.len() < 2 {
        return 0.0;
    }
    let span = indices[indices.len() - 1] - indices[0];
    span as f64 / (indices.len() - 1) as f64
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::field::TimeSeries;

    // +/- blocks wide enough that each half-cycle window sees its extremum
    fn two_cycle_series(peak: f64, trough: f64) -> Vec<f64> {
        vec![
            5.0, peak, 5.0, trough / 2.0, trough, trough / 2.0, 5.0, peak, 5.0, trough / 2.0,
            trough, trough / 2.0, 5.0,
        ]
    }

    #[test]
    fn alternating_series_period() {
        // last_pos = [0, 2], last_neg = [1, 3]: both spacings are 2 months
        let idx = qbo_index(&[5.0, -5.0, 5.0, -5.0, 5.0]).unwrap();
        assert_relative_eq!(idx.period_months, 2.0);
        // 5 m/s peaks are below both thresholds
        assert_relative_eq!(idx.amplitude_eastward, 0.0);
        assert_relative_eq!(idx.amplitude_westward, 0.0);
    }

    #[test]
    fn two_cycle_series_amplitudes_and_period() {
        let idx = qbo_index(&two_cycle_series(30.0, -40.0)).unwrap();
        assert_relative_eq!(idx.amplitude_eastward, 30.0);
        assert_relative_eq!(idx.amplitude_westward, 40.0);
        assert_relative_eq!(idx.period_months, 6.0);
    }

    #[test]
    fn eastward_threshold_is_strict() {
        // Half-cycle maximum of exactly 10.0 must not count
        let idx = qbo_index(&two_cycle_series(10.0, -40.0)).unwrap();
        assert_relative_eq!(idx.amplitude_eastward, 0.0);

        let idx = qbo_index(&two_cycle_series(10.5, -40.0)).unwrap();
        assert_relative_eq!(idx.amplitude_eastward, 10.5);
    }

    #[test]
    fn westward_threshold_is_strict() {
        // Half-cycle minimum of exactly -20.0 must not count
        let idx = qbo_index(&two_cycle_series(30.0, -20.0)).unwrap();
        assert_relative_eq!(idx.amplitude_westward, 0.0);

        let idx = qbo_index(&two_cycle_series(30.0, -20.5)).unwrap();
        assert_relative_eq!(idx.amplitude_westward, 20.5);
    }

    #[test]
    fn missing_crossings_is_a_domain_error() {
        assert!(matches!(
            qbo_index(&[1.0, 2.0, 3.0]),
            Err(crate::Error::NoZeroCrossings)
        ));
        // One kind of crossing present, the other absent
        assert!(matches!(
            qbo_index(&[-1.0, 1.0, 2.0]),
            Err(crate::Error::NoZeroCrossings)
        ));
    }

    #[test]
    fn record_opening_downward() {
        // Starts positive, first crossing is downward
        let values = [8.0, -30.0, 8.0, -30.0, 8.0];
        let idx = qbo_index(&values).unwrap();
        // down = [0, 2], up = [1, 3]; minima windows [0..1] and [2..3]
        // catch only the positive samples, so nothing qualifies westward
        assert_relative_eq!(idx.period_months, 2.0);
        assert_relative_eq!(idx.amplitude_eastward, 0.0);
    }

    #[test]
    fn epoch_shift_leaves_the_index_unchanged() {
        // The index depends only on sample order, never on the epoch
        let values = two_cycle_series(30.0, -40.0);
        let series = TimeSeries {
            name: "u".into(),
            units: "m s-1".into(),
            times: (0..values.len()).map(|i| i as f64).collect(),
            time_units: "months since 1980-01".into(),
            month_number: None,
            values,
        };
        let moved = series.clone().shifted(24.0);

        assert_ne!(series.times, moved.times);
        assert_eq!(
            qbo_index(&series.values).unwrap(),
            qbo_index(&moved.values).unwrap()
        );
    }

    #[test]
    fn reordering_changes_the_result() {
        // Same multiset of samples, different order: the alternating series
        // has a well-defined period, the sorted one has no upward crossing.
        let forward = qbo_index(&[5.0, -5.0, 5.0, -5.0, 5.0]).unwrap();
        assert_relative_eq!(forward.period_months, 2.0);
        assert!(matches!(
            qbo_index(&[5.0, 5.0, 5.0, -5.0, -5.0]),
            Err(crate::Error::NoZeroCrossings)
        ));
    }
}
