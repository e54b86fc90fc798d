//! The weighted summary index
//!
//! A deterministic weighted combination of the per-group metric sums into
//! one normalized scalar. Every constant is a fixed calibration value and
//! must be reproduced exactly; none are derived at runtime.

use crate::error::Result;
use crate::metrics::{
    MetricsTable, EASTERLY_JET_NH_JUL, EASTERLY_JET_SH_JAN, POLAR_NIGHT_JET_NH_JAN,
    POLAR_NIGHT_JET_SH_JUL, Q70_TROPICS_MEAN, QBO_AMPLITUDE_30HPA_EAST,
    QBO_AMPLITUDE_30HPA_WEST, QBO_PERIOD_30HPA, T50_NH_DJF, T50_NH_MAM, T50_SH_JJA, T50_SH_SON,
    TEQ100_CYCLE, TEQ100_MEAN,
};

/// Per-group weights: jets, polar T, QBO, equatorial T, water vapour
pub const GROUP_WEIGHTS: [f64; 5] = [1.0, 2.4, 3.1, 8.6, 18.3];

/// Per-group normalizing divisors (metric count per group)
pub const GROUP_DIVISORS: [f64; 5] = [4.0, 4.0, 3.0, 2.0, 1.0];

/// Overall normalizing divisor
pub const SUMMARY_DIVISOR: f64 = 33.4;

/// Compute the summary index from a fully populated table
///
/// Reads the metric groups by name; every extractor must have run first.
///
/// # Errors
///
/// [`crate::Error::MissingMetric`] if any required metric is absent.
pub fn summary_metric(table: &MetricsTable) -> Result<f64> {
    let jets = table.require(POLAR_NIGHT_JET_NH_JAN)?
        + table.require(POLAR_NIGHT_JET_SH_JUL)?
        + table.require(EASTERLY_JET_SH_JAN)?
        + table.require(EASTERLY_JET_NH_JUL)?;
    let t50 = table.require(T50_NH_DJF)?
        + table.require(T50_NH_MAM)?
        + table.require(T50_SH_JJA)?
        + table.require(T50_SH_SON)?;
    let qbo = table.require(QBO_PERIOD_30HPA)?
        + table.require(QBO_AMPLITUDE_30HPA_WEST)?
        + table.require(QBO_AMPLITUDE_30HPA_EAST)?;
    let teq = table.require(TEQ100_MEAN)? + table.require(TEQ100_CYCLE)?;
    let wv = table.require(Q70_TROPICS_MEAN)?;

    let groups = [jets, t50, qbo, teq, wv];
    let total: f64 = groups
        .iter()
        .zip(GROUP_WEIGHTS.iter())
        .zip(GROUP_DIVISORS.iter())
        .map(|((&g, &w), &d)| w * g / d)
        .sum();
    Ok(total / SUMMARY_DIVISOR)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::metrics::{T100_TROPICS_CYCLE, T100_TROPICS_MEAN};

    const BASE_METRICS: [&str; 16] = [
        POLAR_NIGHT_JET_NH_JAN,
        POLAR_NIGHT_JET_SH_JUL,
        EASTERLY_JET_SH_JAN,
        EASTERLY_JET_NH_JUL,
        T50_NH_DJF,
        T50_NH_MAM,
        T50_SH_JJA,
        T50_SH_SON,
        QBO_PERIOD_30HPA,
        QBO_AMPLITUDE_30HPA_WEST,
        QBO_AMPLITUDE_30HPA_EAST,
        TEQ100_MEAN,
        TEQ100_CYCLE,
        T100_TROPICS_MEAN,
        T100_TROPICS_CYCLE,
        Q70_TROPICS_MEAN,
    ];

    fn table_with(value: f64) -> MetricsTable {
        let mut table = MetricsTable::new();
        for name in BASE_METRICS {
            table.insert(name, value).unwrap();
        }
        table
    }

    #[test]
    fn all_zero_metrics_give_zero_summary() {
        assert_relative_eq!(summary_metric(&table_with(0.0)).unwrap(), 0.0);
    }

    #[test]
    fn summary_is_linear_in_its_inputs() {
        let one = summary_metric(&table_with(1.0)).unwrap();
        let three = summary_metric(&table_with(3.0)).unwrap();
        assert_relative_eq!(three, 3.0 * one, epsilon = 1e-12);
        assert!(one > 0.0);
    }

    #[test]
    fn unit_metrics_match_the_hand_computed_value() {
        // Each group sums to its metric count, so every group contributes
        // exactly its weight: (1 + 2.4 + 3.1 + 8.6 + 18.3) / 33.4 = 1.0
        assert_relative_eq!(summary_metric(&table_with(1.0)).unwrap(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn missing_metric_is_reported() {
        let mut table = table_with(1.0);
        table = {
            let mut t = MetricsTable::new();
            for (name, value) in table.iter() {
                if name != QBO_PERIOD_30HPA {
                    t.insert(name, value).unwrap();
                }
            }
            t
        };
        assert!(matches!(
            summary_metric(&table),
            Err(crate::Error::MissingMetric { .. })
        ));
    }
}
