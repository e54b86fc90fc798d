//! The per-run metrics table
//!
//! An ordered mapping from the fixed metric names to finite floats, built
//! incrementally by the driver from each extractor's named results and
//! finalized by the summary aggregator. Insertion rejects non-finite values
//! so nothing downstream ever sees a NaN.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::{Error, Result};

/// Mapping from metric name to validated finite value
#[derive(Debug, Clone, Default, Serialize)]
pub struct MetricsTable(BTreeMap<String, f64>);

impl MetricsTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert one named metric
    ///
    /// # Errors
    ///
    /// [`Error::NonFiniteMetric`] if the value is NaN or infinite.
    pub fn insert(&mut self, name: &str, value: f64) -> Result<()> {
        if !value.is_finite() {
            return Err(Error::NonFiniteMetric {
                name: name.to_owned(),
                value,
            });
        }
        self.0.insert(name.to_owned(), value);
        Ok(())
    }

    /// Insert every named metric of one extractor's result
    pub fn insert_all(&mut self, metrics: Vec<(&'static str, f64)>) -> Result<()> {
        for (name, value) in metrics {
            self.insert(name, value)?;
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.0.get(name).copied()
    }

    /// Read a metric that must already have been computed
    ///
    /// # Errors
    ///
    /// [`Error::MissingMetric`] if no extractor has written the name yet.
    pub fn require(&self, name: &str) -> Result<f64> {
        self.get(name).ok_or_else(|| Error::MissingMetric {
            name: name.to_owned(),
        })
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate metrics in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, &v)| (k.as_str(), v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::QBO_PERIOD_30HPA;

    #[test]
    fn rejects_non_finite_values() {
        let mut table = MetricsTable::new();
        assert!(matches!(
            table.insert(QBO_PERIOD_30HPA, f64::NAN),
            Err(Error::NonFiniteMetric { .. })
        ));
        assert!(matches!(
            table.insert(QBO_PERIOD_30HPA, f64::INFINITY),
            Err(Error::NonFiniteMetric { .. })
        ));
        assert!(table.is_empty());
    }

    #[test]
    fn require_reports_missing_metrics() {
        let mut table = MetricsTable::new();
        assert!(matches!(
            table.require(QBO_PERIOD_30HPA),
            Err(Error::MissingMetric { .. })
        ));
        table.insert(QBO_PERIOD_30HPA, 28.0).unwrap();
        assert_eq!(table.require(QBO_PERIOD_30HPA).unwrap(), 28.0);
    }

    #[test]
    fn iteration_is_name_ordered() {
        let mut table = MetricsTable::new();
        table.insert("b", 2.0).unwrap();
        table.insert("a", 1.0).unwrap();
        let names: Vec<&str> = table.iter().map(|(k, _)| k).collect();
        assert_eq!(names, vec!["a", "b"]);
    }
}
