//! Zero-crossing detection
//!
//! Finds the sample positions where a 1-D series changes sign. A sample
//! landing exactly on zero between two differently-signed neighbours is
//! folded into a single crossing at the zero sample rather than being
//! counted as two separate events.

/// Ordered crossing positions for one series
///
/// Indices refer to the sample immediately preceding the sign change:
/// `last_pos` precedes non-negative-to-negative transitions, `last_neg`
/// precedes non-positive-to-positive transitions. Both lists are freshly
/// allocated per call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZeroCrossings {
    /// Indices of the last positive value before the series goes negative
    pub last_pos: Vec<usize>,
    /// Indices of the last negative value before the series goes positive
    pub last_neg: Vec<usize>,
}

/// Find zero crossings in a 1-D series
///
/// Works on the sign sequence (-1, 0, +1) and its first differences. A
/// genuine sign flip shows up as a difference of magnitude 2; a zero sample
/// between opposite-signed neighbours produces two adjacent differences of
/// the same magnitude-1 value, which the merge loop folds into one
/// magnitude-2 difference at the second position. The merge must be kept
/// literal: reinterpreting it changes period and amplitude outputs on real
/// data.
pub fn find_zero_crossings(series: &[f64]) -> ZeroCrossings {
    let signs: Vec<i8> = series
        .iter()
        .map(|&v| {
            if v > 0.0 {
                1
            } else if v < 0.0 {
                -1
            } else {
                0
            }
        })
        .collect();
    let mut diff: Vec<i8> = signs.windows(2).map(|w| w[1] - w[0]).collect();

    // Fold a zero sample into the crossing: a nonzero difference equal to
    // the one that follows is added into its successor and cleared, so the
    // pair counts once, at the zero sample's position.
    for i in 0..diff.len().saturating_sub(1) {
        if diff[i] != 0 && diff[i] == diff[i + 1] {
            diff[i + 1] += diff[i];
            diff[i] = 0;
        }
    }

    let mut last_pos = Vec::new();
    let mut last_neg = Vec::new();
    for (i, &d) in diff.iter().enumerate() {
        match d {
            2 => last_neg.push(i),
            -2 => last_pos.push(i),
            _ => {}
        }
    }
    ZeroCrossings { last_pos, last_neg }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_downward_crossing() {
        let c = find_zero_crossings(&[3.0, 1.0, -2.0, -4.0]);
        assert_eq!(c.last_pos, vec![1]);
        assert!(c.last_neg.is_empty());
    }

    #[test]
    fn single_upward_crossing() {
        let c = find_zero_crossings(&[-3.0, -1.0, 2.0, 4.0]);
        assert_eq!(c.last_neg, vec![1]);
        assert!(c.last_pos.is_empty());
    }

    #[test]
    fn exact_zero_sample_counts_once() {
        // [-1, 0, 1]: diffs [1, 1] merge into a single +2 at the zero sample
        let c = find_zero_crossings(&[-1.0, 0.0, 1.0]);
        assert_eq!(c.last_neg, vec![1]);
        assert!(c.last_pos.is_empty());

        let c = find_zero_crossings(&[1.0, 0.0, -1.0]);
        assert_eq!(c.last_pos, vec![1]);
        assert!(c.last_neg.is_empty());
    }

    #[test]
    fn alternating_series_reference_indices() {
        // Reference table for the canonical alternating series
        let c = find_zero_crossings(&[5.0, -5.0, 5.0, -5.0, 5.0]);
        assert_eq!(c.last_pos, vec![0, 2]);
        assert_eq!(c.last_neg, vec![1, 3]);
    }

    #[test]
    fn no_crossing_in_one_signed_series() {
        let c = find_zero_crossings(&[1.0, 2.0, 3.0]);
        assert!(c.last_pos.is_empty());
        assert!(c.last_neg.is_empty());
    }

    #[test]
    fn zero_at_boundary_uses_interior_neighbour() {
        // Leading zero: its sign 0 only differs from the next sample by 1,
        // so no crossing is recorded until a genuine flip happens.
        let c = find_zero_crossings(&[0.0, 1.0, -1.0]);
        assert_eq!(c.last_pos, vec![1]);
        assert!(c.last_neg.is_empty());

        // Trailing zero after a positive run merges into a crossing only if
        // a negative sample follows, which it cannot at the boundary.
        let c = find_zero_crossings(&[-1.0, 1.0, 0.0]);
        assert_eq!(c.last_neg, vec![0]);
        assert!(c.last_pos.is_empty());
    }
}
