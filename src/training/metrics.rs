//! Held-out evaluation: precision, recall and false-positive rate.

use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Metrics {
    pub true_positives: usize,
    pub false_positives: usize,
    pub false_negatives: usize,
    /// Rows whose true label is 0
    pub negatives: usize,
    pub precision: f64,
    pub recall: f64,
    /// false positives / negatives
    pub false_positive_rate: f64,
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

/// Compare binary predictions with ground truth. Empty denominators yield 0.0.
pub fn evaluate(truth: &[usize], predicted: &[usize]) -> Metrics {
    let mut m = Metrics::default();
    for (&t, &p) in truth.iter().zip(predicted) {
        match (t == 1, p == 1) {
            (true, true) => m.true_positives += 1,
            (false, true) => m.false_positives += 1,
            (true, false) => m.false_negatives += 1,
            (false, false) => {}
        }
        if t != 1 {
            m.negatives += 1;
        }
    }
    m.precision = ratio(m.true_positives, m.true_positives + m.false_positives);
    m.recall = ratio(m.true_positives, m.true_positives + m.false_negatives);
    m.false_positive_rate = ratio(m.false_positives, m.negatives);
    m
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_and_rates() {
        let truth = [1, 1, 0, 0, 0, 1];
        let pred = [1, 0, 1, 0, 0, 1];
        let m = evaluate(&truth, &pred);
        assert_eq!(m.true_positives, 2);
        assert_eq!(m.false_positives, 1);
        assert_eq!(m.false_negatives, 1);
        assert_eq!(m.negatives, 3);
        assert!((m.precision - 2.0 / 3.0).abs() < 1e-12);
        assert!((m.recall - 2.0 / 3.0).abs() < 1e-12);
        assert!((m.false_positive_rate - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn no_positive_predictions() {
        let m = evaluate(&[0, 1], &[0, 0]);
        assert_eq!(m.precision, 0.0);
        assert_eq!(m.recall, 0.0);
        assert_eq!(m.false_positive_rate, 0.0);
    }
}
