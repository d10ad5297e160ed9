use num_complex::Complex;

use lotobayes_data::models::{DrawRecord, PatternHistogram};

/// Iterations of `z ← z² + c` from zero, with `c = e^{i·value}`, until
/// `|z| ≥ 2` or `max_iter` is reached.
pub fn escape_iterations(value: u64, max_iter: u32) -> u32 {
    let c = Complex::from_polar(1.0, value as f64);
    let mut z = Complex::new(0.0, 0.0);
    let mut i = 0;
    while z.norm() < 2.0 && i < max_iter {
        z = z * z + c;
        i += 1;
    }
    i
}

/// Histogram of escape iterations over every (draw, number) pair.
/// Informational only: nothing downstream ranks on it.
pub fn pattern_histogram(history: &[DrawRecord], max_iter: u32) -> PatternHistogram {
    let mut histogram = PatternHistogram::new(max_iter);
    for record in history {
        for &n in record.numbers() {
            histogram.record(escape_iterations(n, max_iter));
        }
    }
    histogram
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_escapes_early() {
        // c = 1: z goes 0 → 1 → 2
        assert_eq!(escape_iterations(0, 20), 2);
        assert_eq!(escape_iterations(0, 20), escape_iterations(0, 20));
    }

    #[test]
    fn test_cap_bounds_iterations() {
        for v in 0..200 {
            assert!(escape_iterations(v, 20) <= 20);
        }
        assert_eq!(escape_iterations(7, 0), 0);
    }

    #[test]
    fn test_histogram_counts_every_pair() {
        let history: Vec<DrawRecord> = vec![
            DrawRecord::new(vec![0]),
            DrawRecord::new(vec![1, 2, 3, 4]),
            DrawRecord::new(vec![]),
        ];
        let hist = pattern_histogram(&history, 20);
        assert_eq!(hist.total(), 5);
        assert_eq!(hist.max_iter(), 20);
        assert!(hist.get(2) >= 1);
    }

    #[test]
    fn test_histogram_counts_wide_values() {
        let history = vec![DrawRecord::new(vec![20_240_101_123_456, 5, 12])];
        let hist = pattern_histogram(&history, 20);
        assert_eq!(hist.total(), 3);
    }

    #[test]
    fn test_histogram_deterministic() {
        let history: Vec<DrawRecord> = vec![
            DrawRecord::new(vec![5, 12, 33]),
            DrawRecord::new(vec![2024, 1, 1]),
        ];
        assert_eq!(pattern_histogram(&history, 20), pattern_histogram(&history, 20));
    }
}
