use lotobayes_data::models::{FrequencyTable, PosteriorDistribution};

/// Uniform prior times Laplace-smoothed likelihood, normalised over `1..=max_number`.
///
/// The smoothing denominator uses every count of `frequencies`, so numbers
/// outside the range weigh on it without receiving an entry. An empty table
/// is treated as one observation and yields the uniform distribution.
pub fn posterior_distribution(
    frequencies: &FrequencyTable,
    max_number: u32,
    alpha: f64,
) -> PosteriorDistribution {
    let size = max_number as usize;
    if size == 0 {
        return PosteriorDistribution::from_vec(Vec::new());
    }

    let prior = 1.0 / size as f64;
    let total = match frequencies.total() {
        0 => 1.0,
        t => t as f64,
    };
    let denominator = total + alpha * size as f64;

    let mut posterior: Vec<f64> = (1..=max_number)
        .map(|n| {
            let likelihood = (frequencies.get(u64::from(n)) as f64 + alpha) / denominator;
            likelihood * prior
        })
        .collect();

    let sum: f64 = posterior.iter().sum();
    if sum > 0.0 {
        for p in &mut posterior {
            *p /= sum;
        }
    }

    PosteriorDistribution::from_vec(posterior)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::count_frequencies;
    use lotobayes_data::models::DrawRecord;
    use proptest::prelude::*;

    fn table(numbers: &[u64]) -> FrequencyTable {
        let mut t = FrequencyTable::new();
        for &n in numbers {
            t.increment(n);
        }
        t
    }

    #[test]
    fn test_posterior_sums_to_one() {
        let dist = posterior_distribution(&table(&[1, 2, 3, 4, 5, 1, 3, 5]), 50, 1.0);
        assert_eq!(dist.max_number(), 50);
        assert!((dist.sum() - 1.0).abs() < 1e-9, "Sum = {}", dist.sum());
    }

    #[test]
    fn test_posterior_uniform_with_no_draws() {
        let dist = posterior_distribution(&FrequencyTable::new(), 69, 1.0);
        let expected = 1.0 / 69.0;
        for (_, p) in dist.iter() {
            assert!((p - expected).abs() < 1e-12);
        }
    }

    #[test]
    fn test_posterior_favours_frequent_numbers() {
        let history: Vec<DrawRecord> = vec![
            DrawRecord::new(vec![1, 2, 3]),
            DrawRecord::new(vec![2, 3, 4]),
            DrawRecord::new(vec![1, 2, 5]),
        ];
        let dist = posterior_distribution(&count_frequencies(&history), 5, 1.0);
        let p = |n| dist.probability(n).unwrap();
        assert!(p(1) > p(5));
        assert!(p(2) > p(5));
        assert!(p(2) > p(1));
        // (count + 1) / (9 + 5), renormalised over the 14 in-range units
        assert!((p(2) - 4.0 / 14.0).abs() < 1e-12);
        assert!((p(5) - 2.0 / 14.0).abs() < 1e-12);
    }

    #[test]
    fn test_out_of_range_counts_have_no_entry() {
        let dist = posterior_distribution(&table(&[2024, 1, 1, 5]), 5, 1.0);
        assert_eq!(dist.max_number(), 5);
        assert_eq!(dist.probability(2024), None);
        assert!((dist.sum() - 1.0).abs() < 1e-9);
        // normalisation cancels the inflated denominator
        assert!((dist.probability(1).unwrap() - 3.0 / 8.0).abs() < 1e-12);
    }

    #[test]
    fn test_smaller_alpha_sharpens() {
        let t = table(&[1, 1, 1, 2]);
        let smooth = posterior_distribution(&t, 10, 1.0);
        let sharp = posterior_distribution(&t, 10, 0.1);
        assert!(sharp.probability(1).unwrap() > smooth.probability(1).unwrap());
    }

    proptest! {
        #[test]
        fn prop_posterior_is_a_distribution(
            numbers in prop::collection::vec(0u64..150, 0..200),
            max_number in 1u32..100,
        ) {
            let dist = posterior_distribution(&table(&numbers), max_number, 1.0);
            prop_assert_eq!(dist.max_number(), max_number);
            prop_assert!(dist.as_slice().iter().all(|&p| p >= 0.0));
            prop_assert!((dist.sum() - 1.0).abs() < 1e-9);
        }
    }
}
