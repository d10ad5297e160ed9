pub mod pattern;
pub mod posterior;

use lotobayes_data::models::{
    in_range, DrawRecord, FrequencyTable, NumberProbability, PosteriorDistribution,
};

/// Counts every number of every record, whatever its range.
pub fn count_frequencies(history: &[DrawRecord]) -> FrequencyTable {
    let mut table = FrequencyTable::new();
    for record in history {
        for &n in record.numbers() {
            table.increment(n);
        }
    }
    table
}

/// Copy of `history` without numbers outside `1..=max_number`.
pub fn discard_out_of_range(history: &[DrawRecord], max_number: u32) -> Vec<DrawRecord> {
    history
        .iter()
        .map(|record| {
            DrawRecord::new(
                record
                    .numbers()
                    .iter()
                    .copied()
                    .filter(|&n| in_range(n, max_number))
                    .collect(),
            )
        })
        .collect()
}

/// The `k` most probable numbers, most probable first.
///
/// The sort is stable: equal probabilities keep ascending number order.
pub fn top_k(posterior: &PosteriorDistribution, k: usize) -> Vec<NumberProbability> {
    let mut ranked: Vec<NumberProbability> = posterior
        .iter()
        .map(|(number, probability)| NumberProbability { number, probability })
        .collect();
    ranked.sort_by(|a, b| {
        b.probability
            .partial_cmp(&a.probability)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    ranked.truncate(k);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn records(rows: &[&[u64]]) -> Vec<DrawRecord> {
        rows.iter().map(|r| DrawRecord::new(r.to_vec())).collect()
    }

    #[test]
    fn test_count_frequencies() {
        let history = records(&[&[1, 2, 3], &[2, 3, 4], &[1, 2, 5]]);
        let table = count_frequencies(&history);
        assert_eq!(table.get(1), 2);
        assert_eq!(table.get(2), 3);
        assert_eq!(table.get(5), 1);
        assert_eq!(table.get(6), 0);
        assert_eq!(table.total(), 9);
    }

    #[test]
    fn test_count_keeps_out_of_range() {
        let history = records(&[&[2024, 1, 1, 5]]);
        let table = count_frequencies(&history);
        assert_eq!(table.get(2024), 1);
        assert_eq!(table.get(1), 2);
        assert_eq!(table.out_of_range_total(50), 1);
    }

    #[test]
    fn test_discard_out_of_range() {
        let history = records(&[&[2024, 1, 1, 5, 0, 51]]);
        let cleaned = discard_out_of_range(&history, 50);
        assert_eq!(cleaned[0].numbers(), &[1, 1, 5]);
    }

    #[test]
    fn test_top_k_ties_keep_number_order() {
        let dist = PosteriorDistribution::from_vec(vec![0.2, 0.3, 0.2, 0.1, 0.2]);
        let numbers: Vec<u32> = top_k(&dist, 4).iter().map(|p| p.number).collect();
        assert_eq!(numbers, vec![2, 1, 3, 5]);
    }

    #[test]
    fn test_top_k_bounded_by_range() {
        let dist = PosteriorDistribution::from_vec(vec![0.5, 0.5]);
        assert_eq!(top_k(&dist, 6).len(), 2);
    }

    proptest! {
        #[test]
        fn prop_total_equals_record_lengths(
            rows in prop::collection::vec(prop::collection::vec(0u64..200, 0..10), 0..30)
        ) {
            let history: Vec<DrawRecord> = rows.into_iter().map(DrawRecord::new).collect();
            let expected: u64 = history.iter().map(|r| r.len() as u64).sum();
            prop_assert_eq!(count_frequencies(&history).total(), expected);
        }

        #[test]
        fn prop_top_k_dominates_unselected(
            probs in prop::collection::vec(0.0f64..1.0, 1..80),
            k_seed in 0usize..80,
        ) {
            let n = probs.len();
            let k = k_seed % n + 1;
            let dist = PosteriorDistribution::from_vec(probs);
            let selected = top_k(&dist, k);
            prop_assert_eq!(selected.len(), k);

            let mut numbers: Vec<u32> = selected.iter().map(|p| p.number).collect();
            numbers.sort_unstable();
            numbers.dedup();
            prop_assert_eq!(numbers.len(), k);

            let floor = selected
                .iter()
                .map(|p| p.probability)
                .fold(f64::INFINITY, f64::min);
            for (number, probability) in dist.iter() {
                if !numbers.contains(&number) {
                    prop_assert!(probability <= floor);
                }
            }
        }
    }
}
