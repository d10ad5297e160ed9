use std::collections::BTreeMap;

/// Numbers drawn in one historical event, in order of appearance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawRecord {
    numbers: Vec<u64>,
}

impl DrawRecord {
    pub fn new(numbers: Vec<u64>) -> Self {
        Self { numbers }
    }

    pub fn numbers(&self) -> &[u64] {
        &self.numbers
    }

    pub fn len(&self) -> usize {
        self.numbers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.numbers.is_empty()
    }
}

/// Every record parsed for one game, oldest line first.
pub type HistoricalSet = Vec<DrawRecord>;

/// Occurrence count per number. Numbers never seen count as zero.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: BTreeMap<u64, u32>,
}

impl FrequencyTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&mut self, number: u64) {
        *self.counts.entry(number).or_insert(0) += 1;
    }

    pub fn get(&self, number: u64) -> u32 {
        self.counts.get(&number).copied().unwrap_or(0)
    }

    /// Sum of all counts, out-of-range numbers included.
    pub fn total(&self) -> u64 {
        self.counts.values().map(|&c| c as u64).sum()
    }

    /// Sum of counts for numbers outside `1..=max_number`.
    pub fn out_of_range_total(&self, max_number: u32) -> u64 {
        self.counts
            .iter()
            .filter(|(&n, _)| !in_range(n, max_number))
            .map(|(_, &c)| c as u64)
            .sum()
    }

    /// Number of distinct numbers seen.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u64, u32)> + '_ {
        self.counts.iter().map(|(&n, &c)| (n, c))
    }
}

/// Probability per number `1..=N`, stored at index `number - 1`.
#[derive(Debug, Clone, PartialEq)]
pub struct PosteriorDistribution {
    probabilities: Vec<f64>,
}

impl PosteriorDistribution {
    pub fn from_vec(probabilities: Vec<f64>) -> Self {
        Self { probabilities }
    }

    pub fn max_number(&self) -> u32 {
        self.probabilities.len() as u32
    }

    pub fn probability(&self, number: u32) -> Option<f64> {
        if number == 0 {
            return None;
        }
        self.probabilities.get((number - 1) as usize).copied()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.probabilities
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, f64)> + '_ {
        self.probabilities
            .iter()
            .enumerate()
            .map(|(i, &p)| (i as u32 + 1, p))
    }

    pub fn sum(&self) -> f64 {
        self.probabilities.iter().sum()
    }
}

/// How many (draw, number) pairs stopped at each iteration count `0..=max_iter`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternHistogram {
    buckets: Vec<u32>,
}

impl PatternHistogram {
    pub fn new(max_iter: u32) -> Self {
        Self {
            buckets: vec![0; max_iter as usize + 1],
        }
    }

    pub fn max_iter(&self) -> u32 {
        (self.buckets.len() - 1) as u32
    }

    pub fn record(&mut self, iterations: u32) {
        let idx = (iterations as usize).min(self.buckets.len() - 1);
        self.buckets[idx] += 1;
    }

    pub fn get(&self, iterations: u32) -> u32 {
        self.buckets.get(iterations as usize).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.buckets.iter().map(|&c| c as u64).sum()
    }

    /// Non-empty buckets in ascending iteration order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.buckets
            .iter()
            .enumerate()
            .filter(|(_, &c)| c > 0)
            .map(|(i, &c)| (i as u32, c))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NumberProbability {
    pub number: u32,
    pub probability: f64,
}

pub fn in_range(number: u64, max_number: u32) -> bool {
    number >= 1 && number <= u64::from(max_number)
}
