use std::collections::BTreeMap;

/// Corpus-wide codon counts. Counts only ever grow, and clamp at `u64::MAX`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodonTally {
    counts: BTreeMap<String, u64>,
}

impl CodonTally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, codon: &str, count: u64) {
        let slot = self.counts.entry(codon.to_string()).or_default();
        *slot = slot.saturating_add(count);
    }

    pub fn merge(&mut self, other: &CodonTally) {
        for (codon, &count) in other.counts.iter() {
            self.add(codon, count);
        }
    }

    pub fn get(&self, codon: &str) -> u64 {
        self.counts.get(codon).copied().unwrap_or(0)
    }

    /// Sum of all counts. Widened so that no realistic tally overflows it.
    pub fn total(&self) -> u128 {
        self.counts.values().map(|&n| u128::from(n)).sum()
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> + '_ {
        self.counts.iter().map(|(c, &n)| (c.as_str(), n))
    }

    /// Relative frequency of every codon seen at least once. An all-zero
    /// tally yields an empty table.
    pub fn frequencies(&self) -> BTreeMap<String, f64> {
        let total = self.total();
        if total == 0 {
            return BTreeMap::new();
        }
        self.counts
            .iter()
            .filter(|&(_, &count)| 0 < count)
            .map(|(codon, &count)| (codon.clone(), count as f64 / total as f64))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frequencies_sum_to_one() {
        let mut tally = CodonTally::new();
        for (i, codon) in ["CAT", "GCC", "GTC", "TTC", "AAA", "AGA"].iter().enumerate() {
            tally.add(codon, (i as u64 + 1) * 7);
        }
        let freqs = tally.frequencies();
        assert_eq!(freqs.len(), 6);
        assert!(freqs.values().all(|&f| (0.0..=1.0).contains(&f)));
        let sum: f64 = freqs.values().sum();
        assert!((sum - 1.0).abs() < 1e-9);
    }

    #[test]
    fn zero_counts_are_absent() {
        let mut tally = CodonTally::new();
        tally.add("GGC", 0);
        tally.add("CAT", 4);
        let freqs = tally.frequencies();
        assert_eq!(freqs.len(), 1);
        assert_eq!(freqs["CAT"], 1.0);
    }

    #[test]
    fn degenerate_tally_is_empty() {
        let mut tally = CodonTally::new();
        assert!(tally.frequencies().is_empty());
        tally.add("GGC", 0);
        assert!(tally.frequencies().is_empty());
    }

    #[test]
    fn huge_counts_neither_panic_nor_wrap() {
        let mut tally = CodonTally::new();
        tally.add("AAA", u64::MAX);
        tally.add("AAA", 1);
        tally.add("CAT", u64::MAX);
        assert_eq!(tally.get("AAA"), u64::MAX);
        assert_eq!(tally.total(), 2 * u128::from(u64::MAX));
        let freqs = tally.frequencies();
        assert!((freqs["AAA"] - 0.5).abs() < 1e-12);
        assert!((freqs["CAT"] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn add_accumulates() {
        let mut tally = CodonTally::new();
        tally.add("AAA", 3);
        tally.add("AAA", 2);
        let mut other = CodonTally::new();
        other.add("AAA", 1);
        other.add("TTT", 1);
        tally.merge(&other);
        assert_eq!(tally.get("AAA"), 6);
        assert_eq!(tally.get("TTT"), 1);
        assert_eq!(tally.get("CCC"), 0);
        assert_eq!(tally.total(), 7);
    }
}
