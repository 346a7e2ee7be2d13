use bio::alignment::distance::hamming;
use rustc_hash::FxHashMap;

use crate::common::{DEFAULT_LIGATION_BASES, DEFAULT_MAX_HAMMING};

///////////////////////////////
/// Hamming distance between two random-mers. Only defined for equal lengths;
/// None otherwise, which callers treat as "not a duplicate"
pub fn hamming_distance(a: &[u8], b: &[u8]) -> Option<u32> {
    if a.len() != b.len() {
        return None;
    }
    Some(hamming(a, b) as u32)
}

///////////////////////////////
/// Parameters of one deduplication pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DedupParams {
    pub random_mer_length: usize,
    pub ligation_bases: usize,
    pub max_hamming: u32,
    /// Also remove len(barcode) from read 1 5', in case the read runs through into the barcode
    pub defensive_trim: bool,
}

impl DedupParams {
    pub fn new(random_mer_length: usize) -> Self {
        DedupParams {
            random_mer_length,
            ligation_bases: DEFAULT_LIGATION_BASES,
            max_hamming: DEFAULT_MAX_HAMMING,
            defensive_trim: true,
        }
    }

    pub fn with_max_hamming(mut self, max_hamming: u32) -> Self {
        self.max_hamming = max_hamming;
        self
    }

    pub fn with_ligation_bases(mut self, ligation_bases: usize) -> Self {
        self.ligation_bases = ligation_bases;
        self
    }

    pub fn with_defensive_trim(mut self, defensive_trim: bool) -> Self {
        self.defensive_trim = defensive_trim;
        self
    }

    /// Bases removed from read 1 3': random-mer and ligation junction.
    /// Saturates, so absurd lengths end in a trim overflow rather than wrapping
    pub fn read1_three_prime_trim(&self) -> usize {
        self.random_mer_length.saturating_add(self.ligation_bases)
    }
}

///////////////////////////////
/// Counters from one deduplication pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct DedupStats {
    pub input_pairs: usize,
    pub barcode_matched: usize,
    pub duplicates: usize,
    pub too_short: usize,
    pub emitted: usize,
}

impl std::fmt::Display for DedupStats {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "{} pairs in, {} with barcode, {} PCR duplicates, {} too short, {} kept",
            self.input_pairs, self.barcode_matched, self.duplicates, self.too_short, self.emitted
        )
    }
}

///////////////////////////////
/// Random-mers accepted so far, grouped by analysis sequence.
/// Lives for a single pass; nothing is shared between passes
pub struct DuplicateFilter {
    max_distance: u32,
    seen: FxHashMap<Vec<u8>, Vec<Vec<u8>>>,
}

impl DuplicateFilter {
    pub fn new(max_distance: u32) -> Self {
        DuplicateFilter {
            max_distance,
            seen: FxHashMap::default(),
        }
    }

    /// True if a random-mer within the distance limit was already accepted under this key
    pub fn is_duplicate(&self, analysis_sequence: &[u8], random_mer: &[u8]) -> bool {
        let Some(previous) = self.seen.get(analysis_sequence) else {
            return false;
        };
        previous.iter().any(|other| {
            hamming_distance(random_mer, other).is_some_and(|d| d <= self.max_distance)
        })
    }

    pub fn accept(&mut self, analysis_sequence: Vec<u8>, random_mer: Vec<u8>) {
        self.seen.entry(analysis_sequence).or_default().push(random_mer);
    }

    /// Number of distinct analysis sequences seen
    pub fn num_groups(&self) -> usize {
        self.seen.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hamming_is_symmetric_and_zero_iff_equal() {
        let umis: [&[u8]; 5] = [b"ATCGATCG", b"ATCGATCC", b"ATTGATCC", b"AAAGATCC", b"ATCGATCG"];
        for a in umis {
            for b in umis {
                let d = hamming_distance(a, b).unwrap();
                assert_eq!(Some(d), hamming_distance(b, a));
                assert_eq!(d == 0, a == b);
            }
        }
        assert_eq!(hamming_distance(b"ATCGATCG", b"AAAGATCC"), Some(3));
    }

    #[test]
    fn hamming_undefined_for_unequal_lengths() {
        assert_eq!(hamming_distance(b"ACGT", b"ACG"), None);

        let mut filter = DuplicateFilter::new(4);
        filter.accept(b"KEY".to_vec(), b"ACGT".to_vec());
        assert!(!filter.is_duplicate(b"KEY", b"ACG"));
    }

    #[test]
    fn duplicate_at_max_distance_kept_beyond() {
        let mut filter = DuplicateFilter::new(1);
        filter.accept(b"GROUP".to_vec(), b"AAAAAAA".to_vec());

        assert!(filter.is_duplicate(b"GROUP", b"AAAAAAA"));
        assert!(filter.is_duplicate(b"GROUP", b"AAAACAA"));
        assert!(!filter.is_duplicate(b"GROUP", b"AAGACAA"));
    }

    #[test]
    fn comparisons_scoped_by_group() {
        let mut filter = DuplicateFilter::new(1);
        filter.accept(b"GROUP1".to_vec(), b"AAAAAAA".to_vec());

        assert!(!filter.is_duplicate(b"GROUP2", b"AAAAAAA"));
        filter.accept(b"GROUP2".to_vec(), b"AAAAAAA".to_vec());
        assert_eq!(filter.num_groups(), 2);
    }

    #[test]
    fn any_previous_member_counts() {
        let mut filter = DuplicateFilter::new(0);
        filter.accept(b"G".to_vec(), b"ATCGATCG".to_vec());
        filter.accept(b"G".to_vec(), b"TTTTTTTT".to_vec());
        assert!(filter.is_duplicate(b"G", b"TTTTTTTT"));
        assert!(!filter.is_duplicate(b"G", b"TTTTTTTA"));
    }

    #[test]
    fn protocol_defaults() {
        let p = DedupParams::new(10);
        assert_eq!(p.ligation_bases, 2);
        assert_eq!(p.max_hamming, 1);
        assert!(p.defensive_trim);
        assert_eq!(p.read1_three_prime_trim(), 12);
    }

    #[test]
    fn huge_lengths_do_not_wrap() {
        let p = DedupParams::new(usize::MAX).with_ligation_bases(2);
        assert_eq!(p.read1_three_prime_trim(), usize::MAX);
    }
}
