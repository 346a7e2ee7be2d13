use std::path::Path;

use log::{debug, info, warn};

use crate::common::{ReadEnd, ReadPair, WhichRead};
use crate::fileformat;
use crate::runtime::Result;
use crate::umi::{DedupParams, DedupStats, DuplicateFilter};

///////////////////////////////
/// Read pairs of one sequencing run (or a subset derived from one).
/// Every operation returns a new Experiment; the source is never modified
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Experiment {
    pairs: Vec<ReadPair>,
}

impl Experiment {
    pub fn new(pairs: Vec<ReadPair>) -> Self {
        Experiment { pairs }
    }

    /// Load R1 and R2, pairing records by index
    pub fn from_paired_fastq(path_r1: &Path, path_r2: &Path) -> Result<Self> {
        let pairs = fileformat::read_paired_fastq(path_r1, path_r2)?;
        info!("Read {} read pairs", pairs.len());
        Ok(Experiment { pairs })
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn pairs(&self) -> &[ReadPair] {
        &self.pairs
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ReadPair> {
        self.pairs.iter()
    }

    ///////////////////////////////
    /// Pairs whose barcode is exactly `barcode`. Lazy; every call starts a fresh pass
    pub fn filter_by_barcode<'a>(
        &'a self,
        barcode: &'a [u8],
        revcomp: bool,
        which: WhichRead,
    ) -> impl Iterator<Item = &'a ReadPair> + 'a {
        self.pairs
            .iter()
            .filter(move |pair| pair.barcode(barcode.len(), revcomp, which).as_ref() == barcode)
    }

    ///////////////////////////////
    /// Drop PCR duplicates within the barcode group, then trim the survivors:
    /// barcode off read 2 5', random-mer and ligation bases off read 1 3',
    /// and (defensive) barcode length off read 1 5'
    pub fn deduplicate_and_trim(&self, barcode: &[u8], params: &DedupParams) -> (Experiment, DedupStats) {
        let (exp, stats) = self.scan_duplicates(barcode, params, |pair| {
            trim_for_output(pair, barcode.len(), params)
        });
        info!("Deduplicated {}: {}", String::from_utf8_lossy(barcode), stats);
        (exp, stats)
    }

    /// Same duplicate detection as deduplicate_and_trim, but pairs are kept untrimmed
    pub fn remove_pcr_duplicates(&self, barcode: &[u8], params: &DedupParams) -> (Experiment, DedupStats) {
        self.scan_duplicates(barcode, params, |pair| Ok(pair.clone()))
    }

    ///////////////////////////////
    /// For input where the random-mer was already removed upstream: filter on barcode
    /// and remove only the barcode trims, without any duplicate detection
    pub fn trim_barcode_only(&self, barcode: &[u8], params: &DedupParams) -> (Experiment, DedupStats) {
        let mut stats = DedupStats {
            input_pairs: self.len(),
            ..Default::default()
        };
        let mut kept = Vec::new();

        for pair in self.filter_by_barcode(barcode, false, WhichRead::Read2) {
            stats.barcode_matched += 1;
            let trimmed = pair
                .trim(barcode.len(), WhichRead::Read2, ReadEnd::FivePrime)
                .and_then(|p| {
                    if params.defensive_trim {
                        p.trim(barcode.len(), WhichRead::Read1, ReadEnd::FivePrime)
                    } else {
                        Ok(p)
                    }
                });
            match trimmed {
                Ok(p) => kept.push(p),
                Err(e) => {
                    debug!("Discarding {}: {}", String::from_utf8_lossy(&pair.r1.head), e);
                    stats.too_short += 1;
                }
            }
        }

        stats.emitted = kept.len();
        warn_if_too_short(&stats);
        info!("Barcode-trimmed {}: {}", String::from_utf8_lossy(barcode), stats);
        (Experiment::new(kept), stats)
    }

    fn scan_duplicates<F>(&self, barcode: &[u8], params: &DedupParams, emit: F) -> (Experiment, DedupStats)
    where
        F: Fn(&ReadPair) -> Result<ReadPair>,
    {
        let mut filter = DuplicateFilter::new(params.max_hamming);
        let mut stats = DedupStats {
            input_pairs: self.len(),
            ..Default::default()
        };
        let mut kept = Vec::new();

        for pair in self.filter_by_barcode(barcode, false, WhichRead::Read2) {
            stats.barcode_matched += 1;

            //Reads too short to hold the key cannot be grouped
            let (Some(random_mer), Some(key)) = (
                pair.random_mer(params.random_mer_length),
                pair.analysis_sequence(params.random_mer_length, params.ligation_bases),
            ) else {
                stats.too_short += 1;
                continue;
            };

            if filter.is_duplicate(&key, &random_mer) {
                stats.duplicates += 1;
                continue;
            }

            match emit(pair) {
                Ok(out) => {
                    filter.accept(key, random_mer);
                    kept.push(out);
                }
                Err(e) => {
                    debug!("Discarding {}: {}", String::from_utf8_lossy(&pair.r1.head), e);
                    stats.too_short += 1;
                }
            }
        }

        stats.emitted = kept.len();
        debug!("{} distinct analysis sequences", filter.num_groups());
        warn_if_too_short(&stats);
        (Experiment::new(kept), stats)
    }

    ///////////////////////////////
    /// Write read 1 and read 2 of every pair to two FASTQ files
    pub fn write_paired_fastq(&self, path_r1: &Path, path_r2: &Path) -> Result<()> {
        fileformat::write_fastq(path_r1, self.pairs.iter().map(|p| &p.r1))?;
        fileformat::write_fastq(path_r2, self.pairs.iter().map(|p| &p.r2))?;
        Ok(())
    }

    pub fn write_read1(&self, path: &Path) -> Result<()> {
        fileformat::write_fastq(path, self.pairs.iter().map(|p| &p.r1))
    }
}

fn trim_for_output(pair: &ReadPair, barcode_len: usize, params: &DedupParams) -> Result<ReadPair> {
    let trimmed = pair
        .trim(barcode_len, WhichRead::Read2, ReadEnd::FivePrime)?
        .trim(params.read1_three_prime_trim(), WhichRead::Read1, ReadEnd::ThreePrime)?;
    if params.defensive_trim {
        trimmed.trim(barcode_len, WhichRead::Read1, ReadEnd::FivePrime)
    } else {
        Ok(trimmed)
    }
}

fn warn_if_too_short(stats: &DedupStats) {
    if stats.too_short > 0 {
        warn!(
            "{} read pairs were too short to trim and were discarded",
            stats.too_short
        );
    }
}

impl FromIterator<ReadPair> for Experiment {
    fn from_iter<I: IntoIterator<Item = ReadPair>>(iter: I) -> Self {
        Experiment::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Experiment {
    type Item = &'a ReadPair;
    type IntoIter = std::slice::Iter<'a, ReadPair>;

    fn into_iter(self) -> Self::IntoIter {
        self.pairs.iter()
    }
}
