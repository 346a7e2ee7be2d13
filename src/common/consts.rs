/// Ligation bases between the random-mer and the insert ("AG" in the protocol)
pub const DEFAULT_LIGATION_BASES: usize = 2;

/// Random-mers within this many mismatches under the same key are PCR duplicates
pub const DEFAULT_MAX_HAMMING: u32 = 1;

/// Suffix appended to each input FASTQ path by the breakdown command
pub const PROCESSED_SUFFIX: &str = ".processed.fastq";
