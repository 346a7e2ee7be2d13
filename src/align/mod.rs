mod blast;
mod reference;
mod tails;

pub use blast::{parse_tabular_hits, Aligner, AlignmentHit, BlastAligner, BLAST_OUTFMT};
pub use reference::{ensembl_url, Reference};
pub use tails::{build_tails, query_sequences, write_query_fasta, write_tails_csv, QuerySequence, TailRecord};
