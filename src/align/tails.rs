use std::io::Write;
use std::path::Path;

use bio::alphabets::dna::revcomp;
use log::{debug, info};
use rustc_hash::FxHashMap;
use serde::Serialize;

use super::AlignmentHit;
use crate::experiment::Experiment;
use crate::fileformat::{create_writer, write_fasta_record};
use crate::runtime::{Error, Result};

///////////////////////////////
/// A read in mRNA sense, as sent to the aligner
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuerySequence {
    pub id: String,
    pub seq: Vec<u8>,
}

/// Read 1 of every pair, reverse complemented. The ID is the first word of the header
pub fn query_sequences(experiment: &Experiment) -> Vec<QuerySequence> {
    experiment
        .iter()
        .map(|pair| {
            let head = String::from_utf8_lossy(&pair.r1.head);
            let id = head.split_whitespace().next().unwrap_or_default().to_string();
            QuerySequence {
                id,
                seq: revcomp(&pair.r1.seq),
            }
        })
        .collect()
}

/// Write the query sequences of an experiment as FASTA and return them
pub fn write_query_fasta(experiment: &Experiment, path: &Path) -> Result<Vec<QuerySequence>> {
    let queries = query_sequences(experiment);
    let mut writer = create_writer(path)?;
    for q in &queries {
        write_fasta_record(&mut writer, q.id.as_bytes(), &q.seq).map_err(|e| Error::io(path, e))?;
    }
    writer.flush().map_err(|e| Error::io(path, e))?;
    Ok(queries)
}

///////////////////////////////
/// Non-templated 3' extension of one read beyond its alignment to a gene
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TailRecord {
    pub read_id: String,
    pub gene: String,
    /// Last aligned position on the gene
    pub three_prime_end: usize,
    pub tail_length: usize,
    pub tail: String,
}

///////////////////////////////
/// Pick the best hit per query (highest bitscore, earliest on ties) and cut the
/// unaligned 3' remainder of the query. Antisense hits say nothing about a 3' tail
/// and are ignored. Returns the tails in query order and the number of queries
/// without a usable hit
pub fn build_tails(queries: &[QuerySequence], hits: &[AlignmentHit]) -> (Vec<TailRecord>, usize) {
    let mut best: FxHashMap<&str, &AlignmentHit> = FxHashMap::default();
    for hit in hits.iter().filter(|h| h.is_plus_strand()) {
        best.entry(hit.qseqid.as_str())
            .and_modify(|cur| {
                if hit.bitscore > cur.bitscore {
                    *cur = hit;
                }
            })
            .or_insert(hit);
    }

    let mut tails = Vec::with_capacity(queries.len());
    let mut unaligned = 0;
    for q in queries {
        let Some(hit) = best.get(q.id.as_str()) else {
            unaligned += 1;
            continue;
        };
        let tail = q.seq.get(hit.qend..).unwrap_or_default();
        tails.push(TailRecord {
            read_id: q.id.clone(),
            gene: hit.sseqid.clone(),
            three_prime_end: hit.send,
            tail_length: tail.len(),
            tail: String::from_utf8_lossy(tail).to_string(),
        });
    }

    if unaligned > 0 {
        debug!("{} queries had no alignment", unaligned);
    }
    (tails, unaligned)
}

pub fn write_tails_csv(path: &Path, tails: &[TailRecord]) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b',')
        .from_path(path)
        .map_err(|e| Error::file_not_valid(path, Some(e.to_string())))?;

    for t in tails {
        writer
            .serialize(t)
            .map_err(|e| Error::file_not_valid(path, Some(e.to_string())))?;
    }
    writer.flush().map_err(|e| Error::io(path, e))?;
    info!("Wrote {} tails to {}", tails.len(), path.display());
    Ok(())
}
