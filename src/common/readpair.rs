use std::borrow::Cow;
use std::fmt;

use bio::alphabets::dna;

use crate::runtime::{Error, Result};

///////////////////////////////
/// Which read of a pair an operation applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WhichRead {
    Read1,
    Read2,
}

impl fmt::Display for WhichRead {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            WhichRead::Read1 => write!(f, "read 1"),
            WhichRead::Read2 => write!(f, "read 2"),
        }
    }
}

///////////////////////////////
/// End of the molecule, in the molecule's own orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReadEnd {
    ThreePrime,
    FivePrime,
}

impl fmt::Display for ReadEnd {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ReadEnd::ThreePrime => write!(f, "3'"),
            ReadEnd::FivePrime => write!(f, "5'"),
        }
    }
}

///////////////////////////////
/// One FASTQ record. Position 0 is the 5' end of the orientation it is stored in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceRecord {
    pub head: Vec<u8>,
    pub seq: Vec<u8>,
    pub qual: Vec<u8>,
}

impl SequenceRecord {
    pub fn new(head: impl Into<Vec<u8>>, seq: impl Into<Vec<u8>>, qual: impl Into<Vec<u8>>) -> Self {
        SequenceRecord {
            head: head.into(),
            seq: seq.into(),
            qual: qual.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.seq.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seq.is_empty()
    }

    /// Reverse complement of the sequence; the quality string is reversed along with it
    pub fn revcomp(&self) -> SequenceRecord {
        SequenceRecord {
            head: self.head.clone(),
            seq: dna::revcomp(&self.seq),
            qual: self.qual.iter().rev().copied().collect(),
        }
    }

    /// Sub-range by position. None if the range runs past the end of the sequence
    /// or of the quality string
    pub fn sub_range(&self, start: usize, end: usize) -> Option<SequenceRecord> {
        if start > end || end > self.seq.len() {
            return None;
        }
        Some(SequenceRecord {
            head: self.head.clone(),
            seq: self.seq[start..end].to_vec(),
            qual: self.qual.get(start..end)?.to_vec(),
        })
    }

    fn drop_front(&self, n: usize) -> Option<SequenceRecord> {
        self.sub_range(n, self.len())
    }

    fn drop_back(&self, n: usize) -> Option<SequenceRecord> {
        let end = self.len().checked_sub(n)?;
        self.sub_range(0, end)
    }
}

///////////////////////////////
/// One sequenced fragment. Read 1 is stored reverse to the molecule, read 2 forward
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadPair {
    pub r1: SequenceRecord,
    pub r2: SequenceRecord,
}

impl ReadPair {
    pub fn new(r1: SequenceRecord, r2: SequenceRecord) -> Self {
        ReadPair { r1, r2 }
    }

    pub fn read(&self, which: WhichRead) -> &SequenceRecord {
        match which {
            WhichRead::Read1 => &self.r1,
            WhichRead::Read2 => &self.r2,
        }
    }

    ///////////////////////////////
    /// First `length` bases of the selected read, optionally of its reverse complement.
    /// Shorter reads give back everything they have
    pub fn barcode(&self, length: usize, revcomp: bool, which: WhichRead) -> Cow<'_, [u8]> {
        let seq = &self.read(which).seq;
        let n = length.min(seq.len());
        if revcomp {
            //first n of the revcomp are the revcomp of the last n
            Cow::Owned(dna::revcomp(&seq[seq.len() - n..]))
        } else {
            Cow::Borrowed(&seq[..n])
        }
    }

    /// Last `length` bases of revcomp(read 1): the molecular identifier
    pub fn random_mer(&self, length: usize) -> Option<Vec<u8>> {
        let seq = &self.r1.seq;
        if length > seq.len() {
            return None;
        }
        Some(dna::revcomp(&seq[..length]))
    }

    /// Random-mer plus the adjacent ligation bases; used as the duplicate grouping key
    pub fn analysis_sequence(&self, random_mer_length: usize, ligation_bases: usize) -> Option<Vec<u8>> {
        self.random_mer(random_mer_length.checked_add(ligation_bases)?)
    }

    ///////////////////////////////
    /// Remove `length` bases from one end of one read.
    ///
    /// Read 1 is stored reversed, so its 3' end is the front of the stored sequence
    /// and its 5' end the back. Read 2 maps directly.
    pub fn trim(&self, length: usize, which: WhichRead, end: ReadEnd) -> Result<ReadPair> {
        let read = self.read(which);
        let trimmed = match (which, end) {
            (WhichRead::Read1, ReadEnd::ThreePrime) | (WhichRead::Read2, ReadEnd::FivePrime) => {
                read.drop_front(length)
            }
            (WhichRead::Read1, ReadEnd::FivePrime) | (WhichRead::Read2, ReadEnd::ThreePrime) => {
                read.drop_back(length)
            }
        }
        .ok_or_else(|| Error::TrimOverflow {
            read: which,
            end,
            requested: length,
            available: read.len(),
        })?;

        Ok(match which {
            WhichRead::Read1 => ReadPair::new(trimmed, self.r2.clone()),
            WhichRead::Read2 => ReadPair::new(self.r1.clone(), trimmed),
        })
    }
}

impl fmt::Display for ReadPair {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "({}, {})",
            String::from_utf8_lossy(&self.r1.seq),
            String::from_utf8_lossy(&self.r2.seq)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(seq: &str) -> SequenceRecord {
        let qual: String = (0..seq.len()).map(|i| (b'!' + i as u8) as char).collect();
        SequenceRecord::new("r", seq, qual)
    }

    fn pair(r1: &str, r2: &str) -> ReadPair {
        ReadPair::new(rec(r1), rec(r2))
    }

    #[test]
    fn test_revcomp() {
        let r = rec("ATGCTTCCAGNAA");
        let rc = r.revcomp();
        assert_eq!(rc.seq, b"TTNCTGGAAGCAT");
        assert_eq!(rc.qual.first(), r.qual.last());
    }

    #[test]
    fn revcomp_twice_is_identity() {
        for s in ["ACGT", "AAAACCCCGGGGTTTT", "GATTACANNRY", ""] {
            let r = rec(s);
            assert_eq!(r.revcomp().revcomp(), r);
        }
    }

    #[test]
    fn barcode_from_either_read() {
        let p = pair("AAAACCCC", "GGTTACGT");
        assert_eq!(p.barcode(4, false, WhichRead::Read2).as_ref(), b"GGTT");
        assert_eq!(p.barcode(4, false, WhichRead::Read1).as_ref(), b"AAAA");
        //revcomp of read 2 is ACGTAACC
        assert_eq!(p.barcode(4, true, WhichRead::Read2).as_ref(), b"ACGT");
        //too short: whole read
        assert_eq!(p.barcode(20, false, WhichRead::Read2).len(), 8);
    }

    #[test]
    fn random_mer_is_tail_of_read1_revcomp() {
        let p = pair("TGGCCAACCCCGGGG", "AAAA");
        let rc = p.r1.revcomp().seq;
        assert_eq!(p.random_mer(7).unwrap(), rc[rc.len() - 7..].to_vec());
        assert_eq!(p.random_mer(7).unwrap(), b"TTGGCCA");
        assert_eq!(p.analysis_sequence(7, 2).unwrap(), rc[rc.len() - 9..].to_vec());
        assert!(p.random_mer(16).is_none());
        assert!(p.analysis_sequence(usize::MAX, 2).is_none());
    }

    #[test]
    fn trim_each_read_and_end() {
        let p = pair("ABCDEFGH", "IJKLMNOP");

        let t = p.trim(3, WhichRead::Read1, ReadEnd::ThreePrime).unwrap();
        assert_eq!(t.r1.seq, b"DEFGH");
        assert_eq!(t.r1.qual, p.r1.qual[3..].to_vec());
        assert_eq!(t.r2, p.r2);

        let t = p.trim(3, WhichRead::Read1, ReadEnd::FivePrime).unwrap();
        assert_eq!(t.r1.seq, b"ABCDE");
        assert_eq!(t.r2, p.r2);

        let t = p.trim(3, WhichRead::Read2, ReadEnd::ThreePrime).unwrap();
        assert_eq!(t.r2.seq, b"IJKLM");
        assert_eq!(t.r1, p.r1);

        let t = p.trim(3, WhichRead::Read2, ReadEnd::FivePrime).unwrap();
        assert_eq!(t.r2.seq, b"LMNOP");
        assert_eq!(t.r1, p.r1);
    }

    #[test]
    fn short_quality_is_not_dropped_silently() {
        let r = SequenceRecord::new("r", "ACGTACGT", "IIII");
        assert!(r.sub_range(2, 6).is_none());
        assert_eq!(r.sub_range(0, 4).unwrap().qual, b"IIII");

        let p = ReadPair::new(r, rec("ACGT"));
        assert!(matches!(
            p.trim(2, WhichRead::Read1, ReadEnd::ThreePrime),
            Err(Error::TrimOverflow { .. })
        ));
    }

    #[test]
    fn trim_reduces_length_exactly() {
        let p = pair("ACGTACGTAC", "TTTTGGGG");
        for which in [WhichRead::Read1, WhichRead::Read2] {
            for end in [ReadEnd::ThreePrime, ReadEnd::FivePrime] {
                for n in 0..=p.read(which).len() {
                    let t = p.trim(n, which, end).unwrap();
                    assert_eq!(t.read(which).len(), p.read(which).len() - n);
                    let other = match which {
                        WhichRead::Read1 => WhichRead::Read2,
                        WhichRead::Read2 => WhichRead::Read1,
                    };
                    assert_eq!(t.read(other), p.read(other));
                }
            }
        }
    }

    #[test]
    fn trim_overflow_is_an_error() {
        let p = pair("ACGT", "ACGTACGT");
        let err = p.trim(5, WhichRead::Read1, ReadEnd::FivePrime).unwrap_err();
        match err {
            Error::TrimOverflow {
                read,
                end,
                requested,
                available,
            } => {
                assert_eq!(read, WhichRead::Read1);
                assert_eq!(end, ReadEnd::FivePrime);
                assert_eq!(requested, 5);
                assert_eq!(available, 4);
            }
            other => panic!("unexpected error {other}"),
        }

        //the whole read may go
        assert!(p.trim(4, WhichRead::Read1, ReadEnd::ThreePrime).unwrap().r1.is_empty());
    }
}
