use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use flate2::{write::GzEncoder, Compression};
use log::{debug, warn};
use seq_io::fastq::Reader as FastqReader;
use seq_io::fastq::Record as FastqRecord;

use crate::common::{ReadPair, SequenceRecord};
use crate::runtime::{Error, Result};

///////////////////////////////
/////////////////////////////// Reader
///////////////////////////////

/// Open a FASTQ file; compression is detected from the content
pub fn open_fastq(path: &Path) -> Result<FastqReader<Box<dyn std::io::Read>>> {
    let opened_handle = File::open(path).map_err(|_| Error::file_not_found(path))?;

    //niffler needs a few bytes to sniff the format
    let len = opened_handle.metadata().map_err(|e| Error::io(path, e))?.len();
    if len < 5 {
        warn!("Input file {} is empty", path.display());
        let reader: Box<dyn std::io::Read> = Box::new(opened_handle);
        return Ok(FastqReader::new(reader));
    }

    let (reader, compression) = niffler::get_reader(Box::new(opened_handle))
        .map_err(|e| Error::file_not_valid(path, Some(e.to_string())))?;

    debug!(
        "Opened file {} with compression {:?}",
        path.display(),
        compression
    );
    Ok(FastqReader::new(reader))
}

/// Read every record of one FASTQ file, in file order
pub fn read_fastq_records(path: &Path) -> Result<Vec<SequenceRecord>> {
    let mut reader = open_fastq(path)?;
    let mut records = Vec::new();

    while let Some(rec) = reader.next() {
        let rec = rec.map_err(|source| Error::FastqParse {
            path: path.to_path_buf(),
            record: records.len() + 1,
            source,
        })?;
        records.push(SequenceRecord::new(rec.head(), rec.seq(), rec.qual()));
    }
    Ok(records)
}

///////////////////////////////
/// Read R1 and R2 and pair them by index. Unequal record counts are fatal
pub fn read_paired_fastq(path_r1: &Path, path_r2: &Path) -> Result<Vec<ReadPair>> {
    let r1 = read_fastq_records(path_r1)?;
    let r2 = read_fastq_records(path_r2)?;

    if r1.len() != r2.len() {
        return Err(Error::UnpairedReads {
            read1_count: r1.len(),
            read2_count: r2.len(),
        });
    }

    Ok(r1
        .into_iter()
        .zip(r2)
        .map(|(r1, r2)| ReadPair::new(r1, r2))
        .collect())
}

///////////////////////////////
/////////////////////////////// Writer
///////////////////////////////

/// Buffered writer; gzip if the name ends in .gz
pub fn create_writer(path: &Path) -> Result<Box<dyn Write>> {
    let file = File::create(path).map_err(|e| Error::io(path, e))?;
    let writer: Box<dyn Write> = if path.to_string_lossy().ends_with(".gz") {
        Box::new(BufWriter::new(GzEncoder::new(file, Compression::default())))
    } else {
        Box::new(BufWriter::new(file))
    };
    Ok(writer)
}

////////// Write one FASTQ read
pub fn write_fastq_record<W: Write + ?Sized>(
    writer: &mut W,
    rec: &SequenceRecord,
) -> std::io::Result<()> {
    writer.write_all(b"@")?;
    writer.write_all(&rec.head)?;
    writer.write_all(b"\n")?;
    writer.write_all(&rec.seq)?;
    writer.write_all(b"\n+\n")?;
    writer.write_all(&rec.qual)?;
    writer.write_all(b"\n")?;
    Ok(())
}

////////// Write one FASTA read
pub fn write_fasta_record<W: Write + ?Sized>(
    writer: &mut W,
    name: &[u8],
    seq: &[u8],
) -> std::io::Result<()> {
    writer.write_all(b">")?;
    writer.write_all(name)?;
    writer.write_all(b"\n")?;
    writer.write_all(seq)?;
    writer.write_all(b"\n")?;
    Ok(())
}

/// Write a sequence of records to one FASTQ file
pub fn write_fastq<'a>(
    path: &Path,
    records: impl IntoIterator<Item = &'a SequenceRecord>,
) -> Result<()> {
    let mut writer = create_writer(path)?;
    for rec in records {
        write_fastq_record(&mut writer, rec).map_err(|e| Error::io(path, e))?;
    }
    //absolutely have to call this before dropping, for bufwriter
    writer.flush().map_err(|e| Error::io(path, e))?;
    Ok(())
}
