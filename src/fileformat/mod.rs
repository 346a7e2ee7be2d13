mod detect_fileformat;
pub mod paired_fastq;

pub use detect_fileformat::detect_fileformat;
pub use detect_fileformat::verify_input_fq_file;
pub use detect_fileformat::DetectedFileformat;

pub use paired_fastq::create_writer;
pub use paired_fastq::open_fastq;
pub use paired_fastq::read_paired_fastq;
pub use paired_fastq::write_fasta_record;
pub use paired_fastq::write_fastq;
pub use paired_fastq::write_fastq_record;
