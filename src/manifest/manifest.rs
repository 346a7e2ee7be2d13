use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use log::{debug, info};

use crate::fileformat::{detect_fileformat, DetectedFileformat};
use crate::runtime::{Error, Result};

const COL_ID: usize = 0;
const COL_BARCODE: usize = 2;
const COL_GENE_SPECIFIC: usize = 3;
const COL_RANDOM_MER_LENGTH: usize = 4;

///////////////////////////////
/// One sample of the experiment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    pub id: String,
    /// Fixed barcode followed by the gene-specific portion
    pub barcode: Vec<u8>,
    pub random_mer_length: usize,
}

impl ManifestEntry {
    /// Build from the cells of one data row. `row` is the 1-based row in the file
    fn from_cells<S: AsRef<str>>(row: usize, cells: &[S]) -> Result<Self> {
        let cell = |i: usize| -> Result<&str> {
            cells
                .get(i)
                .map(|c| c.as_ref().trim())
                .ok_or_else(|| Error::manifest_row(row, Some(format!("missing column {}", i))))
        };

        let id = cell(COL_ID)?.to_string();
        let barcode = format!("{}{}", cell(COL_BARCODE)?, cell(COL_GENE_SPECIFIC)?).into_bytes();
        if barcode.is_empty() {
            return Err(Error::manifest_row(row, Some("empty barcode")));
        }

        let random_mer_length = parse_length(cell(COL_RANDOM_MER_LENGTH)?).ok_or_else(|| {
            Error::manifest_row(
                row,
                Some(format!(
                    "random-mer length '{}' is not a positive whole number",
                    cells[COL_RANDOM_MER_LENGTH].as_ref()
                )),
            )
        })?;

        Ok(ManifestEntry {
            id,
            barcode,
            random_mer_length,
        })
    }
}

/// Positive integer, or a float with no fractional part as spreadsheets tend to store them
fn parse_length(s: &str) -> Option<usize> {
    let n = match s.parse::<usize>() {
        Ok(n) => n,
        Err(_) => {
            let f = s.parse::<f64>().ok()?;
            if !(f.is_finite() && f >= 0.0 && f.fract() == 0.0) {
                return None;
            }
            f as usize
        }
    };
    (n > 0).then_some(n)
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) if f.fract() == 0.0 => format!("{}", *f as i64),
        other => other.to_string(),
    }
}

///////////////////////////////
/// Per-sample parameters, in file order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    entries: Vec<ManifestEntry>,
}

impl Manifest {
    ///////////////////////////////
    /// Load a manifest; format is picked by file extension
    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::file_not_found(path));
        }

        let manifest = match detect_fileformat(path) {
            DetectedFileformat::CSV => Manifest::from_delimited(path, b',')?,
            DetectedFileformat::TSV => Manifest::from_delimited(path, b'\t')?,
            DetectedFileformat::Spreadsheet => Manifest::from_spreadsheet(path)?,
            _ => {
                return Err(Error::UnsupportedManifestFormat {
                    path: path.to_path_buf(),
                })
            }
        };

        info!(
            "Loaded {} manifest entries from {}",
            manifest.len(),
            path.display()
        );
        Ok(manifest)
    }

    fn from_delimited(path: &Path, delimiter: u8) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .flexible(true)
            .from_path(path)
            .map_err(|e| Error::file_not_valid(path, Some(e.to_string())))?;

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result.map_err(|e| Error::file_not_valid(path, Some(e.to_string())))?;
            rows.push(record.iter().map(str::to_string).collect::<Vec<_>>());
        }
        Manifest::from_rows(rows)
    }

    fn from_spreadsheet(path: &Path) -> Result<Self> {
        let mut workbook =
            open_workbook_auto(path).map_err(|e| Error::file_not_valid(path, Some(e.to_string())))?;

        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| Error::file_not_valid(path, Some("workbook has no sheets")))?
            .map_err(|e| Error::file_not_valid(path, Some(e.to_string())))?;

        //first row is the header
        let rows = range
            .rows()
            .skip(1)
            .map(|row| row.iter().map(cell_to_string).collect::<Vec<_>>())
            .collect();
        Manifest::from_rows(rows)
    }

    /// Data rows, header already removed
    fn from_rows(rows: Vec<Vec<String>>) -> Result<Self> {
        let mut entries = Vec::new();
        for (i, cells) in rows.iter().enumerate() {
            let row = i + 2;
            let blank_id = cells.first().map_or(true, |c| c.trim().is_empty());
            if blank_id {
                debug!("Skipping manifest row {} with empty ID", row);
                continue;
            }
            entries.push(ManifestEntry::from_cells(row, cells.as_slice())?);
        }
        Ok(Manifest { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ManifestEntry> {
        self.entries.iter()
    }
}

impl<'a> IntoIterator for &'a Manifest {
    type Item = &'a ManifestEntry;
    type IntoIter = std::slice::Iter<'a, ManifestEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn manifest_file(name: &str, content: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join(name);
        fs::write(&p, content).unwrap();
        (dir, p)
    }

    #[test]
    fn header_and_blank_rows_skipped() {
        let (_dir, p) = manifest_file(
            "manifest.csv",
            "ID,Gene,Barcode,GSP,Ranmer\n\
             S1,ACTB,AAAA, CCGG ,10\n\
             ,,,,\n\
             S2,GAPDH,TTTT,GGAA,11\n",
        );
        let manifest = Manifest::from_path(&p).unwrap();
        assert_eq!(manifest.len(), 2);

        let entries: Vec<_> = manifest.iter().collect();
        assert_eq!(entries[0].id, "S1");
        assert_eq!(entries[0].barcode, b"AAAACCGG");
        assert_eq!(entries[0].random_mer_length, 10);
        assert_eq!(entries[1].id, "S2");
        assert_eq!(entries[1].random_mer_length, 11);
    }

    #[test]
    fn tsv_uses_tabs() {
        let (_dir, p) = manifest_file(
            "manifest.tsv",
            "ID\tGene\tBarcode\tGSP\tRanmer\nS1\tACTB\tAAAA\tCC\t10.0\n",
        );
        let manifest = Manifest::from_path(&p).unwrap();
        assert_eq!(manifest.len(), 1);
        assert_eq!(manifest.iter().next().unwrap().barcode, b"AAAACC");
        assert_eq!(manifest.iter().next().unwrap().random_mer_length, 10);
    }

    #[test]
    fn bad_length_reports_row() {
        let (_dir, p) = manifest_file(
            "manifest.csv",
            "ID,Gene,Barcode,GSP,Ranmer\nS1,ACTB,AAAA,CC,10\nS2,ACTB,AAAA,CC,ten\n",
        );
        match Manifest::from_path(&p) {
            Err(Error::ManifestRow { row, .. }) => assert_eq!(row, 3),
            other => panic!("expected ManifestRow, got {:?}", other),
        }
    }

    #[test]
    fn zero_length_rejected() {
        let (_dir, p) = manifest_file("manifest.csv", "ID,Gene,Barcode,GSP,Ranmer\nS1,ACTB,AAAA,CC,0\n");
        assert!(matches!(
            Manifest::from_path(&p),
            Err(Error::ManifestRow { row: 2, .. })
        ));
    }

    #[test]
    fn missing_column_reports_row() {
        let (_dir, p) = manifest_file("manifest.csv", "ID,Gene,Barcode,GSP,Ranmer\nS1,ACTB,AAAA\n");
        assert!(matches!(
            Manifest::from_path(&p),
            Err(Error::ManifestRow { row: 2, .. })
        ));
    }

    #[test]
    fn unsupported_extension() {
        let (_dir, p) = manifest_file("manifest.json", "{}");
        assert!(matches!(
            Manifest::from_path(&p),
            Err(Error::UnsupportedManifestFormat { .. })
        ));
    }

    fn fixture(name: &str) -> std::path::PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/data").join(name)
    }

    #[test]
    fn spreadsheet_header_and_blank_rows_skipped() {
        let manifest = Manifest::from_path(&fixture("manifest.xlsx")).unwrap();
        assert_eq!(manifest.len(), 2);

        let entries: Vec<_> = manifest.iter().collect();
        assert_eq!(entries[0].id, "S1");
        assert_eq!(entries[0].barcode, b"AAAACCGG");
        assert_eq!(entries[0].random_mer_length, 10);
        assert_eq!(entries[1].id, "S2");
        assert_eq!(entries[1].barcode, b"TTTTGGAA");
        //stored as a float cell
        assert_eq!(entries[1].random_mer_length, 11);
    }

    #[test]
    fn spreadsheet_bad_length_reports_row() {
        match Manifest::from_path(&fixture("manifest_bad_row.xlsx")) {
            Err(Error::ManifestRow { row, .. }) => assert_eq!(row, 3),
            other => panic!("expected ManifestRow, got {:?}", other),
        }
    }

    #[test]
    fn spreadsheet_cells() {
        assert_eq!(cell_to_string(&Data::Float(10.0)), "10");
        assert_eq!(cell_to_string(&Data::Int(11)), "11");
        assert_eq!(cell_to_string(&Data::Empty), "");
        assert_eq!(parse_length("10.5"), None);
        assert_eq!(parse_length("-1"), None);
        assert_eq!(parse_length("0"), None);
        assert_eq!(parse_length("0.0"), None);
        assert_eq!(parse_length(" 7 ".trim()), Some(7));
    }
}
