//! Flat-file sink: comma-separated, header row, no index column.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use csv::WriterBuilder;

use crate::error::CsvSinkResult;
use crate::models::{Record, COUNTRY_COLUMN, GDP_BILLIONS_COLUMN};

/// Write `records` to any writer.
///
/// The header is written even when there are no records.
pub fn write_csv<W: Write>(records: &[Record], writer: W) -> CsvSinkResult<()> {
    let mut wtr = WriterBuilder::new().has_headers(false).from_writer(writer);
    wtr.write_record([COUNTRY_COLUMN, GDP_BILLIONS_COLUMN])?;
    for record in records {
        wtr.serialize(record)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Save `records` to `path`, replacing any existing file.
pub fn save_csv(records: &[Record], path: &Path) -> CsvSinkResult<()> {
    let file = File::create(path)?;
    write_csv(records, file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CsvSinkError;
    use std::fs;

    fn records() -> Vec<Record> {
        vec![
            Record { country: "United States".into(), gdp_usd_billions: 26_949.64 },
            Record { country: "Korea, South".into(), gdp_usd_billions: 1_709.23 },
            Record { country: "Tuvalu".into(), gdp_usd_billions: 0.06 },
            Record { country: "Round".into(), gdp_usd_billions: 100.0 },
        ]
    }

    #[test]
    fn test_header_and_rows() {
        let mut buf = Vec::new();
        write_csv(&records(), &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "Country,GDP_USD_Billions");
        assert_eq!(lines[1], "United States,26949.64");
        assert_eq!(lines[2], "\"Korea, South\",1709.23");
        assert_eq!(lines[3], "Tuvalu,0.06");
        assert_eq!(lines[4], "Round,100.0");
        assert_eq!(lines.len(), 5);
    }

    #[test]
    fn test_empty_set_still_has_header() {
        let mut buf = Vec::new();
        write_csv(&[], &mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "Country,GDP_USD_Billions\n");
    }

    #[test]
    fn test_save_overwrites_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gdp.csv");
        fs::write(&path, "stale contents\nthat are longer than the new file\n").unwrap();

        save_csv(&records()[..1], &path).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text, "Country,GDP_USD_Billions\nUnited States,26949.64\n");
    }

    #[test]
    fn test_unwritable_path_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing-dir").join("gdp.csv");
        let err = save_csv(&records(), &path).unwrap_err();
        assert!(matches!(err, CsvSinkError::Io(_)));
    }
}
