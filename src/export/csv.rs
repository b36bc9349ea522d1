//! CSV report exporter

use std::path::Path;

use crate::console;
use crate::export::ExportError;
use crate::models::IndicatorRecord;

const HEADER: [&str; 2] = ["Indicator", "Source"];

/// Write one row per record in aggregation order, replacing any existing file
pub fn export_csv(records: &[IndicatorRecord], path: &Path) -> Result<(), ExportError> {
    let csv_err = |source| ExportError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::CRLF)
        .from_path(path)
        .map_err(csv_err)?;
    writer.write_record(HEADER).map_err(csv_err)?;
    for record in records {
        writer
            .write_record([record.indicator.as_str(), record.source.as_str()])
            .map_err(csv_err)?;
    }
    writer.flush().map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    println!("{}", console::exported_line(path));
    tracing::info!(path = %path.display(), rows = records.len(), "CSV report written");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_row_per_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.csv");
        let records = vec![
            IndicatorRecord::new("1.2.3.4", "A"),
            IndicatorRecord::new("evil.com", "A"),
            IndicatorRecord::new("1.2.3.4", "B"),
            IndicatorRecord::new("evil.com", "B"),
        ];

        export_csv(&records, &path).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let header: Vec<&str> = reader.headers().unwrap().iter().collect();
        assert_eq!(header, vec!["Indicator", "Source"]);
        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), records.len());
        assert_eq!(&rows[2][0], "1.2.3.4");
        assert_eq!(&rows[2][1], "B");
    }

    #[test]
    fn test_fields_with_commas_are_quoted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.csv");

        export_csv(&[IndicatorRecord::new("a,b", "Feed \"X\"")], &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "Indicator,Source\r\n\"a,b\",\"Feed \"\"X\"\"\"\r\n");
    }

    #[test]
    fn test_header_only_when_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.csv");

        export_csv(&[], &path).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "Indicator,Source\r\n");
    }

    #[test]
    fn test_unwritable_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("report.csv");

        assert!(matches!(export_csv(&[], &path), Err(ExportError::Csv { .. })));
    }
}
