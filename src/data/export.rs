use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use super::model::{Cell, Dataset};

/// Write `dataset` as CSV: header row then one record per row, no index
/// column. Missing cells become empty fields.
pub fn write_csv<W: Write>(dataset: &Dataset, sink: W) -> Result<()> {
    if dataset.column_count() == 0 {
        return Ok(());
    }

    let mut writer = csv::Writer::from_writer(sink);
    writer
        .write_record(dataset.column_names())
        .context("writing CSV header")?;

    for row in 0..dataset.row_count() {
        let fields = dataset.row(row).into_iter().map(|cell| match cell {
            Cell::Text(s) => s.to_string(),
            Cell::Number(v) => v.to_string(),
            Cell::Missing => String::new(),
        });
        writer
            .write_record(fields)
            .with_context(|| format!("writing CSV row {row}"))?;
    }

    writer.flush().context("flushing CSV output")?;
    Ok(())
}

/// Serialize `dataset` to CSV bytes, ready for a download/save action.
pub fn to_csv_bytes(dataset: &Dataset) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    write_csv(dataset, &mut buffer)?;
    Ok(buffer)
}

pub fn save_csv(dataset: &Dataset, path: &Path) -> Result<()> {
    let bytes = to_csv_bytes(dataset)?;
    std::fs::write(path, bytes).with_context(|| format!("writing {}", path.display()))?;
    log::info!("Exported {} rows to {}", dataset.row_count(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::read_csv;
    use crate::data::model::Column;

    #[test]
    fn test_export_layout() {
        let ds = Dataset::new(vec![
            Column::categorical("name", [Some("a, b"), None]),
            Column::numeric("v", [Some(2.0), Some(2.5)]),
        ])
        .unwrap();
        let text = String::from_utf8(to_csv_bytes(&ds).unwrap()).unwrap();
        assert_eq!(text, "name,v\n\"a, b\",2\n,2.5\n");
    }

    #[test]
    fn test_zero_rows_still_writes_header() {
        let ds = Dataset::new(vec![Column::numeric("v", [])]).unwrap();
        assert_eq!(to_csv_bytes(&ds).unwrap(), b"v\n");
    }

    #[test]
    fn test_exported_csv_reads_back() {
        let source = "city,temp\nOslo,3.5\nLima,\nOslo,-1\n";
        let ds = read_csv(source.as_bytes()).unwrap();
        let again = read_csv(to_csv_bytes(&ds).unwrap().as_slice()).unwrap();
        assert_eq!(again, ds);
    }

    #[test]
    fn test_save_csv_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("filtered_data.csv");
        let ds = Dataset::new(vec![Column::numeric("v", [Some(1.0)])]).unwrap();
        save_csv(&ds, &path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "v\n1\n");
    }
}
