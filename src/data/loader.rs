use std::collections::BTreeSet;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result, bail};

use super::model::{Column, Dataset};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a dataset from a `.csv` file.
pub fn load_file(path: &Path) -> Result<Dataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    if ext != "csv" {
        bail!("Unsupported file extension: .{ext} (expected .csv)");
    }

    let file = std::fs::File::open(path)
        .with_context(|| format!("opening {}", path.display()))?;
    let dataset = read_csv(file).with_context(|| format!("loading {}", path.display()))?;

    log::info!(
        "Loaded {} rows x {} columns from {}",
        dataset.row_count(),
        dataset.column_count(),
        path.display()
    );
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// CSV reader
// ---------------------------------------------------------------------------

/// CSV layout: a header row with column names, then one record per row.
/// Every record must have as many fields as the header. Column kinds are
/// inferred from the full column once all records are read.
pub fn read_csv<R: Read>(source: R) -> Result<Dataset> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(source);

    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
        bail!("CSV has no header row");
    }

    let mut seen = BTreeSet::new();
    for h in &headers {
        if !seen.insert(h.as_str()) {
            bail!("CSV header repeats column '{h}'");
        }
    }

    let mut raw: Vec<Vec<String>> = vec![Vec::new(); headers.len()];

    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        for (col_idx, value) in record.iter().enumerate() {
            raw[col_idx].push(value.to_string());
        }
    }

    let columns = headers
        .iter()
        .zip(raw)
        .map(|(name, cells)| Column::from_raw(name.clone(), &cells))
        .collect();

    let dataset = Dataset::new(columns).context("assembling dataset")?;
    log::debug!(
        "Inferred column kinds: {:?}",
        dataset
            .columns()
            .iter()
            .map(|c| (c.name(), c.kind()))
            .collect::<Vec<_>>()
    );
    Ok(dataset)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::data::model::{Cell, ColumnKind};

    #[test]
    fn test_read_csv_infers_kinds() {
        let text = "category,value,count\nA,1.5,3\nB,2.0,4\n";
        let ds = read_csv(text.as_bytes()).unwrap();
        assert_eq!(ds.row_count(), 2);
        assert_eq!(ds.column("category").unwrap().kind(), ColumnKind::Categorical);
        assert_eq!(ds.column("value").unwrap().kind(), ColumnKind::Numeric);
        assert_eq!(ds.column("count").unwrap().kind(), ColumnKind::Numeric);
    }

    #[test]
    fn test_read_csv_keeps_header_order() {
        let ds = read_csv("z,a,m\n1,2,3\n".as_bytes()).unwrap();
        assert_eq!(ds.column_names().collect::<Vec<_>>(), vec!["z", "a", "m"]);
    }

    #[test]
    fn test_missing_cells() {
        let text = "name,score\nann,\n,NA\nbob,7\n";
        let ds = read_csv(text.as_bytes()).unwrap();
        assert_eq!(ds.row(0), vec![Cell::Text("ann"), Cell::Missing]);
        assert_eq!(ds.row(1), vec![Cell::Missing, Cell::Missing]);
        assert_eq!(ds.column("score").unwrap().kind(), ColumnKind::Numeric);
    }

    #[test]
    fn test_header_only_gives_zero_rows() {
        let ds = read_csv("a,b\n".as_bytes()).unwrap();
        assert_eq!(ds.row_count(), 0);
        assert_eq!(ds.column_count(), 2);
    }

    #[test]
    fn test_empty_input_is_error() {
        assert!(read_csv("".as_bytes()).is_err());
    }

    #[test]
    fn test_ragged_row_is_error() {
        let err = read_csv("a,b\n1,2\n3\n".as_bytes()).unwrap_err();
        assert!(format!("{err:#}").contains("CSV row 1"));
    }

    #[test]
    fn test_duplicate_header_is_error() {
        let err = read_csv("a,a\n1,2\n".as_bytes()).unwrap_err();
        assert!(err.to_string().contains("'a'"));
    }

    #[test]
    fn test_load_file_rejects_other_extensions() {
        let err = load_file(Path::new("data.parquet")).unwrap_err();
        assert!(err.to_string().contains("Unsupported file extension"));
    }

    #[test]
    fn test_load_file_from_disk() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "x,y").unwrap();
        writeln!(file, "1,2").unwrap();
        let ds = load_file(file.path()).unwrap();
        assert_eq!(ds.row_count(), 1);
    }
}
