use std::fs::File;
use std::io::Write;
use std::path::Path;

use energy_core::pipeline::ExportTable;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("cannot create '{path}': {source}")]
    Create {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Writes the header row followed by every data row, in order.
pub fn write_csv<W: Write>(
    table: &ExportTable,
    writer: W,
) -> Result<(), ExportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(&table.headers)?;
    for row in &table.rows {
        csv_writer.write_record(row)?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn write_csv_file(
    table: &ExportTable,
    path: &Path,
) -> Result<(), ExportError> {
    let file = File::create(path).map_err(|source| ExportError::Create {
        path: path.display().to_string(),
        source,
    })?;
    write_csv(table, file)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn table() -> ExportTable {
        ExportTable {
            title: "Wind Energy Production".into(),
            headers: vec!["Year".into(), "Wind Production (GWh)".into(), "Type".into()],
            rows: vec![
                vec!["2025".into(), "150.00".into(), "Predicted".into()],
                vec!["2020".into(), "N/A".into(), "Historical".into()],
            ],
        }
    }

    #[test]
    fn writes_header_then_rows_in_order() {
        let mut out = Vec::new();

        write_csv(&table(), &mut out).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Year,Wind Production (GWh),Type\n2025,150.00,Predicted\n2020,N/A,Historical\n"
        );
    }

    #[test]
    fn write_csv_file_reports_bad_path() {
        let err = write_csv_file(&table(), Path::new("/nonexistent/dir/out.csv")).unwrap_err();

        assert!(matches!(err, ExportError::Create { .. }));
    }
}
