//! CSV loading and writing for the dataset, metadata and feature tables.

use crate::error::{CliError, Result};
use pepmetrics::core::table::DataTable;
use std::fs::File;
use std::io;
use std::path::Path;
use tracing::info;

pub fn load_table(path: &Path) -> Result<DataTable> {
    let file = File::open(path).map_err(|e| CliError::FileParsing {
        path: path.to_path_buf(),
        source: e.into(),
    })?;
    let table = DataTable::from_csv(file).map_err(|e| CliError::FileParsing {
        path: path.to_path_buf(),
        source: anyhow::anyhow!(e),
    })?;
    info!(
        path = %path.display(),
        rows = table.n_rows(),
        columns = table.columns().len(),
        "table loaded"
    );
    Ok(table)
}

/// Writes the table to the given path, or to standard output when no
/// path is set.
pub fn write_table(table: &DataTable, path: Option<&Path>) -> Result<()> {
    match path {
        Some(path) => {
            let file = File::create(path)?;
            table.write_csv(file)?;
            info!(path = %path.display(), rows = table.n_rows(), "table written");
        }
        None => table.write_csv(io::stdout().lock())?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn csv_tables_round_trip_through_the_filesystem() {
        let mut input = NamedTempFile::new().unwrap();
        writeln!(input, "Sample,Peptide Sequence,Intensity").unwrap();
        writeln!(input, "s1,PEPTIDE,900.5").unwrap();
        writeln!(input, "s2,GRAVY,1200").unwrap();

        let table = load_table(input.path()).unwrap();
        assert_eq!(table.n_rows(), 2);

        let output = NamedTempFile::new().unwrap();
        write_table(&table, Some(output.path())).unwrap();
        let round = load_table(output.path()).unwrap();
        assert_eq!(table, round);
    }

    #[test]
    fn missing_files_name_the_offending_path() {
        let err = load_table(Path::new("/nonexistent/data.csv")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/data.csv"));
    }
}
