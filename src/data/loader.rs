//! CSV Data Loader Module
//! Reads the observation table into a Polars DataFrame.

use polars::prelude::*;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Input file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
}

/// Loads observation tables with Polars.
pub struct DataLoader;

impl DataLoader {
    /// Load a CSV file into a DataFrame.
    ///
    /// Cells that do not parse as the inferred column type become null
    /// instead of failing the whole load.
    pub fn load_csv(path: &Path) -> Result<DataFrame, LoaderError> {
        if !path.is_file() {
            return Err(LoaderError::NotFound(path.to_path_buf()));
        }

        let df = LazyCsvReader::new(path)
            .with_infer_schema_length(Some(10000))
            .with_ignore_errors(true)
            .finish()?
            .collect()?;

        tracing::debug!(
            path = %path.display(),
            columns = ?Self::get_columns(&df),
            "parsed CSV"
        );
        Ok(df)
    }

    /// Get list of column names.
    pub fn get_columns(df: &DataFrame) -> Vec<String> {
        df.get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    /// Distinct non-null values of a column as text, sorted.
    /// A missing column yields no values.
    pub fn distinct_values(df: &DataFrame, column: &str) -> Vec<String> {
        let Ok(text) = df.column(column).and_then(|c| c.cast(&DataType::String)) else {
            return Vec::new();
        };
        let Ok(values) = text.str() else {
            return Vec::new();
        };
        values
            .into_iter()
            .flatten()
            .collect::<BTreeSet<&str>>()
            .into_iter()
            .map(str::to_string)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".csv")
            .tempfile()
            .expect("failed to create temp file");
        file.write_all(contents.as_bytes())
            .expect("failed to write temp file");
        file
    }

    #[test]
    fn loads_all_rows_and_columns() {
        let file = write_csv(
            "Type,Duration,Feature,Normalized_ATE\n\
             IBS_R,0,A,0.5\n\
             IBS_R,10,B,-0.25\n\
             OBS_T,10,A,1.0\n",
        );

        let df = DataLoader::load_csv(file.path()).unwrap();
        assert_eq!(df.height(), 3);
        assert_eq!(
            DataLoader::get_columns(&df),
            vec!["Type", "Duration", "Feature", "Normalized_ATE"]
        );
    }

    #[test]
    fn missing_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ate-bad-dates.csv");

        match DataLoader::load_csv(&path) {
            Err(LoaderError::NotFound(p)) => assert_eq!(p, path),
            other => panic!("expected NotFound, got {:?}", other.map(|df| df.height())),
        }
    }

    #[test]
    fn malformed_numbers_do_not_fail_the_load() {
        let file = write_csv(
            "Type,Duration,Feature,Normalized_ATE\n\
             IBS_R,0,A,0.5\n\
             IBS_R,1,A,not-a-number\n",
        );

        let df = DataLoader::load_csv(file.path()).unwrap();
        assert_eq!(df.height(), 2);
        let values = df
            .column("Normalized_ATE")
            .unwrap()
            .cast(&DataType::Float64)
            .unwrap();
        assert_eq!(values.null_count(), 1);
    }

    #[test]
    fn distinct_values_are_sorted_and_skip_nulls() {
        let df = df!(
            "Type" => &[Some("OBS_N"), Some("IBS_R"), None, Some("OBS_N"), Some("XYZ")],
            "Duration" => &[10i64, 0, 5, 10, 0]
        )
        .unwrap();

        assert_eq!(
            DataLoader::distinct_values(&df, "Type"),
            vec!["IBS_R", "OBS_N", "XYZ"]
        );
        assert_eq!(DataLoader::distinct_values(&df, "Duration"), vec!["0", "10", "5"]);
        assert!(DataLoader::distinct_values(&df, "Missing").is_empty());
    }
}
