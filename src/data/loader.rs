//! CSV Data Loader Module
//! Reads the passenger dataset into a Polars DataFrame.

use super::columns::REQUIRED_COLUMNS;
use polars::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Dataset not found: {0}")]
    NotFound(PathBuf),
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
    #[error("Dataset is missing required column {0:?}")]
    MissingColumn(&'static str),
}

/// Loads the passenger CSV with Polars.
pub struct DataLoader;

impl DataLoader {
    /// Load a CSV file and check that every required column is present.
    ///
    /// Parse errors are not ignored: a malformed file fails the load.
    pub fn load_csv(file_path: &Path) -> Result<DataFrame, LoaderError> {
        if !file_path.is_file() {
            return Err(LoaderError::NotFound(file_path.to_path_buf()));
        }

        let df = LazyCsvReader::new(file_path)
            .with_infer_schema_length(Some(10000))
            .with_has_header(true)
            .finish()?
            .collect()?;

        Self::check_columns(&df)?;

        info!(
            path = %file_path.display(),
            rows = df.height(),
            columns = df.width(),
            "loaded passenger dataset"
        );
        Ok(df)
    }

    fn check_columns(df: &DataFrame) -> Result<(), LoaderError> {
        match REQUIRED_COLUMNS
            .iter()
            .copied()
            .find(|name| df.column(name).is_err())
        {
            Some(name) => Err(LoaderError::MissingColumn(name)),
            None => Ok(()),
        }
    }
}
