//! Deal CSV Loader Module
//! Loads the transaction CSV with Polars and normalizes it to the canonical deal columns.

use crate::config::ColumnNames;
use crate::data::model::{
    date_from_epoch_days, AMOUNT_COL, DEAL_DATE_COL, HOUSE_TYPE_COL, REGION_COL,
};
use chrono::Datelike;
use polars::prelude::*;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
}

/// Holds the loaded deal table.
pub struct DataLoader {
    df: Option<DataFrame>,
    file_path: Option<PathBuf>,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DataLoader {
    pub fn new() -> Self {
        Self {
            df: None,
            file_path: None,
        }
    }

    /// Read and normalize a deal CSV. Safe to call from a worker thread.
    pub fn read_csv(
        file_path: &Path,
        columns: &ColumnNames,
        date_format: &str,
    ) -> Result<DataFrame, LoaderError> {
        debug!(path = %file_path.display(), "reading deal CSV");

        let lazy = LazyCsvReader::new(file_path)
            .with_infer_schema_length(Some(10000))
            .with_ignore_errors(true)
            .finish()?;

        let df = Self::normalize(lazy, columns, date_format).collect()?;
        info!(rows = df.height(), path = %file_path.display(), "deal CSV loaded");
        Ok(df)
    }

    /// Project the source columns onto `SGG_NM`, `HOUSE_TYPE`, `DEAL_YMD` (Date) and `OBJ_AMT` (f64).
    ///
    /// Dates that do not match `date_format` become null.
    pub fn normalize(lazy: LazyFrame, columns: &ColumnNames, date_format: &str) -> LazyFrame {
        let date_options = StrptimeOptions {
            format: Some(date_format.into()),
            strict: false,
            ..Default::default()
        };

        lazy.select([
            col(columns.region.as_str())
                .cast(DataType::String)
                .alias(REGION_COL),
            col(columns.house_type.as_str())
                .cast(DataType::String)
                .alias(HOUSE_TYPE_COL),
            col(columns.deal_date.as_str())
                .cast(DataType::String)
                .str()
                .to_date(date_options)
                .alias(DEAL_DATE_COL),
            col(columns.amount.as_str())
                .cast(DataType::Float64)
                .alias(AMOUNT_COL),
        ])
    }

    /// Distinct region names, sorted.
    pub fn get_regions(&self) -> Vec<String> {
        self.get_unique_values(REGION_COL)
    }

    /// Distinct house type values present in the data, sorted.
    pub fn get_house_types(&self) -> Vec<String> {
        self.get_unique_values(HOUSE_TYPE_COL)
    }

    /// Distinct deal months (1-12) present in the data, sorted.
    pub fn get_months(&self) -> Vec<u32> {
        let Some(df) = &self.df else {
            return Vec::new();
        };

        df.column(DEAL_DATE_COL)
            .ok()
            .and_then(|column| column.cast(&DataType::Int32).ok())
            .and_then(|days| {
                days.i32().ok().map(|ca| {
                    ca.into_iter()
                        .flatten()
                        .filter_map(date_from_epoch_days)
                        .map(|date| date.month())
                        .collect::<BTreeSet<u32>>()
                })
            })
            .map(|months| months.into_iter().collect())
            .unwrap_or_default()
    }

    /// Get sorted unique non-null values of a string column.
    pub fn get_unique_values(&self, column: &str) -> Vec<String> {
        let Some(df) = &self.df else {
            return Vec::new();
        };

        df.column(column)
            .ok()
            .and_then(|col| col.str().ok())
            .map(|ca| {
                ca.into_iter()
                    .flatten()
                    .map(|value| value.to_string())
                    .collect::<BTreeSet<String>>()
                    .into_iter()
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Get the number of rows in the DataFrame.
    pub fn get_row_count(&self) -> usize {
        self.df.as_ref().map(|df| df.height()).unwrap_or(0)
    }

    /// Get a reference to the loaded DataFrame.
    pub fn get_dataframe(&self) -> Option<&DataFrame> {
        self.df.as_ref()
    }

    /// Get file path.
    pub fn get_file_path(&self) -> Option<&PathBuf> {
        self.file_path.as_ref()
    }

    /// Set DataFrame directly (used for async loading)
    pub fn set_dataframe(&mut self, df: DataFrame, file_path: Option<PathBuf>) {
        self.df = Some(df);
        self.file_path = file_path;
    }
}

/// Normalize an in-memory frame that already uses the canonical column names.
#[cfg(test)]
pub fn normalized_fixture(df: DataFrame) -> DataFrame {
    DataLoader::normalize(df.lazy(), &ColumnNames::default(), "%Y-%m-%d")
        .collect()
        .unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const CSV: &str = "\
GU,TYPE,DATE,PRICE
종로구,아파트,2024-01-05,100
종로구,아파트,2024-01-05,300
강남구,오피스텔,2024-03-10,250
강남구,연립다세대,not-a-date,90
";

    fn custom_columns() -> ColumnNames {
        ColumnNames {
            region: "GU".to_string(),
            house_type: "TYPE".to_string(),
            deal_date: "DATE".to_string(),
            amount: "PRICE".to_string(),
        }
    }

    fn load_fixture(temp_dir: &TempDir) -> (DataLoader, PathBuf) {
        let path = temp_dir.path().join("deals.csv");
        std::fs::write(&path, CSV).unwrap();

        let df = DataLoader::read_csv(&path, &custom_columns(), "%Y-%m-%d").unwrap();
        let mut loader = DataLoader::new();
        loader.set_dataframe(df, Some(path.clone()));
        (loader, path)
    }

    #[test]
    fn test_read_csv_renames_and_parses() {
        let temp_dir = TempDir::new().unwrap();
        let (loader, path) = load_fixture(&temp_dir);
        let df = loader.get_dataframe().unwrap();

        assert_eq!(df.height(), 4);
        assert_eq!(
            df.get_column_names()
                .iter()
                .map(|s| s.to_string())
                .collect::<Vec<_>>(),
            vec!["SGG_NM", "HOUSE_TYPE", "DEAL_YMD", "OBJ_AMT"]
        );
        assert_eq!(df.column(DEAL_DATE_COL).unwrap().dtype(), &DataType::Date);
        assert_eq!(df.column(AMOUNT_COL).unwrap().dtype(), &DataType::Float64);
        // Unparseable date is kept as null rather than failing the load.
        assert_eq!(df.column(DEAL_DATE_COL).unwrap().null_count(), 1);
        assert_eq!(loader.get_file_path(), Some(&path));
    }

    #[test]
    fn test_distinct_values() {
        let temp_dir = TempDir::new().unwrap();
        let (loader, _) = load_fixture(&temp_dir);

        assert_eq!(loader.get_regions(), vec!["강남구", "종로구"]);
        assert_eq!(
            loader.get_house_types(),
            vec!["아파트", "연립다세대", "오피스텔"]
        );
        assert_eq!(loader.get_months(), vec![1, 3]);
        assert_eq!(loader.get_row_count(), 4);
    }

    #[test]
    fn test_empty_loader() {
        let loader = DataLoader::new();
        assert!(loader.get_regions().is_empty());
        assert!(loader.get_months().is_empty());
        assert_eq!(loader.get_row_count(), 0);
        assert!(loader.get_dataframe().is_none());
    }

    #[test]
    fn test_missing_file_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let result = DataLoader::read_csv(
            &temp_dir.path().join("nope.csv"),
            &ColumnNames::default(),
            "%Y-%m-%d",
        );
        assert!(result.is_err());
    }
}
