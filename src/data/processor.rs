//! Data Processor Module
//! Missing-value imputation and derived columns for the passenger table.
//!
//! Every step takes a `&DataFrame` and returns a new one; the loaded table is
//! never modified.

use super::age_group::AgeGroup;
use super::columns::{self, AGE, AGE_GROUP, CABIN, EMBARKED, SURVIVED};
use polars::prelude::*;
use statrs::statistics::{Data, Median};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum ProcessorError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("Column {0} has no values to impute from")]
    EmptyColumn(&'static str),
    #[error("Column {0} still has missing values")]
    MissingValues(&'static str),
    #[error("Age {0} is outside every age group")]
    AgeOutOfRange(f64),
}

/// Cleans and enriches the passenger table.
pub struct DataProcessor;

impl DataProcessor {
    /// Run every preprocessing step in order:
    /// age imputation, port imputation, cabin removal, age grouping,
    /// survival flag normalization.
    pub fn preprocess(df: &DataFrame) -> Result<DataFrame, ProcessorError> {
        let df = Self::fill_missing_age(df)?;
        let df = Self::fill_missing_embarked(&df)?;
        let df = Self::drop_cabin(&df)?;
        let df = Self::derive_age_group(&df)?;
        let df = Self::normalize_survived(&df)?;

        info!(rows = df.height(), "preprocessing complete");
        Ok(df)
    }

    /// Replace missing ages with the median of the observed ages.
    pub fn fill_missing_age(df: &DataFrame) -> Result<DataFrame, ProcessorError> {
        let ages = columns::f64_values(df, AGE)?;
        let median = Self::median(&ages).ok_or(ProcessorError::EmptyColumn(AGE))?;

        let missing = ages.iter().filter(|a| a.is_none()).count();
        let filled: Vec<f64> = ages.into_iter().map(|a| a.unwrap_or(median)).collect();
        debug!(median, missing, "filled missing ages");

        let mut out = df.clone();
        out.with_column(Column::new(AGE.into(), filled))?;
        Ok(out)
    }

    /// Replace missing embarkation ports with the most frequent port.
    pub fn fill_missing_embarked(df: &DataFrame) -> Result<DataFrame, ProcessorError> {
        let ports = columns::str_values(df, EMBARKED)?;
        let mode = Self::mode(&ports).ok_or(ProcessorError::EmptyColumn(EMBARKED))?;

        let missing = ports.iter().filter(|p| p.is_none()).count();
        let filled: Vec<String> = ports
            .into_iter()
            .map(|p| p.unwrap_or_else(|| mode.clone()))
            .collect();
        debug!(%mode, missing, "filled missing embarkation ports");

        let mut out = df.clone();
        out.with_column(Column::new(EMBARKED.into(), filled))?;
        Ok(out)
    }

    /// Remove the cabin column. A table without one is returned unchanged.
    pub fn drop_cabin(df: &DataFrame) -> Result<DataFrame, ProcessorError> {
        if df.column(CABIN).is_err() {
            return Ok(df.clone());
        }
        Ok(df.drop(CABIN)?)
    }

    /// Add (or replace) the `AgeGroup` column from `Age`.
    pub fn derive_age_group(df: &DataFrame) -> Result<DataFrame, ProcessorError> {
        let groups = columns::f64_values(df, AGE)?
            .into_iter()
            .map(|age| {
                let age = age.ok_or(ProcessorError::MissingValues(AGE))?;
                AgeGroup::from_age(age)
                    .map(|g| g.label())
                    .ok_or(ProcessorError::AgeOutOfRange(age))
            })
            .collect::<Result<Vec<&str>, _>>()?;

        let mut out = df.clone();
        out.with_column(Column::new(AGE_GROUP.into(), groups))?;
        Ok(out)
    }

    /// Store the survival flag as Int32 0/1.
    pub fn normalize_survived(df: &DataFrame) -> Result<DataFrame, ProcessorError> {
        let flags = columns::i64_values(df, SURVIVED)?
            .into_iter()
            .map(|v| {
                v.map(|v| i32::from(v != 0))
                    .ok_or(ProcessorError::MissingValues(SURVIVED))
            })
            .collect::<Result<Vec<i32>, _>>()?;

        let mut out = df.clone();
        out.with_column(Column::new(SURVIVED.into(), flags))?;
        Ok(out)
    }

    /// Median of the non-missing values, or `None` when there are none.
    pub fn median(values: &[Option<f64>]) -> Option<f64> {
        let observed: Vec<f64> = values.iter().flatten().copied().collect();
        if observed.is_empty() {
            return None;
        }
        Some(Data::new(observed).median())
    }

    /// Most frequent non-missing value. Ties go to the lexicographically
    /// smallest value.
    pub fn mode(values: &[Option<String>]) -> Option<String> {
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for value in values.iter().flatten() {
            *counts.entry(value.as_str()).or_default() += 1;
        }

        counts
            .into_iter()
            .fold(None, |best: Option<(&str, usize)>, (value, n)| match best {
                Some((_, best_n)) if best_n >= n => best,
                _ => Some((value, n)),
            })
            .map(|(value, _)| value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::columns::{f64_values, i64_values, str_values};

    /// Four passengers with one missing age and one missing port.
    fn sample() -> DataFrame {
        df!(
            "Survived" => [1i64, 0, 1, 0],
            "Pclass" => [3i64, 1, 2, 1],
            "Name" => ["A", "B", "C", "D"],
            "Sex" => ["female", "male", "female", "male"],
            "Age" => [Some(5.0), None, Some(30.0), Some(70.0)],
            "Fare" => [7.25, 71.28, 13.0, 30.5],
            "Cabin" => [None, Some("C85"), None, None],
            "Embarked" => [Some("S"), Some("C"), None, Some("S")]
        )
        .unwrap()
    }

    #[test]
    fn test_preprocess_imputes_and_groups() {
        let df = DataProcessor::preprocess(&sample()).unwrap();

        assert_eq!(
            f64_values(&df, AGE).unwrap(),
            vec![Some(5.0), Some(30.0), Some(30.0), Some(70.0)]
        );
        assert_eq!(
            str_values(&df, EMBARKED).unwrap(),
            vec![
                Some("S".to_string()),
                Some("C".to_string()),
                Some("S".to_string()),
                Some("S".to_string())
            ]
        );
        assert_eq!(
            str_values(&df, AGE_GROUP).unwrap(),
            vec![
                Some("Child".to_string()),
                Some("Adult".to_string()),
                Some("Adult".to_string()),
                Some("Senior".to_string())
            ]
        );
        assert!(df.column(CABIN).is_err());
        assert_eq!(df.column(SURVIVED).unwrap().dtype(), &DataType::Int32);
    }

    #[test]
    fn test_preprocess_leaves_input_untouched() {
        let raw = sample();
        let _ = DataProcessor::preprocess(&raw).unwrap();

        assert!(raw.column(CABIN).is_ok());
        assert!(raw.column(AGE_GROUP).is_err());
        assert_eq!(raw.column(AGE).unwrap().null_count(), 1);
    }

    #[test]
    fn test_preprocess_is_idempotent() {
        let once = DataProcessor::preprocess(&sample()).unwrap();
        let twice = DataProcessor::preprocess(&once).unwrap();

        assert_eq!(f64_values(&once, AGE).unwrap(), f64_values(&twice, AGE).unwrap());
        assert_eq!(
            str_values(&once, EMBARKED).unwrap(),
            str_values(&twice, EMBARKED).unwrap()
        );
        assert_eq!(
            str_values(&once, AGE_GROUP).unwrap(),
            str_values(&twice, AGE_GROUP).unwrap()
        );
        assert_eq!(
            i64_values(&once, SURVIVED).unwrap(),
            i64_values(&twice, SURVIVED).unwrap()
        );
        assert_eq!(once.width(), twice.width());
    }

    #[test]
    fn test_every_row_has_a_matching_group() {
        let df = DataProcessor::preprocess(&sample()).unwrap();
        let ages = f64_values(&df, AGE).unwrap();
        let groups = str_values(&df, AGE_GROUP).unwrap();

        for (age, group) in ages.into_iter().zip(groups) {
            let expected = AgeGroup::from_age(age.unwrap()).unwrap();
            assert_eq!(group.as_deref(), Some(expected.label()));
        }
    }

    #[test]
    fn test_median_is_computed_before_replacement() {
        let values = [Some(1.0), None, None, Some(2.0), Some(10.0), Some(3.0)];
        assert_eq!(DataProcessor::median(&values), Some(2.5));
        assert_eq!(DataProcessor::median(&[None, None]), None);
    }

    #[test]
    fn test_mode_tie_breaks_lexicographically() {
        let values: Vec<Option<String>> = ["S", "C", "Q", "C", "S"]
            .iter()
            .map(|s| Some(s.to_string()))
            .chain([None, None, None])
            .collect();
        assert_eq!(DataProcessor::mode(&values), Some("C".to_string()));
        assert_eq!(DataProcessor::mode(&[None]), None);
    }

    #[test]
    fn test_all_missing_ages_is_fatal() {
        let df = df!(
            "Age" => [None::<f64>, None],
            "Embarked" => ["S", "C"]
        )
        .unwrap();
        assert!(matches!(
            DataProcessor::fill_missing_age(&df),
            Err(ProcessorError::EmptyColumn("Age"))
        ));
    }

    #[test]
    fn test_all_missing_ports_is_fatal() {
        let df = df!("Embarked" => [None::<&str>, None]).unwrap();
        assert!(matches!(
            DataProcessor::fill_missing_embarked(&df),
            Err(ProcessorError::EmptyColumn("Embarked"))
        ));
    }

    #[test]
    fn test_out_of_range_age_is_rejected() {
        let df = df!("Age" => [30.0, 120.0]).unwrap();
        assert!(matches!(
            DataProcessor::derive_age_group(&df),
            Err(ProcessorError::AgeOutOfRange(a)) if a == 120.0
        ));
    }

    #[test]
    fn test_boolean_survival_flags_become_integers() {
        let df = df!("Survived" => [true, false, true]).unwrap();
        let df = DataProcessor::normalize_survived(&df).unwrap();
        assert_eq!(
            i64_values(&df, SURVIVED).unwrap(),
            vec![Some(1), Some(0), Some(1)]
        );
    }
}
