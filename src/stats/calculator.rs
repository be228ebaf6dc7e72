//! Survival Statistics Calculator Module
//! Group-wise survival rate and head count.
//!
//! Aggregation is a two-step fold: survival flags are partitioned by key,
//! then each partition is reduced to `(mean, count)`. Keys are stored in a
//! `BTreeMap`, so output rows follow the key's `Ord` and unobserved keys never
//! appear.

use crate::data::columns::{self, AGE_GROUP, PCLASS, SEX, SURVIVED};
use crate::data::AgeGroup;
use polars::prelude::*;
use serde::Serialize;
use statrs::statistics::Statistics;
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum StatsError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("Column {column} has a missing value at row {row}")]
    MissingValue { column: &'static str, row: usize },
    #[error("Unknown age group {0:?}")]
    UnknownAgeGroup(String),
}

/// Survival summary for one group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SurvivalStats<K> {
    pub key: K,
    /// Mean survival flag, in [0, 1].
    pub survival_rate: f64,
    pub count: usize,
}

/// Passenger class and sex pair. Orders by class first.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ClassSex {
    pub pclass: i64,
    pub sex: String,
}

pub struct SurvivalCalculator;

impl SurvivalCalculator {
    /// Survival by age group, in category order.
    pub fn by_age_group(df: &DataFrame) -> Result<Vec<SurvivalStats<AgeGroup>>, StatsError> {
        let keys = columns::str_values(df, AGE_GROUP)?
            .into_iter()
            .enumerate()
            .map(|(row, label)| {
                let label = label.ok_or(StatsError::MissingValue {
                    column: AGE_GROUP,
                    row,
                })?;
                AgeGroup::from_label(&label).ok_or(StatsError::UnknownAgeGroup(label))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let stats = Self::summarize(Self::partition(keys, Self::survival_flags(df)?));
        debug!(groups = stats.len(), "aggregated survival by age group");
        Ok(stats)
    }

    /// Survival by (class, sex), ordered by class then sex.
    pub fn by_class_and_sex(df: &DataFrame) -> Result<Vec<SurvivalStats<ClassSex>>, StatsError> {
        let classes = columns::i64_values(df, PCLASS)?;
        let sexes = columns::str_values(df, SEX)?;

        let keys = classes
            .into_iter()
            .zip(sexes)
            .enumerate()
            .map(|(row, pair)| match pair {
                (Some(pclass), Some(sex)) => Ok(ClassSex { pclass, sex }),
                (None, _) => Err(StatsError::MissingValue { column: PCLASS, row }),
                (_, None) => Err(StatsError::MissingValue { column: SEX, row }),
            })
            .collect::<Result<Vec<_>, _>>()?;

        let stats = Self::summarize(Self::partition(keys, Self::survival_flags(df)?));
        debug!(groups = stats.len(), "aggregated survival by class and sex");
        Ok(stats)
    }

    /// Group survival flags by key, one partition per observed key.
    pub fn partition<K: Ord>(keys: Vec<K>, flags: Vec<f64>) -> BTreeMap<K, Vec<f64>> {
        let mut partitions: BTreeMap<K, Vec<f64>> = BTreeMap::new();
        for (key, flag) in keys.into_iter().zip(flags) {
            partitions.entry(key).or_default().push(flag);
        }
        partitions
    }

    /// Reduce each partition to its survival rate and count.
    pub fn summarize<K>(partitions: BTreeMap<K, Vec<f64>>) -> Vec<SurvivalStats<K>> {
        partitions
            .into_iter()
            .map(|(key, flags)| SurvivalStats {
                key,
                count: flags.len(),
                survival_rate: flags.iter().mean(),
            })
            .collect()
    }

    fn survival_flags(df: &DataFrame) -> Result<Vec<f64>, StatsError> {
        columns::f64_values(df, SURVIVED)?
            .into_iter()
            .enumerate()
            .map(|(row, v)| v.ok_or(StatsError::MissingValue { column: SURVIVED, row }))
            .collect()
    }
}
