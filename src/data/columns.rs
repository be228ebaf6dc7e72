//! Column names of the passenger dataset and typed extraction helpers.

use polars::prelude::*;

pub const SURVIVED: &str = "Survived";
pub const PCLASS: &str = "Pclass";
pub const NAME: &str = "Name";
pub const SEX: &str = "Sex";
pub const AGE: &str = "Age";
pub const FARE: &str = "Fare";
pub const CABIN: &str = "Cabin";
pub const EMBARKED: &str = "Embarked";
pub const AGE_GROUP: &str = "AgeGroup";

/// Columns every loaded dataset must carry.
pub const REQUIRED_COLUMNS: [&str; 8] = [SURVIVED, PCLASS, NAME, SEX, AGE, FARE, CABIN, EMBARKED];

/// Read a column as nullable f64 values, casting numeric types as needed.
pub fn f64_values(df: &DataFrame, name: &str) -> PolarsResult<Vec<Option<f64>>> {
    let column = df.column(name)?.cast(&DataType::Float64)?;
    Ok(column.f64()?.into_iter().collect())
}

/// Read a column as nullable i64 values.
pub fn i64_values(df: &DataFrame, name: &str) -> PolarsResult<Vec<Option<i64>>> {
    let column = df.column(name)?.cast(&DataType::Int64)?;
    Ok(column.i64()?.into_iter().collect())
}

/// Read a column as nullable owned strings.
pub fn str_values(df: &DataFrame, name: &str) -> PolarsResult<Vec<Option<String>>> {
    let column = df.column(name)?.cast(&DataType::String)?;
    let values = column
        .as_materialized_series()
        .str()?
        .into_iter()
        .map(|v| v.map(str::to_string))
        .collect();
    Ok(values)
}
