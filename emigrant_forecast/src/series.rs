//! Yearly observation series loaded from the statistics CSV layouts
//!
//! Two layouts exist in the source data: wide files with a `year` column and
//! one numeric column per category (gender, education, marital status), and
//! the long age file with `year, ageGroup, count` rows.

use crate::error::{ForecastError, Result};
use polars::prelude::*;
use std::collections::BTreeMap;
use std::fs::File;
use std::path::Path;

/// Ordered sequence of scalar observations indexed by year for one category.
#[derive(Debug, Clone, PartialEq)]
pub struct YearlySeries {
    years: Vec<i32>,
    values: Vec<f64>,
}

impl YearlySeries {
    /// Create a series from parallel year/value vectors.
    pub fn new(years: Vec<i32>, values: Vec<f64>) -> Result<Self> {
        if years.is_empty() {
            return Err(ForecastError::DataError(
                "Series must contain at least one observation".to_string(),
            ));
        }
        if years.len() != values.len() {
            return Err(ForecastError::DataError(format!(
                "Series has {} years but {} values",
                years.len(),
                values.len()
            )));
        }

        Ok(Self { years, values })
    }

    /// Observed values, oldest first.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Observation years.
    pub fn years(&self) -> &[i32] {
        &self.years
    }

    /// Number of observations.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the series holds no observations.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Latest observed year.
    pub fn last_year(&self) -> i32 {
        self.years.iter().copied().max().unwrap_or(0)
    }

    /// Year labels for a forecast of `steps` points past the last
    /// observation: `[last+1, last+steps]`.
    pub fn future_years(&self, steps: usize) -> Vec<i32> {
        let last = self.last_year();
        (1..=steps as i32).map(|offset| last + offset).collect()
    }
}

/// Load one category column from a wide CSV (`year` plus one column per
/// category).
pub fn load_wide_csv(path: &Path, column: &str) -> Result<YearlySeries> {
    let df = read_csv(path)?;
    let years = column_as_i32(&df, "year")?;
    let values = column_as_f64(&df, column)?;
    YearlySeries::new(years, values)
}

/// Load several category columns from a wide CSV in one read, in the
/// requested order.
pub fn load_wide_columns(path: &Path, columns: &[String]) -> Result<Vec<(String, YearlySeries)>> {
    let df = read_csv(path)?;
    let years = column_as_i32(&df, "year")?;

    columns
        .iter()
        .map(|column| {
            let values = column_as_f64(&df, column)?;
            Ok((column.clone(), YearlySeries::new(years.clone(), values)?))
        })
        .collect()
}

/// Load every age group from the long CSV (`year, ageGroup, count`), keyed
/// by the canonical group name.
pub fn load_age_groups(path: &Path) -> Result<BTreeMap<String, YearlySeries>> {
    let df = read_csv(path)?;
    let years = column_as_i32(&df, "year")?;
    let groups = column_as_strings(&df, "ageGroup")?;
    let counts = column_as_f64(&df, "count")?;

    if years.len() != groups.len() || years.len() != counts.len() {
        return Err(ForecastError::DataError(
            "Age CSV columns have mismatched lengths".to_string(),
        ));
    }

    let mut grouped: BTreeMap<String, (Vec<i32>, Vec<f64>)> = BTreeMap::new();
    for ((year, group), count) in years.iter().zip(&groups).zip(&counts) {
        let entry = grouped.entry(canonical_group_key(group)).or_default();
        entry.0.push(*year);
        entry.1.push(*count);
    }

    grouped
        .into_iter()
        .map(|(key, (years, values))| Ok((key, YearlySeries::new(years, values)?)))
        .collect()
}

/// Load a single age group from the long CSV.
pub fn load_age_group_csv(path: &Path, group: &str) -> Result<YearlySeries> {
    let mut groups = load_age_groups(path)?;
    groups.remove(group).ok_or_else(|| {
        ForecastError::DataError(format!("No rows found for age group '{group}'"))
    })
}

/// Canonical form of a raw age-group label: separators become underscores,
/// everything lowercased. `"0 - 4"` and `"0-4"` both map to `"0_4"`.
pub fn canonical_group_key(raw: &str) -> String {
    raw.replace(" - ", "_")
        .replace('-', "_")
        .replace(' ', "_")
        .to_lowercase()
}

fn read_csv(path: &Path) -> Result<DataFrame> {
    let file = File::open(path)?;
    let df = CsvReader::new(file)
        .infer_schema(None)
        .has_header(true)
        .finish()?;
    Ok(df)
}

fn column_as_f64(df: &DataFrame, column_name: &str) -> Result<Vec<f64>> {
    let col = df.column(column_name).map_err(|e| {
        ForecastError::DataError(format!("Column '{}' not found: {}", column_name, e))
    })?;

    match col.dtype() {
        DataType::Float64 => Ok(col.f64()?.into_iter().flatten().collect()),
        DataType::Float32 => Ok(col.f32()?.into_iter().flatten().map(|v| v as f64).collect()),
        DataType::Int64 => Ok(col.i64()?.into_iter().flatten().map(|v| v as f64).collect()),
        DataType::Int32 => Ok(col.i32()?.into_iter().flatten().map(|v| v as f64).collect()),
        DataType::UInt64 => Ok(col.u64()?.into_iter().flatten().map(|v| v as f64).collect()),
        DataType::UInt32 => Ok(col.u32()?.into_iter().flatten().map(|v| v as f64).collect()),
        _ => Err(ForecastError::DataError(format!(
            "Column '{}' cannot be converted to f64",
            column_name
        ))),
    }
}

fn column_as_i32(df: &DataFrame, column_name: &str) -> Result<Vec<i32>> {
    let col = df.column(column_name).map_err(|e| {
        ForecastError::DataError(format!("Column '{}' not found: {}", column_name, e))
    })?;

    match col.dtype() {
        DataType::Int64 => Ok(col.i64()?.into_iter().flatten().map(|v| v as i32).collect()),
        DataType::Int32 => Ok(col.i32()?.into_iter().flatten().collect()),
        DataType::UInt32 => Ok(col.u32()?.into_iter().flatten().map(|v| v as i32).collect()),
        DataType::UInt64 => Ok(col.u64()?.into_iter().flatten().map(|v| v as i32).collect()),
        _ => Err(ForecastError::DataError(format!(
            "Column '{}' cannot be converted to i32",
            column_name
        ))),
    }
}

fn column_as_strings(df: &DataFrame, column_name: &str) -> Result<Vec<String>> {
    let col = df.column(column_name).map_err(|e| {
        ForecastError::DataError(format!("Column '{}' not found: {}", column_name, e))
    })?;

    match col.dtype() {
        DataType::Utf8 => Ok(col
            .utf8()?
            .into_iter()
            .map(|v| v.unwrap_or_default().to_string())
            .collect()),
        _ => Err(ForecastError::DataError(format!(
            "Column '{}' is not a string column",
            column_name
        ))),
    }
}
