//! Demand records, series normalization and CSV ingestion

use crate::error::{ForecastError, Result};
use crate::utils::{self, month_start};
use chrono::NaiveDate;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;

/// One monthly demand observation for a product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemandRecord {
    /// Product identifier, trimmed and uppercased
    pub product: String,
    /// Calendar year
    pub year: i32,
    /// Calendar month, 1-12
    pub month: u32,
    /// Observed demand, non-negative
    pub demand: f64,
}

impl DemandRecord {
    /// Create a record, normalizing the product identifier
    pub fn new(product: &str, year: i32, month: u32, demand: f64) -> Self {
        Self {
            product: product.trim().to_uppercase(),
            year,
            month,
            demand,
        }
    }
}

/// A strictly time-ordered monthly demand series
///
/// Each point is keyed by the first day of its calendar month. Duplicate
/// months are retained in their sorted position rather than aggregated.
#[derive(Debug, Clone, PartialEq)]
pub struct DemandSeries {
    points: Vec<(NaiveDate, f64)>,
}

impl DemandSeries {
    /// Normalize raw records into an ordered series
    ///
    /// Records are keyed by the first day of their (year, month), sorted
    /// ascending. An empty input yields an empty series; callers treat that
    /// as insufficient data rather than an error.
    pub fn from_records(records: &[DemandRecord]) -> Result<Self> {
        let mut points = Vec::with_capacity(records.len());
        for record in records {
            let date = month_start(record.year, record.month)?;
            points.push((date, record.demand));
        }
        // Stable sort: records sharing a month keep their input order
        points.sort_by_key(|(date, _)| *date);
        Ok(Self { points })
    }

    /// Get the ordered (month, demand) points
    pub fn points(&self) -> &[(NaiveDate, f64)] {
        &self.points
    }

    /// Get the demand values in time order
    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|(_, value)| *value).collect()
    }

    /// Get the month-start dates in time order
    pub fn dates(&self) -> Vec<NaiveDate> {
        self.points.iter().map(|(date, _)| *date).collect()
    }

    /// The last observed month, if any
    pub fn last_date(&self) -> Option<NaiveDate> {
        self.points.last().map(|(date, _)| *date)
    }

    /// Number of observations
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if the series is empty
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Mean of the demand values
    pub fn mean(&self) -> Result<f64> {
        if self.points.is_empty() {
            return Err(ForecastError::DataError(
                "empty demand series".to_string(),
            ));
        }
        Ok(utils::mean(&self.values()))
    }

    /// Sample standard deviation of the demand values
    pub fn std_dev(&self) -> Result<f64> {
        if self.points.is_empty() {
            return Err(ForecastError::DataError(
                "empty demand series".to_string(),
            ));
        }
        Ok(utils::sample_std(&self.values()))
    }
}

/// Required columns after header normalization
const REQUIRED_COLUMNS: [&str; 4] = ["PRODUCT", "YEAR", "MONTH", "DEMAND"];

/// Alternate header spellings accepted on ingestion
const COLUMN_ALIASES: [(&str, &str); 2] = [("DEMAND (TN)", "DEMAND"), ("DEMAND(TN)", "DEMAND")];

/// Loader for demand records from delimited files
#[derive(Debug)]
pub struct DataLoader;

impl DataLoader {
    /// Load demand records from a CSV file
    ///
    /// Headers are trimmed and uppercased, alternate demand headers are
    /// accepted, numeric fields are coerced, and rows with missing or
    /// unparseable fields are dropped.
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Vec<DemandRecord>> {
        let file = File::open(path)?;
        let df = CsvReader::new(file)
            .infer_schema(None)
            .has_header(true)
            .finish()?;

        Self::records_from_dataframe(df)
    }

    /// Extract demand records from an existing DataFrame
    pub fn records_from_dataframe(mut df: DataFrame) -> Result<Vec<DemandRecord>> {
        let normalized: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|name| name.trim().to_uppercase())
            .collect();
        df.set_column_names(&normalized)?;

        for (alias, canonical) in COLUMN_ALIASES {
            let has_alias = df.get_column_names().contains(&alias);
            let has_canonical = df.get_column_names().contains(&canonical);
            if has_alias && !has_canonical {
                df.rename(alias, canonical)?;
            }
        }

        let names = df.get_column_names();
        let missing: Vec<&str> = REQUIRED_COLUMNS
            .iter()
            .filter(|column| !names.contains(*column))
            .copied()
            .collect();
        if !missing.is_empty() {
            return Err(ForecastError::DataError(format!(
                "missing required columns: {}",
                missing.join(", ")
            )));
        }

        // Coerce each field; unparseable cells become nulls and their rows
        // are dropped below
        let product = df.column("PRODUCT")?.cast(&DataType::Utf8)?;
        let product = product.utf8()?;
        let year = df.column("YEAR")?.cast(&DataType::Int64)?;
        let year = year.i64()?;
        let month = df.column("MONTH")?.cast(&DataType::Int64)?;
        let month = month.i64()?;
        let demand = df.column("DEMAND")?.cast(&DataType::Float64)?;
        let demand = demand.f64()?;

        let mut records = Vec::with_capacity(df.height());
        for i in 0..df.height() {
            match (product.get(i), year.get(i), month.get(i), demand.get(i)) {
                (Some(p), Some(y), Some(m), Some(d))
                    if !p.trim().is_empty() && (1..=12).contains(&m) && d.is_finite() =>
                {
                    records.push(DemandRecord::new(p, y as i32, m as u32, d));
                }
                _ => continue,
            }
        }

        if records.is_empty() {
            return Err(ForecastError::DataError(
                "no valid demand records in file".to_string(),
            ));
        }

        Ok(records)
    }
}
