//! Utility functions for the demand_forecast crate

use crate::error::{ForecastError, Result};
use chrono::{Datelike, NaiveDate};

/// Build the first-of-month date for a (year, month) pair
pub fn month_start(year: i32, month: u32) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| {
        ForecastError::DataError(format!("invalid calendar month: {}-{}", year, month))
    })
}

/// Step a month-start date forward by a number of whole calendar months
pub fn months_after(date: NaiveDate, steps: u32) -> NaiveDate {
    let total = date.year() * 12 + date.month0() as i32 + steps as i32;
    let year = total.div_euclid(12);
    let month = total.rem_euclid(12) as u32 + 1;
    NaiveDate::from_ymd_opt(year, month, 1).expect("month arithmetic stays in calendar range")
}

/// Round a value to two decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Arithmetic mean of a slice
pub(crate) fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (n - 1 denominator)
pub(crate) fn sample_std(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    variance.sqrt()
}
