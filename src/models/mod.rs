//! Forecasting models for monthly demand series

use crate::data::DemandSeries;
use crate::error::{ForecastError, Result};
use statrs::distribution::{ContinuousCDF, Normal};
use std::fmt::Debug;

pub mod decomposition;
pub mod seasonal_arima;

/// Minimum number of monthly observations a model will accept
pub const MIN_DATA_POINTS: usize = 12;

/// Months per seasonal cycle
pub const SEASON_LENGTH: usize = 12;

/// Raw model output: point forecasts with per-point uncertainty intervals
///
/// Values are reported exactly as the model produced them; flooring at
/// zero and rounding happen at the orchestrator boundary.
#[derive(Debug, Clone)]
pub struct ModelForecast {
    values: Vec<f64>,
    intervals: Vec<(f64, f64)>,
}

impl ModelForecast {
    /// Create a forecast from point values and matching intervals
    pub fn new(values: Vec<f64>, intervals: Vec<(f64, f64)>) -> Result<Self> {
        if values.len() != intervals.len() {
            return Err(ForecastError::FitFailure(format!(
                "forecast produced {} values but {} intervals",
                values.len(),
                intervals.len()
            )));
        }
        Ok(Self { values, intervals })
    }

    /// Point forecasts, one per future month
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// (lower, upper) uncertainty bounds, one pair per future month
    pub fn intervals(&self) -> &[(f64, f64)] {
        &self.intervals
    }

    /// Number of forecasted months
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the forecast is empty
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Forecast model that can be fitted to a demand series
pub trait DemandModel: Debug + Clone {
    /// The type of fitted model produced
    type Fitted: FittedModel;

    /// Fit the model to the full available history
    fn fit(&self, series: &DemandSeries) -> Result<Self::Fitted>;

    /// Get the name of the model
    fn name(&self) -> &str;
}

/// Fitted model ready to forecast future months
pub trait FittedModel: Debug {
    /// Forecast the given number of months beyond the last observation
    fn forecast(&self, periods: usize) -> Result<ModelForecast>;

    /// One-step-ahead in-sample predictions, aligned with the training series
    fn fitted_values(&self) -> Vec<f64>;

    /// Name of the model
    fn name(&self) -> &str;
}

/// Enforce the minimum-history gate shared by all models
pub(crate) fn check_history(series: &DemandSeries) -> Result<()> {
    if series.len() < MIN_DATA_POINTS {
        return Err(ForecastError::InsufficientHistory {
            required: MIN_DATA_POINTS,
            actual: series.len(),
        });
    }
    Ok(())
}

/// Reject series containing non-finite observations
pub(crate) fn check_finite(values: &[f64]) -> Result<()> {
    if values.iter().any(|v| !v.is_finite()) {
        return Err(ForecastError::FitFailure(
            "series contains non-finite demand values".to_string(),
        ));
    }
    Ok(())
}

/// Two-sided z multiplier for a central interval of the given width
pub(crate) fn interval_z(width: f64) -> f64 {
    let normal = Normal::new(0.0, 1.0).expect("standard normal parameters are valid");
    normal.inverse_cdf(0.5 + width / 2.0)
}
