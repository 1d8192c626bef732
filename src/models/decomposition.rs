//! Seasonal decomposition model with multiplicative yearly seasonality
//!
//! Decomposes the series into a smoothed level, a damped linear trend and
//! twelve multiplicative monthly factors, then extends all three forward.
//! Monthly data carries no sub-monthly seasonality, so the yearly cycle is
//! the only seasonal component.

use crate::data::DemandSeries;
use crate::error::{ForecastError, Result};
use crate::models::{
    check_finite, check_history, interval_z, DemandModel, FittedModel, ModelForecast,
    SEASON_LENGTH,
};
use crate::utils::sample_std;
use tracing::debug;

/// Default level smoothing weight
const DEFAULT_LEVEL_SMOOTHING: f64 = 0.3;

/// Default trend flexibility; low values keep the trend from chasing noise
/// on short agricultural series
const DEFAULT_TREND_FLEXIBILITY: f64 = 0.05;

/// Default seasonal smoothing weight
const DEFAULT_SEASONAL_SMOOTHING: f64 = 0.2;

/// Default uncertainty interval width
const DEFAULT_INTERVAL_WIDTH: f64 = 0.80;

/// Decomposition model: level + trend with multiplicative yearly seasonality
#[derive(Debug, Clone)]
pub struct DecompositionModel {
    name: String,
    level_smoothing: f64,
    trend_flexibility: f64,
    seasonal_smoothing: f64,
    interval_width: f64,
}

impl Default for DecompositionModel {
    fn default() -> Self {
        Self::new()
    }
}

impl DecompositionModel {
    /// Create a model with the default smoothing parameters
    pub fn new() -> Self {
        Self {
            name: "Seasonal Decomposition (multiplicative)".to_string(),
            level_smoothing: DEFAULT_LEVEL_SMOOTHING,
            trend_flexibility: DEFAULT_TREND_FLEXIBILITY,
            seasonal_smoothing: DEFAULT_SEASONAL_SMOOTHING,
            interval_width: DEFAULT_INTERVAL_WIDTH,
        }
    }

    /// Create a model with custom smoothing parameters
    pub fn with_params(
        level_smoothing: f64,
        trend_flexibility: f64,
        seasonal_smoothing: f64,
    ) -> Result<Self> {
        for (name, value) in [
            ("level_smoothing", level_smoothing),
            ("trend_flexibility", trend_flexibility),
            ("seasonal_smoothing", seasonal_smoothing),
        ] {
            if value <= 0.0 || value >= 1.0 {
                return Err(ForecastError::InvalidParameter(format!(
                    "{} must be between 0 and 1",
                    name
                )));
            }
        }

        Ok(Self {
            name: "Seasonal Decomposition (multiplicative)".to_string(),
            level_smoothing,
            trend_flexibility,
            seasonal_smoothing,
            interval_width: DEFAULT_INTERVAL_WIDTH,
        })
    }
}

/// Fitted decomposition model
#[derive(Debug, Clone)]
pub struct FittedDecomposition {
    name: String,
    level: f64,
    trend: f64,
    seasonal: Vec<f64>,
    observations: usize,
    residual_std: f64,
    fitted: Vec<f64>,
    interval_width: f64,
}

impl DemandModel for DecompositionModel {
    type Fitted = FittedDecomposition;

    fn fit(&self, series: &DemandSeries) -> Result<FittedDecomposition> {
        check_history(series)?;
        let values = series.values();
        check_finite(&values)?;

        let season = SEASON_LENGTH;
        let n = values.len();

        debug!(data_length = n, "fitting seasonal decomposition");

        // Initialize from the first seasonal cycle
        let mut level = values[..season].iter().sum::<f64>() / season as f64;
        if level <= 0.0 {
            return Err(ForecastError::FitFailure(format!(
                "multiplicative seasonality requires positive mean demand, got {}",
                level
            )));
        }
        let mut trend = (values[season - 1] - values[0]) / (season - 1) as f64;
        let mut seasonal: Vec<f64> = values[..season].iter().map(|v| v / level).collect();

        let mut fitted = Vec::with_capacity(n);
        let mut residuals = Vec::new();

        // The first cycle reproduces itself by construction
        for factor in &seasonal {
            fitted.push(level * factor);
        }

        for (t, &value) in values.iter().enumerate().skip(season) {
            let idx = t % season;
            let factor = if seasonal[idx].abs() < 1e-9 {
                1.0
            } else {
                seasonal[idx]
            };

            let prediction = (level + trend) * factor;
            fitted.push(prediction);
            residuals.push(value - prediction);

            let previous_level = level;
            level = self.level_smoothing * (value / factor)
                + (1.0 - self.level_smoothing) * (level + trend);
            trend = self.trend_flexibility * (level - previous_level)
                + (1.0 - self.trend_flexibility) * trend;
            if level.abs() > 1e-9 {
                seasonal[idx] = self.seasonal_smoothing * (value / level)
                    + (1.0 - self.seasonal_smoothing) * seasonal[idx];
            }
        }

        Ok(FittedDecomposition {
            name: self.name.clone(),
            level,
            trend,
            seasonal,
            observations: n,
            residual_std: sample_std(&residuals),
            fitted,
            interval_width: self.interval_width,
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl FittedModel for FittedDecomposition {
    fn forecast(&self, periods: usize) -> Result<ModelForecast> {
        let z = interval_z(self.interval_width);
        let mut values = Vec::with_capacity(periods);
        let mut intervals = Vec::with_capacity(periods);

        for h in 1..=periods {
            let idx = (self.observations + h - 1) % SEASON_LENGTH;
            let value = (self.level + h as f64 * self.trend) * self.seasonal[idx];
            let margin = z * self.residual_std * (h as f64).sqrt();
            values.push(value);
            intervals.push((value - margin, value + margin));
        }

        ModelForecast::new(values, intervals)
    }

    fn fitted_values(&self) -> Vec<f64> {
        self.fitted.clone()
    }

    fn name(&self) -> &str {
        &self.name
    }
}
