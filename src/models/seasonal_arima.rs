//! Seasonal ARIMA model for monthly demand series
//!
//! SARIMA with non-seasonal order (1,1,1) and seasonal order (1,1,1,12):
//! one autoregressive term, one differencing step and one moving-average
//! term at both the monthly and the yearly lag. Estimation is a
//! conditional-sum-of-squares pass over the doubly differenced series:
//! autoregressive terms from the lag-1 and lag-12 autocorrelations,
//! moving-average terms from a second stage over the AR residuals.
//! Coefficients are used as estimated, without stationarity or
//! invertibility enforcement; magnitudes are clamped below one only so the
//! forecast recursion stays finite.

use crate::data::DemandSeries;
use crate::error::Result;
use crate::models::{
    check_finite, check_history, interval_z, DemandModel, FittedModel, ModelForecast,
    SEASON_LENGTH,
};
use crate::utils::sample_std;
use tracing::debug;

/// Default uncertainty interval width
const DEFAULT_INTERVAL_WIDTH: f64 = 0.95;

/// Keep estimated coefficients below unit magnitude
const COEFFICIENT_BOUND: f64 = 0.99;

/// Seasonal ARIMA(1,1,1)(1,1,1)[12] model
#[derive(Debug, Clone)]
pub struct SeasonalArimaModel {
    name: String,
    interval_width: f64,
}

impl Default for SeasonalArimaModel {
    fn default() -> Self {
        Self::new()
    }
}

impl SeasonalArimaModel {
    /// Create a model with the default configuration
    pub fn new() -> Self {
        Self {
            name: "SARIMA(1,1,1)(1,1,1)[12]".to_string(),
            interval_width: DEFAULT_INTERVAL_WIDTH,
        }
    }
}

/// Fitted seasonal ARIMA model
#[derive(Debug, Clone)]
pub struct FittedSeasonalArima {
    name: String,
    history: Vec<f64>,
    differenced: Vec<f64>,
    residuals: Vec<f64>,
    ar: f64,
    seasonal_ar: f64,
    ma: f64,
    seasonal_ma: f64,
    residual_std: f64,
    fitted: Vec<f64>,
    interval_width: f64,
}

impl DemandModel for SeasonalArimaModel {
    type Fitted = FittedSeasonalArima;

    fn fit(&self, series: &DemandSeries) -> Result<FittedSeasonalArima> {
        check_history(series)?;
        let values = series.values();
        check_finite(&values)?;

        let season = SEASON_LENGTH;
        let n = values.len();

        debug!(data_length = n, "fitting seasonal ARIMA");

        // Double differencing: lag 1 on top of lag 12. On an exactly
        // twelve-point series this leaves nothing to estimate from and the
        // coefficients fall back to zero.
        let mut differenced = Vec::new();
        for t in (season + 1)..n {
            differenced.push(values[t] - values[t - 1] - values[t - season] + values[t - season - 1]);
        }

        let ar = clamp_coefficient(autocorrelation(&differenced, 1));
        let seasonal_ar = clamp_coefficient(autocorrelation(&differenced, season));

        // One-step AR-MA pass over the differenced series; the residual
        // autocorrelations give the second-stage MA estimates
        let ar_residuals = arma_residuals(&differenced, ar, seasonal_ar, 0.0, 0.0, season);
        let ma = clamp_coefficient(autocorrelation(&ar_residuals, 1));
        let seasonal_ma = clamp_coefficient(autocorrelation(&ar_residuals, season));

        let residuals = arma_residuals(&differenced, ar, seasonal_ar, ma, seasonal_ma, season);

        let residual_std = if residuals.len() >= 2 {
            sample_std(&residuals)
        } else {
            // Too short to have innovations; fall back to the spread of the
            // monthly changes
            let monthly_changes: Vec<f64> = values.windows(2).map(|w| w[1] - w[0]).collect();
            sample_std(&monthly_changes)
        };

        let fitted = in_sample_predictions(&values, &differenced, &residuals, ar, seasonal_ar, ma, seasonal_ma, season);

        Ok(FittedSeasonalArima {
            name: self.name.clone(),
            history: values,
            differenced,
            residuals,
            ar,
            seasonal_ar,
            ma,
            seasonal_ma,
            residual_std,
            fitted,
            interval_width: self.interval_width,
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl FittedModel for FittedSeasonalArima {
    fn forecast(&self, periods: usize) -> Result<ModelForecast> {
        let season = SEASON_LENGTH;
        let z = interval_z(self.interval_width);

        let mut extended = self.history.clone();
        let mut differenced = self.differenced.clone();
        let mut values = Vec::with_capacity(periods);
        let mut intervals = Vec::with_capacity(periods);

        for h in 1..=periods {
            // Forecast the differenced series; future shocks are zero, so
            // only residuals from the estimation window contribute
            let j = differenced.len();
            let mut next = 0.0;
            if j >= 1 {
                next += self.ar * differenced[j - 1];
                next += self.ma * residual_at(&self.residuals, j - 1);
            }
            if j >= season {
                next += self.seasonal_ar * differenced[j - season];
                next += self.seasonal_ma * residual_at(&self.residuals, j - season);
            }
            if j >= season + 1 {
                next -= self.ar * self.seasonal_ar * differenced[j - season - 1];
            }
            differenced.push(next);

            // Integrate both differences back. Lags that fall before the
            // start of a short history clamp to the earliest observation.
            let t = extended.len();
            let lag_1 = extended[t - 1];
            let lag_s = extended[t - season];
            let lag_s1 = if t >= season + 1 {
                extended[t - season - 1]
            } else {
                extended[0]
            };
            let value = next + lag_1 + lag_s - lag_s1;
            extended.push(value);

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

/// Residual lookup; indexes beyond the estimation window are future shocks
fn residual_at(residuals: &[f64], index: usize) -> f64 {
    residuals.get(index).copied().unwrap_or(0.0)
}

/// Lag autocorrelation of a series, zero when undefined
fn autocorrelation(series: &[f64], lag: usize) -> f64 {
    if series.len() <= lag + 1 {
        return 0.0;
    }
    let m = series.iter().sum::<f64>() / series.len() as f64;
    let denominator: f64 = series.iter().map(|v| (v - m).powi(2)).sum();
    if denominator < 1e-12 {
        return 0.0;
    }
    let numerator: f64 = (lag..series.len())
        .map(|t| (series[t] - m) * (series[t - lag] - m))
        .sum();
    numerator / denominator
}

fn clamp_coefficient(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(-COEFFICIENT_BOUND, COEFFICIENT_BOUND)
    } else {
        0.0
    }
}

/// One-step prediction residuals over the differenced series
fn arma_residuals(
    differenced: &[f64],
    ar: f64,
    seasonal_ar: f64,
    ma: f64,
    seasonal_ma: f64,
    season: usize,
) -> Vec<f64> {
    let mut residuals = Vec::with_capacity(differenced.len());
    for j in 0..differenced.len() {
        let mut prediction = 0.0;
        if j >= 1 {
            prediction += ar * differenced[j - 1];
            prediction += ma * residuals[j - 1];
        }
        if j >= season {
            prediction += seasonal_ar * differenced[j - season];
            prediction += seasonal_ma * residuals[j - season];
        }
        if j >= season + 1 {
            prediction -= ar * seasonal_ar * differenced[j - season - 1];
        }
        residuals.push(differenced[j] - prediction);
    }
    residuals
}

/// One-step in-sample predictions on the original scale
///
/// The first observation cannot be predicted and echoes itself; months
/// before a full seasonal cycle fall back to the previous observation.
#[allow(clippy::too_many_arguments)]
fn in_sample_predictions(
    values: &[f64],
    differenced: &[f64],
    residuals: &[f64],
    ar: f64,
    seasonal_ar: f64,
    ma: f64,
    seasonal_ma: f64,
    season: usize,
) -> Vec<f64> {
    let n = values.len();
    let mut fitted = Vec::with_capacity(n);

    for t in 0..n {
        if t == 0 {
            fitted.push(values[0]);
            continue;
        }
        if t <= season {
            fitted.push(values[t - 1]);
            continue;
        }

        // t maps onto the differenced series at j = t - season - 1
        let j = t - season - 1;
        let mut delta = 0.0;
        if j >= 1 {
            delta += ar * differenced[j - 1];
            delta += ma * residuals[j - 1];
        }
        if j >= season {
            delta += seasonal_ar * differenced[j - season];
            delta += seasonal_ma * residuals[j - season];
        }
        if j >= season + 1 {
            delta -= ar * seasonal_ar * differenced[j - season - 1];
        }

        fitted.push(delta + values[t - 1] + values[t - season] - values[t - season - 1]);
    }

    fitted
}
