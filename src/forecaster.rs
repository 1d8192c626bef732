//! Forecast orchestration: normalization, fitting, postprocessing and
//! batch handling
//!
//! The orchestrator owns the boundary semantics: it validates the request,
//! floors every forecast value at zero independently, rounds to two
//! decimals, labels forecast points with consecutive calendar months and
//! folds model failures into a tagged outcome value. A fresh model value
//! is constructed per invocation; nothing is shared between calls.

use crate::confidence::{
    dispersion_confidence, residual_confidence, ConfidenceResult, ConfidenceStrategy,
};
use crate::data::{DemandRecord, DemandSeries};
use crate::error::{ForecastError, Result};
use crate::models::{
    decomposition::DecompositionModel, seasonal_arima::SeasonalArimaModel, DemandModel,
    FittedModel, ModelForecast,
};
use crate::store::DemandStore;
use crate::utils::{months_after, round2};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Default number of months to forecast
pub const DEFAULT_FORECAST_PERIODS: usize = 3;

/// Longest allowed forecast horizon in months
pub const MAX_FORECAST_PERIODS: usize = 12;

/// Which forecasting model a deployment runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModelVariant {
    /// Multiplicative seasonal decomposition
    Decomposition,
    /// Seasonal ARIMA(1,1,1)(1,1,1)[12]
    SeasonalArima,
}

/// Deployment configuration for the orchestrator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastConfig {
    /// Forecasting model variant
    pub model: ModelVariant,
    /// Confidence scoring strategy
    pub confidence: ConfidenceStrategy,
    /// Horizon used when the caller does not specify one
    pub default_periods: usize,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self::decomposition()
    }
}

impl ForecastConfig {
    /// Decomposition model scored by historical dispersion
    pub fn decomposition() -> Self {
        Self {
            model: ModelVariant::Decomposition,
            confidence: ConfidenceStrategy::Dispersion,
            default_periods: DEFAULT_FORECAST_PERIODS,
        }
    }

    /// Seasonal ARIMA scored by in-sample fit error
    pub fn seasonal_arima() -> Self {
        Self {
            model: ModelVariant::SeasonalArima,
            confidence: ConfidenceStrategy::Residual,
            default_periods: DEFAULT_FORECAST_PERIODS,
        }
    }
}

/// One forecasted month
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastPoint {
    /// Calendar month as "YYYY-MM"
    pub date: String,
    pub year: i32,
    pub month: u32,
    /// Point estimate, floored at zero
    pub prediction: f64,
    /// Lower uncertainty bound, floored at zero
    pub lower_bound: f64,
    /// Upper uncertainty bound, floored at zero
    pub upper_bound: f64,
}

/// One historical month echoed back with the forecast
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoricalPoint {
    /// Calendar month as "YYYY-MM"
    pub date: String,
    pub year: i32,
    pub month: u32,
    pub demand: f64,
}

/// Successful forecast payload
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastResponse {
    pub predictions: Vec<ForecastPoint>,
    pub historical: Vec<HistoricalPoint>,
    pub confidence: ConfidenceResult,
    /// Number of historical observations the model was fitted on
    pub history_length: usize,
}

/// Tagged success-or-failure value used at the subsystem boundary
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastOutcome {
    pub success: bool,
    #[serde(flatten)]
    pub response: Option<ForecastResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ForecastOutcome {
    /// Check whether the forecast succeeded
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Serialize the outcome to a JSON string
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|err| ForecastError::DataError(format!("serialization failed: {}", err)))
    }

    /// The response payload on success
    pub fn response(&self) -> Option<&ForecastResponse> {
        self.response.as_ref()
    }

    /// The failure message, if any
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

impl From<Result<ForecastResponse>> for ForecastOutcome {
    fn from(result: Result<ForecastResponse>) -> Self {
        match result {
            Ok(response) => Self {
                success: true,
                response: Some(response),
                error: None,
            },
            Err(err) => Self {
                success: false,
                response: None,
                error: Some(err.to_string()),
            },
        }
    }
}

/// Demand forecast orchestrator
///
/// Holds only configuration; every call constructs its own model value,
/// so independent calls are safe to run in parallel contexts.
#[derive(Debug, Clone)]
pub struct DemandForecaster {
    config: ForecastConfig,
}

impl Default for DemandForecaster {
    fn default() -> Self {
        Self::new(ForecastConfig::default())
    }
}

impl DemandForecaster {
    /// Create an orchestrator for the given deployment configuration
    pub fn new(config: ForecastConfig) -> Self {
        Self { config }
    }

    /// The active configuration
    pub fn config(&self) -> &ForecastConfig {
        &self.config
    }

    /// Forecast one product from its raw records
    pub fn forecast_product(
        &self,
        records: &[DemandRecord],
        periods: usize,
    ) -> Result<ForecastResponse> {
        if periods < 1 || periods > MAX_FORECAST_PERIODS {
            return Err(ForecastError::InvalidParameter(format!(
                "forecast periods must be between 1 and {}",
                MAX_FORECAST_PERIODS
            )));
        }
        if records.is_empty() {
            return Err(ForecastError::EmptyInput(
                "empty record collection".to_string(),
            ));
        }

        let series = DemandSeries::from_records(records)?;
        debug!(
            records = records.len(),
            periods,
            model = ?self.config.model,
            "running demand forecast"
        );

        match self.config.model {
            ModelVariant::Decomposition => self.run_model(DecompositionModel::new(), &series, periods),
            ModelVariant::SeasonalArima => self.run_model(SeasonalArimaModel::new(), &series, periods),
        }
    }

    /// Forecast one product, folding errors into the tagged outcome value
    pub fn run_forecast(&self, records: &[DemandRecord], periods: usize) -> ForecastOutcome {
        self.forecast_product(records, periods).into()
    }

    /// Forecast every product in a batch independently
    ///
    /// Each entry succeeds or fails on its own; the result always carries
    /// exactly one outcome per input product.
    pub fn forecast_all(
        &self,
        products: &BTreeMap<String, Vec<DemandRecord>>,
        periods: usize,
    ) -> BTreeMap<String, ForecastOutcome> {
        products
            .iter()
            .map(|(product, records)| (product.clone(), self.run_forecast(records, periods)))
            .collect()
    }

    /// Forecast one product read from a demand store
    pub fn forecast_stored_product(
        &self,
        store: &dyn DemandStore,
        product: &str,
        periods: usize,
    ) -> Result<ForecastResponse> {
        let name = product.trim().to_uppercase();
        let records = store.product_records(&name)?;
        if records.is_empty() {
            return Err(ForecastError::EmptyInput(format!(
                "product {} not found",
                name
            )));
        }
        self.forecast_product(&records, periods)
    }

    /// Forecast every product in a demand store
    pub fn forecast_all_stored(
        &self,
        store: &dyn DemandStore,
        periods: usize,
    ) -> Result<BTreeMap<String, ForecastOutcome>> {
        let mut outcomes = BTreeMap::new();
        for product in store.product_names()? {
            let records = store.product_records(&product)?;
            outcomes.insert(product, self.run_forecast(&records, periods));
        }
        Ok(outcomes)
    }

    fn run_model<M: DemandModel>(
        &self,
        model: M,
        series: &DemandSeries,
        periods: usize,
    ) -> Result<ForecastResponse> {
        let fitted = model.fit(series)?;
        let raw = fitted.forecast(periods)?;

        let last_date = series
            .last_date()
            .ok_or_else(|| ForecastError::DataError("empty demand series".to_string()))?;
        let predictions = label_forecast(last_date, &raw);

        let confidence = match self.config.confidence {
            ConfidenceStrategy::Dispersion => dispersion_confidence(series),
            ConfidenceStrategy::Residual => residual_confidence(series, &fitted.fitted_values()),
        };

        Ok(ForecastResponse {
            predictions,
            historical: echo_historical(series),
            confidence,
            history_length: series.len(),
        })
    }
}

/// Label raw forecasts with consecutive calendar months and apply the
/// boundary postprocessing
///
/// Every value is floored at zero independently before rounding; a bound
/// is never adjusted to stay consistent with its point estimate.
fn label_forecast(last_date: NaiveDate, raw: &ModelForecast) -> Vec<ForecastPoint> {
    raw.values()
        .iter()
        .zip(raw.intervals().iter())
        .enumerate()
        .map(|(i, (value, (lower, upper)))| {
            let date = months_after(last_date, i as u32 + 1);
            ForecastPoint {
                date: date.format("%Y-%m").to_string(),
                year: date.year(),
                month: date.month(),
                prediction: round2(value.max(0.0)),
                lower_bound: round2(lower.max(0.0)),
                upper_bound: round2(upper.max(0.0)),
            }
        })
        .collect()
}

/// Echo the normalized history back in response form
fn echo_historical(series: &DemandSeries) -> Vec<HistoricalPoint> {
    series
        .points()
        .iter()
        .map(|(date, demand)| HistoricalPoint {
            date: date.format("%Y-%m").to_string(),
            year: date.year(),
            month: date.month(),
            demand: round2(*demand),
        })
        .collect()
}
