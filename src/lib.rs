//! # Demand Forecast
//!
//! A Rust library for monthly product-demand forecasting with confidence
//! scoring.
//!
//! ## Features
//!
//! - Demand record handling and series normalization (monthly cadence)
//! - Forecasting models (seasonal decomposition, seasonal ARIMA)
//! - Point forecasts with per-month uncertainty bounds
//! - Confidence scoring from historical dispersion or in-sample fit error
//! - Independent per-product batch forecasting
//! - CSV ingestion with header normalization
//!
//! ## Quick Start
//!
//! ```rust
//! use demand_forecast::data::DemandRecord;
//! use demand_forecast::forecaster::{DemandForecaster, ForecastConfig};
//!
//! // Two years of monthly history for one product
//! let records: Vec<DemandRecord> = (0..24)
//!     .map(|i| {
//!         DemandRecord::new(
//!             "QUINOA",
//!             2022 + i / 12,
//!             (i % 12) as u32 + 1,
//!             80.0 + (i % 12) as f64 * 4.0,
//!         )
//!     })
//!     .collect();
//!
//! // Pick a model variant for this deployment
//! let forecaster = DemandForecaster::new(ForecastConfig::seasonal_arima());
//!
//! // Forecast the next three months
//! let response = forecaster.forecast_product(&records, 3).unwrap();
//! assert_eq!(response.predictions.len(), 3);
//! assert_eq!(response.history_length, 24);
//! ```

pub mod confidence;
pub mod data;
pub mod error;
pub mod forecaster;
pub mod models;
pub mod store;
pub mod utils;

// Re-export commonly used types
pub use crate::confidence::{ConfidenceLevel, ConfidenceResult, ConfidenceStrategy};
pub use crate::data::{DataLoader, DemandRecord, DemandSeries};
pub use crate::error::ForecastError;
pub use crate::forecaster::{
    DemandForecaster, ForecastConfig, ForecastOutcome, ForecastPoint, ForecastResponse,
    ModelVariant,
};
pub use crate::models::{DemandModel, FittedModel, ModelForecast, MIN_DATA_POINTS};
pub use crate::store::{DemandStore, InMemoryStore};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
