//! Confidence scoring for demand forecasts
//!
//! Two strategies produce the same 0-100 score shape: one from the
//! dispersion of the historical series, one from the in-sample fit error
//! of the trained model. Scoring is advisory, so the residual strategy
//! degrades to a neutral default instead of failing the forecast.

use crate::data::DemandSeries;
use crate::utils::{mean, round2};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Score above which confidence is High
const HIGH_THRESHOLD: f64 = 70.0;

/// Score above which confidence is Medium
const MEDIUM_THRESHOLD: f64 = 40.0;

/// Categorical reliability label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfidenceLevel {
    Low,
    Medium,
    High,
}

impl ConfidenceLevel {
    /// Step function over the score: > 70 High, > 40 Medium, else Low
    pub fn from_score(score: f64) -> Self {
        if score > HIGH_THRESHOLD {
            ConfidenceLevel::High
        } else if score > MEDIUM_THRESHOLD {
            ConfidenceLevel::Medium
        } else {
            ConfidenceLevel::Low
        }
    }
}

impl fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfidenceLevel::Low => write!(f, "Low"),
            ConfidenceLevel::Medium => write!(f, "Medium"),
            ConfidenceLevel::High => write!(f, "High"),
        }
    }
}

/// Reliability summary attached to every forecast
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfidenceResult {
    /// Score in [0, 100]
    pub score: f64,
    /// Categorical label derived from the score
    pub level: ConfidenceLevel,
    /// In-sample mean absolute error, when derived from residuals
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mae: Option<f64>,
}

impl ConfidenceResult {
    fn from_score(score: f64, mae: Option<f64>) -> Self {
        let score = round2(score.clamp(0.0, 100.0));
        Self {
            score,
            level: ConfidenceLevel::from_score(score),
            mae,
        }
    }

    /// Neutral fallback used when scoring itself fails
    pub fn neutral() -> Self {
        Self {
            score: 50.0,
            level: ConfidenceLevel::Medium,
            mae: Some(0.0),
        }
    }
}

/// How the confidence score is derived
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfidenceStrategy {
    /// From the dispersion of the historical series
    Dispersion,
    /// From the in-sample fit error of the trained model
    Residual,
}

/// Score from historical dispersion: 100 * (1 - std / mean), clamped
pub fn dispersion_confidence(series: &DemandSeries) -> ConfidenceResult {
    let (mean_demand, std_dev) = match (series.mean(), series.std_dev()) {
        (Ok(m), Ok(s)) => (m, s),
        _ => return ConfidenceResult::neutral(),
    };

    let variability = std_dev / mean_demand;
    if !variability.is_finite() {
        return ConfidenceResult::from_score(0.0, None);
    }

    ConfidenceResult::from_score(100.0 * (1.0 - variability), None)
}

/// Score from in-sample fit error: 100 * (1 - mae / mean), clamped
///
/// The first point is excluded because seasonal autoregressive models
/// cannot fit it. Any internal failure yields the neutral default.
pub fn residual_confidence(series: &DemandSeries, fitted: &[f64]) -> ConfidenceResult {
    let actual = series.values();
    if fitted.len() != actual.len() || actual.len() < 2 {
        return ConfidenceResult::neutral();
    }

    let errors: Vec<f64> = actual[1..]
        .iter()
        .zip(fitted[1..].iter())
        .map(|(a, f)| (a - f).abs())
        .collect();
    let mae = mean(&errors);
    if !mae.is_finite() {
        return ConfidenceResult::neutral();
    }

    let mean_demand = match series.mean() {
        Ok(m) => m,
        Err(_) => return ConfidenceResult::neutral(),
    };
    let relative_error = if mean_demand > 0.0 {
        mae / mean_demand
    } else {
        1.0
    };

    ConfidenceResult::from_score(100.0 * (1.0 - relative_error), Some(round2(mae)))
}
