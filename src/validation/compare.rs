//! Predicted-versus-reference comparison and agreement classes.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::ValidationThresholds;
use crate::uncertainty::UncertainValue;

/// Agreement class for a sigma deviation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AgreementStatus {
    /// Within 1σ.
    Excellent,
    /// Within 2σ.
    Good,
    /// Within 3σ.
    Acceptable,
    /// Beyond 3σ, or not a number.
    Poor,
}

impl fmt::Display for AgreementStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Excellent => "EXCELLENT",
            Self::Good => "GOOD",
            Self::Acceptable => "ACCEPTABLE",
            Self::Poor => "POOR",
        };
        f.write_str(label)
    }
}

/// Raw comparison numbers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    /// `|p − r| / √(σp² + σr²)`.
    pub sigma_deviation: f64,
    /// `|p − r| / |r| · 100`, zero when the reference is zero.
    pub percent_error: f64,
    /// Deviation at or below the within-uncertainty threshold.
    pub within_uncertainty: bool,
}

/// One validated parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// Event, asteroid or ephemeris case the parameter belongs to.
    pub case: String,
    /// Parameter name; statistics are grouped by it.
    pub parameter: String,
    /// Model prediction.
    pub predicted: UncertainValue,
    /// Published reference.
    pub reference: UncertainValue,
    /// Combined-uncertainty deviation.
    pub sigma_deviation: f64,
    /// Percent error against the reference.
    pub percent_error: f64,
    /// Deviation within the configured threshold (2σ by default).
    pub within_uncertainty: bool,
    /// Agreement class.
    pub status: AgreementStatus,
}

/// Stateless comparator over sigma thresholds.
#[derive(Debug, Clone, Default)]
pub struct BenchmarkComparator {
    thresholds: ValidationThresholds,
}

impl BenchmarkComparator {
    /// Comparator with explicit thresholds.
    #[must_use]
    pub const fn new(thresholds: ValidationThresholds) -> Self {
        Self { thresholds }
    }

    /// Compare a prediction with its reference.
    #[must_use]
    pub fn compare(&self, predicted: &UncertainValue, reference: &UncertainValue) -> Comparison {
        let sigma_deviation = predicted.sigma_deviation(reference);
        let diff = (predicted.value - reference.value).abs();
        let percent_error = if reference.value == 0.0 {
            0.0
        } else {
            diff / reference.value.abs() * 100.0
        };
        Comparison {
            sigma_deviation,
            percent_error,
            within_uncertainty: sigma_deviation <= self.thresholds.within_uncertainty_sigma,
        }
    }

    /// Classify a sigma deviation.
    #[must_use]
    pub fn classify(&self, sigma_deviation: f64) -> AgreementStatus {
        let t = &self.thresholds;
        if sigma_deviation <= t.excellent_sigma {
            AgreementStatus::Excellent
        } else if sigma_deviation <= t.good_sigma {
            AgreementStatus::Good
        } else if sigma_deviation <= t.acceptable_sigma {
            AgreementStatus::Acceptable
        } else {
            AgreementStatus::Poor
        }
    }

    /// Compare and classify in one record.
    #[must_use]
    pub fn validate(
        &self,
        case: impl Into<String>,
        parameter: impl Into<String>,
        predicted: UncertainValue,
        reference: UncertainValue,
    ) -> ValidationResult {
        let cmp = self.compare(&predicted, &reference);
        ValidationResult {
            case: case.into(),
            parameter: parameter.into(),
            predicted,
            reference,
            sigma_deviation: cmp.sigma_deviation,
            percent_error: cmp.percent_error,
            within_uncertainty: cmp.within_uncertainty,
            status: self.classify(cmp.sigma_deviation),
        }
    }
}
