//! Aggregated validation reports.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::compare::{AgreementStatus, ValidationResult};
use crate::error::{ImpactError, ImpactResult};

/// A case that could not be evaluated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationFailure {
    /// Event, asteroid or ephemeris case.
    pub case: String,
    /// Parameter being evaluated, or `*` when the whole case failed.
    pub parameter: String,
    /// Error message.
    pub error: String,
}

impl ValidationFailure {
    /// Failure of one parameter of one case.
    #[must_use]
    pub fn new(case: impl Into<String>, parameter: impl Into<String>, error: &ImpactError) -> Self {
        Self {
            case: case.into(),
            parameter: parameter.into(),
            error: error.to_string(),
        }
    }
}

/// Per-parameter aggregate over all cases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterStatistics {
    /// Number of results.
    pub count: usize,
    /// Mean percent error.
    pub mean_percent_error: f64,
    /// Root-mean-square percent error.
    pub rms_percent_error: f64,
    /// Largest percent error.
    pub max_percent_error: f64,
    /// Share of results within uncertainty (percent).
    pub percent_within_uncertainty: f64,
}

/// Results of one validation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Reference registry version the run used.
    pub registry_version: String,
    /// Successful comparisons.
    pub results: Vec<ValidationResult>,
    /// Cases that failed to evaluate.
    pub failures: Vec<ValidationFailure>,
    /// Statistics keyed by parameter name.
    pub statistics: BTreeMap<String, ParameterStatistics>,
    /// Share of all results within uncertainty (percent), zero when empty.
    pub overall_accuracy_percent: f64,
}

impl ValidationReport {
    /// Build a report and its statistics.
    #[must_use]
    pub fn new(
        registry_version: impl Into<String>,
        results: Vec<ValidationResult>,
        failures: Vec<ValidationFailure>,
    ) -> Self {
        let statistics = statistics(&results);
        let overall_accuracy_percent = within_share(results.iter());
        Self {
            registry_version: registry_version.into(),
            results,
            failures,
            statistics,
            overall_accuracy_percent,
        }
    }

    /// Results for one case.
    pub fn results_for<'a>(&'a self, case: &'a str) -> impl Iterator<Item = &'a ValidationResult> {
        self.results.iter().filter(move |r| r.case == case)
    }

    /// Result for one case and parameter.
    #[must_use]
    pub fn result(&self, case: &str, parameter: &str) -> Option<&ValidationResult> {
        self.results
            .iter()
            .find(|r| r.case == case && r.parameter == parameter)
    }

    /// Number of results with the given status.
    #[must_use]
    pub fn count_status(&self, status: AgreementStatus) -> usize {
        self.results.iter().filter(|r| r.status == status).count()
    }

    /// No failures and every result within uncertainty.
    #[must_use]
    pub fn all_within_uncertainty(&self) -> bool {
        self.failures.is_empty() && self.results.iter().all(|r| r.within_uncertainty)
    }

    /// Serialize to pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ImpactError::Serialization`] if serialization fails.
    pub fn to_json(&self) -> ImpactResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ImpactError::serialization(format!("validation report: {e}")))
    }
}

fn within_share<'a>(results: impl Iterator<Item = &'a ValidationResult>) -> f64 {
    let (total, within) = results.fold((0usize, 0usize), |(t, w), r| {
        (t + 1, w + usize::from(r.within_uncertainty))
    });
    if total == 0 {
        0.0
    } else {
        within as f64 / total as f64 * 100.0
    }
}

fn statistics(results: &[ValidationResult]) -> BTreeMap<String, ParameterStatistics> {
    let mut grouped: BTreeMap<&str, Vec<&ValidationResult>> = BTreeMap::new();
    for r in results {
        grouped.entry(r.parameter.as_str()).or_default().push(r);
    }
    grouped
        .into_iter()
        .map(|(parameter, group)| {
            let n = group.len() as f64;
            let mean = group.iter().map(|r| r.percent_error).sum::<f64>() / n;
            let rms = (group.iter().map(|r| r.percent_error.powi(2)).sum::<f64>() / n).sqrt();
            let max = group
                .iter()
                .map(|r| r.percent_error)
                .fold(0.0, |acc: f64, e| if e > acc || e.is_nan() { e } else { acc });
            let stats = ParameterStatistics {
                count: group.len(),
                mean_percent_error: mean,
                rms_percent_error: rms,
                max_percent_error: max,
                percent_within_uncertainty: within_share(group.into_iter()),
            };
            (parameter.to_string(), stats)
        })
        .collect()
}
