//! Validation of orbital mechanics against benchmark asteroids.
//!
//! The period follows Kepler's third law. Perihelion and aphelion are
//! measured on the propagated orbit (minimum and maximum heliocentric
//! distance over one period), so the check exercises the Kepler solver and
//! the frame rotation rather than the closed forms alone.

use tracing::{info, warn};

use super::compare::ValidationResult;
use super::historical::HistoricalValidator;
use super::registry::{BenchmarkAsteroid, OrbitalParameter};
use super::report::{ValidationFailure, ValidationReport};
use crate::error::ImpactResult;
use crate::orbit::calculate_position;
use crate::uncertainty::UncertainValue;
use crate::units::DAYS_PER_JULIAN_YEAR;

/// Positions sampled per orbit when measuring apsides.
const APSIS_SAMPLES: usize = 3_600;

/// Propagated extremes of heliocentric distance over one period (AU).
fn sampled_apsides(benchmark: &BenchmarkAsteroid) -> (f64, f64) {
    let el = &benchmark.elements;
    let period_days = el.period_years() * DAYS_PER_JULIAN_YEAR;
    let step = period_days / APSIS_SAMPLES as f64;
    (0..APSIS_SAMPLES)
        .map(|k| calculate_position(el, el.epoch_jd + k as f64 * step).distance_au())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), r| {
            if r.is_nan() {
                (f64::NAN, f64::NAN)
            } else {
                (if r < lo { r } else { lo }, if r > hi { r } else { hi })
            }
        })
}

impl HistoricalValidator {
    /// Model predictions for one benchmark orbit.
    #[must_use]
    pub fn predict_orbit(benchmark: &BenchmarkAsteroid) -> Vec<(OrbitalParameter, UncertainValue)> {
        let el = &benchmark.elements;
        let a = el.semi_major_axis_au;
        let e = el.eccentricity;
        let sa = benchmark.semi_major_axis_sigma_au;
        let se = benchmark.eccentricity_sigma;

        let period = el.period_years();
        let period_sigma = 1.5 * period * sa / a;
        let (q, big_q) = sampled_apsides(benchmark);
        let q_sigma = ((1.0 - e) * sa).hypot(a * se);
        let big_q_sigma = ((1.0 + e) * sa).hypot(a * se);

        vec![
            (
                OrbitalParameter::Period,
                UncertainValue::new(period, period_sigma, "yr", "Kepler third law"),
            ),
            (
                OrbitalParameter::Perihelion,
                UncertainValue::new(q, q_sigma, "AU", "propagated orbit"),
            ),
            (
                OrbitalParameter::Aphelion,
                UncertainValue::new(big_q, big_q_sigma, "AU", "propagated orbit"),
            ),
        ]
    }

    /// Validate one benchmark orbit against each of its reference values.
    ///
    /// Parameters are compared independently; a non-finite prediction
    /// yields [`crate::ImpactError::NonFiniteValue`] for that parameter only.
    #[must_use]
    pub fn validate_orbit(
        &self,
        benchmark: &BenchmarkAsteroid,
    ) -> Vec<(OrbitalParameter, ImpactResult<ValidationResult>)> {
        let predictions = Self::predict_orbit(benchmark);
        benchmark
            .references
            .iter()
            .filter_map(|(parameter, reference)| {
                predictions
                    .iter()
                    .find(|(p, _)| p == parameter)
                    .map(|(_, predicted)| {
                        let outcome =
                            self.compare_parameter(&benchmark.name, parameter.name(), predicted, reference);
                        (*parameter, outcome)
                    })
            })
            .collect()
    }

    /// Validate every benchmark orbit in the registry.
    #[must_use]
    pub fn validate_all_orbital_mechanics(&self) -> ValidationReport {
        let mut results = Vec::new();
        let mut failures = Vec::new();
        for benchmark in &self.registry.benchmarks {
            for (parameter, outcome) in self.validate_orbit(benchmark) {
                match outcome {
                    Ok(r) => results.push(r),
                    Err(e) => {
                        warn!(
                            asteroid = %benchmark.name,
                            parameter = parameter.name(),
                            error = %e,
                            "Orbital parameter failed"
                        );
                        failures.push(ValidationFailure::new(&benchmark.name, parameter.name(), &e));
                    }
                }
            }
        }
        let report = ValidationReport::new(self.registry.version.clone(), results, failures);
        info!(
            results = report.results.len(),
            failures = report.failures.len(),
            accuracy = report.overall_accuracy_percent,
            "Orbital mechanics validation complete"
        );
        report
    }
}
