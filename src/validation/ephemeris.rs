//! Validation against an injected ephemeris source.
//!
//! The engine never talks to a network service itself. Callers supply an
//! async fetch function (a JPL Horizons client, a cached file, a test
//! double) and the validator compares propagated states with what it
//! returns.

use serde::{Deserialize, Serialize};
use std::future::Future;
use tracing::{info, warn};

use super::compare::ValidationResult;
use super::historical::HistoricalValidator;
use super::report::{ValidationFailure, ValidationReport};
use crate::error::{ImpactError, ImpactResult};
use crate::orbit::{calculate_position, OrbitalElements, Vec3};
use crate::uncertainty::UncertainValue;

/// Request passed to the fetch function.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EphemerisQuery {
    /// Object designation.
    pub designation: String,
    /// Julian date of the requested state.
    pub julian_date: f64,
}

/// Heliocentric state returned by an ephemeris source.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EphemerisState {
    /// Julian date of the state.
    pub julian_date: f64,
    /// Position (AU).
    pub position: Vec3,
    /// Velocity (AU/day).
    pub velocity: Vec3,
    /// One-sigma position uncertainty (AU).
    pub position_sigma_au: f64,
    /// One-sigma velocity uncertainty (AU/day).
    pub velocity_sigma_au_per_day: f64,
}

/// One object to check against the ephemeris.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EphemerisCase {
    /// Object designation.
    pub designation: String,
    /// Elements to propagate.
    pub elements: OrbitalElements,
    /// Julian date to compare at.
    pub julian_date: f64,
    /// Assumed one-sigma error of the propagated distance (AU).
    pub prediction_sigma_au: f64,
}

impl HistoricalValidator {
    /// Compare propagated heliocentric distance and speed with an external
    /// ephemeris.
    ///
    /// Cases are fetched one after another. A fetch error or a non-finite
    /// prediction becomes a failure entry for that case only.
    pub async fn validate_against_ephemeris<F, Fut>(
        &self,
        cases: &[EphemerisCase],
        fetch: F,
    ) -> ValidationReport
    where
        F: Fn(EphemerisQuery) -> Fut,
        Fut: Future<Output = ImpactResult<EphemerisState>>,
    {
        let mut results = Vec::new();
        let mut failures = Vec::new();
        for case in cases {
            let query = EphemerisQuery {
                designation: case.designation.clone(),
                julian_date: case.julian_date,
            };
            let outcome = match fetch(query).await {
                Ok(state) => self.compare_state(case, &state),
                Err(e) => Err(e),
            };
            match outcome {
                Ok(mut r) => results.append(&mut r),
                Err(e) => {
                    warn!(object = %case.designation, error = %e, "Ephemeris validation failed");
                    failures.push(ValidationFailure::new(&case.designation, "*", &e));
                }
            }
        }
        let report = ValidationReport::new(self.registry.version.clone(), results, failures);
        info!(
            results = report.results.len(),
            failures = report.failures.len(),
            "Ephemeris validation complete"
        );
        report
    }

    fn compare_state(
        &self,
        case: &EphemerisCase,
        reference: &EphemerisState,
    ) -> ImpactResult<Vec<ValidationResult>> {
        if !reference.position.is_finite() || !reference.velocity.is_finite() {
            return Err(ImpactError::Ephemeris(format!(
                "non-finite state returned for {}",
                case.designation
            )));
        }
        let predicted = calculate_position(&case.elements, reference.julian_date);
        if !predicted.position.is_finite() || !predicted.velocity.is_finite() {
            return Err(ImpactError::non_finite(format!("{} state", case.designation)));
        }

        let a = case.elements.semi_major_axis_au;
        let speed = predicted.velocity.magnitude();
        // Relative speed error follows half the relative distance error.
        let speed_sigma = if a > 0.0 {
            0.5 * speed * case.prediction_sigma_au / a
        } else {
            0.0
        };

        let distance = self.comparator.validate(
            case.designation.clone(),
            "heliocentric_distance_au",
            UncertainValue::new(predicted.distance_au(), case.prediction_sigma_au, "AU", "propagated orbit"),
            UncertainValue::new(
                reference.position.magnitude(),
                reference.position_sigma_au,
                "AU",
                "ephemeris",
            ),
        );
        let velocity = self.comparator.validate(
            case.designation.clone(),
            "heliocentric_speed_au_per_day",
            UncertainValue::new(speed, speed_sigma, "AU/d", "propagated orbit"),
            UncertainValue::new(
                reference.velocity.magnitude(),
                reference.velocity_sigma_au_per_day,
                "AU/d",
                "ephemeris",
            ),
        );
        Ok(vec![distance, velocity])
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::units::J2000_JD;

    fn earth_case(jd: f64) -> EphemerisCase {
        EphemerisCase {
            designation: "Earth".to_string(),
            elements: OrbitalElements::earth_j2000(),
            julian_date: jd,
            prediction_sigma_au: 1e-4,
        }
    }

    #[tokio::test]
    async fn test_self_consistent_source_agrees() {
        let validator = HistoricalValidator::with_builtin();
        let cases = [earth_case(J2000_JD), earth_case(J2000_JD + 100.0)];
        let report = validator
            .validate_against_ephemeris(&cases, |q| async move {
                let s = calculate_position(&OrbitalElements::earth_j2000(), q.julian_date);
                Ok(EphemerisState {
                    julian_date: s.julian_date,
                    position: s.position,
                    velocity: s.velocity,
                    position_sigma_au: 1e-6,
                    velocity_sigma_au_per_day: 1e-8,
                })
            })
            .await;
        assert!(report.failures.is_empty());
        assert_eq!(report.results.len(), 4);
        assert!(report.all_within_uncertainty());
    }

    #[tokio::test]
    async fn test_fetch_error_is_isolated() {
        let validator = HistoricalValidator::with_builtin();
        let cases = [earth_case(J2000_JD), earth_case(J2000_JD + 1.0)];
        let report = validator
            .validate_against_ephemeris(&cases, |q| async move {
                if q.julian_date > J2000_JD {
                    return Err(ImpactError::Ephemeris("service unavailable".into()));
                }
                let s = calculate_position(&OrbitalElements::earth_j2000(), q.julian_date);
                Ok(EphemerisState {
                    julian_date: s.julian_date,
                    position: s.position,
                    velocity: s.velocity,
                    position_sigma_au: 0.0,
                    velocity_sigma_au_per_day: 0.0,
                })
            })
            .await;
        assert_eq!(report.results.len(), 2);
        assert_eq!(report.failures.len(), 1);
        assert!(report.failures[0].error.contains("service unavailable"));
    }

    #[tokio::test]
    async fn test_non_finite_state_is_rejected() {
        let validator = HistoricalValidator::with_builtin();
        let report = validator
            .validate_against_ephemeris(&[earth_case(J2000_JD)], |q| async move {
                Ok(EphemerisState {
                    julian_date: q.julian_date,
                    position: Vec3::new(f64::NAN, 0.0, 0.0),
                    velocity: Vec3::default(),
                    position_sigma_au: 0.0,
                    velocity_sigma_au_per_day: 0.0,
                })
            })
            .await;
        assert!(report.results.is_empty());
        assert_eq!(report.failures.len(), 1);
    }
}
