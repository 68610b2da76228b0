//! Validation of impact-effect predictions against historical events.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use tracing::{debug, info, warn};

use super::compare::{BenchmarkComparator, ValidationResult};
use super::registry::{EventParameter, HistoricalEvent, ReferenceRegistry};
use super::report::{ValidationFailure, ValidationReport};
use crate::config::EngineConfig;
use crate::error::{ImpactError, ImpactResult};
use crate::impact::ImpactEffectsCalculator;
use crate::uncertainty::{PowerFactor, UncertainValue, UncertaintyPropagator};
use crate::units::JOULES_PER_KILOTON_TNT;

/// Model predictions for one historical event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventPrediction {
    /// Kinetic energy of the reconstructed impactor (physical kt TNT).
    pub energy_kt: UncertainValue,
    /// Ground airblast radius scaled from the published yield (km).
    pub airblast_radius: UncertainValue,
    /// Seismic magnitude of the kinetic energy.
    pub seismic_magnitude: UncertainValue,
}

impl EventPrediction {
    /// Prediction for one parameter.
    #[must_use]
    pub const fn get(&self, parameter: EventParameter) -> &UncertainValue {
        match parameter {
            EventParameter::Energy => &self.energy_kt,
            EventParameter::AirblastRadius => &self.airblast_radius,
            EventParameter::SeismicMagnitude => &self.seismic_magnitude,
        }
    }
}

/// Runs the engine's models against the reference registry.
///
/// Each parameter of each case is evaluated independently: a prediction
/// that is not finite is recorded as a failure and the run continues.
#[derive(Debug, Clone)]
pub struct HistoricalValidator {
    pub(super) registry: ReferenceRegistry,
    pub(super) calculator: ImpactEffectsCalculator,
    pub(super) comparator: BenchmarkComparator,
}

impl Default for HistoricalValidator {
    fn default() -> Self {
        Self::with_builtin()
    }
}

impl HistoricalValidator {
    /// Validator over a registry with the configured calibration.
    #[must_use]
    pub fn new(registry: ReferenceRegistry, config: &EngineConfig) -> Self {
        Self {
            registry,
            calculator: ImpactEffectsCalculator::new(config.impact.clone()),
            comparator: BenchmarkComparator::new(config.validation.clone()),
        }
    }

    /// Validator over the built-in registry with default calibration.
    #[must_use]
    pub fn with_builtin() -> Self {
        Self::new(ReferenceRegistry::builtin(), &EngineConfig::default())
    }

    /// Reference data in use.
    #[must_use]
    pub const fn registry(&self) -> &ReferenceRegistry {
        &self.registry
    }

    /// Mass `π/6·D³·ρ` with first-order uncertainty.
    #[must_use]
    pub fn event_mass(event: &HistoricalEvent) -> UncertainValue {
        UncertaintyPropagator::propagate_multiplicative(&[
            PowerFactor::of(&event.inputs.diameter_m, 3.0),
            PowerFactor::of(&event.inputs.density, 1.0),
        ])
        .scaled(PI / 6.0, "kg")
        .with_source(format!("{} mass", event.name))
    }

    /// Model predictions for one event.
    ///
    /// Energy and seismic magnitude come from the reconstructed impactor.
    /// The blast footprint is scaled from the published yield, since the
    /// radius law is calibrated in yield rather than in joules.
    #[must_use]
    pub fn predict_event(&self, event: &HistoricalEvent) -> EventPrediction {
        let inputs = &event.inputs;
        let mass = Self::event_mass(event);
        let estimate = self.calculator.energy_with_uncertainty(
            &mass,
            &inputs.velocity_km_s,
            inputs.burst_altitude_km,
        );
        EventPrediction {
            energy_kt: estimate
                .kinetic_energy
                .scaled(1.0 / JOULES_PER_KILOTON_TNT, "kt")
                .with_source("kinetic energy"),
            airblast_radius: self
                .calculator
                .airblast_with_uncertainty(&inputs.yield_kt, inputs.burst_altitude_km),
            seismic_magnitude: estimate.seismic_magnitude,
        }
    }

    /// Validate one event against each of its reference values.
    ///
    /// Parameters are compared independently. A parameter whose prediction
    /// is not finite yields [`ImpactError::NonFiniteValue`] without
    /// affecting the other parameters of the event.
    #[must_use]
    pub fn validate_event(
        &self,
        event: &HistoricalEvent,
    ) -> Vec<(EventParameter, ImpactResult<ValidationResult>)> {
        let prediction = self.predict_event(event);
        event
            .references
            .iter()
            .map(|(parameter, reference)| {
                let outcome = self.compare_parameter(
                    &event.name,
                    parameter.name(),
                    prediction.get(*parameter),
                    reference,
                );
                (*parameter, outcome)
            })
            .collect()
    }

    pub(super) fn compare_parameter(
        &self,
        case: &str,
        parameter: &'static str,
        predicted: &UncertainValue,
        reference: &UncertainValue,
    ) -> ImpactResult<ValidationResult> {
        if !predicted.is_finite() {
            return Err(ImpactError::non_finite(format!("{case} {parameter}")));
        }
        let result = self
            .comparator
            .validate(case, parameter, predicted.clone(), reference.clone());
        debug!(
            case,
            parameter,
            sigma = result.sigma_deviation,
            status = %result.status,
            "Compared parameter"
        );
        Ok(result)
    }

    /// Validate every historical event in the registry.
    #[must_use]
    pub fn validate_all_events(&self) -> ValidationReport {
        let mut results = Vec::new();
        let mut failures = Vec::new();
        for event in &self.registry.events {
            for (parameter, outcome) in self.validate_event(event) {
                match outcome {
                    Ok(r) => results.push(r),
                    Err(e) => {
                        warn!(
                            event = %event.name,
                            parameter = parameter.name(),
                            error = %e,
                            "Event parameter failed"
                        );
                        failures.push(ValidationFailure::new(&event.name, parameter.name(), &e));
                    }
                }
            }
        }
        let report = ValidationReport::new(self.registry.version.clone(), results, failures);
        info!(
            results = report.results.len(),
            failures = report.failures.len(),
            accuracy = report.overall_accuracy_percent,
            "Historical event validation complete"
        );
        report
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::validation::registry::EventInputs;
    use crate::validation::AgreementStatus;

    #[test]
    fn test_tunguska_mass() {
        let v = HistoricalValidator::with_builtin();
        let event = v.registry().event("Tunguska").unwrap();
        let mass = HistoricalValidator::event_mass(event);
        let expected = PI / 6.0 * 60.0f64.powi(3) * 2200.0;
        assert!((mass.value - expected).abs() / expected < 1e-12);
        // σ/m = √((3·10/60)² + (500/2200)²)
        let rel = (0.5f64.powi(2) + (500.0f64 / 2200.0).powi(2)).sqrt();
        assert!((mass.relative_uncertainty() - rel).abs() < 1e-12);
    }

    #[test]
    fn test_tunguska_agreement() {
        let v = HistoricalValidator::with_builtin();
        let event = v.registry().event("Tunguska").unwrap();
        let results: Vec<ValidationResult> =
            v.validate_event(event).into_iter().map(|(_, r)| r.unwrap()).collect();
        assert_eq!(results.len(), 3);
        for r in &results {
            assert!(r.within_uncertainty, "{}: {}σ", r.parameter, r.sigma_deviation);
            assert_eq!(r.status, AgreementStatus::Excellent, "{}", r.parameter);
        }
        let energy = results.iter().find(|r| r.parameter == "energy_kt").unwrap();
        assert!((energy.predicted.value - 11_900.0).abs() < 200.0);
    }

    #[test]
    fn test_tunguska_seismic_from_kinetic_energy() {
        let v = HistoricalValidator::with_builtin();
        let p = v.predict_event(v.registry().event("Tunguska").unwrap());
        assert!((p.seismic_magnitude.value - 5.32).abs() < 0.02, "{}", p.seismic_magnitude);
        assert!((p.airblast_radius.value - 27.6).abs() < 0.5, "{}", p.airblast_radius);
    }

    #[test]
    fn test_chelyabinsk_energy() {
        let v = HistoricalValidator::with_builtin();
        let event = v.registry().event("Chelyabinsk").unwrap();
        let results: Vec<ValidationResult> =
            v.validate_event(event).into_iter().map(|(_, r)| r.unwrap()).collect();
        assert_eq!(results.len(), 1);
        assert!(results[0].within_uncertainty, "{}σ", results[0].sigma_deviation);
    }

    #[test]
    fn test_non_finite_parameter_keeps_finite_siblings() {
        let mut registry = ReferenceRegistry::builtin();
        let mut broken = registry.events[0].clone();
        broken.name = "Broken".to_string();
        broken.inputs = EventInputs {
            velocity_km_s: UncertainValue::new(f64::NAN, 1.0, "km/s", "test"),
            ..broken.inputs
        };
        registry.events.push(broken);

        let report = HistoricalValidator::new(registry, &EngineConfig::default()).validate_all_events();
        let mut failed: Vec<&str> = report.failures.iter().map(|f| f.parameter.as_str()).collect();
        failed.sort_unstable();
        assert_eq!(failed, vec!["energy_kt", "seismic_magnitude"]);
        assert!(report.failures.iter().all(|f| f.case == "Broken"));

        // The airblast radius is scaled from the published yield, not the velocity
        let airblast = report.result("Broken", "airblast_radius_km").unwrap();
        assert!(airblast.predicted.value.is_finite());
        assert_eq!(report.results.len(), 5);
    }

    #[test]
    fn test_validate_event_reports_each_parameter() {
        let v = HistoricalValidator::with_builtin();
        let mut event = v.registry().event("Tunguska").unwrap().clone();
        event.inputs.density.value = f64::INFINITY;
        let outcomes = v.validate_event(&event);
        assert_eq!(outcomes.len(), 3);
        for (parameter, outcome) in &outcomes {
            match parameter {
                EventParameter::AirblastRadius => assert!(outcome.is_ok()),
                _ => assert!(matches!(outcome, Err(ImpactError::NonFiniteValue { .. }))),
            }
        }
    }

    #[test]
    fn test_all_events_report() {
        let report = HistoricalValidator::with_builtin().validate_all_events();
        assert!(report.failures.is_empty());
        assert!((report.overall_accuracy_percent - 100.0).abs() < f64::EPSILON);
        assert_eq!(report.statistics["energy_kt"].count, 2);
    }
}
