//! Configuration files on disk driving the engine components.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::io::Write;

use impact_engine::config::EngineConfig;
use impact_engine::deflection::{DeflectionEvaluator, DeflectionStrategy};
use impact_engine::impact::ImpactEffectsCalculator;
use impact_engine::uncertainty::{UncertainValue, UncertaintyPropagator, UncertaintyVariable};
use impact_engine::units::J2000_JD;
use impact_engine::validation::{HistoricalValidator, ReferenceRegistry};
use impact_engine::ImpactError;

fn write_config(yaml: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(yaml.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn saved_defaults_load_back() {
    let original = EngineConfig::builder().seed(2024).samples(4000).build();
    let file = write_config(&original.to_yaml().unwrap());

    let loaded = EngineConfig::load(file.path()).unwrap();
    assert_eq!(loaded.monte_carlo.seed, 2024);
    assert_eq!(loaded.monte_carlo.samples, 4000);
    assert!((loaded.impact.crater_k1 - original.impact.crater_k1).abs() < f64::EPSILON);
}

#[test]
fn calibration_override_changes_results() {
    let file = write_config("impact:\n  airblast_coefficient_km: 2.6\n");
    let config = EngineConfig::load(file.path()).unwrap();

    let stock = ImpactEffectsCalculator::default();
    let tuned = ImpactEffectsCalculator::new(config.impact);
    let yield_kt = UncertainValue::new(1_000.0, 100.0, "kt", "test");
    let a = stock.airblast_with_uncertainty(&yield_kt, 0.0).value;
    let b = tuned.airblast_with_uncertainty(&yield_kt, 0.0).value;
    assert!((b / a - 2.0).abs() < 1e-12);
}

#[test]
fn monte_carlo_settings_reach_the_propagator() {
    let file = write_config("monte_carlo:\n  samples: 2000\n  seed: 7\n");
    let config = EngineConfig::load(file.path()).unwrap();
    let propagator = UncertaintyPropagator::new(config.monte_carlo).unwrap();

    let vars = [UncertaintyVariable::normal("x", UncertainValue::new(1.0, 0.1, "", "test"))];
    let a = propagator.propagate_nonlinear(&vars, |s| s.get("x")).unwrap();
    let b = propagator.propagate_nonlinear(&vars, |s| s.get("x")).unwrap();
    assert_eq!(a.requested_samples, 2000);
    assert_eq!(a.mean.to_bits(), b.mean.to_bits());
}

#[test]
fn deflection_window_factors_from_file() {
    let file = write_config("deflection:\n  earliest_launch_factor: 2.0\n  latest_launch_factor: 0.5\n");
    let config = EngineConfig::load(file.path()).unwrap();
    let evaluator = DeflectionEvaluator::new(config.deflection);
    let strategy = DeflectionStrategy::new("k", "K", 0.01, 2.0, 1.0e9, 0.9, 500.0);
    let w = evaluator.calculate_launch_window(&strategy, 10.0, J2000_JD);
    let lead = 2.0 * 365.25;
    assert!((w.impact_jd - w.earliest_launch_jd - 2.0 * lead).abs() < 1e-6);
    assert!((w.impact_jd - w.latest_launch_jd - 0.5 * lead).abs() < 1e-6);
}

#[test]
fn strict_thresholds_from_file_change_classification() {
    let file = write_config(
        "validation:\n  excellent_sigma: 0.01\n  good_sigma: 0.02\n  acceptable_sigma: 0.03\n  within_uncertainty_sigma: 0.01\n",
    );
    let config = EngineConfig::load(file.path()).unwrap();
    let report = HistoricalValidator::new(ReferenceRegistry::builtin(), &config).validate_all_events();
    assert!(report.failures.is_empty());
    assert!(report.overall_accuracy_percent < 100.0);
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = EngineConfig::load(dir.path().join("absent.yaml"));
    assert!(matches!(result, Err(ImpactError::Io(_))));
}

#[test]
fn malformed_file_is_rejected() {
    let file = write_config("monte_carlo: [1, 2\n");
    assert!(matches!(
        EngineConfig::load(file.path()),
        Err(ImpactError::YamlParse(_))
    ));
}
