//! End-to-end checks of the engine's documented physical and statistical
//! properties, through the public API only.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use impact_engine::deflection::{DeflectionEvaluator, DeflectionStrategy, ThreatAssessment};
use impact_engine::impact::{BlastEffects, ExposureData, ImpactEffectsCalculator, ImpactScenario};
use impact_engine::orbit::solve_kepler;
use impact_engine::uncertainty::{
    LinearTerm, PowerFactor, UncertainValue, UncertaintyPropagator, UncertaintyVariable,
};
use impact_engine::units::J2000_JD;
use impact_engine::validation::{AgreementStatus, BenchmarkComparator};
use proptest::prelude::*;

fn threat() -> ThreatAssessment {
    ThreatAssessment {
        velocity_km_s: 20.0,
        distance_au: 0.1,
        size_m: 150.0,
        mass_kg: 4.0e9,
        impact_probability: 0.01,
        economic_value_at_risk_usd: 1.0e12,
    }
}

#[test]
fn kinetic_energy_scales_with_velocity_squared_and_mass() {
    let base = ImpactEffectsCalculator::kinetic_energy(1.0e8, 15_000.0);
    let fast = ImpactEffectsCalculator::kinetic_energy(1.0e8, 30_000.0);
    let heavy = ImpactEffectsCalculator::kinetic_energy(3.0e8, 15_000.0);
    assert!((fast / base - 4.0).abs() < 0.04);
    assert!((heavy / base - 3.0).abs() < 0.03);
}

#[test]
fn crater_grows_with_energy() {
    let calc = ImpactEffectsCalculator::default();
    let mut previous = 0.0;
    for k in 10..24 {
        let d = calc.crater(10f64.powi(k), 2500.0, 45.0).diameter_m;
        assert!(d > previous, "E=1e{k}: {d} <= {previous}");
        previous = d;
    }
}

#[test]
fn overpressure_decays_with_distance() {
    let calc = ImpactEffectsCalculator::default();
    let mut previous = f64::INFINITY;
    for step in 1..200 {
        let p = calc.overpressure_at(1_000.0, f64::from(step) * 0.5, 2.0);
        assert!(p < previous, "{p} at step {step}");
        previous = p;
    }
}

fn metro() -> ExposureData {
    ExposureData {
        population_density_per_km2: 100.0,
        total_population: 1.0e9,
        infrastructure_value_usd: 2.0e11,
        gdp_per_capita_usd: 30_000.0,
    }
}

#[test]
fn non_finite_blast_radius_reaches_casualties() {
    let calc = ImpactEffectsCalculator::default();
    for (fireball, airblast, thermal) in [
        (1.0, f64::NAN, 5.0),
        (f64::NAN, 2.0, 5.0),
        (1.0, 2.0, f64::INFINITY),
    ] {
        let blast = BlastEffects {
            fireball_radius_km: fireball,
            airblast_radius_km: airblast,
            thermal_radius_km: thermal,
            seismic_magnitude: 0.0,
            burst_altitude_km: 0.0,
        };
        let c = calc.casualties(&blast, &metro());
        for count in [c.immediate, c.injured, c.displaced] {
            assert!(!count.is_finite(), "{blast:?} gave {c:?}");
        }
    }
}

#[test]
fn non_finite_mass_or_velocity_reaches_every_downstream_value() {
    let calc = ImpactEffectsCalculator::default();
    for scenario in [
        ImpactScenario::new(f64::INFINITY, 20.0, 45.0),
        ImpactScenario::new(f64::NAN, 20.0, 45.0),
        ImpactScenario::new(1.0e9, f64::NAN, 45.0),
        ImpactScenario::new(1.0e9, f64::INFINITY, 45.0).with_burst_altitude(8.0),
    ] {
        let r = calc.calculate(&scenario, &metro());
        let downstream = [
            r.kinetic_energy_j,
            r.tnt_equivalent_kt,
            r.crater.diameter_m,
            r.blast.fireball_radius_km,
            r.blast.airblast_radius_km,
            r.blast.thermal_radius_km,
            r.blast.seismic_magnitude,
            r.casualties.immediate,
            r.casualties.injured,
            r.casualties.displaced,
            r.economic.business_interruption,
            r.economic.total,
        ];
        for value in downstream {
            assert!(!value.is_finite(), "{scenario:?} gave {r:?}");
        }
    }
}

#[test]
fn linear_propagation_ignores_coefficient_sign() {
    let sum = UncertaintyPropagator::propagate_linear(&[
        LinearTerm::new(10.0, 1.0, 1.0),
        LinearTerm::new(5.0, 0.5, 1.0),
    ]);
    let diff = UncertaintyPropagator::propagate_linear(&[
        LinearTerm::new(10.0, 1.0, 1.0),
        LinearTerm::new(5.0, 0.5, -1.0),
    ]);
    assert!((sum.uncertainty - diff.uncertainty).abs() < 1e-15);
    assert!((diff.value - 5.0).abs() < 1e-12);
}

#[test]
fn multiplicative_propagation_of_ten_percent_factors() {
    let out = UncertaintyPropagator::propagate_multiplicative(&[
        PowerFactor::new(10.0, 1.0, 1.0),
        PowerFactor::new(5.0, 0.5, 1.0),
    ]);
    assert!((out.value - 50.0).abs() < 1e-12);
    assert!((out.uncertainty - 7.07).abs() < 0.1);
}

#[test]
fn energy_to_tnt_unit() {
    let calc = ImpactEffectsCalculator::default();
    assert!((calc.energy_to_tnt(4.184e9) - 1.0).abs() < 0.001);
}

#[test]
fn twelve_megaton_airburst_matches_tunguska_damage_radius() {
    let calc = ImpactEffectsCalculator::default();
    let predicted = calc.airblast_with_uncertainty(&UncertainValue::new(12_000.0, 3_000.0, "kt", "scenario"), 8.0);
    let reference = UncertainValue::new(30.0, 5.0, "km", "Vasilyev 1998");
    let result = BenchmarkComparator::default().validate("Tunguska", "airblast_radius_km", predicted, reference);
    assert!(result.within_uncertainty);
    assert!(matches!(result.status, AgreementStatus::Excellent | AgreementStatus::Good));
}

#[test]
fn monte_carlo_sum_of_normals() {
    let propagator = UncertaintyPropagator::default();
    let vars = [
        UncertaintyVariable::normal("x", UncertainValue::new(10.0, 1.0, "", "test")),
        UncertaintyVariable::normal("y", UncertainValue::new(5.0, 0.5, "", "test")),
    ];
    let out = propagator
        .propagate_nonlinear(&vars, |s| Ok(s.get("x")? + s.get("y")?))
        .unwrap();
    assert_eq!(out.requested_samples, 10_000);
    assert!((out.mean - 15.0).abs() < 1.0);
    assert!(out.convergence_achieved);
}

#[test]
fn catalog_comparison_is_sorted() {
    let results = DeflectionEvaluator::default().compare_strategies(&DeflectionStrategy::catalog(), &threat(), 10.0);
    assert_eq!(results.len(), 5);
    for pair in results.windows(2) {
        assert!(pair[0].cost_effectiveness >= pair[1].cost_effectiveness);
    }
}

proptest! {
    #[test]
    fn kepler_residual(e in 0.0f64..0.95, m in 0.0f64..std::f64::consts::TAU) {
        let big_e = solve_kepler(m, e);
        prop_assert!((big_e - e * big_e.sin() - m).abs() < 1e-10);
    }

    #[test]
    fn launch_window_is_ordered(
        lead in -5.0f64..30.0,
        time_to_impact in 0.0f64..50.0,
    ) {
        let strategy = DeflectionStrategy::new("s", "S", 0.01, lead, 1.0e9, 0.8, 1000.0);
        let w = DeflectionEvaluator::default().calculate_launch_window(&strategy, time_to_impact, J2000_JD);
        prop_assert!(w.earliest_launch_jd < w.latest_launch_jd);
        prop_assert!(w.earliest_launch_jd < w.optimal_launch_jd);
        prop_assert!(w.optimal_launch_jd < w.latest_launch_jd);
    }

    #[test]
    fn comparison_sorted_for_any_strategies(
        specs in prop::collection::vec((1e-4f64..1.0, 0.5f64..20.0, 1e6f64..1e10, 0.0f64..1.0), 1..12),
    ) {
        let strategies: Vec<DeflectionStrategy> = specs
            .iter()
            .enumerate()
            .map(|(i, &(dv, lead, cost, rate))| {
                DeflectionStrategy::new(format!("s{i}"), format!("Strategy {i}"), dv, lead, cost, rate, 1000.0)
            })
            .collect();
        let results = DeflectionEvaluator::default().compare_strategies(&strategies, &threat(), 8.0);
        prop_assert_eq!(results.len(), strategies.len());
        for pair in results.windows(2) {
            prop_assert!(pair[0].cost_effectiveness >= pair[1].cost_effectiveness);
        }
    }
}
