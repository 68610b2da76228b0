//! Trajectory-change and mission-success model.

use tracing::debug;

use super::strategy::{
    DeflectionResult, DeflectionStrategy, LaunchWindow, MissionAssessment, ThreatAssessment,
};
use crate::config::DeflectionCalibration;
use crate::units::{au_to_m, km_per_s_to_m_per_s, years_to_seconds, DAYS_PER_JULIAN_YEAR};

/// Shortest lead time a launch window is built from (days).
const MIN_LEAD_TIME_DAYS: f64 = 1.0;

/// Stateless evaluator over a calibration table.
#[derive(Debug, Clone, Default)]
pub struct DeflectionEvaluator {
    calibration: DeflectionCalibration,
}

impl DeflectionEvaluator {
    /// Evaluator with explicit calibration constants.
    #[must_use]
    pub const fn new(calibration: DeflectionCalibration) -> Self {
        Self { calibration }
    }

    /// Calibration in use.
    #[must_use]
    pub const fn calibration(&self) -> &DeflectionCalibration {
        &self.calibration
    }

    /// Small-angle trajectory change (degrees): `(ΔV/v)·(v·t/d)` in SI.
    #[must_use]
    pub fn trajectory_change(
        delta_v_m_s: f64,
        asteroid_velocity_km_s: f64,
        distance_au: f64,
        time_to_impact_years: f64,
    ) -> f64 {
        let v = km_per_s_to_m_per_s(asteroid_velocity_km_s);
        let t = years_to_seconds(time_to_impact_years);
        let d = au_to_m(distance_au);
        ((delta_v_m_s / v) * (v * t / d)).to_degrees()
    }

    /// Probability removed by a trajectory change, saturating at the
    /// calibration angle (0.1°).
    #[must_use]
    pub fn impact_probability_reduction(&self, trajectory_change_deg: f64, original_probability: f64) -> f64 {
        let ratio = trajectory_change_deg.abs() / self.calibration.saturation_angle_deg;
        let fraction = if ratio > 1.0 { 1.0 } else { ratio };
        original_probability * fraction
    }

    /// ΔV that moves the arrival point by the target miss distance over
    /// `lead_time_years`: `R⊕ / (3·t)`.
    #[must_use]
    pub fn required_delta_v(&self, lead_time_years: f64) -> f64 {
        let t = years_to_seconds(lead_time_years);
        if t <= 0.0 {
            return f64::INFINITY;
        }
        self.calibration.target_miss_distance_m / (self.calibration.along_track_amplification * t)
    }

    /// Penalize the strategy's success rate for this situation.
    ///
    /// Penalties multiply, so their order is irrelevant; every one that
    /// applies is recorded.
    #[must_use]
    pub fn assess_mission_success(
        &self,
        strategy: &DeflectionStrategy,
        available_lead_time_years: f64,
        asteroid_size_m: f64,
        asteroid_mass_kg: f64,
    ) -> MissionAssessment {
        let cal = &self.calibration;
        let mut probability = strategy.success_rate;
        let mut factors = Vec::new();

        if available_lead_time_years < strategy.lead_time_years {
            probability *= cal.insufficient_lead_time_penalty;
            factors.push(format!(
                "insufficient lead time: {available_lead_time_years:.2} yr available, {:.2} yr needed",
                strategy.lead_time_years
            ));
        }
        if asteroid_size_m > cal.large_asteroid_threshold_m {
            probability *= cal.large_asteroid_penalty;
            factors.push(format!(
                "large asteroid: {asteroid_size_m:.0} m exceeds {:.0} m",
                cal.large_asteroid_threshold_m
            ));
        }

        let required = self.required_delta_v(available_lead_time_years);
        if required > cal.delta_v_ratio_threshold * strategy.delta_v_m_s {
            probability *= cal.excessive_delta_v_penalty;
            factors.push(format!(
                "required delta-v {required:.3e} m/s exceeds {}x nominal {:.3e} m/s",
                cal.delta_v_ratio_threshold, strategy.delta_v_m_s
            ));
        }
        if cal.unproven_strategy_ids.iter().any(|id| *id == strategy.id) {
            probability *= cal.unproven_technology_penalty;
            factors.push(format!("unproven technology: {}", strategy.id));
        }

        MissionAssessment {
            success: probability > cal.success_threshold,
            probability,
            factors,
            required_delta_v_m_s: required,
            required_momentum: asteroid_mass_kg * required,
        }
    }

    /// Evaluate one strategy against a threat.
    #[must_use]
    pub fn evaluate(
        &self,
        strategy: &DeflectionStrategy,
        threat: &ThreatAssessment,
        time_to_impact_years: f64,
    ) -> DeflectionResult {
        let change = Self::trajectory_change(
            strategy.delta_v_m_s,
            threat.velocity_km_s,
            threat.distance_au,
            time_to_impact_years,
        );
        let reduction = self.impact_probability_reduction(change, threat.impact_probability);
        let assessment =
            self.assess_mission_success(strategy, time_to_impact_years, threat.size_m, threat.mass_kg);
        let cost_effectiveness = if strategy.cost_usd == 0.0 {
            f64::INFINITY
        } else {
            reduction * threat.economic_value_at_risk_usd / strategy.cost_usd
        };

        DeflectionResult {
            strategy_id: strategy.id.clone(),
            strategy_name: strategy.name.clone(),
            trajectory_change_deg: change,
            probability_reduction: reduction,
            success: assessment.success,
            success_probability: assessment.probability,
            cost_effectiveness,
            risk_factors: assessment.factors,
            required_delta_v_m_s: assessment.required_delta_v_m_s,
        }
    }

    /// Evaluate every strategy and rank by cost-effectiveness, best first.
    /// NaN scores rank last.
    #[must_use]
    pub fn compare_strategies(
        &self,
        strategies: &[DeflectionStrategy],
        threat: &ThreatAssessment,
        time_to_impact_years: f64,
    ) -> Vec<DeflectionResult> {
        let mut results: Vec<DeflectionResult> = strategies
            .iter()
            .map(|s| self.evaluate(s, threat, time_to_impact_years))
            .collect();

        let score = |r: &DeflectionResult| {
            if r.cost_effectiveness.is_nan() {
                f64::NEG_INFINITY
            } else {
                r.cost_effectiveness
            }
        };
        results.sort_by(|a, b| score(b).total_cmp(&score(a)));

        debug!(
            strategies = results.len(),
            best = results.first().map(|r| r.strategy_id.as_str()),
            "strategies ranked"
        );
        results
    }

    /// Launch window for a strategy, as Julian dates.
    ///
    /// Impact is `time_to_impact_years` after `reference_jd`; launches are
    /// 1.5×, 1× and 0.8× the strategy lead time before it. Lead times under
    /// one day are raised to one day.
    #[must_use]
    pub fn calculate_launch_window(
        &self,
        strategy: &DeflectionStrategy,
        time_to_impact_years: f64,
        reference_jd: f64,
    ) -> LaunchWindow {
        let cal = &self.calibration;
        let impact_jd = reference_jd + time_to_impact_years * DAYS_PER_JULIAN_YEAR;
        let lead_days = strategy.lead_time_years * DAYS_PER_JULIAN_YEAR;
        let lead_days = if lead_days < MIN_LEAD_TIME_DAYS {
            MIN_LEAD_TIME_DAYS
        } else {
            lead_days
        };
        LaunchWindow {
            impact_jd,
            earliest_launch_jd: impact_jd - cal.earliest_launch_factor * lead_days,
            optimal_launch_jd: impact_jd - lead_days,
            latest_launch_jd: impact_jd - cal.latest_launch_factor * lead_days,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::{AU_KM, J2000_JD, SECONDS_PER_JULIAN_YEAR};

    fn evaluator() -> DeflectionEvaluator {
        DeflectionEvaluator::default()
    }

    fn kinetic() -> DeflectionStrategy {
        DeflectionStrategy::new("kinetic_impactor", "Kinetic Impactor", 0.01, 5.0, 5.0e8, 0.9, 600.0)
    }

    fn threat() -> ThreatAssessment {
        ThreatAssessment {
            velocity_km_s: 15.0,
            distance_au: 0.05,
            size_m: 150.0,
            mass_kg: 4.0e9,
            impact_probability: 0.01,
            economic_value_at_risk_usd: 1.0e12,
        }
    }

    #[test]
    fn test_trajectory_change_formula() {
        let deg = DeflectionEvaluator::trajectory_change(0.01, 15.0, 0.1, 10.0);
        let expected = (0.01 * 10.0 * SECONDS_PER_JULIAN_YEAR / (0.1 * AU_KM * 1000.0)).to_degrees();
        assert!((deg - expected).abs() / expected < 1e-9);
    }

    #[test]
    fn test_probability_reduction_saturates() {
        let e = evaluator();
        assert!((e.impact_probability_reduction(0.05, 0.2) - 0.1).abs() < 1e-12);
        assert!((e.impact_probability_reduction(0.1, 0.2) - 0.2).abs() < 1e-12);
        assert!((e.impact_probability_reduction(5.0, 0.2) - 0.2).abs() < 1e-12);
        assert!((e.impact_probability_reduction(-0.05, 0.2) - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_no_penalties() {
        let a = evaluator().assess_mission_success(&kinetic(), 20.0, 100.0, 1.0e9);
        assert!(a.factors.is_empty(), "{:?}", a.factors);
        assert!((a.probability - 0.9).abs() < 1e-12);
        assert!(a.success);
    }

    #[test]
    fn test_all_penalties_recorded() {
        let mut s = kinetic();
        s.id = "gravity_tractor".to_string();
        s.delta_v_m_s = 1e-6;
        let a = evaluator().assess_mission_success(&s, 1.0, 500.0, 1.0e11);
        assert_eq!(a.factors.len(), 4, "{:?}", a.factors);
        let expected = 0.9 * 0.5 * 0.8 * 0.7 * 0.9;
        assert!((a.probability - expected).abs() < 1e-12);
        assert!(!a.success);
    }

    #[test]
    fn test_required_delta_v() {
        let e = evaluator();
        let dv = e.required_delta_v(10.0);
        let expected = crate::units::EARTH_RADIUS_M / (3.0 * 10.0 * SECONDS_PER_JULIAN_YEAR);
        assert!((dv - expected).abs() < 1e-15);
        assert!(e.required_delta_v(0.0).is_infinite());

        let a = e.assess_mission_success(&kinetic(), 10.0, 100.0, 2.0e9);
        assert!((a.required_momentum - 2.0e9 * expected).abs() / a.required_momentum < 1e-12);
    }

    #[test]
    fn test_zero_cost_is_infinitely_effective() {
        let mut free = kinetic();
        free.cost_usd = 0.0;
        let r = evaluator().evaluate(&free, &threat(), 10.0);
        assert!(r.cost_effectiveness.is_infinite());
    }

    #[test]
    fn test_compare_sorted() {
        let ranked = evaluator().compare_strategies(&DeflectionStrategy::catalog(), &threat(), 10.0);
        assert_eq!(ranked.len(), 5);
        for pair in ranked.windows(2) {
            assert!(pair[0].cost_effectiveness >= pair[1].cost_effectiveness);
        }
    }

    #[test]
    fn test_nan_ranks_last() {
        let mut broken = kinetic();
        broken.id = "broken".to_string();
        broken.delta_v_m_s = f64::NAN;
        let ranked = evaluator().compare_strategies(&[broken, kinetic()], &threat(), 10.0);
        assert_eq!(ranked[0].strategy_id, "kinetic_impactor");
        assert!(ranked[1].cost_effectiveness.is_nan());
    }

    #[test]
    fn test_launch_window() {
        let w = evaluator().calculate_launch_window(&kinetic(), 10.0, J2000_JD);
        assert!((w.impact_jd - (J2000_JD + 3652.5)).abs() < 1e-9);
        assert!((w.optimal_launch_jd - (w.impact_jd - 5.0 * 365.25)).abs() < 1e-9);
        assert!(w.earliest_launch_jd < w.optimal_launch_jd);
        assert!(w.optimal_launch_jd < w.latest_launch_jd);
    }

    #[test]
    fn test_launch_window_zero_lead_time() {
        let mut s = kinetic();
        s.lead_time_years = 0.0;
        let w = evaluator().calculate_launch_window(&s, 1.0, J2000_JD);
        assert!(w.earliest_launch_jd < w.optimal_launch_jd);
        assert!(w.optimal_launch_jd < w.latest_launch_jd);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::units::J2000_JD;
    use proptest::prelude::*;

    proptest! {
        /// earliest < optimal < latest for any lead time.
        #[test]
        fn prop_launch_window_ordered(lead in -5.0f64..100.0, t in 0.0f64..200.0) {
            let s = DeflectionStrategy::new("x", "x", 0.01, lead, 1.0e8, 0.8, 500.0);
            let w = DeflectionEvaluator::default().calculate_launch_window(&s, t, J2000_JD);
            prop_assert!(w.earliest_launch_jd < w.optimal_launch_jd);
            prop_assert!(w.optimal_launch_jd < w.latest_launch_jd);
        }

        /// Reduction never exceeds the original probability.
        #[test]
        fn prop_reduction_bounded(change in -10.0f64..10.0, p in 0.0f64..1.0) {
            let r = DeflectionEvaluator::default().impact_probability_reduction(change, p);
            prop_assert!(r >= 0.0 && r <= p);
        }
    }
}
