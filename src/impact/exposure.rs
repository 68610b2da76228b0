//! Population and economic exposure around an impact site.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use super::effects::BlastEffects;
use crate::config::ImpactCalibration;

/// What is at risk around the impact point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExposureData {
    /// People per km².
    pub population_density_per_km2: f64,
    /// Population of the whole region (caps every casualty count).
    pub total_population: f64,
    /// Infrastructure value in the region (USD).
    pub infrastructure_value_usd: f64,
    /// GDP per capita (USD).
    pub gdp_per_capita_usd: f64,
}

impl ExposureData {
    /// Unpopulated region with no assets.
    #[must_use]
    pub const fn uninhabited() -> Self {
        Self {
            population_density_per_km2: 0.0,
            total_population: 0.0,
            infrastructure_value_usd: 0.0,
            gdp_per_capita_usd: 0.0,
        }
    }
}

/// Casualty estimate. Counts are whole people.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Casualties {
    /// Immediate fatalities.
    pub immediate: f64,
    /// Injured.
    pub injured: f64,
    /// Displaced.
    pub displaced: f64,
}

/// Economic loss estimate (USD).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EconomicImpact {
    /// Destroyed infrastructure.
    pub direct_damage: f64,
    /// Indirect losses.
    pub indirect_losses: f64,
    /// Business interruption over the airblast footprint.
    pub business_interruption: f64,
    /// Sum of the above.
    pub total: f64,
}

/// Floor to a whole count in `[0, cap]`. Non-finite counts pass through.
fn whole_count(x: f64, cap: f64) -> f64 {
    if !x.is_finite() {
        return x;
    }
    let floored = x.floor();
    let floored = if floored < 0.0 { 0.0 } else { floored };
    if floored > cap {
        cap
    } else {
        floored
    }
}

/// Larger of two radii, NaN when either is NaN.
fn nan_max(a: f64, b: f64) -> f64 {
    if a.is_nan() || b.is_nan() {
        f64::NAN
    } else if a > b {
        a
    } else {
        b
    }
}

fn disc_area(radius_km: f64) -> f64 {
    PI * radius_km * radius_km
}

/// Split population over nested fireball ⊂ airblast ⊂ thermal zones.
pub(crate) fn casualties(cal: &ImpactCalibration, blast: &BlastEffects, exposure: &ExposureData) -> Casualties {
    let density = exposure.population_density_per_km2;
    let total = exposure.total_population;

    let fireball_area = disc_area(blast.fireball_radius_km);
    let airblast_radius = nan_max(blast.airblast_radius_km, blast.fireball_radius_km);
    let airblast_area = disc_area(airblast_radius);
    let thermal_area = disc_area(nan_max(blast.thermal_radius_km, airblast_radius));

    let mut remaining = total;
    let mut take = |area: f64| {
        let wanted = area * density;
        // an unbounded zone is not capped by the remaining population
        let people = if wanted.is_finite() && wanted > remaining { remaining } else { wanted };
        remaining -= people;
        people
    };
    let fireball_pop = take(fireball_area);
    let airblast_pop = take(airblast_area - fireball_area);
    let thermal_pop = take(thermal_area - airblast_area);

    let immediate = fireball_pop * cal.fireball_fatality_rate
        + airblast_pop * cal.airblast_fatality_rate
        + thermal_pop * cal.thermal_fatality_rate;
    let injured = fireball_pop * cal.fireball_injury_rate
        + airblast_pop * cal.airblast_injury_rate
        + thermal_pop * cal.thermal_injury_rate;
    let displaced = (fireball_pop + airblast_pop + thermal_pop) * cal.displacement_factor;

    Casualties {
        immediate: whole_count(immediate, total),
        injured: whole_count(injured, total),
        displaced: whole_count(displaced, total),
    }
}

pub(crate) fn economic_impact(
    cal: &ImpactCalibration,
    blast: &BlastEffects,
    exposure: &ExposureData,
) -> EconomicImpact {
    let direct_damage = cal.direct_damage_fraction * exposure.infrastructure_value_usd;
    let indirect_losses = cal.indirect_loss_fraction * exposure.infrastructure_value_usd;
    let affected_area = disc_area(blast.airblast_radius_km);
    let business_interruption = cal.business_interruption_fraction
        * exposure.gdp_per_capita_usd
        * affected_area
        * cal.business_interruption_scale;
    EconomicImpact {
        direct_damage,
        indirect_losses,
        business_interruption,
        total: direct_damage + indirect_losses + business_interruption,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blast(fire: f64, air: f64, thermal: f64) -> BlastEffects {
        BlastEffects {
            fireball_radius_km: fire,
            airblast_radius_km: air,
            thermal_radius_km: thermal,
            seismic_magnitude: 0.0,
            burst_altitude_km: 0.0,
        }
    }

    fn city(density: f64, total: f64) -> ExposureData {
        ExposureData {
            population_density_per_km2: density,
            total_population: total,
            infrastructure_value_usd: 1.0e9,
            gdp_per_capita_usd: 10_000.0,
        }
    }

    #[test]
    fn test_zone_rates() {
        let cal = ImpactCalibration::default();
        // Everyone affected sits inside the 1 km fireball disc
        let c = casualties(&cal, &blast(1.0, 1.0, 1.0), &city(100.0, 1.0e9));
        let pop = PI * 100.0;
        assert!((c.immediate - (pop * 0.95).floor()).abs() < f64::EPSILON);
        assert!((c.injured - (pop * 0.05).floor()).abs() < f64::EPSILON);
        assert!((c.displaced - (pop * 1.5).floor()).abs() < f64::EPSILON);
    }

    #[test]
    fn test_capped_at_total_population() {
        let cal = ImpactCalibration::default();
        let c = casualties(&cal, &blast(50.0, 100.0, 200.0), &city(10_000.0, 1000.0));
        assert!(c.immediate <= 1000.0);
        assert!(c.injured <= 1000.0);
        assert!((c.displaced - 1000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_counts_are_whole_and_non_negative() {
        let cal = ImpactCalibration::default();
        let c = casualties(&cal, &blast(0.3, 2.7, 4.1), &city(123.4, 1.0e7));
        for v in [c.immediate, c.injured, c.displaced] {
            assert!(v >= 0.0);
            assert!((v - v.floor()).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn test_uninhabited_has_no_casualties() {
        let cal = ImpactCalibration::default();
        let c = casualties(&cal, &blast(1.0, 10.0, 20.0), &ExposureData::uninhabited());
        assert!(c.immediate.abs() < f64::EPSILON);
        assert!(c.displaced.abs() < f64::EPSILON);
    }

    #[test]
    fn test_nan_population_propagates() {
        let cal = ImpactCalibration::default();
        let c = casualties(&cal, &blast(1.0, 10.0, 20.0), &city(f64::NAN, 1.0e6));
        assert!(c.immediate.is_nan());
    }

    #[test]
    fn test_nan_airblast_radius_is_not_replaced() {
        let cal = ImpactCalibration::default();
        let c = casualties(&cal, &blast(1.0, f64::NAN, 5.0), &city(100.0, 1.0e9));
        assert!(c.immediate.is_nan());
        assert!(c.injured.is_nan());
        assert!(c.displaced.is_nan());
    }

    #[test]
    fn test_infinite_radius_is_not_capped() {
        let cal = ImpactCalibration::default();
        for b in [blast(f64::INFINITY, 2.0, 3.0), blast(1.0, 2.0, f64::INFINITY)] {
            let c = casualties(&cal, &b, &city(100.0, 1.0e6));
            for v in [c.immediate, c.injured, c.displaced] {
                assert!(!v.is_finite(), "{b:?} gave {v}");
            }
        }
    }

    #[test]
    fn test_nan_max() {
        assert!(nan_max(f64::NAN, 1.0).is_nan());
        assert!(nan_max(1.0, f64::NAN).is_nan());
        assert!((nan_max(2.0, 1.0) - 2.0).abs() < f64::EPSILON);
        assert!(nan_max(f64::INFINITY, 1.0).is_infinite());
    }

    #[test]
    fn test_economic_terms() {
        let cal = ImpactCalibration::default();
        let e = economic_impact(&cal, &blast(0.0, 1.0, 0.0), &city(0.0, 0.0));
        assert!((e.direct_damage - 3.0e8).abs() < 1e-3);
        assert!((e.indirect_losses - 1.5e8).abs() < 1e-3);
        assert!((e.business_interruption - 0.1 * 10_000.0 * PI * 1000.0).abs() < 1e-6);
        assert!((e.total - (e.direct_damage + e.indirect_losses + e.business_interruption)).abs() < 1e-3);
    }
}
