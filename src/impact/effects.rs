//! Impact effects pipeline.
//!
//! energy → TNT equivalent → crater → blast → casualties → economic loss.
//! Every stage is a calibrated scaling law, not a first-principles model;
//! the constants live in [`ImpactCalibration`].

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use super::composition_effects::CompositionEffects;
use super::exposure::{self, Casualties, EconomicImpact, ExposureData};
use crate::config::ImpactCalibration;
use crate::uncertainty::{PowerFactor, UncertainValue, UncertaintyPropagator};
use crate::units::km_per_s_to_m_per_s;

/// Physical description of one impact.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImpactScenario {
    /// Impactor mass (kg).
    pub mass_kg: f64,
    /// Entry velocity (km/s).
    pub velocity_km_s: f64,
    /// Impact angle from horizontal (degrees).
    pub angle_deg: f64,
    /// Target density (kg/m³); calibration default when absent.
    pub target_density: Option<f64>,
    /// Airburst altitude (km); 0 for a ground impact.
    pub burst_altitude_km: f64,
}

impl ImpactScenario {
    /// Ground impact with default target density.
    #[must_use]
    pub const fn new(mass_kg: f64, velocity_km_s: f64, angle_deg: f64) -> Self {
        Self {
            mass_kg,
            velocity_km_s,
            angle_deg,
            target_density: None,
            burst_altitude_km: 0.0,
        }
    }

    /// Set the airburst altitude.
    #[must_use]
    pub const fn with_burst_altitude(mut self, altitude_km: f64) -> Self {
        self.burst_altitude_km = altitude_km;
        self
    }

    /// Set the target density.
    #[must_use]
    pub const fn with_target_density(mut self, density: f64) -> Self {
        self.target_density = Some(density);
        self
    }
}

/// Simple-crater dimensions (m, m³).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Crater {
    /// Rim-to-rim diameter (m).
    pub diameter_m: f64,
    /// Depth (m).
    pub depth_m: f64,
    /// Excavated volume (m³).
    pub volume_m3: f64,
}

/// Ground-level blast footprint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlastEffects {
    /// Fireball radius (km).
    pub fireball_radius_km: f64,
    /// Severe airblast radius (km).
    pub airblast_radius_km: f64,
    /// Thermal burn radius (km).
    pub thermal_radius_km: f64,
    /// Equivalent seismic magnitude.
    pub seismic_magnitude: f64,
    /// Burst altitude the radii were projected from (km).
    pub burst_altitude_km: f64,
}

/// Full pipeline output.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImpactEffectsResult {
    /// Kinetic energy delivered to the effects stages (J).
    pub kinetic_energy_j: f64,
    /// TNT equivalent (kt).
    pub tnt_equivalent_kt: f64,
    /// Crater.
    pub crater: Crater,
    /// Blast footprint.
    pub blast: BlastEffects,
    /// Casualties.
    pub casualties: Casualties,
    /// Economic loss.
    pub economic: EconomicImpact,
}

/// Energy-derived quantities with first-order uncertainties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergyEstimate {
    /// Kinetic energy (J).
    pub kinetic_energy: UncertainValue,
    /// TNT equivalent (kt).
    pub tnt_equivalent: UncertainValue,
    /// Ground airblast radius (km).
    pub airblast_radius: UncertainValue,
    /// Seismic magnitude.
    pub seismic_magnitude: UncertainValue,
}

/// Clamp negatives to zero without masking NaN.
fn non_negative(x: f64) -> f64 {
    if x < 0.0 {
        0.0
    } else {
        x
    }
}

/// Ground radius of a sphere of radius `r` centred `h` above ground.
fn ground_radius(r: f64, h: f64) -> f64 {
    if r <= h {
        0.0
    } else {
        (r * r - h * h).sqrt()
    }
}

/// Stateless calculator over a calibration table.
#[derive(Debug, Clone, Default)]
pub struct ImpactEffectsCalculator {
    calibration: ImpactCalibration,
}

impl ImpactEffectsCalculator {
    /// Calculator with explicit calibration constants.
    #[must_use]
    pub const fn new(calibration: ImpactCalibration) -> Self {
        Self { calibration }
    }

    /// Calibration in use.
    #[must_use]
    pub const fn calibration(&self) -> &ImpactCalibration {
        &self.calibration
    }

    /// Kinetic energy `½·m·v²` (J), velocity in m/s.
    #[must_use]
    pub fn kinetic_energy(mass_kg: f64, velocity_m_s: f64) -> f64 {
        0.5 * mass_kg * velocity_m_s * velocity_m_s
    }

    /// Energy (J) to kilotons of TNT.
    #[must_use]
    pub fn energy_to_tnt(&self, energy_j: f64) -> f64 {
        energy_j / self.calibration.joules_per_kiloton
    }

    /// Crater from `D = K1·(E/(ρ·g))^0.22·sin(θ)^(1/3)`, depth `K2·D`,
    /// volume of a cone `π/3·(D/2)²·depth`.
    #[must_use]
    pub fn crater(&self, energy_j: f64, target_density: f64, angle_deg: f64) -> Crater {
        let cal = &self.calibration;
        let scaled = energy_j / (target_density * cal.gravity);
        let diameter_m = cal.crater_k1
            * scaled.powf(cal.crater_exponent)
            * angle_deg.to_radians().sin().abs().cbrt();
        let depth_m = diameter_m * cal.crater_k2;
        let radius = diameter_m / 2.0;
        Crater {
            diameter_m,
            depth_m,
            volume_m3: PI / 3.0 * radius * radius * depth_m,
        }
    }

    /// Blast radii for a burst at `burst_altitude_km`.
    #[must_use]
    pub fn blast_effects(&self, tnt_kt: f64, energy_j: f64, burst_altitude_km: f64) -> BlastEffects {
        self.blast_with_multipliers(tnt_kt, energy_j, burst_altitude_km, 1.0, 1.0)
    }

    fn blast_with_multipliers(
        &self,
        tnt_kt: f64,
        energy_j: f64,
        burst_altitude_km: f64,
        thermal_multiplier: f64,
        shockwave_multiplier: f64,
    ) -> BlastEffects {
        let cal = &self.calibration;
        let h = non_negative(burst_altitude_km);
        let fireball = cal.fireball_coefficient_km * tnt_kt.powf(cal.fireball_exponent);
        let airblast =
            cal.airblast_coefficient_km * tnt_kt.powf(cal.airblast_exponent) * shockwave_multiplier;
        let thermal =
            cal.thermal_coefficient_km * tnt_kt.powf(cal.thermal_exponent) * thermal_multiplier;
        BlastEffects {
            fireball_radius_km: ground_radius(fireball, h),
            airblast_radius_km: ground_radius(airblast, h),
            thermal_radius_km: ground_radius(thermal, h),
            seismic_magnitude: self.seismic_magnitude(energy_j),
            burst_altitude_km: h,
        }
    }

    /// Seismic magnitude `max(0, 0.67·log10(E) − 5.87)`.
    #[must_use]
    pub fn seismic_magnitude(&self, energy_j: f64) -> f64 {
        non_negative(self.calibration.seismic_slope * energy_j.log10() - self.calibration.seismic_offset)
    }

    /// Peak overpressure (kPa) at ground distance from ground zero.
    ///
    /// `p = P₀·(W^(1/3)/slant)^1.3` with slant range from the burst point,
    /// strictly decreasing in distance.
    #[must_use]
    pub fn overpressure_at(&self, tnt_kt: f64, distance_km: f64, burst_altitude_km: f64) -> f64 {
        let cal = &self.calibration;
        let slant = distance_km.hypot(non_negative(burst_altitude_km));
        cal.reference_overpressure_kpa * (tnt_kt.cbrt() / slant).powf(cal.overpressure_decay_exponent)
    }

    /// Casualties over nested blast zones.
    #[must_use]
    pub fn casualties(&self, blast: &BlastEffects, exposure: &ExposureData) -> Casualties {
        exposure::casualties(&self.calibration, blast, exposure)
    }

    /// Economic loss over the airblast footprint.
    #[must_use]
    pub fn economic_impact(&self, blast: &BlastEffects, exposure: &ExposureData) -> EconomicImpact {
        exposure::economic_impact(&self.calibration, blast, exposure)
    }

    /// Run the full pipeline.
    #[must_use]
    pub fn calculate(&self, scenario: &ImpactScenario, exposure: &ExposureData) -> ImpactEffectsResult {
        self.calculate_with_composition(scenario, exposure, &CompositionEffects::neutral())
    }

    /// Run the pipeline with material modifiers.
    ///
    /// Energy is scaled by `efficiency·(1 − vaporization)`, thermal and
    /// airblast radii by the composition multipliers, and the burst happens
    /// at the higher of the scenario and fragmentation altitudes.
    /// [`CompositionEffects::neutral`] reproduces [`Self::calculate`].
    #[must_use]
    pub fn calculate_with_composition(
        &self,
        scenario: &ImpactScenario,
        exposure: &ExposureData,
        effects: &CompositionEffects,
    ) -> ImpactEffectsResult {
        let velocity = km_per_s_to_m_per_s(scenario.velocity_km_s);
        let raw_energy = Self::kinetic_energy(scenario.mass_kg, velocity);
        let energy = raw_energy * effects.energy_fraction();
        let tnt = self.energy_to_tnt(energy);

        let density = scenario
            .target_density
            .unwrap_or(self.calibration.default_target_density);
        let crater = self.crater(energy, density, scenario.angle_deg);

        let scenario_altitude = non_negative(scenario.burst_altitude_km);
        let altitude = if effects.fragmentation_altitude_km > scenario_altitude {
            effects.fragmentation_altitude_km
        } else {
            scenario_altitude
        };
        let blast = self.blast_with_multipliers(
            tnt,
            energy,
            altitude,
            effects.thermal_multiplier,
            effects.shockwave_multiplier,
        );

        ImpactEffectsResult {
            kinetic_energy_j: energy,
            tnt_equivalent_kt: tnt,
            crater,
            blast,
            casualties: self.casualties(&blast, exposure),
            economic: self.economic_impact(&blast, exposure),
        }
    }

    /// Ground radius of the airblast zone (km) for an uncertain yield.
    ///
    /// `σr = r·b·σW/W` for `r = a·W^b`, then carried through the
    /// slant-to-ground projection below a burst at altitude.
    #[must_use]
    pub fn airblast_with_uncertainty(&self, tnt_kt: &UncertainValue, burst_altitude_km: f64) -> UncertainValue {
        let cal = &self.calibration;
        let h = non_negative(burst_altitude_km);
        let radius = cal.airblast_coefficient_km * tnt_kt.value.powf(cal.airblast_exponent);
        let radius_sigma = radius * cal.airblast_exponent * tnt_kt.relative_uncertainty();
        let ground = ground_radius(radius, h);
        let ground_sigma = if ground > 0.0 {
            radius / ground * radius_sigma
        } else {
            0.0
        };
        UncertainValue::new(ground, ground_sigma, "km", "airblast scaling")
    }

    /// First-order uncertainty of energy-derived quantities.
    ///
    /// Mass and velocity errors are treated as independent.
    #[must_use]
    pub fn energy_with_uncertainty(
        &self,
        mass_kg: &UncertainValue,
        velocity_km_s: &UncertainValue,
        burst_altitude_km: f64,
    ) -> EnergyEstimate {
        let cal = &self.calibration;
        let velocity = velocity_km_s.scaled(km_per_s_to_m_per_s(1.0), "m/s");
        let kinetic_energy = UncertaintyPropagator::propagate_multiplicative(&[
            PowerFactor::of(mass_kg, 1.0),
            PowerFactor::of(&velocity, 2.0),
        ])
        .scaled(0.5, "J")
        .with_source("kinetic energy");

        let tnt_equivalent = kinetic_energy
            .scaled(1.0 / cal.joules_per_kiloton, "kt")
            .with_source("TNT equivalent");

        let airblast_radius = self.airblast_with_uncertainty(&tnt_equivalent, burst_altitude_km);

        let magnitude = self.seismic_magnitude(kinetic_energy.value);
        let magnitude_sigma = if magnitude > 0.0 {
            cal.seismic_slope * kinetic_energy.relative_uncertainty() / std::f64::consts::LN_10
        } else {
            0.0
        };
        let seismic_magnitude = UncertainValue::new(magnitude, magnitude_sigma, "", "seismic scaling");

        EnergyEstimate {
            kinetic_energy,
            tnt_equivalent,
            airblast_radius,
            seismic_magnitude,
        }
    }
}
