//! Engine configuration and calibration-constant tables.
//!
//! Every empirical constant used by the impact, deflection and validation
//! models lives in one named table per component. The defaults are the
//! calibrated values (tuned for order-of-magnitude agreement with Tunguska
//! and Chelyabinsk), not first-principles physics.
//!
//! Configuration is loaded from YAML and checked twice:
//! - Schema constraints via `validator`
//! - Semantic constraints (ordering of thresholds, rate sums)

use serde::{Deserialize, Serialize};
use std::path::Path;
use validator::Validate;

use crate::error::{ImpactError, ImpactResult};
use crate::units::JOULES_PER_KILOTON;

/// Top-level engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    /// Schema version for forward compatibility.
    #[validate(length(min = 1))]
    #[serde(default = "default_schema_version")]
    pub schema_version: String,

    /// Monte Carlo propagation settings.
    #[validate(nested)]
    #[serde(default)]
    pub monte_carlo: MonteCarloConfig,

    /// Impact-effects calibration constants.
    #[validate(nested)]
    #[serde(default)]
    pub impact: ImpactCalibration,

    /// Deflection model calibration constants.
    #[validate(nested)]
    #[serde(default)]
    pub deflection: DeflectionCalibration,

    /// Agreement classification thresholds.
    #[validate(nested)]
    #[serde(default)]
    pub validation: ValidationThresholds,
}

fn default_schema_version() -> String {
    "1.0".to_string()
}

impl EngineConfig {
    /// Load configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File cannot be read
    /// - YAML parsing fails
    /// - Validation fails
    pub fn load<P: AsRef<Path>>(path: P) -> ImpactResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns error if parsing or validation fails.
    pub fn from_yaml(yaml: &str) -> ImpactResult<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        config.validate_semantic()?;
        Ok(config)
    }

    /// Serialize to YAML.
    ///
    /// # Errors
    ///
    /// Returns error if serialization fails.
    pub fn to_yaml(&self) -> ImpactResult<String> {
        serde_yaml::to_string(self).map_err(|e| ImpactError::serialization(e.to_string()))
    }

    /// Create a builder for programmatic construction.
    #[must_use]
    pub fn builder() -> EngineConfigBuilder {
        EngineConfigBuilder::default()
    }

    /// Validate constraints that span several fields.
    fn validate_semantic(&self) -> ImpactResult<()> {
        let mc = &self.monte_carlo;
        if mc.convergence_fraction < mc.min_valid_fraction {
            return Err(ImpactError::config(format!(
                "convergence fraction {} must not be below the minimum valid fraction {}",
                mc.convergence_fraction, mc.min_valid_fraction
            )));
        }

        let v = &self.validation;
        if !(v.excellent_sigma < v.good_sigma && v.good_sigma < v.acceptable_sigma) {
            return Err(ImpactError::config(
                "validation thresholds must satisfy excellent < good < acceptable",
            ));
        }

        let imp = &self.impact;
        for (zone, fatal, injured) in [
            ("fireball", imp.fireball_fatality_rate, imp.fireball_injury_rate),
            ("airblast", imp.airblast_fatality_rate, imp.airblast_injury_rate),
            ("thermal", imp.thermal_fatality_rate, imp.thermal_injury_rate),
        ] {
            if fatal + injured > 1.0 + 1e-12 {
                return Err(ImpactError::config(format!(
                    "{zone} zone fatality + injury rate exceeds 1"
                )));
            }
        }

        let d = &self.deflection;
        if d.earliest_launch_factor <= 1.0 || d.latest_launch_factor >= 1.0 {
            return Err(ImpactError::config(
                "launch window factors must bracket the nominal lead time",
            ));
        }

        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            monte_carlo: MonteCarloConfig::default(),
            impact: ImpactCalibration::default(),
            deflection: DeflectionCalibration::default(),
            validation: ValidationThresholds::default(),
        }
    }
}

/// Configuration builder for programmatic construction.
#[derive(Debug, Default)]
pub struct EngineConfigBuilder {
    seed: Option<u64>,
    samples: Option<usize>,
    impact: Option<ImpactCalibration>,
    deflection: Option<DeflectionCalibration>,
}

impl EngineConfigBuilder {
    /// Set the Monte Carlo seed.
    #[must_use]
    pub const fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the Monte Carlo sample count.
    #[must_use]
    pub const fn samples(mut self, samples: usize) -> Self {
        self.samples = Some(samples);
        self
    }

    /// Replace the impact calibration table.
    #[must_use]
    pub fn impact(mut self, calibration: ImpactCalibration) -> Self {
        self.impact = Some(calibration);
        self
    }

    /// Replace the deflection calibration table.
    #[must_use]
    pub fn deflection(mut self, calibration: DeflectionCalibration) -> Self {
        self.deflection = Some(calibration);
        self
    }

    /// Build the configuration.
    #[must_use]
    pub fn build(self) -> EngineConfig {
        let mut config = EngineConfig::default();

        if let Some(seed) = self.seed {
            config.monte_carlo.seed = seed;
        }
        if let Some(samples) = self.samples {
            config.monte_carlo.samples = samples;
        }
        if let Some(impact) = self.impact {
            config.impact = impact;
        }
        if let Some(deflection) = self.deflection {
            config.deflection = deflection;
        }

        config
    }
}

/// Monte Carlo propagation settings.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct MonteCarloConfig {
    /// Samples drawn per variable.
    #[validate(range(min = 1000))]
    pub samples: usize,
    /// Master seed.
    pub seed: u64,
    /// Below this surviving fraction the run fails.
    #[validate(range(min = 0.0, max = 1.0))]
    pub min_valid_fraction: f64,
    /// At or above this surviving fraction the run counts as converged.
    #[validate(range(min = 0.0, max = 1.0))]
    pub convergence_fraction: f64,
}

impl Default for MonteCarloConfig {
    fn default() -> Self {
        Self {
            samples: 10_000,
            seed: 42,
            min_valid_fraction: 0.5,
            convergence_fraction: 0.9,
        }
    }
}

/// Impact-effects calibration constants.
///
/// Crater constants follow Holsapple-Housen style scaling; blast radii are
/// power laws of the TNT equivalent in kilotons, in km.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ImpactCalibration {
    /// Joules per kiloton of TNT.
    #[validate(range(min = 1.0))]
    pub joules_per_kiloton: f64,
    /// Surface gravity (m/s²).
    #[validate(range(min = 0.01))]
    pub gravity: f64,
    /// Target rock density used when none is given (kg/m³).
    #[validate(range(min = 1.0))]
    pub default_target_density: f64,
    /// Crater diameter coefficient K1.
    #[validate(range(min = 0.0))]
    pub crater_k1: f64,
    /// Depth-to-diameter ratio K2.
    #[validate(range(min = 0.0, max = 1.0))]
    pub crater_k2: f64,
    /// Energy scaling exponent for crater diameter.
    #[validate(range(min = 0.0, max = 1.0))]
    pub crater_exponent: f64,
    /// Fireball radius coefficient (km per kt^exponent).
    #[validate(range(min = 0.0))]
    pub fireball_coefficient_km: f64,
    /// Fireball radius exponent.
    #[validate(range(min = 0.0, max = 1.0))]
    pub fireball_exponent: f64,
    /// Airblast radius coefficient (km per kt^exponent).
    #[validate(range(min = 0.0))]
    pub airblast_coefficient_km: f64,
    /// Airblast radius exponent.
    #[validate(range(min = 0.0, max = 1.0))]
    pub airblast_exponent: f64,
    /// Thermal radius coefficient (km per kt^exponent).
    #[validate(range(min = 0.0))]
    pub thermal_coefficient_km: f64,
    /// Thermal radius exponent.
    #[validate(range(min = 0.0, max = 1.0))]
    pub thermal_exponent: f64,
    /// Overpressure of 1 kt at 1 km slant range (kPa).
    #[validate(range(min = 0.0))]
    pub reference_overpressure_kpa: f64,
    /// Overpressure decay exponent with scaled distance.
    #[validate(range(min = 0.0))]
    pub overpressure_decay_exponent: f64,
    /// Seismic magnitude slope on log10(energy in J).
    pub seismic_slope: f64,
    /// Seismic magnitude offset.
    pub seismic_offset: f64,
    /// Fatality rate inside the fireball.
    #[validate(range(min = 0.0, max = 1.0))]
    pub fireball_fatality_rate: f64,
    /// Injury rate inside the fireball.
    #[validate(range(min = 0.0, max = 1.0))]
    pub fireball_injury_rate: f64,
    /// Fatality rate in the airblast ring.
    #[validate(range(min = 0.0, max = 1.0))]
    pub airblast_fatality_rate: f64,
    /// Injury rate in the airblast ring.
    #[validate(range(min = 0.0, max = 1.0))]
    pub airblast_injury_rate: f64,
    /// Fatality rate in the thermal ring.
    #[validate(range(min = 0.0, max = 1.0))]
    pub thermal_fatality_rate: f64,
    /// Injury rate in the thermal ring.
    #[validate(range(min = 0.0, max = 1.0))]
    pub thermal_injury_rate: f64,
    /// Displaced people per affected person.
    #[validate(range(min = 0.0))]
    pub displacement_factor: f64,
    /// Fraction of infrastructure value destroyed directly.
    #[validate(range(min = 0.0, max = 1.0))]
    pub direct_damage_fraction: f64,
    /// Fraction of infrastructure value lost indirectly.
    #[validate(range(min = 0.0, max = 1.0))]
    pub indirect_loss_fraction: f64,
    /// Business interruption fraction of GDP per capita.
    #[validate(range(min = 0.0, max = 1.0))]
    pub business_interruption_fraction: f64,
    /// Business interruption multiplier per km² of affected area.
    #[validate(range(min = 0.0))]
    pub business_interruption_scale: f64,
}

impl Default for ImpactCalibration {
    fn default() -> Self {
        Self {
            joules_per_kiloton: JOULES_PER_KILOTON,
            gravity: 9.81,
            default_target_density: 2500.0,
            crater_k1: 1.88,
            crater_k2: 0.13,
            crater_exponent: 0.22,
            fireball_coefficient_km: 0.06,
            fireball_exponent: 0.4,
            airblast_coefficient_km: 1.3,
            airblast_exponent: 0.33,
            thermal_coefficient_km: 1.5,
            thermal_exponent: 0.41,
            reference_overpressure_kpa: 30.0,
            overpressure_decay_exponent: 1.3,
            seismic_slope: 0.67,
            seismic_offset: 5.87,
            fireball_fatality_rate: 0.95,
            fireball_injury_rate: 0.05,
            airblast_fatality_rate: 0.15,
            airblast_injury_rate: 0.60,
            thermal_fatality_rate: 0.05,
            thermal_injury_rate: 0.30,
            displacement_factor: 1.5,
            direct_damage_fraction: 0.3,
            indirect_loss_fraction: 0.15,
            business_interruption_fraction: 0.1,
            business_interruption_scale: 1000.0,
        }
    }
}

/// Deflection model calibration constants.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct DeflectionCalibration {
    /// Trajectory change (degrees) that removes the whole impact probability.
    #[validate(range(min = 0.000_001))]
    pub saturation_angle_deg: f64,
    /// Probability above which a mission counts as a success.
    #[validate(range(min = 0.0, max = 1.0))]
    pub success_threshold: f64,
    /// Penalty when available lead time is shorter than the strategy needs.
    #[validate(range(min = 0.0, max = 1.0))]
    pub insufficient_lead_time_penalty: f64,
    /// Asteroid diameter (m) above which the size penalty applies.
    #[validate(range(min = 0.0))]
    pub large_asteroid_threshold_m: f64,
    /// Penalty for large asteroids.
    #[validate(range(min = 0.0, max = 1.0))]
    pub large_asteroid_penalty: f64,
    /// Required/nominal ΔV ratio above which the ΔV penalty applies.
    #[validate(range(min = 1.0))]
    pub delta_v_ratio_threshold: f64,
    /// Penalty when the required ΔV is out of reach.
    #[validate(range(min = 0.0, max = 1.0))]
    pub excessive_delta_v_penalty: f64,
    /// Penalty for strategies without flight heritage.
    #[validate(range(min = 0.0, max = 1.0))]
    pub unproven_technology_penalty: f64,
    /// Strategy ids without flight heritage.
    pub unproven_strategy_ids: Vec<String>,
    /// Miss distance the required ΔV must achieve (m).
    #[validate(range(min = 0.0))]
    pub target_miss_distance_m: f64,
    /// Along-track amplification of a ΔV over the lead time.
    #[validate(range(min = 0.000_001))]
    pub along_track_amplification: f64,
    /// Earliest launch as a multiple of the strategy lead time before impact.
    pub earliest_launch_factor: f64,
    /// Latest launch as a multiple of the strategy lead time before impact.
    #[validate(range(min = 0.0))]
    pub latest_launch_factor: f64,
}

impl Default for DeflectionCalibration {
    fn default() -> Self {
        Self {
            saturation_angle_deg: 0.1,
            success_threshold: 0.7,
            insufficient_lead_time_penalty: 0.5,
            large_asteroid_threshold_m: 200.0,
            large_asteroid_penalty: 0.8,
            delta_v_ratio_threshold: 2.0,
            excessive_delta_v_penalty: 0.7,
            unproven_technology_penalty: 0.9,
            unproven_strategy_ids: vec![
                "gravity_tractor".to_string(),
                "nuclear_standoff".to_string(),
                "ion_beam_shepherd".to_string(),
                "laser_ablation".to_string(),
            ],
            target_miss_distance_m: crate::units::EARTH_RADIUS_M,
            along_track_amplification: 3.0,
            earliest_launch_factor: 1.5,
            latest_launch_factor: 0.8,
        }
    }
}

/// Sigma thresholds for agreement classification.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ValidationThresholds {
    /// At or below: EXCELLENT.
    #[validate(range(min = 0.0))]
    pub excellent_sigma: f64,
    /// At or below: GOOD.
    #[validate(range(min = 0.0))]
    pub good_sigma: f64,
    /// At or below: ACCEPTABLE. Above: POOR.
    #[validate(range(min = 0.0))]
    pub acceptable_sigma: f64,
    /// At or below: within uncertainty.
    #[validate(range(min = 0.0))]
    pub within_uncertainty_sigma: f64,
}

impl Default for ValidationThresholds {
    fn default() -> Self {
        Self {
            excellent_sigma: 1.0,
            good_sigma: 2.0,
            acceptable_sigma: 3.0,
            within_uncertainty_sigma: 2.0,
        }
    }
}
