//! Material-dependent modifiers for the impact pipeline.

use serde::{Deserialize, Serialize};

use crate::composition::CompositionModel;
use crate::units::km_per_s_to_m_per_s;

/// Atmospheric scale height (km).
pub const ATMOSPHERE_SCALE_HEIGHT_KM: f64 = 8.0;

/// Sea-level air density (kg/m³).
pub const SEA_LEVEL_AIR_DENSITY: f64 = 1.225;

/// How a body's composition changes energy deposition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompositionEffects {
    /// Fraction of kinetic energy coupled into the target.
    pub coupling_efficiency: f64,
    /// Fraction of energy lost to vaporization.
    pub vaporization_fraction: f64,
    /// Thermal radius multiplier.
    pub thermal_multiplier: f64,
    /// Airblast radius multiplier.
    pub shockwave_multiplier: f64,
    /// Altitude at which the body breaks up (km).
    pub fragmentation_altitude_km: f64,
}

impl CompositionEffects {
    /// Modifiers that leave the plain pipeline unchanged.
    #[must_use]
    pub const fn neutral() -> Self {
        Self {
            coupling_efficiency: 1.0,
            vaporization_fraction: 0.0,
            thermal_multiplier: 1.0,
            shockwave_multiplier: 1.0,
            fragmentation_altitude_km: 0.0,
        }
    }

    /// Modifiers for a material class entering at `velocity_km_s`.
    ///
    /// Uses the class-typical strength for the breakup altitude.
    #[must_use]
    pub fn from_model(model: &CompositionModel, velocity_km_s: f64) -> Self {
        Self::with_strength(model, velocity_km_s, model.strength.typical)
    }

    /// Modifiers using an explicit (e.g. size-corrected) strength in Pa.
    #[must_use]
    pub fn with_strength(model: &CompositionModel, velocity_km_s: f64, strength_pa: f64) -> Self {
        let response = &model.impact_response;
        Self {
            coupling_efficiency: response.coupling_efficiency,
            vaporization_fraction: response.vaporization_fraction,
            thermal_multiplier: response.thermal_multiplier,
            shockwave_multiplier: response.shockwave_multiplier,
            fragmentation_altitude_km: fragmentation_altitude_km(velocity_km_s, strength_pa),
        }
    }

    /// Fraction of kinetic energy that reaches the effects stages.
    #[must_use]
    pub fn energy_fraction(&self) -> f64 {
        self.coupling_efficiency * (1.0 - self.vaporization_fraction)
    }
}

impl Default for CompositionEffects {
    fn default() -> Self {
        Self::neutral()
    }
}

/// Breakup altitude where ram pressure `ρ_air(h)·v²` first exceeds strength.
///
/// `h = H·ln(ρ₀·v²/S)` with an exponential atmosphere, clamped at ground level.
#[must_use]
pub fn fragmentation_altitude_km(velocity_km_s: f64, strength_pa: f64) -> f64 {
    let v = km_per_s_to_m_per_s(velocity_km_s);
    let h = ATMOSPHERE_SCALE_HEIGHT_KM * (SEA_LEVEL_AIR_DENSITY * v * v / strength_pa).ln();
    if h < 0.0 {
        0.0
    } else {
        h
    }
}
