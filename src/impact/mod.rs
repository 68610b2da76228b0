//! Impact consequence estimation.
//!
//! A deterministic chain of calibrated scaling laws:
//!
//! 1. kinetic energy `½·m·v²`
//! 2. TNT equivalent on the calibrated scale (1 kt = 4.184e9 J)
//! 3. crater (Holsapple–Housen style)
//! 4. fireball, airblast and thermal radii plus seismic magnitude
//! 5. casualties over nested zones
//! 6. economic loss
//!
//! The composition-aware path adds vaporization, coupling efficiency,
//! breakup altitude and radius multipliers from the material model.
//!
//! # Example
//!
//! ```rust
//! use impact_engine::impact::{ExposureData, ImpactEffectsCalculator, ImpactScenario};
//!
//! let calc = ImpactEffectsCalculator::default();
//! let scenario = ImpactScenario::new(1.0e9, 20.0, 45.0);
//! let result = calc.calculate(&scenario, &ExposureData::uninhabited());
//! assert!(result.tnt_equivalent_kt > 40_000.0);
//! ```

pub mod composition_effects;
pub mod effects;
pub mod exposure;

pub use composition_effects::{fragmentation_altitude_km, CompositionEffects};
pub use effects::{
    BlastEffects, Crater, EnergyEstimate, ImpactEffectsCalculator, ImpactEffectsResult, ImpactScenario,
};
pub use exposure::{Casualties, EconomicImpact, ExposureData};
