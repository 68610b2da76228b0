//! # impact-engine
//!
//! Asteroid impact physics and uncertainty-quantification engine.
//!
//! Every physical quantity travels as an [`UncertainValue`](uncertainty::UncertainValue)
//! (value, one-sigma uncertainty, unit, provenance) through:
//! - Composition classification and property derivation
//! - Two-body orbit propagation and close-approach search
//! - The impact-effects chain (energy, crater, blast, casualties, economic loss)
//! - Deflection-mission evaluation
//! - Validation against historical events and benchmark orbits
//!
//! Calculations are pure functions of their inputs and calibration tables.
//! Non-finite inputs propagate to non-finite outputs rather than failing.
//!
//! ## Example
//!
//! ```rust
//! use impact_engine::prelude::*;
//!
//! let params = RawAsteroidRecord::Minimal(MinimalRecord {
//!     diameter_m: 60.0,
//!     velocity_km_s: 20.0,
//!     density_kg_m3: Some(2200.0),
//! })
//! .normalize()
//! .unwrap();
//!
//! let calc = ImpactEffectsCalculator::default();
//! let scenario = params.impact_scenario(30.0).with_burst_altitude(8.0);
//! let result = calc.calculate(&scenario, &ExposureData::uninhabited());
//! assert!(result.blast.airblast_radius_km > 0.0);
//! ```

#![forbid(unsafe_code)]
#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![warn(clippy::pedantic, clippy::nursery)]
#![allow(
    clippy::module_name_repetitions,
    clippy::similar_names,
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::suspicious_operation_groupings,  // False positive for variance = E[X²] - E[X]²
    clippy::suboptimal_flops,  // Scaling laws are written as published
    clippy::imprecise_flops,   // Numerical code choices are intentional
    clippy::no_effect_underscore_binding,
    clippy::too_many_lines,
    clippy::missing_const_for_fn,  // Many functions can't be const in stable Rust
    clippy::needless_range_loop,   // Sometimes range loops are clearer
    clippy::manual_midpoint,       // Manual midpoint is intentional in numerical code
)]

pub mod composition;
pub mod config;
pub mod deflection;
pub mod error;
pub mod impact;
pub mod input;
pub mod orbit;
pub mod uncertainty;
pub mod units;
pub mod validation;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::composition::{
        CompositionClassification, CompositionEngine, CompositionTable, DerivedProperties,
    };
    pub use crate::config::{EngineConfig, EngineConfigBuilder};
    pub use crate::deflection::{DeflectionEvaluator, DeflectionStrategy, ThreatAssessment};
    pub use crate::error::{ImpactError, ImpactResult};
    pub use crate::impact::{ExposureData, ImpactEffectsCalculator, ImpactEffectsResult, ImpactScenario};
    pub use crate::input::{AsteroidParameters, MinimalRecord, RawAsteroidRecord};
    pub use crate::orbit::{calculate_close_approach, calculate_position, solve_kepler, OrbitalElements};
    pub use crate::uncertainty::{SampleRng, UncertainValue, UncertaintyPropagator, UncertaintyVariable};
    pub use crate::validation::{AgreementStatus, BenchmarkComparator, HistoricalValidator, ValidationReport};
}

/// Re-export for public API
pub use error::{ImpactError, ImpactResult};
