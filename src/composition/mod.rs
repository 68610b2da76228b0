//! Asteroid composition classification and physical-property derivation.
//!
//! The engine works from a read-only [`CompositionTable`] that is built
//! once per process and shared across calls:
//!
//! 1. [`CompositionEngine::classify_composition`] picks a material class from
//!    spectral type, size prior, known names and an albedo consistency check
//! 2. [`CompositionEngine::derive_properties`] turns diameter + class into
//!    mass, density, strength, porosity and albedo with uncertainties
//! 3. [`CompositionEngine::validate_properties`] compares derived values
//!    against well-characterized reference asteroids
//!
//! # Example
//!
//! ```rust
//! use impact_engine::composition::CompositionEngine;
//!
//! let engine = CompositionEngine::builtin();
//! let class = engine.classify_composition(490.0, 20.19, "Bennu", Some("B"));
//! assert_eq!(class.primary_type, "C");
//!
//! let props = engine.derive_properties(490.0, &class.primary_type, class.confidence).unwrap();
//! assert!(props.mass.value > 0.0);
//! ```

pub mod classify;
pub mod model;
pub mod properties;
pub mod reference;

pub use classify::{AlternativeType, CompositionClassification};
pub use model::{canonical_key, CompositionModel, CompositionTable, ImpactResponse, PropertyRange};
pub use properties::DerivedProperties;
pub use reference::{PropertyAgreement, PropertyCheck, PropertyValidation, ReferenceAsteroid};

use crate::error::ImpactResult;

/// Stateless composition engine over an immutable table.
#[derive(Debug, Clone, Copy)]
pub struct CompositionEngine<'t> {
    table: &'t CompositionTable,
}

impl CompositionEngine<'static> {
    /// Engine over the process-wide built-in table.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            table: CompositionTable::builtin(),
        }
    }
}

impl<'t> CompositionEngine<'t> {
    /// Engine over a caller-supplied table.
    #[must_use]
    pub const fn new(table: &'t CompositionTable) -> Self {
        Self { table }
    }

    /// The table backing this engine.
    #[must_use]
    pub const fn table(&self) -> &'t CompositionTable {
        self.table
    }

    /// Look up a composition model by key or alias.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ImpactError::UnknownComposition`] if the key is not in the table.
    pub fn model(&self, key: &str) -> ImpactResult<&'t CompositionModel> {
        self.table.get(key)
    }

    /// Classify an asteroid's material type.
    ///
    /// `diameter_m` in meters, `absolute_magnitude` is H.
    #[must_use]
    pub fn classify_composition(
        &self,
        diameter_m: f64,
        absolute_magnitude: f64,
        name: &str,
        spectral_type: Option<&str>,
    ) -> CompositionClassification {
        classify::classify(self.table, diameter_m, absolute_magnitude, name, spectral_type)
    }

    /// Derive physical properties for a body of the given diameter and class.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ImpactError::UnknownComposition`] if `composition_type`
    /// is not in the table.
    pub fn derive_properties(
        &self,
        diameter_m: f64,
        composition_type: &str,
        confidence: f64,
    ) -> ImpactResult<DerivedProperties> {
        let model = self.table.get(composition_type)?;
        Ok(properties::derive(model, diameter_m, confidence))
    }

    /// Compare derived properties against reference asteroids.
    #[must_use]
    pub fn validate_properties(&self, name: &str, derived: &DerivedProperties) -> PropertyValidation {
        reference::validate(name, derived)
    }
}
