//! Size-dependent physical property derivation.
//!
//! Corrections relative to the class-typical values:
//! - density grows slowly with size (self-compaction)
//! - strength falls with size (flaw-dominated scale effect)
//! - porosity falls for bodies past rubble-pile scales
//!
//! Lower classification confidence widens every one-sigma value by
//! `1 + (1 − confidence)`.

use serde::{Deserialize, Serialize};

use super::model::{CompositionModel, PropertyRange};
use crate::uncertainty::{PowerFactor, UncertainValue, UncertaintyPropagator};

/// Relative one-sigma uncertainty assumed for input diameters.
pub const DIAMETER_RELATIVE_UNCERTAINTY: f64 = 0.05;

/// Physical properties derived for one body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedProperties {
    /// Canonical composition key the derivation used.
    pub composition_type: String,
    /// Diameter with its assumed uncertainty (m).
    pub diameter: UncertainValue,
    /// Total mass (kg).
    pub mass: UncertainValue,
    /// Material density (kg/m³).
    pub density: UncertainValue,
    /// Bulk density after porosity, `ρ·(1 − φ)` (kg/m³).
    pub bulk_density: UncertainValue,
    /// Compressive strength (Pa).
    pub strength: UncertainValue,
    /// Porosity fraction.
    pub porosity: UncertainValue,
    /// Geometric albedo.
    pub albedo: UncertainValue,
}

fn density_factor(diameter_m: f64) -> f64 {
    (1.0 + 0.03 * (diameter_m / 100.0).log10()).clamp(0.9, 1.15)
}

fn strength_factor(diameter_m: f64) -> f64 {
    (diameter_m / 10.0).powf(-0.25).clamp(0.05, 2.0)
}

fn porosity_factor(diameter_m: f64) -> f64 {
    if diameter_m.is_nan() {
        f64::NAN
    } else if diameter_m < 100.0 {
        1.0
    } else if diameter_m < 1_000.0 {
        0.95
    } else if diameter_m < 10_000.0 {
        0.85
    } else {
        0.7
    }
}

pub(crate) fn derive(model: &CompositionModel, diameter_m: f64, confidence: f64) -> DerivedProperties {
    let widen = 1.0 + (1.0 - confidence.clamp(0.0, 1.0));
    let source = format!("{} model, size-corrected", model.name);

    let corrected = |range: &PropertyRange, factor: f64| {
        UncertainValue::new(
            range.clamp(range.typical * factor),
            range.uncertainty * widen,
            range.unit.clone(),
            source.clone(),
        )
    };

    let density = corrected(&model.density, density_factor(diameter_m));
    let strength = corrected(&model.strength, strength_factor(diameter_m));
    let porosity = corrected(&model.porosity, porosity_factor(diameter_m));
    let albedo = corrected(&model.albedo, 1.0);

    let diameter = UncertainValue::new(
        diameter_m,
        diameter_m.abs() * DIAMETER_RELATIVE_UNCERTAINTY,
        "m",
        "input",
    );

    let solid = UncertainValue::new(1.0 - porosity.value, porosity.uncertainty, "", "1 - porosity");
    let bulk_density = UncertaintyPropagator::propagate_multiplicative(&[
        PowerFactor::of(&density, 1.0),
        PowerFactor::of(&solid, 1.0),
    ])
    .with_unit("kg/m³")
    .with_source(source.clone());

    let mass = if diameter_m.is_finite() && diameter_m <= 0.0 {
        UncertainValue::exact(0.0, "kg", "degenerate diameter")
    } else {
        UncertaintyPropagator::propagate_multiplicative(&[
            PowerFactor::of(&diameter, 3.0),
            PowerFactor::of(&bulk_density, 1.0),
        ])
        .scaled(std::f64::consts::PI / 6.0, "kg")
        .with_source(source)
    };

    DerivedProperties {
        composition_type: model.key.clone(),
        diameter,
        mass,
        density,
        bulk_density,
        strength,
        porosity,
        albedo,
    }
}
