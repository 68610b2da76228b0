//! Raw asteroid records and their normalization into engine inputs.
//!
//! Data arrives in several shapes (NASA NeoWs feed entries, local catalog
//! rows, bare numbers typed by a user). Each shape is one variant of
//! [`RawAsteroidRecord`] with its own normalization function, and every
//! variant is checked at this boundary: the engine downstream only ever
//! sees positive, finite diameters and velocities.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use crate::composition::CompositionTable;
use crate::error::{ImpactError, ImpactResult};
use crate::impact::ImpactScenario;
use crate::orbit::OrbitalElements;

/// Composition assumed when a record carries no hint.
pub const DEFAULT_COMPOSITION: &str = "S";

/// Name given to records without one.
const UNNAMED: &str = "unnamed";

/// Entry of the NASA NeoWs feed, flattened to numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NeoWsRecord {
    /// Object name.
    pub name: String,
    /// Absolute magnitude H.
    pub absolute_magnitude_h: f64,
    /// Lower diameter estimate (m).
    pub estimated_diameter_min_m: f64,
    /// Upper diameter estimate (m).
    pub estimated_diameter_max_m: f64,
    /// PHA flag.
    #[serde(default)]
    pub is_potentially_hazardous: bool,
    /// Relative velocity at close approach (km/s).
    pub relative_velocity_km_s: f64,
    /// Miss distance at close approach (km).
    #[serde(default)]
    pub miss_distance_km: Option<f64>,
}

/// Row of a local asteroid catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogRecord {
    /// Object name.
    pub name: String,
    /// Diameter (m).
    pub diameter_m: f64,
    /// Encounter velocity (km/s).
    pub velocity_km_s: f64,
    /// Bulk density (kg/m³).
    #[serde(default)]
    pub density_kg_m3: Option<f64>,
    /// Mass (kg).
    #[serde(default)]
    pub mass_kg: Option<f64>,
    /// Composition class or alias.
    #[serde(default)]
    pub composition: Option<String>,
    /// Spectral type.
    #[serde(default)]
    pub spectral_type: Option<String>,
    /// Absolute magnitude H.
    #[serde(default)]
    pub absolute_magnitude: Option<f64>,
    /// Osculating elements.
    #[serde(default)]
    pub orbit: Option<OrbitalElements>,
}

/// Bare numbers with nothing else known.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MinimalRecord {
    /// Diameter (m).
    pub diameter_m: f64,
    /// Encounter velocity (km/s).
    pub velocity_km_s: f64,
    /// Bulk density (kg/m³).
    #[serde(default)]
    pub density_kg_m3: Option<f64>,
}

/// Every raw input shape the engine accepts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum RawAsteroidRecord {
    /// NASA NeoWs feed entry.
    NeoWs(NeoWsRecord),
    /// Local catalog row.
    Catalog(CatalogRecord),
    /// Bare numbers.
    Minimal(MinimalRecord),
}

/// Normalized, validated asteroid parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AsteroidParameters {
    /// Object name.
    pub name: String,
    /// Diameter (m), positive and finite.
    pub diameter_m: f64,
    /// Encounter velocity (km/s), positive and finite.
    pub velocity_km_s: f64,
    /// Bulk density (kg/m³).
    pub density_kg_m3: f64,
    /// Mass (kg), given or `π/6·D³·ρ`.
    pub mass_kg: f64,
    /// Canonical composition key.
    pub composition: String,
    /// Spectral type, when known.
    pub spectral_type: Option<String>,
    /// Absolute magnitude H, when known.
    pub absolute_magnitude: Option<f64>,
    /// PHA flag.
    pub potentially_hazardous: bool,
    /// Close-approach miss distance (km), when known.
    pub miss_distance_km: Option<f64>,
    /// Osculating elements, when known.
    pub orbit: Option<OrbitalElements>,
}

impl AsteroidParameters {
    /// Impact scenario for these parameters at the given entry angle.
    #[must_use]
    pub const fn impact_scenario(&self, angle_deg: f64) -> ImpactScenario {
        ImpactScenario::new(self.mass_kg, self.velocity_km_s, angle_deg)
    }
}

fn positive_finite(field: &str, value: f64) -> ImpactResult<f64> {
    if !value.is_finite() {
        return Err(ImpactError::invalid_input(field, format!("{value} is not finite")));
    }
    if value <= 0.0 {
        return Err(ImpactError::invalid_input(field, format!("{value} is not positive")));
    }
    Ok(value)
}

fn optional_positive(field: &str, value: Option<f64>) -> ImpactResult<Option<f64>> {
    value.map(|v| positive_finite(field, v)).transpose()
}

/// Sphere mass `π/6·D³·ρ`.
fn sphere_mass(diameter_m: f64, density: f64) -> f64 {
    PI / 6.0 * diameter_m.powi(3) * density
}

fn resolve_name(name: &str) -> String {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        UNNAMED.to_string()
    } else {
        trimmed.to_string()
    }
}

impl RawAsteroidRecord {
    /// Validate and normalize against the built-in composition table.
    ///
    /// # Errors
    ///
    /// - [`ImpactError::InvalidInput`] for a non-positive or non-finite
    ///   diameter, velocity, density or mass
    /// - [`ImpactError::UnknownComposition`] for a composition hint the
    ///   table cannot resolve
    pub fn normalize(&self) -> ImpactResult<AsteroidParameters> {
        self.normalize_with(CompositionTable::builtin())
    }

    /// Validate and normalize against a caller-supplied composition table.
    ///
    /// # Errors
    ///
    /// See [`RawAsteroidRecord::normalize`].
    pub fn normalize_with(&self, table: &CompositionTable) -> ImpactResult<AsteroidParameters> {
        match self {
            Self::NeoWs(r) => normalize_neows(r, table),
            Self::Catalog(r) => normalize_catalog(r, table),
            Self::Minimal(r) => normalize_minimal(r, table),
        }
    }
}

fn default_density(table: &CompositionTable, composition: &str) -> ImpactResult<f64> {
    Ok(table.get(composition)?.density.typical)
}

fn normalize_neows(r: &NeoWsRecord, table: &CompositionTable) -> ImpactResult<AsteroidParameters> {
    let d_min = positive_finite("estimated_diameter_min_m", r.estimated_diameter_min_m)?;
    let d_max = positive_finite("estimated_diameter_max_m", r.estimated_diameter_max_m)?;
    if d_max < d_min {
        return Err(ImpactError::invalid_input(
            "estimated_diameter_max_m",
            format!("{d_max} is below the minimum estimate {d_min}"),
        ));
    }
    let diameter_m = (d_min + d_max) / 2.0;
    let velocity_km_s = positive_finite("relative_velocity_km_s", r.relative_velocity_km_s)?;
    let absolute_magnitude = r
        .absolute_magnitude_h
        .is_finite()
        .then_some(r.absolute_magnitude_h);
    let density = default_density(table, DEFAULT_COMPOSITION)?;

    Ok(AsteroidParameters {
        name: resolve_name(&r.name),
        diameter_m,
        velocity_km_s,
        density_kg_m3: density,
        mass_kg: sphere_mass(diameter_m, density),
        composition: DEFAULT_COMPOSITION.to_string(),
        spectral_type: None,
        absolute_magnitude,
        potentially_hazardous: r.is_potentially_hazardous,
        miss_distance_km: r.miss_distance_km.filter(|d| d.is_finite() && *d >= 0.0),
        orbit: None,
    })
}

fn normalize_catalog(r: &CatalogRecord, table: &CompositionTable) -> ImpactResult<AsteroidParameters> {
    let diameter_m = positive_finite("diameter_m", r.diameter_m)?;
    let velocity_km_s = positive_finite("velocity_km_s", r.velocity_km_s)?;
    let composition = match r.composition.as_deref() {
        Some(hint) => table.get(hint)?.key.clone(),
        None => DEFAULT_COMPOSITION.to_string(),
    };
    let density = match optional_positive("density_kg_m3", r.density_kg_m3)? {
        Some(d) => d,
        None => default_density(table, &composition)?,
    };
    let mass_kg = match optional_positive("mass_kg", r.mass_kg)? {
        Some(m) => m,
        None => sphere_mass(diameter_m, density),
    };

    Ok(AsteroidParameters {
        name: resolve_name(&r.name),
        diameter_m,
        velocity_km_s,
        density_kg_m3: density,
        mass_kg,
        composition,
        spectral_type: r.spectral_type.clone(),
        absolute_magnitude: r.absolute_magnitude.filter(|h| h.is_finite()),
        potentially_hazardous: false,
        miss_distance_km: None,
        orbit: r.orbit,
    })
}

fn normalize_minimal(r: &MinimalRecord, table: &CompositionTable) -> ImpactResult<AsteroidParameters> {
    let diameter_m = positive_finite("diameter_m", r.diameter_m)?;
    let velocity_km_s = positive_finite("velocity_km_s", r.velocity_km_s)?;
    let density = match optional_positive("density_kg_m3", r.density_kg_m3)? {
        Some(d) => d,
        None => default_density(table, DEFAULT_COMPOSITION)?,
    };

    Ok(AsteroidParameters {
        name: UNNAMED.to_string(),
        diameter_m,
        velocity_km_s,
        density_kg_m3: density,
        mass_kg: sphere_mass(diameter_m, density),
        composition: DEFAULT_COMPOSITION.to_string(),
        spectral_type: None,
        absolute_magnitude: None,
        potentially_hazardous: false,
        miss_distance_km: None,
        orbit: None,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    fn minimal(d: f64, v: f64) -> RawAsteroidRecord {
        RawAsteroidRecord::Minimal(MinimalRecord {
            diameter_m: d,
            velocity_km_s: v,
            density_kg_m3: Some(3000.0),
        })
    }

    #[test]
    fn test_minimal_derives_mass() {
        let p = minimal(100.0, 20.0).normalize().unwrap();
        let expected = PI / 6.0 * 1.0e6 * 3000.0;
        assert!((p.mass_kg - expected).abs() / expected < 1e-12);
        assert_eq!(p.name, "unnamed");
        assert_eq!(p.composition, "S");
    }

    #[test]
    fn test_rejects_bad_numbers() {
        for (d, v, field) in [
            (0.0, 20.0, "diameter_m"),
            (-5.0, 20.0, "diameter_m"),
            (f64::NAN, 20.0, "diameter_m"),
            (100.0, 0.0, "velocity_km_s"),
            (100.0, f64::INFINITY, "velocity_km_s"),
        ] {
            match minimal(d, v).normalize() {
                Err(ImpactError::InvalidInput { field: f, .. }) => assert_eq!(f, field),
                other => panic!("expected InvalidInput for ({d}, {v}), got {other:?}"),
            }
        }
    }

    #[test]
    fn test_neows_uses_mean_diameter() {
        let rec = RawAsteroidRecord::NeoWs(NeoWsRecord {
            name: " (2023 DW) ".into(),
            absolute_magnitude_h: 24.3,
            estimated_diameter_min_m: 40.0,
            estimated_diameter_max_m: 60.0,
            is_potentially_hazardous: true,
            relative_velocity_km_s: 25.0,
            miss_distance_km: Some(1.2e6),
        });
        let p = rec.normalize().unwrap();
        assert!((p.diameter_m - 50.0).abs() < f64::EPSILON);
        assert_eq!(p.name, "(2023 DW)");
        assert!(p.potentially_hazardous);
        assert_eq!(p.absolute_magnitude, Some(24.3));
    }

    #[test]
    fn test_neows_rejects_inverted_range() {
        let rec = RawAsteroidRecord::NeoWs(NeoWsRecord {
            name: "x".into(),
            absolute_magnitude_h: 20.0,
            estimated_diameter_min_m: 60.0,
            estimated_diameter_max_m: 40.0,
            is_potentially_hazardous: false,
            relative_velocity_km_s: 20.0,
            miss_distance_km: None,
        });
        assert!(matches!(rec.normalize(), Err(ImpactError::InvalidInput { .. })));
    }

    #[test]
    fn test_catalog_composition_alias_and_given_mass() {
        let rec = RawAsteroidRecord::Catalog(CatalogRecord {
            name: "Psyche".into(),
            diameter_m: 2.2e5,
            velocity_km_s: 15.0,
            density_kg_m3: None,
            mass_kg: Some(2.29e19),
            composition: Some("metallic".into()),
            spectral_type: Some("M".into()),
            absolute_magnitude: Some(5.9),
            orbit: None,
        });
        let p = rec.normalize().unwrap();
        assert_eq!(p.composition, "M");
        assert!((p.mass_kg - 2.29e19).abs() < 1.0);
        let m = CompositionTable::builtin().get("M").unwrap();
        assert!((p.density_kg_m3 - m.density.typical).abs() < f64::EPSILON);
    }

    #[test]
    fn test_catalog_unknown_composition() {
        let rec = RawAsteroidRecord::Catalog(CatalogRecord {
            name: "x".into(),
            diameter_m: 10.0,
            velocity_km_s: 10.0,
            density_kg_m3: None,
            mass_kg: None,
            composition: Some("cheese".into()),
            spectral_type: None,
            absolute_magnitude: None,
            orbit: None,
        });
        match rec.normalize() {
            Err(ImpactError::UnknownComposition { key }) => assert_eq!(key, "cheese"),
            other => panic!("expected UnknownComposition, got {other:?}"),
        }
    }

    #[test]
    fn test_tagged_json() {
        let json = r#"{"source":"minimal","diameter_m":50.0,"velocity_km_s":17.0}"#;
        let rec: RawAsteroidRecord = serde_json::from_str(json).unwrap();
        let p = rec.normalize().unwrap();
        assert!(p.mass_kg > 0.0);
        assert!((p.impact_scenario(45.0).velocity_km_s - 17.0).abs() < f64::EPSILON);
    }
}
