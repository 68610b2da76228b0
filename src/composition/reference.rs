//! Reference asteroids with spacecraft- or radar-measured properties.

use serde::{Deserialize, Serialize};

use super::properties::DerivedProperties;
use crate::uncertainty::UncertainValue;

/// Deviation (σ) up to which a property agrees well.
pub const GOOD_AGREEMENT_SIGMA: f64 = 1.0;

/// Deviation (σ) up to which a property agrees fairly.
pub const FAIR_AGREEMENT_SIGMA: f64 = 2.0;

/// A well-characterized asteroid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReferenceAsteroid {
    /// Lowercase name used for lookup.
    pub name: &'static str,
    /// Canonical composition key.
    pub composition_type: &'static str,
    /// Bulk density (kg/m³), value and σ.
    pub density: (f64, f64),
    /// Mass (kg), value and σ.
    pub mass: (f64, f64),
    /// Geometric albedo, value and σ.
    pub albedo: (f64, f64),
    /// Citation.
    pub source: &'static str,
}

impl ReferenceAsteroid {
    /// All built-in reference bodies.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        REFERENCE_ASTEROIDS
    }

    /// Find a reference body by name (case-insensitive, token match).
    #[must_use]
    pub fn find(name: &str) -> Option<&'static Self> {
        let lower = name.to_ascii_lowercase();
        lower
            .split(|c: char| !c.is_ascii_alphanumeric())
            .find_map(|token| REFERENCE_ASTEROIDS.iter().find(|r| r.name == token))
    }

    fn value(&self, pair: (f64, f64), unit: &str) -> UncertainValue {
        UncertainValue::new(pair.0, pair.1, unit, self.source)
    }
}

const REFERENCE_ASTEROIDS: &[ReferenceAsteroid] = &[
    ReferenceAsteroid {
        name: "bennu",
        composition_type: "C",
        density: (1190.0, 13.0),
        mass: (7.329e10, 0.009e10),
        albedo: (0.044, 0.002),
        source: "Lauretta et al. 2019, Nature 568",
    },
    ReferenceAsteroid {
        name: "ryugu",
        composition_type: "C",
        density: (1190.0, 20.0),
        mass: (4.50e11, 0.06e11),
        albedo: (0.045, 0.002),
        source: "Watanabe et al. 2019, Science 364",
    },
    ReferenceAsteroid {
        name: "eros",
        composition_type: "S",
        density: (2670.0, 30.0),
        mass: (6.687e15, 0.003e15),
        albedo: (0.25, 0.06),
        source: "Yeomans et al. 2000, Science 289",
    },
    ReferenceAsteroid {
        name: "itokawa",
        composition_type: "S",
        density: (1900.0, 130.0),
        mass: (3.51e10, 0.105e10),
        albedo: (0.29, 0.03),
        source: "Fujiwara et al. 2006, Science 312",
    },
    ReferenceAsteroid {
        name: "psyche",
        composition_type: "M",
        density: (3780.0, 340.0),
        mass: (2.29e19, 0.145e19),
        albedo: (0.15, 0.03),
        source: "Shepard et al. 2021, PSJ 2",
    },
    ReferenceAsteroid {
        name: "vesta",
        composition_type: "V",
        density: (3456.0, 35.0),
        mass: (2.590_76e20, 0.000_01e20),
        albedo: (0.42, 0.02),
        source: "Russell et al. 2012, Science 336",
    },
];

/// Agreement grade for one property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyAgreement {
    /// Within 1σ.
    Good,
    /// Within 2σ.
    Fair,
    /// Beyond 2σ (or non-finite).
    Poor,
    /// No reference data for this body.
    NoData,
}

impl PropertyAgreement {
    /// Grade a sigma deviation.
    #[must_use]
    pub fn from_sigma(sigma: f64) -> Self {
        if sigma <= GOOD_AGREEMENT_SIGMA {
            Self::Good
        } else if sigma <= FAIR_AGREEMENT_SIGMA {
            Self::Fair
        } else {
            Self::Poor
        }
    }
}

/// Comparison of one derived property with its reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyCheck {
    /// Property name (`density`, `mass`, `albedo`).
    pub property: String,
    /// Derived value.
    pub derived: UncertainValue,
    /// Reference value, when the body is known.
    pub reference: Option<UncertainValue>,
    /// Combined-uncertainty deviation, when the body is known.
    pub sigma_deviation: Option<f64>,
    /// Agreement grade.
    pub agreement: PropertyAgreement,
}

/// Outcome of [`crate::composition::CompositionEngine::validate_properties`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyValidation {
    /// False iff any property agrees poorly.
    pub is_valid: bool,
    /// Per-property checks.
    pub results: Vec<PropertyCheck>,
}

pub(crate) fn validate(name: &str, derived: &DerivedProperties) -> PropertyValidation {
    let pairs = [
        ("density", &derived.bulk_density),
        ("mass", &derived.mass),
        ("albedo", &derived.albedo),
    ];

    let Some(reference) = ReferenceAsteroid::find(name) else {
        let results = pairs
            .iter()
            .map(|(property, value)| PropertyCheck {
                property: (*property).to_string(),
                derived: (*value).clone(),
                reference: None,
                sigma_deviation: None,
                agreement: PropertyAgreement::NoData,
            })
            .collect();
        return PropertyValidation {
            is_valid: true,
            results,
        };
    };

    let references = [
        reference.value(reference.density, "kg/m³"),
        reference.value(reference.mass, "kg"),
        reference.value(reference.albedo, ""),
    ];

    let results: Vec<PropertyCheck> = pairs
        .iter()
        .zip(references)
        .map(|((property, value), reference)| {
            let sigma = value.sigma_deviation(&reference);
            PropertyCheck {
                property: (*property).to_string(),
                derived: (*value).clone(),
                reference: Some(reference),
                sigma_deviation: Some(sigma),
                agreement: PropertyAgreement::from_sigma(sigma),
            }
        })
        .collect();

    let is_valid = results
        .iter()
        .all(|r| r.agreement != PropertyAgreement::Poor);

    PropertyValidation { is_valid, results }
}
