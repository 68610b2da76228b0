//! Static composition configuration table.
//!
//! Five canonical classes keyed by their taxonomic letter:
//!
//! | Key | Class | Typical bulk density |
//! |-----|-------|----------------------|
//! | `C` | carbonaceous | 1.7 g/cm³ |
//! | `S` | stony (ordinary chondrite) | 2.7 g/cm³ |
//! | `M` | metallic (iron/nickel) | 5.3 g/cm³ |
//! | `X` | X-complex (E/M/P, albedo-ambiguous) | 3.0 g/cm³ |
//! | `V` | basaltic (HED) | 3.3 g/cm³ |
//!
//! Ranges are literature spreads (Carry 2012; DeMeo & Carry 2013;
//! Britt et al. 2002), not formal error bars.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::OnceLock;

use crate::error::{ImpactError, ImpactResult};
use crate::uncertainty::UncertainValue;

/// Typical value with its plausible range and one-sigma uncertainty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyRange {
    /// Typical (central) value.
    pub typical: f64,
    /// Lowest plausible value.
    pub min: f64,
    /// Highest plausible value.
    pub max: f64,
    /// One-sigma uncertainty on the typical value.
    pub uncertainty: f64,
    /// Unit label.
    pub unit: String,
    /// Citation.
    pub source: String,
}

impl PropertyRange {
    fn new(typical: f64, min: f64, max: f64, uncertainty: f64, unit: &str, source: &str) -> Self {
        Self {
            typical,
            min,
            max,
            uncertainty,
            unit: unit.to_string(),
            source: source.to_string(),
        }
    }

    /// Typical value as an [`UncertainValue`].
    #[must_use]
    pub fn as_uncertain(&self) -> UncertainValue {
        UncertainValue::new(self.typical, self.uncertainty, self.unit.clone(), self.source.clone())
    }

    /// Clamp a value into the plausible range.
    #[must_use]
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }

    fn is_consistent(&self) -> bool {
        self.min <= self.typical && self.typical <= self.max && self.uncertainty >= 0.0
    }
}

/// How a material class modifies impact energy deposition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImpactResponse {
    /// Fraction of kinetic energy coupled into the target.
    pub coupling_efficiency: f64,
    /// Fraction of energy spent vaporizing the projectile.
    pub vaporization_fraction: f64,
    /// Scaling of the thermal radius.
    pub thermal_multiplier: f64,
    /// Scaling of the airblast radius.
    pub shockwave_multiplier: f64,
}

/// Material model for one composition class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositionModel {
    /// Canonical key.
    pub key: String,
    /// Human-readable class name.
    pub name: String,
    /// Bulk grain density (kg/m³).
    pub density: PropertyRange,
    /// Macro-porosity (fraction).
    pub porosity: PropertyRange,
    /// Bulk tensile strength (Pa).
    pub strength: PropertyRange,
    /// Geometric albedo.
    pub albedo: PropertyRange,
    /// Elemental / mineral mass fractions.
    pub composition: BTreeMap<String, f64>,
    /// Well-known members.
    pub examples: Vec<String>,
    /// Tholen/Bus-DeMeo spectral class label.
    pub spectral_class: String,
    /// Where in the solar system the class is thought to originate.
    pub formation_region: String,
    /// Impact energy deposition modifiers.
    pub impact_response: ImpactResponse,
}

/// Resolve aliases (`carbonaceous`, `stony`, `iron`, `c-type`, ...) to a
/// canonical key. Unknown strings come back trimmed but otherwise unchanged.
#[must_use]
pub fn canonical_key(key: &str) -> String {
    let k = key.trim().to_ascii_lowercase();
    let canonical = match k.as_str() {
        "c" | "c-type" | "ctype" | "carbonaceous" | "carbonaceous chondrite" => "C",
        "s" | "s-type" | "stype" | "stony" | "silicaceous" | "ordinary chondrite" => "S",
        "m" | "m-type" | "mtype" | "metallic" | "iron" | "nickel-iron" => "M",
        "x" | "x-type" | "xtype" => "X",
        "v" | "v-type" | "vtype" | "basaltic" | "achondrite" => "V",
        _ => return key.trim().to_string(),
    };
    canonical.to_string()
}

/// Composition models keyed by canonical class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositionTable {
    models: BTreeMap<String, CompositionModel>,
}

impl CompositionTable {
    /// Process-wide built-in table, constructed on first use.
    #[must_use]
    pub fn builtin() -> &'static Self {
        static TABLE: OnceLock<CompositionTable> = OnceLock::new();
        TABLE.get_or_init(Self::literature_defaults)
    }

    /// Build a table from a list of models.
    ///
    /// # Errors
    ///
    /// Returns a configuration error on duplicate keys or inconsistent ranges.
    pub fn from_models(models: Vec<CompositionModel>) -> ImpactResult<Self> {
        let mut map = BTreeMap::new();
        for model in models {
            for (label, range) in [
                ("density", &model.density),
                ("porosity", &model.porosity),
                ("strength", &model.strength),
                ("albedo", &model.albedo),
            ] {
                if !range.is_consistent() {
                    return Err(ImpactError::config(format!(
                        "composition '{}': {label} range is inconsistent",
                        model.key
                    )));
                }
            }
            if !(0.0..1.0).contains(&model.porosity.max) {
                return Err(ImpactError::config(format!(
                    "composition '{}': porosity must stay below 1",
                    model.key
                )));
            }
            let key = model.key.clone();
            if map.insert(key.clone(), model).is_some() {
                return Err(ImpactError::config(format!("duplicate composition '{key}'")));
            }
        }
        Ok(Self { models: map })
    }

    /// Load a table from YAML (a list of models).
    ///
    /// # Errors
    ///
    /// Returns error if parsing fails or the table is inconsistent.
    pub fn from_yaml(yaml: &str) -> ImpactResult<Self> {
        let models: Vec<CompositionModel> = serde_yaml::from_str(yaml)?;
        Self::from_models(models)
    }

    /// Look up a model by key or alias.
    ///
    /// # Errors
    ///
    /// Returns [`ImpactError::UnknownComposition`] naming the requested key.
    pub fn get(&self, key: &str) -> ImpactResult<&CompositionModel> {
        self.models
            .get(&canonical_key(key))
            .ok_or_else(|| ImpactError::UnknownComposition {
                key: key.to_string(),
            })
    }

    /// Check whether a key (or alias) resolves.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.models.contains_key(&canonical_key(key))
    }

    /// Canonical keys in the table.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.models.keys().map(String::as_str)
    }

    /// Number of models.
    #[must_use]
    pub fn len(&self) -> usize {
        self.models.len()
    }

    /// Check if the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    fn literature_defaults() -> Self {
        const CARRY: &str = "Carry 2012, Planet. Space Sci. 73";
        const BRITT: &str = "Britt et al. 2002, Asteroids III";
        const MAINZER: &str = "Mainzer et al. 2011, ApJ 741 (NEOWISE)";
        const HOLSAPPLE: &str = "Holsapple 2009, Planet. Space Sci. 57";

        let fractions = |pairs: &[(&str, f64)]| {
            pairs
                .iter()
                .map(|(k, v)| ((*k).to_string(), *v))
                .collect::<BTreeMap<_, _>>()
        };
        let names = |list: &[&str]| list.iter().map(|s| (*s).to_string()).collect::<Vec<_>>();

        let models = vec![
            CompositionModel {
                key: "C".to_string(),
                name: "carbonaceous".to_string(),
                density: PropertyRange::new(1700.0, 1200.0, 2200.0, 400.0, "kg/m³", CARRY),
                porosity: PropertyRange::new(0.35, 0.2, 0.6, 0.10, "", BRITT),
                strength: PropertyRange::new(1.0e5, 1.0e4, 1.0e6, 5.0e4, "Pa", HOLSAPPLE),
                albedo: PropertyRange::new(0.06, 0.03, 0.10, 0.02, "", MAINZER),
                composition: fractions(&[
                    ("phyllosilicates", 0.55),
                    ("organics", 0.05),
                    ("magnetite", 0.10),
                    ("olivine", 0.20),
                    ("water", 0.10),
                ]),
                examples: names(&["Bennu", "Ryugu", "Mathilde"]),
                spectral_class: "C".to_string(),
                formation_region: "outer main belt".to_string(),
                impact_response: ImpactResponse {
                    coupling_efficiency: 0.85,
                    vaporization_fraction: 0.15,
                    thermal_multiplier: 1.10,
                    shockwave_multiplier: 0.95,
                },
            },
            CompositionModel {
                key: "S".to_string(),
                name: "stony".to_string(),
                density: PropertyRange::new(2700.0, 2000.0, 3500.0, 400.0, "kg/m³", CARRY),
                porosity: PropertyRange::new(0.20, 0.05, 0.45, 0.08, "", BRITT),
                strength: PropertyRange::new(1.0e6, 1.0e5, 1.0e7, 5.0e5, "Pa", HOLSAPPLE),
                albedo: PropertyRange::new(0.25, 0.15, 0.35, 0.06, "", MAINZER),
                composition: fractions(&[
                    ("olivine", 0.40),
                    ("pyroxene", 0.30),
                    ("plagioclase", 0.10),
                    ("iron-nickel", 0.10),
                    ("troilite", 0.10),
                ]),
                examples: names(&["Eros", "Itokawa", "Gaspra"]),
                spectral_class: "S".to_string(),
                formation_region: "inner main belt".to_string(),
                impact_response: ImpactResponse {
                    coupling_efficiency: 0.90,
                    vaporization_fraction: 0.10,
                    thermal_multiplier: 1.0,
                    shockwave_multiplier: 1.0,
                },
            },
            CompositionModel {
                key: "M".to_string(),
                name: "metallic".to_string(),
                density: PropertyRange::new(5300.0, 4500.0, 7500.0, 800.0, "kg/m³", CARRY),
                porosity: PropertyRange::new(0.10, 0.0, 0.30, 0.05, "", BRITT),
                strength: PropertyRange::new(5.0e7, 1.0e7, 2.0e8, 2.0e7, "Pa", HOLSAPPLE),
                albedo: PropertyRange::new(0.15, 0.10, 0.30, 0.05, "", MAINZER),
                composition: fractions(&[
                    ("iron", 0.85),
                    ("nickel", 0.10),
                    ("troilite", 0.03),
                    ("silicates", 0.02),
                ]),
                examples: names(&["Psyche", "Kleopatra"]),
                spectral_class: "M".to_string(),
                formation_region: "differentiated planetesimal cores".to_string(),
                impact_response: ImpactResponse {
                    coupling_efficiency: 0.95,
                    vaporization_fraction: 0.05,
                    thermal_multiplier: 0.90,
                    shockwave_multiplier: 1.10,
                },
            },
            CompositionModel {
                key: "X".to_string(),
                name: "X-complex".to_string(),
                density: PropertyRange::new(3000.0, 1500.0, 5000.0, 1000.0, "kg/m³", CARRY),
                porosity: PropertyRange::new(0.20, 0.05, 0.50, 0.10, "", BRITT),
                strength: PropertyRange::new(1.0e6, 1.0e5, 5.0e7, 1.0e6, "Pa", HOLSAPPLE),
                albedo: PropertyRange::new(0.10, 0.02, 0.50, 0.08, "", MAINZER),
                composition: fractions(&[
                    ("enstatite", 0.40),
                    ("iron-nickel", 0.30),
                    ("carbonaceous material", 0.30),
                ]),
                examples: names(&["Lutetia", "Steins"]),
                spectral_class: "X".to_string(),
                formation_region: "main belt (mixed)".to_string(),
                impact_response: ImpactResponse {
                    coupling_efficiency: 0.90,
                    vaporization_fraction: 0.10,
                    thermal_multiplier: 1.0,
                    shockwave_multiplier: 1.0,
                },
            },
            CompositionModel {
                key: "V".to_string(),
                name: "basaltic".to_string(),
                density: PropertyRange::new(3300.0, 2900.0, 3600.0, 300.0, "kg/m³", CARRY),
                porosity: PropertyRange::new(0.10, 0.02, 0.25, 0.05, "", BRITT),
                strength: PropertyRange::new(5.0e6, 1.0e6, 2.0e7, 2.0e6, "Pa", HOLSAPPLE),
                albedo: PropertyRange::new(0.35, 0.20, 0.50, 0.08, "", MAINZER),
                composition: fractions(&[
                    ("pyroxene", 0.55),
                    ("plagioclase", 0.35),
                    ("olivine", 0.05),
                    ("other", 0.05),
                ]),
                examples: names(&["Vesta"]),
                spectral_class: "V".to_string(),
                formation_region: "Vesta family".to_string(),
                impact_response: ImpactResponse {
                    coupling_efficiency: 0.92,
                    vaporization_fraction: 0.08,
                    thermal_multiplier: 1.0,
                    shockwave_multiplier: 1.05,
                },
            },
        ];

        Self {
            models: models.into_iter().map(|m| (m.key.clone(), m)).collect(),
        }
    }
}
