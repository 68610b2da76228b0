//! Composition classification.
//!
//! Precedence:
//! 1. Spectral type lookup (confidence 0.7–0.9) when a spectral type is known
//! 2. Size prior otherwise (large → carbonaceous, small → stony)
//! 3. Known-body name, only when its confidence beats the current one
//! 4. Albedo consistency: implied albedo from `D = 1329·10^(−H/5)/√p`
//!    off by more than ×3 costs 10 % confidence, never the type

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::model::CompositionTable;

/// Upper bound on classification confidence.
pub const MAX_CONFIDENCE: f64 = 0.95;

/// Implied/expected albedo ratio beyond which confidence is reduced.
pub const ALBEDO_MISMATCH_FACTOR: f64 = 3.0;

/// Confidence multiplier applied on albedo mismatch.
pub const ALBEDO_MISMATCH_PENALTY: f64 = 0.9;

/// Diameter (km) of a body with H = 0 and unit albedo.
const H_TO_DIAMETER_KM: f64 = 1329.0;

/// An alternative class with its heuristic probability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlternativeType {
    /// Canonical class key.
    pub type_key: String,
    /// Heuristic probability.
    pub probability: f64,
}

/// Outcome of composition classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositionClassification {
    /// Chosen canonical class key.
    pub primary_type: String,
    /// Confidence in [0, 0.95].
    pub confidence: f64,
    /// Other plausible classes; probabilities sum below 1.
    pub alternative_types: Vec<AlternativeType>,
    /// What the decision was based on.
    pub evidence_sources: Vec<String>,
    /// Caveats attached to the decision.
    pub limitations: Vec<String>,
    /// Albedo implied by H and D, when both are usable.
    pub implied_albedo: Option<f64>,
}

/// Spectral letter → (class, confidence).
fn spectral_lookup(spectral_type: &str) -> Option<(&'static str, f64)> {
    let letter = spectral_type.trim().chars().next()?.to_ascii_uppercase();
    let hit = match letter {
        'C' => ("C", 0.85),
        'B' => ("C", 0.80),
        'F' | 'G' | 'D' | 'P' => ("C", 0.70),
        'S' => ("S", 0.85),
        'Q' => ("S", 0.80),
        'K' | 'L' | 'A' => ("S", 0.70),
        'M' => ("M", 0.75),
        'X' | 'E' => ("X", 0.70),
        'V' => ("V", 0.90),
        _ => return None,
    };
    Some(hit)
}

/// Size-based prior for bodies without spectra.
fn size_prior(diameter_km: f64) -> (&'static str, f64) {
    if diameter_km >= 10.0 {
        ("C", 0.50)
    } else if diameter_km >= 1.0 {
        ("C", 0.40)
    } else if diameter_km >= 0.1 {
        ("S", 0.45)
    } else {
        ("S", 0.50)
    }
}

/// Spacecraft-visited or well-characterized bodies.
const KNOWN_BODIES: &[(&str, &str, f64)] = &[
    ("bennu", "C", 0.95),
    ("ryugu", "C", 0.95),
    ("mathilde", "C", 0.90),
    ("eros", "S", 0.95),
    ("itokawa", "S", 0.95),
    ("gaspra", "S", 0.90),
    ("ida", "S", 0.90),
    ("didymos", "S", 0.90),
    ("dimorphos", "S", 0.90),
    ("apophis", "S", 0.85),
    ("psyche", "M", 0.90),
    ("kleopatra", "M", 0.85),
    ("lutetia", "X", 0.85),
    ("steins", "X", 0.85),
    ("vesta", "V", 0.95),
];

fn name_lookup(name: &str) -> Option<(&'static str, f64, &'static str)> {
    let lower = name.to_ascii_lowercase();
    lower
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|t| !t.is_empty())
        .find_map(|token| {
            KNOWN_BODIES
                .iter()
                .find(|(known, _, _)| *known == token)
                .map(|(known, key, conf)| (*key, *conf, *known))
        })
}

fn alternatives_for(primary: &str) -> &'static [(&'static str, f64)] {
    match primary {
        "C" => &[("S", 0.15), ("X", 0.10)],
        "S" => &[("C", 0.15), ("V", 0.05)],
        "M" => &[("X", 0.20), ("S", 0.10)],
        "X" => &[("M", 0.25), ("C", 0.20)],
        "V" => &[("S", 0.20)],
        _ => &[],
    }
}

/// Albedo implied by absolute magnitude and diameter.
#[must_use]
pub fn implied_albedo(diameter_m: f64, absolute_magnitude: f64) -> Option<f64> {
    let d_km = diameter_m / 1000.0;
    if !(d_km.is_finite() && d_km > 0.0 && absolute_magnitude.is_finite()) {
        return None;
    }
    let ratio = H_TO_DIAMETER_KM * 10f64.powf(-0.2 * absolute_magnitude) / d_km;
    Some(ratio * ratio)
}

pub(crate) fn classify(
    table: &CompositionTable,
    diameter_m: f64,
    absolute_magnitude: f64,
    name: &str,
    spectral_type: Option<&str>,
) -> CompositionClassification {
    let mut evidence = Vec::new();
    let mut limitations = Vec::new();

    let spectral = spectral_type.and_then(|st| spectral_lookup(st).map(|hit| (st, hit)));
    let (mut primary, mut confidence) = if let Some((st, (key, conf))) = spectral {
        evidence.push(format!("spectral type {}", st.trim()));
        (key, conf)
    } else {
        if let Some(st) = spectral_type {
            limitations.push(format!("unrecognized spectral type '{st}'"));
        }
        let d_km = diameter_m / 1000.0;
        if d_km.is_finite() && d_km > 0.0 {
            evidence.push(format!("size prior for D = {d_km:.3} km"));
            limitations.push("statistical classification without spectral data".to_string());
            size_prior(d_km)
        } else {
            limitations.push("diameter unavailable; population default applied".to_string());
            ("S", 0.30)
        }
    };

    if let Some((key, conf, known)) = name_lookup(name) {
        if conf > confidence {
            evidence.push(format!("known body '{known}'"));
            primary = key;
            confidence = conf;
        }
    }

    let implied = implied_albedo(diameter_m, absolute_magnitude);
    if let (Some(p), Ok(model)) = (implied, table.get(primary)) {
        let expected = model.albedo.typical;
        let mismatch = (p / expected).max(expected / p);
        if mismatch > ALBEDO_MISMATCH_FACTOR {
            confidence *= ALBEDO_MISMATCH_PENALTY;
            warn!(name, implied = p, expected, "albedo inconsistent with composition");
            limitations.push(format!(
                "implied albedo {p:.3} differs from expected {expected:.3} by more than {ALBEDO_MISMATCH_FACTOR}x"
            ));
        } else {
            evidence.push(format!("albedo consistent ({p:.3})"));
        }
    }

    let confidence = confidence.clamp(0.0, MAX_CONFIDENCE);
    let alternative_types = alternatives_for(primary)
        .iter()
        .map(|(key, p)| AlternativeType {
            type_key: (*key).to_string(),
            probability: *p,
        })
        .collect();

    debug!(name, primary, confidence, "composition classified");

    CompositionClassification {
        primary_type: primary.to_string(),
        confidence,
        alternative_types,
        evidence_sources: evidence,
        limitations,
        implied_albedo: implied,
    }
}
