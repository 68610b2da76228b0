//! Versioned registry of historical events and benchmark orbits.
//!
//! Reference values are literal published numbers with their citations.
//! [`ReferenceRegistry::fingerprint`] hashes the whole registry so a
//! consumer can detect edited values.

use serde::{Deserialize, Serialize};

use crate::error::{ImpactError, ImpactResult};
use crate::orbit::OrbitalElements;
use crate::uncertainty::UncertainValue;
use crate::units::J2000_JD;

/// Version of the built-in reference set.
pub const REGISTRY_VERSION: &str = "2024.1";

/// Parameters a historical event can be validated on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventParameter {
    /// Impact energy (physical kt TNT).
    Energy,
    /// Ground radius of severe airblast damage (km).
    AirblastRadius,
    /// Equivalent seismic magnitude.
    SeismicMagnitude,
}

impl EventParameter {
    /// Name used in reports.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Energy => "energy_kt",
            Self::AirblastRadius => "airblast_radius_km",
            Self::SeismicMagnitude => "seismic_magnitude",
        }
    }
}

/// Parameters a benchmark orbit can be validated on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrbitalParameter {
    /// Orbital period (years).
    Period,
    /// Perihelion distance (AU).
    Perihelion,
    /// Aphelion distance (AU).
    Aphelion,
}

impl OrbitalParameter {
    /// Name used in reports.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Period => "period_years",
            Self::Perihelion => "perihelion_au",
            Self::Aphelion => "aphelion_au",
        }
    }
}

/// Physical inputs reconstructed for a historical event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventInputs {
    /// Impactor diameter (m).
    pub diameter_m: UncertainValue,
    /// Impactor density (kg/m³).
    pub density: UncertainValue,
    /// Entry velocity (km/s).
    pub velocity_km_s: UncertainValue,
    /// Published yield (kt) the blast footprint is scaled from.
    pub yield_kt: UncertainValue,
    /// Entry angle from horizontal (degrees).
    pub angle_deg: f64,
    /// Burst altitude (km).
    pub burst_altitude_km: f64,
}

/// A historical impact or airburst.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalEvent {
    /// Event name.
    pub name: String,
    /// Date (ISO 8601).
    pub date: String,
    /// Model inputs.
    pub inputs: EventInputs,
    /// Published reference values; each carries its citation as source.
    pub references: Vec<(EventParameter, UncertainValue)>,
}

/// An asteroid with well-determined orbit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkAsteroid {
    /// Name.
    pub name: String,
    /// Osculating elements.
    pub elements: OrbitalElements,
    /// One-sigma uncertainty of the semi-major axis (AU).
    pub semi_major_axis_sigma_au: f64,
    /// One-sigma uncertainty of the eccentricity.
    pub eccentricity_sigma: f64,
    /// Published reference values.
    pub references: Vec<(OrbitalParameter, UncertainValue)>,
}

/// Immutable set of reference data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceRegistry {
    /// Version string of the reference set.
    pub version: String,
    /// Historical events.
    pub events: Vec<HistoricalEvent>,
    /// Benchmark orbits.
    pub benchmarks: Vec<BenchmarkAsteroid>,
}

fn cited(value: f64, sigma: f64, unit: &str, citation: &str) -> UncertainValue {
    UncertainValue::new(value, sigma, unit, citation)
}

const SBDB: &str = "JPL Small-Body Database";

/// Rounding half-width of four-decimal SBDB values.
const SBDB_SIGMA: f64 = 0.000_5;

fn benchmark(
    name: &str,
    elements: OrbitalElements,
    period: f64,
    perihelion: f64,
    aphelion: f64,
) -> BenchmarkAsteroid {
    BenchmarkAsteroid {
        name: name.to_string(),
        elements,
        semi_major_axis_sigma_au: 1.0e-6,
        eccentricity_sigma: 1.0e-6,
        references: vec![
            (OrbitalParameter::Period, cited(period, SBDB_SIGMA, "yr", SBDB)),
            (OrbitalParameter::Perihelion, cited(perihelion, SBDB_SIGMA, "AU", SBDB)),
            (OrbitalParameter::Aphelion, cited(aphelion, SBDB_SIGMA, "AU", SBDB)),
        ],
    }
}

impl ReferenceRegistry {
    /// Registry from explicit contents.
    #[must_use]
    pub fn new(
        version: impl Into<String>,
        events: Vec<HistoricalEvent>,
        benchmarks: Vec<BenchmarkAsteroid>,
    ) -> Self {
        Self {
            version: version.into(),
            events,
            benchmarks,
        }
    }

    /// The built-in reference set: Tunguska, Chelyabinsk and four
    /// benchmark orbits.
    #[must_use]
    pub fn builtin() -> Self {
        let tunguska = HistoricalEvent {
            name: "Tunguska".to_string(),
            date: "1908-06-30".to_string(),
            inputs: EventInputs {
                diameter_m: cited(60.0, 10.0, "m", "Chyba et al. 1993"),
                density: cited(2200.0, 500.0, "kg/m³", "Chyba et al. 1993"),
                velocity_km_s: cited(20.0, 5.0, "km/s", "Chyba et al. 1993"),
                yield_kt: cited(12_000.0, 3_000.0, "kt", "Chyba et al. 1993"),
                angle_deg: 30.0,
                burst_altitude_km: 8.0,
            },
            references: vec![
                (
                    EventParameter::Energy,
                    cited(12_000.0, 3_000.0, "kt", "Chyba, Thomas & Zahnle 1993, Nature 361"),
                ),
                (
                    EventParameter::AirblastRadius,
                    cited(30.0, 5.0, "km", "Vasilyev 1998, Planet. Space Sci. 46"),
                ),
                (
                    EventParameter::SeismicMagnitude,
                    cited(5.0, 0.5, "", "Ben-Menahem 1975, Phys. Earth Planet. Inter. 11"),
                ),
            ],
        };

        let chelyabinsk = HistoricalEvent {
            name: "Chelyabinsk".to_string(),
            date: "2013-02-15".to_string(),
            inputs: EventInputs {
                diameter_m: cited(19.0, 1.0, "m", "Popova et al. 2013"),
                density: cited(3300.0, 300.0, "kg/m³", "Popova et al. 2013"),
                velocity_km_s: cited(19.16, 0.15, "km/s", "Borovička et al. 2013"),
                yield_kt: cited(500.0, 100.0, "kt", "Brown et al. 2013"),
                angle_deg: 18.3,
                burst_altitude_km: 29.7,
            },
            references: vec![(
                EventParameter::Energy,
                cited(500.0, 100.0, "kt", "Brown et al. 2013, Nature 503"),
            )],
        };

        let benchmarks = vec![
            benchmark(
                "99942 Apophis",
                OrbitalElements::new(0.9224, 0.1911, 3.339, 204.0, 126.7, 180.0, J2000_JD),
                0.8859,
                0.7461,
                1.0987,
            ),
            benchmark(
                "1566 Icarus",
                OrbitalElements::new(1.0778, 0.827, 22.8, 87.9, 31.4, 90.0, J2000_JD),
                1.1189,
                0.1865,
                1.9691,
            ),
            benchmark(
                "101955 Bennu",
                OrbitalElements::new(1.126, 0.2037, 6.035, 2.06, 66.2, 101.7, J2000_JD),
                1.1948,
                0.8966,
                1.3554,
            ),
            benchmark(
                "433 Eros",
                OrbitalElements::new(1.4579, 0.2226, 10.83, 304.3, 178.9, 320.2, J2000_JD),
                1.7603,
                1.1334,
                1.7824,
            ),
        ];

        Self::new(REGISTRY_VERSION, vec![tunguska, chelyabinsk], benchmarks)
    }

    /// Look up an event by name (case-insensitive).
    #[must_use]
    pub fn event(&self, name: &str) -> Option<&HistoricalEvent> {
        self.events.iter().find(|e| e.name.eq_ignore_ascii_case(name))
    }

    /// Look up a benchmark orbit by name or designation (case-insensitive substring).
    #[must_use]
    pub fn benchmark(&self, name: &str) -> Option<&BenchmarkAsteroid> {
        let needle = name.to_ascii_lowercase();
        self.benchmarks
            .iter()
            .find(|b| b.name.to_ascii_lowercase().contains(&needle))
    }

    /// Blake3 hash (hex) of the registry's JSON form.
    ///
    /// # Errors
    ///
    /// Returns [`ImpactError::Serialization`] if the registry cannot be
    /// serialized (non-finite numbers serialize as `null`, so this does not
    /// happen for well-formed data).
    pub fn fingerprint(&self) -> ImpactResult<String> {
        let bytes = serde_json::to_vec(self)
            .map_err(|e| ImpactError::serialization(format!("registry fingerprint: {e}")))?;
        Ok(blake3::hash(&bytes).to_hex().to_string())
    }
}
