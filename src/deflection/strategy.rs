//! Deflection strategies and evaluation records.

use serde::{Deserialize, Serialize};

/// An immutable description of a deflection technique.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeflectionStrategy {
    /// Stable identifier (`kinetic_impactor`, `gravity_tractor`, ...).
    pub id: String,
    /// Display name.
    pub name: String,
    /// Velocity change imparted to the asteroid (m/s).
    pub delta_v_m_s: f64,
    /// Lead time the mission needs before impact (years).
    pub lead_time_years: f64,
    /// Mission cost (USD).
    pub cost_usd: f64,
    /// Baseline probability of mission success.
    pub success_rate: f64,
    /// Spacecraft mass (kg).
    pub spacecraft_mass_kg: f64,
}

impl DeflectionStrategy {
    /// Create a strategy.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        delta_v_m_s: f64,
        lead_time_years: f64,
        cost_usd: f64,
        success_rate: f64,
        spacecraft_mass_kg: f64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            delta_v_m_s,
            lead_time_years,
            cost_usd,
            success_rate,
            spacecraft_mass_kg,
        }
    }

    /// Reference mission concepts.
    #[must_use]
    pub fn catalog() -> Vec<Self> {
        vec![
            Self::new("kinetic_impactor", "Kinetic Impactor", 0.01, 5.0, 5.0e8, 0.9, 600.0),
            Self::new("gravity_tractor", "Gravity Tractor", 0.001, 15.0, 1.5e9, 0.8, 20_000.0),
            Self::new("nuclear_standoff", "Nuclear Standoff", 0.1, 2.0, 3.0e9, 0.75, 10_000.0),
            Self::new("ion_beam_shepherd", "Ion Beam Shepherd", 0.005, 10.0, 1.0e9, 0.7, 5_000.0),
            Self::new("laser_ablation", "Laser Ablation", 0.002, 10.0, 2.0e9, 0.6, 8_000.0),
        ]
    }
}

/// The threat a strategy is evaluated against.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThreatAssessment {
    /// Asteroid velocity (km/s).
    pub velocity_km_s: f64,
    /// Distance to Earth (AU).
    pub distance_au: f64,
    /// Asteroid diameter (m).
    pub size_m: f64,
    /// Asteroid mass (kg).
    pub mass_kg: f64,
    /// Current impact probability.
    pub impact_probability: f64,
    /// Economic value at risk (USD).
    pub economic_value_at_risk_usd: f64,
}

/// Mission success assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissionAssessment {
    /// Probability exceeds the success threshold.
    pub success: bool,
    /// Penalized success probability.
    pub probability: f64,
    /// Every penalty that applied.
    pub factors: Vec<String>,
    /// ΔV needed to move the arrival point one miss distance (m/s).
    pub required_delta_v_m_s: f64,
    /// Momentum needed for that ΔV (kg·m/s).
    pub required_momentum: f64,
}

/// One strategy evaluated against one threat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeflectionResult {
    /// Strategy identifier.
    pub strategy_id: String,
    /// Strategy name.
    pub strategy_name: String,
    /// Trajectory change (degrees).
    pub trajectory_change_deg: f64,
    /// Impact probability removed.
    pub probability_reduction: f64,
    /// Mission success flag.
    pub success: bool,
    /// Penalized success probability.
    pub success_probability: f64,
    /// `probability_reduction · value_at_risk / cost`, infinite at zero cost.
    pub cost_effectiveness: f64,
    /// Penalties that applied.
    pub risk_factors: Vec<String>,
    /// Required ΔV (m/s).
    pub required_delta_v_m_s: f64,
}

/// Launch dates as Julian dates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LaunchWindow {
    /// Predicted impact date.
    pub impact_jd: f64,
    /// Earliest sensible launch.
    pub earliest_launch_jd: f64,
    /// Nominal launch, one lead time before impact.
    pub optimal_launch_jd: f64,
    /// Latest sensible launch.
    pub latest_launch_jd: f64,
}
