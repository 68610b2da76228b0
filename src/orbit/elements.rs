//! Classical orbital elements.

use serde::{Deserialize, Serialize};

use crate::units::{AU_KM, J2000_JD};

/// Keplerian elements of a heliocentric orbit (ecliptic J2000).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrbitalElements {
    /// Semi-major axis (AU).
    pub semi_major_axis_au: f64,
    /// Eccentricity, `[0, 1)` for bound orbits.
    pub eccentricity: f64,
    /// Inclination (degrees).
    pub inclination_deg: f64,
    /// Longitude of the ascending node (degrees).
    pub ascending_node_deg: f64,
    /// Argument of periapsis (degrees).
    pub argument_of_periapsis_deg: f64,
    /// Mean anomaly at epoch (degrees).
    pub mean_anomaly_deg: f64,
    /// Epoch (Julian date).
    pub epoch_jd: f64,
}

/// A plausibility problem found by [`OrbitalElements::validate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementIssue {
    /// Offending field.
    pub field: String,
    /// Its value.
    pub value: f64,
    /// What is wrong with it.
    pub message: String,
}

impl ElementIssue {
    fn new(field: &str, value: f64, message: &str) -> Self {
        Self {
            field: field.to_string(),
            value,
            message: message.to_string(),
        }
    }
}

impl OrbitalElements {
    /// Create elements from semi-major axis (AU), eccentricity, angles
    /// (degrees) and epoch (JD).
    #[must_use]
    pub const fn new(
        semi_major_axis_au: f64,
        eccentricity: f64,
        inclination_deg: f64,
        ascending_node_deg: f64,
        argument_of_periapsis_deg: f64,
        mean_anomaly_deg: f64,
        epoch_jd: f64,
    ) -> Self {
        Self {
            semi_major_axis_au,
            eccentricity,
            inclination_deg,
            ascending_node_deg,
            argument_of_periapsis_deg,
            mean_anomaly_deg,
            epoch_jd,
        }
    }

    /// Earth-Moon barycenter mean elements at J2000 (Standish 1992).
    #[must_use]
    pub const fn earth_j2000() -> Self {
        // ω = ϖ − Ω, M = L − ϖ with L = 100.46457166°; i (−1.5e-5°) taken as 0
        Self::new(
            1.000_002_61,
            0.016_711_23,
            0.0,
            0.0,
            102.937_681_93,
            -2.473_110_27,
            J2000_JD,
        )
    }

    /// Orbital period in Julian years (Kepler's third law, `a^1.5`).
    #[must_use]
    pub fn period_years(&self) -> f64 {
        self.semi_major_axis_au.powf(1.5)
    }

    /// Perihelion distance `a(1 − e)` (AU).
    #[must_use]
    pub fn perihelion_au(&self) -> f64 {
        self.semi_major_axis_au * (1.0 - self.eccentricity)
    }

    /// Aphelion distance `a(1 + e)` (AU).
    #[must_use]
    pub fn aphelion_au(&self) -> f64 {
        self.semi_major_axis_au * (1.0 + self.eccentricity)
    }

    /// Perihelion distance (km).
    #[must_use]
    pub fn perihelion_km(&self) -> f64 {
        self.perihelion_au() * AU_KM
    }

    /// Report physically implausible elements. Never rejects.
    #[must_use]
    pub fn validate(&self) -> Vec<ElementIssue> {
        let mut issues = Vec::new();
        let fields = [
            ("semi_major_axis_au", self.semi_major_axis_au),
            ("eccentricity", self.eccentricity),
            ("inclination_deg", self.inclination_deg),
            ("ascending_node_deg", self.ascending_node_deg),
            ("argument_of_periapsis_deg", self.argument_of_periapsis_deg),
            ("mean_anomaly_deg", self.mean_anomaly_deg),
            ("epoch_jd", self.epoch_jd),
        ];
        for (field, value) in fields {
            if !value.is_finite() {
                issues.push(ElementIssue::new(field, value, "not finite"));
            }
        }

        if self.semi_major_axis_au <= 0.0 {
            issues.push(ElementIssue::new(
                "semi_major_axis_au",
                self.semi_major_axis_au,
                "must be positive",
            ));
        }
        if self.eccentricity < 0.0 {
            issues.push(ElementIssue::new("eccentricity", self.eccentricity, "must be non-negative"));
        } else if self.eccentricity >= 1.0 {
            issues.push(ElementIssue::new("eccentricity", self.eccentricity, "orbit is not bound"));
        }
        if !(0.0..=180.0).contains(&self.inclination_deg) && self.inclination_deg.is_finite() {
            issues.push(ElementIssue::new(
                "inclination_deg",
                self.inclination_deg,
                "outside [0, 180]",
            ));
        }
        for (field, value) in [
            ("ascending_node_deg", self.ascending_node_deg),
            ("argument_of_periapsis_deg", self.argument_of_periapsis_deg),
            ("mean_anomaly_deg", self.mean_anomaly_deg),
        ] {
            if value.is_finite() && !(-360.0..=360.0).contains(&value) {
                issues.push(ElementIssue::new(field, value, "outside [-360, 360]"));
            }
        }
        issues
    }

    /// True when [`Self::validate`] finds nothing.
    #[must_use]
    pub fn is_plausible(&self) -> bool {
        self.validate().is_empty()
    }

    /// Copy coerced onto a bound orbit: `a ← max(|a|, 1e-6)`,
    /// `e ← min(|e|, 0.999999)`. NaN stays NaN.
    #[must_use]
    pub(crate) fn sanitized(&self) -> Self {
        let a = if self.semi_major_axis_au.is_nan() {
            f64::NAN
        } else {
            self.semi_major_axis_au.abs().max(1e-6)
        };
        let e = if self.eccentricity.is_nan() {
            f64::NAN
        } else {
            self.eccentricity.abs().min(0.999_999)
        };
        Self {
            semi_major_axis_au: a,
            eccentricity: e,
            ..*self
        }
    }
}

/// Plausibility report for a set of elements, alongside the other orbit
/// operations. Same as [`OrbitalElements::validate`].
#[must_use]
pub fn validate_elements(elements: &OrbitalElements) -> Vec<ElementIssue> {
    elements.validate()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apophis() -> OrbitalElements {
        OrbitalElements::new(0.9224, 0.1911, 3.339, 204.0, 126.7, 180.0, J2000_JD)
    }

    #[test]
    fn test_period_and_apsides() {
        let el = apophis();
        assert!((el.period_years() - 0.8859).abs() < 1e-3);
        assert!((el.perihelion_au() - 0.7461).abs() < 1e-3);
        assert!((el.aphelion_au() - 1.0987).abs() < 1e-3);
    }

    #[test]
    fn test_earth_elements() {
        let earth = OrbitalElements::earth_j2000();
        assert!((earth.period_years() - 1.0).abs() < 1e-4);
        assert!(earth.is_plausible());
    }

    #[test]
    fn test_validate_flags_without_rejecting() {
        let bad = OrbitalElements::new(-1.0, 1.2, 200.0, 0.0, 0.0, 720.0, J2000_JD);
        let issues = bad.validate();
        let fields: Vec<&str> = issues.iter().map(|i| i.field.as_str()).collect();
        assert!(fields.contains(&"semi_major_axis_au"));
        assert!(fields.contains(&"eccentricity"));
        assert!(fields.contains(&"inclination_deg"));
        assert!(fields.contains(&"mean_anomaly_deg"));
    }

    #[test]
    fn test_validate_non_finite() {
        let el = OrbitalElements::new(f64::NAN, 0.1, 0.0, 0.0, 0.0, 0.0, J2000_JD);
        assert!(el.validate().iter().any(|i| i.message == "not finite"));
    }

    #[test]
    fn test_validate_elements_matches_method() {
        let bad = OrbitalElements::new(1.0, -0.2, 0.0, 0.0, 0.0, 0.0, J2000_JD);
        assert_eq!(validate_elements(&bad).len(), bad.validate().len());
        assert!(validate_elements(&apophis()).is_empty());
    }

    #[test]
    fn test_sanitized() {
        let s = OrbitalElements::new(-2.0, 1.5, 0.0, 0.0, 0.0, 0.0, J2000_JD).sanitized();
        assert!((s.semi_major_axis_au - 2.0).abs() < f64::EPSILON);
        assert!(s.eccentricity < 1.0);

        let n = OrbitalElements::new(f64::NAN, f64::NAN, 0.0, 0.0, 0.0, 0.0, J2000_JD).sanitized();
        assert!(n.semi_major_axis_au.is_nan());
        assert!(n.eccentricity.is_nan());
    }
}
