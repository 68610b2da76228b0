//! State-vector propagation and close-approach search.

use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;
use tracing::debug;

use super::elements::OrbitalElements;
use super::kepler::solve_kepler;
use crate::units::{au_per_day_to_km_per_s, au_to_km, GAUSSIAN_GRAVITATIONAL_CONSTANT};

/// Finest scan step for close-approach search (days).
const MIN_SCAN_STEP_DAYS: f64 = 1.0;

/// Maximum number of coarse scan samples.
const MAX_SCAN_SAMPLES: f64 = 20_000.0;

/// Golden-section refinement stops below this bracket width (days).
const REFINE_TOLERANCE_DAYS: f64 = 1e-6;

/// 3D vector for positions and velocities.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3 {
    /// X component.
    pub x: f64,
    /// Y component.
    pub y: f64,
    /// Z component.
    pub z: f64,
}

impl Vec3 {
    /// Create a new vector.
    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Magnitude (length).
    #[must_use]
    pub fn magnitude(&self) -> f64 {
        self.dot(self).sqrt()
    }

    /// Dot product.
    #[must_use]
    pub fn dot(&self, other: &Self) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Scale by scalar.
    #[must_use]
    pub fn scale(&self, s: f64) -> Self {
        Self::new(self.x * s, self.y * s, self.z * s)
    }

    /// Check if all components are finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl std::ops::Sub for Vec3 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

/// Heliocentric ecliptic state at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StateVector {
    /// Julian date of the state.
    pub julian_date: f64,
    /// Position (AU).
    pub position: Vec3,
    /// Velocity (AU/day).
    pub velocity: Vec3,
}

impl StateVector {
    /// Heliocentric distance (AU).
    #[must_use]
    pub fn distance_au(&self) -> f64 {
        self.position.magnitude()
    }

    /// Position (km).
    #[must_use]
    pub fn position_km(&self) -> Vec3 {
        self.position.scale(au_to_km(1.0))
    }

    /// Velocity (km/s).
    #[must_use]
    pub fn velocity_km_s(&self) -> Vec3 {
        self.velocity.scale(au_per_day_to_km_per_s(1.0))
    }

    /// Speed (km/s).
    #[must_use]
    pub fn speed_km_s(&self) -> f64 {
        au_per_day_to_km_per_s(self.velocity.magnitude())
    }
}

/// Minimum Earth distance found by [`calculate_close_approach`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CloseApproach {
    /// Time of closest approach (JD).
    pub julian_date: f64,
    /// Earth distance at that time (AU).
    pub distance_au: f64,
    /// Earth-relative speed at that time (km/s).
    pub relative_velocity_km_s: f64,
}

impl CloseApproach {
    /// Earth distance (km).
    #[must_use]
    pub fn distance_km(&self) -> f64 {
        au_to_km(self.distance_au)
    }
}

/// Propagate elements to `julian_date` under two-body motion about the Sun.
///
/// Mean motion `n = k / a^1.5` (Gaussian constant), mean anomaly advances
/// linearly from epoch, then perifocal position and velocity are rotated by
/// ω, i and Ω into the ecliptic frame.
#[must_use]
#[allow(clippy::many_single_char_names)]
pub fn calculate_position(elements: &OrbitalElements, julian_date: f64) -> StateVector {
    let el = elements.sanitized();
    let a = el.semi_major_axis_au;
    let e = el.eccentricity;

    let n = GAUSSIAN_GRAVITATIONAL_CONSTANT / a.powf(1.5);
    let m = (el.mean_anomaly_deg.to_radians() + n * (julian_date - el.epoch_jd)).rem_euclid(TAU);
    let ecc = solve_kepler(m, e);

    let (sin_e, cos_e) = ecc.sin_cos();
    let root = (1.0 - e * e).sqrt();
    let denom = 1.0 - e * cos_e;

    // Perifocal frame
    let r_pqw = Vec3::new(a * (cos_e - e), a * root * sin_e, 0.0);
    let v_pqw = Vec3::new(-a * n * sin_e / denom, a * n * root * cos_e / denom, 0.0);

    let (sin_raan, cos_raan) = el.ascending_node_deg.to_radians().sin_cos();
    let (sin_i, cos_i) = el.inclination_deg.to_radians().sin_cos();
    let (sin_omega, cos_omega) = el.argument_of_periapsis_deg.to_radians().sin_cos();

    let transform = |v: &Vec3| -> Vec3 {
        let x = (cos_raan * cos_omega - sin_raan * sin_omega * cos_i) * v.x
            + (-cos_raan * sin_omega - sin_raan * cos_omega * cos_i) * v.y;
        let y = (sin_raan * cos_omega + cos_raan * sin_omega * cos_i) * v.x
            + (-sin_raan * sin_omega + cos_raan * cos_omega * cos_i) * v.y;
        let z = sin_omega * sin_i * v.x + cos_omega * sin_i * v.y;
        Vec3::new(x, y, z)
    };

    StateVector {
        julian_date,
        position: transform(&r_pqw),
        velocity: transform(&v_pqw),
    }
}

fn earth_distance(elements: &OrbitalElements, earth: &OrbitalElements, jd: f64) -> f64 {
    (calculate_position(elements, jd).position - calculate_position(earth, jd).position).magnitude()
}

/// Find the minimum Earth distance in `[start_jd, end_jd]`.
///
/// Coarse scan (step `max(1 day, span/20000)`) followed by golden-section
/// refinement around the best sample. An empty or inverted window
/// evaluates the start date only.
#[must_use]
pub fn calculate_close_approach(elements: &OrbitalElements, start_jd: f64, end_jd: f64) -> CloseApproach {
    let earth = OrbitalElements::earth_j2000();
    let distance = |jd: f64| earth_distance(elements, &earth, jd);

    let span = end_jd - start_jd;
    let best_jd = if span > 0.0 {
        let step = (span / MAX_SCAN_SAMPLES).max(MIN_SCAN_STEP_DAYS);
        let samples = (span / step).ceil() as usize;

        let mut best_jd = start_jd;
        let mut best = distance(start_jd);
        for k in 1..=samples {
            let jd = (start_jd + k as f64 * step).min(end_jd);
            let d = distance(jd);
            if d < best {
                best = d;
                best_jd = jd;
            }
        }

        let lo = (best_jd - step).max(start_jd);
        let hi = (best_jd + step).min(end_jd);
        let refined = golden_section_min(&distance, lo, hi);
        if distance(refined) <= best {
            refined
        } else {
            best_jd
        }
    } else {
        start_jd
    };

    let body = calculate_position(elements, best_jd);
    let planet = calculate_position(&earth, best_jd);
    let result = CloseApproach {
        julian_date: best_jd,
        distance_au: (body.position - planet.position).magnitude(),
        relative_velocity_km_s: au_per_day_to_km_per_s((body.velocity - planet.velocity).magnitude()),
    };
    debug!(
        jd = result.julian_date,
        distance_au = result.distance_au,
        "close approach refined"
    );
    result
}

fn golden_section_min(f: &impl Fn(f64) -> f64, mut lo: f64, mut hi: f64) -> f64 {
    let inv_phi = (5.0_f64.sqrt() - 1.0) / 2.0;
    let mut c = hi - inv_phi * (hi - lo);
    let mut d = lo + inv_phi * (hi - lo);
    let mut fc = f(c);
    let mut fd = f(d);

    for _ in 0..200 {
        if (hi - lo) < REFINE_TOLERANCE_DAYS {
            break;
        }
        if fc < fd {
            hi = d;
            d = c;
            fd = fc;
            c = hi - inv_phi * (hi - lo);
            fc = f(c);
        } else {
            lo = c;
            c = d;
            fc = fd;
            d = lo + inv_phi * (hi - lo);
            fd = f(d);
        }
    }
    0.5 * (lo + hi)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::J2000_JD;

    fn earth() -> OrbitalElements {
        OrbitalElements::earth_j2000()
    }

    #[test]
    fn test_earth_orbit_radius_and_speed() {
        for days in [0.0, 91.0, 182.0, 273.0] {
            let s = calculate_position(&earth(), J2000_JD + days);
            assert!((0.98..1.02).contains(&s.distance_au()), "r = {}", s.distance_au());
            assert!((29.0..30.6).contains(&s.speed_km_s()), "v = {}", s.speed_km_s());
        }
    }

    #[test]
    fn test_period_returns_to_start() {
        let el = OrbitalElements::new(2.0, 0.3, 10.0, 40.0, 60.0, 15.0, J2000_JD);
        let period_days = TAU * el.semi_major_axis_au.powf(1.5) / GAUSSIAN_GRAVITATIONAL_CONSTANT;
        let a = calculate_position(&el, J2000_JD);
        let b = calculate_position(&el, J2000_JD + period_days);
        assert!((a.position - b.position).magnitude() < 1e-8);
    }

    #[test]
    fn test_perihelion_distance() {
        let el = OrbitalElements::new(1.5, 0.4, 5.0, 0.0, 0.0, 0.0, J2000_JD);
        let s = calculate_position(&el, J2000_JD);
        assert!((s.distance_au() - el.perihelion_au()).abs() < 1e-12);
    }

    #[test]
    fn test_invalid_elements_stay_finite() {
        let el = OrbitalElements::new(-1.0, 1.5, 400.0, -720.0, 900.0, 1e4, J2000_JD);
        let s = calculate_position(&el, J2000_JD + 100.0);
        assert!(s.position.is_finite());
        assert!(s.velocity.is_finite());
    }

    #[test]
    fn test_nan_elements_propagate() {
        let el = OrbitalElements::new(f64::NAN, 0.1, 0.0, 0.0, 0.0, 0.0, J2000_JD);
        let s = calculate_position(&el, J2000_JD);
        assert!(!s.position.is_finite());
    }

    #[test]
    fn test_close_approach_co_orbital() {
        let mut el = earth();
        el.mean_anomaly_deg += 1.0;
        let ca = calculate_close_approach(&el, J2000_JD, J2000_JD + 365.0);
        assert!(ca.distance_au < 0.02);
        assert!(ca.distance_au > 0.01);
        assert!((J2000_JD..=J2000_JD + 365.0).contains(&ca.julian_date));
    }

    #[test]
    fn test_close_approach_not_worse_than_scan() {
        let el = OrbitalElements::new(1.1, 0.2, 5.0, 30.0, 50.0, 0.0, J2000_JD);
        let start = J2000_JD;
        let end = J2000_JD + 1000.0;
        let ca = calculate_close_approach(&el, start, end);
        let e = earth();
        for k in 0..=100 {
            let jd = start + f64::from(k) * 10.0;
            assert!(ca.distance_au <= earth_distance(&el, &e, jd) + 1e-9);
        }
        assert!(ca.relative_velocity_km_s.is_finite());
    }

    #[test]
    fn test_empty_window_uses_start() {
        let el = OrbitalElements::new(1.1, 0.2, 5.0, 30.0, 50.0, 0.0, J2000_JD);
        let ca = calculate_close_approach(&el, J2000_JD + 10.0, J2000_JD);
        assert!((ca.julian_date - (J2000_JD + 10.0)).abs() < f64::EPSILON);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::units::J2000_JD;
    use proptest::prelude::*;

    proptest! {
        /// Heliocentric distance stays between perihelion and aphelion.
        #[test]
        fn prop_radius_within_apsides(
            a in 0.5f64..5.0,
            e in 0.0f64..0.95,
            days in -5000.0f64..5000.0,
        ) {
            let el = OrbitalElements::new(a, e, 12.0, 80.0, 45.0, 10.0, J2000_JD);
            let r = calculate_position(&el, J2000_JD + days).distance_au();
            prop_assert!(r >= el.perihelion_au() - 1e-9);
            prop_assert!(r <= el.aphelion_au() + 1e-9);
        }

        /// Garbage elements never produce non-finite output.
        #[test]
        fn prop_finite_for_finite_input(
            a in -10.0f64..10.0,
            e in -3.0f64..3.0,
            angle in -1000.0f64..1000.0,
        ) {
            let el = OrbitalElements::new(a, e, angle, angle, angle, angle, J2000_JD);
            let s = calculate_position(&el, J2000_JD + 42.0);
            prop_assert!(s.position.is_finite());
        }
    }
}
