//! Physical constants and SI conversions.
//!
//! Unit strings on [`UncertainValue`](crate::uncertainty::UncertainValue) are
//! carried, not checked. Conversions that cross a unit boundary inside a
//! calculation go through `uom` so the scale factors live in one place.

use uom::si::f64::{Length, Velocity};
use uom::si::length::{astronomical_unit, kilometer, meter};
use uom::si::velocity::{kilometer_per_second, meter_per_second};

/// Astronomical unit in kilometers.
pub const AU_KM: f64 = 149_597_870.7;

/// Seconds per day.
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Days per Julian year.
pub const DAYS_PER_JULIAN_YEAR: f64 = 365.25;

/// Seconds per Julian year.
pub const SECONDS_PER_JULIAN_YEAR: f64 = DAYS_PER_JULIAN_YEAR * SECONDS_PER_DAY;

/// Julian date of the J2000.0 epoch.
pub const J2000_JD: f64 = 2_451_545.0;

/// Gaussian gravitational constant k (rad/day), heliocentric mean motion at 1 AU.
pub const GAUSSIAN_GRAVITATIONAL_CONSTANT: f64 = 0.017_202_098_95;

/// Mean Earth radius (m).
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Joules per kiloton on the engine's calibrated TNT scale.
///
/// The blast radius laws were fitted against this scale, which is a
/// thousand times smaller than the physical yield of a kiloton.
pub const JOULES_PER_KILOTON: f64 = 4.184e9;

/// Physical energy of one kiloton of TNT (J), used for published yields.
pub const JOULES_PER_KILOTON_TNT: f64 = 4.184e12;

/// Convert km/s to m/s.
#[must_use]
pub fn km_per_s_to_m_per_s(v: f64) -> f64 {
    Velocity::new::<kilometer_per_second>(v).get::<meter_per_second>()
}

/// Convert AU to meters.
#[must_use]
pub fn au_to_m(d: f64) -> f64 {
    Length::new::<astronomical_unit>(d).get::<meter>()
}

/// Convert AU to kilometers.
#[must_use]
pub fn au_to_km(d: f64) -> f64 {
    Length::new::<astronomical_unit>(d).get::<kilometer>()
}

/// Convert meters to kilometers.
#[must_use]
pub fn m_to_km(d: f64) -> f64 {
    Length::new::<meter>(d).get::<kilometer>()
}

/// Convert AU/day to km/s.
#[must_use]
pub fn au_per_day_to_km_per_s(v: f64) -> f64 {
    au_to_km(v) / SECONDS_PER_DAY
}

/// Convert Julian years to seconds.
#[must_use]
pub fn years_to_seconds(t: f64) -> f64 {
    t * SECONDS_PER_JULIAN_YEAR
}
