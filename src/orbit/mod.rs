//! Two-body orbital mechanics.
//!
//! Heliocentric Keplerian propagation for small bodies:
//! - [`solve_kepler`]: eccentric anomaly from mean anomaly
//! - [`calculate_position`]: state vector at a Julian date
//! - [`calculate_close_approach`]: minimum Earth distance over a window
//!
//! Inputs are never rejected. Out-of-range elements are coerced onto a
//! bound orbit so the result stays finite; [`OrbitalElements::validate`]
//! reports what was implausible. Non-finite inputs yield non-finite output.
//!
//! # Example
//!
//! ```rust
//! use impact_engine::orbit::{calculate_position, OrbitalElements};
//!
//! let earth = OrbitalElements::earth_j2000();
//! let state = calculate_position(&earth, earth.epoch_jd + 365.25);
//! assert!((state.distance_au() - 1.0).abs() < 0.02);
//! ```

pub mod elements;
pub mod kepler;
pub mod propagate;

pub use elements::{validate_elements, ElementIssue, OrbitalElements};
pub use kepler::{eccentric_to_true_anomaly, solve_kepler, KEPLER_MAX_ITERATIONS};
pub use propagate::{calculate_close_approach, calculate_position, CloseApproach, StateVector, Vec3};
