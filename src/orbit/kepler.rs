//! Kepler's equation `M = E − e·sin(E)`.

use tracing::warn;

/// Iteration cap for [`solve_kepler`].
pub const KEPLER_MAX_ITERATIONS: usize = 100;

/// Solve Kepler's equation for the eccentric anomaly (radians).
///
/// Safeguarded Newton–Raphson: each step is accepted only if it stays
/// inside the bracket `[M − |e|, M + |e|]`, which always contains the root,
/// otherwise the bracket is bisected. Converges for any `0 ≤ e < 1`.
///
/// - `e == 0` returns `M` exactly
/// - non-finite `M` or `e` returns NaN
///
/// # Example
///
/// ```rust
/// use impact_engine::orbit::solve_kepler;
///
/// let e = 0.9;
/// let m = 0.3;
/// let ecc = solve_kepler(m, e);
/// assert!((ecc - e * ecc.sin() - m).abs() < 1e-10);
/// ```
#[must_use]
pub fn solve_kepler(mean_anomaly: f64, eccentricity: f64) -> f64 {
    if eccentricity == 0.0 {
        return mean_anomaly;
    }
    if !(mean_anomaly.is_finite() && eccentricity.is_finite()) {
        return f64::NAN;
    }

    let m = mean_anomaly;
    let e = eccentricity;
    let tolerance = 1e-13 * m.abs().max(1.0);
    let mut lo = m - e.abs();
    let mut hi = m + e.abs();
    let mut x = m + e * m.sin();

    for _ in 0..KEPLER_MAX_ITERATIONS {
        let f = x - e * x.sin() - m;
        if f.abs() < tolerance {
            return x;
        }
        if f < 0.0 {
            lo = x;
        } else {
            hi = x;
        }

        let slope = 1.0 - e * x.cos();
        let newton = x - f / slope;
        x = if slope != 0.0 && newton > lo && newton < hi {
            newton
        } else {
            0.5 * (lo + hi)
        };
    }

    warn!(mean_anomaly, eccentricity, residual = x - e * x.sin() - m, "Kepler solver did not converge");
    x
}

/// True anomaly (radians) from eccentric anomaly.
#[must_use]
pub fn eccentric_to_true_anomaly(eccentric_anomaly: f64, eccentricity: f64) -> f64 {
    let half = 0.5 * eccentric_anomaly;
    2.0 * ((1.0 + eccentricity).sqrt() * half.sin()).atan2((1.0 - eccentricity).sqrt() * half.cos())
}
