//! The value-with-uncertainty primitive.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::rng::SampleRng;

/// A scalar tagged with its one-sigma uncertainty, unit and provenance.
///
/// Values are immutable once built; every calculation step creates a new
/// one. Units are carried for reporting only and are never dimensionally
/// checked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UncertainValue {
    /// Central value.
    pub value: f64,
    /// One-sigma uncertainty (non-negative).
    pub uncertainty: f64,
    /// Unit label.
    pub unit: String,
    /// Where the number came from (model name, citation, measurement).
    pub source: String,
}

impl UncertainValue {
    /// Create a new value. A negative uncertainty is stored as its magnitude.
    #[must_use]
    pub fn new(value: f64, uncertainty: f64, unit: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            value,
            uncertainty: uncertainty.abs(),
            unit: unit.into(),
            source: source.into(),
        }
    }

    /// Create a value with zero uncertainty.
    #[must_use]
    pub fn exact(value: f64, unit: impl Into<String>, source: impl Into<String>) -> Self {
        Self::new(value, 0.0, unit, source)
    }

    /// Relative uncertainty `σ / |value|`.
    ///
    /// Returns infinity for a zero value with non-zero uncertainty, and zero
    /// when both are zero.
    #[must_use]
    pub fn relative_uncertainty(&self) -> f64 {
        if self.value == 0.0 {
            if self.uncertainty == 0.0 {
                0.0
            } else {
                f64::INFINITY
            }
        } else {
            self.uncertainty / self.value.abs()
        }
    }

    /// Interval `value ± k·σ`.
    #[must_use]
    pub fn bounds(&self, k: f64) -> (f64, f64) {
        let half = k * self.uncertainty;
        (self.value - half, self.value + half)
    }

    /// Copy with a different provenance string.
    #[must_use]
    pub fn with_source(&self, source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            ..self.clone()
        }
    }

    /// Copy with a different unit label and the same numbers.
    #[must_use]
    pub fn with_unit(&self, unit: impl Into<String>) -> Self {
        Self {
            unit: unit.into(),
            ..self.clone()
        }
    }

    /// Scale value and uncertainty by a constant (unit conversions).
    #[must_use]
    pub fn scaled(&self, factor: f64, unit: impl Into<String>) -> Self {
        Self::new(
            self.value * factor,
            self.uncertainty * factor,
            unit,
            self.source.clone(),
        )
    }

    /// Difference from `other` in units of the combined (root-sum-square)
    /// uncertainty.
    ///
    /// With zero combined uncertainty the result is 0 for equal values and
    /// infinity otherwise.
    #[must_use]
    pub fn sigma_deviation(&self, other: &Self) -> f64 {
        let diff = (self.value - other.value).abs();
        let combined = self.uncertainty.hypot(other.uncertainty);
        if combined == 0.0 {
            if diff == 0.0 {
                0.0
            } else {
                f64::INFINITY
            }
        } else {
            diff / combined
        }
    }

    /// Check that value and uncertainty are finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.value.is_finite() && self.uncertainty.is_finite()
    }
}

impl fmt::Display for UncertainValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ± {}", self.value, self.uncertainty)?;
        if !self.unit.is_empty() {
            write!(f, " {}", self.unit)?;
        }
        Ok(())
    }
}

/// Sampling distribution for a propagation input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Distribution {
    /// Normal with mean = value and std = uncertainty.
    #[default]
    Normal,
    /// Uniform with the same mean and standard deviation (half-width √3·σ).
    Uniform,
    /// Log-normal moment-matched to (value, uncertainty). Value must be positive.
    LogNormal,
}

impl Distribution {
    /// Map a standard-normal draw `z` (or a uniform draw `u` for
    /// [`Distribution::Uniform`]) onto this distribution.
    fn transform(self, mean: f64, std: f64, z: f64, u: f64) -> f64 {
        match self {
            Self::Normal => mean + std * z,
            Self::Uniform => {
                let half_width = 3.0_f64.sqrt() * std;
                mean - half_width + 2.0 * half_width * u
            }
            Self::LogNormal => {
                let cv2 = (std / mean).powi(2);
                let sigma_ln = (1.0 + cv2).ln().sqrt();
                let mu_ln = mean.ln() - 0.5 * sigma_ln * sigma_ln;
                (mu_ln + sigma_ln * z).exp()
            }
        }
    }
}

/// A named input to Monte Carlo propagation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UncertaintyVariable {
    /// Name used to look the sample up inside the model function.
    pub name: String,
    /// Central value and one-sigma spread.
    pub value: UncertainValue,
    /// Sampling distribution.
    #[serde(default)]
    pub distribution: Distribution,
}

impl UncertaintyVariable {
    /// Create a normally distributed variable.
    #[must_use]
    pub fn normal(name: impl Into<String>, value: UncertainValue) -> Self {
        Self {
            name: name.into(),
            value,
            distribution: Distribution::Normal,
        }
    }

    /// Create a variable with an explicit distribution.
    #[must_use]
    pub fn with_distribution(
        name: impl Into<String>,
        value: UncertainValue,
        distribution: Distribution,
    ) -> Self {
        Self {
            name: name.into(),
            value,
            distribution,
        }
    }

    /// Draw one sample using a (possibly correlated) standard-normal `z`.
    ///
    /// Uniform variables consume a fresh uniform draw and ignore `z`.
    pub(crate) fn sample_from(&self, z: f64, rng: &mut SampleRng) -> f64 {
        let u = match self.distribution {
            Distribution::Uniform => rng.uniform(),
            Distribution::Normal | Distribution::LogNormal => 0.0,
        };
        self.distribution
            .transform(self.value.value, self.value.uncertainty, z, u)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_uncertainty_is_stored_positive() {
        let v = UncertainValue::new(10.0, -2.0, "m", "test");
        assert!((v.uncertainty - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_nan_uncertainty_propagates() {
        let v = UncertainValue::new(1.0, f64::NAN, "m", "test");
        assert!(v.uncertainty.is_nan());
        assert!(!v.is_finite());
    }

    #[test]
    fn test_relative_uncertainty() {
        let v = UncertainValue::new(-50.0, 5.0, "kg", "test");
        assert!((v.relative_uncertainty() - 0.1).abs() < 1e-12);

        let zero = UncertainValue::exact(0.0, "kg", "test");
        assert!(zero.relative_uncertainty().abs() < f64::EPSILON);

        let zero_spread = UncertainValue::new(0.0, 1.0, "kg", "test");
        assert!(zero_spread.relative_uncertainty().is_infinite());
    }

    #[test]
    fn test_bounds() {
        let v = UncertainValue::new(30.0, 5.0, "km", "Vasilyev 1998");
        let (lo, hi) = v.bounds(2.0);
        assert!((lo - 20.0).abs() < 1e-12);
        assert!((hi - 40.0).abs() < 1e-12);
    }

    #[test]
    fn test_sigma_deviation() {
        let a = UncertainValue::new(10.0, 3.0, "", "a");
        let b = UncertainValue::new(15.0, 4.0, "", "b");
        assert!((a.sigma_deviation(&b) - 1.0).abs() < 1e-12);
        assert!((b.sigma_deviation(&a) - 1.0).abs() < 1e-12);

        let exact = UncertainValue::exact(1.0, "", "x");
        assert!(exact.sigma_deviation(&exact).abs() < f64::EPSILON);
        assert!(exact
            .sigma_deviation(&UncertainValue::exact(2.0, "", "y"))
            .is_infinite());
    }

    #[test]
    fn test_scaled_keeps_source() {
        let v = UncertainValue::new(2.0, 0.5, "km", "model");
        let m = v.scaled(1000.0, "m");
        assert!((m.value - 2000.0).abs() < 1e-9);
        assert!((m.uncertainty - 500.0).abs() < 1e-9);
        assert_eq!(m.unit, "m");
        assert_eq!(m.source, "model");
    }

    #[test]
    fn test_display() {
        let v = UncertainValue::new(12.0, 3.0, "Mt", "Chyba 1993");
        assert_eq!(v.to_string(), "12 ± 3 Mt");
        let unitless = UncertainValue::new(5.0, 0.5, "", "x");
        assert_eq!(unitless.to_string(), "5 ± 0.5");
    }

    #[test]
    fn test_uniform_matches_moments() {
        let var = UncertaintyVariable::with_distribution(
            "u",
            UncertainValue::new(10.0, 2.0, "", "test"),
            Distribution::Uniform,
        );
        let mut rng = SampleRng::new(7);
        let n = 20_000;
        let samples: Vec<f64> = (0..n).map(|_| var.sample_from(0.0, &mut rng)).collect();
        let mean = samples.iter().sum::<f64>() / n as f64;
        let var_s = samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n as f64;
        assert!((mean - 10.0).abs() < 0.1, "mean {mean}");
        assert!((var_s.sqrt() - 2.0).abs() < 0.1, "std {}", var_s.sqrt());
    }

    #[test]
    fn test_lognormal_is_positive_and_moment_matched() {
        let var = UncertaintyVariable::with_distribution(
            "ln",
            UncertainValue::new(100.0, 30.0, "", "test"),
            Distribution::LogNormal,
        );
        let mut rng = SampleRng::new(11);
        let n = 40_000;
        let samples: Vec<f64> = (0..n)
            .map(|_| {
                let z = rng.standard_normal();
                var.sample_from(z, &mut rng)
            })
            .collect();
        assert!(samples.iter().all(|&x| x > 0.0));
        let mean = samples.iter().sum::<f64>() / n as f64;
        assert!((mean - 100.0).abs() < 2.0, "mean {mean}");
    }

    #[test]
    fn test_distribution_serde_names() {
        let json = serde_json::to_string(&Distribution::LogNormal).unwrap_or_default();
        assert_eq!(json, "\"log_normal\"");
    }
}
