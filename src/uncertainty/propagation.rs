//! Uncertainty propagation combinators.
//!
//! - Linear: `y = Σ cᵢ·xᵢ`, `σ_y = √Σ(cᵢ·σᵢ)²`
//! - Multiplicative: `y = Π xᵢ^eᵢ`, `σ_y/|y| = √Σ(eᵢ·σᵢ/xᵢ)²`
//! - Nonlinear: Monte Carlo over sampled inputs, optionally correlated
//!
//! The first two are first-order (uncorrelated) error propagation and are
//! exact for the symmetric combination law: `a + b` and `a − b` carry the
//! same uncertainty.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::rng::SampleRng;
use super::value::{UncertainValue, UncertaintyVariable};
use crate::config::MonteCarloConfig;
use crate::error::{ImpactError, ImpactResult};

/// Smallest Monte Carlo run the propagator accepts.
pub const MIN_MONTE_CARLO_SAMPLES: usize = 1000;

/// One term of a linear combination.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearTerm {
    /// Term value.
    pub value: f64,
    /// One-sigma uncertainty of the value.
    pub uncertainty: f64,
    /// Coefficient applied to the value.
    pub coefficient: f64,
}

impl LinearTerm {
    /// Create a new term.
    #[must_use]
    pub const fn new(value: f64, uncertainty: f64, coefficient: f64) -> Self {
        Self {
            value,
            uncertainty,
            coefficient,
        }
    }

    /// Build a term from an uncertain value.
    #[must_use]
    pub fn of(value: &UncertainValue, coefficient: f64) -> Self {
        Self::new(value.value, value.uncertainty, coefficient)
    }
}

/// One factor of a product of powers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PowerFactor {
    /// Factor value.
    pub value: f64,
    /// One-sigma uncertainty of the value.
    pub uncertainty: f64,
    /// Exponent (−1 for division).
    pub exponent: f64,
}

impl PowerFactor {
    /// Create a new factor.
    #[must_use]
    pub const fn new(value: f64, uncertainty: f64, exponent: f64) -> Self {
        Self {
            value,
            uncertainty,
            exponent,
        }
    }

    /// Build a factor from an uncertain value.
    #[must_use]
    pub fn of(value: &UncertainValue, exponent: f64) -> Self {
        Self::new(value.value, value.uncertainty, exponent)
    }
}

/// Pairwise correlations between named variables.
///
/// Unlisted pairs are uncorrelated. Sampling uses the exact Cholesky factor
/// of the assembled matrix, so the pairs must form a positive-definite
/// correlation matrix.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    pairs: Vec<(String, String, f64)>,
}

impl CorrelationMatrix {
    /// Create an empty (identity) correlation matrix.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a correlation coefficient between two variables.
    #[must_use]
    pub fn with(mut self, a: impl Into<String>, b: impl Into<String>, rho: f64) -> Self {
        self.pairs.push((a.into(), b.into(), rho));
        self
    }

    /// Check if no correlations were declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Assemble the full matrix for `variables` and return its lower
    /// Cholesky factor (row-major).
    fn cholesky(&self, variables: &[UncertaintyVariable]) -> ImpactResult<Vec<Vec<f64>>> {
        let n = variables.len();
        let index = |name: &str| {
            variables
                .iter()
                .position(|v| v.name == name)
                .ok_or_else(|| ImpactError::Correlation(format!("unknown variable '{name}'")))
        };

        let mut matrix = vec![vec![0.0; n]; n];
        for (i, row) in matrix.iter_mut().enumerate() {
            row[i] = 1.0;
        }
        for (a, b, rho) in &self.pairs {
            if !(-1.0..=1.0).contains(rho) {
                return Err(ImpactError::Correlation(format!(
                    "coefficient {rho} between '{a}' and '{b}' is outside [-1, 1]"
                )));
            }
            let (i, j) = (index(a)?, index(b)?);
            if i == j {
                return Err(ImpactError::Correlation(format!(
                    "variable '{a}' correlated with itself"
                )));
            }
            matrix[i][j] = *rho;
            matrix[j][i] = *rho;
        }

        let mut lower = vec![vec![0.0; n]; n];
        for i in 0..n {
            for j in 0..=i {
                let dot: f64 = (0..j).map(|k| lower[i][k] * lower[j][k]).sum();
                if i == j {
                    let d = matrix[i][i] - dot;
                    if d <= 1e-12 {
                        return Err(ImpactError::Correlation(
                            "correlation matrix is not positive definite".to_string(),
                        ));
                    }
                    lower[i][j] = d.sqrt();
                } else {
                    lower[i][j] = (matrix[i][j] - dot) / lower[j][j];
                }
            }
        }
        Ok(lower)
    }
}

/// One joint draw of all variables, handed to the model function.
#[derive(Debug)]
pub struct SampleSet<'a> {
    variables: &'a [UncertaintyVariable],
    values: Vec<f64>,
}

impl SampleSet<'_> {
    /// Look up the sampled value of a variable.
    ///
    /// # Errors
    ///
    /// Returns [`ImpactError::MissingVariable`] for an undeclared name.
    pub fn get(&self, name: &str) -> ImpactResult<f64> {
        self.variables
            .iter()
            .position(|v| v.name == name)
            .map(|i| self.values[i])
            .ok_or_else(|| ImpactError::MissingVariable {
                name: name.to_string(),
            })
    }

    /// All sampled values in declaration order.
    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }
}

/// Percentiles of the surviving Monte Carlo samples.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Percentiles {
    /// 5th percentile.
    pub p5: f64,
    /// 16th percentile (−1σ for a normal output).
    pub p16: f64,
    /// Median.
    pub p50: f64,
    /// 84th percentile (+1σ for a normal output).
    pub p84: f64,
    /// 95th percentile.
    pub p95: f64,
}

impl Percentiles {
    fn from_sorted(sorted: &[f64]) -> Self {
        Self {
            p5: percentile(sorted, 0.05),
            p16: percentile(sorted, 0.16),
            p50: percentile(sorted, 0.50),
            p84: percentile(sorted, 0.84),
            p95: percentile(sorted, 0.95),
        }
    }
}

/// Linear-interpolated percentile of sorted data.
fn percentile(sorted: &[f64], p: f64) -> f64 {
    match sorted.len() {
        0 => f64::NAN,
        1 => sorted[0],
        n => {
            let rank = p * (n - 1) as f64;
            let lo = rank.floor() as usize;
            let hi = (lo + 1).min(n - 1);
            let frac = rank - lo as f64;
            sorted[lo] + frac * (sorted[hi] - sorted[lo])
        }
    }
}

/// Result of a Monte Carlo propagation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonteCarloPropagation {
    /// Mean ± sample standard deviation.
    pub value: UncertainValue,
    /// Mean of surviving samples.
    pub mean: f64,
    /// Sample standard deviation of surviving samples.
    pub std_dev: f64,
    /// Output percentiles.
    pub percentiles: Percentiles,
    /// Samples for which the model returned a finite value.
    pub valid_samples: usize,
    /// Samples requested.
    pub requested_samples: usize,
    /// True when at least the convergence fraction of samples survived.
    pub convergence_achieved: bool,
}

impl MonteCarloPropagation {
    /// Fraction of requested samples that survived.
    #[must_use]
    pub fn survival_rate(&self) -> f64 {
        if self.requested_samples == 0 {
            0.0
        } else {
            self.valid_samples as f64 / self.requested_samples as f64
        }
    }
}

/// Uncertainty propagation engine.
///
/// Stateless apart from its configuration: every Monte Carlo call seeds a
/// fresh generator, so calls may run concurrently.
#[derive(Debug, Clone)]
pub struct UncertaintyPropagator {
    config: MonteCarloConfig,
}

impl Default for UncertaintyPropagator {
    fn default() -> Self {
        Self {
            config: MonteCarloConfig::default(),
        }
    }
}

impl UncertaintyPropagator {
    /// Create a propagator.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if fewer than 1000 samples are requested.
    pub fn new(config: MonteCarloConfig) -> ImpactResult<Self> {
        if config.samples < MIN_MONTE_CARLO_SAMPLES {
            return Err(ImpactError::config(format!(
                "Monte Carlo requires at least {MIN_MONTE_CARLO_SAMPLES} samples, got {}",
                config.samples
            )));
        }
        Ok(Self { config })
    }

    /// Get the configuration.
    #[must_use]
    pub const fn config(&self) -> &MonteCarloConfig {
        &self.config
    }

    /// Propagate through a linear combination `Σ cᵢ·xᵢ`.
    #[must_use]
    pub fn propagate_linear(terms: &[LinearTerm]) -> UncertainValue {
        let value: f64 = terms.iter().map(|t| t.coefficient * t.value).sum();
        let variance: f64 = terms
            .iter()
            .map(|t| (t.coefficient * t.uncertainty).powi(2))
            .sum();
        UncertainValue::new(value, variance.sqrt(), "", "linear propagation")
    }

    /// Propagate through a product of powers `Π xᵢ^eᵢ`.
    #[must_use]
    pub fn propagate_multiplicative(factors: &[PowerFactor]) -> UncertainValue {
        let value: f64 = factors.iter().map(|f| f.value.powf(f.exponent)).product();
        let relative_variance: f64 = factors
            .iter()
            .map(|f| (f.exponent * f.uncertainty / f.value).powi(2))
            .sum();
        let uncertainty = value.abs() * relative_variance.sqrt();
        UncertainValue::new(value, uncertainty, "", "multiplicative propagation")
    }

    /// Propagate through an arbitrary function by Monte Carlo sampling of
    /// independent inputs, seeded from the configuration.
    ///
    /// # Errors
    ///
    /// - [`ImpactError::InsufficientSamples`] when fewer than the minimum
    ///   valid fraction of samples produced a finite result
    /// - [`ImpactError::MissingVariable`] when `f` asks for an undeclared name
    ///
    /// # Example
    ///
    /// ```rust
    /// use impact_engine::uncertainty::{UncertainValue, UncertaintyPropagator, UncertaintyVariable};
    ///
    /// let propagator = UncertaintyPropagator::default();
    /// let vars = [
    ///     UncertaintyVariable::normal("x", UncertainValue::new(10.0, 1.0, "", "test")),
    ///     UncertaintyVariable::normal("y", UncertainValue::new(5.0, 0.5, "", "test")),
    /// ];
    /// let out = propagator
    ///     .propagate_nonlinear(&vars, |s| Ok(s.get("x")? + s.get("y")?))
    ///     .unwrap();
    /// assert!((out.mean - 15.0).abs() < 1.0);
    /// assert!(out.convergence_achieved);
    /// ```
    pub fn propagate_nonlinear<F>(
        &self,
        variables: &[UncertaintyVariable],
        f: F,
    ) -> ImpactResult<MonteCarloPropagation>
    where
        F: Fn(&SampleSet<'_>) -> ImpactResult<f64>,
    {
        let mut rng = SampleRng::new(self.config.seed);
        self.propagate_nonlinear_with_rng(variables, None, f, &mut rng)
    }

    /// Monte Carlo propagation with correlated inputs.
    ///
    /// # Errors
    ///
    /// As [`Self::propagate_nonlinear`], plus [`ImpactError::Correlation`]
    /// when the matrix is inconsistent.
    pub fn propagate_correlated<F>(
        &self,
        variables: &[UncertaintyVariable],
        correlations: &CorrelationMatrix,
        f: F,
    ) -> ImpactResult<MonteCarloPropagation>
    where
        F: Fn(&SampleSet<'_>) -> ImpactResult<f64>,
    {
        let mut rng = SampleRng::new(self.config.seed);
        self.propagate_nonlinear_with_rng(variables, Some(correlations), f, &mut rng)
    }

    /// Monte Carlo propagation drawing from a caller-owned generator.
    ///
    /// Each variable samples from its own stream taken from `rng`, so
    /// successive calls with the same generator draw fresh samples.
    ///
    /// # Errors
    ///
    /// As [`Self::propagate_correlated`].
    pub fn propagate_nonlinear_with_rng<F>(
        &self,
        variables: &[UncertaintyVariable],
        correlations: Option<&CorrelationMatrix>,
        f: F,
        rng: &mut SampleRng,
    ) -> ImpactResult<MonteCarloPropagation>
    where
        F: Fn(&SampleSet<'_>) -> ImpactResult<f64>,
    {
        for (i, var) in variables.iter().enumerate() {
            if variables[..i].iter().any(|v| v.name == var.name) {
                return Err(ImpactError::config(format!(
                    "duplicate Monte Carlo variable '{}'",
                    var.name
                )));
            }
        }

        let lower = match correlations {
            Some(c) if !c.is_empty() => Some(c.cholesky(variables)?),
            _ => None,
        };

        let requested = self.config.samples;
        let n = variables.len();
        let mut z = vec![0.0; n];
        let mut set = SampleSet {
            variables,
            values: vec![0.0; n],
        };
        let mut outputs = Vec::with_capacity(requested);

        let mut streams = rng.variable_streams(n);

        for _ in 0..requested {
            for (zi, stream) in z.iter_mut().zip(&mut streams) {
                *zi = stream.standard_normal();
            }
            for (j, (var, stream)) in variables.iter().zip(&mut streams).enumerate() {
                let zj = lower
                    .as_ref()
                    .map_or(z[j], |l| (0..=j).map(|k| l[j][k] * z[k]).sum());
                set.values[j] = var.sample_from(zj, stream);
            }

            match f(&set) {
                Ok(y) if y.is_finite() => outputs.push(y),
                Ok(_) => {}
                Err(e @ ImpactError::MissingVariable { .. }) => return Err(e),
                Err(_) => {}
            }
        }

        let valid = outputs.len();
        debug!(valid, requested, "Monte Carlo propagation finished");

        if (valid as f64) < self.config.min_valid_fraction * requested as f64 || valid == 0 {
            return Err(ImpactError::InsufficientSamples { valid, requested });
        }

        let mean = outputs.iter().sum::<f64>() / valid as f64;
        let std_dev = if valid > 1 {
            (outputs.iter().map(|y| (y - mean).powi(2)).sum::<f64>() / (valid - 1) as f64).sqrt()
        } else {
            0.0
        };

        outputs.sort_by(f64::total_cmp);
        let percentiles = Percentiles::from_sorted(&outputs);

        Ok(MonteCarloPropagation {
            value: UncertainValue::new(
                mean,
                std_dev,
                "",
                format!("Monte Carlo ({valid}/{requested} samples)"),
            ),
            mean,
            std_dev,
            percentiles,
            valid_samples: valid,
            requested_samples: requested,
            convergence_achieved: valid as f64 >= self.config.convergence_fraction * requested as f64,
        })
    }
}
