//! Values with uncertainty and their propagation algebra.
//!
//! - [`UncertainValue`]: scalar + one-sigma uncertainty + unit + provenance
//! - [`UncertaintyPropagator`]: linear, multiplicative and Monte Carlo combinators
//! - [`SampleRng`]: seeded PCG source with Box-Muller normal draws
//!
//! # Example
//!
//! ```rust
//! use impact_engine::uncertainty::{PowerFactor, UncertaintyPropagator};
//!
//! let product = UncertaintyPropagator::propagate_multiplicative(&[
//!     PowerFactor::new(10.0, 1.0, 1.0),
//!     PowerFactor::new(5.0, 0.5, 1.0),
//! ]);
//! assert!((product.value - 50.0).abs() < 1e-12);
//! assert!((product.uncertainty - 7.07).abs() < 0.1);
//! ```

pub mod propagation;
pub mod rng;
pub mod value;

pub use propagation::{
    CorrelationMatrix, LinearTerm, MonteCarloPropagation, Percentiles, PowerFactor, SampleSet,
    UncertaintyPropagator,
};
pub use rng::SampleRng;
pub use value::{Distribution, UncertainValue, UncertaintyVariable};
