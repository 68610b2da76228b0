//! Deflection mission evaluation.
//!
//! Small-angle trajectory change, linear probability saturation and a
//! multiplicative penalty model for mission success. Strategies are ranked
//! by `probability_reduction · value_at_risk / cost`.
//!
//! # Example
//!
//! ```rust
//! use impact_engine::deflection::{DeflectionEvaluator, DeflectionStrategy};
//!
//! let evaluator = DeflectionEvaluator::default();
//! let strategy = &DeflectionStrategy::catalog()[0];
//! let window = evaluator.calculate_launch_window(strategy, 10.0, 2_460_000.5);
//! assert!(window.earliest_launch_jd < window.latest_launch_jd);
//! ```

pub mod evaluator;
pub mod strategy;

pub use evaluator::DeflectionEvaluator;
pub use strategy::{DeflectionResult, DeflectionStrategy, LaunchWindow, MissionAssessment, ThreatAssessment};
