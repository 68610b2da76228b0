//! Validation of model predictions against published reference values.
//!
//! Every comparison reduces to a sigma deviation
//! `|predicted − reference| / √(σp² + σr²)` classified as:
//!
//! | Deviation | Status |
//! |-----------|--------|
//! | ≤ 1σ | EXCELLENT |
//! | ≤ 2σ | GOOD |
//! | ≤ 3σ | ACCEPTABLE |
//! | > 3σ or NaN | POOR |
//!
//! [`HistoricalValidator`] runs the impact models against historical events,
//! the orbit propagator against benchmark asteroids, and optionally against
//! an injected async ephemeris source. A case that fails is recorded in the
//! report's failure list and never aborts the run.
//!
//! # Example
//!
//! ```rust
//! use impact_engine::validation::HistoricalValidator;
//!
//! let report = HistoricalValidator::with_builtin().validate_all_events();
//! assert!(report.failures.is_empty());
//! assert!(report.overall_accuracy_percent > 50.0);
//! ```

pub mod compare;
pub mod ephemeris;
pub mod historical;
mod orbital;
pub mod registry;
pub mod report;

pub use compare::{AgreementStatus, BenchmarkComparator, Comparison, ValidationResult};
pub use ephemeris::{EphemerisCase, EphemerisQuery, EphemerisState};
pub use historical::{EventPrediction, HistoricalValidator};
pub use registry::{
    BenchmarkAsteroid, EventInputs, EventParameter, HistoricalEvent, OrbitalParameter, ReferenceRegistry,
    REGISTRY_VERSION,
};
pub use report::{ParameterStatistics, ValidationFailure, ValidationReport};
