//! # randlab-core
//!
//! **Classical pseudorandom generators, judged by the theorems that govern them.**
//!
//! `randlab-core` builds integer sequences from the mixed and multiplicative
//! congruential methods and from von Neumann's middle-squares method,
//! checks congruential parameters against their maximum-period theorems,
//! and draws variates from fixed densities by acceptance-rejection.
//!
//! ## Quick Start
//!
//! ```
//! use randlab_core::{EngineLimits, GenerationMethod, StoppedReason, generate, validate};
//!
//! let method = GenerationMethod::MixedCongruential { x0: 7, a: 5, b: 3, m: 16 };
//!
//! let result = generate(&method, &EngineLimits::default()).unwrap();
//! assert_eq!(result.statistics.stopped_reason, StoppedReason::PeriodDetected);
//! assert_eq!(result.statistics.period, Some(16));
//!
//! // Hull–Dobell: gcd(3, 16) = 1, 2 | 4, 4 | 16 and 4 | 4
//! assert!(validate(&method).all_satisfied);
//! ```
//!
//! ## Architecture
//!
//! Request → parameter parsing → one of three independent components:
//!
//! - [`generator`]: sequence generation with exact cycle detection
//! - [`validator`]: Hull–Dobell and multiplicative period theorems
//! - [`sampler`]: acceptance-rejection with a full trial trace
//!
//! None of them share state. The goodness-of-fit tests live in the
//! `randlab-tests` crate.

pub mod arith;
pub mod error;
pub mod generator;
pub mod limits;
pub mod params;
pub mod sampler;
pub mod validator;

pub use error::{EngineError, Result};
pub use generator::{
    GenerationMethod, GenerationRequest, GenerationResult, SequenceStatistics, StoppedReason,
    generate, generate_from_request,
};
pub use limits::EngineLimits;
pub use params::Parameters;
pub use sampler::{
    ChartData, Distribution, RandomVariableRequest, RandomVariableResult, acceptance_rejection,
};
pub use validator::{Condition, ValidationResult, validate, validate_request};

/// Library version (from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
