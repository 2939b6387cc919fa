//! Classical integer sequence generators with exact period detection.
//!
//! Three methods are supported:
//!
//! - **Mixed congruential**: `x_{n+1} = (a*x_n + b) mod m`, normalized by `m`
//! - **Multiplicative congruential**: `x_{n+1} = (a*x_n) mod m`, normalized by `m`
//! - **Middle squares**: `x_{n+1}` is the middle `digits` digits of `x_n^2`,
//!   normalized by `10^digits`
//!
//! The seed is not emitted: the first value returned is `x_1`. Generation
//! stops at the first repeated raw value, at the iteration ceiling, or when
//! the sequence collapses to the absorbing state 0.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::arith::decimal_len;
use crate::error::{EngineError, Result};
use crate::limits::EngineLimits;
use crate::params::{Parameters, require_integer};

/// Largest middle-squares width whose squares fit in `u128`.
pub const MAX_DIGITS: u32 = 9;

/// Largest `f64` strictly below 1.
const BELOW_ONE: f64 = 1.0 - f64::EPSILON / 2.0;

// ---------------------------------------------------------------------------
// Method
// ---------------------------------------------------------------------------

/// A generation method together with exactly the parameters it needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum GenerationMethod {
    MixedCongruential { x0: u64, a: u64, b: u64, m: u64 },
    MultiplicativeCongruential { x0: u64, a: u64, m: u64 },
    MiddleSquares { x0: u64, digits: u32 },
}

impl GenerationMethod {
    /// Method identifiers accepted by [`from_parameters`](Self::from_parameters).
    pub const NAMES: [&'static str; 3] = [
        "mixed_congruential",
        "multiplicative_congruential",
        "middle_squares",
    ];

    /// Build a method from its identifier and raw parameters.
    ///
    /// Only the shape of the input is checked here (presence, integrality,
    /// sign). Domain checks such as `m > 0` happen in [`generate`], so the
    /// validator can still report on parameters the generator would refuse.
    pub fn from_parameters(method: &str, params: &Parameters) -> Result<Self> {
        match method.trim() {
            "mixed_congruential" => Ok(Self::MixedCongruential {
                x0: require_integer(params, "x0")?,
                a: require_integer(params, "a")?,
                b: require_integer(params, "b")?,
                m: require_integer(params, "m")?,
            }),
            "multiplicative_congruential" => Ok(Self::MultiplicativeCongruential {
                x0: require_integer(params, "x0")?,
                a: require_integer(params, "a")?,
                m: require_integer(params, "m")?,
            }),
            "middle_squares" => {
                let x0 = require_integer(params, "x0")?;
                let digits = require_integer(params, "digits")?;
                let digits = u32::try_from(digits).map_err(|_| {
                    EngineError::parameter(format!(
                        "parameter 'digits' must be at most {MAX_DIGITS}, got {digits}"
                    ))
                })?;
                Ok(Self::MiddleSquares { x0, digits })
            }
            other => Err(EngineError::parameter(format!(
                "unknown generation method '{other}'; expected one of: {}",
                Self::NAMES.join(", ")
            ))),
        }
    }

    /// Method identifier.
    pub fn name(&self) -> &'static str {
        match self {
            Self::MixedCongruential { .. } => Self::NAMES[0],
            Self::MultiplicativeCongruential { .. } => Self::NAMES[1],
            Self::MiddleSquares { .. } => Self::NAMES[2],
        }
    }

    /// Starting value.
    pub fn seed(&self) -> u64 {
        match *self {
            Self::MixedCongruential { x0, .. }
            | Self::MultiplicativeCongruential { x0, .. }
            | Self::MiddleSquares { x0, .. } => x0,
        }
    }

    /// Reject parameters the recurrence cannot run with.
    pub fn check(&self) -> Result<()> {
        match *self {
            Self::MixedCongruential { m, .. } | Self::MultiplicativeCongruential { m, .. } => {
                if m == 0 {
                    return Err(EngineError::parameter(
                        "parameter 'm' must be greater than zero",
                    ));
                }
            }
            Self::MiddleSquares { x0, digits } => {
                if digits == 0 {
                    return Err(EngineError::parameter(
                        "parameter 'digits' must be greater than zero",
                    ));
                }
                if digits > MAX_DIGITS {
                    return Err(EngineError::parameter(format!(
                        "parameter 'digits' must be at most {MAX_DIGITS}, got {digits}"
                    )));
                }
                let seed_len = decimal_len(x0 as u128);
                if seed_len > 2 * digits {
                    return Err(EngineError::parameter(format!(
                        "parameter 'x0' has {seed_len} digits; at most {} allowed for digits = {digits}",
                        2 * digits
                    )));
                }
            }
        }
        Ok(())
    }

    /// One application of the recurrence. Assumes [`check`](Self::check) passed.
    pub fn step(&self, x: u64) -> u64 {
        match *self {
            Self::MixedCongruential { a, b, m, .. } => {
                ((a as u128 * x as u128 + b as u128) % m as u128) as u64
            }
            Self::MultiplicativeCongruential { a, m, .. } => {
                ((a as u128 * x as u128) % m as u128) as u64
            }
            Self::MiddleSquares { digits, .. } => middle_digits(x, digits),
        }
    }

    /// Divisor that maps raw values into `[0, 1)`.
    ///
    /// For `m > 2^53` the division can round up to 1.0, so [`normalize`](Self::normalize)
    /// clamps the result.
    pub fn scale(&self) -> f64 {
        match *self {
            Self::MixedCongruential { m, .. } | Self::MultiplicativeCongruential { m, .. } => {
                m as f64
            }
            Self::MiddleSquares { digits, .. } => 10f64.powi(digits as i32),
        }
    }

    /// Raw value mapped into `[0, 1)`.
    pub fn normalize(&self, x: u64) -> f64 {
        (x as f64 / self.scale()).min(BELOW_ONE)
    }

    /// Whether 0 maps to itself regardless of the other parameters.
    fn absorbs_zero(&self) -> bool {
        matches!(
            self,
            Self::MultiplicativeCongruential { .. } | Self::MiddleSquares { .. }
        )
    }

    /// Maximum number of values emitted before stopping with `max_iterations`.
    pub fn ceiling(&self, limits: &EngineLimits) -> usize {
        let cap = limits.max_iterations.max(1);
        match *self {
            Self::MixedCongruential { m, .. } | Self::MultiplicativeCongruential { m, .. } => {
                usize::try_from(m).unwrap_or(usize::MAX).min(cap)
            }
            Self::MiddleSquares { .. } => cap,
        }
    }
}

impl fmt::Display for GenerationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MixedCongruential { x0, a, b, m } => {
                write!(f, "mixed congruential (x0={x0}, a={a}, b={b}, m={m})")
            }
            Self::MultiplicativeCongruential { x0, a, m } => {
                write!(f, "multiplicative congruential (x0={x0}, a={a}, m={m})")
            }
            Self::MiddleSquares { x0, digits } => {
                write!(f, "middle squares (x0={x0}, digits={digits})")
            }
        }
    }
}

/// Middle `digits` digits of `x^2`, left-padded to at least `2*digits`.
///
/// When the padded width leaves an odd number of surplus digits, one more
/// leading zero is added so the extra digit is dropped on the right.
fn middle_digits(x: u64, digits: u32) -> u64 {
    let square = x as u128 * x as u128;
    let mut width = decimal_len(square).max(2 * digits);
    if (width - digits) % 2 == 1 {
        width += 1;
    }
    let drop = (width - digits) / 2;
    ((square / 10u128.pow(drop)) % 10u128.pow(digits)) as u64
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Why generation stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoppedReason {
    /// A raw value reappeared.
    PeriodDetected,
    /// The iteration ceiling was reached first.
    MaxIterations,
    /// The sequence fell into the absorbing state 0.
    DegenerateZero,
}

impl StoppedReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PeriodDetected => "period_detected",
            Self::MaxIterations => "max_iterations",
            Self::DegenerateZero => "degenerate_zero",
        }
    }
}

impl fmt::Display for StoppedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Summary of the returned (pre-repeat) normalized values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequenceStatistics {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period: Option<usize>,
    pub stopped_reason: StoppedReason,
}

/// Normalized sequence plus its statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationResult {
    pub numbers: Vec<f64>,
    pub statistics: SequenceStatistics,
    /// Raw integer values, index-aligned with `numbers`.
    #[serde(default, skip_serializing)]
    pub raw: Vec<u64>,
}

/// Wire-level generation request: method identifier plus raw parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub method: String,
    #[serde(default)]
    pub parameters: Parameters,
}

impl GenerationRequest {
    pub fn to_method(&self) -> Result<GenerationMethod> {
        GenerationMethod::from_parameters(&self.method, &self.parameters)
    }
}

// ---------------------------------------------------------------------------
// Generation
// ---------------------------------------------------------------------------

/// Run `method` until its sequence repeats, collapses or hits the ceiling.
pub fn generate(method: &GenerationMethod, limits: &EngineLimits) -> Result<GenerationResult> {
    method.check()?;
    let ceiling = method.ceiling(limits);

    let mut raw: Vec<u64> = Vec::new();
    let mut first_seen: HashMap<u64, usize> = HashMap::new();
    let mut x = method.seed();

    let (stopped_reason, period) = loop {
        x = method.step(x);
        if let Some(&first) = first_seen.get(&x) {
            break (StoppedReason::PeriodDetected, Some(raw.len() - first));
        }
        if raw.len() == ceiling {
            break (StoppedReason::MaxIterations, None);
        }
        first_seen.insert(x, raw.len());
        raw.push(x);
        if x == 0 && method.absorbs_zero() {
            break (StoppedReason::DegenerateZero, Some(1));
        }
    };

    let numbers: Vec<f64> = raw.iter().map(|&v| method.normalize(v)).collect();
    let statistics = summarize(&numbers, period, stopped_reason);

    log::debug!(
        "{method}: {} values, stopped by {stopped_reason}, period {:?}",
        statistics.count,
        period
    );

    Ok(GenerationResult {
        numbers,
        statistics,
        raw,
    })
}

/// Parse a wire request and generate.
pub fn generate_from_request(
    request: &GenerationRequest,
    limits: &EngineLimits,
) -> Result<GenerationResult> {
    generate(&request.to_method()?, limits)
}

fn summarize(
    numbers: &[f64],
    period: Option<usize>,
    stopped_reason: StoppedReason,
) -> SequenceStatistics {
    let count = numbers.len();
    let (min, max, mean) = if count == 0 {
        (0.0, 0.0, 0.0)
    } else {
        let min = numbers.iter().copied().fold(f64::INFINITY, f64::min);
        let max = numbers.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let mean = numbers.iter().sum::<f64>() / count as f64;
        (min, max, mean)
    };
    SequenceStatistics {
        count,
        min,
        max,
        mean,
        period,
        stopped_reason,
    }
}
