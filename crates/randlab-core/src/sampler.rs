//! Acceptance-rejection sampling from a closed set of densities.
//!
//! Each trial draws `r1, r2 ~ U[0,1)`, maps `r1` to a candidate
//! `x = a + (b - a)·r1` on the density's domain and accepts it iff
//! `r2 <= f(x)/M`, where `M` is the maximum of `f` on `[a, b]`. Every trial
//! is recorded so callers can plot accepted and rejected points.
//!
//! The random source is always passed in; nothing here holds generator
//! state between calls.

use std::fmt;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::limits::EngineLimits;

/// Number of points used to draw the density curve.
pub const CURVE_POINTS: usize = 101;

// ---------------------------------------------------------------------------
// Densities
// ---------------------------------------------------------------------------

/// Registered target densities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Distribution {
    /// `f(x) = 2x` on `[0, 1]`.
    Linear,
    /// `f(x) = -(x-2)^2 + 4` on `[0, 4]`.
    #[serde(alias = "cuadratic")]
    Quadratic,
    /// `f(x) = 1/x` on `[0.5, 3]`.
    Hyperbola,
}

impl Distribution {
    pub const ALL: [Distribution; 3] = [Self::Linear, Self::Quadratic, Self::Hyperbola];

    /// Parse a distribution identifier. `cuadratic` is accepted for `quadratic`.
    pub fn parse(name: &str) -> Result<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "linear" => Ok(Self::Linear),
            "quadratic" | "cuadratic" => Ok(Self::Quadratic),
            "hyperbola" => Ok(Self::Hyperbola),
            other => Err(EngineError::parameter(format!(
                "unknown distribution '{other}'; expected one of: linear, quadratic, hyperbola"
            ))),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::Quadratic => "quadratic",
            Self::Hyperbola => "hyperbola",
        }
    }

    /// Human-readable formula.
    pub fn function_name(&self) -> &'static str {
        match self {
            Self::Linear => "f(x) = 2x",
            Self::Quadratic => "f(x) = -(x-2)^2 + 4",
            Self::Hyperbola => "f(x) = 1/x",
        }
    }

    /// Closed domain `[a, b]`.
    pub fn domain(&self) -> (f64, f64) {
        match self {
            Self::Linear => (0.0, 1.0),
            Self::Quadratic => (0.0, 4.0),
            Self::Hyperbola => (0.5, 3.0),
        }
    }

    /// Envelope height `M = max f` over the domain.
    pub fn envelope(&self) -> f64 {
        match self {
            Self::Linear => 2.0,
            Self::Quadratic => 4.0,
            Self::Hyperbola => 2.0,
        }
    }

    /// `f(x)`. Only meaningful on [`domain`](Self::domain).
    pub fn density(&self, x: f64) -> f64 {
        match self {
            Self::Linear => 2.0 * x,
            Self::Quadratic => -(x - 2.0).powi(2) + 4.0,
            Self::Hyperbola => 1.0 / x,
        }
    }
}

impl fmt::Display for Distribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Per-trial trace plus everything needed to draw the envelope.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    /// Candidate `x` of each trial.
    pub x: Vec<f64>,
    /// `f(x)/M` of each trial.
    pub y: Vec<f64>,
    pub r2: Vec<f64>,
    pub accepted: Vec<bool>,
    /// Candidate `x` again, for the density-scale plot.
    pub x_d: Vec<f64>,
    /// `r2 * M`: the trial point lifted to density scale.
    pub y_d: Vec<f64>,
    pub points_x_d: Vec<f64>,
    pub points_fx_d: Vec<f64>,
    pub function_name: String,
    pub a: f64,
    pub b: f64,
    #[serde(rename = "M")]
    pub m: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomVariableResult {
    pub r1: Vec<f64>,
    pub r2: Vec<f64>,
    pub generated_values: Vec<f64>,
    pub acceptance_rate: f64,
    pub chart_data: ChartData,
}

/// Wire-level sampling request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomVariableRequest {
    pub count: i64,
    #[serde(alias = "fx")]
    pub distribution: String,
    /// Only `acceptance_rejection` is supported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    /// Fixed seed for reproducible draws; OS entropy otherwise.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl RandomVariableRequest {
    /// Validate the request and sample with a fresh per-request generator.
    pub fn run(&self, limits: &EngineLimits) -> Result<RandomVariableResult> {
        if let Some(method) = self.method.as_deref() {
            if method != "acceptance_rejection" {
                return Err(EngineError::parameter(format!(
                    "unsupported sampling method '{method}'; only acceptance_rejection is available"
                )));
            }
        }
        let distribution = Distribution::parse(&self.distribution)?;
        let count = checked_count(self.count, limits)?;
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        acceptance_rejection(distribution, count, &mut rng, limits)
    }
}

fn checked_count(count: i64, limits: &EngineLimits) -> Result<usize> {
    let max = limits.max_variates;
    match usize::try_from(count) {
        Ok(n) if (1..=max).contains(&n) => Ok(n),
        _ => Err(EngineError::parameter(format!(
            "count must be between 1 and {max}, got {count}"
        ))),
    }
}

// ---------------------------------------------------------------------------
// Sampling
// ---------------------------------------------------------------------------

/// Draw `count` variates from `distribution` using `rng`.
///
/// Fails with [`EngineError::IterationLimitExceeded`] if the trial cap
/// `count * limits.trial_multiplier` is reached first.
pub fn acceptance_rejection<R: Rng>(
    distribution: Distribution,
    count: usize,
    rng: &mut R,
    limits: &EngineLimits,
) -> Result<RandomVariableResult> {
    if count == 0 || count > limits.max_variates {
        return Err(EngineError::parameter(format!(
            "count must be between 1 and {}, got {count}",
            limits.max_variates
        )));
    }

    let (a, b) = distribution.domain();
    let m = distribution.envelope();
    let max_trials = count.saturating_mul(limits.trial_multiplier.max(1));

    let mut r1s = Vec::with_capacity(count * 2);
    let mut r2s = Vec::with_capacity(count * 2);
    let mut generated = Vec::with_capacity(count);
    let mut chart = ChartData {
        function_name: distribution.function_name().to_string(),
        a,
        b,
        m,
        ..ChartData::default()
    };

    while generated.len() < count {
        if r1s.len() == max_trials {
            log::warn!(
                "{distribution}: trial cap {max_trials} reached with {}/{count} accepted",
                generated.len()
            );
            return Err(EngineError::IterationLimitExceeded {
                requested: count,
                accepted: generated.len(),
                trials: max_trials,
            });
        }

        let r1: f64 = rng.random();
        let r2: f64 = rng.random();
        let x = a + (b - a) * r1;
        let ratio = distribution.density(x) / m;
        let accepted = r2 <= ratio;

        r1s.push(r1);
        r2s.push(r2);
        chart.x.push(x);
        chart.y.push(ratio);
        chart.r2.push(r2);
        chart.accepted.push(accepted);
        chart.x_d.push(x);
        chart.y_d.push(r2 * m);
        if accepted {
            generated.push(x);
        }
    }

    let step = (b - a) / (CURVE_POINTS - 1) as f64;
    for i in 0..CURVE_POINTS {
        let x = a + step * i as f64;
        chart.points_x_d.push(x);
        chart.points_fx_d.push(distribution.density(x));
    }

    let acceptance_rate = count as f64 / r1s.len() as f64;
    log::debug!(
        "{distribution}: {count} values in {} trials (acceptance {acceptance_rate:.3})",
        r1s.len()
    );

    Ok(RandomVariableResult {
        r1: r1s,
        r2: r2s,
        generated_values: generated,
        acceptance_rate,
        chart_data: chart,
    })
}
