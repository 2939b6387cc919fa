//! Goodness-of-fit tests for uniform `[0, 1]` samples.
//!
//! Two classical tests are provided: Pearson's chi-square over equal-width
//! intervals and the one-sample Kolmogorov–Smirnov test. Each returns a
//! [`StatisticalTestResult`] with the statistic, the critical value at the
//! requested significance level, a pass/fail verdict and a p-value.

use serde::{Deserialize, Serialize};
use statrs::distribution::{ChiSquared, ContinuousCDF};

use randlab_core::params::{optional_integer, optional_number};
use randlab_core::{EngineError, EngineLimits, Parameters, Result};

// ═══════════════════════════════════════════════════════════════════════════════
// Core types
// ═══════════════════════════════════════════════════════════════════════════════

/// Significance levels with tabulated critical values.
pub const SUPPORTED_ALPHAS: [f64; 3] = [0.01, 0.05, 0.10];

/// Significance level used when the request does not name one.
pub const DEFAULT_ALPHA: f64 = 0.05;

/// Sample sizes up to this use the exact KS table instead of `c/√N`.
pub const KS_EXACT_MAX_N: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestType {
    ChiSquare,
    KolmogorovSmirnov,
}

impl TestType {
    pub fn parse(name: &str) -> Result<Self> {
        match name.trim() {
            "chi_square" => Ok(Self::ChiSquare),
            "kolmogorov_smirnov" => Ok(Self::KolmogorovSmirnov),
            other => Err(invalid(format!(
                "unknown test_type '{other}'; expected chi_square or kolmogorov_smirnov"
            ))),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::ChiSquare => "chi_square",
            Self::KolmogorovSmirnov => "kolmogorov_smirnov",
        }
    }
}

/// Wire-level test request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatisticalTestRequest {
    pub numbers: Vec<f64>,
    pub test_type: String,
    #[serde(default)]
    pub parameters: Parameters,
}

/// Result of a single goodness-of-fit test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatisticalTestResult {
    pub test_name: String,
    pub calculated_value: f64,
    pub critical_value: f64,
    pub passes: bool,
    pub details: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub degrees_of_freedom: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub p_value: Option<f64>,
}

// ═══════════════════════════════════════════════════════════════════════════════
// Helpers
// ═══════════════════════════════════════════════════════════════════════════════

fn invalid(msg: impl Into<String>) -> EngineError {
    EngineError::InvalidTestInput(msg.into())
}

/// Parameter parsing failures belong to the test-input taxonomy here.
fn as_test_input(err: EngineError) -> EngineError {
    match err {
        EngineError::InvalidParameter(msg) => EngineError::InvalidTestInput(msg),
        other => other,
    }
}

/// Reject samples the tests cannot be computed on.
fn check_sample(data: &[f64]) -> Result<()> {
    if data.len() < 2 {
        return Err(invalid(format!(
            "need at least 2 numbers, got {}",
            data.len()
        )));
    }
    if let Some((i, x)) = data.iter().enumerate().find(|(_, x)| !x.is_finite()) {
        return Err(invalid(format!("numbers[{i}] is not finite ({x})")));
    }
    if let Some((i, x)) = data
        .iter()
        .enumerate()
        .find(|(_, x)| !(0.0..=1.0).contains(*x))
    {
        return Err(invalid(format!("numbers[{i}] = {x} is outside [0, 1]")));
    }
    Ok(())
}

/// Snap `alpha` to one of [`SUPPORTED_ALPHAS`].
pub fn parse_alpha(alpha: Option<f64>) -> Result<f64> {
    let Some(alpha) = alpha else {
        return Ok(DEFAULT_ALPHA);
    };
    SUPPORTED_ALPHAS
        .iter()
        .copied()
        .find(|a| (a - alpha).abs() < 1e-9)
        .ok_or_else(|| {
            invalid(format!(
                "unsupported significance level {alpha}; expected 0.01, 0.05 or 0.10"
            ))
        })
}

// ═══════════════════════════════════════════════════════════════════════════════
// Chi-square
// ═══════════════════════════════════════════════════════════════════════════════

/// Observed counts over `intervals` equal bins on `[0, 1]`.
///
/// Bins are half-open `[i/K, (i+1)/K)` except the last, which also holds 1.0.
pub fn interval_frequencies(data: &[f64], intervals: usize) -> Vec<usize> {
    let mut observed = vec![0usize; intervals];
    for &x in data {
        let bin = ((x * intervals as f64) as usize).min(intervals - 1);
        observed[bin] += 1;
    }
    observed
}

/// Pearson chi-square test of uniformity.
pub fn chi_square(
    data: &[f64],
    intervals: usize,
    alpha: f64,
    limits: &EngineLimits,
) -> Result<StatisticalTestResult> {
    check_sample(data)?;
    if intervals < 2 {
        return Err(invalid(format!("intervals must be at least 2, got {intervals}")));
    }
    if intervals > limits.max_intervals {
        return Err(invalid(format!(
            "intervals must be at most {}, got {intervals}",
            limits.max_intervals
        )));
    }
    let alpha = parse_alpha(Some(alpha))?;

    let n = data.len();
    let observed = interval_frequencies(data, intervals);
    let expected = n as f64 / intervals as f64;
    let chi2: f64 = observed
        .iter()
        .map(|&o| {
            let diff = o as f64 - expected;
            diff * diff / expected
        })
        .sum();

    let df = intervals - 1;
    let dist = ChiSquared::new(df as f64).map_err(|e| invalid(e.to_string()))?;
    let critical = dist.inverse_cdf(1.0 - alpha);
    let p = dist.sf(chi2);
    let passes = chi2 <= critical;

    let mut details = format!(
        "N={n}, K={intervals}, E={expected:.2} per interval, observed={observed:?}; \
         chi2={chi2:.4} {} critical {critical:.4} at alpha={alpha}",
        if passes { "<=" } else { ">" }
    );
    if expected < 5.0 {
        details.push_str(&format!(
            "; warning: expected frequency {expected:.2} < 5, the chi-square approximation is unreliable"
        ));
    }
    log::debug!("chi-square: N={n} K={intervals} chi2={chi2:.4} p={p:.4}");

    Ok(StatisticalTestResult {
        test_name: "Chi-Square".to_string(),
        calculated_value: chi2,
        critical_value: critical,
        passes,
        details,
        degrees_of_freedom: Some(df),
        p_value: Some(p),
    })
}

// ═══════════════════════════════════════════════════════════════════════════════
// Kolmogorov–Smirnov
// ═══════════════════════════════════════════════════════════════════════════════

/// Exact two-sided critical values `D(n, alpha)` for n = 1..=20,
/// columns alpha = 0.01, 0.05, 0.10.
const KS_TABLE: [[f64; 3]; KS_EXACT_MAX_N] = [
    [0.995, 0.975, 0.950],
    [0.929, 0.842, 0.776],
    [0.828, 0.708, 0.642],
    [0.733, 0.624, 0.564],
    [0.669, 0.565, 0.510],
    [0.618, 0.521, 0.470],
    [0.577, 0.486, 0.438],
    [0.543, 0.457, 0.411],
    [0.514, 0.432, 0.388],
    [0.490, 0.410, 0.368],
    [0.468, 0.391, 0.352],
    [0.450, 0.375, 0.338],
    [0.433, 0.361, 0.325],
    [0.418, 0.349, 0.314],
    [0.404, 0.338, 0.304],
    [0.392, 0.328, 0.295],
    [0.381, 0.318, 0.286],
    [0.371, 0.309, 0.278],
    [0.363, 0.301, 0.272],
    [0.356, 0.294, 0.264],
];

fn alpha_column(alpha: f64) -> usize {
    SUPPORTED_ALPHAS
        .iter()
        .position(|a| (a - alpha).abs() < 1e-9)
        .unwrap_or(1)
}

/// Critical value of `D` for a sample of `n` at a supported `alpha`.
pub fn ks_critical_value(n: usize, alpha: f64) -> f64 {
    let column = alpha_column(alpha);
    if (1..=KS_EXACT_MAX_N).contains(&n) {
        return KS_TABLE[n - 1][column];
    }
    let c = [1.63, 1.36, 1.22][column];
    c / (n as f64).sqrt()
}

/// Asymptotic Kolmogorov p-value with Stephens' small-sample correction.
fn kolmogorov_p_value(d: f64, n: usize) -> f64 {
    let sqrt_n = (n as f64).sqrt();
    let lambda = (sqrt_n + 0.12 + 0.11 / sqrt_n) * d;
    // The alternating series does not converge for tiny lambda; Q(0.2) rounds to 1.
    if lambda < 0.2 {
        return 1.0;
    }
    let mut p = 0.0;
    for k in 1..=100i32 {
        let sign = if k % 2 == 0 { -1.0 } else { 1.0 };
        p += sign * (-2.0 * (k as f64 * lambda).powi(2)).exp();
    }
    (2.0 * p).clamp(0.0, 1.0)
}

/// One-sample KS test against `U[0, 1]`.
pub fn kolmogorov_smirnov(data: &[f64], alpha: f64) -> Result<StatisticalTestResult> {
    check_sample(data)?;
    let alpha = parse_alpha(Some(alpha))?;

    let mut sorted = data.to_vec();
    sorted.sort_by(f64::total_cmp);

    let n = sorted.len();
    let nf = n as f64;
    let mut d_plus = 0.0f64;
    let mut d_minus = 0.0f64;
    for (i, &x) in sorted.iter().enumerate() {
        d_plus = d_plus.max((i + 1) as f64 / nf - x);
        d_minus = d_minus.max(x - i as f64 / nf);
    }
    let d = d_plus.max(d_minus);

    let critical = ks_critical_value(n, alpha);
    let p = kolmogorov_p_value(d, n);
    let passes = d <= critical;
    let source = if n <= KS_EXACT_MAX_N {
        "exact table"
    } else {
        "c/sqrt(N)"
    };

    let details = format!(
        "N={n}, D+={d_plus:.6}, D-={d_minus:.6}, D={d:.6} {} critical {critical:.4} \
         ({source}) at alpha={alpha}",
        if passes { "<=" } else { ">" }
    );
    log::debug!("kolmogorov-smirnov: N={n} D={d:.6} p={p:.4}");

    Ok(StatisticalTestResult {
        test_name: "Kolmogorov-Smirnov".to_string(),
        calculated_value: d,
        critical_value: critical,
        passes,
        details,
        degrees_of_freedom: None,
        p_value: Some(p),
    })
}

// ═══════════════════════════════════════════════════════════════════════════════
// Dispatch
// ═══════════════════════════════════════════════════════════════════════════════

/// Run the test a wire request names.
///
/// Both tests read the significance level from `alpha` or
/// `significance_level`. Chi-square additionally requires `intervals`.
pub fn run_test(
    request: &StatisticalTestRequest,
    limits: &EngineLimits,
) -> Result<StatisticalTestResult> {
    let test_type = TestType::parse(&request.test_type)?;
    let params = &request.parameters;
    let names: &[&str] = match test_type {
        TestType::ChiSquare => &["alpha", "significance_level"],
        TestType::KolmogorovSmirnov => &["significance_level", "alpha"],
    };
    let alpha = parse_alpha(optional_number(params, names).map_err(as_test_input)?)?;
    log::debug!("{}: {} values at alpha={alpha}", test_type.name(), request.numbers.len());

    match test_type {
        TestType::ChiSquare => {
            let intervals = optional_integer(params, &["intervals"])
                .map_err(as_test_input)?
                .ok_or_else(|| invalid("chi_square requires parameter 'intervals'"))?;
            let intervals = usize::try_from(intervals).unwrap_or(usize::MAX);
            chi_square(&request.numbers, intervals, alpha, limits)
        }
        TestType::KolmogorovSmirnov => kolmogorov_smirnov(&request.numbers, alpha),
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════════
