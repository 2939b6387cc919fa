//! Period theorems for congruential generators.
//!
//! Mixed generators are checked against the Hull–Dobell conditions for a
//! full period `m`. Multiplicative generators use one of two maximum-period
//! theorems, chosen by the shape of the modulus:
//!
//! - `m = 2^k` with `k >= 3`: `a ≡ 3 or 5 (mod 8)` and `x0` odd give the
//!   maximum period `m/4`.
//! - otherwise: `m` prime, `a` a primitive root modulo `m` and `x0 ≢ 0`
//!   give the maximum period `m - 1`.
//!
//! Middle squares has no applicable theorem and yields an inapplicable
//! result. Validation never runs the generator.

use serde::{Deserialize, Serialize};

use crate::arith::{gcd, is_prime, mod_pow, prime_factors, smallest_prime_factor};
use crate::error::Result;
use crate::generator::{GenerationMethod, GenerationRequest};

const PASS: &str = "✓";
const FAIL: &str = "✗";

/// One named boolean check with its concrete arithmetic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    pub name: String,
    pub description: String,
    pub satisfied: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl Condition {
    fn new(name: &str, description: &str, satisfied: bool, details: String) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            satisfied,
            details: Some(details),
        }
    }
}

/// Outcome of checking a parameter set against its theorem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub conditions: Vec<Condition>,
    pub all_satisfied: bool,
    pub explanation: String,
}

impl ValidationResult {
    fn from_conditions(conditions: Vec<Condition>, explanation: String) -> Self {
        let all_satisfied = conditions.iter().all(|c| c.satisfied);
        Self {
            conditions,
            all_satisfied,
            explanation,
        }
    }

    /// Result for a method with no period theorem.
    pub fn inapplicable(method: &GenerationMethod) -> Self {
        Self {
            conditions: Vec::new(),
            all_satisfied: false,
            explanation: format!(
                "No period theorem applies to the {} method; run the generator to observe its period.",
                method.name().replace('_', "-")
            ),
        }
    }

    /// Whether any theorem was evaluated.
    pub fn is_applicable(&self) -> bool {
        !self.conditions.is_empty()
    }
}

/// Check `method` against its governing theorem.
pub fn validate(method: &GenerationMethod) -> ValidationResult {
    let result = match *method {
        GenerationMethod::MixedCongruential { a, b, m, .. } => hull_dobell(a, b, m),
        GenerationMethod::MultiplicativeCongruential { x0, a, m } => {
            if m >= 8 && m.is_power_of_two() {
                power_of_two_multiplicative(x0, a, m)
            } else {
                prime_multiplicative(x0, a, m)
            }
        }
        GenerationMethod::MiddleSquares { .. } => ValidationResult::inapplicable(method),
    };
    log::debug!(
        "validated {method}: {}/{} conditions hold",
        result.conditions.iter().filter(|c| c.satisfied).count(),
        result.conditions.len()
    );
    result
}

/// Parse a wire request and validate.
pub fn validate_request(request: &GenerationRequest) -> Result<ValidationResult> {
    Ok(validate(&request.to_method()?))
}

fn mark(ok: bool) -> &'static str {
    if ok { PASS } else { FAIL }
}

fn invalid_modulus(name: &str, description: &str) -> Condition {
    Condition::new(
        name,
        description,
        false,
        format!("m = 0 is not a valid modulus {FAIL}"),
    )
}

fn join(values: &[u64]) -> String {
    values
        .iter()
        .map(u64::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn summarize(conditions: &[Condition], theorem: &str, ok: String, failed: String) -> String {
    let failing: Vec<&str> = conditions
        .iter()
        .filter(|c| !c.satisfied)
        .map(|c| c.name.as_str())
        .collect();
    if failing.is_empty() {
        ok
    } else {
        format!(
            "{} of {} {theorem} conditions fail ({}); {failed}",
            failing.len(),
            conditions.len(),
            failing.join("; ")
        )
    }
}

// ---------------------------------------------------------------------------
// Mixed congruential: Hull–Dobell
// ---------------------------------------------------------------------------

fn hull_dobell(a: u64, b: u64, m: u64) -> ValidationResult {
    const GCD: (&str, &str) = (
        "gcd(b, m) = 1",
        "The increment b and the modulus m are relatively prime.",
    );
    const FACTORS: (&str, &str) = (
        "Prime factors of m divide a - 1",
        "a - 1 is divisible by every prime factor of m.",
    );
    const FOUR: (&str, &str) = (
        "4 | m implies 4 | (a - 1)",
        "If m is a multiple of 4, then a - 1 must also be a multiple of 4.",
    );

    if m == 0 {
        let conditions = vec![
            invalid_modulus(GCD.0, GCD.1),
            invalid_modulus(FACTORS.0, FACTORS.1),
            invalid_modulus(FOUR.0, FOUR.1),
        ];
        return ValidationResult::from_conditions(
            conditions,
            "The modulus m must be a positive integer; no period can be guaranteed for m = 0."
                .to_string(),
        );
    }

    let a_minus_1 = a as i128 - 1;

    let g = gcd(b, m);
    let gcd_ok = g == 1;
    let gcd_cond = Condition::new(
        GCD.0,
        GCD.1,
        gcd_ok,
        format!("gcd({b}, {m}) = {g} {}", mark(gcd_ok)),
    );

    let factors = prime_factors(m);
    let factor_checks: Vec<(u64, i128)> = factors
        .iter()
        .map(|&p| (p, a_minus_1.rem_euclid(p as i128)))
        .collect();
    let factors_ok = factor_checks.iter().all(|&(_, r)| r == 0);
    let factor_details = if factors.is_empty() {
        format!("m = {m} has no prime factors {PASS}")
    } else {
        let checks = factor_checks
            .iter()
            .map(|(p, r)| format!("{a_minus_1} mod {p} = {r}"))
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "a - 1 = {a_minus_1}; prime factors of {m}: {}; {checks} {}",
            join(&factors),
            mark(factors_ok)
        )
    };
    let factor_cond = Condition::new(FACTORS.0, FACTORS.1, factors_ok, factor_details);

    let four_cond = if m % 4 == 0 {
        let r = a_minus_1.rem_euclid(4);
        let ok = r == 0;
        Condition::new(
            FOUR.0,
            FOUR.1,
            ok,
            format!("{m} mod 4 = 0, and {a_minus_1} mod 4 = {r} {}", mark(ok)),
        )
    } else {
        Condition::new(
            FOUR.0,
            FOUR.1,
            true,
            format!("{m} mod 4 = {}, so the condition does not apply {PASS}", m % 4),
        )
    };

    let conditions = vec![gcd_cond, factor_cond, four_cond];
    let explanation = summarize(
        &conditions,
        "Hull–Dobell",
        format!(
            "All Hull–Dobell conditions hold: the mixed generator reaches the full period m = {m} from any seed."
        ),
        format!("the period is shorter than m = {m}."),
    );
    ValidationResult::from_conditions(conditions, explanation)
}

// ---------------------------------------------------------------------------
// Multiplicative congruential
// ---------------------------------------------------------------------------

fn power_of_two_multiplicative(x0: u64, a: u64, m: u64) -> ValidationResult {
    let k = m.trailing_zeros();
    let modulus = Condition::new(
        "m is a power of two",
        "The modulus has the form m = 2^k with k >= 3.",
        true,
        format!("{m} = 2^{k} {PASS}"),
    );

    let residue = a % 8;
    let a_ok = residue == 3 || residue == 5;
    let multiplier = Condition::new(
        "a ≡ 3 or 5 (mod 8)",
        "The multiplier leaves remainder 3 or 5 when divided by 8.",
        a_ok,
        format!("{a} mod 8 = {residue} {}", mark(a_ok)),
    );

    let seed_ok = x0 % 2 == 1;
    let seed = Condition::new(
        "x0 is odd",
        "The seed must be odd so the sequence stays in the odd residues.",
        seed_ok,
        format!("{x0} mod 2 = {} {}", x0 % 2, mark(seed_ok)),
    );

    let conditions = vec![modulus, multiplier, seed];
    let max_period = m / 4;
    let explanation = summarize(
        &conditions,
        "power-of-two multiplicative",
        format!(
            "All conditions hold: the multiplicative generator reaches its maximum period m/4 = {max_period}."
        ),
        format!("the period is shorter than m/4 = {max_period}."),
    );
    ValidationResult::from_conditions(conditions, explanation)
}

fn prime_multiplicative(x0: u64, a: u64, m: u64) -> ValidationResult {
    const PRIME: (&str, &str) = ("m is prime", "The modulus must be a prime number.");
    const ROOT: (&str, &str) = (
        "a is a primitive root modulo m",
        "a^((m-1)/q) mod m differs from 1 for every prime factor q of m - 1.",
    );
    const SEED: (&str, &str) = (
        "x0 ≢ 0 (mod m)",
        "The seed must not be a multiple of the modulus.",
    );

    if m == 0 {
        let conditions = vec![
            invalid_modulus(PRIME.0, PRIME.1),
            invalid_modulus(ROOT.0, ROOT.1),
            invalid_modulus(SEED.0, SEED.1),
        ];
        return ValidationResult::from_conditions(
            conditions,
            "The modulus m must be a positive integer; no period can be guaranteed for m = 0."
                .to_string(),
        );
    }

    let prime = is_prime(m);
    let prime_details = if prime {
        format!("m = {m} is prime {PASS}")
    } else {
        match smallest_prime_factor(m) {
            Some(p) => format!("m = {m} is divisible by {p} {FAIL}"),
            None => format!("m = {m} is not prime {FAIL}"),
        }
    };
    let prime_cond = Condition::new(PRIME.0, PRIME.1, prime, prime_details);

    let root_cond = if prime {
        let (ok, details) = primitive_root_check(a, m);
        Condition::new(ROOT.0, ROOT.1, ok, details)
    } else {
        Condition::new(
            ROOT.0,
            ROOT.1,
            false,
            format!("not evaluated because m = {m} is not prime {FAIL}"),
        )
    };

    let r = x0 % m;
    let seed_ok = r != 0;
    let seed_cond = Condition::new(
        SEED.0,
        SEED.1,
        seed_ok,
        format!("{x0} mod {m} = {r} {}", mark(seed_ok)),
    );

    let conditions = vec![prime_cond, root_cond, seed_cond];
    let max_period = m.saturating_sub(1);
    let explanation = if !prime && m >= 8 {
        summarize(
            &conditions,
            "prime-modulus multiplicative",
            String::new(),
            format!(
                "m = {m} is neither prime nor a power of two, so no maximum-period theorem applies."
            ),
        )
    } else {
        summarize(
            &conditions,
            "prime-modulus multiplicative",
            format!(
                "All conditions hold: the multiplicative generator reaches its maximum period m - 1 = {max_period}."
            ),
            format!("the period is shorter than m - 1 = {max_period}."),
        )
    };
    ValidationResult::from_conditions(conditions, explanation)
}

/// `a` generates the multiplicative group modulo the prime `m`.
fn primitive_root_check(a: u64, m: u64) -> (bool, String) {
    let residue = a % m;
    if residue == 0 {
        return (false, format!("{a} mod {m} = 0 {FAIL}"));
    }
    let order = m - 1;
    let qs = prime_factors(order);
    if qs.is_empty() {
        return (true, format!("m - 1 = {order}, every nonzero a is a generator {PASS}"));
    }
    let powers: Vec<(u64, u64)> = qs
        .iter()
        .map(|&q| (order / q, mod_pow(residue, order / q, m)))
        .collect();
    let ok = powers.iter().all(|&(_, v)| v != 1);
    let checks = powers
        .iter()
        .map(|(e, v)| format!("{a}^{e} mod {m} = {v}"))
        .collect::<Vec<_>>()
        .join(", ");
    (
        ok,
        format!(
            "m - 1 = {order}, prime factors {}; {checks} {}",
            join(&qs),
            mark(ok)
        ),
    )
}
