//! Integration tests for randlab-core.
//!
//! These tests drive the public API the way the server and CLI do:
//! wire request → parameter parsing → generation / validation / sampling.

use rand::SeedableRng;
use rand::rngs::StdRng;
use randlab_core::{
    Distribution, EngineError, EngineLimits, GenerationMethod, GenerationRequest,
    RandomVariableRequest, StoppedReason, acceptance_rejection, generate, generate_from_request,
    validate, validate_request,
};

fn request(json: &str) -> GenerationRequest {
    serde_json::from_str(json).unwrap()
}

#[test]
fn hull_dobell_parameters_reach_full_period() {
    // a = 21, b = 3, m = 16 satisfies all three conditions
    let req = request(
        r#"{"method": "mixed_congruential", "parameters": {"x0": 1, "a": 21, "b": 3, "m": 16}}"#,
    );
    let validation = validate_request(&req).unwrap();
    assert!(validation.all_satisfied, "{}", validation.explanation);

    let result = generate_from_request(&req, &EngineLimits::default()).unwrap();
    assert_eq!(result.statistics.stopped_reason, StoppedReason::PeriodDetected);
    assert_eq!(result.statistics.period, Some(16));
}

#[test]
fn validator_agrees_with_generator_on_small_moduli() {
    // Hull–Dobell is necessary and sufficient: full period iff all conditions hold
    let limits = EngineLimits::default();
    for m in 2..=32u64 {
        for a in 0..m {
            for b in [0, 1, 3, 4] {
                let method = GenerationMethod::MixedCongruential { x0: 0, a, b, m };
                let full = generate(&method, &limits).unwrap().statistics.period == Some(m as usize);
                assert_eq!(
                    validate(&method).all_satisfied,
                    full,
                    "a={a} b={b} m={m}"
                );
            }
        }
    }
}

#[test]
fn prime_modulus_primitive_root_reaches_m_minus_one() {
    let limits = EngineLimits::default();
    for (a, m) in [(3u64, 7u64), (2, 11), (3, 17), (5, 23)] {
        let method = GenerationMethod::MultiplicativeCongruential { x0: 1, a, m };
        assert!(validate(&method).all_satisfied, "a={a} m={m}");
        let result = generate(&method, &limits).unwrap();
        assert_eq!(result.statistics.period, Some(m as usize - 1));
    }
}

#[test]
fn power_of_two_multiplicative_reaches_quarter_period() {
    let method = GenerationMethod::MultiplicativeCongruential {
        x0: 1,
        a: 5,
        m: 64,
    };
    assert!(validate(&method).all_satisfied);
    let result = generate(&method, &EngineLimits::default()).unwrap();
    assert_eq!(result.statistics.period, Some(16));
}

#[test]
fn congruential_values_are_unit_interval_and_finite() {
    let limits = EngineLimits::default();
    for method in [
        GenerationMethod::MixedCongruential {
            x0: 7,
            a: 5,
            b: 3,
            m: 16,
        },
        GenerationMethod::MultiplicativeCongruential {
            x0: 1,
            a: 16807,
            m: 2_147_483_647,
        },
    ] {
        let result = generate(&method, &limits).unwrap();
        assert!(result.numbers.iter().all(|&r| r.is_finite() && (0.0..1.0).contains(&r)));
        assert!(result.statistics.count <= limits.max_iterations);
    }
}

#[test]
fn large_prime_modulus_stops_at_iteration_ceiling() {
    let method = GenerationMethod::MultiplicativeCongruential {
        x0: 1,
        a: 16807,
        m: 2_147_483_647,
    };
    let result = generate(&method, &EngineLimits::default()).unwrap();
    assert_eq!(result.statistics.stopped_reason, StoppedReason::MaxIterations);
    assert_eq!(result.statistics.count, 100_000);
    // x1 = 16807 / (2^31 - 1)
    assert!((result.numbers[0] - 16807.0 / 2_147_483_647.0).abs() < 1e-15);
}

#[test]
fn middle_squares_eventually_stops() {
    let limits = EngineLimits::default();
    for x0 in [1234u64, 5678, 9999, 1000, 3792] {
        let method = GenerationMethod::MiddleSquares { x0, digits: 4 };
        let result = generate(&method, &limits).unwrap();
        assert_ne!(result.statistics.stopped_reason, StoppedReason::MaxIterations);
        assert!(result.statistics.count <= 10_000);
        assert!(result.numbers.iter().all(|&r| (0.0..1.0).contains(&r)));
    }
}

#[test]
fn middle_squares_validation_is_inapplicable() {
    let req = request(r#"{"method": "middle_squares", "parameters": {"x0": 1234, "digits": 4}}"#);
    let validation = validate_request(&req).unwrap();
    assert!(validation.conditions.is_empty());
    assert!(!validation.all_satisfied);
    assert!(!validation.explanation.is_empty());
}

#[test]
fn validate_is_idempotent_through_json() {
    let req = request(
        r#"{"method": "multiplicative_congruential", "parameters": {"x0": "3", "a": "3", "m": "31"}}"#,
    );
    let first = serde_json::to_string(&validate_request(&req).unwrap()).unwrap();
    let second = serde_json::to_string(&validate_request(&req).unwrap()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn bad_requests_are_invalid_parameter() {
    let limits = EngineLimits::default();
    for json in [
        r#"{"method": "mixed_congruential", "parameters": {"x0": 1, "a": 5, "b": 3}}"#,
        r#"{"method": "mixed_congruential", "parameters": {"x0": 1, "a": -5, "b": 3, "m": 16}}"#,
        r#"{"method": "mixed_congruential", "parameters": {"x0": 1, "a": 5, "b": 3, "m": 0}}"#,
        r#"{"method": "middle_squares", "parameters": {"x0": 1234, "digits": 0}}"#,
        r#"{"method": "lagged_fibonacci", "parameters": {}}"#,
    ] {
        let err = generate_from_request(&request(json), &limits).unwrap_err();
        assert_eq!(err.kind(), "invalid_parameter", "{json}: {err}");
    }
}

#[test]
fn sampler_pipeline_is_reproducible() {
    let limits = EngineLimits::default();
    let req: RandomVariableRequest =
        serde_json::from_str(r#"{"count": 1000, "distribution": "linear", "seed": 2024}"#).unwrap();
    let a = req.run(&limits).unwrap();
    let b = req.run(&limits).unwrap();
    assert_eq!(a, b);
    assert!(a.acceptance_rate > 0.0 && a.acceptance_rate <= 1.0);
    assert!(a.generated_values.iter().all(|&x| (0.0..=1.0).contains(&x)));
}

#[test]
fn sampler_quadratic_mean_is_two() {
    // the density is symmetric about x = 2 on [0, 4]
    let mut rng = StdRng::seed_from_u64(17);
    let result =
        acceptance_rejection(Distribution::Quadratic, 5000, &mut rng, &EngineLimits::default())
            .unwrap();
    let mean = result.generated_values.iter().sum::<f64>() / 5000.0;
    assert!((mean - 2.0).abs() < 0.05, "mean = {mean}");
}

#[test]
fn sampler_rejects_out_of_range_count() {
    let mut rng = StdRng::seed_from_u64(0);
    let limits = EngineLimits::default();
    for count in [0usize, 10_001] {
        assert!(matches!(
            acceptance_rejection(Distribution::Linear, count, &mut rng, &limits),
            Err(EngineError::InvalidParameter(_))
        ));
    }
}
