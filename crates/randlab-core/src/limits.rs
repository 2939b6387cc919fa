//! Resource ceilings shared by every engine operation.

use serde::{Deserialize, Serialize};

/// Hard caps that bound the work and memory of a single request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineLimits {
    /// Longest sequence a generator may emit before stopping with
    /// `max_iterations`. Congruential methods additionally stop at `m`.
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
    /// Largest `count` the acceptance-rejection sampler accepts.
    #[serde(default = "default_max_variates")]
    pub max_variates: usize,
    /// Trial cap per requested variate.
    #[serde(default = "default_trial_multiplier")]
    pub trial_multiplier: usize,
    /// Largest number of chi-square intervals.
    #[serde(default = "default_max_intervals")]
    pub max_intervals: usize,
}

fn default_max_iterations() -> usize {
    100_000
}

fn default_max_variates() -> usize {
    10_000
}

fn default_trial_multiplier() -> usize {
    50
}

fn default_max_intervals() -> usize {
    10_000
}

impl Default for EngineLimits {
    fn default() -> Self {
        Self {
            max_iterations: default_max_iterations(),
            max_variates: default_max_variates(),
            trial_multiplier: default_trial_multiplier(),
            max_intervals: default_max_intervals(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let limits = EngineLimits::default();
        assert_eq!(limits.max_iterations, 100_000);
        assert_eq!(limits.max_variates, 10_000);
        assert_eq!(limits.trial_multiplier, 50);
        assert_eq!(limits.max_intervals, 10_000);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let limits: EngineLimits = serde_json::from_str(r#"{"max_variates": 500}"#).unwrap();
        assert_eq!(limits.max_variates, 500);
        assert_eq!(limits.max_iterations, 100_000);
    }
}
