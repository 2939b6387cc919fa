//! User-supplied numeric parameters.
//!
//! Parameters arrive from text inputs, so a value may be a JSON number or a
//! numeric string. Anything non-numeric, non-finite, negative or fractional
//! where an integer is required becomes [`EngineError::InvalidParameter`].

use std::collections::BTreeMap;

use serde_json::Value;

use crate::error::{EngineError, Result};

/// Raw parameter map as received from the caller.
pub type Parameters = BTreeMap<String, Value>;

/// Coerce a parameter value to a finite `f64`.
pub fn to_number(name: &str, value: &Value) -> Result<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match number {
        Some(x) if x.is_finite() => Ok(x),
        Some(_) => Err(EngineError::parameter(format!(
            "parameter '{name}' must be a finite number"
        ))),
        None => Err(EngineError::parameter(format!(
            "parameter '{name}' must be a number, got {value}"
        ))),
    }
}

/// Coerce a parameter value to a non-negative integer.
pub fn to_integer(name: &str, value: &Value) -> Result<u64> {
    if let Value::Number(n) = value {
        if let Some(exact) = n.as_u64() {
            return Ok(exact);
        }
    }
    if let Value::String(s) = value {
        if let Ok(exact) = s.trim().parse::<u64>() {
            return Ok(exact);
        }
    }

    let x = to_number(name, value)?;
    if x < 0.0 {
        return Err(EngineError::parameter(format!(
            "parameter '{name}' must be non-negative, got {x}"
        )));
    }
    if x.fract() != 0.0 {
        return Err(EngineError::parameter(format!(
            "parameter '{name}' must be a whole number, got {x}"
        )));
    }
    if x >= u64::MAX as f64 {
        return Err(EngineError::parameter(format!(
            "parameter '{name}' is too large, got {x}"
        )));
    }
    Ok(x as u64)
}

/// Required non-negative integer parameter.
pub fn require_integer(params: &Parameters, name: &str) -> Result<u64> {
    match params.get(name) {
        Some(Value::Null) | None => Err(EngineError::parameter(format!(
            "missing required parameter '{name}'"
        ))),
        Some(value) => to_integer(name, value),
    }
}

/// Optional finite number, looked up under any of `names` in order.
pub fn optional_number(params: &Parameters, names: &[&str]) -> Result<Option<f64>> {
    for name in names {
        match params.get(*name) {
            Some(Value::Null) | None => continue,
            Some(value) => return to_number(name, value).map(Some),
        }
    }
    Ok(None)
}

/// Optional non-negative integer, looked up under any of `names` in order.
pub fn optional_integer(params: &Parameters, names: &[&str]) -> Result<Option<u64>> {
    for name in names {
        match params.get(*name) {
            Some(Value::Null) | None => continue,
            Some(value) => return to_integer(name, value).map(Some),
        }
    }
    Ok(None)
}

/// Parse `key=value` pairs (as typed on a command line) into a parameter map.
pub fn parse_pairs<S: AsRef<str>>(pairs: &[S]) -> Result<Parameters> {
    let mut params = Parameters::new();
    for pair in pairs {
        let pair = pair.as_ref();
        let Some((key, value)) = pair.split_once('=') else {
            return Err(EngineError::parameter(format!(
                "expected key=value, got '{pair}'"
            )));
        };
        params.insert(key.trim().to_string(), Value::String(value.trim().to_string()));
    }
    Ok(params)
}
