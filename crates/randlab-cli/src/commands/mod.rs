pub mod generate;
pub mod sample;
pub mod server;
pub mod validate;

use randlab_core::{EngineError, Parameters};
use serde::Serialize;

/// Print an engine error and exit with status 1.
pub fn fail(err: EngineError) -> ! {
    eprintln!("Error ({}): {err}", err.kind());
    std::process::exit(1);
}

/// Parse repeated `--param key=value` flags.
pub fn parse_params(pairs: &[String]) -> Parameters {
    randlab_core::params::parse_pairs(pairs).unwrap_or_else(|e| fail(e))
}

/// Print and/or save the JSON form of a response.
pub fn emit_json<T: Serialize>(value: &T, print: bool, output_path: Option<&str>) {
    let json = match serde_json::to_string_pretty(value) {
        Ok(json) => json,
        Err(e) => {
            eprintln!("Failed to serialize response: {e}");
            std::process::exit(1);
        }
    };
    if print {
        println!("{json}");
    }
    if let Some(path) = output_path {
        if let Err(e) = std::fs::write(path, &json) {
            eprintln!("Failed to write {path}: {e}");
            std::process::exit(1);
        }
        if !print {
            println!("\n📄 Saved to: {path}");
        }
    }
}

/// Number of rows to show given a `--show` value (0 = all).
pub fn rows_to_show(show: usize, total: usize) -> usize {
    if show == 0 { total } else { show.min(total) }
}

/// Parse a sample from file contents.
///
/// Accepts a JSON array of numbers, a JSON object with a `numbers` field
/// (as written by `randlab generate --output`), or plain text with values
/// separated by commas, whitespace or newlines.
pub fn parse_numbers(text: &str) -> Result<Vec<f64>, String> {
    let trimmed = text.trim();
    if trimmed.starts_with('[') || trimmed.starts_with('{') {
        let value: serde_json::Value =
            serde_json::from_str(trimmed).map_err(|e| format!("invalid JSON: {e}"))?;
        let array = match &value {
            serde_json::Value::Array(items) => items,
            serde_json::Value::Object(map) => match map.get("numbers") {
                Some(serde_json::Value::Array(items)) => items,
                _ => return Err("JSON object has no 'numbers' array".to_string()),
            },
            _ => return Err("expected a JSON array of numbers".to_string()),
        };
        return array
            .iter()
            .enumerate()
            .map(|(i, v)| v.as_f64().ok_or_else(|| format!("numbers[{i}] is not a number")))
            .collect();
    }

    trimmed
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .map(|token| {
            token
                .parse::<f64>()
                .map_err(|_| format!("'{token}' is not a number"))
        })
        .collect()
}
