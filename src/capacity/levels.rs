//! Load level normalization.
//!
//! Callers send levels as a loose JSON array. Entries are converted the way an
//! integer cast would treat them and anything that is not a positive integer
//! is dropped without complaint:
//!
//! | input        | level   |
//! |--------------|---------|
//! | `25`         | 25      |
//! | `2.7`        | 2       |
//! | `"40"`       | 40      |
//! | `0`, `-3`    | dropped |
//! | `"x"`, `true`, `null`, `[]` | dropped |
//!
//! Survivors are sorted ascending and de-duplicated.

use serde_json::Value;

use crate::load::LoadError;

/// Normalize raw levels, rejecting the request when none survive.
pub fn normalize_levels(raw: &[Value]) -> Result<Vec<u32>, LoadError> {
    let mut levels: Vec<u32> = raw.iter().filter_map(level_from_value).collect();
    levels.sort_unstable();
    levels.dedup();

    if levels.is_empty() {
        return Err(LoadError::InvalidInput(
            "steps must contain positive integers".into(),
        ));
    }
    Ok(levels)
}

/// Integer conversion shared with request body parsing: integers as-is,
/// floats truncated toward zero, numeric strings parsed.
pub fn integer_from_value(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => match n.as_i64() {
            Some(i) => Some(i),
            None => truncate_float(n.as_f64()?),
        },
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

fn level_from_value(value: &Value) -> Option<u32> {
    let n = integer_from_value(value)?;
    if n > 0 {
        u32::try_from(n).ok()
    } else {
        None
    }
}

fn truncate_float(f: f64) -> Option<i64> {
    if !f.is_finite() {
        return None;
    }
    let t = f.trunc();
    if t < i64::MIN as f64 || t > i64::MAX as f64 {
        return None;
    }
    Some(t as i64)
}
