// File: src/value.rs
// Purpose: Decoded field option values

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A decoded configuration value read from a field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    Bool(bool),
    Number(f64),
    Text(String),
    List(Vec<OptionValue>),
}

/// Named option values, ordered by name
pub type OptionMap = BTreeMap<String, OptionValue>;

impl OptionValue {
    /// Decode a raw attribute string into a typed value
    ///
    /// `"true"`/`"false"` become booleans, numeric text in its canonical form
    /// becomes a number and JSON arrays become lists. Everything else stays
    /// text, exactly as written.
    pub fn decode(raw: &str) -> Self {
        let trimmed = raw.trim();

        match trimmed {
            "true" => return OptionValue::Bool(true),
            "false" => return OptionValue::Bool(false),
            _ => {}
        }

        // Only numbers that print back as the same text, so "007" or "1.50"
        // stay text and a regexp like "007" keeps its leading zeros
        if let Some(n) = parse_number(trimmed) {
            let number = OptionValue::Number(n);
            if number.to_string() == raw {
                return number;
            }
        }

        if trimmed.starts_with('[') {
            if let Ok(serde_json::Value::Array(items)) = serde_json::from_str(trimmed) {
                return OptionValue::List(items.into_iter().map(OptionValue::from).collect());
            }
        }

        OptionValue::Text(raw.to_string())
    }

    /// Borrow as text, if this is a text value
    pub fn as_str(&self) -> Option<&str> {
        match self {
            OptionValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Numeric view; numeric text is accepted
    pub fn as_number(&self) -> Option<f64> {
        match self {
            OptionValue::Number(n) => Some(*n),
            OptionValue::Text(s) => parse_number(s.trim()),
            _ => None,
        }
    }

    /// Interpret as a two-element numeric range `[min, max]`
    pub fn as_range(&self) -> Option<(f64, f64)> {
        match self {
            OptionValue::List(items) if items.len() == 2 => {
                Some((items[0].as_number()?, items[1].as_number()?))
            }
            OptionValue::Text(s) => OptionValue::decode(s).as_range_list(),
            _ => None,
        }
    }

    fn as_range_list(&self) -> Option<(f64, f64)> {
        match self {
            OptionValue::List(_) => self.as_range(),
            _ => None,
        }
    }

    /// Truthiness of a flag-like option
    pub fn to_bool(&self) -> bool {
        match self {
            OptionValue::Bool(b) => *b,
            OptionValue::Number(n) => *n != 0.0,
            OptionValue::Text(s) => !s.is_empty() && s != "false",
            OptionValue::List(items) => !items.is_empty(),
        }
    }
}

fn parse_number(s: &str) -> Option<f64> {
    // f64::from_str also takes "inf" and "NaN", which are not numbers here
    let numeric = !s.is_empty()
        && s.chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E'))
        && s.chars().any(|c| c.is_ascii_digit());
    if !numeric {
        return None;
    }
    s.parse::<f64>().ok().filter(|n| n.is_finite())
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionValue::Bool(b) => write!(f, "{}", b),
            OptionValue::Number(n) => {
                // Format number nicely (remove .0 for integers)
                if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{}", n)
                }
            }
            OptionValue::Text(s) => f.write_str(s),
            OptionValue::List(items) => {
                let items: Vec<String> = items.iter().map(|v| v.to_string()).collect();
                write!(f, "[{}]", items.join(", "))
            }
        }
    }
}

impl From<serde_json::Value> for OptionValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Bool(b) => OptionValue::Bool(b),
            serde_json::Value::Number(n) => n
                .as_f64()
                .map(OptionValue::Number)
                .unwrap_or_else(|| OptionValue::Text(n.to_string())),
            serde_json::Value::String(s) => OptionValue::Text(s),
            serde_json::Value::Array(items) => {
                OptionValue::List(items.into_iter().map(OptionValue::from).collect())
            }
            other => OptionValue::Text(other.to_string()),
        }
    }
}

impl From<bool> for OptionValue {
    fn from(b: bool) -> Self {
        OptionValue::Bool(b)
    }
}

impl From<f64> for OptionValue {
    fn from(n: f64) -> Self {
        OptionValue::Number(n)
    }
}

impl From<i32> for OptionValue {
    fn from(n: i32) -> Self {
        OptionValue::Number(n as f64)
    }
}

impl From<usize> for OptionValue {
    fn from(n: usize) -> Self {
        OptionValue::Number(n as f64)
    }
}

impl From<String> for OptionValue {
    fn from(s: String) -> Self {
        OptionValue::Text(s)
    }
}

impl From<&str> for OptionValue {
    fn from(s: &str) -> Self {
        OptionValue::Text(s.to_string())
    }
}
