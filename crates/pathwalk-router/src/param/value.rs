//! Parameter value type

use std::fmt;

use serde::Serialize;

/// Value extracted from a path segment
///
/// Parameter directories without a filter yield the raw segment as
/// `String`; custom filters may transform it into any variant.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ParamValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl ParamValue {
    /// Returns the string payload, if this is a `String`
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParamValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the integer payload, if this is an `Int`
    pub fn as_int(&self) -> Option<i64> {
        match self {
            ParamValue::Int(n) => Some(*n),
            _ => None,
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Bool(b) => write!(f, "{}", b),
            ParamValue::Int(n) => write!(f, "{}", n),
            ParamValue::Float(n) => write!(f, "{}", n),
            ParamValue::String(s) => f.write_str(s),
        }
    }
}

impl From<bool> for ParamValue {
    fn from(b: bool) -> Self {
        ParamValue::Bool(b)
    }
}

impl From<i64> for ParamValue {
    fn from(n: i64) -> Self {
        ParamValue::Int(n)
    }
}

impl From<i32> for ParamValue {
    fn from(n: i32) -> Self {
        ParamValue::Int(n as i64)
    }
}

impl From<f64> for ParamValue {
    fn from(n: f64) -> Self {
        ParamValue::Float(n)
    }
}

impl From<String> for ParamValue {
    fn from(s: String) -> Self {
        ParamValue::String(s)
    }
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        ParamValue::String(s.to_string())
    }
}

impl PartialEq<&str> for ParamValue {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == Some(*other)
    }
}

impl PartialEq<i64> for ParamValue {
    fn eq(&self, other: &i64) -> bool {
        self.as_int() == Some(*other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(ParamValue::from("k-holy").to_string(), "k-holy");
        assert_eq!(ParamValue::from(42).to_string(), "42");
        assert_eq!(ParamValue::from(true).to_string(), "true");
    }

    #[test]
    fn test_comparisons() {
        assert_eq!(ParamValue::from("1"), "1");
        assert_eq!(ParamValue::from(1i64), 1i64);
        assert_ne!(ParamValue::from("1"), 1i64);
    }
}
