//! User-supplied parameter filters
//!
//! A filter receives the raw segment and answers one of three ways:
//! - `Ok(Some(value))`: accepted, `value` becomes the parameter
//! - `Ok(None)`: rejected, the next candidate directory is tried
//! - `Err(_)`: invalid, resolution is aborted immediately

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use super::ParamValue;

/// Validation failure raised by a filter
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct FilterError {
    message: String,
}

impl FilterError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

pub type FilterResult = Result<Option<ParamValue>, FilterError>;

/// Shareable validating transform for one parameter type
#[derive(Clone)]
pub struct ParameterFilter(Arc<dyn Fn(&str) -> FilterResult + Send + Sync>);

impl ParameterFilter {
    pub fn new<F>(filter: F) -> Self
    where
        F: Fn(&str) -> FilterResult + Send + Sync + 'static,
    {
        Self(Arc::new(filter))
    }

    pub fn apply(&self, segment: &str) -> FilterResult {
        (self.0)(segment)
    }
}

impl fmt::Debug for ParameterFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ParameterFilter(..)")
    }
}

/// Filters keyed by parameter-type token (the text between the delimiters)
#[derive(Debug, Clone, Default)]
pub struct FilterTable {
    filters: HashMap<String, ParameterFilter>,
}

impl FilterTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a filter (builder style)
    ///
    /// # Examples
    ///
    /// ```
    /// use pathwalk_router::{FilterError, FilterTable, ParamValue};
    ///
    /// let filters = FilterTable::new().with("digit", |value: &str| {
    ///     value
    ///         .parse::<i64>()
    ///         .map(|n| Some(ParamValue::Int(n)))
    ///         .map_err(|_| FilterError::new("not a number"))
    /// });
    ///
    /// let digit = filters.get("digit").unwrap();
    /// assert_eq!(digit.apply("42").unwrap(), Some(ParamValue::Int(42)));
    /// assert!(digit.apply("abc").is_err());
    /// ```
    pub fn with<F>(mut self, token: impl Into<String>, filter: F) -> Self
    where
        F: Fn(&str) -> FilterResult + Send + Sync + 'static,
    {
        self.insert(token, filter);
        self
    }

    pub fn insert<F>(&mut self, token: impl Into<String>, filter: F)
    where
        F: Fn(&str) -> FilterResult + Send + Sync + 'static,
    {
        self.insert_shared(token, ParameterFilter::new(filter));
    }

    /// Adds an already constructed (possibly shared) filter
    pub fn insert_shared(&mut self, token: impl Into<String>, filter: ParameterFilter) {
        self.filters.insert(token.into(), filter);
    }

    pub fn get(&self, token: &str) -> Option<&ParameterFilter> {
        self.filters.get(token)
    }

    pub fn contains(&self, token: &str) -> bool {
        self.filters.contains_key(token)
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Registered tokens, sorted
    pub fn tokens(&self) -> Vec<&str> {
        let mut tokens: Vec<&str> = self.filters.keys().map(String::as_str).collect();
        tokens.sort_unstable();
        tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_outcomes() {
        let filters = FilterTable::new()
            .with("even", |value: &str| match value.parse::<i64>() {
                Ok(n) if n % 2 == 0 => Ok(Some(ParamValue::Int(n))),
                Ok(_) => Ok(None),
                Err(_) => Err(FilterError::new("oh...")),
            });

        let even = filters.get("even").unwrap();
        assert_eq!(even.apply("4"), Ok(Some(ParamValue::Int(4))));
        assert_eq!(even.apply("3"), Ok(None));
        assert_eq!(even.apply("x").unwrap_err().message(), "oh...");
    }

    #[test]
    fn test_table_accessors() {
        let mut filters = FilterTable::new();
        assert!(filters.is_empty());

        filters.insert("b", |_: &str| Ok(None));
        filters.insert("a", |_: &str| Ok(None));
        assert_eq!(filters.len(), 2);
        assert!(filters.contains("a"));
        assert!(!filters.contains("c"));
        assert_eq!(filters.tokens(), vec!["a", "b"]);
    }
}
