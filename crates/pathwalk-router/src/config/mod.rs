//! Resolution configuration
//!
//! [`ResolutionConfig`] is the immutable input of one resolution call.
//! [`RouterConfig`] is the key-value store it is usually built from.

use crate::param::{FilterResult, FilterTable};
use crate::path::normalize_document_root;

mod file;

pub use file::{ConfigKey, RouterConfig};

pub const DEFAULT_PARAMETER_DIRECTORY_NAME: &str = "%VAR%";
pub const DEFAULT_SEARCH_EXTENSIONS: &[&str] = &["php"];
pub const DEFAULT_INDEX_NAME: &str = "index";
pub const DEFAULT_INDEX_EXTENSIONS: &[&str] = &["php", "html"];

/// Script used when normal resolution finds nothing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackScript {
    /// Starts with `/`: resolved again from the document root
    RootRelative(String),
    /// Bare file name: searched where resolution stopped
    FileName(String),
}

impl FallbackScript {
    /// Classifies a configured fallback path
    ///
    /// # Examples
    ///
    /// ```
    /// use pathwalk_router::FallbackScript;
    ///
    /// assert_eq!(
    ///     FallbackScript::parse("/temp/fallback.php"),
    ///     FallbackScript::RootRelative("/temp/fallback.php".to_string())
    /// );
    /// assert_eq!(
    ///     FallbackScript::parse("index.php"),
    ///     FallbackScript::FileName("index.php".to_string())
    /// );
    /// ```
    pub fn parse(script: &str) -> Self {
        if script.starts_with('/') {
            FallbackScript::RootRelative(script.to_string())
        } else {
            FallbackScript::FileName(script.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            FallbackScript::RootRelative(s) | FallbackScript::FileName(s) => s,
        }
    }
}

/// Splits a comma-separated extension list (`"php,html"`)
///
/// Whitespace and a leading dot are trimmed; empty entries are dropped.
pub fn parse_extension_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(|ext| ext.trim().trim_start_matches('.'))
        .filter(|ext| !ext.is_empty())
        .map(str::to_string)
        .collect()
}

fn to_strings(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

/// Everything one resolution call consults
///
/// Built with consuming `with_*` methods:
///
/// ```
/// use pathwalk_router::{ResolutionConfig, FallbackScript};
///
/// let config = ResolutionConfig::new("/var/www/")
///     .with_parameter_delimiters("{%", "%}")
///     .with_search_extensions(["php", "html"])
///     .with_fallback_script("index.php");
///
/// assert_eq!(config.document_root, "/var/www");
/// assert_eq!(config.parameter_directory_name.as_deref(), Some("%VAR%"));
/// assert_eq!(config.delimiters(), Some(("{%", "%}")));
/// assert_eq!(config.fallback_script, Some(FallbackScript::FileName("index.php".into())));
/// ```
#[derive(Debug, Clone)]
pub struct ResolutionConfig {
    /// Absolute root, `/`-separated, without trailing `/`
    pub document_root: String,
    /// Fixed-name parameter directory that accepts any segment
    pub parameter_directory_name: Option<String>,
    pub parameter_left_delimiter: Option<String>,
    pub parameter_right_delimiter: Option<String>,
    /// Extensions (without dot) tried in order when probing files
    pub search_extensions: Vec<String>,
    pub parameter_filters: FilterTable,
    pub fallback_script: Option<FallbackScript>,
    /// Base name of the directory index file
    pub index_name: String,
    /// Extensions tried in order for the directory index
    pub index_extensions: Vec<String>,
}

impl ResolutionConfig {
    pub fn new(document_root: &str) -> Self {
        Self {
            document_root: normalize_document_root(document_root),
            parameter_directory_name: Some(DEFAULT_PARAMETER_DIRECTORY_NAME.to_string()),
            parameter_left_delimiter: None,
            parameter_right_delimiter: None,
            search_extensions: to_strings(DEFAULT_SEARCH_EXTENSIONS),
            parameter_filters: FilterTable::new(),
            fallback_script: None,
            index_name: DEFAULT_INDEX_NAME.to_string(),
            index_extensions: to_strings(DEFAULT_INDEX_EXTENSIONS),
        }
    }

    /// Both delimiters, when both are configured
    pub fn delimiters(&self) -> Option<(&str, &str)> {
        match (&self.parameter_left_delimiter, &self.parameter_right_delimiter) {
            (Some(left), Some(right)) => Some((left, right)),
            _ => None,
        }
    }

    pub fn with_parameter_directory_name(mut self, name: impl Into<String>) -> Self {
        self.parameter_directory_name = Some(name.into());
        self
    }

    /// Disables fixed-name parameter directories
    pub fn without_parameter_directory(mut self) -> Self {
        self.parameter_directory_name = None;
        self
    }

    pub fn with_parameter_delimiters(
        mut self,
        left: impl Into<String>,
        right: impl Into<String>,
    ) -> Self {
        self.parameter_left_delimiter = Some(left.into());
        self.parameter_right_delimiter = Some(right.into());
        self
    }

    pub fn with_search_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.search_extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_filter<F>(mut self, token: impl Into<String>, filter: F) -> Self
    where
        F: Fn(&str) -> FilterResult + Send + Sync + 'static,
    {
        self.parameter_filters.insert(token, filter);
        self
    }

    pub fn with_filters(mut self, filters: FilterTable) -> Self {
        self.parameter_filters = filters;
        self
    }

    pub fn with_fallback_script(mut self, script: &str) -> Self {
        self.fallback_script = Some(FallbackScript::parse(script));
        self
    }

    pub fn with_index<I, S>(mut self, name: impl Into<String>, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.index_name = name.into();
        self.index_extensions = extensions.into_iter().map(Into::into).collect();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ResolutionConfig::new("/srv/www");
        assert_eq!(config.parameter_directory_name.as_deref(), Some("%VAR%"));
        assert_eq!(config.search_extensions, vec!["php"]);
        assert_eq!(config.index_name, "index");
        assert_eq!(config.index_extensions, vec!["php", "html"]);
        assert!(config.delimiters().is_none());
        assert!(config.fallback_script.is_none());
        assert!(config.parameter_filters.is_empty());
    }

    #[test]
    fn test_one_delimiter_is_not_enough() {
        let mut config = ResolutionConfig::new("/srv/www");
        config.parameter_left_delimiter = Some("{%".to_string());
        assert!(config.delimiters().is_none());
    }

    #[test]
    fn test_parse_extension_list() {
        assert_eq!(parse_extension_list("php,html"), vec!["php", "html"]);
        assert_eq!(parse_extension_list(" .php , ,html "), vec!["php", "html"]);
        assert!(parse_extension_list("").is_empty());
    }
}
