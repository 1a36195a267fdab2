// File: config/file.rs
// Purpose: Router configuration from pathwalk.toml and key-value setters

use std::fs;
use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};
use toml::Value;

use super::{
    parse_extension_list, ResolutionConfig, DEFAULT_INDEX_EXTENSIONS, DEFAULT_INDEX_NAME,
    DEFAULT_PARAMETER_DIRECTORY_NAME, DEFAULT_SEARCH_EXTENSIONS,
};
use crate::error::ConfigError;
use crate::param::FilterTable;

/// Router configuration
///
/// Unknown keys are rejected when loading, the same way [`RouterConfig::set`]
/// rejects them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RouterConfig {
    /// Fixed-name parameter directory (empty disables it)
    #[serde(default = "default_parameter_directory_name")]
    pub parameter_directory_name: String,

    /// Either `"php,html"` or `["php", "html"]`
    #[serde(
        default = "default_search_extensions",
        deserialize_with = "extension_list"
    )]
    pub search_extensions: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameter_left_delimiter: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameter_right_delimiter: Option<String>,

    /// `/path/from/root.php` or a bare `file.php`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_script: Option<String>,

    /// Accepted for compatibility; the process environment is never written
    #[serde(default = "default_true")]
    pub overwrite_globals: bool,

    #[serde(default = "default_index_name")]
    pub index_name: String,

    #[serde(default = "default_index_extensions", deserialize_with = "extension_list")]
    pub index_extensions: Vec<String>,
}

// Default values
fn default_parameter_directory_name() -> String {
    DEFAULT_PARAMETER_DIRECTORY_NAME.to_string()
}

fn default_search_extensions() -> Vec<String> {
    DEFAULT_SEARCH_EXTENSIONS.iter().map(|s| s.to_string()).collect()
}

fn default_true() -> bool {
    true
}

fn default_index_name() -> String {
    DEFAULT_INDEX_NAME.to_string()
}

fn default_index_extensions() -> Vec<String> {
    DEFAULT_INDEX_EXTENSIONS.iter().map(|s| s.to_string()).collect()
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            parameter_directory_name: default_parameter_directory_name(),
            search_extensions: default_search_extensions(),
            parameter_left_delimiter: None,
            parameter_right_delimiter: None,
            fallback_script: None,
            overwrite_globals: true,
            index_name: default_index_name(),
            index_extensions: default_index_extensions(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ExtensionList {
    Csv(String),
    List(Vec<String>),
}

fn extension_list<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    Ok(match ExtensionList::deserialize(deserializer)? {
        ExtensionList::Csv(list) => parse_extension_list(&list),
        ExtensionList::List(list) => list.iter().flat_map(|ext| parse_extension_list(ext)).collect(),
    })
}

/// Configuration key, accepted in `snake_case` or `camelCase`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    ParameterDirectoryName,
    SearchExtensions,
    ParameterLeftDelimiter,
    ParameterRightDelimiter,
    FallbackScript,
    OverwriteGlobals,
    IndexName,
    IndexExtensions,
}

impl ConfigKey {
    pub const ALL: [ConfigKey; 8] = [
        ConfigKey::ParameterDirectoryName,
        ConfigKey::SearchExtensions,
        ConfigKey::ParameterLeftDelimiter,
        ConfigKey::ParameterRightDelimiter,
        ConfigKey::FallbackScript,
        ConfigKey::OverwriteGlobals,
        ConfigKey::IndexName,
        ConfigKey::IndexExtensions,
    ];

    pub fn parse(key: &str) -> Result<Self, ConfigError> {
        ConfigKey::ALL
            .into_iter()
            .find(|k| k.name() == key || k.camel_name() == key)
            .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))
    }

    pub fn name(&self) -> &'static str {
        match self {
            ConfigKey::ParameterDirectoryName => "parameter_directory_name",
            ConfigKey::SearchExtensions => "search_extensions",
            ConfigKey::ParameterLeftDelimiter => "parameter_left_delimiter",
            ConfigKey::ParameterRightDelimiter => "parameter_right_delimiter",
            ConfigKey::FallbackScript => "fallback_script",
            ConfigKey::OverwriteGlobals => "overwrite_globals",
            ConfigKey::IndexName => "index_name",
            ConfigKey::IndexExtensions => "index_extensions",
        }
    }

    fn camel_name(&self) -> &'static str {
        match self {
            ConfigKey::ParameterDirectoryName => "parameterDirectoryName",
            ConfigKey::SearchExtensions => "searchExtensions",
            ConfigKey::ParameterLeftDelimiter => "parameterLeftDelimiter",
            ConfigKey::ParameterRightDelimiter => "parameterRightDelimiter",
            ConfigKey::FallbackScript => "fallbackScript",
            ConfigKey::OverwriteGlobals => "overwriteGlobals",
            ConfigKey::IndexName => "indexName",
            ConfigKey::IndexExtensions => "indexExtensions",
        }
    }

    fn invalid(&self, expected: &'static str) -> ConfigError {
        ConfigError::InvalidType {
            key: self.name().to_string(),
            expected,
        }
    }

    fn string(&self, value: Value) -> Result<String, ConfigError> {
        match value {
            Value::String(s) => Ok(s),
            _ => Err(self.invalid("a string")),
        }
    }

    /// Integers and digit strings count as booleans (`0` is false)
    fn boolean(&self, value: Value) -> Result<bool, ConfigError> {
        match value {
            Value::Boolean(b) => Ok(b),
            Value::Integer(n) => Ok(n != 0),
            Value::String(s) if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) => {
                Ok(s.bytes().any(|b| b != b'0'))
            }
            Value::String(s) if s == "true" || s == "false" => Ok(s == "true"),
            _ => Err(self.invalid("a boolean")),
        }
    }

    fn extensions(&self, value: Value) -> Result<Vec<String>, ConfigError> {
        match value {
            Value::String(s) => Ok(parse_extension_list(&s)),
            Value::Array(items) => items
                .into_iter()
                .map(|item| match item {
                    Value::String(s) => Ok(parse_extension_list(&s)),
                    _ => Err(self.invalid("a string or an array of strings")),
                })
                .collect::<Result<Vec<_>, _>>()
                .map(|lists| lists.concat()),
            _ => Err(self.invalid("a string or an array of strings")),
        }
    }
}

impl RouterConfig {
    /// Load configuration from a TOML file
    ///
    /// A missing or empty file yields the default configuration.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;

        Self::parse(&content, &path.display().to_string())
    }

    /// Load configuration from default path (./pathwalk.toml)
    pub fn load_default() -> Result<Self, ConfigError> {
        Self::load("pathwalk.toml")
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Self::parse(content, "<string>")
    }

    fn parse(content: &str, origin: &str) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        toml::from_str(content).map_err(|source| ConfigError::Parse {
            origin: origin.to_string(),
            source,
        })
    }

    /// Sets one key, validating the value type
    ///
    /// # Examples
    ///
    /// ```
    /// use pathwalk_router::RouterConfig;
    ///
    /// let mut config = RouterConfig::default();
    /// config
    ///     .set("searchExtensions", "php,html").unwrap()
    ///     .set("overwrite_globals", 0i64).unwrap();
    /// assert_eq!(config.search_extensions, vec!["php", "html"]);
    /// assert!(!config.overwrite_globals);
    ///
    /// assert!(config.set("fallback_script", true).is_err());
    /// assert!(config.set("unknown", "value").is_err());
    /// ```
    pub fn set(&mut self, key: &str, value: impl Into<Value>) -> Result<&mut Self, ConfigError> {
        let key = ConfigKey::parse(key)?;
        let value = value.into();

        match key {
            ConfigKey::ParameterDirectoryName => self.parameter_directory_name = key.string(value)?,
            ConfigKey::SearchExtensions => self.search_extensions = key.extensions(value)?,
            ConfigKey::ParameterLeftDelimiter => {
                self.parameter_left_delimiter = Some(key.string(value)?)
            }
            ConfigKey::ParameterRightDelimiter => {
                self.parameter_right_delimiter = Some(key.string(value)?)
            }
            ConfigKey::FallbackScript => self.fallback_script = Some(key.string(value)?),
            ConfigKey::OverwriteGlobals => self.overwrite_globals = key.boolean(value)?,
            ConfigKey::IndexName => self.index_name = key.string(value)?,
            ConfigKey::IndexExtensions => self.index_extensions = key.extensions(value)?,
        }

        Ok(self)
    }

    /// Reads one key; `None` for an unset optional key
    pub fn get(&self, key: &str) -> Result<Option<Value>, ConfigError> {
        let strings = |list: &[String]| Value::Array(list.iter().cloned().map(Value::String).collect());

        Ok(match ConfigKey::parse(key)? {
            ConfigKey::ParameterDirectoryName => {
                Some(Value::String(self.parameter_directory_name.clone()))
            }
            ConfigKey::SearchExtensions => Some(strings(&self.search_extensions)),
            ConfigKey::ParameterLeftDelimiter => {
                self.parameter_left_delimiter.clone().map(Value::String)
            }
            ConfigKey::ParameterRightDelimiter => {
                self.parameter_right_delimiter.clone().map(Value::String)
            }
            ConfigKey::FallbackScript => self.fallback_script.clone().map(Value::String),
            ConfigKey::OverwriteGlobals => Some(Value::Boolean(self.overwrite_globals)),
            ConfigKey::IndexName => Some(Value::String(self.index_name.clone())),
            ConfigKey::IndexExtensions => Some(strings(&self.index_extensions)),
        })
    }

    /// Builds the per-call configuration for `document_root`
    pub fn to_resolution_config(&self, document_root: &str, filters: FilterTable) -> ResolutionConfig {
        let mut config = ResolutionConfig::new(document_root)
            .with_search_extensions(self.search_extensions.iter().cloned())
            .with_index(self.index_name.clone(), self.index_extensions.iter().cloned())
            .with_filters(filters);

        config = if self.parameter_directory_name.is_empty() {
            config.without_parameter_directory()
        } else {
            config.with_parameter_directory_name(self.parameter_directory_name.clone())
        };

        config.parameter_left_delimiter = self.parameter_left_delimiter.clone();
        config.parameter_right_delimiter = self.parameter_right_delimiter.clone();

        match self.fallback_script.as_deref() {
            Some(script) if !script.is_empty() => config.with_fallback_script(script),
            _ => config,
        }
    }
}
