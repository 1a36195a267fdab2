//! CGI-style request front
//!
//! [`Router`] owns the configuration, the parameter filters and the CGI
//! variables a request arrives with. [`Router::prepare`] splits the request
//! URI, resolves its path with fallback and derives the variables a script
//! runner needs (`SCRIPT_NAME`, `PATH_INFO`, ...).
//!
//! Nothing here writes the process environment or runs the resolved file.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use tracing::debug;

use crate::config::RouterConfig;
use crate::error::{ConfigError, PrepareError};
use crate::fallback::FallbackResolver;
use crate::param::{FilterResult, FilterTable, ParamValue};
use crate::path::{normalize_document_root, split_request_uri};
use crate::probe::{DiskFs, FileSystem};

/// CGI variable the router reads or produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServerVar {
    DocumentRoot,
    PathInfo,
    PathTranslated,
    PhpSelf,
    RequestUri,
    ScriptFilename,
    ScriptName,
}

impl ServerVar {
    pub const ALL: [ServerVar; 7] = [
        ServerVar::DocumentRoot,
        ServerVar::PathInfo,
        ServerVar::PathTranslated,
        ServerVar::PhpSelf,
        ServerVar::RequestUri,
        ServerVar::ScriptFilename,
        ServerVar::ScriptName,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ServerVar::DocumentRoot => "DOCUMENT_ROOT",
            ServerVar::PathInfo => "PATH_INFO",
            ServerVar::PathTranslated => "PATH_TRANSLATED",
            ServerVar::PhpSelf => "PHP_SELF",
            ServerVar::RequestUri => "REQUEST_URI",
            ServerVar::ScriptFilename => "SCRIPT_FILENAME",
            ServerVar::ScriptName => "SCRIPT_NAME",
        }
    }
}

impl fmt::Display for ServerVar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ServerVar {
    type Err = ConfigError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        ServerVar::ALL
            .into_iter()
            .find(|var| var.name() == name)
            .ok_or_else(|| ConfigError::UnknownServerVar(name.to_string()))
    }
}

/// Set of CGI variables
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ServerVars {
    vars: BTreeMap<ServerVar, String>,
}

impl ServerVars {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, var: ServerVar) -> Option<&str> {
        self.vars.get(&var).map(String::as_str)
    }

    /// Sets a variable
    ///
    /// `DOCUMENT_ROOT` is slash-normalized. `REQUEST_URI` must be splittable
    /// into path, query and fragment.
    pub fn set(&mut self, var: ServerVar, value: impl Into<String>) -> Result<(), ConfigError> {
        let mut value = value.into();
        match var {
            ServerVar::DocumentRoot => value = value.replace('\\', "/"),
            ServerVar::RequestUri if split_request_uri(&value).is_none() => {
                return Err(ConfigError::InvalidRequestUri(value));
            }
            _ => {}
        }
        self.vars.insert(var, value);
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = (ServerVar, &str)> {
        self.vars.iter().map(|(var, value)| (*var, value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

/// Everything needed to run the script a request resolved to
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreparedRequest {
    /// Absolute disk directory of the resolved file
    pub translate_directory: String,
    /// Absolute disk path of the resolved file
    pub include_file: String,
    /// Disk-literal path below the root, plus path info and query string
    pub virtual_uri: String,
    pub extension: Option<String>,
    pub parameters: Vec<ParamValue>,
    pub query_string: String,
    pub fragment: String,
    pub server: ServerVars,
}

impl PreparedRequest {
    pub fn parameter(&self, index: usize) -> Option<&ParamValue> {
        self.parameters.get(index)
    }

    pub fn parameters(&self) -> &[ParamValue] {
        &self.parameters
    }

    pub fn server(&self, var: ServerVar) -> Option<&str> {
        self.server.get(var)
    }
}

/// Request router over a document root
///
/// # Examples
///
/// ```
/// use pathwalk_router::{Router, RouterConfig, ServerVar};
/// use pathwalk_router::probe::MemoryFs;
///
/// let fs = MemoryFs::new().with_file("/var/www/categories/%VAR%/detail.php");
/// let mut router = Router::new(RouterConfig::default());
/// router.set_server("DOCUMENT_ROOT", "/var/www").unwrap();
///
/// let request = router
///     .prepare_with(&fs, Some("/categories/1/detail.json/foo?bar=baz"))
///     .unwrap();
/// assert_eq!(request.include_file, "/var/www/categories/%VAR%/detail.php");
/// assert_eq!(request.virtual_uri, "/categories/%VAR%/detail.php/foo?bar=baz");
/// assert_eq!(request.server(ServerVar::ScriptName), Some("/categories/1/detail.php"));
/// assert_eq!(request.server(ServerVar::PathInfo), Some("/foo"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Router {
    config: RouterConfig,
    filters: FilterTable,
    server: ServerVars,
}

impl Router {
    pub fn new(config: RouterConfig) -> Self {
        Self {
            config,
            filters: FilterTable::new(),
            server: ServerVars::new(),
        }
    }

    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut RouterConfig {
        &mut self.config
    }

    /// Registers a parameter filter for `token`
    pub fn with_filter<F>(mut self, token: impl Into<String>, filter: F) -> Self
    where
        F: Fn(&str) -> FilterResult + Send + Sync + 'static,
    {
        self.filters.insert(token, filter);
        self
    }

    pub fn filters(&self) -> &FilterTable {
        &self.filters
    }

    /// Reads a CGI variable by name
    pub fn server(&self, name: &str) -> Result<Option<&str>, ConfigError> {
        Ok(self.server.get(name.parse()?))
    }

    /// Sets a CGI variable by name
    pub fn set_server(&mut self, name: &str, value: impl Into<String>) -> Result<&mut Self, ConfigError> {
        self.server.set(name.parse()?, value)?;
        Ok(self)
    }

    pub fn server_vars(&self) -> &ServerVars {
        &self.server
    }

    /// Copies the known CGI variables from the process environment
    pub fn import_env(&mut self) -> Result<&mut Self, ConfigError> {
        for var in ServerVar::ALL {
            if let Ok(value) = std::env::var(var.name()) {
                self.server.set(var, value)?;
            }
        }
        Ok(self)
    }

    /// Resolves the request against the real file system
    ///
    /// `request_uri` overrides `REQUEST_URI` when given.
    pub fn prepare(&self, request_uri: Option<&str>) -> Result<PreparedRequest, PrepareError> {
        self.prepare_with(&DiskFs::new(), request_uri)
    }

    pub fn prepare_with(
        &self,
        fs: &dyn FileSystem,
        request_uri: Option<&str>,
    ) -> Result<PreparedRequest, PrepareError> {
        let request_uri = match request_uri {
            Some(uri) => uri,
            None => self
                .server
                .get(ServerVar::RequestUri)
                .ok_or(ConfigError::MissingRequestUri)?,
        };

        let document_root = self
            .server
            .get(ServerVar::DocumentRoot)
            .ok_or(ConfigError::MissingDocumentRoot)?;

        let uri = split_request_uri(request_uri)
            .ok_or_else(|| ConfigError::InvalidRequestUri(request_uri.to_string()))?;

        let config = self
            .config
            .to_resolution_config(document_root, self.filters.clone());
        let result = FallbackResolver::new(fs, &config).resolve(uri.path)?;

        let root = normalize_document_root(document_root);
        let include_path = result.file_path();

        let mut virtual_uri = format!("{}{}", include_path, result.path_info);
        if !uri.query.is_empty() {
            virtual_uri.push('?');
            virtual_uri.push_str(uri.query);
        }

        let mut server = ServerVars::new();
        server.set(ServerVar::DocumentRoot, document_root)?;
        server.set(ServerVar::RequestUri, request_uri)?;
        if !result.path_info.is_empty() {
            server.set(ServerVar::PathInfo, result.path_info.as_str())?;
            server.set(ServerVar::PathTranslated, format!("{}{}", root, result.path_info))?;
        }
        if !result.script_name.is_empty() {
            server.set(ServerVar::ScriptName, result.script_name.as_str())?;
            server.set(ServerVar::PhpSelf, result.php_self())?;
            server.set(ServerVar::ScriptFilename, format!("{}{}", root, result.script_name))?;
        }

        debug!(request_uri, include_path = %include_path, "prepared request");

        Ok(PreparedRequest {
            translate_directory: format!("{}{}", root, result.translate_directory),
            include_file: format!("{}{}", root, include_path),
            virtual_uri,
            extension: result.extension,
            parameters: result.parameters,
            query_string: uri.query.to_string(),
            fragment: uri.fragment.to_string(),
            server,
        })
    }
}
