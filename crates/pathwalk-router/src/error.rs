//! Error types for resolution and configuration

use std::io;

use thiserror::Error;

/// Failure of a single resolution attempt
///
/// `NotFound` is the only kind the fallback script can recover from.
/// `InvalidParameter` always aborts the attempt.
#[derive(Debug, Error)]
pub enum RouteError {
    #[error("{}", not_found_message(.segment, .path))]
    NotFound {
        /// Segment no rule matched, `None` when the whole path ran out
        segment: Option<String>,
        /// Request path (or fallback path) being resolved
        path: String,
    },

    #[error("{}", invalid_parameter_message(.segment, .path, .reason))]
    InvalidParameter {
        segment: String,
        path: String,
        /// Message raised by a parameter filter, if any
        reason: Option<String>,
    },

    #[error("I/O error while probing \"{path}\": {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
}

impl RouteError {
    pub(crate) fn not_found(segment: Option<&str>, path: &str) -> Self {
        RouteError::NotFound {
            segment: segment.map(str::to_string),
            path: path.to_string(),
        }
    }

    pub(crate) fn io(path: impl Into<String>, source: io::Error) -> Self {
        RouteError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, RouteError::NotFound { .. })
    }

    pub fn is_invalid_parameter(&self) -> bool {
        matches!(self, RouteError::InvalidParameter { .. })
    }
}

fn not_found_message(segment: &Option<String>, path: &str) -> String {
    match segment {
        Some(segment) => format!(
            "the file that corresponds to segment \"{}\" is not found in request path \"{}\"",
            segment, path
        ),
        None => format!("the file that corresponds to request path \"{}\" is not found", path),
    }
}

fn invalid_parameter_message(segment: &str, path: &str, reason: &Option<String>) -> String {
    let base = format!(
        "the parameter segment \"{}\" is not valid in request path \"{}\"",
        segment, path
    );
    match reason {
        Some(reason) => format!("{}: {}", base, reason),
        None => base,
    }
}

/// Malformed configuration or request environment, detected before resolution
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("the config key \"{0}\" is not accepted")]
    UnknownKey(String),

    #[error("the config key \"{key}\" only accepts {expected}")]
    InvalidType { key: String, expected: &'static str },

    #[error("the server variable \"{0}\" is not accepted")]
    UnknownServerVar(String),

    #[error("the request URI \"{0}\" is not valid")]
    InvalidRequestUri(String),

    #[error("DOCUMENT_ROOT is not set")]
    MissingDocumentRoot,

    #[error("REQUEST_URI is not set")]
    MissingRequestUri,

    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config {origin}: {source}")]
    Parse {
        origin: String,
        #[source]
        source: toml::de::Error,
    },
}

/// Error returned by [`Router::prepare`](crate::Router::prepare)
#[derive(Debug, Error)]
pub enum PrepareError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Route(#[from] RouteError),
}

impl PrepareError {
    /// Returns the routing failure, if this is one
    pub fn route_error(&self) -> Option<&RouteError> {
        match self {
            PrepareError::Route(err) => Some(err),
            PrepareError::Config(_) => None,
        }
    }
}
