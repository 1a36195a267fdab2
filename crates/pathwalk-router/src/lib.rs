//! # Pathwalk Router
//!
//! Directory-tree request routing. A request path is resolved segment by
//! segment against a document root:
//! - Real directories and files (`/about/team` → `about/team.php`)
//! - Routing extensions (`/detail.json` → `detail.php`, extension `json`)
//! - Fixed-name parameter directories (`/categories/1` → `categories/%VAR%`)
//! - Validated parameter directories (`/users/42` → `users/{%digit%}`)
//! - Directory indexes (`/categories/1/` → `categories/%VAR%/index.php`)
//! - Path info after the resolved file (`/detail.php/foo/bar`)
//! - A fallback script when nothing matches
//!
//! ## Path Normalization
//!
//! - `.` segments are dropped
//! - `..` removes the previous segment, but never climbs above the root
//! - Empty segments (`//`, trailing `/`) stay in the current directory
//!
//! ## File System
//!
//! Resolution only asks read-only questions through the
//! [`FileSystem`](probe::FileSystem) oracle. [`DiskFs`] answers them from
//! disk, [`MemoryFs`] from an in-memory tree.
//!
//! ## Example
//!
//! ```
//! use pathwalk_router::{resolve_with, ParamValue, ResolutionConfig};
//! use pathwalk_router::probe::MemoryFs;
//!
//! let fs = MemoryFs::new()
//!     .with_file("/www/users/{%digit%}/profiles/{%profile_id%}/index.php");
//!
//! let config = ResolutionConfig::new("/www")
//!     .with_parameter_delimiters("{%", "%}")
//!     .with_filter("digit", |value: &str| Ok(value.parse::<i64>().ok().map(ParamValue::Int)))
//!     .with_filter("profile_id", |value: &str| Ok(Some(ParamValue::from(value))));
//!
//! let result = resolve_with(&fs, "/users/1/profiles/k-holy", &config).unwrap();
//! assert_eq!(result.translate_directory, "/users/{%digit%}/profiles/{%profile_id%}");
//! assert_eq!(result.script_name, "/users/1/profiles/k-holy/index.php");
//! assert_eq!(result.parameters, vec![ParamValue::Int(1), ParamValue::from("k-holy")]);
//! ```

// ============================================================================
// Module Declarations
// ============================================================================

pub mod config;
mod error;
mod fallback;
pub mod param;
pub mod path;
pub mod probe;
mod resolve;
mod router;

pub use config::{parse_extension_list, ConfigKey, FallbackScript, ResolutionConfig, RouterConfig};
pub use error::{ConfigError, PrepareError, RouteError};
pub use fallback::FallbackResolver;
pub use param::{CharClass, FilterError, FilterResult, FilterTable, ParamValue, ParameterFilter};
pub use probe::{DiskFs, FileSystem, MemoryFs};
pub use resolve::{PathResolver, ResolutionResult};
pub use router::{PreparedRequest, Router, ServerVar, ServerVars};

// ============================================================================
// Entry Points
// ============================================================================

/// Resolves `request_path` against the real file system, with fallback
///
/// `request_path` must already be stripped of scheme, host, query string and
/// fragment (see [`path::split_request_uri`]).
pub fn resolve(request_path: &str, config: &ResolutionConfig) -> Result<ResolutionResult, RouteError> {
    resolve_with(&DiskFs::new(), request_path, config)
}

/// Resolves `request_path` through the given file-system oracle, with fallback
pub fn resolve_with(
    fs: &dyn FileSystem,
    request_path: &str,
    config: &ResolutionConfig,
) -> Result<ResolutionResult, RouteError> {
    FallbackResolver::new(fs, config).resolve(request_path)
}
