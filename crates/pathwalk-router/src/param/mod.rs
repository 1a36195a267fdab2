//! Parameter directories
//!
//! A parameter directory stands in for a dynamic path segment. Besides the
//! fixed-name directory (handled by the resolver), directories named
//! `LEFT + type + RIGHT` (e.g. `{%digit%}`) match a segment when the
//! segment passes the validator registered for `type`.

use tracing::{debug, warn};

use crate::error::RouteError;
use crate::probe::{list_directories, FileSystem};

mod class;
mod filter;
mod value;

pub use class::CharClass;
pub use filter::{FilterError, FilterResult, FilterTable, ParameterFilter};
pub use value::ParamValue;

/// Outcome of searching a directory for delimiter-named parameter directories
#[derive(Debug, Clone, PartialEq)]
pub enum ParamMatch {
    /// No delimiter-named directory exists here
    Absent,
    /// A candidate accepted the segment
    Accepted {
        value: ParamValue,
        /// Literal directory name on disk to descend into
        directory: String,
    },
    /// Candidates exist but none accepted the segment
    Rejected {
        /// Message raised by a filter that aborted the scan
        reason: Option<String>,
    },
}

/// Extracts the parameter-type token from a directory name
///
/// Returns `None` when the name is not wrapped in both delimiters.
///
/// # Examples
///
/// ```
/// use pathwalk_router::param::parameter_type;
///
/// assert_eq!(parameter_type("{%digit%}", "{%", "%}"), Some("digit"));
/// assert_eq!(parameter_type("digit", "{%", "%}"), None);
/// ```
pub fn parameter_type<'a>(name: &'a str, left: &str, right: &str) -> Option<&'a str> {
    name.strip_prefix(left)?.strip_suffix(right)
}

/// Searches `dir` for a delimiter-named directory accepting `segment`
///
/// Candidates are visited in sorted name order and the first acceptance
/// wins. For each candidate's type token:
/// 1. a user filter, if registered, decides (`Some` accepts, `None` moves on,
///    an error rejects the whole scan)
/// 2. otherwise a built-in [`CharClass`] of that name validates the raw segment
/// 3. otherwise the candidate is skipped
pub fn match_parameter_directory(
    fs: &dyn FileSystem,
    dir: &str,
    segment: &str,
    left: &str,
    right: &str,
    filters: &FilterTable,
) -> Result<ParamMatch, RouteError> {
    let candidates: Vec<(String, String)> = list_directories(fs, dir)?
        .into_iter()
        .filter_map(|name| {
            let token = parameter_type(&name, left, right)?.to_string();
            Some((name, token))
        })
        .collect();

    if candidates.is_empty() {
        return Ok(ParamMatch::Absent);
    }

    for (directory, token) in candidates {
        if let Some(filter) = filters.get(&token) {
            match filter.apply(segment) {
                Ok(Some(value)) => {
                    debug!(directory = %directory, segment, "parameter accepted by filter");
                    return Ok(ParamMatch::Accepted { value, directory });
                }
                Ok(None) => continue,
                Err(e) => {
                    warn!(directory = %directory, segment, error = %e, "parameter filter raised");
                    return Ok(ParamMatch::Rejected {
                        reason: Some(e.message().to_string()),
                    });
                }
            }
        }

        if let Some(class) = CharClass::from_token(&token) {
            if class.validate(segment) {
                debug!(directory = %directory, segment, class = class.name(), "parameter accepted by character class");
                return Ok(ParamMatch::Accepted {
                    value: ParamValue::from(segment),
                    directory,
                });
            }
        }
    }

    Ok(ParamMatch::Rejected { reason: None })
}
