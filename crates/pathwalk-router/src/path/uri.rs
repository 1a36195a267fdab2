//! Request URI splitting
//!
//! Separates the path from scheme, authority, query string and fragment.
//! Scheme and authority (host and port) are discarded.

use once_cell::sync::Lazy;
use regex::Regex;

static REQUEST_URI_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\A(?:[^:/?#]+:)*(?://[^/?#]*)*([^?#]*)(?:\?([^#]*))?(?:#(.*))?\z")
        .expect("request URI pattern compiles")
});

/// Components of a request URI, borrowed from the input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestUri<'a> {
    pub path: &'a str,
    pub query: &'a str,
    pub fragment: &'a str,
}

/// Splits a request URI into path, query string and fragment
///
/// Returns `None` when the URI cannot be split (for example a line break
/// inside the fragment).
///
/// # Examples
///
/// ```
/// use pathwalk_router::path::split_request_uri;
///
/// let uri = split_request_uri("http://example.com:8080/categories/1/?foo=bar#1").unwrap();
/// assert_eq!(uri.path, "/categories/1/");
/// assert_eq!(uri.query, "foo=bar");
/// assert_eq!(uri.fragment, "1");
/// ```
pub fn split_request_uri(uri: &str) -> Option<RequestUri<'_>> {
    let caps = REQUEST_URI_REGEX.captures(uri)?;
    let group = |i| caps.get(i).map(|m| m.as_str()).unwrap_or("");

    Some(RequestUri {
        path: group(1),
        query: group(2),
        fragment: group(3),
    })
}
