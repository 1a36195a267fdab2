//! Path utilities for segment extraction and normalization
//!
//! All functions are **pure**: given same input, always produce same output with no side effects.

pub mod uri;
pub use uri::{split_request_uri, RequestUri};

/// Collapses `.` and `..` in a slash-delimited path into its literal segments
///
/// **Pure function**: no I/O, borrows every segment from the input.
///
/// # Rules
///
/// - `.` is dropped
/// - `..` removes the previously retained segment, but only when at least two
///   segments are retained (the leading empty segment counts), otherwise it is dropped
/// - Empty segments are kept (they come from a leading, doubled or trailing `/`)
/// - The first retained segment, which stands for the leading `/`, is removed
///
/// # Examples
///
/// ```
/// use pathwalk_router::path::normalize_segments;
///
/// assert_eq!(normalize_segments("/categories/1/"), vec!["categories", "1", ""]);
/// assert_eq!(normalize_segments("/a/./b/../c"), vec!["a", "c"]);
/// assert_eq!(normalize_segments("/../../"), vec![""]);
/// assert!(normalize_segments("").is_empty());
/// ```
pub fn normalize_segments(path: &str) -> Vec<&str> {
    let mut segments = path.split('/').fold(Vec::new(), |mut retained, segment| {
        match segment {
            "." => {}
            ".." => {
                if retained.len() >= 2 {
                    retained.pop();
                }
            }
            _ => retained.push(segment),
        }
        retained
    });

    if !segments.is_empty() {
        segments.remove(0);
    }
    segments
}

/// Normalizes a document root: backslashes become `/`, trailing `/` is stripped
///
/// # Examples
///
/// ```
/// use pathwalk_router::path::normalize_document_root;
///
/// assert_eq!(normalize_document_root("/var/www/"), "/var/www");
/// assert_eq!(normalize_document_root("C:\\sites\\app"), "C:/sites/app");
/// ```
pub fn normalize_document_root(root: &str) -> String {
    root.replace('\\', "/").trim_end_matches('/').to_string()
}

/// Joins a directory and an entry name with a single `/`
pub(crate) fn join(dir: &str, name: &str) -> String {
    format!("{}/{}", dir, name)
}

/// Splits off the last `/`-separated component, returning the parent
///
/// Returns `None` when there is no separator left to strip.
pub(crate) fn parent(path: &str) -> Option<&str> {
    path.rfind('/').map(|pos| &path[..pos])
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("/", vec![""])]
    #[case("/about", vec!["about"])]
    #[case("/categories/1/detail.json/foo/bar", vec!["categories", "1", "detail.json", "foo", "bar"])]
    #[case("/categories/1/", vec!["categories", "1", ""])]
    #[case("/categories/1/../../categories/1/", vec!["categories", "1", ""])]
    #[case("/../../../", vec![""])]
    #[case("/./.", Vec::<&str>::new())]
    #[case("/a//b", vec!["a", "", "b"])]
    #[case("/.foo.bar.baz/1", vec![".foo.bar.baz", "1"])]
    fn test_normalize_segments(#[case] path: &str, #[case] expected: Vec<&str>) {
        assert_eq!(normalize_segments(path), expected);
    }

    #[test]
    fn test_single_leading_parent_is_noop() {
        // Only the leading empty segment is retained, so `..` cannot pop it
        assert_eq!(normalize_segments("/../a"), vec!["a"]);
        // Two retained segments: `..` pops `a`
        assert_eq!(normalize_segments("/a/.."), Vec::<&str>::new());
    }

    #[test]
    fn test_relative_path_loses_first_segment() {
        assert!(normalize_segments("index.php").is_empty());
        assert_eq!(normalize_segments("a/b"), vec!["b"]);
    }

    #[test]
    fn test_normalize_segments_is_restartable() {
        let first = normalize_segments("/x/y/../z");
        let second = normalize_segments("/x/y/../z");
        assert_eq!(first, second);
    }

    #[test]
    fn test_normalize_document_root() {
        assert_eq!(normalize_document_root("/srv/www"), "/srv/www");
        assert_eq!(normalize_document_root("/srv/www///"), "/srv/www");
        assert_eq!(normalize_document_root("\\srv\\www\\"), "/srv/www");
    }

    #[test]
    fn test_parent() {
        assert_eq!(parent("/organizations/%VAR%"), Some("/organizations"));
        assert_eq!(parent("/%VAR%"), Some(""));
        assert_eq!(parent(""), None);
    }
}
