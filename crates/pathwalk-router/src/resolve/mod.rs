//! Segment-by-segment request path resolution
//!
//! The normalized request path is walked against the document root. At each
//! segment the ordered match strategies decide whether to descend into a
//! directory (real or parameter), stay, or stop at a file. When the segments
//! run out without a file, the directory index is tried.

use serde::Serialize;
use tracing::debug;

use crate::config::ResolutionConfig;
use crate::error::RouteError;
use crate::param::ParamValue;
use crate::path::normalize_segments;
use crate::probe::{find_file, FileSystem};

mod state;
mod strategy;

pub(crate) use state::{ResolveState, ResolvedFile};
use strategy::{SegmentContext, Step, STRATEGIES};

/// Successful resolution of a request path
///
/// `translate_directory` and `script_name` are relative to the document
/// root. The first uses disk-literal directory names, the second the
/// request's own segments.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolutionResult {
    pub translate_directory: String,
    pub script_name: String,
    pub filename: String,
    pub path_info: String,
    pub extension: Option<String>,
    pub parameters: Vec<ParamValue>,
}

impl ResolutionResult {
    /// Parameter extracted from the `index`-th parameter directory
    pub fn parameter(&self, index: usize) -> Option<&ParamValue> {
        self.parameters.get(index)
    }

    pub fn parameters(&self) -> &[ParamValue] {
        &self.parameters
    }

    /// Disk-literal path of the file, relative to the document root
    pub fn file_path(&self) -> String {
        format!("{}/{}", self.translate_directory, self.filename)
    }

    /// `script_name` followed by `path_info`
    pub fn php_self(&self) -> String {
        format!("{}{}", self.script_name, self.path_info)
    }
}

/// Where a walk ended
#[derive(Debug)]
pub(crate) enum Walk<'p> {
    Resolved(ResolutionResult),
    Stuck(Stuck<'p>),
}

/// A walk that found no file
#[derive(Debug)]
pub(crate) struct Stuck<'p> {
    pub(crate) state: ResolveState,
    pub(crate) segments: Vec<&'p str>,
    /// Index of the segment nothing matched; `None` when all were consumed
    pub(crate) failed_at: Option<usize>,
}

impl Stuck<'_> {
    /// Segment a file found from here would conclude at
    pub(crate) fn terminal_index(&self) -> usize {
        self.failed_at
            .unwrap_or_else(|| self.segments.len().saturating_sub(1))
    }

    pub(crate) fn into_error(self, request_path: &str) -> RouteError {
        let segment = self.failed_at.map(|index| self.segments[index]);
        RouteError::not_found(segment, request_path)
    }
}

/// Resolves request paths against one configuration
#[derive(Clone, Copy)]
pub struct PathResolver<'a> {
    fs: &'a dyn FileSystem,
    config: &'a ResolutionConfig,
}

impl<'a> PathResolver<'a> {
    pub fn new(fs: &'a dyn FileSystem, config: &'a ResolutionConfig) -> Self {
        Self { fs, config }
    }

    pub fn config(&self) -> &'a ResolutionConfig {
        self.config
    }

    pub(crate) fn fs(&self) -> &'a dyn FileSystem {
        self.fs
    }

    /// Resolves `request_path` without any fallback
    ///
    /// # Examples
    ///
    /// ```
    /// use pathwalk_router::{ParamValue, PathResolver, ResolutionConfig};
    /// use pathwalk_router::probe::MemoryFs;
    ///
    /// let fs = MemoryFs::new().with_file("/www/categories/%VAR%/detail.php");
    /// let config = ResolutionConfig::new("/www");
    ///
    /// let result = PathResolver::new(&fs, &config)
    ///     .resolve("/categories/1/detail.json/foo/bar")
    ///     .unwrap();
    /// assert_eq!(result.translate_directory, "/categories/%VAR%");
    /// assert_eq!(result.script_name, "/categories/1/detail.php");
    /// assert_eq!(result.extension.as_deref(), Some("json"));
    /// assert_eq!(result.path_info, "/foo/bar");
    /// assert_eq!(result.parameters, vec![ParamValue::from("1")]);
    /// ```
    pub fn resolve(&self, request_path: &str) -> Result<ResolutionResult, RouteError> {
        match self.walk(request_path)? {
            Walk::Resolved(result) => Ok(result),
            Walk::Stuck(stuck) => Err(stuck.into_error(request_path)),
        }
    }

    pub(crate) fn walk<'p>(&self, request_path: &'p str) -> Result<Walk<'p>, RouteError> {
        let segments = normalize_segments(request_path);
        let mut state = ResolveState::default();

        for (index, segment) in segments.iter().copied().enumerate() {
            match self.step(request_path, &state, segment)? {
                Step::Descend(next) => state = next,
                Step::Stay => {}
                Step::Terminate(file) => {
                    debug!(request_path, file = %file.filename, index, "resolved file");
                    return Ok(Walk::Resolved(state.into_result(file, index, &segments)));
                }
                Step::Skip => {
                    debug!(request_path, segment, index, script_name = state.script_name(), "no match for segment");
                    return Ok(Walk::Stuck(Stuck {
                        state,
                        segments,
                        failed_at: Some(index),
                    }));
                }
            }
        }

        let directory = self.directory(&state);
        let index = find_file(
            self.fs,
            &directory,
            &self.config.index_name,
            &self.config.index_extensions,
        )?;

        match index {
            Some(filename) => {
                debug!(request_path, file = %filename, "resolved directory index");
                let terminal = segments.len().saturating_sub(1);
                Ok(Walk::Resolved(state.into_result(
                    ResolvedFile::new(filename),
                    terminal,
                    &segments,
                )))
            }
            None => {
                debug!(request_path, directory = %directory, "no directory index");
                Ok(Walk::Stuck(Stuck {
                    state,
                    segments,
                    failed_at: None,
                }))
            }
        }
    }

    /// Absolute directory `state` points at
    pub(crate) fn directory(&self, state: &ResolveState) -> String {
        format!("{}{}", self.config.document_root, state.translate_directory())
    }

    fn step(&self, request_path: &str, state: &ResolveState, segment: &str) -> Result<Step, RouteError> {
        let ctx = SegmentContext {
            fs: self.fs,
            config: self.config,
            request_path,
            state,
            directory: self.directory(state),
            segment,
        };

        for (name, strategy) in STRATEGIES {
            let step = strategy(&ctx)?;
            if !matches!(step, Step::Skip) {
                debug!(segment, strategy = *name, "segment matched");
                return Ok(step);
            }
        }

        Ok(Step::Skip)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::param::FilterError;
    use crate::probe::MemoryFs;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn site() -> MemoryFs {
        MemoryFs::new()
            .with_file("/www/index.php")
            .with_file("/www/test.php")
            .with_file("/www/test.html")
            .with_file("/www/categories/%VAR%/index.php")
            .with_file("/www/categories/%VAR%/detail.php")
            .with_file("/www/categories/%VAR%/items/%VAR%/index.php")
            .with_file("/www/users/{%digit%}/index.php")
            .with_file("/www/users/{%alpha%}/index.php")
            .with_file("/www/users/{%digit%}/profiles/{%profile_id%}/index.php")
            .with_file("/www/.foo.bar.baz/%VAR%/.foo.bar.baz.php")
            .with_dir("/www/temp/sub")
    }

    fn resolve(path: &str, config: &ResolutionConfig) -> Result<ResolutionResult, RouteError> {
        PathResolver::new(&site(), config).resolve(path)
    }

    #[rstest]
    #[case("/", "", "/index.php", "")]
    #[case("/../../../", "", "/index.php", "")]
    #[case("/categories/1/", "/categories/%VAR%", "/categories/1/index.php", "")]
    #[case("/categories/1/../../categories/1/", "/categories/%VAR%", "/categories/1/index.php", "")]
    #[case("/categories/1//", "/categories/%VAR%", "/categories/1/index.php", "")]
    #[case("/categories/1/detail/extra", "/categories/%VAR%", "/categories/1/detail.php", "/extra")]
    #[case("/categories/1/items/2/", "/categories/%VAR%/items/%VAR%", "/categories/1/items/2/index.php", "")]
    #[case("/.foo.bar.baz/1/.foo.bar.baz", "/.foo.bar.baz/%VAR%", "/.foo.bar.baz/1/.foo.bar.baz.php", "")]
    fn test_resolution(
        #[case] path: &str,
        #[case] translate_directory: &str,
        #[case] script_name: &str,
        #[case] path_info: &str,
    ) {
        let result = resolve(path, &ResolutionConfig::new("/www")).unwrap();
        assert_eq!(result.translate_directory, translate_directory);
        assert_eq!(result.script_name, script_name);
        assert_eq!(result.path_info, path_info);
    }

    #[test]
    fn test_extension_substitution() {
        let result = resolve("/categories/1/detail.json/foo/bar", &ResolutionConfig::new("/www")).unwrap();
        assert_eq!(
            result,
            ResolutionResult {
                translate_directory: "/categories/%VAR%".to_string(),
                script_name: "/categories/1/detail.php".to_string(),
                filename: "detail.php".to_string(),
                path_info: "/foo/bar".to_string(),
                extension: Some("json".to_string()),
                parameters: vec![ParamValue::from("1")],
            }
        );
        assert_eq!(result.file_path(), "/categories/%VAR%/detail.php");
        assert_eq!(result.php_self(), "/categories/1/detail.php/foo/bar");
    }

    #[test]
    fn test_search_extension_order() {
        let config = ResolutionConfig::new("/www").with_search_extensions(["html", "php"]);
        assert_eq!(resolve("/test", &config).unwrap().filename, "test.html");

        let config = ResolutionConfig::new("/www").with_search_extensions(["php", "html"]);
        assert_eq!(resolve("/test", &config).unwrap().filename, "test.php");
    }

    #[test]
    fn test_exact_name_wins_over_substitution() {
        let result = resolve("/test.html", &ResolutionConfig::new("/www")).unwrap();
        assert_eq!(result.filename, "test.html");
        assert_eq!(result.extension, None);
    }

    #[test]
    fn test_delimited_parameters() {
        let config = ResolutionConfig::new("/www").with_parameter_delimiters("{%", "%}");

        let result = resolve("/users/1", &config).unwrap();
        assert_eq!(result.translate_directory, "/users/{%digit%}");
        assert_eq!(result.parameters, vec![ParamValue::from("1")]);

        let result = resolve("/users/kholy/", &config).unwrap();
        assert_eq!(result.translate_directory, "/users/{%alpha%}");
        assert_eq!(result.script_name, "/users/kholy/index.php");

        let err = resolve("/users/k-holy", &config).unwrap_err();
        assert!(err.is_invalid_parameter());
    }

    #[test]
    fn test_filters_transform_parameters() {
        let config = ResolutionConfig::new("/www")
            .with_parameter_delimiters("{%", "%}")
            .with_filter("digit", |value: &str| {
                Ok(value.parse::<i64>().ok().map(ParamValue::Int))
            })
            .with_filter("profile_id", |value: &str| {
                if value.contains('@') {
                    Err(FilterError::new("oh..."))
                } else {
                    Ok(Some(ParamValue::from(value)))
                }
            });

        let result = resolve("/users/1/profiles/k-holy", &config).unwrap();
        assert_eq!(result.parameter(0), Some(&ParamValue::Int(1)));
        assert_eq!(result.parameter(1), Some(&ParamValue::from("k-holy")));
        assert_eq!(result.parameter(2), None);

        match resolve("/users/1/profiles/invalid@id", &config).unwrap_err() {
            RouteError::InvalidParameter { segment, reason, .. } => {
                assert_eq!(segment, "invalid@id");
                assert_eq!(reason.as_deref(), Some("oh..."));
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_not_found_names_segment() {
        match resolve("/categories/1/missing/extra", &ResolutionConfig::new("/www")).unwrap_err() {
            RouteError::NotFound { segment, path } => {
                assert_eq!(segment.as_deref(), Some("missing"));
                assert_eq!(path, "/categories/1/missing/extra");
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_missing_index_is_not_found_for_whole_path() {
        match resolve("/temp/sub/", &ResolutionConfig::new("/www")).unwrap_err() {
            RouteError::NotFound { segment, path } => {
                assert_eq!(segment, None);
                assert_eq!(path, "/temp/sub/");
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_empty_root_without_index() {
        let fs = MemoryFs::new().with_dir("/www");
        let config = ResolutionConfig::new("/www");
        let err = PathResolver::new(&fs, &config).resolve("/..").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_directory_wins_over_file_of_same_name() {
        let fs = MemoryFs::new()
            .with_file("/www/test/index.php")
            .with_file("/www/test.php");
        let config = ResolutionConfig::new("/www");

        let result = PathResolver::new(&fs, &config).resolve("/test").unwrap();
        assert_eq!(result.translate_directory, "/test");
        assert_eq!(result.script_name, "/test/index.php");
    }

    #[test]
    fn test_file_wins_over_parameter_directory() {
        let fs = MemoryFs::new()
            .with_file("/www/a/b.php")
            .with_file("/www/a/%VAR%/index.php");
        let config = ResolutionConfig::new("/www");

        let result = PathResolver::new(&fs, &config).resolve("/a/b").unwrap();
        assert_eq!(result.script_name, "/a/b.php");
        assert!(result.parameters.is_empty());
    }

    #[test]
    fn test_fixed_parameter_directory_wins_over_delimited() {
        let fs = MemoryFs::new()
            .with_file("/www/p/%VAR%/index.php")
            .with_file("/www/p/{%digit%}/index.php");
        let config = ResolutionConfig::new("/www").with_parameter_delimiters("{%", "%}");

        let result = PathResolver::new(&fs, &config).resolve("/p/42").unwrap();
        assert_eq!(result.translate_directory, "/p/%VAR%");
        assert_eq!(result.script_name, "/p/42/index.php");
        assert_eq!(result.parameters, vec![ParamValue::from("42")]);
    }

    #[test]
    fn test_walk_reports_stuck_state() {
        let fs = site();
        let config = ResolutionConfig::new("/www");
        let resolver = PathResolver::new(&fs, &config);

        match resolver.walk("/temp/sub/not-found/more").unwrap() {
            Walk::Stuck(stuck) => {
                assert_eq!(stuck.failed_at, Some(2));
                assert_eq!(stuck.terminal_index(), 2);
                assert_eq!(stuck.state.translate_directory(), "/temp/sub");
                assert_eq!(resolver.directory(&stuck.state), "/www/temp/sub");
            }
            Walk::Resolved(result) => panic!("unexpected resolution {:?}", result),
        }
    }
}
