//! Fallback script resolution
//!
//! When a request path resolves to nothing, a configured fallback script
//! gets one more chance. A root-relative script (`/temp/fallback.php`) is
//! resolved like any request path. A bare file name (`fallback.php`) is
//! looked up where resolution stopped, then one level up if resolution
//! stopped inside a parameter directory.
//!
//! Invalid parameters are never retried.

use tracing::{debug, info};

use crate::config::{FallbackScript, ResolutionConfig};
use crate::error::RouteError;
use crate::probe::{find_file, FileSystem};
use crate::resolve::{PathResolver, ResolutionResult, ResolvedFile, Stuck, Walk};

#[derive(Clone, Copy)]
pub struct FallbackResolver<'a> {
    resolver: PathResolver<'a>,
}

impl<'a> FallbackResolver<'a> {
    pub fn new(fs: &'a dyn FileSystem, config: &'a ResolutionConfig) -> Self {
        Self {
            resolver: PathResolver::new(fs, config),
        }
    }

    /// Resolves `request_path`, falling back to the configured script
    ///
    /// # Examples
    ///
    /// ```
    /// use pathwalk_router::{FallbackResolver, ResolutionConfig};
    /// use pathwalk_router::probe::MemoryFs;
    ///
    /// let fs = MemoryFs::new()
    ///     .with_file("/www/organizations/index.php")
    ///     .with_file("/www/organizations/%VAR%/detail.php");
    /// let config = ResolutionConfig::new("/www").with_fallback_script("index.php");
    ///
    /// let result = FallbackResolver::new(&fs, &config)
    ///     .resolve("/organizations/registration")
    ///     .unwrap();
    /// assert_eq!(result.script_name, "/organizations/index.php");
    /// ```
    pub fn resolve(&self, request_path: &str) -> Result<ResolutionResult, RouteError> {
        let stuck = match self.resolver.walk(request_path)? {
            Walk::Resolved(result) => return Ok(result),
            Walk::Stuck(stuck) => stuck,
        };

        let Some(fallback) = &self.resolver.config().fallback_script else {
            return Err(stuck.into_error(request_path));
        };

        info!(request_path, fallback = fallback.as_str(), "using fallback script");

        match fallback {
            FallbackScript::RootRelative(script) => self.resolver.resolve(script),
            FallbackScript::FileName(name) => self.resolve_file_name(stuck, name),
        }
    }

    fn resolve_file_name(&self, stuck: Stuck<'_>, name: &str) -> Result<ResolutionResult, RouteError> {
        let terminal = stuck.terminal_index();
        let fs = self.resolver.fs();

        let directory = self.resolver.directory(&stuck.state);
        if let Some(filename) = find_file(fs, &directory, name, &[])? {
            return Ok(stuck
                .state
                .into_result(ResolvedFile::new(filename), terminal, &stuck.segments));
        }

        if let Some(up) = stuck.state.leave_parameter_directory() {
            let directory = self.resolver.directory(&up);
            debug!(
                directory = %directory,
                fallback = name,
                parameters = up.parameters().len(),
                "retrying fallback above parameter directory"
            );
            if let Some(filename) = find_file(fs, &directory, name, &[])? {
                return Ok(up.into_result(ResolvedFile::new(filename), terminal, &stuck.segments));
            }
        }

        Err(RouteError::not_found(None, name))
    }
}
