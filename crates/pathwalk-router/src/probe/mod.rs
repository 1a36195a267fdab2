//! File-system probing
//!
//! Resolution only ever asks three read-only questions of the file system,
//! captured by the [`FileSystem`] oracle:
//! - is this path a regular file?
//! - is this path a directory?
//! - which subdirectories does this directory contain?
//!
//! "Does not exist" is a normal answer (`Ok(false)` / empty listing); any
//! other I/O failure is fatal for the resolution attempt.

use std::io;

use tracing::trace;

use crate::error::RouteError;
use crate::path::join;

mod disk;
mod memory;

pub use disk::DiskFs;
pub use memory::MemoryFs;

/// Read-only file-system oracle consulted during resolution
///
/// Paths are `/`-separated strings regardless of platform.
pub trait FileSystem {
    /// Returns whether `path` exists and is a regular file (symlinks followed)
    fn is_file(&self, path: &str) -> io::Result<bool>;

    /// Returns whether `path` exists and is a directory (symlinks followed)
    fn is_dir(&self, path: &str) -> io::Result<bool>;

    /// Lists the base names of the subdirectories of `dir`, in byte-wise sorted order
    ///
    /// A missing `dir` yields an empty listing.
    fn list_dirs(&self, dir: &str) -> io::Result<Vec<String>>;
}

/// Finds the first regular file in `dir` matching `base_name`
///
/// Each extension is tried in order as `base_name.extension`; when none
/// matches (or `extensions` is empty) `base_name` itself is tested.
/// Returns the matching file name, or `None` if nothing exists.
///
/// # Examples
///
/// ```
/// use pathwalk_router::probe::{find_file, MemoryFs};
///
/// let fs = MemoryFs::new()
///     .with_file("/www/test.html")
///     .with_file("/www/test.php");
/// let exts = vec!["html".to_string(), "php".to_string()];
///
/// assert_eq!(find_file(&fs, "/www", "test", &exts).unwrap(), Some("test.html".to_string()));
/// assert_eq!(find_file(&fs, "/www", "test.php", &[]).unwrap(), Some("test.php".to_string()));
/// assert_eq!(find_file(&fs, "/www", "missing", &exts).unwrap(), None);
/// ```
pub fn find_file(
    fs: &dyn FileSystem,
    dir: &str,
    base_name: &str,
    extensions: &[String],
) -> Result<Option<String>, RouteError> {
    for extension in extensions {
        let candidate = format!("{}.{}", base_name, extension);
        if probe_file(fs, dir, &candidate)? {
            return Ok(Some(candidate));
        }
    }

    Ok(probe_file(fs, dir, base_name)?.then(|| base_name.to_string()))
}

/// Returns whether `dir/name` is an existing directory
pub fn is_directory(fs: &dyn FileSystem, dir: &str, name: &str) -> Result<bool, RouteError> {
    let path = join(dir, name);
    let found = fs.is_dir(&path).map_err(|e| RouteError::io(path.as_str(), e))?;
    trace!(path = %path, found, "probe directory");
    Ok(found)
}

/// Lists subdirectories of `dir`, mapping I/O failures to [`RouteError::Io`]
pub fn list_directories(fs: &dyn FileSystem, dir: &str) -> Result<Vec<String>, RouteError> {
    fs.list_dirs(dir).map_err(|e| RouteError::io(dir, e))
}

fn probe_file(fs: &dyn FileSystem, dir: &str, name: &str) -> Result<bool, RouteError> {
    let path = join(dir, name);
    let found = fs.is_file(&path).map_err(|e| RouteError::io(path.as_str(), e))?;
    trace!(path = %path, found, "probe file");
    Ok(found)
}

/// Maps "does not exist" style errors to `Ok(None)`
pub(crate) fn absent_as_none<T>(result: io::Result<T>) -> io::Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if matches!(e.kind(), io::ErrorKind::NotFound | io::ErrorKind::NotADirectory) => {
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct BrokenFs;

    impl FileSystem for BrokenFs {
        fn is_file(&self, _path: &str) -> io::Result<bool> {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"))
        }

        fn is_dir(&self, _path: &str) -> io::Result<bool> {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"))
        }

        fn list_dirs(&self, _dir: &str) -> io::Result<Vec<String>> {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"))
        }
    }

    fn exts(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_find_file_extension_order() {
        let fs = MemoryFs::new()
            .with_file("/www/test.php")
            .with_file("/www/test.html");

        assert_eq!(
            find_file(&fs, "/www", "test", &exts(&["html", "php"])).unwrap(),
            Some("test.html".to_string())
        );
        assert_eq!(
            find_file(&fs, "/www", "test", &exts(&["php", "html"])).unwrap(),
            Some("test.php".to_string())
        );
    }

    #[test]
    fn test_find_file_falls_back_to_bare_name() {
        let fs = MemoryFs::new().with_file("/www/README");
        assert_eq!(
            find_file(&fs, "/www", "README", &exts(&["php"])).unwrap(),
            Some("README".to_string())
        );
    }

    #[test]
    fn test_find_file_ignores_directories() {
        let fs = MemoryFs::new().with_dir("/www/test.php");
        assert_eq!(find_file(&fs, "/www", "test", &exts(&["php"])).unwrap(), None);
    }

    #[test]
    fn test_io_errors_are_fatal() {
        let err = find_file(&BrokenFs, "/www", "test", &[]).unwrap_err();
        assert!(matches!(err, RouteError::Io { ref path, .. } if path == "/www/test"));

        assert!(is_directory(&BrokenFs, "/www", "sub").is_err());
        assert!(list_directories(&BrokenFs, "/www").is_err());
    }

    #[test]
    fn test_absent_as_none() {
        let missing: io::Result<()> = Err(io::Error::from(io::ErrorKind::NotFound));
        assert!(absent_as_none(missing).unwrap().is_none());

        let denied: io::Result<()> = Err(io::Error::from(io::ErrorKind::PermissionDenied));
        assert!(absent_as_none(denied).is_err());
    }
}
