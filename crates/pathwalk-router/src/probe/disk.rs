//! Real file-system oracle backed by `std::fs`

use std::fs;
use std::io;
use std::path::Path;

use super::{absent_as_none, FileSystem};

/// File-system oracle reading the local disk
///
/// Stateless: every call stats the disk again, nothing is cached between
/// requests.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiskFs;

impl DiskFs {
    pub fn new() -> Self {
        Self
    }
}

impl FileSystem for DiskFs {
    fn is_file(&self, path: &str) -> io::Result<bool> {
        Ok(absent_as_none(fs::metadata(Path::new(path)))?
            .map(|meta| meta.is_file())
            .unwrap_or(false))
    }

    fn is_dir(&self, path: &str) -> io::Result<bool> {
        Ok(absent_as_none(fs::metadata(Path::new(path)))?
            .map(|meta| meta.is_dir())
            .unwrap_or(false))
    }

    fn list_dirs(&self, dir: &str) -> io::Result<Vec<String>> {
        let Some(entries) = absent_as_none(fs::read_dir(Path::new(dir)))? else {
            return Ok(Vec::new());
        };

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry?;
            // An entry removed or re-pointed since the listing simply drops out
            let is_dir = absent_as_none(fs::metadata(entry.path()))?
                .map(|meta| meta.is_dir())
                .unwrap_or(false);
            if !is_dir {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                names.push(name.to_string());
            }
        }

        names.sort();
        Ok(names)
    }
}
