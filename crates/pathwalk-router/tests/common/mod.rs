//! Shared on-disk document root for integration tests

#![allow(dead_code)]

use std::fs;
use std::path::Path;

use tempfile::TempDir;

/// Files of the test site, relative to the document root
const FILES: &[&str] = &[
    "index.php",
    "test.php",
    "test.html",
    "categories/%VAR%/index.php",
    "categories/%VAR%/detail.php",
    "categories/%VAR%/modify.php",
    "categories/%VAR%/items/%VAR%/index.php",
    "users/{%digit%}/index.php",
    "users/{%alpha%}/index.php",
    "users/{%digit%}/profiles/{%profile_id%}/index.php",
    ".foo.bar.baz/%VAR%/.foo.bar.baz.php",
    "organizations/index.php",
    "organizations/%VAR%/detail.php",
];

/// Empty directories of the test site
const DIRS: &[&str] = &["temp/sub"];

/// Temporary document root, removed on drop
pub struct Site {
    dir: TempDir,
}

impl Site {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();

        for file in FILES {
            write(&dir.path().join(file), "<?php\n");
        }
        for sub in DIRS {
            fs::create_dir_all(dir.path().join(sub)).unwrap();
        }

        Self { dir }
    }

    /// Document root as a `/`-separated string
    pub fn root(&self) -> String {
        self.dir.path().to_string_lossy().replace('\\', "/")
    }

    /// Adds a file below the document root
    pub fn touch(&self, relative: &str) {
        write(&self.dir.path().join(relative), "<?php\n");
    }
}

fn write(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}
