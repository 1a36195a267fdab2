//! In-memory file-system oracle
//!
//! Lets the resolver run without touching disk. Useful for tests and for
//! callers that route against a virtual tree.

use std::collections::BTreeMap;
use std::io;

use super::FileSystem;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Node {
    File,
    Dir,
}

/// Virtual directory tree keyed by absolute `/`-separated path
///
/// Adding an entry creates all of its parent directories.
///
/// # Examples
///
/// ```
/// use pathwalk_router::probe::{FileSystem, MemoryFs};
///
/// let fs = MemoryFs::new()
///     .with_file("/www/categories/%VAR%/detail.php")
///     .with_dir("/www/users/{%digit%}");
///
/// assert!(fs.is_dir("/www/categories/%VAR%").unwrap());
/// assert!(fs.is_file("/www/categories/%VAR%/detail.php").unwrap());
/// assert_eq!(fs.list_dirs("/www/users").unwrap(), vec!["{%digit%}"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryFs {
    nodes: BTreeMap<String, Node>,
}

impl MemoryFs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a directory (and its parents)
    pub fn with_dir(mut self, path: &str) -> Self {
        self.insert(path, Node::Dir);
        self
    }

    /// Adds a regular file (and its parent directories)
    pub fn with_file(mut self, path: &str) -> Self {
        self.insert(path, Node::File);
        self
    }

    fn insert(&mut self, path: &str, node: Node) {
        let path = path.trim_end_matches('/');
        if path.is_empty() {
            return;
        }
        let mut end = 0;
        while let Some(pos) = path[end + 1..].find('/') {
            end += pos + 1;
            self.nodes.insert(path[..end].to_string(), Node::Dir);
        }
        self.nodes.insert(path.to_string(), node);
    }

    fn node(&self, path: &str) -> Option<Node> {
        self.nodes.get(path.trim_end_matches('/')).copied()
    }
}

impl FileSystem for MemoryFs {
    fn is_file(&self, path: &str) -> io::Result<bool> {
        Ok(self.node(path) == Some(Node::File))
    }

    fn is_dir(&self, path: &str) -> io::Result<bool> {
        Ok(self.node(path) == Some(Node::Dir))
    }

    fn list_dirs(&self, dir: &str) -> io::Result<Vec<String>> {
        let prefix = format!("{}/", dir.trim_end_matches('/'));

        // BTreeMap iteration is already byte-wise sorted
        Ok(self
            .nodes
            .range(prefix.clone()..)
            .take_while(|(path, _)| path.starts_with(&prefix))
            .filter(|(_, node)| **node == Node::Dir)
            .filter_map(|(path, _)| {
                let name = &path[prefix.len()..];
                (!name.is_empty() && !name.contains('/')).then(|| name.to_string())
            })
            .collect())
    }
}
