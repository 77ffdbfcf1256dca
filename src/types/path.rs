//! RelativePath - Identity key for entries under a tree root

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::path::{Component, Path, PathBuf};

/// Location of a file or folder relative to its tree root.
///
/// Only normal components are kept, so `a/b`, `a//b` and `./a/b` are the same
/// key. Ordering is component-wise, which puts a folder right before its own
/// contents.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RelativePath(PathBuf);

impl RelativePath {
    /// Normalize `path` lexically. Root and prefix components are dropped and
    /// `..` pops the previous component.
    pub fn new(path: impl AsRef<Path>) -> Self {
        let mut normalized = PathBuf::new();
        for component in path.as_ref().components() {
            match component {
                Component::Normal(part) => normalized.push(part),
                Component::ParentDir => {
                    normalized.pop();
                }
                Component::CurDir | Component::RootDir | Component::Prefix(_) => {}
            }
        }
        Self(normalized)
    }

    /// Express `full` relative to `root`, or `None` when it lies outside it.
    pub fn from_root(root: &Path, full: &Path) -> Option<Self> {
        full.strip_prefix(root).ok().map(Self::new)
    }

    pub fn as_path(&self) -> &Path {
        &self.0
    }

    /// Resolve this key under `root`.
    pub fn to_native(&self, root: &Path) -> PathBuf {
        root.join(&self.0)
    }

    /// True for the root itself
    pub fn is_empty(&self) -> bool {
        self.0.as_os_str().is_empty()
    }

    /// Number of components
    pub fn depth(&self) -> usize {
        self.0.components().count()
    }

    /// Whether `ancestor` is this path or one of its ancestors.
    pub fn starts_with(&self, ancestor: &RelativePath) -> bool {
        self.0.starts_with(&ancestor.0)
    }

    /// Proper ancestors, outermost first (`a/b/c` yields `a`, then `a/b`).
    pub fn ancestors(&self) -> Vec<RelativePath> {
        let mut current = PathBuf::new();
        let mut out = Vec::new();
        let total = self.depth();
        for component in self.0.components().take(total.saturating_sub(1)) {
            current.push(component);
            out.push(RelativePath(current.clone()));
        }
        out
    }
}

impl fmt::Display for RelativePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str(".");
        }
        let mut first = true;
        for component in self.0.components() {
            if !first {
                f.write_str("/")?;
            }
            write!(f, "{}", component.as_os_str().to_string_lossy())?;
            first = false;
        }
        Ok(())
    }
}

impl From<&str> for RelativePath {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl Serialize for RelativePath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for RelativePath {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::new(raw))
    }
}
