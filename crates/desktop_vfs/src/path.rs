//! Segment-based virtual paths used to address nodes in the VFS tree.

use std::{convert::Infallible, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Absolute path into the virtual filesystem, stored as an ordered list of name segments.
///
/// The empty path addresses the root folder. Paths render as `/a/b` and parse from the same form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VfsPath(Vec<String>);

impl VfsPath {
    /// Returns the root path.
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Builds a path from already-split segments, dropping empty segments.
    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(
            segments
                .into_iter()
                .map(Into::into)
                .filter(|segment| !segment.is_empty())
                .collect(),
        )
    }

    /// Parses a slash-separated path, treating it as absolute.
    ///
    /// Whitespace is trimmed, backslashes count as separators, `.` segments are skipped and `..`
    /// pops the previous segment (never above the root).
    pub fn parse(raw: &str) -> Self {
        Self::root().resolve(raw)
    }

    /// Resolves `target` relative to `self`.
    ///
    /// A leading `/` makes `target` absolute. Otherwise each segment is applied in turn to a copy
    /// of `self`.
    pub fn resolve(&self, target: &str) -> Self {
        let normalized = target.trim().replace('\\', "/");
        let mut out = if normalized.starts_with('/') {
            Vec::new()
        } else {
            self.0.clone()
        };

        for segment in normalized.split('/') {
            match segment {
                "" | "." => {}
                ".." => {
                    out.pop();
                }
                name => out.push(name.to_string()),
            }
        }

        Self(out)
    }

    /// Returns the path segments in root-to-leaf order.
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Returns `true` for the root path.
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of segments below the root.
    pub fn depth(&self) -> usize {
        self.0.len()
    }

    /// Returns the containing folder path, or `None` for the root.
    pub fn parent(&self) -> Option<Self> {
        let (_, parent) = self.0.split_last()?;
        Some(Self(parent.to_vec()))
    }

    /// Returns the last segment, or `None` for the root.
    pub fn file_name(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    /// Returns a new path with `name` appended.
    pub fn join(&self, name: impl Into<String>) -> Self {
        let mut segments = self.0.clone();
        segments.push(name.into());
        Self::from_segments(segments)
    }

    /// Returns `true` when `prefix` is an ancestor of (or equal to) `self`.
    pub fn starts_with(&self, prefix: &VfsPath) -> bool {
        self.0.starts_with(&prefix.0)
    }

    /// Returns the first segment below the root, if any.
    pub fn top_level(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }
}

impl fmt::Display for VfsPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("/");
        }
        for segment in &self.0 {
            write!(f, "/{segment}")?;
        }
        Ok(())
    }
}

impl FromStr for VfsPath {
    type Err = Infallible;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(raw))
    }
}

impl<S: Into<String>> FromIterator<S> for VfsPath {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self::from_segments(iter)
    }
}
