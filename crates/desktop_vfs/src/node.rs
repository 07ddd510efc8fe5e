//! Filesystem node model and the pure path resolver.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Shared handle to an immutable, published node.
pub type NodeRef = Arc<FsNode>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
/// Node kind tag.
pub enum NodeKind {
    /// Leaf holding opaque text.
    File,
    /// Container of uniquely named children.
    Folder,
}

impl NodeKind {
    /// Lower-case label used in listings and tool payloads.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Folder => "folder",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
/// One node of the VFS tree.
///
/// Folder children are held behind [`Arc`] so snapshots can share untouched subtrees.
pub enum FsNode {
    /// A file and its text payload.
    File {
        /// Segment name, unique among siblings.
        name: String,
        /// Opaque text content.
        content: String,
    },
    /// A folder and its ordered children.
    Folder {
        /// Segment name, unique among siblings.
        name: String,
        /// Children in display order.
        content: Vec<NodeRef>,
    },
}

impl FsNode {
    /// Builds a file node.
    pub fn file(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self::File {
            name: name.into(),
            content: content.into(),
        }
    }

    /// Builds a folder node from owned children.
    pub fn folder(name: impl Into<String>, children: impl IntoIterator<Item = FsNode>) -> Self {
        Self::Folder {
            name: name.into(),
            content: children.into_iter().map(Arc::new).collect(),
        }
    }

    /// Node name.
    pub fn name(&self) -> &str {
        match self {
            Self::File { name, .. } | Self::Folder { name, .. } => name,
        }
    }

    /// Node kind.
    pub fn kind(&self) -> NodeKind {
        match self {
            Self::File { .. } => NodeKind::File,
            Self::Folder { .. } => NodeKind::Folder,
        }
    }

    /// Returns `true` for folders.
    pub fn is_folder(&self) -> bool {
        matches!(self, Self::Folder { .. })
    }

    /// Folder children, or `None` for files.
    pub fn children(&self) -> Option<&[NodeRef]> {
        match self {
            Self::Folder { content, .. } => Some(content),
            Self::File { .. } => None,
        }
    }

    /// File content, or `None` for folders.
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::File { content, .. } => Some(content),
            Self::Folder { .. } => None,
        }
    }

    /// Looks up a direct child by name.
    pub fn child(&self, name: &str) -> Option<&NodeRef> {
        self.children()?.iter().find(|child| child.name() == name)
    }

    /// Returns a shallow copy of this node under a new name.
    ///
    /// Folder children stay shared with the original node.
    pub fn renamed(&self, new_name: impl Into<String>) -> Self {
        match self {
            Self::File { content, .. } => Self::File {
                name: new_name.into(),
                content: content.clone(),
            },
            Self::Folder { content, .. } => Self::Folder {
                name: new_name.into(),
                content: content.clone(),
            },
        }
    }

    /// Returns `true` when sibling names are unique in every folder of this subtree.
    pub fn has_unique_sibling_names(&self) -> bool {
        let Some(children) = self.children() else {
            return true;
        };
        children.iter().enumerate().all(|(idx, child)| {
            children[..idx]
                .iter()
                .all(|earlier| earlier.name() != child.name())
                && child.has_unique_sibling_names()
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Directory entry returned by listing operations.
pub struct DirEntry {
    /// Child name.
    pub name: String,
    /// Child kind.
    #[serde(rename = "type")]
    pub kind: NodeKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
/// Payload for a node being created.
pub enum NewNode {
    /// A file with initial content.
    File {
        /// Initial text.
        content: String,
    },
    /// An empty folder.
    Folder,
}

impl NewNode {
    /// Builds a file payload.
    pub fn file(content: impl Into<String>) -> Self {
        Self::File {
            content: content.into(),
        }
    }

    /// Kind of node this payload creates.
    pub fn kind(&self) -> NodeKind {
        match self {
            Self::File { .. } => NodeKind::File,
            Self::Folder => NodeKind::Folder,
        }
    }

    pub(crate) fn into_node(self, name: String) -> FsNode {
        match self {
            Self::File { content } => FsNode::File { name, content },
            Self::Folder => FsNode::Folder {
                name,
                content: Vec::new(),
            },
        }
    }
}

/// Walks `segments` down from `root`.
///
/// Returns `None` as soon as a segment matches no child of a folder, or when a file is reached
/// while segments remain. The empty path resolves to `root`.
pub fn resolve<'a, S: AsRef<str>>(root: &'a NodeRef, segments: &[S]) -> Option<&'a NodeRef> {
    segments
        .iter()
        .try_fold(root, |node, segment| node.child(segment.as_ref()))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn sample() -> NodeRef {
        Arc::new(FsNode::folder(
            "~",
            [
                FsNode::folder("home", [FsNode::file("notes.txt", "hi")]),
                FsNode::file("readme", "root file"),
            ],
        ))
    }

    #[test]
    fn empty_path_resolves_to_root() {
        let root = sample();
        let empty: [&str; 0] = [];

        let node = resolve(&root, &empty).expect("root");
        assert!(Arc::ptr_eq(node, &root));
    }

    #[test]
    fn resolve_walks_folders_and_stops_at_files() {
        let root = sample();

        assert_eq!(
            resolve(&root, &["home", "notes.txt"]).and_then(|n| n.text()),
            Some("hi")
        );
        assert!(resolve(&root, &["home", "missing"]).is_none());
        assert!(resolve(&root, &["readme", "deeper"]).is_none());
    }

    #[test]
    fn serde_shape_uses_type_name_content_fields() {
        let node = FsNode::folder("docs", [FsNode::file("a.txt", "x")]);

        let value = serde_json::to_value(&node).expect("serialize");
        assert_eq!(
            value,
            serde_json::json!({
                "type": "folder",
                "name": "docs",
                "content": [{ "type": "file", "name": "a.txt", "content": "x" }]
            })
        );
        let round_trip: FsNode = serde_json::from_value(value).expect("deserialize");
        assert_eq!(round_trip, node);
    }

    #[test]
    fn duplicate_sibling_names_are_detected() {
        let node = FsNode::folder("x", [FsNode::file("a", ""), FsNode::file("a", "")]);
        assert!(!node.has_unique_sibling_names());
        assert!(sample().has_unique_sibling_names());
    }
}
