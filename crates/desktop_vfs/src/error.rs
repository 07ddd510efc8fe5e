//! Error taxonomy returned by VFS lookups and mutations.

use thiserror::Error;

use crate::path::VfsPath;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Recoverable failures reported by the VFS engine.
///
/// A failed operation never changes the snapshot it was applied to.
pub enum VfsError {
    /// The path does not resolve to any node.
    #[error("no such file or directory: {path}")]
    NotFound {
        /// Path that failed to resolve.
        path: VfsPath,
    },
    /// The parent of a node being created is missing or is not a folder.
    #[error("parent folder not found: {path}")]
    ParentNotFound {
        /// Parent path that failed to resolve to a folder.
        path: VfsPath,
    },
    /// A sibling with the requested name already exists.
    #[error("file exists: {path}")]
    AlreadyExists {
        /// Path of the existing sibling.
        path: VfsPath,
    },
    /// Non-recursive delete of a folder that still has children.
    #[error("directory not empty: {path}")]
    NotEmpty {
        /// Folder that was not deleted.
        path: VfsPath,
    },
    /// A file operation was applied to a folder.
    #[error("not a file: {path}")]
    NotAFile {
        /// Offending path.
        path: VfsPath,
    },
    /// A folder operation was applied to a file.
    #[error("not a folder: {path}")]
    NotAFolder {
        /// Offending path.
        path: VfsPath,
    },
    /// The requested node name cannot be used as a path segment.
    #[error("invalid name: `{name}`")]
    InvalidName {
        /// Rejected name.
        name: String,
    },
    /// Rename or delete was requested for the root folder.
    #[error("operation not permitted on the root folder")]
    RootPath,
}

impl VfsError {
    /// Short, shell-style reason text (for example `No such file or directory`).
    pub fn reason(&self) -> &'static str {
        match self {
            Self::NotFound { .. } | Self::ParentNotFound { .. } => "No such file or directory",
            Self::AlreadyExists { .. } => "File exists",
            Self::NotEmpty { .. } => "Directory not empty",
            Self::NotAFile { .. } => "Is a directory",
            Self::NotAFolder { .. } => "Not a directory",
            Self::InvalidName { .. } => "Invalid argument",
            Self::RootPath => "Operation not permitted",
        }
    }
}
