//! In-memory hierarchical virtual filesystem shared by every desktop application.
//!
//! The tree is persistent: [`Vfs`] snapshots are immutable, each mutation returns a new snapshot
//! that shares unchanged subtrees with its predecessor, and [`VfsStore`] serializes writers while
//! handing readers fully committed snapshots.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod engine;
pub mod error;
pub mod node;
pub mod path;
pub mod seed;
pub mod store;

pub use engine::{DeleteOptions, Vfs};
pub use error::VfsError;
pub use node::{resolve, DirEntry, FsNode, NewNode, NodeKind, NodeRef};
pub use path::VfsPath;
pub use seed::{seed_tree, ROOT_NAME};
pub use store::{SubscriptionId, VfsChange, VfsOp, VfsStore};
