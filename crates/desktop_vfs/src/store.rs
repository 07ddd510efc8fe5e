//! Single-writer state container for the shared filesystem.
//!
//! Callers submit a [`VfsOp`]; the store derives the next snapshot from the current one, commits
//! it, bumps the revision and then notifies subscribers. A failed operation commits nothing and
//! notifies nobody.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    engine::{DeleteOptions, Vfs},
    error::VfsError,
    node::NewNode,
    path::VfsPath,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "kebab-case")]
/// Mutation request accepted by [`VfsStore::apply`].
pub enum VfsOp {
    /// Create `name` inside `parent`.
    Create {
        /// Containing folder.
        parent: VfsPath,
        /// New node name.
        name: String,
        /// File content or folder marker.
        node: NewNode,
    },
    /// Replace the content of an existing file.
    Write {
        /// File path.
        path: VfsPath,
        /// New content.
        content: String,
    },
    /// Create or overwrite a file.
    PutFile {
        /// Containing folder.
        parent: VfsPath,
        /// File name.
        name: String,
        /// File content.
        content: String,
    },
    /// Rename a node in place.
    Rename {
        /// Node path.
        path: VfsPath,
        /// New name.
        new_name: String,
    },
    /// Delete a node.
    Delete {
        /// Node path.
        path: VfsPath,
        /// Remove non-empty folders.
        recursive: bool,
    },
}

impl VfsOp {
    /// Derives the snapshot that results from applying `self` to `current`.
    pub fn apply_to(&self, current: &Vfs) -> Result<Vfs, VfsError> {
        match self {
            Self::Create { parent, name, node } => current.create(parent, name, node.clone()),
            Self::Write { path, content } => current.write(path, content.as_str()),
            Self::PutFile {
                parent,
                name,
                content,
            } => current.put_file(parent, name, content.as_str()),
            Self::Rename { path, new_name } => current.rename(path, new_name),
            Self::Delete { path, recursive } => current.delete(
                path,
                DeleteOptions {
                    recursive: *recursive,
                },
            ),
        }
    }
}

/// Handle returned by [`VfsStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Notification delivered to subscribers after a committed operation.
#[derive(Debug)]
pub struct VfsChange<'a> {
    /// Revision number of the committed snapshot.
    pub revision: u64,
    /// Operation that produced it.
    pub op: &'a VfsOp,
    /// Snapshot before the operation.
    pub previous: &'a Vfs,
    /// Snapshot after the operation.
    pub current: &'a Vfs,
}

type Subscriber = Box<dyn FnMut(&VfsChange<'_>)>;

/// Owns the current filesystem snapshot.
pub struct VfsStore {
    current: Vfs,
    revision: u64,
    next_subscription: u64,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
}

impl fmt::Debug for VfsStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VfsStore")
            .field("revision", &self.revision)
            .field("subscribers", &self.subscribers.len())
            .finish_non_exhaustive()
    }
}

impl Default for VfsStore {
    fn default() -> Self {
        Self::new(Vfs::seeded())
    }
}

impl VfsStore {
    /// Creates a store holding `initial` at revision 0.
    pub fn new(initial: Vfs) -> Self {
        Self {
            current: initial,
            revision: 0,
            next_subscription: 1,
            subscribers: Vec::new(),
        }
    }

    /// Borrows the current snapshot.
    pub fn current(&self) -> &Vfs {
        &self.current
    }

    /// Returns a handle to the current snapshot that stays valid across later mutations.
    pub fn snapshot(&self) -> Vfs {
        self.current.clone()
    }

    /// Number of committed operations since construction.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Applies `op` against the latest snapshot and commits the result.
    ///
    /// # Errors
    ///
    /// Propagates the engine error; the current snapshot is left untouched.
    pub fn apply(&mut self, op: VfsOp) -> Result<Vfs, VfsError> {
        let next = op.apply_to(&self.current)?;
        let previous = std::mem::replace(&mut self.current, next.clone());
        self.revision += 1;

        let change = VfsChange {
            revision: self.revision,
            op: &op,
            previous: &previous,
            current: &self.current,
        };
        for (_, subscriber) in &mut self.subscribers {
            subscriber(&change);
        }
        Ok(next)
    }

    /// Registers a callback invoked after every committed operation.
    pub fn subscribe(&mut self, subscriber: impl FnMut(&VfsChange<'_>) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push((id, Box::new(subscriber)));
        id
    }

    /// Removes a subscriber. Returns `false` when `id` was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(existing, _)| *existing != id);
        self.subscribers.len() != before
    }

    /// Shorthand for [`VfsOp::Create`].
    pub fn create(&mut self, parent: &VfsPath, name: &str, node: NewNode) -> Result<Vfs, VfsError> {
        self.apply(VfsOp::Create {
            parent: parent.clone(),
            name: name.to_string(),
            node,
        })
    }

    /// Shorthand for [`VfsOp::Write`].
    pub fn write(&mut self, path: &VfsPath, content: impl Into<String>) -> Result<Vfs, VfsError> {
        self.apply(VfsOp::Write {
            path: path.clone(),
            content: content.into(),
        })
    }

    /// Shorthand for [`VfsOp::PutFile`].
    pub fn put_file(
        &mut self,
        parent: &VfsPath,
        name: &str,
        content: impl Into<String>,
    ) -> Result<Vfs, VfsError> {
        self.apply(VfsOp::PutFile {
            parent: parent.clone(),
            name: name.to_string(),
            content: content.into(),
        })
    }

    /// Shorthand for [`VfsOp::Rename`].
    pub fn rename(&mut self, path: &VfsPath, new_name: &str) -> Result<Vfs, VfsError> {
        self.apply(VfsOp::Rename {
            path: path.clone(),
            new_name: new_name.to_string(),
        })
    }

    /// Shorthand for [`VfsOp::Delete`].
    pub fn delete(&mut self, path: &VfsPath, options: DeleteOptions) -> Result<Vfs, VfsError> {
        self.apply(VfsOp::Delete {
            path: path.clone(),
            recursive: options.recursive,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn apply_commits_and_notifies_in_call_order() {
        let mut store = VfsStore::default();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        store.subscribe(move |change| sink.borrow_mut().push(change.revision));

        let home = VfsPath::parse("/home/guest");
        store.create(&home, "a.txt", NewNode::file("1")).expect("first");
        store.create(&home, "b.txt", NewNode::file("2")).expect("second");

        assert_eq!(*seen.borrow(), vec![1, 2]);
        assert_eq!(store.revision(), 2);
        assert!(store.current().exists(&home.join("a.txt")));
        assert!(store.current().exists(&home.join("b.txt")));
    }

    #[test]
    fn failed_apply_keeps_snapshot_and_skips_subscribers() {
        let mut store = VfsStore::default();
        let calls = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&calls);
        store.subscribe(move |_| *sink.borrow_mut() += 1);
        let before = store.snapshot();

        let err = store
            .delete(&VfsPath::parse("/missing"), DeleteOptions::default())
            .expect_err("missing path");

        assert!(matches!(err, VfsError::NotFound { .. }));
        assert!(store.current().ptr_eq(&before));
        assert_eq!(*calls.borrow(), 0);
        assert_eq!(store.revision(), 0);
    }

    #[test]
    fn stale_snapshots_are_detectable_by_reference() {
        let mut store = VfsStore::default();
        let held = store.snapshot();

        store
            .write(&VfsPath::parse("/home/guest/welcome.txt"), "edited")
            .expect("write");

        assert!(!held.ptr_eq(store.current()));
        assert_eq!(held, Vfs::seeded());
    }

    #[test]
    fn unsubscribe_stops_notifications() {
        let mut store = VfsStore::default();
        let calls = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&calls);
        let id = store.subscribe(move |_| *sink.borrow_mut() += 1);

        assert!(store.unsubscribe(id));
        assert!(!store.unsubscribe(id));
        store
            .create(&VfsPath::root(), "tmp", NewNode::Folder)
            .expect("create");
        assert_eq!(*calls.borrow(), 0);
    }
}
