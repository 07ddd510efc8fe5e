//! Copy-on-write VFS engine.
//!
//! [`Vfs`] is an immutable snapshot. Every mutating method derives a new snapshot by copying the
//! folders on the path from the root to the edited node and sharing every other subtree with the
//! input snapshot, which is never modified.

use std::sync::Arc;

use crate::{
    error::VfsError,
    node::{resolve, DirEntry, FsNode, NewNode, NodeKind, NodeRef},
    path::VfsPath,
    seed::seed_tree,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Options accepted by [`Vfs::delete`].
pub struct DeleteOptions {
    /// Remove non-empty folders together with their subtree.
    pub recursive: bool,
}

impl DeleteOptions {
    /// Recursive delete.
    pub fn recursive() -> Self {
        Self { recursive: true }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// One immutable version of the filesystem tree.
///
/// Cloning is cheap; equality compares tree contents. Use [`Vfs::ptr_eq`] to detect whether two
/// handles refer to the same snapshot.
pub struct Vfs {
    root: NodeRef,
}

impl Default for Vfs {
    fn default() -> Self {
        Self::seeded()
    }
}

impl Vfs {
    /// Snapshot built from the fixed seed tree.
    pub fn seeded() -> Self {
        Self {
            root: Arc::new(seed_tree()),
        }
    }

    /// Wraps an arbitrary tree, validating the root and sibling-name invariants.
    ///
    /// # Errors
    ///
    /// Returns [`VfsError::NotAFolder`] when `root` is a file and [`VfsError::AlreadyExists`]
    /// when some folder holds two children with the same name.
    pub fn from_root(root: FsNode) -> Result<Self, VfsError> {
        if !root.is_folder() {
            return Err(VfsError::NotAFolder {
                path: VfsPath::root(),
            });
        }
        if let Some(path) = first_duplicate(&root, &VfsPath::root()) {
            return Err(VfsError::AlreadyExists { path });
        }
        Ok(Self {
            root: Arc::new(root),
        })
    }

    /// Root folder of this snapshot.
    pub fn root(&self) -> &NodeRef {
        &self.root
    }

    /// Returns `true` when both handles point at the same snapshot.
    pub fn ptr_eq(&self, other: &Vfs) -> bool {
        Arc::ptr_eq(&self.root, &other.root)
    }

    /// Resolves `path` to a node.
    ///
    /// # Errors
    ///
    /// Returns [`VfsError::NotFound`] when any segment fails to resolve.
    pub fn resolve(&self, path: &VfsPath) -> Result<&NodeRef, VfsError> {
        resolve(&self.root, path.segments()).ok_or_else(|| VfsError::NotFound { path: path.clone() })
    }

    /// Returns the kind of node at `path`.
    pub fn stat(&self, path: &VfsPath) -> Result<NodeKind, VfsError> {
        self.resolve(path).map(|node| node.kind())
    }

    /// Returns `true` when `path` resolves.
    pub fn exists(&self, path: &VfsPath) -> bool {
        self.resolve(path).is_ok()
    }

    /// Lists the children of the folder at `path` in display order.
    ///
    /// # Errors
    ///
    /// Returns [`VfsError::NotFound`] or [`VfsError::NotAFolder`].
    pub fn list(&self, path: &VfsPath) -> Result<Vec<DirEntry>, VfsError> {
        let children = self
            .resolve(path)?
            .children()
            .ok_or_else(|| VfsError::NotAFolder { path: path.clone() })?;
        Ok(children
            .iter()
            .map(|child| DirEntry {
                name: child.name().to_string(),
                kind: child.kind(),
            })
            .collect())
    }

    /// Reads the content of the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`VfsError::NotFound`] or [`VfsError::NotAFile`].
    pub fn read(&self, path: &VfsPath) -> Result<&str, VfsError> {
        self.resolve(path)?
            .text()
            .ok_or_else(|| VfsError::NotAFile { path: path.clone() })
    }

    /// Creates `name` inside the folder at `parent`.
    ///
    /// # Errors
    ///
    /// Returns [`VfsError::ParentNotFound`] when `parent` is not a folder,
    /// [`VfsError::AlreadyExists`] on a sibling name collision and [`VfsError::InvalidName`] for
    /// unusable names.
    pub fn create(&self, parent: &VfsPath, name: &str, node: NewNode) -> Result<Vfs, VfsError> {
        validate_name(name)?;
        let siblings = self.folder_children(parent).ok_or_else(|| VfsError::ParentNotFound {
            path: parent.clone(),
        })?;
        if siblings.iter().any(|child| child.name() == name) {
            return Err(VfsError::AlreadyExists {
                path: parent.join(name),
            });
        }

        let created = Arc::new(node.into_node(name.to_string()));
        self.edit_folder(parent, move |children| children.push(created))
    }

    /// Replaces the content of the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`VfsError::NotFound`] or [`VfsError::NotAFile`].
    pub fn write(&self, path: &VfsPath, content: impl Into<String>) -> Result<Vfs, VfsError> {
        if self.resolve(path)?.kind() != NodeKind::File {
            return Err(VfsError::NotAFile { path: path.clone() });
        }
        let (parent, name) = split_leaf(path)?;
        let replacement = Arc::new(FsNode::file(name, content));
        self.edit_folder(&parent, move |children| {
            replace_child(children, name, replacement);
        })
    }

    /// Creates the file `parent/name`, or overwrites it when a file of that name already exists.
    ///
    /// # Errors
    ///
    /// Returns [`VfsError::ParentNotFound`] when `parent` is not a folder and
    /// [`VfsError::NotAFile`] when `name` is an existing folder.
    pub fn put_file(
        &self,
        parent: &VfsPath,
        name: &str,
        content: impl Into<String>,
    ) -> Result<Vfs, VfsError> {
        validate_name(name)?;
        let siblings = self.folder_children(parent).ok_or_else(|| VfsError::ParentNotFound {
            path: parent.clone(),
        })?;
        match siblings.iter().find(|child| child.name() == name) {
            Some(existing) if existing.is_folder() => Err(VfsError::NotAFile {
                path: parent.join(name),
            }),
            Some(_) => self.write(&parent.join(name), content),
            None => self.create(parent, name, NewNode::file(content)),
        }
    }

    /// Renames the node at `path` to `new_name`, keeping its position among its siblings.
    ///
    /// Renaming a node to its current name returns the same snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`VfsError::NotFound`], [`VfsError::AlreadyExists`] when a sibling already uses
    /// `new_name`, [`VfsError::InvalidName`] or [`VfsError::RootPath`].
    pub fn rename(&self, path: &VfsPath, new_name: &str) -> Result<Vfs, VfsError> {
        validate_name(new_name)?;
        let target = self.resolve(path)?;
        let (parent, old_name) = split_leaf(path)?;
        if old_name == new_name {
            return Ok(self.clone());
        }
        if self
            .folder_children(&parent)
            .is_some_and(|siblings| siblings.iter().any(|child| child.name() == new_name))
        {
            return Err(VfsError::AlreadyExists {
                path: parent.join(new_name),
            });
        }

        let renamed = Arc::new(target.renamed(new_name));
        self.edit_folder(&parent, move |children| {
            replace_child(children, old_name, renamed);
        })
    }

    /// Deletes the node at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`VfsError::NotFound`], [`VfsError::RootPath`], or [`VfsError::NotEmpty`] when
    /// `path` is a folder with children and `options.recursive` is false.
    pub fn delete(&self, path: &VfsPath, options: DeleteOptions) -> Result<Vfs, VfsError> {
        let target = self.resolve(path)?;
        let (parent, name) = split_leaf(path)?;
        let has_children = target
            .children()
            .is_some_and(|children| !children.is_empty());
        if has_children && !options.recursive {
            return Err(VfsError::NotEmpty { path: path.clone() });
        }

        self.edit_folder(&parent, move |children| {
            children.retain(|child| child.name() != name);
        })
    }

    /// Renders the tree as indented `name/` lines, two spaces per level.
    pub fn render_tree(&self) -> String {
        let mut out = String::new();
        render_node(&self.root, 0, &mut out);
        out
    }

    fn folder_children(&self, path: &VfsPath) -> Option<&[NodeRef]> {
        resolve(&self.root, path.segments())?.children()
    }

    /// Copies the folders from the root down to `folder`, lets `edit` mutate the copied child
    /// list of `folder`, and returns the rebuilt snapshot.
    fn edit_folder<F>(&self, folder: &VfsPath, edit: F) -> Result<Vfs, VfsError>
    where
        F: FnOnce(&mut Vec<NodeRef>),
    {
        let root = rebuild_path(&self.root, folder.segments(), folder, edit)?;
        Ok(Vfs { root })
    }
}

fn rebuild_path<F>(
    node: &NodeRef,
    remaining: &[String],
    folder: &VfsPath,
    edit: F,
) -> Result<NodeRef, VfsError>
where
    F: FnOnce(&mut Vec<NodeRef>),
{
    let FsNode::Folder { name, content } = node.as_ref() else {
        return Err(VfsError::NotAFolder {
            path: folder.clone(),
        });
    };

    let mut children = content.clone();
    match remaining.split_first() {
        None => edit(&mut children),
        Some((head, rest)) => {
            let idx = children
                .iter()
                .position(|child| child.name() == head)
                .ok_or_else(|| VfsError::NotFound {
                    path: folder.clone(),
                })?;
            let rebuilt = rebuild_path(&children[idx], rest, folder, edit)?;
            children[idx] = rebuilt;
        }
    }

    Ok(Arc::new(FsNode::Folder {
        name: name.clone(),
        content: children,
    }))
}

fn replace_child(children: &mut [NodeRef], name: &str, replacement: NodeRef) {
    if let Some(slot) = children.iter_mut().find(|child| child.name() == name) {
        *slot = replacement;
    }
}

fn split_leaf(path: &VfsPath) -> Result<(VfsPath, &str), VfsError> {
    match (path.parent(), path.file_name()) {
        (Some(parent), Some(name)) => Ok((parent, name)),
        _ => Err(VfsError::RootPath),
    }
}

fn validate_name(name: &str) -> Result<(), VfsError> {
    if name.is_empty() || name == "." || name == ".." || name.contains('/') || name.contains('\\')
    {
        return Err(VfsError::InvalidName {
            name: name.to_string(),
        });
    }
    Ok(())
}

fn first_duplicate(node: &FsNode, at: &VfsPath) -> Option<VfsPath> {
    let children = node.children()?;
    for (idx, child) in children.iter().enumerate() {
        if children[..idx].iter().any(|c| c.name() == child.name()) {
            return Some(at.join(child.name()));
        }
        if let Some(found) = first_duplicate(child, &at.join(child.name())) {
            return Some(found);
        }
    }
    None
}

fn render_node(node: &FsNode, depth: usize, out: &mut String) {
    if depth > 0 {
        out.push('\n');
    }
    out.push_str(&"  ".repeat(depth));
    out.push_str(node.name());
    out.push('/');
    for child in node.children().unwrap_or_default() {
        render_node(child, depth + 1, out);
    }
}
