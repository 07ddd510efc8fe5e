use desktop_vfs::{
    resolve, DeleteOptions, FsNode, NewNode, NodeRef, Vfs, VfsError, VfsPath, VfsStore,
};
use pretty_assertions::assert_eq;

fn folders(node: &NodeRef, at: VfsPath, out: &mut Vec<(VfsPath, NodeRef)>) {
    if let Some(children) = node.children() {
        out.push((at.clone(), NodeRef::clone(node)));
        for child in children {
            folders(child, at.join(child.name()), out);
        }
    }
}

fn assert_children_resolve(vfs: &Vfs) -> usize {
    let mut all = Vec::new();
    folders(vfs.root(), VfsPath::root(), &mut all);
    let count = all.len();

    for (folder_path, folder) in all {
        for child in folder.children().unwrap_or_default() {
            let child_path = folder_path.join(child.name());
            let resolved = resolve(vfs.root(), child_path.segments()).expect("child resolves");
            assert_eq!(resolved.as_ref(), child.as_ref(), "path={child_path}");
        }
    }
    count
}

#[test]
fn every_child_resolves_through_its_parent_path() {
    let folder_count = assert_children_resolve(&Vfs::seeded());
    assert!(folder_count >= 7);
}

#[test]
fn paths_still_resolve_after_create_rename_and_delete() {
    let guest = VfsPath::parse("/home/guest");
    let projects = guest.join("Projects");

    let vfs = Vfs::seeded()
        .create(&guest, "Projects", NewNode::Folder)
        .and_then(|vfs| vfs.create(&projects, "draft.txt", NewNode::file("v1")))
        .and_then(|vfs| vfs.create(&projects, "Archive", NewNode::Folder))
        .and_then(|vfs| vfs.rename(&guest.join("Downloads"), "Inbox"))
        .and_then(|vfs| vfs.rename(&projects.join("draft.txt"), "final.txt"))
        .and_then(|vfs| vfs.delete(&guest.join("Documents"), DeleteOptions::recursive()))
        .expect("mutations succeed");

    assert_children_resolve(&vfs);
    for gone in ["Downloads", "Documents", "Projects/draft.txt"] {
        let path = guest.resolve(gone);
        assert!(resolve(vfs.root(), path.segments()).is_none(), "path={path}");
    }
    assert_eq!(vfs.read(&projects.join("final.txt")), Ok("v1"));
    assert!(vfs.exists(&guest.join("Inbox")));
    assert!(vfs.exists(&projects.join("Archive")));
}

#[test]
fn previous_snapshot_is_unchanged_by_every_mutation_kind() {
    let original = Vfs::seeded();
    let pristine: FsNode = original.root().as_ref().clone();
    let guest = VfsPath::parse("/home/guest");

    let steps: Vec<Result<Vfs, VfsError>> = vec![
        original.create(&guest, "new", NewNode::Folder),
        original.write(&guest.join("welcome.txt"), "changed"),
        original.rename(&guest.join("Downloads"), "Inbox"),
        original.delete(&guest.join("Documents"), DeleteOptions::recursive()),
        original.put_file(&guest, "welcome.txt", "overwritten"),
    ];

    for step in steps {
        let next = step.expect("mutation succeeds");
        assert_ne!(next.root().as_ref(), &pristine);
        assert_eq!(original.root().as_ref(), &pristine);
    }
}

#[test]
fn creating_an_existing_document_name_fails() {
    let vfs = Vfs::seeded();
    let documents = VfsPath::from_segments(["home", "guest", "Documents"]);

    assert_eq!(
        vfs.create(&documents, "project-notes.txt", NewNode::file("x")),
        Err(VfsError::AlreadyExists {
            path: documents.join("project-notes.txt"),
        })
    );
}

#[test]
fn non_recursive_delete_of_populated_folder_leaves_store_untouched() {
    let mut store = VfsStore::default();
    let documents = VfsPath::parse("/home/guest/Documents");
    let before = store.snapshot();

    let err = store
        .delete(&documents, DeleteOptions::default())
        .expect_err("not empty");
    assert_eq!(err, VfsError::NotEmpty { path: documents.clone() });
    assert!(store.current().ptr_eq(&before));

    store
        .delete(&documents, DeleteOptions::recursive())
        .expect("recursive delete");
    assert!(!store.current().exists(&documents));
    assert!(!store.current().exists(&documents.join("project-notes.txt")));
}

#[test]
fn sequential_writers_each_see_the_latest_snapshot() {
    let mut store = VfsStore::default();
    let docs = VfsPath::parse("/home/guest/Documents");

    store.put_file(&docs, "log.txt", "one").expect("first");
    store.put_file(&docs, "log.txt", "two").expect("second");

    assert_eq!(store.current().read(&docs.join("log.txt")), Ok("two"));
    assert_eq!(store.revision(), 2);
}
