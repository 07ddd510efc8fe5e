//! Editable text buffer backed by a VFS file.

use desktop_vfs::{Vfs, VfsError, VfsPath, VfsStore};
use tracing::debug;

/// Which editor opened the document. Only changes the placeholder shown for a missing file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditorKind {
    #[default]
    TextEdit,
    StarlightIde,
}

impl EditorKind {
    fn missing_file_text(self, path: &VfsPath) -> String {
        match self {
            Self::TextEdit => format!("Error: Could not find file at {path}"),
            Self::StarlightIde => format!("// Error: Could not load file at {path}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextDocument {
    path: VfsPath,
    editor: EditorKind,
    buffer: String,
    saved: String,
    load_error: Option<VfsError>,
}

impl TextDocument {
    /// Loads `path` into a fresh buffer. A missing or non-file path yields a document whose
    /// buffer holds the editor's error text.
    pub fn open(vfs: &Vfs, path: VfsPath, editor: EditorKind) -> Self {
        let (buffer, load_error) = match vfs.read(&path) {
            Ok(text) => (text.to_string(), None),
            Err(err) => (editor.missing_file_text(&path), Some(err)),
        };
        Self {
            path,
            editor,
            saved: buffer.clone(),
            buffer,
            load_error,
        }
    }

    pub fn path(&self) -> &VfsPath {
        &self.path
    }

    pub fn editor(&self) -> EditorKind {
        self.editor
    }

    pub fn text(&self) -> &str {
        &self.buffer
    }

    pub fn load_error(&self) -> Option<&VfsError> {
        self.load_error.as_ref()
    }

    pub fn is_dirty(&self) -> bool {
        self.buffer != self.saved
    }

    /// Replaces the whole buffer.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.buffer = text.into();
    }

    pub fn append(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    /// Writes the buffer back. The target must still be a file.
    pub fn save(&mut self, store: &mut VfsStore) -> Result<(), VfsError> {
        store.write(&self.path, self.buffer.clone())?;
        debug!(path = %self.path, bytes = self.buffer.len(), "document saved");
        self.saved.clone_from(&self.buffer);
        self.load_error = None;
        Ok(())
    }

    /// Drops unsaved edits and reloads from `vfs`.
    pub fn reload(&mut self, vfs: &Vfs) {
        *self = Self::open(vfs, self.path.clone(), self.editor);
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn opens_existing_file_clean() {
        let vfs = Vfs::seeded();
        let doc = TextDocument::open(
            &vfs,
            VfsPath::parse("/home/guest/welcome.txt"),
            EditorKind::TextEdit,
        );
        assert_eq!(doc.text(), "Welcome to StarOS!");
        assert!(!doc.is_dirty());
        assert!(doc.load_error().is_none());
    }

    #[test]
    fn missing_file_shows_editor_specific_error() {
        let vfs = Vfs::seeded();
        let path = VfsPath::parse("/home/guest/gone.txt");

        let text = TextDocument::open(&vfs, path.clone(), EditorKind::TextEdit);
        assert_eq!(
            text.text(),
            "Error: Could not find file at /home/guest/gone.txt"
        );
        let ide = TextDocument::open(&vfs, path, EditorKind::StarlightIde);
        assert_eq!(
            ide.text(),
            "// Error: Could not load file at /home/guest/gone.txt"
        );
        assert!(matches!(ide.load_error(), Some(VfsError::NotFound { .. })));
    }

    #[test]
    fn save_writes_through_store_and_clears_dirty_flag() {
        let mut store = VfsStore::default();
        let path = VfsPath::parse("/home/guest/welcome.txt");
        let mut doc = TextDocument::open(store.current(), path.clone(), EditorKind::TextEdit);

        doc.append(" Enjoy.");
        assert!(doc.is_dirty());
        doc.save(&mut store).expect("save");

        assert!(!doc.is_dirty());
        assert_eq!(
            store.current().read(&path),
            Ok("Welcome to StarOS! Enjoy.")
        );
        assert_eq!(store.revision(), 1);
    }

    #[test]
    fn saving_a_folder_is_rejected() {
        let mut store = VfsStore::default();
        let path = VfsPath::parse("/home/guest/Documents");
        let mut doc = TextDocument::open(store.current(), path, EditorKind::StarlightIde);
        doc.set_text("print 1");

        assert!(matches!(
            doc.save(&mut store),
            Err(VfsError::NotAFile { .. })
        ));
        assert!(doc.is_dirty());
        assert_eq!(store.revision(), 0);
    }

    #[test]
    fn reload_discards_edits() {
        let mut store = VfsStore::default();
        let path = VfsPath::parse("/home/guest/welcome.txt");
        let mut doc = TextDocument::open(store.current(), path.clone(), EditorKind::TextEdit);
        doc.set_text("scratch");
        store.write(&path, "changed elsewhere").expect("write");

        doc.reload(store.current());
        assert_eq!(doc.text(), "changed elsewhere");
        assert!(!doc.is_dirty());
    }
}
