//! Finder-style browsing session over the shared filesystem.
//!
//! The session only keeps a cursor and transient UI state (pending rename, open context menu).
//! Listings are always read from the snapshot passed in, so edits made elsewhere (terminal,
//! agent, desktop menu) show up on the next render.

use desktop_runtime::{
    app_for_file, is_star_file, AppId, ContextMenuHost, ContextMenuRequest, DesktopShell,
    MenuEntry, Point, ShellConfig, ShellError, WindowId,
};
use desktop_vfs::{DeleteOptions, DirEntry, NodeKind, Vfs, VfsError, VfsPath};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Sidebar shortcuts, relative to the home folder.
const SIDEBAR_LOCATIONS: [(&str, Option<&str>); 4] = [
    ("Home", None),
    ("Desktop", Some("Desktop")),
    ("Documents", Some("Documents")),
    ("Downloads", Some("Downloads")),
];

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExplorerError {
    #[error(transparent)]
    Vfs(#[from] VfsError),
    #[error(transparent)]
    Shell(#[from] ShellError),
}

/// Actions offered by the explorer's own context menus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", content = "path", rename_all = "kebab-case")]
pub enum ExplorerCommand {
    Open(VfsPath),
    Run(VfsPath),
    EditInIde(VfsPath),
    Rename(VfsPath),
    Delete(VfsPath),
    NewFolder,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Breadcrumb {
    pub label: String,
    pub path: VfsPath,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SidebarLink {
    pub label: &'static str,
    pub path: VfsPath,
    pub active: bool,
}

/// What activating an entry did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    Navigated,
    Opened(WindowId),
    /// No app handles this file type.
    Ignored,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplorerSession {
    cwd: VfsPath,
    home: VfsPath,
    renaming: Option<VfsPath>,
    menu: ContextMenuHost<ExplorerCommand>,
}

impl ExplorerSession {
    pub fn new(config: &ShellConfig) -> Self {
        Self {
            cwd: config.home.clone(),
            home: config.home.clone(),
            renaming: None,
            menu: ContextMenuHost::default(),
        }
    }

    pub fn cwd(&self) -> &VfsPath {
        &self.cwd
    }

    /// Children of the cursor. A cursor whose folder was deleted elsewhere lists nothing.
    pub fn entries(&self, vfs: &Vfs) -> Vec<DirEntry> {
        vfs.list(&self.cwd).unwrap_or_default()
    }

    /// `~` for the root followed by one crumb per segment of the cursor.
    pub fn breadcrumbs(&self) -> Vec<Breadcrumb> {
        let mut crumbs = vec![Breadcrumb {
            label: "~".to_string(),
            path: VfsPath::root(),
        }];
        let mut path = VfsPath::root();
        for segment in self.cwd.segments() {
            path = path.join(segment.clone());
            crumbs.push(Breadcrumb {
                label: segment.clone(),
                path: path.clone(),
            });
        }
        crumbs
    }

    pub fn sidebar(&self) -> Vec<SidebarLink> {
        SIDEBAR_LOCATIONS
            .iter()
            .map(|&(label, child)| {
                let path = match child {
                    Some(child) => self.home.join(child),
                    None => self.home.clone(),
                };
                SidebarLink {
                    label,
                    active: path == self.cwd,
                    path,
                }
            })
            .collect()
    }

    /// Moves the cursor to `path`, which must be an existing folder.
    pub fn navigate_to(&mut self, vfs: &Vfs, path: VfsPath) -> Result<(), VfsError> {
        match vfs.stat(&path)? {
            NodeKind::Folder => {
                self.renaming = None;
                self.cwd = path;
                Ok(())
            }
            NodeKind::File => Err(VfsError::NotAFolder { path }),
        }
    }

    /// Goes to the parent folder. Returns `false` at the root.
    pub fn back(&mut self) -> bool {
        match self.cwd.parent() {
            Some(parent) => {
                self.renaming = None;
                self.cwd = parent;
                true
            }
            None => false,
        }
    }

    /// Jumps to breadcrumb `index` (segment count kept). `None` goes to the root.
    pub fn breadcrumb(&mut self, index: Option<usize>) {
        let keep = index.map_or(0, |index| (index + 1).min(self.cwd.depth()));
        self.cwd = VfsPath::from_segments(self.cwd.segments()[..keep].iter().cloned());
        self.renaming = None;
    }

    /// Double-click on entry `name`: folders are entered, known file types open in their app.
    pub fn activate(
        &mut self,
        shell: &mut DesktopShell,
        name: &str,
    ) -> Result<Activation, ExplorerError> {
        let path = self.cwd.join(name);
        let fs = shell.fs();
        match fs.stat(&path)? {
            NodeKind::Folder => {
                self.navigate_to(&fs, path)?;
                Ok(Activation::Navigated)
            }
            NodeKind::File => match app_for_file(&path) {
                Some(app_id) => Ok(Activation::Opened(shell.open_file_with(app_id, &path)?)),
                None => {
                    debug!(path = %path, "no app for file");
                    Ok(Activation::Ignored)
                }
            },
        }
    }

    /// Creates the first free `Untitled Folder` in the current folder.
    pub fn new_folder(&mut self, shell: &mut DesktopShell) -> Result<VfsPath, VfsError> {
        shell.new_folder(&self.cwd)
    }

    pub fn renaming(&self) -> Option<&VfsPath> {
        self.renaming.as_ref()
    }

    pub fn begin_rename(&mut self, path: VfsPath) {
        self.renaming = Some(path);
    }

    pub fn cancel_rename(&mut self) {
        self.renaming = None;
    }

    /// Applies the pending rename. A blank or unchanged name just closes the editor.
    ///
    /// Returns the new path when something was renamed.
    pub fn commit_rename(
        &mut self,
        shell: &mut DesktopShell,
        new_name: &str,
    ) -> Result<Option<VfsPath>, VfsError> {
        let Some(path) = self.renaming.take() else {
            return Ok(None);
        };
        let new_name = new_name.trim();
        if new_name.is_empty() || path.file_name() == Some(new_name) {
            return Ok(None);
        }
        shell.vfs_mut().rename(&path, new_name)?;
        let parent = path.parent().unwrap_or_else(VfsPath::root);
        Ok(Some(parent.join(new_name)))
    }

    /// Removes the entry and everything below it.
    pub fn delete(&mut self, shell: &mut DesktopShell, path: &VfsPath) -> Result<(), VfsError> {
        shell.vfs_mut().delete(path, DeleteOptions::recursive())?;
        if self.renaming.as_ref() == Some(path) {
            self.renaming = None;
        }
        Ok(())
    }

    pub fn context_menu(&self) -> Option<&ContextMenuRequest<ExplorerCommand>> {
        self.menu.current()
    }

    /// Right-click on entry `name`.
    pub fn show_entry_menu(&mut self, vfs: &Vfs, name: &str, position: Point) -> bool {
        let path = self.cwd.join(name);
        let Ok(kind) = vfs.stat(&path) else {
            return false;
        };
        let entries = entry_menu(&path, kind);
        self.menu.show(ContextMenuRequest { position, entries });
        true
    }

    /// Right-click on empty space in the listing.
    pub fn show_background_menu(&mut self, position: Point) {
        self.menu.show(ContextMenuRequest {
            position,
            entries: vec![MenuEntry::item("New Folder", ExplorerCommand::NewFolder)],
        });
    }

    pub fn dismiss_menu(&mut self) -> bool {
        self.menu.dismiss()
    }

    /// Runs entry `index` of the open menu. `Ok(false)` when the entry was inert.
    pub fn activate_menu_entry(
        &mut self,
        shell: &mut DesktopShell,
        index: usize,
    ) -> Result<bool, ExplorerError> {
        let Some(command) = self.menu.activate(index) else {
            return Ok(false);
        };
        self.run_command(shell, command)?;
        Ok(true)
    }

    pub fn run_command(
        &mut self,
        shell: &mut DesktopShell,
        command: ExplorerCommand,
    ) -> Result<(), ExplorerError> {
        debug!(?command, cwd = %self.cwd, "explorer command");
        match command {
            ExplorerCommand::Open(path) => {
                if let Some(name) = path.file_name() {
                    self.activate(shell, name)?;
                }
            }
            ExplorerCommand::Run(path) => {
                shell.open_file_with(AppId::StarPlayer, &path)?;
            }
            ExplorerCommand::EditInIde(path) => {
                shell.open_file_with(AppId::StarlightIde, &path)?;
            }
            ExplorerCommand::Rename(path) => self.begin_rename(path),
            ExplorerCommand::Delete(path) => self.delete(shell, &path)?,
            ExplorerCommand::NewFolder => {
                self.new_folder(shell)?;
            }
        }
        Ok(())
    }
}

fn entry_menu(path: &VfsPath, kind: NodeKind) -> Vec<MenuEntry<ExplorerCommand>> {
    let mut entries = if kind == NodeKind::File && is_star_file(path) {
        vec![
            MenuEntry::item("Run", ExplorerCommand::Run(path.clone())),
            MenuEntry::item("Edit in Starlight IDE", ExplorerCommand::EditInIde(path.clone())),
        ]
    } else {
        vec![MenuEntry::item("Open", ExplorerCommand::Open(path.clone()))]
    };
    entries.extend([
        MenuEntry::Separator,
        MenuEntry::item("Rename", ExplorerCommand::Rename(path.clone())),
        MenuEntry::item("Delete", ExplorerCommand::Delete(path.clone())),
    ]);
    entries
}

#[cfg(test)]
mod tests {
    use desktop_runtime::ManualClock;
    use desktop_vfs::VfsStore;
    use pretty_assertions::assert_eq;

    use super::*;

    fn setup() -> (DesktopShell, ExplorerSession) {
        let config = ShellConfig {
            placement_seed: Some(1),
            ..ShellConfig::default()
        };
        let session = ExplorerSession::new(&config);
        let shell = DesktopShell::with_parts(config, VfsStore::default(), ManualClock::new(0))
            .expect("shell");
        (shell, session)
    }

    fn names(entries: &[DirEntry]) -> Vec<&str> {
        entries.iter().map(|entry| entry.name.as_str()).collect()
    }

    #[test]
    fn starts_in_home_with_seeded_entries() {
        let (shell, session) = setup();
        assert_eq!(
            names(&session.entries(&shell.fs())),
            vec!["Desktop", "Documents", "Downloads", "welcome.txt"]
        );
        let active: Vec<_> = session
            .sidebar()
            .into_iter()
            .filter(|link| link.active)
            .map(|link| link.label)
            .collect();
        assert_eq!(active, vec!["Home"]);
    }

    #[test]
    fn breadcrumbs_and_back_walk_up_the_tree() {
        let (shell, mut session) = setup();
        let fs = shell.fs();
        session
            .navigate_to(&fs, VfsPath::parse("/home/guest/Documents"))
            .expect("navigate");

        let labels: Vec<_> = session
            .breadcrumbs()
            .into_iter()
            .map(|crumb| crumb.label)
            .collect();
        assert_eq!(labels, vec!["~", "home", "guest", "Documents"]);

        assert!(session.back());
        assert_eq!(session.cwd(), &VfsPath::parse("/home/guest"));

        session.breadcrumb(Some(0));
        assert_eq!(session.cwd(), &VfsPath::parse("/home"));
        session.breadcrumb(None);
        assert!(session.cwd().is_root());
        assert!(!session.back());
    }

    #[test]
    fn navigate_rejects_files_and_missing_paths() {
        let (shell, mut session) = setup();
        let fs = shell.fs();
        let file = VfsPath::parse("/home/guest/welcome.txt");
        assert_eq!(
            session.navigate_to(&fs, file.clone()),
            Err(VfsError::NotAFolder { path: file })
        );
        assert!(matches!(
            session.navigate_to(&fs, VfsPath::parse("/nope")),
            Err(VfsError::NotFound { .. })
        ));
        assert_eq!(session.cwd(), &VfsPath::parse("/home/guest"));
    }

    #[test]
    fn activating_entries_routes_by_type() {
        let (mut shell, mut session) = setup();
        assert_eq!(
            session.activate(&mut shell, "Documents"),
            Ok(Activation::Navigated)
        );

        let Ok(Activation::Opened(id)) = session.activate(&mut shell, "hello-world.star") else {
            panic!("star file should open");
        };
        let window = shell.desktop().window(id).expect("window");
        assert_eq!(window.app_id, AppId::StarPlayer);
        assert_eq!(
            window.file_path,
            Some(VfsPath::parse("/home/guest/Documents/hello-world.star"))
        );
    }

    #[test]
    fn new_folder_picks_free_name() {
        let (mut shell, mut session) = setup();
        let first = session.new_folder(&mut shell).expect("first");
        let second = session.new_folder(&mut shell).expect("second");

        assert_eq!(first, VfsPath::parse("/home/guest/Untitled Folder"));
        assert_eq!(second, VfsPath::parse("/home/guest/Untitled Folder 2"));
    }

    #[test]
    fn rename_trims_and_skips_noops() {
        let (mut shell, mut session) = setup();
        let welcome = VfsPath::parse("/home/guest/welcome.txt");

        session.begin_rename(welcome.clone());
        assert_eq!(session.commit_rename(&mut shell, "  "), Ok(None));
        session.begin_rename(welcome.clone());
        assert_eq!(session.commit_rename(&mut shell, "welcome.txt "), Ok(None));
        assert_eq!(shell.vfs().revision(), 0);

        session.begin_rename(welcome);
        assert_eq!(
            session.commit_rename(&mut shell, " hello.txt "),
            Ok(Some(VfsPath::parse("/home/guest/hello.txt")))
        );
        assert!(session.renaming().is_none());
        assert!(shell.fs().exists(&VfsPath::parse("/home/guest/hello.txt")));
    }

    #[test]
    fn rename_onto_sibling_is_rejected() {
        let (mut shell, mut session) = setup();
        session.begin_rename(VfsPath::parse("/home/guest/welcome.txt"));
        assert!(matches!(
            session.commit_rename(&mut shell, "Desktop"),
            Err(VfsError::AlreadyExists { .. })
        ));
    }

    #[test]
    fn star_files_get_run_and_ide_entries() {
        let (shell, mut session) = setup();
        let fs = shell.fs();
        session
            .navigate_to(&fs, VfsPath::parse("/home/guest/Documents"))
            .expect("navigate");

        assert!(session.show_entry_menu(&fs, "hello-world.star", Point::new(1, 1)));
        let labels: Vec<_> = session
            .context_menu()
            .expect("menu")
            .entries
            .iter()
            .map(|entry| entry.label().unwrap_or("---"))
            .collect();
        assert_eq!(
            labels,
            vec!["Run", "Edit in Starlight IDE", "---", "Rename", "Delete"]
        );

        assert!(session.show_entry_menu(&fs, "project-notes.txt", Point::new(1, 1)));
        let labels: Vec<_> = session
            .context_menu()
            .expect("menu")
            .entries
            .iter()
            .map(|entry| entry.label().unwrap_or("---"))
            .collect();
        assert_eq!(labels, vec!["Open", "---", "Rename", "Delete"]);
    }

    #[test]
    fn menu_delete_removes_folder_with_children() {
        let (mut shell, mut session) = setup();
        session.show_entry_menu(&shell.fs(), "Documents", Point::new(0, 0));

        assert_eq!(session.activate_menu_entry(&mut shell, 3), Ok(true));

        assert!(!shell.fs().exists(&VfsPath::parse("/home/guest/Documents")));
        assert!(session.context_menu().is_none());
    }

    #[test]
    fn menu_ide_entry_opens_starlight() {
        let (mut shell, mut session) = setup();
        let fs = shell.fs();
        session
            .navigate_to(&fs, VfsPath::parse("/home/guest/Documents"))
            .expect("navigate");
        session.show_entry_menu(&fs, "hello-world.star", Point::new(0, 0));

        assert_eq!(session.activate_menu_entry(&mut shell, 1), Ok(true));
        assert_eq!(
            shell.desktop().active_window().map(|w| w.app_id),
            Some(AppId::StarlightIde)
        );
    }

    #[test]
    fn background_menu_creates_folder_and_separators_are_inert() {
        let (mut shell, mut session) = setup();
        session.show_background_menu(Point::new(3, 3));
        assert_eq!(session.activate_menu_entry(&mut shell, 5), Ok(false));
        assert_eq!(session.activate_menu_entry(&mut shell, 0), Ok(true));
        assert!(shell
            .fs()
            .exists(&VfsPath::parse("/home/guest/Untitled Folder")));
        assert!(!session.dismiss_menu());
    }
}
