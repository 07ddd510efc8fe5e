//! Finder-style file browser and the text document used by the editor apps.

pub mod document;
pub mod session;

pub use document::{EditorKind, TextDocument};
pub use session::{
    Activation, Breadcrumb, ExplorerCommand, ExplorerError, ExplorerSession, SidebarLink,
};
