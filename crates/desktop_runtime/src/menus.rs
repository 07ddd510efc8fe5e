//! Context-menu entries and the single open menu slot.
//!
//! Menus are generic over the action payload so each surface (desktop, dock, file browser) can
//! carry its own command type.

use serde::{Deserialize, Serialize};

use crate::model::{AppId, Point, WindowId};

/// Shell-level menu commands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MenuAction {
    /// Same as clicking the app's dock icon.
    DockClick(AppId),
    OpenApp(AppId),
    CloseWindow(WindowId),
    /// Create an `Untitled Folder` in the home folder.
    NewDesktopFolder,
}

/// Clickable menu row. Disabled rows render greyed out and never fire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem<A> {
    pub label: String,
    pub enabled: bool,
    pub action: A,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum MenuEntry<A = MenuAction> {
    Separator,
    Item(MenuItem<A>),
}

impl<A> MenuEntry<A> {
    pub fn item(label: impl Into<String>, action: A) -> Self {
        Self::Item(MenuItem {
            label: label.into(),
            enabled: true,
            action,
        })
    }

    /// Entry that is shown but cannot be activated.
    pub fn disabled(label: impl Into<String>, action: A) -> Self {
        Self::Item(MenuItem {
            label: label.into(),
            enabled: false,
            action,
        })
    }

    pub fn label(&self) -> Option<&str> {
        match self {
            Self::Separator => None,
            Self::Item(item) => Some(item.label.as_str()),
        }
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self, Self::Item(item) if item.enabled)
    }

    pub fn action(&self) -> Option<&A> {
        match self {
            Self::Item(item) if item.enabled => Some(&item.action),
            _ => None,
        }
    }
}

/// A menu anchored at a desktop coordinate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextMenuRequest<A = MenuAction> {
    pub position: Point,
    pub entries: Vec<MenuEntry<A>>,
}

/// Holds at most one open context menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextMenuHost<A = MenuAction> {
    open: Option<ContextMenuRequest<A>>,
}

impl<A> Default for ContextMenuHost<A> {
    fn default() -> Self {
        Self { open: None }
    }
}

impl<A: Clone> ContextMenuHost<A> {
    /// Opens `request`, replacing any menu already shown.
    pub fn show(&mut self, request: ContextMenuRequest<A>) {
        self.open = Some(request);
    }

    pub fn current(&self) -> Option<&ContextMenuRequest<A>> {
        self.open.as_ref()
    }

    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    /// Any pointer interaction outside the menu closes it.
    pub fn dismiss(&mut self) -> bool {
        self.open.take().is_some()
    }

    /// Picks entry `index`. Enabled items close the menu and yield their action; separators,
    /// disabled items and out-of-range indices leave the menu open.
    pub fn activate(&mut self, index: usize) -> Option<A> {
        let action = self
            .open
            .as_ref()?
            .entries
            .get(index)
            .and_then(MenuEntry::action)
            .cloned()?;
        self.open = None;
        Some(action)
    }
}
