//! Dock visibility policy, dock items and the dock click/menu behaviour.

use crate::{
    apps::{pinned_apps, AppDescriptor},
    menus::{MenuAction, MenuEntry},
    model::{AppId, DesktopState, WindowId},
};

/// Auto-hide state for the dock.
///
/// With no maximized window the dock is always shown. Once a window is maximized a hide timer
/// runs; when it expires the dock hides unless the pointer is over the reveal strip. Hover
/// changes restart the timer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DockPolicy {
    delay_ms: u64,
    visible: bool,
    hovered: bool,
    maximized: bool,
    hide_deadline: Option<u64>,
}

impl DockPolicy {
    pub fn new(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            visible: true,
            hovered: false,
            maximized: false,
            hide_deadline: None,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    pub fn hide_deadline(&self) -> Option<u64> {
        self.hide_deadline
    }

    /// Feeds the current "some window is maximized" flag. Only transitions reset the timer.
    pub fn sync(&mut self, has_maximized_window: bool, now_ms: u64) {
        if has_maximized_window == self.maximized {
            return;
        }
        self.maximized = has_maximized_window;
        if has_maximized_window {
            self.hide_deadline = Some(now_ms.saturating_add(self.delay_ms));
        } else {
            self.visible = true;
            self.hide_deadline = None;
        }
    }

    /// Pointer entered or left the reveal strip. Ignored while nothing is maximized.
    pub fn set_hover(&mut self, hovered: bool, now_ms: u64) {
        if !self.maximized {
            return;
        }
        if hovered {
            self.visible = true;
        }
        if hovered != self.hovered {
            self.hovered = hovered;
            self.hide_deadline = Some(now_ms.saturating_add(self.delay_ms));
        }
    }

    /// Fires an expired hide timer. Returns `true` when visibility changed.
    pub fn tick(&mut self, now_ms: u64) -> bool {
        match self.hide_deadline {
            Some(deadline) if now_ms >= deadline => {
                self.hide_deadline = None;
                if !self.hovered && self.visible {
                    self.visible = false;
                    return true;
                }
                false
            }
            _ => false,
        }
    }
}

/// One dock icon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DockItem {
    pub app_id: AppId,
    pub name: &'static str,
    /// Has a window that is not minimized.
    pub running: bool,
}

/// Pinned apps in registry order with their running indicator.
pub fn dock_items(state: &DesktopState) -> Vec<DockItem> {
    pinned_apps()
        .into_iter()
        .map(|entry| DockItem {
            app_id: entry.app_id,
            name: entry.name,
            running: is_running(state, entry.app_id),
        })
        .collect()
}

/// Drives the dot under a dock icon. Minimized-only apps are not running.
pub fn is_running(state: &DesktopState, app_id: AppId) -> bool {
    state
        .windows
        .iter()
        .any(|w| w.app_id == app_id && !w.is_minimized)
}

/// What clicking a dock icon should do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DockClick {
    Restore(WindowId),
    Focus(WindowId),
    Open(AppId),
}

/// Restore beats focus; apps without a window are opened.
pub fn dock_click(state: &DesktopState, app_id: AppId) -> DockClick {
    match state.window_for_app(app_id) {
        Some(window) if window.is_minimized => DockClick::Restore(window.id),
        Some(window) => DockClick::Focus(window.id),
        None => DockClick::Open(app_id),
    }
}

/// Right-click menu for a dock icon: the app name (disabled), `Open`, and `Quit` while a window exists.
pub fn dock_menu(state: &DesktopState, app: &AppDescriptor) -> Vec<MenuEntry> {
    let mut entries = vec![
        MenuEntry::disabled(app.name, MenuAction::DockClick(app.app_id)),
        MenuEntry::item("Open", MenuAction::DockClick(app.app_id)),
    ];
    if let Some(window) = state.window_for_app(app.app_id) {
        entries.push(MenuEntry::item("Quit", MenuAction::CloseWindow(window.id)));
    }
    entries
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{
        apps::app_descriptor,
        model::{Point, Size, WindowRecord},
    };

    fn window(id: u64, app_id: AppId, minimized: bool) -> WindowRecord {
        WindowRecord {
            id: WindowId(id),
            app_id,
            title: app_id.title().to_string(),
            position: Point::default(),
            size: Size::default(),
            z_index: 10 + id as u32,
            is_minimized: minimized,
            is_maximized: false,
            file_path: None,
        }
    }

    #[test]
    fn dock_hides_after_delay_once_a_window_is_maximized() {
        let mut dock = DockPolicy::new(1000);
        dock.sync(true, 0);
        assert!(!dock.tick(999));
        assert!(dock.is_visible());
        assert!(dock.tick(1000));
        assert!(!dock.is_visible());

        dock.sync(false, 1500);
        assert!(dock.is_visible());
        assert_eq!(dock.hide_deadline(), None);
    }

    #[test]
    fn hovering_reveals_and_keeps_dock_open() {
        let mut dock = DockPolicy::new(1000);
        dock.sync(true, 0);
        dock.tick(1000);
        assert!(!dock.is_visible());

        dock.set_hover(true, 1200);
        assert!(dock.is_visible());
        assert!(!dock.tick(2200));
        assert!(dock.is_visible());

        dock.set_hover(false, 3000);
        assert!(!dock.tick(3999));
        assert!(dock.tick(4000));
        assert!(!dock.is_visible());
    }

    #[test]
    fn hover_is_ignored_without_maximized_windows() {
        let mut dock = DockPolicy::new(1000);
        dock.set_hover(true, 0);
        assert!(!dock.is_hovered());
        assert_eq!(dock.hide_deadline(), None);
    }

    #[test]
    fn repeated_sync_does_not_restart_timer() {
        let mut dock = DockPolicy::new(1000);
        dock.sync(true, 0);
        dock.sync(true, 900);
        assert_eq!(dock.hide_deadline(), Some(1000));
    }

    #[test]
    fn click_policy_follows_window_state() {
        let mut state = DesktopState::default();
        state.windows.push(window(1, AppId::Finder, true));
        state.windows.push(window(2, AppId::Terminal, false));

        assert_eq!(dock_click(&state, AppId::Finder), DockClick::Restore(WindowId(1)));
        assert_eq!(dock_click(&state, AppId::Terminal), DockClick::Focus(WindowId(2)));
        assert_eq!(dock_click(&state, AppId::Notes), DockClick::Open(AppId::Notes));

        let running: Vec<_> = dock_items(&state)
            .into_iter()
            .filter(|item| item.running)
            .map(|item| item.app_id)
            .collect();
        assert_eq!(running, vec![AppId::Terminal]);
    }

    #[test]
    fn dock_menu_offers_quit_only_for_open_apps() {
        let mut state = DesktopState::default();
        let labels = |entries: Vec<MenuEntry>| -> Vec<String> {
            entries
                .iter()
                .filter_map(|entry| entry.label().map(str::to_string))
                .collect()
        };

        assert_eq!(
            labels(dock_menu(&state, app_descriptor(AppId::Notes))),
            vec!["Notes", "Open"]
        );

        state.windows.push(window(4, AppId::Notes, true));
        let entries = dock_menu(&state, app_descriptor(AppId::Notes));
        assert_eq!(labels(entries.clone()), vec!["Notes", "Open", "Quit"]);
        assert!(!entries[0].is_enabled());
        assert_eq!(
            entries[2].action(),
            Some(&MenuAction::CloseWindow(WindowId(4)))
        );
    }
}
