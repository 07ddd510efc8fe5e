//! Desktop shell composer.
//!
//! [`DesktopShell`] owns the window registry, the shared filesystem store, dock state and the open
//! context menu, and is the single writer for all of them. Every window change goes through
//! [`DesktopShell::dispatch`]: the reducer runs against a copy of the current state, and the copy
//! is committed only when the reducer succeeds.

use std::{fmt, rc::Rc};

use desktop_vfs::{NewNode, Vfs, VfsError, VfsPath, VfsStore};
use rand::{rngs::StdRng, Rng, SeedableRng};
use thiserror::Error;
use tracing::{debug, warn};

use crate::{
    apps::{app_descriptor, app_for_file},
    clock::{Clock, SystemClock},
    config::{ConfigError, ShellConfig},
    dock::{dock_click, dock_items, dock_menu, DockClick, DockItem, DockPolicy},
    gesture::InteractionState,
    menus::{ContextMenuHost, ContextMenuRequest, MenuAction, MenuEntry},
    model::{AppId, DesktopState, OpenWindowRequest, Point, ResizeEdge, Size, WindowId},
    reducer::{reduce_desktop, DesktopAction, ReducerError, RuntimeEffect},
};

/// Base name for folders created from menus.
pub const UNTITLED_FOLDER: &str = "Untitled Folder";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ShellError {
    #[error(transparent)]
    Reducer(#[from] ReducerError),
    #[error(transparent)]
    Vfs(#[from] VfsError),
    #[error("no app opens `{0}`")]
    NoAppForFile(VfsPath),
}

/// Handle returned by [`DesktopShell::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Box<dyn FnMut(&DesktopState)>;

/// Single owner of the window registry, filesystem store, dock and context menu.
pub struct DesktopShell {
    config: ShellConfig,
    state: Rc<DesktopState>,
    interaction: InteractionState,
    vfs: VfsStore,
    dock: DockPolicy,
    menu: ContextMenuHost,
    effects: Vec<RuntimeEffect>,
    clock: Box<dyn Clock>,
    rng: StdRng,
    next_listener: u64,
    listeners: Vec<(ListenerId, Listener)>,
}

impl fmt::Debug for DesktopShell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DesktopShell")
            .field("state", &self.state)
            .field("interaction", &self.interaction)
            .field("vfs", &self.vfs)
            .field("dock", &self.dock)
            .field("menu", &self.menu)
            .finish_non_exhaustive()
    }
}

impl DesktopShell {
    /// Builds a shell over the seed filesystem using the wall clock.
    pub fn new(config: ShellConfig) -> Result<Self, ConfigError> {
        Self::with_parts(config, VfsStore::default(), SystemClock)
    }

    /// Builds a shell from explicit parts. Fails when `config` does not validate.
    pub fn with_parts(
        config: ShellConfig,
        vfs: VfsStore,
        clock: impl Clock + 'static,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let rng = match config.placement_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self {
            state: Rc::new(DesktopState::with_first_z_index(config.first_z_index)),
            interaction: InteractionState::default(),
            vfs,
            dock: DockPolicy::new(config.dock_hide_delay_ms),
            menu: ContextMenuHost::default(),
            effects: Vec::new(),
            clock: Box::new(clock),
            rng,
            next_listener: 1,
            listeners: Vec::new(),
            config,
        })
    }

    pub fn config(&self) -> &ShellConfig {
        &self.config
    }

    /// Committed window state. The handle stays valid across later dispatches.
    pub fn snapshot(&self) -> Rc<DesktopState> {
        Rc::clone(&self.state)
    }

    pub fn desktop(&self) -> &DesktopState {
        &self.state
    }

    pub fn interaction(&self) -> &InteractionState {
        &self.interaction
    }

    pub fn vfs(&self) -> &VfsStore {
        &self.vfs
    }

    pub fn vfs_mut(&mut self) -> &mut VfsStore {
        &mut self.vfs
    }

    /// Latest filesystem snapshot.
    pub fn fs(&self) -> Vfs {
        self.vfs.snapshot()
    }

    pub fn dock(&self) -> &DockPolicy {
        &self.dock
    }

    pub fn context_menu(&self) -> Option<&ContextMenuRequest> {
        self.menu.current()
    }

    /// Takes the effects queued since the last call.
    pub fn drain_effects(&mut self) -> Vec<RuntimeEffect> {
        std::mem::take(&mut self.effects)
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&DesktopState) + 'static) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    /// Runs `action` through the reducer and commits the result.
    ///
    /// # Errors
    ///
    /// Returns the reducer error unchanged; committed state is left as it was.
    pub fn dispatch(&mut self, action: DesktopAction) -> Result<Vec<RuntimeEffect>, ReducerError> {
        let mut desktop = DesktopState::clone(&self.state);
        let mut ui = self.interaction.clone();

        match reduce_desktop(&mut desktop, &mut ui, action) {
            Ok(new_effects) => {
                self.interaction = ui;
                if desktop != *self.state {
                    self.state = Rc::new(desktop);
                    self.dock
                        .sync(self.state.has_maximized_window(), self.clock.now_ms());
                    let committed = &*self.state;
                    for (_, listener) in &mut self.listeners {
                        listener(committed);
                    }
                }
                self.effects.extend(new_effects.iter().cloned());
                Ok(new_effects)
            }
            Err(err) => {
                warn!("desktop reducer error: {err}");
                Err(err)
            }
        }
    }

    /// Opens `app_id` at a random spot inside the configured spawn area, or focuses its window.
    pub fn open_app(&mut self, app_id: AppId) -> Result<WindowId, ReducerError> {
        let request = self.open_request(app_id);
        self.open_window(request)
    }

    /// Opens `path` in the app registered for its extension.
    pub fn open_file(&mut self, path: &VfsPath) -> Result<WindowId, ShellError> {
        let app_id = app_for_file(path).ok_or_else(|| ShellError::NoAppForFile(path.clone()))?;
        self.open_file_with(app_id, path)
    }

    pub fn open_file_with(&mut self, app_id: AppId, path: &VfsPath) -> Result<WindowId, ShellError> {
        let request = self.open_request(app_id).with_file(path.clone());
        Ok(self.open_window(request)?)
    }

    /// Dispatches an open request and returns the window that ended up active.
    pub fn open_window(&mut self, request: OpenWindowRequest) -> Result<WindowId, ReducerError> {
        let app_id = request.app_id;
        let effects = self.dispatch(DesktopAction::OpenWindow(request))?;
        effects
            .iter()
            .find_map(|effect| match effect {
                RuntimeEffect::FocusWindowInput(id) => Some(*id),
                _ => None,
            })
            .ok_or(ReducerError::NothingOpened(app_id))
    }

    fn open_request(&mut self, app_id: AppId) -> OpenWindowRequest {
        let area = self.config.spawn_area;
        let position = Point::new(
            self.rng.gen_range(area.x..area.x + area.width),
            self.rng.gen_range(area.y..area.y + area.height),
        );
        OpenWindowRequest {
            app_id,
            title: Some(app_descriptor(app_id).name.to_string()),
            position: Some(position),
            size: Some(self.config.window_size),
            file_path: None,
            allow_multiple: self.config.allows_multiple(app_id),
        }
    }

    pub fn close_window(&mut self, window_id: WindowId) -> Result<(), ReducerError> {
        self.dispatch(DesktopAction::CloseWindow { window_id }).map(drop)
    }

    pub fn focus_window(&mut self, window_id: WindowId) -> Result<(), ReducerError> {
        self.dispatch(DesktopAction::FocusWindow { window_id }).map(drop)
    }

    pub fn minimize_window(&mut self, window_id: WindowId) -> Result<(), ReducerError> {
        self.dispatch(DesktopAction::MinimizeWindow { window_id }).map(drop)
    }

    pub fn restore_window(&mut self, window_id: WindowId) -> Result<(), ReducerError> {
        self.dispatch(DesktopAction::RestoreWindow { window_id }).map(drop)
    }

    pub fn toggle_maximize(&mut self, window_id: WindowId) -> Result<(), ReducerError> {
        self.dispatch(DesktopAction::ToggleMaximize { window_id }).map(drop)
    }

    pub fn move_window(&mut self, window_id: WindowId, position: Point) -> Result<(), ReducerError> {
        self.dispatch(DesktopAction::MoveWindow {
            window_id,
            position,
        })
        .map(drop)
    }

    pub fn resize_window(&mut self, window_id: WindowId, size: Size) -> Result<(), ReducerError> {
        self.dispatch(DesktopAction::ResizeWindow { window_id, size })
            .map(drop)
    }

    /// Global pointer-down. Closes any open context menu.
    pub fn pointer_down(&mut self) {
        if self.menu.dismiss() {
            debug!("context menu dismissed");
        }
    }

    pub fn begin_drag(&mut self, window_id: WindowId, pointer: Point) -> Result<(), ReducerError> {
        self.pointer_down();
        self.dispatch(DesktopAction::BeginMove { window_id, pointer })
            .map(drop)
    }

    pub fn drag_to(&mut self, window_id: WindowId, pointer: Point) -> Result<(), ReducerError> {
        self.dispatch(DesktopAction::UpdateMove { window_id, pointer })
            .map(drop)
    }

    pub fn end_drag(&mut self, window_id: WindowId) -> Result<(), ReducerError> {
        self.dispatch(DesktopAction::EndMove { window_id }).map(drop)
    }

    pub fn begin_resize(
        &mut self,
        window_id: WindowId,
        edge: ResizeEdge,
        pointer: Point,
    ) -> Result<(), ReducerError> {
        self.pointer_down();
        self.dispatch(DesktopAction::BeginResize {
            window_id,
            edge,
            pointer,
        })
        .map(drop)
    }

    pub fn resize_to(&mut self, window_id: WindowId, pointer: Point) -> Result<(), ReducerError> {
        self.dispatch(DesktopAction::UpdateResize { window_id, pointer })
            .map(drop)
    }

    pub fn end_resize(&mut self, window_id: WindowId) -> Result<(), ReducerError> {
        self.dispatch(DesktopAction::EndResize { window_id })
            .map(drop)
    }

    /// Pointer entered or left the dock reveal strip.
    pub fn set_dock_hover(&mut self, hovered: bool) {
        let now = self.clock.now_ms();
        self.dock.set_hover(hovered, now);
    }

    /// Advances timers. Returns `true` when dock visibility changed.
    pub fn tick(&mut self) -> bool {
        let now = self.clock.now_ms();
        self.dock.tick(now)
    }

    pub fn dock_items(&self) -> Vec<DockItem> {
        dock_items(&self.state)
    }

    /// Restores, focuses or opens the app depending on its window state.
    pub fn click_dock_icon(&mut self, app_id: AppId) -> Result<WindowId, ReducerError> {
        match dock_click(&self.state, app_id) {
            DockClick::Restore(window_id) => {
                self.restore_window(window_id)?;
                Ok(window_id)
            }
            DockClick::Focus(window_id) => {
                self.focus_window(window_id)?;
                Ok(window_id)
            }
            DockClick::Open(app_id) => self.open_app(app_id),
        }
    }

    pub fn show_context_menu(&mut self, request: ContextMenuRequest) {
        self.menu.show(request);
    }

    /// Opens the right-click menu for `app_id`'s dock icon.
    pub fn show_dock_menu(&mut self, app_id: AppId, position: Point) {
        let entries = dock_menu(&self.state, app_descriptor(app_id));
        self.menu.show(ContextMenuRequest { position, entries });
    }

    pub fn show_desktop_menu(&mut self, position: Point) {
        self.menu.show(ContextMenuRequest {
            position,
            entries: desktop_menu(),
        });
    }

    /// Activates entry `index` of the open menu and runs its action.
    ///
    /// Returns `Ok(false)` when the entry was inert (separator, disabled or out of range).
    pub fn activate_menu_entry(&mut self, index: usize) -> Result<bool, ShellError> {
        let Some(action) = self.menu.activate(index) else {
            return Ok(false);
        };
        match action {
            MenuAction::DockClick(app_id) => {
                self.click_dock_icon(app_id)?;
            }
            MenuAction::OpenApp(app_id) => {
                self.open_app(app_id)?;
            }
            MenuAction::CloseWindow(window_id) => self.close_window(window_id)?,
            MenuAction::NewDesktopFolder => {
                let home = self.config.home.clone();
                self.new_folder(&home)?;
            }
        }
        Ok(true)
    }

    /// Creates the first free `Untitled Folder`, `Untitled Folder 2`, ... inside `parent`.
    pub fn new_folder(&mut self, parent: &VfsPath) -> Result<VfsPath, VfsError> {
        let name = unique_child_name(self.vfs.current(), parent, UNTITLED_FOLDER)?;
        self.vfs.create(parent, &name, NewNode::Folder)?;
        Ok(parent.join(name))
    }

    /// Display name of the app owning the active window.
    pub fn active_app_name(&self) -> Option<&'static str> {
        self.state
            .active_window()
            .map(|window| app_descriptor(window.app_id).name)
    }
}

/// Right-click menu for the desktop background.
pub fn desktop_menu() -> Vec<MenuEntry> {
    vec![
        MenuEntry::item("New Folder", MenuAction::NewDesktopFolder),
        MenuEntry::Separator,
        MenuEntry::item("Change Wallpaper", MenuAction::OpenApp(AppId::Settings)),
        MenuEntry::item("System Settings", MenuAction::OpenApp(AppId::Settings)),
    ]
}

/// First of `base`, `base 2`, `base 3`, ... not already used inside `parent`.
pub fn unique_child_name(vfs: &Vfs, parent: &VfsPath, base: &str) -> Result<String, VfsError> {
    let taken: Vec<String> = vfs
        .list(parent)?
        .into_iter()
        .map(|entry| entry.name)
        .collect();
    if !taken.iter().any(|name| name == base) {
        return Ok(base.to_string());
    }
    let mut counter = 2;
    loop {
        let candidate = format!("{base} {counter}");
        if !taken.contains(&candidate) {
            return Ok(candidate);
        }
        counter += 1;
    }
}
