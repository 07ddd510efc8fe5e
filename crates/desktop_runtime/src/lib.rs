//! Window registry, shell chrome policies and the desktop shell composer.
//!
//! [`reduce_desktop`] is the pure window state machine. [`DesktopShell`] wraps it together with the
//! shared filesystem store, the dock auto-hide policy and context menus.

pub mod apps;
pub mod clock;
pub mod config;
pub mod dock;
pub mod gesture;
pub mod menus;
pub mod model;
pub mod reducer;
pub mod shell;
pub mod window_manager;

pub use apps::{
    app_descriptor, app_for_file, app_registry, is_star_file, pinned_apps, AppDescriptor,
};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{ConfigError, ShellConfig, SpawnArea};
pub use dock::{DockClick, DockItem, DockPolicy};
pub use gesture::{DragSession, Gesture, InteractionState, ResizeSession};
pub use menus::{ContextMenuHost, ContextMenuRequest, MenuAction, MenuEntry, MenuItem};
pub use model::*;
pub use reducer::{reduce_desktop, DesktopAction, ReducerError, RuntimeEffect};
pub use shell::{desktop_menu, unique_child_name, DesktopShell, ListenerId, ShellError};
