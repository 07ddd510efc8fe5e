use std::{fmt, str::FromStr};

use desktop_vfs::VfsPath;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_WINDOW_WIDTH: i32 = 720;
pub const DEFAULT_WINDOW_HEIGHT: i32 = 540;
/// First value handed out by the z-order pool.
pub const FIRST_Z_INDEX: u32 = 10;

/// Stable handle for an open window. Ids are never reused within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WindowId(pub u64);

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Every application the shell knows how to launch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AppId {
    #[serde(rename = "staros-agent")]
    Agent,
    Finder,
    Terminal,
    Notes,
    Orion,
    Settings,
    #[serde(rename = "textedit")]
    TextEdit,
    StarlightIde,
    StarPlayer,
}

impl AppId {
    /// All apps in registry order.
    pub const ALL: [AppId; 9] = [
        Self::Agent,
        Self::Finder,
        Self::Terminal,
        Self::Notes,
        Self::Orion,
        Self::Settings,
        Self::TextEdit,
        Self::StarlightIde,
        Self::StarPlayer,
    ];

    /// Wire name, matching the serde representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Agent => "staros-agent",
            Self::Finder => "finder",
            Self::Terminal => "terminal",
            Self::Notes => "notes",
            Self::Orion => "orion",
            Self::Settings => "settings",
            Self::TextEdit => "textedit",
            Self::StarlightIde => "starlight-ide",
            Self::StarPlayer => "star-player",
        }
    }

    /// Title shown in the window chrome and the dock tooltip.
    pub fn title(self) -> &'static str {
        match self {
            Self::Agent => "StarOS Agent",
            Self::Finder => "Stardrive",
            Self::Terminal => "Terminal",
            Self::Notes => "Notes",
            Self::Orion => "Orion Browser",
            Self::Settings => "Settings",
            Self::TextEdit => "TextEdit",
            Self::StarlightIde => "Starlight IDE",
            Self::StarPlayer => "Star Player",
        }
    }
}

impl fmt::Display for AppId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown app id `{0}`")]
pub struct UnknownAppId(pub String);

impl FromStr for AppId {
    type Err = UnknownAppId;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|app| app.as_str() == raw.trim())
            .ok_or_else(|| UnknownAppId(raw.to_string()))
    }
}

/// Desktop coordinate in pixels. The origin is the top-left corner of the desktop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Component-wise `self - other`, saturating at the `i32` bounds.
    pub fn minus(self, other: Point) -> Self {
        Self {
            x: self.x.saturating_sub(other.x),
            y: self.y.saturating_sub(other.y),
        }
    }
}

/// Outer window size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Raises each dimension to at least the given minimum.
    pub fn clamped_min(self, min_width: i32, min_height: i32) -> Self {
        Self {
            width: self.width.max(min_width),
            height: self.height.max(min_height),
        }
    }
}

impl Default for Size {
    fn default() -> Self {
        Self {
            width: DEFAULT_WINDOW_WIDTH,
            height: DEFAULT_WINDOW_HEIGHT,
        }
    }
}

/// One open window as the window manager tracks it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowRecord {
    pub id: WindowId,
    pub app_id: AppId,
    pub title: String,
    /// Top-left corner of the restored frame. Unchanged while maximized.
    pub position: Point,
    /// Restored frame size. Never below the minimum window size.
    pub size: Size,
    /// Paint order; the highest value is drawn on top.
    pub z_index: u32,
    pub is_minimized: bool,
    pub is_maximized: bool,
    /// Document the window was opened with, if any.
    pub file_path: Option<VfsPath>,
}

/// Lifecycle state derived from a record's flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowPhase {
    Normal,
    Maximized,
    Minimized,
}

impl WindowRecord {
    /// Minimized wins over maximized.
    pub fn phase(&self) -> WindowPhase {
        if self.is_minimized {
            WindowPhase::Minimized
        } else if self.is_maximized {
            WindowPhase::Maximized
        } else {
            WindowPhase::Normal
        }
    }
}

/// Window manager state: every open window plus the id and z-order pools.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesktopState {
    pub next_window_id: u64,
    pub next_z_index: u32,
    /// Open windows in creation order; paint order is by `z_index`.
    pub windows: Vec<WindowRecord>,
    pub active_window: Option<WindowId>,
}

impl Default for DesktopState {
    fn default() -> Self {
        Self::with_first_z_index(FIRST_Z_INDEX)
    }
}

impl DesktopState {
    pub fn with_first_z_index(first_z_index: u32) -> Self {
        Self {
            next_window_id: 1,
            next_z_index: first_z_index,
            windows: Vec::new(),
            active_window: None,
        }
    }

    pub fn window(&self, window_id: WindowId) -> Option<&WindowRecord> {
        self.windows.iter().find(|w| w.id == window_id)
    }

    pub fn active_window_id(&self) -> Option<WindowId> {
        self.active_window
    }

    pub fn active_window(&self) -> Option<&WindowRecord> {
        self.active_window.and_then(|id| self.window(id))
    }

    /// Highest-z window that is not minimized.
    pub fn topmost_visible(&self) -> Option<&WindowRecord> {
        self.windows
            .iter()
            .filter(|w| !w.is_minimized)
            .max_by_key(|w| w.z_index)
    }

    /// The dock auto-hides while this holds.
    pub fn has_maximized_window(&self) -> bool {
        self.windows.iter().any(|w| w.is_maximized)
    }

    /// First window hosting `app_id`, in creation order.
    pub fn window_for_app(&self, app_id: AppId) -> Option<&WindowRecord> {
        self.windows.iter().find(|w| w.app_id == app_id)
    }

    /// Windows sorted bottom-to-top.
    pub fn stacking_order(&self) -> Vec<&WindowRecord> {
        let mut ordered: Vec<_> = self.windows.iter().collect();
        ordered.sort_by_key(|w| w.z_index);
        ordered
    }
}

/// Parameters for opening a window. Unset fields fall back to the app defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenWindowRequest {
    pub app_id: AppId,
    pub title: Option<String>,
    pub position: Option<Point>,
    pub size: Option<Size>,
    pub file_path: Option<VfsPath>,
    /// When false, opening an app that already has a window focuses that window instead.
    pub allow_multiple: bool,
}

impl OpenWindowRequest {
    pub fn new(app_id: AppId) -> Self {
        Self {
            app_id,
            title: None,
            position: None,
            size: None,
            file_path: None,
            allow_multiple: crate::apps::app_descriptor(app_id).multi_instance,
        }
    }

    pub fn with_file(mut self, file_path: VfsPath) -> Self {
        self.file_path = Some(file_path);
        self
    }
}

/// Border or corner a resize gesture grabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResizeEdge {
    North,
    South,
    East,
    West,
    NorthEast,
    NorthWest,
    SouthEast,
    SouthWest,
}
