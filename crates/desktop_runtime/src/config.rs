//! Shell configuration, loadable from TOML.

use desktop_vfs::VfsPath;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    model::{AppId, Size, FIRST_Z_INDEX},
    window_manager::{MIN_WINDOW_HEIGHT, MIN_WINDOW_WIDTH},
};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid shell config: {0}")]
    Parse(String),
    #[error("invalid shell config value for `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Rectangle new windows are scattered over: `x` in `[x, x + width)`, `y` in `[y, y + height)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnArea {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Default for SpawnArea {
    fn default() -> Self {
        Self {
            x: 150,
            y: 100,
            width: 200,
            height: 100,
        }
    }
}

/// Tunables for [`crate::DesktopShell`] and the apps that read the same settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    pub window_size: Size,
    pub first_z_index: u32,
    pub spawn_area: SpawnArea,
    pub dock_hide_delay_ms: u64,
    /// Apps that get a new window on every open instead of focusing the existing one.
    pub multi_instance_apps: Vec<AppId>,
    pub home: VfsPath,
    /// Top-level folders the terminal refuses to modify without `sudo`.
    pub protected_roots: Vec<String>,
    pub user_name: String,
    pub host_name: String,
    /// Fixed seed for window placement; `None` draws from OS entropy.
    pub placement_seed: Option<u64>,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            window_size: Size::default(),
            first_z_index: FIRST_Z_INDEX,
            spawn_area: SpawnArea::default(),
            dock_hide_delay_ms: 1000,
            multi_instance_apps: Vec::new(),
            home: VfsPath::from_segments(["home", "guest"]),
            protected_roots: vec!["sys".to_string(), "bin".to_string()],
            user_name: "guest".to_string(),
            host_name: "staros".to_string(),
            placement_seed: None,
        }
    }
}

impl ShellConfig {
    /// Parses and validates a TOML document. Missing keys keep their defaults.
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window_size.width < MIN_WINDOW_WIDTH || self.window_size.height < MIN_WINDOW_HEIGHT
        {
            return Err(ConfigError::Invalid {
                field: "window_size",
                reason: "below the minimum window size",
            });
        }
        if self.spawn_area.width <= 0 || self.spawn_area.height <= 0 {
            return Err(ConfigError::Invalid {
                field: "spawn_area",
                reason: "width and height must be positive",
            });
        }
        if self.user_name.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "user_name",
                reason: "must not be empty",
            });
        }
        Ok(())
    }

    pub fn allows_multiple(&self, app_id: AppId) -> bool {
        self.multi_instance_apps.contains(&app_id)
            || crate::apps::app_descriptor(app_id).multi_instance
    }

    /// True when `path` lives under one of the protected top-level folders.
    pub fn is_protected(&self, path: &VfsPath) -> bool {
        path.top_level()
            .is_some_and(|top| self.protected_roots.iter().any(|root| root == top))
    }
}
