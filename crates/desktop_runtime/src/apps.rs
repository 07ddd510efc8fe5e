//! Static app registry and file-type routing.

use desktop_vfs::VfsPath;

use crate::model::AppId;

/// Static metadata for one launchable app.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppDescriptor {
    pub app_id: AppId,
    pub name: &'static str,
    /// Shown in the dock even when not running.
    pub pinned: bool,
    /// Every open request creates a new window.
    pub multi_instance: bool,
}

const fn descriptor(app_id: AppId, name: &'static str, pinned: bool) -> AppDescriptor {
    AppDescriptor {
        app_id,
        name,
        pinned,
        multi_instance: false,
    }
}

const APP_REGISTRY: [AppDescriptor; 9] = [
    descriptor(AppId::Agent, "StarOS Agent", true),
    descriptor(AppId::Finder, "Stardrive", true),
    descriptor(AppId::Terminal, "Terminal", true),
    descriptor(AppId::Notes, "Notes", true),
    descriptor(AppId::Orion, "Orion Browser", true),
    descriptor(AppId::Settings, "Settings", true),
    descriptor(AppId::TextEdit, "TextEdit", false),
    descriptor(AppId::StarlightIde, "Starlight IDE", false),
    descriptor(AppId::StarPlayer, "Star Player", false),
];

/// Every app in dock order, pinned apps first.
pub fn app_registry() -> &'static [AppDescriptor] {
    &APP_REGISTRY
}

/// Apps that always have a dock icon.
pub fn pinned_apps() -> Vec<AppDescriptor> {
    app_registry()
        .iter()
        .copied()
        .filter(|entry| entry.pinned)
        .collect()
}

/// Registry entry for `app_id`. Every [`AppId`] has exactly one.
pub fn app_descriptor(app_id: AppId) -> &'static AppDescriptor {
    let index = match app_id {
        AppId::Agent => 0,
        AppId::Finder => 1,
        AppId::Terminal => 2,
        AppId::Notes => 3,
        AppId::Orion => 4,
        AppId::Settings => 5,
        AppId::TextEdit => 6,
        AppId::StarlightIde => 7,
        AppId::StarPlayer => 8,
    };
    &APP_REGISTRY[index]
}

/// App that opens a file when it is double-clicked, picked by extension.
pub fn app_for_file(path: &VfsPath) -> Option<AppId> {
    let name = path.file_name()?;
    let (_, extension) = name.rsplit_once('.')?;
    match extension {
        "txt" => Some(AppId::TextEdit),
        "star" => Some(AppId::StarPlayer),
        _ => None,
    }
}

/// `.star` documents are played by Star Player rather than edited.
pub fn is_star_file(path: &VfsPath) -> bool {
    path.file_name().is_some_and(|name| name.ends_with(".star"))
}
