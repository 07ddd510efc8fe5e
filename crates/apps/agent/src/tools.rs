//! Tools exposed to the reasoning service and their execution against the shell.
//!
//! Every tool runs synchronously against the latest filesystem snapshot and returns a JSON
//! object: `{"success": true, ...data}` or `{"success": false, "error": "..."}`. Results are
//! reported back to the service as-is.

use desktop_runtime::{AppId, DesktopShell, WindowId};
use desktop_vfs::{DeleteOptions, NodeKind, VfsError, VfsPath};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;

pub const LIST_DIRECTORY: &str = "getDirectoryListing";
pub const CREATE_FILE: &str = "createFile";
pub const READ_FILE: &str = "readFile";
pub const DELETE_NODE: &str = "deleteNode";
pub const OPEN_APP: &str = "openApp";
pub const CLOSE_APP: &str = "closeApp";
pub const TASK_COMPLETE: &str = "taskComplete";

const TOOL_NAMES: [&str; 7] = [
    LIST_DIRECTORY,
    CREATE_FILE,
    READ_FILE,
    DELETE_NODE,
    OPEN_APP,
    CLOSE_APP,
    TASK_COMPLETE,
];

/// A function call as emitted by the reasoning service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCall {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub args: Value,
}

impl FunctionCall {
    pub fn new(name: impl Into<String>, args: Value) -> Self {
        Self {
            id: None,
            name: name.into(),
            args,
        }
    }
}

/// Typed arguments of a known tool. Paths are segment arrays, e.g. `["home", "guest"]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "name", content = "args", rename_all = "camelCase")]
pub enum ToolCall {
    GetDirectoryListing {
        path: Vec<String>,
    },
    CreateFile {
        path: Vec<String>,
        content: String,
    },
    ReadFile {
        path: Vec<String>,
    },
    DeleteNode {
        path: Vec<String>,
    },
    OpenApp {
        #[serde(rename = "appId")]
        app_id: String,
        #[serde(rename = "filePath", default, skip_serializing_if = "Option::is_none")]
        file_path: Option<Vec<String>>,
    },
    CloseApp {
        #[serde(rename = "windowId")]
        window_id: String,
    },
    TaskComplete {
        reason: String,
    },
}

impl ToolCall {
    /// Decodes a raw call. The error text is what gets reported back to the service.
    pub fn parse(call: &FunctionCall) -> Result<Self, String> {
        if !TOOL_NAMES.contains(&call.name.as_str()) {
            return Err(format!("Unknown tool: {}", call.name));
        }
        let args = match &call.args {
            Value::Null => json!({}),
            other => other.clone(),
        };
        serde_json::from_value(json!({ "name": call.name, "args": args }))
            .map_err(|err| format!("Invalid arguments for {}: {err}", call.name))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::GetDirectoryListing { .. } => LIST_DIRECTORY,
            Self::CreateFile { .. } => CREATE_FILE,
            Self::ReadFile { .. } => READ_FILE,
            Self::DeleteNode { .. } => DELETE_NODE,
            Self::OpenApp { .. } => OPEN_APP,
            Self::CloseApp { .. } => CLOSE_APP,
            Self::TaskComplete { .. } => TASK_COMPLETE,
        }
    }
}

fn failure(error: impl Into<String>) -> Value {
    json!({ "success": false, "error": error.into() })
}

/// Decodes and runs one raw call.
pub fn execute_function_call(shell: &mut DesktopShell, call: &FunctionCall) -> Value {
    match ToolCall::parse(call) {
        Ok(tool) => execute_tool(shell, &tool),
        Err(error) => failure(error),
    }
}

pub fn execute_tool(shell: &mut DesktopShell, tool: &ToolCall) -> Value {
    info!(tool = tool.name(), "agent tool call");
    match tool {
        ToolCall::GetDirectoryListing { path } => {
            let path = VfsPath::from_segments(path);
            match shell.fs().list(&path) {
                Ok(listing) => json!({ "success": true, "listing": listing }),
                Err(_) => failure("Directory not found or not a directory."),
            }
        }
        ToolCall::CreateFile { path, content } => {
            let path = VfsPath::from_segments(path);
            let (Some(parent), Some(name)) = (path.parent(), path.file_name()) else {
                return failure("Parent directory not found.");
            };
            match shell.vfs_mut().put_file(&parent, name, content.as_str()) {
                Ok(_) => json!({ "success": true }),
                Err(VfsError::NotAFile { .. }) => failure("A folder with that name already exists."),
                Err(VfsError::InvalidName { .. }) => failure("Invalid file name."),
                Err(_) => failure("Parent directory not found."),
            }
        }
        ToolCall::ReadFile { path } => {
            let path = VfsPath::from_segments(path);
            match shell.fs().read(&path) {
                Ok(content) => json!({ "success": true, "content": content }),
                Err(_) => failure("File not found or not a file."),
            }
        }
        ToolCall::DeleteNode { path } => {
            let path = VfsPath::from_segments(path);
            let Some(parent) = path.parent() else {
                return failure("File or folder not found.");
            };
            if shell.fs().stat(&parent) != Ok(NodeKind::Folder) {
                return failure("Parent directory not found.");
            }
            match shell.vfs_mut().delete(&path, DeleteOptions::recursive()) {
                Ok(_) => json!({ "success": true }),
                Err(_) => failure("File or folder not found."),
            }
        }
        ToolCall::OpenApp { app_id, file_path } => {
            let app: AppId = match app_id.parse() {
                Ok(app) => app,
                Err(err) => return failure(err.to_string()),
            };
            let opened = match file_path {
                Some(segments) => shell
                    .open_file_with(app, &VfsPath::from_segments(segments))
                    .map_err(|err| err.to_string()),
                None => shell.open_app(app).map_err(|err| err.to_string()),
            };
            match opened {
                Ok(window_id) => json!({
                    "success": true,
                    "message": format!("Opening app {app_id}"),
                    "windowId": window_id.to_string(),
                }),
                Err(error) => failure(error),
            }
        }
        ToolCall::CloseApp { window_id } => {
            let closed = window_id
                .trim()
                .parse::<u64>()
                .ok()
                .map(|raw| shell.close_window(WindowId(raw)));
            match closed {
                Some(Ok(())) => json!({
                    "success": true,
                    "message": format!("Closing window {window_id}"),
                }),
                _ => failure(format!("Window not found: {window_id}")),
            }
        }
        ToolCall::TaskComplete { reason } => json!({ "success": true, "reason": reason }),
    }
}

/// Declaration handed to the reasoning service: name, description and JSON-schema parameters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolDeclaration {
    pub name: &'static str,
    pub description: &'static str,
    pub parameters: Value,
}

fn path_param(description: &str) -> Value {
    json!({ "type": "array", "description": description, "items": { "type": "string" } })
}

fn object(properties: Value, required: &[&str]) -> Value {
    json!({ "type": "object", "properties": properties, "required": required })
}

pub fn tool_declarations() -> Vec<ToolDeclaration> {
    vec![
        ToolDeclaration {
            name: LIST_DIRECTORY,
            description: "Lists the contents of a directory at a given path.",
            parameters: object(
                json!({ "path": path_param("The path to the directory, as an array of strings. e.g. ['home', 'guest', 'Documents']") }),
                &["path"],
            ),
        },
        ToolDeclaration {
            name: CREATE_FILE,
            description: "Creates a new file at a given path with specified content. Overwrites the file if it already exists.",
            parameters: object(
                json!({
                    "path": path_param("The full path for the new file, including the filename. e.g. ['home', 'guest', 'Documents', 'new-file.txt']"),
                    "content": { "type": "string", "description": "The content to write into the file." },
                }),
                &["path", "content"],
            ),
        },
        ToolDeclaration {
            name: READ_FILE,
            description: "Reads and returns the content of a file at a given path.",
            parameters: object(
                json!({ "path": path_param("The path to the file to read.") }),
                &["path"],
            ),
        },
        ToolDeclaration {
            name: DELETE_NODE,
            description: "Deletes a file or folder at a given path. This is permanent and cannot be undone.",
            parameters: object(
                json!({ "path": path_param("The path to the file or folder to delete.") }),
                &["path"],
            ),
        },
        ToolDeclaration {
            name: OPEN_APP,
            description: "Opens an application. Some applications can open a specific file.",
            parameters: object(
                json!({
                    "appId": { "type": "string", "description": "The ID of the app to open. e.g. 'terminal', 'orion', 'star-player'." },
                    "filePath": path_param("Optional: The path to a file to open with the app."),
                }),
                &["appId"],
            ),
        },
        ToolDeclaration {
            name: CLOSE_APP,
            description: "Closes a running application window.",
            parameters: object(
                json!({ "windowId": { "type": "string", "description": "The ID of the window to close." } }),
                &["windowId"],
            ),
        },
        ToolDeclaration {
            name: TASK_COMPLETE,
            description: "Call this function when the user's request has been fully completed.",
            parameters: object(
                json!({ "reason": { "type": "string", "description": "A brief summary of how the task was completed." } }),
                &["reason"],
            ),
        },
    ]
}
