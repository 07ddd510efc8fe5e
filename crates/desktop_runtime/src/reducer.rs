//! Reducer actions, side-effect intents, and transition logic for the window registry.

use thiserror::Error;

use crate::{
    gesture::{DragSession, Gesture, InteractionState, ResizeSession},
    model::{
        AppId, DesktopState, OpenWindowRequest, Point, ResizeEdge, Size, WindowId, WindowRecord,
    },
    window_manager::{
        allocate_z_index, cascade_position, find_window_mut, focus_window_internal,
        next_window_id, release_active, resize_rect,
    },
};

#[derive(Debug, Clone, PartialEq)]
/// Actions accepted by [`reduce_desktop`] to mutate [`DesktopState`].
pub enum DesktopAction {
    /// Open a window, or focus the existing one for single-instance apps.
    OpenWindow(OpenWindowRequest),
    CloseWindow {
        window_id: WindowId,
    },
    /// Raise and activate a window. Minimized windows are not restored.
    FocusWindow {
        window_id: WindowId,
    },
    MinimizeWindow {
        window_id: WindowId,
    },
    /// Clear the minimized flag, then focus.
    RestoreWindow {
        window_id: WindowId,
    },
    /// Flip the maximized flag, then focus.
    ToggleMaximize {
        window_id: WindowId,
    },
    /// Set the window position. Ignored while maximized.
    MoveWindow {
        window_id: WindowId,
        position: Point,
    },
    /// Set the window size. Ignored while maximized.
    ResizeWindow {
        window_id: WindowId,
        size: Size,
    },
    /// Pointer-down on a window's drag handle.
    BeginMove {
        window_id: WindowId,
        pointer: Point,
    },
    UpdateMove {
        window_id: WindowId,
        pointer: Point,
    },
    EndMove {
        window_id: WindowId,
    },
    /// Pointer-down on a resize edge or corner.
    BeginResize {
        window_id: WindowId,
        edge: ResizeEdge,
        pointer: Point,
    },
    UpdateResize {
        window_id: WindowId,
        pointer: Point,
    },
    EndResize {
        window_id: WindowId,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Side-effect intents emitted by [`reduce_desktop`] for the shell to act on.
pub enum RuntimeEffect {
    /// A new window record was created.
    WindowOpened(WindowId),
    /// A window was removed from the registry.
    WindowClosed(WindowId),
    /// Move keyboard focus into the newly focused window's primary input.
    FocusWindowInput(WindowId),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Reducer errors for invalid actions.
pub enum ReducerError {
    /// The target window id was not found in the current state.
    #[error("window not found: {0}")]
    WindowNotFound(WindowId),
    /// An open request finished without creating or focusing any window.
    #[error("open request for {0} produced no window")]
    NothingOpened(AppId),
}

/// Applies a [`DesktopAction`] to the desktop state and collects resulting side effects.
///
/// Window ids are checked before anything is touched, so a failing action leaves both
/// `state` and `interaction` as they were.
///
/// # Errors
///
/// Returns [`ReducerError::WindowNotFound`] when an action references a window that is not present.
pub fn reduce_desktop(
    state: &mut DesktopState,
    interaction: &mut InteractionState,
    action: DesktopAction,
) -> Result<Vec<RuntimeEffect>, ReducerError> {
    let mut effects = Vec::new();
    match action {
        DesktopAction::OpenWindow(req) => {
            if !req.allow_multiple {
                if let Some(existing) = state.window_for_app(req.app_id).map(|w| w.id) {
                    focus_window_internal(state, existing)?;
                    effects.push(RuntimeEffect::FocusWindowInput(existing));
                    return Ok(effects);
                }
            }

            let window_id = next_window_id(state);
            let z_index = allocate_z_index(state);
            state.windows.push(WindowRecord {
                id: window_id,
                app_id: req.app_id,
                title: req.title.unwrap_or_else(|| req.app_id.title().to_string()),
                position: req.position.unwrap_or_else(|| cascade_position(window_id)),
                size: req.size.unwrap_or_default(),
                z_index,
                is_minimized: false,
                is_maximized: false,
                file_path: req.file_path,
            });
            state.active_window = Some(window_id);
            effects.push(RuntimeEffect::WindowOpened(window_id));
            effects.push(RuntimeEffect::FocusWindowInput(window_id));
        }
        DesktopAction::CloseWindow { window_id } => {
            let before_len = state.windows.len();
            state.windows.retain(|w| w.id != window_id);
            if state.windows.len() == before_len {
                return Err(ReducerError::WindowNotFound(window_id));
            }
            release_active(state, window_id);
            interaction.end(window_id);
            effects.push(RuntimeEffect::WindowClosed(window_id));
        }
        DesktopAction::FocusWindow { window_id } => {
            focus_window_internal(state, window_id)?;
            effects.push(RuntimeEffect::FocusWindowInput(window_id));
        }
        DesktopAction::MinimizeWindow { window_id } => {
            find_window_mut(state, window_id)?.is_minimized = true;
            release_active(state, window_id);
            interaction.end(window_id);
        }
        DesktopAction::RestoreWindow { window_id } => {
            find_window_mut(state, window_id)?.is_minimized = false;
            focus_window_internal(state, window_id)?;
            effects.push(RuntimeEffect::FocusWindowInput(window_id));
        }
        DesktopAction::ToggleMaximize { window_id } => {
            let window = find_window_mut(state, window_id)?;
            window.is_maximized = !window.is_maximized;
            focus_window_internal(state, window_id)?;
            interaction.end(window_id);
            effects.push(RuntimeEffect::FocusWindowInput(window_id));
        }
        DesktopAction::MoveWindow {
            window_id,
            position,
        } => {
            let window = find_window_mut(state, window_id)?;
            if !window.is_maximized {
                window.position = position;
            }
        }
        DesktopAction::ResizeWindow { window_id, size } => {
            let window = find_window_mut(state, window_id)?;
            if !window.is_maximized {
                window.size = size;
            }
        }
        DesktopAction::BeginMove { window_id, pointer } => {
            let window = find_window_mut(state, window_id)?;
            if window.is_maximized {
                return Ok(effects);
            }
            let offset = pointer.minus(window.position);
            focus_window_internal(state, window_id)?;
            interaction.begin(Gesture::Drag(DragSession { window_id, offset }));
        }
        DesktopAction::UpdateMove { window_id, pointer } => {
            if let Some(session) = interaction.drag(window_id) {
                let window = find_window_mut(state, window_id)?;
                if !window.is_maximized {
                    window.position = session.position_for(pointer);
                }
            }
        }
        DesktopAction::EndMove { window_id } | DesktopAction::EndResize { window_id } => {
            interaction.end(window_id);
        }
        DesktopAction::BeginResize {
            window_id,
            edge,
            pointer,
        } => {
            let window = find_window_mut(state, window_id)?;
            if window.is_maximized {
                return Ok(effects);
            }
            let session = ResizeSession {
                window_id,
                edge,
                pointer_start: pointer,
                position_start: window.position,
                size_start: window.size,
            };
            focus_window_internal(state, window_id)?;
            interaction.begin(Gesture::Resize(session));
        }
        DesktopAction::UpdateResize { window_id, pointer } => {
            if let Some(session) = interaction.resize(window_id) {
                let delta = pointer.minus(session.pointer_start);
                let window = find_window_mut(state, window_id)?;
                if !window.is_maximized {
                    let (position, size) = resize_rect(
                        session.position_start,
                        session.size_start,
                        session.edge,
                        delta.x,
                        delta.y,
                    );
                    window.position = position;
                    window.size = size;
                }
            }
        }
    }

    Ok(effects)
}
