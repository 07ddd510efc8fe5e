//! Shared window-manager transition helpers used by the desktop reducer.

use crate::{
    model::{DesktopState, Point, ResizeEdge, Size, WindowId, WindowRecord},
    reducer::ReducerError,
};

/// Minimum allowed managed window width.
pub const MIN_WINDOW_WIDTH: i32 = 220;
/// Minimum allowed managed window height.
pub const MIN_WINDOW_HEIGHT: i32 = 140;

/// Hands out the next z value. The pool only grows; values are never reused.
pub fn allocate_z_index(state: &mut DesktopState) -> u32 {
    let z = state.next_z_index;
    state.next_z_index = state.next_z_index.saturating_add(1);
    z
}

/// Hands out the next window id, saturating at `u64::MAX`.
pub fn next_window_id(state: &mut DesktopState) -> WindowId {
    let id = WindowId(state.next_window_id);
    state.next_window_id = state.next_window_id.saturating_add(1);
    id
}

pub fn find_window_mut(
    state: &mut DesktopState,
    window_id: WindowId,
) -> Result<&mut WindowRecord, ReducerError> {
    state
        .windows
        .iter_mut()
        .find(|w| w.id == window_id)
        .ok_or(ReducerError::WindowNotFound(window_id))
}

/// Raises `window_id` to a fresh z value and marks it active.
///
/// Minimized windows stay minimized; use restore to bring them back.
pub fn focus_window_internal(
    state: &mut DesktopState,
    window_id: WindowId,
) -> Result<(), ReducerError> {
    if state.window(window_id).is_none() {
        return Err(ReducerError::WindowNotFound(window_id));
    }
    let z = allocate_z_index(state);
    find_window_mut(state, window_id)?.z_index = z;
    state.active_window = Some(window_id);
    Ok(())
}

/// Clears the active marker when it points at `window_id`.
pub fn release_active(state: &mut DesktopState, window_id: WindowId) {
    if state.active_window == Some(window_id) {
        state.active_window = None;
    }
}

/// Fallback placement used when the caller did not pick a position.
pub fn cascade_position(window_id: WindowId) -> Point {
    let offset = ((window_id.0.saturating_sub(1)) % 8) as i32 * 20;
    Point::new(150 + offset, 100 + offset)
}

/// Applies resize deltas for a given edge/corner drag. Arithmetic saturates at the `i32` bounds.
pub fn resize_rect(
    position: Point,
    size: Size,
    edge: ResizeEdge,
    dx: i32,
    dy: i32,
) -> (Point, Size) {
    let (mut x, mut y, mut w, mut h) = (position.x, position.y, size.width, size.height);
    let west = matches!(
        edge,
        ResizeEdge::West | ResizeEdge::NorthWest | ResizeEdge::SouthWest
    );
    let east = matches!(
        edge,
        ResizeEdge::East | ResizeEdge::NorthEast | ResizeEdge::SouthEast
    );
    let north = matches!(
        edge,
        ResizeEdge::North | ResizeEdge::NorthEast | ResizeEdge::NorthWest
    );
    let south = matches!(
        edge,
        ResizeEdge::South | ResizeEdge::SouthEast | ResizeEdge::SouthWest
    );

    if east {
        w = w.saturating_add(dx);
    }
    if west {
        // Anchor the right edge while the left one moves.
        let target = w.saturating_sub(dx).max(MIN_WINDOW_WIDTH);
        x = x.saturating_add(w.saturating_sub(target));
        w = target;
    }
    if south {
        h = h.saturating_add(dy);
    }
    if north {
        let target = h.saturating_sub(dy).max(MIN_WINDOW_HEIGHT);
        y = y.saturating_add(h.saturating_sub(target));
        h = target;
    }

    (
        Point::new(x, y),
        Size::new(w, h).clamped_min(MIN_WINDOW_WIDTH, MIN_WINDOW_HEIGHT),
    )
}
