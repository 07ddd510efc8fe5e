//! Short-lived pointer gestures (drag and resize), kept apart from window records.

use std::collections::BTreeMap;

use crate::model::{Point, ResizeEdge, Size, WindowId};

/// Title-bar drag in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragSession {
    pub window_id: WindowId,
    /// `pointer - window.position` at pointer-down.
    pub offset: Point,
}

impl DragSession {
    /// Window position that keeps the grab point under `pointer`.
    pub fn position_for(&self, pointer: Point) -> Point {
        pointer.minus(self.offset)
    }
}

/// Edge or corner resize in progress. Deltas are measured from the pointer-down snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeSession {
    pub window_id: WindowId,
    pub edge: ResizeEdge,
    pub pointer_start: Point,
    pub position_start: Point,
    pub size_start: Size,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gesture {
    Drag(DragSession),
    Resize(ResizeSession),
}

/// In-flight gestures, at most one per window.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InteractionState {
    gestures: BTreeMap<WindowId, Gesture>,
}

impl InteractionState {
    pub fn get(&self, window_id: WindowId) -> Option<&Gesture> {
        self.gestures.get(&window_id)
    }

    pub fn drag(&self, window_id: WindowId) -> Option<DragSession> {
        match self.gestures.get(&window_id) {
            Some(Gesture::Drag(session)) => Some(*session),
            _ => None,
        }
    }

    pub fn resize(&self, window_id: WindowId) -> Option<ResizeSession> {
        match self.gestures.get(&window_id) {
            Some(Gesture::Resize(session)) => Some(*session),
            _ => None,
        }
    }

    /// Starts a gesture, replacing whatever that window had in flight.
    pub fn begin(&mut self, gesture: Gesture) {
        let window_id = match gesture {
            Gesture::Drag(session) => session.window_id,
            Gesture::Resize(session) => session.window_id,
        };
        self.gestures.insert(window_id, gesture);
    }

    /// Drops the window's gesture, if any.
    pub fn end(&mut self, window_id: WindowId) -> Option<Gesture> {
        self.gestures.remove(&window_id)
    }

    pub fn is_empty(&self) -> bool {
        self.gestures.is_empty()
    }

    pub fn len(&self) -> usize {
        self.gestures.len()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn drag_tracks_pointer_minus_offset() {
        let session = DragSession {
            window_id: WindowId(1),
            offset: Point::new(15, 8),
        };
        assert_eq!(session.position_for(Point::new(300, 200)), Point::new(285, 192));
    }

    #[test]
    fn gestures_for_different_windows_coexist() {
        let mut interaction = InteractionState::default();
        interaction.begin(Gesture::Drag(DragSession {
            window_id: WindowId(1),
            offset: Point::default(),
        }));
        interaction.begin(Gesture::Resize(ResizeSession {
            window_id: WindowId(2),
            edge: ResizeEdge::East,
            pointer_start: Point::default(),
            position_start: Point::default(),
            size_start: Size::default(),
        }));

        assert_eq!(interaction.len(), 2);
        assert!(interaction.drag(WindowId(1)).is_some());
        assert!(interaction.resize(WindowId(2)).is_some());
        assert!(interaction.drag(WindowId(2)).is_none());

        interaction.end(WindowId(1));
        assert!(interaction.get(WindowId(1)).is_none());
        assert_eq!(interaction.len(), 1);
    }
}
