use crate::config::EditorConfig;
use crate::model::LonLat;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MoveState {
    #[default]
    Idle,
    DraggingHandle,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn from_key(key: &str) -> Option<Direction> {
        match key {
            "ArrowUp" => Some(Direction::Up),
            "ArrowDown" => Some(Direction::Down),
            "ArrowLeft" => Some(Direction::Left),
            "ArrowRight" => Some(Direction::Right),
            _ => None,
        }
    }

    pub fn offset(self, step: f64) -> LonLat {
        match self {
            Direction::Up => LonLat::new(0.0, step),
            Direction::Down => LonLat::new(0.0, -step),
            Direction::Left => LonLat::new(-step, 0.0),
            Direction::Right => LonLat::new(step, 0.0),
        }
    }
}

/// Drag-handle state machine. It only decides whether a move may happen
/// and by how much; the session applies it.
#[derive(Clone, Copy, Debug, Default)]
pub struct MoveController {
    state: MoveState,
}

impl MoveController {
    pub fn state(&self) -> MoveState {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        self.state == MoveState::DraggingHandle
    }

    /// Pointer-down on the handle. Needs a selected shape.
    pub fn begin_drag(&mut self, has_selection: bool) -> bool {
        if !has_selection || self.is_dragging() {
            return false;
        }
        self.state = MoveState::DraggingHandle;
        true
    }

    pub fn end_drag(&mut self) -> bool {
        let was = self.is_dragging();
        self.state = MoveState::Idle;
        was
    }

    /// Offset carrying the shape's current centroid onto the handle.
    pub fn drag_offset(&self, handle: LonLat, centroid: LonLat) -> Option<LonLat> {
        if !self.is_dragging() || !handle.is_finite() {
            return None;
        }
        Some(handle.offset_from(centroid))
    }

    /// Arrow-key offset; none while the handle is being dragged.
    pub fn nudge_offset(&self, dir: Direction, large: bool, config: &EditorConfig) -> Option<LonLat> {
        if self.is_dragging() {
            return None;
        }
        let step = if large { config.nudge_step_large } else { config.nudge_step };
        Some(dir.offset(step))
    }
}
