//! Drag of a footballer magnet: at most one drag at a time, ended by a drop or a cancel.

use crate::models::{is_drop_target, legal_coordinates, Board, Coordinate, FootballerId};
use serde::{Deserialize, Serialize};

/// Pointer closer than this (in px) to a viewport edge cancels the drag.
pub const VIEWPORT_EDGE_MARGIN: f64 = 10.0;

/// What the drag session is doing.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "state")]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        source: Coordinate,
        footballer_id: FootballerId,
    },
}

/// Why a drag ended without a drop.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DragCancel {
    Explicit,
    WindowBlur,
    PageLeave,
    ViewportEdge,
}

/// Errors that can occur while dragging.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DragError {
    /// Drop without a drag in progress.
    NotDragging,
    /// Nothing to pick up at this slot.
    EmptySlot(Coordinate),
    /// The squad is finalized; magnets cannot be picked up.
    Finalized,
}

impl std::fmt::Display for DragError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DragError::NotDragging => write!(f, "No footballer is being dragged"),
            DragError::EmptySlot(c) => write!(f, "No footballer at position {}", c),
            DragError::Finalized => write!(f, "Squad is finalized"),
        }
    }
}

impl std::error::Error for DragError {}

#[derive(Clone, Debug, Default)]
pub struct DragSession {
    state: DragState,
}

impl DragSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// Slot the dragged footballer was picked up from.
    pub fn source(&self) -> Option<Coordinate> {
        match self.state {
            DragState::Dragging { source, .. } => Some(source),
            DragState::Idle => None,
        }
    }

    /// Pick up the footballer at `source`. Any drag already in progress is dropped silently.
    pub fn start(&mut self, board: &Board, source: Coordinate) -> Result<(), DragError> {
        let footballer = board
            .footballer_at(source)
            .ok_or(DragError::EmptySlot(source))?;
        if let DragState::Dragging { source: previous, .. } = self.state {
            log::debug!("Drag from {} replaced by drag from {}", previous, source);
        }
        self.state = DragState::Dragging {
            source,
            footballer_id: footballer.id,
        };
        Ok(())
    }

    /// End the drag over `target` (or over nothing). Returns the `(source, target)` move to
    /// apply; dropping over nothing or back on the source yields no move.
    pub fn drop_on(
        &mut self,
        target: Option<Coordinate>,
    ) -> Result<Option<(Coordinate, Coordinate)>, DragError> {
        let source = self.source().ok_or(DragError::NotDragging)?;
        self.state = DragState::Idle;
        Ok(target
            .filter(|t| *t != source)
            .map(|t| (source, t)))
    }

    /// Abandon the drag. Returns whether a drag was in progress.
    pub fn cancel(&mut self, reason: DragCancel) -> bool {
        let was_dragging = self.is_dragging();
        if was_dragging {
            log::debug!("Drag cancelled: {:?}", reason);
        }
        self.state = DragState::Idle;
        was_dragging
    }

    /// Track the pointer during a drag; nearing the viewport edge cancels it.
    /// Returns whether the drag was cancelled by this move. A viewport too small to have an
    /// inner area (or not a number) never cancels.
    pub fn pointer_moved(&mut self, x: f64, y: f64, viewport_width: f64, viewport_height: f64) -> bool {
        let min_extent = 2.0 * VIEWPORT_EDGE_MARGIN;
        let usable = viewport_width > min_extent && viewport_height > min_extent;
        if !self.is_dragging() || !usable {
            return false;
        }
        let near_edge = x < VIEWPORT_EDGE_MARGIN
            || y < VIEWPORT_EDGE_MARGIN
            || x > viewport_width - VIEWPORT_EDGE_MARGIN
            || y > viewport_height - VIEWPORT_EDGE_MARGIN;
        near_edge && self.cancel(DragCancel::ViewportEdge)
    }

    /// Empty slots the dragged footballer may be dropped on (occupied slots always accept a
    /// drop and are not listed). Empty while idle.
    pub fn drop_targets(&self, board: &Board) -> Vec<Coordinate> {
        if !self.is_dragging() {
            return Vec::new();
        }
        legal_coordinates()
            .filter(|c| board.footballer_at(*c).is_none() && is_drop_target(*c, false))
            .collect()
    }
}
