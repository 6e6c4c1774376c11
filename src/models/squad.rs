//! Squad name/finalized flag and the selected slot.

use crate::models::position::Coordinate;
use serde::{Deserialize, Serialize};

/// Name of the squad and whether it is locked for editing.
///
/// A squad is finalized once it has been loaded from the server or saved to it.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct SquadState {
    pub name: String,
    pub finalized: bool,
}

impl SquadState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rename the squad. Ignored while finalized.
    pub fn set_name(&mut self, name: impl Into<String>) {
        if self.finalized {
            return;
        }
        self.name = name.into();
    }

    pub fn set_finalized(&mut self, finalized: bool) {
        self.finalized = finalized;
    }

    /// Back to an unnamed, editable squad.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

/// Slot currently opened in the footballer editor, if any.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Selection(Option<Coordinate>);

impl Selection {
    pub fn select(&mut self, coord: Option<Coordinate>) {
        self.0 = coord;
    }

    pub fn clear(&mut self) {
        self.0 = None;
    }

    pub fn get(&self) -> Option<Coordinate> {
        self.0
    }
}
