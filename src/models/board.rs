//! Board grid: which footballer stands on which slot and which shirt number each slot carries.

use crate::models::footballer::{Footballer, FootballerId, FootballerIdentity};
use crate::models::position::{
    validate_coordinate, Coordinate, InvalidCoordinate, COLS, FORMATION_442, ROWS,
};
use serde::Serialize;
use std::sync::Arc;

/// Wire value meaning "no shirt number".
pub const NO_SHIRT_NUMBER: i64 = 255;

/// Errors that can occur while changing the board.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum BoardError {
    /// Outside the grid or on a slot that can never be used.
    InvalidCoordinate(Coordinate),
    /// The operation needs a footballer on this slot but it is empty.
    EmptySlot(Coordinate),
    /// Two footballers of a loaded squad claim the same slot.
    DuplicateCoordinate(Coordinate),
    /// The picked footballer already stands on another slot.
    AlreadyOnBoard(FootballerId),
}

impl std::fmt::Display for BoardError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BoardError::InvalidCoordinate(c) => write!(f, "Invalid board position {}", c),
            BoardError::EmptySlot(c) => write!(f, "No footballer at position {}", c),
            BoardError::DuplicateCoordinate(c) => {
                write!(f, "More than one footballer at position {}", c)
            }
            BoardError::AlreadyOnBoard(id) => {
                write!(f, "Footballer {} is already in the squad", id)
            }
        }
    }
}

impl std::error::Error for BoardError {}

impl From<InvalidCoordinate> for BoardError {
    fn from(e: InvalidCoordinate) -> Self {
        BoardError::InvalidCoordinate(e.0)
    }
}

/// Keep a shirt number only if it is within 1..=99; anything else clears the slot's number.
pub fn sanitize_shirt_number(number: Option<i64>) -> Option<u8> {
    number
        .filter(|n| (1..=99).contains(n))
        .and_then(|n| u8::try_from(n).ok())
}

/// Wire shirt number to board value (255 and other out-of-range values become `None`).
pub fn shirt_number_from_wire(number: i64) -> Option<u8> {
    if number == NO_SHIRT_NUMBER {
        return None;
    }
    sanitize_shirt_number(Some(number))
}

/// Board value to wire shirt number.
pub fn shirt_number_to_wire(number: Option<u8>) -> i64 {
    number.map(i64::from).unwrap_or(NO_SHIRT_NUMBER)
}

/// One slot. Footballer and shirt number are independent.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct Cell {
    pub footballer: Option<Footballer>,
    pub shirt_number: Option<u8>,
}

/// Immutable picture of the whole board, indexed `cells[row][col]`.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct Grid {
    pub cells: [[Cell; COLS]; ROWS],
}

impl Grid {
    pub fn cell(&self, coord: Coordinate) -> Result<&Cell, InvalidCoordinate> {
        validate_coordinate(coord)?;
        let (row, col) = coord.index();
        Ok(&self.cells[row][col])
    }

    fn cell_mut(&mut self, coord: Coordinate) -> Result<&mut Cell, InvalidCoordinate> {
        validate_coordinate(coord)?;
        let (row, col) = coord.index();
        Ok(&mut self.cells[row][col])
    }

    /// Occupied slots in row-major order with their shirt numbers.
    pub fn placements(&self) -> impl Iterator<Item = (&Footballer, Option<u8>)> + '_ {
        self.cells
            .iter()
            .flatten()
            .filter_map(|cell| cell.footballer.as_ref().map(|f| (f, cell.shirt_number)))
    }

    pub fn occupied_count(&self) -> usize {
        self.placements().count()
    }
}

/// The formation board. Every change replaces the grid as a whole, so a snapshot taken
/// before a change never observes part of it.
#[derive(Clone, Debug, Default)]
pub struct Board {
    grid: Arc<Grid>,
}

impl Board {
    /// Board with no footballers and no shirt numbers.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Board holding the default 4-4-2 of placeholders.
    pub fn default_formation() -> Self {
        let mut board = Self::empty();
        board.initialize_default();
        board
    }

    /// Current grid; cheap to clone and never changes after being handed out.
    pub fn snapshot(&self) -> Arc<Grid> {
        Arc::clone(&self.grid)
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn footballer_at(&self, coord: Coordinate) -> Option<&Footballer> {
        self.grid.cell(coord).ok().and_then(|c| c.footballer.as_ref())
    }

    pub fn shirt_number_at(&self, coord: Coordinate) -> Option<u8> {
        self.grid.cell(coord).ok().and_then(|c| c.shirt_number)
    }

    pub fn occupied_count(&self) -> usize {
        self.grid.occupied_count()
    }

    /// Whether a footballer with this id is already somewhere on the board.
    pub fn contains_footballer(&self, id: FootballerId) -> bool {
        self.grid.placements().any(|(f, _)| f.id == id)
    }

    /// Whether any slot still holds a placeholder.
    pub fn has_placeholders(&self) -> bool {
        self.grid.placements().any(|(f, _)| f.is_placeholder())
    }

    /// Clear the board and place eleven placeholders (ids -1, -2, ...) in the 4-4-2,
    /// numbered 1..=11 in formation order.
    pub fn initialize_default(&mut self) {
        let mut next = Grid::default();
        for ((index, coord), id) in FORMATION_442.iter().enumerate().zip((1..).map(|n: i64| -n)) {
            let (row, col) = coord.index();
            // FORMATION_442 only holds legal slots.
            if let Ok(placeholder) = Footballer::placeholder(id, *coord) {
                next.cells[row][col] = Cell {
                    footballer: Some(placeholder),
                    shirt_number: u8::try_from(index + 1).ok(),
                };
            }
        }
        self.grid = Arc::new(next);
    }

    /// Replace the board with a saved squad. `shirt_numbers[i]` is the wire number of
    /// `footballers[i]`; a missing entry counts as no number.
    ///
    /// Every coordinate is checked before anything is replaced, so a bad squad leaves the
    /// board as it was.
    pub fn load_squad(
        &mut self,
        footballers: Vec<Footballer>,
        shirt_numbers: &[i64],
    ) -> Result<(), BoardError> {
        let mut next = Grid::default();
        for (index, mut footballer) in footballers.into_iter().enumerate() {
            let coord = footballer.coordinate;
            footballer.relocate(coord)?;
            let cell = next.cell_mut(coord)?;
            if cell.footballer.is_some() {
                return Err(BoardError::DuplicateCoordinate(coord));
            }
            cell.footballer = Some(footballer);
            cell.shirt_number = shirt_numbers
                .get(index)
                .copied()
                .and_then(shirt_number_from_wire);
        }
        self.grid = Arc::new(next);
        Ok(())
    }

    /// Drop the footballer from `source` onto `target`.
    ///
    /// An empty target receives the footballer and the source's shirt number and the source
    /// is cleared. An occupied target swaps footballers and shirt numbers with the source.
    /// Both footballers take the label of the slot they end up on. Dropping on the same
    /// slot does nothing.
    pub fn move_or_swap(&mut self, source: Coordinate, target: Coordinate) -> Result<(), BoardError> {
        validate_coordinate(source)?;
        validate_coordinate(target)?;
        if source == target {
            return Ok(());
        }

        let mut next = Grid::clone(&self.grid);
        let from = next.cell_mut(source)?;
        let mut moving = from.footballer.take().ok_or(BoardError::EmptySlot(source))?;
        let source_number = from.shirt_number.take();
        moving.relocate(target)?;

        let to = next.cell_mut(target)?;
        let displaced = to.footballer.replace(moving);
        let target_number = std::mem::replace(&mut to.shirt_number, source_number);

        if let Some(mut other) = displaced {
            other.relocate(source)?;
            let from = next.cell_mut(source)?;
            from.footballer = Some(other);
            from.shirt_number = target_number;
        }

        self.grid = Arc::new(next);
        Ok(())
    }

    /// Set or clear the shirt number of a slot. Values outside 1..=99 clear it.
    pub fn set_shirt_number(&mut self, coord: Coordinate, number: Option<i64>) -> Result<(), BoardError> {
        validate_coordinate(coord)?;
        let mut next = Grid::clone(&self.grid);
        next.cell_mut(coord)?.shirt_number = sanitize_shirt_number(number);
        self.grid = Arc::new(next);
        Ok(())
    }

    /// Put a picked footballer's id, name and image on the slot; position, label and
    /// shirt number stay. A real footballer can stand on one slot only.
    pub fn assign_footballer_identity(
        &mut self,
        coord: Coordinate,
        identity: FootballerIdentity,
    ) -> Result<(), BoardError> {
        validate_coordinate(coord)?;
        let elsewhere = self
            .grid
            .placements()
            .any(|(f, _)| f.id == identity.id && f.coordinate != coord);
        if identity.id >= 0 && elsewhere {
            return Err(BoardError::AlreadyOnBoard(identity.id));
        }
        let mut next = Grid::clone(&self.grid);
        next.cell_mut(coord)?
            .footballer
            .as_mut()
            .ok_or(BoardError::EmptySlot(coord))?
            .assign_identity(identity);
        self.grid = Arc::new(next);
        Ok(())
    }
}
