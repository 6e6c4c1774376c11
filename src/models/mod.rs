//! Data structures for the squad editor: positions, footballers, board, squad state.

mod board;
mod footballer;
mod position;
mod squad;

pub use board::{
    sanitize_shirt_number, shirt_number_from_wire, shirt_number_to_wire, Board, BoardError, Cell,
    Grid, NO_SHIRT_NUMBER,
};
pub use footballer::{short_name, Footballer, FootballerId, FootballerIdentity, SearchFootballer};
pub use position::{
    is_drop_target, label_for, legal_coordinates, validate_coordinate, Coordinate,
    InvalidCoordinate, TacticalLabel, COLS, FORMATION_442, ROWS,
};
pub use squad::{Selection, SquadState};
