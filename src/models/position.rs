//! Board coordinates, slot legality and tactical labels.

use serde::{Deserialize, Serialize};

/// Number of rows on the board (goalkeeper line at 0, forward line at 5).
pub const ROWS: usize = 6;
/// Number of columns on the board (left flank at 0, right flank at 4).
pub const COLS: usize = 5;

/// 4-4-2 used when a new squad is started, in shirt-number order.
pub const FORMATION_442: [Coordinate; 11] = [
    Coordinate::new(0, 2),
    Coordinate::new(1, 0),
    Coordinate::new(1, 1),
    Coordinate::new(1, 3),
    Coordinate::new(1, 4),
    Coordinate::new(3, 0),
    Coordinate::new(3, 1),
    Coordinate::new(3, 3),
    Coordinate::new(3, 4),
    Coordinate::new(5, 1),
    Coordinate::new(5, 3),
];

/// A slot on the board. Signed so that untrusted input can be checked rather than clamped.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub row: i32,
    pub col: i32,
}

impl Coordinate {
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Grid indices for a coordinate that already passed [`validate_coordinate`].
    pub(crate) fn index(self) -> (usize, usize) {
        (self.row as usize, self.col as usize)
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Short role code shown on a footballer's magnet.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum TacticalLabel {
    GK,
    DL,
    DC,
    DR,
    WBL,
    DMC,
    WBR,
    ML,
    MC,
    MR,
    AML,
    AMC,
    AMR,
    ST,
}

impl TacticalLabel {
    pub fn as_str(self) -> &'static str {
        match self {
            TacticalLabel::GK => "GK",
            TacticalLabel::DL => "DL",
            TacticalLabel::DC => "DC",
            TacticalLabel::DR => "DR",
            TacticalLabel::WBL => "WBL",
            TacticalLabel::DMC => "DMC",
            TacticalLabel::WBR => "WBR",
            TacticalLabel::ML => "ML",
            TacticalLabel::MC => "MC",
            TacticalLabel::MR => "MR",
            TacticalLabel::AML => "AML",
            TacticalLabel::AMC => "AMC",
            TacticalLabel::AMR => "AMR",
            TacticalLabel::ST => "ST",
        }
    }
}

impl std::fmt::Display for TacticalLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coordinate was outside the grid or on a slot that can never hold a footballer.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct InvalidCoordinate(pub Coordinate);

impl std::fmt::Display for InvalidCoordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Invalid board position {}", self.0)
    }
}

impl std::error::Error for InvalidCoordinate {}

/// Check that a coordinate is one of the 24 legal slots.
///
/// Row 0 only has the goalkeeper slot (column 2), row 5 only the three central
/// striker slots (columns 1..=3); rows 1..=4 use all five columns.
pub fn validate_coordinate(coord: Coordinate) -> Result<(), InvalidCoordinate> {
    let Coordinate { row, col } = coord;
    let legal = match row {
        0 => col == 2,
        1..=4 => (0..COLS as i32).contains(&col),
        5 => (1..=3).contains(&col),
        _ => false,
    };
    if legal {
        Ok(())
    } else {
        Err(InvalidCoordinate(coord))
    }
}

/// Tactical label of a legal slot.
pub fn label_for(coord: Coordinate) -> Result<TacticalLabel, InvalidCoordinate> {
    validate_coordinate(coord)?;
    let side = |left, centre, right| match coord.col {
        0 => left,
        4 => right,
        _ => centre,
    };
    let label = match coord.row {
        0 => TacticalLabel::GK,
        1 => side(TacticalLabel::DL, TacticalLabel::DC, TacticalLabel::DR),
        2 => side(TacticalLabel::WBL, TacticalLabel::DMC, TacticalLabel::WBR),
        3 => side(TacticalLabel::ML, TacticalLabel::MC, TacticalLabel::MR),
        4 => side(TacticalLabel::AML, TacticalLabel::AMC, TacticalLabel::AMR),
        _ => TacticalLabel::ST,
    };
    Ok(label)
}

/// Whether a dragged footballer may be dropped on `coord`.
///
/// Occupied slots are always targets (the drop becomes a swap); empty slots only when legal.
pub fn is_drop_target(coord: Coordinate, occupied: bool) -> bool {
    occupied || validate_coordinate(coord).is_ok()
}

/// All legal slots in row-major order.
pub fn legal_coordinates() -> impl Iterator<Item = Coordinate> {
    (0..ROWS as i32)
        .flat_map(|row| (0..COLS as i32).map(move |col| Coordinate::new(row, col)))
        .filter(|c| validate_coordinate(*c).is_ok())
}
