//! Integration tests for the formation board: slots, labels, default formation, move/swap and loading.

use squad_builder_web::models::{
    legal_coordinates, sanitize_shirt_number, short_name, shirt_number_from_wire,
    shirt_number_to_wire, FORMATION_442, NO_SHIRT_NUMBER,
};
use squad_builder_web::{
    label_for, validate_coordinate, Board, BoardError, Coordinate, Footballer, FootballerIdentity,
    InvalidCoordinate, SearchFootballer, TacticalLabel,
};

fn c(row: i32, col: i32) -> Coordinate {
    Coordinate::new(row, col)
}

fn identity(id: i64, name: &str) -> FootballerIdentity {
    FootballerIdentity {
        id,
        name: name.to_string(),
        image_url: None,
    }
}

#[test]
fn only_24_slots_are_legal() {
    assert_eq!(legal_coordinates().count(), 24);
    assert_eq!(validate_coordinate(c(0, 0)), Err(InvalidCoordinate(c(0, 0))));
    assert!(validate_coordinate(c(0, 2)).is_ok());
    assert!(validate_coordinate(c(5, 0)).is_err());
    assert!(validate_coordinate(c(5, 4)).is_err());
    assert!(validate_coordinate(c(6, 2)).is_err());
    assert!(validate_coordinate(c(-1, 2)).is_err());
    assert!(validate_coordinate(c(2, 5)).is_err());
}

#[test]
fn labels_follow_row_and_flank() {
    assert_eq!(label_for(c(0, 2)), Ok(TacticalLabel::GK));
    assert_eq!(label_for(c(1, 0)), Ok(TacticalLabel::DL));
    assert_eq!(label_for(c(1, 2)), Ok(TacticalLabel::DC));
    assert_eq!(label_for(c(1, 4)), Ok(TacticalLabel::DR));
    assert_eq!(label_for(c(2, 0)), Ok(TacticalLabel::WBL));
    assert_eq!(label_for(c(2, 3)), Ok(TacticalLabel::DMC));
    assert_eq!(label_for(c(2, 4)), Ok(TacticalLabel::WBR));
    assert_eq!(label_for(c(3, 0)), Ok(TacticalLabel::ML));
    assert_eq!(label_for(c(3, 1)), Ok(TacticalLabel::MC));
    assert_eq!(label_for(c(3, 4)), Ok(TacticalLabel::MR));
    assert_eq!(label_for(c(4, 0)), Ok(TacticalLabel::AML));
    assert_eq!(label_for(c(4, 2)), Ok(TacticalLabel::AMC));
    assert_eq!(label_for(c(4, 4)), Ok(TacticalLabel::AMR));
    assert_eq!(label_for(c(5, 2)), Ok(TacticalLabel::ST));
    assert!(label_for(c(0, 1)).is_err());
}

#[test]
fn default_formation_is_442_of_placeholders() {
    let board = Board::default_formation();
    assert_eq!(board.occupied_count(), 11);
    assert!(board.has_placeholders());
    for (index, coord) in FORMATION_442.iter().enumerate() {
        let f = board.footballer_at(*coord).unwrap();
        assert_eq!(f.id, -(index as i64 + 1));
        assert!(f.is_placeholder());
        assert_eq!(f.coordinate, *coord);
        assert_eq!(f.label, label_for(*coord).unwrap());
        assert_eq!(board.shirt_number_at(*coord), Some(index as u8 + 1));
    }
    let gk = board.footballer_at(c(0, 2)).unwrap();
    assert_eq!((gk.id, gk.label), (-1, TacticalLabel::GK));
    let strikers: Vec<_> = [c(5, 1), c(5, 3)]
        .iter()
        .map(|s| board.footballer_at(*s).unwrap().label)
        .collect();
    assert_eq!(strikers, vec![TacticalLabel::ST, TacticalLabel::ST]);
}

#[test]
fn initialize_default_discards_previous_board() {
    let mut board = Board::default_formation();
    board.move_or_swap(c(0, 2), c(2, 2)).unwrap();
    board.set_shirt_number(c(1, 0), Some(42)).unwrap();
    board.initialize_default();
    assert_eq!(board.grid(), Board::default_formation().grid());
}

#[test]
fn swap_exchanges_footballers_labels_and_shirt_numbers() {
    let mut board = Board::default_formation();
    board.move_or_swap(c(0, 2), c(1, 0)).unwrap();

    let dl = board.footballer_at(c(1, 0)).unwrap();
    assert_eq!(dl.id, -1);
    assert_eq!(dl.label, TacticalLabel::DL);
    assert_eq!(dl.coordinate, c(1, 0));
    assert_eq!(board.shirt_number_at(c(1, 0)), Some(1));

    let gk = board.footballer_at(c(0, 2)).unwrap();
    assert_eq!(gk.id, -2);
    assert_eq!(gk.label, TacticalLabel::GK);
    assert_eq!(board.shirt_number_at(c(0, 2)), Some(2));
    assert_eq!(board.occupied_count(), 11);
}

#[test]
fn move_to_empty_slot_carries_shirt_number_and_clears_source() {
    let mut board = Board::default_formation();
    board.move_or_swap(c(3, 1), c(4, 2)).unwrap();

    assert!(board.footballer_at(c(3, 1)).is_none());
    assert_eq!(board.shirt_number_at(c(3, 1)), None);
    let amc = board.footballer_at(c(4, 2)).unwrap();
    assert_eq!(amc.id, -7);
    assert_eq!(amc.label, TacticalLabel::AMC);
    assert_eq!(board.shirt_number_at(c(4, 2)), Some(7));
    assert_eq!(board.occupied_count(), 11);
}

#[test]
fn move_onto_same_slot_changes_nothing() {
    let mut board = Board::default_formation();
    let before = board.snapshot();
    board.move_or_swap(c(1, 1), c(1, 1)).unwrap();
    assert_eq!(*before, *board.snapshot());
}

#[test]
fn move_rejects_illegal_coordinates_and_empty_source() {
    let mut board = Board::default_formation();
    let before = board.snapshot();
    assert_eq!(
        board.move_or_swap(c(0, 2), c(0, 0)),
        Err(BoardError::InvalidCoordinate(c(0, 0)))
    );
    assert_eq!(
        board.move_or_swap(c(9, 9), c(1, 1)),
        Err(BoardError::InvalidCoordinate(c(9, 9)))
    );
    assert_eq!(
        board.move_or_swap(c(2, 2), c(1, 1)),
        Err(BoardError::EmptySlot(c(2, 2)))
    );
    assert_eq!(*before, *board.snapshot());
}

#[test]
fn snapshots_are_not_affected_by_later_moves() {
    let mut board = Board::default_formation();
    let before = board.snapshot();
    board.move_or_swap(c(0, 2), c(2, 2)).unwrap();
    assert_eq!(before.cell(c(0, 2)).unwrap().footballer.as_ref().unwrap().id, -1);
    assert!(board.footballer_at(c(0, 2)).is_none());
}

#[test]
fn shirt_numbers_outside_1_to_99_clear_the_slot() {
    let mut board = Board::default_formation();
    board.set_shirt_number(c(0, 2), Some(99)).unwrap();
    assert_eq!(board.shirt_number_at(c(0, 2)), Some(99));
    board.set_shirt_number(c(0, 2), Some(100)).unwrap();
    assert_eq!(board.shirt_number_at(c(0, 2)), None);
    board.set_shirt_number(c(1, 0), Some(0)).unwrap();
    assert_eq!(board.shirt_number_at(c(1, 0)), None);
    board.set_shirt_number(c(1, 1), None).unwrap();
    assert_eq!(board.shirt_number_at(c(1, 1)), None);
    assert!(board.set_shirt_number(c(0, 0), Some(5)).is_err());

    assert_eq!(sanitize_shirt_number(Some(-3)), None);
    assert_eq!(shirt_number_from_wire(NO_SHIRT_NUMBER), None);
    assert_eq!(shirt_number_from_wire(10), Some(10));
    assert_eq!(shirt_number_to_wire(None), 255);
    assert_eq!(shirt_number_to_wire(Some(7)), 7);
}

#[test]
fn assigning_identity_keeps_slot_and_shirt_number() {
    let mut board = Board::default_formation();
    board
        .assign_footballer_identity(c(5, 1), identity(10, "Lionel Messi"))
        .unwrap();
    let f = board.footballer_at(c(5, 1)).unwrap();
    assert_eq!(f.id, 10);
    assert_eq!(f.name, "Lionel Messi");
    assert_eq!(f.label, TacticalLabel::ST);
    assert_eq!(board.shirt_number_at(c(5, 1)), Some(10));
    assert!(board.contains_footballer(10));
}

#[test]
fn a_footballer_can_only_stand_on_one_slot() {
    let mut board = Board::default_formation();
    board
        .assign_footballer_identity(c(5, 1), identity(10, "Lionel Messi"))
        .unwrap();
    assert_eq!(
        board.assign_footballer_identity(c(5, 3), identity(10, "Lionel Messi")),
        Err(BoardError::AlreadyOnBoard(10))
    );
    // Re-picking on the same slot is fine.
    assert!(board
        .assign_footballer_identity(c(5, 1), identity(10, "Lionel Messi"))
        .is_ok());
    assert_eq!(
        board.assign_footballer_identity(c(2, 2), identity(11, "Nobody")),
        Err(BoardError::EmptySlot(c(2, 2)))
    );
}

#[test]
fn load_squad_places_footballers_with_recomputed_labels() {
    let mut board = Board::default_formation();
    let squad = vec![
        Footballer::new(1, "Keeper", c(0, 2), None).unwrap(),
        Footballer::new(2, "Wing", c(2, 4), None).unwrap(),
        Footballer::new(3, "Nine", c(5, 2), Some("img".to_string())).unwrap(),
    ];
    board.load_squad(squad, &[1, 255]).unwrap();

    assert_eq!(board.occupied_count(), 3);
    assert!(!board.has_placeholders());
    assert_eq!(board.footballer_at(c(2, 4)).unwrap().label, TacticalLabel::WBR);
    assert_eq!(board.shirt_number_at(c(0, 2)), Some(1));
    assert_eq!(board.shirt_number_at(c(2, 4)), None);
    assert_eq!(board.shirt_number_at(c(5, 2)), None);
    assert!(board.footballer_at(c(1, 0)).is_none());
}

#[test]
fn bad_squad_leaves_board_untouched() {
    let mut board = Board::default_formation();
    let before = board.snapshot();

    let mut outside = Footballer::new(1, "Keeper", c(0, 2), None).unwrap();
    outside.coordinate = c(0, 0);
    assert_eq!(
        board.load_squad(vec![outside], &[1]),
        Err(BoardError::InvalidCoordinate(c(0, 0)))
    );

    let twins = vec![
        Footballer::new(1, "One", c(3, 2), None).unwrap(),
        Footballer::new(2, "Two", c(3, 2), None).unwrap(),
    ];
    assert_eq!(
        board.load_squad(twins, &[1, 2]),
        Err(BoardError::DuplicateCoordinate(c(3, 2)))
    );
    assert_eq!(*before, *board.snapshot());
}

#[test]
fn short_names_use_initials_and_ellipsis() {
    assert_eq!(short_name("Lionel Messi"), "L.Messi");
    assert_eq!(short_name("Pele"), "Pele");
    assert_eq!(short_name(""), "");
    assert_eq!(short_name("Cristiano Ronaldo"), "C.Ronaldo");
    assert_eq!(short_name("Kevin De Bruyne"), "K.D.Bruyn\u{2026}");
    assert_eq!(short_name("Pierre-Emerick Aubameyang"), "P.Aubamey\u{2026}");
}

#[test]
fn search_footballer_display_helpers() {
    let f = SearchFootballer {
        id: 7,
        name: "Luka Modric".to_string(),
        date_of_birth: chrono::NaiveDate::from_ymd_opt(1985, 9, 9),
        image_url: None,
        country_codes: Some("hr, de".to_string()),
    };
    assert_eq!(f.birth_day_month().as_deref(), Some("09.09"));
    assert_eq!(f.birth_year(), Some(1985));
    assert_eq!(f.primary_country_code(), Some("hr"));
    assert_eq!(f.identity(), identity(7, "Luka Modric"));
}
