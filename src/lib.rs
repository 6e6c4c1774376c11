//! Squad builder web app: library with the formation board, editor logic and squad API client.

pub mod config;
pub mod gateway;
pub mod logic;
pub mod models;

pub use config::Config;
pub use gateway::{
    authorized, login, parse_squad_id, CreateSquadRequest, GatewayError, HttpGateway, ListedSquad,
    MemorySession, SessionGateway, SessionProvider, SessionTokens, SquadGateway, SquadRecord,
};
pub use logic::{
    run_search, DragCancel, DragError, EditorError, EditorSnapshot, SaveError, SearchOutcome,
    SquadEditor,
};
pub use models::{
    label_for, validate_coordinate, Board, BoardError, Coordinate, Footballer, FootballerId,
    FootballerIdentity, InvalidCoordinate, SearchFootballer, SquadState, TacticalLabel,
};
