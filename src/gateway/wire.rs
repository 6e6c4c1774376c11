//! JSON bodies exchanged with the squad API, and the records the rest of the crate uses.

use crate::models::{
    shirt_number_from_wire, shirt_number_to_wire, Board, Coordinate, Footballer, FootballerId,
    InvalidCoordinate, SearchFootballer,
};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Tokens returned by login and token refresh.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionTokens {
    pub token: String,
    pub refresh_token: String,
    pub user_name: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct LoginBody<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct RefreshBody<'a> {
    #[serde(rename = "JWTToken")]
    pub jwt_token: &'a str,
    #[serde(rename = "refreshToken")]
    pub refresh_token: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WireSearchFootballer {
    pub id: FootballerId,
    pub name: String,
    #[serde(default)]
    pub date_of_birth: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub country_codes: Option<String>,
}

impl From<WireSearchFootballer> for SearchFootballer {
    fn from(w: WireSearchFootballer) -> Self {
        Self {
            id: w.id,
            name: w.name,
            date_of_birth: w.date_of_birth.as_deref().and_then(parse_date),
            image_url: w.image_url,
            country_codes: w.country_codes,
        }
    }
}

/// Dates come either as `2001-02-03` or as `2001-02-03T00:00:00`.
fn parse_date(raw: &str) -> Option<NaiveDate> {
    raw.parse::<NaiveDateTime>()
        .map(|dt| dt.date())
        .or_else(|_| raw.parse::<NaiveDate>())
        .ok()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WireSquadFootballerIdentity {
    pub id: FootballerId,
    pub name: String,
    #[serde(default)]
    pub image_url: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WireSquadFootballer {
    pub footballer: WireSquadFootballerIdentity,
    pub position_y: i32,
    pub position_x: i32,
    pub shirt_number: i64,
}

/// The server answers an unknown squad id with `{"status": 500}` instead of a squad.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WireSquad {
    #[serde(default)]
    pub status: Option<u16>,
    #[serde(default)]
    pub squad_name: Option<String>,
    #[serde(default)]
    pub board_footballers: Option<Vec<WireSquadFootballer>>,
}

impl WireSquad {
    pub fn into_record(self) -> Option<SquadRecord> {
        if self.status == Some(500) {
            return None;
        }
        let name = self.squad_name?;
        let footballers = self
            .board_footballers?
            .into_iter()
            .map(|bf| SquadFootballer {
                id: bf.footballer.id,
                name: bf.footballer.name,
                position_y: bf.position_y,
                position_x: bf.position_x,
                image_url: bf.footballer.image_url,
                shirt_number: bf.shirt_number,
            })
            .collect();
        Some(SquadRecord { name, footballers })
    }
}

/// A footballer of a saved squad. `shirt_number` is the wire value (255 = none).
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SquadFootballer {
    pub id: FootballerId,
    pub name: String,
    pub position_y: i32,
    pub position_x: i32,
    pub image_url: Option<String>,
    pub shirt_number: i64,
}

impl SquadFootballer {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.position_y, self.position_x)
    }

    pub fn shirt_number(&self) -> Option<u8> {
        shirt_number_from_wire(self.shirt_number)
    }

    pub fn to_footballer(&self) -> Result<Footballer, InvalidCoordinate> {
        Footballer::new(self.id, self.name.clone(), self.coordinate(), self.image_url.clone())
    }
}

/// A saved squad as fetched by id.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SquadRecord {
    pub name: String,
    pub footballers: Vec<SquadFootballer>,
}

impl SquadRecord {
    /// Board footballers and their parallel wire shirt numbers.
    pub fn board_parts(&self) -> Result<(Vec<Footballer>, Vec<i64>), InvalidCoordinate> {
        let footballers = self
            .footballers
            .iter()
            .map(SquadFootballer::to_footballer)
            .collect::<Result<Vec<_>, _>>()?;
        let numbers = self.footballers.iter().map(|f| f.shirt_number).collect();
        Ok((footballers, numbers))
    }
}

/// One footballer of a squad being created.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardFootballer {
    pub footballer_id: FootballerId,
    pub position_y: i32,
    pub position_x: i32,
    pub shirt_number: i64,
}

/// Body of the create-squad call.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSquadRequest {
    pub squad_name: String,
    pub board_footballers: Vec<BoardFootballer>,
}

impl CreateSquadRequest {
    /// Every occupied slot in row-major order; absent shirt numbers go out as 255.
    pub fn from_board(squad_name: impl Into<String>, board: &Board) -> Self {
        let board_footballers = board
            .grid()
            .placements()
            .map(|(f, number)| BoardFootballer {
                footballer_id: f.id,
                position_y: f.coordinate.row,
                position_x: f.coordinate.col,
                shirt_number: shirt_number_to_wire(number),
            })
            .collect();
        Self {
            squad_name: squad_name.into(),
            board_footballers,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreatedSquad {
    pub squad_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SquadCount {
    pub count: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WireListedSquad {
    pub id: Uuid,
    pub squad_name: String,
    /// UTC without an offset suffix.
    pub created_date: NaiveDateTime,
}

impl From<WireListedSquad> for ListedSquad {
    fn from(w: WireListedSquad) -> Self {
        Self {
            id: w.id,
            squad_name: w.squad_name,
            created_date: w.created_date.and_utc(),
        }
    }
}

/// Entry of a user's squad list.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListedSquad {
    pub id: Uuid,
    pub squad_name: String,
    pub created_date: DateTime<Utc>,
}

impl ListedSquad {
    /// "dd/mm/yyyy hh:mm".
    pub fn created_label(&self) -> String {
        self.created_date.format("%d/%m/%Y %H:%M").to_string()
    }
}
