//! Footballer data structures: board occupants and search results.

use crate::models::position::{label_for, Coordinate, InvalidCoordinate, TacticalLabel};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Footballer identifier from the remote database. Negative ids are board placeholders.
pub type FootballerId = i64;

/// Names longer than this are shortened with an ellipsis on the board.
const SHORT_NAME_MAX: usize = 9;

/// A footballer standing on the board.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Footballer {
    pub id: FootballerId,
    pub name: String,
    /// Always `label_for(coordinate)`; recomputed on every move.
    pub label: TacticalLabel,
    pub coordinate: Coordinate,
    pub date_of_birth: Option<NaiveDate>,
    pub image_url: Option<String>,
    /// Comma-separated country codes, first one is the flag shown.
    pub country_codes: Option<String>,
}

impl Footballer {
    /// Unassigned slot holder created by the default formation.
    pub fn placeholder(id: FootballerId, coordinate: Coordinate) -> Result<Self, InvalidCoordinate> {
        Ok(Self {
            id,
            name: String::new(),
            label: label_for(coordinate)?,
            coordinate,
            date_of_birth: None,
            image_url: None,
            country_codes: None,
        })
    }

    /// A real footballer (e.g. from a saved squad) at the given slot.
    pub fn new(
        id: FootballerId,
        name: impl Into<String>,
        coordinate: Coordinate,
        image_url: Option<String>,
    ) -> Result<Self, InvalidCoordinate> {
        Ok(Self {
            name: name.into(),
            image_url,
            ..Self::placeholder(id, coordinate)?
        })
    }

    /// True until a real footballer has been picked for this slot.
    pub fn is_placeholder(&self) -> bool {
        self.id < 0
    }

    /// Move to another slot and take that slot's label.
    pub fn relocate(&mut self, coordinate: Coordinate) -> Result<(), InvalidCoordinate> {
        self.label = label_for(coordinate)?;
        self.coordinate = coordinate;
        Ok(())
    }

    /// Overwrite who this is, keeping where they stand.
    pub fn assign_identity(&mut self, identity: FootballerIdentity) {
        self.id = identity.id;
        self.name = identity.name;
        self.image_url = identity.image_url;
    }
}

/// Identity fields copied onto a slot when a search result is picked.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct FootballerIdentity {
    pub id: FootballerId,
    pub name: String,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// One row of a footballer search.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct SearchFootballer {
    pub id: FootballerId,
    pub name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub image_url: Option<String>,
    pub country_codes: Option<String>,
}

impl SearchFootballer {
    pub fn identity(&self) -> FootballerIdentity {
        FootballerIdentity {
            id: self.id,
            name: self.name.clone(),
            image_url: self.image_url.clone(),
        }
    }

    /// Country code whose flag is shown next to the result.
    pub fn primary_country_code(&self) -> Option<&str> {
        self.country_codes
            .as_deref()
            .and_then(|codes| codes.split(',').next())
            .map(str::trim)
            .filter(|code| !code.is_empty())
    }

    /// "dd.mm" of the birth date.
    pub fn birth_day_month(&self) -> Option<String> {
        self.date_of_birth
            .map(|d| format!("{:02}.{:02}", d.day(), d.month()))
    }

    pub fn birth_year(&self) -> Option<i32> {
        self.date_of_birth.map(|d| d.year())
    }
}

/// Name as printed under a magnet: "Lionel Andres Messi" -> "L.A.Messi". Capped at 9 chars
/// plus an ellipsis.
pub fn short_name(name: &str) -> String {
    let words: Vec<&str> = name.split_whitespace().collect();
    let Some((last, rest)) = words.split_last() else {
        return String::new();
    };
    let mut short: String = rest
        .iter()
        .filter_map(|w| w.chars().next())
        .flat_map(|initial| [initial, '.'])
        .collect();
    short.push_str(last);
    if short.chars().count() > SHORT_NAME_MAX {
        short = short.chars().take(SHORT_NAME_MAX).collect();
        short.push('\u{2026}');
    }
    short
}
