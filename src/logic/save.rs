//! Saving a squad: client-side preconditions and the create call.

use crate::gateway::{
    authorized, CreateSquadRequest, GatewayError, SessionGateway, SessionProvider, SquadGateway,
};
use crate::models::{Board, SquadState};
use uuid::Uuid;

/// Squad names must be longer than this.
pub const MIN_SQUAD_NAME_LEN: usize = 4;

/// Reasons a save is refused before anything is sent.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SaveError {
    /// Squad was already saved or loaded.
    Finalized,
    NotLoggedIn,
    NameTooShort,
    /// At least one slot still holds a placeholder.
    UnassignedFootballer,
    /// A save of this squad is already on its way to the server.
    InProgress,
    /// The board no longer matches the squad the server stored.
    BoardChanged,
}

impl std::fmt::Display for SaveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SaveError::Finalized => write!(f, "Squad is already saved"),
            SaveError::NotLoggedIn => write!(f, "To save squad you have to login!"),
            SaveError::NameTooShort => write!(
                f,
                "Squad name should be longer than {} characters",
                MIN_SQUAD_NAME_LEN
            ),
            SaveError::UnassignedFootballer => write!(f, "Not all players are assigned!"),
            SaveError::InProgress => write!(f, "Squad is being saved"),
            SaveError::BoardChanged => {
                write!(f, "Squad was saved but the board changed meanwhile")
            }
        }
    }
}

impl std::error::Error for SaveError {}

/// Check the save preconditions in order and build the create-squad body.
pub fn prepare_save(
    board: &Board,
    squad: &SquadState,
    logged_in: bool,
) -> Result<CreateSquadRequest, SaveError> {
    if squad.finalized {
        return Err(SaveError::Finalized);
    }
    if !logged_in {
        return Err(SaveError::NotLoggedIn);
    }
    if squad.name.chars().count() <= MIN_SQUAD_NAME_LEN {
        return Err(SaveError::NameTooShort);
    }
    if board.has_placeholders() {
        return Err(SaveError::UnassignedFootballer);
    }
    Ok(CreateSquadRequest::from_board(squad.name.clone(), board))
}

/// Send a prepared squad. On [`GatewayError::SessionExpired`] the session has already been
/// cleared by the time this returns.
pub async fn submit_squad<P, S, G>(
    provider: &P,
    sessions: &S,
    gateway: &G,
    request: &CreateSquadRequest,
) -> Result<Uuid, GatewayError>
where
    P: SessionProvider + ?Sized,
    S: SessionGateway,
    G: SquadGateway,
{
    let result = authorized(provider, sessions, |tokens| async move {
        gateway.create_squad(&tokens, request).await
    })
    .await;
    match &result {
        Ok(id) => log::info!("Squad {:?} saved as {}", request.squad_name, id),
        Err(GatewayError::SessionExpired) => {
            log::info!("Session expired while saving {:?}", request.squad_name)
        }
        Err(e) => log::warn!("Saving squad {:?} failed: {}", request.squad_name, e),
    }
    result
}
