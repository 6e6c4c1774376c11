//! Remote squad/footballer API and account session, as seen by the editor.

mod http;
mod session;
mod wire;

pub use http::HttpGateway;
pub use session::{authorized, login, MemorySession, SessionProvider};
pub use wire::{
    BoardFootballer, CreateSquadRequest, ListedSquad, SessionTokens, SquadFootballer, SquadRecord,
};

use crate::models::SearchFootballer;
use uuid::Uuid;

/// Errors from talking to the remote API.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum GatewayError {
    /// An authorized call was attempted without tokens.
    NotLoggedIn,
    /// The access token was rejected (HTTP 401).
    Unauthorized,
    /// The refresh token was rejected (HTTP 511).
    RefreshExhausted,
    /// Refresh failed during an authorized call; the local session has been cleared.
    SessionExpired,
    /// The requested squad does not exist.
    NotFound,
    /// Any other non-success status.
    Status(u16),
    /// The request could not be sent or the response could not be read.
    Transport(String),
    /// The response body was not what the API promises.
    Decode(String),
}

impl std::fmt::Display for GatewayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GatewayError::NotLoggedIn => write!(f, "You have to log in first"),
            GatewayError::Unauthorized => write!(f, "Not authorized"),
            GatewayError::RefreshExhausted => write!(f, "Login has expired"),
            GatewayError::SessionExpired => write!(f, "Session expired, please log in again"),
            GatewayError::NotFound => write!(f, "Squad not found"),
            GatewayError::Status(code) => write!(f, "Server answered with status {}", code),
            GatewayError::Transport(e) => write!(f, "Could not reach server: {}", e),
            GatewayError::Decode(e) => write!(f, "Unexpected server response: {}", e),
        }
    }
}

impl std::error::Error for GatewayError {}

/// Squad and footballer endpoints.
#[allow(async_fn_in_trait)]
pub trait SquadGateway {
    /// Footballers whose name contains `term`.
    async fn search_footballers(&self, term: &str) -> Result<Vec<SearchFootballer>, GatewayError>;

    async fn get_squad(&self, squad_id: Uuid) -> Result<SquadRecord, GatewayError>;

    /// Store a new squad and return its id.
    async fn create_squad(
        &self,
        tokens: &SessionTokens,
        request: &CreateSquadRequest,
    ) -> Result<Uuid, GatewayError>;

    async fn squad_count_of_user(&self, tokens: &SessionTokens) -> Result<u64, GatewayError>;

    /// One page (0-based) of the user's squads.
    async fn squads_of_user(
        &self,
        tokens: &SessionTokens,
        page_index: u32,
    ) -> Result<Vec<ListedSquad>, GatewayError>;
}

/// Account endpoints the editor depends on.
#[allow(async_fn_in_trait)]
pub trait SessionGateway {
    async fn login(&self, email: &str, password: &str) -> Result<SessionTokens, GatewayError>;

    /// Exchange expired tokens for fresh ones. [`GatewayError::RefreshExhausted`] when the
    /// refresh token is no longer accepted.
    async fn refresh(&self, tokens: &SessionTokens) -> Result<SessionTokens, GatewayError>;
}

/// Squad id from a URL segment. Only RFC 4122 UUIDs of versions 1 to 5 are accepted.
pub fn parse_squad_id(raw: &str) -> Option<Uuid> {
    let id = Uuid::parse_str(raw.trim()).ok()?;
    let known_version = (1..=5).contains(&id.get_version_num());
    (known_version && id.get_variant() == uuid::Variant::RFC4122).then_some(id)
}
