//! `awc` client for the squad API.

use crate::gateway::wire::{
    CreatedSquad, LoginBody, RefreshBody, SquadCount, WireListedSquad, WireSearchFootballer,
    WireSquad,
};
use crate::gateway::{
    CreateSquadRequest, GatewayError, ListedSquad, SessionGateway, SessionTokens, SquadGateway,
    SquadRecord,
};
use crate::models::SearchFootballer;
use awc::http::StatusCode;
use awc::Client;
use std::time::Duration;
use uuid::Uuid;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Talks to the squad API at `base_url` (e.g. `http://localhost:5000`).
///
/// Holds an `awc::Client`, so create one per actix worker.
pub struct HttpGateway {
    client: Client,
    base_url: String,
}

impl HttpGateway {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: Client::builder().timeout(REQUEST_TIMEOUT).finish(),
            base_url,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

fn transport(e: impl std::fmt::Display) -> GatewayError {
    GatewayError::Transport(e.to_string())
}

fn decode(e: impl std::fmt::Display) -> GatewayError {
    GatewayError::Decode(e.to_string())
}

fn check_status(status: StatusCode) -> Result<(), GatewayError> {
    match status.as_u16() {
        200 => Ok(()),
        401 => Err(GatewayError::Unauthorized),
        511 => Err(GatewayError::RefreshExhausted),
        code => Err(GatewayError::Status(code)),
    }
}

impl SquadGateway for HttpGateway {
    async fn search_footballers(&self, term: &str) -> Result<Vec<SearchFootballer>, GatewayError> {
        let mut response = self
            .client
            .get(self.url("/api/footballer/search"))
            .query(&[("searchTerm", term)])
            .map_err(transport)?
            .send()
            .await
            .map_err(transport)?;
        check_status(response.status())?;
        let found = response
            .json::<Vec<WireSearchFootballer>>()
            .await
            .map_err(decode)?;
        Ok(found.into_iter().map(SearchFootballer::from).collect())
    }

    async fn get_squad(&self, squad_id: Uuid) -> Result<SquadRecord, GatewayError> {
        let mut response = self
            .client
            .get(self.url("/api/squad/getSquad"))
            .query(&[("id", squad_id.to_string())])
            .map_err(transport)?
            .send()
            .await
            .map_err(transport)?;
        match response.status().as_u16() {
            404 | 500 => return Err(GatewayError::NotFound),
            _ => check_status(response.status())?,
        }
        let squad = response.json::<WireSquad>().await.map_err(decode)?;
        squad.into_record().ok_or(GatewayError::NotFound)
    }

    async fn create_squad(
        &self,
        tokens: &SessionTokens,
        request: &CreateSquadRequest,
    ) -> Result<Uuid, GatewayError> {
        let mut response = self
            .client
            .post(self.url("/api/squad/create"))
            .bearer_auth(&tokens.token)
            .send_json(request)
            .await
            .map_err(transport)?;
        check_status(response.status())?;
        let created = response.json::<CreatedSquad>().await.map_err(decode)?;
        Ok(created.squad_id)
    }

    async fn squad_count_of_user(&self, tokens: &SessionTokens) -> Result<u64, GatewayError> {
        let mut response = self
            .client
            .get(self.url("/api/squad/getUserSquadCount"))
            .bearer_auth(&tokens.token)
            .send()
            .await
            .map_err(transport)?;
        check_status(response.status())?;
        let count = response.json::<SquadCount>().await.map_err(decode)?;
        Ok(count.count)
    }

    async fn squads_of_user(
        &self,
        tokens: &SessionTokens,
        page_index: u32,
    ) -> Result<Vec<ListedSquad>, GatewayError> {
        let mut response = self
            .client
            .get(self.url("/api/squad/getUserSquads"))
            .query(&[("pageNumber", page_index)])
            .map_err(transport)?
            .bearer_auth(&tokens.token)
            .send()
            .await
            .map_err(transport)?;
        check_status(response.status())?;
        let squads = response
            .json::<Vec<WireListedSquad>>()
            .await
            .map_err(decode)?;
        Ok(squads.into_iter().map(ListedSquad::from).collect())
    }
}

impl SessionGateway for HttpGateway {
    async fn login(&self, email: &str, password: &str) -> Result<SessionTokens, GatewayError> {
        let mut response = self
            .client
            .post(self.url("/api/account/login"))
            .send_json(&LoginBody { email, password })
            .await
            .map_err(transport)?;
        check_status(response.status())?;
        response.json::<SessionTokens>().await.map_err(decode)
    }

    async fn refresh(&self, tokens: &SessionTokens) -> Result<SessionTokens, GatewayError> {
        let mut response = self
            .client
            .post(self.url("/api/account/gettoken"))
            .send_json(&RefreshBody {
                jwt_token: &tokens.token,
                refresh_token: &tokens.refresh_token,
            })
            .await
            .map_err(transport)?;
        check_status(response.status())?;
        response.json::<SessionTokens>().await.map_err(decode)
    }
}
