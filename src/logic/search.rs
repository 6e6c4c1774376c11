//! Footballer name search: input filtering, debounce and dropping of superseded results.

use crate::gateway::{GatewayError, SquadGateway};
use crate::models::{Board, SearchFootballer};
use serde::Serialize;
use std::time::Duration;
use tokio::sync::watch;

/// Searches start once the typed name has this many characters.
pub const MIN_QUERY_LEN: usize = 4;
/// Longer input is refused and the previous value kept.
pub const MAX_NAME_LEN: usize = 30;
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

/// Accept typed footballer name input if it only has letters, whitespace, `.`, `'` or `-`
/// and is at most 30 characters; `None` means keep the previous value.
pub fn sanitize_name_input(entered: &str) -> Option<&str> {
    let allowed = |c: char| c.is_alphabetic() || c.is_whitespace() || matches!(c, '.' | '\'' | '-');
    if entered.chars().count() > MAX_NAME_LEN || !entered.chars().all(allowed) {
        return None;
    }
    Some(entered)
}

/// Handle of one started search. Stale as soon as a newer search (or a clear) starts.
#[derive(Debug)]
pub struct SearchTicket {
    generation: u64,
    query: String,
    current: watch::Receiver<u64>,
}

impl SearchTicket {
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn is_current(&self) -> bool {
        *self.current.borrow() == self.generation
    }

    /// Resolves once this search has been superseded (or its editor is gone).
    pub async fn cancelled(&mut self) {
        let generation = self.generation;
        let _ = self.current.wait_for(|g| *g != generation).await;
    }
}

/// How a search run ended.
#[derive(Debug)]
pub enum SearchOutcome {
    Completed(Result<Vec<SearchFootballer>, GatewayError>),
    /// A newer search started first; discard.
    Superseded,
}

/// Wait out the debounce, then query the gateway. Both steps are abandoned (and the
/// in-flight request dropped) as soon as the ticket is superseded.
pub async fn run_search<G>(gateway: &G, ticket: &mut SearchTicket, debounce: Duration) -> SearchOutcome
where
    G: SquadGateway,
{
    let query = ticket.query.clone();
    tokio::select! {
        _ = ticket.cancelled() => {
            log::debug!("Search for {:?} superseded", query);
            SearchOutcome::Superseded
        }
        result = async {
            tokio::time::sleep(debounce).await;
            gateway.search_footballers(&query).await
        } => SearchOutcome::Completed(result),
    }
}

/// Search result as shown in the editor.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct SearchHit {
    pub footballer: SearchFootballer,
    /// Already on the board, so it cannot be picked again.
    pub already_on_board: bool,
}

/// Name field of the footballer editor and the latest applied results.
#[derive(Debug)]
pub struct SearchState {
    query: String,
    generation: watch::Sender<u64>,
    results: Vec<SearchFootballer>,
    searching: bool,
}

impl Default for SearchState {
    fn default() -> Self {
        Self {
            query: String::new(),
            generation: watch::channel(0).0,
            results: Vec::new(),
            searching: false,
        }
    }
}

impl SearchState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn results(&self) -> &[SearchFootballer] {
        &self.results
    }

    pub fn is_searching(&self) -> bool {
        self.searching
    }

    fn next_generation(&mut self) -> u64 {
        let next = *self.generation.borrow() + 1;
        self.generation.send_replace(next);
        next
    }

    /// User typed into the name field. Returns a ticket when a search should run; every
    /// accepted keystroke supersedes the search before it.
    pub fn on_input(&mut self, entered: &str) -> Option<SearchTicket> {
        let accepted = sanitize_name_input(entered)?;
        self.query = accepted.to_string();
        let generation = self.next_generation();
        self.searching = false;
        if self.query.chars().count() < MIN_QUERY_LEN {
            return None;
        }
        self.searching = true;
        Some(SearchTicket {
            generation,
            query: self.query.clone(),
            current: self.generation.subscribe(),
        })
    }

    /// Show an assigned footballer's name in the field without searching for it.
    pub fn show_name(&mut self, name: &str) {
        self.query = name.to_string();
        self.next_generation();
        self.searching = false;
    }

    /// Forget the query and results and supersede any running search.
    pub fn clear(&mut self) {
        self.next_generation();
        self.query.clear();
        self.results.clear();
        self.searching = false;
    }

    /// Store the result of `ticket`'s search unless a newer search has started.
    /// A failed search empties the result list.
    pub fn apply(
        &mut self,
        ticket: &SearchTicket,
        result: Result<Vec<SearchFootballer>, GatewayError>,
    ) -> bool {
        if !ticket.is_current() {
            log::debug!("Dropping stale results for {:?}", ticket.query);
            return false;
        }
        self.searching = false;
        match result {
            Ok(found) => self.results = found,
            Err(e) => {
                log::warn!("Footballer search for {:?} failed: {}", ticket.query, e);
                self.results.clear();
            }
        }
        true
    }

    /// Results flagged with whether they are already on `board`.
    pub fn hits(&self, board: &Board) -> Vec<SearchHit> {
        self.results
            .iter()
            .map(|f| SearchHit {
                footballer: f.clone(),
                already_on_board: board.contains_footballer(f.id),
            })
            .collect()
    }
}
