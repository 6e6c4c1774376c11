//! The squad editor: board, selection, squad state, drag and search behind one mutation surface.

use crate::gateway::{
    CreateSquadRequest, GatewayError, SessionGateway, SessionProvider, SquadGateway, SquadRecord,
};
use crate::logic::drag::{DragCancel, DragError, DragSession, DragState};
use crate::logic::save::{prepare_save, submit_squad, SaveError};
use crate::logic::search::{SearchHit, SearchState, SearchTicket};
use crate::models::{
    validate_coordinate, Board, BoardError, Coordinate, FootballerIdentity, Grid,
    SearchFootballer, Selection, SquadState,
};
use std::sync::Arc;
use tokio::sync::watch;
use uuid::Uuid;

/// Everything an observer needs to redraw the editor.
#[derive(Clone, Debug)]
pub struct EditorSnapshot {
    pub board: Arc<Grid>,
    pub selection: Option<Coordinate>,
    pub squad: SquadState,
    pub drag: DragState,
    /// A save is on its way to the server; the board is locked until it answers.
    pub saving: bool,
}

/// Errors from editor operations.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum EditorError {
    Board(BoardError),
    Drag(DragError),
    Save(SaveError),
    Gateway(GatewayError),
}

impl std::fmt::Display for EditorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EditorError::Board(e) => write!(f, "{}", e),
            EditorError::Drag(e) => write!(f, "{}", e),
            EditorError::Save(e) => write!(f, "{}", e),
            EditorError::Gateway(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for EditorError {}

impl From<BoardError> for EditorError {
    fn from(e: BoardError) -> Self {
        EditorError::Board(e)
    }
}

impl From<DragError> for EditorError {
    fn from(e: DragError) -> Self {
        EditorError::Drag(e)
    }
}

impl From<SaveError> for EditorError {
    fn from(e: SaveError) -> Self {
        EditorError::Save(e)
    }
}

impl From<GatewayError> for EditorError {
    fn from(e: GatewayError) -> Self {
        EditorError::Gateway(e)
    }
}

/// Parse typed shirt number input: one or two digits in 1..=99, anything else clears.
pub fn parse_shirt_number_input(text: &str) -> Option<i64> {
    let text = text.trim();
    if text.is_empty() || text.len() > 2 || !text.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

/// A save handed out by [`SquadEditor::begin_save`], to be settled with
/// [`SquadEditor::finish_save`].
#[derive(Debug)]
pub struct PendingSave {
    request: CreateSquadRequest,
    board: Arc<Grid>,
}

impl PendingSave {
    /// Body to send to the squad API.
    pub fn request(&self) -> &CreateSquadRequest {
        &self.request
    }
}

/// One squad being edited.
///
/// While the squad is finalized every board change is silently ignored; while a save is
/// in flight board changes are refused. Each change that is visible to observers is
/// published as a whole new [`EditorSnapshot`].
#[derive(Debug)]
pub struct SquadEditor {
    board: Board,
    selection: Selection,
    squad: SquadState,
    drag: DragSession,
    search: SearchState,
    saving: bool,
    updates: watch::Sender<EditorSnapshot>,
}

impl Default for SquadEditor {
    fn default() -> Self {
        Self::new()
    }
}

impl SquadEditor {
    /// Editor with the default 4-4-2, no name, not finalized.
    pub fn new() -> Self {
        let board = Board::default_formation();
        let squad = SquadState::new();
        let snapshot = EditorSnapshot {
            board: board.snapshot(),
            selection: None,
            squad: squad.clone(),
            drag: DragState::Idle,
            saving: false,
        };
        Self {
            board,
            selection: Selection::default(),
            squad,
            drag: DragSession::new(),
            search: SearchState::new(),
            saving: false,
            updates: watch::channel(snapshot).0,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn squad(&self) -> &SquadState {
        &self.squad
    }

    pub fn selection(&self) -> Option<Coordinate> {
        self.selection.get()
    }

    pub fn drag(&self) -> &DragSession {
        &self.drag
    }

    pub fn search(&self) -> &SearchState {
        &self.search
    }

    pub fn is_finalized(&self) -> bool {
        self.squad.finalized
    }

    pub fn is_saving(&self) -> bool {
        self.saving
    }

    pub fn snapshot(&self) -> EditorSnapshot {
        EditorSnapshot {
            board: self.board.snapshot(),
            selection: self.selection.get(),
            squad: self.squad.clone(),
            drag: self.drag.state(),
            saving: self.saving,
        }
    }

    /// Receiver that always holds the latest snapshot.
    pub fn subscribe(&self) -> watch::Receiver<EditorSnapshot> {
        self.updates.subscribe()
    }

    fn publish(&self) {
        self.updates.send_replace(self.snapshot());
    }

    /// `Ok(true)` when board changes are to be skipped (finalized squad), an error while a
    /// save is in flight.
    fn board_locked(&self) -> Result<bool, EditorError> {
        if self.saving {
            return Err(SaveError::InProgress.into());
        }
        Ok(self.squad.finalized)
    }

    /// Throw the current squad away and start over from the default formation.
    pub fn start_new_squad(&mut self) -> Result<(), EditorError> {
        self.board_locked()?;
        self.selection.clear();
        self.drag.cancel(DragCancel::Explicit);
        self.search.clear();
        self.board.initialize_default();
        self.squad.reset();
        self.publish();
        Ok(())
    }

    /// Show a squad fetched from the server. The editor is finalized afterwards.
    pub fn load_saved_squad(&mut self, record: &SquadRecord) -> Result<(), EditorError> {
        self.board_locked()?;
        let (footballers, shirt_numbers) = record.board_parts().map_err(BoardError::from)?;
        self.board.load_squad(footballers, &shirt_numbers)?;
        self.selection.clear();
        self.drag.cancel(DragCancel::Explicit);
        self.search.clear();
        self.squad.reset();
        self.squad.set_name(record.name.clone());
        self.squad.set_finalized(true);
        log::info!("Loaded squad {:?}", record.name);
        self.publish();
        Ok(())
    }

    /// Fetch a saved squad and show it.
    pub async fn load_from<G: SquadGateway>(&mut self, gateway: &G, squad_id: Uuid) -> Result<(), EditorError> {
        let record = gateway.get_squad(squad_id).await?;
        self.load_saved_squad(&record)
    }

    pub fn move_or_swap(&mut self, source: Coordinate, target: Coordinate) -> Result<(), EditorError> {
        if self.board_locked()? {
            return Ok(());
        }
        self.board.move_or_swap(source, target)?;
        self.publish();
        Ok(())
    }

    pub fn set_shirt_number(&mut self, coord: Coordinate, number: Option<i64>) -> Result<(), EditorError> {
        if self.board_locked()? {
            return Ok(());
        }
        self.board.set_shirt_number(coord, number)?;
        self.publish();
        Ok(())
    }

    /// Shirt number as typed into the editor field.
    pub fn enter_shirt_number(&mut self, coord: Coordinate, text: &str) -> Result<(), EditorError> {
        self.set_shirt_number(coord, parse_shirt_number_input(text))
    }

    pub fn assign_footballer(
        &mut self,
        coord: Coordinate,
        identity: FootballerIdentity,
    ) -> Result<(), EditorError> {
        if self.board_locked()? {
            return Ok(());
        }
        let name = identity.name.clone();
        self.board.assign_footballer_identity(coord, identity)?;
        self.search.show_name(&name);
        self.publish();
        Ok(())
    }

    /// Put a search result on the selected slot.
    pub fn pick_search_result(&mut self, footballer: &SearchFootballer) -> Result<(), EditorError> {
        let Some(coord) = self.selection.get() else {
            return Ok(());
        };
        self.assign_footballer(coord, footballer.identity())
    }

    /// Open a slot in the footballer editor (or close it with `None`).
    pub fn select(&mut self, coord: Option<Coordinate>) -> Result<(), EditorError> {
        if let Some(c) = coord {
            validate_coordinate(c).map_err(BoardError::from)?;
        }
        self.selection.select(coord);
        let name = coord
            .and_then(|c| self.board.footballer_at(c))
            .map(|f| f.name.clone())
            .unwrap_or_default();
        self.search.show_name(&name);
        self.publish();
        Ok(())
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        if self.squad.finalized || self.saving {
            return;
        }
        self.squad.set_name(name);
        self.publish();
    }

    pub fn start_drag(&mut self, source: Coordinate) -> Result<(), EditorError> {
        if self.board_locked()? {
            return Err(DragError::Finalized.into());
        }
        self.drag.start(&self.board, source)?;
        self.publish();
        Ok(())
    }

    /// Finish the drag over `target`. A real move or swap also selects the target slot.
    pub fn drop_on(&mut self, target: Option<Coordinate>) -> Result<(), EditorError> {
        let result = match self.drag.drop_on(target)? {
            Some((source, target)) if !self.squad.finalized => self
                .board
                .move_or_swap(source, target)
                .map(|()| self.selection.select(Some(target))),
            _ => Ok(()),
        };
        self.publish();
        result.map_err(EditorError::from)
    }

    pub fn cancel_drag(&mut self, reason: DragCancel) {
        if self.drag.cancel(reason) {
            self.publish();
        }
    }

    pub fn pointer_moved(&mut self, x: f64, y: f64, viewport_width: f64, viewport_height: f64) {
        if self.drag.pointer_moved(x, y, viewport_width, viewport_height) {
            self.publish();
        }
    }

    pub fn drop_targets(&self) -> Vec<Coordinate> {
        self.drag.drop_targets(&self.board)
    }

    /// Typed footballer name. Returns a ticket when a search should be run.
    pub fn on_name_input(&mut self, entered: &str) -> Option<SearchTicket> {
        if self.squad.finalized || self.selection.get().is_none() {
            return None;
        }
        self.search.on_input(entered)
    }

    pub fn apply_search(
        &mut self,
        ticket: &SearchTicket,
        result: Result<Vec<SearchFootballer>, GatewayError>,
    ) -> bool {
        self.search.apply(ticket, result)
    }

    pub fn search_hits(&self) -> Vec<SearchHit> {
        self.search.hits(&self.board)
    }

    pub fn prepare_save(&self, logged_in: bool) -> Result<CreateSquadRequest, SaveError> {
        if self.saving {
            return Err(SaveError::InProgress);
        }
        prepare_save(&self.board, &self.squad, logged_in)
    }

    /// Check the squad and lock the board until [`finish_save`](Self::finish_save).
    /// A second save is refused while this one is pending.
    pub fn begin_save(&mut self, logged_in: bool) -> Result<PendingSave, EditorError> {
        let request = self.prepare_save(logged_in)?;
        self.saving = true;
        self.drag.cancel(DragCancel::Explicit);
        self.publish();
        Ok(PendingSave {
            request,
            board: self.board.snapshot(),
        })
    }

    /// Settle a pending save with the server's answer. The squad is finalized only if the
    /// board is still the one that was sent; a failed save unlocks the board again.
    pub fn finish_save(
        &mut self,
        pending: PendingSave,
        result: Result<Uuid, GatewayError>,
    ) -> Result<Uuid, EditorError> {
        self.saving = false;
        let outcome = match result {
            Ok(squad_id) if Arc::ptr_eq(&pending.board, &self.board.snapshot()) => {
                self.squad.set_finalized(true);
                Ok(squad_id)
            }
            Ok(squad_id) => {
                log::warn!("Squad {} saved, but the board changed before it was locked", squad_id);
                Err(SaveError::BoardChanged.into())
            }
            Err(e) => Err(e.into()),
        };
        self.publish();
        outcome
    }

    /// Unlock the board after a save whose answer will never arrive.
    pub fn abandon_save(&mut self) {
        if self.saving {
            self.saving = false;
            self.publish();
        }
    }

    /// Check, send and lock the squad. Returns the new squad id.
    pub async fn save<P, S, G>(&mut self, provider: &P, sessions: &S, gateway: &G) -> Result<Uuid, EditorError>
    where
        P: SessionProvider + ?Sized,
        S: SessionGateway,
        G: SquadGateway,
    {
        let pending = self.begin_save(provider.is_logged_in())?;
        let result = submit_squad(provider, sessions, gateway, pending.request()).await;
        self.finish_save(pending, result)
    }
}
