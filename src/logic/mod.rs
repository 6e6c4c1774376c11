//! Editor behaviour: the editor aggregate, drag, search, save and paging.

mod drag;
mod editor;
mod paging;
mod save;
mod search;

pub use drag::{DragCancel, DragError, DragSession, DragState, VIEWPORT_EDGE_MARGIN};
pub use editor::{
    parse_shirt_number_input, EditorError, EditorSnapshot, PendingSave, SquadEditor,
};
pub use paging::{page_window, parse_page, total_pages, SQUADS_PER_PAGE};
pub use save::{prepare_save, submit_squad, SaveError, MIN_SQUAD_NAME_LEN};
pub use search::{
    run_search, sanitize_name_input, SearchHit, SearchOutcome, SearchState, SearchTicket,
    DEFAULT_DEBOUNCE, MAX_NAME_LEN, MIN_QUERY_LEN,
};
