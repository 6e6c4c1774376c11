//! Single binary web server: index page from templates/, static from /static, editor API via REST.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default. Override with env: HOST, PORT, BACKEND_URL,
//! SEARCH_DEBOUNCE_MS, SESSION_KEY.

use actix_files::Files;
use actix_session::{storage::CookieSessionStore, Session, SessionMiddleware};
use actix_web::{
    cookie::Key,
    get, post, put,
    web::{self, Data, Json, Path, Query},
    App, HttpResponse, HttpServer, Responder,
};
use serde::{Deserialize, Serialize};
use squad_builder_web::gateway::{authorized, login, parse_squad_id};
use squad_builder_web::logic::{
    page_window, parse_page, run_search, submit_squad, total_pages, DragCancel, DragState,
    SearchHit, SearchOutcome,
};
use squad_builder_web::models::Grid;
use squad_builder_web::{
    Config, Coordinate, EditorError, FootballerIdentity, GatewayError, HttpGateway, SaveError,
    SessionProvider, SessionTokens, SquadEditor, SquadGateway, SquadState,
};
use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};
use uuid::Uuid;

/// Per-editor entry: editor state + last activity time (for auto-cleanup).
struct EditorEntry {
    editor: SquadEditor,
    last_activity: Instant,
}

/// In-memory state: one editor per browser tab, by id. Entries are removed after 12h inactivity.
type AppState = Data<RwLock<HashMap<Uuid, EditorEntry>>>;

/// Inactivity threshold: editors not touched for this long are removed.
const INACTIVITY_TIMEOUT: Duration = Duration::from_secs(12 * 3600);

/// Cookie session key holding the squad API tokens.
const TOKENS_KEY: &str = "tokens";

/// Squad API tokens kept in the browser's signed session cookie.
struct CookieSession<'a>(&'a Session);

impl SessionProvider for CookieSession<'_> {
    fn tokens(&self) -> Option<SessionTokens> {
        self.0.get::<SessionTokens>(TOKENS_KEY).ok().flatten()
    }

    fn store(&self, tokens: SessionTokens) {
        if let Err(e) = self.0.insert(TOKENS_KEY, tokens) {
            log::warn!("Could not store session tokens: {}", e);
        }
    }

    fn clear(&self) {
        self.0.remove(TOKENS_KEY);
    }
}

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Serialize)]
struct SearchView {
    query: String,
    searching: bool,
    results: Vec<SearchHit>,
}

/// Editor as sent to the browser.
#[derive(Serialize)]
struct EditorView<'a> {
    id: Uuid,
    board: &'a Grid,
    selection: Option<Coordinate>,
    squad: &'a SquadState,
    drag: DragState,
    saving: bool,
    drop_targets: Vec<Coordinate>,
    search: SearchView,
    /// Non-blocking notice, e.g. a failed search.
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    saved_squad_id: Option<Uuid>,
}

impl<'a> EditorView<'a> {
    fn of(id: Uuid, editor: &'a SquadEditor) -> Self {
        Self {
            id,
            board: editor.board().grid(),
            selection: editor.selection(),
            squad: editor.squad(),
            drag: editor.drag().state(),
            saving: editor.is_saving(),
            drop_targets: editor.drop_targets(),
            search: SearchView {
                query: editor.search().query().to_string(),
                searching: editor.search().is_searching(),
                results: editor.search_hits(),
            },
            message: None,
            saved_squad_id: None,
        }
    }
}

#[derive(Deserialize)]
struct SetNameBody {
    name: String,
}

#[derive(Deserialize)]
struct SelectBody {
    coordinate: Option<Coordinate>,
}

#[derive(Deserialize)]
struct MoveBody {
    source: Coordinate,
    target: Coordinate,
}

#[derive(Deserialize)]
struct ShirtNumberBody {
    coordinate: Coordinate,
    /// As typed; anything but 1..=99 clears the number.
    text: String,
}

#[derive(Deserialize)]
struct AssignFootballerBody {
    coordinate: Coordinate,
    footballer: FootballerIdentity,
}

#[derive(Deserialize)]
struct DragStartBody {
    source: Coordinate,
}

#[derive(Deserialize)]
struct DropBody {
    target: Option<Coordinate>,
}

#[derive(Deserialize)]
struct DragCancelBody {
    #[serde(default = "default_cancel_reason")]
    reason: DragCancel,
}

fn default_cancel_reason() -> DragCancel {
    DragCancel::Explicit
}

#[derive(Deserialize)]
struct PointerBody {
    x: f64,
    y: f64,
    viewport_width: f64,
    viewport_height: f64,
}

#[derive(Deserialize)]
struct SearchBody {
    query: String,
}

#[derive(Deserialize)]
struct LoginBody {
    email: String,
    password: String,
}

#[derive(Deserialize)]
struct SquadsQuery {
    #[serde(rename = "squadsPage")]
    squads_page: Option<String>,
}

#[derive(Serialize)]
struct ListedSquadView {
    id: Uuid,
    squad_name: String,
    created: String,
}

/// Path segment: editor id (e.g. /api/editors/{id})
#[derive(Deserialize)]
struct EditorPath {
    id: Uuid,
}

/// Path segments: editor id and saved squad id (e.g. /api/editors/{id}/load/{squad_id})
#[derive(Deserialize)]
struct EditorSquadPath {
    id: Uuid,
    squad_id: String,
}

fn no_editor() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({ "error": "No editor" }))
}

fn lock_error() -> HttpResponse {
    HttpResponse::InternalServerError().body("lock error")
}

/// Status code and body for a failed editor operation.
fn error_response(e: &EditorError) -> HttpResponse {
    let body = serde_json::json!({ "error": e.to_string() });
    match e {
        EditorError::Save(SaveError::NotLoggedIn) | EditorError::Gateway(GatewayError::NotLoggedIn) => {
            HttpResponse::Unauthorized().json(body)
        }
        EditorError::Gateway(GatewayError::SessionExpired) => HttpResponse::Unauthorized()
            .json(serde_json::json!({ "error": e.to_string(), "session_expired": true })),
        EditorError::Gateway(GatewayError::NotFound) => HttpResponse::NotFound().json(body),
        EditorError::Gateway(_) => HttpResponse::BadGateway().json(body),
        EditorError::Save(SaveError::InProgress | SaveError::BoardChanged) => {
            HttpResponse::Conflict().json(body)
        }
        EditorError::Board(_) | EditorError::Drag(_) | EditorError::Save(_) => {
            HttpResponse::BadRequest().json(body)
        }
    }
}

/// Run `op` on the editor and answer with its new state.
fn with_editor<F>(state: &AppState, id: Uuid, op: F) -> HttpResponse
where
    F: FnOnce(&mut SquadEditor) -> Result<(), EditorError>,
{
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let entry = match g.get_mut(&id) {
        Some(e) => e,
        None => return no_editor(),
    };
    entry.last_activity = Instant::now();
    match op(&mut entry.editor) {
        Ok(()) => HttpResponse::Ok().json(EditorView::of(id, &entry.editor)),
        Err(e) => error_response(&e),
    }
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "squad-builder-web",
    })
}

/// Avoid 404 in browser tab: favicon not required for app logic.
#[get("/favicon.ico")]
async fn favicon() -> HttpResponse {
    HttpResponse::NoContent().finish()
}

/// Create a new editor with the default formation (client keeps the id for later requests).
#[post("/api/editors")]
async fn api_create_editor(state: AppState) -> HttpResponse {
    let id = Uuid::new_v4();
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let entry = g.entry(id).or_insert(EditorEntry {
        editor: SquadEditor::new(),
        last_activity: Instant::now(),
    });
    HttpResponse::Ok().json(EditorView::of(id, &entry.editor))
}

/// Get an editor by id (404 if not found). Touching it refreshes last_activity.
#[get("/api/editors/{id}")]
async fn api_get_editor(state: AppState, path: Path<EditorPath>) -> HttpResponse {
    with_editor(&state, path.id, |_| Ok(()))
}

/// Discard the current squad and start from the default formation.
#[post("/api/editors/{id}/new-squad")]
async fn api_new_squad(state: AppState, path: Path<EditorPath>) -> HttpResponse {
    with_editor(&state, path.id, |editor| editor.start_new_squad())
}

/// Load a saved squad into the editor (finalizes it).
#[post("/api/editors/{id}/load/{squad_id}")]
async fn api_load_squad(
    state: AppState,
    gateway: Data<HttpGateway>,
    path: Path<EditorSquadPath>,
) -> HttpResponse {
    let Some(squad_id) = parse_squad_id(&path.squad_id) else {
        log::debug!("Ignoring malformed squad id {:?}", path.squad_id);
        return HttpResponse::NotFound().json(serde_json::json!({ "error": "No squad" }));
    };
    let record = match gateway.get_squad(squad_id).await {
        Ok(record) => record,
        Err(e) => {
            log::warn!("Loading squad {} failed: {}", squad_id, e);
            return error_response(&e.into());
        }
    };
    with_editor(&state, path.id, |editor| editor.load_saved_squad(&record))
}

#[put("/api/editors/{id}/name")]
async fn api_set_name(state: AppState, path: Path<EditorPath>, body: Json<SetNameBody>) -> HttpResponse {
    let body = body.into_inner();
    with_editor(&state, path.id, |editor| {
        editor.set_name(body.name);
        Ok(())
    })
}

#[put("/api/editors/{id}/selection")]
async fn api_select(state: AppState, path: Path<EditorPath>, body: Json<SelectBody>) -> HttpResponse {
    with_editor(&state, path.id, |editor| editor.select(body.coordinate))
}

/// Move or swap footballers directly (keyboard / non-drag clients).
#[post("/api/editors/{id}/move")]
async fn api_move(state: AppState, path: Path<EditorPath>, body: Json<MoveBody>) -> HttpResponse {
    with_editor(&state, path.id, |editor| editor.move_or_swap(body.source, body.target))
}

#[put("/api/editors/{id}/shirt-number")]
async fn api_set_shirt_number(
    state: AppState,
    path: Path<EditorPath>,
    body: Json<ShirtNumberBody>,
) -> HttpResponse {
    with_editor(&state, path.id, |editor| {
        editor.enter_shirt_number(body.coordinate, &body.text)
    })
}

/// Put a picked footballer on a slot.
#[put("/api/editors/{id}/footballer")]
async fn api_assign_footballer(
    state: AppState,
    path: Path<EditorPath>,
    body: Json<AssignFootballerBody>,
) -> HttpResponse {
    let body = body.into_inner();
    with_editor(&state, path.id, |editor| {
        editor.assign_footballer(body.coordinate, body.footballer)
    })
}

#[post("/api/editors/{id}/drag/start")]
async fn api_drag_start(state: AppState, path: Path<EditorPath>, body: Json<DragStartBody>) -> HttpResponse {
    with_editor(&state, path.id, |editor| editor.start_drag(body.source))
}

#[post("/api/editors/{id}/drag/drop")]
async fn api_drag_drop(state: AppState, path: Path<EditorPath>, body: Json<DropBody>) -> HttpResponse {
    with_editor(&state, path.id, |editor| editor.drop_on(body.target))
}

#[post("/api/editors/{id}/drag/cancel")]
async fn api_drag_cancel(
    state: AppState,
    path: Path<EditorPath>,
    body: Option<Json<DragCancelBody>>,
) -> HttpResponse {
    let reason = body
        .map(|b| b.reason)
        .unwrap_or_else(default_cancel_reason);
    with_editor(&state, path.id, |editor| {
        editor.cancel_drag(reason);
        Ok(())
    })
}

#[post("/api/editors/{id}/drag/pointer")]
async fn api_drag_pointer(state: AppState, path: Path<EditorPath>, body: Json<PointerBody>) -> HttpResponse {
    with_editor(&state, path.id, |editor| {
        editor.pointer_moved(body.x, body.y, body.viewport_width, body.viewport_height);
        Ok(())
    })
}

/// Typed footballer name: debounced search; a newer search for the same editor wins.
#[post("/api/editors/{id}/search")]
async fn api_search(
    state: AppState,
    gateway: Data<HttpGateway>,
    config: Data<Config>,
    path: Path<EditorPath>,
    body: Json<SearchBody>,
) -> HttpResponse {
    let id = path.id;
    let mut ticket = {
        let mut g = match state.write() {
            Ok(guard) => guard,
            Err(_) => return lock_error(),
        };
        let entry = match g.get_mut(&id) {
            Some(e) => e,
            None => return no_editor(),
        };
        entry.last_activity = Instant::now();
        match entry.editor.on_name_input(&body.query) {
            Some(ticket) => ticket,
            None => return HttpResponse::Ok().json(EditorView::of(id, &entry.editor)),
        }
    };

    let outcome = run_search(gateway.get_ref(), &mut ticket, config.search_debounce).await;

    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let entry = match g.get_mut(&id) {
        Some(e) => e,
        None => return no_editor(),
    };
    let mut message = None;
    if let SearchOutcome::Completed(result) = outcome {
        let failure = result.as_ref().err().map(|e| e.to_string());
        if entry.editor.apply_search(&ticket, result) {
            message = failure;
        }
    }
    let mut view = EditorView::of(id, &entry.editor);
    view.message = message;
    HttpResponse::Ok().json(view)
}

/// A save whose API call is still out. Dropping it unsettled (the client went away mid
/// request) unlocks the editor again.
struct SaveInFlight {
    state: AppState,
    id: Uuid,
    settled: bool,
}

impl Drop for SaveInFlight {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        if let Ok(mut g) = self.state.write() {
            if let Some(entry) = g.get_mut(&self.id) {
                entry.editor.abandon_save();
                log::warn!("Save for editor {} abandoned", self.id);
            }
        }
    }
}

/// Save the squad to the squad API; on success the editor is finalized. The board stays
/// locked while the request is out, the lock is not held across the call.
#[post("/api/editors/{id}/save")]
async fn api_save(
    state: AppState,
    gateway: Data<HttpGateway>,
    session: Session,
    path: Path<EditorPath>,
) -> HttpResponse {
    let id = path.id;
    let provider = CookieSession(&session);
    let pending = {
        let mut g = match state.write() {
            Ok(guard) => guard,
            Err(_) => return lock_error(),
        };
        let entry = match g.get_mut(&id) {
            Some(e) => e,
            None => return no_editor(),
        };
        match entry.editor.begin_save(provider.is_logged_in()) {
            Ok(pending) => pending,
            Err(e) => return error_response(&e),
        }
    };
    let mut in_flight = SaveInFlight {
        state: state.clone(),
        id,
        settled: false,
    };

    let result = submit_squad(&provider, gateway.get_ref(), gateway.get_ref(), pending.request()).await;
    in_flight.settled = true;

    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let entry = match g.get_mut(&id) {
        Some(e) => e,
        None => return no_editor(),
    };
    entry.last_activity = Instant::now();
    let squad_id = match entry.editor.finish_save(pending, result) {
        Ok(squad_id) => squad_id,
        Err(e) => return error_response(&e),
    };
    let mut view = EditorView::of(id, &entry.editor);
    view.saved_squad_id = Some(squad_id);
    HttpResponse::Ok().json(view)
}

#[get("/api/session")]
async fn api_session(session: Session) -> HttpResponse {
    let user_name = CookieSession(&session).tokens().map(|t| t.user_name);
    HttpResponse::Ok().json(serde_json::json!({ "user_name": user_name }))
}

#[post("/api/session/login")]
async fn api_login(gateway: Data<HttpGateway>, session: Session, body: Json<LoginBody>) -> HttpResponse {
    let provider = CookieSession(&session);
    match login(&provider, gateway.get_ref(), &body.email, &body.password).await {
        Ok(tokens) => HttpResponse::Ok().json(serde_json::json!({ "user_name": tokens.user_name })),
        Err(e @ (GatewayError::Unauthorized | GatewayError::Status(400..=499))) => {
            HttpResponse::Unauthorized().json(serde_json::json!({ "error": e.to_string() }))
        }
        Err(e) => error_response(&e.into()),
    }
}

#[post("/api/session/logout")]
async fn api_logout(session: Session) -> HttpResponse {
    CookieSession(&session).clear();
    HttpResponse::Ok().json(serde_json::json!({ "user_name": null }))
}

/// One page of the logged-in user's saved squads.
#[get("/api/squads")]
async fn api_list_squads(
    gateway: Data<HttpGateway>,
    session: Session,
    query: Query<SquadsQuery>,
) -> HttpResponse {
    let provider = CookieSession(&session);
    let gateway = gateway.get_ref();
    let page = parse_page(query.squads_page.as_deref());

    let count = match authorized(&provider, gateway, |tokens| async move {
        gateway.squad_count_of_user(&tokens).await
    })
    .await
    {
        Ok(count) => count,
        Err(e) => return error_response(&e.into()),
    };
    let squads = match authorized(&provider, gateway, |tokens| async move {
        gateway.squads_of_user(&tokens, page - 1).await
    })
    .await
    {
        Ok(squads) => squads,
        Err(e) => return error_response(&e.into()),
    };

    let total = total_pages(count);
    let squads: Vec<ListedSquadView> = squads
        .into_iter()
        .map(|s| ListedSquadView {
            created: s.created_label(),
            id: s.id,
            squad_name: s.squad_name,
        })
        .collect();
    HttpResponse::Ok().json(serde_json::json!({
        "count": count,
        "page": page,
        "total_pages": total,
        "pages": page_window(page, total),
        "squads": squads,
    }))
}

fn session_key(config: &Config) -> Key {
    match &config.session_key {
        Some(bytes) => Key::from(bytes.as_slice()),
        None => {
            log::info!("SESSION_KEY not set, generating a key (sessions end on restart)");
            Key::generate()
        }
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::from_env();
    let bind = (config.host.clone(), config.port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);
    log::info!("Using squad API at {}", config.backend_url);

    let key = session_key(&config);
    let config = Data::new(config);
    let state = Data::new(RwLock::new(HashMap::<Uuid, EditorEntry>::new()));

    // Background task: every 30 minutes, remove editors inactive for 12+ hours
    let state_cleanup = state.clone();
    actix_web::rt::spawn(async move {
        let mut interval = actix_web::rt::time::interval(Duration::from_secs(30 * 60));
        loop {
            interval.tick().await;
            let mut g = match state_cleanup.write() {
                Ok(guard) => guard,
                Err(_) => continue,
            };
            let before = g.len();
            g.retain(|_, entry| entry.last_activity.elapsed() < INACTIVITY_TIMEOUT);
            let removed = before - g.len();
            if removed > 0 {
                log::info!("Cleaned up {} inactive editor(s) (no activity for 12h)", removed);
            }
        }
    });

    HttpServer::new(move || {
        App::new()
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), key.clone())
                    .cookie_secure(false)
                    .build(),
            )
            .app_data(state.clone())
            .app_data(config.clone())
            // awc clients are per worker
            .app_data(Data::new(HttpGateway::new(config.backend_url.clone())))
            .route("/", web::get().to(serve_index_async))
            .service(api_health)
            .service(favicon)
            .service(api_create_editor)
            .service(api_get_editor)
            .service(api_new_squad)
            .service(api_load_squad)
            .service(api_set_name)
            .service(api_select)
            .service(api_move)
            .service(api_set_shirt_number)
            .service(api_assign_footballer)
            .service(api_drag_start)
            .service(api_drag_drop)
            .service(api_drag_cancel)
            .service(api_drag_pointer)
            .service(api_search)
            .service(api_save)
            .service(api_session)
            .service(api_login)
            .service(api_logout)
            .service(api_list_squads)
            .service(Files::new("/static", "static"))
            // shared squad links: /{squad_id}
            .route("/{squad_id}", web::get().to(serve_index_async))
    })
    .bind(bind)?
    .run()
    .await
}

async fn serve_index_async() -> HttpResponse {
    let html = include_str!("../../templates/index.html");
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(html)
}
