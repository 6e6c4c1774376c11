//! Integration tests for the awc squad API client against a local stub API.

use actix_web::{dev::ServerHandle, web, App, HttpRequest, HttpResponse, HttpServer};
use serde::Deserialize;
use squad_builder_web::logic::submit_squad;
use squad_builder_web::{
    Board, CreateSquadRequest, GatewayError, HttpGateway, MemorySession, SessionGateway,
    SessionProvider, SessionTokens, SquadGateway,
};
use uuid::Uuid;

const KNOWN_SQUAD: &str = "3b0d8d2e-9f4a-4c1e-8a57-0f6c1d2e3f40";
const CREATED_SQUAD: &str = "a4e2b1c0-5d6f-4e7a-9b8c-1d2e3f405162";

fn stub_tokens(token: &str) -> serde_json::Value {
    serde_json::json!({
        "token": token,
        "refreshToken": format!("refresh-{token}"),
        "userName": "coach",
    })
}

fn bearer_is_fresh(req: &HttpRequest) -> bool {
    req.headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        == Some("Bearer fresh")
}

#[derive(Deserialize)]
struct SearchQuery {
    #[serde(rename = "searchTerm")]
    search_term: String,
}

async fn search(query: web::Query<SearchQuery>) -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!([{
        "id": 10,
        "name": format!("{} Messi", query.search_term),
        "dateOfBirth": "1987-06-24T00:00:00",
        "imageUrl": "https://img/10.png",
        "countryCodes": "ar,es",
    }]))
}

#[derive(Deserialize)]
struct SquadQuery {
    id: String,
}

async fn get_squad(query: web::Query<SquadQuery>) -> HttpResponse {
    if query.id != KNOWN_SQUAD {
        return HttpResponse::Ok().json(serde_json::json!({ "status": 500 }));
    }
    HttpResponse::Ok().json(serde_json::json!({
        "squadName": "Derby",
        "boardFootballers": [
            {
                "footballer": { "id": 1, "name": "Keeper", "imageUrl": null },
                "positionY": 0,
                "positionX": 2,
                "shirtNumber": 1
            },
            {
                "footballer": { "id": 9, "name": "Nine" },
                "positionY": 5,
                "positionX": 2,
                "shirtNumber": 255
            }
        ]
    }))
}

async fn create_squad(req: HttpRequest, body: web::Json<serde_json::Value>) -> HttpResponse {
    if !bearer_is_fresh(&req) {
        return HttpResponse::Unauthorized().finish();
    }
    if body["boardFootballers"].as_array().map(Vec::len) != Some(11) {
        return HttpResponse::BadRequest().finish();
    }
    HttpResponse::Ok().json(serde_json::json!({ "squadId": CREATED_SQUAD }))
}

async fn squad_count(req: HttpRequest) -> HttpResponse {
    if !bearer_is_fresh(&req) {
        return HttpResponse::Unauthorized().finish();
    }
    HttpResponse::Ok().json(serde_json::json!({ "count": 7 }))
}

async fn user_squads(req: HttpRequest) -> HttpResponse {
    if !bearer_is_fresh(&req) {
        return HttpResponse::Unauthorized().finish();
    }
    HttpResponse::Ok().json(serde_json::json!([{
        "id": KNOWN_SQUAD,
        "squadName": "Derby",
        "createdDate": "2024-03-07T18:05:00",
    }]))
}

async fn account_login(body: web::Json<serde_json::Value>) -> HttpResponse {
    if body["password"] == "secret" {
        HttpResponse::Ok().json(stub_tokens("fresh"))
    } else {
        HttpResponse::BadRequest().finish()
    }
}

async fn account_refresh(body: web::Json<serde_json::Value>) -> HttpResponse {
    if body["refreshToken"] == "refresh-dead" {
        return HttpResponse::build(actix_web::http::StatusCode::NETWORK_AUTHENTICATION_REQUIRED)
            .finish();
    }
    HttpResponse::Ok().json(stub_tokens("fresh"))
}

fn start_stub_api() -> (String, ServerHandle) {
    let server = HttpServer::new(|| {
        App::new()
            .route("/api/footballer/search", web::get().to(search))
            .route("/api/squad/getSquad", web::get().to(get_squad))
            .route("/api/squad/create", web::post().to(create_squad))
            .route("/api/squad/getUserSquadCount", web::get().to(squad_count))
            .route("/api/squad/getUserSquads", web::get().to(user_squads))
            .route("/api/account/login", web::post().to(account_login))
            .route("/api/account/gettoken", web::post().to(account_refresh))
    })
    .workers(1)
    .bind(("127.0.0.1", 0))
    .unwrap();
    let addr = server.addrs()[0];
    let server = server.run();
    let handle = server.handle();
    actix_web::rt::spawn(server);
    (format!("http://{addr}/"), handle)
}

fn session(token: &str) -> MemorySession {
    MemorySession::with_tokens(SessionTokens {
        token: token.to_string(),
        refresh_token: format!("refresh-{token}"),
        user_name: "coach".to_string(),
    })
}

fn complete_request() -> CreateSquadRequest {
    let mut request = CreateSquadRequest::from_board("Derby", &Board::default_formation());
    for (i, f) in request.board_footballers.iter_mut().enumerate() {
        f.footballer_id = 100 + i as i64;
    }
    request
}

#[actix_web::test]
async fn search_decodes_footballers() {
    let (url, handle) = start_stub_api();
    let gateway = HttpGateway::new(url);

    let found = gateway.search_footballers("Lionel").await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].name, "Lionel Messi");
    assert_eq!(found[0].birth_day_month().as_deref(), Some("24.06"));
    assert_eq!(found[0].primary_country_code(), Some("ar"));

    handle.stop(true).await;
}

#[actix_web::test]
async fn get_squad_maps_status_body_to_not_found() {
    let (url, handle) = start_stub_api();
    let gateway = HttpGateway::new(url);

    let record = gateway
        .get_squad(Uuid::parse_str(KNOWN_SQUAD).unwrap())
        .await
        .unwrap();
    assert_eq!(record.name, "Derby");
    assert_eq!(record.footballers.len(), 2);
    assert_eq!(record.footballers[1].shirt_number(), None);

    let missing = gateway.get_squad(Uuid::new_v4()).await;
    assert_eq!(missing, Err(GatewayError::NotFound));

    handle.stop(true).await;
}

#[actix_web::test]
async fn create_with_stale_token_refreshes_and_retries() {
    let (url, handle) = start_stub_api();
    let gateway = HttpGateway::new(url);
    let provider = session("stale");

    let squad_id = submit_squad(&provider, &gateway, &gateway, &complete_request())
        .await
        .unwrap();
    assert_eq!(squad_id, Uuid::parse_str(CREATED_SQUAD).unwrap());
    assert_eq!(provider.tokens().unwrap().token, "fresh");

    handle.stop(true).await;
}

#[actix_web::test]
async fn rejected_refresh_token_expires_the_session() {
    let (url, handle) = start_stub_api();
    let gateway = HttpGateway::new(url);
    let provider = session("dead");

    let result = submit_squad(&provider, &gateway, &gateway, &complete_request()).await;
    assert_eq!(result, Err(GatewayError::SessionExpired));
    assert!(!provider.is_logged_in());

    handle.stop(true).await;
}

#[actix_web::test]
async fn login_and_list_user_squads() {
    let (url, handle) = start_stub_api();
    let gateway = HttpGateway::new(url);

    assert_eq!(
        gateway.login("coach@example.com", "wrong").await,
        Err(GatewayError::Status(400))
    );
    let tokens = gateway.login("coach@example.com", "secret").await.unwrap();
    assert_eq!(tokens.user_name, "coach");

    assert_eq!(gateway.squad_count_of_user(&tokens).await, Ok(7));
    let squads = gateway.squads_of_user(&tokens, 0).await.unwrap();
    assert_eq!(squads[0].squad_name, "Derby");
    assert_eq!(squads[0].created_label(), "07/03/2024 18:05");

    handle.stop(true).await;
}
