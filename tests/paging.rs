//! Integration tests for squad list paging, list labels, wire bodies and server config.

use squad_builder_web::gateway::ListedSquad;
use squad_builder_web::logic::{page_window, parse_page, total_pages};
use squad_builder_web::{Board, Config, CreateSquadRequest, SquadRecord};
use std::time::Duration;

#[test]
fn pages_hold_five_squads() {
    assert_eq!(total_pages(0), 0);
    assert_eq!(total_pages(5), 1);
    assert_eq!(total_pages(6), 2);
    assert_eq!(total_pages(12), 3);
}

#[test]
fn page_parameter_defaults_to_first_page() {
    assert_eq!(parse_page(None), 1);
    assert_eq!(parse_page(Some("3")), 3);
    assert_eq!(parse_page(Some("0")), 1);
    assert_eq!(parse_page(Some("abc")), 1);
}

#[test]
fn page_window_shows_seven_pages_around_current() {
    assert_eq!(page_window(1, 0), Vec::<u32>::new());
    assert_eq!(page_window(2, 3), vec![1, 2, 3]);
    assert_eq!(page_window(1, 20), vec![1, 2, 3, 4, 5, 6, 7]);
    assert_eq!(page_window(10, 20), vec![7, 8, 9, 10, 11, 12, 13]);
    assert_eq!(page_window(20, 20), vec![14, 15, 16, 17, 18, 19, 20]);
    assert_eq!(page_window(99, 20), vec![14, 15, 16, 17, 18, 19, 20]);
}

#[test]
fn listed_squad_shows_created_date() {
    let squad: ListedSquad = serde_json::from_value(serde_json::json!({
        "id": "6f1c2a8e-4b7d-4c39-9e1a-2d5f8b3c7a10",
        "squadName": "Derby",
        "createdDate": "2024-03-07T18:05:00Z"
    }))
    .unwrap();
    assert_eq!(squad.created_label(), "07/03/2024 18:05");
}

#[test]
fn create_request_uses_api_field_names() {
    let request = CreateSquadRequest::from_board("Derby", &Board::default_formation());
    let body = serde_json::to_value(&request).unwrap();
    assert_eq!(body["squadName"], "Derby");
    let first = &body["boardFootballers"][0];
    assert_eq!(first["footballerId"], -1);
    assert_eq!(first["positionY"], 0);
    assert_eq!(first["positionX"], 2);
    assert_eq!(first["shirtNumber"], 1);
}

#[test]
fn squad_record_keeps_wire_shirt_numbers() {
    let record: SquadRecord = serde_json::from_value(serde_json::json!({
        "name": "Derby",
        "footballers": [
            { "id": 4, "name": "Keeper", "positionY": 0, "positionX": 2, "imageUrl": null, "shirtNumber": 255 }
        ]
    }))
    .unwrap();
    let (footballers, numbers) = record.board_parts().unwrap();
    assert_eq!(footballers[0].id, 4);
    assert_eq!(numbers, vec![255]);
    assert_eq!(record.footballers[0].shirt_number(), None);
}

#[test]
fn config_defaults_and_overrides() {
    let config = Config::from_lookup(|_| None);
    assert_eq!(config.host, "0.0.0.0");
    assert_eq!(config.port, 8080);
    assert_eq!(config.search_debounce, Duration::from_millis(500));
    assert!(config.session_key.is_none());

    let config = Config::from_lookup(|key| match key {
        "PORT" => Some("9000".to_string()),
        "BACKEND_URL" => Some("http://api.internal:5000".to_string()),
        "SEARCH_DEBOUNCE_MS" => Some("250".to_string()),
        "SESSION_KEY" => Some("k".repeat(64)),
        _ => None,
    });
    assert_eq!(config.port, 9000);
    assert_eq!(config.backend_url, "http://api.internal:5000");
    assert_eq!(config.search_debounce, Duration::from_millis(250));
    assert_eq!(config.session_key.map(|k| k.len()), Some(64));
}

#[test]
fn bad_config_values_fall_back() {
    let config = Config::from_lookup(|key| match key {
        "PORT" => Some("eighty".to_string()),
        "SESSION_KEY" => Some("short".to_string()),
        _ => None,
    });
    assert_eq!(config.port, 8080);
    assert!(config.session_key.is_none());
}
