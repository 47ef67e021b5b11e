mod common;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use common::TestApp;
use serde_json::{json, Value};
use simbora_backend::domain::models::event::{Event, EventStatus, NewEventParams};

async fn parse_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn event_payload(max: Option<i32>) -> Value {
    let start = Utc::now() + Duration::days(7);
    json!({
        "name": "Trilha no Parque Ibirapuera",
        "meeting_location": "Portão 3",
        "start_time": start.to_rfc3339(),
        "end_time": (start + Duration::hours(3)).to_rfc3339(),
        "meeting_time": (start - Duration::minutes(30)).to_rfc3339(),
        "category": "ESPORTE",
        "min_participants": 3,
        "max_participants": max,
        "address": {
            "street": "Av. Pedro Álvares Cabral",
            "number": "s/n",
            "neighborhood": "Vila Mariana",
            "city": "São Paulo",
            "state": "SP",
            "postal_code": "04094-050"
        }
    })
}

#[tokio::test]
async fn test_create_event_counts_organizer() {
    let app = TestApp::new().await;
    let host = app.signed_in("host@exemplo.com", "Hélio").await;

    let res = app.send("POST", "/api/v1/events", Some(&host), Some(event_payload(Some(10)))).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body = parse_body(res).await;

    assert_eq!(body["organizer_id"], host.profile_id.as_str());
    assert_eq!(body["status"], "ACTIVE");
    assert_eq!(body["address"]["city"], "São Paulo");
    assert_eq!(body["capacity"]["active_participants"], 1);
    assert_eq!(body["capacity"]["vacancies"], 9);
    assert_eq!(body["capacity"]["quorum_met"], false);
    assert_eq!(body["capacity"]["quorum_progress_pct"], 33);
    assert_eq!(body["capacity"]["quorum_status"]["state"], "WAITING");
    assert_eq!(body["capacity"]["quorum_status"]["missing"], 2);
}

#[tokio::test]
async fn test_create_event_validations() {
    let app = TestApp::new().await;
    let host = app.signed_in("host@exemplo.com", "Hélio").await;

    let mut past = event_payload(Some(10));
    past["start_time"] = json!((Utc::now() - Duration::days(1)).to_rfc3339());
    past["end_time"] = json!((Utc::now() + Duration::hours(1)).to_rfc3339());
    past["meeting_time"] = Value::Null;

    let mut inverted = event_payload(Some(10));
    inverted["end_time"] = inverted["meeting_time"].clone();

    let mut min_over_max = event_payload(Some(2));
    min_over_max["min_participants"] = json!(5);

    let mut zero_max = event_payload(Some(0));
    zero_max["min_participants"] = Value::Null;

    let mut nowhere = event_payload(None);
    nowhere["address"] = Value::Null;
    nowhere["meeting_location"] = Value::Null;

    let mut bad_cep = event_payload(None);
    bad_cep["address"]["postal_code"] = json!("abc");

    for payload in [past, inverted, min_over_max, zero_max, nowhere, bad_cep] {
        let res = app.send("POST", "/api/v1/events", Some(&host), Some(payload.clone())).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "payload {} should be rejected", payload);
    }
}

#[tokio::test]
async fn test_list_and_detail_visible_to_guests() {
    let app = TestApp::new().await;
    let host = app.signed_in("host@exemplo.com", "Hélio").await;

    let mut later = event_payload(None);
    later["name"] = json!("Cinema ao Ar Livre");
    later["start_time"] = json!((Utc::now() + Duration::days(20)).to_rfc3339());
    later["end_time"] = json!((Utc::now() + Duration::days(20) + Duration::hours(2)).to_rfc3339());
    later["meeting_time"] = Value::Null;

    let res = app.send("POST", "/api/v1/events", Some(&host), Some(event_payload(Some(10)))).await;
    let first = parse_body(res).await;
    app.send("POST", "/api/v1/events", Some(&host), Some(later)).await;

    let res = app.send("GET", "/api/v1/events", None, None).await;
    assert_eq!(res.status(), StatusCode::OK);
    let list = parse_body(res).await;
    let list = list.as_array().unwrap();
    assert_eq!(list.len(), 2);
    // newest start first
    assert_eq!(list[0]["name"], "Cinema ao Ar Livre");
    assert_eq!(list[0]["capacity"]["vacancies"], Value::Null);
    assert_eq!(list[0]["capacity"]["occupancy_pct"], 0);

    let id = first["id"].as_str().unwrap();
    let res = app.send("GET", &format!("/api/v1/events/{}", id), None, None).await;
    assert_eq!(res.status(), StatusCode::OK);
    let detail = parse_body(res).await;
    assert_eq!(detail["is_organizer"], false);
    assert_eq!(detail["my_status"], Value::Null);
    let roster = detail["roster"].as_array().unwrap();
    assert_eq!(roster.len(), 1);
    assert_eq!(roster[0]["is_organizer"], true);
    assert_eq!(roster[0]["status"], "CONFIRMED");
    assert_eq!(roster[0]["display_name"], "Hélio Teste");

    let res = app.send("GET", &format!("/api/v1/events/{}", id), Some(&host), None).await;
    let detail = parse_body(res).await;
    assert_eq!(detail["is_organizer"], true);
    assert_eq!(detail["my_status"], "CONFIRMED");

    let res = app.send("GET", "/api/v1/events/does-not-exist", None, None).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_only_organizer_edits_active_event() {
    let app = TestApp::new().await;
    let host = app.signed_in("host@exemplo.com", "Hélio").await;
    let guest = app.signed_in("guest@exemplo.com", "Gina").await;

    let res = app.send("POST", "/api/v1/events", Some(&host), Some(event_payload(Some(10)))).await;
    let event = parse_body(res).await;
    let uri = format!("/api/v1/events/{}", event["id"].as_str().unwrap());

    let res = app.send("PUT", &uri, Some(&guest), Some(json!({ "name": "Sequestrado" }))).await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = app.send("PUT", &uri, Some(&host), Some(json!({ "name": "Trilha Noturna", "max_participants": 20 }))).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = parse_body(res).await;
    assert_eq!(body["name"], "Trilha Noturna");
    assert_eq!(body["capacity"]["vacancies"], 19);

    let res = app.send("PUT", &uri, Some(&host), Some(json!({ "min_participants": 50 }))).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_edit_clears_participant_limits_with_null() {
    let app = TestApp::new().await;
    let host = app.signed_in("host@exemplo.com", "Hélio").await;

    let res = app.send("POST", "/api/v1/events", Some(&host), Some(event_payload(Some(10)))).await;
    let event = parse_body(res).await;
    let uri = format!("/api/v1/events/{}", event["id"].as_str().unwrap());

    // fields left out keep their values
    let res = app.send("PUT", &uri, Some(&host), Some(json!({ "description": "Levar água" }))).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = parse_body(res).await;
    assert_eq!(body["max_participants"], 10);
    assert_eq!(body["min_participants"], 3);

    let res = app.send("PUT", &uri, Some(&host), Some(json!({ "min_participants": null, "max_participants": null }))).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = parse_body(res).await;
    assert_eq!(body["max_participants"], Value::Null);
    assert_eq!(body["min_participants"], Value::Null);
    assert_eq!(body["capacity"]["vacancies"], Value::Null);
    assert_eq!(body["capacity"]["quorum_status"]["state"], "NO_MINIMUM");

    let stored = app.state.event_repo.find_by_id(event["id"].as_str().unwrap()).await.unwrap().unwrap();
    assert_eq!(stored.max_participants, None);
    assert_eq!(stored.min_participants, None);
}

#[tokio::test]
async fn test_cancel_event_once() {
    let app = TestApp::new().await;
    let host = app.signed_in("host@exemplo.com", "Hélio").await;
    let guest = app.signed_in("guest@exemplo.com", "Gina").await;

    let res = app.send("POST", "/api/v1/events", Some(&host), Some(event_payload(Some(10)))).await;
    let event = parse_body(res).await;
    let id = event["id"].as_str().unwrap();
    let cancel_uri = format!("/api/v1/events/{}/cancel", id);

    let res = app.send("POST", &cancel_uri, Some(&guest), None).await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = app.send("POST", &cancel_uri, Some(&host), None).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = parse_body(res).await;
    assert_eq!(body["event"]["status"], "CANCELLED");
    assert_eq!(body["event"]["accepts_participants"], false);

    let res = app.send("POST", &cancel_uri, Some(&host), None).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = app.send("PUT", &format!("/api/v1/events/{}", id), Some(&host), Some(json!({ "name": "De volta" }))).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = app.send("POST", &format!("/api/v1/events/{}/signup", id), Some(&guest), None).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_elapsed_event_finishes_only_when_listed() {
    let app = TestApp::new().await;
    let host = app.signed_in("host@exemplo.com", "Hélio").await;

    let end = Utc::now() - Duration::hours(1);
    let past = Event::new(NewEventParams {
        name: "Caminhada Noturna".into(),
        organizer_id: host.profile_id.clone(),
        address_id: None,
        meeting_location: Some("Praça da Sé".into()),
        description: None,
        rules: None,
        start_time: end - Duration::hours(3),
        end_time: end,
        meeting_time: None,
        whatsapp_group: None,
        photo_url: None,
        category: None,
        min_participants: None,
        max_participants: None,
    });
    app.state.event_repo.create_with_address(&past, None).await.unwrap();

    let stored = app.state.event_repo.find_by_id(&past.id).await.unwrap().unwrap();
    assert_eq!(stored.status, EventStatus::Active);

    let res = app.send("GET", &format!("/api/v1/events/{}", past.id), None, None).await;
    let detail = parse_body(res).await;
    assert_eq!(detail["status"], "ACTIVE");
    assert_eq!(detail["capacity"]["has_finished"], true);

    let res = app.send("GET", "/api/v1/events", None, None).await;
    let list = parse_body(res).await;
    assert_eq!(list[0]["status"], "FINISHED");

    let stored = app.state.event_repo.find_by_id(&past.id).await.unwrap().unwrap();
    assert_eq!(stored.status, EventStatus::Finished);
}
