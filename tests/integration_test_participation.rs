mod common;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use common::{AuthHeaders, TestApp};
use serde_json::{json, Value};
use simbora_backend::domain::models::participation::ParticipationStatus;

async fn parse_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn create_event(app: &TestApp, host: &AuthHeaders, max: Option<i32>) -> String {
    let start = Utc::now() + Duration::days(3);
    let res = app.send("POST", "/api/v1/events", Some(host), Some(json!({
        "name": "Yoga ao Nascer do Sol",
        "meeting_location": "Gramado central",
        "start_time": start.to_rfc3339(),
        "end_time": (start + Duration::minutes(90)).to_rfc3339(),
        "max_participants": max
    }))).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    parse_body(res).await["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_confirm_twice_keeps_one_row() {
    let app = TestApp::new().await;
    let host = app.signed_in("host@exemplo.com", "Hélio").await;
    let guest = app.signed_in("guest@exemplo.com", "Gina").await;
    let event_id = create_event(&app, &host, Some(5)).await;
    let uri = format!("/api/v1/events/{}/confirm", event_id);

    let res = app.send("POST", &uri, Some(&guest), None).await;
    assert_eq!(res.status(), StatusCode::OK);
    let first = parse_body(res).await;
    assert_eq!(first["success"], true);
    assert_eq!(first["already_confirmed"], false);
    assert_eq!(first["total_confirmed"], 2);
    assert_eq!(first["participation"]["status"], "CONFIRMED");

    let res = app.send("POST", &uri, Some(&guest), None).await;
    assert_eq!(res.status(), StatusCode::OK);
    let second = parse_body(res).await;
    assert_eq!(second["already_confirmed"], true);
    assert_eq!(second["total_confirmed"], 2);
    assert_eq!(second["participation"]["id"], first["participation"]["id"]);

    let rows = app.state.participation_repo.list_by_event(&event_id).await.unwrap();
    assert_eq!(rows.len(), 1);
}

#[tokio::test]
async fn test_organizer_cannot_join_or_leave_own_event() {
    let app = TestApp::new().await;
    let host = app.signed_in("host@exemplo.com", "Hélio").await;
    let event_id = create_event(&app, &host, None).await;

    for action in ["signup", "confirm", "leave"] {
        let res = app.send("POST", &format!("/api/v1/events/{}/{}", event_id, action), Some(&host), None).await;
        assert_eq!(res.status(), StatusCode::FORBIDDEN, "organizer {} should be forbidden", action);
    }
}

#[tokio::test]
async fn test_signup_leave_and_rejoin() {
    let app = TestApp::new().await;
    let host = app.signed_in("host@exemplo.com", "Hélio").await;
    let guest = app.signed_in("guest@exemplo.com", "Gina").await;
    let event_id = create_event(&app, &host, Some(10)).await;

    let res = app.send("POST", &format!("/api/v1/events/{}/leave", event_id), Some(&guest), None).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = app.send("POST", &format!("/api/v1/events/{}/signup", event_id), Some(&guest), None).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = parse_body(res).await;
    assert_eq!(body["participation"]["status"], "SIGNED_UP");
    assert_eq!(body["capacity"]["active_participants"], 2);

    let res = app.send("POST", &format!("/api/v1/events/{}/signup", event_id), Some(&guest), None).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);

    let res = app.send("POST", &format!("/api/v1/events/{}/leave", event_id), Some(&guest), None).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = parse_body(res).await;
    assert_eq!(body["participation"]["status"], "CANCELLED");
    assert!(body["participation"]["cancelled_at"].is_string());
    assert_eq!(body["capacity"]["active_participants"], 1);

    let res = app.send("POST", &format!("/api/v1/events/{}/leave", event_id), Some(&guest), None).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    // a cancelled row is reopened rather than duplicated
    let res = app.send("POST", &format!("/api/v1/events/{}/signup", event_id), Some(&guest), None).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = parse_body(res).await;
    assert_eq!(body["participation"]["status"], "SIGNED_UP");
    assert_eq!(body["participation"]["cancelled_at"], Value::Null);
    assert_eq!(app.state.participation_repo.list_by_event(&event_id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_full_event_rejects_new_confirmations_and_offers_waitlist() {
    let app = TestApp::new().await;
    let host = app.signed_in("host@exemplo.com", "Hélio").await;
    let first = app.signed_in("primeira@exemplo.com", "Prima").await;
    let late = app.signed_in("atrasado@exemplo.com", "Tadeu").await;
    let event_id = create_event(&app, &host, Some(2)).await;

    let res = app.send("POST", &format!("/api/v1/events/{}/waitlist", event_id), Some(&first), None).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = app.send("POST", &format!("/api/v1/events/{}/confirm", event_id), Some(&first), None).await;
    let body = parse_body(res).await;
    assert_eq!(body["capacity"]["is_full"], true);
    assert_eq!(body["capacity"]["vacancies"], 0);
    assert_eq!(body["capacity"]["occupancy_pct"], 100);

    let res = app.send("POST", &format!("/api/v1/events/{}/confirm", event_id), Some(&late), None).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let res = app.send("POST", &format!("/api/v1/events/{}/signup", event_id), Some(&late), None).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = app.send("POST", &format!("/api/v1/events/{}/waitlist", event_id), Some(&late), None).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = parse_body(res).await;
    assert_eq!(body["participation"]["status"], "WAITLISTED");

    // promotion needs a free seat
    let res = app.send("POST", &format!("/api/v1/events/{}/confirm", event_id), Some(&late), None).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    app.send("POST", &format!("/api/v1/events/{}/leave", event_id), Some(&first), None).await;

    let res = app.send("POST", &format!("/api/v1/events/{}/confirm", event_id), Some(&late), None).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = parse_body(res).await;
    assert_eq!(body["participation"]["status"], "CONFIRMED");
    assert_eq!(body["already_confirmed"], false);
}

#[tokio::test]
async fn test_freed_seat_goes_to_one_of_several_waitlisters() {
    let app = TestApp::new().await;
    let host = app.signed_in("host@exemplo.com", "Hélio").await;
    let bia = app.signed_in("bia@exemplo.com", "Bia").await;
    let caio = app.signed_in("caio@exemplo.com", "Caio").await;
    let ana = app.signed_in("ana@exemplo.com", "Ana").await;
    let duda = app.signed_in("duda@exemplo.com", "Duda").await;
    let event_id = create_event(&app, &host, Some(3)).await;
    let uri = |action: &str| format!("/api/v1/events/{}/{}", event_id, action);

    for guest in [&bia, &caio] {
        let res = app.send("POST", &uri("confirm"), Some(guest), None).await;
        assert_eq!(res.status(), StatusCode::OK);
    }

    let res = app.send("POST", &uri("waitlist"), Some(&ana), None).await;
    assert_eq!(res.status(), StatusCode::OK);
    let ana_row = parse_body(res).await["participation"].clone();
    let res = app.send("POST", &uri("waitlist"), Some(&duda), None).await;
    assert_eq!(res.status(), StatusCode::OK);

    // joining twice returns the same row
    let res = app.send("POST", &uri("waitlist"), Some(&ana), None).await;
    assert_eq!(res.status(), StatusCode::OK);
    let again = parse_body(res).await;
    assert_eq!(again["participation"]["id"], ana_row["id"]);
    assert_eq!(again["participation"]["status"], "WAITLISTED");

    let res = app.send("POST", &uri("leave"), Some(&caio), None).await;
    assert_eq!(res.status(), StatusCode::OK);

    let res = app.send("POST", &uri("confirm"), Some(&ana), None).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = parse_body(res).await;
    assert_eq!(body["participation"]["status"], "CONFIRMED");
    assert_eq!(body["participation"]["id"], ana_row["id"]);

    // the seat is taken again: neither the other waitlister nor the leaver gets in
    let res = app.send("POST", &uri("confirm"), Some(&duda), None).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let res = app.send("POST", &uri("confirm"), Some(&caio), None).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let res = app.send("POST", &uri("signup"), Some(&caio), None).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let rows = app.state.participation_repo.list_by_event(&event_id).await.unwrap();
    let confirmed = rows.iter().filter(|p| p.status == ParticipationStatus::Confirmed).count();
    assert_eq!(confirmed, 2);
}

#[tokio::test]
async fn test_attendance_and_host_rating() {
    let app = TestApp::new().await;
    let host = app.signed_in("host@exemplo.com", "Hélio").await;
    let guest = app.signed_in("guest@exemplo.com", "Gina").await;
    let event_id = create_event(&app, &host, None).await;

    let res = app.send("POST", &format!("/api/v1/events/{}/signup", event_id), Some(&guest), None).await;
    let participation_id = parse_body(res).await["participation"]["id"].as_str().unwrap().to_string();
    let attendance_uri = format!("/api/v1/events/{}/participants/{}/attendance", event_id, participation_id);
    let rating_uri = format!("/api/v1/events/{}/rating", event_id);

    // SIGNED_UP cannot be marked present yet
    let res = app.send("POST", &attendance_uri, Some(&host), Some(json!({ "attended": true }))).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    app.send("POST", &format!("/api/v1/events/{}/confirm", event_id), Some(&guest), None).await;

    let res = app.send("POST", &attendance_uri, Some(&guest), Some(json!({ "attended": true }))).await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = app.send("POST", &rating_uri, Some(&guest), Some(json!({ "rating": 5 }))).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = app.send("POST", &attendance_uri, Some(&host), Some(json!({ "attended": true }))).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(parse_body(res).await["participation"]["status"], "ATTENDED");

    let res = app.send("POST", &rating_uri, Some(&guest), Some(json!({ "rating": 6 }))).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = app.send("POST", &rating_uri, Some(&guest), Some(json!({ "rating": 4, "comment": "  Muito bom!  " }))).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = parse_body(res).await;
    assert_eq!(body["participation"]["host_rating"], 4);
    assert_eq!(body["participation"]["host_comment"], "Muito bom!");

    let res = app.send("POST", &attendance_uri, Some(&host), Some(json!({ "attended": false }))).await;
    let body = parse_body(res).await;
    assert_eq!(body["participation"]["status"], "ABSENT");
    assert_eq!(body["capacity"]["active_participants"], 1);
}

#[tokio::test]
async fn test_participants_roster_is_organizer_only() {
    let app = TestApp::new().await;
    let host = app.signed_in("host@exemplo.com", "Hélio").await;
    let guest = app.signed_in("guest@exemplo.com", "Gina").await;
    let event_id = create_event(&app, &host, None).await;
    let uri = format!("/api/v1/events/{}/participants", event_id);

    app.send("POST", &format!("/api/v1/events/{}/signup", event_id), Some(&guest), None).await;

    let res = app.send("GET", &uri, Some(&guest), None).await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = app.send("GET", &uri, Some(&host), None).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = parse_body(res).await;
    let roster = body["roster"].as_array().unwrap();
    assert_eq!(roster.len(), 2);
    assert_eq!(roster[0]["profile_id"], host.profile_id.as_str());
    assert_eq!(roster[0]["is_organizer"], true);
    assert_eq!(roster[1]["profile_id"], guest.profile_id.as_str());
    assert_eq!(roster[1]["status"], "SIGNED_UP");
}

#[tokio::test]
async fn test_deleted_profile_keeps_participation_history() {
    let app = TestApp::new().await;
    let host = app.signed_in("host@exemplo.com", "Hélio").await;
    let guest = app.signed_in("guest@exemplo.com", "Gina").await;
    let event_id = create_event(&app, &host, None).await;

    app.send("POST", &format!("/api/v1/events/{}/confirm", event_id), Some(&guest), None).await;

    let res = app.send("DELETE", "/api/v1/profile/me", Some(&guest), None).await;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let rows = app.state.participation_repo.list_by_event(&event_id).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].participant_id, None);
    assert_eq!(rows[0].status, ParticipationStatus::Confirmed);

    let res = app.send("GET", &format!("/api/v1/events/{}", event_id), None, None).await;
    let detail = parse_body(res).await;
    assert_eq!(detail["capacity"]["active_participants"], 1);
    assert_eq!(detail["roster"][1]["profile_id"], Value::Null);
    assert_eq!(detail["roster"][1]["display_name"], "[Removed user]");

    // the account remains but can no longer act on events
    let res = app.send("POST", &format!("/api/v1/events/{}/signup", event_id), Some(&guest), None).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_my_events_filters() {
    let app = TestApp::new().await;
    let host = app.signed_in("host@exemplo.com", "Hélio").await;
    let guest = app.signed_in("guest@exemplo.com", "Gina").await;

    let hosted = create_event(&app, &host, None).await;
    let joined = create_event(&app, &guest, None).await;
    let _unrelated = create_event(&app, &guest, None).await;
    app.send("POST", &format!("/api/v1/events/{}/signup", joined), Some(&host), None).await;

    let ids = |body: Value| -> Vec<String> {
        body.as_array().unwrap().iter().map(|e| e["id"].as_str().unwrap().to_string()).collect()
    };

    let res = app.send("GET", "/api/v1/me/events?filter=created", Some(&host), None).await;
    assert_eq!(ids(parse_body(res).await), vec![hosted.clone()]);

    let res = app.send("GET", "/api/v1/me/events?filter=enrolled", Some(&host), None).await;
    assert_eq!(ids(parse_body(res).await), vec![joined.clone()]);

    let res = app.send("GET", "/api/v1/me/events", Some(&host), None).await;
    let mut all = ids(parse_body(res).await);
    all.sort();
    let mut expected = vec![hosted.clone(), joined.clone()];
    expected.sort();
    assert_eq!(all, expected);

    let res = app.send("GET", "/api/v1/me/events?filter=completed", Some(&host), None).await;
    assert!(parse_body(res).await.as_array().unwrap().is_empty());

    let res = app.send("GET", "/api/v1/me/events?filter=bogus", Some(&host), None).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = app.send("GET", "/api/v1/me/events", None, None).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}
