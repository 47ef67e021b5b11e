use axum::{
    body::Body,
    extract::Request,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use crate::state::AppState;
use crate::api::handlers::{auth, event, health, participation, profile};
use tower_http::{
    trace::TraceLayer,
    classify::ServerErrorsFailureClass,
};
use tower_cookies::CookieManagerLayer;
use tracing::{info_span, Span, error, info};
use uuid::Uuid;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health_check))

        // Auth
        .route("/api/v1/auth/register", post(auth::register))
        .route("/api/v1/auth/login", post(auth::login))
        .route("/api/v1/auth/refresh", post(auth::refresh))
        .route("/api/v1/auth/logout", post(auth::logout))

        // Profile
        .route("/api/v1/profile/me", get(profile::get_my_profile).put(profile::update_my_profile).delete(profile::delete_my_profile))

        // Events
        .route("/api/v1/events", get(event::list_events).post(event::create_event))
        .route("/api/v1/events/{event_id}", get(event::get_event).put(event::update_event))
        .route("/api/v1/events/{event_id}/cancel", post(event::cancel_event))

        // Participation
        .route("/api/v1/events/{event_id}/signup", post(participation::sign_up))
        .route("/api/v1/events/{event_id}/confirm", post(participation::confirm))
        .route("/api/v1/events/{event_id}/waitlist", post(participation::join_waitlist))
        .route("/api/v1/events/{event_id}/leave", post(participation::leave))
        .route("/api/v1/events/{event_id}/rating", post(participation::rate_host))
        .route("/api/v1/events/{event_id}/participants", get(participation::list_participants))
        .route("/api/v1/events/{event_id}/participants/{participation_id}/attendance", post(participation::mark_attendance))
        .route("/api/v1/me/events", get(participation::my_events))

        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = Uuid::new_v4().to_string();
                    info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = ?request.method(),
                        uri = ?request.uri(),
                        version = ?request.version(),
                        user_id = tracing::field::Empty,
                    )
                })
                .on_request(|request: &Request<Body>, _span: &Span| {
                    info!("started processing request: {} {}", request.method(), request.uri().path());
                })
                .on_response(|response: &axum::http::Response<Body>, latency: Duration, _span: &Span| {
                    info!(
                        status = response.status().as_u16(),
                        latency_ms = latency.as_millis(),
                        "finished processing request"
                    );
                })
                .on_failure(|error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                    error!("request failed: {:?}", error);
                })
        )
        .layer(CookieManagerLayer::new())
        .with_state(state)
}
