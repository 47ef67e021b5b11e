use axum::{extract::{Path, Query, State}, response::IntoResponse, Json};
use chrono::Utc;
use std::sync::Arc;
use tracing::{info, warn};

use crate::api::dtos::{
    requests::{AttendanceRequest, MyEventsQuery, RatingRequest},
    responses::{ConfirmResponse, ParticipationResponse, RosterResponse},
};
use crate::api::extractors::auth::AuthUser;
use crate::api::handlers::{event_view, load_event, require_profile};
use crate::domain::models::{event::Event, participation::Participation};
use crate::domain::services::{
    capacity::{Capacity, CapacitySummary},
    lifecycle::finish_elapsed_events,
    participation::{self as rules, ConfirmOutcome, LedgerWrite, RuleViolation},
    roster::build_roster,
};
use crate::error::AppError;
use crate::state::AppState;

/// Writes a ledger change. A concurrent duplicate signup surfaces as a
/// unique-constraint violation and is reported as already registered.
async fn persist(state: &AppState, write: LedgerWrite) -> Result<Participation, AppError> {
    match write {
        LedgerWrite::Insert(p) => state.participation_repo.create(&p).await.map_err(|e| {
            if e.is_unique_violation() {
                warn!(event_id = %p.event_id, "Concurrent duplicate participation rejected");
                RuleViolation::AlreadyRegistered.into()
            } else {
                e
            }
        }),
        LedgerWrite::Update(p) => state.participation_repo.update(&p).await,
        LedgerWrite::Unchanged(p) => Ok(p),
    }
}

async fn fresh_capacity(state: &AppState, event: &Event) -> Result<CapacitySummary, AppError> {
    let participations = state.participation_repo.list_by_event(&event.id).await?;
    Ok(Capacity::new(event, &participations).summary(Utc::now()))
}

pub async fn sign_up(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(event_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let profile = require_profile(&state, &auth).await?;
    let event = load_event(&state, &event_id).await?;
    let participations = state.participation_repo.list_by_event(&event.id).await?;
    let existing = state.participation_repo.find_for_participant(&event.id, &profile.id).await?;

    let write = rules::sign_up(&event, &participations, &profile.id, existing, Utc::now())?;
    let participation = persist(&state, write).await?;
    info!(event_id = %event.id, profile_id = %profile.id, "Participant signed up");

    let capacity = fresh_capacity(&state, &event).await?;
    Ok(Json(ParticipationResponse { success: true, participation, capacity }))
}

pub async fn confirm(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(event_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let profile = require_profile(&state, &auth).await?;
    let event = load_event(&state, &event_id).await?;
    let participations = state.participation_repo.list_by_event(&event.id).await?;
    let existing = state.participation_repo.find_for_participant(&event.id, &profile.id).await?;

    let outcome = rules::confirm_attendance(&event, &participations, &profile.id, existing, Utc::now())?;
    let already_confirmed = matches!(outcome, ConfirmOutcome::AlreadyConfirmed(_));
    let participation = match outcome {
        ConfirmOutcome::AlreadyConfirmed(p) => p,
        ConfirmOutcome::Created(p) => persist(&state, LedgerWrite::Insert(p)).await?,
        ConfirmOutcome::Updated(p) => persist(&state, LedgerWrite::Update(p)).await?,
    };

    info!(event_id = %event.id, profile_id = %profile.id, already_confirmed, "Presence confirmed");

    let capacity = fresh_capacity(&state, &event).await?;
    Ok(Json(ConfirmResponse {
        success: true,
        already_confirmed,
        total_confirmed: capacity.active_participants,
        participation,
        capacity,
    }))
}

pub async fn join_waitlist(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(event_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let profile = require_profile(&state, &auth).await?;
    let event = load_event(&state, &event_id).await?;
    let participations = state.participation_repo.list_by_event(&event.id).await?;
    let existing = state.participation_repo.find_for_participant(&event.id, &profile.id).await?;

    let write = rules::join_waitlist(&event, &participations, &profile.id, existing, Utc::now())?;
    let participation = persist(&state, write).await?;
    info!(event_id = %event.id, profile_id = %profile.id, "Participant joined waitlist");

    let capacity = fresh_capacity(&state, &event).await?;
    Ok(Json(ParticipationResponse { success: true, participation, capacity }))
}

pub async fn leave(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(event_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let profile = require_profile(&state, &auth).await?;
    let event = load_event(&state, &event_id).await?;
    let existing = state.participation_repo.find_for_participant(&event.id, &profile.id).await?;

    let cancelled = rules::leave_event(&event, &profile.id, existing, Utc::now())?;
    let participation = state.participation_repo.update(&cancelled).await?;
    info!(event_id = %event.id, profile_id = %profile.id, "Participant left event");

    let capacity = fresh_capacity(&state, &event).await?;
    Ok(Json(ParticipationResponse { success: true, participation, capacity }))
}

pub async fn rate_host(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(event_id): Path<String>,
    Json(payload): Json<RatingRequest>,
) -> Result<impl IntoResponse, AppError> {
    let profile = require_profile(&state, &auth).await?;
    let event = load_event(&state, &event_id).await?;
    let existing = state.participation_repo.find_for_participant(&event.id, &profile.id).await?
        .ok_or(RuleViolation::NotRegistered)?;

    let rated = rules::rate_host(existing, payload.rating, payload.comment)?;
    let participation = state.participation_repo.update(&rated).await?;
    info!(event_id = %event.id, rating = payload.rating, "Host rated");

    let capacity = fresh_capacity(&state, &event).await?;
    Ok(Json(ParticipationResponse { success: true, participation, capacity }))
}

pub async fn list_participants(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(event_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let profile = require_profile(&state, &auth).await?;
    let event = load_event(&state, &event_id).await?;
    if !event.is_organized_by(&profile.id) {
        return Err(RuleViolation::NotOrganizer.into());
    }

    let participations = state.participation_repo.list_by_event(&event.id).await?;
    let profiles = state.profile_repo.list_summaries_for_event(&event.id).await?;
    let roster = build_roster(&event, &participations, &profiles);
    let capacity = Capacity::new(&event, &participations).summary(Utc::now());

    Ok(Json(RosterResponse { event_id: event.id, roster, capacity }))
}

pub async fn mark_attendance(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path((event_id, participation_id)): Path<(String, String)>,
    Json(payload): Json<AttendanceRequest>,
) -> Result<impl IntoResponse, AppError> {
    let profile = require_profile(&state, &auth).await?;
    let event = load_event(&state, &event_id).await?;
    let participation = state.participation_repo.find_by_id(&event.id, &participation_id).await?
        .ok_or_else(|| AppError::NotFound("Participation not found".into()))?;

    let marked = rules::mark_attendance(&event, &profile.id, participation, payload.attended, Utc::now())?;
    let participation = state.participation_repo.update(&marked).await?;
    info!(event_id = %event.id, participation_id = %participation.id, status = ?participation.status, "Attendance marked");

    let capacity = fresh_capacity(&state, &event).await?;
    Ok(Json(ParticipationResponse { success: true, participation, capacity }))
}

pub async fn my_events(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Query(query): Query<MyEventsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let now = Utc::now();
    finish_elapsed_events(state.event_repo.as_ref(), now).await?;

    let profile = require_profile(&state, &auth).await?;
    let events = state.event_repo.list_for_profile(&profile.id, query.filter).await?;

    let mut views = Vec::with_capacity(events.len());
    for event in events {
        let participations = state.participation_repo.list_by_event(&event.id).await?;
        views.push(event_view(&state, event, &participations, now).await?);
    }
    Ok(Json(views))
}
