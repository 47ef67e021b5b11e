use axum::{extract::{Path, State}, http::StatusCode, response::IntoResponse, Json};
use chrono::Utc;
use std::sync::Arc;
use tracing::info;

use crate::api::dtos::{
    requests::{CreateEventRequest, UpdateEventRequest},
    responses::{CancelEventResponse, EventDetailResponse},
};
use crate::api::extractors::{auth::AuthUser, maybe_auth::MaybeAuthUser};
use crate::api::handlers::{event_view, load_event, require_profile};
use crate::domain::models::{
    address::Address,
    event::{Event, NewEventParams},
    participation::ParticipationStatus,
};
use crate::domain::services::{lifecycle::finish_elapsed_events, participation, roster::build_roster};
use crate::error::AppError;
use crate::state::AppState;

pub async fn list_events(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let now = Utc::now();
    finish_elapsed_events(state.event_repo.as_ref(), now).await?;

    let events = state.event_repo.list().await?;
    let mut views = Vec::with_capacity(events.len());
    for event in events {
        let participations = state.participation_repo.list_by_event(&event.id).await?;
        views.push(event_view(&state, event, &participations, now).await?);
    }
    Ok(Json(views))
}

pub async fn create_event(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Json(payload): Json<CreateEventRequest>,
) -> Result<impl IntoResponse, AppError> {
    let organizer = require_profile(&state, &auth).await?;
    let now = Utc::now();

    let address = payload.address.map(Address::from_input).transpose()?;

    let event = Event::new(NewEventParams {
        name: payload.name.trim().to_string(),
        organizer_id: organizer.id.clone(),
        address_id: address.as_ref().map(|a| a.id.clone()),
        meeting_location: payload.meeting_location,
        description: payload.description,
        rules: payload.rules,
        start_time: payload.start_time,
        end_time: payload.end_time,
        meeting_time: payload.meeting_time,
        whatsapp_group: payload.whatsapp_group,
        photo_url: payload.photo_url,
        category: payload.category,
        min_participants: payload.min_participants,
        max_participants: payload.max_participants,
    });
    event.validate_new(now)?;

    let created = state.event_repo.create_with_address(&event, address.as_ref()).await?;
    info!(event_id = %created.id, organizer_id = %organizer.id, "Event created");

    let view = event_view(&state, created, &[], now).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

pub async fn get_event(
    State(state): State<Arc<AppState>>,
    MaybeAuthUser(auth): MaybeAuthUser,
    Path(event_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let now = Utc::now();
    let event = load_event(&state, &event_id).await?;
    let participations = state.participation_repo.list_by_event(&event.id).await?;
    let profiles = state.profile_repo.list_summaries_for_event(&event.id).await?;
    let roster = build_roster(&event, &participations, &profiles);

    let caller = match &auth {
        Some(user) => state.profile_repo.find_by_user(&user.user_id).await?,
        None => None,
    };
    let is_organizer = caller.as_ref().is_some_and(|p| event.is_organized_by(&p.id));
    let my_status = match &caller {
        Some(_) if is_organizer => Some(ParticipationStatus::Confirmed),
        Some(profile) => participations
            .iter()
            .find(|p| p.participant_id.as_deref() == Some(profile.id.as_str()))
            .map(|p| p.status),
        None => None,
    };

    let view = event_view(&state, event, &participations, now).await?;
    Ok(Json(EventDetailResponse { view, roster, is_organizer, my_status }))
}

pub async fn update_event(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(event_id): Path<String>,
    Json(payload): Json<UpdateEventRequest>,
) -> Result<impl IntoResponse, AppError> {
    let profile = require_profile(&state, &auth).await?;
    let mut event = load_event(&state, &event_id).await?;

    if !event.is_organized_by(&profile.id) {
        return Err(AppError::Forbidden("Only the organizer can edit this event".into()));
    }
    if !event.is_open() {
        return Err(AppError::Validation("Only active events can be edited".into()));
    }

    if let Some(val) = payload.name { event.name = val.trim().to_string(); }
    if let Some(val) = payload.meeting_location { event.meeting_location = Some(val); }
    if let Some(val) = payload.description { event.description = Some(val); }
    if let Some(val) = payload.rules { event.rules = Some(val); }
    if let Some(val) = payload.start_time { event.start_time = val; }
    if let Some(val) = payload.end_time { event.end_time = val; }
    if let Some(val) = payload.meeting_time { event.meeting_time = Some(val); }
    if let Some(val) = payload.whatsapp_group { event.whatsapp_group = Some(val); }
    if let Some(val) = payload.photo_url { event.photo_url = Some(val); }
    if let Some(val) = payload.category { event.category = Some(val); }
    if let Some(val) = payload.min_participants { event.min_participants = val; }
    if let Some(val) = payload.max_participants { event.max_participants = val; }
    if let Some(val) = payload.accepts_participants { event.accepts_participants = val; }

    let address = match payload.address {
        None => None,
        Some(input) => {
            let existing = match event.address_id.as_deref() {
                Some(id) => state.address_repo.find_by_id(id).await?,
                None => None,
            };
            let address = match existing {
                Some(mut address) => {
                    address.apply(input)?;
                    address
                }
                None => Address::from_input(input)?,
            };
            event.address_id = Some(address.id.clone());
            Some(address)
        }
    };

    let now = Utc::now();
    event.updated_at = now;
    event.validate()?;

    let updated = state.event_repo.update(&event, address.as_ref()).await?;
    info!(event_id = %updated.id, "Event updated");

    let participations = state.participation_repo.list_by_event(&updated.id).await?;
    Ok(Json(event_view(&state, updated, &participations, now).await?))
}

pub async fn cancel_event(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(event_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let profile = require_profile(&state, &auth).await?;
    let event = load_event(&state, &event_id).await?;

    let cancelled = participation::cancel_event(&event, &profile.id, Utc::now())?;
    let saved = state.event_repo.update(&cancelled, None).await?;

    info!(event_id = %saved.id, "Event cancelled by organizer");
    Ok(Json(CancelEventResponse { success: true, event: saved }))
}
