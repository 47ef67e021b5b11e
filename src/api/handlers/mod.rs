pub mod auth;
pub mod event;
pub mod health;
pub mod participation;
pub mod profile;

use chrono::{DateTime, Utc};
use crate::api::dtos::responses::EventView;
use crate::api::extractors::auth::AuthUser;
use crate::domain::models::{event::Event, participation::Participation, profile::Profile};
use crate::domain::services::capacity::Capacity;
use crate::error::AppError;
use crate::state::AppState;

/// The caller's profile. Accounts without one cannot act on events.
pub(crate) async fn require_profile(state: &AppState, user: &AuthUser) -> Result<Profile, AppError> {
    state.profile_repo.find_by_user(&user.user_id).await?
        .ok_or_else(|| AppError::NotFound("Profile not found".into()))
}

pub(crate) async fn load_event(state: &AppState, event_id: &str) -> Result<Event, AppError> {
    state.event_repo.find_by_id(event_id).await?
        .ok_or_else(|| AppError::NotFound("Event not found".into()))
}

/// Event with its address and a capacity snapshot over the given ledger.
pub(crate) async fn event_view(
    state: &AppState,
    event: Event,
    participations: &[Participation],
    now: DateTime<Utc>,
) -> Result<EventView, AppError> {
    let address = match event.address_id.as_deref() {
        Some(id) => state.address_repo.find_by_id(id).await?,
        None => None,
    };
    let capacity = Capacity::new(&event, participations).summary(now);
    Ok(EventView { event, address, capacity })
}
