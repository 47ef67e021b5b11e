use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::Utc;
use std::sync::Arc;
use tracing::info;

use crate::api::dtos::{requests::UpdateProfileRequest, responses::ProfileResponse};
use crate::api::extractors::auth::AuthUser;
use crate::api::handlers::require_profile;
use crate::domain::models::{address::Address, profile::{validate_birth_date, Profile}, user::User};
use crate::error::AppError;
use crate::state::AppState;

async fn profile_response(state: &AppState, user: User, profile: Profile) -> Result<ProfileResponse, AppError> {
    let address = match profile.address_id.as_deref() {
        Some(id) => state.address_repo.find_by_id(id).await?,
        None => None,
    };
    Ok(ProfileResponse {
        age: profile.age(Utc::now().date_naive()),
        profile,
        first_name: user.first_name,
        last_name: user.last_name,
        email: user.email,
        address,
    })
}

async fn require_user(state: &AppState, auth: &AuthUser) -> Result<User, AppError> {
    state.user_repo.find_by_id(&auth.user_id).await?
        .ok_or(AppError::Unauthorized)
}

pub async fn get_my_profile(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let user = require_user(&state, &auth).await?;
    let profile = require_profile(&state, &auth).await?;
    Ok(Json(profile_response(&state, user, profile).await?))
}

pub async fn update_my_profile(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user = require_user(&state, &auth).await?;
    let mut profile = require_profile(&state, &auth).await?;

    if let Some(val) = payload.social_name { profile.social_name = Some(val.trim().to_string()).filter(|s| !s.is_empty()); }
    if let Some(val) = payload.birth_date {
        validate_birth_date(val, Utc::now().date_naive(), state.config.minimum_age)?;
        profile.birth_date = val;
    }
    if let Some(val) = payload.description { profile.description = Some(val); }
    if let Some(val) = payload.gender { profile.gender = Some(val); }
    if let Some(val) = payload.is_pcd { profile.is_pcd = val; }
    if let Some(val) = payload.neurodivergent { profile.neurodivergent = val; }
    if let Some(val) = payload.image_url { profile.image_url = Some(val); }

    let address = match payload.address {
        None => None,
        Some(input) => {
            let existing = match profile.address_id.as_deref() {
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
            profile.address_id = Some(address.id.clone());
            Some(address)
        }
    };

    let updated = state.profile_repo.update_with_address(&profile, address.as_ref()).await?;
    info!(profile_id = %updated.id, "Profile updated");

    Ok(Json(profile_response(&state, user, updated).await?))
}

/// Participations and organized events survive with a null profile reference.
pub async fn delete_my_profile(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let profile = require_profile(&state, &auth).await?;
    state.profile_repo.delete(&profile.id).await?;

    info!(profile_id = %profile.id, user_id = %auth.user_id, "Profile deleted");
    Ok(StatusCode::NO_CONTENT)
}
