use axum::{extract::State, response::IntoResponse, Json, http::StatusCode};
use crate::state::AppState;
use crate::error::AppError;
use crate::api::dtos::requests::{LoginRequest, RegisterRequest};
use crate::domain::models::auth::{AccountSummary, AuthResponse};
use crate::domain::models::profile::{validate_birth_date, Profile};
use crate::domain::models::user::{normalize_email, User};
use crate::domain::services::auth_service::{AuthService, TokenPair};
use std::sync::Arc;
use tower_cookies::{Cookies, Cookie};
use tower_cookies::cookie::SameSite;
use time::Duration;
use chrono::Utc;
use tracing::info;

const MIN_PASSWORD_LEN: usize = 8;

pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    let email = normalize_email(&payload.email);
    if email.is_empty() || !email.contains('@') {
        return Err(AppError::Validation("A valid email is required".into()));
    }

    let first_name = payload.first_name.trim().to_string();
    let last_name = payload.last_name.trim().to_string();
    if first_name.is_empty() || last_name.is_empty() {
        return Err(AppError::Validation("First and last name are required".into()));
    }

    if payload.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::Validation(format!("Password must be at least {} characters", MIN_PASSWORD_LEN)));
    }
    if payload.password != payload.password_confirmation {
        return Err(AppError::Validation("Passwords do not match".into()));
    }

    validate_birth_date(payload.birth_date, Utc::now().date_naive(), state.config.minimum_age)?;

    if state.user_repo.find_by_email(&email).await?.is_some() {
        return Err(AppError::Conflict("This email is already registered".into()));
    }

    let password_hash = AuthService::hash_password(&payload.password)?;
    let user = User::new(&email, first_name, last_name, password_hash);
    let profile = Profile::new(user.id.clone(), payload.birth_date, payload.gender);

    let (user, profile) = state.user_repo.create_with_profile(&user, &profile).await
        .map_err(|e| if e.is_unique_violation() {
            AppError::Conflict("This email is already registered".into())
        } else {
            e
        })?;

    info!(user_id = %user.id, profile_id = %profile.id, "User registered");

    Ok((StatusCode::CREATED, Json(AccountSummary {
        id: user.id.clone(),
        email: user.email.clone(),
        full_name: user.full_name(),
        profile_id: Some(profile.id),
    })))
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user = state.user_repo.find_by_email(&normalize_email(&payload.email)).await?
        .ok_or(AppError::Unauthorized)?;

    AuthService::verify_password(&payload.password, &user.password_hash)?;

    let tokens = state.auth_service.login(&user).await?;
    set_cookies(&cookies, &tokens, state.config.secure_cookies);

    info!("User logged in: {}", user.id);

    auth_response(&state, &user, tokens.csrf_token).await
}

pub async fn refresh(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
) -> Result<impl IntoResponse, AppError> {
    let refresh_cookie = cookies.get("refresh_token").ok_or(AppError::Unauthorized)?;
    let raw_token = refresh_cookie.value().to_string();

    let redeemed = state.auth_service.redeem_refresh_token(&raw_token).await?;
    let user = state.user_repo.find_by_id(&redeemed.user_id).await?
        .ok_or(AppError::Unauthorized)?;

    let tokens = state.auth_service.rotate(&redeemed, &user).await?;
    set_cookies(&cookies, &tokens, state.config.secure_cookies);

    info!("Token refreshed for user: {}", user.id);

    auth_response(&state, &user, tokens.csrf_token).await
}

pub async fn logout(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
) -> Result<impl IntoResponse, AppError> {
    if let Some(cookie) = cookies.get("refresh_token") {
        state.auth_service.logout(cookie.value()).await?;
    }

    cookies.remove(Cookie::build(("access_token", "")).path("/").into());
    cookies.remove(Cookie::build(("refresh_token", "")).path("/").into());

    info!("User logged out");

    Ok(StatusCode::OK)
}

async fn auth_response(state: &AppState, user: &User, csrf_token: String) -> Result<Json<AuthResponse>, AppError> {
    let profile = state.profile_repo.find_by_user(&user.id).await?;
    Ok(Json(AuthResponse {
        csrf_token,
        user: AccountSummary {
            id: user.id.clone(),
            email: user.email.clone(),
            full_name: user.full_name(),
            profile_id: profile.map(|p| p.id),
        },
    }))
}

fn set_cookies(cookies: &Cookies, tokens: &TokenPair, secure: bool) {
    let mut access_c = Cookie::new("access_token", tokens.access_token.clone());
    access_c.set_http_only(true);
    access_c.set_secure(secure);
    access_c.set_same_site(SameSite::Strict);
    access_c.set_path("/");
    access_c.set_max_age(Duration::minutes(15));
    cookies.add(access_c);

    let mut refresh_c = Cookie::new("refresh_token", tokens.refresh_token.clone());
    refresh_c.set_http_only(true);
    refresh_c.set_secure(secure);
    refresh_c.set_same_site(SameSite::Strict);
    refresh_c.set_path("/");
    refresh_c.set_max_age(Duration::days(7));
    cookies.add(refresh_c);
}
