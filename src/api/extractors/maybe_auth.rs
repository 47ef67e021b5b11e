use axum::{
    extract::{FromRequestParts, FromRef},
    http::{request::Parts, StatusCode},
};
use crate::state::AppState;
use crate::api::extractors::auth::{decode_access_token, AuthUser};
use std::sync::Arc;
use tower_cookies::Cookies;
use tracing::{debug, Span};

/// Like [`AuthUser`], but a missing or invalid token makes the caller a guest.
pub struct MaybeAuthUser(pub Option<AuthUser>);

impl<S> FromRequestParts<S> for MaybeAuthUser
where
    S: Send + Sync,
    Arc<AppState>: FromRef<S>,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = <Arc<AppState> as FromRef<S>>::from_ref(state);

        let Some(cookies) = parts.extensions.get::<Cookies>() else {
            return Ok(MaybeAuthUser(None));
        };

        let access_token = match cookies.get("access_token") {
            Some(cookie) => cookie.value().to_string(),
            None => return Ok(MaybeAuthUser(None)),
        };

        let claims = match decode_access_token(&app_state, &access_token) {
            Ok(claims) => claims,
            Err(status) => {
                // Expired or tampered tokens browse as guests
                debug!(%status, "Ignoring unusable access token");
                return Ok(MaybeAuthUser(None));
            }
        };

        Span::current().record("user_id", claims.sub.as_str());

        Ok(MaybeAuthUser(Some(AuthUser { user_id: claims.sub, email: claims.email })))
    }
}
