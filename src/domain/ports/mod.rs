use crate::domain::models::{
    address::Address, auth::RefreshTokenRecord, event::Event,
    participation::Participation, profile::{Profile, ProfileSummary}, user::User,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Inserts the user and its profile in one transaction.
    async fn create_with_profile(&self, user: &User, profile: &Profile) -> Result<(User, Profile), AppError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<User>, AppError>;
}

/// Refresh tokens are single use. A login starts a family and every rotation
/// adds the next generation to it.
#[async_trait]
pub trait AuthRepository: Send + Sync {
    async fn store_refresh_token(&self, record: &RefreshTokenRecord) -> Result<(), AppError>;
    /// Removes and returns the token. Only one caller can take a given token.
    async fn take_refresh_token(&self, token_hash: &str) -> Result<Option<RefreshTokenRecord>, AppError>;
    /// Drops every token of a login session, returning how many were left.
    async fn revoke_family(&self, family_id: Uuid) -> Result<u64, AppError>;
    async fn purge_expired(&self, user_id: &str, now: DateTime<Utc>) -> Result<u64, AppError>;
}

#[async_trait]
pub trait ProfileRepository: Send + Sync {
    async fn find_by_id(&self, id: &str) -> Result<Option<Profile>, AppError>;
    async fn find_by_user(&self, user_id: &str) -> Result<Option<Profile>, AppError>;
    /// Updates the profile, inserting or updating its address in the same transaction.
    async fn update_with_address(&self, profile: &Profile, address: Option<&Address>) -> Result<Profile, AppError>;
    async fn delete(&self, id: &str) -> Result<(), AppError>;
    /// Naming data for the organizer and every participant of an event.
    async fn list_summaries_for_event(&self, event_id: &str) -> Result<Vec<ProfileSummary>, AppError>;
}

#[async_trait]
pub trait AddressRepository: Send + Sync {
    async fn find_by_id(&self, id: &str) -> Result<Option<Address>, AppError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MyEventsFilter {
    #[default]
    All,
    Created,
    Enrolled,
    Completed,
}

#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Inserts the event and, when given, its address in one transaction.
    async fn create_with_address(&self, event: &Event, address: Option<&Address>) -> Result<Event, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Event>, AppError>;
    async fn list(&self) -> Result<Vec<Event>, AppError>;
    async fn list_for_profile(&self, profile_id: &str, filter: MyEventsFilter) -> Result<Vec<Event>, AppError>;
    /// Updates the event, inserting or updating the given address in the same transaction.
    async fn update(&self, event: &Event, address: Option<&Address>) -> Result<Event, AppError>;
    /// Flips every ACTIVE event that ended before `now` to FINISHED; returns the number of rows touched.
    async fn finish_elapsed(&self, now: DateTime<Utc>) -> Result<u64, AppError>;
}

#[async_trait]
pub trait ParticipationRepository: Send + Sync {
    async fn create(&self, participation: &Participation) -> Result<Participation, AppError>;
    async fn find_by_id(&self, event_id: &str, id: &str) -> Result<Option<Participation>, AppError>;
    async fn find_for_participant(&self, event_id: &str, participant_id: &str) -> Result<Option<Participation>, AppError>;
    async fn list_by_event(&self, event_id: &str) -> Result<Vec<Participation>, AppError>;
    async fn update(&self, participation: &Participation) -> Result<Participation, AppError>;
}
