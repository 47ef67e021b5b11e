use crate::domain::models::{address::AddressInput, event::EventCategory, profile::Gender};
use crate::domain::ports::MyEventsFilter;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
    pub password_confirmation: String,
    pub birth_date: NaiveDate,
    pub gender: Option<Gender>,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Absent fields are left untouched.
#[derive(Deserialize, Default)]
pub struct UpdateProfileRequest {
    pub social_name: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub description: Option<String>,
    pub gender: Option<Gender>,
    pub is_pcd: Option<bool>,
    pub neurodivergent: Option<bool>,
    pub image_url: Option<String>,
    pub address: Option<AddressInput>,
}

#[derive(Deserialize)]
pub struct CreateEventRequest {
    pub name: String,
    pub address: Option<AddressInput>,
    pub meeting_location: Option<String>,
    pub description: Option<String>,
    pub rules: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub meeting_time: Option<DateTime<Utc>>,
    pub whatsapp_group: Option<String>,
    pub photo_url: Option<String>,
    pub category: Option<EventCategory>,
    pub min_participants: Option<i32>,
    pub max_participants: Option<i32>,
}

#[derive(Deserialize, Default)]
pub struct UpdateEventRequest {
    pub name: Option<String>,
    pub address: Option<AddressInput>,
    pub meeting_location: Option<String>,
    pub description: Option<String>,
    pub rules: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub meeting_time: Option<DateTime<Utc>>,
    pub whatsapp_group: Option<String>,
    pub photo_url: Option<String>,
    pub category: Option<EventCategory>,
    /// Absent leaves the limit alone, `null` removes it.
    #[serde(default, deserialize_with = "double_option")]
    pub min_participants: Option<Option<i32>>,
    #[serde(default, deserialize_with = "double_option")]
    pub max_participants: Option<Option<i32>>,
    pub accepts_participants: Option<bool>,
}

/// Tells a present `null` apart from a missing field.
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Deserialize)]
pub struct AttendanceRequest {
    pub attended: bool,
}

#[derive(Deserialize)]
pub struct RatingRequest {
    pub rating: i32,
    pub comment: Option<String>,
}

#[derive(Deserialize, Default)]
pub struct MyEventsQuery {
    #[serde(default)]
    pub filter: MyEventsFilter,
}
