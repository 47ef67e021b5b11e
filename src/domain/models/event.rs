use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use crate::error::AppError;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "event_status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventStatus {
    Active,
    Cancelled,
    Finished,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "event_category", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventCategory {
    Esporte,
    Lazer,
    Cultura,
    Tecnologia,
    Educacao,
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Event {
    pub id: String,
    pub name: String,
    pub organizer_id: Option<String>,
    pub address_id: Option<String>,
    pub meeting_location: Option<String>,
    pub description: Option<String>,
    pub rules: Option<String>,
    pub status: EventStatus,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub meeting_time: Option<DateTime<Utc>>,
    pub whatsapp_group: Option<String>,
    pub photo_url: Option<String>,
    pub category: Option<EventCategory>,
    pub min_participants: Option<i32>,
    pub max_participants: Option<i32>,
    pub accepts_participants: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub struct NewEventParams {
    pub name: String,
    pub organizer_id: String,
    pub address_id: Option<String>,
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

impl Event {
    pub fn new(params: NewEventParams) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            name: params.name,
            organizer_id: Some(params.organizer_id),
            address_id: params.address_id,
            meeting_location: params.meeting_location,
            description: params.description,
            rules: params.rules,
            status: EventStatus::Active,
            start_time: params.start_time,
            end_time: params.end_time,
            meeting_time: params.meeting_time,
            whatsapp_group: params.whatsapp_group,
            photo_url: params.photo_url,
            category: params.category,
            min_participants: params.min_participants,
            max_participants: params.max_participants,
            accepts_participants: true,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_organized_by(&self, profile_id: &str) -> bool {
        self.organizer_id.as_deref() == Some(profile_id)
    }

    pub fn is_open(&self) -> bool {
        self.status == EventStatus::Active
    }

    /// Field-level rules shared by creation and editing.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.name.trim().is_empty() {
            return Err(AppError::Validation("Event name is required".into()));
        }
        if self.end_time <= self.start_time {
            return Err(AppError::Validation("End date must be after start date".into()));
        }
        if let Some(meeting) = self.meeting_time
            && meeting > self.start_time {
            return Err(AppError::Validation("Meeting time cannot be after the event start".into()));
        }
        if self.min_participants.is_some_and(|min| min < 1) {
            return Err(AppError::Validation("Minimum participants must be at least 1".into()));
        }
        if self.max_participants.is_some_and(|max| max < 1) {
            return Err(AppError::Validation("Maximum participants must be at least 1".into()));
        }
        if let (Some(min), Some(max)) = (self.min_participants, self.max_participants)
            && min > max {
            return Err(AppError::Validation("Minimum participants cannot exceed maximum participants".into()));
        }
        let has_location = self.meeting_location.as_deref().is_some_and(|l| !l.trim().is_empty());
        if self.address_id.is_none() && !has_location {
            return Err(AppError::Validation("Event needs an address or a meeting location".into()));
        }
        Ok(())
    }

    pub fn validate_new(&self, now: DateTime<Utc>) -> Result<(), AppError> {
        self.validate()?;
        if self.start_time < now {
            return Err(AppError::Validation("Active events cannot start in the past".into()));
        }
        Ok(())
    }
}
