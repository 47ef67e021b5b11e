use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "participation_status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ParticipationStatus {
    SignedUp,
    Confirmed,
    Waitlisted,
    Cancelled,
    Attended,
    Absent,
}

impl ParticipationStatus {
    /// Whether the participant occupies a seat for capacity and quorum purposes.
    pub fn is_active(self) -> bool {
        !matches!(self, ParticipationStatus::Cancelled | ParticipationStatus::Absent)
    }

    pub fn can_transition_to(self, next: ParticipationStatus) -> bool {
        use ParticipationStatus::*;
        match (self, next) {
            (SignedUp, Confirmed | Waitlisted | Cancelled) => true,
            (Confirmed, Attended | Absent | Cancelled) => true,
            (Waitlisted, Confirmed | Cancelled) => true,
            (Cancelled, Confirmed) => true,
            (Attended, Absent | Cancelled) => true,
            (Absent, Confirmed | Attended | Cancelled) => true,
            _ => false,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Participation {
    pub id: String,
    pub event_id: String,
    pub participant_id: Option<String>,
    pub status: ParticipationStatus,
    pub signed_up_at: DateTime<Utc>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub host_rating: Option<i32>,
    pub host_comment: Option<String>,
}

impl Participation {
    pub fn new(event_id: String, participant_id: String, status: ParticipationStatus) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            event_id,
            participant_id: Some(participant_id),
            status,
            signed_up_at: Utc::now(),
            cancelled_at: None,
            host_rating: None,
            host_comment: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.participant_id.is_some() && self.status.is_active()
    }
}
