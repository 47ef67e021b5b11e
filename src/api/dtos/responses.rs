use crate::domain::models::{
    address::Address, event::Event,
    participation::{Participation, ParticipationStatus},
    profile::Profile,
};
use crate::domain::services::{capacity::CapacitySummary, roster::RosterEntry};
use serde::Serialize;

#[derive(Serialize)]
pub struct EventView {
    #[serde(flatten)]
    pub event: Event,
    pub address: Option<Address>,
    pub capacity: CapacitySummary,
}

#[derive(Serialize)]
pub struct EventDetailResponse {
    #[serde(flatten)]
    pub view: EventView,
    pub roster: Vec<RosterEntry>,
    pub is_organizer: bool,
    /// The caller's own status; `None` for guests and non-participants.
    pub my_status: Option<ParticipationStatus>,
}

#[derive(Serialize)]
pub struct ParticipationResponse {
    pub success: bool,
    pub participation: Participation,
    pub capacity: CapacitySummary,
}

#[derive(Serialize)]
pub struct ConfirmResponse {
    pub success: bool,
    pub already_confirmed: bool,
    pub total_confirmed: u32,
    pub participation: Participation,
    pub capacity: CapacitySummary,
}

#[derive(Serialize)]
pub struct CancelEventResponse {
    pub success: bool,
    pub event: Event,
}

#[derive(Serialize)]
pub struct ProfileResponse {
    pub profile: Profile,
    pub age: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub address: Option<Address>,
}

#[derive(Serialize)]
pub struct RosterResponse {
    pub event_id: String,
    pub roster: Vec<RosterEntry>,
    pub capacity: CapacitySummary,
}
