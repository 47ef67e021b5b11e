use std::collections::HashMap;
use serde::Serialize;
use crate::domain::models::event::Event;
use crate::domain::models::participation::{Participation, ParticipationStatus};
use crate::domain::models::profile::ProfileSummary;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RosterEntry {
    /// `None` when the participant's profile was removed.
    pub profile_id: Option<String>,
    pub display_name: String,
    pub status: ParticipationStatus,
    pub is_organizer: bool,
    pub participation_id: Option<String>,
}

const REMOVED_USER: &str = "[Removed user]";

/// Everyone attached to the event: the organizer first (always CONFIRMED,
/// whether or not a row exists for them), then each participation by signup time.
pub fn build_roster(event: &Event, participations: &[Participation], profiles: &[ProfileSummary]) -> Vec<RosterEntry> {
    let by_id: HashMap<&str, &ProfileSummary> = profiles.iter().map(|p| (p.id.as_str(), p)).collect();
    let name_of = |id: &str| by_id.get(id).map(|p| p.display_name()).unwrap_or_else(|| format!("Profile #{}", id));

    let mut roster = Vec::with_capacity(participations.len() + 1);

    if let Some(organizer) = event.organizer_id.as_deref() {
        roster.push(RosterEntry {
            profile_id: Some(organizer.to_string()),
            display_name: name_of(organizer),
            status: ParticipationStatus::Confirmed,
            is_organizer: true,
            participation_id: None,
        });
    }

    let mut rows: Vec<&Participation> = participations
        .iter()
        .filter(|p| p.event_id == event.id)
        .filter(|p| p.participant_id.is_none() || p.participant_id != event.organizer_id)
        .collect();
    rows.sort_by_key(|p| p.signed_up_at);

    roster.extend(rows.into_iter().map(|p| RosterEntry {
        profile_id: p.participant_id.clone(),
        display_name: p.participant_id.as_deref().map(&name_of).unwrap_or_else(|| REMOVED_USER.to_string()),
        status: p.status,
        is_organizer: false,
        participation_id: Some(p.id.clone()),
    }));

    roster
}
