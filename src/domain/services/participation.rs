//! Participation rules: every action takes the current ledger and returns the
//! row to persist, or the rule it broke. Persistence is the caller's job.

use chrono::{DateTime, Utc};
use thiserror::Error;
use crate::domain::models::event::{Event, EventStatus};
use crate::domain::models::participation::{Participation, ParticipationStatus};
use crate::domain::services::capacity::Capacity;
use crate::error::AppError;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuleViolation {
    #[error("The organizer is automatically confirmed")]
    OrganizerAutoConfirmed,
    #[error("The organizer cannot leave their own event")]
    OrganizerCannotLeave,
    #[error("Only the organizer can do this")]
    NotOrganizer,
    #[error("Event is cancelled")]
    EventCancelled,
    #[error("Event has already finished")]
    EventFinished,
    #[error("Event is full")]
    EventFull,
    #[error("Event still has vacancies")]
    EventNotFull,
    #[error("Event is already cancelled")]
    EventAlreadyCancelled,
    #[error("You are already registered for this event")]
    AlreadyRegistered,
    #[error("Participation is already cancelled")]
    AlreadyCancelled,
    #[error("You are not registered for this event")]
    NotRegistered,
    #[error("Cannot change participation from {from:?} to {to:?}")]
    InvalidTransition { from: ParticipationStatus, to: ParticipationStatus },
    #[error("Only participants marked as present can rate the host")]
    RatingRequiresAttendance,
    #[error("Rating must be between 1 and 5")]
    RatingOutOfRange,
}

impl From<RuleViolation> for AppError {
    fn from(violation: RuleViolation) -> Self {
        let message = violation.to_string();
        match violation {
            RuleViolation::NotOrganizer
            | RuleViolation::OrganizerAutoConfirmed
            | RuleViolation::OrganizerCannotLeave => AppError::Forbidden(message),
            RuleViolation::NotRegistered => AppError::NotFound(message),
            RuleViolation::AlreadyRegistered => AppError::Conflict(message),
            _ => AppError::Validation(message),
        }
    }
}

#[derive(Debug, Clone)]
pub enum ConfirmOutcome {
    /// The participation was already CONFIRMED; nothing to write.
    AlreadyConfirmed(Participation),
    /// A brand-new row to insert.
    Created(Participation),
    /// An existing row moved to CONFIRMED.
    Updated(Participation),
}

impl ConfirmOutcome {
    pub fn participation(&self) -> &Participation {
        match self {
            ConfirmOutcome::AlreadyConfirmed(p) | ConfirmOutcome::Created(p) | ConfirmOutcome::Updated(p) => p,
        }
    }
}

/// A row that must be inserted or updated, or an existing row left as is.
#[derive(Debug, Clone)]
pub enum LedgerWrite {
    Insert(Participation),
    Update(Participation),
    Unchanged(Participation),
}

fn ensure_open(event: &Event) -> Result<(), RuleViolation> {
    match event.status {
        EventStatus::Active => Ok(()),
        EventStatus::Cancelled => Err(RuleViolation::EventCancelled),
        EventStatus::Finished => Err(RuleViolation::EventFinished),
    }
}

fn ensure_organizer(event: &Event, actor: &str) -> Result<(), RuleViolation> {
    if event.is_organized_by(actor) { Ok(()) } else { Err(RuleViolation::NotOrganizer) }
}

fn transition(mut participation: Participation, to: ParticipationStatus, now: DateTime<Utc>) -> Result<Participation, RuleViolation> {
    if !participation.status.can_transition_to(to) {
        return Err(RuleViolation::InvalidTransition { from: participation.status, to });
    }
    participation.status = to;
    participation.cancelled_at = if to == ParticipationStatus::Cancelled { Some(now) } else { None };
    Ok(participation)
}

/// Waitlisted rows wait on each other, not on the seat being claimed.
fn promotion_seat_available(event: &Event, participations: &[Participation]) -> bool {
    if !event.accepts_participants {
        return false;
    }
    match event.max_participants {
        Some(max) => {
            i64::from(Capacity::new(event, participations).active_count_excluding_waitlisted()) < i64::from(max)
        }
        None => true,
    }
}

pub fn sign_up(
    event: &Event,
    participations: &[Participation],
    actor: &str,
    existing: Option<Participation>,
    now: DateTime<Utc>,
) -> Result<LedgerWrite, RuleViolation> {
    if event.is_organized_by(actor) {
        return Err(RuleViolation::OrganizerAutoConfirmed);
    }
    ensure_open(event)?;
    match existing {
        Some(p) if p.status != ParticipationStatus::Cancelled => Err(RuleViolation::AlreadyRegistered),
        existing => {
            if Capacity::new(event, participations).is_full() {
                return Err(RuleViolation::EventFull);
            }
            Ok(match existing {
                Some(mut p) => {
                    p.status = ParticipationStatus::SignedUp;
                    p.cancelled_at = None;
                    p.signed_up_at = now;
                    LedgerWrite::Update(p)
                }
                None => LedgerWrite::Insert(Participation::new(event.id.clone(), actor.to_string(), ParticipationStatus::SignedUp)),
            })
        }
    }
}

pub fn confirm_attendance(
    event: &Event,
    participations: &[Participation],
    actor: &str,
    existing: Option<Participation>,
    now: DateTime<Utc>,
) -> Result<ConfirmOutcome, RuleViolation> {
    if event.is_organized_by(actor) {
        return Err(RuleViolation::OrganizerAutoConfirmed);
    }
    ensure_open(event)?;

    match existing {
        None => {
            if Capacity::new(event, participations).is_full() {
                return Err(RuleViolation::EventFull);
            }
            Ok(ConfirmOutcome::Created(Participation::new(
                event.id.clone(),
                actor.to_string(),
                ParticipationStatus::Confirmed,
            )))
        }
        Some(p) if p.status == ParticipationStatus::Confirmed => Ok(ConfirmOutcome::AlreadyConfirmed(p)),
        Some(p) => {
            let seat_free = match p.status {
                ParticipationStatus::Waitlisted => promotion_seat_available(event, participations),
                _ if p.is_active() => true,
                _ => !Capacity::new(event, participations).is_full(),
            };
            if !seat_free {
                return Err(RuleViolation::EventFull);
            }
            transition(p, ParticipationStatus::Confirmed, now).map(ConfirmOutcome::Updated)
        }
    }
}

pub fn join_waitlist(
    event: &Event,
    participations: &[Participation],
    actor: &str,
    existing: Option<Participation>,
    now: DateTime<Utc>,
) -> Result<LedgerWrite, RuleViolation> {
    if event.is_organized_by(actor) {
        return Err(RuleViolation::OrganizerAutoConfirmed);
    }
    ensure_open(event)?;
    if let Some(p) = existing.as_ref()
        && p.status == ParticipationStatus::Waitlisted
    {
        return Ok(LedgerWrite::Unchanged(p.clone()));
    }
    if !Capacity::new(event, participations).is_full() {
        return Err(RuleViolation::EventNotFull);
    }
    match existing {
        None => Ok(LedgerWrite::Insert(Participation::new(
            event.id.clone(),
            actor.to_string(),
            ParticipationStatus::Waitlisted,
        ))),
        Some(p) if p.status == ParticipationStatus::Cancelled => {
            let mut p = p;
            p.status = ParticipationStatus::Waitlisted;
            p.cancelled_at = None;
            p.signed_up_at = now;
            Ok(LedgerWrite::Update(p))
        }
        Some(p) => transition(p, ParticipationStatus::Waitlisted, now).map(LedgerWrite::Update),
    }
}

pub fn leave_event(
    event: &Event,
    actor: &str,
    existing: Option<Participation>,
    now: DateTime<Utc>,
) -> Result<Participation, RuleViolation> {
    if event.is_organized_by(actor) {
        return Err(RuleViolation::OrganizerCannotLeave);
    }
    ensure_open(event)?;
    let participation = existing.ok_or(RuleViolation::NotRegistered)?;
    if participation.status == ParticipationStatus::Cancelled {
        return Err(RuleViolation::AlreadyCancelled);
    }
    transition(participation, ParticipationStatus::Cancelled, now)
}

/// Cancels the event itself: organizer only, and only while ACTIVE.
pub fn cancel_event(event: &Event, actor: &str, now: DateTime<Utc>) -> Result<Event, RuleViolation> {
    ensure_organizer(event, actor)?;
    match event.status {
        EventStatus::Cancelled => Err(RuleViolation::EventAlreadyCancelled),
        EventStatus::Finished => Err(RuleViolation::EventFinished),
        EventStatus::Active => {
            let mut cancelled = event.clone();
            cancelled.status = EventStatus::Cancelled;
            cancelled.accepts_participants = false;
            cancelled.updated_at = now;
            Ok(cancelled)
        }
    }
}

pub fn mark_attendance(
    event: &Event,
    actor: &str,
    participation: Participation,
    attended: bool,
    now: DateTime<Utc>,
) -> Result<Participation, RuleViolation> {
    ensure_organizer(event, actor)?;
    if event.status == EventStatus::Cancelled {
        return Err(RuleViolation::EventCancelled);
    }
    let to = if attended { ParticipationStatus::Attended } else { ParticipationStatus::Absent };
    if participation.status == to {
        return Ok(participation);
    }
    transition(participation, to, now)
}

pub fn rate_host(
    mut participation: Participation,
    rating: i32,
    comment: Option<String>,
) -> Result<Participation, RuleViolation> {
    if !(1..=5).contains(&rating) {
        return Err(RuleViolation::RatingOutOfRange);
    }
    if participation.status != ParticipationStatus::Attended {
        return Err(RuleViolation::RatingRequiresAttendance);
    }
    participation.host_rating = Some(rating);
    participation.host_comment = comment.map(|c| c.trim().to_string()).filter(|c| !c.is_empty());
    Ok(participation)
}
