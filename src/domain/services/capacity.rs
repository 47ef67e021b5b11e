use std::collections::HashSet;
use chrono::{DateTime, Utc};
use serde::Serialize;
use crate::domain::models::event::Event;
use crate::domain::models::participation::{Participation, ParticipationStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "missing", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuorumStatus {
    NoMinimum,
    Reached,
    Waiting(u32),
}

/// Read-only view over an event and its participation rows.
///
/// Nothing is cached: every method recounts from the borrowed rows, so a
/// `Capacity` built over fresh rows always reflects the ledger.
#[derive(Debug, Clone, Copy)]
pub struct Capacity<'a> {
    event: &'a Event,
    participations: &'a [Participation],
}

impl<'a> Capacity<'a> {
    pub fn new(event: &'a Event, participations: &'a [Participation]) -> Self {
        Self { event, participations }
    }

    /// Distinct active participants, the organizer included even without a row.
    pub fn active_count(&self) -> u32 {
        self.active_ids().len() as u32
    }

    /// Seats held by everyone except waitlisted rows. Promotion from the
    /// waitlist compares this against the maximum.
    pub fn active_count_excluding_waitlisted(&self) -> u32 {
        self.ids_where(|p| p.status != ParticipationStatus::Waitlisted).len() as u32
    }

    fn active_ids(&self) -> HashSet<&'a str> {
        self.ids_where(|_| true)
    }

    fn ids_where(&self, keep: impl Fn(&Participation) -> bool) -> HashSet<&'a str> {
        let mut ids: HashSet<&'a str> = self.participations
            .iter()
            .filter(|p| p.event_id == self.event.id && p.is_active() && keep(p))
            .filter_map(|p| p.participant_id.as_deref())
            .collect();
        if let Some(organizer) = self.event.organizer_id.as_deref() {
            ids.insert(organizer);
        }
        ids
    }

    /// `None` means unlimited.
    pub fn vacancies(&self) -> Option<u32> {
        if !self.event.accepts_participants {
            return Some(0);
        }
        let max = self.event.max_participants?;
        Some((max.max(0) as u32).saturating_sub(self.active_count()))
    }

    pub fn is_full(&self) -> bool {
        if !self.event.accepts_participants {
            return true;
        }
        match self.event.max_participants {
            Some(max) => i64::from(self.active_count()) >= i64::from(max),
            None => false,
        }
    }

    pub fn quorum_met(&self) -> Option<bool> {
        self.event.min_participants
            .map(|min| i64::from(self.active_count()) >= i64::from(min))
    }

    pub fn quorum_status(&self) -> QuorumStatus {
        match self.event.min_participants {
            None => QuorumStatus::NoMinimum,
            Some(min) => {
                let active = i64::from(self.active_count());
                if active >= i64::from(min) {
                    QuorumStatus::Reached
                } else {
                    QuorumStatus::Waiting((i64::from(min) - active) as u32)
                }
            }
        }
    }

    pub fn quorum_progress_pct(&self) -> u32 {
        match self.event.min_participants {
            Some(min) if self.quorum_met() == Some(false) => {
                (u64::from(self.active_count()) * 100 / min as u64) as u32
            }
            _ => 100,
        }
    }

    pub fn occupancy_pct(&self) -> u32 {
        match self.event.max_participants {
            None => 0,
            Some(max) if max <= 0 => 100,
            Some(max) => {
                let pct = u64::from(self.active_count()) * 100 / max as u64;
                pct.min(100) as u32
            }
        }
    }

    pub fn has_started(&self, now: DateTime<Utc>) -> bool {
        now >= self.event.start_time
    }

    pub fn has_finished(&self, now: DateTime<Utc>) -> bool {
        now > self.event.end_time
    }

    pub fn summary(&self, now: DateTime<Utc>) -> CapacitySummary {
        CapacitySummary {
            active_participants: self.active_count(),
            vacancies: self.vacancies(),
            is_full: self.is_full(),
            quorum_met: self.quorum_met(),
            quorum_status: self.quorum_status(),
            quorum_progress_pct: self.quorum_progress_pct(),
            occupancy_pct: self.occupancy_pct(),
            has_started: self.has_started(now),
            has_finished: self.has_finished(now),
        }
    }
}

/// Point-in-time snapshot of a [`Capacity`] for responses.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CapacitySummary {
    pub active_participants: u32,
    pub vacancies: Option<u32>,
    pub is_full: bool,
    pub quorum_met: Option<bool>,
    pub quorum_status: QuorumStatus,
    pub quorum_progress_pct: u32,
    pub occupancy_pct: u32,
    pub has_started: bool,
    pub has_finished: bool,
}
