use chrono::{DateTime, Utc};
use tracing::info;
use crate::domain::models::event::{Event, EventStatus};
use crate::domain::ports::EventRepository;
use crate::error::AppError;

pub fn is_elapsed(event: &Event, now: DateTime<Utc>) -> bool {
    event.status == EventStatus::Active && event.end_time < now
}

/// Closes every ACTIVE event whose end time has passed. Runs on the read path
/// of the listings, so an event only becomes FINISHED once someone lists.
pub async fn finish_elapsed_events(repo: &dyn EventRepository, now: DateTime<Utc>) -> Result<u64, AppError> {
    let finished = repo.finish_elapsed(now).await?;
    if finished > 0 {
        info!(finished, "Lifecycle sweep closed elapsed events");
    }
    Ok(finished)
}
