use crate::domain::{
    models::{address::Address, event::Event},
    ports::{EventRepository, MyEventsFilter},
};
use crate::error::AppError;
use crate::infra::repositories::postgres_address_repo::upsert_address;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

pub struct PostgresEventRepo {
    pool: PgPool,
}

impl PostgresEventRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventRepository for PostgresEventRepo {
    async fn create_with_address(&self, event: &Event, address: Option<&Address>) -> Result<Event, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        if let Some(address) = address {
            upsert_address(&mut *tx, address).await?;
        }

        let created = sqlx::query_as::<_, Event>(
            r#"INSERT INTO events (
                id, name, organizer_id, address_id, meeting_location, description, rules,
                status, start_time, end_time, meeting_time, whatsapp_group, photo_url, category,
                min_participants, max_participants, accepts_participants, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19)
            RETURNING *"#
        )
            .bind(&event.id)
            .bind(&event.name)
            .bind(&event.organizer_id)
            .bind(&event.address_id)
            .bind(&event.meeting_location)
            .bind(&event.description)
            .bind(&event.rules)
            .bind(event.status)
            .bind(event.start_time)
            .bind(event.end_time)
            .bind(event.meeting_time)
            .bind(&event.whatsapp_group)
            .bind(&event.photo_url)
            .bind(event.category)
            .bind(event.min_participants)
            .bind(event.max_participants)
            .bind(event.accepts_participants)
            .bind(event.created_at)
            .bind(event.updated_at)
            .fetch_one(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        tx.commit().await.map_err(AppError::Database)?;
        Ok(created)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Event>, AppError> {
        sqlx::query_as::<_, Event>("SELECT * FROM events WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list(&self) -> Result<Vec<Event>, AppError> {
        sqlx::query_as::<_, Event>("SELECT * FROM events ORDER BY start_time DESC")
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_for_profile(&self, profile_id: &str, filter: MyEventsFilter) -> Result<Vec<Event>, AppError> {
        let sql = match filter {
            MyEventsFilter::Created => {
                "SELECT * FROM events WHERE organizer_id = $1 ORDER BY start_time DESC"
            }
            MyEventsFilter::Enrolled => {
                "SELECT * FROM events WHERE id IN (SELECT event_id FROM participations WHERE participant_id = $1)
                 ORDER BY start_time DESC"
            }
            MyEventsFilter::Completed => {
                "SELECT * FROM events WHERE status = 'FINISHED' AND (
                    organizer_id = $1 OR id IN (SELECT event_id FROM participations WHERE participant_id = $1)
                 ) ORDER BY start_time DESC"
            }
            MyEventsFilter::All => {
                "SELECT * FROM events WHERE organizer_id = $1
                    OR id IN (SELECT event_id FROM participations WHERE participant_id = $1)
                 ORDER BY start_time DESC"
            }
        };

        sqlx::query_as::<_, Event>(sql)
            .bind(profile_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update(&self, event: &Event, address: Option<&Address>) -> Result<Event, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        if let Some(address) = address {
            upsert_address(&mut *tx, address).await?;
        }

        let updated = sqlx::query_as::<_, Event>(
            r#"UPDATE events SET
                name = $1, address_id = $2, meeting_location = $3, description = $4, rules = $5,
                status = $6, start_time = $7, end_time = $8, meeting_time = $9, whatsapp_group = $10,
                photo_url = $11, category = $12, min_participants = $13, max_participants = $14,
                accepts_participants = $15, updated_at = $16
            WHERE id = $17
            RETURNING *"#
        )
            .bind(&event.name)
            .bind(&event.address_id)
            .bind(&event.meeting_location)
            .bind(&event.description)
            .bind(&event.rules)
            .bind(event.status)
            .bind(event.start_time)
            .bind(event.end_time)
            .bind(event.meeting_time)
            .bind(&event.whatsapp_group)
            .bind(&event.photo_url)
            .bind(event.category)
            .bind(event.min_participants)
            .bind(event.max_participants)
            .bind(event.accepts_participants)
            .bind(event.updated_at)
            .bind(&event.id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(AppError::Database)?
            .ok_or_else(|| AppError::NotFound("Event not found".into()))?;

        tx.commit().await.map_err(AppError::Database)?;
        Ok(updated)
    }

    async fn finish_elapsed(&self, now: DateTime<Utc>) -> Result<u64, AppError> {
        let result = sqlx::query(
            "UPDATE events SET status = 'FINISHED', updated_at = $1 WHERE status = 'ACTIVE' AND end_time < $2"
        )
            .bind(now)
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(result.rows_affected())
    }
}
