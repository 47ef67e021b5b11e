use crate::domain::{models::participation::Participation, ports::ParticipationRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteParticipationRepo {
    pool: SqlitePool,
}

impl SqliteParticipationRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ParticipationRepository for SqliteParticipationRepo {
    async fn create(&self, participation: &Participation) -> Result<Participation, AppError> {
        sqlx::query_as::<_, Participation>(
            r#"INSERT INTO participations (
                id, event_id, participant_id, status, signed_up_at, cancelled_at, host_rating, host_comment
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING *"#
        )
            .bind(&participation.id)
            .bind(&participation.event_id)
            .bind(&participation.participant_id)
            .bind(participation.status)
            .bind(participation.signed_up_at)
            .bind(participation.cancelled_at)
            .bind(participation.host_rating)
            .bind(&participation.host_comment)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, event_id: &str, id: &str) -> Result<Option<Participation>, AppError> {
        sqlx::query_as::<_, Participation>("SELECT * FROM participations WHERE event_id = ? AND id = ?")
            .bind(event_id)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_for_participant(&self, event_id: &str, participant_id: &str) -> Result<Option<Participation>, AppError> {
        sqlx::query_as::<_, Participation>(
            "SELECT * FROM participations WHERE event_id = ? AND participant_id = ?",
        )
            .bind(event_id)
            .bind(participant_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_event(&self, event_id: &str) -> Result<Vec<Participation>, AppError> {
        sqlx::query_as::<_, Participation>(
            "SELECT * FROM participations WHERE event_id = ? ORDER BY signed_up_at ASC",
        )
            .bind(event_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update(&self, participation: &Participation) -> Result<Participation, AppError> {
        sqlx::query_as::<_, Participation>(
            r#"UPDATE participations SET
                status = ?, signed_up_at = ?, cancelled_at = ?, host_rating = ?, host_comment = ?
            WHERE id = ?
            RETURNING *"#
        )
            .bind(participation.status)
            .bind(participation.signed_up_at)
            .bind(participation.cancelled_at)
            .bind(participation.host_rating)
            .bind(&participation.host_comment)
            .bind(&participation.id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?
            .ok_or_else(|| AppError::NotFound("Participation not found".into()))
    }
}
