use crate::domain::{models::participation::Participation, ports::ParticipationRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresParticipationRepo {
    pool: PgPool,
}

impl PostgresParticipationRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ParticipationRepository for PostgresParticipationRepo {
    async fn create(&self, participation: &Participation) -> Result<Participation, AppError> {
        sqlx::query_as::<_, Participation>(
            r#"INSERT INTO participations (
                id, event_id, participant_id, status, signed_up_at, cancelled_at, host_rating, host_comment
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
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
        sqlx::query_as::<_, Participation>("SELECT * FROM participations WHERE event_id = $1 AND id = $2")
            .bind(event_id)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_for_participant(&self, event_id: &str, participant_id: &str) -> Result<Option<Participation>, AppError> {
        sqlx::query_as::<_, Participation>(
            "SELECT * FROM participations WHERE event_id = $1 AND participant_id = $2",
        )
            .bind(event_id)
            .bind(participant_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_event(&self, event_id: &str) -> Result<Vec<Participation>, AppError> {
        sqlx::query_as::<_, Participation>(
            "SELECT * FROM participations WHERE event_id = $1 ORDER BY signed_up_at ASC",
        )
            .bind(event_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update(&self, participation: &Participation) -> Result<Participation, AppError> {
        sqlx::query_as::<_, Participation>(
            r#"UPDATE participations SET
                status = $1, signed_up_at = $2, cancelled_at = $3, host_rating = $4, host_comment = $5
            WHERE id = $6
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
