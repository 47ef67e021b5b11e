use crate::domain::{
    models::{address::Address, profile::{Profile, ProfileSummary}},
    ports::ProfileRepository,
};
use crate::error::AppError;
use crate::infra::repositories::sqlite_address_repo::upsert_address;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteProfileRepo {
    pool: SqlitePool,
}

impl SqliteProfileRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileRepository for SqliteProfileRepo {
    async fn find_by_id(&self, id: &str) -> Result<Option<Profile>, AppError> {
        sqlx::query_as::<_, Profile>("SELECT * FROM profiles WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_user(&self, user_id: &str) -> Result<Option<Profile>, AppError> {
        sqlx::query_as::<_, Profile>("SELECT * FROM profiles WHERE user_id = ?")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update_with_address(&self, profile: &Profile, address: Option<&Address>) -> Result<Profile, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        if let Some(address) = address {
            upsert_address(&mut *tx, address).await?;
        }

        let updated = sqlx::query_as::<_, Profile>(
            r#"UPDATE profiles SET
                social_name = ?, birth_date = ?, description = ?, gender = ?, is_pcd = ?,
                neurodivergent = ?, image_url = ?, address_id = ?
            WHERE id = ?
            RETURNING *"#
        )
            .bind(&profile.social_name)
            .bind(profile.birth_date)
            .bind(&profile.description)
            .bind(profile.gender)
            .bind(profile.is_pcd)
            .bind(profile.neurodivergent)
            .bind(&profile.image_url)
            .bind(&profile.address_id)
            .bind(&profile.id)
            .fetch_one(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        tx.commit().await.map_err(AppError::Database)?;
        Ok(updated)
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM profiles WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Profile not found".into()));
        }
        Ok(())
    }

    async fn list_summaries_for_event(&self, event_id: &str) -> Result<Vec<ProfileSummary>, AppError> {
        sqlx::query_as::<_, ProfileSummary>(
            r#"SELECT p.id, p.social_name, u.first_name, u.last_name, u.email
            FROM profiles p
            LEFT JOIN users u ON u.id = p.user_id
            WHERE p.id IN (
                SELECT organizer_id FROM events WHERE id = ?
                UNION
                SELECT participant_id FROM participations WHERE event_id = ?
            )"#
        )
            .bind(event_id)
            .bind(event_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
