use crate::domain::{models::{profile::Profile, user::User}, ports::UserRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresUserRepo {
    pool: PgPool,
}

impl PostgresUserRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepo {
    async fn create_with_profile(&self, user: &User, profile: &Profile) -> Result<(User, Profile), AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let created_user = sqlx::query_as::<_, User>(
            "INSERT INTO users (id, email, first_name, last_name, password_hash, created_at) VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
        )
            .bind(&user.id)
            .bind(&user.email)
            .bind(&user.first_name)
            .bind(&user.last_name)
            .bind(&user.password_hash)
            .bind(user.created_at)
            .fetch_one(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        let created_profile = sqlx::query_as::<_, Profile>(
            r#"INSERT INTO profiles (
                id, user_id, social_name, birth_date, description, gender,
                is_pcd, neurodivergent, image_url, address_id, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING *"#
        )
            .bind(&profile.id)
            .bind(&profile.user_id)
            .bind(&profile.social_name)
            .bind(profile.birth_date)
            .bind(&profile.description)
            .bind(profile.gender)
            .bind(profile.is_pcd)
            .bind(profile.neurodivergent)
            .bind(&profile.image_url)
            .bind(&profile.address_id)
            .bind(profile.created_at)
            .fetch_one(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        tx.commit().await.map_err(AppError::Database)?;
        Ok((created_user, created_profile))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<User>, AppError> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
