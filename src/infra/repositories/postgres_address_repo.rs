use crate::domain::{models::address::Address, ports::AddressRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::{PgConnection, PgPool};

pub struct PostgresAddressRepo {
    pool: PgPool,
}

impl PostgresAddressRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Inserts the address, or overwrites every field when the id already exists.
pub(crate) async fn upsert_address(conn: &mut PgConnection, address: &Address) -> Result<(), AppError> {
    sqlx::query(
        r#"INSERT INTO addresses (id, street, number, complement, neighborhood, city, state, postal_code)
           VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
           ON CONFLICT(id) DO UPDATE SET
               street = excluded.street,
               number = excluded.number,
               complement = excluded.complement,
               neighborhood = excluded.neighborhood,
               city = excluded.city,
               state = excluded.state,
               postal_code = excluded.postal_code"#
    )
        .bind(&address.id)
        .bind(&address.street)
        .bind(&address.number)
        .bind(&address.complement)
        .bind(&address.neighborhood)
        .bind(&address.city)
        .bind(&address.state)
        .bind(&address.postal_code)
        .execute(conn)
        .await
        .map_err(AppError::Database)?;
    Ok(())
}

#[async_trait]
impl AddressRepository for PostgresAddressRepo {
    async fn find_by_id(&self, id: &str) -> Result<Option<Address>, AppError> {
        sqlx::query_as::<_, Address>("SELECT * FROM addresses WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
