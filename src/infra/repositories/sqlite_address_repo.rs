use crate::domain::{models::address::Address, ports::AddressRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::{SqliteConnection, SqlitePool};

pub struct SqliteAddressRepo {
    pool: SqlitePool,
}

impl SqliteAddressRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

/// Inserts the address, or overwrites every field when the id already exists.
pub(crate) async fn upsert_address(conn: &mut SqliteConnection, address: &Address) -> Result<(), AppError> {
    sqlx::query(
        r#"INSERT INTO addresses (id, street, number, complement, neighborhood, city, state, postal_code)
           VALUES (?, ?, ?, ?, ?, ?, ?, ?)
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
impl AddressRepository for SqliteAddressRepo {
    async fn find_by_id(&self, id: &str) -> Result<Option<Address>, AppError> {
        sqlx::query_as::<_, Address>("SELECT * FROM addresses WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
