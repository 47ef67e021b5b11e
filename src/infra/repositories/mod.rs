pub(crate) mod refresh_token_sql;

pub mod sqlite_user_repo;
pub mod sqlite_auth_repo;
pub mod sqlite_profile_repo;
pub mod sqlite_address_repo;
pub mod sqlite_event_repo;
pub mod sqlite_participation_repo;

pub mod postgres_user_repo;
pub mod postgres_auth_repo;
pub mod postgres_profile_repo;
pub mod postgres_address_repo;
pub mod postgres_event_repo;
pub mod postgres_participation_repo;
