//! Refresh-token statements shared by both backends. SQLite accepts the
//! `$N` placeholders as well, and both support `DELETE .. RETURNING`.

pub(crate) const INSERT: &str =
    "INSERT INTO refresh_tokens (token_hash, user_id, family_id, generation_id, expires_at, created_at)
     VALUES ($1, $2, $3, $4, $5, $6)";

/// Consumes a token: whoever deletes the row owns the rotation.
pub(crate) const TAKE: &str =
    "DELETE FROM refresh_tokens WHERE token_hash = $1
     RETURNING token_hash, user_id, family_id, generation_id, expires_at, created_at";

pub(crate) const REVOKE_FAMILY: &str = "DELETE FROM refresh_tokens WHERE family_id = $1";

pub(crate) const PURGE_EXPIRED: &str = "DELETE FROM refresh_tokens WHERE user_id = $1 AND expires_at < $2";
