use crate::models::{NewSession, User};
use crate::schema::{sessions, users};
use chrono::{Duration, Utc};
use diesel::prelude::*;

use super::crypto::{generate_token, hash_token};

/// Create a session and return the plaintext token. Only its hash is stored.
pub fn create_session(
    conn: &mut PgConnection,
    user_id: uuid::Uuid,
    ttl_days: i64,
) -> Result<String, diesel::result::Error> {
    let token = generate_token();
    let token_hash = hash_token(&token);
    let expires_at = Utc::now() + Duration::days(ttl_days);

    let new_session = NewSession {
        user_id,
        token_hash: &token_hash,
        expires_at,
    };

    diesel::insert_into(sessions::table)
        .values(&new_session)
        .execute(conn)?;

    Ok(token)
}

pub fn find_user_by_token(
    conn: &mut PgConnection,
    token: &str,
) -> Result<Option<User>, diesel::result::Error> {
    let token_hash = hash_token(token);

    sessions::table
        .inner_join(users::table)
        .filter(sessions::token_hash.eq(&token_hash))
        .filter(sessions::expires_at.gt(Utc::now()))
        .select(User::as_select())
        .first(conn)
        .optional()
}

/// Revoke the session for `token`. Returns whether one existed.
pub fn delete_session(conn: &mut PgConnection, token: &str) -> Result<bool, diesel::result::Error> {
    let token_hash = hash_token(token);
    let deleted =
        diesel::delete(sessions::table.filter(sessions::token_hash.eq(&token_hash))).execute(conn)?;
    Ok(deleted > 0)
}
