use std::collections::{HashMap, HashSet};

use diesel::dsl::{count_star, sql};
use diesel::prelude::*;
use diesel::sql_types::BigInt;
use ladle_core::Window;
use uuid::Uuid;

use crate::models::{RecipeSummary, User};
use crate::schema::{recipes, subscriptions, users};

/// The subset of `author_ids` that `viewer` is subscribed to.
pub fn subscribed_among(
    conn: &mut PgConnection,
    viewer: Uuid,
    author_ids: &[Uuid],
) -> QueryResult<HashSet<Uuid>> {
    if author_ids.is_empty() {
        return Ok(HashSet::new());
    }
    Ok(subscriptions::table
        .filter(subscriptions::user_id.eq(viewer))
        .filter(subscriptions::author_id.eq_any(author_ids))
        .select(subscriptions::author_id)
        .load::<Uuid>(conn)?
        .into_iter()
        .collect())
}

pub fn find(conn: &mut PgConnection, id: Uuid) -> QueryResult<Option<User>> {
    users::table
        .find(id)
        .select(User::as_select())
        .first(conn)
        .optional()
}

pub fn find_by_email(conn: &mut PgConnection, email: &str) -> QueryResult<Option<User>> {
    users::table
        .filter(users::email.eq(email.trim().to_lowercase()))
        .select(User::as_select())
        .first(conn)
        .optional()
}

/// All users ordered by username, with the total count.
pub fn list(conn: &mut PgConnection, window: Window) -> QueryResult<(Vec<User>, i64)> {
    let rows: Vec<(User, i64)> = users::table
        .order(users::username.asc())
        .select((User::as_select(), sql::<BigInt>("COUNT(*) OVER()")))
        .limit(window.limit)
        .offset(window.offset)
        .load(conn)?;
    let total = rows.first().map(|(_, total)| *total).unwrap_or(0);
    Ok((rows.into_iter().map(|(user, _)| user).collect(), total))
}

/// Authors `viewer` follows, ordered by username, with the total count.
pub fn followed_authors(
    conn: &mut PgConnection,
    viewer: Uuid,
    window: Window,
) -> QueryResult<(Vec<User>, i64)> {
    let rows: Vec<(User, i64)> = users::table
        .filter(
            users::id.eq_any(
                subscriptions::table
                    .filter(subscriptions::user_id.eq(viewer))
                    .select(subscriptions::author_id),
            ),
        )
        .order(users::username.asc())
        .select((User::as_select(), sql::<BigInt>("COUNT(*) OVER()")))
        .limit(window.limit)
        .offset(window.offset)
        .load(conn)?;
    let total = rows.first().map(|(_, total)| *total).unwrap_or(0);
    Ok((rows.into_iter().map(|(user, _)| user).collect(), total))
}

/// Recipes by each author, newest first, with each author's total count.
///
/// `per_author` truncates the recipe lists but not the counts.
pub fn recipes_by_authors(
    conn: &mut PgConnection,
    author_ids: &[Uuid],
    per_author: Option<usize>,
) -> QueryResult<HashMap<Uuid, (Vec<RecipeSummary>, i64)>> {
    if author_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let counts: Vec<(Uuid, i64)> = recipes::table
        .filter(recipes::author_id.eq_any(author_ids))
        .group_by(recipes::author_id)
        .select((recipes::author_id, count_star()))
        .load(conn)?;

    let rows: Vec<(Uuid, RecipeSummary)> = recipes::table
        .filter(recipes::author_id.eq_any(author_ids))
        .order((recipes::created_at.desc(), recipes::id.desc()))
        .select((recipes::author_id, RecipeSummary::as_select()))
        .load(conn)?;

    let mut by_author: HashMap<Uuid, (Vec<RecipeSummary>, i64)> = counts
        .into_iter()
        .map(|(author, total)| (author, (Vec::new(), total)))
        .collect();
    for (author, summary) in rows {
        let entry = by_author.entry(author).or_default();
        if per_author.map_or(true, |limit| entry.0.len() < limit) {
            entry.0.push(summary);
        }
    }
    Ok(by_author)
}
