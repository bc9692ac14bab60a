use diesel::prelude::*;
use ladle_core::prefix_pattern;

use crate::models::{Ingredient, NewIngredient};
use crate::schema::ingredients;

/// Ingredients whose name starts with `prefix`, ignoring case, ordered by
/// name then unit. A blank or absent prefix lists everything.
///
/// Case folding happens here rather than in SQL so the match does not depend
/// on the database collation.
pub fn search(conn: &mut PgConnection, prefix: Option<&str>) -> QueryResult<Vec<Ingredient>> {
    let mut query = ingredients::table.into_boxed();
    if let Some(prefix) = prefix.filter(|p| !p.trim().is_empty()) {
        let pattern = prefix_pattern(&prefix.to_lowercase());
        query = query.filter(ingredients::search_name.like(pattern));
    }

    query
        .order((ingredients::name.asc(), ingredients::measurement_unit.asc()))
        .select(Ingredient::as_select())
        .load(conn)
}

pub fn insert(
    conn: &mut PgConnection,
    name: &str,
    measurement_unit: &str,
) -> QueryResult<Ingredient> {
    let search_name = name.to_lowercase();
    diesel::insert_into(ingredients::table)
        .values(NewIngredient {
            name,
            measurement_unit,
            search_name: &search_name,
        })
        .returning(Ingredient::as_returning())
        .get_result(conn)
}
