use diesel::prelude::*;
use ladle_core::CartRow;
use uuid::Uuid;

use crate::schema::{ingredients, recipe_ingredients, shopping_cart_items};

/// One row per (cart recipe, ingredient) for `user_id`, unaggregated.
pub fn cart_rows(conn: &mut PgConnection, user_id: Uuid) -> QueryResult<Vec<CartRow>> {
    let rows: Vec<(String, String, i32)> = shopping_cart_items::table
        .inner_join(
            recipe_ingredients::table
                .on(recipe_ingredients::recipe_id.eq(shopping_cart_items::recipe_id)),
        )
        .inner_join(ingredients::table.on(ingredients::id.eq(recipe_ingredients::ingredient_id)))
        .filter(shopping_cart_items::user_id.eq(user_id))
        .select((
            ingredients::name,
            ingredients::measurement_unit,
            recipe_ingredients::amount,
        ))
        .load(conn)?;

    Ok(rows
        .into_iter()
        .map(|(name, measurement_unit, amount)| CartRow {
            name,
            measurement_unit,
            amount,
        })
        .collect())
}
