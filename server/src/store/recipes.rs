use std::collections::{HashMap, HashSet};

use diesel::dsl::sql;
use diesel::prelude::*;
use diesel::sql_types::BigInt;
use ladle_core::validation::IngredientAmount;
use ladle_core::{Membership, RecipeFilter, Window};
use uuid::Uuid;

use crate::models::{
    Ingredient, NewRecipe, NewRecipeIngredient, NewRecipeTag, Recipe, RecipeChanges,
    RecipeSummary, Tag, User,
};
use crate::schema::{
    favorites, ingredients, recipe_ingredients, recipe_tags, recipes, shopping_cart_items, tags,
    users,
};

/// A recipe with everything its full representation needs, resolved for one
/// viewer.
#[derive(Debug, Clone)]
pub struct RecipeDetail {
    pub recipe: Recipe,
    pub author: User,
    pub tags: Vec<Tag>,
    pub ingredients: Vec<(Ingredient, i32)>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
    pub author_subscribed: bool,
}

/// Ids of the recipes matching `filter`, newest first, plus the total number
/// of matches ignoring the window.
pub fn filter_recipe_ids(
    conn: &mut PgConnection,
    filter: &RecipeFilter,
    window: Window,
) -> QueryResult<(Vec<Uuid>, i64)> {
    let mut query = recipes::table.into_boxed();

    if !filter.tags.is_empty() {
        query = query.filter(
            recipes::id.eq_any(
                recipe_tags::table
                    .inner_join(tags::table)
                    .filter(tags::slug.eq_any(&filter.tags))
                    .select(recipe_tags::recipe_id),
            ),
        );
    }

    if let Some(author) = filter.author {
        query = query.filter(recipes::author_id.eq(author));
    }

    match filter.favorited {
        Membership::Any => {}
        Membership::Only(user) => {
            query = query.filter(
                recipes::id.eq_any(
                    favorites::table
                        .filter(favorites::user_id.eq(user))
                        .select(favorites::recipe_id),
                ),
            );
        }
        Membership::Exclude(user) => {
            query = query.filter(
                recipes::id.ne_all(
                    favorites::table
                        .filter(favorites::user_id.eq(user))
                        .select(favorites::recipe_id),
                ),
            );
        }
    }

    match filter.in_cart {
        Membership::Any => {}
        Membership::Only(user) => {
            query = query.filter(
                recipes::id.eq_any(
                    shopping_cart_items::table
                        .filter(shopping_cart_items::user_id.eq(user))
                        .select(shopping_cart_items::recipe_id),
                ),
            );
        }
        Membership::Exclude(user) => {
            query = query.filter(
                recipes::id.ne_all(
                    shopping_cart_items::table
                        .filter(shopping_cart_items::user_id.eq(user))
                        .select(shopping_cart_items::recipe_id),
                ),
            );
        }
    }

    // COUNT(*) OVER() computes the total count across all matching rows
    let rows: Vec<(Uuid, i64)> = query
        .order((recipes::created_at.desc(), recipes::id.desc()))
        .select((recipes::id, sql::<BigInt>("COUNT(*) OVER()")))
        .limit(window.limit)
        .offset(window.offset)
        .load(conn)?;

    let total = rows.first().map(|(_, total)| *total).unwrap_or(0);
    Ok((rows.into_iter().map(|(id, _)| id).collect(), total))
}

/// Load full details for `ids`, preserving their order. Missing ids are skipped.
pub fn load_details(
    conn: &mut PgConnection,
    ids: &[Uuid],
    viewer: Option<Uuid>,
) -> QueryResult<Vec<RecipeDetail>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let rows: Vec<(Recipe, User)> = recipes::table
        .inner_join(users::table)
        .filter(recipes::id.eq_any(ids))
        .select((Recipe::as_select(), User::as_select()))
        .load(conn)?;

    let mut tags_by_recipe: HashMap<Uuid, Vec<Tag>> = HashMap::new();
    let tag_rows: Vec<(Uuid, Tag)> = recipe_tags::table
        .inner_join(tags::table)
        .filter(recipe_tags::recipe_id.eq_any(ids))
        .order(tags::name.asc())
        .select((recipe_tags::recipe_id, Tag::as_select()))
        .load(conn)?;
    for (recipe_id, tag) in tag_rows {
        tags_by_recipe.entry(recipe_id).or_default().push(tag);
    }

    let mut ingredients_by_recipe: HashMap<Uuid, Vec<(Ingredient, i32)>> = HashMap::new();
    let ingredient_rows: Vec<(Uuid, Ingredient, i32)> = recipe_ingredients::table
        .inner_join(ingredients::table)
        .filter(recipe_ingredients::recipe_id.eq_any(ids))
        .order(ingredients::name.asc())
        .select((
            recipe_ingredients::recipe_id,
            Ingredient::as_select(),
            recipe_ingredients::amount,
        ))
        .load(conn)?;
    for (recipe_id, ingredient, amount) in ingredient_rows {
        ingredients_by_recipe
            .entry(recipe_id)
            .or_default()
            .push((ingredient, amount));
    }

    let (favorited, in_cart, subscribed) = match viewer {
        Some(viewer) => {
            let favorited: HashSet<Uuid> = favorites::table
                .filter(favorites::user_id.eq(viewer))
                .filter(favorites::recipe_id.eq_any(ids))
                .select(favorites::recipe_id)
                .load::<Uuid>(conn)?
                .into_iter()
                .collect();
            let in_cart: HashSet<Uuid> = shopping_cart_items::table
                .filter(shopping_cart_items::user_id.eq(viewer))
                .filter(shopping_cart_items::recipe_id.eq_any(ids))
                .select(shopping_cart_items::recipe_id)
                .load::<Uuid>(conn)?
                .into_iter()
                .collect();
            let author_ids: Vec<Uuid> = rows.iter().map(|(_, author)| author.id).collect();
            let subscribed = super::users::subscribed_among(conn, viewer, &author_ids)?;
            (favorited, in_cart, subscribed)
        }
        None => Default::default(),
    };

    let mut by_id: HashMap<Uuid, (Recipe, User)> = rows
        .into_iter()
        .map(|(recipe, author)| (recipe.id, (recipe, author)))
        .collect();

    Ok(ids
        .iter()
        .filter_map(|id| by_id.remove(id))
        .map(|(recipe, author)| RecipeDetail {
            tags: tags_by_recipe.remove(&recipe.id).unwrap_or_default(),
            ingredients: ingredients_by_recipe.remove(&recipe.id).unwrap_or_default(),
            is_favorited: favorited.contains(&recipe.id),
            is_in_shopping_cart: in_cart.contains(&recipe.id),
            author_subscribed: subscribed.contains(&author.id),
            recipe,
            author,
        })
        .collect())
}

pub fn load_detail(
    conn: &mut PgConnection,
    id: Uuid,
    viewer: Option<Uuid>,
) -> QueryResult<Option<RecipeDetail>> {
    Ok(load_details(conn, &[id], viewer)?.pop())
}

pub fn find_author(conn: &mut PgConnection, id: Uuid) -> QueryResult<Option<Uuid>> {
    recipes::table
        .find(id)
        .select(recipes::author_id)
        .first(conn)
        .optional()
}

pub fn find_summary(conn: &mut PgConnection, id: Uuid) -> QueryResult<Option<RecipeSummary>> {
    recipes::table
        .find(id)
        .select(RecipeSummary::as_select())
        .first(conn)
        .optional()
}

/// Referenced tag and ingredient ids that do not exist.
pub fn missing_references(
    conn: &mut PgConnection,
    tag_ids: Option<&[Uuid]>,
    ingredient_items: Option<&[IngredientAmount]>,
) -> QueryResult<(Vec<Uuid>, Vec<Uuid>)> {
    let missing_tags = match tag_ids {
        Some(ids) if !ids.is_empty() => {
            let found: HashSet<Uuid> = tags::table
                .filter(tags::id.eq_any(ids))
                .select(tags::id)
                .load::<Uuid>(conn)?
                .into_iter()
                .collect();
            ids.iter().filter(|id| !found.contains(id)).copied().collect()
        }
        _ => Vec::new(),
    };

    let missing_ingredients = match ingredient_items {
        Some(items) if !items.is_empty() => {
            let ids: Vec<Uuid> = items.iter().map(|item| item.id).collect();
            let found: HashSet<Uuid> = ingredients::table
                .filter(ingredients::id.eq_any(&ids))
                .select(ingredients::id)
                .load::<Uuid>(conn)?
                .into_iter()
                .collect();
            ids.into_iter().filter(|id| !found.contains(id)).collect()
        }
        _ => Vec::new(),
    };

    Ok((missing_tags, missing_ingredients))
}

fn replace_tags(conn: &mut PgConnection, recipe_id: Uuid, tag_ids: &[Uuid]) -> QueryResult<()> {
    diesel::delete(recipe_tags::table.filter(recipe_tags::recipe_id.eq(recipe_id)))
        .execute(conn)?;
    let rows: Vec<NewRecipeTag> = tag_ids
        .iter()
        .map(|&tag_id| NewRecipeTag { recipe_id, tag_id })
        .collect();
    diesel::insert_into(recipe_tags::table)
        .values(&rows)
        .execute(conn)?;
    Ok(())
}

fn replace_ingredients(
    conn: &mut PgConnection,
    recipe_id: Uuid,
    items: &[IngredientAmount],
) -> QueryResult<()> {
    diesel::delete(recipe_ingredients::table.filter(recipe_ingredients::recipe_id.eq(recipe_id)))
        .execute(conn)?;
    let rows: Vec<NewRecipeIngredient> = items
        .iter()
        .map(|item| NewRecipeIngredient {
            recipe_id,
            ingredient_id: item.id,
            amount: item.amount,
        })
        .collect();
    diesel::insert_into(recipe_ingredients::table)
        .values(&rows)
        .execute(conn)?;
    Ok(())
}

/// Insert a recipe with its tags and ingredients in one transaction.
pub fn insert(
    conn: &mut PgConnection,
    recipe: &NewRecipe<'_>,
    tag_ids: &[Uuid],
    items: &[IngredientAmount],
) -> QueryResult<Uuid> {
    conn.transaction(|conn| {
        let recipe_id: Uuid = diesel::insert_into(recipes::table)
            .values(recipe)
            .returning(recipes::id)
            .get_result(conn)?;
        replace_tags(conn, recipe_id, tag_ids)?;
        replace_ingredients(conn, recipe_id, items)?;
        Ok(recipe_id)
    })
}

/// Apply a partial update. Supplied tag and ingredient lists replace the
/// existing sets.
pub fn update(
    conn: &mut PgConnection,
    recipe_id: Uuid,
    changes: &RecipeChanges<'_>,
    tag_ids: Option<&[Uuid]>,
    items: Option<&[IngredientAmount]>,
) -> QueryResult<()> {
    conn.transaction(|conn| {
        diesel::update(recipes::table.find(recipe_id))
            .set(changes)
            .execute(conn)?;
        if let Some(tag_ids) = tag_ids {
            replace_tags(conn, recipe_id, tag_ids)?;
        }
        if let Some(items) = items {
            replace_ingredients(conn, recipe_id, items)?;
        }
        Ok(())
    })
}

pub fn delete(conn: &mut PgConnection, recipe_id: Uuid) -> QueryResult<bool> {
    let deleted = diesel::delete(recipes::table.find(recipe_id)).execute(conn)?;
    Ok(deleted > 0)
}
