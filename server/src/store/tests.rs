//! Queries against a real Postgres. Skipped unless `DATABASE_URL` is set.
//!
//! Each test runs inside `test_transaction`, so nothing is committed and the
//! assertions are scoped to rows the test itself created.

use std::collections::HashSet;
use std::sync::Once;

use diesel::prelude::*;
use diesel_migrations::MigrationHarness;
use ladle_core::validation::IngredientAmount;
use ladle_core::{toggle, Actor, RecipeQuery, Relation, ToggleAction, Window};
use uuid::Uuid;

use super::relations::PgRelations;
use crate::db::MIGRATIONS;
use crate::models::{NewRecipe, NewTag, NewUser, ROLE_USER};
use crate::schema::{tags, users};

static MIGRATE: Once = Once::new();

fn connect() -> Option<PgConnection> {
    let Ok(url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set, skipping");
        return None;
    };
    let mut conn = PgConnection::establish(&url).expect("connect to DATABASE_URL");
    MIGRATE.call_once(|| {
        conn.run_pending_migrations(MIGRATIONS)
            .expect("apply migrations");
    });
    Some(conn)
}

fn unique(prefix: &str) -> String {
    format!("{prefix}-{}", Uuid::new_v4().simple())
}

fn seed_user(conn: &mut PgConnection) -> QueryResult<Uuid> {
    let username = unique("cook");
    diesel::insert_into(users::table)
        .values(NewUser {
            email: &format!("{username}@example.com"),
            username: &username,
            first_name: "Test",
            last_name: "Cook",
            password_hash: "unused",
            role: ROLE_USER,
        })
        .returning(users::id)
        .get_result(conn)
}

/// Returns the tag's id and slug.
fn seed_tag(conn: &mut PgConnection) -> QueryResult<(Uuid, String)> {
    let slug = unique("tag");
    let color = format!("#{}", &Uuid::new_v4().simple().to_string()[..6]).to_uppercase();
    let id = diesel::insert_into(tags::table)
        .values(NewTag {
            name: &slug,
            color: &color,
            slug: &slug,
        })
        .returning(tags::id)
        .get_result(conn)?;
    Ok((id, slug))
}

fn seed_recipe(
    conn: &mut PgConnection,
    author_id: Uuid,
    tag_ids: &[Uuid],
    ingredient_id: Uuid,
) -> QueryResult<Uuid> {
    super::recipes::insert(
        conn,
        &NewRecipe {
            author_id,
            name: "Borscht",
            text: "Simmer.",
            image: "recipes/images/borscht.png",
            cooking_time: 90,
        },
        tag_ids,
        &[IngredientAmount {
            id: ingredient_id,
            amount: 100,
        }],
    )
}

fn ids_for(
    conn: &mut PgConnection,
    pairs: &[(&str, String)],
    actor: &Actor,
) -> QueryResult<(HashSet<Uuid>, i64)> {
    let query = RecipeQuery::from_pairs(pairs.iter().map(|(k, v)| (*k, v.as_str())))
        .expect("valid query");
    let window = Window {
        limit: 100,
        offset: 0,
    };
    let (ids, total) = super::recipes::filter_recipe_ids(conn, &query.resolve(actor), window)?;
    Ok((ids.into_iter().collect(), total))
}

#[test]
fn several_tag_slugs_match_any_of_them_once() {
    let Some(mut conn) = connect() else { return };
    conn.test_transaction::<_, diesel::result::Error, _>(|conn| {
        let author = seed_user(conn)?;
        let flour = super::ingredients::insert(conn, &unique("flour"), "g")?;
        let (breakfast, breakfast_slug) = seed_tag(conn)?;
        let (lunch, lunch_slug) = seed_tag(conn)?;
        let (dinner, _) = seed_tag(conn)?;

        let only_breakfast = seed_recipe(conn, author, &[breakfast], flour.id)?;
        let only_lunch = seed_recipe(conn, author, &[lunch], flour.id)?;
        let both = seed_recipe(conn, author, &[breakfast, lunch], flour.id)?;
        seed_recipe(conn, author, &[dinner], flour.id)?;

        let (ids, total) = ids_for(
            conn,
            &[
                ("author", author.to_string()),
                ("tags", breakfast_slug),
                ("tags", lunch_slug),
            ],
            &Actor::Anonymous,
        )?;
        assert_eq!(ids, HashSet::from([only_breakfast, only_lunch, both]));
        assert_eq!(total, 3);
        Ok(())
    });
}

#[test]
fn unfavorited_filter_excludes_the_callers_favorites() {
    let Some(mut conn) = connect() else { return };
    conn.test_transaction::<_, diesel::result::Error, _>(|conn| {
        let author = seed_user(conn)?;
        let viewer = seed_user(conn)?;
        let flour = super::ingredients::insert(conn, &unique("flour"), "g")?;
        let (tag, _) = seed_tag(conn)?;
        let liked = seed_recipe(conn, author, &[tag], flour.id)?;
        let other = seed_recipe(conn, author, &[tag], flour.id)?;

        toggle(
            &mut PgRelations::new(conn),
            Relation::Favorite,
            ToggleAction::Add,
            viewer,
            liked,
        )
        .expect("favorite");

        let actor = Actor::User {
            id: viewer,
            is_admin: false,
        };
        let (ids, _) = ids_for(
            conn,
            &[("author", author.to_string()), ("is_favorited", "0".into())],
            &actor,
        )?;
        assert_eq!(ids, HashSet::from([other]));

        let (ids, _) = ids_for(
            conn,
            &[("author", author.to_string()), ("is_favorited", "1".into())],
            &actor,
        )?;
        assert_eq!(ids, HashSet::from([liked]));

        // Without a caller the flag narrows nothing
        let (ids, _) = ids_for(
            conn,
            &[("author", author.to_string()), ("is_favorited", "0".into())],
            &Actor::Anonymous,
        )?;
        assert_eq!(ids, HashSet::from([liked, other]));
        Ok(())
    });
}

#[test]
fn ingredient_prefix_search_ignores_case() {
    let Some(mut conn) = connect() else { return };
    conn.test_transaction::<_, diesel::result::Error, _>(|conn| {
        // A unit no other row uses keeps the assertions to this test's rows
        let unit = unique("unit");
        super::ingredients::insert(conn, "Пиво", &unit)?;
        super::ingredients::insert(conn, "Пшено", &unit)?;
        super::ingredients::insert(conn, "50% сливки", &unit)?;

        let names = |found: Vec<crate::models::Ingredient>| -> Vec<String> {
            found
                .into_iter()
                .filter(|i| i.measurement_unit == unit)
                .map(|i| i.name)
                .collect()
        };

        let found = super::ingredients::search(conn, Some("пив"))?;
        assert_eq!(names(found), vec!["Пиво"]);

        let found = super::ingredients::search(conn, Some("ПШ"))?;
        assert_eq!(names(found), vec!["Пшено"]);

        // `%` is literal, not a wildcard
        let found = super::ingredients::search(conn, Some("5%"))?;
        assert!(names(found).is_empty());

        let found = super::ingredients::search(conn, Some("  "))?;
        assert_eq!(names(found).len(), 3);
        Ok(())
    });
}
