use diesel::prelude::*;
use ladle_core::{Inserted, Relation, RelationStore};
use uuid::Uuid;

use crate::schema::{favorites, shopping_cart_items, subscriptions};

use super::unique_violation;

/// [`RelationStore`] over the favorites, cart and subscription tables.
///
/// The unique (user, target) constraint on each table is the existence check:
/// concurrent adds race on the insert and exactly one of them wins.
pub struct PgRelations<'a> {
    conn: &'a mut PgConnection,
}

impl<'a> PgRelations<'a> {
    pub fn new(conn: &'a mut PgConnection) -> Self {
        Self { conn }
    }
}

impl RelationStore for PgRelations<'_> {
    type Error = diesel::result::Error;

    fn insert(
        &mut self,
        relation: Relation,
        actor: Uuid,
        target: Uuid,
    ) -> Result<Inserted, Self::Error> {
        let result = match relation {
            Relation::Favorite => diesel::insert_into(favorites::table)
                .values((favorites::user_id.eq(actor), favorites::recipe_id.eq(target)))
                .execute(self.conn),
            Relation::ShoppingCart => diesel::insert_into(shopping_cart_items::table)
                .values((
                    shopping_cart_items::user_id.eq(actor),
                    shopping_cart_items::recipe_id.eq(target),
                ))
                .execute(self.conn),
            Relation::Subscription => diesel::insert_into(subscriptions::table)
                .values((
                    subscriptions::user_id.eq(actor),
                    subscriptions::author_id.eq(target),
                ))
                .execute(self.conn),
        };

        match result {
            Ok(_) => Ok(Inserted::Created),
            Err(e) if unique_violation(&e).is_some() => Ok(Inserted::AlreadyPresent),
            Err(e) => Err(e),
        }
    }

    fn remove(
        &mut self,
        relation: Relation,
        actor: Uuid,
        target: Uuid,
    ) -> Result<bool, Self::Error> {
        let deleted = match relation {
            Relation::Favorite => diesel::delete(
                favorites::table
                    .filter(favorites::user_id.eq(actor))
                    .filter(favorites::recipe_id.eq(target)),
            )
            .execute(self.conn)?,
            Relation::ShoppingCart => diesel::delete(
                shopping_cart_items::table
                    .filter(shopping_cart_items::user_id.eq(actor))
                    .filter(shopping_cart_items::recipe_id.eq(target)),
            )
            .execute(self.conn)?,
            Relation::Subscription => diesel::delete(
                subscriptions::table
                    .filter(subscriptions::user_id.eq(actor))
                    .filter(subscriptions::author_id.eq(target)),
            )
            .execute(self.conn)?,
        };
        Ok(deleted > 0)
    }
}
