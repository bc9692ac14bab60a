//! Add/remove operations on uniqueness-constrained join rows.
//!
//! Favorites, shopping cart entries and subscriptions all behave the same
//! way: adding an existing relation or removing a missing one is an error,
//! never a silent success. The store reports whether an insert created a row
//! or hit the uniqueness constraint, so there is no separate existence check
//! that could race with a concurrent request.

use std::collections::HashSet;
use std::fmt;

use uuid::Uuid;

use crate::error::ToggleError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Relation {
    /// user -> recipe
    Favorite,
    /// user -> recipe
    ShoppingCart,
    /// follower -> author
    Subscription,
}

impl Relation {
    pub fn already_present_message(self) -> &'static str {
        match self {
            Relation::Favorite => "Recipe is already in favorites",
            Relation::ShoppingCart => "Recipe is already in the shopping cart",
            Relation::Subscription => "Already subscribed to this author",
        }
    }

    pub fn not_present_message(self) -> &'static str {
        match self {
            Relation::Favorite => "Recipe is not in favorites",
            Relation::ShoppingCart => "Recipe is not in the shopping cart",
            Relation::Subscription => "Not subscribed to this author",
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Relation::Favorite => "favorite",
            Relation::ShoppingCart => "shopping_cart",
            Relation::Subscription => "subscription",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleAction {
    Add,
    Remove,
}

/// Result of attempting to insert a relation row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Inserted {
    Created,
    AlreadyPresent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggled {
    Added,
    Removed,
}

/// Storage for relation rows keyed by (actor, target).
pub trait RelationStore {
    type Error;

    /// Insert the row, reporting a uniqueness violation as `AlreadyPresent`.
    fn insert(
        &mut self,
        relation: Relation,
        actor: Uuid,
        target: Uuid,
    ) -> Result<Inserted, Self::Error>;

    /// Delete the row, returning whether one existed.
    fn remove(&mut self, relation: Relation, actor: Uuid, target: Uuid)
        -> Result<bool, Self::Error>;
}

/// Apply `action` to the (actor, target) relation.
pub fn toggle<S: RelationStore>(
    store: &mut S,
    relation: Relation,
    action: ToggleAction,
    actor: Uuid,
    target: Uuid,
) -> Result<Toggled, ToggleError<S::Error>> {
    if relation == Relation::Subscription && actor == target {
        return Err(ToggleError::SelfSubscription);
    }

    match action {
        ToggleAction::Add => match store
            .insert(relation, actor, target)
            .map_err(ToggleError::Store)?
        {
            Inserted::Created => Ok(Toggled::Added),
            Inserted::AlreadyPresent => Err(ToggleError::AlreadyPresent(relation)),
        },
        ToggleAction::Remove => {
            if store
                .remove(relation, actor, target)
                .map_err(ToggleError::Store)?
            {
                Ok(Toggled::Removed)
            } else {
                Err(ToggleError::NotPresent(relation))
            }
        }
    }
}

/// In-memory relation store.
#[derive(Debug, Default)]
pub struct MemoryRelations {
    rows: HashSet<(Relation, Uuid, Uuid)>,
}

impl MemoryRelations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, relation: Relation, actor: Uuid, target: Uuid) -> bool {
        self.rows.contains(&(relation, actor, target))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl RelationStore for MemoryRelations {
    type Error = std::convert::Infallible;

    fn insert(
        &mut self,
        relation: Relation,
        actor: Uuid,
        target: Uuid,
    ) -> Result<Inserted, Self::Error> {
        if self.rows.insert((relation, actor, target)) {
            Ok(Inserted::Created)
        } else {
            Ok(Inserted::AlreadyPresent)
        }
    }

    fn remove(
        &mut self,
        relation: Relation,
        actor: Uuid,
        target: Uuid,
    ) -> Result<bool, Self::Error> {
        Ok(self.rows.remove(&(relation, actor, target)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_relation_state() {
        assert_eq!(
            Relation::ShoppingCart.already_present_message(),
            "Recipe is already in the shopping cart"
        );
        assert_eq!(
            Relation::Subscription.not_present_message(),
            "Not subscribed to this author"
        );
    }

    #[test]
    fn relations_are_independent() {
        let mut store = MemoryRelations::new();
        let user = Uuid::new_v4();
        let recipe = Uuid::new_v4();

        toggle(&mut store, Relation::Favorite, ToggleAction::Add, user, recipe).unwrap();
        let cart = toggle(
            &mut store,
            Relation::ShoppingCart,
            ToggleAction::Add,
            user,
            recipe,
        );
        assert_eq!(cart.unwrap(), Toggled::Added);
        assert_eq!(store.len(), 2);
    }
}
