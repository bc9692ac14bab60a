//! Add/remove semantics shared by favorites, shopping cart and subscriptions.

use ladle_core::{toggle, MemoryRelations, Relation, ToggleAction, ToggleError, Toggled};
use uuid::Uuid;

const RECIPE_RELATIONS: [Relation; 2] = [Relation::Favorite, Relation::ShoppingCart];

#[test]
fn second_add_fails_until_removed() {
    for relation in RECIPE_RELATIONS {
        let mut store = MemoryRelations::new();
        let user = Uuid::new_v4();
        let recipe = Uuid::new_v4();

        let first = toggle(&mut store, relation, ToggleAction::Add, user, recipe);
        assert_eq!(first.unwrap(), Toggled::Added);

        let second = toggle(&mut store, relation, ToggleAction::Add, user, recipe);
        assert!(matches!(second, Err(ToggleError::AlreadyPresent(r)) if r == relation));
        assert!(store.contains(relation, user, recipe));
        assert_eq!(store.len(), 1);

        let removed = toggle(&mut store, relation, ToggleAction::Remove, user, recipe);
        assert_eq!(removed.unwrap(), Toggled::Removed);

        let again = toggle(&mut store, relation, ToggleAction::Add, user, recipe);
        assert_eq!(again.unwrap(), Toggled::Added);
    }
}

#[test]
fn removing_missing_relation_is_an_error() {
    let mut store = MemoryRelations::new();
    let user = Uuid::new_v4();
    let target = Uuid::new_v4();

    for relation in [
        Relation::Favorite,
        Relation::ShoppingCart,
        Relation::Subscription,
    ] {
        let result = toggle(&mut store, relation, ToggleAction::Remove, user, target);
        let err = result.unwrap_err();
        assert!(matches!(err, ToggleError::NotPresent(r) if r == relation));
        assert_eq!(err.to_string(), relation.not_present_message());
    }
    assert!(store.is_empty());
}

#[test]
fn repeated_remove_keeps_failing() {
    let mut store = MemoryRelations::new();
    let user = Uuid::new_v4();
    let recipe = Uuid::new_v4();

    toggle(&mut store, Relation::Favorite, ToggleAction::Add, user, recipe).unwrap();
    toggle(&mut store, Relation::Favorite, ToggleAction::Remove, user, recipe).unwrap();
    for _ in 0..3 {
        let result = toggle(&mut store, Relation::Favorite, ToggleAction::Remove, user, recipe);
        assert!(matches!(result, Err(ToggleError::NotPresent(_))));
    }
    assert!(store.is_empty());
}

#[test]
fn self_subscription_is_always_rejected() {
    let mut store = MemoryRelations::new();
    let user = Uuid::new_v4();

    for action in [ToggleAction::Add, ToggleAction::Remove, ToggleAction::Add] {
        let result = toggle(&mut store, Relation::Subscription, action, user, user);
        let err = result.unwrap_err();
        assert!(matches!(err, ToggleError::SelfSubscription));
        assert_eq!(err.to_string(), "Cannot subscribe to yourself");
    }
    assert!(store.is_empty());
}

#[test]
fn subscription_is_directional() {
    let mut store = MemoryRelations::new();
    let follower = Uuid::new_v4();
    let author = Uuid::new_v4();

    toggle(
        &mut store,
        Relation::Subscription,
        ToggleAction::Add,
        follower,
        author,
    )
    .unwrap();

    let reverse = toggle(
        &mut store,
        Relation::Subscription,
        ToggleAction::Add,
        author,
        follower,
    );
    assert_eq!(reverse.unwrap(), Toggled::Added);
    assert_eq!(store.len(), 2);
}

#[test]
fn users_do_not_share_relations() {
    let mut store = MemoryRelations::new();
    let recipe = Uuid::new_v4();
    let alice = Uuid::new_v4();
    let bob = Uuid::new_v4();

    toggle(&mut store, Relation::ShoppingCart, ToggleAction::Add, alice, recipe).unwrap();
    let bob_remove = toggle(&mut store, Relation::ShoppingCart, ToggleAction::Remove, bob, recipe);
    assert!(bob_remove.is_err());
    assert!(store.contains(Relation::ShoppingCart, alice, recipe));
}
