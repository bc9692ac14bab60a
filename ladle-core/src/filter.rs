//! Query-string filters for recipe and ingredient listings.

use uuid::Uuid;

use crate::access::Actor;
use crate::error::QueryError;
use crate::pagination::PageParams;

/// Recipe list parameters parsed from `key=value` pairs.
///
/// `tags` may repeat; a recipe matches when it carries any of them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeQuery {
    pub tags: Vec<String>,
    pub author: Option<Uuid>,
    pub is_favorited: Option<bool>,
    pub is_in_shopping_cart: Option<bool>,
    pub page: PageParams,
}

/// How a per-user relation narrows the listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Membership {
    /// No narrowing.
    Any,
    /// Only recipes related to this user.
    Only(Uuid),
    /// Every recipe except those related to this user.
    Exclude(Uuid),
}

/// Filter ready to be turned into a storage query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeFilter {
    pub tags: Vec<String>,
    pub author: Option<Uuid>,
    pub favorited: Membership,
    pub in_cart: Membership,
}

impl RecipeQuery {
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self, QueryError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut query = RecipeQuery::default();

        for (key, value) in pairs {
            let key = key.as_ref();
            let value = value.as_ref().trim();
            if value.is_empty() {
                continue;
            }
            match key {
                "tags" => {
                    if !query.tags.iter().any(|t| t == value) {
                        query.tags.push(value.to_string());
                    }
                }
                "author" => {
                    let id = Uuid::parse_str(value)
                        .map_err(|_| QueryError::new(key, "Must be a valid user id"))?;
                    query.author = Some(id);
                }
                "is_favorited" => query.is_favorited = Some(parse_flag(key, value)?),
                "is_in_shopping_cart" => query.is_in_shopping_cart = Some(parse_flag(key, value)?),
                "limit" => query.page.limit = Some(parse_number(key, value)?),
                "offset" => query.page.offset = Some(parse_number(key, value)?),
                "page" => query.page.page = Some(parse_number(key, value)?),
                _ => {}
            }
        }

        Ok(query)
    }

    /// Bind the per-user flags to `actor`. Anonymous callers get no narrowing.
    pub fn resolve(&self, actor: &Actor) -> RecipeFilter {
        RecipeFilter {
            tags: self.tags.clone(),
            author: self.author,
            favorited: membership(self.is_favorited, actor),
            in_cart: membership(self.is_in_shopping_cart, actor),
        }
    }
}

fn membership(flag: Option<bool>, actor: &Actor) -> Membership {
    match (flag, actor.user_id()) {
        (Some(true), Some(id)) => Membership::Only(id),
        (Some(false), Some(id)) => Membership::Exclude(id),
        _ => Membership::Any,
    }
}

fn parse_flag(key: &str, value: &str) -> Result<bool, QueryError> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(QueryError::new(key, "Must be a boolean (1/0, true/false)")),
    }
}

fn parse_number(key: &str, value: &str) -> Result<i64, QueryError> {
    value
        .parse()
        .map_err(|_| QueryError::new(key, "Must be an integer"))
}

/// LIKE pattern matching names that start with `prefix`.
///
/// `%`, `_` and the escape character itself are matched literally.
pub fn prefix_pattern(prefix: &str) -> String {
    let mut pattern = String::with_capacity(prefix.len() + 1);
    for c in prefix.trim().chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(pairs: &[(&str, &str)]) -> RecipeQuery {
        RecipeQuery::from_pairs(pairs.iter().copied()).unwrap()
    }

    #[test]
    fn repeated_tags_are_collected() {
        let query = parse(&[("tags", "breakfast"), ("tags", "lunch"), ("tags", "breakfast")]);
        assert_eq!(query.tags, vec!["breakfast", "lunch"]);
    }

    #[test]
    fn author_must_be_uuid() {
        let err = RecipeQuery::from_pairs([("author", "42")]).unwrap_err();
        assert_eq!(err.param, "author");
    }

    #[test]
    fn boolean_flags_accept_numeric_and_words() {
        let query = parse(&[("is_favorited", "1"), ("is_in_shopping_cart", "False")]);
        assert_eq!(query.is_favorited, Some(true));
        assert_eq!(query.is_in_shopping_cart, Some(false));

        let err = RecipeQuery::from_pairs([("is_favorited", "maybe")]).unwrap_err();
        assert_eq!(err.param, "is_favorited");
    }

    #[test]
    fn empty_and_unknown_params_are_ignored() {
        let query = parse(&[("tags", ""), ("author", " "), ("ordering", "-name")]);
        assert_eq!(query, RecipeQuery::default());
    }

    #[test]
    fn pagination_params_are_parsed() {
        let query = parse(&[("limit", "12"), ("page", "2")]);
        assert_eq!(query.page.window().offset, 12);
        assert!(RecipeQuery::from_pairs([("limit", "ten")]).is_err());
    }

    #[test]
    fn false_flag_excludes_for_authenticated_user() {
        let id = Uuid::new_v4();
        let actor = Actor::User {
            id,
            is_admin: false,
        };
        let filter = parse(&[("is_favorited", "0"), ("is_in_shopping_cart", "1")]).resolve(&actor);
        assert_eq!(filter.favorited, Membership::Exclude(id));
        assert_eq!(filter.in_cart, Membership::Only(id));
    }

    #[test]
    fn flags_are_noops_for_anonymous_callers() {
        let filter = parse(&[("is_favorited", "1"), ("is_in_shopping_cart", "0")])
            .resolve(&Actor::Anonymous);
        assert_eq!(filter.favorited, Membership::Any);
        assert_eq!(filter.in_cart, Membership::Any);
    }

    #[test]
    fn prefix_pattern_escapes_wildcards() {
        assert_eq!(prefix_pattern("пив"), "пив%");
        assert_eq!(prefix_pattern("50%_"), "50\\%\\_%");
        assert_eq!(prefix_pattern("  salt "), "salt%");
    }
}
