//! Field-level validation for request payloads.
//!
//! Validators collect every problem instead of stopping at the first one, so
//! a client can show all messages next to the offending form fields.

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use uuid::Uuid;

pub const MAX_NAME_LENGTH: usize = 200;
pub const MAX_UNIT_LENGTH: usize = 150;
pub const MAX_EMAIL_LENGTH: usize = 254;
pub const MAX_USER_FIELD_LENGTH: usize = 150;
pub const MIN_PASSWORD_LENGTH: usize = 8;
pub const MIN_COOKING_TIME: i32 = 1;
pub const MIN_INGREDIENT_AMOUNT: i32 = 1;

static USERNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\w.@+-]+$").expect("valid username regex"));
static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email regex"));
static SLUG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-a-zA-Z0-9_]+$").expect("valid slug regex"));
static COLOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#[0-9a-fA-F]{6}$").expect("valid color regex"));

/// Messages keyed by field name. Serializes as `{"field": ["msg", ...]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            for message in messages {
                if !first {
                    f.write_str("; ")?;
                }
                write!(f, "{field}: {message}")?;
                first = false;
            }
        }
        Ok(())
    }
}

impl std::error::Error for FieldErrors {}

fn check_text(errors: &mut FieldErrors, field: &str, value: &str, max: Option<usize>) {
    if value.trim().is_empty() {
        errors.add(field, "This field may not be blank");
    } else if let Some(max) = max {
        if value.chars().count() > max {
            errors.add(field, format!("Ensure this field has no more than {max} characters"));
        }
    }
}

fn required(errors: &mut FieldErrors, field: &str) {
    errors.add(field, "This field is required");
}

/// One `{id, amount}` entry of a recipe payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngredientAmount {
    pub id: Uuid,
    pub amount: i32,
}

/// Whether absent fields are an error (create) or mean "unchanged" (update).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftMode {
    Create,
    Update,
}

#[derive(Debug, Clone, Default)]
pub struct RecipeDraft<'a> {
    pub name: Option<&'a str>,
    pub text: Option<&'a str>,
    pub image: Option<&'a str>,
    pub cooking_time: Option<i32>,
    pub tags: Option<&'a [Uuid]>,
    pub ingredients: Option<&'a [IngredientAmount]>,
}

pub fn validate_recipe(draft: &RecipeDraft<'_>, mode: DraftMode) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();
    let creating = mode == DraftMode::Create;

    for (field, value, max) in [
        ("name", draft.name, Some(MAX_NAME_LENGTH)),
        ("text", draft.text, None),
        ("image", draft.image, None),
    ] {
        match value {
            Some(value) => check_text(&mut errors, field, value, max),
            None if creating => required(&mut errors, field),
            None => {}
        }
    }

    match draft.cooking_time {
        Some(minutes) if minutes < MIN_COOKING_TIME => errors.add(
            "cooking_time",
            format!("Cooking time must be at least {MIN_COOKING_TIME} minute"),
        ),
        None if creating => required(&mut errors, "cooking_time"),
        _ => {}
    }

    match draft.tags {
        Some([]) => errors.add("tags", "Select at least one tag"),
        Some(tags) => {
            let mut seen = HashSet::new();
            if tags.iter().any(|id| !seen.insert(*id)) {
                errors.add("tags", "Tags must not repeat");
            }
        }
        None if creating => required(&mut errors, "tags"),
        None => {}
    }

    match draft.ingredients {
        Some([]) => errors.add("ingredients", "Add at least one ingredient"),
        Some(items) => {
            let mut seen = HashSet::new();
            if items.iter().any(|item| !seen.insert(item.id)) {
                errors.add("ingredients", "Ingredients must not repeat");
            }
            if items.iter().any(|item| item.amount < MIN_INGREDIENT_AMOUNT) {
                errors.add(
                    "ingredients",
                    format!("Amount must be at least {MIN_INGREDIENT_AMOUNT}"),
                );
            }
        }
        None if creating => required(&mut errors, "ingredients"),
        None => {}
    }

    errors.into_result()
}

#[derive(Debug, Clone, Copy)]
pub struct SignupDraft<'a> {
    pub email: &'a str,
    pub username: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub password: &'a str,
}

pub fn validate_signup(draft: &SignupDraft<'_>) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();

    check_text(&mut errors, "email", draft.email, Some(MAX_EMAIL_LENGTH));
    if !draft.email.trim().is_empty() && !EMAIL_RE.is_match(draft.email) {
        errors.add("email", "Enter a valid email address");
    }

    check_text(
        &mut errors,
        "username",
        draft.username,
        Some(MAX_USER_FIELD_LENGTH),
    );
    if !draft.username.is_empty() {
        if draft.username.eq_ignore_ascii_case("me") {
            errors.add("username", "The username \"me\" is reserved");
        } else if !USERNAME_RE.is_match(draft.username) {
            errors.add(
                "username",
                "Usernames may contain only letters, digits and @/./+/-/_",
            );
        }
    }

    check_text(
        &mut errors,
        "first_name",
        draft.first_name,
        Some(MAX_USER_FIELD_LENGTH),
    );
    check_text(
        &mut errors,
        "last_name",
        draft.last_name,
        Some(MAX_USER_FIELD_LENGTH),
    );
    check_password(&mut errors, "password", draft.password);

    errors.into_result()
}

pub fn validate_new_password(password: &str) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();
    check_password(&mut errors, "new_password", password);
    errors.into_result()
}

fn check_password(errors: &mut FieldErrors, field: &str, password: &str) {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        errors.add(
            field,
            format!("Password must contain at least {MIN_PASSWORD_LENGTH} characters"),
        );
    } else if password.chars().all(|c| c.is_ascii_digit()) {
        errors.add(field, "Password cannot be entirely numeric");
    }
}

pub fn validate_tag(name: &str, color: &str, slug: &str) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();
    check_text(&mut errors, "name", name, Some(MAX_NAME_LENGTH));
    if !COLOR_RE.is_match(color) {
        errors.add("color", "Color must be a hex value like #E26C2D");
    }
    check_text(&mut errors, "slug", slug, Some(MAX_NAME_LENGTH));
    if !slug.is_empty() && !SLUG_RE.is_match(slug) {
        errors.add("slug", "Slug may contain only latin letters, digits, - and _");
    }
    errors.into_result()
}

pub fn validate_ingredient(name: &str, measurement_unit: &str) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();
    check_text(&mut errors, "name", name, Some(MAX_NAME_LENGTH));
    check_text(
        &mut errors,
        "measurement_unit",
        measurement_unit,
        Some(MAX_UNIT_LENGTH),
    );
    errors.into_result()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_draft<'a>(tags: &'a [Uuid], ingredients: &'a [IngredientAmount]) -> RecipeDraft<'a> {
        RecipeDraft {
            name: Some("Borscht"),
            text: Some("Boil the beets."),
            image: Some("recipes/images/borscht.png"),
            cooking_time: Some(90),
            tags: Some(tags),
            ingredients: Some(ingredients),
        }
    }

    #[test]
    fn complete_recipe_passes() {
        let tags = [Uuid::new_v4()];
        let ingredients = [IngredientAmount {
            id: Uuid::new_v4(),
            amount: 3,
        }];
        assert!(validate_recipe(&full_draft(&tags, &ingredients), DraftMode::Create).is_ok());
    }

    #[test]
    fn create_requires_every_field() {
        let errors = validate_recipe(&RecipeDraft::default(), DraftMode::Create).unwrap_err();
        for field in ["name", "text", "image", "cooking_time", "tags", "ingredients"] {
            assert!(errors.get(field).is_some(), "missing error for {field}");
        }
    }

    #[test]
    fn update_accepts_partial_payload() {
        let draft = RecipeDraft {
            cooking_time: Some(5),
            ..Default::default()
        };
        assert!(validate_recipe(&draft, DraftMode::Update).is_ok());
    }

    #[test]
    fn zero_amount_and_cooking_time_are_rejected() {
        let tags = [Uuid::new_v4()];
        let ingredients = [IngredientAmount {
            id: Uuid::new_v4(),
            amount: 0,
        }];
        let mut draft = full_draft(&tags, &ingredients);
        draft.cooking_time = Some(0);

        let errors = validate_recipe(&draft, DraftMode::Create).unwrap_err();
        assert!(errors.get("ingredients").is_some());
        assert!(errors.get("cooking_time").is_some());
    }

    #[test]
    fn empty_and_repeated_ingredients_are_rejected() {
        let tags = [Uuid::new_v4()];
        let errors = validate_recipe(&full_draft(&tags, &[]), DraftMode::Create).unwrap_err();
        assert_eq!(
            errors.get("ingredients"),
            Some(&["Add at least one ingredient".to_string()][..])
        );

        let id = Uuid::new_v4();
        let repeated = [
            IngredientAmount { id, amount: 1 },
            IngredientAmount { id, amount: 2 },
        ];
        let errors = validate_recipe(&full_draft(&tags, &repeated), DraftMode::Update).unwrap_err();
        assert!(errors.get("ingredients").is_some());
    }

    #[test]
    fn signup_rules() {
        let ok = SignupDraft {
            email: "vasya@example.com",
            username: "vasya.pupkin",
            first_name: "Vasya",
            last_name: "Pupkin",
            password: "Qwerty123!",
        };
        assert!(validate_signup(&ok).is_ok());

        let bad = SignupDraft {
            email: "not-an-email",
            username: "me",
            password: "12345678",
            ..ok
        };
        let errors = validate_signup(&bad).unwrap_err();
        assert!(errors.get("email").is_some());
        assert!(errors.get("username").is_some());
        assert!(errors.get("password").is_some());
        assert!(errors.get("first_name").is_none());
    }

    #[test]
    fn username_allows_unicode_word_characters() {
        let draft = SignupDraft {
            email: "a@b.ru",
            username: "повар_42",
            first_name: "a",
            last_name: "b",
            password: "long enough",
        };
        assert!(validate_signup(&draft).is_ok());

        let draft = SignupDraft {
            username: "bad name",
            ..draft
        };
        assert!(validate_signup(&draft).is_err());
    }

    #[test]
    fn tag_color_and_slug_formats() {
        assert!(validate_tag("Breakfast", "#E26C2D", "breakfast").is_ok());
        let errors = validate_tag("Breakfast", "red", "завтрак").unwrap_err();
        assert!(errors.get("color").is_some());
        assert!(errors.get("slug").is_some());
    }

    #[test]
    fn ingredient_name_and_unit_required() {
        let errors = validate_ingredient("", " ").unwrap_err();
        assert!(errors.get("name").is_some());
        assert!(errors.get("measurement_unit").is_some());
    }

    #[test]
    fn display_joins_messages() {
        let mut errors = FieldErrors::single("name", "too long");
        errors.add("slug", "bad");
        assert_eq!(errors.to_string(), "name: too long; slug: bad");
    }
}
