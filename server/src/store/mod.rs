//! Explicit diesel queries used by the handlers.
//!
//! Handlers never build queries that span more than one table themselves;
//! everything that joins, batches or filters lives here and returns typed rows.

pub mod cart;
pub mod ingredients;
pub mod recipes;
pub mod relations;
pub mod users;

use diesel::result::{DatabaseErrorKind, Error};

/// Name of the unique constraint `err` violated, if that is what it is.
pub fn unique_violation(err: &Error) -> Option<&str> {
    match err {
        Error::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            Some(info.constraint_name().unwrap_or_default())
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests;
