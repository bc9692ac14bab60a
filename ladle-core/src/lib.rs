//! Domain rules for Ladle that do not touch the network or the database.

pub mod access;
pub mod error;
pub mod filter;
pub mod pagination;
pub mod shopping_list;
pub mod toggle;
pub mod validation;

pub use access::{Actor, Denied, Policy};
pub use error::{ExportError, QueryError, ToggleError};
pub use filter::{prefix_pattern, Membership, RecipeFilter, RecipeQuery};
pub use pagination::{PageParams, Window};
pub use shopping_list::{aggregate, render_csv, CartRow, ShoppingListEntry};
pub use toggle::{
    toggle, Inserted, MemoryRelations, Relation, RelationStore, ToggleAction, Toggled,
};
pub use validation::FieldErrors;
