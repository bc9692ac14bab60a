use thiserror::Error;

use crate::toggle::Relation;

#[derive(Error, Debug)]
pub enum ToggleError<E> {
    #[error("Cannot subscribe to yourself")]
    SelfSubscription,

    #[error("{}", .0.already_present_message())]
    AlreadyPresent(Relation),

    #[error("{}", .0.not_present_message())]
    NotPresent(Relation),

    #[error("relation store failed")]
    Store(#[source] E),
}

/// A query string parameter that could not be interpreted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{param}: {message}")]
pub struct QueryError {
    pub param: String,
    pub message: String,
}

impl QueryError {
    pub fn new(param: &str, message: impl Into<String>) -> Self {
        Self {
            param: param.to_string(),
            message: message.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("CSV encoding failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV buffer could not be flushed: {0}")]
    Flush(String),
}
