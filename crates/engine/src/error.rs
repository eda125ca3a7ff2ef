//! The module contains the errors the engine can throw.
//!
//! Every variant maps to exactly one HTTP status in the server:
//!
//! - [`Invalid`], [`InvalidState`], [`Unavailable`], [`ExistingKey`] and
//!   [`InvalidCursor`] are client mistakes.
//! - [`Forbidden`] is thrown when the actor is not allowed to touch a
//!   resource that exists.
//! - [`KeyNotFound`] is thrown when a resource is missing (or hidden from the
//!   actor).
//!
//!  [`Invalid`]: EngineError::Invalid
//!  [`InvalidState`]: EngineError::InvalidState
//!  [`Unavailable`]: EngineError::Unavailable
//!  [`ExistingKey`]: EngineError::ExistingKey
//!  [`InvalidCursor`]: EngineError::InvalidCursor
//!  [`Forbidden`]: EngineError::Forbidden
//!  [`KeyNotFound`]: EngineError::KeyNotFound
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("{0}")]
    Invalid(String),
    #[error("{0}")]
    InvalidState(String),
    #[error("{0}")]
    Unavailable(String),
    #[error("{0} already present")]
    ExistingKey(String),
    #[error("Invalid cursor: {0}")]
    InvalidCursor(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0} not found")]
    KeyNotFound(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Invalid(a), Self::Invalid(b)) => a == b,
            (Self::InvalidState(a), Self::InvalidState(b)) => a == b,
            (Self::Unavailable(a), Self::Unavailable(b)) => a == b,
            (Self::ExistingKey(a), Self::ExistingKey(b)) => a == b,
            (Self::InvalidCursor(a), Self::InvalidCursor(b)) => a == b,
            (Self::Forbidden(a), Self::Forbidden(b)) => a == b,
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
