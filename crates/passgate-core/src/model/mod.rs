//! Core data model: requests, actors, and submission drafts.

pub mod actor;
pub mod draft;
pub mod request;

pub use actor::{Actor, ActorId, Role};
pub use draft::DraftRequest;
pub use request::{EditableField, FieldValueError, Request, RequestId, Status};

use std::fmt;

/// Error returned when parsing an enum value from text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseEnumError {
    pub expected: &'static str,
    pub got: String,
}

impl fmt::Display for ParseEnumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid {}: '{}'", self.expected, self.got)
    }
}

impl std::error::Error for ParseEnumError {}
