//! Catalog domain model.
//!
//! # Responsibility
//! - Define the record types persisted by the catalog: authors, books and
//!   publishers.
//! - Name each entity kind for mapping, logging and error reporting.
//!
//! # Invariants
//! - Identity is assigned by the persistence layer only and never changes.
//! - Relationships are stored on the owning side (`Book`) only.

pub mod author;
pub mod book;
pub mod publisher;

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Identity of a persisted author row.
pub type AuthorId = i64;
/// Identity of a persisted book row.
pub type BookId = i64;
/// Identity of a persisted publisher row.
pub type PublisherId = i64;

/// Discriminates the mapped entity types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Author,
    Book,
    Publisher,
}

impl EntityKind {
    /// Stable lowercase name used in log events and error messages.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Author => "author",
            Self::Book => "book",
            Self::Publisher => "publisher",
        }
    }
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
