//! Author entity.
//!
//! # Invariants
//! - `id` is `None` until the record is persisted, then fixed.
//! - The author's books are not stored here; they are derived from
//!   `tb_book.author_id` by `BookRepository::list_books_by_author`.

use super::AuthorId;
use serde::{Deserialize, Serialize};

/// Catalog author record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    /// Assigned by the store; create rejects values that already carry one.
    pub(crate) id: Option<AuthorId>,
    pub(crate) name: Option<String>,
}

impl Author {
    /// Creates an unsaved author with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: Some(name.into()),
        }
    }

    pub fn id(&self) -> Option<AuthorId> {
        self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_name(&mut self, name: Option<String>) {
        self.name = name;
    }
}
