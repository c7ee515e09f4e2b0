//! Book entity.
//!
//! # Responsibility
//! - Own the catalog relationships: one optional author, one optional
//!   publisher.
//!
//! # Invariants
//! - `id` is `None` until the record is persisted, then fixed.
//! - A book read from storage carries fully resolved `Author`/`Publisher`
//!   values, never bare foreign keys.
//! - Referenced entities must be persisted before the book is written.

use super::author::Author;
use super::publisher::Publisher;
use super::BookId;
use serde::{Deserialize, Serialize};

/// Catalog book record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub(crate) id: Option<BookId>,
    pub(crate) title: Option<String>,
    pub(crate) description: Option<String>,
    /// Stored as `tb_book.author_id`.
    pub(crate) author: Option<Author>,
    /// Stored as `tb_book.publisher_id`.
    pub(crate) publisher: Option<Publisher>,
}

impl Book {
    /// Creates an unsaved book with the given title and no relationships.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    pub fn id(&self) -> Option<BookId> {
        self.id
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn set_title(&mut self, title: Option<String>) {
        self.title = title;
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn set_description(&mut self, description: Option<String>) {
        self.description = description;
    }

    pub fn author(&self) -> Option<&Author> {
        self.author.as_ref()
    }

    pub fn set_author(&mut self, author: Option<Author>) {
        self.author = author;
    }

    pub fn publisher(&self) -> Option<&Publisher> {
        self.publisher.as_ref()
    }

    pub fn set_publisher(&mut self, publisher: Option<Publisher>) {
        self.publisher = publisher;
    }
}
