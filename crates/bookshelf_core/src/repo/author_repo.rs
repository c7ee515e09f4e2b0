//! Author repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD APIs over `tb_author`.
//!
//! # Invariants
//! - Deleting an author clears `tb_book.author_id` on its books
//!   (`ON DELETE SET NULL`); books are never deleted with it.

use super::store::{read_identity, read_text, text_value, EntityStore, MappedEntity};
use super::{ensure_connection_ready, EntityListQuery, RepoResult};
use crate::mapping::{EntityMapping, AUTHOR_MAPPING};
use crate::model::author::Author;
use crate::model::AuthorId;
use rusqlite::types::Value;
use rusqlite::{Connection, Row};

impl MappedEntity for Author {
    const MAPPING: &'static EntityMapping = &AUTHOR_MAPPING;

    fn identity(&self) -> Option<i64> {
        self.id
    }

    fn assign_identity(&mut self, id: i64) {
        self.id = Some(id);
    }

    fn write_values(&self) -> RepoResult<Vec<Value>> {
        Ok(vec![text_value(self.name.as_deref())])
    }

    fn read_aliased(row: &Row<'_>, alias: &str) -> RepoResult<Option<Self>> {
        let Some(id) = read_identity(row, Self::MAPPING, alias)? else {
            return Ok(None);
        };
        Ok(Some(Self {
            id: Some(id),
            name: read_text(row, alias, "name")?,
        }))
    }
}

/// Repository interface for author CRUD operations.
pub trait AuthorRepository {
    /// Persists a new author and returns it with its assigned identity.
    fn create_author(&self, author: Author) -> RepoResult<Author>;
    fn get_author(&self, id: AuthorId) -> RepoResult<Option<Author>>;
    /// Overwrites the attributes of author `id`.
    fn update_author(&self, id: AuthorId, author: Author) -> RepoResult<Author>;
    fn delete_author(&self, id: AuthorId) -> RepoResult<()>;
    fn list_authors(&self, query: &EntityListQuery) -> RepoResult<Vec<Author>>;
    fn count_authors(&self) -> RepoResult<u64>;
}

/// SQLite-backed author repository.
pub struct SqliteAuthorRepository<'conn> {
    store: EntityStore<'conn>,
}

impl<'conn> SqliteAuthorRepository<'conn> {
    /// Constructs a repository from a bootstrapped connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &AUTHOR_MAPPING)?;
        Ok(Self {
            store: EntityStore::new(conn),
        })
    }
}

impl AuthorRepository for SqliteAuthorRepository<'_> {
    fn create_author(&self, author: Author) -> RepoResult<Author> {
        self.store.insert(author)
    }

    fn get_author(&self, id: AuthorId) -> RepoResult<Option<Author>> {
        self.store.find(id)
    }

    fn update_author(&self, id: AuthorId, author: Author) -> RepoResult<Author> {
        self.store.update(id, author)
    }

    fn delete_author(&self, id: AuthorId) -> RepoResult<()> {
        self.store.delete::<Author>(id)
    }

    fn list_authors(&self, query: &EntityListQuery) -> RepoResult<Vec<Author>> {
        self.store.list(None, query)
    }

    fn count_authors(&self) -> RepoResult<u64> {
        self.store.count::<Author>()
    }
}
