//! Book repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD APIs over `tb_book`, the owner of the catalog links.
//! - Answer the inverse author/publisher views by foreign-key query.
//!
//! # Invariants
//! - Every read resolves author and publisher in the same `SELECT`.
//! - Writes return the re-read row, so callers always see resolved links.
//! - Linked author/publisher must already be persisted.

use super::store::{
    read_identity, read_text, reference_value, text_value, EntityStore, MappedEntity,
};
use super::{ensure_connection_ready, EntityListQuery, RepoError, RepoResult};
use crate::mapping::{EntityMapping, BOOK_MAPPING};
use crate::model::author::Author;
use crate::model::book::Book;
use crate::model::publisher::Publisher;
use crate::model::{AuthorId, BookId, EntityKind, PublisherId};
use rusqlite::types::Value;
use rusqlite::{Connection, Row};

// Relation field names in `BOOK_MAPPING`; they double as join aliases.
const AUTHOR_FIELD: &str = "author";
const PUBLISHER_FIELD: &str = "publisher";

impl MappedEntity for Book {
    const MAPPING: &'static EntityMapping = &BOOK_MAPPING;

    fn identity(&self) -> Option<i64> {
        self.id
    }

    fn assign_identity(&mut self, id: i64) {
        self.id = Some(id);
    }

    fn write_values(&self) -> RepoResult<Vec<Value>> {
        Ok(vec![
            text_value(self.title.as_deref()),
            text_value(self.description.as_deref()),
            reference_value(Self::MAPPING, AUTHOR_FIELD, self.author.as_ref())?,
            reference_value(Self::MAPPING, PUBLISHER_FIELD, self.publisher.as_ref())?,
        ])
    }

    fn read_aliased(row: &Row<'_>, alias: &str) -> RepoResult<Option<Self>> {
        let Some(id) = read_identity(row, Self::MAPPING, alias)? else {
            return Ok(None);
        };
        Ok(Some(Self {
            id: Some(id),
            title: read_text(row, alias, "title")?,
            description: read_text(row, alias, "description")?,
            author: Author::read_aliased(row, AUTHOR_FIELD)?,
            publisher: Publisher::read_aliased(row, PUBLISHER_FIELD)?,
        }))
    }
}

/// Repository interface for book CRUD and relationship queries.
pub trait BookRepository {
    /// Persists a new book and returns it re-read with resolved links.
    fn create_book(&self, book: Book) -> RepoResult<Book>;
    fn get_book(&self, id: BookId) -> RepoResult<Option<Book>>;
    /// Overwrites attributes and links of book `id`.
    fn update_book(&self, id: BookId, book: Book) -> RepoResult<Book>;
    fn delete_book(&self, id: BookId) -> RepoResult<()>;
    fn list_books(&self, query: &EntityListQuery) -> RepoResult<Vec<Book>>;
    fn count_books(&self) -> RepoResult<u64>;
    /// Inverse side of `Book.author`.
    fn list_books_by_author(&self, author_id: AuthorId) -> RepoResult<Vec<Book>>;
    /// Inverse side of `Book.publisher`.
    fn list_books_by_publisher(&self, publisher_id: PublisherId) -> RepoResult<Vec<Book>>;
}

/// SQLite-backed book repository.
pub struct SqliteBookRepository<'conn> {
    store: EntityStore<'conn>,
}

impl<'conn> SqliteBookRepository<'conn> {
    /// Constructs a repository; requires the author and publisher tables too.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &BOOK_MAPPING)?;
        Ok(Self {
            store: EntityStore::new(conn),
        })
    }

    fn reload(&self, id: BookId) -> RepoResult<Book> {
        self.store.find(id)?.ok_or(RepoError::NotFound {
            entity: EntityKind::Book,
            id,
        })
    }

    fn list_linked(&self, field: &str, id: i64) -> RepoResult<Vec<Book>> {
        let join_column = BOOK_MAPPING
            .relation(field)
            .and_then(|relation| relation.join_column())
            .ok_or_else(|| RepoError::InvalidData(format!("tb_book has no `{field}` link")))?;
        self.store
            .list(Some((join_column, id)), &EntityListQuery::default())
    }
}

impl BookRepository for SqliteBookRepository<'_> {
    fn create_book(&self, book: Book) -> RepoResult<Book> {
        let created = self.store.insert(book)?;
        match created.id {
            Some(id) => self.reload(id),
            None => Err(RepoError::InvalidData(
                "insert returned without identity".to_string(),
            )),
        }
    }

    fn get_book(&self, id: BookId) -> RepoResult<Option<Book>> {
        self.store.find(id)
    }

    fn update_book(&self, id: BookId, book: Book) -> RepoResult<Book> {
        self.store.update(id, book)?;
        self.reload(id)
    }

    fn delete_book(&self, id: BookId) -> RepoResult<()> {
        self.store.delete::<Book>(id)
    }

    fn list_books(&self, query: &EntityListQuery) -> RepoResult<Vec<Book>> {
        self.store.list(None, query)
    }

    fn count_books(&self) -> RepoResult<u64> {
        self.store.count::<Book>()
    }

    fn list_books_by_author(&self, author_id: AuthorId) -> RepoResult<Vec<Book>> {
        self.list_linked(AUTHOR_FIELD, author_id)
    }

    fn list_books_by_publisher(&self, publisher_id: PublisherId) -> RepoResult<Vec<Book>> {
        self.list_linked(PUBLISHER_FIELD, publisher_id)
    }
}
