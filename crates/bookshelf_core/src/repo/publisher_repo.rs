//! Publisher repository contracts and SQLite implementation.
//!
//! # Invariants
//! - Deleting a publisher clears `tb_book.publisher_id` on its books.

use super::store::{read_identity, read_text, text_value, EntityStore, MappedEntity};
use super::{ensure_connection_ready, EntityListQuery, RepoResult};
use crate::mapping::{EntityMapping, PUBLISHER_MAPPING};
use crate::model::publisher::Publisher;
use crate::model::PublisherId;
use rusqlite::types::Value;
use rusqlite::{Connection, Row};

impl MappedEntity for Publisher {
    const MAPPING: &'static EntityMapping = &PUBLISHER_MAPPING;

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

/// Repository interface for publisher CRUD operations.
pub trait PublisherRepository {
    fn create_publisher(&self, publisher: Publisher) -> RepoResult<Publisher>;
    fn get_publisher(&self, id: PublisherId) -> RepoResult<Option<Publisher>>;
    fn update_publisher(&self, id: PublisherId, publisher: Publisher) -> RepoResult<Publisher>;
    fn delete_publisher(&self, id: PublisherId) -> RepoResult<()>;
    fn list_publishers(&self, query: &EntityListQuery) -> RepoResult<Vec<Publisher>>;
    fn count_publishers(&self) -> RepoResult<u64>;
}

/// SQLite-backed publisher repository.
pub struct SqlitePublisherRepository<'conn> {
    store: EntityStore<'conn>,
}

impl<'conn> SqlitePublisherRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &PUBLISHER_MAPPING)?;
        Ok(Self {
            store: EntityStore::new(conn),
        })
    }
}

impl PublisherRepository for SqlitePublisherRepository<'_> {
    fn create_publisher(&self, publisher: Publisher) -> RepoResult<Publisher> {
        self.store.insert(publisher)
    }

    fn get_publisher(&self, id: PublisherId) -> RepoResult<Option<Publisher>> {
        self.store.find(id)
    }

    fn update_publisher(&self, id: PublisherId, publisher: Publisher) -> RepoResult<Publisher> {
        self.store.update(id, publisher)
    }

    fn delete_publisher(&self, id: PublisherId) -> RepoResult<()> {
        self.store.delete::<Publisher>(id)
    }

    fn list_publishers(&self, query: &EntityListQuery) -> RepoResult<Vec<Publisher>> {
        self.store.list(None, query)
    }

    fn count_publishers(&self) -> RepoResult<u64> {
        self.store.count::<Publisher>()
    }
}
