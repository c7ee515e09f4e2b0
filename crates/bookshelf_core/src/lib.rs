//! Core catalog logic for Bookshelf.
//! Entities, their persistence mapping and the author service contract.

pub mod config;
pub mod db;
pub mod logging;
pub mod mapping;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{CatalogConfig, ConfigError};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use mapping::{
    EntityMapping, FetchMode, MappingError, OnDelete, RelationKind, AUTHOR_MAPPING, BOOK_MAPPING,
    PUBLISHER_MAPPING,
};
pub use model::author::Author;
pub use model::book::Book;
pub use model::publisher::Publisher;
pub use model::{AuthorId, BookId, EntityKind, PublisherId};
pub use repo::author_repo::{AuthorRepository, SqliteAuthorRepository};
pub use repo::book_repo::{BookRepository, SqliteBookRepository};
pub use repo::publisher_repo::{PublisherRepository, SqlitePublisherRepository};
pub use repo::{EntityListQuery, RepoError, RepoResult};
pub use service::author_service::{AuthorService, CatalogAuthorService};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
