//! Author use-case service.
//!
//! # Responsibility
//! - Define the `AuthorService` contract for author lifecycle management.
//! - Provide a repository-backed implementation with structured logging.
//!
//! # Invariants
//! - Absence is always reported as `RepoError::NotFound`, never as a
//!   default value.
//! - Service logs carry identities and error codes only, never author names.

use crate::model::author::Author;
use crate::model::{AuthorId, EntityKind};
use crate::repo::author_repo::AuthorRepository;
use crate::repo::{RepoError, RepoResult};
use log::{info, warn};

/// Author lifecycle operations offered to presentation layers.
pub trait AuthorService {
    /// Persists `author`, which must not carry an identity yet.
    fn create_author(&self, author: Author) -> RepoResult<Author>;

    /// Looks up one author by identity.
    ///
    /// Despite the plural name this is a single-identity lookup.
    ///
    /// # Errors
    /// - `RepoError::NotFound` when no author has this identity.
    fn get_authors_by_ids(&self, id: AuthorId) -> RepoResult<Author>;

    /// Replaces the attributes of author `id` with those of `author`.
    ///
    /// # Errors
    /// - `RepoError::NotFound` when no author has this identity.
    fn update_author(&self, id: AuthorId, author: Author) -> RepoResult<Author>;

    /// Deletes author `id`; books written by it lose their author link.
    ///
    /// # Errors
    /// - `RepoError::NotFound` when no author has this identity, including
    ///   a second delete of the same id.
    fn delete_author(&self, id: AuthorId) -> RepoResult<()>;
}

/// `AuthorService` backed by an `AuthorRepository`.
pub struct CatalogAuthorService<R: AuthorRepository> {
    repo: R,
}

impl<R: AuthorRepository> CatalogAuthorService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }
}

impl<R: AuthorRepository> AuthorService for CatalogAuthorService<R> {
    fn create_author(&self, author: Author) -> RepoResult<Author> {
        let result = self.repo.create_author(author);
        log_outcome("author_create", result.as_ref().ok().and_then(Author::id), &result);
        result
    }

    fn get_authors_by_ids(&self, id: AuthorId) -> RepoResult<Author> {
        let result = self.repo.get_author(id).and_then(|found| {
            found.ok_or(RepoError::NotFound {
                entity: EntityKind::Author,
                id,
            })
        });
        log_outcome("author_get", Some(id), &result);
        result
    }

    fn update_author(&self, id: AuthorId, author: Author) -> RepoResult<Author> {
        let result = self.repo.update_author(id, author);
        log_outcome("author_update", Some(id), &result);
        result
    }

    fn delete_author(&self, id: AuthorId) -> RepoResult<()> {
        let result = self.repo.delete_author(id);
        log_outcome("author_delete", Some(id), &result);
        result
    }
}

fn log_outcome<T>(event: &str, id: Option<AuthorId>, result: &RepoResult<T>) {
    let id = id.map_or_else(|| "none".to_string(), |id| id.to_string());
    match result {
        Ok(_) => info!("event={event} module=service status=ok author_id={id}"),
        Err(err) => warn!(
            "event={event} module=service status=error author_id={id} error_code={}",
            err.code()
        ),
    }
}
