//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts per entity.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Repository APIs return semantic errors (`NotFound`,
//!   `ConstraintViolation`) distinct from storage transport errors.
//! - Reads return `Option`; writes and deletes on a missing row return
//!   `NotFound`.

use crate::db::DbError;
use crate::mapping::EntityMapping;
use crate::model::EntityKind;
use rusqlite::{Connection, ErrorCode};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod author_repo;
pub mod book_repo;
pub mod publisher_repo;
mod store;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error shared by every catalog entity.
#[derive(Debug)]
pub enum RepoError {
    /// Storage unreachable or failing outside of constraint checks.
    Db(DbError),
    /// No row with this identity.
    NotFound { entity: EntityKind, id: i64 },
    /// SQLite rejected a write because of a schema constraint.
    ConstraintViolation(String),
    /// Create was called with an entity that is already persisted.
    IdentityAlreadyAssigned { entity: EntityKind, id: i64 },
    /// A relationship points at an entity that has not been persisted.
    UnsavedReference {
        entity: EntityKind,
        field: &'static str,
    },
    InvalidData(String),
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
    ForeignKeysDisabled,
}

impl RepoError {
    /// Stable machine-readable code for log events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Db(_) => "db_error",
            Self::NotFound { .. } => "not_found",
            Self::ConstraintViolation(_) => "constraint_violation",
            Self::IdentityAlreadyAssigned { .. } => "identity_already_assigned",
            Self::UnsavedReference { .. } => "unsaved_reference",
            Self::InvalidData(_) => "invalid_data",
            Self::MissingRequiredTable(_) | Self::MissingRequiredColumn { .. } => "schema_missing",
            Self::ForeignKeysDisabled => "foreign_keys_disabled",
        }
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound { entity, id } => write!(f, "{entity} not found: {id}"),
            Self::ConstraintViolation(message) => write!(f, "constraint violation: {message}"),
            Self::IdentityAlreadyAssigned { entity, id } => {
                write!(f, "{entity} already has identity {id}; create expects a new record")
            }
            Self::UnsavedReference { entity, field } => {
                write!(f, "{entity}.{field} references a record without identity")
            }
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::MissingRequiredTable(table) => write!(f, "required table missing: {table}"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column missing: {table}.{column}")
            }
            Self::ForeignKeysDisabled => write!(f, "connection has foreign_keys disabled"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        if value.sqlite_error_code() == Some(ErrorCode::ConstraintViolation) {
            return Self::ConstraintViolation(value.to_string());
        }
        Self::Db(DbError::Sqlite(value))
    }
}

/// Pagination for list queries. Rows are ordered by identity ascending.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntityListQuery {
    pub limit: Option<u32>,
    pub offset: u32,
}

/// Verifies the connection can serve `mapping` and its eager relations.
pub(crate) fn ensure_connection_ready(
    conn: &Connection,
    mapping: &'static EntityMapping,
) -> RepoResult<()> {
    let foreign_keys: i64 = conn.query_row("PRAGMA foreign_keys;", [], |row| row.get(0))?;
    if foreign_keys != 1 {
        return Err(RepoError::ForeignKeysDisabled);
    }

    ensure_table_ready(conn, mapping)?;
    for relation in mapping.eager_relations() {
        ensure_table_ready(conn, crate::mapping::mapping_for(relation.target))?;
    }

    Ok(())
}

fn ensure_table_ready(conn: &Connection, mapping: &'static EntityMapping) -> RepoResult<()> {
    if !table_exists(conn, mapping.table)? {
        return Err(RepoError::MissingRequiredTable(mapping.table));
    }

    for column in mapping.stored_columns() {
        if !table_has_column(conn, mapping.table, column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: mapping.table,
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
