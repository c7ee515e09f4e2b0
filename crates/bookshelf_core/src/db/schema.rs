//! Catalog schema bootstrap.
//!
//! # Responsibility
//! - Render and apply `CREATE TABLE` statements for every catalog mapping.
//! - Stamp and check the schema version.
//!
//! # Invariants
//! - Bootstrap is idempotent: reopening a database leaves rows untouched.
//! - A database stamped with a newer version is never written to.
//! - Tables are created referenced-first so foreign keys resolve.

use crate::db::{DbError, DbResult};
use crate::mapping::{validate_mappings, CATALOG_MAPPINGS};
use rusqlite::Connection;

/// Schema version written to `PRAGMA user_version`.
pub const SCHEMA_VERSION: u32 = 1;

/// Renders the full catalog DDL in dependency order.
pub fn catalog_schema_sql() -> String {
    CATALOG_MAPPINGS
        .iter()
        .map(|mapping| mapping.create_table_sql())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Creates missing catalog tables and stamps `SCHEMA_VERSION`.
pub fn ensure_schema(conn: &mut Connection) -> DbResult<()> {
    validate_mappings(CATALOG_MAPPINGS)?;

    let current_version = schema_version(conn)?;
    if current_version > SCHEMA_VERSION {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: current_version,
            latest_supported: SCHEMA_VERSION,
        });
    }

    let tx = conn.transaction()?;
    tx.execute_batch(&catalog_schema_sql())?;
    if current_version < SCHEMA_VERSION {
        tx.execute_batch(&format!("PRAGMA user_version = {SCHEMA_VERSION};"))?;
    }
    tx.commit()?;

    Ok(())
}

/// Reads the stamped schema version; `0` for a fresh database.
pub fn schema_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}

#[cfg(test)]
mod tests {
    use super::catalog_schema_sql;

    #[test]
    fn referenced_tables_are_created_before_book() {
        let sql = catalog_schema_sql();
        let publisher = sql.find("tb_publisher (").expect("publisher table");
        let author = sql.find("tb_author (").expect("author table");
        let book = sql.find("tb_book (").expect("book table");
        assert!(publisher < book);
        assert!(author < book);
    }
}
