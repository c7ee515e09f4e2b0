//! Generic mapped-entity store.
//!
//! Drives insert/update/select/delete for any type that describes itself
//! with an `EntityMapping`. Typed repositories are thin wrappers over it.

use super::{EntityListQuery, RepoError, RepoResult};
use crate::mapping::{aliased_column, EntityMapping, ROOT_ALIAS};
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection, Row};

/// Entity type persisted through an `EntityMapping`.
pub(crate) trait MappedEntity: Sized {
    const MAPPING: &'static EntityMapping;

    fn identity(&self) -> Option<i64>;

    /// Only the store calls this, right after the row is written.
    fn assign_identity(&mut self, id: i64);

    /// Bind values for `MAPPING.writable_columns()`, in that order.
    fn write_values(&self) -> RepoResult<Vec<Value>>;

    /// Reads the entity exposed under `alias`; `None` when its id is NULL,
    /// which is how an absent `LEFT JOIN` partner shows up.
    fn read_aliased(row: &Row<'_>, alias: &str) -> RepoResult<Option<Self>>;
}

pub(crate) struct EntityStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> EntityStore<'conn> {
    pub(crate) fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    pub(crate) fn insert<T: MappedEntity>(&self, mut entity: T) -> RepoResult<T> {
        if let Some(id) = entity.identity() {
            return Err(RepoError::IdentityAlreadyAssigned {
                entity: T::MAPPING.entity,
                id,
            });
        }

        let values = entity.write_values()?;
        self.conn
            .execute(&T::MAPPING.insert_sql(), params_from_iter(values))?;
        entity.assign_identity(self.conn.last_insert_rowid());
        Ok(entity)
    }

    /// Overwrites row `id` with `entity`'s attributes.
    ///
    /// `entity`'s own identity is ignored; the result carries `id`.
    pub(crate) fn update<T: MappedEntity>(&self, id: i64, mut entity: T) -> RepoResult<T> {
        let mut values = entity.write_values()?;
        values.push(Value::Integer(id));

        let changed = self
            .conn
            .execute(&T::MAPPING.update_sql(), params_from_iter(values))?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: T::MAPPING.entity,
                id,
            });
        }

        entity.assign_identity(id);
        Ok(entity)
    }

    pub(crate) fn find<T: MappedEntity>(&self, id: i64) -> RepoResult<Option<T>> {
        let mapping = T::MAPPING;
        let sql = format!(
            "{} WHERE {} = ?1;",
            mapping.select_sql(),
            mapping.root_column(mapping.id_column)
        );

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query([id])?;
        match rows.next()? {
            Some(row) => Ok(Some(read_root(row)?)),
            None => Ok(None),
        }
    }

    pub(crate) fn delete<T: MappedEntity>(&self, id: i64) -> RepoResult<()> {
        let changed = self.conn.execute(&T::MAPPING.delete_sql(), [id])?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: T::MAPPING.entity,
                id,
            });
        }
        Ok(())
    }

    pub(crate) fn count<T: MappedEntity>(&self) -> RepoResult<u64> {
        let count: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM {};", T::MAPPING.table),
            [],
            |row| row.get(0),
        )?;
        u64::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative row count {count}")))
    }

    /// Lists rows, optionally restricted to `column = value` on the root table.
    pub(crate) fn list<T: MappedEntity>(
        &self,
        filter: Option<(&str, i64)>,
        query: &EntityListQuery,
    ) -> RepoResult<Vec<T>> {
        let mapping = T::MAPPING;
        let mut sql = mapping.select_sql();
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some((column, value)) = filter {
            sql.push_str(&format!(" WHERE {} = ?", mapping.root_column(column)));
            bind_values.push(Value::Integer(value));
        }

        sql.push_str(&format!(
            " ORDER BY {} ASC",
            mapping.root_column(mapping.id_column)
        ));

        if let Some(limit) = query.limit {
            sql.push_str(" LIMIT ?");
            bind_values.push(Value::Integer(i64::from(limit)));
            if query.offset > 0 {
                sql.push_str(" OFFSET ?");
                bind_values.push(Value::Integer(i64::from(query.offset)));
            }
        } else if query.offset > 0 {
            sql.push_str(" LIMIT -1 OFFSET ?");
            bind_values.push(Value::Integer(i64::from(query.offset)));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut entities = Vec::new();
        while let Some(row) = rows.next()? {
            entities.push(read_root(row)?);
        }

        Ok(entities)
    }
}

fn read_root<T: MappedEntity>(row: &Row<'_>) -> RepoResult<T> {
    T::read_aliased(row, ROOT_ALIAS)?.ok_or_else(|| {
        RepoError::InvalidData(format!("{}.{} is NULL", T::MAPPING.table, T::MAPPING.id_column))
    })
}

/// Reads the aliased identity column; `None` for a NULL join partner.
pub(crate) fn read_identity(
    row: &Row<'_>,
    mapping: &EntityMapping,
    alias: &str,
) -> RepoResult<Option<i64>> {
    let column = aliased_column(alias, mapping.id_column);
    Ok(row.get::<_, Option<i64>>(column.as_str())?)
}

pub(crate) fn read_text(row: &Row<'_>, alias: &str, column: &str) -> RepoResult<Option<String>> {
    let column = aliased_column(alias, column);
    Ok(row.get::<_, Option<String>>(column.as_str())?)
}

pub(crate) fn text_value(value: Option<&str>) -> Value {
    value.map_or(Value::Null, |text| Value::Text(text.to_owned()))
}

/// Foreign-key bind value for an optional related entity.
///
/// # Errors
/// - `UnsavedReference` when the related entity has no identity yet.
pub(crate) fn reference_value<R: MappedEntity>(
    owner: &EntityMapping,
    field: &'static str,
    related: Option<&R>,
) -> RepoResult<Value> {
    match related {
        None => Ok(Value::Null),
        Some(entity) => entity
            .identity()
            .map(Value::Integer)
            .ok_or(RepoError::UnsavedReference {
                entity: owner.entity,
                field,
            }),
    }
}
