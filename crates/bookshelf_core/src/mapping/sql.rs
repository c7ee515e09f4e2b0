//! SQL rendered from entity mappings.
//!
//! Identifiers come from compile-time mappings only, never from callers, so
//! they are interpolated directly. Values are always bound as `?N` params.

use super::{mapping_for, EntityMapping, RelationKind, SqlType};

/// Alias of the root table in rendered `SELECT` statements.
pub const ROOT_ALIAS: &str = "t";

/// Result column name for `column` selected through `alias`.
///
/// Rendered selects expose every column as `<alias>__<column>` so joined
/// tables sharing column names (`id`, `name`) stay distinguishable.
pub fn aliased_column(alias: &str, column: &str) -> String {
    format!("{alias}__{column}")
}

impl EntityMapping {
    /// `CREATE TABLE IF NOT EXISTS` plus one index per foreign key.
    pub fn create_table_sql(&self) -> String {
        let mut definitions = vec![format!(
            "    {} INTEGER PRIMARY KEY AUTOINCREMENT",
            self.id_column
        )];

        for column in self.columns {
            let not_null = if column.nullable { "" } else { " NOT NULL" };
            definitions.push(format!(
                "    {} {}{not_null}",
                column.column,
                column.sql_type.as_sql()
            ));
        }

        for relation in self.owning_relations() {
            if let RelationKind::ManyToOne {
                join_column,
                on_delete,
            } = relation.kind
            {
                let target = mapping_for(relation.target);
                definitions.push(format!(
                    "    {join_column} {} REFERENCES {}({}) ON DELETE {}",
                    SqlType::Integer.as_sql(),
                    target.table,
                    target.id_column,
                    on_delete.as_sql()
                ));
            }
        }

        let mut sql = format!(
            "CREATE TABLE IF NOT EXISTS {} (\n{}\n);\n",
            self.table,
            definitions.join(",\n")
        );

        for join_column in self.owning_relations().filter_map(|r| r.join_column()) {
            sql.push_str(&format!(
                "CREATE INDEX IF NOT EXISTS idx_{table}_{join_column} ON {table}({join_column});\n",
                table = self.table
            ));
        }

        sql
    }

    /// Writable columns in bind order: scalars, then foreign keys.
    pub fn writable_columns(&self) -> Vec<&'static str> {
        self.stored_columns().into_iter().skip(1).collect()
    }

    pub fn insert_sql(&self) -> String {
        let columns = self.writable_columns();
        let placeholders = (1..=columns.len())
            .map(|index| format!("?{index}"))
            .collect::<Vec<_>>();
        format!(
            "INSERT INTO {} ({}) VALUES ({});",
            self.table,
            columns.join(", "),
            placeholders.join(", ")
        )
    }

    /// `UPDATE` binding writable columns as `?1..?N` and the identity last.
    pub fn update_sql(&self) -> String {
        let columns = self.writable_columns();
        let assignments = columns
            .iter()
            .enumerate()
            .map(|(index, column)| format!("{column} = ?{}", index + 1))
            .collect::<Vec<_>>();
        format!(
            "UPDATE {} SET {} WHERE {} = ?{};",
            self.table,
            assignments.join(", "),
            self.id_column,
            columns.len() + 1
        )
    }

    pub fn delete_sql(&self) -> String {
        format!("DELETE FROM {} WHERE {} = ?1;", self.table, self.id_column)
    }

    /// `SELECT` of the root row joined with every eager relation.
    ///
    /// Eager relations are joined with `LEFT JOIN` under the relation's field
    /// name as alias, so absent links yield `NULL` columns instead of
    /// dropping the root row. No `WHERE`/`ORDER BY` is appended.
    pub fn select_sql(&self) -> String {
        let mut projections = self.projection(ROOT_ALIAS);
        let mut joins = Vec::new();

        for relation in self.eager_relations() {
            let Some(join_column) = relation.join_column() else {
                continue;
            };
            let target = mapping_for(relation.target);
            projections.extend(target.projection(relation.field));
            joins.push(format!(
                "LEFT JOIN {table} AS {alias} ON {alias}.{id} = {ROOT_ALIAS}.{join_column}",
                table = target.table,
                alias = relation.field,
                id = target.id_column,
            ));
        }

        let mut sql = format!(
            "SELECT {} FROM {} AS {ROOT_ALIAS}",
            projections.join(", "),
            self.table
        );
        for join in joins {
            sql.push(' ');
            sql.push_str(&join);
        }
        sql
    }

    /// Root-table column reference, for `WHERE`/`ORDER BY` after `select_sql`.
    pub fn root_column(&self, column: &str) -> String {
        format!("{ROOT_ALIAS}.{column}")
    }

    fn projection(&self, alias: &str) -> Vec<String> {
        let mut columns = vec![self.id_column];
        columns.extend(self.columns.iter().map(|column| column.column));
        columns
            .into_iter()
            .map(|column| format!("{alias}.{column} AS {}", aliased_column(alias, column)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use crate::mapping::{AUTHOR_MAPPING, BOOK_MAPPING};

    #[test]
    fn book_ddl_declares_nullable_foreign_keys_with_set_null() {
        let ddl = BOOK_MAPPING.create_table_sql();
        assert!(ddl.contains("CREATE TABLE IF NOT EXISTS tb_book"));
        assert!(ddl.contains("id INTEGER PRIMARY KEY AUTOINCREMENT"));
        assert!(ddl.contains("author_id INTEGER REFERENCES tb_author(id) ON DELETE SET NULL"));
        assert!(
            ddl.contains("publisher_id INTEGER REFERENCES tb_publisher(id) ON DELETE SET NULL")
        );
        assert!(ddl.contains("idx_tb_book_author_id"));
        assert!(!ddl.contains("NOT NULL"));
    }

    #[test]
    fn insert_and_update_bind_in_writable_column_order() {
        assert_eq!(
            BOOK_MAPPING.insert_sql(),
            "INSERT INTO tb_book (title, description, author_id, publisher_id) VALUES (?1, ?2, ?3, ?4);"
        );
        assert_eq!(
            BOOK_MAPPING.update_sql(),
            "UPDATE tb_book SET title = ?1, description = ?2, author_id = ?3, publisher_id = ?4 WHERE id = ?5;"
        );
        assert_eq!(AUTHOR_MAPPING.delete_sql(), "DELETE FROM tb_author WHERE id = ?1;");
    }

    #[test]
    fn book_select_joins_eager_relations() {
        let sql = BOOK_MAPPING.select_sql();
        assert!(sql.starts_with("SELECT t.id AS t__id, t.title AS t__title"));
        assert!(sql.contains("author.name AS author__name"));
        assert!(sql.contains("LEFT JOIN tb_author AS author ON author.id = t.author_id"));
        assert!(
            sql.contains("LEFT JOIN tb_publisher AS publisher ON publisher.id = t.publisher_id")
        );
    }

    #[test]
    fn author_select_has_no_joins() {
        assert_eq!(
            AUTHOR_MAPPING.select_sql(),
            "SELECT t.id AS t__id, t.name AS t__name FROM tb_author AS t"
        );
    }
}
