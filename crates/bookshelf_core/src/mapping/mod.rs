//! Persistence mapping declared as data.
//!
//! # Responsibility
//! - Describe how each entity binds to a table: identity column, scalar
//!   columns and relationships.
//! - Validate that relationship declarations are consistent with each other.
//!
//! # Invariants
//! - Only the owning side (`ManyToOne`) of a relationship has a column.
//! - Every `OneToMany` names an owning `ManyToOne` on its target that points
//!   back at the declaring entity.
//! - `CATALOG_MAPPINGS` is ordered so referenced tables come first.

mod sql;

pub use sql::{aliased_column, ROOT_ALIAS};

use crate::model::EntityKind;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Storage type of a mapped column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlType {
    Integer,
    Text,
}

impl SqlType {
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Integer => "INTEGER",
            Self::Text => "TEXT",
        }
    }
}

/// Binding of one scalar entity field to a table column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMapping {
    pub field: &'static str,
    pub column: &'static str,
    pub sql_type: SqlType,
    pub nullable: bool,
}

/// What happens to referencing rows when the referenced row is deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnDelete {
    /// Reject the delete while references exist.
    Restrict,
    /// Clear the foreign key on referencing rows.
    SetNull,
    /// Delete referencing rows too.
    Cascade,
}

impl OnDelete {
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Restrict => "RESTRICT",
            Self::SetNull => "SET NULL",
            Self::Cascade => "CASCADE",
        }
    }
}

/// When a related entity is resolved relative to its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchMode {
    /// Resolved in the same retrieval as the parent.
    Eager,
    /// Resolved only by an explicit follow-up query.
    Lazy,
}

/// Cardinality and side of a relationship.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationKind {
    /// Owning side: the declaring table stores `join_column`.
    ManyToOne {
        join_column: &'static str,
        on_delete: OnDelete,
    },
    /// Inverse side: derived from the target's `mapped_by` relation.
    OneToMany { mapped_by: &'static str },
}

/// One relationship field of an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelationMapping {
    pub field: &'static str,
    pub target: EntityKind,
    pub kind: RelationKind,
    pub fetch: FetchMode,
}

impl RelationMapping {
    /// Returns the stored foreign-key column for owning relations.
    pub fn join_column(&self) -> Option<&'static str> {
        match self.kind {
            RelationKind::ManyToOne { join_column, .. } => Some(join_column),
            RelationKind::OneToMany { .. } => None,
        }
    }
}

/// Full table binding of one entity type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityMapping {
    pub entity: EntityKind,
    pub table: &'static str,
    pub id_column: &'static str,
    pub columns: &'static [ColumnMapping],
    pub relations: &'static [RelationMapping],
}

impl EntityMapping {
    /// Owning relations in declaration order; these are the stored foreign keys.
    pub fn owning_relations(&self) -> impl Iterator<Item = &'static RelationMapping> {
        self.relations
            .iter()
            .filter(|relation| relation.join_column().is_some())
    }

    /// Relations resolved through a join whenever this entity is read.
    pub fn eager_relations(&self) -> impl Iterator<Item = &'static RelationMapping> {
        self.owning_relations()
            .filter(|relation| relation.fetch == FetchMode::Eager)
    }

    /// Every physical column name: identity, scalars, then foreign keys.
    pub fn stored_columns(&self) -> Vec<&'static str> {
        let mut columns = vec![self.id_column];
        columns.extend(self.columns.iter().map(|column| column.column));
        columns.extend(self.owning_relations().filter_map(RelationMapping::join_column));
        columns
    }

    pub fn relation(&self, field: &str) -> Option<&'static RelationMapping> {
        self.relations.iter().find(|relation| relation.field == field)
    }
}

pub const AUTHOR_MAPPING: EntityMapping = EntityMapping {
    entity: EntityKind::Author,
    table: "tb_author",
    id_column: "id",
    columns: &[ColumnMapping {
        field: "name",
        column: "name",
        sql_type: SqlType::Text,
        nullable: true,
    }],
    relations: &[RelationMapping {
        field: "books",
        target: EntityKind::Book,
        kind: RelationKind::OneToMany { mapped_by: "author" },
        fetch: FetchMode::Lazy,
    }],
};

pub const PUBLISHER_MAPPING: EntityMapping = EntityMapping {
    entity: EntityKind::Publisher,
    table: "tb_publisher",
    id_column: "id",
    columns: &[ColumnMapping {
        field: "name",
        column: "name",
        sql_type: SqlType::Text,
        nullable: true,
    }],
    relations: &[RelationMapping {
        field: "books",
        target: EntityKind::Book,
        kind: RelationKind::OneToMany {
            mapped_by: "publisher",
        },
        fetch: FetchMode::Lazy,
    }],
};

pub const BOOK_MAPPING: EntityMapping = EntityMapping {
    entity: EntityKind::Book,
    table: "tb_book",
    id_column: "id",
    columns: &[
        ColumnMapping {
            field: "title",
            column: "title",
            sql_type: SqlType::Text,
            nullable: true,
        },
        ColumnMapping {
            field: "description",
            column: "description",
            sql_type: SqlType::Text,
            nullable: true,
        },
    ],
    relations: &[
        RelationMapping {
            field: "author",
            target: EntityKind::Author,
            kind: RelationKind::ManyToOne {
                join_column: "author_id",
                on_delete: OnDelete::SetNull,
            },
            fetch: FetchMode::Eager,
        },
        RelationMapping {
            field: "publisher",
            target: EntityKind::Publisher,
            kind: RelationKind::ManyToOne {
                join_column: "publisher_id",
                on_delete: OnDelete::SetNull,
            },
            fetch: FetchMode::Eager,
        },
    ],
};

/// All catalog mappings, referenced tables first.
pub const CATALOG_MAPPINGS: &[&EntityMapping] =
    &[&PUBLISHER_MAPPING, &AUTHOR_MAPPING, &BOOK_MAPPING];

/// Returns the catalog mapping for an entity kind.
pub fn mapping_for(entity: EntityKind) -> &'static EntityMapping {
    match entity {
        EntityKind::Author => &AUTHOR_MAPPING,
        EntityKind::Book => &BOOK_MAPPING,
        EntityKind::Publisher => &PUBLISHER_MAPPING,
    }
}

/// Inconsistent relationship or table declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MappingError {
    DuplicateTable(&'static str),
    DuplicateColumn {
        table: &'static str,
        column: &'static str,
    },
    UnknownTarget {
        entity: EntityKind,
        field: &'static str,
        target: EntityKind,
    },
    DanglingInverse {
        entity: EntityKind,
        field: &'static str,
        mapped_by: &'static str,
    },
}

impl Display for MappingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateTable(table) => write!(f, "table `{table}` is mapped twice"),
            Self::DuplicateColumn { table, column } => {
                write!(f, "column `{table}.{column}` is mapped twice")
            }
            Self::UnknownTarget {
                entity,
                field,
                target,
            } => write!(
                f,
                "relation `{entity}.{field}` targets unmapped entity `{target}`"
            ),
            Self::DanglingInverse {
                entity,
                field,
                mapped_by,
            } => write!(
                f,
                "inverse relation `{entity}.{field}` names `{mapped_by}`, which is not an owning relation back to `{entity}`"
            ),
        }
    }
}

impl Error for MappingError {}

/// Checks a mapping set for duplicate tables/columns and broken relations.
///
/// # Errors
/// - `UnknownTarget` when a relation points at an entity absent from `mappings`.
/// - `DanglingInverse` when a `OneToMany` has no matching owning side.
pub fn validate_mappings(mappings: &[&EntityMapping]) -> Result<(), MappingError> {
    for (index, mapping) in mappings.iter().enumerate() {
        if mappings[..index]
            .iter()
            .any(|other| other.table == mapping.table)
        {
            return Err(MappingError::DuplicateTable(mapping.table));
        }

        let columns = mapping.stored_columns();
        for (position, column) in columns.iter().enumerate() {
            if columns[..position].contains(column) {
                return Err(MappingError::DuplicateColumn {
                    table: mapping.table,
                    column: *column,
                });
            }
        }

        for relation in mapping.relations {
            let Some(target) = mappings
                .iter()
                .find(|candidate| candidate.entity == relation.target)
            else {
                return Err(MappingError::UnknownTarget {
                    entity: mapping.entity,
                    field: relation.field,
                    target: relation.target,
                });
            };

            if let RelationKind::OneToMany { mapped_by } = relation.kind {
                let owning_back = target.relation(mapped_by).is_some_and(|owner| {
                    owner.target == mapping.entity && owner.join_column().is_some()
                });
                if !owning_back {
                    return Err(MappingError::DanglingInverse {
                        entity: mapping.entity,
                        field: relation.field,
                        mapped_by,
                    });
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_mappings_are_consistent() {
        validate_mappings(CATALOG_MAPPINGS).expect("catalog mappings should validate");
    }

    #[test]
    fn book_owns_both_foreign_keys() {
        assert_eq!(
            BOOK_MAPPING.stored_columns(),
            vec!["id", "title", "description", "author_id", "publisher_id"]
        );
        assert_eq!(BOOK_MAPPING.eager_relations().count(), 2);
        assert_eq!(AUTHOR_MAPPING.owning_relations().count(), 0);
    }

    #[test]
    fn inverse_without_owner_is_rejected() {
        const ORPHAN: EntityMapping = EntityMapping {
            entity: EntityKind::Author,
            table: "tb_author",
            id_column: "id",
            columns: &[],
            relations: &[RelationMapping {
                field: "books",
                target: EntityKind::Book,
                kind: RelationKind::OneToMany { mapped_by: "writer" },
                fetch: FetchMode::Lazy,
            }],
        };

        let err = validate_mappings(&[&PUBLISHER_MAPPING, &ORPHAN, &BOOK_MAPPING])
            .expect_err("dangling inverse must be rejected");
        assert!(matches!(
            err,
            MappingError::DanglingInverse {
                mapped_by: "writer",
                ..
            }
        ));
    }

    #[test]
    fn relation_to_unmapped_entity_is_rejected() {
        let err = validate_mappings(&[&AUTHOR_MAPPING, &BOOK_MAPPING])
            .expect_err("publisher is missing from the set");
        assert!(matches!(
            err,
            MappingError::UnknownTarget {
                target: EntityKind::Publisher,
                ..
            }
        ));
    }

    #[test]
    fn table_mapped_twice_is_rejected() {
        let err = validate_mappings(&[
            &PUBLISHER_MAPPING,
            &AUTHOR_MAPPING,
            &AUTHOR_MAPPING,
            &BOOK_MAPPING,
        ])
        .expect_err("duplicate table must be rejected");
        assert_eq!(err, MappingError::DuplicateTable("tb_author"));
    }

    #[test]
    fn scalar_shadowing_identity_column_is_rejected() {
        const CLASHING: EntityMapping = EntityMapping {
            entity: EntityKind::Publisher,
            table: "tb_publisher",
            id_column: "id",
            columns: &[ColumnMapping {
                field: "name",
                column: "id",
                sql_type: SqlType::Text,
                nullable: true,
            }],
            relations: &[],
        };

        let err = validate_mappings(&[&CLASHING]).expect_err("duplicate column must be rejected");
        assert_eq!(
            err,
            MappingError::DuplicateColumn {
                table: "tb_publisher",
                column: "id"
            }
        );
    }
}
