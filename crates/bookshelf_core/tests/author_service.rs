use bookshelf_core::db::open_db_in_memory;
use bookshelf_core::{
    Author, AuthorService, CatalogAuthorService, EntityKind, RepoError, SqliteAuthorRepository,
};

#[test]
fn create_author_assigns_identity() {
    let conn = open_db_in_memory().unwrap();
    let service = CatalogAuthorService::new(SqliteAuthorRepository::try_new(&conn).unwrap());

    let created = service.create_author(Author::new("Tolkien")).unwrap();
    assert_eq!(created.id(), Some(1));
    assert_eq!(created.name(), Some("Tolkien"));
}

#[test]
fn create_then_get_roundtrip_is_stable() {
    let conn = open_db_in_memory().unwrap();
    let service = CatalogAuthorService::new(SqliteAuthorRepository::try_new(&conn).unwrap());

    let created = service.create_author(Author::new("Le Guin")).unwrap();
    let id = created.id().unwrap();

    let first = service.get_authors_by_ids(id).unwrap();
    let second = service.get_authors_by_ids(id).unwrap();
    assert_eq!(first, created);
    assert_eq!(second.id(), Some(id));
}

#[test]
fn author_without_name_is_accepted() {
    let conn = open_db_in_memory().unwrap();
    let service = CatalogAuthorService::new(SqliteAuthorRepository::try_new(&conn).unwrap());

    let created = service.create_author(Author::default()).unwrap();
    let loaded = service.get_authors_by_ids(created.id().unwrap()).unwrap();
    assert_eq!(loaded.name(), None);
}

#[test]
fn create_rejects_already_persisted_author() {
    let conn = open_db_in_memory().unwrap();
    let service = CatalogAuthorService::new(SqliteAuthorRepository::try_new(&conn).unwrap());

    let created = service.create_author(Author::new("Herbert")).unwrap();
    let err = service.create_author(created).unwrap_err();
    assert!(matches!(
        err,
        RepoError::IdentityAlreadyAssigned {
            entity: EntityKind::Author,
            id: 1
        }
    ));
}

#[test]
fn update_then_get_reflects_new_values() {
    let conn = open_db_in_memory().unwrap();
    let service = CatalogAuthorService::new(SqliteAuthorRepository::try_new(&conn).unwrap());

    let id = service
        .create_author(Author::new("draft name"))
        .unwrap()
        .id()
        .unwrap();

    let updated = service
        .update_author(id, Author::new("J. R. R. Tolkien"))
        .unwrap();
    assert_eq!(updated.id(), Some(id));

    let loaded = service.get_authors_by_ids(id).unwrap();
    assert_eq!(loaded.name(), Some("J. R. R. Tolkien"));
}

#[test]
fn update_ignores_payload_identity() {
    let conn = open_db_in_memory().unwrap();
    let service = CatalogAuthorService::new(SqliteAuthorRepository::try_new(&conn).unwrap());

    let first = service.create_author(Author::new("first")).unwrap();
    let mut second = service.create_author(Author::new("second")).unwrap();
    second.set_name(Some("renamed".to_string()));

    let updated = service.update_author(first.id().unwrap(), second).unwrap();
    assert_eq!(updated.id(), first.id());
    assert_eq!(
        service.get_authors_by_ids(2).unwrap().name(),
        Some("second")
    );
    assert_eq!(
        service.get_authors_by_ids(1).unwrap().name(),
        Some("renamed")
    );
}

#[test]
fn update_missing_author_returns_not_found() {
    let conn = open_db_in_memory().unwrap();
    let service = CatalogAuthorService::new(SqliteAuthorRepository::try_new(&conn).unwrap());

    let err = service.update_author(99, Author::new("ghost")).unwrap_err();
    assert!(matches!(
        err,
        RepoError::NotFound {
            entity: EntityKind::Author,
            id: 99
        }
    ));
}

#[test]
fn delete_then_get_returns_not_found() {
    let conn = open_db_in_memory().unwrap();
    let service = CatalogAuthorService::new(SqliteAuthorRepository::try_new(&conn).unwrap());

    let id = service
        .create_author(Author::new("Asimov"))
        .unwrap()
        .id()
        .unwrap();
    service.delete_author(id).unwrap();

    let err = service.get_authors_by_ids(id).unwrap_err();
    assert!(matches!(err, RepoError::NotFound { id: missing, .. } if missing == id));
}

#[test]
fn delete_is_not_idempotent() {
    let conn = open_db_in_memory().unwrap();
    let service = CatalogAuthorService::new(SqliteAuthorRepository::try_new(&conn).unwrap());

    let id = service
        .create_author(Author::new("Clarke"))
        .unwrap()
        .id()
        .unwrap();
    service.delete_author(id).unwrap();

    let err = service.delete_author(id).unwrap_err();
    assert!(matches!(err, RepoError::NotFound { .. }));
    assert_eq!(err.code(), "not_found");
}

#[test]
fn storage_failure_surfaces_as_db_error() {
    let conn = open_db_in_memory().unwrap();
    let service = CatalogAuthorService::new(SqliteAuthorRepository::try_new(&conn).unwrap());
    let id = service
        .create_author(Author::new("Tolkien"))
        .unwrap()
        .id()
        .unwrap();

    conn.execute_batch("DROP TABLE tb_book; DROP TABLE tb_author;")
        .unwrap();

    let err = service.get_authors_by_ids(id).unwrap_err();
    assert!(matches!(err, RepoError::Db(_)));
    assert_eq!(err.code(), "db_error");
}
