//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `bookshelf_core` linkage and catalog bootstrap from a shell.
//! - Keep output deterministic for quick local sanity checks.
//!
//! Usage: `bookshelf_cli [DB_PATH]`. Without an argument, `BOOKSHELF_DB` is
//! used, and without that an in-memory catalog.

use bookshelf_core::db::schema::schema_version;
use bookshelf_core::{
    core_version, init_logging, AuthorRepository, BookRepository, CatalogConfig,
    SqliteAuthorRepository, SqliteBookRepository,
};
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("event=cli_exit module=cli status=error error={err}");
            eprintln!("bookshelf_cli error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let mut config = CatalogConfig::from_env();
    if let Some(path) = std::env::args_os().nth(1) {
        config.db_path = Some(PathBuf::from(path));
    }
    config.validate()?;

    if let Some(log_dir) = &config.log_dir {
        init_logging(&config.log_level, log_dir)?;
    }

    let conn = config.open_catalog()?;
    let authors = SqliteAuthorRepository::try_new(&conn)?.count_authors()?;
    let books = SqliteBookRepository::try_new(&conn)?.count_books()?;

    println!("bookshelf_core version={}", core_version());
    println!("catalog schema_version={}", schema_version(&conn)?);
    println!("catalog authors={authors} books={books}");
    Ok(())
}
