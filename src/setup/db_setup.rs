use crate::models::db_operations::{
    COMMENTS, COMMENT_CHRONOLOGICAL_INDEX, POSTS, POST_CHRONOLOGICAL_INDEX, POST_COMMENT_INDEX,
    POST_SLUG_INDEX, STORES, STORE_CHRONOLOGICAL_INDEX, STORE_KEY_INDEX,
};
use redb::{CommitError, Database, DatabaseError, StorageError, TableError, TransactionError};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SetupError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Redb database error: {0}")]
    RedbDatabase(#[from] DatabaseError),
    #[error("Redb storage error: {0}")]
    RedbStorage(#[from] StorageError),
    #[error("Redb transaction error: {0}")]
    RedbTransaction(#[from] TransactionError),
    #[error("Redb table error: {0}")]
    RedbTable(#[from] TableError),
    #[error("Redb commit error: {0}")]
    RedbCommit(#[from] CommitError),
}

/// Creates the database file (and its folder) when missing, then makes sure
/// every table exists.
pub fn create_spotlight_db(db_path: &Path) -> Result<Database, SetupError> {
    if let Some(parent_dir) = db_path.parent() {
        fs::create_dir_all(parent_dir)?;
    }
    let db = Database::create(db_path)?;
    setup_spotlight_db(&db)?;
    Ok(db)
}

/// Opens every table once so that read transactions never hit a missing
/// table. Safe to run repeatedly.
pub fn setup_spotlight_db(db: &Database) -> Result<(), SetupError> {
    let write_txn = db.begin_write()?;
    {
        log::debug!("Ensuring store tables exist");
        write_txn.open_table(STORES)?;
        write_txn.open_table(STORE_KEY_INDEX)?;
        write_txn.open_table(STORE_CHRONOLOGICAL_INDEX)?;

        log::debug!("Ensuring post tables exist");
        write_txn.open_table(POSTS)?;
        write_txn.open_table(POST_SLUG_INDEX)?;
        write_txn.open_table(POST_CHRONOLOGICAL_INDEX)?;

        log::debug!("Ensuring comment tables exist");
        write_txn.open_table(COMMENTS)?;
        write_txn.open_table(COMMENT_CHRONOLOGICAL_INDEX)?;
        write_txn.open_table(POST_COMMENT_INDEX)?;
    }
    write_txn.commit()?;
    Ok(())
}
