use chrono::{DateTime, Utc};
use redb::{
    CommitError, Database, DatabaseError, ReadableTable, StorageError, TableDefinition, TableError,
    TransactionError,
};
use serde::de::DeserializeOwned;
use thiserror::Error;

pub mod comments_db_operations;
pub mod posts_db_operations;
pub mod stores_db_operations;

#[derive(Error, Debug)]
pub enum DbError {
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
    #[error("Serde JSON error: {0}")]
    SerdeJson(#[from] serde_json::Error),
    #[error("Item not found in database: {0}")]
    NotFound(String),
    #[error("Duplicate value for unique key: {0}")]
    Duplicate(String),
}

type DocumentTable = TableDefinition<'static, &'static [u8; 16], &'static str>;
type ChronologicalIndex = TableDefinition<'static, (i64, &'static [u8; 16]), ()>;

// --- Stores ---
pub const STORES: DocumentTable = TableDefinition::new("stores");
/// storeId -> document id. Enforces storeId uniqueness.
pub const STORE_KEY_INDEX: TableDefinition<&str, &[u8; 16]> = TableDefinition::new("store_key_index");
pub const STORE_CHRONOLOGICAL_INDEX: ChronologicalIndex = TableDefinition::new("store_chronological_index");

// --- Posts ---
pub const POSTS: DocumentTable = TableDefinition::new("posts");
/// slug -> document id. Enforces slug uniqueness.
pub const POST_SLUG_INDEX: TableDefinition<&str, &[u8; 16]> = TableDefinition::new("post_slug_index");
pub const POST_CHRONOLOGICAL_INDEX: ChronologicalIndex = TableDefinition::new("post_chronological_index");

// --- Comments ---
pub const COMMENTS: DocumentTable = TableDefinition::new("comments");
pub const COMMENT_CHRONOLOGICAL_INDEX: ChronologicalIndex =
    TableDefinition::new("comment_chronological_index");
/// (post id, newest-first timestamp, comment id)
pub const POST_COMMENT_INDEX: TableDefinition<(&[u8; 16], i64, &[u8; 16]), ()> =
    TableDefinition::new("post_comment_index");

/// One slice of a listing plus the size of the whole filtered set.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_count: u64,
}

impl<T> Page<T> {
    /// Cuts a fully filtered, already ordered result set down to one page.
    pub fn slice(all: Vec<T>, offset: usize, limit: usize) -> Self {
        let total_count = all.len() as u64;
        let items = all.into_iter().skip(offset).take(limit).collect();
        Page { items, total_count }
    }
}

/// Index key component that makes ascending iteration newest-first.
pub(crate) fn newest_first(created_at: &DateTime<Utc>) -> i64 {
    -created_at.timestamp_micros()
}

/// Reads a page straight off a chronological index, without filtering.
pub(crate) fn read_chronological_page<T: DeserializeOwned>(
    db: &Database,
    documents: DocumentTable,
    index: ChronologicalIndex,
    offset: usize,
    limit: usize,
) -> Result<Page<T>, DbError> {
    let read_txn = db.begin_read()?;
    let document_table = read_txn.open_table(documents)?;
    let chrono_index = read_txn.open_table(index)?;

    let total_count = document_table.len()?;
    let mut items = Vec::with_capacity(limit);
    for entry in chrono_index.iter()?.skip(offset).take(limit) {
        let (key, _) = entry?;
        let id_bytes = key.value().1;
        if let Some(doc) = document_table.get(id_bytes)? {
            items.push(serde_json::from_str(doc.value())?);
        }
    }
    Ok(Page { items, total_count })
}

/// Full table scan. Listings with a search term or filter go through here.
pub(crate) fn read_all_documents<T: DeserializeOwned>(
    db: &Database,
    documents: DocumentTable,
) -> Result<Vec<T>, DbError> {
    let read_txn = db.begin_read()?;
    let document_table = read_txn.open_table(documents)?;
    let mut docs = Vec::new();
    for entry in document_table.iter()? {
        let (_, doc) = entry?;
        docs.push(serde_json::from_str(doc.value())?);
    }
    Ok(docs)
}

pub(crate) fn read_document<T: DeserializeOwned>(
    db: &Database,
    documents: DocumentTable,
    id_bytes: &[u8; 16],
) -> Result<Option<T>, DbError> {
    let read_txn = db.begin_read()?;
    let document_table = read_txn.open_table(documents)?;
    let doc = match document_table.get(id_bytes)? {
        Some(guard) => Some(serde_json::from_str(guard.value())?),
        None => None,
    };
    Ok(doc)
}

pub(crate) fn count_documents(db: &Database, documents: DocumentTable) -> Result<u64, DbError> {
    let read_txn = db.begin_read()?;
    let document_table = read_txn.open_table(documents)?;
    Ok(document_table.len()?)
}
