use super::{
    count_documents, newest_first, read_all_documents, read_chronological_page, read_document, DbError,
    Page, STORES, STORE_CHRONOLOGICAL_INDEX, STORE_KEY_INDEX,
};
use crate::models::{matches_search, Store};
use redb::{Database, ReadableTable};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Inserts a new store. Fails with `Duplicate` when its storeId is taken,
/// in which case nothing is written.
pub fn insert_store(db: &Database, store: &Store) -> Result<(), DbError> {
    let id_bytes = store.id.into_bytes();
    let store_json = serde_json::to_string(store)?;

    let write_txn = db.begin_write()?;
    {
        let mut stores_table = write_txn.open_table(STORES)?;
        let mut key_index = write_txn.open_table(STORE_KEY_INDEX)?;
        let mut chrono_index = write_txn.open_table(STORE_CHRONOLOGICAL_INDEX)?;

        if key_index.get(store.store_id.as_str())?.is_some() {
            return Err(DbError::Duplicate(format!("storeId '{}'", store.store_id)));
        }

        stores_table.insert(&id_bytes, store_json.as_str())?;
        key_index.insert(store.store_id.as_str(), &id_bytes)?;
        chrono_index.insert((newest_first(&store.created_at), &id_bytes), ())?;
    }
    write_txn.commit()?;
    Ok(())
}

/// Overwrites an existing store document, moving its storeId index entry
/// when the storeId changed.
pub fn update_store(db: &Database, store: &Store) -> Result<(), DbError> {
    let id_bytes = store.id.into_bytes();
    let store_json = serde_json::to_string(store)?;

    let write_txn = db.begin_write()?;
    {
        let mut stores_table = write_txn.open_table(STORES)?;
        let mut key_index = write_txn.open_table(STORE_KEY_INDEX)?;

        let old_store: Store = {
            let guard = stores_table
                .get(&id_bytes)?
                .ok_or_else(|| DbError::NotFound(format!("store {}", store.id)))?;
            serde_json::from_str(guard.value())?
        };

        if old_store.store_id != store.store_id {
            let owner = key_index.get(store.store_id.as_str())?.map(|guard| *guard.value());
            if owner.is_some_and(|owner| owner != id_bytes) {
                return Err(DbError::Duplicate(format!("storeId '{}'", store.store_id)));
            }
            key_index.remove(old_store.store_id.as_str())?;
            key_index.insert(store.store_id.as_str(), &id_bytes)?;
        }

        stores_table.insert(&id_bytes, store_json.as_str())?;
    }
    write_txn.commit()?;
    Ok(())
}

/// Removes a store and its index entries, returning the removed document.
pub fn delete_store(db: &Database, id: Uuid) -> Result<Store, DbError> {
    let id_bytes = id.into_bytes();

    let write_txn = db.begin_write()?;
    let removed = {
        let mut stores_table = write_txn.open_table(STORES)?;
        let mut key_index = write_txn.open_table(STORE_KEY_INDEX)?;
        let mut chrono_index = write_txn.open_table(STORE_CHRONOLOGICAL_INDEX)?;

        let removed: Store = {
            let guard = stores_table
                .remove(&id_bytes)?
                .ok_or_else(|| DbError::NotFound(format!("store {}", id)))?;
            serde_json::from_str(guard.value())?
        };
        key_index.remove(removed.store_id.as_str())?;
        chrono_index.remove((newest_first(&removed.created_at), &id_bytes))?;
        removed
    };
    write_txn.commit()?;
    Ok(removed)
}

pub fn read_store(db: &Database, id: Uuid) -> Result<Option<Store>, DbError> {
    read_document(db, STORES, &id.into_bytes())
}

/// Newest-first page of stores, optionally narrowed by a normalized
/// (trimmed, lowercased) search term.
pub fn read_stores_page(
    db: &Database,
    search: Option<&str>,
    offset: usize,
    limit: usize,
) -> Result<Page<Store>, DbError> {
    let Some(needle) = search else {
        return read_chronological_page(db, STORES, STORE_CHRONOLOGICAL_INDEX, offset, limit);
    };

    let mut stores: Vec<Store> = read_all_documents::<Store>(db, STORES)?
        .into_iter()
        .filter(|store| matches_search(needle, store.search_fields()))
        .collect();
    stores.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(Page::slice(stores, offset, limit))
}

/// Every tag used by any store, de-duplicated case-insensitively and sorted.
/// The first spelling encountered wins.
pub fn read_all_store_tags(db: &Database) -> Result<Vec<String>, DbError> {
    let mut tags: BTreeMap<String, String> = BTreeMap::new();
    for store in read_all_documents::<Store>(db, STORES)? {
        for tag in store.tags {
            tags.entry(tag.to_lowercase()).or_insert(tag);
        }
    }
    Ok(tags.into_values().collect())
}

pub fn count_stores(db: &Database) -> Result<u64, DbError> {
    count_documents(db, STORES)
}
