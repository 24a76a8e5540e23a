use super::{
    newest_first, read_all_documents, read_chronological_page, read_document, DbError, Page, COMMENTS,
    COMMENT_CHRONOLOGICAL_INDEX, POST_COMMENT_INDEX,
};
use crate::models::{matches_search, Comment, CommentStatus};
use chrono::{DateTime, Utc};
use redb::{Database, ReadableTable};
use uuid::Uuid;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CommentTotals {
    pub active: u64,
    pub deleted: u64,
}

pub fn insert_comment(db: &Database, comment: &Comment) -> Result<(), DbError> {
    let id_bytes = comment.id.into_bytes();
    let post_bytes = comment.post.into_bytes();
    let comment_json = serde_json::to_string(comment)?;
    let timestamp = newest_first(&comment.created_at);

    let write_txn = db.begin_write()?;
    {
        let mut comments_table = write_txn.open_table(COMMENTS)?;
        let mut chrono_index = write_txn.open_table(COMMENT_CHRONOLOGICAL_INDEX)?;
        let mut post_index = write_txn.open_table(POST_COMMENT_INDEX)?;

        comments_table.insert(&id_bytes, comment_json.as_str())?;
        chrono_index.insert((timestamp, &id_bytes), ())?;
        post_index.insert((&post_bytes, timestamp, &id_bytes), ())?;
    }
    write_txn.commit()?;
    Ok(())
}

pub fn read_comment(db: &Database, id: Uuid) -> Result<Option<Comment>, DbError> {
    read_document(db, COMMENTS, &id.into_bytes())
}

/// Moves a comment between `Active` and `Deleted`. The document itself
/// always stays in storage.
pub fn set_comment_status(
    db: &Database,
    id: Uuid,
    status: CommentStatus,
    now: DateTime<Utc>,
) -> Result<Comment, DbError> {
    let id_bytes = id.into_bytes();

    let write_txn = db.begin_write()?;
    let comment = {
        let mut comments_table = write_txn.open_table(COMMENTS)?;
        let mut comment: Comment = {
            let guard = comments_table
                .get(&id_bytes)?
                .ok_or_else(|| DbError::NotFound(format!("comment {}", id)))?;
            serde_json::from_str(guard.value())?
        };
        comment.status = status;
        comment.updated_at = now;
        let comment_json = serde_json::to_string(&comment)?;
        comments_table.insert(&id_bytes, comment_json.as_str())?;
        comment
    };
    write_txn.commit()?;
    Ok(comment)
}

/// Admin listing: active and deleted comments alike, newest first.
pub fn read_comments_page(
    db: &Database,
    search: Option<&str>,
    offset: usize,
    limit: usize,
) -> Result<Page<Comment>, DbError> {
    let Some(needle) = search else {
        return read_chronological_page(db, COMMENTS, COMMENT_CHRONOLOGICAL_INDEX, offset, limit);
    };

    let mut comments: Vec<Comment> = read_all_documents::<Comment>(db, COMMENTS)?
        .into_iter()
        .filter(|comment| matches_search(needle, comment.search_fields()))
        .collect();
    comments.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(Page::slice(comments, offset, limit))
}

fn read_comments_for_post(db: &Database, post_id: Uuid) -> Result<Vec<Comment>, DbError> {
    let post_bytes = post_id.into_bytes();

    let read_txn = db.begin_read()?;
    let post_index = read_txn.open_table(POST_COMMENT_INDEX)?;
    let comments_table = read_txn.open_table(COMMENTS)?;

    let start_key = (&post_bytes, i64::MIN, &[0u8; 16]);
    let end_key = (&post_bytes, i64::MAX, &[255u8; 16]);

    let mut comments = Vec::new();
    for entry in post_index.range(start_key..=end_key)? {
        let (key, _) = entry?;
        let comment_bytes = key.value().2;
        if let Some(doc) = comments_table.get(comment_bytes)? {
            comments.push(serde_json::from_str(doc.value())?);
        }
    }
    Ok(comments)
}

/// Public listing for one post: active comments only, newest first.
pub fn read_active_comments_page(
    db: &Database,
    post_id: Uuid,
    offset: usize,
    limit: usize,
) -> Result<Page<Comment>, DbError> {
    let active: Vec<Comment> = read_comments_for_post(db, post_id)?
        .into_iter()
        .filter(|comment| !comment.status.is_deleted())
        .collect();
    Ok(Page::slice(active, offset, limit))
}

pub fn count_active_comments(db: &Database, post_id: Uuid) -> Result<u64, DbError> {
    let count = read_comments_for_post(db, post_id)?
        .iter()
        .filter(|comment| !comment.status.is_deleted())
        .count();
    Ok(count as u64)
}

pub fn count_comments(db: &Database) -> Result<CommentTotals, DbError> {
    let mut totals = CommentTotals::default();
    for comment in read_all_documents::<Comment>(db, COMMENTS)? {
        match comment.status {
            CommentStatus::Active => totals.active += 1,
            CommentStatus::Deleted => totals.deleted += 1,
        }
    }
    Ok(totals)
}
