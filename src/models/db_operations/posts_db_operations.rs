use super::{
    count_documents, newest_first, read_all_documents, read_chronological_page, read_document, DbError,
    Page, POSTS, POST_CHRONOLOGICAL_INDEX, POST_SLUG_INDEX,
};
use crate::models::{matches_search, Category, CategoryCounts, Post};
use redb::{Database, ReadableTable};
use uuid::Uuid;

/// Narrowing applied to a post listing. The default matches every post.
#[derive(Debug, Default, Clone)]
pub struct PostFilter {
    pub published_only: bool,
    pub category: Option<Category>,
    /// Normalized (trimmed, lowercased) search term.
    pub search: Option<String>,
}

impl PostFilter {
    fn is_unfiltered(&self) -> bool {
        !self.published_only && self.category.is_none() && self.search.is_none()
    }

    fn matches(&self, post: &Post) -> bool {
        if self.published_only && !post.published {
            return false;
        }
        if self.category.is_some_and(|category| category != post.category) {
            return false;
        }
        match self.search.as_deref() {
            Some(needle) => matches_search(needle, post.search_fields()),
            None => true,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub enum PostCounter {
    Views,
    Likes,
}

pub fn insert_post(db: &Database, post: &Post) -> Result<(), DbError> {
    let id_bytes = post.id.into_bytes();
    let post_json = serde_json::to_string(post)?;

    let write_txn = db.begin_write()?;
    {
        let mut posts_table = write_txn.open_table(POSTS)?;
        let mut slug_index = write_txn.open_table(POST_SLUG_INDEX)?;
        let mut chrono_index = write_txn.open_table(POST_CHRONOLOGICAL_INDEX)?;

        if slug_index.get(post.slug.as_str())?.is_some() {
            return Err(DbError::Duplicate(format!("slug '{}'", post.slug)));
        }

        posts_table.insert(&id_bytes, post_json.as_str())?;
        slug_index.insert(post.slug.as_str(), &id_bytes)?;
        chrono_index.insert((newest_first(&post.created_at), &id_bytes), ())?;
    }
    write_txn.commit()?;
    Ok(())
}

/// Overwrites an existing post and returns the previous version, so callers
/// can tell whether the slug moved. View and like counters are kept from the
/// stored version.
pub fn update_post(db: &Database, post: &Post) -> Result<Post, DbError> {
    let id_bytes = post.id.into_bytes();

    let write_txn = db.begin_write()?;
    let previous = {
        let mut posts_table = write_txn.open_table(POSTS)?;
        let mut slug_index = write_txn.open_table(POST_SLUG_INDEX)?;

        let previous: Post = {
            let guard = posts_table
                .get(&id_bytes)?
                .ok_or_else(|| DbError::NotFound(format!("post {}", post.id)))?;
            serde_json::from_str(guard.value())?
        };

        if previous.slug != post.slug {
            let owner = slug_index.get(post.slug.as_str())?.map(|guard| *guard.value());
            if owner.is_some_and(|owner| owner != id_bytes) {
                return Err(DbError::Duplicate(format!("slug '{}'", post.slug)));
            }
            slug_index.remove(previous.slug.as_str())?;
            slug_index.insert(post.slug.as_str(), &id_bytes)?;
        }

        let post_json = serde_json::to_string(&Post {
            views: previous.views,
            likes: previous.likes,
            ..post.clone()
        })?;
        posts_table.insert(&id_bytes, post_json.as_str())?;
        previous
    };
    write_txn.commit()?;
    Ok(previous)
}

pub fn delete_post(db: &Database, id: Uuid) -> Result<Post, DbError> {
    let id_bytes = id.into_bytes();

    let write_txn = db.begin_write()?;
    let removed = {
        let mut posts_table = write_txn.open_table(POSTS)?;
        let mut slug_index = write_txn.open_table(POST_SLUG_INDEX)?;
        let mut chrono_index = write_txn.open_table(POST_CHRONOLOGICAL_INDEX)?;

        let removed: Post = {
            let guard = posts_table
                .remove(&id_bytes)?
                .ok_or_else(|| DbError::NotFound(format!("post {}", id)))?;
            serde_json::from_str(guard.value())?
        };
        slug_index.remove(removed.slug.as_str())?;
        chrono_index.remove((newest_first(&removed.created_at), &id_bytes))?;
        removed
    };
    write_txn.commit()?;
    Ok(removed)
}

pub fn read_post(db: &Database, id: Uuid) -> Result<Option<Post>, DbError> {
    read_document(db, POSTS, &id.into_bytes())
}

pub fn read_post_by_slug(db: &Database, slug: &str) -> Result<Option<Post>, DbError> {
    let read_txn = db.begin_read()?;
    let slug_index = read_txn.open_table(POST_SLUG_INDEX)?;
    let posts_table = read_txn.open_table(POSTS)?;

    let Some(id_guard) = slug_index.get(slug)? else {
        return Ok(None);
    };
    let post = match posts_table.get(id_guard.value())? {
        Some(guard) => Some(serde_json::from_str(guard.value())?),
        None => None,
    };
    Ok(post)
}

/// Newest-first page of posts matching `filter`.
pub fn read_posts_page(
    db: &Database,
    filter: &PostFilter,
    offset: usize,
    limit: usize,
) -> Result<Page<Post>, DbError> {
    if filter.is_unfiltered() {
        return read_chronological_page(db, POSTS, POST_CHRONOLOGICAL_INDEX, offset, limit);
    }

    let mut posts: Vec<Post> = read_all_documents::<Post>(db, POSTS)?
        .into_iter()
        .filter(|post| filter.matches(post))
        .collect();
    posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(Page::slice(posts, offset, limit))
}

/// Number of published posts per category.
pub fn count_published_by_category(db: &Database) -> Result<CategoryCounts, DbError> {
    let mut counts = CategoryCounts::default();
    for post in read_all_documents::<Post>(db, POSTS)? {
        if post.published {
            counts.record(post.category);
        }
    }
    Ok(counts)
}

/// Bumps a counter inside a single write transaction and returns the
/// updated post.
pub fn increment_post_counter(db: &Database, id: Uuid, counter: PostCounter) -> Result<Post, DbError> {
    let id_bytes = id.into_bytes();

    let write_txn = db.begin_write()?;
    let post = {
        let mut posts_table = write_txn.open_table(POSTS)?;
        let mut post: Post = {
            let guard = posts_table
                .get(&id_bytes)?
                .ok_or_else(|| DbError::NotFound(format!("post {}", id)))?;
            serde_json::from_str(guard.value())?
        };
        match counter {
            PostCounter::Views => post.views = post.views.saturating_add(1),
            PostCounter::Likes => post.likes = post.likes.saturating_add(1),
        }
        let post_json = serde_json::to_string(&post)?;
        posts_table.insert(&id_bytes, post_json.as_str())?;
        post
    };
    write_txn.commit()?;
    Ok(post)
}

/// Slugs of every post that references `store_id`.
pub fn read_slugs_for_store(db: &Database, store_id: Uuid) -> Result<Vec<String>, DbError> {
    let read_txn = db.begin_read()?;
    let posts_table = read_txn.open_table(POSTS)?;
    let mut slugs = Vec::new();
    for entry in posts_table.iter()? {
        let (_, doc) = entry?;
        let post: Post = serde_json::from_str(doc.value())?;
        if post.store == Some(store_id) {
            slugs.push(post.slug);
        }
    }
    Ok(slugs)
}

pub fn count_posts(db: &Database) -> Result<u64, DbError> {
    count_documents(db, POSTS)
}
