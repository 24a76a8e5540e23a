use crate::helper::action_result::ActionError;
use crate::helper::paginate;
use crate::helper::render_cache::RenderCache;
use crate::helper::sanitization_helpers::strip_all_html;
use crate::models::db_operations::posts_db_operations::{self, PostCounter, PostFilter};
use crate::models::db_operations::{comments_db_operations, stores_db_operations};
use crate::models::pagination::{PageRequest, Paginated};
use crate::models::{
    normalize_search, Category, CategoryCounts, Comment, CommentInput, Post, PostDetail, StoreView,
};
use chrono::Utc;
use redb::Database;
use uuid::Uuid;
use validator::Validate;

/// Whether reading a post detail counts as a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewTracking {
    Count,
    Skip,
}

pub fn get_published_posts(
    db: &Database,
    request: PageRequest,
    search: Option<&str>,
    category: Option<Category>,
) -> Result<Paginated<Post>, ActionError> {
    let filter = PostFilter {
        published_only: true,
        category,
        search: normalize_search(search),
    };
    let page = posts_db_operations::read_posts_page(db, &filter, request.offset(), request.limit() as usize)?;
    Ok(paginate(page, request))
}

/// Published post totals per category, from a full aggregate rather than a
/// listing page.
pub fn get_post_counts_by_category(db: &Database) -> Result<CategoryCounts, ActionError> {
    Ok(posts_db_operations::count_published_by_category(db)?)
}

/// Resolves a slug to a published post. Drafts are invisible to the public.
fn find_published_post(db: &Database, slug: &str) -> Result<Post, ActionError> {
    posts_db_operations::read_post_by_slug(db, slug)?
        .filter(|post| post.published)
        .ok_or_else(|| ActionError::NotFound(format!("Could not find post '{}'.", slug)))
}

pub fn get_post_detail(db: &Database, slug: &str, tracking: ViewTracking) -> Result<PostDetail, ActionError> {
    let mut post = find_published_post(db, slug)?;
    if tracking == ViewTracking::Count {
        post = posts_db_operations::increment_post_counter(db, post.id, PostCounter::Views)?;
    }

    let store = match post.store {
        Some(store_id) => stores_db_operations::read_store(db, store_id)?.map(StoreView::from),
        None => None,
    };
    let comment_count = comments_db_operations::count_active_comments(db, post.id)?;
    Ok(PostDetail { post, store, comment_count })
}

pub fn like_post(db: &Database, cache: &RenderCache, slug: &str) -> Result<Post, ActionError> {
    let post = find_published_post(db, slug)?;
    let post = posts_db_operations::increment_post_counter(db, post.id, PostCounter::Likes)?;
    cache.invalidate_post_routes([post.slug.as_str()]);
    Ok(post)
}

/// Public comments never expose the commenter's email.
fn redact(mut comment: Comment) -> Comment {
    comment.email = None;
    comment
}

pub fn get_active_comments(db: &Database, slug: &str, request: PageRequest) -> Result<Paginated<Comment>, ActionError> {
    let post = find_published_post(db, slug)?;
    let page = comments_db_operations::read_active_comments_page(db, post.id, request.offset(), request.limit() as usize)?;
    Ok(paginate(page, request).map(redact))
}

pub fn create_comment(
    db: &Database,
    cache: &RenderCache,
    slug: &str,
    mut input: CommentInput,
) -> Result<Comment, ActionError> {
    input.author = strip_all_html(&input.author);
    input.content = strip_all_html(&input.content);
    input.email = input
        .email
        .map(|email| email.trim().to_string())
        .filter(|email| !email.is_empty());
    input.validate()?;

    let post = find_published_post(db, slug)?;
    let comment = Comment::from_input(post.id, input, Utc::now());
    comments_db_operations::insert_comment(db, &comment)?;
    log::info!("New comment {} on post '{}'", comment.id, post.slug);
    cache.invalidate_post_routes([post.slug.as_str()]);
    Ok(redact(comment))
}

pub fn get_store(db: &Database, id: Uuid) -> Result<StoreView, ActionError> {
    stores_db_operations::read_store(db, id)?
        .map(StoreView::from)
        .ok_or_else(|| ActionError::NotFound(format!("Could not find store {}.", id)))
}
