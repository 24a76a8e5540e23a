use crate::helper::action_result::ActionError;
use crate::helper::paginate;
use crate::helper::render_cache::RenderCache;
use crate::helper::sanitization_helpers::{slugify, strip_all_html};
use crate::listing::tag_editor::TagEditor;
use crate::models::db_operations::posts_db_operations::{self, PostFilter};
use crate::models::db_operations::{comments_db_operations, stores_db_operations};
use crate::models::pagination::{PageRequest, Paginated};
use crate::models::{
    normalize_search, Category, Comment, CommentStatus, Post, PostInput, Store, StoreInput, StoreView,
};
use chrono::Utc;
use redb::Database;
use uuid::Uuid;
use validator::Validate;

// --- Stores ---

/// Strips markup from every text field, normalizes tags through the tag
/// editor rules and validates the result.
fn clean_store_input(mut input: StoreInput) -> Result<StoreInput, ActionError> {
    input.name = strip_all_html(&input.name);
    input.address = strip_all_html(&input.address);
    input.location = strip_all_html(&input.location);
    input.store_id = strip_all_html(&input.store_id);
    input.parking = strip_all_html(&input.parking);
    input.phone = strip_all_html(&input.phone);
    input.tags = TagEditor::from_tags(input.tags.iter().map(|tag| strip_all_html(tag))).into_tags();
    input.images = input
        .images
        .iter()
        .map(|url| url.trim().to_string())
        .filter(|url| !url.is_empty())
        .collect();

    input.validate()?;
    if input.coordinates.is_some_and(|coordinates| !coordinates.is_valid()) {
        return Err(ActionError::Validation(
            "Coordinates must have a latitude within ±90 and a longitude within ±180".to_string(),
        ));
    }
    Ok(input)
}

/// Post pages embed the card of their store.
fn invalidate_store_cards(cache: &RenderCache, slugs: &[String]) {
    cache.invalidate_post_routes(slugs.iter().map(String::as_str));
}

pub fn get_stores_paginated(
    db: &Database,
    request: PageRequest,
    search: Option<&str>,
) -> Result<Paginated<StoreView>, ActionError> {
    let search = normalize_search(search);
    let page = stores_db_operations::read_stores_page(db, search.as_deref(), request.offset(), request.limit() as usize)?;
    Ok(paginate(page, request).map(StoreView::from))
}

pub fn create_store(db: &Database, input: StoreInput) -> Result<StoreView, ActionError> {
    let input = clean_store_input(input)?;
    let store = Store::from_input(input, Utc::now());
    stores_db_operations::insert_store(db, &store)?;
    log::info!("Created store {} ({})", store.store_id, store.id);
    Ok(StoreView::from(store))
}

pub fn update_store(
    db: &Database,
    cache: &RenderCache,
    id: Uuid,
    input: StoreInput,
) -> Result<StoreView, ActionError> {
    let input = clean_store_input(input)?;
    let mut store = stores_db_operations::read_store(db, id)?
        .ok_or_else(|| ActionError::NotFound(format!("Could not find store {}.", id)))?;
    let slugs = posts_db_operations::read_slugs_for_store(db, store.id)?;
    store.apply_input(input, Utc::now());
    stores_db_operations::update_store(db, &store)?;
    log::info!("Updated store {} ({})", store.store_id, store.id);
    invalidate_store_cards(cache, &slugs);
    Ok(StoreView::from(store))
}

/// Removes a store. Posts that referenced it keep the dangling id and show
/// no store card.
pub fn delete_store(db: &Database, cache: &RenderCache, id: Uuid) -> Result<StoreView, ActionError> {
    let slugs = posts_db_operations::read_slugs_for_store(db, id)?;
    let removed = stores_db_operations::delete_store(db, id)?;
    log::info!("Deleted store {} ({})", removed.store_id, removed.id);
    invalidate_store_cards(cache, &slugs);
    Ok(StoreView::from(removed))
}

pub fn get_store_tags(db: &Database) -> Result<Vec<String>, ActionError> {
    Ok(stores_db_operations::read_all_store_tags(db)?)
}

// --- Posts ---

/// Validated post input together with the slug it will be stored under.
struct CleanPost {
    input: PostInput,
    slug: String,
}

/// `current_slug` is kept when an edit supplies no slug of its own.
fn clean_post_input(db: &Database, mut input: PostInput, current_slug: Option<&str>) -> Result<CleanPost, ActionError> {
    input.title = strip_all_html(&input.title);
    input.description = input.description.trim().to_string();
    input.image = input
        .image
        .map(|url| url.trim().to_string())
        .filter(|url| !url.is_empty());
    input.validate()?;

    let slug = match (input.slug.as_deref().map(slugify), current_slug) {
        (Some(explicit), _) if !explicit.is_empty() => explicit,
        (_, Some(current)) => current.to_string(),
        _ => slugify(&input.title),
    };
    if slug.is_empty() {
        return Err(ActionError::Validation(
            "A slug could not be derived from the title; supply one explicitly".to_string(),
        ));
    }

    if let Some(store_id) = input.store {
        if stores_db_operations::read_store(db, store_id)?.is_none() {
            return Err(ActionError::Validation(format!("Store {} does not exist", store_id)));
        }
    }
    Ok(CleanPost { input, slug })
}

/// Every post, published or not, for the admin list.
pub fn get_posts_paginated(
    db: &Database,
    request: PageRequest,
    search: Option<&str>,
    category: Option<Category>,
) -> Result<Paginated<Post>, ActionError> {
    let filter = PostFilter {
        published_only: false,
        category,
        search: normalize_search(search),
    };
    let page = posts_db_operations::read_posts_page(db, &filter, request.offset(), request.limit() as usize)?;
    Ok(paginate(page, request))
}

pub fn create_post(db: &Database, cache: &RenderCache, input: PostInput) -> Result<Post, ActionError> {
    let CleanPost { input, slug } = clean_post_input(db, input, None)?;
    let post = Post::from_input(input, slug, Utc::now());
    posts_db_operations::insert_post(db, &post)?;
    log::info!("Created post '{}' ({})", post.slug, post.id);
    cache.invalidate_post_routes([post.slug.as_str()]);
    Ok(post)
}

pub fn update_post(db: &Database, cache: &RenderCache, id: Uuid, input: PostInput) -> Result<Post, ActionError> {
    let mut post = posts_db_operations::read_post(db, id)?
        .ok_or_else(|| ActionError::NotFound(format!("Could not find post {}.", id)))?;
    let CleanPost { input, slug } = clean_post_input(db, input, Some(&post.slug))?;
    post.apply_input(input, slug, Utc::now());
    let previous = posts_db_operations::update_post(db, &post)?;
    log::info!("Updated post '{}' ({})", post.slug, post.id);
    cache.invalidate_post_routes([previous.slug.as_str(), post.slug.as_str()]);
    Ok(post)
}

pub fn delete_post(db: &Database, cache: &RenderCache, id: Uuid) -> Result<Post, ActionError> {
    let removed = posts_db_operations::delete_post(db, id)?;
    log::info!("Deleted post '{}' ({})", removed.slug, removed.id);
    cache.invalidate_post_routes([removed.slug.as_str()]);
    Ok(removed)
}

// --- Comments ---

/// Admin comment listing; soft-deleted comments are included.
pub fn get_comments_paginated(
    db: &Database,
    request: PageRequest,
    search: Option<&str>,
) -> Result<Paginated<Comment>, ActionError> {
    let search = normalize_search(search);
    let page = comments_db_operations::read_comments_page(db, search.as_deref(), request.offset(), request.limit() as usize)?;
    Ok(paginate(page, request))
}

fn set_comment_status(
    db: &Database,
    cache: &RenderCache,
    id: Uuid,
    status: CommentStatus,
) -> Result<Comment, ActionError> {
    let comment = comments_db_operations::set_comment_status(db, id, status, Utc::now())?;
    match posts_db_operations::read_post(db, comment.post)? {
        Some(post) => cache.invalidate_post_routes([post.slug.as_str()]),
        None => cache.invalidate_route("/"),
    }
    Ok(comment)
}

/// Soft-deletes a comment. Deleting an already deleted comment succeeds.
pub fn delete_comment(db: &Database, cache: &RenderCache, id: Uuid) -> Result<Comment, ActionError> {
    let comment = set_comment_status(db, cache, id, CommentStatus::Deleted)?;
    log::info!("Soft-deleted comment {}", comment.id);
    Ok(comment)
}

pub fn restore_comment(db: &Database, cache: &RenderCache, id: Uuid) -> Result<Comment, ActionError> {
    let comment = set_comment_status(db, cache, id, CommentStatus::Active)?;
    log::info!("Restored comment {}", comment.id);
    Ok(comment)
}
