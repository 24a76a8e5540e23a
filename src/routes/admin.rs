use crate::helper::action_result::{parse_id, ActionError};
use crate::helper::admin_helpers;
use crate::helper::render_cache::RenderCache;
use crate::middleware::AdminAccess;
use crate::models::{PostInput, StoreInput};
use crate::routes::ListQuery;
use actix_web::{web, HttpResponse};
use redb::Database;
use serde_json::json;

pub fn config_admin_api(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin/api")
            .wrap(AdminAccess)
            .route("/stores", web::get().to(list_stores))
            .route("/stores", web::post().to(create_store))
            .route("/stores/tags", web::get().to(list_store_tags))
            .route("/stores/{id}", web::put().to(update_store))
            .route("/stores/{id}", web::delete().to(delete_store))
            .route("/posts", web::get().to(list_posts))
            .route("/posts", web::post().to(create_post))
            .route("/posts/{id}", web::put().to(update_post))
            .route("/posts/{id}", web::delete().to(delete_post))
            .route("/comments", web::get().to(list_comments))
            .route("/comments/{id}/delete", web::post().to(delete_comment))
            .route("/comments/{id}/restore", web::post().to(restore_comment)),
    );
}

// --- Stores ---

async fn list_stores(db: web::Data<Database>, query: web::Query<ListQuery>) -> Result<HttpResponse, ActionError> {
    let request = query.page_request()?;
    let stores = admin_helpers::get_stores_paginated(&db, request, query.search.as_deref())?;
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "stores": stores.items,
        "pagination": stores.pagination,
    })))
}

async fn create_store(db: web::Data<Database>, input: web::Json<StoreInput>) -> Result<HttpResponse, ActionError> {
    let store = admin_helpers::create_store(&db, input.into_inner())?;
    Ok(HttpResponse::Created().json(json!({ "success": true, "store": store })))
}

async fn list_store_tags(db: web::Data<Database>) -> Result<HttpResponse, ActionError> {
    let tags = admin_helpers::get_store_tags(&db)?;
    Ok(HttpResponse::Ok().json(json!({ "success": true, "tags": tags })))
}

async fn update_store(
    id: web::Path<String>,
    db: web::Data<Database>,
    cache: web::Data<RenderCache>,
    input: web::Json<StoreInput>,
) -> Result<HttpResponse, ActionError> {
    let id = parse_id(&id, "store")?;
    let store = admin_helpers::update_store(&db, &cache, id, input.into_inner())?;
    Ok(HttpResponse::Ok().json(json!({ "success": true, "store": store })))
}

async fn delete_store(
    id: web::Path<String>,
    db: web::Data<Database>,
    cache: web::Data<RenderCache>,
) -> Result<HttpResponse, ActionError> {
    let id = parse_id(&id, "store")?;
    let store = admin_helpers::delete_store(&db, &cache, id)?;
    Ok(HttpResponse::Ok().json(json!({ "success": true, "store": store })))
}

// --- Posts ---

async fn list_posts(db: web::Data<Database>, query: web::Query<ListQuery>) -> Result<HttpResponse, ActionError> {
    let request = query.page_request()?;
    let posts = admin_helpers::get_posts_paginated(&db, request, query.search.as_deref(), query.category)?;
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "posts": posts.items,
        "pagination": posts.pagination,
    })))
}

async fn create_post(
    db: web::Data<Database>,
    cache: web::Data<RenderCache>,
    input: web::Json<PostInput>,
) -> Result<HttpResponse, ActionError> {
    let post = admin_helpers::create_post(&db, &cache, input.into_inner())?;
    Ok(HttpResponse::Created().json(json!({ "success": true, "post": post })))
}

async fn update_post(
    id: web::Path<String>,
    db: web::Data<Database>,
    cache: web::Data<RenderCache>,
    input: web::Json<PostInput>,
) -> Result<HttpResponse, ActionError> {
    let id = parse_id(&id, "post")?;
    let post = admin_helpers::update_post(&db, &cache, id, input.into_inner())?;
    Ok(HttpResponse::Ok().json(json!({ "success": true, "post": post })))
}

async fn delete_post(
    id: web::Path<String>,
    db: web::Data<Database>,
    cache: web::Data<RenderCache>,
) -> Result<HttpResponse, ActionError> {
    let id = parse_id(&id, "post")?;
    let post = admin_helpers::delete_post(&db, &cache, id)?;
    Ok(HttpResponse::Ok().json(json!({ "success": true, "post": post })))
}

// --- Comments ---

async fn list_comments(db: web::Data<Database>, query: web::Query<ListQuery>) -> Result<HttpResponse, ActionError> {
    let request = query.page_request()?;
    let comments = admin_helpers::get_comments_paginated(&db, request, query.search.as_deref())?;
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "comments": comments.items,
        "pagination": comments.pagination,
    })))
}

async fn delete_comment(
    id: web::Path<String>,
    db: web::Data<Database>,
    cache: web::Data<RenderCache>,
) -> Result<HttpResponse, ActionError> {
    let id = parse_id(&id, "comment")?;
    let comment = admin_helpers::delete_comment(&db, &cache, id)?;
    Ok(HttpResponse::Ok().json(json!({ "success": true, "comment": comment })))
}

async fn restore_comment(
    id: web::Path<String>,
    db: web::Data<Database>,
    cache: web::Data<RenderCache>,
) -> Result<HttpResponse, ActionError> {
    let id = parse_id(&id, "comment")?;
    let comment = admin_helpers::restore_comment(&db, &cache, id)?;
    Ok(HttpResponse::Ok().json(json!({ "success": true, "comment": comment })))
}
